use log::debug;

use super::finance::{future_value_of_annuity, present_value};
use super::types::{
    ContributionMode, Projection, ProjectionRow, ScenarioInput, ValidationError, Verdict,
};

/// Builds the year-by-year plan from `current_age` to `retirement_age`
/// inclusive and the surplus/shortfall verdict at retirement.
///
/// Only the age range is checked here; amounts and the rate are expected to
/// have been range-checked by the caller. No rounding is applied.
pub fn project(input: &ScenarioInput) -> Result<Projection, ValidationError> {
    validate_age_range(input)?;

    debug!(
        "projecting {:?} from age {} to {} at rate {}",
        input.contribution_mode, input.current_age, input.retirement_age, input.annual_rate
    );

    let contribution = input.scheduled_contribution();
    let mut rows = Vec::with_capacity(input.horizon_years() as usize + 1);
    let mut accumulated = input.lump_sum;

    for age in input.current_age..=input.retirement_age {
        let years_to_retirement = input.retirement_age - age;
        let required = required_corpus(input, years_to_retirement);
        let is_start = age == input.current_age;

        if !is_start {
            accumulated = accumulated * (1.0 + input.annual_rate) + contribution;
        }

        rows.push(ProjectionRow {
            age,
            years_to_retirement,
            required_corpus: required,
            desired_annual_investment: if is_start { required } else { contribution },
            available_investment: if is_start { input.lump_sum } else { contribution },
            accumulated_corpus: accumulated,
        });
    }

    // The loop always ends on the retirement row, where nothing is discounted.
    let verdict = compare(accumulated, required_corpus(input, 0));
    Ok(Projection { rows, verdict })
}

pub fn validate_age_range(input: &ScenarioInput) -> Result<(), ValidationError> {
    if input.retirement_age <= input.current_age {
        return Err(ValidationError::InvalidAgeRange {
            current_age: input.current_age,
            retirement_age: input.retirement_age,
        });
    }
    Ok(())
}

/// Principal needed with `years` left, net of contributions still scheduled.
fn required_corpus(input: &ScenarioInput, years: u32) -> f64 {
    match input.contribution_mode {
        ContributionMode::SingleInvestment => {
            present_value(input.target_corpus, input.annual_rate, years)
        }
        ContributionMode::RecurringAnnual => {
            let fv_contrib =
                future_value_of_annuity(input.annual_contribution, input.annual_rate, years);
            let adjusted_target = input.target_corpus - fv_contrib;
            if adjusted_target <= 0.0 {
                0.0
            } else if years == 0 {
                adjusted_target
            } else {
                present_value(adjusted_target, input.annual_rate, years)
            }
        }
    }
}

fn compare(accumulated: f64, required: f64) -> Verdict {
    if accumulated >= required {
        Verdict::Surplus(accumulated - required)
    } else {
        Verdict::Shortfall(required - accumulated)
    }
}
