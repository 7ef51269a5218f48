use serde::Serialize;
use thiserror::Error;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ContributionMode {
    SingleInvestment,
    RecurringAnnual,
}

#[derive(Debug, Clone)]
pub struct ScenarioInput {
    pub target_corpus: f64,
    pub lump_sum: f64,
    pub contribution_mode: ContributionMode,
    pub annual_contribution: f64,
    pub current_age: u32,
    pub retirement_age: u32,
    pub annual_rate: f64,
}

impl ScenarioInput {
    /// Contribution added at every age after the current one. Always zero for a
    /// single investment, whatever `annual_contribution` holds.
    pub fn scheduled_contribution(&self) -> f64 {
        match self.contribution_mode {
            ContributionMode::SingleInvestment => 0.0,
            ContributionMode::RecurringAnnual => self.annual_contribution,
        }
    }

    pub fn horizon_years(&self) -> u32 {
        self.retirement_age.saturating_sub(self.current_age)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionRow {
    pub age: u32,
    pub years_to_retirement: u32,
    pub required_corpus: f64,
    pub desired_annual_investment: f64,
    pub available_investment: f64,
    pub accumulated_corpus: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "amount", rename_all = "lowercase")]
pub enum Verdict {
    Surplus(f64),
    Shortfall(f64),
}

impl Verdict {
    pub fn amount(self) -> f64 {
        match self {
            Verdict::Surplus(amount) | Verdict::Shortfall(amount) => amount,
        }
    }

    pub fn is_surplus(self) -> bool {
        matches!(self, Verdict::Surplus(_))
    }
}

#[derive(Debug, Clone)]
pub struct Projection {
    pub rows: Vec<ProjectionRow>,
    pub verdict: Verdict,
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error(
        "retirement age must be greater than current age (current {current_age}, retirement {retirement_age})"
    )]
    InvalidAgeRange { current_age: u32, retirement_age: u32 },
}
