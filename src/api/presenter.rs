use crate::core::{Projection, ProjectionRow};

use super::currency::Currency;

/// Two decimals with `,` between thousands, e.g. `-1,234.50`.
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let fixed = format!("{:.2}", value.abs());
    let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{frac}")
}

pub fn column_headers(currency: Currency) -> [String; 5] {
    let symbol = currency.symbol();
    [
        "Age".to_string(),
        format!("Available Investment per Year ({symbol})"),
        format!("Amount Accumulated per Year ({symbol})"),
        format!("Desired Amount to Invest Annually ({symbol})"),
        format!("Desired Corpus Amount ({symbol})"),
    ]
}

fn row_cells(row: &ProjectionRow) -> [String; 5] {
    [
        row.age.to_string(),
        format_amount(row.available_investment),
        format_amount(row.accumulated_corpus),
        format_amount(row.desired_annual_investment),
        format_amount(row.required_corpus),
    ]
}

/// Plain-text table, one line per age, numbers right-aligned under their
/// headers.
pub fn render_table(projection: &Projection, currency: Currency) -> String {
    let headers = column_headers(currency);
    let cells: Vec<[String; 5]> = projection.rows.iter().map(row_cells).collect();

    let mut widths = headers.clone().map(|h| h.chars().count());
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    write_line(&mut out, &headers, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    write_line(&mut out, &rule, &widths);
    for row in &cells {
        write_line(&mut out, row, &widths);
    }
    out
}

fn write_line(out: &mut String, cells: &[String], widths: &[usize; 5]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{}{cell}", " ".repeat(pad))
        })
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

pub fn verdict_message(projection: &Projection, currency: Currency, retirement_age: u32) -> String {
    let symbol = currency.symbol();
    let code = currency.code();
    let (accumulated, desired) = projection
        .rows
        .last()
        .map(|row| (row.accumulated_corpus, row.required_corpus))
        .unwrap_or_default();

    let verdict = projection.verdict;
    if verdict.is_surplus() {
        format!(
            "Hurray! You will have {symbol}{} by age {retirement_age}. \
             This is more than your desired retirement corpus of {} {code}. \
             You're all set for retirement!",
            format_amount(accumulated),
            format_amount(desired),
        )
    } else {
        format!(
            "Shortfall detected! Your projected corpus at age {retirement_age} is {symbol}{}. \
             This is short by {symbol}{} from your desired corpus of {} {code}. \
             You may need to increase your annual investment or extend your retirement age \
             to achieve your target.",
            format_amount(accumulated),
            format_amount(verdict.amount()),
            format_amount(desired),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ContributionMode, ScenarioInput, project};

    fn short_projection() -> Projection {
        project(&ScenarioInput {
            target_corpus: 100_000.0,
            lump_sum: 10_000.0,
            contribution_mode: ContributionMode::SingleInvestment,
            annual_contribution: 0.0,
            current_age: 60,
            retirement_age: 61,
            annual_rate: 0.07,
        })
        .expect("valid ages")
    }

    #[test]
    fn format_amount_groups_thousands() {
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(999.999), "1,000.00");
        assert_eq!(format_amount(1_234.5), "1,234.50");
        assert_eq!(format_amount(93_457.943_925), "93,457.94");
        assert_eq!(format_amount(1_000_000.0), "1,000,000.00");
        assert_eq!(format_amount(123_456_789.01), "123,456,789.01");
    }

    #[test]
    fn format_amount_keeps_sign_but_not_negative_zero() {
        assert_eq!(format_amount(-1_234.5), "-1,234.50");
        assert_eq!(format_amount(-0.001), "0.00");
        assert_eq!(format_amount(f64::INFINITY), "inf");
    }

    #[test]
    fn table_has_header_rule_and_one_line_per_age() {
        let table = render_table(&short_projection(), Currency::Usd);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Age"));
        assert!(lines[0].contains("Desired Corpus Amount ($)"));
        assert!(lines[1].starts_with("---"));
        assert!(lines[2].contains("93,457.94"));
        assert!(lines[2].contains("10,000.00"));
        assert!(lines[3].contains("100,000.00"));
        assert!(lines[3].contains("10,700.00"));
    }

    #[test]
    fn table_lines_are_newline_terminated_without_trailing_blanks() {
        let table = render_table(&short_projection(), Currency::Usd);
        assert!(table.ends_with('\n'));
        assert_eq!(table.matches('\n').count(), 4);
        assert!(table.lines().all(|line| line == line.trim_end()));
    }

    #[test]
    fn headers_use_currency_symbol() {
        let headers = column_headers(Currency::Inr);
        assert_eq!(headers[1], "Available Investment per Year (₹)");
    }

    #[test]
    fn shortfall_message_names_gap_and_target() {
        let msg = verdict_message(&short_projection(), Currency::Usd, 61);
        assert!(msg.starts_with("Shortfall detected!"));
        assert!(msg.contains("$10,700.00"));
        assert!(msg.contains("short by $89,300.00"));
        assert!(msg.contains("100,000.00 USD"));
    }

    #[test]
    fn shortfall_message_reports_the_verdict_amount() {
        let projection = short_projection();
        assert!(!projection.verdict.is_surplus());
        let gap = format!("short by ${}", format_amount(projection.verdict.amount()));
        assert!(verdict_message(&projection, Currency::Usd, 61).contains(&gap));
    }

    #[test]
    fn surplus_message_congratulates() {
        let projection = project(&ScenarioInput {
            target_corpus: 50_000.0,
            lump_sum: 0.0,
            contribution_mode: ContributionMode::RecurringAnnual,
            annual_contribution: 50_000.0,
            current_age: 64,
            retirement_age: 65,
            annual_rate: 0.0,
        })
        .expect("valid ages");
        let msg = verdict_message(&projection, Currency::Eur, 65);
        assert!(msg.starts_with("Hurray!"));
        assert!(msg.contains("€50,000.00 by age 65"));
        assert!(msg.contains("50,000.00 EUR"));
    }
}
