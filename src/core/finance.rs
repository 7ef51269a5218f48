//! Discounting and compounding helpers shared by the projection engine.
//!
//! A zero rate is treated as a real case rather than a limit: both helpers
//! branch on it explicitly instead of dividing by the rate.

/// `(1 + rate)^periods`, taken through `ln_1p` so rates too small to change
/// `1.0 + rate` still compound.
pub fn growth_factor(rate: f64, periods: u32) -> f64 {
    (periods as f64 * rate.ln_1p()).exp()
}

/// Amount needed now to grow into `future_amount` after `periods` years.
pub fn present_value(future_amount: f64, rate: f64, periods: u32) -> f64 {
    if rate == 0.0 {
        return future_amount;
    }
    future_amount / growth_factor(rate, periods)
}

/// Value at the last period of `periods` equal end-of-year payments.
pub fn future_value_of_annuity(payment: f64, rate: f64, periods: u32) -> f64 {
    if rate == 0.0 {
        return payment * periods as f64;
    }
    let growth = (periods as f64 * rate.ln_1p()).exp_m1();
    payment * (growth / rate)
}
