//! Fixed monthly installment (EMI) calculation

/// Calculate the fixed installment that retires `principal` in `periods`
/// equal monthly payments at `annual_rate_percent`.
///
/// Uses the annuity formula `P * r * (1+r)^N / ((1+r)^N - 1)` with
/// `r = annual_rate_percent / 1200`, falling back to straight-line `P / N`
/// when the rate is zero.
///
/// Callers must pass `principal > 0` and `periods >= 1`.
pub fn calculate_installment(principal: f64, annual_rate_percent: f64, periods: u32) -> f64 {
    let monthly_rate = annual_rate_percent / 1200.0;
    if monthly_rate == 0.0 {
        return principal / periods as f64;
    }

    let growth = (1.0 + monthly_rate).powf(periods as f64);
    principal * monthly_rate * growth / (growth - 1.0)
}
