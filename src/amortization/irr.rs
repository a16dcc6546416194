//! Effective annual cost of a loan
//!
//! The borrower receives the principal at month 0 and pays the installment
//! for every month the loan ran. The effective rate is the monthly rate at
//! which those installments discount back to the principal, compounded to
//! a year. An offset loan that retires early pays the same installment
//! fewer times, so its effective rate sits below the contract rate.

use super::schedule::AmortizationResult;
use crate::loan::LoanTerms;

const TOLERANCE: f64 = 1e-10;
const MAX_ITERATIONS: usize = 200;

/// Bracket for the bisection fallback, as periodic rates
const LOWER_RATE: f64 = -0.99;
const UPPER_RATE: f64 = 10.0;

/// Internal rate of return of periodic `cashflows` (index = period),
/// annualized over `periods_per_year`.
///
/// Newton-Raphson starts from `periodic_guess`; if it leaves the bracket or
/// stalls, bisection over `[-99%, 1000%]` per period takes over. Returns
/// `None` when the flows never change sign or no root is bracketed.
pub fn calculate_irr(cashflows: &[f64], periods_per_year: u32, periodic_guess: f64) -> Option<f64> {
    let has_inflow = cashflows.iter().any(|&cf| cf > TOLERANCE);
    let has_outflow = cashflows.iter().any(|&cf| cf < -TOLERANCE);
    if !has_inflow || !has_outflow {
        return None;
    }

    newton(cashflows, periodic_guess)
        .or_else(|| bisect(cashflows))
        .map(|periodic| (1.0 + periodic).powi(periods_per_year as i32) - 1.0)
}

/// Effective annual rate paid on `terms` given the simulated `result`
pub fn effective_annual_rate(terms: &LoanTerms, result: &AmortizationResult) -> Option<f64> {
    let mut cashflows = Vec::with_capacity(result.periods_to_payoff as usize + 1);
    cashflows.push(terms.principal);
    cashflows.extend(std::iter::repeat(-result.monthly_installment).take(result.periods_to_payoff as usize));

    calculate_irr(&cashflows, 12, terms.monthly_rate())
}

/// Present value of the flows at `rate` and its derivative with respect to `rate`
fn present_value(cashflows: &[f64], rate: f64) -> (f64, f64) {
    let factor = 1.0 / (1.0 + rate);
    let mut discount = 1.0;
    let mut value = 0.0;
    let mut slope = 0.0;

    for (t, &cf) in cashflows.iter().enumerate() {
        value += cf * discount;
        slope -= t as f64 * cf * discount * factor;
        discount *= factor;
    }

    (value, slope)
}

fn newton(cashflows: &[f64], guess: f64) -> Option<f64> {
    let mut rate = guess;
    for _ in 0..MAX_ITERATIONS {
        let (value, slope) = present_value(cashflows, rate);
        if slope.abs() < 1e-20 {
            return None;
        }

        let next = rate - value / slope;
        if !(LOWER_RATE..=UPPER_RATE).contains(&next) {
            return None;
        }
        if (next - rate).abs() < TOLERANCE {
            return Some(next);
        }
        rate = next;
    }
    None
}

fn bisect(cashflows: &[f64]) -> Option<f64> {
    let (mut low, mut high) = (LOWER_RATE, UPPER_RATE);
    let mut value_low = present_value(cashflows, low).0;
    if value_low * present_value(cashflows, high).0 > 0.0 {
        return None;
    }

    for _ in 0..MAX_ITERATIONS {
        let mid = 0.5 * (low + high);
        let value_mid = present_value(cashflows, mid).0;
        if value_mid.abs() < TOLERANCE || high - low < 2.0 * TOLERANCE {
            return Some(mid);
        }

        if value_mid * value_low < 0.0 {
            high = mid;
        } else {
            low = mid;
            value_low = value_mid;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amortization::{compute_offset_loan, compute_standard_loan};
    use crate::loan::LoanTerms;

    #[test]
    fn test_single_repayment_after_a_year() {
        // Borrow 1000, repay 1100 twelve months later
        let mut cashflows = vec![1000.0];
        cashflows.extend(vec![0.0; 11]);
        cashflows.push(-1100.0);

        let irr = calculate_irr(&cashflows, 12, 0.0).unwrap();
        assert!((irr - 0.10).abs() < 1e-8, "Expected 10% IRR, got {}", irr);
    }

    #[test]
    fn test_no_sign_change() {
        assert_eq!(calculate_irr(&[100.0, 50.0], 12, 0.01), None);
        assert_eq!(calculate_irr(&[], 12, 0.01), None);
    }

    #[test]
    fn test_bad_guess_falls_back_to_bisection() {
        let terms = LoanTerms::from_years(1_000_000.0, 12.0, 1);
        let result = compute_standard_loan(1_000_000.0, 12.0, 1).unwrap();

        let mut cashflows = vec![terms.principal];
        cashflows.extend(vec![-result.monthly_installment; 12]);

        let from_contract = calculate_irr(&cashflows, 12, 0.01).unwrap();
        let from_far_guess = calculate_irr(&cashflows, 12, 9.5).unwrap();
        assert!((from_contract - from_far_guess).abs() < 1e-6);
    }

    #[test]
    fn test_standard_loan_costs_its_nominal_rate() {
        let terms = LoanTerms::from_years(5_000_000.0, 8.5, 20);
        let result = compute_standard_loan(5_000_000.0, 8.5, 20).unwrap();
        let rate = effective_annual_rate(&terms, &result).unwrap();

        let expected = (1.0 + 8.5 / 1200.0_f64).powi(12) - 1.0;
        assert!((rate - expected).abs() < 1e-8, "Expected {}, got {}", expected, rate);
    }

    #[test]
    fn test_zero_rate_loan_costs_nothing() {
        let terms = LoanTerms::from_years(1_200_000.0, 0.0, 10);
        let result = compute_standard_loan(1_200_000.0, 0.0, 10).unwrap();
        let rate = effective_annual_rate(&terms, &result).unwrap();
        assert!(rate.abs() < 1e-8);
    }

    #[test]
    fn test_offset_loan_costs_less() {
        let terms = LoanTerms::from_years(5_000_000.0, 8.5, 20);
        let standard = compute_standard_loan(5_000_000.0, 8.5, 20).unwrap();
        let offset = compute_offset_loan(5_000_000.0, 8.5, 20, 200_000.0, 100_000.0).unwrap();

        let standard_rate = effective_annual_rate(&terms, &standard).unwrap();
        let offset_rate = effective_annual_rate(&terms, &offset).unwrap();
        assert!(offset_rate < standard_rate);
        assert!(offset_rate > 0.0);
    }
}
