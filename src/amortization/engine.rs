//! Amortization engine for conventional and overdraft-linked loans

use chrono::{Months, NaiveDate};
use log::{debug, warn};

use super::installment::calculate_installment;
use super::schedule::{AmortizationResult, ScheduleRow};
use super::state::OffsetState;
use crate::error::LoanError;
use crate::loan::{LoanTerms, OffsetPolicy};

/// Outstanding principal below one cent is float drift, not an unpaid balance
const RESIDUAL_WARN_THRESHOLD: f64 = 0.01;

/// Configuration for an amortization run
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Whether to record a schedule row per month
    pub detailed_output: bool,

    /// Date of the first installment, used to date schedule rows
    pub first_payment_date: Option<NaiveDate>,
}

impl EngineConfig {
    /// Config that records a full schedule
    pub fn detailed() -> Self {
        Self {
            detailed_output: true,
            ..Default::default()
        }
    }

    fn payment_date(&self, month: u32) -> Option<NaiveDate> {
        self.first_payment_date
            .and_then(|first| first.checked_add_months(Months::new(month - 1)))
    }
}

/// Main amortization engine
///
/// Both simulations are pure: they read the terms, keep their balances in
/// local state and return a fresh result, so one engine can be shared freely.
#[derive(Debug, Clone, Default)]
pub struct AmortizationEngine {
    config: EngineConfig,
}

impl AmortizationEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Conventional loan: fixed installment over the full term
    ///
    /// Totals are closed form. The schedule, when requested, is the usual
    /// reducing-balance recursion and does not feed back into the totals.
    pub fn standard_loan(&self, terms: &LoanTerms) -> AmortizationResult {
        let installment = calculate_installment(terms.principal, terms.annual_rate_percent, terms.tenure_months);
        let total_payment = installment * terms.tenure_months as f64;
        let total_interest = total_payment - terms.principal;

        let mut result = AmortizationResult::new(
            installment,
            terms.tenure_months,
            total_payment,
            total_interest,
            0.0,
        );

        if self.config.detailed_output {
            let monthly_rate = terms.monthly_rate();
            let mut balance = terms.principal;
            let mut cumulative_interest = 0.0;

            for month in 1..=terms.tenure_months {
                let interest = balance * monthly_rate;
                let principal_portion = installment - interest;
                cumulative_interest += interest;

                result.add_row(ScheduleRow {
                    month,
                    payment_date: self.config.payment_date(month),
                    opening_principal: balance,
                    offset_balance: 0.0,
                    effective_principal: balance,
                    installment,
                    interest,
                    principal_portion,
                    closing_principal: balance - principal_portion,
                    cumulative_interest,
                });

                balance -= principal_portion;
            }
        }

        result
    }

    /// Overdraft-linked loan: simulate month by month until the principal is
    /// retired or the term is exhausted
    pub fn offset_loan(&self, terms: &LoanTerms, policy: &OffsetPolicy) -> AmortizationResult {
        let installment = calculate_installment(terms.principal, terms.annual_rate_percent, terms.tenure_months);
        let monthly_rate = terms.monthly_rate();
        let monthly_surplus = policy.monthly_surplus();

        let mut state = OffsetState::new(terms, policy);
        let mut schedule = Vec::new();

        for month in 1..=terms.tenure_months {
            if state.is_retired() {
                break;
            }

            let step = state.advance_month(month, installment, monthly_rate, terms.principal, monthly_surplus);

            if self.config.detailed_output {
                schedule.push(ScheduleRow {
                    month,
                    payment_date: self.config.payment_date(month),
                    opening_principal: step.opening_principal,
                    offset_balance: step.offset_balance,
                    effective_principal: step.effective_principal,
                    installment,
                    interest: step.interest,
                    principal_portion: step.principal_portion,
                    closing_principal: state.outstanding_principal,
                    cumulative_interest: state.accumulated_interest,
                });
            }
        }

        if state.is_retired() {
            debug!(
                "Offset loan retired after {} of {} months",
                state.months_elapsed, terms.tenure_months
            );
        } else if state.outstanding_principal >= RESIDUAL_WARN_THRESHOLD {
            warn!(
                "Offset loan term of {} months exhausted with {:.2} principal outstanding",
                terms.tenure_months, state.outstanding_principal
            );
        } else {
            debug!(
                "Offset loan term of {} months exhausted with rounding residual {:e}",
                terms.tenure_months, state.outstanding_principal
            );
        }

        let mut result = AmortizationResult::new(
            installment,
            state.months_elapsed,
            installment * state.months_elapsed as f64,
            state.accumulated_interest,
            state.outstanding_principal,
        );
        result.schedule = schedule;
        result
    }
}

/// Validate inputs and simulate a conventional loan
pub fn compute_standard_loan(
    principal: f64,
    annual_rate_percent: f64,
    tenure_years: u32,
) -> Result<AmortizationResult, LoanError> {
    let terms = LoanTerms::from_years(principal, annual_rate_percent, tenure_years);
    terms.validate()?;
    Ok(AmortizationEngine::default().standard_loan(&terms))
}

/// Validate inputs and simulate an overdraft-linked loan with the standard surplus sweep
pub fn compute_offset_loan(
    principal: f64,
    annual_rate_percent: f64,
    tenure_years: u32,
    initial_offset_balance: f64,
    monthly_income: f64,
) -> Result<AmortizationResult, LoanError> {
    let terms = LoanTerms::from_years(principal, annual_rate_percent, tenure_years);
    let policy = OffsetPolicy::new(initial_offset_balance, monthly_income);
    terms.validate()?;
    policy.validate(&terms)?;
    Ok(AmortizationEngine::default().offset_loan(&terms, &policy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn reference_terms() -> LoanTerms {
        LoanTerms::from_years(5_000_000.0, 8.5, 20)
    }

    #[test]
    fn test_standard_reference_loan() {
        let result = compute_standard_loan(5_000_000.0, 8.5, 20).unwrap();

        assert_abs_diff_eq!(result.monthly_installment, 43_391.16, epsilon = 0.01);
        assert_eq!(result.periods_to_payoff, 240);
        assert_relative_eq!(result.total_payment, result.monthly_installment * 240.0);
        assert_relative_eq!(result.total_interest, result.total_payment - 5_000_000.0);
        assert!(result.total_interest > 0.0);
        assert!(result.schedule.is_empty());
    }

    #[test]
    fn test_standard_zero_rate() {
        let result = compute_standard_loan(1_200_000.0, 0.0, 10).unwrap();

        assert_eq!(result.monthly_installment, 10_000.0);
        assert_abs_diff_eq!(result.total_interest, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_standard_schedule_amortizes_to_zero() {
        let engine = AmortizationEngine::new(EngineConfig::detailed());
        let result = engine.standard_loan(&reference_terms());

        assert_eq!(result.schedule.len(), 240);
        let last = result.schedule.last().unwrap();
        assert_abs_diff_eq!(last.closing_principal, 0.0, epsilon = 1e-3);
        assert_relative_eq!(last.cumulative_interest, result.total_interest, max_relative = 1e-9);
        assert!(result.schedule.iter().all(|r| r.offset_balance == 0.0));
    }

    #[test]
    fn test_offset_reference_loan() {
        let standard = compute_standard_loan(5_000_000.0, 8.5, 20).unwrap();
        let offset = compute_offset_loan(5_000_000.0, 8.5, 20, 200_000.0, 100_000.0).unwrap();

        assert_eq!(offset.monthly_installment, standard.monthly_installment);
        assert_eq!(offset.periods_to_payoff, 154);
        assert_abs_diff_eq!(offset.total_interest, 1_670_164.68, epsilon = 1.0);
        assert_relative_eq!(offset.total_payment, offset.monthly_installment * 154.0);
        assert!(offset.total_interest < standard.total_interest);
        assert!(offset.is_fully_repaid());
    }

    #[test]
    fn test_zero_offset_still_saves_through_sweep() {
        let standard = compute_standard_loan(5_000_000.0, 8.5, 20).unwrap();
        let offset = compute_offset_loan(5_000_000.0, 8.5, 20, 0.0, 100_000.0).unwrap();

        assert_eq!(offset.periods_to_payoff, 158);
        assert!(offset.total_interest < standard.total_interest);
    }

    #[test]
    fn test_full_offset_charges_no_interest() {
        let offset = compute_offset_loan(5_000_000.0, 8.5, 20, 5_000_000.0, 100_000.0).unwrap();

        assert_eq!(offset.total_interest, 0.0);
        // 5M / 43_391.16 rounds up to 116 installments
        assert_eq!(offset.periods_to_payoff, 116);
    }

    #[test]
    fn test_offset_zero_rate_runs_full_term() {
        let offset = compute_offset_loan(1_200_000.0, 0.0, 10, 0.0, 50_000.0).unwrap();

        assert_eq!(offset.monthly_installment, 10_000.0);
        assert_eq!(offset.total_interest, 0.0);
        assert_eq!(offset.periods_to_payoff, 120);
    }

    #[test]
    fn test_term_exhausted_keeps_residual_principal() {
        // 100_000 / 12 is inexact, so twelve installments leave a sliver owed
        let offset = compute_offset_loan(100_000.0, 0.0, 1, 0.0, 1_000.0).unwrap();

        assert_eq!(offset.periods_to_payoff, 12);
        assert!(offset.closing_principal > 0.0);
        assert!(offset.closing_principal < RESIDUAL_WARN_THRESHOLD);
        assert!(!offset.is_fully_repaid());
        assert!(!offset.summary().fully_repaid);
        assert_relative_eq!(offset.total_payment, 100_000.0, max_relative = 1e-12);
    }

    #[test]
    fn test_term_exhausted_in_detailed_run() {
        let engine = AmortizationEngine::new(EngineConfig::detailed());
        let terms = LoanTerms::from_years(100_000.0, 0.0, 1);
        let result = engine.offset_loan(&terms, &OffsetPolicy::new(0.0, 1_000.0));

        assert_eq!(result.schedule.len(), 12);
        let last = result.schedule.last().unwrap();
        assert_eq!(last.month, 12);
        assert_eq!(last.closing_principal, result.closing_principal);
        assert!(last.closing_principal > 0.0);
    }

    #[test]
    fn test_offset_never_exceeds_term() {
        for years in [1, 5, 15, 30] {
            for balance in [0.0, 100_000.0, 1_000_000.0] {
                let terms = LoanTerms::from_years(1_000_000.0, 12.0, years);
                let policy = OffsetPolicy::new(balance, 1_000.0);
                let result = AmortizationEngine::default().offset_loan(&terms, &policy);
                assert!(result.periods_to_payoff <= terms.tenure_months);
            }
        }
    }

    #[test]
    fn test_offset_never_costs_more_than_standard() {
        let engine = AmortizationEngine::default();
        for rate in [1.0, 6.5, 8.5, 14.0, 20.0] {
            for years in [1, 10, 25] {
                let terms = LoanTerms::from_years(3_000_000.0, rate, years);
                let standard = engine.standard_loan(&terms);
                let offset = engine.offset_loan(&terms, &OffsetPolicy::new(0.0, 20_000.0));
                assert!(offset.total_interest <= standard.total_interest + 1e-6);
            }
        }
    }

    #[test]
    fn test_larger_offset_never_hurts() {
        let engine = AmortizationEngine::default();
        let terms = reference_terms();

        let mut previous: Option<AmortizationResult> = None;
        for balance in [0.0, 200_000.0, 500_000.0, 1_000_000.0, 2_500_000.0, 5_000_000.0] {
            let result = engine.offset_loan(&terms, &OffsetPolicy::new(balance, 100_000.0));
            if let Some(prev) = &previous {
                assert!(result.total_interest <= prev.total_interest);
                assert!(result.periods_to_payoff <= prev.periods_to_payoff);
            }
            previous = Some(result);
        }
    }

    #[test]
    fn test_offset_schedule_rows() {
        let config = EngineConfig {
            detailed_output: true,
            first_payment_date: NaiveDate::from_ymd_opt(2025, 1, 31),
        };
        let engine = AmortizationEngine::new(config);
        let result = engine.offset_loan(&reference_terms(), &OffsetPolicy::new(200_000.0, 100_000.0));

        assert_eq!(result.schedule.len(), result.periods_to_payoff as usize);

        let first = &result.schedule[0];
        assert_eq!(first.month, 1);
        assert_eq!(first.offset_balance, 200_000.0);
        assert_relative_eq!(first.effective_principal, 4_800_000.0);
        assert_eq!(first.payment_date, NaiveDate::from_ymd_opt(2025, 1, 31));

        // Month-end dates clamp in short months
        assert_eq!(result.schedule[1].payment_date, NaiveDate::from_ymd_opt(2025, 2, 28));
        assert_eq!(result.schedule[1].offset_balance, 230_000.0);

        let last = result.schedule.last().unwrap();
        assert_eq!(last.closing_principal, result.closing_principal);
        assert_eq!(last.cumulative_interest, result.total_interest);
    }

    #[test]
    fn test_detail_does_not_change_totals() {
        let terms = reference_terms();
        let policy = OffsetPolicy::new(300_000.0, 75_000.0);

        let mut plain = AmortizationEngine::default().offset_loan(&terms, &policy);
        let detailed = AmortizationEngine::new(EngineConfig::detailed()).offset_loan(&terms, &policy);

        plain.schedule = detailed.schedule.clone();
        assert_eq!(plain, detailed);
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let a = compute_offset_loan(7_500_000.0, 9.1, 25, 400_000.0, 150_000.0).unwrap();
        let b = compute_offset_loan(7_500_000.0, 9.1, 25, 400_000.0, 150_000.0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_boundary_validation() {
        assert_eq!(
            compute_standard_loan(-1.0, 8.5, 20),
            Err(LoanError::InvalidPrincipal(-1.0))
        );
        assert_eq!(compute_standard_loan(1_000.0, 8.5, 0), Err(LoanError::InvalidTenure(0)));
        assert!(matches!(
            compute_offset_loan(1_000_000.0, 8.5, 20, 2_000_000.0, 50_000.0),
            Err(LoanError::InvalidOffsetBalance { .. })
        ));
    }
}
