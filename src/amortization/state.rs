//! Balance state carried month to month by the offset simulation

use crate::loan::{LoanTerms, OffsetPolicy};

/// Balances of an overdraft-linked loan at a point in the simulation
#[derive(Debug, Clone)]
pub struct OffsetState {
    /// Months simulated so far
    pub months_elapsed: u32,

    /// Principal still owed
    pub outstanding_principal: f64,

    /// Savings parked in the linked account
    pub offset_balance: f64,

    /// Interest charged to date
    pub accumulated_interest: f64,
}

/// What happened in one simulated month
#[derive(Debug, Clone, Copy)]
pub struct MonthStep {
    pub opening_principal: f64,
    pub offset_balance: f64,
    pub effective_principal: f64,
    pub interest: f64,
    pub principal_portion: f64,
}

impl OffsetState {
    /// Initial state at loan drawdown
    pub fn new(terms: &LoanTerms, policy: &OffsetPolicy) -> Self {
        Self {
            months_elapsed: 0,
            outstanding_principal: terms.principal,
            offset_balance: policy.initial_offset_balance,
            accumulated_interest: 0.0,
        }
    }

    /// Interest-bearing base: outstanding principal net of the offset, floored at zero
    pub fn effective_principal(&self) -> f64 {
        (self.outstanding_principal - self.offset_balance).max(0.0)
    }

    /// Whether the loan has been paid off
    pub fn is_retired(&self) -> bool {
        self.outstanding_principal <= 0.0
    }

    /// Run one month: charge interest on the effective principal, apply the
    /// installment, then sweep surplus income into the offset account.
    ///
    /// The sweep runs while the offset is below the *original* principal and
    /// the loan is still outstanding, and never lifts the offset above the
    /// remaining principal.
    pub fn advance_month(
        &mut self,
        month: u32,
        installment: f64,
        monthly_rate: f64,
        original_principal: f64,
        monthly_surplus: f64,
    ) -> MonthStep {
        let opening_principal = self.outstanding_principal;
        let offset_balance = self.offset_balance;

        let effective_principal = self.effective_principal();
        let interest = effective_principal * monthly_rate;
        self.accumulated_interest += interest;

        let principal_portion = installment - interest;
        self.outstanding_principal -= principal_portion;

        if self.offset_balance < original_principal && self.outstanding_principal > 0.0 {
            self.offset_balance = (self.offset_balance + monthly_surplus).min(self.outstanding_principal);
        }

        self.months_elapsed = month;

        MonthStep {
            opening_principal,
            offset_balance,
            effective_principal,
            interest,
            principal_portion,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn state(outstanding: f64, offset: f64) -> OffsetState {
        OffsetState {
            months_elapsed: 0,
            outstanding_principal: outstanding,
            offset_balance: offset,
            accumulated_interest: 0.0,
        }
    }

    #[test]
    fn test_effective_principal_floors_at_zero() {
        assert_eq!(state(100.0, 40.0).effective_principal(), 60.0);
        assert_eq!(state(100.0, 150.0).effective_principal(), 0.0);
    }

    #[test]
    fn test_month_step() {
        let mut s = state(1_000_000.0, 200_000.0);
        let step = s.advance_month(1, 10_000.0, 0.01, 1_000_000.0, 30_000.0);

        assert_relative_eq!(step.effective_principal, 800_000.0);
        assert_relative_eq!(step.interest, 8_000.0);
        assert_relative_eq!(step.principal_portion, 2_000.0);
        assert_relative_eq!(s.outstanding_principal, 998_000.0);
        assert_relative_eq!(s.offset_balance, 230_000.0);
        assert_relative_eq!(s.accumulated_interest, 8_000.0);
        assert_eq!(s.months_elapsed, 1);
    }

    #[test]
    fn test_sweep_capped_at_outstanding() {
        let mut s = state(50_000.0, 45_000.0);
        s.advance_month(7, 10_000.0, 0.01, 1_000_000.0, 30_000.0);

        // 50k - (10k - 50) = 40_050 left; offset pulled down to that
        assert_relative_eq!(s.outstanding_principal, 40_050.0);
        assert_relative_eq!(s.offset_balance, 40_050.0);
    }

    #[test]
    fn test_no_sweep_once_retired() {
        let mut s = state(5_000.0, 1_000.0);
        s.advance_month(3, 10_000.0, 0.01, 1_000_000.0, 30_000.0);

        assert!(s.is_retired());
        assert_eq!(s.offset_balance, 1_000.0);
    }
}
