//! Loan terms and offset account policy

use serde::{Deserialize, Serialize};

use crate::error::LoanError;

/// Share of monthly income swept into the offset account each month
pub const DEFAULT_SURPLUS_FRACTION: f64 = 0.3;

/// Terms of a home loan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Amount borrowed
    pub principal: f64,

    /// Annual interest rate in percent (8.5 for 8.5%)
    pub annual_rate_percent: f64,

    /// Number of monthly installments
    pub tenure_months: u32,
}

impl LoanTerms {
    pub fn new(principal: f64, annual_rate_percent: f64, tenure_months: u32) -> Self {
        Self {
            principal,
            annual_rate_percent,
            tenure_months,
        }
    }

    /// Create terms from a tenure expressed in whole years
    pub fn from_years(principal: f64, annual_rate_percent: f64, tenure_years: u32) -> Self {
        Self::new(principal, annual_rate_percent, tenure_years.saturating_mul(12))
    }

    /// Monthly rate as a decimal (8.5% p.a. -> 0.0070833...)
    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate_percent / 1200.0
    }

    /// Check the terms before handing them to the engine
    pub fn validate(&self) -> Result<(), LoanError> {
        if !self.principal.is_finite() || self.principal <= 0.0 {
            return Err(LoanError::InvalidPrincipal(self.principal));
        }
        if !self.annual_rate_percent.is_finite() || self.annual_rate_percent < 0.0 {
            return Err(LoanError::InvalidRate(self.annual_rate_percent));
        }
        if self.tenure_months < 1 {
            return Err(LoanError::InvalidTenure(self.tenure_months));
        }
        Ok(())
    }
}

/// How the linked overdraft account is funded
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OffsetPolicy {
    /// Balance parked in the offset account at the start of the loan
    pub initial_offset_balance: f64,

    /// Net take-home pay per month
    pub monthly_income: f64,

    /// Fraction of income swept into the offset account every month
    #[serde(default = "default_surplus_fraction")]
    pub surplus_fraction: f64,
}

fn default_surplus_fraction() -> f64 {
    DEFAULT_SURPLUS_FRACTION
}

impl OffsetPolicy {
    /// Policy with the standard 30% surplus sweep
    pub fn new(initial_offset_balance: f64, monthly_income: f64) -> Self {
        Self::with_surplus_fraction(initial_offset_balance, monthly_income, DEFAULT_SURPLUS_FRACTION)
    }

    pub fn with_surplus_fraction(
        initial_offset_balance: f64,
        monthly_income: f64,
        surplus_fraction: f64,
    ) -> Self {
        Self {
            initial_offset_balance,
            monthly_income,
            surplus_fraction,
        }
    }

    /// Amount added to the offset account each month
    pub fn monthly_surplus(&self) -> f64 {
        self.monthly_income * self.surplus_fraction
    }

    /// Check the policy against the loan it offsets
    pub fn validate(&self, terms: &LoanTerms) -> Result<(), LoanError> {
        let balance = self.initial_offset_balance;
        if !balance.is_finite() || balance < 0.0 || balance > terms.principal {
            return Err(LoanError::InvalidOffsetBalance {
                balance,
                principal: terms.principal,
            });
        }
        if !self.monthly_income.is_finite() || self.monthly_income <= 0.0 {
            return Err(LoanError::InvalidIncome(self.monthly_income));
        }
        if !(self.surplus_fraction > 0.0 && self.surplus_fraction < 1.0) {
            return Err(LoanError::InvalidSurplusFraction(self.surplus_fraction));
        }
        Ok(())
    }
}
