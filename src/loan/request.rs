//! Comparison request and input limits
//!
//! A request carries everything needed to compare a conventional loan with
//! an overdraft-linked one. Missing JSON fields fall back to the defaults of
//! the loan-saver form (100k income, 5M loan over 20 years at 8.5%).

use serde::{Deserialize, Serialize};

use super::data::{LoanTerms, OffsetPolicy};
use crate::error::LoanError;

/// Minimum offset balance, as a multiple of monthly income
pub const DEFAULT_MINIMUM_OFFSET_MULTIPLE: f64 = 2.0;

fn default_monthly_income() -> f64 { 100_000.0 }
fn default_principal() -> f64 { 5_000_000.0 }
fn default_tenure_years() -> u32 { 20 }
fn default_rate_percent() -> f64 { 8.5 }

/// Inputs for comparing a standard loan with an offset loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRequest {
    /// Net take-home monthly pay
    #[serde(default = "default_monthly_income")]
    pub monthly_income: f64,

    /// Home loan amount
    #[serde(default = "default_principal")]
    pub principal: f64,

    /// Loan tenure in years
    #[serde(default = "default_tenure_years")]
    pub tenure_years: u32,

    /// Annual rate of the conventional loan (%)
    #[serde(default = "default_rate_percent")]
    pub standard_rate_percent: f64,

    /// Annual rate of the overdraft-linked loan (%)
    #[serde(default = "default_rate_percent")]
    pub offset_rate_percent: f64,

    /// Amount kept in the offset account; defaults to twice the monthly
    /// income, capped at the principal
    #[serde(default)]
    pub offset_balance: Option<f64>,
}

impl Default for ComparisonRequest {
    fn default() -> Self {
        Self {
            monthly_income: default_monthly_income(),
            principal: default_principal(),
            tenure_years: default_tenure_years(),
            standard_rate_percent: default_rate_percent(),
            offset_rate_percent: default_rate_percent(),
            offset_balance: None,
        }
    }
}

impl ComparisonRequest {
    /// Offset balance, resolving the default when none was given
    pub fn offset_balance(&self) -> f64 {
        self.offset_balance.unwrap_or_else(|| {
            (self.monthly_income * DEFAULT_MINIMUM_OFFSET_MULTIPLE)
                .max(0.0)
                .min(self.principal)
        })
    }

    /// Terms of the conventional loan
    pub fn standard_terms(&self) -> LoanTerms {
        LoanTerms::from_years(self.principal, self.standard_rate_percent, self.tenure_years)
    }

    /// Terms of the overdraft-linked loan
    pub fn offset_terms(&self) -> LoanTerms {
        LoanTerms::from_years(self.principal, self.offset_rate_percent, self.tenure_years)
    }

    /// Offset policy with the standard surplus sweep
    pub fn offset_policy(&self) -> OffsetPolicy {
        OffsetPolicy::new(self.offset_balance(), self.monthly_income)
    }

    /// Apply the form-level business rules
    pub fn validate(&self, limits: &InputLimits) -> Result<(), LoanError> {
        check_range("monthly_income", self.monthly_income, limits.monthly_income)?;
        check_range("principal", self.principal, limits.principal)?;
        check_range(
            "tenure_years",
            self.tenure_years as f64,
            (limits.tenure_years.0 as f64, limits.tenure_years.1 as f64),
        )?;
        check_range("standard_rate_percent", self.standard_rate_percent, limits.rate_percent)?;
        check_range("offset_rate_percent", self.offset_rate_percent, limits.rate_percent)?;

        let balance = self.offset_balance();
        let minimum = self.monthly_income * limits.minimum_offset_multiple;
        if balance < minimum {
            return Err(LoanError::OffsetBelowMinimum { balance, minimum });
        }
        if balance > self.principal {
            return Err(LoanError::InvalidOffsetBalance {
                balance,
                principal: self.principal,
            });
        }

        self.standard_terms().validate()?;
        self.offset_terms().validate()?;
        self.offset_policy().validate(&self.offset_terms())
    }
}

fn check_range(field: &'static str, value: f64, (min, max): (f64, f64)) -> Result<(), LoanError> {
    if value.is_nan() || value < min || value > max {
        return Err(LoanError::OutOfRange { field, value, min, max });
    }
    Ok(())
}

/// Accepted input ranges for a comparison request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputLimits {
    pub monthly_income: (f64, f64),
    pub principal: (f64, f64),
    pub tenure_years: (u32, u32),
    pub rate_percent: (f64, f64),

    /// Offset balance must be at least this multiple of monthly income
    pub minimum_offset_multiple: f64,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            monthly_income: (10_000.0, 10_000_000.0),
            principal: (100_000.0, 100_000_000.0),
            tenure_years: (1, 30),
            rate_percent: (1.0, 20.0),
            minimum_offset_multiple: DEFAULT_MINIMUM_OFFSET_MULTIPLE,
        }
    }
}
