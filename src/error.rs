//! Error types for loan inputs

use thiserror::Error;

/// Errors raised when loan inputs fail validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoanError {
    #[error("Invalid principal: {0} (must be positive)")]
    InvalidPrincipal(f64),

    #[error("Invalid annual rate: {0}% (must be a non-negative number)")]
    InvalidRate(f64),

    #[error("Invalid tenure: {0} months (must be at least 1)")]
    InvalidTenure(u32),

    #[error("Invalid offset balance: {balance} (must be between 0 and the principal {principal})")]
    InvalidOffsetBalance { balance: f64, principal: f64 },

    #[error("Offset balance {balance} is below the minimum of {minimum}")]
    OffsetBelowMinimum { balance: f64, minimum: f64 },

    #[error("Invalid monthly income: {0} (must be positive)")]
    InvalidIncome(f64),

    #[error("Invalid surplus fraction: {0} (must be between 0 and 1)")]
    InvalidSurplusFraction(f64),

    #[error("{field} = {value} is outside the allowed range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}
