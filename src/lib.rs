//! Home Loan Saver - amortization engine for conventional and overdraft-linked home loans
//!
//! This library provides:
//! - Fixed installment (EMI) calculation
//! - Conventional loan totals and repayment schedules
//! - Overdraft-linked (offset) loan simulation with a monthly surplus sweep
//! - Side-by-side comparison and savings analysis
//! - Parallel sweeps over offset balances and rates
//! - A file-backed visitor counter for embedding front ends

pub mod error;
pub mod loan;
pub mod amortization;
pub mod comparison;
pub mod scenario;
pub mod counter;

// Re-export commonly used types
pub use error::LoanError;
pub use loan::{LoanTerms, OffsetPolicy, ComparisonRequest, InputLimits};
pub use amortization::{
    AmortizationEngine, AmortizationResult, EngineConfig, calculate_installment,
    compute_standard_loan, compute_offset_loan,
};
pub use comparison::{compare, LoanComparison, SavingsAnalysis};
pub use scenario::ScenarioRunner;
pub use counter::VisitorCounter;
