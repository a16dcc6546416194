//! Loan inputs: terms, offset policy and comparison requests

mod data;
pub mod request;

pub use data::{LoanTerms, OffsetPolicy, DEFAULT_SURPLUS_FRACTION};
pub use request::{ComparisonRequest, InputLimits, DEFAULT_MINIMUM_OFFSET_MULTIPLE};
