//! Amortization engine for conventional and overdraft-linked loans

mod installment;
mod state;
mod engine;
mod schedule;
mod irr;

pub use installment::calculate_installment;
pub use state::{OffsetState, MonthStep};
pub use engine::{AmortizationEngine, EngineConfig, compute_standard_loan, compute_offset_loan};
pub use schedule::{AmortizationResult, AmortizationSummary, ScheduleRow};
pub use irr::{calculate_irr, effective_annual_rate};
