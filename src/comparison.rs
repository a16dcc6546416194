//! Side-by-side comparison of a conventional loan and an overdraft-linked loan

use log::info;
use serde::{Deserialize, Serialize};

use crate::amortization::{AmortizationEngine, AmortizationResult};
use crate::error::LoanError;
use crate::loan::{ComparisonRequest, InputLimits};

/// What the overdraft-linked loan saves over the conventional one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsAnalysis {
    /// Installments avoided by retiring the loan early (negative if it took longer)
    pub installments_saved: i64,

    /// Difference in total interest
    pub interest_saved: f64,

    /// Difference in total amount paid
    pub total_saved: f64,

    /// True only when both interest and installments are saved
    pub has_savings: bool,
}

impl SavingsAnalysis {
    /// Difference the two results
    pub fn between(standard: &AmortizationResult, offset: &AmortizationResult) -> Self {
        let installments_saved = standard.periods_to_payoff as i64 - offset.periods_to_payoff as i64;
        let interest_saved = standard.total_interest - offset.total_interest;
        let total_saved = standard.total_payment - offset.total_payment;

        Self {
            installments_saved,
            interest_saved,
            total_saved,
            has_savings: interest_saved > 0.0 && installments_saved > 0,
        }
    }
}

/// Inputs echoed back next to each loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanBreakdown {
    pub principal: f64,
    pub annual_rate_percent: f64,

    /// Balance held in the offset account (None for the conventional loan)
    pub offset_amount_used: Option<f64>,

    /// Interest-bearing principal in the first month
    pub initial_effective_principal: f64,
}

/// Both loans and what separates them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanComparison {
    pub standard: AmortizationResult,
    pub offset: AmortizationResult,
    pub savings: SavingsAnalysis,
    pub standard_breakdown: LoanBreakdown,
    pub offset_breakdown: LoanBreakdown,
}

/// Validate a request against `limits` and compare both loans
pub fn compare(
    engine: &AmortizationEngine,
    request: &ComparisonRequest,
    limits: &InputLimits,
) -> Result<LoanComparison, LoanError> {
    request.validate(limits)?;

    let standard_terms = request.standard_terms();
    let offset_terms = request.offset_terms();
    let policy = request.offset_policy();

    let standard = engine.standard_loan(&standard_terms);
    let offset = engine.offset_loan(&offset_terms, &policy);
    let savings = SavingsAnalysis::between(&standard, &offset);

    info!(
        "Compared {:.0} over {} months: offset loan saves {:.2} interest and {} installments",
        request.principal, standard_terms.tenure_months, savings.interest_saved, savings.installments_saved
    );

    Ok(LoanComparison {
        standard_breakdown: LoanBreakdown {
            principal: request.principal,
            annual_rate_percent: request.standard_rate_percent,
            offset_amount_used: None,
            initial_effective_principal: request.principal,
        },
        offset_breakdown: LoanBreakdown {
            principal: request.principal,
            annual_rate_percent: request.offset_rate_percent,
            offset_amount_used: Some(policy.initial_offset_balance),
            initial_effective_principal: request.principal - policy.initial_offset_balance,
        },
        standard,
        offset,
        savings,
    })
}
