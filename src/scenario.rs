//! Scenario runner for batches of loan comparisons
//!
//! Holds one engine and input limits, then evaluates many variations of a
//! request. Sweeps run in parallel with rayon since every simulation is
//! independent.

use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::amortization::{AmortizationEngine, EngineConfig};
use crate::comparison::{compare, LoanComparison, SavingsAnalysis};
use crate::error::LoanError;
use crate::loan::{ComparisonRequest, InputLimits, LoanTerms, OffsetPolicy};

/// One point of a sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    pub initial_offset_balance: f64,
    pub offset_rate_percent: f64,
    pub periods_to_payoff: u32,
    pub total_interest: f64,
    pub total_payment: f64,
    pub savings: SavingsAnalysis,
}

/// Pre-configured runner for batch comparisons
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new();
/// let request = ComparisonRequest::default();
/// let points = runner.sweep_offset_balances(&request, &[200_000.0, 500_000.0])?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    engine: AmortizationEngine,
    limits: InputLimits,
}

impl ScenarioRunner {
    /// Runner with summary-only output and default limits
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig, limits: InputLimits) -> Self {
        Self {
            engine: AmortizationEngine::new(config),
            limits,
        }
    }

    /// Compare a single request
    pub fn run(&self, request: &ComparisonRequest) -> Result<LoanComparison, LoanError> {
        compare(&self.engine, request, &self.limits)
    }

    /// Compare several requests
    pub fn run_batch(&self, requests: &[ComparisonRequest]) -> Vec<Result<LoanComparison, LoanError>> {
        requests.par_iter().map(|r| self.run(r)).collect()
    }

    /// Vary the initial offset balance, holding everything else in `request` fixed
    ///
    /// Balances only need to lie within `[0, principal]`; the form's minimum
    /// offset rule does not apply to sweeps.
    pub fn sweep_offset_balances(
        &self,
        request: &ComparisonRequest,
        balances: &[f64],
    ) -> Result<Vec<SweepPoint>, LoanError> {
        info!("Sweeping {} offset balances", balances.len());
        let terms = request.offset_terms();
        balances
            .par_iter()
            .map(|&balance| self.sweep_point(request, &terms, &OffsetPolicy::new(balance, request.monthly_income)))
            .collect()
    }

    /// Vary the overdraft loan's rate, holding everything else in `request` fixed
    pub fn sweep_offset_rates(
        &self,
        request: &ComparisonRequest,
        rates_percent: &[f64],
    ) -> Result<Vec<SweepPoint>, LoanError> {
        info!("Sweeping {} offset rates", rates_percent.len());
        let policy = request.offset_policy();
        rates_percent
            .par_iter()
            .map(|&rate| {
                let terms = LoanTerms::from_years(request.principal, rate, request.tenure_years);
                self.sweep_point(request, &terms, &policy)
            })
            .collect()
    }

    fn sweep_point(
        &self,
        request: &ComparisonRequest,
        terms: &LoanTerms,
        policy: &OffsetPolicy,
    ) -> Result<SweepPoint, LoanError> {
        let standard_terms = request.standard_terms();
        standard_terms.validate()?;
        terms.validate()?;
        policy.validate(terms)?;

        let standard = self.engine.standard_loan(&standard_terms);
        let offset = self.engine.offset_loan(terms, policy);

        Ok(SweepPoint {
            initial_offset_balance: policy.initial_offset_balance,
            offset_rate_percent: terms.annual_rate_percent,
            periods_to_payoff: offset.periods_to_payoff,
            total_interest: offset.total_interest,
            total_payment: offset.total_payment,
            savings: SavingsAnalysis::between(&standard, &offset),
        })
    }
}
