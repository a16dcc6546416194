//! AWS Lambda handler for loan comparisons
//!
//! Accepts a JSON comparison request and returns both loans, the savings
//! analysis and the running visitor count. Missing request fields take the
//! form defaults.
//!
//! Environment:
//!   VISITOR_COUNT_PATH - counter file (default: /tmp/visitor_count.txt)

use std::env;
use std::sync::Arc;
use std::time::Instant;

use home_loan_saver::{
    compare, AmortizationEngine, ComparisonRequest, EngineConfig, InputLimits, LoanComparison, VisitorCounter,
};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use log::{info, warn};
use serde::{Deserialize, Serialize};

const DEFAULT_COUNTER_PATH: &str = "/tmp/visitor_count.txt";

/// Input payload
#[derive(Debug, Deserialize)]
pub struct LoanRequest {
    #[serde(flatten)]
    pub comparison: ComparisonRequest,

    /// Include month-by-month schedules for both loans
    #[serde(default)]
    pub include_schedule: bool,
}

/// Output payload
#[derive(Debug, Serialize)]
pub struct LoanResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<LoanComparison>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visitor_count: Option<u64>,
    pub execution_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Count a visit on the blocking pool; the counter does file I/O under a mutex
async fn record_visit(counter: Arc<VisitorCounter>) -> Option<u64> {
    match tokio::task::spawn_blocking(move || counter.increment()).await {
        Ok(Ok(count)) => Some(count),
        Ok(Err(e)) => {
            warn!("Visitor count unavailable: {}", e);
            None
        }
        Err(e) => {
            warn!("Visitor count task failed: {}", e);
            None
        }
    }
}

async fn handler(counter: Arc<VisitorCounter>, event: LambdaEvent<LoanRequest>) -> Result<LoanResponse, Error> {
    Ok(respond(counter, event.payload).await)
}

async fn respond(counter: Arc<VisitorCounter>, request: LoanRequest) -> LoanResponse {
    let start = Instant::now();
    let visitor_count = record_visit(counter).await;

    let engine = AmortizationEngine::new(EngineConfig {
        detailed_output: request.include_schedule,
        first_payment_date: None,
    });

    let (comparison, error) = match compare(&engine, &request.comparison, &InputLimits::default()) {
        Ok(comparison) => (Some(comparison), None),
        Err(e) => {
            warn!("Rejected request: {}", e);
            (None, Some(e.to_string()))
        }
    };

    let execution_time_ms = start.elapsed().as_millis() as u64;
    info!("Handled comparison in {} ms", execution_time_ms);

    LoanResponse {
        comparison,
        visitor_count,
        execution_time_ms,
        error,
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let path = env::var("VISITOR_COUNT_PATH").unwrap_or_else(|_| DEFAULT_COUNTER_PATH.to_string());
    let counter = Arc::new(VisitorCounter::new(path));

    run(service_fn(move |event: LambdaEvent<LoanRequest>| {
        let counter = Arc::clone(&counter);
        async move { handler(counter, event).await }
    }))
    .await
}
