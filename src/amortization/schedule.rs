//! Amortization results and month-by-month schedules

use std::io::Write;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single month of a repayment schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    // Timing
    pub month: u32,
    pub payment_date: Option<NaiveDate>,

    // Balances at the start of the month
    pub opening_principal: f64,
    pub offset_balance: f64,
    pub effective_principal: f64,

    // Payment split
    pub installment: f64,
    pub interest: f64,
    pub principal_portion: f64,

    // End of month
    pub closing_principal: f64,
    pub cumulative_interest: f64,
}

/// Outcome of simulating one loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationResult {
    /// Fixed monthly installment
    pub monthly_installment: f64,

    /// Installments paid before the loan was retired (or the term ran out)
    pub periods_to_payoff: u32,

    /// Sum of installments paid
    pub total_payment: f64,

    /// Interest charged over the life of the loan
    pub total_interest: f64,

    /// Principal left after the last simulated month. Negative when the
    /// final installment overpaid, positive if the term ran out first.
    pub closing_principal: f64,

    /// Monthly rows, only populated for detailed runs
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schedule: Vec<ScheduleRow>,
}

impl AmortizationResult {
    pub fn new(
        monthly_installment: f64,
        periods_to_payoff: u32,
        total_payment: f64,
        total_interest: f64,
        closing_principal: f64,
    ) -> Self {
        Self {
            monthly_installment,
            periods_to_payoff,
            total_payment,
            total_interest,
            closing_principal,
            schedule: Vec::new(),
        }
    }

    /// Add a schedule row
    pub fn add_row(&mut self, row: ScheduleRow) {
        self.schedule.push(row);
    }

    /// Whether the principal was fully repaid
    pub fn is_fully_repaid(&self) -> bool {
        self.closing_principal <= 0.0
    }

    /// Get summary statistics
    pub fn summary(&self) -> AmortizationSummary {
        let last_payment_date = self.schedule.last().and_then(|r| r.payment_date);
        let average_effective_principal = if self.schedule.is_empty() {
            None
        } else {
            let total: f64 = self.schedule.iter().map(|r| r.effective_principal).sum();
            Some(total / self.schedule.len() as f64)
        };

        AmortizationSummary {
            total_months: self.periods_to_payoff,
            monthly_installment: self.monthly_installment,
            total_payment: self.total_payment,
            total_interest: self.total_interest,
            closing_principal: self.closing_principal,
            fully_repaid: self.is_fully_repaid(),
            average_effective_principal,
            last_payment_date,
        }
    }

    /// Write the schedule as CSV
    pub fn write_schedule_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for row in &self.schedule {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

/// Summary statistics for a simulated loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationSummary {
    pub total_months: u32,
    pub monthly_installment: f64,
    pub total_payment: f64,
    pub total_interest: f64,
    pub closing_principal: f64,
    pub fully_repaid: bool,
    pub average_effective_principal: Option<f64>,
    pub last_payment_date: Option<NaiveDate>,
}
