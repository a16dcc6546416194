//! Home Loan Saver CLI
//!
//! Command-line interface for comparing conventional and overdraft-linked home loans

use std::fs::File;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

use home_loan_saver::amortization::{effective_annual_rate, AmortizationResult, EngineConfig};
use home_loan_saver::counter::DEFAULT_COUNTER_FILE;
use home_loan_saver::{
    AmortizationEngine, ComparisonRequest, InputLimits, LoanComparison, ScenarioRunner, VisitorCounter,
};

/// Compare a normal home loan with an overdraft-linked home loan
#[derive(Parser)]
#[command(name = "home_loan_saver", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare both loans and report the savings
    Compare {
        #[command(flatten)]
        loan: LoanArgs,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Write a month-by-month repayment schedule as CSV
    Schedule {
        #[command(flatten)]
        loan: LoanArgs,

        /// Which loan to schedule
        #[arg(long, value_enum, default_value = "offset")]
        kind: LoanKind,

        /// Date of the first installment (YYYY-MM-DD)
        #[arg(long)]
        start_date: Option<NaiveDate>,

        /// Output file (stdout if omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Evaluate a range of offset balances
    Sweep {
        #[command(flatten)]
        loan: LoanArgs,

        /// Offset balances to try
        #[arg(long, value_delimiter = ',', required = true)]
        balances: Vec<f64>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Record a visit and print the running count
    Visits {
        /// Counter file
        #[arg(long, default_value = DEFAULT_COUNTER_FILE)]
        file: PathBuf,

        /// Show the count without incrementing
        #[arg(long)]
        peek: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LoanKind {
    Standard,
    Offset,
}

/// Loan inputs; flags override values from `--input`
#[derive(Args)]
struct LoanArgs {
    /// JSON file holding a comparison request
    #[arg(long)]
    input: Option<PathBuf>,

    /// Net take-home monthly pay
    #[arg(long)]
    monthly_income: Option<f64>,

    /// Home loan amount
    #[arg(long)]
    principal: Option<f64>,

    /// Loan tenure in years
    #[arg(long)]
    tenure_years: Option<u32>,

    /// Normal home loan interest rate (%)
    #[arg(long)]
    standard_rate: Option<f64>,

    /// OD home loan interest rate (%)
    #[arg(long)]
    offset_rate: Option<f64>,

    /// Amount to keep in the OD account
    #[arg(long)]
    offset_balance: Option<f64>,
}

impl LoanArgs {
    fn to_request(&self) -> Result<ComparisonRequest> {
        let mut request = match &self.input {
            Some(path) => {
                let file = File::open(path).with_context(|| format!("Unable to open {}", path.display()))?;
                serde_json::from_reader(file).with_context(|| format!("Invalid request in {}", path.display()))?
            }
            None => ComparisonRequest::default(),
        };

        if let Some(v) = self.monthly_income { request.monthly_income = v; }
        if let Some(v) = self.principal { request.principal = v; }
        if let Some(v) = self.tenure_years { request.tenure_years = v; }
        if let Some(v) = self.standard_rate { request.standard_rate_percent = v; }
        if let Some(v) = self.offset_rate { request.offset_rate_percent = v; }
        if self.offset_balance.is_some() { request.offset_balance = self.offset_balance; }

        Ok(request)
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Compare { loan, json } => run_compare(&loan, json),
        Commands::Schedule { loan, kind, start_date, output } => run_schedule(&loan, kind, start_date, output),
        Commands::Sweep { loan, balances, json } => run_sweep(&loan, &balances, json),
        Commands::Visits { file, peek } => run_visits(file, peek),
    }
}

fn run_compare(loan: &LoanArgs, json: bool) -> Result<()> {
    let request = loan.to_request()?;
    let comparison = ScenarioRunner::new().run(&request)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&comparison)?);
    } else {
        print_comparison(&request, &comparison);
    }
    Ok(())
}

fn print_comparison(request: &ComparisonRequest, comparison: &LoanComparison) {
    println!("Loan Comparison Results");
    println!("=======================\n");
    println!("{:<24} {:>20} {:>20}", "", "Normal Home Loan", "OD Home Loan");
    println!("{}", "-".repeat(66));
    print_row("Loan Amount", request.principal, request.principal);
    print_row("Interest Rate (%)", request.standard_rate_percent, request.offset_rate_percent);
    print_row("Monthly EMI", comparison.standard.monthly_installment, comparison.offset.monthly_installment);
    println!(
        "{:<24} {:>13} months {:>13} months",
        "Number of EMIs", comparison.standard.periods_to_payoff, comparison.offset.periods_to_payoff
    );
    print_row("Total Interest Outgo", comparison.standard.total_interest, comparison.offset.total_interest);
    print_row("Total Payment", comparison.standard.total_payment, comparison.offset.total_payment);
    println!(
        "{:<24} {:>20} {:>20.2}",
        "OD Amount Used",
        "N/A",
        comparison.offset_breakdown.offset_amount_used.unwrap_or(0.0)
    );
    print_row(
        "Effective Principal",
        comparison.standard_breakdown.initial_effective_principal,
        comparison.offset_breakdown.initial_effective_principal,
    );

    let standard_rate = effective_annual_rate(&request.standard_terms(), &comparison.standard);
    let offset_rate = effective_annual_rate(&request.offset_terms(), &comparison.offset);
    if let (Some(s), Some(o)) = (standard_rate, offset_rate) {
        print_row("Effective Annual Rate %", s * 100.0, o * 100.0);
    }

    let savings = &comparison.savings;
    println!();
    if savings.has_savings {
        println!(
            "You save {:.2} | {} EMIs earlier | Interest saved {:.2}",
            savings.total_saved, savings.installments_saved, savings.interest_saved
        );
    } else {
        println!("No significant savings found with OD Home Loan.");
    }
}

fn print_row(label: &str, standard: f64, offset: f64) {
    println!("{:<24} {:>20.2} {:>20.2}", label, standard, offset);
}

fn run_schedule(
    loan: &LoanArgs,
    kind: LoanKind,
    start_date: Option<NaiveDate>,
    output: Option<PathBuf>,
) -> Result<()> {
    let request = loan.to_request()?;
    request.validate(&InputLimits::default())?;

    let engine = AmortizationEngine::new(EngineConfig {
        detailed_output: true,
        first_payment_date: start_date,
    });
    let result: AmortizationResult = match kind {
        LoanKind::Standard => engine.standard_loan(&request.standard_terms()),
        LoanKind::Offset => engine.offset_loan(&request.offset_terms(), &request.offset_policy()),
    };

    match output {
        Some(path) => {
            let file = File::create(&path).with_context(|| format!("Unable to create {}", path.display()))?;
            result.write_schedule_csv(file)?;
            eprintln!("{} rows written to {}", result.schedule.len(), path.display());
        }
        None => result.write_schedule_csv(io::stdout().lock())?,
    }
    Ok(())
}

fn run_sweep(loan: &LoanArgs, balances: &[f64], json: bool) -> Result<()> {
    let request = loan.to_request()?;
    let points = ScenarioRunner::new().sweep_offset_balances(&request, balances)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&points)?);
        return Ok(());
    }

    println!("{:>16} {:>8} {:>18} {:>18} {:>10}", "OD Balance", "EMIs", "Total Interest", "Interest Saved", "EMIs Saved");
    println!("{}", "-".repeat(74));
    for point in &points {
        println!(
            "{:>16.0} {:>8} {:>18.2} {:>18.2} {:>10}",
            point.initial_offset_balance,
            point.periods_to_payoff,
            point.total_interest,
            point.savings.interest_saved,
            point.savings.installments_saved,
        );
    }
    Ok(())
}

fn run_visits(file: PathBuf, peek: bool) -> Result<()> {
    let counter = VisitorCounter::new(file);
    let count = if peek { counter.load()? } else { counter.increment()? };
    println!("Visitor Count: {}", count);
    Ok(())
}
