//! Nest-egg projection CLI
//!
//! Loads a JSON plan bundle, projects the base plan or a scenario (or the
//! whole set), prints a summary per run, and optionally dumps yearly rows
//! to CSV.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;

use nestegg::plan::load_plan;
use nestegg::{ProjectionEngine, ProjectionOutcome};

#[derive(Parser)]
#[command(name = "nestegg", about = "Project a household plan's nest egg year by year")]
struct Args {
    /// Path to a JSON plan bundle
    plan: PathBuf,

    /// Scenario to project; omitted means the base plan
    #[arg(long)]
    scenario: Option<u32>,

    /// Project the base plan and every scenario
    #[arg(long, conflicts_with = "scenario")]
    all: bool,

    /// Write yearly rows of every run to this CSV file
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let plan = load_plan(&args.plan).map_err(|e| anyhow!("{e}"))?;
    println!("Plan {}: {}", plan.plan_id, plan.name);
    println!("{}", "=".repeat(40));

    let engine = ProjectionEngine::new();
    let outcomes = if args.all {
        engine.project_all(&plan)?
    } else {
        vec![engine.project(&plan, args.scenario)?]
    };

    for outcome in &outcomes {
        print_summary(&plan.name, outcome);
    }

    if let Some(path) = &args.output {
        write_csv(path, &outcomes)
            .with_context(|| format!("cannot write {}", path.display()))?;
        println!("\nYearly rows written to: {}", path.display());
    }

    Ok(())
}

fn print_summary(plan_name: &str, outcome: &ProjectionOutcome) {
    match outcome.scenario_id {
        Some(id) => println!("\n{plan_name} / scenario {id}"),
        None => println!("\n{plan_name} / base plan"),
    }

    let summary = outcome.summary();
    println!("  Years projected: {}", summary.total_years);
    println!("  Total contributions: ${}", summary.total_contributions.round_dp(2));
    println!("  Total withdrawals: ${}", summary.total_withdrawals.round_dp(2));
    println!("  Total growth: ${}", summary.total_growth.round_dp(2));
    println!("  Final balance: ${}", summary.final_balance.round_dp(2));
    if let Some(halt) = &outcome.halt {
        println!("  HALTED in {}: {}", halt.year, halt.cause);
    }
}

fn write_csv(path: &PathBuf, outcomes: &[ProjectionOutcome]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    writeln!(
        file,
        "scenario,year,balance,withdrawals,contributions,investment_growth,\
         prior_year_surplus,surplus_growth,new_surplus"
    )?;
    for outcome in outcomes {
        let scenario = outcome
            .scenario_id
            .map_or_else(|| "base".to_owned(), |id| id.to_string());
        for row in &outcome.years {
            writeln!(
                file,
                "{},{},{},{},{},{},{},{},{}",
                scenario,
                row.year,
                row.balance.round_dp(2),
                row.withdrawals.round_dp(2),
                row.contributions.round_dp(2),
                row.investment_growth.round_dp(2),
                row.prior_year_surplus.round_dp(2),
                row.surplus_growth.round_dp(2),
                row.new_surplus.round_dp(2),
            )?;
        }
    }
    Ok(())
}
