use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use activation_planner::config::{PlannerConfig, SearchMode};
use activation_planner::loader::InputFormat;
use activation_planner::{logger, plan_from_file};

/// Finds the activation order that collects the most reward within a time budget.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Scenario file: node records, or JSON when it ends in `.json`.
    input: String,

    /// Input format, overriding the file extension (`json` or `records`).
    #[arg(long)]
    format: Option<InputFormat>,

    /// JSON configuration file. Flags below override its values.
    #[arg(long)]
    config: Option<String>,

    /// Which searches to run: single, dual or both.
    #[arg(long)]
    mode: Option<SearchMode>,

    /// Id of the node both agents start from.
    #[arg(long)]
    entry: Option<String>,

    /// Ticks available to a lone agent.
    #[arg(long)]
    single_budget: Option<u32>,

    /// Ticks available to two cooperating agents.
    #[arg(long)]
    dual_budget: Option<u32>,

    /// Worker threads for the dual-agent search.
    #[arg(long)]
    workers: Option<usize>,

    /// Disable branch-and-bound pruning.
    #[arg(long)]
    no_pruning: bool,
}

impl Cli {
    fn planner_config(&self) -> Result<PlannerConfig> {
        let mut config = match &self.config {
            Some(path) => PlannerConfig::from_file(path).with_context(|| format!("loading configuration '{}'", path))?,
            None => PlannerConfig::default(),
        };

        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(entry) = &self.entry {
            config.entry = entry.clone();
        }
        if let Some(budget) = self.single_budget {
            config.single_agent_budget = budget;
        }
        if let Some(budget) = self.dual_budget {
            config.dual_agent_budget = budget;
        }
        if let Some(workers) = self.workers {
            config.worker_count = workers;
        }
        if self.no_pruning {
            config.pruning = false;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.planner_config()?;

    logger::init(&config.log_level, &config.log_dir);
    log::info!("Starting planner on '{}' with {} workers.", cli.input, config.worker_count);

    let format = cli.format.unwrap_or_else(|| InputFormat::from_path(&cli.input));
    let report = plan_from_file(&cli.input, format, &config).with_context(|| format!("planning '{}'", cli.input))?;

    if let Some(best) = report.single_agent {
        println!("{} {}", "single-agent:".bold(), best.to_string().green());
    }
    if let Some(best) = report.dual_agent {
        println!("{} {}", "dual-agent:".bold(), best.to_string().green());
    }
    Ok(())
}
