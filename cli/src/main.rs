//! iou-redeem: replay redemption scenarios and compute vesting quotes.

use clap::Parser;
use std::io::Write;
use std::path::PathBuf;

use iou_cli::{quote, Simulation, SimulationConfig};
use iou_types::TokenAmount;
use iou_utils::LogFormat;

#[derive(Parser)]
#[command(name = "iou-redeem", about = "IOU token redemption ledger tools")]
struct Cli {
    /// Log level: "trace", "debug", "info", "warn", "error".
    /// Defaults to the config file's value, or "info".
    #[arg(long, global = true, env = "IOU_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, global = true, env = "IOU_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Replay a scripted scenario against an in-memory ledger, printing one
    /// JSON report per step.
    Simulate {
        /// Path to the scenario TOML file.
        #[arg(long)]
        config: PathBuf,

        /// Override the ledger's vesting window.
        #[arg(long, env = "IOU_BLOCKS_TO_RELEASE")]
        blocks_to_release: Option<u64>,

        /// Stop at the first failing step.
        #[arg(long)]
        fail_fast: bool,
    },
    /// Show how much of a deposit has vested after some number of blocks.
    Vesting {
        /// Deposited amount, as a decimal string.
        #[arg(long)]
        amount: TokenAmount,

        /// Vesting window in blocks.
        #[arg(long)]
        window: u64,

        /// Blocks elapsed since the deposit.
        #[arg(long)]
        elapsed: u64,

        /// Amount already redeemed.
        #[arg(long, default_value = "0")]
        redeemed: TokenAmount,

        /// Average block time used for the wall-clock estimate.
        #[arg(long, default_value_t = 13)]
        block_time_secs: u64,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Simulate {
            config,
            blocks_to_release,
            fail_fast,
        } => {
            let mut sim_config = SimulationConfig::from_toml_file(&config)?;
            if let Some(window) = blocks_to_release {
                sim_config.ledger.blocks_to_release = window;
                sim_config.ledger.schedule()?;
            }

            let level = cli.log_level.unwrap_or_else(|| sim_config.log_level.clone());
            iou_utils::init_logging(cli.log_format.unwrap_or(sim_config.log_format), &level);
            tracing::info!(
                "Loaded scenario from {} ({} steps)",
                config.display(),
                sim_config.steps.len()
            );

            let simulation = Simulation::new(&sim_config)?;
            let reports = simulation.run(&sim_config.steps, fail_fast);

            let mut out = std::io::stdout().lock();
            for report in &reports {
                serde_json::to_writer(&mut out, report)?;
                writeln!(out)?;
            }

            let failed = reports.iter().filter(|r| !r.ok).count();
            tracing::info!(
                steps = reports.len(),
                failed,
                depositors = simulation.ledger().depositor_count(),
                reserve = %simulation.ledger().reserve()?,
                "scenario finished"
            );
            if failed > 0 && fail_fast {
                anyhow::bail!("scenario stopped after a failed step");
            }
        }
        Command::Vesting {
            amount,
            window,
            elapsed,
            redeemed,
            block_time_secs,
        } => {
            iou_utils::init_logging(
                cli.log_format.unwrap_or_default(),
                cli.log_level.as_deref().unwrap_or("warn"),
            );
            let q = quote(amount, window, elapsed, redeemed, block_time_secs)?;
            println!("{}", serde_json::to_string_pretty(&q)?);
        }
    }

    Ok(())
}
