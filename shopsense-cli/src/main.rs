mod menu;

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::SubsecRound;
use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use log::{error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use shopsense_core::constants::{ANOMALY_TRIGGER_PROBABILITY, DEFAULT_HISTORY_DAYS};
use shopsense_core::{rebase, Clock, SystemClock, WalkerConfig};
use shopsense_schemas::storage::DEFAULT_DATA_PATH;
use shopsense_schemas::{DataFile, ExtenderConfig, SensorListExtender, ShopConfig, ShopGenerator, ShopStatistics};

#[derive(Parser)]
#[command(name = "shopsense", version, about = "Synthetic retail IoT sensor data")]
struct Cli {
    /// Dataset file to read and write
    #[arg(long, global = true, default_value = DEFAULT_DATA_PATH)]
    data: PathBuf,

    /// Seed for reproducible output
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add random sensors to the sensor list
    Extend {
        #[command(flatten)]
        history: HistoryArgs,

        /// Add this many sensors and save, skipping the menu
        #[arg(long)]
        add: Option<usize>,
    },
    /// Regenerate the full shop dataset
    Shop {
        #[command(flatten)]
        history: HistoryArgs,
    },
    /// Shift all timestamps so the newest one is now
    Rebase,
}

#[derive(Args)]
struct HistoryArgs {
    /// Days of history per sensor
    #[arg(long, default_value_t = DEFAULT_HISTORY_DAYS, value_parser = clap::value_parser!(i64).range(1..))]
    days: i64,

    /// Chance per step of a fault starting
    #[arg(long, default_value_t = ANOMALY_TRIGGER_PROBABILITY)]
    anomaly_probability: f64,
}

impl HistoryArgs {
    fn walker(&self) -> WalkerConfig {
        WalkerConfig { anomaly_probability: self.anomaly_probability, ..WalkerConfig::default() }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let file = DataFile::new(cli.data);

    match cli.command {
        Command::Extend { history, add } => run_extend(&file, &history, add, &mut rng)?,
        Command::Shop { history } => run_shop(&file, &history, &mut rng)?,
        Command::Rebase => run_rebase(&file)?,
    }

    Ok(())
}

fn run_extend(file: &DataFile, history: &HistoryArgs, add: Option<usize>, rng: &mut StdRng) -> Result<()> {
    let mut dataset = file.load().context("loading dataset")?;
    let extender = SensorListExtender::new(ExtenderConfig { history_days: history.days, walker: history.walker() });

    let save = match add {
        Some(count) => {
            extender.add_sensors(&mut dataset.sensors, count, SystemClock.now(), rng)?;
            true
        }
        None => {
            let stdin = io::stdin();
            let mut session = menu::Session::new(&extender, &SystemClock, stdin.lock(), io::stdout());
            session.run(&mut dataset.sensors, rng)?
        }
    };

    if save {
        file.save(&dataset).context("saving dataset")?;
        info!("data saved to {}", file.path().display());
    }
    Ok(())
}

fn run_shop(file: &DataFile, history: &HistoryArgs, rng: &mut StdRng) -> Result<()> {
    let config = ShopConfig { history_days: history.days, walker: history.walker(), ..ShopConfig::default() };
    let dataset = ShopGenerator::new(config, SystemClock).generate(rng).context("generating shop")?;

    file.save(&dataset).context("saving dataset")?;
    println!("{}", ShopStatistics::collect(&dataset));
    Ok(())
}

fn run_rebase(file: &DataFile) -> Result<()> {
    let mut dataset = file.load().context("loading dataset")?;
    let now = SystemClock.now().trunc_subsecs(0);

    let summary = match rebase(&mut dataset.sensors, now) {
        Ok(summary) => summary,
        Err(e) => {
            error!("rebasing failed, {} left untouched", file.path().display());
            return Err(e).context("rebasing timestamps");
        }
    };

    file.save(&dataset).context("saving dataset")?;
    println!(
        "Rebased {} entries of {} sensors: {} .. {}",
        summary.entries, summary.sensors, summary.start, summary.end
    );
    Ok(())
}
