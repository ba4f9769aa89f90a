use anyhow::bail;
use clap::{Args, Parser, Subcommand};
use log::{error, info};
use mina_vote_counter::{
    base::time_window::{parse_utc_date, TimeWindow},
    cli::{
        config::{ConfigOverrides, VoteCounterConfig},
        LogLevelFilter,
    },
    client::GraphQLClient,
    constants::*,
    observer::LogObserver,
    pipeline::{count_from_store, count_live, fetch_and_store, CountOptions},
    stake::StakeCounter,
    store::{
        version::{SnapshotStoreVersion, VersionStore},
        SnapshotStore,
    },
    tally::Tally,
};
use std::{path::PathBuf, process};
use stderrlog::{ColorChoice, Timestamp};

#[derive(Parser, Debug)]
#[command(name = "mina-vote-counter", author, version = VERSION, about, long_about = Some("Mina Vote Counter\n\n\
Count on-chain governance votes cast as burn-address payments on Mina"))]
struct Cli {
    #[command(subcommand)]
    command: VoteCounterCommand,

    #[command(flatten)]
    global: GlobalArgs,
}

#[derive(Args, Debug, Clone)]
struct GlobalArgs {
    /// Path to a JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// GraphQL endpoint of a Mina node
    #[arg(long, global = true)]
    graphql_endpoint: Option<String>,

    /// Address vote payments are sent to
    #[arg(long, global = true)]
    burn_address: Option<String>,

    /// Path to directory for speedb
    #[arg(long, global = true)]
    database_dir: Option<PathBuf>,

    /// Max stderr log level
    #[arg(long, global = true, default_value_t = LogLevelFilter::default())]
    log_level: LogLevelFilter,
}

#[derive(Subcommand, Debug)]
enum VoteCounterCommand {
    /// Fetch the best chain once & store the snapshot
    Fetch {
        /// Max number of best chain blocks to fetch
        #[arg(long)]
        max_length: Option<u32>,
    },

    /// Count votes cast within [START, END]
    Count(CountArgs),

    /// Weight an existing vote count by voter stake
    Stake {
        /// Vote count file (JSON)
        #[arg(long, default_value = DEFAULT_VOTE_COUNT_FILE)]
        input: PathBuf,

        /// Stake count output file (JSON)
        #[arg(long, default_value = DEFAULT_STAKE_COUNT_FILE)]
        output: PathBuf,

        /// Number of concurrent balance lookups
        #[arg(long)]
        balance_workers: Option<usize>,
    },

    /// Database version
    DbVersion,
}

#[derive(Args, Debug)]
struct CountArgs {
    /// Window start, e.g. 2024-06-01T00:00:00 (UTC)
    start: String,

    /// Window end, e.g. 2024-06-30T23:59:59 (UTC)
    end: String,

    /// Fetch the best chain once & count it without touching the store
    #[arg(long, default_value_t = false)]
    live: bool,

    /// Number of most recent canonical blocks to ignore
    #[arg(long)]
    reorg_margin: Option<u32>,

    /// Max number of best chain blocks to fetch with --live
    #[arg(long)]
    max_length: Option<u32>,

    /// Vote count output file (JSON)
    #[arg(long, default_value = DEFAULT_VOTE_COUNT_FILE)]
    output: PathBuf,
}

impl GlobalArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            graphql_endpoint: self.graphql_endpoint.clone(),
            burn_address: self.burn_address.clone(),
            database_dir: self.database_dir.clone(),
            ..Default::default()
        }
    }
}

fn main() {
    let args = Cli::parse();

    let log_level = &args.global.log_level;
    if let Err(e) = stderrlog::new()
        .module(module_path!())
        .quiet(log_level.0 == log::LevelFilter::Off)
        .color(ColorChoice::Never)
        .timestamp(Timestamp::Microsecond)
        .verbosity(log_level.verbosity())
        .init()
    {
        eprintln!("Failed to initialize logging: {e}");
    }

    if let Err(e) = run(args) {
        error!("{e:#}");
        process::exit(1);
    }
}

fn run(args: Cli) -> anyhow::Result<()> {
    let mut overrides = args.global.overrides();

    match args.command {
        VoteCounterCommand::DbVersion => {
            let version = SnapshotStoreVersion::default();
            println!("{}", serde_json::to_string(&version)?);
        }
        VoteCounterCommand::Fetch { max_length } => {
            overrides.max_length = max_length;
            let config = VoteCounterConfig::resolve(args.global.config.as_deref(), overrides)?;

            let client = GraphQLClient::new(&config.graphql_endpoint)?;
            let store = SnapshotStore::new(&config.database_dir)?;
            let snapshot = fetch_and_store(&client, &store, config.max_length)?;

            info!(
                "Stored snapshot of {} blocks (store version {})",
                snapshot.blocks.len(),
                store.get_db_version()?
            );
        }
        VoteCounterCommand::Count(count) => {
            overrides.reorg_margin = count.reorg_margin;
            overrides.max_length = count.max_length;
            let config = VoteCounterConfig::resolve(args.global.config.as_deref(), overrides)?;

            let (start, end) = (parse_utc_date(&count.start)?, parse_utc_date(&count.end)?);
            if start > end {
                bail!("Window start {start} is after its end {end}")
            }
            let window = TimeWindow::new(start, end);
            let options = CountOptions {
                window,
                reorg_margin: config.reorg_margin,
                burn_address: config.burn_address.clone(),
            };

            let tally = if count.live {
                let client = GraphQLClient::new(&config.graphql_endpoint)?;
                count_live(&client, config.max_length, &options, &LogObserver)?
            } else {
                let store = SnapshotStore::new(&config.database_dir)?;
                count_from_store(&store, &config.graphql_endpoint, &options, &LogObserver)?
            };
            tally.write_json(&count.output)?;
        }
        VoteCounterCommand::Stake {
            input,
            output,
            balance_workers,
        } => {
            overrides.balance_workers = balance_workers;
            let config = VoteCounterConfig::resolve(args.global.config.as_deref(), overrides)?;

            let tally = Tally::read_json(&input)?;
            let client = GraphQLClient::new(&config.graphql_endpoint)?;
            let report = StakeCounter::new(config.balance_workers).count_stakes(&tally, &client)?;
            report.write_json(&output)?;
        }
    }
    Ok(())
}
