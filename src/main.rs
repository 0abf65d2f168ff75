use std::{error::Error, path::PathBuf, process};

use clap::{Parser, ValueHint};
use log::{LevelFilter, error};

use ostinato::runtime;

/// Group name for mutually exclusive logging options.
const ARGS_GROUP_LOGGING: &str = "logging";

/// Command line arguments as parsed by `clap`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file
    ///
    /// [default: $OSTINATO_CONFIG_PATH, then $XDG_CONFIG_HOME/ostinato/config.toml]
    #[arg(short, long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Maximum number of songs in the queue
    ///
    /// Overrides `queue.max_length` from the configuration.
    #[arg(long, value_name = "N")]
    max_length: Option<usize>,

    /// Suppresses all output except warnings and errors.
    #[arg(short, long, default_value_t = false, group = ARGS_GROUP_LOGGING)]
    quiet: bool,

    /// Enable verbose logging
    ///
    /// Specify twice for trace logging.
    #[arg(short, long, action = clap::ArgAction::Count, group = ARGS_GROUP_LOGGING)]
    verbose: u8,
}

/// Initializes the logger facade.
///
/// The logging level is determined as follows, in order of precedence from
/// highest to lowest:
/// 1. `log.level` from the configuration
/// 2. Command line arguments
/// 3. `RUST_LOG` environment variable
/// 4. Hard coded default
fn init_logger(args: &Args, configured: Option<&str>) {
    let mut logger = env_logger::Builder::from_env(
        // Keep in sync with the verbosity levels below.
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info"),
    );

    if let Some(filters) = configured {
        logger.parse_filters(filters);
    } else if args.quiet || args.verbose > 0 {
        let level = match args.verbose {
            // `quiet` and `verbose` are mutually exclusive.
            0 => LevelFilter::Warn,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };

        // Filter log messages of external crates.
        logger.filter_module(module_path!(), level);
    }

    logger.init();
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let loaded = runtime::try_load_settings(args.config.as_deref());
    init_logger(
        args,
        loaded.as_ref().ok().and_then(|s| s.log.level.as_deref()),
    );

    let mut settings = runtime::settings_or_defaults(loaded);
    if let Some(max_length) = args.max_length {
        settings.queue.max_length = max_length;
        settings.validate()?;
    }

    runtime::run(&settings)
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(&args) {
        error!("{e}");
        process::exit(1);
    }
}
