//! Treehash CLI Binary
//!
//! Prints the Merkle digest tree of a directory. Ctrl-C cancels the build.

use clap::Parser;
use std::process;
use treehash::cli::{map_error, Cli, RunContext};
use treehash::concurrency::CancelToken;
use treehash::config::{ConfigLoader, TreehashConfig};
use treehash::error::{ApiError, BuildError};
use treehash::logging::{init_logging, LoggingConfig};
use tracing::{error, info, warn};

const EXIT_FAILURE: i32 = 1;
const EXIT_INTERRUPTED: i32 = 130;

fn main() {
    let cli = Cli::parse();

    let config = match ConfigLoader::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", map_error(&e));
            process::exit(EXIT_FAILURE);
        }
    };

    let logging_config = build_logging_config(&cli, &config);
    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(EXIT_FAILURE);
    }

    info!("Treehash CLI starting");

    let context = match RunContext::new(&cli, config) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(EXIT_FAILURE);
        }
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start runtime: {}", e);
            process::exit(EXIT_FAILURE);
        }
    };

    match runtime.block_on(run(context)) {
        Ok(output) => {
            info!("Command completed successfully");
            println!("{}", output);
        }
        Err(ApiError::Build(BuildError::Cancelled)) => {
            warn!("Interrupted");
            process::exit(EXIT_INTERRUPTED);
        }
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(EXIT_FAILURE);
        }
    }
}

/// Run the build on a blocking thread; an interrupt cancels it and waits for
/// every stage to exit.
async fn run(context: RunContext) -> Result<String, ApiError> {
    let cancel = CancelToken::new();
    let build_cancel = cancel.clone();
    let mut build = tokio::task::spawn_blocking(move || context.execute(&build_cancel));

    let joined = tokio::select! {
        joined = &mut build => joined,
        Ok(()) = tokio::signal::ctrl_c() => {
            warn!("Interrupt received, cancelling build");
            cancel.cancel();
            build.await
        }
    };
    joined.map_err(|e| ApiError::Runtime(format!("build task failed: {}", e)))?
}

/// Build logging configuration from the config file and CLI flags.
/// Precedence: CLI flags override config file override defaults.
fn build_logging_config(cli: &Cli, config: &TreehashConfig) -> LoggingConfig {
    let mut logging = config.logging.clone();

    if cli.quiet {
        logging.level = "off".to_string();
    }
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        logging.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        logging.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        logging.output = output.clone();
    }
    if let Some(ref file) = cli.log_file {
        logging.file = Some(file.clone());
    }

    logging
}
