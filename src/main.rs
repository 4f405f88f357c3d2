use obs_buildlog::cli::commands::{CliArgs, Commands};
use obs_buildlog::cli::handlers::{handle_config, handle_parse};
use obs_buildlog::util::logging::{init_logging, parse_level, LoggingConfig};
use obs_buildlog::{BuildLogConfig, NAME, VERSION};

use clap::Parser;
use std::process;
use tracing::{debug, error, Level};

fn main() {
    let args = CliArgs::parse();

    let config = match BuildLogConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_logging_from_args(&args, &BuildLogConfig::default());
            error!("Configuration error: {}", e);
            eprintln!("\nPlease check your OBS_BUILDLOG_* environment variables.");
            process::exit(1);
        }
    };
    init_logging_from_args(&args, &config);

    debug!("{} v{} starting", NAME, VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Parse(parse_args) => handle_parse(parse_args, &config, args.quiet),
        Commands::Config(config_args) => handle_config(config_args, &config),
    };

    process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs, config: &BuildLogConfig) {
    let level = if let Some(level_str) = &args.log_level {
        parse_level(level_str)
    } else if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::ERROR
    } else {
        parse_level(&config.log_level)
    };

    init_logging(LoggingConfig {
        level,
        use_json: config.log_json,
        ..Default::default()
    });
}
