//! Command handlers
//!
//! Each handler returns the process exit code; failures are logged rather
//! than propagated.

use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use tracing::{debug, error, info};

use super::commands::{ConfigArgs, ParseArgs};
use super::output::{OutputFormat, OutputFormatter};
use crate::buildlog::{BuildLog, LogQuery};
use crate::config::BuildLogConfig;

/// Reads the whole log from `path`, or stdin when absent.
///
/// Invalid UTF-8 is replaced rather than rejected; build output routinely
/// contains stray bytes.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    let bytes = match path {
        Some(path) => {
            fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?
        }
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read build log from stdin")?;
            buf
        }
    };
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Builds the query for `args`, starting from the configured defaults
pub fn build_query(args: &ParseArgs, config: &BuildLogConfig) -> LogQuery {
    let mut query = config.base_query().with_offset(args.offset);
    if let Some(lines) = args.lines {
        query = query.with_max_lines(lines);
    }
    if args.succeeded {
        query = query.with_show_succeeded(true);
    }
    if let Some(pattern) = &args.include {
        query = query.with_include(pattern.clone());
    }
    if let Some(pattern) = &args.exclude {
        query = query.with_exclude(pattern.clone());
    }
    query
}

/// Parses, queries and renders a log; returns the rendered output
pub fn run_parse(raw: String, args: &ParseArgs, config: &BuildLogConfig) -> Result<String> {
    let log = BuildLog::parse(raw);
    let query = build_query(args, config);
    debug!(?query, "Running query");

    let result = log.query(&query)?;

    let format: OutputFormat = args.format.into();
    OutputFormatter::new(format).format(&result)
}

pub fn handle_parse(args: &ParseArgs, config: &BuildLogConfig, quiet: bool) -> i32 {
    let raw = match read_input(args.file.as_deref()) {
        Ok(raw) => raw,
        Err(e) => {
            error!("{:#}", e);
            return 1;
        }
    };

    let output = match run_parse(raw, args, config) {
        Ok(out) => out,
        Err(e) => {
            error!("Failed to parse build log: {:#}", e);
            return 1;
        }
    };

    if let Some(output_file) = &args.output {
        match fs::write(output_file, &output) {
            Ok(_) => {
                info!("Output written to: {}", output_file.display());
                if !quiet {
                    println!("Output written to: {}", output_file.display());
                }
            }
            Err(e) => {
                error!("Failed to write output to file: {}", e);
                return 1;
            }
        }
    } else {
        println!("{}", output);
    }

    0
}

pub fn handle_config(args: &ConfigArgs, config: &BuildLogConfig) -> i32 {
    match OutputFormatter::new(args.format.into()).format_config(config) {
        Ok(output) => {
            println!("{}", output);
            0
        }
        Err(e) => {
            error!("Failed to format configuration: {:#}", e);
            1
        }
    }
}
