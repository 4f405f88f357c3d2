use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Phase segmentation and bounded queries over OBS build logs
#[derive(Parser, Debug)]
#[command(
    name = "obs-buildlog",
    about = "Phase segmentation and bounded queries over OBS build logs",
    version,
    long_about = "obs-buildlog splits the output of an `osc build` run or a remote OBS \
                  build log into build phases, reports their duration and success, and \
                  prints the lines of failed phases."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Parse a build log and display a summary",
        long_about = "Parses a build log from a file or stdin and displays a summary of the \
                      build phases. Lines are shown for failed phases only unless \
                      --succeeded is given.\n\n\
                      Examples:\n  \
                      obs-buildlog parse _log\n  \
                      osc build 2>&1 | obs-buildlog parse --format json\n  \
                      obs-buildlog parse _log --succeeded --match 'error' --lines 50"
    )]
    Parse(ParseArgs),

    #[command(
        about = "Show the effective configuration",
        long_about = "Prints the defaults loaded from OBS_BUILDLOG_* environment variables."
    )]
    Config(ConfigArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct ConfigArgs {
    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct ParseArgs {
    #[arg(value_name = "FILE", help = "Build log to read (defaults to stdin)")]
    pub file: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[arg(
        short = 'l',
        long,
        value_name = "N",
        allow_negative_numbers = true,
        help = "Number of log lines to print (defaults to OBS_BUILDLOG_MAX_LINES)"
    )]
    pub lines: Option<i64>,

    #[arg(
        long,
        value_name = "N",
        default_value = "0",
        allow_negative_numbers = true,
        help = "Skip this many selected lines"
    )]
    pub offset: i64,

    #[arg(short = 's', long, help = "Also print the lines of succeeded phases")]
    pub succeeded: bool,

    #[arg(
        short = 'm',
        long = "match",
        value_name = "REGEX",
        help = "Only print lines matching this pattern"
    )]
    pub include: Option<String>,

    #[arg(
        short = 'x',
        long,
        value_name = "REGEX",
        help = "Drop lines matching this pattern"
    )]
    pub exclude: Option<String>,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Write output to file instead of stdout"
    )]
    pub output: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}
