//! Output formatting for query results
//!
//! JSON and YAML serialize the [`QueryResult`] as-is. The human format
//! prints the build identity, a phase table, and the selected lines.

use anyhow::{Context, Result};

use crate::buildlog::QueryResult;
use crate::config::BuildLogConfig;

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format
    Yaml,
    /// Human-readable table
    Human,
}

/// Output formatter for query results
pub struct OutputFormatter {
    format: OutputFormat,
}

fn or_unknown(value: &str) -> &str {
    if value.is_empty() {
        "?"
    } else {
        value
    }
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self, result: &QueryResult) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(result)
                .context("Failed to serialize build log to JSON"),
            OutputFormat::Yaml => {
                serde_yaml::to_string(result).context("Failed to serialize build log to YAML")
            }
            OutputFormat::Human => Ok(self.format_human(result)),
        }
    }

    pub fn format_config(&self, config: &BuildLogConfig) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&config.to_display_map())
                .context("Failed to serialize config to JSON"),
            OutputFormat::Yaml => serde_yaml::to_string(&config.to_display_map())
                .context("Failed to serialize config to YAML"),
            OutputFormat::Human => Ok(config.to_string()),
        }
    }

    fn format_human(&self, result: &QueryResult) -> String {
        let props = &result.properties;
        let mut output = format!(
            "Parsed build log for {}/{} on {}/{}\n\n",
            or_unknown(&props.project),
            or_unknown(&props.name),
            or_unknown(&props.distro),
            or_unknown(&props.arch)
        );

        let phase_width = result
            .phases
            .iter()
            .map(|p| p.phase.name().len())
            .max()
            .unwrap_or(0)
            .max("Phase".len());

        output.push_str(&format!(
            "{:<phase_width$}  {:>12}  {:>6}  {}\n",
            "Phase", "Duration (s)", "Lines", "Result"
        ));
        output.push_str(&format!("{}\n", "\u{2500}".repeat(phase_width + 32)));

        for view in &result.phases {
            let lines = view
                .lines
                .as_ref()
                .map(|l| l.len().to_string())
                .unwrap_or_else(|| "-".to_string());
            let status = if view.success { "\u{2713} ok" } else { "\u{2717} failed" };
            output.push_str(&format!(
                "{:<phase_width$}  {:>12}  {:>6}  {}\n",
                view.phase.name(),
                view.duration_seconds,
                lines,
                status
            ));
        }

        let succeeded = result.phases.iter().all(|p| p.success);
        output.push_str(&format!(
            "\nBuild {}\n",
            if succeeded { "succeeded" } else { "failed" }
        ));

        for view in &result.phases {
            let Some(lines) = view.lines.as_ref().filter(|l| !l.is_empty()) else {
                continue;
            };
            output.push_str(&format!("\n--- {} ---\n", view.phase));
            for line in lines {
                output.push_str(line);
                output.push('\n');
            }
        }

        if result.truncated {
            output.push_str(&format!(
                "\n(showing {} of {} lines from offset {}; use --offset {} for more)\n",
                result.returned_lines,
                result.total_lines,
                result.offset,
                result.offset + result.returned_lines
            ));
        }

        output
    }
}
