use anyhow::Result;
use std::fmt::Write as _;

use crate::catalog::CatalogEntry;
use crate::cli::commands::OutputFormatArg;
use crate::pipeline::{CheckReport, ProcessOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_outcome(&self, outcome: &ProcessOutcome) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(outcome)?),
            OutputFormat::Human => Ok(Self::render_outcome(outcome)),
        }
    }

    pub fn format_check(&self, report: &CheckReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            OutputFormat::Human => Ok(Self::render_check(report)),
        }
    }

    pub fn format_scan(&self, entries: &[CatalogEntry]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(entries)?),
            OutputFormat::Human => {
                if entries.is_empty() {
                    return Ok("No unprocessed set entries found".to_string());
                }
                let mut out = String::new();
                let _ = writeln!(out, "Unprocessed set entries ({}):", entries.len());
                for entry in entries {
                    let price = entry
                        .price
                        .map(|p| format!("{p}"))
                        .unwrap_or_else(|| "-".to_string());
                    let _ = writeln!(out, "  {}  {}  (price: {})", entry.id, entry.title, price);
                }
                Ok(out.trim_end().to_string())
            }
        }
    }

    fn render_outcome(outcome: &ProcessOutcome) -> String {
        match outcome {
            ProcessOutcome::Skipped(reason) => format!("Skipped: {reason}"),
            ProcessOutcome::Completed(report) => {
                let mut out = String::new();
                let _ = writeln!(
                    out,
                    "Processed '{}' ({})",
                    report.original_entry.title, report.original_entry.id
                );
                let _ = writeln!(out, "  Pieces: {}", report.piece_count);
                for (component, price) in
                    report.component_entries.iter().zip(&report.price_split)
                {
                    let _ = writeln!(out, "  - {} [{}]  {}", component.title, component.id, price);
                }
                let _ = writeln!(
                    out,
                    "  Bundle price: {} (compare at {})",
                    report.bundle_config.aggregate_price, report.bundle_config.compare_at_price
                );
                let _ = writeln!(
                    out,
                    "  Linked sizes: {}",
                    report
                        .bundle_config
                        .sync
                        .sizes
                        .keys()
                        .cloned()
                        .collect::<Vec<_>>()
                        .join(", ")
                );
                out.trim_end().to_string()
            }
        }
    }

    fn render_check(report: &CheckReport) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Entry '{}' ({})", report.title, report.entry_id);
        let _ = writeln!(out, "  Set:               {}", yes_no(report.is_set));
        let _ = writeln!(
            out,
            "  Already processed: {}",
            yes_no(report.already_processed)
        );
        let _ = writeln!(out, "  Pipeline owned:    {}", yes_no(report.pipeline_owned));
        let _ = writeln!(out, "  Pieces:            {}", report.piece_count);
        if !report.component_names.is_empty() {
            let _ = writeln!(
                out,
                "  Components:        {}",
                report.component_names.join(", ")
            );
        }
        if !report.price_split.is_empty() {
            let split = report
                .price_split
                .iter()
                .map(|p| p.to_string())
                .collect::<Vec<_>>()
                .join(" + ");
            let _ = writeln!(out, "  Price split:       {split}");
        }
        let _ = writeln!(
            out,
            "  Tagging:           {} ({})",
            if report.tag_preview.should_tag {
                "would tag"
            } else {
                "refused"
            },
            report.tag_preview.reason
        );
        out.trim_end().to_string()
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::SkipReason;

    #[test]
    fn test_skip_renders_reason() {
        let formatter = OutputFormatter::new(OutputFormat::Human);
        let text = formatter
            .format_outcome(&ProcessOutcome::Skipped(SkipReason::NotASet))
            .unwrap();
        assert!(text.contains("Skipped"));
        assert!(text.contains("not a set"));
    }

    #[test]
    fn test_json_outcome_is_tagged() {
        let formatter = OutputFormatter::new(OutputFormat::Json);
        let text = formatter
            .format_outcome(&ProcessOutcome::Skipped(SkipReason::AlreadyProcessed))
            .unwrap();
        assert!(text.contains("\"outcome\""));
        assert!(text.contains("skipped"));
    }

    #[test]
    fn test_scan_empty() {
        let formatter = OutputFormatter::new(OutputFormat::Human);
        let text = formatter.format_scan(&[]).unwrap();
        assert!(text.contains("No unprocessed"));
    }
}
