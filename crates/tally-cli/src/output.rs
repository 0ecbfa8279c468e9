//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use tally_llm::ModelInfo;
use tally_pipeline::{BatchRun, BatchSummary, FileOutcome};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format the result of a batch run.
    ///
    /// Table and quiet output always end with the final status line.
    pub fn format_run(&self, run: &BatchRun) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(run)?),
            OutputFormat::Table => Ok(self.format_run_table(run)),
            OutputFormat::Quiet => Ok(self.format_run_quiet(run)),
        }
    }

    fn format_run_table(&self, run: &BatchRun) -> String {
        match run {
            BatchRun::InputAbsent { reason } => self.warning(&format!("Nothing to do: {}", reason)),
            BatchRun::Completed(summary) => {
                let mut builder = Builder::default();
                builder.push_record(["File", "State", "Records", "Detail"]);

                for report in &summary.files {
                    let (records, detail) = match &report.outcome {
                        FileOutcome::Stored { records } => (records.to_string(), String::new()),
                        FileOutcome::Skipped { reason } => ("-".to_string(), reason.to_string()),
                        FileOutcome::Failed { error } => ("-".to_string(), error.clone()),
                    };
                    builder.push_record([
                        report.file.clone(),
                        self.state_label(&report.outcome),
                        records,
                        detail,
                    ]);
                }

                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));

                format!("{}\n{}", table, self.status_line(summary))
            }
        }
    }

    fn format_run_quiet(&self, run: &BatchRun) -> String {
        match run {
            BatchRun::InputAbsent { reason } => format!("Nothing to do: {}", reason),
            BatchRun::Completed(summary) => summary.status_line(),
        }
    }

    /// Format the list of available models.
    pub fn format_models(&self, models: &[ModelInfo]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(models)?),
            OutputFormat::Table => Ok(self.format_models_table(models)),
            OutputFormat::Quiet => Ok(models
                .iter()
                .map(|m| short_model_name(&m.name))
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    fn format_models_table(&self, models: &[ModelInfo]) -> String {
        if models.is_empty() {
            return self.warning(
                "No generateContent models found. Check that the Generative Language API is enabled for this key.",
            );
        }

        let mut builder = Builder::default();
        builder.push_record(["Model", "Display Name"]);
        for model in models {
            builder.push_record([
                short_model_name(&model.name).to_string(),
                model.display_name.clone().unwrap_or_default(),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        format!(
            "{}\n{}",
            table,
            self.success(&format!("{} model(s) support generateContent", models.len()))
        )
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn status_line(&self, summary: &BatchSummary) -> String {
        let line = summary.status_line();
        if summary.failed() > 0 {
            self.error(&line)
        } else if summary.skipped() > 0 {
            self.warning(&line)
        } else {
            self.success(&line)
        }
    }

    fn state_label(&self, outcome: &FileOutcome) -> String {
        let color = match outcome {
            FileOutcome::Stored { .. } => "green",
            FileOutcome::Skipped { .. } => "yellow",
            FileOutcome::Failed { .. } => "red",
        };
        self.colorize(outcome.label(), color)
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Strip the "models/" resource prefix.
pub fn short_model_name(name: &str) -> &str {
    name.strip_prefix("models/").unwrap_or(name)
}
