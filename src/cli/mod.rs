//! Command-line interface for skeletonize
//!
//! Parses arguments with clap, wires up logging and settings, then runs the
//! discover -> reconcile -> save pipeline.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde_json::json;

use crate::config::SettingsLoader;
use crate::interceptor::find_configuration;
use crate::persist::save_config;
use crate::reconcile::{ReconcileReport, update_config};
use crate::schema::DiscoveredSchema;

mod output;

pub use output::Output;

/// Report format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "skeletonize",
    version = env!("CARGO_PKG_VERSION"),
    about = "localize settings from python config",
    long_about = "Discovers which INI sections and keys a settings module reads and \
                  writes them into a local settings file, keeping existing values."
)]
pub struct Cli {
    /// Settings module which parses the ini
    pub source_file: String,

    /// ini file to save to [default: ./local.settings.ini]
    #[arg(short = 'i', long = "ini_file", visible_alias = "ini-file", value_name = "FILE")]
    pub ini_file: Option<String>,

    /// Overwrite existing ini_file
    #[arg(short, long)]
    pub overwrite: bool,

    /// Remove old values in existing ini_file
    #[arg(short, long = "remove_missing", visible_alias = "remove-missing")]
    pub remove_missing: bool,

    /// Print the resulting ini instead of writing it
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Report format
    #[arg(long, value_enum, default_value = "text")]
    pub format: Format,

    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Use custom settings file instead of ./skeletonize.toml
    #[arg(long, value_name = "FILE", env = "SKELETONIZE_CONFIG")]
    pub config: Option<String>,
}

impl Cli {
    pub fn run(&self, output: &Output) -> Result<()> {
        setup_logging(self.verbose, self.quiet);
        tracing::debug!("arguments: {:?}", self);

        let settings = SettingsLoader::with_custom_config(self.config.as_deref()).load()?;
        let ini_file = self
            .ini_file
            .clone()
            .unwrap_or_else(|| settings.store.default_ini_file.clone());

        output.verbose_step("🔎", &format!("Intercepting config reads in {}", self.source_file));
        let schema = find_configuration(&self.source_file, &settings.interceptor)?;

        output.verbose_step("🔧", &format!("Reconciling with {}", ini_file));
        let (store, report) = update_config(&schema, &ini_file, self.remove_missing)
            .with_context(|| format!("Failed to read existing ini_file '{}'", ini_file))?;

        if self.dry_run {
            print!("{}", store.to_ini_string());
            return Ok(());
        }

        save_config(&store, &ini_file, self.overwrite)?;

        match self.format {
            Format::Json => {
                let body = json!({
                    "ini_file": ini_file,
                    "discovered": schema,
                    "report": report,
                });
                println!("{}", serde_json::to_string_pretty(&body)?);
            }
            Format::Text => {
                self.print_report(output, &schema, &report);
                output.success(&format!("Success: {}", ini_file));
            }
        }
        Ok(())
    }

    fn print_report(&self, output: &Output, schema: &DiscoveredSchema, report: &ReconcileReport) {
        output.count("🔎", "Keys discovered", schema.key_count());
        for (section, keys) in schema.sections() {
            output.verbose_breakdown(section, keys.len());
        }

        if report.is_unchanged() {
            output.info("Nothing to add or remove");
        }
        for section in &report.added_sections {
            output.change(true, section, None);
        }
        for (section, key) in &report.added_keys {
            if !report.added_sections.contains(section) || output.is_verbose() {
                output.change(true, section, Some(key));
            }
        }
        for section in &report.removed_sections {
            output.change(false, section, None);
        }
        for (section, key) in &report.removed_keys {
            output.change(false, section, Some(key));
        }

        if !self.remove_missing {
            for section in &report.stale_sections {
                output.warning(&format!(
                    "Section [{}] is no longer read; use --remove_missing to prune it",
                    section
                ));
            }
        }
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info"),
            2 => tracing_subscriber::EnvFilter::new("debug"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    // Logs go to stderr so --dry-run and --format json stay parseable
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
