//! Command line argument parsing using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// statute-classifier - map incident descriptions to statute sections
#[derive(Parser, Debug, Clone)]
#[command(name = "statute-classifier")]
#[command(about = "Predict the applicable statute section for an incident description")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct StatuteArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Engine configuration file (JSON)
    #[arg(long, value_name = "CONFIG_FILE", env = "STATUTE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the persisted model
    #[arg(long, value_name = "DIR", env = "STATUTE_MODEL_DIR", global = true)]
    pub model_dir: Option<PathBuf>,

    /// Disable linguistic normalization (lowercase only)
    #[arg(long, global = true)]
    pub no_linguistic: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl StatuteArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Predict the section for an incident description
    Predict(PredictArgs),

    /// Retrain the model from the built-in corpus
    Retrain,

    /// List the sections the model can predict
    Sections(SectionsArgs),

    /// Report model and normalizer status
    Health,
}

/// Arguments for prediction
#[derive(Parser, Debug, Clone)]
pub struct PredictArgs {
    /// Incident description
    #[arg(value_name = "TEXT")]
    pub text: String,
}

/// Arguments for listing sections
#[derive(Parser, Debug, Clone)]
pub struct SectionsArgs {
    /// Include the number of training examples per section
    #[arg(short, long)]
    pub counts: bool,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_predict_command() {
        let args = StatuteArgs::try_parse_from([
            "statute-classifier",
            "predict",
            "Someone stole my phone",
            "--format",
            "json",
            "--pretty",
        ])
        .unwrap();

        if let Command::Predict(predict_args) = &args.command {
            assert_eq!(predict_args.text, "Someone stole my phone");
        } else {
            panic!("Expected Predict command");
        }
        assert_eq!(args.output_format, OutputFormat::Json);
        assert!(args.pretty);
    }

    #[test]
    fn test_global_options() {
        let args = StatuteArgs::try_parse_from([
            "statute-classifier",
            "--model-dir",
            "/var/lib/models",
            "--no-linguistic",
            "sections",
            "--counts",
        ])
        .unwrap();

        assert_eq!(args.model_dir, Some(PathBuf::from("/var/lib/models")));
        assert!(args.no_linguistic);
        assert!(matches!(
            args.command,
            Command::Sections(SectionsArgs { counts: true })
        ));
    }

    #[test]
    fn test_verbosity() {
        let args = StatuteArgs::try_parse_from(["statute-classifier", "health"]).unwrap();
        assert_eq!(args.verbosity(), 1);

        let args = StatuteArgs::try_parse_from(["statute-classifier", "-vv", "health"]).unwrap();
        assert_eq!(args.verbosity(), 2);

        let args =
            StatuteArgs::try_parse_from(["statute-classifier", "-vvv", "-q", "retrain"]).unwrap();
        assert_eq!(args.verbosity(), 0);
    }

    #[test]
    fn test_predict_requires_text() {
        assert!(StatuteArgs::try_parse_from(["statute-classifier", "predict"]).is_err());
    }
}
