//! Command implementations for the statute classifier CLI.

use log::{debug, warn};

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::EngineConfig;
use crate::error::{Result, StatuteError};
use crate::ml::section_classifier::SectionEngine;

/// Minimum number of characters a description must have after trimming.
pub const MIN_TEXT_CHARS: usize = 5;

/// Execute a CLI command.
pub fn execute_command(args: StatuteArgs) -> Result<()> {
    match &args.command {
        Command::Predict(predict_args) => predict(predict_args.clone(), &args),
        Command::Retrain => retrain(&args),
        Command::Sections(sections_args) => list_sections(sections_args.clone(), &args),
        Command::Health => health(&args),
    }
}

/// Build the engine configuration from the config file and global flags.
pub fn engine_config(args: &StatuteArgs) -> Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => {
            debug!("Loading configuration from {}", path.display());
            EngineConfig::from_file(path)?
        }
        None => EngineConfig::default(),
    };

    if let Some(model_dir) = &args.model_dir {
        config = config.with_model_dir(model_dir);
    }
    if args.no_linguistic {
        config.linguistic_analysis = false;
    }

    config.validate()?;
    Ok(config)
}

/// Check a description and return it trimmed.
pub fn validate_text(text: &str) -> Result<&str> {
    let text = text.trim();
    if text.is_empty() {
        return Err(StatuteError::input("Missing text"));
    }
    if text.chars().count() < MIN_TEXT_CHARS {
        return Err(StatuteError::input(
            "Text too short. Please provide more details.",
        ));
    }
    Ok(text)
}

/// Round a confidence to two decimals for display.
fn round_confidence(confidence: f64) -> f64 {
    (confidence * 100.0).round() / 100.0
}

/// Predict the section for a description.
fn predict(args: PredictArgs, cli_args: &StatuteArgs) -> Result<()> {
    let text = validate_text(&args.text)?;

    let engine = SectionEngine::from_config(&engine_config(cli_args)?)?;
    if let Err(e) = engine.start() {
        // Keyword rules still answer without a model
        warn!("Model unavailable, using keyword rules only: {e}");
    }

    let result = engine.predict(text)?;
    output_result(
        "Prediction",
        &PredictionOutput {
            section: result.section.map(|section| section.to_string()),
            confidence: round_confidence(result.confidence),
            method: result.method.to_string(),
            message: result.message,
            original_text: text.to_string(),
        },
        cli_args,
    )
}

/// Retrain the model from the corpus and persist it.
fn retrain(cli_args: &StatuteArgs) -> Result<()> {
    let engine = SectionEngine::from_config(&engine_config(cli_args)?)?;
    let summary = engine.retrain()?;

    output_result(
        "Retrain",
        &RetrainOutput {
            message: "Model retrained successfully".to_string(),
            samples: summary.trained_count,
        },
        cli_args,
    )
}

/// List the sections the model can predict.
fn list_sections(args: SectionsArgs, cli_args: &StatuteArgs) -> Result<()> {
    let engine = SectionEngine::from_config(&engine_config(cli_args)?)?;
    let sections: Vec<String> = engine
        .list_sections()
        .into_iter()
        .map(|section| section.to_string())
        .collect();

    let counts = args.counts.then(|| {
        engine
            .section_counts()
            .into_iter()
            .map(|(section, count)| (section.to_string(), count))
            .collect()
    });

    output_result(
        "Available sections",
        &SectionsOutput {
            total: sections.len(),
            sections,
            counts,
        },
        cli_args,
    )
}

/// Report model and normalizer status.
fn health(cli_args: &StatuteArgs) -> Result<()> {
    let engine = SectionEngine::from_config(&engine_config(cli_args)?)?;
    if let Err(e) = engine.start() {
        warn!("Model could not be installed: {e}");
    }

    let status = engine.health();
    output_result(
        "Health",
        &HealthOutput {
            status: status.status,
            model_loaded: status.model_loaded,
            normalizer_available: status.normalizer_available,
            model_installed_at: status.model_installed_at.map(|at| at.to_rfc3339()),
        },
        cli_args,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageConfig;
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn test_validate_text() {
        assert_eq!(validate_text("  Someone stole my phone \n").unwrap(), "Someone stole my phone");
        assert_eq!(validate_text("abcde").unwrap(), "abcde");

        let err = validate_text("   ").unwrap_err();
        assert!(matches!(err, StatuteError::Input(_)));

        let err = validate_text(" abcd ").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Input error: Text too short. Please provide more details."
        );
    }

    #[test]
    fn test_validate_text_counts_characters() {
        // Counted in characters, not bytes
        assert!(validate_text("ãããã").is_err());
        assert!(validate_text("ããããã").is_ok());
    }

    #[test]
    fn test_round_confidence() {
        assert_eq!(round_confidence(0.8734), 0.87);
        assert_eq!(round_confidence(2.0 / 3.0), 0.67);
        assert_eq!(round_confidence(0.0), 0.0);
    }

    #[test]
    fn test_engine_config_overrides() {
        let args = StatuteArgs::try_parse_from([
            "statute-classifier",
            "--model-dir",
            "/tmp/statute-models",
            "--no-linguistic",
            "health",
        ])
        .unwrap();

        let config = engine_config(&args).unwrap();
        assert!(!config.linguistic_analysis);
        match config.storage {
            StorageConfig::File(file_config) => {
                assert_eq!(file_config.path, PathBuf::from("/tmp/statute-models"));
            }
            StorageConfig::Memory(_) => panic!("expected file storage"),
        }
    }
}
