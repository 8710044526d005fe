//! Output formatting for CLI commands.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cli::args::{OutputFormat, StatuteArgs};
use crate::error::Result;

/// Result of a prediction.
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictionOutput {
    pub section: Option<String>,
    pub confidence: f64,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub original_text: String,
}

/// Result of a retrain.
#[derive(Debug, Serialize, Deserialize)]
pub struct RetrainOutput {
    pub message: String,
    pub samples: usize,
}

/// Known sections.
#[derive(Debug, Serialize, Deserialize)]
pub struct SectionsOutput {
    pub sections: Vec<String>,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counts: Option<BTreeMap<String, usize>>,
}

/// Engine health.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthOutput {
    pub status: String,
    pub model_loaded: bool,
    pub normalizer_available: bool,
    pub model_installed_at: Option<String>,
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &StatuteArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: Serialize>(message: &str, result: &T, args: &StatuteArgs) -> Result<()> {
    if args.verbosity() > 1 {
        println!("{message}");
        println!();
    }

    let value = serde_json::to_value(result)?;
    for line in human_lines(&value) {
        println!("{line}");
    }
    Ok(())
}

/// Render a value as `key: value` lines, nesting objects one level.
fn human_lines(value: &serde_json::Value) -> Vec<String> {
    match value {
        serde_json::Value::Object(obj) => {
            let mut lines = Vec::with_capacity(obj.len());
            for (key, val) in obj {
                match val {
                    serde_json::Value::Object(inner) => {
                        lines.push(format!("{key}:"));
                        for (inner_key, inner_val) in inner {
                            lines.push(format!("  {inner_key}: {}", format_value(inner_val)));
                        }
                    }
                    _ => lines.push(format!("{key}: {}", format_value(val))),
                }
            }
            lines
        }
        _ => vec![format_value(value)],
    }
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &StatuteArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

/// Format a JSON value for human output.
fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Array(arr) => {
            let formatted_values = arr.iter().map(format_value).collect::<Vec<_>>().join(", ");
            format!("[{formatted_values}]")
        }
        serde_json::Value::Object(_) => "[object]".to_string(),
        serde_json::Value::Null => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&json!("379")), "379");
        assert_eq!(format_value(&json!(0.87)), "0.87");
        assert_eq!(format_value(&json!(true)), "true");
        assert_eq!(format_value(&json!(["302", "379"])), "[302, 379]");
        assert_eq!(format_value(&json!(null)), "-");
    }

    #[test]
    fn test_prediction_json_shape() {
        let output = PredictionOutput {
            section: Some("379".to_string()),
            confidence: 0.87,
            method: "ml".to_string(),
            message: None,
            original_text: "Someone stole my phone".to_string(),
        };
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(
            value,
            json!({
                "section": "379",
                "confidence": 0.87,
                "method": "ml",
                "original_text": "Someone stole my phone"
            })
        );
    }

    #[test]
    fn test_no_prediction_keeps_null_section() {
        let output = PredictionOutput {
            section: None,
            confidence: 0.0,
            method: "none".to_string(),
            message: Some("Could not confidently predict section.".to_string()),
            original_text: "xyz abcde".to_string(),
        };
        let value = serde_json::to_value(&output).unwrap();
        assert!(value["section"].is_null());
        assert_eq!(value["method"], "none");
        assert!(value.get("message").is_some());
    }

    #[test]
    fn test_human_lines_nest_objects() {
        let lines = human_lines(&json!({
            "total": 2,
            "counts": { "302": 4, "379": 5 }
        }));
        assert!(lines.contains(&"total: 2".to_string()));
        assert!(lines.contains(&"counts:".to_string()));
        assert!(lines.contains(&"  302: 4".to_string()));
    }
}
