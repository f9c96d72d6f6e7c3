use serde::Serialize;
use serde_json::{Map, Value};

use crate::cli::OutputFormat;

/// What a finished command has to say: a headline plus named details.
#[derive(Debug, Serialize)]
pub struct Report {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub details: Map<String, Value>,
}

impl Report {
    pub fn new(message: impl Into<String>) -> Self {
        Self { success: true, message: message.into(), details: Map::new() }
    }

    pub fn detail(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }

    pub fn render(&self, output_format: &OutputFormat) -> anyhow::Result<String> {
        match output_format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            OutputFormat::Text => {
                let mut text = format!("✓ {}", self.message);
                for (key, value) in &self.details {
                    match value {
                        Value::String(s) => text.push_str(&format!("\n  {key}: {s}")),
                        other => text.push_str(&format!("\n  {key}: {other}")),
                    }
                }
                Ok(text)
            }
        }
    }

    pub fn print(&self, output_format: &OutputFormat) -> anyhow::Result<()> {
        println!("{}", self.render(output_format)?);
        Ok(())
    }
}
