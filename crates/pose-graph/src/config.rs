use crate::GraphError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Names of the streams the pipeline talks to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamNames {
    pub input: String,
    pub output_video: String,
    pub landmarks: String,
}

impl Default for StreamNames {
    fn default() -> Self {
        Self {
            input: "input_video".to_string(),
            output_video: "output_video".to_string(),
            landmarks: "pose_landmarks".to_string(),
        }
    }
}

/// Textual graph description.
///
/// The body is passed to the engine untouched. Top-level `input_stream:` and
/// `output_stream:` declarations are picked out so stream names can be
/// checked before any engine is built.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphConfig {
    text: String,
    inputs: Vec<String>,
    outputs: Vec<String>,
}

impl GraphConfig {
    pub fn parse(text: impl Into<String>) -> Result<Self, GraphError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(GraphError::Config("graph description is empty".to_string()));
        }

        let mut inputs = Vec::new();
        let mut outputs = Vec::new();
        for line in text.lines() {
            // node-level declarations are indented, only the graph's own count
            if line.starts_with(char::is_whitespace) {
                continue;
            }
            if let Some(value) = line.strip_prefix("input_stream:") {
                inputs.push(stream_name(value)?);
            } else if let Some(value) = line.strip_prefix("output_stream:") {
                outputs.push(stream_name(value)?);
            }
        }

        Ok(Self {
            text,
            inputs,
            outputs,
        })
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self, GraphError> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| GraphError::Config(format!("{}: {}", path.display(), e)))?;
        let config = Self::parse(text)?;
        log::info!(
            "graph {}: inputs {:?}, outputs {:?}",
            path.display(),
            config.inputs,
            config.outputs
        );
        Ok(config)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[String] {
        &self.outputs
    }

    /// Fail unless the graph declares every stream in `names`.
    pub fn require_streams(&self, names: &StreamNames) -> Result<(), GraphError> {
        if !self.inputs.contains(&names.input) {
            return Err(GraphError::Config(format!(
                "graph has no input stream {:?}",
                names.input
            )));
        }
        for output in [&names.output_video, &names.landmarks] {
            if !self.outputs.contains(output) {
                return Err(GraphError::Config(format!(
                    "graph has no output stream {:?}",
                    output
                )));
            }
        }
        Ok(())
    }
}

// `"name"`, `"TAG:name"` or `"TAG:0:name"`
fn stream_name(value: &str) -> Result<String, GraphError> {
    let value = value.trim();
    let unquoted = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .ok_or_else(|| GraphError::Config(format!("stream name not quoted: {value}")))?;
    let name = unquoted.rsplit(':').next().unwrap_or(unquoted);
    if name.is_empty() {
        return Err(GraphError::Config(format!("empty stream name in {value}")));
    }
    Ok(name.to_string())
}
