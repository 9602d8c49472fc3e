use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionReport {
    pub input: InputStats,
    pub output: OutputStats,
    pub engine: EngineStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputStats {
    pub file_name: String,
    pub bytes: u64,
    pub sha256: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputStats {
    pub markdown_bytes: u64,
    pub text_bytes: u64,
    pub reduction_percent: f64,
}

impl OutputStats {
    pub fn new(original_bytes: u64, markdown_bytes: u64, text_bytes: u64) -> Self {
        Self {
            markdown_bytes,
            text_bytes,
            reduction_percent: reduction_percent(original_bytes, markdown_bytes),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStats {
    pub warnings: Vec<String>,
    pub meta: serde_json::Value,
    pub duration_ms: u64,
    pub finished: String,
}

/// Negative when the rendition grows; 0 for an empty original.
pub fn reduction_percent(original_bytes: u64, converted_bytes: u64) -> f64 {
    if original_bytes == 0 {
        return 0.0;
    }
    (original_bytes as f64 - converted_bytes as f64) / original_bytes as f64 * 100.0
}
