//! API response types.

use crate::report::ConversionReport;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub engine: EngineHealth,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineHealth {
    pub ok: bool,
    pub markitdown_version: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Batch conversion response: one entry per uploaded document, in upload
/// order. A failed document never fails its siblings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertResponse {
    pub documents: Vec<DocumentResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentResult {
    pub ok: bool,
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<ConversionReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DocumentResult {
    pub fn success(
        file_name: String,
        job_id: String,
        markdown: String,
        report: ConversionReport,
    ) -> Self {
        Self {
            ok: true,
            file_name,
            job_id: Some(job_id),
            markdown: Some(markdown),
            report: Some(report),
            error: None,
        }
    }

    pub fn failure(file_name: String, error: String) -> Self {
        Self {
            ok: false,
            file_name,
            job_id: None,
            markdown: None,
            report: None,
            error: Some(error),
        }
    }
}

/// A finished conversion retained for download and re-fetch.
#[derive(Debug, Clone, Serialize)]
pub struct StoredJob {
    pub file_name: String,
    pub file_stem: String,
    pub markdown: String,
    #[serde(skip)]
    pub text: String,
    pub report: ConversionReport,
}
