use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineDiag {
    pub python_exe: String,
    pub python_version: String,
    pub markitdown_version: Option<String>,
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertIn {
    pub input_path: String,
    pub file_name: String,
    pub enable_plugins: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertOut {
    pub ok: bool,
    #[serde(default)]
    pub markdown: String,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub meta: serde_json::Value,
    #[serde(default)]
    pub error: Option<String>,
}
