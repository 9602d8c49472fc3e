use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: Server,
    #[serde(default)]
    pub limits: Limits,
    #[serde(default)]
    pub intake: Intake,
    #[serde(default)]
    pub paths: Paths,
    #[serde(default)]
    pub markitdown: Markitdown,
    #[serde(default)]
    pub postprocess: Postprocess,
    #[serde(default)]
    pub output: Output,
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub debug: Debug,
    #[serde(default)]
    pub security: Security,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        let cfg: Config = toml::from_str(&raw).with_context(|| "parsing TOML")?;
        Ok(cfg)
    }

    /// A stable, normalization-friendly string for hashing.
    pub fn normalized_for_hash(&self) -> String {
        toml::to_string(self).unwrap_or_default()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: Default::default(),
            limits: Default::default(),
            intake: Default::default(),
            paths: Default::default(),
            markitdown: Default::default(),
            postprocess: Default::default(),
            output: Default::default(),
            logging: Default::default(),
            debug: Default::default(),
            security: Default::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    pub bind_addr: String,
    pub enable_cors: bool,
    pub max_upload_bytes: u64,
}
impl Default for Server {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".into(),
            enable_cors: true,
            max_upload_bytes: 256 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Limits {
    pub max_input_file_bytes: u64,
    pub max_files_per_request: usize,
}
impl Default for Limits {
    fn default() -> Self {
        Self {
            max_input_file_bytes: 200 * 1024 * 1024,
            max_files_per_request: 16,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intake {
    pub allowed_extensions: Vec<String>,
    pub allow_unknown_extensions: bool,
}
impl Default for Intake {
    fn default() -> Self {
        Self {
            allowed_extensions: vec![
                "docx".into(),
                "xlsx".into(),
                "pptx".into(),
                "pdf".into(),
                "html".into(),
                "htm".into(),
                "zip".into(),
            ],
            allow_unknown_extensions: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paths {
    pub out_dir: String,
    pub work_dir: String,
    pub scripts_dir: String,
}
impl Default for Paths {
    fn default() -> Self {
        Self {
            out_dir: "out".into(),
            work_dir: ".markdrop-work".into(),
            scripts_dir: "scripts".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Markitdown {
    pub python_exe: String,
    pub convert_timeout_seconds: u64,
    pub doctor_timeout_seconds: u64,
    pub enable_plugins: bool,
    #[serde(default)]
    pub env: std::collections::BTreeMap<String, String>,
}
impl Default for Markitdown {
    fn default() -> Self {
        Self {
            python_exe: "auto".into(),
            convert_timeout_seconds: 300,
            doctor_timeout_seconds: 30,
            enable_plugins: false,
            env: Default::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Postprocess {
    pub normalize_unicode: bool,
    pub normalize_newlines: bool,
    pub trim_trailing_whitespace: bool,
    pub remove_by_regex: bool,
    #[serde(default)]
    pub regex: PostprocessRegex,
}
impl Default for Postprocess {
    fn default() -> Self {
        Self {
            normalize_unicode: true,
            normalize_newlines: true,
            trim_trailing_whitespace: true,
            remove_by_regex: false,
            regex: Default::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostprocessRegex {
    pub patterns: Vec<String>,
}
impl Default for PostprocessRegex {
    fn default() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Output {
    pub write_markdown: bool,
    pub write_text: bool,
    pub write_report_json: bool,
    pub markdown_suffix: String,
    pub text_suffix: String,
    pub report_filename: String,
}
impl Default for Output {
    fn default() -> Self {
        Self {
            write_markdown: true,
            write_text: true,
            write_report_json: true,
            markdown_suffix: "_converted.md".into(),
            text_suffix: "_converted.txt".into(),
            report_filename: "report.json".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logging {
    pub level: String,
    pub json: bool,
    pub write_to_file: bool,
    pub file_path: String,
}
impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
            write_to_file: false,
            file_path: "".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Debug {
    pub keep_python_stderr: bool,
    pub dump_effective_config: bool,
}
impl Default for Debug {
    fn default() -> Self {
        Self {
            keep_python_stderr: true,
            dump_effective_config: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Security {
    pub reject_url_inputs: bool,
    pub pin_scripts_dir: bool,
}
impl Default for Security {
    fn default() -> Self {
        Self {
            reject_url_inputs: true,
            pin_scripts_dir: true,
        }
    }
}
