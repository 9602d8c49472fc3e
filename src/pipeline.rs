use crate::{
    config::Config,
    engine::{ConvertIn, Engine},
    postprocess,
    report::{ConversionReport, EngineStats, InputStats, OutputStats},
    util,
};
use anyhow::{Context, Result, anyhow};
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Legacy engine builds signal failure inside the payload instead of the
/// status field.
const ERROR_SENTINEL: &str = "ERROR:";

pub struct Converter<E: Engine> {
    cfg: Config,
    engine: E,
}

#[derive(Debug)]
pub struct ConversionOutcome {
    pub markdown: String,
    pub text: String,
    pub report: ConversionReport,
}

impl<E: Engine> Converter<E> {
    pub fn new(cfg: &Config, engine: E) -> Self {
        Self {
            cfg: cfg.clone(),
            engine,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Convert one staged document: validate, call the engine, scrub the
    /// result, derive the text rendition and the size report.
    pub fn convert_path(&self, input: &Path, file_name: &str) -> Result<ConversionOutcome> {
        let started = Instant::now();

        let meta = std::fs::metadata(input)
            .with_context(|| format!("stat input: {}", input.display()))?;
        let original_bytes = meta.len();

        self.validate(file_name, original_bytes)?;

        let sha256 = util::hash_file(input)
            .with_context(|| format!("hashing input: {}", input.display()))?;

        let req = ConvertIn {
            input_path: input.display().to_string(),
            file_name: file_name.to_string(),
            enable_plugins: self.cfg.markitdown.enable_plugins,
        };

        let out = self
            .engine
            .convert(&req)
            .with_context(|| format!("convert failed: {file_name}"))?;

        if !out.ok {
            return Err(anyhow!(
                "engine rejected {file_name}: {}",
                out.error.as_deref().unwrap_or("unknown engine error")
            ));
        }

        if out.markdown.trim_start().starts_with(ERROR_SENTINEL) {
            let first = out.markdown.trim_start().lines().next().unwrap_or(ERROR_SENTINEL);
            return Err(anyhow!("engine reported failure for {file_name}: {first}"));
        }

        let markdown = postprocess::scrub_markdown(&self.cfg, out.markdown)?;
        let text = postprocess::markdown_to_text(&self.cfg, &markdown)?;

        let report = ConversionReport {
            input: InputStats {
                file_name: file_name.to_string(),
                bytes: original_bytes,
                sha256,
            },
            output: OutputStats::new(original_bytes, markdown.len() as u64, text.len() as u64),
            engine: EngineStats {
                warnings: out.warnings,
                meta: out.meta,
                duration_ms: started.elapsed().as_millis() as u64,
                finished: util::now_rfc3339(),
            },
        };

        info!(
            "converted {file_name}: {} -> {} bytes ({:.1}% reduction)",
            original_bytes, report.output.markdown_bytes, report.output.reduction_percent
        );

        Ok(ConversionOutcome {
            markdown,
            text,
            report,
        })
    }

    fn validate(&self, file_name: &str, bytes: u64) -> Result<()> {
        if bytes == 0 {
            return Err(anyhow!("input is empty: {file_name}"));
        }
        if bytes > self.cfg.limits.max_input_file_bytes {
            return Err(anyhow!(
                "input exceeds max_input_file_bytes ({} > {}): {file_name}",
                bytes,
                self.cfg.limits.max_input_file_bytes
            ));
        }

        match util::extension_for(file_name) {
            Some(ext) if self.cfg.intake.allowed_extensions.iter().any(|a| *a == ext) => Ok(()),
            Some(ext) if self.cfg.intake.allow_unknown_extensions => {
                info!("accepting unlisted extension .{ext} for {file_name}");
                Ok(())
            }
            Some(ext) => Err(anyhow!("unsupported file type .{ext}: {file_name}")),
            None if self.cfg.intake.allow_unknown_extensions => Ok(()),
            None => Err(anyhow!("input has no extension: {file_name}")),
        }
    }
}
