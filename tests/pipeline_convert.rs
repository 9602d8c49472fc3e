use markdrop::{
    config::Config,
    engine::{ConvertIn, ConvertOut, Engine, EngineDiag},
    pipeline::Converter,
    util::sha256_hex,
};
use std::path::PathBuf;
use std::sync::Mutex;

struct MockEngine {
    out: ConvertOut,
    seen: Mutex<Vec<ConvertIn>>,
}

impl MockEngine {
    fn returning(out: ConvertOut) -> Self {
        Self {
            out,
            seen: Mutex::new(Vec::new()),
        }
    }
}

impl Engine for MockEngine {
    fn doctor(&self) -> anyhow::Result<EngineDiag> {
        Ok(EngineDiag {
            python_exe: "python3".into(),
            python_version: "3.12.0".into(),
            markitdown_version: Some("0.1.0".into()),
            ok: true,
            error: None,
        })
    }

    fn convert(&self, req: &ConvertIn) -> anyhow::Result<ConvertOut> {
        self.seen.lock().unwrap().push(req.clone());
        Ok(self.out.clone())
    }
}

fn ok_out(markdown: &str) -> ConvertOut {
    ConvertOut {
        ok: true,
        markdown: markdown.to_string(),
        warnings: vec!["image skipped".to_string()],
        meta: serde_json::json!({"title": "Sample"}),
        error: None,
    }
}

fn write_input(dir: &tempfile::TempDir, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn converts_and_reports_sizes() {
    let dir = tempfile::tempdir().unwrap();
    let content = vec![b'x'; 400];
    let input = write_input(&dir, "sample.docx", &content);

    let cfg = Config::default();
    let converter = Converter::new(&cfg, MockEngine::returning(ok_out("# Sample\n\nBody  \n")));
    let outcome = converter.convert_path(&input, "sample.docx").unwrap();

    assert_eq!(outcome.markdown, "# Sample\n\nBody");
    assert_eq!(outcome.text, "Sample\n\nBody");

    let report = &outcome.report;
    assert_eq!(report.input.file_name, "sample.docx");
    assert_eq!(report.input.bytes, 400);
    assert_eq!(report.input.sha256, sha256_hex(&content));
    assert_eq!(report.output.markdown_bytes, outcome.markdown.len() as u64);
    assert_eq!(
        report.output.reduction_percent,
        (400.0 - outcome.markdown.len() as f64) / 400.0 * 100.0
    );
    assert_eq!(report.engine.warnings, vec!["image skipped".to_string()]);
}

#[test]
fn passes_original_name_to_engine() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir, "slides.pptx", b"deck");

    let cfg = Config::default();
    let engine = MockEngine::returning(ok_out("ok"));
    let converter = Converter::new(&cfg, engine);
    converter.convert_path(&input, "slides.pptx").unwrap();

    let seen = converter.engine().seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].file_name, "slides.pptx");
    assert_eq!(seen[0].input_path, input.display().to_string());
}

#[test]
fn error_sentinel_in_payload_fails_conversion() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir, "broken.pdf", b"pdf bytes");

    let cfg = Config::default();
    let converter = Converter::new(
        &cfg,
        MockEngine::returning(ok_out("ERROR: cannot open stream")),
    );
    let err = converter.convert_path(&input, "broken.pdf").unwrap_err();
    assert!(err.to_string().contains("ERROR: cannot open stream"));
}

#[test]
fn engine_nack_fails_conversion() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir, "locked.xlsx", b"cells");

    let cfg = Config::default();
    let out = ConvertOut {
        ok: false,
        markdown: String::new(),
        warnings: vec![],
        meta: serde_json::Value::Null,
        error: Some("password protected".into()),
    };
    let converter = Converter::new(&cfg, MockEngine::returning(out));
    let err = converter.convert_path(&input, "locked.xlsx").unwrap_err();
    assert!(err.to_string().contains("password protected"));
}

#[test]
fn rejects_disallowed_extension() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir, "tool.exe", b"MZ");

    let cfg = Config::default();
    let converter = Converter::new(&cfg, MockEngine::returning(ok_out("x")));
    let err = converter.convert_path(&input, "tool.exe").unwrap_err();
    assert!(err.to_string().contains("unsupported file type"));
}

#[test]
fn unknown_extension_allowed_when_configured() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir, "notes.epub", b"book");

    let mut cfg = Config::default();
    cfg.intake.allow_unknown_extensions = true;
    let converter = Converter::new(&cfg, MockEngine::returning(ok_out("x")));
    assert!(converter.convert_path(&input, "notes.epub").is_ok());
}

#[test]
fn rejects_empty_and_oversized_inputs() {
    let dir = tempfile::tempdir().unwrap();

    let empty = write_input(&dir, "empty.docx", b"");
    let cfg = Config::default();
    let converter = Converter::new(&cfg, MockEngine::returning(ok_out("x")));
    assert!(converter.convert_path(&empty, "empty.docx").is_err());

    let big = write_input(&dir, "big.docx", &vec![0u8; 64]);
    let mut small_cfg = Config::default();
    small_cfg.limits.max_input_file_bytes = 16;
    let converter = Converter::new(&small_cfg, MockEngine::returning(ok_out("x")));
    let err = converter.convert_path(&big, "big.docx").unwrap_err();
    assert!(err.to_string().contains("max_input_file_bytes"));
}
