use markdrop::{
    config::Config,
    staging::{accept_file_name, stage_bytes},
};
use std::path::PathBuf;

fn cfg_with_work_dir(dir: &tempfile::TempDir) -> Config {
    let mut cfg = Config::default();
    cfg.paths.work_dir = dir.path().display().to_string();
    cfg
}

#[test]
fn accepts_plain_names_and_strips_directories() {
    let cfg = Config::default();
    assert_eq!(accept_file_name(&cfg, "report.docx").unwrap(), "report.docx");
    assert_eq!(
        accept_file_name(&cfg, "../../etc/report.docx").unwrap(),
        "report.docx"
    );
    assert_eq!(
        accept_file_name(&cfg, r"C:\Users\me\slides.pptx").unwrap(),
        "slides.pptx"
    );
}

#[test]
fn rejects_unusable_names() {
    let cfg = Config::default();
    assert!(accept_file_name(&cfg, "").is_err());
    assert!(accept_file_name(&cfg, "..").is_err());
    assert!(accept_file_name(&cfg, "dir/..").is_err());
}

#[test]
fn rejects_url_shaped_names() {
    let cfg = Config::default();
    assert!(accept_file_name(&cfg, "https://example.com/a.pdf").is_err());
    assert!(accept_file_name(&cfg, "file:///tmp/a.pdf").is_err());

    let mut open = Config::default();
    open.security.reject_url_inputs = false;
    assert_eq!(
        accept_file_name(&open, "https://example.com/a.pdf").unwrap(),
        "a.pdf"
    );
}

#[test]
fn stages_bytes_under_original_name() {
    let work = tempfile::tempdir().unwrap();
    let cfg = cfg_with_work_dir(&work);

    let staged = stage_bytes(&cfg, "notes/minutes.docx", b"payload").unwrap();
    assert_eq!(staged.file_name(), "minutes.docx");
    assert_eq!(
        staged.path().file_name().and_then(|s| s.to_str()),
        Some("minutes.docx")
    );
    assert_eq!(std::fs::read(staged.path()).unwrap(), b"payload");
    assert!(staged.path().starts_with(work.path()));
}

#[test]
fn staged_upload_cleans_up_on_drop() {
    let work = tempfile::tempdir().unwrap();
    let cfg = cfg_with_work_dir(&work);

    let path: PathBuf = {
        let staged = stage_bytes(&cfg, "a.pdf", b"x").unwrap();
        staged.path().to_path_buf()
    };
    assert!(!path.exists());
    assert!(path.parent().is_some_and(|dir| !dir.exists()));
}
