use crate::{
    config::Config,
    engine::{Engine, python::PythonEngine},
    pipeline::Converter,
    server::{self, AppState},
    staging,
    util::{ensure_dir, file_stem_for},
};
use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "markdrop")]
#[command(about = "Upload office documents, get Markdown back (MarkItDown front door)")]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Command,

    /// Path to config TOML. If omitted, uses ./markdrop.toml if present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP service.
    Serve {
        /// Override [server].bind_addr.
        #[arg(long)]
        bind: Option<String>,
    },
    /// One-shot conversion of a file already on disk.
    Convert {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Engine diagnostics.
    Doctor {},
}

pub fn dispatch(args: Args) -> Result<()> {
    let cfg_path = resolve_config_path(args.config.as_deref())?;
    let cfg = Config::load(&cfg_path)?;

    match &args.cmd {
        Command::Doctor {} => {
            let log_path = resolve_log_path(&cfg, None);
            let _guard = init_logging(&args, &cfg, log_path.as_deref())?;
            doctor(&cfg)
        }
        Command::Serve { bind } => {
            let log_path = resolve_log_path(&cfg, None);
            let _guard = init_logging(&args, &cfg, log_path.as_deref())?;
            serve(&cfg, bind.as_deref())
        }
        Command::Convert { input, out_dir } => convert(&args, &cfg, input, out_dir.as_deref()),
    }
}

fn resolve_config_path(user: Option<&Path>) -> Result<PathBuf> {
    if let Some(p) = user {
        return Ok(p.to_path_buf());
    }
    let default = PathBuf::from("markdrop.toml");
    if default.exists() {
        Ok(default)
    } else {
        Ok(PathBuf::from("markdrop.example.toml"))
    }
}

fn init_logging(args: &Args, cfg: &Config, file_path: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = args
        .log_level
        .as_deref()
        .unwrap_or(cfg.logging.level.as_str());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stdout_layer = if cfg.logging.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .boxed()
    };

    let (file_layer, guard) = if let Some(path) = file_path {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        ensure_dir(parent)?;
        let file = std::fs::File::create(path)
            .with_context(|| format!("create log file: {}", path.display()))?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(guard)
}

fn doctor(cfg: &Config) -> Result<()> {
    let engine = PythonEngine::new(cfg)?;
    let diag = engine.doctor()?;
    println!("{}", serde_json::to_string_pretty(&diag)?);
    Ok(())
}

fn serve(cfg: &Config, bind_override: Option<&str>) -> Result<()> {
    let engine = PythonEngine::new(cfg)?;
    let state = AppState::new(cfg, Box::new(engine));

    let addr = bind_override
        .unwrap_or(cfg.server.bind_addr.as_str())
        .to_string();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .with_context(|| "building tokio runtime")?;
    runtime.block_on(server::start_server(&addr, state))
}

fn convert(args: &Args, cfg: &Config, input: &Path, out_override: Option<&Path>) -> Result<()> {
    let out_dir = out_override
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&cfg.paths.out_dir));
    ensure_dir(&out_dir)?;

    let log_path = resolve_log_path(cfg, Some(&out_dir));
    let _guard = init_logging(args, cfg, log_path.as_deref())?;

    if !input.exists() {
        return Err(anyhow!("input does not exist: {}", input.display()));
    }
    let file_name = staging::accept_file_name(cfg, &input.display().to_string())?;

    if cfg.debug.dump_effective_config {
        let raw = toml::to_string(cfg).unwrap_or_default();
        std::fs::write(out_dir.join("effective-config.toml"), raw)?;
    }

    let engine = PythonEngine::new(cfg)?;
    let converter = Converter::new(cfg, engine);
    let outcome = converter.convert_path(input, &file_name)?;

    let stem = file_stem_for(&file_name);

    if cfg.output.write_markdown {
        let path = out_dir.join(format!("{stem}{}", cfg.output.markdown_suffix));
        std::fs::write(&path, &outcome.markdown)?;
        info!("wrote {}", path.display());
    }

    if cfg.output.write_text {
        let path = out_dir.join(format!("{stem}{}", cfg.output.text_suffix));
        std::fs::write(&path, &outcome.text)?;
        info!("wrote {}", path.display());
    }

    if cfg.output.write_report_json {
        std::fs::write(
            out_dir.join(&cfg.output.report_filename),
            serde_json::to_string_pretty(&outcome.report)?,
        )?;
    }

    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "input": file_name,
            "out_dir": out_dir,
            "reduction_percent": outcome.report.output.reduction_percent,
            "status": "ok",
        }))?
    );

    Ok(())
}

fn resolve_log_path(cfg: &Config, out_dir: Option<&Path>) -> Option<PathBuf> {
    if !cfg.logging.write_to_file {
        return None;
    }

    if !cfg.logging.file_path.is_empty() {
        return Some(PathBuf::from(&cfg.logging.file_path));
    }

    if let Some(out_dir) = out_dir {
        return Some(out_dir.join("markdrop.log"));
    }

    Some(PathBuf::from(&cfg.paths.out_dir).join("markdrop.log"))
}
