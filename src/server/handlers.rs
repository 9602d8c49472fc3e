//! Request handlers.

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse},
};
use tracing::{error, info, warn};
use uuid::Uuid;

use super::{
    AppState,
    types::{ConvertResponse, DocumentResult, EngineHealth, HealthResponse, StoredJob},
};
use crate::engine::Engine;
use crate::staging;
use crate::util::file_stem_for;

pub async fn index() -> impl IntoResponse {
    Html(include_str!("../../assets/index.html"))
}

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let converter = state.converter.clone();
    let diag = tokio::task::spawn_blocking(move || converter.engine().doctor()).await;

    let engine = match diag {
        Ok(Ok(d)) => EngineHealth {
            ok: d.ok,
            markitdown_version: d.markitdown_version,
            error: d.error,
        },
        Ok(Err(e)) => EngineHealth {
            ok: false,
            markitdown_version: None,
            error: Some(format!("{e:#}")),
        },
        Err(e) => EngineHealth {
            ok: false,
            markitdown_version: None,
            error: Some(e.to_string()),
        },
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        engine,
    })
}

/// Convert every file part of a multipart upload. Answers inline; each
/// result is also retained under a fresh job id for the download routes.
pub async fn convert_documents(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let max_files = state.cfg.limits.max_files_per_request;
    let mut documents = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("malformed multipart body: {e}")))?
    {
        // Non-file fields are ignored.
        let Some(file_name) = field.file_name().map(ToOwned::to_owned) else {
            continue;
        };

        if documents.len() >= max_files {
            return Err((
                StatusCode::BAD_REQUEST,
                format!("too many files in one request (limit {max_files})"),
            ));
        }

        let bytes = field.bytes().await.map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                format!("failed reading upload {file_name}: {e}"),
            )
        })?;

        documents.push(convert_one(&state, file_name, bytes.to_vec()).await);
    }

    if documents.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "no files in upload".to_string()));
    }

    Ok(Json(ConvertResponse { documents }))
}

async fn convert_one(state: &AppState, file_name: String, bytes: Vec<u8>) -> DocumentResult {
    info!("converting upload {file_name} ({} bytes)", bytes.len());

    let converter = state.converter.clone();
    let cfg = state.cfg.clone();
    let submitted = file_name.clone();

    // The engine is a blocking subprocess; keep it off the async workers.
    let outcome = tokio::task::spawn_blocking(move || {
        let staged = staging::stage_bytes(&cfg, &submitted, &bytes)?;
        converter.convert_path(staged.path(), staged.file_name())
    })
    .await;

    match outcome {
        Ok(Ok(outcome)) => {
            let job_id = Uuid::new_v4().to_string();
            let stored = StoredJob {
                file_stem: file_stem_for(&file_name),
                file_name: file_name.clone(),
                markdown: outcome.markdown.clone(),
                text: outcome.text,
                report: outcome.report.clone(),
            };
            state.results.write().await.insert(job_id.clone(), stored);
            DocumentResult::success(file_name, job_id, outcome.markdown, outcome.report)
        }
        Ok(Err(e)) => {
            warn!("conversion failed for {file_name}: {e:#}");
            DocumentResult::failure(file_name, format!("{e:#}"))
        }
        Err(e) => {
            error!("conversion task died for {file_name}: {e}");
            DocumentResult::failure(file_name, "internal conversion failure".to_string())
        }
    }
}

pub async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let results = state.results.read().await;
    match results.get(&job_id) {
        Some(job) => Ok(Json(job.clone())),
        None => Err((StatusCode::NOT_FOUND, format!("job not found: {job_id}"))),
    }
}

pub async fn download_markdown(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let results = state.results.read().await;
    let Some(job) = results.get(&job_id) else {
        return Err((StatusCode::NOT_FOUND, format!("job not found: {job_id}")));
    };
    let file_name = format!("{}{}", job.file_stem, state.cfg.output.markdown_suffix);
    Ok(attachment(file_name, "text/markdown; charset=utf-8", job.markdown.clone()))
}

pub async fn download_text(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let results = state.results.read().await;
    let Some(job) = results.get(&job_id) else {
        return Err((StatusCode::NOT_FOUND, format!("job not found: {job_id}")));
    };
    let file_name = format!("{}{}", job.file_stem, state.cfg.output.text_suffix);
    Ok(attachment(file_name, "text/plain; charset=utf-8", job.text.clone()))
}

fn attachment(file_name: String, content_type: &str, body: String) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        body,
    )
}
