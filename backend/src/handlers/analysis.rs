//! HTTP handlers for plant analysis endpoints

use axum::{
    body::Bytes,
    extract::{
        multipart::{Multipart, MultipartError},
        rejection::JsonRejection,
        State,
    },
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use shared::{validate_image_bytes, validate_image_filename, validate_location, PredictedTraits};

use crate::error::{AppError, AppResult};
use crate::services::{AnalysisOutcome, AnalysisService};
use crate::AppState;

/// Image upload parsed from a multipart form
#[derive(Debug)]
pub struct ImageUpload {
    pub filename: String,
    pub bytes: Bytes,
    pub location: Option<String>,
}

#[derive(Serialize)]
pub struct CompleteAnalysisResponse {
    pub success: bool,
    #[serde(flatten)]
    pub outcome: AnalysisOutcome,
}

#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub predicted_traits: PredictedTraits,
}

/// Trait labels supplied directly by the client
#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    #[serde(default)]
    pub traits: PredictedTraits,
    pub location: Option<String>,
}

fn analysis_service(state: &AppState) -> AnalysisService {
    AnalysisService::new(
        state.predictor.clone(),
        state.weather.clone(),
        state.catalog.clone(),
        state.config.weather.timeout(),
    )
}

/// Complete analysis: traits, genotype, weather and both recommendation lists
pub async fn complete_analysis(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<CompleteAnalysisResponse>> {
    let upload = read_image_upload(multipart, state.config.server.max_upload_bytes).await?;
    let location = resolve_location(upload.location, &state.config.weather.default_location)?;

    tracing::info!("Processing {} for {}", upload.filename, location);

    let outcome = analysis_service(&state)
        .analyze_image(&upload.bytes, &location)
        .await?;

    Ok(Json(CompleteAnalysisResponse {
        success: true,
        outcome,
    }))
}

/// Analyze an image and return the predicted traits only
pub async fn analyze_image(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<AnalyzeResponse>> {
    let upload = read_image_upload(multipart, state.config.server.max_upload_bytes).await?;

    let predicted_traits = analysis_service(&state)
        .predict_traits(&upload.bytes)
        .await?;

    Ok(Json(AnalyzeResponse {
        success: true,
        predicted_traits,
    }))
}

/// Genotype and recommendations for already known traits
pub async fn recommend(
    State(state): State<AppState>,
    payload: Result<Json<RecommendRequest>, JsonRejection>,
) -> AppResult<Json<CompleteAnalysisResponse>> {
    let Json(request) = payload.map_err(|e| AppError::validation("body", e.body_text()))?;
    let location = resolve_location(request.location, &state.config.weather.default_location)?;

    let outcome = analysis_service(&state)
        .recommend(request.traits, &location)
        .await?;

    Ok(Json(CompleteAnalysisResponse {
        success: true,
        outcome,
    }))
}

/// Read the `file` and optional `location` fields of an upload form
pub async fn read_image_upload(
    mut multipart: Multipart,
    max_bytes: usize,
) -> AppResult<ImageUpload> {
    let mut file: Option<(String, Bytes)> = None;
    let mut location = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                validate_image_filename(&filename).map_err(|msg| {
                    if filename.is_empty() {
                        AppError::EmptyFilename
                    } else {
                        AppError::UnsupportedFileType(msg.to_string())
                    }
                })?;

                let bytes = field.bytes().await.map_err(multipart_error)?;
                validate_image_bytes(&bytes, max_bytes).map_err(|msg| {
                    if bytes.len() > max_bytes {
                        AppError::PayloadTooLarge
                    } else {
                        AppError::validation("file", msg)
                    }
                })?;

                file = Some((filename, bytes));
            }
            Some("location") => {
                location = Some(field.text().await.map_err(multipart_error)?);
            }
            _ => {}
        }
    }

    let (filename, bytes) = file.ok_or(AppError::NoFileUploaded)?;
    Ok(ImageUpload {
        filename,
        bytes,
        location,
    })
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge
    } else {
        AppError::validation("file", e.body_text())
    }
}

/// Requested location, or the default when none or a blank one was sent
fn resolve_location(requested: Option<String>, default: &str) -> AppResult<String> {
    match requested {
        Some(location) if !location.trim().is_empty() => {
            validate_location(&location).map_err(|msg| AppError::validation("location", msg))?;
            Ok(location.trim().to_string())
        }
        _ => Ok(default.to_string()),
    }
}
