//! Inference service clients
//!
//! The feature extractor turns a leaf image into an embedding; one classifier
//! per trait turns the embedding into a label. Both are remote HTTP services.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;

use crate::error::{AppError, AppResult};

/// Produces a feature vector from raw image bytes.
///
/// Returns `AppError::ImageDecode` when the image itself is unusable.
#[async_trait]
pub trait FeatureExtractor: Send + Sync {
    async fn extract(&self, image: &[u8]) -> AppResult<Vec<f32>>;
}

/// Predicts one trait label from a feature vector
#[async_trait]
pub trait TraitClassifier: Send + Sync {
    async fn predict(&self, features: &[f32]) -> AppResult<String>;
}

/// Request to extract features from an image
#[derive(Debug, Serialize)]
pub struct ExtractFeaturesRequest {
    pub image_base64: String,
}

/// Response from the feature extractor
#[derive(Debug, Deserialize)]
pub struct ExtractFeaturesResponse {
    pub features: Vec<f32>,
}

/// Request to classify a feature vector
#[derive(Debug, Serialize)]
pub struct ClassifyRequest<'a> {
    pub features: &'a [f32],
}

/// Response from a trait classifier
#[derive(Debug, Deserialize)]
pub struct ClassifyResponse {
    pub label: String,
}

/// Shared HTTP plumbing for the inference endpoints
#[derive(Clone)]
struct InferenceEndpoint {
    api_endpoint: String,
    api_key: Option<String>,
    http_client: Client,
}

impl InferenceEndpoint {
    fn new(api_endpoint: String, api_key: Option<String>, timeout: Duration) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_endpoint,
            api_key,
            http_client,
        })
    }

    async fn post<B, R>(&self, body: &B) -> Result<R, PostError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let mut request = self
            .http_client
            .post(&self.api_endpoint)
            .header("Content-Type", "application/json")
            .json(body);
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| PostError::Transport(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(PostError::Status(status, body));
        }

        response
            .json()
            .await
            .map_err(|e| PostError::Transport(format!("Failed to parse response: {}", e)))
    }
}

enum PostError {
    Transport(String),
    Status(StatusCode, String),
}

impl PostError {
    fn into_service_error(self) -> AppError {
        match self {
            PostError::Transport(msg) => AppError::InferenceService(msg),
            PostError::Status(status, body) => {
                AppError::InferenceService(format!("API returned {}: {}", status, body))
            }
        }
    }
}

/// Client for the remote feature extraction service
#[derive(Clone)]
pub struct RemoteFeatureExtractor {
    endpoint: InferenceEndpoint,
}

impl RemoteFeatureExtractor {
    pub fn new(
        api_endpoint: String,
        api_key: Option<String>,
        timeout: Duration,
    ) -> AppResult<Self> {
        Ok(Self {
            endpoint: InferenceEndpoint::new(api_endpoint, api_key, timeout)?,
        })
    }
}

#[async_trait]
impl FeatureExtractor for RemoteFeatureExtractor {
    async fn extract(&self, image: &[u8]) -> AppResult<Vec<f32>> {
        let request = ExtractFeaturesRequest {
            image_base64: STANDARD.encode(image),
        };

        let response: ExtractFeaturesResponse =
            self.endpoint.post(&request).await.map_err(|e| match e {
                // The extractor rejects images it cannot decode with a client error
                PostError::Status(StatusCode::BAD_REQUEST, body)
                | PostError::Status(StatusCode::UNPROCESSABLE_ENTITY, body) => {
                    AppError::ImageDecode(body)
                }
                other => other.into_service_error(),
            })?;

        if response.features.is_empty() {
            return Err(AppError::InferenceService(
                "Feature extractor returned an empty vector".to_string(),
            ));
        }

        Ok(response.features)
    }
}

/// Client for one remote trait classifier
#[derive(Clone)]
pub struct RemoteTraitClassifier {
    endpoint: InferenceEndpoint,
}

impl RemoteTraitClassifier {
    pub fn new(
        api_endpoint: String,
        api_key: Option<String>,
        timeout: Duration,
    ) -> AppResult<Self> {
        Ok(Self {
            endpoint: InferenceEndpoint::new(api_endpoint, api_key, timeout)?,
        })
    }
}

#[async_trait]
impl TraitClassifier for RemoteTraitClassifier {
    async fn predict(&self, features: &[f32]) -> AppResult<String> {
        let response: ClassifyResponse = self
            .endpoint
            .post(&ClassifyRequest { features })
            .await
            .map_err(PostError::into_service_error)?;

        Ok(response.label)
    }
}
