use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use signdict_db::{LoadStatus, SignLexicon};
use signdict_morph::normalize;

use crate::matcher::{TranslateError, Translator};
use crate::video::VideoLibrary;

#[derive(Clone)]
pub struct AppState {
    pub translator: Arc<Translator>,
    pub lexicon: Arc<SignLexicon>,
    pub videos: Arc<VideoLibrary>,
}

#[derive(Deserialize)]
pub struct TranslateRequest {
    pub sentence: String,
}

#[derive(Serialize)]
pub struct TranslateResponse {
    sentence: String,
    matches: Vec<MatchItem>,
}

#[derive(Serialize)]
struct MatchItem {
    canonical_word: String,
    input_word: String,
    video_url: String,
}

#[derive(Serialize)]
pub struct SignsResponse {
    total: usize,
    words: Vec<String>,
}

#[derive(Serialize)]
pub struct VideoResponse {
    word: String,
    path: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    dictionary: DictionaryHealth,
}

#[derive(Serialize)]
struct DictionaryHealth {
    entries: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/robots.txt", get(robots))
        .route("/healthz", get(healthz))
        .route("/v1/translate", post(translate))
        .route("/v1/signs", get(signs))
        .route("/v1/videos/{word}", get(video))
        .with_state(state)
}

async fn healthz(State(state): State<AppState>) -> Json<HealthResponse> {
    let dictionary = match state.lexicon.status() {
        LoadStatus::Loaded { entries } => DictionaryHealth {
            entries: *entries,
            error: None,
        },
        LoadStatus::Failed(reason) => DictionaryHealth {
            entries: 0,
            error: Some(reason.clone()),
        },
    };
    Json(HealthResponse {
        status: "ok",
        dictionary,
    })
}

async fn robots() -> impl IntoResponse {
    (
        axum::http::HeaderMap::from_iter([(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        )]),
        "User-agent: *\nDisallow: /",
    )
}

async fn translate(
    State(state): State<AppState>,
    Json(request): Json<TranslateRequest>,
) -> Result<Json<TranslateResponse>, ApiError> {
    let translator = Arc::clone(&state.translator);
    let sentence = request.sentence;
    // The segmenter call may block on an external process.
    let translation = tokio::task::spawn_blocking(move || translator.translate(&sentence))
        .await
        .map_err(|_| ApiError::Internal)??;

    let matches = translation
        .matches
        .into_iter()
        .map(|m| MatchItem {
            canonical_word: m.canonical_word,
            input_word: m.input_word,
            video_url: m.video_reference,
        })
        .collect();
    Ok(Json(TranslateResponse {
        sentence: translation.sentence,
        matches,
    }))
}

async fn signs(State(state): State<AppState>) -> Json<SignsResponse> {
    let mut words: Vec<String> = state
        .lexicon
        .canonical_words()
        .map(str::to_string)
        .collect();
    words.sort();
    Json(SignsResponse {
        total: words.len(),
        words,
    })
}

async fn video(
    State(state): State<AppState>,
    Path(word): Path<String>,
) -> Result<Json<VideoResponse>, ApiError> {
    let Some((canonical, entry)) = state.lexicon.resolve(&normalize(&word)) else {
        return Err(ApiError::NotFound(format!("unknown sign word: {word}")));
    };
    let Some(path) = state.videos.resolve(&entry.video) else {
        return Err(ApiError::NotFound(format!(
            "video for '{canonical}' not found"
        )));
    };
    Ok(Json(VideoResponse {
        word: canonical.to_string(),
        path: path.display().to_string(),
    }))
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("no supported sign words in sentence")]
    NoMatch { sentence: String },
    #[error("{0}")]
    Unavailable(String),
    #[error("internal server error")]
    Internal,
}

impl From<TranslateError> for ApiError {
    fn from(err: TranslateError) -> Self {
        match err {
            TranslateError::InvalidInput => {
                ApiError::BadRequest("sentence contains no Arabic text".to_string())
            }
            TranslateError::SegmenterUnavailable(source) => {
                ApiError::Unavailable(format!("segmenter unavailable: {source}"))
            }
            TranslateError::NoMatch { sentence } => ApiError::NoMatch { sentence },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => {
                let body = Json(ErrorResponse { error: msg });
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            ApiError::NotFound(msg) => {
                let body = Json(ErrorResponse { error: msg });
                (StatusCode::NOT_FOUND, body).into_response()
            }
            ApiError::NoMatch { sentence } => {
                let body = Json(json!({
                    "error": "no supported sign words in sentence",
                    "sentence": sentence,
                }));
                (StatusCode::NOT_FOUND, body).into_response()
            }
            ApiError::Unavailable(msg) => {
                let body = Json(ErrorResponse { error: msg });
                (StatusCode::SERVICE_UNAVAILABLE, body).into_response()
            }
            ApiError::Internal => {
                let body = Json(json!({ "error": "internal server error" }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}
