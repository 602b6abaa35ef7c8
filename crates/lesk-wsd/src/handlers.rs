use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::config::{DEFAULT_WINDOW, PredictOptions};
use crate::inventory::SenseCandidate;
use crate::predict::{Disambiguation, Lesk};
use crate::signature::Target;
use crate::text::{PosTag, Sentence};

#[derive(Clone)]
pub struct AppState {
    pub lesk: Arc<Lesk>,
    /// Options used when a request names none.
    pub defaults: PredictOptions,
}

#[derive(Deserialize)]
pub struct DisambiguateQuery {
    pub sentence: String,
    pub position: usize,
    pub lemma: String,
    pub pos: String,
    pub context: Option<String>,
    pub window: Option<usize>,
    pub metric: Option<String>,
}

#[derive(Deserialize)]
pub struct SensesQuery {
    pub lemma: String,
    pub pos: String,
}

#[derive(Serialize)]
pub struct SensesResponse {
    lemma: String,
    pos: String,
    senses: Vec<SenseCandidate>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/v1/disambiguate", get(disambiguate))
        .route("/v1/senses", get(senses))
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    "ok"
}

async fn disambiguate(
    State(state): State<AppState>,
    Query(params): Query<DisambiguateQuery>,
) -> Result<Json<Disambiguation>, ApiError> {
    let options = request_options(&params, state.defaults)?;
    let lesk = Arc::clone(&state.lesk);
    let result = tokio::task::spawn_blocking(move || {
        let target = Target::new(params.lemma, PosTag::parse(&params.pos));
        let sentence = lesk.annotator().annotate_line(&params.sentence);
        if params.position >= sentence.len() {
            return Err(ApiError::bad_request(format!(
                "position {} is outside a sentence of {} tokens",
                params.position,
                sentence.len()
            )));
        }
        let sentence = label_target(sentence, params.position, &target);
        Ok(lesk.disambiguate(&sentence, params.position, &target, options))
    })
    .await
    .map_err(|err| {
        error!("disambiguation task failed: {err}");
        ApiError::Internal
    })??;
    Ok(Json(result))
}

async fn senses(
    State(state): State<AppState>,
    Query(params): Query<SensesQuery>,
) -> Result<Json<SensesResponse>, ApiError> {
    let tag = PosTag::parse(&params.pos);
    let Some(pos) = tag.wordnet_pos() else {
        return Err(ApiError::bad_request(format!(
            "pos must be one of NOUN, VERB, ADJ, ADV; got `{}`",
            params.pos
        )));
    };
    let senses = state.lesk.inventory().lookup_senses(&params.lemma, pos);
    Ok(Json(SensesResponse {
        lemma: params.lemma,
        pos: tag.to_string(),
        senses,
    }))
}

fn request_options(
    params: &DisambiguateQuery,
    defaults: PredictOptions,
) -> Result<PredictOptions, ApiError> {
    if params.context.is_none() && params.window.is_none() && params.metric.is_none() {
        return Ok(defaults);
    }
    let context = params
        .context
        .as_deref()
        .unwrap_or(defaults.policy.option().as_str());
    let window = params
        .window
        .or(defaults.policy.window())
        .unwrap_or(DEFAULT_WINDOW);
    let metric = params.metric.as_deref().unwrap_or(defaults.metric.as_str());
    PredictOptions::parse(context, window, metric).map_err(|e| ApiError::bad_request(e.to_string()))
}

/// Give the token at `position` the request's lemma and POS, as corpus
/// loading does.
fn label_target(sentence: Sentence, position: usize, target: &Target) -> Sentence {
    let mut tokens = sentence.into_tokens();
    if let Some(token) = tokens.get_mut(position) {
        *token = token
            .clone()
            .with_lemma(target.lemma.clone())
            .with_pos(target.pos.clone());
    }
    Sentence::new(tokens)
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("internal server error")]
    Internal,
}

impl ApiError {
    fn bad_request(msg: impl Into<String>) -> Self {
        ApiError::BadRequest(msg.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => {
                let body = Json(ErrorResponse { error: msg });
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            ApiError::Internal => {
                let body = Json(json!({ "error": "internal server error" }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}
