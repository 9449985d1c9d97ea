//! Axum route handlers for the article prompt API.

use axum::{extract::State, Json};
use serde_json::Value;

use crate::errors::AppError;
use crate::prompt::builder::{build_prompts_from_value, parse_input, ArticleInput, PromptBundle};
use crate::prompt::pipeline::{enhance_article, score_draft, EnhancedArticle, ScoredDraft};
use crate::state::AppState;

/// Bodies are taken as raw JSON so a missing or non-string `body_text`
/// comes back as our own validation error.
fn article_from(body: Value) -> Result<ArticleInput, AppError> {
    Ok(parse_input(body)?)
}

/// POST /api/v1/prompts/build
///
/// Returns summary, bullets and chunks for a raw article. No LLM call.
pub async fn handle_build_prompts(Json(body): Json<Value>) -> Result<Json<PromptBundle>, AppError> {
    Ok(Json(build_prompts_from_value(body)?))
}

/// POST /api/v1/articles/enhance
///
/// Rewrites every chunk of the article through the LLM.
pub async fn handle_enhance(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<EnhancedArticle>, AppError> {
    let input = article_from(body)?;
    let article = enhance_article(&input, state.llm.as_ref()).await?;
    Ok(Json(article))
}

/// POST /api/v1/articles/score
///
/// Scores a draft's fit for the magazine from its summary and bullets.
pub async fn handle_score(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<ScoredDraft>, AppError> {
    let input = article_from(body)?;
    let scored = score_draft(&input, state.llm.as_ref()).await?;
    Ok(Json(scored))
}
