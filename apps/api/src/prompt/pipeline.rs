//! Article pipeline — builds the prompt bundle for an article and runs the
//! LLM passes over it: per-chunk enhancement and draft scoring.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::AppError;
use crate::llm_client::{complete_json, ChatModel};
use crate::prompt::builder::{build_prompts, ArticleInput, PromptBundle};
use crate::prompt::prompts::{
    bullet_list, enhance_system, render, score_system, ENHANCE_PROMPT_TEMPLATE,
    SCORE_PROMPT_TEMPLATE,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnhancedSection {
    pub index: usize,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnhancedArticle {
    pub summary: String,
    pub bullets: Vec<String>,
    pub sections: Vec<EnhancedSection>,
    pub model: String,
}

/// Score returned by the model, clamped to 0–100. Fractional and negative
/// replies are accepted before clamping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftScore {
    pub score: f64,
    #[serde(default)]
    pub reasons: Vec<String>,
    #[serde(default)]
    pub suggested_angle: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredDraft {
    pub summary: String,
    pub bullets: Vec<String>,
    pub score: DraftScore,
    pub model: String,
}

fn bundle_for(input: &ArticleInput) -> PromptBundle {
    let bundle = build_prompts(input);
    debug!(
        "Built prompt bundle: summary_chars={}, chunks={}",
        bundle.summary.chars().count(),
        bundle.chunks.len()
    );
    bundle
}

fn title_of(input: &ArticleInput) -> &str {
    input
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or("(uden titel)")
}

/// Rewrites each chunk in order, one LLM call per chunk.
pub async fn enhance_article(
    input: &ArticleInput,
    llm: &dyn ChatModel,
) -> Result<EnhancedArticle, AppError> {
    let bundle = bundle_for(input);
    if bundle.chunks.is_empty() {
        return Err(AppError::Validation(
            "body_text has no content to enhance".to_string(),
        ));
    }

    let system = enhance_system();
    let bullets = bullet_list(&bundle);
    let total = bundle.chunks.len().to_string();
    let mut sections = Vec::with_capacity(bundle.chunks.len());

    for (i, chunk) in bundle.chunks.iter().enumerate() {
        let index = (i + 1).to_string();
        let prompt = render(
            ENHANCE_PROMPT_TEMPLATE,
            &[
                ("title", title_of(input)),
                ("summary", bundle.summary.as_str()),
                ("bullets", bullets.as_str()),
                ("index", index.as_str()),
                ("total", total.as_str()),
                ("chunk", chunk.as_str()),
            ],
        );
        let text = llm
            .complete(&prompt, &system)
            .await
            .map_err(|e| AppError::Llm(format!("Enhancing section {index}/{total} failed: {e}")))?;
        sections.push(EnhancedSection {
            index: i + 1,
            text: text.trim().to_string(),
        });
    }

    info!("Enhanced article in {} sections", sections.len());

    Ok(EnhancedArticle {
        summary: bundle.summary,
        bullets: bundle.bullets,
        sections,
        model: llm.model().to_string(),
    })
}

/// Asks the model how well the draft fits the magazine.
pub async fn score_draft(
    input: &ArticleInput,
    llm: &dyn ChatModel,
) -> Result<ScoredDraft, AppError> {
    let bundle = bundle_for(input);
    let bullets = bullet_list(&bundle);
    let prompt = render(
        SCORE_PROMPT_TEMPLATE,
        &[
            ("title", title_of(input)),
            ("summary", bundle.summary.as_str()),
            ("bullets", bullets.as_str()),
        ],
    );

    let mut score: DraftScore = complete_json(llm, &prompt, &score_system())
        .await
        .map_err(|e| AppError::Llm(format!("Draft scoring failed: {e}")))?;
    score.score = score.score.clamp(0.0, 100.0);

    Ok(ScoredDraft {
        summary: bundle.summary,
        bullets: bundle.bullets,
        score,
        model: llm.model().to_string(),
    })
}
