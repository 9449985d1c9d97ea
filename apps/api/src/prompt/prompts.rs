// Article pipeline prompt templates.
// Templates carry `{placeholder}` markers replaced by `render`.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::llm_client::prompts::{EDITORIAL_VOICE, JSON_ONLY_SYSTEM};
use crate::prompt::builder::PromptBundle;

pub fn enhance_system() -> String {
    format!(
        "You are a senior magazine editor rewriting scraped news copy. {EDITORIAL_VOICE} \
         Return only the rewritten section text, no headings or commentary."
    )
}

/// Per-chunk rewrite prompt. Replace `{title}`, `{summary}`, `{bullets}`,
/// `{index}`, `{total}` and `{chunk}` before sending.
pub const ENHANCE_PROMPT_TEMPLATE: &str = r#"Rewrite section {index} of {total} of the article below as polished magazine copy.

TITLE:
{title}

ARTICLE SUMMARY:
{summary}

KEY POINTS:
{bullets}

SECTION {index} SOURCE TEXT:
{chunk}

Keep the section roughly the same length. Do not repeat material that belongs to other sections."#;

pub fn score_system() -> String {
    format!("You are an editor-in-chief triaging story leads. {EDITORIAL_VOICE} {JSON_ONLY_SYSTEM}")
}

/// Draft scoring prompt. Replace `{title}`, `{summary}` and `{bullets}` before sending.
pub const SCORE_PROMPT_TEMPLATE: &str = r#"Score how well the following draft fits the magazine.

TITLE:
{title}

SUMMARY:
{summary}

KEY POINTS:
{bullets}

Return a JSON object with this EXACT schema:
{
  "score": 0-100,
  "reasons": ["short reason", "..."],
  "suggested_angle": "one sentence"
}"#;

/// Renders bullets as a dash list for prompt templates.
pub fn bullet_list(bundle: &PromptBundle) -> String {
    bundle
        .bullets
        .iter()
        .filter(|b| !b.is_empty())
        .map(|b| format!("- {b}"))
        .collect::<Vec<_>>()
        .join("\n")
}

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(\w+)\}").expect("placeholder regex"));

/// Fills `{key}` markers in `template` in a single pass. Markers inside the
/// substituted values are left alone; unknown keys stay as written.
pub fn render(template: &str, values: &[(&str, &str)]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            values
                .iter()
                .find(|(key, _)| *key == &caps[1])
                .map(|(_, value)| value.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_replaces_every_occurrence() {
        let out = render("{a} og {b}, igen {a}", &[("a", "x"), ("b", "y")]);
        assert_eq!(out, "x og y, igen x");
    }

    #[test]
    fn test_render_leaves_markers_inside_values() {
        let out = render(
            "T: {title}\nC: {chunk}",
            &[("title", "Guide til {chunk} i skabeloner"), ("chunk", "BRØDTEKST")],
        );
        assert_eq!(out, "T: Guide til {chunk} i skabeloner\nC: BRØDTEKST");
    }

    #[test]
    fn test_render_keeps_unknown_markers() {
        let out = render("{kendt} og {ukendt}", &[("kendt", "x")]);
        assert_eq!(out, "x og {ukendt}");
    }

    #[test]
    fn test_bullet_list_skips_empty() {
        let bundle = PromptBundle {
            summary: String::new(),
            bullets: vec!["Et".into(), String::new(), "To".into()],
            chunks: vec![],
        };
        assert_eq!(bullet_list(&bundle), "- Et\n- To");
    }

    #[test]
    fn test_score_system_demands_json() {
        assert!(score_system().contains("valid JSON only"));
    }
}
