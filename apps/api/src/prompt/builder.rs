//! Prompt Builder — turns raw scraped article text into the bundle every
//! downstream LLM prompt is assembled from: an extractive summary, exactly
//! three highlight bullets and word-bounded content chunks.
//!
//! Pure string heuristics. No LLM calls, no I/O, no logging; the same input
//! always yields the same bundle.

use std::collections::VecDeque;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

// ────────────────────────────────────────────────────────────────────────────
// Limits
// ────────────────────────────────────────────────────────────────────────────

/// Soft lower bound on words per chunk, restored by the tail pass.
pub const MIN_WORDS: usize = 900;
/// Hard upper bound on words per chunk, except for a merged tail.
pub const MAX_WORDS: usize = 1400;
/// How far a merged tail chunk may run past `MAX_WORDS`.
pub const TAIL_OVERFLOW_WORDS: usize = MAX_WORDS / 10;

const MIN_SENTENCES: usize = 5;
const FALLBACK_SENTENCE_WORDS: usize = 30;

const SUMMARY_LEAD_SENTENCES: usize = 5;
const SUMMARY_SOFT_MIN_CHARS: usize = 450;
const SUMMARY_TARGET_CHARS: usize = 500;
const SUMMARY_MAX_CHARS: usize = 600;

pub const BULLET_COUNT: usize = 3;
pub const BULLET_MAX_CHARS: usize = 120;
const BULLET_MIN_WINDOW: usize = 20;
const BULLET_MAX_WINDOW: usize = 80;

const ELLIPSIS: char = '…';
const QUOTES: &[char] = &['"', '\'', '“', '”', '‘', '’', '«', '»', '„', '`'];

/// Sentence end followed by whitespace and an upper-case letter (Æ/Ø/Å included).
static SENTENCE_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s+\p{Lu}").expect("sentence boundary regex"));
static DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{2,}").expect("digit run regex"));
static CAPITALIZED_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\p{Lu}\p{Ll}+\s+\p{Lu}\p{Ll}+").expect("capitalized pair regex")
});
static TRAILING_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s.,;:—–-]+$").expect("trailing punctuation regex"));

// ────────────────────────────────────────────────────────────────────────────
// Input / output
// ────────────────────────────────────────────────────────────────────────────

/// Raw article as handed over by the ingestion pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleInput {
    #[serde(default)]
    pub title: Option<String>,
    pub body_text: String,
}

/// Everything a prompt needs from one article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptBundle {
    pub summary: String,
    pub bullets: Vec<String>,
    pub chunks: Vec<String>,
}

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid article input: {0}")]
    InvalidInput(String),
}

/// Validates an untyped request body: `body_text` must be a string,
/// `title` may be a string, null or absent.
pub fn parse_input(value: Value) -> Result<ArticleInput, BuildError> {
    serde_json::from_value(value).map_err(|e| BuildError::InvalidInput(e.to_string()))
}

/// Builds the summary, bullets and chunks for one article.
pub fn build_prompts(input: &ArticleInput) -> PromptBundle {
    let sentences = split_sentences(&input.body_text);
    let words: Vec<&str> = input.body_text.split_whitespace().collect();

    let title = input.title.as_deref().map(str::trim).filter(|t| !t.is_empty());
    let summary = summarize(title, &sentences);
    let bullets = select_bullets(&sentences, &words);
    let chunks = chunk_sentences(sentences);

    PromptBundle {
        summary,
        bullets,
        chunks,
    }
}

/// Validates and builds in one step.
pub fn build_prompts_from_value(value: Value) -> Result<PromptBundle, BuildError> {
    let input = parse_input(value)?;
    Ok(build_prompts(&input))
}

// ────────────────────────────────────────────────────────────────────────────
// Sentences
// ────────────────────────────────────────────────────────────────────────────

/// Splits text into sentences on `[.!?]` + whitespace + capital letter.
///
/// Input with fewer than five such sentences (keyword dumps, text without
/// punctuation) is re-cut into 30-word pseudo-sentences instead.
pub fn split_sentences(text: &str) -> Vec<String> {
    let clean = collapse_whitespace(text);

    let mut sentences = Vec::new();
    let mut start = 0;
    for boundary in SENTENCE_BOUNDARY.find_iter(&clean) {
        // The capital letter opens the next sentence; the punctuation is one byte.
        let capital = boundary
            .as_str()
            .char_indices()
            .last()
            .map(|(offset, _)| offset)
            .unwrap_or(0);
        push_nonempty(&mut sentences, &clean[start..boundary.start() + 1]);
        start = boundary.start() + capital;
    }
    push_nonempty(&mut sentences, &clean[start..]);

    if sentences.len() >= MIN_SENTENCES {
        return sentences;
    }

    let words: Vec<&str> = clean.split_whitespace().collect();
    words
        .chunks(FALLBACK_SENTENCE_WORDS)
        .map(|window| window.join(" "))
        .collect()
}

fn push_nonempty(sentences: &mut Vec<String>, candidate: &str) {
    let candidate = candidate.trim();
    if !candidate.is_empty() {
        sentences.push(candidate.to_string());
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Summary
// ────────────────────────────────────────────────────────────────────────────

/// Extractive summary: the lead sentences, topped up toward 500 characters
/// when short, prefixed with the title and hard-capped at 600 characters.
pub fn summarize(title: Option<&str>, sentences: &[String]) -> String {
    let lead = sentences.len().min(SUMMARY_LEAD_SENTENCES);
    let mut summary = sentences[..lead].join(" ");

    if char_len(&summary) < SUMMARY_SOFT_MIN_CHARS {
        for sentence in &sentences[lead..] {
            if char_len(&summary) >= SUMMARY_TARGET_CHARS {
                break;
            }
            if !summary.is_empty() {
                summary.push(' ');
            }
            summary.push_str(sentence);
        }
    }

    if let Some(title) = title {
        summary = format!("{title}. {summary}");
    }
    let summary = summary.trim_end();

    if char_len(summary) > SUMMARY_MAX_CHARS {
        let mut capped: String = summary.chars().take(SUMMARY_MAX_CHARS - 3).collect();
        capped.push(ELLIPSIS);
        return capped;
    }
    summary.to_string()
}

// ────────────────────────────────────────────────────────────────────────────
// Bullets
// ────────────────────────────────────────────────────────────────────────────

/// Salience score: numbers and dates weigh most, then named entities and length.
fn bullet_score(sentence: &str) -> u32 {
    let mut score = 0;
    if DIGIT_RUN.is_match(sentence) {
        score += 2;
    }
    if CAPITALIZED_PAIR.is_match(sentence) {
        score += 1;
    }
    if char_len(sentence) > 90 {
        score += 1;
    }
    score
}

/// Up to `max` distinct sentences, highest score first, earlier sentence on ties.
/// Back-fills from sentence order when the top picks collide.
pub fn pick_bullet_candidates(sentences: &[String], max: usize) -> Vec<String> {
    let mut scored: Vec<(u32, &String)> = sentences.iter().map(|s| (bullet_score(s), s)).collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    let mut picked: Vec<String> = Vec::with_capacity(max);
    for (_, sentence) in scored.into_iter().take(max) {
        if !picked.contains(sentence) {
            picked.push(sentence.clone());
        }
    }

    for sentence in sentences {
        if picked.len() >= max {
            break;
        }
        if !picked.contains(sentence) {
            picked.push(sentence.clone());
        }
    }

    picked
}

/// Three contiguous word windows of `clamp(words / 3, 20, 80)` words each.
fn synthesize_bullets(words: &[&str]) -> Vec<String> {
    let window = (words.len() / BULLET_COUNT).clamp(BULLET_MIN_WINDOW, BULLET_MAX_WINDOW);
    (0..BULLET_COUNT)
        .map(|i| {
            let start = (i * window).min(words.len());
            let end = ((i + 1) * window).min(words.len());
            words[start..end].join(" ")
        })
        .collect()
}

/// Exactly `BULLET_COUNT` normalized bullets, whatever the input looks like.
pub fn select_bullets(sentences: &[String], words: &[&str]) -> Vec<String> {
    let mut candidates = pick_bullet_candidates(sentences, BULLET_COUNT);
    if candidates.len() < BULLET_COUNT {
        candidates = synthesize_bullets(words);
    }
    candidates.iter().map(|c| normalize_bullet(c)).collect()
}

/// Collapses whitespace, strips wrapping quotes, caps at 120 characters and
/// drops trailing punctuation and dashes.
pub fn normalize_bullet(text: &str) -> String {
    let collapsed = collapse_whitespace(text);
    let unquoted = collapsed.trim_matches(QUOTES).trim();

    let bounded = if char_len(unquoted) > BULLET_MAX_CHARS {
        let head: String = unquoted.chars().take(BULLET_MAX_CHARS - 3).collect();
        format!("{}{ELLIPSIS}", head.trim_end())
    } else {
        unquoted.to_string()
    };

    TRAILING_PUNCTUATION.replace(&bounded, "").into_owned()
}

// ────────────────────────────────────────────────────────────────────────────
// Chunks
// ────────────────────────────────────────────────────────────────────────────

/// Sentence fragments, as word slices, accumulated toward the current chunk.
#[derive(Debug, Default)]
struct ChunkBuffer<'a> {
    sentences: Vec<&'a [&'a str]>,
    word_count: usize,
}

impl<'a> ChunkBuffer<'a> {
    fn push(&mut self, fragment: &'a [&'a str]) {
        self.sentences.push(fragment);
        self.word_count += fragment.len();
    }

    /// Emits the buffered sentences as one chunk and resets the buffer.
    fn flush(&mut self, chunks: &mut Vec<String>) {
        if !self.sentences.is_empty() {
            chunks.push(self.sentences.concat().join(" "));
        }
        self.sentences.clear();
        self.word_count = 0;
    }
}

/// Greedy word-bounded chunking over a FIFO queue of sentence fragments.
///
/// 1. A sentence that fits under `MAX_WORDS` joins the buffer.
/// 2. On overflow with at least `MIN_WORDS` buffered, the buffer is flushed
///    and the sentence retried against the empty buffer.
/// 3. On overflow with less than `MIN_WORDS` buffered (including an empty
///    buffer facing an oversized sentence), the sentence's head fills the
///    buffer to exactly `MAX_WORDS`, the buffer is flushed and the remaining
///    words go back to the front of the queue.
///
/// Every sentence is tokenized once; fragments are sub-slices of those word
/// lists, so a sentence of any length is cut in linear time.
///
/// Only the final boundary is revisited afterwards, see
/// [`merge_or_redistribute_tail`].
pub fn chunk_sentences(sentences: Vec<String>) -> Vec<String> {
    let tokenized: Vec<Vec<&str>> = sentences
        .iter()
        .map(|s| s.split_whitespace().collect())
        .collect();
    let mut queue: VecDeque<&[&str]> = tokenized
        .iter()
        .map(Vec::as_slice)
        .filter(|words| !words.is_empty())
        .collect();
    let mut buffer = ChunkBuffer::default();
    let mut chunks = Vec::new();

    while let Some(fragment) = queue.pop_front() {
        if buffer.word_count + fragment.len() <= MAX_WORDS {
            buffer.push(fragment);
            continue;
        }

        if buffer.word_count >= MIN_WORDS {
            buffer.flush(&mut chunks);
            queue.push_front(fragment);
            continue;
        }

        let (head, rest) = fragment.split_at(MAX_WORDS - buffer.word_count);
        buffer.push(head);
        buffer.flush(&mut chunks);
        queue.push_front(rest);
    }
    buffer.flush(&mut chunks);

    merge_or_redistribute_tail(chunks)
}

/// Repairs an undersized final chunk.
///
/// Merges it into the previous chunk when the result stays within
/// `MAX_WORDS`. Otherwise words move one at a time from the end of the
/// previous chunk to the front of the last until the last reaches
/// `MIN_WORDS` or the previous would drop below it. A tail still short
/// after that is merged back only if the merge stays within
/// `MAX_WORDS + TAIL_OVERFLOW_WORDS`.
pub fn merge_or_redistribute_tail(mut chunks: Vec<String>) -> Vec<String> {
    if chunks.len() < 2 || chunks.last().map(|c| word_count(c)).unwrap_or(0) >= MIN_WORDS {
        return chunks;
    }
    let (Some(last), Some(prev)) = (chunks.pop(), chunks.pop()) else {
        return chunks;
    };

    let mut prev_words: Vec<&str> = prev.split_whitespace().collect();
    let mut tail: VecDeque<&str> = last.split_whitespace().collect();

    if prev_words.len() + tail.len() <= MAX_WORDS {
        prev_words.extend(tail);
        chunks.push(prev_words.join(" "));
        return chunks;
    }

    while tail.len() < MIN_WORDS && prev_words.len() > MIN_WORDS {
        match prev_words.pop() {
            Some(word) => tail.push_front(word),
            None => break,
        }
    }

    if tail.len() < MIN_WORDS && prev_words.len() + tail.len() <= MAX_WORDS + TAIL_OVERFLOW_WORDS {
        prev_words.extend(tail);
        chunks.push(prev_words.join(" "));
        return chunks;
    }

    chunks.push(prev_words.join(" "));
    chunks.push(Vec::from(tail).join(" "));
    chunks
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
