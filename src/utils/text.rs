use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));
static SPACE_BEFORE_PUNCT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+([,.;])").expect("valid punctuation regex"));
static REPEATED_COMMA_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",\s*,+").expect("valid comma regex"));
static REPEATED_PERIOD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.\s*\.+").expect("valid period regex"));

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Collapses whitespace runs, removes space before punctuation and repeated
/// separators. Used on every assembled prompt before it leaves the engine.
pub fn normalize_prompt_text(text: &str) -> String {
    let collapsed = WHITESPACE_RE.replace_all(text, " ");
    let no_space_punct = SPACE_BEFORE_PUNCT_RE.replace_all(&collapsed, "$1");
    let single_commas = REPEATED_COMMA_RE.replace_all(&no_space_punct, ",");
    let single_periods = REPEATED_PERIOD_RE.replace_all(&single_commas, ".");
    single_periods.trim().trim_matches(',').trim().to_string()
}

/// Normalizes and guarantees exactly one terminal period.
pub fn finalize_prompt_text(text: &str) -> String {
    let mut normalized = normalize_prompt_text(text);
    while normalized.ends_with('.') || normalized.ends_with(',') {
        normalized.pop();
        normalized = normalized.trim_end().to_string();
    }
    if normalized.is_empty() {
        return normalized;
    }
    format!("{normalized}.")
}

pub fn truncate_for_log(value: &str, limit: usize) -> String {
    if value.chars().count() <= limit {
        return value.to_string();
    }
    let truncated: String = value.chars().take(limit).collect();
    format!("{truncated}... (truncated)")
}
