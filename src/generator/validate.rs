use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::generator::{PromptMode, PromptRequest};
use crate::utils::text::word_count;

pub const CLASSIC_TARGET_WORDS: (usize, usize) = (30, 60);
pub const CLASSIC_HARD_WORDS: (usize, usize) = (20, 80);
pub const PRO_TARGET_WORDS: (usize, usize) = (150, 400);
pub const PRO_HARD_WORDS: (usize, usize) = (100, 500);

/// Rule-based validation report. Critical issues drive the bounded retry;
/// warnings are informational and never block delivery.
#[derive(Debug, Clone, Serialize)]
pub struct PromptValidation {
    pub valid: bool,
    pub critical: Vec<String>,
    pub warnings: Vec<String>,
}

static PRO_CAMERA_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\d+\s?mm|f/\d|\bdslr\b|\bbokeh\b|shallow depth of field|portrait lens|wide-angle lens")
        .expect("valid professional camera regex")
});

static PHONE_CAMERA_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)phone camera|phone photo|phone snapshot|camera phone|\biphone\b|\bselfie\b|\bsnapshot\b")
        .expect("valid phone camera regex")
});

// Prompts cut off by the token ceiling end in a connective, a dangling
// article, an unfinished list, or an ellipsis.
static TRUNCATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:\b(?:and|with|the|a|an|of|in|on|at|for|or|her|his)|,|-|–|—|\(|\.\.\.|…)$")
        .expect("valid truncation regex")
});

pub fn contains_professional_camera_vocabulary(text: &str) -> bool {
    PRO_CAMERA_RE.is_match(text)
}

pub fn contains_phone_camera_vocabulary(text: &str) -> bool {
    PHONE_CAMERA_RE.is_match(text)
}

pub fn looks_truncated(text: &str) -> bool {
    let trimmed = text.trim_end().trim_end_matches('.').trim_end();
    if trimmed.is_empty() {
        return false;
    }
    TRUNCATION_RE.is_match(trimmed)
}

pub fn validate_prompt(prompt: &str, request: &PromptRequest) -> PromptValidation {
    let mut critical = Vec::new();
    let mut warnings = Vec::new();

    let words = word_count(prompt);
    let ((hard_min, hard_max), (target_min, target_max)) = match request.mode {
        PromptMode::Classic => (CLASSIC_HARD_WORDS, CLASSIC_TARGET_WORDS),
        PromptMode::Pro => (PRO_HARD_WORDS, PRO_TARGET_WORDS),
    };
    if words < hard_min {
        critical.push(format!("word count {words} below hard floor {hard_min}"));
    } else if words > hard_max {
        critical.push(format!("word count {words} above hard ceiling {hard_max}"));
    } else if words < target_min || words > target_max {
        warnings.push(format!(
            "word count {words} outside target range {target_min}-{target_max}"
        ));
    }

    if request.mode == PromptMode::Classic {
        let trigger = request.trigger_word.trim();
        if !trigger.is_empty()
            && !prompt
                .trim_start()
                .to_lowercase()
                .starts_with(&trigger.to_lowercase())
        {
            critical.push(format!("prompt does not start with trigger word '{trigger}'"));
        }
    }

    if looks_truncated(prompt) {
        critical.push("prompt appears truncated".to_string());
    }

    if contains_professional_camera_vocabulary(prompt)
        && contains_phone_camera_vocabulary(prompt)
    {
        warnings.push("contradictory camera styles mentioned".to_string());
    }

    PromptValidation {
        valid: critical.is_empty(),
        critical,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classic_request() -> PromptRequest {
        PromptRequest {
            mode: PromptMode::Classic,
            concept_index: 0,
            brief: "test".to_string(),
            trigger_word: "ohwx".to_string(),
            temperature: 0.9,
            max_output_tokens: 256,
        }
    }

    fn words(count: usize) -> String {
        vec!["word"; count].join(" ")
    }

    #[test]
    fn word_count_bounds_split_critical_and_warning() {
        let request = classic_request();
        let short = validate_prompt(&format!("ohwx {}", words(10)), &request);
        assert!(!short.valid);
        assert!(short.critical[0].contains("below hard floor"));

        let low_target = validate_prompt(&format!("ohwx {}", words(24)), &request);
        assert!(low_target.valid);
        assert_eq!(low_target.warnings.len(), 1);

        let in_target = validate_prompt(&format!("ohwx {}", words(40)), &request);
        assert!(in_target.valid);
        assert!(in_target.warnings.is_empty());
    }

    #[test]
    fn missing_trigger_word_is_critical_for_classic() {
        let request = classic_request();
        let report = validate_prompt(&words(40), &request);
        assert!(report
            .critical
            .iter()
            .any(|issue| issue.contains("trigger word")));

        let mixed_case = validate_prompt(&format!("Ohwx {}", words(40)), &request);
        assert!(mixed_case.valid);
    }

    #[test]
    fn truncated_endings_are_detected() {
        assert!(looks_truncated("a woman wearing a"));
        assert!(looks_truncated("warm light, soft focus and"));
        assert!(looks_truncated("golden hour,"));
        assert!(looks_truncated("she walks toward the..."));
        assert!(!looks_truncated("a woman in a red dress."));
        assert!(!looks_truncated("shallow depth of field"));
    }

    #[test]
    fn contradictory_camera_styles_warn_but_do_not_block() {
        let request = classic_request();
        let prompt = format!("ohwx {} shot on an 85mm lens like an iphone photo", words(35));
        let report = validate_prompt(&prompt, &request);
        assert!(report.valid);
        assert!(report
            .warnings
            .iter()
            .any(|warning| warning.contains("contradictory")));
    }
}
