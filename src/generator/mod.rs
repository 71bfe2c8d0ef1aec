pub mod validate;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::config::{CLASSIC_SYSTEM_PROMPT, CONFIG, PRO_SYSTEM_PROMPT};
use crate::error::{EngineError, EngineResult};
use crate::events::{CoreEvent, EventSink};
use crate::llm::TextGenerator;
use crate::utils::text::{finalize_prompt_text, word_count};
use validate::{
    contains_phone_camera_vocabulary, contains_professional_camera_vocabulary, validate_prompt,
    PromptValidation,
};

/// Exactly one retry on critical validation failure; after that the result
/// is returned anyway, annotated with its report.
pub const MAX_GENERATION_RETRIES: usize = 1;

/// Concept slots 0..2 are styled as professional captures, slots 3 and up as
/// authentic phone captures.
pub const PRO_PHONE_SLOT_START: usize = 3;

const PRO_CAMERA_CLAUSE: &str = "shot on an 85mm lens at f/2.0 with shallow depth of field";
const PHONE_CAMERA_CLAUSE: &str = "candid phone camera photo with natural everyday depth";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptMode {
    /// Short comma-separated training-token prompts led by the trigger word.
    Classic,
    /// Long-form photorealistic prompts with an enforced camera register.
    Pro,
}

impl PromptMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "classic" => Some(PromptMode::Classic),
            "pro" => Some(PromptMode::Pro),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PromptRequest {
    pub mode: PromptMode,
    pub concept_index: usize,
    pub brief: String,
    pub trigger_word: String,
    pub temperature: f32,
    pub max_output_tokens: i32,
}

impl PromptRequest {
    pub fn from_config(mode: PromptMode, concept_index: usize, brief: &str) -> Self {
        let max_output_tokens = match mode {
            PromptMode::Classic => CONFIG.classic_max_output_tokens,
            PromptMode::Pro => CONFIG.pro_max_output_tokens,
        };
        PromptRequest {
            mode,
            concept_index,
            brief: brief.to_string(),
            trigger_word: CONFIG.trigger_word.clone(),
            temperature: CONFIG.gemini_temperature,
            max_output_tokens,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PromptResult {
    pub prompt: String,
    pub mode: PromptMode,
    pub word_count: usize,
    pub validation: PromptValidation,
}

static CODE_FENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```[a-z]*\n?|```").expect("valid code fence regex"));
static LABEL_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*(?:prompt|output)\s*:\s*").expect("valid label regex"));
static PRO_GEAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:shot on\s+)?(?:an?\s+)?\d+\s?mm[a-z\- ]*lens(?:\s+at\s+f/\d+(?:\.\d+)?)?|(?:an?\s+)?(?:portrait|wide-angle)\s+lens|(?:at\s+)?f/\d+(?:\.\d+)?|\bdslr\b|(?:with\s+)?(?:creamy\s+)?bokeh|shallow depth of field",
    )
    .expect("valid professional gear regex")
});
static PHONE_GEAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:casual\s+)?(?:phone camera photo|phone camera|phone photo|phone snapshot|camera phone|iphone(?:\s+\d+\s?\w*)?|selfie|snapshot)",
    )
    .expect("valid phone gear regex")
});

/// Strips model chrome (fences, labels, wrapping quotes) that would corrupt
/// an image prompt.
fn strip_model_chrome(raw: &str) -> String {
    let without_fences = CODE_FENCE_RE.replace_all(raw, " ");
    let without_label = LABEL_PREFIX_RE.replace(without_fences.trim(), "");
    without_label.trim().trim_matches('"').trim().to_string()
}

/// Classic mode requires the trigger word as the literal first word.
fn ensure_trigger_lead(prompt: &str, trigger_word: &str) -> String {
    let trigger = trigger_word.trim();
    if trigger.is_empty() {
        return prompt.to_string();
    }
    if prompt
        .trim_start()
        .to_lowercase()
        .starts_with(&trigger.to_lowercase())
    {
        return prompt.to_string();
    }
    format!("{trigger}, {prompt}")
}

/// Pro mode: the camera register is decided by the concept slot, not by the
/// model. Off-register gear phrases are removed and the required register is
/// appended when the model supplied none.
fn enforce_camera_vocabulary(prompt: &str, concept_index: usize) -> String {
    if concept_index < PRO_PHONE_SLOT_START {
        let cleaned = PHONE_GEAR_RE.replace_all(prompt, " ").to_string();
        if contains_professional_camera_vocabulary(&cleaned) {
            cleaned
        } else {
            format!("{cleaned}, {PRO_CAMERA_CLAUSE}")
        }
    } else {
        let cleaned = PRO_GEAR_RE.replace_all(prompt, " ").to_string();
        if contains_phone_camera_vocabulary(&cleaned) {
            cleaned
        } else {
            format!("{cleaned}, {PHONE_CAMERA_CLAUSE}")
        }
    }
}

/// Deterministic, non-generative corrections applied to every raw model
/// output before validation.
pub fn apply_mode_fixes(raw: &str, request: &PromptRequest) -> String {
    let mut prompt = strip_model_chrome(raw);
    prompt = match request.mode {
        PromptMode::Classic => ensure_trigger_lead(&prompt, &request.trigger_word),
        PromptMode::Pro => enforce_camera_vocabulary(&prompt, request.concept_index),
    };
    finalize_prompt_text(&prompt)
}

fn system_prompt_for(request: &PromptRequest) -> String {
    match request.mode {
        PromptMode::Classic => {
            CLASSIC_SYSTEM_PROMPT.replace("{trigger_word}", request.trigger_word.trim())
        }
        PromptMode::Pro => {
            let register = if request.concept_index < PRO_PHONE_SLOT_START {
                "professional camera gear (named lenses, apertures, depth of field)"
            } else {
                "casual phone capture (phone camera phrasing, natural depth, no lens talk)"
            };
            format!("{PRO_SYSTEM_PROMPT}\n\nCAMERA REGISTER FOR THIS CONCEPT: {register}.")
        }
    }
}

fn user_prompt_for(request: &PromptRequest, rejected: Option<&PromptValidation>) -> String {
    let mut prompt = format!(
        "Concept #{} brief: {}",
        request.concept_index + 1,
        request.brief.trim()
    );
    if let Some(validation) = rejected {
        prompt.push_str(&format!(
            "\n\nYour previous attempt was rejected: {}. Regenerate from scratch and respect every hard constraint.",
            validation.critical.join("; ")
        ));
    }
    prompt
}

/// REQUEST -> GENERATE -> FIX -> VALIDATE, with exactly one retry on
/// critical failure. The pipeline never drops output: a result that is
/// still invalid after the retry is returned with its report attached.
pub async fn generate_prompt_direct<G: TextGenerator>(
    generator: &G,
    request: &PromptRequest,
    sink: &dyn EventSink,
) -> EngineResult<PromptResult> {
    let system_prompt = system_prompt_for(request);
    let mut rejected: Option<PromptValidation> = None;

    for attempt in 0..=MAX_GENERATION_RETRIES {
        let user_prompt = user_prompt_for(request, rejected.as_ref());
        let raw = generator
            .generate(
                &system_prompt,
                &user_prompt,
                request.temperature,
                request.max_output_tokens,
            )
            .await
            .map_err(EngineError::Generation)?;

        let fixed = apply_mode_fixes(&raw, request);
        let validation = validate_prompt(&fixed, request);
        let result = PromptResult {
            word_count: word_count(&fixed),
            prompt: fixed,
            mode: request.mode,
            validation,
        };

        if result.validation.valid {
            return Ok(result);
        }
        if attempt < MAX_GENERATION_RETRIES {
            sink.emit(CoreEvent::RetryingGeneration {
                attempt,
                critical: result.validation.critical.clone(),
            });
            rejected = Some(result.validation.clone());
            continue;
        }
        sink.emit(CoreEvent::ReturningInvalid {
            critical: result.validation.critical.clone(),
        });
        return Ok(result);
    }

    unreachable!("bounded generation loop always returns");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::test_support::RecordingSink;
    use crate::events::TracingSink;
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedGenerator {
        responses: Mutex<VecDeque<String>>,
        calls: AtomicUsize,
    }

    impl ScriptedGenerator {
        fn new(responses: &[&str]) -> Self {
            ScriptedGenerator {
                responses: Mutex::new(responses.iter().map(|s| s.to_string()).collect()),
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl TextGenerator for ScriptedGenerator {
        async fn generate(
            &self,
            _system_prompt: &str,
            _user_prompt: &str,
            _temperature: f32,
            _max_output_tokens: i32,
        ) -> anyhow::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.responses.lock().pop_front().unwrap_or_default())
        }
    }

    fn classic_request() -> PromptRequest {
        PromptRequest {
            mode: PromptMode::Classic,
            concept_index: 0,
            brief: "urban rooftop look".to_string(),
            trigger_word: "ohwx".to_string(),
            temperature: 0.9,
            max_output_tokens: 256,
        }
    }

    fn pro_request(concept_index: usize) -> PromptRequest {
        PromptRequest {
            mode: PromptMode::Pro,
            concept_index,
            brief: "urban rooftop look".to_string(),
            trigger_word: String::new(),
            temperature: 0.9,
            max_output_tokens: 1024,
        }
    }

    const CLASSIC_BODY: &str = "elegant black silk slip dress, standing on a rooftop terrace at dusk, warm golden hour light, one hand resting on the railing, looking over her shoulder, medium shot, natural framing, relaxed confident posture, soft evening glow over the skyline";

    fn pro_body(extra: &str) -> String {
        let filler = "She stands on a rooftop terrace in an emerald silk slip dress as the evening settles over the skyline, the city lights flickering on one block at a time while warm air moves through her hair. ".repeat(4);
        format!("{filler}{extra}")
    }

    #[tokio::test]
    async fn classic_output_gets_trigger_word_prepended() {
        let generator = ScriptedGenerator::new(&[CLASSIC_BODY]);
        let result = generate_prompt_direct(&generator, &classic_request(), &TracingSink)
            .await
            .unwrap();
        assert!(result.prompt.to_lowercase().starts_with("ohwx"));
        assert!(result.validation.valid, "issues: {:?}", result.validation);
        assert_eq!(generator.call_count(), 1);
    }

    #[tokio::test]
    async fn critical_failure_retries_exactly_once_then_returns_annotated() {
        let generator = ScriptedGenerator::new(&["too short", "still short"]);
        let sink = RecordingSink::default();
        let result = generate_prompt_direct(&generator, &classic_request(), &sink)
            .await
            .unwrap();

        assert_eq!(generator.call_count(), 2);
        assert!(!result.validation.valid);
        assert!(!result.validation.critical.is_empty());
        // Output is still delivered, never dropped.
        assert!(!result.prompt.is_empty());

        let events = sink.events.lock();
        assert!(matches!(events[0], CoreEvent::RetryingGeneration { attempt: 0, .. }));
        assert!(matches!(events[1], CoreEvent::ReturningInvalid { .. }));
    }

    #[tokio::test]
    async fn retry_recovers_when_second_attempt_is_valid() {
        let generator = ScriptedGenerator::new(&["too short", CLASSIC_BODY]);
        let sink = RecordingSink::default();
        let result = generate_prompt_direct(&generator, &classic_request(), &sink)
            .await
            .unwrap();

        assert_eq!(generator.call_count(), 2);
        assert!(result.validation.valid);
        assert_eq!(sink.events.lock().len(), 1);
    }

    #[tokio::test]
    async fn early_pro_slots_are_forced_into_professional_vocabulary() {
        let body = pro_body("It reads like a casual phone photo with everyday charm.");
        let generator = ScriptedGenerator::new(&[body.as_str()]);
        let result = generate_prompt_direct(&generator, &pro_request(0), &TracingSink)
            .await
            .unwrap();

        assert!(contains_professional_camera_vocabulary(&result.prompt));
        assert!(!contains_phone_camera_vocabulary(&result.prompt));
    }

    #[tokio::test]
    async fn late_pro_slots_are_forced_into_phone_vocabulary() {
        let body = pro_body("Shot on an 85mm lens at f/1.8 with creamy bokeh.");
        let generator = ScriptedGenerator::new(&[body.as_str()]);
        let result = generate_prompt_direct(&generator, &pro_request(3), &TracingSink)
            .await
            .unwrap();

        assert!(contains_phone_camera_vocabulary(&result.prompt));
        assert!(!contains_professional_camera_vocabulary(&result.prompt));
    }

    #[tokio::test]
    async fn late_pro_slots_strip_lens_phrases_without_focal_lengths() {
        // Named lens types carry no digits, so they must be stripped on
        // their own, not only as part of an "Nmm lens" phrase.
        let body = pro_body("She is captured with a wide-angle lens for drama.");
        let generator = ScriptedGenerator::new(&[body.as_str()]);
        let result = generate_prompt_direct(&generator, &pro_request(3), &TracingSink)
            .await
            .unwrap();

        assert!(
            !contains_professional_camera_vocabulary(&result.prompt),
            "professional vocabulary survived: {}",
            result.prompt
        );
        assert!(contains_phone_camera_vocabulary(&result.prompt));
    }

    #[test]
    fn strip_model_chrome_removes_fences_labels_and_quotes() {
        let raw = "```\nPrompt: \"ohwx, red dress in a park\"\n```";
        assert_eq!(strip_model_chrome(raw), "ohwx, red dress in a park");
    }

    #[test]
    fn fixes_detect_truncated_model_output() {
        let request = classic_request();
        let fixed = apply_mode_fixes("ohwx, a woman wearing a", &request);
        let report = validate_prompt(&fixed, &request);
        assert!(report
            .critical
            .iter()
            .any(|issue| issue.contains("truncated")));
    }
}
