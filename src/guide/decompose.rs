use once_cell::sync::Lazy;
use regex::Regex;

use crate::events::{CoreEvent, EventSink};

/// Semantic fields recovered from a free-form guide prompt. Extraction never
/// fails the request; an unrecovered field stays `None` and downstream
/// consumers omit it rather than substitute placeholder text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuidePromptElements {
    pub outfit: Option<String>,
    pub lighting: Option<String>,
    pub location: Option<String>,
    pub camera_specs: Option<String>,
    pub mood: Option<String>,
    /// True when any field was recovered by its cascade's last-resort
    /// heuristic; callers can log or down-rank such decompositions.
    pub weakest_heuristic: bool,
}

/// One step of an extraction cascade. Extractors are pure string functions
/// evaluated in order of decreasing specificity with explicit fallthrough.
struct Extractor {
    name: &'static str,
    last_resort: bool,
    apply: fn(&str) -> Option<String>,
}

fn run_cascade(
    field: &str,
    text: &str,
    cascade: &[Extractor],
    sink: &dyn EventSink,
) -> (Option<String>, bool) {
    for extractor in cascade {
        if let Some(value) = (extractor.apply)(text) {
            let trimmed = value.trim().trim_matches(',').trim().to_string();
            if trimmed.is_empty() {
                continue;
            }
            if extractor.last_resort {
                sink.emit(CoreEvent::WeakestHeuristic {
                    field: field.to_string(),
                    extractor: extractor.name.to_string(),
                });
            }
            return (Some(trimmed), extractor.last_resort);
        }
    }
    sink.emit(CoreEvent::ExtractionMiss {
        field: field.to_string(),
    });
    (None, false)
}

fn segments(text: &str) -> Vec<&str> {
    text.split(|c| matches!(c, ',' | '.' | ';' | '\n'))
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect()
}

fn sentences(text: &str) -> Vec<&str> {
    text.split(|c| matches!(c, '.' | ';' | '\n'))
        .map(str::trim)
        .filter(|sentence| !sentence.is_empty())
        .collect()
}

// --- outfit cascade -------------------------------------------------------

static GARMENT_FABRIC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:wearing|dressed in|in)\s+((?:a |an |the )?[^,.;]*\b(?:silk|satin|linen|leather|denim|cotton|wool|velvet|chiffon|lace|cashmere|knit|ribbed|tweed)\b[^,.;]*\b(?:dress|suit|blazer|skirt|gown|jacket|blouse|top|sweater|turtleneck|coat|jumpsuit|bodysuit|trousers|pants|shirt|set)\b[^,.;]*)",
    )
    .expect("valid garment+fabric regex")
});

static WEARING_CLAUSE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:wearing|dressed in)\s+((?:a |an |the )?[^.;]+)")
        .expect("valid wearing clause regex")
});

const CLOTHING_KEYWORDS: &[&str] = &[
    "dress", "outfit", "suit", "blazer", "jeans", "skirt", "blouse", "sweater", "jacket",
    "heels", "boots", "sneakers", "gown", "coat", "turtleneck", "jumpsuit", "bodysuit",
    "leggings", "hoodie", "trousers",
];

fn extract_garment_with_fabric(text: &str) -> Option<String> {
    GARMENT_FABRIC_RE
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|group| group.as_str().to_string())
}

fn extract_wearing_clause(text: &str) -> Option<String> {
    let clause = WEARING_CLAUSE_RE
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|group| group.as_str())?;
    // The clause runs to the end of the sentence; keep the first comma
    // segment plus any continuation that still talks about clothing, so
    // trailing scene description does not leak into the outfit.
    let mut parts = clause.split(',').map(str::trim);
    let mut kept = vec![parts.next()?];
    for part in parts {
        let lower = part.to_lowercase();
        if CLOTHING_KEYWORDS
            .iter()
            .any(|keyword| lower.contains(keyword))
        {
            kept.push(part);
        } else {
            break;
        }
    }
    Some(kept.join(", "))
}

fn extract_clothing_sentence(text: &str) -> Option<String> {
    sentences(text)
        .into_iter()
        .find(|sentence| {
            let lower = sentence.to_lowercase();
            CLOTHING_KEYWORDS
                .iter()
                .any(|keyword| lower.contains(keyword))
        })
        .map(str::to_string)
}

fn extract_first_sentence(text: &str) -> Option<String> {
    sentences(text).first().map(|sentence| sentence.to_string())
}

const OUTFIT_CASCADE: &[Extractor] = &[
    Extractor {
        name: "garment_with_fabric",
        last_resort: false,
        apply: extract_garment_with_fabric,
    },
    Extractor {
        name: "wearing_clause",
        last_resort: false,
        apply: extract_wearing_clause,
    },
    Extractor {
        name: "clothing_sentence",
        last_resort: false,
        apply: extract_clothing_sentence,
    },
    Extractor {
        name: "first_sentence",
        last_resort: true,
        apply: extract_first_sentence,
    },
];

// --- lighting cascade -----------------------------------------------------

const NAMED_LIGHTING: &[&str] = &[
    "golden hour",
    "blue hour",
    "neon",
    "softbox",
    "window light",
    "natural light",
    "overcast",
    "backlit",
    "backlight",
    "candlelight",
    "rim light",
    "diffused light",
    "morning light",
    "sunset light",
    "studio light",
];

fn extract_named_lighting(text: &str) -> Option<String> {
    segments(text)
        .into_iter()
        .find(|segment| {
            let lower = segment.to_lowercase();
            NAMED_LIGHTING.iter().any(|keyword| lower.contains(keyword))
        })
        .map(str::to_string)
}

fn extract_generic_lighting(text: &str) -> Option<String> {
    segments(text)
        .into_iter()
        .find(|segment| {
            let lower = segment.to_lowercase();
            lower.contains("light") || lower.contains(" lit") || lower.starts_with("lit ")
        })
        .map(str::to_string)
}

const LIGHTING_CASCADE: &[Extractor] = &[
    Extractor {
        name: "named_lighting",
        last_resort: false,
        apply: extract_named_lighting,
    },
    Extractor {
        name: "generic_lighting_keyword",
        last_resort: true,
        apply: extract_generic_lighting,
    },
];

// --- location (composite include/exclude) ---------------------------------

const LOCATION_KEYWORDS: &[&str] = &[
    "street", "cafe", "café", "beach", "rooftop", "park", "studio", "city", "restaurant",
    "hotel", "garden", "bedroom", "kitchen", "balcony", "downtown", "loft", "office", "gym",
    "pool", "pier", "alley", "terrace", "market", "bridge", "forest", "mountain", "museum",
    "bar", "boat", "marina", "promenade", "apartment", "library", "staircase",
];

/// Pose and expression vocabulary that routinely co-occurs with `on`/`in`
/// phrases and produces location false positives ("hands on hips", "lost in
/// thought"). A segment carrying any of these is never a location, even if a
/// single-keyword test would accept it.
const LOCATION_EXCLUDE_KEYWORDS: &[&str] = &[
    "posing", "pose", "expression", "smile", "smiling", "laughing", "gaze", "gazing",
    "looking", "hands on", "arms crossed", "mid-stride", "eyes", "hair",
];

/// Leading pose verbs are stripped so "standing on a rooftop terrace" still
/// yields the place rather than being discarded with the pose.
const LOCATION_LEADING_POSE_VERBS: &[&str] = &[
    "standing", "sitting", "leaning", "walking", "strolling", "lying", "perched", "lounging",
];

static LOCATION_PREPOSITION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:in|at|on)\s+(?:a|an|the)\s+\w").expect("valid location preposition regex")
});

fn strip_leading_pose_verb(segment: &str) -> &str {
    let lower = segment.to_lowercase();
    for verb in LOCATION_LEADING_POSE_VERBS {
        if lower.starts_with(verb) {
            return segment[verb.len()..].trim_start();
        }
    }
    segment
}

fn extract_location(text: &str) -> Option<String> {
    for segment in segments(text) {
        let candidate = strip_leading_pose_verb(segment);
        let lower = candidate.to_lowercase();

        let has_location_keyword = LOCATION_KEYWORDS
            .iter()
            .any(|keyword| lower.contains(keyword));
        let has_preposition_shape = LOCATION_PREPOSITION_RE.is_match(candidate);
        if !has_location_keyword && !has_preposition_shape {
            continue;
        }
        // Composite filter: keyword presence alone is not enough, the
        // segment must also be free of pose/expression vocabulary.
        let has_exclude_keyword = LOCATION_EXCLUDE_KEYWORDS
            .iter()
            .any(|keyword| lower.contains(keyword));
        if has_exclude_keyword {
            continue;
        }
        // Preposition shape without a concrete place noun is too weak on
        // its own ("in a hurry").
        if !has_location_keyword {
            continue;
        }
        return Some(candidate.to_string());
    }
    None
}

const LOCATION_CASCADE: &[Extractor] = &[Extractor {
    name: "location_include_exclude",
    last_resort: false,
    apply: extract_location,
}];

// --- camera specs ---------------------------------------------------------

static CAMERA_SPEC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\d+\s?mm|f/\d+(?:\.\d+)?|\bshot on\b|\bbokeh\b|\bdepth of field\b|\bdslr\b|\bfilm grain\b|\blens\b|\biphone\b|\bphone camera\b",
    )
    .expect("valid camera spec regex")
});

fn extract_camera_specs(text: &str) -> Option<String> {
    let matching: Vec<&str> = segments(text)
        .into_iter()
        .filter(|segment| CAMERA_SPEC_RE.is_match(segment))
        .collect();
    if matching.is_empty() {
        None
    } else {
        Some(matching.join(", "))
    }
}

const CAMERA_CASCADE: &[Extractor] = &[Extractor {
    name: "camera_spec_patterns",
    last_resort: false,
    apply: extract_camera_specs,
}];

// --- mood -----------------------------------------------------------------

const MOOD_KEYWORDS: &[&str] = &[
    "confident", "relaxed", "playful", "moody", "serene", "elegant", "dreamy", "energetic",
    "romantic", "candid", "mysterious", "joyful",
];

fn extract_mood(text: &str) -> Option<String> {
    let lower = text.to_lowercase();
    MOOD_KEYWORDS
        .iter()
        .find(|keyword| lower.contains(*keyword))
        .map(|keyword| keyword.to_string())
}

const MOOD_CASCADE: &[Extractor] = &[Extractor {
    name: "mood_keyword",
    last_resort: false,
    apply: extract_mood,
}];

// --- auxiliary clauses reused by the variation generator ------------------

pub fn extract_hair_clause(text: &str) -> Option<String> {
    segments(text)
        .into_iter()
        .find(|segment| segment.to_lowercase().contains("hair"))
        .map(str::to_string)
}

pub fn extract_skin_clause(text: &str) -> Option<String> {
    segments(text)
        .into_iter()
        .find(|segment| segment.to_lowercase().contains("skin"))
        .map(str::to_string)
}

/// Decomposes an arbitrary guide prompt into its fixed semantic fields.
/// Never errors; every cascade falls through to `None`.
pub fn decompose_guide_prompt(text: &str, sink: &dyn EventSink) -> GuidePromptElements {
    let mut weakest = false;

    let (outfit, outfit_weak) = run_cascade("outfit", text, OUTFIT_CASCADE, sink);
    weakest |= outfit_weak;
    let (lighting, lighting_weak) = run_cascade("lighting", text, LIGHTING_CASCADE, sink);
    weakest |= lighting_weak;
    let (location, location_weak) = run_cascade("location", text, LOCATION_CASCADE, sink);
    weakest |= location_weak;
    let (camera_specs, camera_weak) = run_cascade("camera_specs", text, CAMERA_CASCADE, sink);
    weakest |= camera_weak;
    let (mood, mood_weak) = run_cascade("mood", text, MOOD_CASCADE, sink);
    weakest |= mood_weak;

    GuidePromptElements {
        outfit,
        lighting,
        location,
        camera_specs,
        mood,
        weakest_heuristic: weakest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::test_support::RecordingSink;
    use crate::events::TracingSink;

    const RICH_PROMPT: &str = "A confident woman wearing an emerald silk slip dress, standing on a rooftop terrace downtown, warm golden hour light, shot on an 85mm lens at f/1.8 with creamy bokeh, visible skin pores and natural skin texture.";

    #[test]
    fn garment_fabric_pattern_wins_over_generic_wearing() {
        let elements = decompose_guide_prompt(RICH_PROMPT, &TracingSink);
        let outfit = elements.outfit.expect("outfit recovered");
        assert!(outfit.contains("emerald silk slip dress"), "got: {outfit}");
        assert!(!elements.weakest_heuristic);
    }

    #[test]
    fn recovers_lighting_location_and_camera_from_rich_prompt() {
        let elements = decompose_guide_prompt(RICH_PROMPT, &TracingSink);
        assert_eq!(
            elements.lighting.as_deref(),
            Some("warm golden hour light")
        );
        let location = elements.location.expect("location recovered");
        assert!(location.contains("rooftop terrace"), "got: {location}");
        let camera = elements.camera_specs.expect("camera recovered");
        assert!(camera.contains("85mm"), "got: {camera}");
        assert_eq!(elements.mood.as_deref(), Some("confident"));
    }

    #[test]
    fn generic_wearing_clause_is_second_tier() {
        let elements = decompose_guide_prompt(
            "She is wearing a vintage band tee and cargo shorts, laughing in the sun.",
            &TracingSink,
        );
        let outfit = elements.outfit.expect("outfit recovered");
        assert!(outfit.starts_with("a vintage band tee"), "got: {outfit}");
    }

    #[test]
    fn clothing_sentence_heuristic_catches_unmarked_outfits() {
        let elements = decompose_guide_prompt(
            "Morning scene by the window. Her oversized sweater and jeans catch the light.",
            &TracingSink,
        );
        let outfit = elements.outfit.expect("outfit recovered");
        assert!(outfit.contains("sweater"), "got: {outfit}");
    }

    #[test]
    fn first_sentence_fallback_sets_weakest_flag() {
        let sink = RecordingSink::default();
        let elements = decompose_guide_prompt(
            "A quiet portrait with nothing describable. More empty description here.",
            &sink,
        );
        assert_eq!(
            elements.outfit.as_deref(),
            Some("A quiet portrait with nothing describable")
        );
        assert!(elements.weakest_heuristic);
        assert!(sink
            .events
            .lock()
            .iter()
            .any(|event| matches!(event, CoreEvent::WeakestHeuristic { field, .. } if field == "outfit")));
    }

    #[test]
    fn pose_segments_are_not_misclassified_as_location() {
        let elements = decompose_guide_prompt(
            "A woman posing with hands on hips, soft window light.",
            &TracingSink,
        );
        assert_eq!(elements.location, None);
    }

    #[test]
    fn leading_pose_verb_does_not_hide_a_real_location() {
        let elements = decompose_guide_prompt(
            "A woman in a long coat, sitting in a sunlit corner cafe, overcast light.",
            &TracingSink,
        );
        let location = elements.location.expect("location recovered");
        assert!(location.contains("cafe"), "got: {location}");
        assert!(!location.starts_with("sitting"));
    }

    #[test]
    fn extraction_never_errors_on_empty_input() {
        let sink = RecordingSink::default();
        let elements = decompose_guide_prompt("", &sink);
        assert_eq!(elements, GuidePromptElements::default());
        assert!(sink
            .events
            .lock()
            .iter()
            .all(|event| matches!(event, CoreEvent::ExtractionMiss { .. })));
    }

    #[test]
    fn hair_and_skin_clauses_are_recovered_verbatim() {
        let text = "Portrait, loose waves in her auburn hair, visible skin pores and natural texture.";
        assert_eq!(
            extract_hair_clause(text).as_deref(),
            Some("loose waves in her auburn hair")
        );
        assert_eq!(
            extract_skin_clause(text).as_deref(),
            Some("visible skin pores and natural texture")
        );
    }
}
