use crate::generator::PromptMode;
use crate::guide::decompose::{extract_hair_clause, extract_skin_clause, GuidePromptElements};
use crate::utils::text::finalize_prompt_text;

/// Variation slots are numbered from 1; slot 0 is the guide prompt itself,
/// used verbatim.
pub const FIRST_VARIATION_INDEX: usize = 1;

const DEFAULT_SKIN_TEXTURE_CLAUSE: &str = "visible skin pores and natural skin texture";
const DEFAULT_PRO_CAMERA_CLAUSE: &str =
    "shot on an 85mm lens at f/2.0 with shallow depth of field";

struct PoseVariant {
    pose: &'static str,
    action: &'static str,
    angle: &'static str,
    expression: &'static str,
}

/// Varied elements only: pose, candid action, angle of view, expression.
/// One full cycle of the table never repeats a pose/action combination.
const POSE_TABLE: [PoseVariant; 6] = [
    PoseVariant {
        pose: "standing with her weight shifted onto one hip",
        action: "adjusting her hair with one hand",
        angle: "seen from a slight side angle",
        expression: "a soft natural smile",
    },
    PoseVariant {
        pose: "walking mid-stride",
        action: "caught glancing back over her shoulder",
        angle: "seen from behind at three-quarter view",
        expression: "a candid laugh",
    },
    PoseVariant {
        pose: "sitting with her legs crossed",
        action: "resting her chin on one hand",
        angle: "seen straight on at eye level",
        expression: "a calm direct gaze",
    },
    PoseVariant {
        pose: "leaning against the nearest surface",
        action: "looking off into the distance",
        angle: "seen from a low angle",
        expression: "a thoughtful expression",
    },
    PoseVariant {
        pose: "crouching slightly with one knee forward",
        action: "reaching toward the camera",
        angle: "seen from slightly above",
        expression: "a playful grin",
    },
    PoseVariant {
        pose: "standing turned away then looking back",
        action: "tucking a strand of hair behind her ear",
        angle: "seen in profile",
        expression: "a faint knowing smile",
    },
];

fn varied_clause(variation_index: usize) -> String {
    let slot = variation_index.saturating_sub(FIRST_VARIATION_INDEX) % POSE_TABLE.len();
    let variant = &POSE_TABLE[slot];
    format!(
        "{}, {}, {}, {}",
        variant.pose, variant.action, variant.angle, variant.expression
    )
}

/// Builds one variation of a decomposed guide prompt. Fixed elements —
/// outfit, location, lighting, camera specs, reference preamble, hair and
/// skin clauses — are copied verbatim, never re-described; only the
/// pose/action/angle/expression clause changes between variations. That
/// verbatim copy is what keeps the scene visually consistent across a feed.
pub fn create_variation_from_guide_prompt(
    base_guide_prompt: &str,
    elements: &GuidePromptElements,
    variation_index: usize,
    reference_image_context: Option<&str>,
    mode: PromptMode,
) -> String {
    let mut clauses: Vec<String> = Vec::new();

    if let Some(preamble) = reference_image_context {
        if !preamble.trim().is_empty() {
            clauses.push(preamble.trim().to_string());
        }
    }
    if let Some(hair) = extract_hair_clause(base_guide_prompt) {
        clauses.push(hair);
    }
    if let Some(outfit) = &elements.outfit {
        clauses.push(outfit.clone());
    }
    if let Some(location) = &elements.location {
        clauses.push(location.clone());
    }
    if let Some(lighting) = &elements.lighting {
        clauses.push(lighting.clone());
    }

    clauses.push(varied_clause(variation_index));

    match (&elements.camera_specs, mode) {
        (Some(camera), _) => clauses.push(camera.clone()),
        (None, PromptMode::Pro) => clauses.push(DEFAULT_PRO_CAMERA_CLAUSE.to_string()),
        (None, PromptMode::Classic) => {}
    }

    match (extract_skin_clause(base_guide_prompt), mode) {
        (Some(skin), _) => clauses.push(skin),
        (None, PromptMode::Pro) => clauses.push(DEFAULT_SKIN_TEXTURE_CLAUSE.to_string()),
        (None, PromptMode::Classic) => {}
    }

    finalize_prompt_text(&clauses.join(", "))
}
