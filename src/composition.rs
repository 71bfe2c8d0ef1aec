use rand::seq::IndexedRandom;
use serde::Serialize;

/// Target photography register for lens/distance/depth-of-field specs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotographyStyle {
    /// Professional editorial capture: named lenses, wide apertures.
    Editorial,
    /// Authentic phone capture: casual distances, natural depth.
    Phone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Framing {
    FullBody,
    Medium,
    CloseUp,
    ThreeQuarter,
    WideEnvironmental,
    UpperBody,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Angle {
    EyeLevel,
    LowAngle,
    HighAngle,
    SlightlyAbove,
    ProfileSide,
    OverTheShoulder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    Centered,
    OffCenterLeft,
    OffCenterRight,
    LowerThird,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositionRule {
    RuleOfThirds,
    CenteredSymmetry,
    LeadingLines,
    NegativeSpace,
    GoldenRatio,
    FrameWithinFrame,
}

/// One concept slot's camera assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConceptComposition {
    pub framing: Framing,
    pub angle: Angle,
    pub position: Position,
    pub composition_rule: CompositionRule,
}

/// Six pre-curated combinations, deliberately varied on every axis so a
/// six-concept feed never repeats a framing.
const COMPOSITION_TABLE: [ConceptComposition; 6] = [
    ConceptComposition {
        framing: Framing::FullBody,
        angle: Angle::EyeLevel,
        position: Position::Centered,
        composition_rule: CompositionRule::RuleOfThirds,
    },
    ConceptComposition {
        framing: Framing::Medium,
        angle: Angle::LowAngle,
        position: Position::OffCenterLeft,
        composition_rule: CompositionRule::NegativeSpace,
    },
    ConceptComposition {
        framing: Framing::CloseUp,
        angle: Angle::SlightlyAbove,
        position: Position::OffCenterRight,
        composition_rule: CompositionRule::CenteredSymmetry,
    },
    ConceptComposition {
        framing: Framing::ThreeQuarter,
        angle: Angle::OverTheShoulder,
        position: Position::OffCenterLeft,
        composition_rule: CompositionRule::LeadingLines,
    },
    ConceptComposition {
        framing: Framing::WideEnvironmental,
        angle: Angle::HighAngle,
        position: Position::LowerThird,
        composition_rule: CompositionRule::GoldenRatio,
    },
    ConceptComposition {
        framing: Framing::UpperBody,
        angle: Angle::ProfileSide,
        position: Position::OffCenterRight,
        composition_rule: CompositionRule::FrameWithinFrame,
    },
];

/// Assigns a composition to a concept slot. Pure function of the index when
/// no preference is given; a user preference overrides only its own axis so
/// the remaining axes keep their slot-driven variety.
pub fn select_composition_for_concept(
    concept_index: usize,
    framing_pref: Option<Framing>,
    angle_pref: Option<Angle>,
    rule_pref: Option<CompositionRule>,
) -> ConceptComposition {
    let mut composition = COMPOSITION_TABLE[concept_index % COMPOSITION_TABLE.len()];
    if let Some(framing) = framing_pref {
        composition.framing = framing;
    }
    if let Some(angle) = angle_pref {
        composition.angle = angle;
    }
    if let Some(rule) = rule_pref {
        composition.composition_rule = rule;
    }
    composition
}

impl Framing {
    fn phrasing_variants(&self) -> &'static [&'static str] {
        match self {
            Framing::FullBody => &[
                "full body shot from head to toe",
                "full length framing showing the entire outfit",
            ],
            Framing::Medium => &[
                "medium shot from the waist up",
                "waist-up framing",
            ],
            Framing::CloseUp => &[
                "close-up portrait",
                "tight head-and-shoulders framing",
            ],
            Framing::ThreeQuarter => &[
                "three-quarter shot from the knees up",
                "knee-up framing",
            ],
            Framing::WideEnvironmental => &[
                "wide environmental shot with the subject small in the scene",
                "wide establishing frame placing her within the location",
            ],
            Framing::UpperBody => &[
                "upper body shot from the chest up",
                "chest-up framing",
            ],
        }
    }

    /// Picks one phrasing variant; the choice is deliberately random per call
    /// for intra-session variety.
    pub fn phrase(&self) -> &'static str {
        let mut rng = rand::rng();
        self.phrasing_variants()
            .choose(&mut rng)
            .copied()
            .unwrap_or(self.phrasing_variants()[0])
    }

    fn lens_spec(&self, style: PhotographyStyle) -> &'static str {
        match style {
            PhotographyStyle::Editorial => match self {
                Framing::CloseUp | Framing::UpperBody => "shot on an 85mm portrait lens at f/1.8",
                Framing::Medium | Framing::ThreeQuarter => "shot on a 50mm lens at f/2.0",
                Framing::FullBody => "shot on a 35mm lens at f/2.8",
                Framing::WideEnvironmental => "shot on a 24mm wide-angle lens at f/4",
            },
            PhotographyStyle::Phone => match self {
                Framing::CloseUp | Framing::UpperBody => {
                    "casual phone photo taken at arm's length"
                }
                Framing::Medium | Framing::ThreeQuarter => {
                    "phone snapshot taken by a friend a few steps away"
                }
                Framing::FullBody | Framing::WideEnvironmental => {
                    "phone photo taken from across the street"
                }
            },
        }
    }

    fn depth_of_field(&self, style: PhotographyStyle) -> &'static str {
        match style {
            PhotographyStyle::Editorial => match self {
                Framing::WideEnvironmental => "deep focus keeping the scene sharp",
                _ => "shallow depth of field with creamy background bokeh",
            },
            PhotographyStyle::Phone => "natural phone-camera depth with everything readable",
        }
    }
}

impl Angle {
    pub fn phrase(&self) -> &'static str {
        match self {
            Angle::EyeLevel => "captured at eye level",
            Angle::LowAngle => "captured from a low angle looking up",
            Angle::HighAngle => "captured from a high angle looking down",
            Angle::SlightlyAbove => "captured from slightly above eye level",
            Angle::ProfileSide => "captured in profile from the side",
            Angle::OverTheShoulder => "captured over the shoulder",
        }
    }
}

impl Position {
    pub fn phrase(&self) -> &'static str {
        match self {
            Position::Centered => "subject centered in the frame",
            Position::OffCenterLeft => "subject placed in the left third of the frame",
            Position::OffCenterRight => "subject placed in the right third of the frame",
            Position::LowerThird => "subject anchored in the lower third of the frame",
        }
    }
}

impl CompositionRule {
    pub fn phrase(&self) -> &'static str {
        match self {
            CompositionRule::RuleOfThirds => "composed on the rule of thirds",
            CompositionRule::CenteredSymmetry => "composed with centered symmetry",
            CompositionRule::LeadingLines => "composed along leading lines toward the subject",
            CompositionRule::NegativeSpace => "composed with generous negative space",
            CompositionRule::GoldenRatio => "composed on the golden ratio",
            CompositionRule::FrameWithinFrame => "composed as a frame within a frame",
        }
    }
}

/// Full camera clause in fixed order: framing, position, angle, rule, lens,
/// depth of field.
pub fn compose_camera_description(
    composition: &ConceptComposition,
    style: PhotographyStyle,
) -> String {
    [
        composition.framing.phrase(),
        composition.position.phrase(),
        composition.angle.phrase(),
        composition.composition_rule.phrase(),
        composition.framing.lens_spec(style),
        composition.framing.depth_of_field(style),
    ]
    .join(", ")
}

/// Free-text framing keywords short-circuit the slot table.
pub fn detect_framing(text: &str) -> Option<Framing> {
    let lower = text.to_lowercase();
    if lower.contains("close up") || lower.contains("close-up") || lower.contains("closeup") {
        return Some(Framing::CloseUp);
    }
    if lower.contains("full body") || lower.contains("full-body") || lower.contains("head to toe") {
        return Some(Framing::FullBody);
    }
    if lower.contains("three quarter") || lower.contains("three-quarter") {
        return Some(Framing::ThreeQuarter);
    }
    if lower.contains("upper body") || lower.contains("chest up") {
        return Some(Framing::UpperBody);
    }
    if lower.contains("wide shot") || lower.contains("wide angle") || lower.contains("establishing")
    {
        return Some(Framing::WideEnvironmental);
    }
    if lower.contains("medium shot") || lower.contains("waist up") {
        return Some(Framing::Medium);
    }
    None
}

pub fn detect_angle(text: &str) -> Option<Angle> {
    let lower = text.to_lowercase();
    if lower.contains("low angle") || lower.contains("from below") {
        return Some(Angle::LowAngle);
    }
    if lower.contains("high angle") || lower.contains("from above") || lower.contains("overhead") {
        return Some(Angle::HighAngle);
    }
    if lower.contains("over the shoulder") || lower.contains("over-the-shoulder") {
        return Some(Angle::OverTheShoulder);
    }
    if lower.contains("profile") || lower.contains("side view") {
        return Some(Angle::ProfileSide);
    }
    if lower.contains("eye level") || lower.contains("eye-level") {
        return Some(Angle::EyeLevel);
    }
    None
}

pub fn detect_composition_rule(text: &str) -> Option<CompositionRule> {
    let lower = text.to_lowercase();
    if lower.contains("rule of thirds") {
        return Some(CompositionRule::RuleOfThirds);
    }
    if lower.contains("negative space") {
        return Some(CompositionRule::NegativeSpace);
    }
    if lower.contains("leading lines") {
        return Some(CompositionRule::LeadingLines);
    }
    if lower.contains("golden ratio") {
        return Some(CompositionRule::GoldenRatio);
    }
    if lower.contains("symmetry") || lower.contains("symmetrical") || lower.contains("centered")
    {
        return Some(CompositionRule::CenteredSymmetry);
    }
    if lower.contains("frame within") {
        return Some(CompositionRule::FrameWithinFrame);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn same_index_without_preferences_is_deterministic() {
        for index in 0..12 {
            let first = select_composition_for_concept(index, None, None, None);
            let second = select_composition_for_concept(index, None, None, None);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn first_six_indices_yield_six_distinct_framings() {
        let framings: HashSet<Framing> = (0..6)
            .map(|index| select_composition_for_concept(index, None, None, None).framing)
            .collect();
        assert_eq!(framings.len(), 6);
    }

    #[test]
    fn table_wraps_at_six() {
        assert_eq!(
            select_composition_for_concept(7, None, None, None),
            select_composition_for_concept(1, None, None, None)
        );
    }

    #[test]
    fn preference_overrides_only_its_own_axis() {
        let default = select_composition_for_concept(0, None, None, None);
        let overridden =
            select_composition_for_concept(0, Some(Framing::CloseUp), None, None);
        assert_eq!(overridden.framing, Framing::CloseUp);
        assert_eq!(overridden.angle, default.angle);
        assert_eq!(overridden.position, default.position);
        assert_eq!(overridden.composition_rule, default.composition_rule);
    }

    #[test]
    fn camera_description_keeps_fixed_clause_order() {
        let composition = select_composition_for_concept(2, None, None, None);
        let description =
            compose_camera_description(&composition, PhotographyStyle::Editorial);
        let position_at = description
            .find("right third")
            .expect("position phrase present");
        let angle_at = description
            .find("slightly above")
            .expect("angle phrase present");
        let lens_at = description.find("85mm").expect("lens spec present");
        assert!(position_at < angle_at && angle_at < lens_at);
        assert!(description.contains("depth of field") || description.contains("bokeh"));
    }

    #[test]
    fn phone_style_swaps_lens_for_phone_vocabulary() {
        let composition = select_composition_for_concept(0, None, None, None);
        let description = compose_camera_description(&composition, PhotographyStyle::Phone);
        assert!(description.contains("phone photo"));
        assert!(!description.contains("mm lens"));
    }

    #[test]
    fn detects_explicit_framing_and_angle_keywords() {
        assert_eq!(detect_framing("I want a close up please"), Some(Framing::CloseUp));
        assert_eq!(
            detect_framing("make it a full body look"),
            Some(Framing::FullBody)
        );
        assert_eq!(detect_framing("something nice"), None);
        assert_eq!(detect_angle("shoot it from below"), Some(Angle::LowAngle));
        assert_eq!(
            detect_composition_rule("use rule of thirds"),
            Some(CompositionRule::RuleOfThirds)
        );
        assert_eq!(detect_composition_rule("whatever looks good"), None);
    }
}
