use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{EngineError, EngineResult};
use crate::events::{CoreEvent, EventSink};
use crate::library::{LibraryCatalog, Vibe};
use crate::rotation::{effective_index, RotationKey, RotationManager, RotationStore};

static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([A-Z]+)(?:_[A-Z]+)*_\d+\}\}").expect("valid placeholder regex"));
static SURVIVOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{[A-Z0-9_]+\}\}").expect("valid survivor regex"));

/// Distinct placeholders in order of first appearance, with their family
/// (the leading `_`-separated segment, e.g. `OUTFIT` in `OUTFIT_FULLBODY_1`).
fn placeholders_in_order(template: &str) -> Vec<(String, String)> {
    let mut seen = Vec::new();
    for captures in PLACEHOLDER_RE.captures_iter(template) {
        let token = captures.get(0).expect("match").as_str().to_string();
        if seen.iter().any(|(existing, _)| *existing == token) {
            continue;
        }
        let family = captures.get(1).expect("family group").as_str().to_string();
        seen.push((token, family));
    }
    seen
}

/// Number of distinct outfit placeholders a template consumes; used to
/// cross-check the configured rotation step.
pub fn count_outfit_placeholders(template: &str) -> usize {
    placeholders_in_order(template)
        .iter()
        .filter(|(_, family)| family == "OUTFIT")
        .count()
}

/// Fills every placeholder from the element library for (category, mood,
/// fashion style), walking each family's list from the user's rotation index
/// so that sibling placeholders land on distinct positions. Any placeholder
/// that survives substitution is a fatal authoring bug, never patched over.
pub async fn inject_and_validate_template<S: RotationStore>(
    template: &str,
    category: &str,
    mood: &str,
    fashion_style: &str,
    user_id: &str,
    catalog: &LibraryCatalog,
    rotation: &RotationManager<S>,
    sink: &dyn EventSink,
) -> EngineResult<String> {
    if template.is_empty() {
        return Ok(String::new());
    }

    let library = catalog.resolve(category, mood, fashion_style)?;
    let placeholders = placeholders_in_order(template);

    let outfit_count = placeholders
        .iter()
        .filter(|(_, family)| family == "OUTFIT")
        .count();
    if outfit_count > 0 && library.outfits.is_empty() {
        return Err(EngineError::NoOutfitsFound {
            fashion_style: fashion_style.to_string(),
        });
    }

    let vibe = Vibe::new(category, mood);
    let key = RotationKey::new(user_id, &vibe.key(), fashion_style);
    let state = rotation.get(&key).await;

    let configured_step = rotation.steps().outfit as usize;
    if outfit_count > 0 && outfit_count != configured_step {
        sink.emit(CoreEvent::StepMismatch {
            configured: configured_step,
            placeholders: outfit_count,
        });
    }

    let mut output = template.to_string();
    let mut outfit_offset = 0u64;
    let mut location_offset = 0u64;
    let mut lighting_offset = 0u64;
    let mut accessory_offset = 0u64;

    for (token, family) in &placeholders {
        let (list, base, offset) = match family.as_str() {
            "OUTFIT" => {
                let offset = outfit_offset;
                outfit_offset += 1;
                (&library.outfits, state.outfit_index, offset)
            }
            "LOCATION" => {
                let offset = location_offset;
                location_offset += 1;
                (&library.locations, state.location_index, offset)
            }
            // Lighting tracks the scene, so it rotates with the location.
            "LIGHTING" => {
                let offset = lighting_offset;
                lighting_offset += 1;
                (&library.lighting, state.location_index, offset)
            }
            "ACCESSORY" => {
                let offset = accessory_offset;
                accessory_offset += 1;
                (&library.accessories, state.accessory_index, offset)
            }
            _ => continue,
        };

        if list.is_empty() {
            continue;
        }
        let value = &list[effective_index(base + offset, list.len())];
        output = output.replace(token, value);
    }

    if let Some(survivor) = SURVIVOR_RE.find(&output) {
        return Err(EngineError::TemplateIncomplete {
            placeholder: survivor.as_str().to_string(),
        });
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::TracingSink;
    use crate::library::ElementLibrary;
    use crate::rotation::{MemoryRotationStore, RotationSteps};
    use std::sync::Arc;

    fn two_element_catalog() -> LibraryCatalog {
        LibraryCatalog::from_libraries(vec![ElementLibrary {
            category: "urban".to_string(),
            mood: "confident".to_string(),
            fashion_style: "casual".to_string(),
            outfits: vec!["red dress".to_string(), "blue suit".to_string()],
            locations: vec!["park".to_string(), "beach".to_string()],
            accessories: vec!["gold hoops".to_string()],
            lighting: vec!["golden hour".to_string(), "overcast light".to_string()],
        }])
    }

    fn manager(outfit_step: u64, location_step: u64) -> RotationManager<MemoryRotationStore> {
        RotationManager::new(
            MemoryRotationStore::default(),
            RotationSteps {
                outfit: outfit_step,
                location: location_step,
                accessory: 1,
            },
            Arc::new(TracingSink),
        )
    }

    async fn inject(
        template: &str,
        catalog: &LibraryCatalog,
        rotation: &RotationManager<MemoryRotationStore>,
    ) -> EngineResult<String> {
        inject_and_validate_template(
            template,
            "urban",
            "confident",
            "casual",
            "u1",
            catalog,
            rotation,
            &TracingSink,
        )
        .await
    }

    #[tokio::test]
    async fn walks_libraries_and_wraps_around_after_two_increments() {
        let catalog = two_element_catalog();
        let rotation = manager(1, 1);
        let template = "{{OUTFIT_FULLBODY_1}} in {{LOCATION_OUTDOOR_1}}";
        let key = RotationKey::new("u1", "urban_confident", "casual");

        let first = inject(template, &catalog, &rotation).await.unwrap();
        assert_eq!(first, "red dress in park");

        rotation.increment(&key).await;
        let second = inject(template, &catalog, &rotation).await.unwrap();
        assert_eq!(second, "blue suit in beach");

        rotation.increment(&key).await;
        let third = inject(template, &catalog, &rotation).await.unwrap();
        assert_eq!(third, first);
    }

    #[tokio::test]
    async fn sibling_placeholders_map_to_distinct_positions() {
        let catalog = two_element_catalog();
        let rotation = manager(2, 1);
        let injected = inject(
            "first: {{OUTFIT_FULLBODY_1}}, second: {{OUTFIT_FULLBODY_2}}",
            &catalog,
            &rotation,
        )
        .await
        .unwrap();
        assert_eq!(injected, "first: red dress, second: blue suit");
    }

    #[tokio::test]
    async fn no_placeholder_survives_injection() {
        let catalog = two_element_catalog();
        let rotation = manager(1, 1);
        let injected = inject(
            "{{OUTFIT_FULLBODY_1}} with {{ACCESSORY_1}}, {{LIGHTING_1}} at {{LOCATION_OUTDOOR_1}}",
            &catalog,
            &rotation,
        )
        .await
        .unwrap();
        assert!(SURVIVOR_RE.find(&injected).is_none(), "survivor in: {injected}");
    }

    #[tokio::test]
    async fn unknown_family_is_template_incomplete() {
        let catalog = two_element_catalog();
        let rotation = manager(1, 1);
        let err = inject("{{WEATHER_1}}", &catalog, &rotation).await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::TemplateIncomplete { ref placeholder } if placeholder == "{{WEATHER_1}}"
        ));
    }

    #[tokio::test]
    async fn empty_template_returns_empty_string() {
        let catalog = two_element_catalog();
        let rotation = manager(1, 1);
        assert_eq!(inject("", &catalog, &rotation).await.unwrap(), "");
    }

    #[tokio::test]
    async fn missing_library_fails_before_rotation_lookup() {
        let catalog = two_element_catalog();
        let rotation = manager(1, 1);
        let err = inject_and_validate_template(
            "{{OUTFIT_FULLBODY_1}}",
            "alpine",
            "brooding",
            "casual",
            "u1",
            &catalog,
            &rotation,
            &TracingSink,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, EngineError::LibraryNotFound { .. }));
    }

    #[tokio::test]
    async fn empty_outfit_list_is_no_outfits_found() {
        let catalog = LibraryCatalog::from_libraries(vec![ElementLibrary {
            category: "urban".to_string(),
            mood: "confident".to_string(),
            fashion_style: "casual".to_string(),
            outfits: Vec::new(),
            locations: vec!["park".to_string()],
            accessories: Vec::new(),
            lighting: Vec::new(),
        }]);
        let rotation = manager(1, 1);
        let err = inject("{{OUTFIT_FULLBODY_1}}", &catalog, &rotation)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::NoOutfitsFound { .. }));
    }

    #[test]
    fn counts_distinct_outfit_placeholders() {
        let template =
            "{{OUTFIT_FULLBODY_1}} {{OUTFIT_FULLBODY_2}} {{OUTFIT_FULLBODY_2}} {{LOCATION_OUTDOOR_1}}";
        assert_eq!(count_outfit_placeholders(template), 2);
    }
}
