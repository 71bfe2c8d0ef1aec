use std::sync::Arc;

use anyhow::{anyhow, Result};
use dotenvy::dotenv;
use serde_json::json;
use tracing::{info, warn};

use feedplanner::composition::{
    compose_camera_description, detect_angle, detect_composition_rule, detect_framing,
    select_composition_for_concept, PhotographyStyle,
};
use feedplanner::config::CONFIG;
use feedplanner::db::database::Database;
use feedplanner::events::TracingSink;
use feedplanner::generator::{
    generate_prompt_direct, PromptMode, PromptRequest, PRO_PHONE_SLOT_START,
};
use feedplanner::guide::variation::FIRST_VARIATION_INDEX;
use feedplanner::guide::{create_variation_from_guide_prompt, decompose_guide_prompt};
use feedplanner::library::{LibraryCatalog, Vibe};
use feedplanner::llm::GeminiClient;
use feedplanner::rotation::{
    MemoryRotationStore, RotationKey, RotationManager, RotationSteps, RotationStore,
};
use feedplanner::template::inject_and_validate_template;
use feedplanner::utils::logging::init_logging;

/// Scene template for one feed: four outfit slots per generation, which is
/// why the default outfit rotation step is four.
const DEFAULT_FEED_TEMPLATE: &str = "She wears {{OUTFIT_FULLBODY_1}} at {{LOCATION_PRIMARY_1}}, \
then {{OUTFIT_FULLBODY_2}} with {{ACCESSORY_1}}, later {{OUTFIT_FULLBODY_3}} at \
{{LOCATION_PRIMARY_2}}, and finally {{OUTFIT_FULLBODY_4}}, all under {{LIGHTING_PRIMARY_1}}.";

#[derive(Debug, Clone)]
struct PlanArgs {
    user_id: String,
    category: String,
    mood: String,
    fashion_style: String,
    concepts: usize,
    mode: PromptMode,
    guide: Option<String>,
    reference_image: bool,
}

fn plan_usage() -> &'static str {
    "Usage: feedplanner plan --user-id <id> --category <category> --mood <mood> --style <style> \
     [--concepts <n>] [--mode classic|pro] [--guide \"<prompt>\"] [--with-reference-image]"
}

fn parse_plan_args(args: &[String]) -> Result<Option<PlanArgs>> {
    if args.get(1).map(|value| value.as_str()) != Some("plan") {
        return Ok(None);
    }

    let mut user_id = None;
    let mut category = None;
    let mut mood = None;
    let mut fashion_style = None;
    let mut concepts = 6usize;
    let mut mode = PromptMode::Classic;
    let mut guide = None;
    let mut reference_image = false;

    let mut index = 2;
    while index < args.len() {
        let flag = args[index].as_str();
        match flag {
            "--with-reference-image" => {
                reference_image = true;
                index += 1;
                continue;
            }
            _ => {}
        }
        let value = args
            .get(index + 1)
            .ok_or_else(|| anyhow!("Missing value for {flag}\n{}", plan_usage()))?;
        match flag {
            "--user-id" => user_id = Some(value.clone()),
            "--category" => category = Some(value.clone()),
            "--mood" => mood = Some(value.clone()),
            "--style" => fashion_style = Some(value.clone()),
            "--concepts" => {
                concepts = value
                    .parse::<usize>()
                    .map_err(|_| anyhow!("Invalid --concepts value '{value}'"))?;
            }
            "--mode" => {
                mode = PromptMode::parse(value)
                    .ok_or_else(|| anyhow!("Invalid --mode value '{value}'"))?;
            }
            "--guide" => guide = Some(value.clone()),
            _ => return Err(anyhow!("Unknown argument {flag}\n{}", plan_usage())),
        }
        index += 2;
    }

    Ok(Some(PlanArgs {
        user_id: user_id.ok_or_else(|| anyhow!("--user-id is required\n{}", plan_usage()))?,
        category: category.ok_or_else(|| anyhow!("--category is required\n{}", plan_usage()))?,
        mood: mood.ok_or_else(|| anyhow!("--mood is required\n{}", plan_usage()))?,
        fashion_style: fashion_style
            .ok_or_else(|| anyhow!("--style is required\n{}", plan_usage()))?,
        concepts: concepts.clamp(1, 12),
        mode,
        guide,
        reference_image,
    }))
}

fn photography_style_for(mode: PromptMode, concept_index: usize) -> PhotographyStyle {
    match mode {
        PromptMode::Classic => PhotographyStyle::Editorial,
        PromptMode::Pro => {
            if concept_index < PRO_PHONE_SLOT_START {
                PhotographyStyle::Editorial
            } else {
                PhotographyStyle::Phone
            }
        }
    }
}

async fn run_plan<S: RotationStore>(
    args: &PlanArgs,
    catalog: &LibraryCatalog,
    rotation: &RotationManager<S>,
) -> Result<serde_json::Value> {
    let sink = TracingSink;
    let scene = inject_and_validate_template(
        DEFAULT_FEED_TEMPLATE,
        &args.category,
        &args.mood,
        &args.fashion_style,
        &args.user_id,
        catalog,
        rotation,
        &sink,
    )
    .await?;

    let vibe = Vibe::new(&args.category, &args.mood);
    let generator = GeminiClient::new();
    let mut concepts = Vec::new();

    if let Some(guide) = &args.guide {
        // Guide mode: slot 0 is the guide prompt verbatim, the rest are
        // variations that keep its fixed elements.
        let elements = decompose_guide_prompt(guide, &sink);
        let preference_source = guide.as_str();
        let reference_context = args
            .reference_image
            .then_some("Using the provided reference image for facial identity");

        for concept_index in 0..args.concepts {
            let composition = select_composition_for_concept(
                concept_index,
                detect_framing(preference_source),
                detect_angle(preference_source),
                detect_composition_rule(preference_source),
            );
            let prompt = if concept_index == 0 {
                guide.clone()
            } else {
                create_variation_from_guide_prompt(
                    guide,
                    &elements,
                    FIRST_VARIATION_INDEX + concept_index - 1,
                    reference_context,
                    args.mode,
                )
            };
            concepts.push(json!({
                "index": concept_index,
                "prompt": prompt,
                "composition": composition,
            }));
        }
    } else {
        for concept_index in 0..args.concepts {
            let composition = select_composition_for_concept(concept_index, None, None, None);
            let camera = compose_camera_description(
                &composition,
                photography_style_for(args.mode, concept_index),
            );
            let brief = format!("{scene} Camera direction: {camera}");
            let request = PromptRequest::from_config(args.mode, concept_index, &brief);
            let result = generate_prompt_direct(&generator, &request, &sink).await?;
            if !result.validation.valid {
                warn!(
                    "Concept {} returned with critical issues: {:?}",
                    concept_index, result.validation.critical
                );
            }
            concepts.push(json!({
                "index": concept_index,
                "prompt": result.prompt,
                "word_count": result.word_count,
                "validation": result.validation,
                "composition": composition,
            }));
        }
    }

    // The read state has now been consumed by an actual generation.
    let key = RotationKey::new(&args.user_id, &vibe.key(), &args.fashion_style);
    rotation.increment(&key).await;

    Ok(json!({
        "user_id": args.user_id,
        "vibe": vibe.key(),
        "fashion_style": args.fashion_style,
        "mode": args.mode,
        "scene": scene,
        "concepts": concepts,
    }))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let _logging_guards = init_logging();

    let args: Vec<String> = std::env::args().collect();
    let Some(plan_args) = parse_plan_args(&args)? else {
        eprintln!("{}", plan_usage());
        return Ok(());
    };

    let catalog = LibraryCatalog::load(&CONFIG.libraries_config_path);
    let steps = RotationSteps::from_config(&CONFIG);
    let sink = Arc::new(TracingSink);

    let plan = match Database::init(&CONFIG.database_url).await {
        Ok(db) => {
            info!("Using rotation store at {}", CONFIG.database_url);
            let rotation = RotationManager::new(db, steps, sink);
            run_plan(&plan_args, &catalog, &rotation).await?
        }
        Err(err) => {
            // Missing infrastructure never blocks content generation.
            warn!("Rotation store unavailable ({err}), falling back to in-memory state");
            let rotation = RotationManager::new(MemoryRotationStore::default(), steps, sink);
            run_plan(&plan_args, &catalog, &rotation).await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}
