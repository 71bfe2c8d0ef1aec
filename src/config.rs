use std::env;
use std::path::PathBuf;

use anyhow::Result;
use once_cell::sync::Lazy;

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub database_url: String,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_temperature: f32,
    pub classic_max_output_tokens: i32,
    pub pro_max_output_tokens: i32,
    pub trigger_word: String,
    pub rotation_outfit_step: u64,
    pub rotation_location_step: u64,
    pub libraries_config_path: PathBuf,
}

pub static CONFIG: Lazy<Config> =
    Lazy::new(|| Config::load().expect("Failed to load configuration"));

fn env_string(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_f32(name: &str, default: f32) -> f32 {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<f32>().ok())
        .unwrap_or(default)
}

fn env_i32(name: &str, default: i32) -> i32 {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<i32>().ok())
        .unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(default)
}

fn normalize_database_url(value: String) -> String {
    if value.starts_with("sqlite+aiosqlite://") {
        return value.replacen("sqlite+aiosqlite://", "sqlite://", 1);
    }
    value
}

impl Config {
    pub fn load() -> Result<Self> {
        Ok(Config {
            log_level: env_string("LOG_LEVEL", "info").to_lowercase(),
            database_url: normalize_database_url(env_string(
                "DATABASE_URL",
                "sqlite://planner.db?mode=rwc",
            )),
            gemini_api_key: env_string("GEMINI_API_KEY", ""),
            gemini_model: env_string("GEMINI_MODEL", "gemini-2.0-flash"),
            gemini_temperature: env_f32("GEMINI_TEMPERATURE", 0.9),
            classic_max_output_tokens: env_i32("CLASSIC_MAX_OUTPUT_TOKENS", 256),
            pro_max_output_tokens: env_i32("PRO_MAX_OUTPUT_TOKENS", 1024),
            trigger_word: env_string("TRIGGER_WORD", "ohwx"),
            rotation_outfit_step: env_u64("ROTATION_OUTFIT_STEP", 4),
            rotation_location_step: env_u64("ROTATION_LOCATION_STEP", 2),
            libraries_config_path: PathBuf::from(env_string(
                "LIBRARIES_CONFIG_PATH",
                "element_libraries.json",
            )),
        })
    }
}

pub const CLASSIC_SYSTEM_PROMPT: &str = r#"You are a prompt engineer writing short training-token prompts for a fine-tuned image model.

RULES (HARD CONSTRAINTS):
1. The very first word of your output MUST be the trigger word "{trigger_word}". No preamble, no quotes, no markdown.
2. Write ONE prompt of 30 to 60 words. Never fewer than 20, never more than 80.
3. Comma-separated descriptor style, not full sentences.
4. Describe exactly one scene: outfit, location, lighting, pose, camera framing.
5. Never mention brand names, text, logos, or watermarks.
6. Finish every descriptor; never cut a phrase short.

EXAMPLES OF THE EXPECTED SHAPE:
{trigger_word}, elegant black silk slip dress, standing on a rooftop terrace at dusk, warm golden hour light, one hand resting on the railing, looking over her shoulder, medium shot, 85mm lens, shallow depth of field

{trigger_word}, oversized cream knit sweater and straight-leg jeans, sitting on a windowsill in a bright loft apartment, soft morning window light, holding a ceramic coffee mug, relaxed candid expression, three-quarter shot, natural depth

Write exactly one prompt in this shape for the brief you are given."#;

pub const PRO_SYSTEM_PROMPT: &str = r#"You are a prompt engineer writing long-form photorealistic prompts for a state-of-the-art image model.

RULES (HARD CONSTRAINTS):
1. Write ONE continuous prompt of 150 to 400 words. Never fewer than 100, never more than 500.
2. Full descriptive sentences, present tense, third person.
3. Cover, in order: subject and outfit with fabric detail, location with three concrete environmental details, lighting quality and direction, a candid pose or caught moment, facial expression, camera framing and angle, lens and depth of field, skin texture realism.
4. Use the camera vocabulary you are instructed to use (professional camera gear OR casual phone capture) and never mix the two registers in one prompt.
5. Always include a clause about visible skin pores and natural skin texture.
6. Never mention text, logos, or watermarks. Never address the reader.
7. Finish every sentence; never cut a phrase short.

EXAMPLE OF THE EXPECTED REGISTER (professional):
A woman in a tailored camel wool coat over a white ribbed turtleneck walks along a rain-darkened cobblestone street in the old town, past a florist's stall with buckets of white tulips, a green awning dripping from the morning rain, and a bicycle leaning against a lamppost. Overcast daylight wraps her in soft, even illumination with no harsh shadows. She is caught mid-stride glancing toward a shop window, a faint amused smile on her lips. Medium full shot from slightly below eye level, shot on an 85mm lens at f/2.0, the background melting into creamy bokeh while raindrops on the awning stay crisp in the foreground. Her skin shows visible pores and natural texture with no retouching.

Write exactly one prompt in this register for the brief you are given."#;
