pub mod gemini;

pub use gemini::GeminiClient;

/// Seam for the external text-generation dependency. The engine only needs
/// `(system prompt, user prompt, temperature, max tokens) -> text`; no
/// further structural contract is assumed.
pub trait TextGenerator {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f32,
        max_output_tokens: i32,
    ) -> anyhow::Result<String>;
}
