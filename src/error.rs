use thiserror::Error;

/// Errors surfaced by the prompt-composition engine.
///
/// `StoreUnavailable` is recovered internally by the rotation manager and
/// should never reach a caller of the public entry points; it exists so the
/// store layer can report the condition without deciding the policy.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no element library for category '{category}', mood '{mood}', style '{fashion_style}'")]
    LibraryNotFound {
        category: String,
        mood: String,
        fashion_style: String,
    },

    #[error("element library for style '{fashion_style}' has no outfits")]
    NoOutfitsFound { fashion_style: String },

    #[error("unresolved placeholder '{placeholder}' survived template injection")]
    TemplateIncomplete { placeholder: String },

    #[error("rotation store unavailable: {0}")]
    StoreUnavailable(#[source] anyhow::Error),

    #[error("text generation failed: {0}")]
    Generation(#[source] anyhow::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
