pub mod decompose;
pub mod variation;

pub use decompose::{decompose_guide_prompt, GuidePromptElements};
pub use variation::create_variation_from_guide_prompt;
