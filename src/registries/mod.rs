mod model_settings;
mod prompt_registry;

pub use model_settings::ModelSettings;
pub use prompt_registry::{FilePromptRegistry, PromptError, PromptRegistry};
