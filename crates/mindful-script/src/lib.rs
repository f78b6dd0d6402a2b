//! Guided meditation script generation.
//!
//! Scripts come from an OpenAI-compatible chat completions service. When the
//! service is not configured or a request fails, callers fall back to a fixed
//! one-line script via [`generate_or_fallback`].

mod fallback;
mod openai;
mod prompts;
mod traits;

pub use fallback::{generate_or_fallback, GeneratedScript, FALLBACK_SCRIPT};
pub use openai::OpenAiScriptGenerator;
pub use prompts::{ScriptPrompts, WORDS_PER_MINUTE};
pub use traits::{
    GenerationError, GeneratorConfig, ScriptGenerator, ScriptRequest, UnconfiguredGenerator,
    DEFAULT_BASE_URL, DEFAULT_MODEL,
};

use tracing::{info, warn};

/// Create a generator from configuration
pub fn create_generator(config: GeneratorConfig) -> Box<dyn ScriptGenerator> {
    if config.api_key.is_none() {
        info!("No API key configured, meditation scripts will use the fallback text");
        return Box::new(UnconfiguredGenerator);
    }

    match OpenAiScriptGenerator::new(config) {
        Ok(generator) => Box::new(generator),
        Err(e) => {
            warn!(error = %e, "Script generator unavailable, using fallback text");
            Box::new(UnconfiguredGenerator)
        }
    }
}
