use serde::Serialize;
use tracing::warn;

use crate::traits::{ScriptGenerator, ScriptRequest};

/// Script returned whenever generation is unavailable or fails.
pub const FALLBACK_SCRIPT: &str = "Take a deep breath and find your center.";

/// Outcome of a generation attempt as handed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedScript {
    pub script: String,
    /// True when `script` is the fixed fallback text
    pub fallback: bool,
}

impl GeneratedScript {
    pub fn generated(script: impl Into<String>) -> Self {
        Self {
            script: script.into(),
            fallback: false,
        }
    }

    pub fn fallback() -> Self {
        Self {
            script: FALLBACK_SCRIPT.to_string(),
            fallback: true,
        }
    }
}

/// Ask `generator` for a script, substituting the fallback text on any failure.
///
/// Never returns an error: callers always get something to read aloud.
pub async fn generate_or_fallback(
    generator: &dyn ScriptGenerator,
    request: &ScriptRequest,
) -> GeneratedScript {
    match generator.generate(request).await {
        Ok(script) if !script.trim().is_empty() => GeneratedScript::generated(script),
        Ok(_) => {
            warn!(
                generator = generator.name(),
                mood = %request.mood,
                "Script generator returned empty text, using fallback"
            );
            GeneratedScript::fallback()
        }
        Err(e) => {
            warn!(
                generator = generator.name(),
                mood = %request.mood,
                error = %e,
                "Script generation failed, using fallback"
            );
            GeneratedScript::fallback()
        }
    }
}
