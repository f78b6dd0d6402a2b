use mindful_core::Mood;

/// Approximate spoken words per minute of meditation.
pub const WORDS_PER_MINUTE: u32 = 150;

/// Prompt templates for meditation scripts
pub struct ScriptPrompts;

impl ScriptPrompts {
    /// Mood-specific guidance appended to the system prompt
    pub fn mood_guidance(mood: Mood) -> &'static str {
        match mood {
            Mood::Anxious => "You are feeling anxious with racing thoughts and worry. Create a calming meditation focused on grounding, breath awareness, and releasing anxiety.",
            Mood::Stressed => "You are feeling stressed and tense. Create a meditation that releases tension, promotes relaxation, and brings mental clarity.",
            Mood::Overwhelmed => "You are feeling overwhelmed with too much to handle. Create a meditation that provides perspective, simplifies thoughts, and restores calm.",
            Mood::Restless => "You are feeling restless and unable to settle. Create a meditation that channels energy productively, promotes focus, and brings inner stillness.",
            Mood::Tired => "You are feeling exhausted and drained. Create a gentle meditation that restores energy, rejuvenates the spirit, and promotes mindful rest.",
            Mood::Peaceful => "You are already feeling peaceful. Create a meditation that deepens this serenity, cultivates gratitude, and enhances inner joy.",
        }
    }

    /// Build the system prompt for a script of `duration_minutes`
    pub fn system_prompt(mood: Mood, duration_minutes: u32) -> String {
        format!(
            r#"You are a compassionate meditation guide creating personalized guided meditation scripts.
Your scripts should be:
- Warm, calming, and deeply empathetic
- Written in second person ("you")
- {duration} minutes long (approximately {words} words)
- Include gentle breathing cues
- Focus on the present moment
- End with a peaceful transition back to awareness

{guidance}"#,
            duration = duration_minutes,
            words = u64::from(duration_minutes) * u64::from(WORDS_PER_MINUTE),
            guidance = Self::mood_guidance(mood),
        )
    }

    /// Build the user request
    pub fn user_prompt(mood: Mood, duration_minutes: u32) -> String {
        format!(
            "Create a {}-minute guided meditation for someone feeling {}.",
            duration_minutes, mood
        )
    }
}
