//! Static presets shown by the app.

use serde::Serialize;

use crate::types::{Environment, Mood};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EnvironmentInfo {
    pub id: Environment,
    pub name: &'static str,
    pub description: &'static str,
}

/// A short predefined meditation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ZenSpark {
    pub id: &'static str,
    pub title: &'static str,
    /// Minutes.
    pub duration: u32,
    pub mood: Mood,
    pub description: &'static str,
}

pub static ENVIRONMENTS: [EnvironmentInfo; 4] = [
    EnvironmentInfo {
        id: Environment::Bamboo,
        name: "Bamboo Forest",
        description: "Tranquil green sanctuary",
    },
    EnvironmentInfo {
        id: Environment::Ocean,
        name: "Ocean Depths",
        description: "Bioluminescent calm",
    },
    EnvironmentInfo {
        id: Environment::Aurora,
        name: "Aurora Sky",
        description: "Arctic serenity",
    },
    EnvironmentInfo {
        id: Environment::Temple,
        name: "Temple Garden",
        description: "Sacred peace",
    },
];

pub static ZEN_SPARKS: [ZenSpark; 6] = [
    ZenSpark {
        id: "1",
        title: "Quick Calm",
        duration: 2,
        mood: Mood::Stressed,
        description: "2-minute emergency calm for overwhelming moments",
    },
    ZenSpark {
        id: "2",
        title: "Breath Reset",
        duration: 3,
        mood: Mood::Anxious,
        description: "3-minute breathing exercise to center yourself",
    },
    ZenSpark {
        id: "3",
        title: "Energy Boost",
        duration: 5,
        mood: Mood::Tired,
        description: "5-minute mindful awakening session",
    },
    ZenSpark {
        id: "4",
        title: "Focus Flow",
        duration: 5,
        mood: Mood::Restless,
        description: "5-minute concentration enhancer",
    },
    ZenSpark {
        id: "5",
        title: "Stress Release",
        duration: 3,
        mood: Mood::Overwhelmed,
        description: "3-minute tension release practice",
    },
    ZenSpark {
        id: "6",
        title: "Deep Peace",
        duration: 5,
        mood: Mood::Peaceful,
        description: "5-minute gratitude and serenity",
    },
];

pub fn zen_spark(id: &str) -> Option<&'static ZenSpark> {
    ZEN_SPARKS.iter().find(|s| s.id == id)
}

pub fn environment_info(env: Environment) -> &'static EnvironmentInfo {
    match env {
        Environment::Bamboo => &ENVIRONMENTS[0],
        Environment::Ocean => &ENVIRONMENTS[1],
        Environment::Aurora => &ENVIRONMENTS[2],
        Environment::Temple => &ENVIRONMENTS[3],
    }
}
