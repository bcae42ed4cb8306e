//! # Mood Descriptors
//!
//! Static presentation data for the five mood labels the backend assigns.
//! The label itself is always shown exactly as the backend sent it; this
//! table only adds an icon, a class (used for the badge colour) and a
//! short description.

/// Semantic class of a mood. The TUI maps each one to a badge colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoodClass {
    Happy,
    Neutral,
    Stressed,
    Depressed,
    Tired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoodDescriptor {
    /// Canonical label this descriptor is keyed by.
    pub label: &'static str,
    pub icon: &'static str,
    pub class: MoodClass,
    pub description: &'static str,
}

pub const MOODS: [MoodDescriptor; 5] = [
    MoodDescriptor {
        label: "Happy/Calm",
        icon: "😊",
        class: MoodClass::Happy,
        description: "You're feeling positive and at peace. Keep nurturing this state with activities you enjoy!",
    },
    MoodDescriptor {
        label: "Neutral",
        icon: "😐",
        class: MoodClass::Neutral,
        description: "You're in a balanced state. This is a good baseline - consider activities that bring you joy.",
    },
    MoodDescriptor {
        label: "Stressed",
        icon: "😰",
        class: MoodClass::Stressed,
        description: "You're experiencing stress. Take some deep breaths and consider relaxation techniques.",
    },
    MoodDescriptor {
        label: "Depressed/Low",
        icon: "😔",
        class: MoodClass::Depressed,
        description: "You're feeling low. Remember, it's okay to seek support. Consider talking to someone you trust.",
    },
    MoodDescriptor {
        label: "Tired/Exhausted",
        icon: "😴",
        class: MoodClass::Tired,
        description: "Your energy is depleted. Prioritize rest and self-care to recharge your batteries.",
    },
];

const NEUTRAL: usize = 1;

/// Looks up the descriptor for a backend label. Matching is exact; anything
/// else (empty, unknown, differently cased) gets the Neutral descriptor.
pub fn descriptor(label: &str) -> &'static MoodDescriptor {
    MOODS
        .iter()
        .find(|m| m.label == label)
        .unwrap_or(&MOODS[NEUTRAL])
}
