use serde::Serialize;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// Coarse bucket a mood label falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter, Serialize)]
pub enum MoodCategory {
    Positive,
    Neutral,
    Negative,
    Unknown,
}

impl MoodCategory {
    /// The three categories that take part in percentage breakdowns.
    pub const KNOWN: [MoodCategory; 3] = [
        MoodCategory::Positive,
        MoodCategory::Neutral,
        MoodCategory::Negative,
    ];

    pub fn emoji(self) -> &'static str {
        match self {
            MoodCategory::Positive => "😊",
            MoodCategory::Neutral => "😐",
            MoodCategory::Negative => "😔",
            MoodCategory::Unknown => "📝",
        }
    }

    pub fn moods(self) -> impl Iterator<Item = Mood> {
        Mood::iter().filter(move |mood| mood.category() == self)
    }
}

/// The fixed mood lexicon offered by the entry editor.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter, EnumString, Serialize,
)]
#[strum(ascii_case_insensitive)]
pub enum Mood {
    Happy,
    Excited,
    Relaxed,
    Grateful,
    Confident,
    Calm,
    Thoughtful,
    Curious,
    Nostalgic,
    Bored,
    Sad,
    Angry,
    Stressed,
    Lonely,
    Anxious,
}

impl Mood {
    pub fn category(self) -> MoodCategory {
        use Mood::*;
        match self {
            Happy | Excited | Relaxed | Grateful | Confident => MoodCategory::Positive,
            Calm | Thoughtful | Curious | Nostalgic | Bored => MoodCategory::Neutral,
            Sad | Angry | Stressed | Lonely | Anxious => MoodCategory::Negative,
        }
    }
}

/// Maps a free-text label onto a category. Blank or unrecognised labels are
/// `Unknown`, never an error.
pub fn classify(label: &str) -> MoodCategory {
    label
        .trim()
        .parse::<Mood>()
        .map(Mood::category)
        .unwrap_or(MoodCategory::Unknown)
}
