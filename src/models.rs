use std::collections::HashMap;
use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Milliseconds since the Unix epoch.
pub type Millis = i64;

/// Helper nickname -> number of tasks they helped with.
pub type HelperTally = HashMap<String, u32>;

/// Kind of help a task asks for. Unknown stored names read back as `Other`.
#[derive(Serialize, Deserialize, ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    Errands,
    Repair,
    #[serde(rename = "Pet Care")]
    #[value(name = "pet-care")]
    PetCare,
    #[serde(rename = "Lend/Borrow")]
    #[value(name = "lend-borrow")]
    LendBorrow,
    #[default]
    #[serde(other)]
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Errands,
        Category::Repair,
        Category::PetCare,
        Category::LendBorrow,
        Category::Other,
    ];

    /// Human readable label, also the text that search matches against.
    pub fn label(self) -> &'static str {
        match self {
            Category::Errands => "Errands",
            Category::Repair => "Repair",
            Category::PetCare => "Pet Care",
            Category::LendBorrow => "Lend/Borrow",
            Category::Other => "Other",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Category::Errands => "🛒",
            Category::Repair => "🔧",
            Category::PetCare => "🐾",
            Category::LendBorrow => "🤝",
            Category::Other => "✨",
        }
    }

    /// Parses a label or a CLI value name (`pet-care`) case-insensitively,
    /// falling back to `Other`.
    pub fn from_label(s: &str) -> Category {
        let s = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(s))
            .or_else(|| <Category as ValueEnum>::from_str(s, true).ok())
            .unwrap_or_default()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A help request posted on the board.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier, `t_` followed by random characters.
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Category,
    /// Estimated minutes of help needed.
    #[serde(rename = "timeNeeded", default)]
    pub time_needed_minutes: u32,
    /// Free-text offer ("Free", "Coffee", "$10", ...).
    #[serde(default)]
    pub payment: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub location: String,
    /// Public meeting point for the hand-off.
    #[serde(default)]
    pub safe_point: String,
    #[serde(default)]
    pub neighborhood: String,
    /// Set at creation and by repost only.
    pub posted_at: Millis,
    #[serde(default)]
    pub urgent: bool,
    /// When the urgent flag was raised, `0` if never.
    #[serde(default)]
    pub urgent_at: Millis,
}

/// Input for creating a task. Id and timestamps are assigned by the board.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub time_needed_minutes: u32,
    pub payment: String,
    pub contact: String,
    pub location: String,
    pub safe_point: String,
    pub neighborhood: String,
    pub urgent: bool,
}

/// A neighbor advertising something they can help with.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Skill {
    #[serde(rename = "nick")]
    pub nickname: String,
    #[serde(rename = "skill")]
    pub skill_text: String,
    #[serde(rename = "addedAt")]
    pub added_at: Millis,
}

/// Anonymous thank-you note.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ThankYou {
    pub text: String,
    #[serde(rename = "at", alias = "postedAt")]
    pub posted_at: Millis,
}
