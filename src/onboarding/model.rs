//! Answer record and the closed option sets it draws from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::OnboardingError;

/// Goal options offered on the Goals screen, in display order.
///
/// The first entry is what an empty selection defaults to.
pub const GOAL_OPTIONS: &[&str] = &[
    "Reduce stress",
    "Sleep better",
    "Boost my energy",
    "Understand my moods",
    "Build healthy habits",
    OTHER_GOAL,
];

/// Sentinel goal that unlocks the free-text field.
pub const OTHER_GOAL: &str = "Other";

/// Mood scale bounds (5-point ordinal, low to high).
pub const MOOD_MIN: i64 = 0;
pub const MOOD_MAX: i64 = 4;

/// Energy slider bounds.
pub const ENERGY_MIN: i64 = 1;
pub const ENERGY_MAX: i64 = 5;
pub const DEFAULT_ENERGY: u8 = 3;

/// A closed set of string literals backing a single-choice or multi-choice field.
pub trait Choice: Copy + Eq + Sized + 'static {
    /// Record field name, used in error messages.
    const FIELD: &'static str;
    /// Every option in display order.
    const OPTIONS: &'static [Self];

    /// The literal shown to the user and written to JSON.
    fn label(&self) -> &'static str;

    /// Parse a literal, failing with `InvalidEnum` if it is not declared.
    fn parse(value: &str) -> Result<Self, OnboardingError> {
        Self::OPTIONS
            .iter()
            .copied()
            .find(|opt| opt.label() == value)
            .ok_or_else(|| OnboardingError::InvalidEnum {
                field: Self::FIELD,
                value: value.to_string(),
                expected: Self::OPTIONS
                    .iter()
                    .map(|o| format!("{:?}", o.label()))
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    /// First declared option; the default-fill value.
    fn first() -> Self {
        Self::OPTIONS[0]
    }
}

/// How well the user has been sleeping lately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SleepQuality {
    Poor,
    Fair,
    Good,
}

impl Choice for SleepQuality {
    const FIELD: &'static str = "sleepQuality";
    const OPTIONS: &'static [Self] = &[Self::Poor, Self::Fair, Self::Good];

    fn label(&self) -> &'static str {
        match self {
            Self::Poor => "Poor",
            Self::Fair => "Fair",
            Self::Good => "Good",
        }
    }
}

/// How often the user wants to check in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckInFrequency {
    Daily,
    #[serde(rename = "A few times a week")]
    FewTimesAWeek,
    #[serde(rename = "Just when I feel like it")]
    WhenIFeelLikeIt,
}

impl Choice for CheckInFrequency {
    const FIELD: &'static str = "checkInFrequency";
    const OPTIONS: &'static [Self] = &[Self::Daily, Self::FewTimesAWeek, Self::WhenIFeelLikeIt];

    fn label(&self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::FewTimesAWeek => "A few times a week",
            Self::WhenIFeelLikeIt => "Just when I feel like it",
        }
    }
}

/// Whether the user wants reminder notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationsChoice {
    Remind,
    #[serde(rename = "Decide later")]
    DecideLater,
}

impl Choice for NotificationsChoice {
    const FIELD: &'static str = "notificationsChoice";
    const OPTIONS: &'static [Self] = &[Self::Remind, Self::DecideLater];

    fn label(&self) -> &'static str {
        match self {
            Self::Remind => "Remind",
            Self::DecideLater => "Decide later",
        }
    }
}

/// Kinds of support the user is interested in (multi-select).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SupportType {
    #[serde(rename = "Quick calming tools")]
    CalmingTools,
    #[serde(rename = "Journaling & reflection")]
    Journaling,
    #[serde(rename = "Data insights & patterns")]
    DataInsights,
}

impl Choice for SupportType {
    const FIELD: &'static str = "supportTypes";
    const OPTIONS: &'static [Self] = &[Self::CalmingTools, Self::Journaling, Self::DataInsights];

    fn label(&self) -> &'static str {
        match self {
            Self::CalmingTools => "Quick calming tools",
            Self::Journaling => "Journaling & reflection",
            Self::DataInsights => "Data insights & patterns",
        }
    }
}

macro_rules! choice_str_impls {
    ($($ty:ty),+) => {
        $(
            impl std::fmt::Display for $ty {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    f.write_str(self.label())
                }
            }

            impl std::str::FromStr for $ty {
                type Err = OnboardingError;
                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    <$ty as Choice>::parse(s)
                }
            }
        )+
    };
}

choice_str_impls!(SleepQuality, CheckInFrequency, NotificationsChoice, SupportType);

/// Answers collected during one onboarding session.
///
/// Fields are only writable through [`super::OnboardingState`], which keeps
/// them inside their declared domains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub(crate) goals: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) other_goal_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) mood_index: Option<u8>,
    pub(crate) energy_level: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) sleep_quality: Option<SleepQuality>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) check_in_frequency: Option<CheckInFrequency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) notifications_choice: Option<NotificationsChoice>,
    pub(crate) support_types: Vec<SupportType>,
    #[serde(rename = "completedDate", skip_serializing_if = "Option::is_none")]
    pub(crate) completed_at: Option<DateTime<Utc>>,
}

impl Default for AnswerRecord {
    fn default() -> Self {
        Self {
            goals: Vec::new(),
            other_goal_text: None,
            mood_index: None,
            energy_level: DEFAULT_ENERGY,
            sleep_quality: None,
            check_in_frequency: None,
            notifications_choice: None,
            support_types: Vec::new(),
            completed_at: None,
        }
    }
}

impl AnswerRecord {
    pub fn goals(&self) -> &[String] {
        &self.goals
    }

    pub fn has_goal(&self, name: &str) -> bool {
        self.goals.iter().any(|g| g == name)
    }

    /// Free-text goal; only meaningful while "Other" is selected.
    pub fn other_goal_text(&self) -> Option<&str> {
        self.other_goal_text.as_deref()
    }

    pub fn mood_index(&self) -> Option<u8> {
        self.mood_index
    }

    pub fn energy_level(&self) -> u8 {
        self.energy_level
    }

    pub fn sleep_quality(&self) -> Option<SleepQuality> {
        self.sleep_quality
    }

    pub fn check_in_frequency(&self) -> Option<CheckInFrequency> {
        self.check_in_frequency
    }

    pub fn notifications_choice(&self) -> Option<NotificationsChoice> {
        self.notifications_choice
    }

    pub fn support_types(&self) -> &[SupportType] {
        &self.support_types
    }

    pub fn has_support_type(&self, support: SupportType) -> bool {
        self.support_types.contains(&support)
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Check every domain invariant. Used when a record comes from outside
    /// (e.g. a persisted JSON blob) rather than through the setters.
    pub fn validate(&self) -> Result<(), OnboardingError> {
        if let Some(mood) = self.mood_index {
            check_range("moodIndex", mood as i64, MOOD_MIN, MOOD_MAX)?;
        }
        check_range(
            "energyLevel",
            self.energy_level as i64,
            ENERGY_MIN,
            ENERGY_MAX,
        )?;
        if let Some(bad) = self.goals.iter().find(|g| !is_trimmed_nonblank(g)) {
            return Err(OnboardingError::InvalidEnum {
                field: "goals",
                value: bad.clone(),
                expected: "a non-blank, trimmed goal name".to_string(),
            });
        }
        if let Some(text) = self.other_goal_text.as_deref().filter(|t| !is_trimmed_nonblank(t)) {
            return Err(OnboardingError::InvalidEnum {
                field: "otherGoalText",
                value: text.to_string(),
                expected: "non-blank, trimmed text".to_string(),
            });
        }
        if let Some(dup) = first_duplicate(&self.goals) {
            return Err(OnboardingError::InvalidEnum {
                field: "goals",
                value: dup.clone(),
                expected: "each goal at most once".to_string(),
            });
        }
        if let Some(dup) = first_duplicate(&self.support_types) {
            return Err(OnboardingError::InvalidEnum {
                field: SupportType::FIELD,
                value: dup.label().to_string(),
                expected: "each support type at most once".to_string(),
            });
        }
        Ok(())
    }
}

/// What `toggle_goal` and `set_other_goal_text` would store unchanged.
fn is_trimmed_nonblank(s: &str) -> bool {
    !s.is_empty() && s.trim() == s
}

pub(crate) fn check_range(
    field: &'static str,
    value: i64,
    min: i64,
    max: i64,
) -> Result<(), OnboardingError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(OnboardingError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

fn first_duplicate<T: PartialEq>(items: &[T]) -> Option<&T> {
    items
        .iter()
        .enumerate()
        .find(|(i, item)| items[..*i].contains(item))
        .map(|(_, item)| item)
}

/// Append `item` if absent, remove it if present. Returns whether it is now selected.
pub(crate) fn toggle<T: PartialEq>(items: &mut Vec<T>, item: T) -> bool {
    if let Some(pos) = items.iter().position(|i| *i == item) {
        items.remove(pos);
        false
    } else {
        items.push(item);
        true
    }
}

/// Settings keys used for onboarding persistence.
pub mod settings_keys {
    /// Whether onboarding should be shown at the next session start.
    pub const ONBOARDING_IN_PROGRESS: &str = "onboardingInProgress";
    /// Serialized record of the last completed onboarding.
    pub const ONBOARDING_RECORD: &str = "onboardingRecord";
}
