//! Onboarding state — the answer record plus the step pointer, and the
//! setters each screen calls.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::OnboardingError;

use super::model::{
    AnswerRecord, CheckInFrequency, Choice, ENERGY_MAX, ENERGY_MIN, MOOD_MAX, MOOD_MIN,
    NotificationsChoice, SleepQuality, SupportType, check_range, toggle,
};

/// The five screens of the flow.
///
/// Progresses linearly: Welcome → Goals → Baseline → Preferences → GentleStart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Welcome,
    Goals,
    Baseline,
    Preferences,
    GentleStart,
}

impl Step {
    pub const ALL: [Step; 5] = [
        Step::Welcome,
        Step::Goals,
        Step::Baseline,
        Step::Preferences,
        Step::GentleStart,
    ];

    /// Pointer value in 0..=4.
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Option<Step> {
        Self::ALL.get(index).copied()
    }

    /// The following step, saturating at `GentleStart`.
    pub fn next(&self) -> Step {
        Self::from_index(self.index() + 1).unwrap_or(Step::GentleStart)
    }

    /// Whether this is the last interactive step (finalize, not advance).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::GentleStart)
    }
}

impl Default for Step {
    fn default() -> Self {
        Self::Welcome
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Welcome => "welcome",
            Self::Goals => "goals",
            Self::Baseline => "baseline",
            Self::Preferences => "preferences",
            Self::GentleStart => "gentle_start",
        };
        write!(f, "{s}")
    }
}

/// Which top-level surface the session is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Onboarding,
    ResultsDisplay,
    Main,
}

impl SessionPhase {
    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: SessionPhase) -> bool {
        use SessionPhase::*;
        matches!(
            (self, target),
            (Onboarding, ResultsDisplay) | (ResultsDisplay, Main) | (Main, Onboarding)
        )
    }
}

impl Default for SessionPhase {
    fn default() -> Self {
        Self::Onboarding
    }
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Onboarding => "onboarding",
            Self::ResultsDisplay => "results_display",
            Self::Main => "main",
        };
        write!(f, "{s}")
    }
}

/// In-progress answers and the current step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OnboardingState {
    record: AnswerRecord,
    step: Step,
}

impl OnboardingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume with an existing record at a given step.
    pub(crate) fn with_record(record: AnswerRecord, step: Step) -> Self {
        Self { record, step }
    }

    pub fn record(&self) -> &AnswerRecord {
        &self.record
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub(crate) fn record_mut(&mut self) -> &mut AnswerRecord {
        &mut self.record
    }

    pub(crate) fn set_step(&mut self, step: Step) {
        self.step = step;
    }

    /// Select `name` if absent, deselect it if present. Blank names are ignored.
    pub fn toggle_goal(&mut self, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        let selected = toggle(&mut self.record.goals, name.to_string());
        debug!(goal = name, selected, "Goal toggled");
    }

    /// Set the free-text goal. Blank text clears it. Does not touch `goals`.
    pub fn set_other_goal_text(&mut self, text: &str) {
        let text = text.trim();
        self.record.other_goal_text = (!text.is_empty()).then(|| text.to_string());
    }

    pub fn set_mood(&mut self, index: i64) -> Result<(), OnboardingError> {
        check_range("moodIndex", index, MOOD_MIN, MOOD_MAX)?;
        self.record.mood_index = Some(index as u8);
        debug!(mood = index, "Mood set");
        Ok(())
    }

    /// Set the energy level, clamped to 1..=5. Returns the stored value.
    pub fn set_energy(&mut self, level: i64) -> u8 {
        let clamped = level.clamp(ENERGY_MIN, ENERGY_MAX) as u8;
        self.record.energy_level = clamped;
        debug!(requested = level, energy = clamped, "Energy set");
        clamped
    }

    pub fn set_sleep_quality(&mut self, value: &str) -> Result<(), OnboardingError> {
        self.record.sleep_quality = Some(SleepQuality::parse(value)?);
        Ok(())
    }

    pub fn set_check_in_frequency(&mut self, value: &str) -> Result<(), OnboardingError> {
        self.record.check_in_frequency = Some(CheckInFrequency::parse(value)?);
        Ok(())
    }

    pub fn set_notifications_choice(&mut self, value: &str) -> Result<(), OnboardingError> {
        self.record.notifications_choice = Some(NotificationsChoice::parse(value)?);
        Ok(())
    }

    /// Toggle a support type. Unknown literals are rejected.
    pub fn toggle_support_type(&mut self, name: &str) -> Result<bool, OnboardingError> {
        let support = SupportType::parse(name)?;
        let selected = toggle(&mut self.record.support_types, support);
        debug!(support = %support, selected, "Support type toggled");
        Ok(selected)
    }

    /// Start over: empty record, pointer back to Welcome.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
