//! Screen copy and option lists the rendering layer binds to.

use serde::Serialize;

use super::model::{
    CheckInFrequency, Choice, GOAL_OPTIONS, NotificationsChoice, SleepQuality, SupportType,
};
use super::state::Step;

/// Mood scale labels, index 0 (lowest) to 4 (highest).
pub const MOOD_LABELS: [&str; 5] = ["Very low", "Low", "Okay", "Good", "Great"];

/// Energy slider labels, level 1 to 5.
pub const ENERGY_LABELS: [&str; 5] = ["Drained", "Low", "Steady", "Energized", "Buzzing"];

/// One group of selectable options on a screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionGroup {
    /// Record field the group writes to.
    pub field: &'static str,
    pub prompt: &'static str,
    pub multi_select: bool,
    pub options: Vec<&'static str>,
}

/// Static description of one step, independent of any UI toolkit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Screen {
    pub step: Step,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub groups: Vec<OptionGroup>,
    /// Label for the button that calls `advance()` or `finalize()`.
    pub primary_action: &'static str,
}

impl Screen {
    /// "Step n of 4" style progress, or `None` on the Welcome screen.
    pub fn progress(&self) -> Option<(usize, usize)> {
        match self.step {
            Step::Welcome => None,
            step => Some((step.index(), Step::ALL.len() - 1)),
        }
    }
}

fn labels<T: Choice>() -> Vec<&'static str> {
    T::OPTIONS.iter().map(|o| o.label()).collect()
}

/// Build the screen description for a step.
pub fn screen_for(step: Step) -> Screen {
    match step {
        Step::Welcome => Screen {
            step,
            title: "Welcome",
            subtitle: "A few quick questions help us shape your check-ins. \
                       There are no wrong answers, and you can skip anything.",
            groups: Vec::new(),
            primary_action: "Get started",
        },
        Step::Goals => Screen {
            step,
            title: "What brings you here?",
            subtitle: "Pick as many as you like.",
            groups: vec![OptionGroup {
                field: "goals",
                prompt: "Your goals",
                multi_select: true,
                options: GOAL_OPTIONS.to_vec(),
            }],
            primary_action: "Continue",
        },
        Step::Baseline => Screen {
            step,
            title: "How are you lately?",
            subtitle: "A rough baseline so we can notice changes over time.",
            groups: vec![
                OptionGroup {
                    field: "moodIndex",
                    prompt: "Mood",
                    multi_select: false,
                    options: MOOD_LABELS.to_vec(),
                },
                OptionGroup {
                    field: "energyLevel",
                    prompt: "Energy",
                    multi_select: false,
                    options: ENERGY_LABELS.to_vec(),
                },
                OptionGroup {
                    field: SleepQuality::FIELD,
                    prompt: "Sleep quality",
                    multi_select: false,
                    options: labels::<SleepQuality>(),
                },
            ],
            primary_action: "Continue",
        },
        Step::Preferences => Screen {
            step,
            title: "Make it yours",
            subtitle: "Choose how and when we show up for you.",
            groups: vec![
                OptionGroup {
                    field: CheckInFrequency::FIELD,
                    prompt: "How often would you like to check in?",
                    multi_select: false,
                    options: labels::<CheckInFrequency>(),
                },
                OptionGroup {
                    field: NotificationsChoice::FIELD,
                    prompt: "Gentle reminders?",
                    multi_select: false,
                    options: labels::<NotificationsChoice>(),
                },
                OptionGroup {
                    field: SupportType::FIELD,
                    prompt: "What kind of support helps most?",
                    multi_select: true,
                    options: labels::<SupportType>(),
                },
            ],
            primary_action: "Continue",
        },
        Step::GentleStart => Screen {
            step,
            title: "A gentle start",
            subtitle: "You're all set. Start with one small check-in today.",
            groups: Vec::new(),
            primary_action: "Finish",
        },
    }
}

/// Label for a mood index, if it is on the scale.
pub fn mood_label(index: u8) -> Option<&'static str> {
    MOOD_LABELS.get(index as usize).copied()
}

/// Label for an energy level, if it is on the slider.
pub fn energy_label(level: u8) -> Option<&'static str> {
    (level as usize)
        .checked_sub(1)
        .and_then(|i| ENERGY_LABELS.get(i))
        .copied()
}
