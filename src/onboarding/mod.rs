//! Onboarding system — first-launch wizard for the wellness tracker.
//!
//! The user walks five screens (Welcome, Goals, Baseline, Preferences,
//! GentleStart). Screens write answers through `OnboardingState`; the
//! `FlowController` moves between them, fills defaults for anything left
//! blank, and timestamps the record when the user finishes.

pub mod flow;
pub mod model;
pub mod screens;
pub mod serializer;
pub mod state;

pub use flow::{FlowController, FlowEvent};
pub use model::{
    AnswerRecord, CheckInFrequency, Choice, NotificationsChoice, SleepQuality, SupportType,
};
pub use screens::{Screen, screen_for};
pub use serializer::{deserialize, serialize, serialize_pretty};
pub use state::{OnboardingState, SessionPhase, Step};
