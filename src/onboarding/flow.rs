//! FlowController — sequences the steps, fills defaults on the way out of
//! each step, and owns the session phase and the onboarding flag.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::OnboardingError;
use crate::store::SettingsStore;

use super::model::{
    AnswerRecord, CheckInFrequency, Choice, GOAL_OPTIONS, NotificationsChoice, SleepQuality,
    settings_keys,
};
use super::serializer;
use super::state::{OnboardingState, SessionPhase, Step};

/// Default broadcast channel capacity.
const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Notifications sent to the rendering layer after each transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FlowEvent {
    /// The step pointer moved.
    StepChanged { from: Step, to: Step },
    /// The record was timestamped and the results screen should show.
    Finalized { completed_at: DateTime<Utc> },
    /// Results were dismissed; the session is now in the main app.
    ResultsDismissed,
    /// The user asked to redo onboarding from the main app.
    Restarted,
}

/// Drives one onboarding session.
pub struct FlowController {
    session_id: Uuid,
    state: OnboardingState,
    phase: SessionPhase,
    store: Arc<dyn SettingsStore>,
    events: broadcast::Sender<FlowEvent>,
}

impl FlowController {
    /// Start a session, choosing the initial phase from the onboarding flag.
    ///
    /// A missing flag means first launch, so onboarding is shown. When the
    /// flag is `false` the session opens in `Main` with the last persisted
    /// record, if one can be read.
    pub fn open(store: Arc<dyn SettingsStore>) -> Self {
        let session_id = Uuid::new_v4();
        let in_progress = match store.get_flag(settings_keys::ONBOARDING_IN_PROGRESS) {
            Ok(flag) => flag.unwrap_or(true),
            Err(e) => {
                warn!(%session_id, "Failed to read onboarding flag, showing onboarding: {}", e);
                true
            }
        };

        let (phase, state) = if in_progress {
            (SessionPhase::Onboarding, OnboardingState::new())
        } else {
            let state = load_persisted_record(store.as_ref())
                .map(|record| OnboardingState::with_record(record, Step::GentleStart))
                .unwrap_or_default();
            (SessionPhase::Main, state)
        };

        info!(%session_id, %phase, "Onboarding session opened");

        let (events, _rx) = broadcast::channel(DEFAULT_EVENT_CAPACITY);
        Self {
            session_id,
            state,
            phase,
            store,
            events,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn step(&self) -> Step {
        self.state.step()
    }

    pub fn state(&self) -> &OnboardingState {
        &self.state
    }

    /// Setter access for the current screen. Only granted while onboarding.
    pub fn state_mut(&mut self) -> Result<&mut OnboardingState, OnboardingError> {
        if self.phase != SessionPhase::Onboarding {
            return Err(self.invalid_transition("edit answers"));
        }
        Ok(&mut self.state)
    }

    /// Subscribe to flow events. Each view that needs to re-render calls this.
    pub fn subscribe(&self) -> broadcast::Receiver<FlowEvent> {
        self.events.subscribe()
    }

    /// Fill the current step's defaults, then move to the next step.
    ///
    /// Empty selections never block progress. At `GentleStart` the pointer
    /// stays put; `finalize()` is the way out of that step.
    pub fn advance(&mut self) -> Result<Step, OnboardingError> {
        if self.phase != SessionPhase::Onboarding {
            return Err(self.invalid_transition("advance"));
        }

        let from = self.state.step();
        fill_defaults(&mut self.state, from);
        let to = from.next();
        self.state.set_step(to);

        if to != from {
            info!(session_id = %self.session_id, %from, %to, "Onboarding step advanced");
            let _ = self.events.send(FlowEvent::StepChanged { from, to });
        }
        Ok(to)
    }

    /// Timestamp the record and show results. Only valid from `GentleStart`.
    pub fn finalize(&mut self) -> Result<DateTime<Utc>, OnboardingError> {
        self.finalize_at(Utc::now())
    }

    /// [`finalize`](Self::finalize) with an explicit completion time.
    pub fn finalize_at(&mut self, now: DateTime<Utc>) -> Result<DateTime<Utc>, OnboardingError> {
        if !self.phase.can_transition_to(SessionPhase::ResultsDisplay)
            || !self.state.step().is_terminal()
        {
            return Err(self.invalid_transition("finalize"));
        }

        self.state.record_mut().completed_at = Some(now);
        self.phase = SessionPhase::ResultsDisplay;

        info!(session_id = %self.session_id, completed_at = %now, "Onboarding finalized");
        let _ = self.events.send(FlowEvent::Finalized { completed_at: now });
        Ok(now)
    }

    /// Leave the results screen for the main app and stop showing onboarding.
    pub fn dismiss_results(&mut self) -> Result<(), OnboardingError> {
        if !self.phase.can_transition_to(SessionPhase::Main) {
            return Err(self.invalid_transition("dismiss results"));
        }

        // Flag before record: if only the flag lands, the next launch opens
        // Main with an empty record instead of repeating onboarding.
        let flag_saved = self.persist_flag(false);
        let record_saved = self.persist_record();
        if flag_saved && !record_saved {
            warn!(
                session_id = %self.session_id,
                "Onboarding marked complete without a stored record; next launch shows an empty summary"
            );
        }
        self.phase = SessionPhase::Main;

        info!(session_id = %self.session_id, "Onboarding results dismissed");
        let _ = self.events.send(FlowEvent::ResultsDismissed);
        Ok(())
    }

    /// Wipe answers and go back to the Welcome step. Only valid from `Main`.
    pub fn restart_from_main(&mut self) -> Result<(), OnboardingError> {
        if !self.phase.can_transition_to(SessionPhase::Onboarding) {
            return Err(self.invalid_transition("restart onboarding"));
        }

        self.state.reset();
        let _ = self.persist_flag(true);
        self.phase = SessionPhase::Onboarding;

        info!(session_id = %self.session_id, "Onboarding restarted");
        let _ = self.events.send(FlowEvent::Restarted);
        Ok(())
    }

    fn invalid_transition(&self, action: &'static str) -> OnboardingError {
        let err = OnboardingError::InvalidTransition {
            action,
            step: self.state.step().to_string(),
            phase: self.phase.to_string(),
        };
        warn!(session_id = %self.session_id, "Rejected transition: {}", err);
        err
    }

    /// Returns whether the write landed.
    fn persist_flag(&self, in_progress: bool) -> bool {
        match self
            .store
            .set_flag(settings_keys::ONBOARDING_IN_PROGRESS, in_progress)
        {
            Ok(()) => true,
            Err(e) => {
                warn!(session_id = %self.session_id, "Failed to persist onboarding flag: {}", e);
                false
            }
        }
    }

    /// Returns whether the write landed.
    fn persist_record(&self) -> bool {
        let json = match serializer::serialize(self.state.record()) {
            Ok(json) => json,
            Err(e) => {
                warn!(session_id = %self.session_id, "Failed to serialize onboarding record: {}", e);
                return false;
            }
        };
        match self
            .store
            .set(settings_keys::ONBOARDING_RECORD, serde_json::Value::String(json))
        {
            Ok(()) => true,
            Err(e) => {
                warn!(session_id = %self.session_id, "Failed to persist onboarding record: {}", e);
                false
            }
        }
    }
}

/// Populate whatever the user left unset on `step`.
fn fill_defaults(state: &mut OnboardingState, step: Step) {
    let record = state.record_mut();
    match step {
        Step::Goals => {
            if record.goals.is_empty() {
                record.goals.push(GOAL_OPTIONS[0].to_string());
            }
        }
        Step::Baseline => {
            record.sleep_quality.get_or_insert(SleepQuality::Fair);
        }
        Step::Preferences => {
            record
                .check_in_frequency
                .get_or_insert(CheckInFrequency::first());
            record
                .notifications_choice
                .get_or_insert(NotificationsChoice::first());
        }
        Step::Welcome | Step::GentleStart => {}
    }
}

fn load_persisted_record(store: &dyn SettingsStore) -> Option<AnswerRecord> {
    let value = match store.get(settings_keys::ONBOARDING_RECORD) {
        Ok(value) => value?,
        Err(e) => {
            warn!("Failed to read persisted onboarding record: {}", e);
            return None;
        }
    };
    let json = value.as_str()?;
    match serializer::deserialize(json) {
        Ok(record) => Some(record),
        Err(e) => {
            warn!("Ignoring unreadable onboarding record: {}", e);
            None
        }
    }
}
