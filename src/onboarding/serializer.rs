//! Canonical JSON encoding of the answer record.
//!
//! Output has lexicographically sorted keys, RFC 3339 timestamps, and omits
//! unset optional fields. The same record always encodes to the same bytes.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::Result;

use super::model::{
    AnswerRecord, CheckInFrequency, Choice, DEFAULT_ENERGY, ENERGY_MAX, ENERGY_MIN, MOOD_MAX,
    MOOD_MIN, NotificationsChoice, SleepQuality, SupportType, check_range,
};

/// Encode a record as compact canonical JSON.
pub fn serialize(record: &AnswerRecord) -> Result<String> {
    // serde_json::Map is BTreeMap-backed, so going through a Value sorts keys.
    let value = serde_json::to_value(record)?;
    Ok(serde_json::to_string(&value)?)
}

/// Encode a record as indented canonical JSON, for the results screen.
pub fn serialize_pretty(record: &AnswerRecord) -> Result<String> {
    let value = serde_json::to_value(record)?;
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Wire shape of a record before domain validation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawRecord {
    #[serde(default)]
    goals: Vec<String>,
    other_goal_text: Option<String>,
    mood_index: Option<i64>,
    energy_level: Option<i64>,
    sleep_quality: Option<String>,
    check_in_frequency: Option<String>,
    notifications_choice: Option<String>,
    #[serde(default)]
    support_types: Vec<String>,
    completed_date: Option<DateTime<Utc>>,
}

/// Decode a record produced by [`serialize`], re-checking every invariant.
///
/// Malformed JSON surfaces as `Error::Json`; values outside their declared
/// domains surface as the same `OnboardingError` kinds the setters use.
pub fn deserialize(json: &str) -> Result<AnswerRecord> {
    let raw: RawRecord = serde_json::from_str(json)?;

    let record = AnswerRecord {
        goals: raw.goals,
        other_goal_text: raw.other_goal_text,
        mood_index: raw.mood_index.map(narrow),
        energy_level: raw.energy_level.map(narrow).unwrap_or(DEFAULT_ENERGY),
        sleep_quality: raw
            .sleep_quality
            .as_deref()
            .map(SleepQuality::parse)
            .transpose()?,
        check_in_frequency: raw
            .check_in_frequency
            .as_deref()
            .map(CheckInFrequency::parse)
            .transpose()?,
        notifications_choice: raw
            .notifications_choice
            .as_deref()
            .map(NotificationsChoice::parse)
            .transpose()?,
        support_types: raw
            .support_types
            .iter()
            .map(|s| SupportType::parse(s))
            .collect::<std::result::Result<_, _>>()?,
        completed_at: raw.completed_date,
    };

    if let Some(mood) = raw.mood_index {
        check_range("moodIndex", mood, MOOD_MIN, MOOD_MAX)?;
    }
    if let Some(energy) = raw.energy_level {
        check_range("energyLevel", energy, ENERGY_MIN, ENERGY_MAX)?;
    }
    record.validate()?;
    Ok(record)
}

/// Saturating i64 → u8; range checks run on the raw value.
fn narrow(value: i64) -> u8 {
    value.clamp(0, u8::MAX as i64) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, OnboardingError};
    use crate::onboarding::OnboardingState;
    use chrono::TimeZone;

    fn sample_state() -> OnboardingState {
        let mut state = OnboardingState::new();
        state.toggle_goal("Sleep better");
        state.toggle_goal("Other");
        state.set_other_goal_text("Drink more water");
        state.set_mood(3).unwrap();
        state.set_energy(4);
        state.set_sleep_quality("Poor").unwrap();
        state.set_check_in_frequency("A few times a week").unwrap();
        state.set_notifications_choice("Decide later").unwrap();
        state.toggle_support_type("Journaling & reflection").unwrap();
        state
    }

    #[test]
    fn empty_record_omits_optionals() {
        let json = serialize(&AnswerRecord::default()).unwrap();
        assert_eq!(json, r#"{"energyLevel":3,"goals":[],"supportTypes":[]}"#);
    }

    #[test]
    fn full_record_has_sorted_keys() {
        let mut state = sample_state();
        state.record_mut().completed_at =
            Some(Utc.with_ymd_and_hms(2026, 10, 17, 9, 30, 0).unwrap());

        let json = serialize(state.record()).unwrap();
        assert_eq!(
            json,
            concat!(
                r#"{"checkInFrequency":"A few times a week","#,
                r#""completedDate":"2026-10-17T09:30:00Z","#,
                r#""energyLevel":4,"#,
                r#""goals":["Sleep better","Other"],"#,
                r#""moodIndex":3,"#,
                r#""notificationsChoice":"Decide later","#,
                r#""otherGoalText":"Drink more water","#,
                r#""sleepQuality":"Poor","#,
                r#""supportTypes":["Journaling & reflection"]}"#,
            )
        );
    }

    #[test]
    fn keys_are_sorted_in_every_encoding() {
        let state = sample_state();
        for json in [
            serialize(state.record()).unwrap(),
            serialize_pretty(state.record()).unwrap(),
        ] {
            let value: serde_json::Value = serde_json::from_str(&json).unwrap();
            let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
            let mut sorted = keys.clone();
            sorted.sort();
            assert_eq!(keys, sorted);

            // Textual order must match too, not just the parsed map.
            let positions: Vec<usize> = keys
                .iter()
                .map(|k| json.find(&format!("\"{k}\"")).unwrap())
                .collect();
            assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn serialize_is_deterministic() {
        let state = sample_state();
        let a = serialize(state.record()).unwrap();
        let b = serialize(state.record()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn deserialize_inverts_serialize() {
        let mut state = sample_state();
        state.record_mut().completed_at = Some(Utc::now());
        let json = serialize(state.record()).unwrap();
        let parsed = deserialize(&json).unwrap();
        assert_eq!(&parsed, state.record());
    }

    #[test]
    fn deserialize_rejects_out_of_domain_values() {
        let err = deserialize(r#"{"energyLevel":3,"goals":[],"moodIndex":7,"supportTypes":[]}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Onboarding(OnboardingError::OutOfRange { field: "moodIndex", value: 7, .. })
        ));

        let err = deserialize(r#"{"energyLevel":300,"goals":[],"supportTypes":[]}"#).unwrap_err();
        assert!(matches!(
            err,
            Error::Onboarding(OnboardingError::OutOfRange { field: "energyLevel", .. })
        ));

        let err = deserialize(r#"{"sleepQuality":"Great"}"#).unwrap_err();
        assert!(matches!(
            err,
            Error::Onboarding(OnboardingError::InvalidEnum { field: "sleepQuality", .. })
        ));
    }

    #[test]
    fn deserialize_rejects_blank_goals_and_other_text() {
        let err = deserialize(r#"{"goals":["  ",""],"otherGoalText":""}"#).unwrap_err();
        assert!(matches!(
            err,
            Error::Onboarding(OnboardingError::InvalidEnum { field: "goals", .. })
        ));

        let err = deserialize(r#"{"goals":["Sleep better"],"otherGoalText":"   "}"#).unwrap_err();
        assert!(matches!(
            err,
            Error::Onboarding(OnboardingError::InvalidEnum { field: "otherGoalText", .. })
        ));
    }

    #[test]
    fn deserialize_rejects_malformed_json() {
        assert!(matches!(deserialize("{not json"), Err(Error::Json(_))));
        assert!(matches!(deserialize(r#"{"moodIndex":null,"extra":1}"#), Err(Error::Json(_))));
    }
}
