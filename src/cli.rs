//! Line-oriented driver for the onboarding flow.
//!
//! Stands in for a mobile UI: each command maps to one setter or one
//! transition on the controller, and `render` prints what the screen shows.

use crate::error::Result;
use crate::onboarding::model::OTHER_GOAL;
use crate::onboarding::screens::{energy_label, mood_label, screen_for};
use crate::onboarding::{
    AnswerRecord, Choice, FlowController, SessionPhase, Step, SupportType, serialize,
    serialize_pretty,
};

pub const HELP: &str = "\
Commands:
  goal <name>        toggle a goal (e.g. goal Reduce stress)
  other <text>       set the free-text goal (blank clears it)
  mood <0-4>         set mood
  energy <1-5>       set energy (clamped)
  sleep <value>      Poor | Fair | Good
  checkin <value>    Daily | A few times a week | Just when I feel like it
  notify <value>     Remind | Decide later
  support <value>    toggle a support type
  next               continue to the next screen
  finish             finish onboarding (last screen only)
  done               close the results screen
  restart            redo onboarding from the main app
  show               redraw the current screen
  help               this message
  quit               exit";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ToggleGoal(String),
    OtherGoalText(String),
    Mood(i64),
    Energy(i64),
    Sleep(String),
    CheckIn(String),
    Notify(String),
    Support(String),
    Next,
    Finish,
    Done,
    Restart,
    Show,
    Help,
    Quit,
}

impl std::str::FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let arg = |name: &str| -> std::result::Result<String, String> {
            if rest.is_empty() {
                Err(format!("`{name}` needs a value. Type `help` for usage."))
            } else {
                Ok(rest.to_string())
            }
        };
        let int = |name: &str| -> std::result::Result<i64, String> {
            arg(name)?
                .parse::<i64>()
                .map_err(|_| format!("`{name}` expects a whole number, got {rest:?}"))
        };

        match verb.to_ascii_lowercase().as_str() {
            "goal" => Ok(Self::ToggleGoal(arg("goal")?)),
            "other" => Ok(Self::OtherGoalText(rest.to_string())),
            "mood" => Ok(Self::Mood(int("mood")?)),
            "energy" => Ok(Self::Energy(int("energy")?)),
            "sleep" => Ok(Self::Sleep(arg("sleep")?)),
            "checkin" => Ok(Self::CheckIn(arg("checkin")?)),
            "notify" => Ok(Self::Notify(arg("notify")?)),
            "support" => Ok(Self::Support(arg("support")?)),
            "next" | "continue" => Ok(Self::Next),
            "finish" => Ok(Self::Finish),
            "done" => Ok(Self::Done),
            "restart" => Ok(Self::Restart),
            "show" => Ok(Self::Show),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "/quit" => Ok(Self::Quit),
            "" => Err("Empty command. Type `help` for usage.".to_string()),
            other => Err(format!("Unknown command `{other}`. Type `help` for usage.")),
        }
    }
}

/// Apply a command and return the text to print.
///
/// `Quit` is the caller's concern and renders nothing.
pub fn execute(flow: &mut FlowController, command: Command, pretty: bool) -> Result<String> {
    match command {
        Command::ToggleGoal(name) => flow.state_mut()?.toggle_goal(&name),
        Command::OtherGoalText(text) => flow.state_mut()?.set_other_goal_text(&text),
        Command::Mood(index) => flow.state_mut()?.set_mood(index)?,
        Command::Energy(level) => {
            flow.state_mut()?.set_energy(level);
        }
        Command::Sleep(value) => flow.state_mut()?.set_sleep_quality(&value)?,
        Command::CheckIn(value) => flow.state_mut()?.set_check_in_frequency(&value)?,
        Command::Notify(value) => flow.state_mut()?.set_notifications_choice(&value)?,
        Command::Support(value) => {
            flow.state_mut()?.toggle_support_type(&value)?;
        }
        Command::Next => {
            flow.advance()?;
        }
        Command::Finish => {
            flow.finalize()?;
        }
        Command::Done => flow.dismiss_results()?,
        Command::Restart => flow.restart_from_main()?,
        Command::Show => {}
        Command::Help => return Ok(HELP.to_string()),
        Command::Quit => return Ok(String::new()),
    }
    render(flow, pretty)
}

/// Describe what the current screen shows.
pub fn render(flow: &FlowController, pretty: bool) -> Result<String> {
    let record = flow.state().record();
    match flow.phase() {
        SessionPhase::ResultsDisplay => {
            let json = if pretty {
                serialize_pretty(record)?
            } else {
                serialize(record)?
            };
            Ok(format!("Your answers\n\n{json}\n\nType `done` to continue."))
        }
        SessionPhase::Main => {
            Ok("You're in the app. Type `restart` to go through onboarding again.".to_string())
        }
        SessionPhase::Onboarding => {
            let screen = screen_for(flow.step());
            let mut lines = Vec::new();

            match screen.progress() {
                Some((n, total)) => lines.push(format!("[{n}/{total}] {}", screen.title)),
                None => lines.push(screen.title.to_string()),
            }
            lines.push(screen.subtitle.to_string());

            for group in &screen.groups {
                lines.push(String::new());
                lines.push(format!("{}:", group.prompt));
                for (i, option) in group.options.iter().enumerate() {
                    let selected = is_selected(record, group.field, i, option);
                    let marker = match (group.multi_select, selected) {
                        (true, true) => "[x]",
                        (true, false) => "[ ]",
                        (false, true) => "(*)",
                        (false, false) => "( )",
                    };
                    lines.push(format!("  {marker} {option}"));
                }
            }

            if flow.step() == Step::Goals && record.has_goal(OTHER_GOAL) {
                if let Some(text) = record.other_goal_text() {
                    lines.push(format!("  Other: {text}"));
                }
            }
            if flow.step() == Step::Baseline {
                let mood = record.mood_index().and_then(mood_label).unwrap_or("not set");
                let energy = energy_label(record.energy_level()).unwrap_or("?");
                lines.push(String::new());
                lines.push(format!("Mood: {mood} · Energy: {energy}"));
            }

            lines.push(String::new());
            let verb = if flow.step().is_terminal() {
                "finish"
            } else {
                "next"
            };
            lines.push(format!("> {} (type `{verb}`)", screen.primary_action));
            Ok(lines.join("\n"))
        }
    }
}

fn is_selected(record: &AnswerRecord, field: &str, index: usize, option: &str) -> bool {
    match field {
        "goals" => record.has_goal(option),
        "moodIndex" => record.mood_index().map(usize::from) == Some(index),
        "energyLevel" => usize::from(record.energy_level()) == index + 1,
        "sleepQuality" => record.sleep_quality().map(|v| v.label()) == Some(option),
        "checkInFrequency" => record.check_in_frequency().map(|v| v.label()) == Some(option),
        "notificationsChoice" => record.notifications_choice().map(|v| v.label()) == Some(option),
        "supportTypes" => SupportType::parse(option).is_ok_and(|s| record.has_support_type(s)),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, OnboardingError};
    use crate::store::MemorySettingsStore;
    use std::sync::Arc;

    fn flow() -> FlowController {
        FlowController::open(Arc::new(MemorySettingsStore::new()))
    }

    #[test]
    fn parses_commands_with_multiword_values() {
        assert_eq!(
            "goal Reduce stress".parse::<Command>().unwrap(),
            Command::ToggleGoal("Reduce stress".into())
        );
        assert_eq!(
            "checkin  A few times a week ".parse::<Command>().unwrap(),
            Command::CheckIn("A few times a week".into())
        );
        assert_eq!("NEXT".parse::<Command>().unwrap(), Command::Next);
        assert_eq!("other".parse::<Command>().unwrap(), Command::OtherGoalText(String::new()));
        assert_eq!("mood -2".parse::<Command>().unwrap(), Command::Mood(-2));
    }

    #[test]
    fn rejects_bad_input() {
        assert!("".parse::<Command>().is_err());
        assert!("goal".parse::<Command>().is_err());
        assert!("mood high".parse::<Command>().unwrap_err().contains("whole number"));
        assert!("dance".parse::<Command>().unwrap_err().contains("Unknown command"));
    }

    #[test]
    fn execute_routes_setters_and_transitions() {
        let mut flow = flow();
        execute(&mut flow, Command::Next, false).unwrap();
        let out = execute(&mut flow, Command::ToggleGoal("Sleep better".into()), false).unwrap();
        assert!(out.contains("[x] Sleep better"));
        assert!(out.contains("[ ] Reduce stress"));

        let err = execute(&mut flow, Command::Mood(9), false).unwrap_err();
        assert!(matches!(err, Error::Onboarding(OnboardingError::OutOfRange { .. })));

        let err = execute(&mut flow, Command::Finish, false).unwrap_err();
        assert!(matches!(
            err,
            Error::Onboarding(OnboardingError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn full_walkthrough_renders_results_then_main() {
        let mut flow = flow();
        for _ in 0..4 {
            execute(&mut flow, Command::Next, false).unwrap();
        }
        let out = execute(&mut flow, Command::Finish, false).unwrap();
        assert!(out.contains("\"completedDate\""));
        assert!(out.contains("\"sleepQuality\":\"Fair\""));

        let out = execute(&mut flow, Command::Done, false).unwrap();
        assert!(out.contains("restart"));
        assert_eq!(flow.phase(), SessionPhase::Main);

        let out = execute(&mut flow, Command::Restart, false).unwrap();
        assert!(out.starts_with("Welcome"));
    }

    #[test]
    fn baseline_screen_shows_scale_labels() {
        let mut flow = flow();
        execute(&mut flow, Command::Next, false).unwrap();
        execute(&mut flow, Command::Next, false).unwrap();
        let out = execute(&mut flow, Command::Mood(4), false).unwrap();
        assert!(out.starts_with("[2/4]"));
        assert!(out.contains("(*) Great"));
        assert!(out.contains("Mood: Great · Energy: Steady"));
    }

    #[test]
    fn preferences_screen_marks_selected_support_types() {
        let mut flow = flow();
        for _ in 0..3 {
            execute(&mut flow, Command::Next, false).unwrap();
        }
        let support = Command::Support("Quick calming tools".into());
        let out = execute(&mut flow, support, false).unwrap();
        assert!(out.contains("[x] Quick calming tools"));
        assert!(out.contains("[ ] Journaling & reflection"));
    }

    #[test]
    fn help_and_quit_do_not_touch_state() {
        let mut flow = flow();
        assert_eq!(execute(&mut flow, Command::Help, true).unwrap(), HELP);
        assert_eq!(execute(&mut flow, Command::Quit, true).unwrap(), "");
        assert_eq!(flow.step(), Step::Welcome);
    }
}
