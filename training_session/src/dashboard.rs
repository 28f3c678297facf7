//! Dashboard flow: password gate, then the form, then the report.
//!
//! The whole state of a session lives in [`DashboardState`] and is passed to
//! [`render`], which decides what to show.

use std::fmt;

use crate::{Analysis, Athlete, WorkoutExport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateState {
    #[default]
    Locked,
    Rejected,
    Unlocked,
}

/// Password check in front of the dashboard.
#[derive(Clone, Default)]
pub struct PasswordGate {
    secret: Option<String>,
}

impl fmt::Debug for PasswordGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordGate")
            .field("configured", &self.secret.is_some())
            .finish_non_exhaustive()
    }
}

impl PasswordGate {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: Some(secret.into()),
        }
    }

    /// Gate without a password, always unlocked.
    pub const fn open() -> Self {
        Self { secret: None }
    }

    pub fn initial_state(&self) -> GateState {
        match self.secret {
            Some(_) => GateState::Locked,
            None => GateState::Unlocked,
        }
    }

    pub fn check(&self, entered: &str) -> GateState {
        match self.secret.as_deref() {
            None => GateState::Unlocked,
            Some(secret) if secret == entered => GateState::Unlocked,
            Some(_) => GateState::Rejected,
        }
    }
}

/// Inputs collected from the coach.
#[derive(Debug, Clone, Default)]
pub struct Form {
    pub export: Option<WorkoutExport>,
    pub athlete: Option<Athlete>,
}

#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub gate: GateState,
    pub form: Form,
}

impl DashboardState {
    pub fn new(gate: &PasswordGate) -> Self {
        Self {
            gate: gate.initial_state(),
            form: Form::default(),
        }
    }

    /// The entered password is only compared, never kept.
    pub fn submit_password(&mut self, gate: &PasswordGate, entered: &str) {
        self.gate = gate.check(entered);
    }

    pub const fn is_unlocked(&self) -> bool {
        matches!(self.gate, GateState::Unlocked)
    }
}

#[derive(Debug)]
pub enum View<'a> {
    PasswordPrompt {
        rejected: bool,
    },
    UploadForm {
        missing_export: bool,
        missing_athlete: bool,
    },
    Report(Box<Analysis<'a>>),
}

/// What to show for `state`.
pub fn render(state: &DashboardState) -> View<'_> {
    match state.gate {
        GateState::Locked => View::PasswordPrompt { rejected: false },
        GateState::Rejected => View::PasswordPrompt { rejected: true },
        GateState::Unlocked => match (&state.form.export, &state.form.athlete) {
            (Some(export), Some(athlete)) => View::Report(Box::new(Analysis::run(athlete, export))),
            (export, athlete) => View::UploadForm {
                missing_export: export.is_none(),
                missing_athlete: athlete.is_none(),
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = "\
Name
Mario Rossi
Time,HR (bpm)
00:00:00,120
00:00:01,125
";

    fn export() -> WorkoutExport {
        WorkoutExport::from_reader(EXPORT.as_bytes()).expect("valid export")
    }

    #[test]
    fn test_locked_until_password() {
        let gate = PasswordGate::new("segreto");
        let state = DashboardState::new(&gate);

        assert!(matches!(
            render(&state),
            View::PasswordPrompt { rejected: false }
        ));
    }

    #[test]
    fn test_wrong_password() {
        let gate = PasswordGate::new("segreto");
        let mut state = DashboardState::new(&gate);

        state.submit_password(&gate, "password");

        assert_eq!(state.gate, GateState::Rejected);
        assert!(matches!(render(&state), View::PasswordPrompt { rejected: true }));
    }

    #[test]
    fn test_retry_after_wrong_password() {
        let gate = PasswordGate::new("segreto");
        let mut state = DashboardState::new(&gate);

        state.submit_password(&gate, "password");
        state.submit_password(&gate, "segreto");

        assert!(state.is_unlocked());
    }

    #[test]
    fn test_open_gate() {
        let gate = PasswordGate::open();

        assert_eq!(DashboardState::new(&gate).gate, GateState::Unlocked);
        assert_eq!(gate.check(""), GateState::Unlocked);
    }

    #[test]
    fn test_form_incomplete() {
        let gate = PasswordGate::open();
        let mut state = DashboardState::new(&gate);
        state.form.export = Some(export());

        assert!(matches!(
            render(&state),
            View::UploadForm {
                missing_export: false,
                missing_athlete: true,
            }
        ));
    }

    #[test]
    fn test_report() {
        let gate = PasswordGate::new("segreto");
        let mut state = DashboardState::new(&gate);
        state.submit_password(&gate, "segreto");
        state.form.export = Some(export());
        state.form.athlete = Athlete::new("Mario Rossi", 30).ok();

        let View::Report(analysis) = render(&state) else {
            panic!("expected report");
        };

        assert_eq!(analysis.distribution.total_samples, 2);
        assert_eq!(analysis.athlete.name(), "Mario Rossi");
    }

    #[test]
    fn test_debug_hides_secret() {
        let gate = PasswordGate::new("segreto");

        assert!(!format!("{gate:?}").contains("segreto"));
    }
}
