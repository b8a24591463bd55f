use crate::model::{Field, SubmitOutcome};

/// UI-thread state that is not part of the shared document.
pub struct UiState {
    pub focus: Field,
    pub show_help: bool,
    pub status: String,
    pub tick: usize,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            focus: Field::Origin,
            show_help: false,
            status: "Fill in the form and press Enter to search.".into(),
            tick: 0,
        }
    }
}

impl UiState {
    pub fn next_field(&mut self) -> Field {
        let idx = Field::ALL.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = Field::ALL[(idx + 1) % Field::ALL.len()];
        self.focus
    }

    pub fn prev_field(&mut self) -> Field {
        let idx = Field::ALL.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = Field::ALL[(idx + Field::ALL.len() - 1) % Field::ALL.len()];
        self.focus
    }

    pub fn apply_outcome(&mut self, outcome: &SubmitOutcome) {
        self.status = match outcome {
            SubmitOutcome::Invalid => "Fix the highlighted fields and try again.".into(),
            SubmitOutcome::Completed { requests, .. } => {
                format!("Search finished ({requests} request(s)).")
            }
            SubmitOutcome::Aborted { reason, .. } => format!("Search failed: {reason}"),
            // A newer search owns the panel; leave its status alone.
            SubmitOutcome::Superseded { .. } => return,
        };
    }

    pub fn spinner_frame(&self) -> char {
        const FRAMES: [char; 4] = ['|', '/', '-', '\\'];
        FRAMES[self.tick % FRAMES.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_cycles_through_fields() {
        let mut state = UiState::default();
        assert_eq!(state.prev_field(), Field::InboundDate);
        assert_eq!(state.next_field(), Field::Origin);
        assert_eq!(state.next_field(), Field::Destination);
    }

    #[test]
    fn superseded_outcome_keeps_status() {
        let mut state = UiState::default();
        state.apply_outcome(&SubmitOutcome::Aborted {
            reason: "network error: refused".into(),
            requests: 1,
        });
        state.apply_outcome(&SubmitOutcome::Superseded { requests: 1 });
        assert_eq!(state.status, "Search failed: network error: refused");
    }
}
