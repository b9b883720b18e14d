//! Analysis results and the Idle → Running → Complete/Failed state machine

use chrono::{DateTime, Local};

/// Feature summary for one analyzed resource
#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisResult {
    pub genre: String,
    pub bpm: u32,
    pub key: String,
    pub mood: String,
    pub instruments: Vec<String>,
    /// Per-genre probability in percent
    pub genre_scores: Vec<(String, f64)>,
    /// Per-instrument detection confidence in percent
    pub instrument_scores: Vec<(String, f64)>,
    pub analyzed_at: DateTime<Local>,
}

#[derive(Clone, Debug, PartialEq, Default)]
pub enum AnalysisState {
    #[default]
    Idle,
    Running {
        progress: f64,
    },
    Complete(AnalysisResult),
    Failed {
        message: String,
    },
}

impl AnalysisState {
    pub fn is_running(&self) -> bool {
        matches!(self, AnalysisState::Running { .. })
    }

    #[cfg(test)]
    pub fn progress(&self) -> f64 {
        match self {
            AnalysisState::Idle => 0.0,
            AnalysisState::Running { progress } => *progress,
            AnalysisState::Complete(_) | AnalysisState::Failed { .. } => 100.0,
        }
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            AnalysisState::Complete(result) => Some(result),
            _ => None,
        }
    }

    /// Enter Running from any non-running state. Any previous result is dropped.
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        *self = AnalysisState::Running { progress: 0.0 };
        true
    }

    /// Add a strictly positive increment, capped at 100.
    ///
    /// Returns `Some(progress)` while running, `None` in any other state.
    pub fn advance(&mut self, increment: f64) -> Option<f64> {
        match self {
            AnalysisState::Running { progress } => {
                if increment.is_finite() && increment > 0.0 {
                    *progress = (*progress + increment).min(100.0);
                }
                Some(*progress)
            }
            _ => None,
        }
    }

    pub fn reached_end(&self) -> bool {
        matches!(self, AnalysisState::Running { progress } if *progress >= 100.0)
    }

    /// Only a run that reached 100 can complete.
    pub fn complete(&mut self, result: AnalysisResult) -> bool {
        if !self.reached_end() {
            return false;
        }
        *self = AnalysisState::Complete(result);
        true
    }

    pub fn fail(&mut self, message: String) -> bool {
        if !self.is_running() {
            return false;
        }
        *self = AnalysisState::Failed { message };
        true
    }

    pub fn reset(&mut self) {
        *self = AnalysisState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> AnalysisResult {
        AnalysisResult {
            genre: "Electronic".to_string(),
            bpm: 128,
            key: "C Minor".to_string(),
            mood: "Energetic".to_string(),
            instruments: vec!["Drums".to_string()],
            genre_scores: vec![],
            instrument_scores: vec![],
            analyzed_at: Local::now(),
        }
    }

    #[test]
    fn test_progress_is_monotonic_and_capped() {
        let mut state = AnalysisState::default();
        assert!(state.start());

        let mut last = 0.0;
        for _ in 0..30 {
            let now = state.advance(7.5).unwrap();
            assert!(now >= last);
            last = now;
        }
        assert_eq!(last, 100.0);
        assert!(state.reached_end());
    }

    #[test]
    fn test_non_positive_increment_is_ignored() {
        let mut state = AnalysisState::default();
        state.start();
        state.advance(5.0);
        assert_eq!(state.advance(-3.0), Some(5.0));
        assert_eq!(state.advance(f64::NAN), Some(5.0));
    }

    #[test]
    fn test_complete_requires_full_progress() {
        let mut state = AnalysisState::default();
        state.start();
        state.advance(50.0);
        assert!(!state.complete(sample_result()));

        state.advance(50.0);
        assert!(state.complete(sample_result()));
        assert_eq!(state.result().unwrap().bpm, 128);
        assert_eq!(state.progress(), 100.0);
    }

    #[test]
    fn test_restart_from_complete_drops_result() {
        let mut state = AnalysisState::default();
        state.start();
        state.advance(100.0);
        state.complete(sample_result());

        assert!(state.start());
        assert_eq!(state.progress(), 0.0);
        assert!(state.result().is_none());
    }

    #[test]
    fn test_start_while_running_is_rejected() {
        let mut state = AnalysisState::default();
        state.start();
        state.advance(40.0);
        assert!(!state.start());
        assert_eq!(state.progress(), 40.0);
    }

    #[test]
    fn test_fail_only_from_running() {
        let mut state = AnalysisState::default();
        assert!(!state.fail("boom".to_string()));

        state.start();
        assert!(state.fail("boom".to_string()));
        assert!(matches!(state, AnalysisState::Failed { .. }));
    }

    #[test]
    fn test_advance_outside_running_is_noop() {
        let mut state = AnalysisState::default();
        assert_eq!(state.advance(10.0), None);
        assert_eq!(state, AnalysisState::Idle);
    }
}
