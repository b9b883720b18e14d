//! Core type definitions for the application

use tokio::time::Instant;

/// Which panel of the UI currently has keyboard focus
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActiveSection {
    Upload,
    Player,
    Analysis,
}

impl ActiveSection {
    pub fn next(self) -> Self {
        match self {
            ActiveSection::Upload => ActiveSection::Player,
            ActiveSection::Player => ActiveSection::Analysis,
            ActiveSection::Analysis => ActiveSection::Upload,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ActiveSection::Upload => ActiveSection::Analysis,
            ActiveSection::Player => ActiveSection::Upload,
            ActiveSection::Analysis => ActiveSection::Player,
        }
    }
}

/// Tab of the analysis result view
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AnalysisTab {
    #[default]
    Analysis,
    Genres,
    Instruments,
}

impl AnalysisTab {
    pub const ALL: [AnalysisTab; 3] = [AnalysisTab::Analysis, AnalysisTab::Genres, AnalysisTab::Instruments];

    pub fn next(self) -> Self {
        match self {
            Self::Analysis => Self::Genres,
            Self::Genres => Self::Instruments,
            Self::Instruments => Self::Analysis,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Analysis => Self::Instruments,
            Self::Genres => Self::Analysis,
            Self::Instruments => Self::Genres,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Analysis => "Analysis",
            Self::Genres => "Genres",
            Self::Instruments => "Instruments",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::Analysis => 0,
            Self::Genres => 1,
            Self::Instruments => 2,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// Transient toast shown over the layout
#[derive(Clone, Debug)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub description: String,
    pub created_at: Instant,
}

/// UI state for the application
#[derive(Clone, Debug)]
pub struct UiState {
    pub active_section: ActiveSection,
    pub path_input: String,
    pub analysis_tab: AnalysisTab,
    pub notification: Option<Notification>,
    pub show_help_popup: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            active_section: ActiveSection::Upload,
            path_input: String::new(),
            analysis_tab: AnalysisTab::default(),
            notification: None,
            show_help_popup: false,
        }
    }
}
