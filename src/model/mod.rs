//! Model module - Application state and data types
//!
//! - `types`: UI enums and state (focus, tabs, notifications)
//! - `resource`: The loaded audio file and its revocable URL
//! - `playback`: Transport state of the audio element
//! - `analysis`: Analysis result and state machine
//! - `visual`: Waveform bars and frequency circles
//! - `app_model`: Root coordinator with state management methods

mod types;
mod resource;
mod playback;
mod analysis;
mod visual;
mod app_model;

pub use types::{ActiveSection, AnalysisTab, Notification, NotificationKind, UiState};

pub use resource::{AudioResource, ResourceId};
#[cfg(test)]
pub use resource::ObjectUrlRegistry;

pub use playback::PlaybackState;

pub use analysis::{AnalysisResult, AnalysisState};

pub use visual::{FrequencyCircle, VisualState, Waveform};

pub use app_model::{AppModel, ViewSnapshot};
