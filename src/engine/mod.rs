//! Engine module - timing and the pluggable producers of visual and analysis data
//!
//! - `scheduler`: Cancellable timers scoped to a resource
//! - `spectrum`: `SpectrumProvider` strategy for the visualizers
//! - `analysis`: `AnalysisProvider` strategy for the Analyze action

mod scheduler;
mod spectrum;
mod analysis;

pub use scheduler::{ResourceScope, Scheduler};

pub use spectrum::{RandomSpectrum, SpectrumProvider};

pub use analysis::{AnalysisError, AnalysisProvider, SimulatedAnalysis};
