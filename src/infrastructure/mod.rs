//! Infrastructure layer providing external service integrations.
//!
//! This module contains the audio worker, configuration loading, logging
//! setup and the exported learning report.

pub mod audio;
pub mod config;
pub mod logging;
pub mod report;

pub use audio::*;
pub use config::*;
pub use logging::*;
pub use report::*;
