//! Application layer managing the session and the mounted screen.
//!
//! This module coordinates between the domain layer and presentation layer:
//! the session store, per-screen timers and the state the input handlers
//! drive.

pub mod screens;
pub mod state;
pub mod store;
pub mod timers;

pub use screens::*;
pub use state::*;
pub use store::*;
pub use timers::*;
