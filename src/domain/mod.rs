pub mod models;
pub mod navigation;
pub mod memory;
pub mod counting;
pub mod assessment;
pub mod errors;

pub use models::*;
pub use navigation::*;
pub use memory::{Card, Face, FlipOutcome, MemoryGame};
pub use counting::{Advance, CheckOutcome, CountingGame, DropOutcome, Zone};
pub use assessment::*;
pub use errors::*;
