//! Livestock systems

pub mod despawn;
pub mod fsm;
pub mod spawn;

// Re-export all systems
pub use despawn::*;
pub use fsm::*;
pub use spawn::*;
