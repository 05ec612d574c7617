//! Systems for the sky core.
//!
//! Organized by functionality:
//! - command: Command queue processing
//! - input: Forwarding input messages into the core
//! - tick: Frame update/draw and selection change detection
//! - state_sync: Mirror core status into shared stores

pub mod command;
pub mod input;
pub mod state_sync;
pub mod tick;

pub use command::*;
pub use input::*;
pub use state_sync::*;
pub use tick::*;
