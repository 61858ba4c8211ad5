//! Editor session: state machine, project client and controller.

pub mod client;
pub mod controller;
pub mod state;

pub use client::{HttpProjectClient, LoadedProject, LocalProjectClient, ProjectClient};
pub use controller::{SessionController, SessionSettings};
pub use state::{Action, SessionPhase, SessionState, StatusKind, StatusMessage};
