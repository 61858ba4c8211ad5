//! Playground: project persistence and editor session model for a live code playground
//!
//! A flat path -> file mapping with filesystem-like operations and a derived
//! tree view, a project service that stores each user's projects keyed by
//! `(userId, projectId)`, an HTTP surface for it, and a session controller
//! that drives load, save and autosave from the editor side.

pub mod api;
pub mod config;
pub mod defaults;
pub mod error;
pub mod logging;
pub mod server;
pub mod session;
pub mod store;
pub mod tooling;
pub mod tree;
pub mod types;
