//! Session Layer
//!
//! One controller per session: startup load, user actions, drag gestures and
//! background persistence of every committed snapshot.

mod controller;
mod state;
mod writer;

#[cfg(test)]
mod tests;

pub use controller::{Confirm, SessionController, CLEAR_ALL_PROMPT};
pub use state::{LoadSource, SessionError, SessionResult, SessionState};
