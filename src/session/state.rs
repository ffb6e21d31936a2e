//! Session lifecycle and errors

use std::fmt;

use thiserror::Error;

/// Lifecycle: `Uninitialized → Loading → Ready`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Loading,
    Ready,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Uninitialized => "uninitialized",
            SessionState::Loading => "loading",
            SessionState::Ready => "ready",
        };
        f.write_str(name)
    }
}

/// Where the collection installed at startup came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// A valid value was read from storage
    Stored,
    /// Nothing usable was stored; the seed collection was installed
    Seeded,
    /// Nothing usable was stored and seeding is disabled
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Session not ready (state: {state})")]
    NotReady { state: SessionState },
}

pub type SessionResult<T> = Result<T, SessionError>;
