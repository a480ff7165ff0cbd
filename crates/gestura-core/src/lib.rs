//! Core runtime for Gestura gesture controllers.
//!
//! Controllers never own threads. Every timer and async task they arm lives
//! on a [`Runtime`] that the host drives from its input loop, and every
//! callback holds only weak references back to the controller that armed it.

mod delay;
pub mod platform;
mod runtime;

pub use delay::Delay;
pub use platform::{Clock, DefaultScheduler, RuntimeScheduler};
pub use runtime::{Runtime, RuntimeHandle, TaskHandle, TimerRegistration};

pub type TimerId = u64;
pub type TaskId = u64;

/// Caller misuse. Ordinary "no gesture recognised" outcomes are never
/// reported through this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GestureError {
    ContactCount {
        expected: usize,
        actual: usize,
    },
    DegenerateContacts,
    NotStarted {
        detector: &'static str,
    },
    Disposed {
        controller: &'static str,
    },
    RuntimeUnavailable {
        controller: &'static str,
    },
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },
}

impl std::fmt::Display for GestureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GestureError::ContactCount { expected, actual } => {
                write!(f, "expected exactly {expected} contact points, got {actual}")
            }
            GestureError::DegenerateContacts => {
                write!(f, "contact points coincide; pinch distance must be positive")
            }
            GestureError::NotStarted { detector } => {
                write!(f, "{detector} updated before it was started")
            }
            GestureError::Disposed { controller } => {
                write!(f, "{controller} used after dispose()")
            }
            GestureError::RuntimeUnavailable { controller } => {
                write!(f, "{controller} needs a runtime but it has been dropped")
            }
            GestureError::InvalidConfig { field, reason } => {
                write!(f, "invalid config field `{field}`: {reason}")
            }
        }
    }
}

impl std::error::Error for GestureError {}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
