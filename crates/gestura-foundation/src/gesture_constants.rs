//! Shared gesture constants for consistent touch/pointer handling.
//!
//! These are the default values behind every config struct in
//! [`crate::config`]. All of them are in logical pixels or milliseconds and
//! all of them can be overridden per controller instance.
//!
//! # DPI Considerations
//!
//! For very high-density touch screens, consider scaling the pixel
//! thresholds by the device's DPI factor before building a config.

/// Minimum straight-line travel for a swipe.
pub const SWIPE_THRESHOLD: f32 = 50.0;

/// Minimum average speed for a swipe, in px/ms.
pub const SWIPE_VELOCITY_THRESHOLD: f32 = 0.3;

/// Maximum press-to-release time for a swipe.
pub const SWIPE_TIME_THRESHOLD_MS: i64 = 300;

/// Minimum ratio of primary-axis to secondary-axis travel.
///
/// A swipe whose dominant axis is less than twice the other axis is
/// considered diagonal and rejected.
pub const DIRECTIONAL_THRESHOLD: f32 = 2.0;

/// How long a contact must be held before a long-press fires.
pub const LONG_PRESS_DELAY_MS: i64 = 500;

/// Travel from the press position that cancels a pending long-press.
pub const LONG_PRESS_MOVE_THRESHOLD: f32 = 10.0;

/// Progress tick period (~60 Hz).
pub const LONG_PRESS_PROGRESS_INTERVAL_MS: i64 = 16;

/// Pull distance at release that triggers a refresh.
pub const PULL_THRESHOLD: f32 = 80.0;

/// Cap on the reported pull distance.
pub const MAX_PULL: f32 = 120.0;

/// Downward travel after which pull events are consumed so the native
/// scroll container stops reacting to them.
pub const PULL_SCROLL_SUPPRESS_THRESHOLD: f32 = 10.0;
