//! Per-instance thresholds for every recogniser.
//!
//! Each config starts from the values in [`crate::gesture_constants`] and can
//! be adjusted with the `with_*` builders. Controllers accept any config, but
//! the binding layer rejects configs that fail [`validate`](SwipeConfig::validate)
//! when a handler set is attached.

use gestura_core::GestureError;

use crate::gesture_constants::{
    DIRECTIONAL_THRESHOLD, LONG_PRESS_DELAY_MS, LONG_PRESS_MOVE_THRESHOLD,
    LONG_PRESS_PROGRESS_INTERVAL_MS, MAX_PULL, PULL_SCROLL_SUPPRESS_THRESHOLD, PULL_THRESHOLD,
    SWIPE_THRESHOLD, SWIPE_TIME_THRESHOLD_MS, SWIPE_VELOCITY_THRESHOLD,
};

fn require(ok: bool, field: &'static str, reason: &'static str) -> Result<(), GestureError> {
    if ok {
        Ok(())
    } else {
        Err(GestureError::InvalidConfig { field, reason })
    }
}

fn non_negative(value: f32) -> bool {
    value.is_finite() && value >= 0.0
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwipeConfig {
    /// Minimum travel in logical pixels.
    pub threshold: f32,
    /// Minimum average speed in px/ms.
    pub velocity_threshold: f32,
    /// Maximum gesture duration.
    pub time_threshold_ms: i64,
    /// Minimum primary/secondary axis ratio.
    pub directional_threshold: f32,
}

impl SwipeConfig {
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_velocity_threshold(mut self, velocity_threshold: f32) -> Self {
        self.velocity_threshold = velocity_threshold;
        self
    }

    pub fn with_time_threshold_ms(mut self, time_threshold_ms: i64) -> Self {
        self.time_threshold_ms = time_threshold_ms;
        self
    }

    pub fn with_directional_threshold(mut self, directional_threshold: f32) -> Self {
        self.directional_threshold = directional_threshold;
        self
    }

    pub fn validate(&self) -> Result<(), GestureError> {
        require(
            non_negative(self.threshold),
            "threshold",
            "must be finite and non-negative",
        )?;
        require(
            non_negative(self.velocity_threshold),
            "velocity_threshold",
            "must be finite and non-negative",
        )?;
        require(
            self.time_threshold_ms > 0,
            "time_threshold_ms",
            "must be positive",
        )?;
        require(
            self.directional_threshold.is_finite() && self.directional_threshold >= 1.0,
            "directional_threshold",
            "must be finite and at least 1.0",
        )
    }
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            threshold: SWIPE_THRESHOLD,
            velocity_threshold: SWIPE_VELOCITY_THRESHOLD,
            time_threshold_ms: SWIPE_TIME_THRESHOLD_MS,
            directional_threshold: DIRECTIONAL_THRESHOLD,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LongPressConfig {
    pub delay_ms: i64,
    pub move_threshold: f32,
    pub progress_interval_ms: i64,
}

impl LongPressConfig {
    pub fn with_delay_ms(mut self, delay_ms: i64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn with_move_threshold(mut self, move_threshold: f32) -> Self {
        self.move_threshold = move_threshold;
        self
    }

    pub fn with_progress_interval_ms(mut self, progress_interval_ms: i64) -> Self {
        self.progress_interval_ms = progress_interval_ms;
        self
    }

    pub fn validate(&self) -> Result<(), GestureError> {
        require(self.delay_ms > 0, "delay_ms", "must be positive")?;
        require(
            non_negative(self.move_threshold),
            "move_threshold",
            "must be finite and non-negative",
        )?;
        require(
            self.progress_interval_ms > 0,
            "progress_interval_ms",
            "must be positive",
        )
    }
}

impl Default for LongPressConfig {
    fn default() -> Self {
        Self {
            delay_ms: LONG_PRESS_DELAY_MS,
            move_threshold: LONG_PRESS_MOVE_THRESHOLD,
            progress_interval_ms: LONG_PRESS_PROGRESS_INTERVAL_MS,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PullToRefreshConfig {
    pub pull_threshold: f32,
    pub max_pull: f32,
    /// Downward travel beyond which move events are consumed.
    pub scroll_suppress_threshold: f32,
}

impl PullToRefreshConfig {
    pub fn with_pull_threshold(mut self, pull_threshold: f32) -> Self {
        self.pull_threshold = pull_threshold;
        self
    }

    pub fn with_max_pull(mut self, max_pull: f32) -> Self {
        self.max_pull = max_pull;
        self
    }

    pub fn with_scroll_suppress_threshold(mut self, scroll_suppress_threshold: f32) -> Self {
        self.scroll_suppress_threshold = scroll_suppress_threshold;
        self
    }

    pub fn validate(&self) -> Result<(), GestureError> {
        require(
            self.pull_threshold.is_finite() && self.pull_threshold > 0.0,
            "pull_threshold",
            "must be finite and positive",
        )?;
        require(
            self.max_pull.is_finite() && self.max_pull >= self.pull_threshold,
            "max_pull",
            "must be finite and at least pull_threshold",
        )?;
        require(
            non_negative(self.scroll_suppress_threshold),
            "scroll_suppress_threshold",
            "must be finite and non-negative",
        )
    }
}

impl Default for PullToRefreshConfig {
    fn default() -> Self {
        Self {
            pull_threshold: PULL_THRESHOLD,
            max_pull: MAX_PULL,
            scroll_suppress_threshold: PULL_SCROLL_SUPPRESS_THRESHOLD,
        }
    }
}

/// Swipe-to-dismiss reuses the swipe classifier unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SwipeToDismissConfig {
    pub swipe: SwipeConfig,
}

impl SwipeToDismissConfig {
    pub fn with_swipe(mut self, swipe: SwipeConfig) -> Self {
        self.swipe = swipe;
        self
    }

    pub fn validate(&self) -> Result<(), GestureError> {
        self.swipe.validate()
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
