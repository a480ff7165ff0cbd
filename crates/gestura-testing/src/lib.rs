//! Testing utilities and harness for Gestura

pub mod recorders;
pub mod robot;
pub mod robot_assertions;

pub use recorders::{FixedScroll, RecordingHaptics};
pub use robot::GestureRobot;

pub mod prelude {
    pub use crate::recorders::{FixedScroll, RecordingHaptics};
    pub use crate::robot::GestureRobot;
    pub use crate::robot_assertions;
}
