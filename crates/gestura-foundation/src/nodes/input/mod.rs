pub mod gestures;
pub mod types;

pub use types::{
    Contact, PointerButton, PointerButtons, PointerEvent, PointerId, PointerInput, PointerPhase,
    PointerSource,
};

pub mod prelude {
    pub use super::types::{
        Contact, PointerButton, PointerButtons, PointerEvent, PointerId, PointerInput,
        PointerPhase, PointerSource,
    };
}
