use gestura_foundation::SwipeDirection;

/// Observable snapshot of everything attached to a surface.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SurfaceState {
    pub long_press_active: bool,
    pub long_press_progress: f32,
    pub pinch_scale: Option<f32>,
    pub pull_distance: f32,
    pub is_refreshing: bool,
    pub dismissed: Option<SwipeDirection>,
}

pub type StateListenerId = u64;
