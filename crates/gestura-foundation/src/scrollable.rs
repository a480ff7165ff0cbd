/// Read-only view of the scroll container a pull-to-refresh is attached to.
///
/// Pull tracking only engages while the container sits at its top edge,
/// i.e. when [`ScrollContainer::scroll_offset`] is zero or negative
/// (rubber-band overscroll).
pub trait ScrollContainer {
    /// Current vertical scroll offset in logical pixels.
    fn scroll_offset(&self) -> f32;

    fn is_at_top(&self) -> bool {
        self.scroll_offset() <= 0.0
    }
}

impl<F> ScrollContainer for F
where
    F: Fn() -> f32,
{
    fn scroll_offset(&self) -> f32 {
        self()
    }
}
