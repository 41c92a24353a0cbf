//! The scrollable container the engine drives.

use std::ops::Range;

/// How a programmatic scroll should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBehavior {
    /// Jump straight to the offset (drag and momentum frames).
    #[default]
    Instant,
    /// Let the renderer ease toward the offset (auto-advance).
    Smooth,
}

/// Horizontal scroll container holding one child per item.
pub trait ScrollSurface {
    /// Current horizontal scroll offset.
    fn scroll_offset(&self) -> f32;

    /// Move to `offset` using `behavior`. Implementations may clamp.
    fn scroll_to(&mut self, offset: f32, behavior: ScrollBehavior);

    /// Leading edge of the child at `index`, if it exists.
    fn item_offset(&self, index: usize) -> Option<f32>;

    /// Visible width of the container.
    fn viewport_extent(&self) -> f32;

    /// Number of children changed.
    fn sync_len(&mut self, _len: usize) {}

    /// Container was resized.
    fn resize(&mut self, _viewport_extent: f32) {}

    /// Children currently worth rendering, when the surface knows.
    fn visible_range(&self) -> Option<Range<usize>> {
        None
    }

    fn set_scroll_offset(&mut self, offset: f32) {
        self.scroll_to(offset, ScrollBehavior::Instant);
    }
}

impl<T: ScrollSurface + ?Sized> ScrollSurface for Box<T> {
    fn scroll_offset(&self) -> f32 {
        (**self).scroll_offset()
    }

    fn scroll_to(&mut self, offset: f32, behavior: ScrollBehavior) {
        (**self).scroll_to(offset, behavior)
    }

    fn item_offset(&self, index: usize) -> Option<f32> {
        (**self).item_offset(index)
    }

    fn viewport_extent(&self) -> f32 {
        (**self).viewport_extent()
    }

    fn sync_len(&mut self, len: usize) {
        (**self).sync_len(len)
    }

    fn resize(&mut self, viewport_extent: f32) {
        (**self).resize(viewport_extent)
    }

    fn visible_range(&self) -> Option<Range<usize>> {
        (**self).visible_range()
    }
}

/// Fixed-stride strip of cards, clamped like a browser overflow container.
#[derive(Debug, Clone, PartialEq)]
pub struct StripLayout {
    pub item_width: f32,
    pub item_spacing: f32,
    pub viewport_width: f32,
    pub total_items: usize,
    scroll_position: f32,
    last_behavior: ScrollBehavior,
}

impl StripLayout {
    /// Extra items kept "visible" on each side for smooth scrolling.
    const BUFFER: usize = 2;

    pub fn new(viewport_width: f32, item_width: f32, item_spacing: f32) -> Self {
        Self {
            item_width,
            item_spacing,
            viewport_width,
            total_items: 0,
            scroll_position: 0.0,
            last_behavior: ScrollBehavior::Instant,
        }
    }

    pub fn stride(&self) -> f32 {
        self.item_width + self.item_spacing
    }

    /// Total content width; no trailing gap after the last card.
    pub fn content_width(&self) -> f32 {
        if self.total_items == 0 {
            return 0.0;
        }
        self.total_items as f32 * self.stride() - self.item_spacing
    }

    /// Maximum scroll position (content width - viewport width)
    pub fn max_scroll(&self) -> f32 {
        (self.content_width() - self.viewport_width).max(0.0)
    }

    /// Behaviour requested by the last `scroll_to`.
    pub fn last_behavior(&self) -> ScrollBehavior {
        self.last_behavior
    }
}

impl ScrollSurface for StripLayout {
    fn scroll_offset(&self) -> f32 {
        self.scroll_position
    }

    fn scroll_to(&mut self, offset: f32, behavior: ScrollBehavior) {
        let clamped = if offset.is_finite() {
            offset.clamp(0.0, self.max_scroll())
        } else {
            self.scroll_position
        };
        self.scroll_position = clamped;
        self.last_behavior = behavior;
    }

    fn item_offset(&self, index: usize) -> Option<f32> {
        (index < self.total_items).then(|| index as f32 * self.stride())
    }

    fn viewport_extent(&self) -> f32 {
        self.viewport_width
    }

    fn sync_len(&mut self, len: usize) {
        self.total_items = len;
        self.scroll_position = self.scroll_position.clamp(0.0, self.max_scroll());
    }

    fn resize(&mut self, viewport_extent: f32) {
        if !viewport_extent.is_finite() || viewport_extent < 0.0 {
            return;
        }
        self.viewport_width = viewport_extent;
        self.scroll_position = self.scroll_position.clamp(0.0, self.max_scroll());
    }

    /// Items that intersect the viewport, widened by a small buffer.
    fn visible_range(&self) -> Option<Range<usize>> {
        if self.total_items == 0 || self.stride() <= 0.0 {
            return Some(0..0);
        }
        let first = (self.scroll_position / self.stride()).floor() as usize;
        let last = ((self.scroll_position + self.viewport_width) / self.stride())
            .ceil() as usize;
        let start = first.saturating_sub(Self::BUFFER);
        let end = last.saturating_add(Self::BUFFER).min(self.total_items);
        Some(start.min(end)..end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip(items: usize) -> StripLayout {
        let mut layout = StripLayout::new(300.0, 200.0, 20.0);
        layout.sync_len(items);
        layout
    }

    #[test]
    fn item_offsets_follow_stride() {
        let layout = strip(3);
        assert_eq!(layout.item_offset(0), Some(0.0));
        assert_eq!(layout.item_offset(2), Some(440.0));
        assert_eq!(layout.item_offset(3), None);
        assert_eq!(layout.content_width(), 640.0);
        assert_eq!(layout.max_scroll(), 340.0);
    }

    #[test]
    fn scroll_is_clamped_to_content() {
        let mut layout = strip(3);
        layout.scroll_to(-50.0, ScrollBehavior::Instant);
        assert_eq!(layout.scroll_offset(), 0.0);
        layout.scroll_to(10_000.0, ScrollBehavior::Smooth);
        assert_eq!(layout.scroll_offset(), 340.0);
        assert_eq!(layout.last_behavior(), ScrollBehavior::Smooth);
        layout.scroll_to(f32::NAN, ScrollBehavior::Instant);
        assert_eq!(layout.scroll_offset(), 340.0);
    }

    #[test]
    fn shrinking_list_pulls_offset_back() {
        let mut layout = strip(10);
        layout.scroll_to(1_500.0, ScrollBehavior::Instant);
        layout.sync_len(2);
        assert_eq!(layout.scroll_offset(), layout.max_scroll());
    }

    #[test]
    fn visible_range_has_buffer() {
        let mut layout = strip(20);
        layout.scroll_to(2_200.0, ScrollBehavior::Instant);
        // first visible = 10, last partially visible = ceil(2500/220) = 12
        assert_eq!(layout.visible_range(), Some(8..14));
        assert_eq!(strip(0).visible_range(), Some(0..0));
    }

    #[test]
    fn unbounded_viewports_do_not_overflow() {
        let mut layout = strip(3);
        layout.resize(f32::INFINITY);
        layout.resize(f32::NAN);
        assert_eq!(layout.viewport_extent(), 300.0);

        layout.resize(f32::MAX);
        assert_eq!(layout.max_scroll(), 0.0);
        assert_eq!(layout.visible_range(), Some(0..3));
    }
}
