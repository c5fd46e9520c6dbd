//! Wrap-around paging over a fixed item list.
//!
//! `N` real items are exposed as `N + 2` visible pages: visible index 0
//! mirrors the last real item and visible index `N + 1` mirrors the first.
//! Selecting a sentinel schedules a silent jump to its mirrored real page;
//! the jump is consumed only once the scroll reaches an idle state, which
//! produces the illusion of infinite wrap from a finite backing list.

use tracing::debug;

/// Scroll activity as reported by the host each time it changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollState {
    Idle,
    Settling,
}

#[derive(Debug)]
pub struct PageCarousel {
    real_count: usize,
    current: usize,
    pending_jump: Option<usize>,
    scroll_state: ScrollState,
}

impl PageCarousel {
    /// Builds a carousel positioned on the first real page.
    pub fn new(real_count: usize) -> Self {
        Self {
            real_count,
            current: if real_count == 0 { 0 } else { 1 },
            pending_jump: None,
            scroll_state: ScrollState::Idle,
        }
    }

    pub fn real_count(&self) -> usize {
        self.real_count
    }

    /// Number of visible pages, sentinels included.
    pub fn item_count(&self) -> usize {
        if self.real_count == 0 {
            0
        } else {
            self.real_count + 2
        }
    }

    /// Currently selected visible index.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Maps a visible index onto the backing item it displays. `None` for an
    /// empty carousel, which has no backing items.
    pub fn real_index(&self, visible: usize) -> Option<usize> {
        if self.real_count == 0 {
            return None;
        }
        Some(if visible == 0 {
            self.real_count - 1
        } else if visible == self.real_count + 1 {
            0
        } else {
            visible - 1
        })
    }

    /// Jump scheduled by a sentinel selection, if any. Exposed for the host
    /// to decide whether a settle animation is still worth running.
    pub fn pending_jump(&self) -> Option<usize> {
        self.pending_jump
    }

    /// Selects a visible index. An animated selection leaves the scroll in
    /// [`ScrollState::Settling`]; the host reports idleness later through
    /// [`Self::set_scroll_state`].
    pub fn select(&mut self, visible: usize, animated: bool) {
        if self.real_count == 0 || visible > self.real_count + 1 {
            return;
        }
        self.current = visible;

        // Sentinel pages schedule the silent wrap jump.
        if visible == 0 {
            self.pending_jump = Some(self.real_count);
        } else if visible == self.real_count + 1 {
            self.pending_jump = Some(1);
        }

        if animated {
            self.scroll_state = ScrollState::Settling;
        } else {
            self.scroll_state = ScrollState::Idle;
        }
    }

    /// Advances by `direction` pages (±1 from a horizontal swipe).
    pub fn advance(&mut self, direction: i32) {
        if self.real_count == 0 {
            return;
        }
        let next = self.current as i64 + direction as i64;
        let next = next.clamp(0, (self.real_count + 1) as i64) as usize;
        self.select(next, true);
    }

    /// Updates the scroll state. Reaching idle consumes a pending wrap jump
    /// and repositions without a user-visible transition; the jumped-to index
    /// is returned so the host can refresh its content.
    pub fn set_scroll_state(&mut self, state: ScrollState) -> Option<usize> {
        self.scroll_state = state;
        if state != ScrollState::Idle {
            return None;
        }
        let jump = self.pending_jump.take()?;
        debug!(from = self.current, to = jump, "carousel wrap jump");
        self.current = jump;
        Some(jump)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exposes_two_sentinel_pages() {
        let carousel = PageCarousel::new(5);
        assert_eq!(carousel.item_count(), 7);
        assert_eq!(carousel.current_index(), 1);
    }

    #[test]
    fn empty_carousel_has_no_pages() {
        let carousel = PageCarousel::new(0);
        assert_eq!(carousel.item_count(), 0);
    }

    #[test]
    fn maps_sentinels_onto_mirrored_items() {
        let carousel = PageCarousel::new(5);
        assert_eq!(carousel.real_index(0), Some(4));
        assert_eq!(carousel.real_index(1), Some(0));
        assert_eq!(carousel.real_index(5), Some(4));
        assert_eq!(carousel.real_index(6), Some(0));
    }

    #[test]
    fn empty_carousel_maps_no_visible_index() {
        let carousel = PageCarousel::new(0);
        assert_eq!(carousel.real_index(0), None);
        assert_eq!(carousel.real_index(1), None);
    }

    #[test]
    fn selecting_first_sentinel_schedules_jump_to_last_real_page() {
        let mut carousel = PageCarousel::new(5);
        carousel.select(0, true);
        assert_eq!(carousel.pending_jump(), Some(5));
        // Still animating: the jump must not execute yet.
        assert_eq!(carousel.current_index(), 0);
        let jumped = carousel.set_scroll_state(ScrollState::Idle);
        assert_eq!(jumped, Some(5));
        assert_eq!(carousel.current_index(), 5);
        assert_eq!(carousel.pending_jump(), None);
    }

    #[test]
    fn selecting_last_sentinel_schedules_jump_to_first_real_page() {
        let mut carousel = PageCarousel::new(5);
        carousel.select(6, true);
        assert_eq!(carousel.pending_jump(), Some(1));
        assert_eq!(carousel.set_scroll_state(ScrollState::Idle), Some(1));
        assert_eq!(carousel.current_index(), 1);
    }

    #[test]
    fn jump_waits_for_idle() {
        let mut carousel = PageCarousel::new(5);
        carousel.select(0, true);
        assert_eq!(carousel.set_scroll_state(ScrollState::Settling), None);
        assert_eq!(carousel.current_index(), 0);
        assert_eq!(carousel.set_scroll_state(ScrollState::Idle), Some(5));
    }

    #[test]
    fn advance_moves_by_sign() {
        let mut carousel = PageCarousel::new(5);
        carousel.advance(1);
        assert_eq!(carousel.current_index(), 2);
        carousel.advance(-1);
        assert_eq!(carousel.current_index(), 1);
        carousel.advance(-1);
        assert_eq!(carousel.current_index(), 0);
        assert_eq!(carousel.pending_jump(), Some(5));
    }
}
