//! Coordinate types for windows and merged regions.
//!
//! Both types use 0-based, half-open coordinates and carry no reference id;
//! they are always stored under the id of the reference they belong to.

use std::cmp::Ordering;
use std::fmt;

/// A fixed-size bin `[start, end)` on one reference sequence.
///
/// Windows are only ever built by [`Window::containing`], so `start` is a
/// multiple of the window size and `end - start` equals it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Window {
    pub start: u64,
    pub end: u64,
}

impl Window {
    /// The window of `window_size` that contains `position`.
    ///
    /// `window_size` must be non-zero.
    #[inline]
    pub fn containing(position: u64, window_size: u64) -> Self {
        let start = (position / window_size) * window_size;
        Self {
            start,
            end: start.saturating_add(window_size),
        }
    }

    /// Returns the length of the window.
    #[inline]
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the window has zero length.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

impl Ord for Window {
    fn cmp(&self, other: &Self) -> Ordering {
        self.start
            .cmp(&other.start)
            .then(self.end.cmp(&other.end))
    }
}

impl PartialOrd for Window {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One or more enriched windows coalesced into a single span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MergedRegion {
    pub start: u64,
    pub end: u64,
}

impl MergedRegion {
    #[inline]
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    /// Returns the length of the region.
    #[inline]
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the region has zero length.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Gap between the end of this region and the start of `window`.
    /// Negative when the window starts before this region ends.
    #[inline]
    pub fn gap_to(&self, window: &Window) -> i128 {
        window.start as i128 - self.end as i128
    }

    /// Copy of this region with `end` limited to `bound`.
    ///
    /// `start` is never moved, so a bound below `start` yields an empty region.
    #[inline]
    pub fn clamped(&self, bound: u64) -> Self {
        Self {
            start: self.start,
            end: self.end.min(bound).max(self.start),
        }
    }
}

impl From<Window> for MergedRegion {
    fn from(w: Window) -> Self {
        Self::new(w.start, w.end)
    }
}

impl fmt::Display for MergedRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.start, self.end)
    }
}

impl Ord for MergedRegion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.start
            .cmp(&other.start)
            .then(self.end.cmp(&other.end))
    }
}

impl PartialOrd for MergedRegion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_containing() {
        let w = Window::containing(150, 100);
        assert_eq!(w.start, 100);
        assert_eq!(w.end, 200);
        assert_eq!(w.len(), 100);

        // Boundary position opens the next window
        let w = Window::containing(200, 100);
        assert_eq!(w.start, 200);

        let w = Window::containing(0, 100);
        assert_eq!(w, Window { start: 0, end: 100 });
    }

    #[test]
    fn test_window_ordering() {
        let mut windows = [
            Window::containing(350, 100),
            Window::containing(20, 100),
            Window::containing(120, 100),
        ];
        windows.sort();

        assert_eq!(windows[0].start, 0);
        assert_eq!(windows[1].start, 100);
        assert_eq!(windows[2].start, 300);
    }

    #[test]
    fn test_region_gap() {
        let region = MergedRegion::new(0, 200);
        assert_eq!(region.gap_to(&Window { start: 250, end: 350 }), 50);
        assert_eq!(region.gap_to(&Window { start: 200, end: 300 }), 0);
        assert_eq!(region.gap_to(&Window { start: 100, end: 200 }), -100);
    }

    #[test]
    fn test_region_clamped() {
        let region = MergedRegion::new(100, 300);
        assert_eq!(region.clamped(250), MergedRegion::new(100, 250));
        assert_eq!(region.clamped(1000), region);
        // Bound before start collapses to an empty region at start
        let empty = region.clamped(50);
        assert_eq!(empty, MergedRegion::new(100, 100));
        assert!(empty.is_empty());
    }
}
