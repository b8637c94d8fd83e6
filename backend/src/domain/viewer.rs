//! Page-flip viewer capability and the viewing session that owns it.
//!
//! Rendering engines implement [`PageViewer`] once. A [`ViewingSession`]
//! owns exactly one viewer for the lifetime of one viewing and keeps its
//! navigation and zoom inside legal bounds, so viewers never see an
//! out-of-range request.

use serde::{Deserialize, Serialize};

/// Smallest zoom factor a session allows.
pub const MIN_ZOOM: f32 = 0.5;
/// Largest zoom factor a session allows.
pub const MAX_ZOOM: f32 = 3.0;

/// Page layout of a flipbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageMode {
    /// One page at a time.
    #[default]
    Single,
    /// Facing pages side by side.
    Double,
}

impl PageMode {
    /// Pages turned by one flip.
    pub const fn pages_per_flip(self) -> u32 {
        match self {
            Self::Single => 1,
            Self::Double => 2,
        }
    }
}

/// Capability contract of a page-flip renderer.
///
/// Pages are numbered from 1.
pub trait PageViewer {
    /// Total number of pages.
    fn page_count(&self) -> u32;

    /// Page currently shown.
    fn current_page(&self) -> u32;

    /// Flip forward.
    fn next(&mut self);

    /// Flip backward.
    fn prev(&mut self);

    /// Jump to `page`.
    fn goto_page(&mut self, page: u32);

    /// Switch layout.
    fn set_page_mode(&mut self, mode: PageMode);

    /// Change magnification by `delta`.
    fn zoom(&mut self, delta: f32);
}

/// One viewer scoped to one viewing session.
#[derive(Debug)]
pub struct ViewingSession<V> {
    viewer: V,
    mode: PageMode,
    zoom: f32,
}

impl<V: PageViewer> ViewingSession<V> {
    /// Take ownership of `viewer` at page 1, single mode, zoom 1.0.
    ///
    /// # Examples
    /// ```
    /// use flipbook_backend::domain::{PageCursor, PageMode, ViewingSession};
    ///
    /// let mut session = ViewingSession::open(PageCursor::new(12));
    /// session.goto_page(40);
    /// assert_eq!(session.current_page(), 12);
    /// session.set_page_mode(PageMode::Double);
    /// session.prev();
    /// assert_eq!(session.current_page(), 10);
    /// ```
    pub fn open(mut viewer: V) -> Self {
        viewer.set_page_mode(PageMode::Single);
        viewer.goto_page(1);
        Self {
            viewer,
            mode: PageMode::Single,
            zoom: 1.0,
        }
    }

    /// Page currently shown.
    pub fn current_page(&self) -> u32 {
        self.viewer.current_page()
    }

    /// Total number of pages, never below one.
    pub fn page_count(&self) -> u32 {
        self.viewer.page_count().max(1)
    }

    /// Current layout.
    pub const fn page_mode(&self) -> PageMode {
        self.mode
    }

    /// Current magnification.
    pub const fn zoom_level(&self) -> f32 {
        self.zoom
    }

    /// Flip forward unless already on the last page.
    pub fn next(&mut self) {
        if self.current_page() < self.page_count() {
            self.viewer.next();
        }
    }

    /// Flip backward unless already on the first page.
    pub fn prev(&mut self) {
        if self.current_page() > 1 {
            self.viewer.prev();
        }
    }

    /// Jump to `page`, clamped to the document.
    pub fn goto_page(&mut self, page: u32) {
        let target = page.clamp(1, self.page_count());
        self.viewer.goto_page(target);
    }

    /// Switch layout.
    pub fn set_page_mode(&mut self, mode: PageMode) {
        if mode != self.mode {
            self.mode = mode;
            self.viewer.set_page_mode(mode);
        }
    }

    /// Change magnification by `delta`, clamped to
    /// [`MIN_ZOOM`]..=[`MAX_ZOOM`]. Non-finite deltas are ignored.
    pub fn zoom(&mut self, delta: f32) {
        if !delta.is_finite() {
            return;
        }
        let target = (self.zoom + delta).clamp(MIN_ZOOM, MAX_ZOOM);
        let applied = target - self.zoom;
        if applied.abs() > f32::EPSILON {
            self.zoom = target;
            self.viewer.zoom(applied);
        }
    }

    /// End the session and hand the viewer back.
    pub fn close(self) -> V {
        self.viewer
    }
}

/// Headless viewer that tracks position only.
///
/// Used for server-side previews and in tests.
#[derive(Debug, Clone, PartialEq)]
pub struct PageCursor {
    page_count: u32,
    current: u32,
    mode: PageMode,
    zoom: f32,
}

impl PageCursor {
    /// Cursor over `page_count` pages; an empty document is treated as one
    /// blank page.
    pub fn new(page_count: u32) -> Self {
        Self {
            page_count: page_count.max(1),
            current: 1,
            mode: PageMode::Single,
            zoom: 1.0,
        }
    }

    /// Layout last requested.
    pub const fn mode(&self) -> PageMode {
        self.mode
    }

    /// Accumulated magnification.
    pub const fn zoom_level(&self) -> f32 {
        self.zoom
    }
}

impl PageViewer for PageCursor {
    fn page_count(&self) -> u32 {
        self.page_count
    }

    fn current_page(&self) -> u32 {
        self.current
    }

    fn next(&mut self) {
        self.current = self
            .current
            .saturating_add(self.mode.pages_per_flip())
            .min(self.page_count);
    }

    fn prev(&mut self) {
        self.current = self
            .current
            .saturating_sub(self.mode.pages_per_flip())
            .max(1);
    }

    fn goto_page(&mut self, page: u32) {
        self.current = page.clamp(1, self.page_count);
    }

    fn set_page_mode(&mut self, mode: PageMode) {
        self.mode = mode;
    }

    fn zoom(&mut self, delta: f32) {
        self.zoom += delta;
    }
}
