//! Driver trait — the session boundary to the app under test.
//!
//! A [`Driver`] is an opaque handle to one running app instance. Everything
//! above this trait (sessions, page models, scenarios) is driver-agnostic;
//! everything below it (wire protocol, capability negotiation, device
//! provisioning) belongs to the external automation server. The only
//! in-repo implementation is the scripted device in [`crate::mock`].
//!
//! All operations are synchronous and blocking. Polling does NOT live
//! here: `find` returns an instantaneous snapshot of currently-attached
//! matches, and the session layer turns snapshots into bounded waits.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::locator::{Locator, ScrollTarget};
use crate::result::ComprobarResult;

/// Handle to a live, attached on-screen element.
///
/// Handles are invalidated when their element detaches (scroll gestures on
/// a virtualized list detach off-screen items); operations on a stale
/// handle fail with a session error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementHandle {
    /// Driver-assigned element identifier
    pub id: String,
}

impl ElementHandle {
    /// Create a handle from a driver-assigned identifier
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// A single swipe gesture in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwipeGesture {
    /// Start X coordinate
    pub start_x: u32,
    /// Start Y coordinate
    pub start_y: u32,
    /// End X coordinate
    pub end_x: u32,
    /// End Y coordinate
    pub end_y: u32,
    /// Gesture duration in milliseconds
    pub duration_ms: u64,
}

impl SwipeGesture {
    /// Gesture used between collect-all passes on the product list
    #[must_use]
    pub fn collect() -> Self {
        Self {
            start_x: 500,
            start_y: 400,
            end_x: 500,
            end_y: 200,
            duration_ms: 500,
        }
    }

    /// Corrective gesture used between positional confirmation attempts
    #[must_use]
    pub fn corrective() -> Self {
        Self {
            start_x: 500,
            start_y: 700,
            end_x: 500,
            end_y: 300,
            duration_ms: 500,
        }
    }

    /// Gesture duration as a [`Duration`]
    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

/// Synchronous session to a running app instance.
///
/// Owned exclusively by the scenario lifecycle: created at scenario start,
/// closed at scenario end on both success and failure paths. Page models
/// borrow a reference and never close it.
pub trait Driver {
    /// Snapshot of currently-attached elements matching `locator`, in
    /// document order. An empty result is not an error at this layer.
    fn find(&self, locator: &Locator) -> ComprobarResult<Vec<ElementHandle>>;

    /// Snapshot of attached elements matching `locator` inside `parent`
    fn find_within(
        &self,
        parent: &ElementHandle,
        locator: &Locator,
    ) -> ComprobarResult<Vec<ElementHandle>>;

    /// Ancestor item container of `element`, if it has one
    fn container_of(&self, element: &ElementHandle) -> ComprobarResult<Option<ElementHandle>>;

    /// Visible text content of the element
    fn text_of(&self, element: &ElementHandle) -> ComprobarResult<String>;

    /// Platform attribute of the element, if exposed
    fn attribute_of(
        &self,
        element: &ElementHandle,
        name: &str,
    ) -> ComprobarResult<Option<String>>;

    /// Whether the element is enabled for interaction
    fn is_enabled(&self, element: &ElementHandle) -> ComprobarResult<bool>;

    /// Whether the element is rendered visibly on screen
    fn is_displayed(&self, element: &ElementHandle) -> ComprobarResult<bool>;

    /// Dispatch a click to the element
    fn click(&self, element: &ElementHandle) -> ComprobarResult<()>;

    /// Clear the element's current text content
    fn clear(&self, element: &ElementHandle) -> ComprobarResult<()>;

    /// Type text into the element
    fn send_keys(&self, element: &ElementHandle, text: &str) -> ComprobarResult<()>;

    /// Issue a swipe gesture
    fn swipe(&self, gesture: SwipeGesture) -> ComprobarResult<()>;

    /// Issue a platform scroll-until-visible gesture. Single-shot: one
    /// invocation either resolves the element or fails with `NotFound`
    /// once the platform's internal scrolling budget is exhausted.
    fn scroll_into_view(&self, target: &ScrollTarget) -> ComprobarResult<ElementHandle>;

    /// Capture a PNG screenshot of the current screen
    fn screenshot(&self) -> ComprobarResult<Vec<u8>>;

    /// Close the session. Idempotent.
    fn quit(&mut self) -> ComprobarResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_swipe_constants() {
        let gesture = SwipeGesture::collect();
        assert_eq!((gesture.start_x, gesture.start_y), (500, 400));
        assert_eq!((gesture.end_x, gesture.end_y), (500, 200));
        assert_eq!(gesture.duration(), Duration::from_millis(500));
    }

    #[test]
    fn test_corrective_swipe_constants() {
        let gesture = SwipeGesture::corrective();
        assert_eq!((gesture.start_x, gesture.start_y), (500, 700));
        assert_eq!((gesture.end_x, gesture.end_y), (500, 300));
    }

    #[test]
    fn test_element_handle_roundtrip() {
        let handle = ElementHandle::new("products.item.2.title");
        let json = serde_json::to_string(&handle).unwrap();
        let back: ElementHandle = serde_json::from_str(&json).unwrap();
        assert_eq!(handle, back);
    }
}
