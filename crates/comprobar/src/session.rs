//! Element access layer: find/click/type/visibility with bounded waits.
//!
//! A [`Session`] binds a borrowed driver handle to a wait policy and turns
//! the driver's instantaneous snapshots into polling operations with a
//! uniform timeout failure. Every element-returning operation either
//! yields a live, attached handle or fails with a timeout signal; the one
//! exception is [`Session::is_visible`], where absence is a valid,
//! non-exceptional outcome used to branch on optional UI state.

use std::time::Duration;

use tracing::{debug, error};

use crate::driver::{Driver, ElementHandle, SwipeGesture};
use crate::locator::{Locator, ScrollTarget};
use crate::result::{ComprobarError, ComprobarResult};
use crate::wait::{poll_until, WaitPolicy};

/// One screen-interaction session over a borrowed driver handle
pub struct Session<'d> {
    driver: &'d dyn Driver,
    wait: WaitPolicy,
}

impl std::fmt::Debug for Session<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").field("wait", &self.wait).finish()
    }
}

impl<'d> Session<'d> {
    /// Create a session with the default wait policy
    #[must_use]
    pub fn new(driver: &'d dyn Driver) -> Self {
        Self {
            driver,
            wait: WaitPolicy::default(),
        }
    }

    /// Override the wait policy for all operations on this session
    #[must_use]
    pub fn with_wait(mut self, wait: WaitPolicy) -> Self {
        self.wait = wait;
        self
    }

    /// The underlying driver handle, for raw gestures and scoped queries
    #[must_use]
    pub fn driver(&self) -> &'d dyn Driver {
        self.driver
    }

    /// The session's wait policy
    #[must_use]
    pub fn wait(&self) -> WaitPolicy {
        self.wait
    }

    /// Find one element, polling until at least one match appears.
    ///
    /// Fails with `NotFound` if nothing matches within the wait budget.
    pub fn find_one(&self, locator: &Locator) -> ComprobarResult<ElementHandle> {
        self.find_one_within(locator, self.wait)
    }

    /// Find one element under an explicit per-call policy
    pub fn find_one_within(
        &self,
        locator: &Locator,
        policy: WaitPolicy,
    ) -> ComprobarResult<ElementHandle> {
        let found = poll_until(policy, || {
            Ok(self.driver.find(locator)?.into_iter().next())
        })?;
        found.ok_or_else(|| {
            error!(locator = %locator, "element not found");
            ComprobarError::NotFound {
                locator: locator.to_string(),
                timeout_ms: policy.timeout_ms(),
            }
        })
    }

    /// Find all matching elements, polling until at least one appears.
    ///
    /// An empty snapshot before the timeout is not success: the operation
    /// keeps polling until the first match or the budget elapses.
    pub fn find_all(&self, locator: &Locator) -> ComprobarResult<Vec<ElementHandle>> {
        let found = poll_until(self.wait, || {
            let matches = self.driver.find(locator)?;
            Ok((!matches.is_empty()).then_some(matches))
        })?;
        found.ok_or_else(|| {
            error!(locator = %locator, "elements not found");
            ComprobarError::NotFound {
                locator: locator.to_string(),
                timeout_ms: self.wait.timeout_ms(),
            }
        })
    }

    /// Wait for the element to become interactable, then click it.
    ///
    /// Fails with `NotInteractable` if no match is present AND enabled
    /// within the wait budget.
    pub fn click(&self, locator: &Locator) -> ComprobarResult<()> {
        let clickable = poll_until(self.wait, || {
            for handle in self.driver.find(locator)? {
                if self.driver.is_enabled(&handle)? {
                    return Ok(Some(handle));
                }
            }
            Ok(None)
        })?;
        match clickable {
            Some(handle) => self.driver.click(&handle),
            None => Err(ComprobarError::NotInteractable {
                locator: locator.to_string(),
                timeout_ms: self.wait.timeout_ms(),
            }),
        }
    }

    /// Resolve the element, clear its content, and type `text`
    pub fn set_text(&self, locator: &Locator, text: &str) -> ComprobarResult<()> {
        let element = self.find_one(locator)?;
        self.driver.clear(&element)?;
        self.driver.send_keys(&element, text)
    }

    /// Resolve the element and return its text content
    pub fn get_text(&self, locator: &Locator) -> ComprobarResult<String> {
        let element = self.find_one(locator)?;
        self.driver.text_of(&element)
    }

    /// Poll for visibility under the short default budget.
    ///
    /// Returns `false` on timeout rather than failing; callers use this to
    /// branch on optional UI state such as validation banners.
    pub fn is_visible(&self, locator: &Locator) -> ComprobarResult<bool> {
        self.is_visible_within(locator, WaitPolicy::short().timeout)
    }

    /// Poll for visibility under an explicit budget
    pub fn is_visible_within(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> ComprobarResult<bool> {
        let policy = WaitPolicy::new(timeout).with_poll_interval(self.wait.poll_interval);
        let visible = poll_until(policy, || {
            for handle in self.driver.find(locator)? {
                if self.driver.is_displayed(&handle)? {
                    return Ok(Some(()));
                }
            }
            Ok(None)
        })?;
        Ok(visible.is_some())
    }

    /// Scroll until an element with this exact text is in view.
    ///
    /// Single-shot: the platform gesture either resolves the element or
    /// fails; retry, where wanted, lives in the caller.
    pub fn scroll_to_text(&self, text: &str) -> ComprobarResult<ElementHandle> {
        debug!(text, "scrolling to text");
        self.driver
            .scroll_into_view(&ScrollTarget::Text(text.to_string()))
    }

    /// Scroll until an element with this accessibility descriptor is in view
    pub fn scroll_to_descriptor(&self, descriptor: &str) -> ComprobarResult<ElementHandle> {
        debug!(descriptor, "scrolling to descriptor");
        self.driver
            .scroll_into_view(&ScrollTarget::Descriptor(descriptor.to_string()))
    }

    /// Issue a raw swipe gesture
    pub fn swipe(&self, gesture: SwipeGesture) -> ComprobarResult<()> {
        self.driver.swipe(gesture)
    }

    /// Capture a PNG screenshot of the current screen
    pub fn screenshot(&self) -> ComprobarResult<Vec<u8>> {
        self.driver.screenshot()
    }
}
