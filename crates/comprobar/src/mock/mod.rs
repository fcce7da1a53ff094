//! Scripted mock device for driving the suite without a real app.
//!
//! [`MockDriver`] implements [`Driver`] over a deterministic state machine
//! emulating the shopping app: login with credential autofill, a
//! virtualized product list with a sliding visible window, filter modal,
//! cart, checkout form validation, and the purchase completion screens.
//! Page models and integration scenarios run against it unchanged.

mod app;

pub use app::{MockApp, Screen};

use std::cell::{Cell, RefCell};

use crate::driver::{Driver, ElementHandle, SwipeGesture};
use crate::locator::{Locator, ScrollTarget};
use crate::result::{ComprobarError, ComprobarResult};

/// A 1x1 transparent PNG, returned by the mock's screenshot call
pub const PNG_1X1: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

/// Driver over the scripted shopping app
#[derive(Debug)]
pub struct MockDriver {
    app: RefCell<MockApp>,
    swipes: Cell<u32>,
    quit: Cell<bool>,
}

impl Default for MockDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDriver {
    /// Create a driver over a fresh app on the login screen
    #[must_use]
    pub fn new() -> Self {
        Self::with_app(MockApp::new())
    }

    /// Create a driver over a prepared app state
    #[must_use]
    pub fn with_app(app: MockApp) -> Self {
        Self {
            app: RefCell::new(app),
            swipes: Cell::new(0),
            quit: Cell::new(false),
        }
    }

    /// Number of items visible at once on the product list
    #[must_use]
    pub fn with_window(self, window: usize) -> Self {
        self.app.borrow_mut().set_window(window);
        self
    }

    /// Hide a product's price and action button until `swipes` further
    /// swipe gestures have settled the list
    pub fn defer_price(&self, name: &str, swipes: u32) {
        self.app.borrow_mut().defer_price(name, swipes);
    }

    /// Total swipe gestures issued so far
    #[must_use]
    pub fn swipe_count(&self) -> u32 {
        self.swipes.get()
    }

    /// Whether the session has been closed
    #[must_use]
    pub fn is_quit(&self) -> bool {
        self.quit.get()
    }

    /// Screen currently shown by the app
    #[must_use]
    pub fn current_screen(&self) -> Screen {
        self.app.borrow().screen()
    }

    fn guard(&self) -> ComprobarResult<()> {
        if self.quit.get() {
            return Err(ComprobarError::session("session already closed"));
        }
        Ok(())
    }

    fn live(&self, element: &ElementHandle) -> ComprobarResult<()> {
        if self.app.borrow().is_attached(&element.id) {
            Ok(())
        } else {
            Err(ComprobarError::session(format!(
                "stale element reference: {}",
                element.id
            )))
        }
    }
}

impl Driver for MockDriver {
    fn find(&self, locator: &Locator) -> ComprobarResult<Vec<ElementHandle>> {
        self.guard()?;
        Ok(self
            .app
            .borrow()
            .resolve(locator.selector())
            .into_iter()
            .map(ElementHandle::new)
            .collect())
    }

    fn find_within(
        &self,
        parent: &ElementHandle,
        locator: &Locator,
    ) -> ComprobarResult<Vec<ElementHandle>> {
        self.guard()?;
        self.live(parent)?;
        Ok(self
            .app
            .borrow()
            .resolve_within(&parent.id, locator.selector())
            .into_iter()
            .map(ElementHandle::new)
            .collect())
    }

    fn container_of(&self, element: &ElementHandle) -> ComprobarResult<Option<ElementHandle>> {
        self.guard()?;
        self.live(element)?;
        Ok(self
            .app
            .borrow()
            .parent_of(&element.id)
            .map(ElementHandle::new))
    }

    fn text_of(&self, element: &ElementHandle) -> ComprobarResult<String> {
        self.guard()?;
        self.live(element)?;
        self.app
            .borrow()
            .text_of(&element.id)
            .ok_or_else(|| ComprobarError::session(format!("no text node: {}", element.id)))
    }

    fn attribute_of(
        &self,
        element: &ElementHandle,
        name: &str,
    ) -> ComprobarResult<Option<String>> {
        self.guard()?;
        self.live(element)?;
        Ok(self.app.borrow().attribute_of(&element.id, name))
    }

    fn is_enabled(&self, element: &ElementHandle) -> ComprobarResult<bool> {
        self.guard()?;
        Ok(self.app.borrow().is_attached(&element.id))
    }

    fn is_displayed(&self, element: &ElementHandle) -> ComprobarResult<bool> {
        self.guard()?;
        Ok(self.app.borrow().is_attached(&element.id))
    }

    fn click(&self, element: &ElementHandle) -> ComprobarResult<()> {
        self.guard()?;
        self.live(element)?;
        self.app
            .borrow_mut()
            .click(&element.id)
            .map_err(ComprobarError::session)
    }

    fn clear(&self, element: &ElementHandle) -> ComprobarResult<()> {
        self.guard()?;
        self.live(element)?;
        self.app
            .borrow_mut()
            .set_field(&element.id, "")
            .map_err(ComprobarError::session)
    }

    fn send_keys(&self, element: &ElementHandle, text: &str) -> ComprobarResult<()> {
        self.guard()?;
        self.live(element)?;
        let mut app = self.app.borrow_mut();
        let current = app.text_of(&element.id).unwrap_or_default();
        app.set_field(&element.id, &format!("{current}{text}"))
            .map_err(ComprobarError::session)
    }

    fn swipe(&self, _gesture: SwipeGesture) -> ComprobarResult<()> {
        self.guard()?;
        self.swipes.set(self.swipes.get() + 1);
        self.app.borrow_mut().swipe();
        Ok(())
    }

    fn scroll_into_view(&self, target: &ScrollTarget) -> ComprobarResult<ElementHandle> {
        self.guard()?;
        self.app
            .borrow_mut()
            .scroll_to(target)
            .map(ElementHandle::new)
            .ok_or_else(|| ComprobarError::NotFound {
                locator: target.to_uiautomator(),
                timeout_ms: 0,
            })
    }

    fn screenshot(&self) -> ComprobarResult<Vec<u8>> {
        self.guard()?;
        Ok(PNG_1X1.to_vec())
    }

    fn quit(&mut self) -> ComprobarResult<()> {
        self.quit.set(true);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_on_login_screen() {
        let driver = MockDriver::new();
        assert_eq!(driver.current_screen(), Screen::Login);
        let found = driver
            .find(&Locator::accessibility_id("test-LOGIN"))
            .unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_products_hidden_before_login() {
        let driver = MockDriver::new();
        assert!(driver.find(&Locator::text("PRODUCTS")).unwrap().is_empty());
    }

    #[test]
    fn test_quit_blocks_further_calls() {
        let mut driver = MockDriver::new();
        driver.quit().unwrap();
        assert!(driver.is_quit());
        assert!(driver.find(&Locator::text("PRODUCTS")).is_err());
    }

    #[test]
    fn test_stale_handle_after_screen_change() {
        let driver = MockDriver::new();
        let login = driver
            .find(&Locator::accessibility_id("test-LOGIN"))
            .unwrap()
            .remove(0);
        // Autofill then log in; the login button detaches.
        let user = driver
            .scroll_into_view(&ScrollTarget::Text("standard_user".to_string()))
            .unwrap();
        driver.click(&user).unwrap();
        driver.click(&login).unwrap();
        assert_eq!(driver.current_screen(), Screen::Products);
        assert!(driver.text_of(&login).is_err());
    }

    #[test]
    fn test_screenshot_is_png() {
        let driver = MockDriver::new();
        let png = driver.screenshot().unwrap();
        assert_eq!(&png[..4], b"\x89PNG");
    }

    #[test]
    fn test_swipe_counter() {
        let driver = MockDriver::new();
        driver.swipe(SwipeGesture::collect()).unwrap();
        driver.swipe(SwipeGesture::corrective()).unwrap();
        assert_eq!(driver.swipe_count(), 2);
    }
}
