//! Checkout information form: shipping fields and their validation banner.

use std::time::Duration;

use tracing::info;

use crate::locator::Locator;
use crate::result::{ComprobarError, ComprobarResult};
use crate::session::Session;
use crate::wait::CONFIRM_WAIT_MS;

/// Title text of the information form
pub const CHECKOUT_TITLE: &str = "CHECKOUT: INFORMATION";
/// First name input field
pub const FIRST_NAME_DESC: &str = "test-First Name";
/// Last name input field
pub const LAST_NAME_DESC: &str = "test-Last Name";
/// Postal code input field
pub const ZIP_DESC: &str = "test-Zip/Postal Code";
/// Continue button
pub const CONTINUE_DESC: &str = "test-CONTINUE";
/// Validation banner shown on incomplete submissions
pub const ERROR_DESC: &str = "test-Error message";

/// Page model for the checkout information form
#[derive(Debug)]
pub struct CheckoutPage<'a, 'd> {
    session: &'a Session<'d>,
}

impl<'a, 'd> CheckoutPage<'a, 'd> {
    /// Bind the page model to a session
    #[must_use]
    pub fn new(session: &'a Session<'d>) -> Self {
        Self { session }
    }

    /// Whether the form title is currently on screen
    pub fn is_loaded(&self) -> ComprobarResult<bool> {
        self.session.is_visible(&Locator::text(CHECKOUT_TITLE))
    }

    /// Fill all three shipping fields
    pub fn fill(&self, first: &str, last: &str, zip: &str) -> ComprobarResult<()> {
        self.session
            .set_text(&Locator::accessibility_id(FIRST_NAME_DESC), first)?;
        self.session
            .set_text(&Locator::accessibility_id(LAST_NAME_DESC), last)?;
        self.session
            .set_text(&Locator::accessibility_id(ZIP_DESC), zip)
    }

    /// Tap the continue button
    pub fn tap_continue(&self) -> ComprobarResult<()> {
        self.session.click(&Locator::accessibility_id(CONTINUE_DESC))
    }

    /// Text of the validation banner, failing if no banner is shown
    pub fn validation_error(&self) -> ComprobarResult<String> {
        self.session.get_text(&Locator::accessibility_id(ERROR_DESC))
    }

    /// Assert the validation banner does NOT appear.
    ///
    /// Inverted probe: polls the banner for the confirmation budget and
    /// treats its appearance as a failure carrying the banner text.
    pub fn verify_no_validation_error(&self) -> ComprobarResult<()> {
        self.verify_no_validation_error_within(Duration::from_millis(CONFIRM_WAIT_MS))
    }

    /// Assert the validation banner does not appear within `timeout`
    pub fn verify_no_validation_error_within(&self, timeout: Duration) -> ComprobarResult<()> {
        let banner = Locator::accessibility_id(ERROR_DESC);
        if self.session.is_visible_within(&banner, timeout)? {
            let message = self.validation_error()?;
            return Err(ComprobarError::assertion(format!(
                "checkout form rejected the submission: {message}"
            )));
        }
        Ok(())
    }

    /// Fill the form and submit, asserting no validation banner appears
    pub fn submit(&self, first: &str, last: &str, zip: &str) -> ComprobarResult<()> {
        self.fill(first, last, zip)?;
        self.tap_continue()?;
        self.verify_no_validation_error()?;
        info!(first, last, zip, "submitted shipping information");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockApp, MockDriver};
    use crate::pages::products::ProductsPage;
    use crate::wait::WaitPolicy;

    fn fast() -> WaitPolicy {
        WaitPolicy::new(Duration::from_millis(120)).with_poll_interval(Duration::from_millis(10))
    }

    fn driver_at_checkout() -> MockDriver {
        let driver = MockDriver::with_app(MockApp::at_products());
        {
            let session = Session::new(&driver).with_wait(fast());
            let products = ProductsPage::new(&session).with_confirm_policy(fast());
            products.add_to_cart_by_name("Sauce Labs Backpack").unwrap();
            products.open_cart().unwrap();
            session
                .click(&Locator::accessibility_id(crate::pages::cart::CHECKOUT_DESC))
                .unwrap();
        }
        driver
    }

    #[test]
    fn test_filled_form_passes_validation() {
        let driver = driver_at_checkout();
        let session = Session::new(&driver).with_wait(fast());
        let checkout = CheckoutPage::new(&session);
        assert!(checkout.is_loaded().unwrap());
        checkout.fill("Jamie", "Rivera", "94103").unwrap();
        checkout.tap_continue().unwrap();
        checkout
            .verify_no_validation_error_within(Duration::from_millis(60))
            .unwrap();
    }

    #[test]
    fn test_empty_form_raises_validation_banner() {
        let driver = driver_at_checkout();
        let session = Session::new(&driver).with_wait(fast());
        let checkout = CheckoutPage::new(&session);
        checkout.tap_continue().unwrap();
        let result = checkout.verify_no_validation_error_within(Duration::from_millis(60));
        match result {
            Err(ComprobarError::AssertionFailed { message }) => {
                assert!(message.contains("First Name is required"));
            }
            other => panic!("expected assertion failure, got {other:?}"),
        }
    }

    #[test]
    fn test_validation_error_names_first_missing_field() {
        let driver = driver_at_checkout();
        let session = Session::new(&driver).with_wait(fast());
        let checkout = CheckoutPage::new(&session);
        checkout.fill("Jamie", "", "").unwrap();
        checkout.tap_continue().unwrap();
        assert_eq!(checkout.validation_error().unwrap(), "Last Name is required");
    }
}
