//! Checkout overview and completion screens.

use tracing::info;

use crate::locator::Locator;
use crate::result::{ComprobarError, ComprobarResult};
use crate::session::Session;

use super::{verify_item_with_price, VerificationOutcome};
use crate::pages::login::PRODUCTS_TITLE;

/// Title text of the overview screen
pub const OVERVIEW_TITLE: &str = "CHECKOUT: OVERVIEW";
/// Finish button, usually below the fold
pub const FINISH_DESC: &str = "test-FINISH";
/// Title text of the completion screen
pub const COMPLETE_TITLE: &str = "CHECKOUT: COMPLETE!";
/// Back-home button on the completion screen
pub const BACK_HOME_DESC: &str = "test-BACK HOME";

/// Page model for the order overview and completion screens
#[derive(Debug)]
pub struct CheckoutOverviewPage<'a, 'd> {
    session: &'a Session<'d>,
}

impl<'a, 'd> CheckoutOverviewPage<'a, 'd> {
    /// Bind the page model to a session
    #[must_use]
    pub fn new(session: &'a Session<'d>) -> Self {
        Self { session }
    }

    /// Whether the overview title is currently on screen
    pub fn is_loaded(&self) -> ComprobarResult<bool> {
        self.session.is_visible(&Locator::text(OVERVIEW_TITLE))
    }

    /// Best-effort check that `name` is listed at `price`
    pub fn verify_item(&self, name: &str, price: &str) -> ComprobarResult<VerificationOutcome> {
        verify_item_with_price(self.session, name, price)
    }

    /// Scroll to the finish button, tap it, and assert the completion
    /// screen is shown
    pub fn finish_purchase(&self) -> ComprobarResult<()> {
        let finish = self.session.scroll_to_descriptor(FINISH_DESC)?;
        self.session.driver().click(&finish)?;
        let complete = Locator::text(COMPLETE_TITLE);
        if !self
            .session
            .is_visible_within(&complete, self.session.wait().timeout)?
        {
            return Err(ComprobarError::assertion(
                "completion screen did not appear after finish",
            ));
        }
        if !self
            .session
            .is_visible(&Locator::accessibility_id(BACK_HOME_DESC))?
        {
            return Err(ComprobarError::assertion(
                "completion screen is missing the back-home button",
            ));
        }
        info!("purchase completed");
        Ok(())
    }

    /// Tap back-home and assert the product list is shown again
    pub fn back_home(&self) -> ComprobarResult<()> {
        self.session
            .click(&Locator::accessibility_id(BACK_HOME_DESC))?;
        let products = Locator::text(PRODUCTS_TITLE);
        if self
            .session
            .is_visible_within(&products, self.session.wait().timeout)?
        {
            Ok(())
        } else {
            Err(ComprobarError::assertion(
                "product list did not appear after back-home",
            ))
        }
    }
}
