//! Cart screen: row inspection, removal, checkout entry.

use crate::locator::{Locator, Selector};
use crate::result::{ComprobarError, ComprobarResult};
use crate::session::Session;

use super::{verify_item_with_price, VerificationOutcome, ITEM_DESC};

/// Title text of the cart screen
pub const CART_TITLE: &str = "YOUR CART";
/// Checkout button
pub const CHECKOUT_DESC: &str = "test-CHECKOUT";
/// Remove button inside a cart row
pub const REMOVE_DESC: &str = "test-REMOVE";

/// Page model for the cart screen
#[derive(Debug)]
pub struct CartPage<'a, 'd> {
    session: &'a Session<'d>,
}

impl<'a, 'd> CartPage<'a, 'd> {
    /// Bind the page model to a session
    #[must_use]
    pub fn new(session: &'a Session<'d>) -> Self {
        Self { session }
    }

    /// Whether the cart title is currently on screen
    pub fn is_loaded(&self) -> ComprobarResult<bool> {
        self.session.is_visible(&Locator::text(CART_TITLE))
    }

    /// Title of the topmost cart row.
    ///
    /// Rows lead with a quantity label, so the name is the second text
    /// node; a row with a single text node yields that one.
    pub fn first_item_name(&self) -> ComprobarResult<String> {
        let row = self.session.find_one(&Locator::nth(
            Selector::accessibility_id(ITEM_DESC),
            1,
        ))?;
        let texts = self
            .session
            .driver()
            .find_within(&row, &Locator::any_text())?;
        let node = texts
            .get(1)
            .or_else(|| texts.first())
            .ok_or_else(|| ComprobarError::assertion("cart row has no text nodes"))?;
        self.session.driver().text_of(node)
    }

    /// Remove the topmost cart row
    pub fn remove_first_item(&self) -> ComprobarResult<()> {
        self.session.click(&Locator::within(
            Selector::Nth {
                base: Box::new(Selector::accessibility_id(ITEM_DESC)),
                index: 1,
            },
            Selector::accessibility_id(REMOVE_DESC),
        ))
    }

    /// Whether a row mentioning `name` is present, checked on the current
    /// snapshot without waiting
    pub fn item_exists(&self, name: &str) -> ComprobarResult<bool> {
        let matches = self
            .session
            .driver()
            .find(&Locator::text_contains(name))?;
        Ok(!matches.is_empty())
    }

    /// Best-effort check that `name` is listed at `price`
    pub fn verify_item(&self, name: &str, price: &str) -> ComprobarResult<VerificationOutcome> {
        verify_item_with_price(self.session, name, price)
    }

    /// Tap the checkout button
    pub fn tap_checkout(&self) -> ComprobarResult<()> {
        self.session.click(&Locator::accessibility_id(CHECKOUT_DESC))
    }
}
