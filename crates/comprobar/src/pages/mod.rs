//! Page models over a [`Session`].
//!
//! One module per screen. A page model owns the screen's locators and
//! exposes intent-level operations; it never reaches below the session
//! layer except for scoped queries on handles it already resolved.
//! Assertions about screen state fail with `AssertionFailed`; price
//! checks are best effort and report a [`VerificationOutcome`] instead.

pub mod cart;
pub mod checkout;
pub mod checkout_overview;
pub mod login;
pub mod products;

use tracing::warn;

use crate::locator::Locator;
use crate::result::ComprobarResult;
use crate::session::Session;

/// Accessibility descriptor of a product row container
pub const ITEM_DESC: &str = "test-Item";
/// Accessibility descriptor of a product title inside a row
pub const ITEM_TITLE_DESC: &str = "test-Item title";
/// Accessibility descriptor of a price label inside a row
pub const ITEM_PRICE_DESC: &str = "test-Price";

/// Outcome of a best-effort verification step.
///
/// A failed price check is diagnostic, not a scenario failure: the flow
/// continues and the mismatch lands in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// The expected value was found
    Passed,
    /// The check did not pass; the scenario continues regardless
    FailedNonFatal,
}

impl VerificationOutcome {
    /// Whether the check passed
    #[must_use]
    pub fn is_passed(self) -> bool {
        matches!(self, Self::Passed)
    }
}

/// Check that the item named `name` is on screen with `price` inside its
/// row container.
///
/// The item's presence is mandatory and fails the scenario; the price
/// comparison is best effort.
pub fn verify_item_with_price(
    session: &Session<'_>,
    name: &str,
    price: &str,
) -> ComprobarResult<VerificationOutcome> {
    let title = session.find_one(&Locator::text(name))?;
    let Some(container) = session.driver().container_of(&title)? else {
        warn!(name, "item title has no row container; skipping price check");
        return Ok(VerificationOutcome::FailedNonFatal);
    };
    let prices = session
        .driver()
        .find_within(&container, &Locator::accessibility_id(ITEM_PRICE_DESC))?;
    for handle in prices {
        if session.driver().text_of(&handle)? == price {
            return Ok(VerificationOutcome::Passed);
        }
    }
    warn!(name, price, "price not found next to item");
    Ok(VerificationOutcome::FailedNonFatal)
}
