//! Product list screen: virtualized list traversal, cart additions, sort
//! filter.
//!
//! The list renders only a window of items, so enumeration and targeted
//! lookup are built from swipe gestures plus positional locators. Both
//! traversal loops carry hard attempt budgets; a list that never settles
//! fails the scenario instead of hanging it.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use tracing::{debug, info, warn};

use crate::driver::SwipeGesture;
use crate::locator::{Locator, Selector};
use crate::result::{ComprobarError, ComprobarResult};
use crate::session::Session;
use crate::wait::WaitPolicy;

use super::{ITEM_DESC, ITEM_PRICE_DESC, ITEM_TITLE_DESC};

/// Title text of the product list screen
pub const PRODUCTS_TITLE: &str = "PRODUCTS";
/// Label of an unadded item's action button
pub const ADD_TO_CART_TEXT: &str = "ADD TO CART";
/// Sort filter button
pub const FILTER_BUTTON_DESC: &str = "test-Modal Selector Button";
/// Cart icon in the header
pub const CART_DESC: &str = "test-Cart";

/// Upper bound on list-advancing swipes during full enumeration
pub const MAX_SCROLL_ATTEMPTS: u32 = 10;
/// Upper bound on confirmation attempts when adding one item
pub const MAX_SWIPE_ATTEMPTS: u32 = 5;

/// Product names known to the suite, in default app order
pub const KNOWN_PRODUCTS: [&str; 6] = [
    "Sauce Labs Backpack",
    "Sauce Labs Bike Light",
    "Sauce Labs Bolt T-Shirt",
    "Sauce Labs Fleece Jacket",
    "Sauce Labs Onesie",
    "Test.allTheThings() T-Shirt (Red)",
];

/// Name and displayed price of one product row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRecord {
    /// Product title text
    pub name: String,
    /// Displayed price, dollar sign included
    pub price: String,
}

/// Sort orders offered by the filter modal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum SortOrder {
    NameAscending,
    NameDescending,
    PriceAscending,
    PriceDescending,
}

impl SortOrder {
    /// Label of the corresponding filter modal entry
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::NameAscending => "Name (A to Z)",
            Self::NameDescending => "Name (Z to A)",
            Self::PriceAscending => "Price (low to high)",
            Self::PriceDescending => "Price (high to low)",
        }
    }
}

/// Parse a displayed price such as `"$29.99"` into its numeric value
#[must_use]
pub fn parse_price(price: &str) -> Option<f64> {
    price.trim().trim_start_matches('$').parse().ok()
}

/// Whether prices run in the given direction, tolerating rounding noise
/// of one cent between adjacent rows
#[must_use]
pub fn is_sorted_by_price(records: &[ProductRecord], ascending: bool) -> bool {
    records.windows(2).all(|pair| {
        match (parse_price(&pair[0].price), parse_price(&pair[1].price)) {
            (Some(a), Some(b)) => {
                if ascending {
                    a <= b + 0.01
                } else {
                    a + 0.01 >= b
                }
            }
            _ => false,
        }
    })
}

/// Pick one of the known product names at random
#[must_use]
pub fn random_product_name() -> &'static str {
    KNOWN_PRODUCTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(KNOWN_PRODUCTS[0])
}

/// Page model for the product list screen
#[derive(Debug)]
pub struct ProductsPage<'a, 'd> {
    session: &'a Session<'d>,
    confirm: WaitPolicy,
}

impl<'a, 'd> ProductsPage<'a, 'd> {
    /// Bind the page model to a session
    #[must_use]
    pub fn new(session: &'a Session<'d>) -> Self {
        Self {
            session,
            confirm: WaitPolicy::confirm(),
        }
    }

    /// Override the per-attempt confirmation budget used when adding items
    #[must_use]
    pub fn with_confirm_policy(mut self, confirm: WaitPolicy) -> Self {
        self.confirm = confirm;
        self
    }

    /// Whether the product list title is currently on screen
    pub fn is_loaded(&self) -> ComprobarResult<bool> {
        self.session.is_visible(&Locator::text(PRODUCTS_TITLE))
    }

    /// Records for the rows currently rendered.
    ///
    /// Rows missing a title or price (still settling after a gesture) are
    /// skipped rather than reported half-filled.
    pub fn visible_products(&self) -> ComprobarResult<Vec<ProductRecord>> {
        let containers = self
            .session
            .driver()
            .find(&Locator::accessibility_id(ITEM_DESC))?;
        let mut records = Vec::with_capacity(containers.len());
        for container in &containers {
            let title = self
                .session
                .driver()
                .find_within(container, &Locator::accessibility_id(ITEM_TITLE_DESC))?
                .into_iter()
                .next();
            let price = self
                .session
                .driver()
                .find_within(container, &Locator::accessibility_id(ITEM_PRICE_DESC))?
                .into_iter()
                .next();
            match (title, price) {
                (Some(title), Some(price)) => records.push(ProductRecord {
                    name: self.session.driver().text_of(&title)?,
                    price: self.session.driver().text_of(&price)?,
                }),
                _ => debug!("skipping half-rendered product row"),
            }
        }
        Ok(records)
    }

    /// Enumerate every product by swiping through the whole list.
    ///
    /// De-duplicates by name across passes. The first pass always swipes
    /// even if it found nothing new, since the initial viewport may sit
    /// above rows that exist below the fold; later passes swipe only while
    /// new names keep appearing. Swipes are capped at
    /// [`MAX_SCROLL_ATTEMPTS`].
    pub fn all_products(&self) -> ComprobarResult<Vec<ProductRecord>> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut records = Vec::new();
        let mut attempts: u32 = 0;
        while attempts < MAX_SCROLL_ATTEMPTS {
            let mut added = false;
            for record in self.visible_products()? {
                if seen.insert(record.name.clone()) {
                    records.push(record);
                    added = true;
                }
            }
            if added || attempts == 0 {
                self.session.swipe(SwipeGesture::collect())?;
                attempts += 1;
            } else {
                break;
            }
        }
        info!(count = records.len(), "enumerated product list");
        Ok(records)
    }

    /// Scroll `name` into view and add it to the cart, returning its row.
    ///
    /// Resolution is two-phase. The item's viewport ordinal is fixed
    /// first; then the price and action button at that ordinal are
    /// confirmed under a short budget, with a corrective swipe and up to
    /// [`MAX_SWIPE_ATTEMPTS`] retries for rows that are still settling.
    pub fn add_to_cart_by_name(&self, name: &str) -> ComprobarResult<ProductRecord> {
        self.session.scroll_to_text(name).map_err(|err| match err {
            ComprobarError::NotFound { .. } => ComprobarError::LookupFailed {
                product: name.to_string(),
            },
            other => other,
        })?;
        let index = self.resolve_ordinal(name)?;
        debug!(name, index, "resolved product ordinal");

        let price_locator = Locator::within(
            Selector::Nth {
                base: Box::new(Selector::accessibility_id(ITEM_DESC)),
                index,
            },
            Selector::accessibility_id(ITEM_PRICE_DESC),
        );
        let button_locator = Locator::nth(Selector::text(ADD_TO_CART_TEXT), index);

        let mut attempt: u32 = 0;
        loop {
            match self.try_add(&price_locator, &button_locator) {
                Ok(price) => {
                    info!(name, %price, "added product to cart");
                    return Ok(ProductRecord {
                        name: name.to_string(),
                        price,
                    });
                }
                Err(ComprobarError::NotFound { .. } | ComprobarError::NotInteractable { .. }) => {
                    attempt += 1;
                    if attempt >= MAX_SWIPE_ATTEMPTS {
                        return Err(ComprobarError::NotFound {
                            locator: format!("price or button for \"{name}\""),
                            timeout_ms: self.confirm.timeout_ms(),
                        });
                    }
                    warn!(name, attempt, "row not settled, swiping to correct");
                    self.session.swipe(SwipeGesture::corrective())?;
                }
                Err(other) => return Err(other),
            }
        }
    }

    fn try_add(&self, price: &Locator, button: &Locator) -> ComprobarResult<String> {
        let price_handle = self.session.find_one_within(price, self.confirm)?;
        let price_text = self.session.driver().text_of(&price_handle)?;
        let button_handle = self.session.find_one_within(button, self.confirm)?;
        self.session.driver().click(&button_handle)?;
        Ok(price_text)
    }

    /// 1-based viewport ordinal of the row titled `name`
    fn resolve_ordinal(&self, name: &str) -> ComprobarResult<usize> {
        let containers = self
            .session
            .driver()
            .find(&Locator::accessibility_id(ITEM_DESC))?;
        for (slot, container) in containers.iter().enumerate() {
            let titles = self
                .session
                .driver()
                .find_within(container, &Locator::accessibility_id(ITEM_TITLE_DESC))?;
            for title in titles {
                if self.session.driver().text_of(&title)? == name {
                    return Ok(slot + 1);
                }
            }
        }
        Err(ComprobarError::LookupFailed {
            product: name.to_string(),
        })
    }

    /// Open the filter modal
    pub fn open_filters(&self) -> ComprobarResult<()> {
        self.session
            .click(&Locator::accessibility_id(FILTER_BUTTON_DESC))
    }

    /// Pick an entry in the already-open filter modal by its label
    pub fn select_filter(&self, label: &str) -> ComprobarResult<()> {
        self.session.click(&Locator::text(label))
    }

    /// Open the filter modal and pick a sort order
    pub fn sort_by(&self, order: SortOrder) -> ComprobarResult<()> {
        self.open_filters()?;
        self.select_filter(order.label())?;
        info!(order = order.label(), "applied sort filter");
        Ok(())
    }

    /// Enumerate the list and assert its prices follow `order`.
    ///
    /// Only the price orders are checkable this way; name orders pass
    /// through to the name comparison.
    pub fn verify_sorted(&self, order: SortOrder) -> ComprobarResult<Vec<ProductRecord>> {
        let records = self.all_products()?;
        let ok = match order {
            SortOrder::PriceAscending => is_sorted_by_price(&records, true),
            SortOrder::PriceDescending => is_sorted_by_price(&records, false),
            SortOrder::NameAscending => {
                records.windows(2).all(|pair| pair[0].name <= pair[1].name)
            }
            SortOrder::NameDescending => {
                records.windows(2).all(|pair| pair[0].name >= pair[1].name)
            }
        };
        if ok {
            Ok(records)
        } else {
            Err(ComprobarError::assertion(format!(
                "list not sorted as {:?}: {:?}",
                order.label(),
                records.iter().map(|r| r.price.as_str()).collect::<Vec<_>>()
            )))
        }
    }

    /// Tap the cart icon
    pub fn open_cart(&self) -> ComprobarResult<()> {
        self.session.click(&Locator::accessibility_id(CART_DESC))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockApp, MockDriver};
    use std::time::Duration;

    fn fast() -> WaitPolicy {
        WaitPolicy::new(Duration::from_millis(120)).with_poll_interval(Duration::from_millis(10))
    }

    fn page<'a, 'd>(session: &'a Session<'d>) -> ProductsPage<'a, 'd> {
        ProductsPage::new(session).with_confirm_policy(fast())
    }

    mod enumeration_tests {
        use super::*;

        #[test]
        fn test_all_products_crosses_the_window() {
            let driver = MockDriver::with_app(MockApp::at_products()).with_window(2);
            let session = Session::new(&driver).with_wait(fast());
            let records = page(&session).all_products().unwrap();
            assert_eq!(records.len(), 6);
            let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
            assert_eq!(names, KNOWN_PRODUCTS);
        }

        #[test]
        fn test_enumeration_swipe_budget_holds() {
            let driver = MockDriver::with_app(MockApp::at_products()).with_window(1);
            let session = Session::new(&driver).with_wait(fast());
            let records = page(&session).all_products().unwrap();
            assert_eq!(records.len(), 6);
            assert!(driver.swipe_count() <= MAX_SCROLL_ATTEMPTS);
        }

        #[test]
        fn test_first_pass_swipes_even_without_new_rows() {
            let driver = MockDriver::with_app(MockApp::at_products());
            // Both first-window rows are still settling, so the first pass
            // collects nothing; the loop must swipe anyway instead of
            // concluding the list is exhausted.
            driver.defer_price("Sauce Labs Backpack", 1);
            driver.defer_price("Sauce Labs Bike Light", 1);
            let session = Session::new(&driver).with_wait(fast());
            let records = page(&session).all_products().unwrap();
            assert!(driver.swipe_count() >= 1);
            assert!(records.iter().any(|r| r.name == "Sauce Labs Fleece Jacket"));
        }

        #[test]
        fn test_non_scrolling_list_yields_no_duplicates() {
            let driver = MockDriver::with_app(MockApp::at_products()).with_window(10);
            let session = Session::new(&driver).with_wait(fast());
            let records = page(&session).all_products().unwrap();
            assert_eq!(records.len(), 6);
            assert_eq!(driver.swipe_count(), 1);
        }

        #[test]
        fn test_records_carry_prices() {
            let driver = MockDriver::with_app(MockApp::at_products());
            let session = Session::new(&driver).with_wait(fast());
            let records = page(&session).all_products().unwrap();
            assert_eq!(records[0].price, "$29.99");
            assert_eq!(records[5].price, "$15.99");
        }
    }

    mod add_to_cart_tests {
        use super::*;

        #[test]
        fn test_add_by_name_returns_row_record() {
            let driver = MockDriver::with_app(MockApp::at_products());
            let session = Session::new(&driver).with_wait(fast());
            let record = page(&session)
                .add_to_cart_by_name("Sauce Labs Fleece Jacket")
                .unwrap();
            assert_eq!(record.price, "$49.99");
        }

        #[test]
        fn test_add_unknown_name_is_lookup_failure() {
            let driver = MockDriver::with_app(MockApp::at_products());
            let session = Session::new(&driver).with_wait(fast());
            let result = page(&session).add_to_cart_by_name("Imaginary Gadget");
            assert!(matches!(
                result,
                Err(ComprobarError::LookupFailed { product }) if product == "Imaginary Gadget"
            ));
        }

        #[test]
        fn test_settling_row_is_retried_with_corrective_swipe() {
            let driver = MockDriver::with_app(MockApp::at_products());
            driver.defer_price("Test.allTheThings() T-Shirt (Red)", 1);
            let session = Session::new(&driver).with_wait(fast());
            let record = page(&session)
                .add_to_cart_by_name("Test.allTheThings() T-Shirt (Red)")
                .unwrap();
            assert_eq!(record.price, "$15.99");
            assert!(driver.swipe_count() >= 1);
        }

        #[test]
        fn test_row_that_never_settles_exhausts_the_budget() {
            let driver = MockDriver::with_app(MockApp::at_products());
            driver.defer_price("Test.allTheThings() T-Shirt (Red)", 50);
            let session = Session::new(&driver).with_wait(fast());
            let result = page(&session).add_to_cart_by_name("Test.allTheThings() T-Shirt (Red)");
            assert!(matches!(result, Err(ComprobarError::NotFound { .. })));
            assert_eq!(driver.swipe_count(), MAX_SWIPE_ATTEMPTS - 1);
        }

        #[test]
        fn test_exhaustion_error_names_the_product() {
            let driver = MockDriver::with_app(MockApp::at_products());
            driver.defer_price("Sauce Labs Onesie", 50);
            let session = Session::new(&driver).with_wait(fast());
            let err = page(&session)
                .add_to_cart_by_name("Sauce Labs Onesie")
                .unwrap_err();
            assert!(err.to_string().contains("Sauce Labs Onesie"));
        }
    }

    mod sort_tests {
        use super::*;

        #[test]
        fn test_price_ascending_sort_verifies() {
            let driver = MockDriver::with_app(MockApp::at_products());
            let session = Session::new(&driver).with_wait(fast());
            let products = page(&session);
            products.sort_by(SortOrder::PriceAscending).unwrap();
            let records = products.verify_sorted(SortOrder::PriceAscending).unwrap();
            assert_eq!(records[0].name, "Sauce Labs Onesie");
        }

        #[test]
        fn test_unsorted_list_fails_price_check() {
            let driver = MockDriver::with_app(MockApp::at_products());
            let session = Session::new(&driver).with_wait(fast());
            let result = page(&session).verify_sorted(SortOrder::PriceDescending);
            assert!(matches!(result, Err(ComprobarError::AssertionFailed { .. })));
        }

        #[test]
        fn test_price_tolerance_accepts_near_equal_rows() {
            let records = vec![
                ProductRecord {
                    name: "a".to_string(),
                    price: "$9.99".to_string(),
                },
                ProductRecord {
                    name: "b".to_string(),
                    price: "$9.98".to_string(),
                },
            ];
            assert!(is_sorted_by_price(&records, true));
        }

        #[test]
        fn test_parse_price_strips_currency() {
            assert_eq!(parse_price("$29.99"), Some(29.99));
            assert_eq!(parse_price("free"), None);
        }
    }

    #[test]
    fn test_random_product_is_known() {
        let name = random_product_name();
        assert!(KNOWN_PRODUCTS.contains(&name));
    }
}
