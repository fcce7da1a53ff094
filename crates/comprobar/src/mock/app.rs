//! State machine behind [`super::MockDriver`].
//!
//! Models the shopping app as screens built from flat node lists. Element
//! ids are stable strings; a handle stays valid only while its node is in
//! the current tree, which reproduces the staleness behavior of a real
//! device session.

use std::collections::HashMap;

use crate::locator::{ScrollTarget, Selector};

/// Product fixture shared by every mock session, in default app order
pub const CATALOG: &[(&str, &str)] = &[
    ("Sauce Labs Backpack", "$29.99"),
    ("Sauce Labs Bike Light", "$9.99"),
    ("Sauce Labs Bolt T-Shirt", "$15.99"),
    ("Sauce Labs Fleece Jacket", "$49.99"),
    ("Sauce Labs Onesie", "$7.99"),
    ("Test.allTheThings() T-Shirt (Red)", "$15.99"),
];

const USERNAMES: &[&str] = &["standard_user", "locked_out_user", "problem_user"];

const FILTER_LABELS: &[&str] = &[
    "Name (A to Z)",
    "Name (Z to A)",
    "Price (low to high)",
    "Price (high to low)",
];

/// Screens of the mock app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Screen {
    Login,
    Products,
    Cart,
    CheckoutInfo,
    CheckoutOverview,
    CheckoutComplete,
}

#[derive(Debug, Clone)]
struct Node {
    id: String,
    text: String,
    desc: String,
    parent: Option<String>,
    /// Whether this node is a text view for text-based selectors
    textual: bool,
}

/// The scripted shopping app
#[derive(Debug, Clone)]
pub struct MockApp {
    screen: Screen,
    /// Catalog indices in current display order
    order: Vec<usize>,
    /// Catalog indices in the cart, in add order
    cart: Vec<usize>,
    /// Items visible at once on the product list
    window: usize,
    window_start: usize,
    username: String,
    password: String,
    login_error: Option<String>,
    login_scrolled: bool,
    filter_open: bool,
    checkout_first: String,
    checkout_last: String,
    checkout_zip: String,
    checkout_error: Option<String>,
    /// Product name to remaining swipes before its price row renders
    deferred: HashMap<String, u32>,
}

impl Default for MockApp {
    fn default() -> Self {
        Self::new()
    }
}

impl MockApp {
    /// Fresh app on the login screen
    #[must_use]
    pub fn new() -> Self {
        Self {
            screen: Screen::Login,
            order: (0..CATALOG.len()).collect(),
            cart: Vec::new(),
            window: 2,
            window_start: 0,
            username: String::new(),
            password: String::new(),
            login_error: None,
            login_scrolled: false,
            filter_open: false,
            checkout_first: String::new(),
            checkout_last: String::new(),
            checkout_zip: String::new(),
            checkout_error: None,
            deferred: HashMap::new(),
        }
    }

    /// App already past login, on the product list
    #[must_use]
    pub fn at_products() -> Self {
        Self {
            screen: Screen::Products,
            username: "standard_user".to_string(),
            password: "secret_sauce".to_string(),
            ..Self::new()
        }
    }

    /// Screen currently shown
    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub(super) fn set_window(&mut self, window: usize) {
        self.window = window.max(1);
    }

    pub(super) fn defer_price(&mut self, name: &str, swipes: u32) {
        self.deferred.insert(name.to_string(), swipes);
    }

    /// Resolve a selector against the current tree, in document order
    #[must_use]
    pub fn resolve(&self, selector: &Selector) -> Vec<String> {
        match selector {
            Selector::Nth { base, index } => index
                .checked_sub(1)
                .and_then(|i| self.resolve(base).into_iter().nth(i))
                .into_iter()
                .collect(),
            Selector::Within { container, child } => match self.resolve(container).into_iter().next()
            {
                Some(parent) => self.resolve_within(&parent, child),
                None => Vec::new(),
            },
            flat => self
                .nodes()
                .into_iter()
                .filter(|n| Self::matches(n, flat))
                .map(|n| n.id)
                .collect(),
        }
    }

    /// Resolve a selector against the children of one container node
    #[must_use]
    pub fn resolve_within(&self, parent_id: &str, selector: &Selector) -> Vec<String> {
        match selector {
            Selector::Nth { base, index } => index
                .checked_sub(1)
                .and_then(|i| self.resolve_within(parent_id, base).into_iter().nth(i))
                .into_iter()
                .collect(),
            Selector::Within { container, child } => {
                match self.resolve_within(parent_id, container).into_iter().next() {
                    Some(inner) => self.resolve_within(&inner, child),
                    None => Vec::new(),
                }
            }
            flat => self
                .nodes()
                .into_iter()
                .filter(|n| n.parent.as_deref() == Some(parent_id) && Self::matches(n, flat))
                .map(|n| n.id)
                .collect(),
        }
    }

    fn matches(node: &Node, selector: &Selector) -> bool {
        match selector {
            Selector::AccessibilityId(v) => node.desc == *v,
            Selector::Text(v) => node.textual && node.text == *v,
            Selector::TextContains(v) => node.textual && node.text.contains(v.as_str()),
            Selector::AnyText => node.textual,
            Selector::Nth { .. } | Selector::Within { .. } => false,
        }
    }

    #[must_use]
    pub fn is_attached(&self, id: &str) -> bool {
        self.nodes().iter().any(|n| n.id == id)
    }

    #[must_use]
    pub fn text_of(&self, id: &str) -> Option<String> {
        self.nodes().into_iter().find(|n| n.id == id).map(|n| n.text)
    }

    #[must_use]
    pub fn attribute_of(&self, id: &str, name: &str) -> Option<String> {
        let node = self.nodes().into_iter().find(|n| n.id == id)?;
        match name {
            "text" => Some(node.text),
            "content-desc" => Some(node.desc),
            _ => None,
        }
    }

    #[must_use]
    pub fn parent_of(&self, id: &str) -> Option<String> {
        self.nodes().into_iter().find(|n| n.id == id)?.parent
    }

    /// Perform a tap. Screen transitions and state changes live here.
    pub fn click(&mut self, id: &str) -> Result<(), String> {
        if let Some(name) = id.strip_prefix("login.autofill.") {
            self.username = name.to_string();
            self.password = "secret_sauce".to_string();
            return Ok(());
        }
        if let Some(rest) = id.strip_prefix("products.filter.") {
            let index: usize = rest.parse().map_err(|_| format!("bad filter id: {id}"))?;
            self.apply_sort(index);
            self.filter_open = false;
            self.window_start = 0;
            return Ok(());
        }
        if let Some(rest) = id.strip_prefix("products.item.") {
            if let Some(ci) = rest
                .strip_suffix(".button")
                .and_then(|n| n.parse::<usize>().ok())
            {
                match self.cart.iter().position(|&c| c == ci) {
                    Some(at) => {
                        self.cart.remove(at);
                    }
                    None => self.cart.push(ci),
                }
                return Ok(());
            }
            return Ok(());
        }
        if let Some(rest) = id.strip_prefix("cart.item.") {
            if let Some(pos) = rest
                .strip_suffix(".remove")
                .and_then(|n| n.parse::<usize>().ok())
            {
                if pos == 0 || pos > self.cart.len() {
                    return Err(format!("no cart row: {id}"));
                }
                self.cart.remove(pos - 1);
                return Ok(());
            }
            return Ok(());
        }
        match id {
            "login.login" => {
                self.submit_login();
                Ok(())
            }
            "products.cart_icon" => {
                self.screen = Screen::Cart;
                Ok(())
            }
            "products.filter" => {
                self.filter_open = true;
                Ok(())
            }
            "cart.checkout" => {
                self.screen = Screen::CheckoutInfo;
                self.checkout_first.clear();
                self.checkout_last.clear();
                self.checkout_zip.clear();
                self.checkout_error = None;
                Ok(())
            }
            "checkout.continue" => {
                self.submit_checkout();
                Ok(())
            }
            "overview.finish" => {
                self.screen = Screen::CheckoutComplete;
                Ok(())
            }
            "complete.backhome" => {
                self.screen = Screen::Products;
                self.cart.clear();
                self.window_start = 0;
                Ok(())
            }
            // Taps on titles, fields, and rows have no effect.
            _ => Ok(()),
        }
    }

    /// Replace the value of an editable field
    pub fn set_field(&mut self, id: &str, value: &str) -> Result<(), String> {
        let slot = match id {
            "login.username" => &mut self.username,
            "login.password" => &mut self.password,
            "checkout.first" => &mut self.checkout_first,
            "checkout.last" => &mut self.checkout_last,
            "checkout.zip" => &mut self.checkout_zip,
            _ => return Err(format!("not an editable field: {id}")),
        };
        *slot = value.to_string();
        Ok(())
    }

    /// Advance the product window by one page and settle deferred rows
    pub fn swipe(&mut self) {
        if self.screen == Screen::Products && !self.filter_open {
            let last_start = self.order.len().saturating_sub(self.window);
            self.window_start = (self.window_start + self.window).min(last_start);
        }
        for remaining in self.deferred.values_mut() {
            *remaining = remaining.saturating_sub(1);
        }
    }

    /// Scroll a target into view, returning its element id
    pub fn scroll_to(&mut self, target: &ScrollTarget) -> Option<String> {
        match target {
            ScrollTarget::Text(text) => {
                if self.screen == Screen::Login && USERNAMES.contains(&text.as_str()) {
                    self.login_scrolled = true;
                    return Some(format!("login.autofill.{text}"));
                }
                if self.screen == Screen::Products && !self.filter_open {
                    if let Some(pos) = self
                        .order
                        .iter()
                        .position(|&ci| CATALOG[ci].0 == text.as_str())
                    {
                        let last_start = self.order.len().saturating_sub(self.window);
                        self.window_start = pos.min(last_start);
                        return Some(format!("products.item.{}.title", self.order[pos]));
                    }
                }
                self.nodes()
                    .into_iter()
                    .find(|n| n.textual && n.text == *text)
                    .map(|n| n.id)
            }
            ScrollTarget::Descriptor(desc) => self
                .nodes()
                .into_iter()
                .find(|n| n.desc == *desc)
                .map(|n| n.id),
        }
    }

    fn submit_login(&mut self) {
        if self.username.is_empty() {
            self.login_error = Some("Username is required".to_string());
        } else if self.password.is_empty() {
            self.login_error = Some("Password is required".to_string());
        } else if self.username == "standard_user" && self.password == "secret_sauce" {
            self.login_error = None;
            self.screen = Screen::Products;
            self.window_start = 0;
        } else {
            self.login_error =
                Some("Username and password do not match any user in this service.".to_string());
        }
    }

    fn submit_checkout(&mut self) {
        if self.checkout_first.is_empty() {
            self.checkout_error = Some("First Name is required".to_string());
        } else if self.checkout_last.is_empty() {
            self.checkout_error = Some("Last Name is required".to_string());
        } else if self.checkout_zip.is_empty() {
            self.checkout_error = Some("Postal Code is required".to_string());
        } else {
            self.checkout_error = None;
            self.screen = Screen::CheckoutOverview;
        }
    }

    fn apply_sort(&mut self, label_index: usize) {
        match label_index {
            0 => self.order.sort_by(|&a, &b| CATALOG[a].0.cmp(CATALOG[b].0)),
            1 => self.order.sort_by(|&a, &b| CATALOG[b].0.cmp(CATALOG[a].0)),
            2 => self
                .order
                .sort_by(|&a, &b| price_value(CATALOG[a].1).total_cmp(&price_value(CATALOG[b].1))),
            3 => self
                .order
                .sort_by(|&a, &b| price_value(CATALOG[b].1).total_cmp(&price_value(CATALOG[a].1))),
            _ => {}
        }
    }

    fn nodes(&self) -> Vec<Node> {
        match self.screen {
            Screen::Login => self.login_nodes(),
            Screen::Products => self.products_nodes(),
            Screen::Cart => self.cart_nodes(),
            Screen::CheckoutInfo => self.checkout_info_nodes(),
            Screen::CheckoutOverview => self.overview_nodes(),
            Screen::CheckoutComplete => vec![
                node("complete.title", "CHECKOUT: COMPLETE!", "", None, true),
                node(
                    "complete.backhome",
                    "BACK HOME",
                    "test-BACK HOME",
                    None,
                    false,
                ),
            ],
        }
    }

    fn login_nodes(&self) -> Vec<Node> {
        let mut out = vec![
            node("login.username", &self.username, "test-Username", None, false),
            node("login.password", &self.password, "test-Password", None, false),
            node("login.login", "LOGIN", "test-LOGIN", None, false),
        ];
        if let Some(message) = &self.login_error {
            out.push(node("login.error", message, "test-Error message", None, true));
        }
        if self.login_scrolled {
            for name in USERNAMES {
                out.push(node(
                    &format!("login.autofill.{name}"),
                    name,
                    "",
                    None,
                    true,
                ));
            }
        }
        out
    }

    fn products_nodes(&self) -> Vec<Node> {
        let mut out = vec![
            node("products.title", "PRODUCTS", "", None, true),
            node("products.cart_icon", "", "test-Cart", None, false),
            node(
                "products.filter",
                "",
                "test-Modal Selector Button",
                None,
                false,
            ),
        ];
        if self.filter_open {
            for (index, label) in FILTER_LABELS.iter().enumerate() {
                out.push(node(&format!("products.filter.{index}"), label, "", None, true));
            }
            return out;
        }
        let end = (self.window_start + self.window).min(self.order.len());
        for &ci in &self.order[self.window_start..end] {
            let (name, price) = CATALOG[ci];
            let container = format!("products.item.{ci}");
            out.push(node(&container, "", "test-Item", None, false));
            out.push(node(
                &format!("{container}.title"),
                name,
                "test-Item title",
                Some(&container),
                true,
            ));
            let settled = self.deferred.get(name).map_or(true, |&left| left == 0);
            if settled {
                out.push(node(
                    &format!("{container}.price"),
                    price,
                    "test-Price",
                    Some(&container),
                    true,
                ));
                let label = if self.cart.contains(&ci) {
                    ("REMOVE", "test-REMOVE")
                } else {
                    ("ADD TO CART", "test-ADD TO CART")
                };
                out.push(node(
                    &format!("{container}.button"),
                    label.0,
                    label.1,
                    Some(&container),
                    true,
                ));
            }
        }
        out
    }

    fn cart_nodes(&self) -> Vec<Node> {
        let mut out = vec![
            node("cart.title", "YOUR CART", "", None, true),
            node("cart.checkout", "CHECKOUT", "test-CHECKOUT", None, false),
        ];
        for (pos, &ci) in self.cart.iter().enumerate() {
            let (name, price) = CATALOG[ci];
            let container = format!("cart.item.{}", pos + 1);
            out.push(node(&container, "", "test-Item", None, false));
            out.push(node(
                &format!("{container}.qty"),
                "1",
                "test-Amount",
                Some(&container),
                true,
            ));
            out.push(node(
                &format!("{container}.title"),
                name,
                "test-Item title",
                Some(&container),
                true,
            ));
            out.push(node(
                &format!("{container}.price"),
                price,
                "test-Price",
                Some(&container),
                true,
            ));
            out.push(node(
                &format!("{container}.remove"),
                "REMOVE",
                "test-REMOVE",
                Some(&container),
                true,
            ));
        }
        out
    }

    fn checkout_info_nodes(&self) -> Vec<Node> {
        let mut out = vec![
            node("checkout.title", "CHECKOUT: INFORMATION", "", None, true),
            node(
                "checkout.first",
                &self.checkout_first,
                "test-First Name",
                None,
                false,
            ),
            node(
                "checkout.last",
                &self.checkout_last,
                "test-Last Name",
                None,
                false,
            ),
            node(
                "checkout.zip",
                &self.checkout_zip,
                "test-Zip/Postal Code",
                None,
                false,
            ),
            node("checkout.continue", "CONTINUE", "test-CONTINUE", None, false),
        ];
        if let Some(message) = &self.checkout_error {
            out.push(node(
                "checkout.error",
                message,
                "test-Error message",
                None,
                true,
            ));
        }
        out
    }

    fn overview_nodes(&self) -> Vec<Node> {
        let mut out = vec![
            node("overview.title", "CHECKOUT: OVERVIEW", "", None, true),
            node("overview.finish", "FINISH", "test-FINISH", None, false),
        ];
        for (pos, &ci) in self.cart.iter().enumerate() {
            let (name, price) = CATALOG[ci];
            let container = format!("overview.item.{}", pos + 1);
            out.push(node(&container, "", "test-Item", None, false));
            out.push(node(
                &format!("{container}.title"),
                name,
                "test-Item title",
                Some(&container),
                true,
            ));
            out.push(node(
                &format!("{container}.price"),
                price,
                "test-Price",
                Some(&container),
                true,
            ));
        }
        out
    }
}

fn node(id: &str, text: &str, desc: &str, parent: Option<&str>, textual: bool) -> Node {
    Node {
        id: id.to_string(),
        text: text.to_string(),
        desc: desc.to_string(),
        parent: parent.map(str::to_string),
        textual,
    }
}

fn price_value(price: &str) -> f64 {
    price.trim_start_matches('$').parse().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::{Locator, Selector};

    fn ids(app: &MockApp, locator: &Locator) -> Vec<String> {
        app.resolve(locator.selector())
    }

    mod login_tests {
        use super::*;

        #[test]
        fn test_empty_credentials_show_error() {
            let mut app = MockApp::new();
            app.click("login.login").unwrap();
            assert_eq!(app.screen(), Screen::Login);
            assert_eq!(app.text_of("login.error").as_deref(), Some("Username is required"));
        }

        #[test]
        fn test_autofill_fills_both_fields() {
            let mut app = MockApp::new();
            app.scroll_to(&ScrollTarget::Text("standard_user".to_string()))
                .unwrap();
            app.click("login.autofill.standard_user").unwrap();
            assert_eq!(app.text_of("login.username").as_deref(), Some("standard_user"));
            app.click("login.login").unwrap();
            assert_eq!(app.screen(), Screen::Products);
        }

        #[test]
        fn test_wrong_password_stays_on_login() {
            let mut app = MockApp::new();
            app.set_field("login.username", "standard_user").unwrap();
            app.set_field("login.password", "wrong").unwrap();
            app.click("login.login").unwrap();
            assert_eq!(app.screen(), Screen::Login);
            assert!(app.is_attached("login.error"));
        }
    }

    mod product_list_tests {
        use super::*;

        #[test]
        fn test_window_limits_visible_items() {
            let app = MockApp::at_products();
            let items = ids(&app, &Locator::accessibility_id("test-Item"));
            assert_eq!(items.len(), 2);
        }

        #[test]
        fn test_swipe_advances_and_clamps() {
            let mut app = MockApp::at_products();
            app.swipe();
            app.swipe();
            app.swipe();
            app.swipe();
            let items = ids(&app, &Locator::accessibility_id("test-Item"));
            assert_eq!(items.len(), 2);
            let last = app.text_of(&format!("{}.title", items[1])).unwrap();
            assert_eq!(last, "Test.allTheThings() T-Shirt (Red)");
        }

        #[test]
        fn test_scroll_to_product_repositions_window() {
            let mut app = MockApp::at_products();
            let id = app
                .scroll_to(&ScrollTarget::Text("Sauce Labs Onesie".to_string()))
                .unwrap();
            assert_eq!(app.text_of(&id).as_deref(), Some("Sauce Labs Onesie"));
        }

        #[test]
        fn test_filter_modal_covers_items() {
            let mut app = MockApp::at_products();
            app.click("products.filter").unwrap();
            assert!(ids(&app, &Locator::accessibility_id("test-Item")).is_empty());
            assert_eq!(ids(&app, &Locator::text("Name (Z to A)")).len(), 1);
        }

        #[test]
        fn test_price_sort_is_applied() {
            let mut app = MockApp::at_products();
            app.click("products.filter").unwrap();
            app.click("products.filter.2").unwrap();
            let first = ids(&app, &Locator::accessibility_id("test-Item title"));
            assert_eq!(app.text_of(&first[0]).as_deref(), Some("Sauce Labs Onesie"));
        }

        #[test]
        fn test_deferred_price_settles_after_swipes() {
            let mut app = MockApp::at_products();
            app.defer_price("Sauce Labs Backpack", 1);
            assert!(ids(&app, &Locator::accessibility_id("test-Price")).len() < 2);
            app.swipe();
            app.window_start = 0;
            assert_eq!(ids(&app, &Locator::accessibility_id("test-Price")).len(), 2);
        }
    }

    mod checkout_tests {
        use super::*;

        fn app_at_checkout() -> MockApp {
            let mut app = MockApp::at_products();
            app.click("products.item.0.button").unwrap();
            app.click("products.cart_icon").unwrap();
            app.click("cart.checkout").unwrap();
            app
        }

        #[test]
        fn test_missing_fields_block_continue() {
            let mut app = app_at_checkout();
            app.click("checkout.continue").unwrap();
            assert_eq!(app.screen(), Screen::CheckoutInfo);
            assert_eq!(
                app.text_of("checkout.error").as_deref(),
                Some("First Name is required")
            );
        }

        #[test]
        fn test_complete_purchase_path() {
            let mut app = app_at_checkout();
            app.set_field("checkout.first", "Jamie").unwrap();
            app.set_field("checkout.last", "Rivera").unwrap();
            app.set_field("checkout.zip", "94103").unwrap();
            app.click("checkout.continue").unwrap();
            assert_eq!(app.screen(), Screen::CheckoutOverview);
            app.click("overview.finish").unwrap();
            assert_eq!(app.screen(), Screen::CheckoutComplete);
            app.click("complete.backhome").unwrap();
            assert_eq!(app.screen(), Screen::Products);
            assert!(app.cart.is_empty());
        }

        #[test]
        fn test_remove_from_cart_row() {
            let mut app = MockApp::at_products();
            app.click("products.item.0.button").unwrap();
            app.click("products.cart_icon").unwrap();
            assert!(app.is_attached("cart.item.1"));
            app.click("cart.item.1.remove").unwrap();
            assert!(!app.is_attached("cart.item.1"));
        }
    }

    mod selector_tests {
        use super::*;

        #[test]
        fn test_nth_is_one_based() {
            let app = MockApp::at_products();
            let second = ids(
                &app,
                &Locator::nth(Selector::accessibility_id("test-Item"), 2),
            );
            assert_eq!(second, vec!["products.item.1".to_string()]);
        }

        #[test]
        fn test_within_scopes_to_container() {
            let app = MockApp::at_products();
            let price = ids(
                &app,
                &Locator::within(
                    Selector::Nth {
                        base: Box::new(Selector::accessibility_id("test-Item")),
                        index: 1,
                    },
                    Selector::accessibility_id("test-Price"),
                ),
            );
            assert_eq!(app.text_of(&price[0]).as_deref(), Some("$29.99"));
        }

        #[test]
        fn test_any_text_orders_cart_row_children() {
            let mut app = MockApp::at_products();
            app.click("products.item.0.button").unwrap();
            app.click("products.cart_icon").unwrap();
            let texts = ids(
                &app,
                &Locator::within(
                    Selector::Nth {
                        base: Box::new(Selector::accessibility_id("test-Item")),
                        index: 1,
                    },
                    Selector::AnyText,
                ),
            );
            let second = app.text_of(&texts[1]).unwrap();
            assert_eq!(second, "Sauce Labs Backpack");
        }
    }
}
