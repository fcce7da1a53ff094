//! Login screen: credential entry, autofill shortcut, error banner.

use tracing::info;

use crate::locator::Locator;
use crate::result::{ComprobarError, ComprobarResult};
use crate::session::Session;

/// Username input field
pub const USERNAME_DESC: &str = "test-Username";
/// Password input field
pub const PASSWORD_DESC: &str = "test-Password";
/// Login submit button
pub const LOGIN_BUTTON_DESC: &str = "test-LOGIN";
/// Error banner shown on rejected credentials
pub const ERROR_DESC: &str = "test-Error message";
/// Title text of the screen reached after a successful login
pub const PRODUCTS_TITLE: &str = "PRODUCTS";
/// Autofill entry used by the happy-path scenarios
pub const STANDARD_USER: &str = "standard_user";

/// Page model for the login screen
#[derive(Debug)]
pub struct LoginPage<'a, 'd> {
    session: &'a Session<'d>,
}

impl<'a, 'd> LoginPage<'a, 'd> {
    /// Bind the page model to a session
    #[must_use]
    pub fn new(session: &'a Session<'d>) -> Self {
        Self { session }
    }

    /// Whether the login button is currently on screen
    pub fn is_loaded(&self) -> ComprobarResult<bool> {
        self.session
            .is_visible(&Locator::accessibility_id(LOGIN_BUTTON_DESC))
    }

    /// Current content of the username field.
    ///
    /// Falls back from element text to the `text` attribute; a field that
    /// yields neither reads as the literal `"EMPTY"`.
    pub fn username_value(&self) -> ComprobarResult<String> {
        let field = self
            .session
            .find_one(&Locator::accessibility_id(USERNAME_DESC))?;
        let text = self.session.driver().text_of(&field)?;
        if !text.is_empty() {
            return Ok(text);
        }
        match self.session.driver().attribute_of(&field, "text")? {
            Some(attr) if !attr.is_empty() => Ok(attr),
            _ => Ok("EMPTY".to_string()),
        }
    }

    /// Scroll the credential list into view and tap the standard user entry
    pub fn select_standard_user(&self) -> ComprobarResult<()> {
        let entry = self.session.scroll_to_text(STANDARD_USER)?;
        self.session.driver().click(&entry)
    }

    /// Type credentials into both fields
    pub fn enter_credentials(&self, username: &str, password: &str) -> ComprobarResult<()> {
        self.session
            .set_text(&Locator::accessibility_id(USERNAME_DESC), username)?;
        self.session
            .set_text(&Locator::accessibility_id(PASSWORD_DESC), password)
    }

    /// Tap the login button
    pub fn tap_login(&self) -> ComprobarResult<()> {
        self.session
            .click(&Locator::accessibility_id(LOGIN_BUTTON_DESC))
    }

    /// Text of the error banner, failing if no banner is shown
    pub fn error_message(&self) -> ComprobarResult<String> {
        self.session
            .get_text(&Locator::accessibility_id(ERROR_DESC))
    }

    /// Whether the error banner is currently shown
    pub fn has_error(&self) -> ComprobarResult<bool> {
        self.session
            .is_visible(&Locator::accessibility_id(ERROR_DESC))
    }

    /// Log in via the autofill entry and wait for the product list.
    ///
    /// Confirms the autofill actually populated the username field before
    /// submitting; a blank or wrong field fails the scenario here rather
    /// than as a confusing credential rejection later.
    pub fn login_with_standard_user(&self) -> ComprobarResult<()> {
        if !self.is_loaded()? {
            return Err(ComprobarError::assertion("login screen did not load"));
        }
        self.select_standard_user()?;
        let filled = self.username_value()?;
        if filled != STANDARD_USER {
            return Err(ComprobarError::assertion(format!(
                "autofill left username field as {filled:?}, expected {STANDARD_USER:?}"
            )));
        }
        let button = self.session.scroll_to_descriptor(LOGIN_BUTTON_DESC)?;
        self.session.driver().click(&button)?;
        self.expect_products_screen()?;
        info!(user = STANDARD_USER, "logged in");
        Ok(())
    }

    /// Log in with explicit credentials and wait for the product list
    pub fn login_with(&self, username: &str, password: &str) -> ComprobarResult<()> {
        self.enter_credentials(username, password)?;
        self.tap_login()?;
        self.expect_products_screen()
    }

    fn expect_products_screen(&self) -> ComprobarResult<()> {
        let products = Locator::text(PRODUCTS_TITLE);
        if self
            .session
            .is_visible_within(&products, self.session.wait().timeout)?
        {
            Ok(())
        } else {
            Err(ComprobarError::assertion(
                "product list did not appear after login",
            ))
        }
    }
}
