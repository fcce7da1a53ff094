//! Locator abstraction for on-screen element selection.
//!
//! A [`Locator`] is an immutable (strategy, value) pair identifying zero or
//! more elements. Locators are built from a small closed set of typed
//! constructors rather than ad hoc string interpolation; the Android wire
//! forms (XPath, `UiAutomator` expressions) are rendered on demand by the
//! driver boundary.

use std::fmt;

/// Selector strategy for locating elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Platform accessibility descriptor (`content-desc` on Android)
    AccessibilityId(String),
    /// Exact visible text
    Text(String),
    /// Substring of visible text
    TextContains(String),
    /// Any text-bearing node (relative queries inside a container)
    AnyText,
    /// 1-based viewport ordinal among elements matching `base`.
    ///
    /// Positional selectors stay stable across scroll gestures as long as
    /// the same item occupies the same ordinal slot in the viewport, which
    /// is what the confirmation retry in the products page relies on.
    Nth {
        /// Selector whose matches are indexed
        base: Box<Selector>,
        /// 1-based ordinal
        index: usize,
    },
    /// Element matching `child` inside the first element matching `container`
    Within {
        /// Container selector, resolved first
        container: Box<Selector>,
        /// Child selector, resolved relative to the container
        child: Box<Selector>,
    },
}

impl Selector {
    /// Create an accessibility-descriptor selector
    #[must_use]
    pub fn accessibility_id(id: impl Into<String>) -> Self {
        Self::AccessibilityId(id.into())
    }

    /// Create an exact-text selector
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Create a substring-text selector
    #[must_use]
    pub fn text_contains(text: impl Into<String>) -> Self {
        Self::TextContains(text.into())
    }

    /// Render as an Android XPath expression
    #[must_use]
    pub fn to_xpath(&self) -> String {
        match self {
            Self::AccessibilityId(v) => format!("//*[@content-desc=\"{v}\"]"),
            Self::Text(v) => format!("//android.widget.TextView[@text=\"{v}\"]"),
            Self::TextContains(v) => {
                format!("//android.widget.TextView[contains(@text, \"{v}\")]")
            }
            Self::AnyText => "//android.widget.TextView".to_string(),
            Self::Nth { base, index } => format!("({})[{index}]", base.to_xpath()),
            Self::Within { container, child } => {
                // Child expressions already begin with a descendant axis.
                format!("{}{}", container.to_xpath(), child.to_xpath())
            }
        }
    }

    /// Render as a `UiSelector` expression, where one exists
    #[must_use]
    pub fn to_uiautomator(&self) -> Option<String> {
        match self {
            Self::AccessibilityId(v) => Some(format!("new UiSelector().description(\"{v}\")")),
            Self::Text(v) => Some(format!("new UiSelector().text(\"{v}\")")),
            Self::TextContains(v) => Some(format!("new UiSelector().textContains(\"{v}\")")),
            _ => None,
        }
    }
}

/// An immutable locator bound to one selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    selector: Selector,
}

impl Locator {
    /// Create a locator from any selector
    #[must_use]
    pub fn from_selector(selector: Selector) -> Self {
        Self { selector }
    }

    /// Locate by accessibility descriptor
    #[must_use]
    pub fn accessibility_id(id: impl Into<String>) -> Self {
        Self::from_selector(Selector::accessibility_id(id))
    }

    /// Locate by exact visible text
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::from_selector(Selector::text(text))
    }

    /// Locate by visible-text substring
    #[must_use]
    pub fn text_contains(text: impl Into<String>) -> Self {
        Self::from_selector(Selector::text_contains(text))
    }

    /// Locate any text-bearing node (meaningful in scoped queries)
    #[must_use]
    pub fn any_text() -> Self {
        Self::from_selector(Selector::AnyText)
    }

    /// Locate the `index`-th (1-based) element matching `base`
    #[must_use]
    pub fn nth(base: Selector, index: usize) -> Self {
        Self::from_selector(Selector::Nth {
            base: Box::new(base),
            index,
        })
    }

    /// Locate `child` inside the first element matching `container`
    #[must_use]
    pub fn within(container: Selector, child: Selector) -> Self {
        Self::from_selector(Selector::Within {
            container: Box::new(container),
            child: Box::new(child),
        })
    }

    /// Get the underlying selector
    #[must_use]
    pub fn selector(&self) -> &Selector {
        &self.selector
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.selector.to_xpath())
    }
}

/// Target of a platform scroll-until-visible gesture
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrollTarget {
    /// Scroll until an element with this exact text is in view
    Text(String),
    /// Scroll until an element with this accessibility descriptor is in view
    Descriptor(String),
}

impl ScrollTarget {
    /// Render the `UiScrollable` expression issued to the platform
    #[must_use]
    pub fn to_uiautomator(&self) -> String {
        let inner = match self {
            Self::Text(v) => format!("new UiSelector().text(\"{v}\")"),
            Self::Descriptor(v) => format!("new UiSelector().description(\"{v}\")"),
        };
        format!("new UiScrollable(new UiSelector().scrollable(true)).scrollIntoView({inner})")
    }
}

impl fmt::Display for ScrollTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(v) => write!(f, "text \"{v}\""),
            Self::Descriptor(v) => write!(f, "descriptor \"{v}\""),
        }
    }
}
