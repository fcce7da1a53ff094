//! Comprobar: page-object end-to-end suite for the mobile shop app.
//!
//! The suite drives the app through an opaque [`Driver`] boundary and
//! layers intent-level page models on top of a polling [`Session`]:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  integration scenarios (tests/)                          │
//! │    └─ Scenario ── run artifacts, failure screenshots     │
//! │        └─ pages ── login / products / cart / checkout    │
//! │            └─ Session ── bounded-wait find/click/type    │
//! │                └─ Driver ── device session boundary      │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything is synchronous and single-threaded: one driver, one
//! session, blocking polls with hard timeouts. [`mock::MockDriver`]
//! stands in for a real device so every flow runs in plain `cargo test`.

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

pub mod artifacts;
pub mod capabilities;
pub mod config;
pub mod driver;
pub mod locator;
pub mod logging;
pub mod mock;
pub mod pages;
pub mod result;
pub mod scenario;
pub mod session;
pub mod wait;

pub use artifacts::RunArtifacts;
pub use capabilities::Capabilities;
pub use config::Settings;
pub use driver::{Driver, ElementHandle, SwipeGesture};
pub use locator::{Locator, ScrollTarget, Selector};
pub use result::{ComprobarError, ComprobarResult};
pub use scenario::Scenario;
pub use session::Session;
pub use wait::WaitPolicy;
