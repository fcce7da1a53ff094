//! Scenario harness: session lifecycle around one end-to-end flow.
//!
//! A scenario owns the driver for its whole run. The driver is always
//! quit afterwards, pass or fail, and a failing flow leaves a screenshot
//! in the run's artifact directory before the error propagates.

use tracing::{error, info, warn};

use crate::artifacts::RunArtifacts;
use crate::driver::Driver;
use crate::result::ComprobarResult;
use crate::session::Session;
use crate::wait::WaitPolicy;

/// Artifact name for the screenshot taken when a scenario fails
pub const FAILURE_SCREENSHOT: &str = "99_failure";

/// One end-to-end flow bound to a driver and an artifact directory
pub struct Scenario {
    driver: Box<dyn Driver>,
    artifacts: RunArtifacts,
    wait: WaitPolicy,
}

impl std::fmt::Debug for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scenario").field("wait", &self.wait).finish()
    }
}

impl Scenario {
    /// Bind a driver to an artifact directory with the default wait policy
    #[must_use]
    pub fn new(driver: Box<dyn Driver>, artifacts: RunArtifacts) -> Self {
        Self {
            driver,
            artifacts,
            wait: WaitPolicy::default(),
        }
    }

    /// Override the wait policy handed to the scenario's session
    #[must_use]
    pub fn with_wait(mut self, wait: WaitPolicy) -> Self {
        self.wait = wait;
        self
    }

    /// The scenario's artifact directory
    #[must_use]
    pub fn artifacts(&self) -> &RunArtifacts {
        &self.artifacts
    }

    /// Run the flow, then quit the driver regardless of outcome.
    ///
    /// A failing flow gets a best-effort screenshot before the driver goes
    /// away; a quit failure after a passing flow is reported, but it never
    /// masks the flow's own error.
    pub fn run<T>(
        mut self,
        name: &str,
        flow: impl FnOnce(&Session<'_>, &RunArtifacts) -> ComprobarResult<T>,
    ) -> ComprobarResult<T> {
        info!(scenario = name, "starting scenario");
        let result = {
            let session = Session::new(self.driver.as_ref()).with_wait(self.wait);
            flow(&session, &self.artifacts)
        };
        match &result {
            Ok(_) => info!(scenario = name, "scenario passed"),
            Err(err) => {
                error!(scenario = name, error = %err, "scenario failed");
                self.capture_failure();
            }
        }
        let quit = self.driver.quit();
        match (result, quit) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(quit_err)) => Err(quit_err),
            (Err(flow_err), quit) => {
                if let Err(quit_err) = quit {
                    warn!(error = %quit_err, "driver quit failed after scenario error");
                }
                Err(flow_err)
            }
        }
    }

    fn capture_failure(&self) {
        match self.driver.screenshot() {
            Ok(png) => {
                if let Err(err) = self.artifacts.save_screenshot(FAILURE_SCREENSHOT, &png) {
                    warn!(error = %err, "could not save failure screenshot");
                }
            }
            Err(err) => warn!(error = %err, "could not capture failure screenshot"),
        }
    }
}
