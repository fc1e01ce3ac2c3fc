//! Page capture for the analysis pipeline.
//!
//! - [`browser::driver::BrowserDriver`]: WebDriver session wrapper
//! - [`browser::page::BrowserPage`]: navigation, readiness and source access
//! - [`capture::PageCapturer`]: the capture seam used by the pipeline, with a
//!   WebDriver-backed implementation
pub mod browser;
pub mod capture;

pub use capture::{PageCapture, PageCapturer, WebDriverCapturer};
