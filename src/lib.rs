// Declare all our modules
#[cfg(feature = "browser")]
mod browser;
mod client;
pub mod config;
mod error;
pub mod logging;
pub mod lookup;
mod models;
pub mod parsers;
pub mod runner;
pub mod session;

// Publicly export the parts of our library that users will need
#[cfg(feature = "browser")]
pub use browser::BrowserSession;
pub use client::HttpSession;
pub use config::{Backend, Config};
pub use error::{ErrorKind, Result, ScraperError};
pub use models::*; // Exposes CourseCode, CourseRecord, Term, ...
pub use runner::{FailedLookup, FailurePolicy, RunReport};
pub use session::CatalogSession;
