//! E-mail address harvesting.
//!
//! Every event routed to the module flows through:
//! 1. Type guard: own `EMAILADDR` output and non-text payloads are skipped
//! 2. Regex scan for address-like tokens
//! 3. `ScopeFilter` prefilter, then sub-domain / external policy
//! 4. Emission of an `EMAILADDR` event to the injected sink

pub mod extractor;
pub mod scope;

pub use extractor::{EmailExtractor, MODULE_NAME};
pub use scope::{Rejection, ScopeFilter};
