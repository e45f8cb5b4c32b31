//! Error types for Sitegen
//!
//! Every fallible engine operation returns [`SitegenResult`]. Errors carry a
//! stable code (see [`UnifiedError`]) so hosts can map them onto their own
//! transport, e.g. the `business-error` event of a streaming response.

mod constructors;
mod conversions;
mod types;
mod unified_error;

pub use types::{OptionExt, ResultExt, SitegenError, SitegenResult, UnifiedError};
