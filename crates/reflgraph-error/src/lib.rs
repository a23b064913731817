//! Errors returned by model loading, configuration and rendering.
//!
//! Extraction and drawing in `reflgraph-core` recover locally and never
//! return these; they log a warning and produce an empty result instead.
//!
//! ```rust
//! use reflgraph_error::{Error, ErrorKind};
//!
//! let err = Error::unknown_reference("sample.Z")
//!     .with_operation("model::build")
//!     .with_context("class", "sample.B");
//! assert_eq!(err.kind(), ErrorKind::UnknownReference);
//! assert_eq!(err.context_value("class"), Some("sample.B"));
//! ```

mod error;
mod kind;

pub use error::Error;
pub use kind::ErrorKind;

pub type Result<T> = std::result::Result<T, Error>;
