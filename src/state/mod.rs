//! State management module
//!
//! This module contains the request-scoped extraction state and the
//! result it aggregates into.

mod extraction_state;
mod result;

pub use extraction_state::ExtractionState;
pub use result::{ExtractionResult, UrlSource};
