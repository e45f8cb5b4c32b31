//! Shared domain types

mod output_type;

pub use output_type::{ExtractionStrategy, OutputPolicy, OutputType};
