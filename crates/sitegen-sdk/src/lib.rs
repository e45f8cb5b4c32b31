//! Sitegen SDK
//!
//! This crate wires the engine in `sitegen-core` to its configuration, the
//! sandboxed scaffold tools of `sitegen-tools` and a chat history store, and
//! exposes the result as a single [`SitegenClient`].
//!
//! # Example
//!
//! ```no_run
//! use sitegen_sdk::{OutputType, SitegenClient};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), sitegen_sdk::SitegenError> {
//! let client = SitegenClient::new()?;
//! let outcome = client
//!     .chat_to_codegen(
//!         "1",
//!         "A landing page for a coffee shop",
//!         OutputType::SingleFile,
//!         &mut |event| print!("{}", event.to_wire()),
//!         &CancellationToken::new(),
//!     )
//!     .await?;
//! println!("saved to {:?}", outcome.output_dir);
//! # Ok(())
//! # }
//! ```

pub mod client;

pub use client::{SitegenClient, SitegenClientBuilder};

// Re-export commonly used types from core
pub use sitegen_core::{
    codegen::{GenerationEvent, GenerationOutcome},
    config::Config,
    error::{SitegenError, SitegenResult, UnifiedError},
    session::{ChatHistoryProvider, ChatHistoryRecord},
    types::OutputType,
    workflow::{WorkflowEvent, WorkflowState},
};
