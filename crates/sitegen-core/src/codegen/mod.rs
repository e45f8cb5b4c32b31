//! Code generation
//!
//! [`GenerationService`] streams a model response for one instruction,
//! driving sandboxed tools for project scaffolds. [`CodeExtractor`] and
//! [`ArtifactPersister`] turn plain responses into files, and
//! [`CodegenFacade`] chains the three behind the input guardrail.

mod agent;
mod events;
mod extractor;
mod facade;
mod persister;
mod service;

pub use agent::{AgentRound, AgentRoundOutcome};
pub use events::GenerationEvent;
pub use extractor::{ArtifactFile, CodeExtractor, ParsedArtifact};
pub use facade::{CodegenFacade, GenerationOutcome};
pub use persister::{ArtifactPersister, target_dir};
pub use service::GenerationService;
