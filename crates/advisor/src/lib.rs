//! Advisory client for the external language-model completion service.
//!
//! - [`Advisor`] -- timeline, resource and progress suggestions for a dream.
//!   Every operation degrades to a fixed fallback instead of failing.
//! - [`CompletionProvider`] -- the transport seam; [`OpenAiProvider`] is the
//!   production implementation.
//! - [`AdvisorConfig`] -- provider settings loaded from the environment.

pub mod advisor;
pub mod config;
pub mod prompts;
pub mod provider;

pub use advisor::{
    Advisor, ProgressAnalysis, SuggestedResource, SuggestedTask, TaskSnapshot, Timeline,
};
pub use config::AdvisorConfig;
pub use provider::{AdvisorError, CompletionProvider, OpenAiProvider};
