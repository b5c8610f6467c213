//! LLM provider clients and abstractions.
//!
//! The research pipeline talks to language models through the [`LLMClient`]
//! trait: cheap structural calls (role selection, sub-query decomposition)
//! go to the fast model, report writing to the smart model. Both are
//! resolved from the session's [`crate::config::ResearchConfig`].

pub mod client;
pub mod openai;

pub use client::{client_from_config, LLMClient, Provider};
