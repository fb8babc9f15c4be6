//! Shared LLM access for the PDF insight backend.
//!
//! Two logical profiles are exposed through [`service_profiles::LlmServiceProfiles`]:
//! a **summary** profile used for narrative digests and an **embedding** profile
//! used to vectorize document sections and queries. Providers are Ollama and
//! any OpenAI-compatible API.

pub mod config;
pub mod error_handler;
pub mod health_service;
pub mod service_profiles;
pub mod services;
pub mod telemetry;
