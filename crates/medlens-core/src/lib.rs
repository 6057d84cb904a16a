#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

//! # Medlens Core
//!
//! Orchestration core for biomedical entity extraction and summarization.
//! Defines the capability traits the two inference engines are reached
//! through, the lifecycle that loads them once, the services that normalize
//! their output, and the orchestrator that composes them per request.

mod error;

pub mod engine;
pub mod lifecycle;
pub mod orchestrator;
pub mod service;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub mod mock;

pub use error::{BoxedError, Error, ErrorKind, Result};
pub use lifecycle::LifecycleManager;
pub use orchestrator::{Orchestrator, OrchestratorConfig};
