//! Repo-Debugger: send a directory's files and an issue to an LLM
//!
//! This library provides the directory collector, prompt assembly, and the
//! retrying exchange with an OpenAI-compatible completion service.

pub mod cli;
pub mod config;
pub mod domain;
pub mod exchange;
pub mod prompt;
pub mod scan;
pub mod utils;
