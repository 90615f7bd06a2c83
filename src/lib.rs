//! # Paint Agent
//!
//! A small autonomous agent that checksums a string, visualizes the result in
//! a desktop paint application, and emails the saved image.
//!
//! This library provides:
//! - A tool provider wrapping desktop automation and email delivery
//! - An agent loop that turns LLM plan lines into tool invocations
//! - A client for the Gemini text-completion API
//!
//! ## Architecture
//!
//! The agent follows the "tools in a loop" pattern:
//! 1. Collect the task (input string, recipient) from the CLI
//! 2. Build a system prompt from the registered tool schemas
//! 3. Ask the LLM for the next step, decode it, execute the matching tool
//! 4. Feed the result back, repeat until the LLM answers with a final
//!    summary or the step budget runs out
//!
//! ## Example
//!
//! ```rust,ignore
//! use paint_agent::{agent::{Agent, TaskRequest}, config::Config};
//!
//! let config = Config::from_env()?;
//! let agent = Agent::new(config);
//! let report = agent.run_task(&TaskRequest {
//!     input: "Hello World".to_string(),
//!     recipient: "user@example.com".to_string(),
//! }).await?;
//! ```

pub mod agent;
pub mod canvas;
pub mod config;
pub mod llm;
pub mod tools;

pub use config::Config;
