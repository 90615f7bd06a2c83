//! Agent module - the core autonomous agent logic.
//!
//! The agent follows a "tools in a loop" pattern:
//! 1. Build context with system prompt and the user's task
//! 2. Ask the LLM for the next step
//! 3. Decode the reply into a plan step; execute it and feed back the result
//! 4. Repeat until the LLM answers with a final summary or the step budget
//!    runs out

mod agent_loop;
mod plan;
mod prompt;

pub use agent_loop::{Agent, LogEntryType, RunReport, StepLogEntry, TaskRequest};
pub use plan::{Action, PlanError, PlanStep};
pub use prompt::build_system_prompt;
