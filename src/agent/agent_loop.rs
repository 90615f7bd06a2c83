//! Core agent loop implementation.

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::llm::{ChatMessage, GeminiClient, LlmClient};
use crate::tools::{ToolContext, ToolRegistry};

use super::plan::{Action, PlanStep};
use super::prompt::build_system_prompt;

/// Delay between executed steps so the desktop can settle.
const STEP_DELAY: Duration = Duration::from_secs(1);

/// Immutable description of one run.
#[derive(Debug, Clone)]
pub struct TaskRequest {
    /// The string to checksum and visualize
    pub input: String,

    /// Where the resulting image is emailed
    pub recipient: String,
}

impl TaskRequest {
    fn initial_query(&self) -> String {
        format!(
            "Calculate the ASCII exponential sum for \"{}\", visualize it on the canvas, and email the image to {}.",
            self.input, self.recipient
        )
    }
}

/// Types of run log entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogEntryType {
    /// Tool is being called
    ToolCall,
    /// Tool returned a result
    ToolResult,
    /// Agent produced the final response
    Response,
}

/// A single entry in the run log.
#[derive(Debug, Clone)]
pub struct StepLogEntry {
    /// Timestamp (ISO 8601)
    pub timestamp: String,

    /// Entry type
    pub entry_type: LogEntryType,

    /// Content of the entry
    pub content: String,
}

impl StepLogEntry {
    fn new(entry_type: LogEntryType, content: String) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            entry_type,
            content,
        }
    }
}

/// Outcome of a completed run.
#[derive(Debug)]
pub struct RunReport {
    /// The model's closing summary
    pub summary: String,

    /// Number of tool steps executed
    pub steps_used: usize,

    /// Detailed execution log
    pub log: Vec<StepLogEntry>,
}

/// The autonomous agent.
pub struct Agent {
    config: Config,
    llm: Arc<dyn LlmClient>,
    tools: ToolRegistry,
}

impl Agent {
    /// Create a new agent with the given configuration.
    pub fn new(config: Config) -> Self {
        let llm = Arc::new(GeminiClient::new(config.api_key.clone()));
        let tools = ToolRegistry::new();

        Self { config, llm, tools }
    }

    /// Create an agent with a custom client and registry (used by tests).
    pub fn with_client(config: Config, llm: Arc<dyn LlmClient>, tools: ToolRegistry) -> Self {
        Self { config, llm, tools }
    }

    /// Run one task to completion and return the final summary and log.
    ///
    /// The loop asks the model for the next step, executes it, and feeds the
    /// result back. A reply that decodes to neither a function call nor a
    /// final answer aborts the run; so does exhausting the step budget.
    pub async fn run_task(&self, request: &TaskRequest) -> anyhow::Result<RunReport> {
        let ctx = ToolContext::new(self.config.clone());
        let system_prompt = build_system_prompt(&self.tools);

        let mut transcript: Vec<String> = Vec::new();
        let mut query = request.initial_query();
        let mut log = Vec::new();

        for step in 0..self.config.max_steps {
            tracing::debug!("Planning step {}", step + 1);

            let messages = [
                ChatMessage::system(system_prompt.clone()),
                ChatMessage::user(query.clone()),
            ];
            let response = self
                .llm
                .chat_completion(&self.config.model, &messages)
                .await?;

            match PlanStep::parse(&response)? {
                PlanStep::Finish(summary) => {
                    tracing::info!("Agent finished after {} steps", step);
                    log.push(StepLogEntry::new(LogEntryType::Response, summary.clone()));
                    return Ok(RunReport {
                        summary,
                        steps_used: step,
                        log,
                    });
                }
                PlanStep::Invoke(action) => {
                    let result = self.execute_action(&action, &ctx, &mut log).await;
                    transcript.push(format!(
                        "In step {}, {} returned: {}",
                        step + 1,
                        action.tool_name(),
                        result
                    ));
                    query = follow_up_query(&transcript);
                    tokio::time::sleep(STEP_DELAY).await;
                }
            }
        }

        Err(anyhow::anyhow!(
            "Max steps ({}) reached without completion",
            self.config.max_steps
        ))
    }

    /// Execute a single planned action; failures become failed-step results
    /// for the model, not run aborts.
    async fn execute_action(
        &self,
        action: &Action,
        ctx: &ToolContext,
        log: &mut Vec<StepLogEntry>,
    ) -> String {
        log.push(StepLogEntry::new(
            LogEntryType::ToolCall,
            format!(
                "Calling tool: {} with args: {}",
                action.tool_name(),
                action.arguments()
            ),
        ));

        let result = self
            .tools
            .execute(action.tool_name(), action.arguments(), ctx)
            .await;

        let result_str = match result {
            Ok(output) => output,
            Err(e) => format!("Error: {}", e),
        };

        log.push(StepLogEntry::new(
            LogEntryType::ToolResult,
            truncate_for_log(&result_str, 1000),
        ));

        result_str
    }
}

fn follow_up_query(transcript: &[String]) -> String {
    format!(
        "Previous steps and results:\n{}\n\nWhat should be the next step?",
        transcript.join("\n")
    )
}

/// Truncate a string for logging purposes.
fn truncate_for_log(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars).collect();
        format!("{}... [truncated]", head)
    }
}
