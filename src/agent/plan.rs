//! Decoding of model responses into plan steps.
//!
//! The model replies with a single line, either
//! `FUNCTION_CALL: name|arg|arg|...` or `FINAL_ANSWER: summary`. Anything
//! else is a planning error and aborts the run.

use serde_json::{json, Value};
use thiserror::Error;

pub const FUNCTION_CALL_PREFIX: &str = "FUNCTION_CALL:";
pub const FINAL_ANSWER_PREFIX: &str = "FINAL_ANSWER:";

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("unrecognized response format: {0}")]
    UnrecognizedResponse(String),

    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("{tool} expects at least {expected} arguments, got {got}")]
    MissingArguments {
        tool: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("invalid {name} argument '{value}': expected an integer")]
    InvalidInteger { name: &'static str, value: String },
}

/// One planned tool invocation, one variant per tool.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    OpenCanvas,
    DrawRectangle { x1: i32, y1: i32, x2: i32, y2: i32 },
    AddText { x: i32, y: i32, text: String },
    SaveImage { path: String },
    SendEmail { to: String, attachment_path: String },
    AsciiExponentialSum { input: String },
}

impl Action {
    /// Registry name of the tool this action invokes.
    pub fn tool_name(&self) -> &'static str {
        match self {
            Action::OpenCanvas => "open_canvas",
            Action::DrawRectangle { .. } => "draw_rectangle",
            Action::AddText { .. } => "add_text",
            Action::SaveImage { .. } => "save_image",
            Action::SendEmail { .. } => "send_email",
            Action::AsciiExponentialSum { .. } => "ascii_exponential_sum",
        }
    }

    /// JSON arguments for registry dispatch.
    pub fn arguments(&self) -> Value {
        match self {
            Action::OpenCanvas => json!({}),
            Action::DrawRectangle { x1, y1, x2, y2 } => {
                json!({ "x1": x1, "y1": y1, "x2": x2, "y2": y2 })
            }
            Action::AddText { x, y, text } => json!({ "x": x, "y": y, "text": text }),
            Action::SaveImage { path } => json!({ "path": path }),
            Action::SendEmail {
                to,
                attachment_path,
            } => json!({ "to": to, "attachment_path": attachment_path }),
            Action::AsciiExponentialSum { input } => json!({ "input": input }),
        }
    }
}

/// A single decoded step of the plan.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanStep {
    Invoke(Action),
    Finish(String),
}

impl PlanStep {
    /// Decode one model response.
    ///
    /// Extra arguments beyond a tool's expected count are folded into the
    /// last textual argument where one exists, and ignored otherwise; missing
    /// arguments are an error.
    pub fn parse(response: &str) -> Result<Self, PlanError> {
        let trimmed = response.trim();

        if let Some(rest) = trimmed.strip_prefix(FINAL_ANSWER_PREFIX) {
            return Ok(PlanStep::Finish(rest.trim().to_string()));
        }

        let Some(rest) = trimmed.strip_prefix(FUNCTION_CALL_PREFIX) else {
            return Err(PlanError::UnrecognizedResponse(truncate(trimmed, 200)));
        };

        let parts: Vec<&str> = rest.split('|').map(str::trim).collect();
        let name = parts[0];
        let args = &parts[1..];

        let action = match name {
            "open_canvas" => Action::OpenCanvas,
            "draw_rectangle" => {
                require_args("draw_rectangle", args, 4)?;
                Action::DrawRectangle {
                    x1: parse_int("x1", args[0])?,
                    y1: parse_int("y1", args[1])?,
                    x2: parse_int("x2", args[2])?,
                    y2: parse_int("y2", args[3])?,
                }
            }
            "add_text" => {
                require_args("add_text", args, 3)?;
                Action::AddText {
                    x: parse_int("x", args[0])?,
                    y: parse_int("y", args[1])?,
                    // The text itself may contain pipes.
                    text: args[2..].join("|"),
                }
            }
            "save_image" => {
                require_args("save_image", args, 1)?;
                Action::SaveImage {
                    path: args[0].to_string(),
                }
            }
            "send_email" => {
                require_args("send_email", args, 2)?;
                Action::SendEmail {
                    to: args[0].to_string(),
                    attachment_path: args[1].to_string(),
                }
            }
            "ascii_exponential_sum" => {
                require_args("ascii_exponential_sum", args, 1)?;
                Action::AsciiExponentialSum {
                    input: args.join("|"),
                }
            }
            other => return Err(PlanError::UnknownTool(other.to_string())),
        };

        Ok(PlanStep::Invoke(action))
    }
}

fn require_args(tool: &'static str, args: &[&str], expected: usize) -> Result<(), PlanError> {
    if args.len() < expected {
        return Err(PlanError::MissingArguments {
            tool,
            expected,
            got: args.len(),
        });
    }
    Ok(())
}

fn parse_int(name: &'static str, value: &str) -> Result<i32, PlanError> {
    value.parse().map_err(|_| PlanError::InvalidInteger {
        name,
        value: value.to_string(),
    })
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        s.chars().take(max_chars).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_zero_argument_call() {
        let step = PlanStep::parse("FUNCTION_CALL: open_canvas").expect("parse");
        assert_eq!(step, PlanStep::Invoke(Action::OpenCanvas));
    }

    #[test]
    fn parses_rectangle_with_whitespace() {
        let step = PlanStep::parse("  FUNCTION_CALL: draw_rectangle| 476 |274| 676 | 374 ")
            .expect("parse");
        assert_eq!(
            step,
            PlanStep::Invoke(Action::DrawRectangle {
                x1: 476,
                y1: 274,
                x2: 676,
                y2: 374,
            })
        );
    }

    #[test]
    fn parses_text_containing_pipes() {
        let step = PlanStep::parse("FUNCTION_CALL: add_text|576|324|sum = 8581 | verified")
            .expect("parse");
        assert_eq!(
            step,
            PlanStep::Invoke(Action::AddText {
                x: 576,
                y: 324,
                text: "sum = 8581|verified".to_string(),
            })
        );
    }

    #[test]
    fn parses_final_answer() {
        let step = PlanStep::parse("FINAL_ANSWER: drew and emailed the result").expect("parse");
        assert_eq!(
            step,
            PlanStep::Finish("drew and emailed the result".to_string())
        );
    }

    #[test]
    fn rejects_unknown_tool() {
        let err = PlanStep::parse("FUNCTION_CALL: format_disk|/dev/sda").expect_err("unknown");
        assert!(matches!(err, PlanError::UnknownTool(name) if name == "format_disk"));
    }

    #[test]
    fn rejects_missing_arguments() {
        let err = PlanStep::parse("FUNCTION_CALL: draw_rectangle|476|274").expect_err("short");
        assert!(matches!(
            err,
            PlanError::MissingArguments {
                tool: "draw_rectangle",
                expected: 4,
                got: 2,
            }
        ));
    }

    #[test]
    fn rejects_non_numeric_coordinates() {
        let err =
            PlanStep::parse("FUNCTION_CALL: draw_rectangle|left|top|right|bottom").expect_err("nan");
        assert!(matches!(err, PlanError::InvalidInteger { name: "x1", .. }));
    }

    #[test]
    fn rejects_free_text() {
        let err = PlanStep::parse("Sure! I'll start by opening the canvas.").expect_err("chatter");
        assert!(matches!(err, PlanError::UnrecognizedResponse(_)));
    }

    #[test]
    fn action_arguments_match_tool_schemas() {
        let action = Action::DrawRectangle {
            x1: 1,
            y1: 2,
            x2: 3,
            y2: 4,
        };
        assert_eq!(action.tool_name(), "draw_rectangle");
        assert_eq!(
            action.arguments(),
            serde_json::json!({"x1": 1, "y1": 2, "x2": 3, "y2": 4})
        );

        let action = Action::SendEmail {
            to: "user@example.com".to_string(),
            attachment_path: "out.png".to_string(),
        };
        assert_eq!(
            action.arguments(),
            serde_json::json!({"to": "user@example.com", "attachment_path": "out.png"})
        );
    }

    #[test]
    fn empty_checksum_input_is_allowed() {
        let step = PlanStep::parse("FUNCTION_CALL: ascii_exponential_sum|").expect("parse");
        assert_eq!(
            step,
            PlanStep::Invoke(Action::AsciiExponentialSum {
                input: String::new(),
            })
        );
    }
}
