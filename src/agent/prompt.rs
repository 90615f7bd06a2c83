//! System prompt templates for the agent.

use serde_json::Value;

use crate::canvas::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::tools::ToolRegistry;

/// Build the system prompt with tool definitions.
pub fn build_system_prompt(tools: &ToolRegistry) -> String {
    let tool_descriptions = tools
        .list_tools()
        .iter()
        .enumerate()
        .map(|(i, t)| format!("{}. {}({}) - {}", i + 1, t.name, render_params(&t.parameters), t.description))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are an agent that controls a desktop paint application and sends emails.

## Available Tools
{tool_descriptions}

Your task is to:
1. Calculate the ASCII exponential sum for the given string
2. Visualize the result on the canvas (draw a rectangle and add the text)
3. Save the visualization as an image
4. Email the image to the given recipient

You must respond with EXACTLY ONE line in this format (no additional text):
FUNCTION_CALL: function_name|param1|param2|...

Rules:
1. Only call functions listed above.
2. The canvas is {width}x{height} pixels; its center is ({cx}, {cy}). Place the result text at the center and draw a rectangle that surrounds it, for example 476|274|676|374.
3. When sending the email, use the EXACT path returned by save_image as the attachment path. Look at the previous steps to find it.
4. You decide the order of operations yourself. Just respond with the next function call you want to make.

When you are done, respond with: FINAL_ANSWER: <summary of what was done>"#,
        tool_descriptions = tool_descriptions,
        width = CANVAS_WIDTH,
        height = CANVAS_HEIGHT,
        cx = CANVAS_WIDTH / 2,
        cy = CANVAS_HEIGHT / 2,
    )
}

/// Render a tool's parameter schema as `name: type, ...`, in declared order.
fn render_params(schema: &Value) -> String {
    let props = match schema.get("properties").and_then(Value::as_object) {
        Some(props) if !props.is_empty() => props,
        _ => return String::new(),
    };

    // The `required` array carries the declared order; object keys alone
    // come back alphabetized.
    let required: Vec<&str> = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|a| a.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let mut names = required;
    for name in props.keys() {
        if !names.contains(&name.as_str()) {
            names.push(name);
        }
    }

    names
        .iter()
        .map(|name| {
            let ty = props
                .get(*name)
                .and_then(|info| info.get("type"))
                .and_then(Value::as_str)
                .unwrap_or("unknown");
            format!("{}: {}", name, ty)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prompt_lists_every_tool_with_its_signature() {
        let prompt = build_system_prompt(&ToolRegistry::new());

        assert!(prompt.contains("open_canvas()"));
        assert!(prompt.contains("draw_rectangle(x1: integer, y1: integer, x2: integer, y2: integer)"));
        assert!(prompt.contains("add_text(x: integer, y: integer, text: string)"));
        assert!(prompt.contains("save_image(path: string)"));
        assert!(prompt.contains("send_email(to: string, attachment_path: string)"));
        assert!(prompt.contains("ascii_exponential_sum(input: string)"));
        assert!(prompt.contains("FUNCTION_CALL:"));
        assert!(prompt.contains("FINAL_ANSWER:"));
    }

    #[test]
    fn params_render_in_declared_order() {
        let schema = json!({
            "type": "object",
            "properties": {
                "x1": { "type": "integer" },
                "y1": { "type": "integer" },
                "x2": { "type": "integer" },
                "y2": { "type": "integer" }
            },
            "required": ["x1", "y1", "x2", "y2"]
        });
        assert_eq!(
            render_params(&schema),
            "x1: integer, y1: integer, x2: integer, y2: integer"
        );
    }

    #[test]
    fn empty_schema_renders_no_parameters() {
        let schema = json!({"type": "object", "properties": {}});
        assert_eq!(render_params(&schema), "");
    }
}
