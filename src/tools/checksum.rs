//! ASCII checksum tool.

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{Tool, ToolContext};

/// Sum of squared character ordinals.
///
/// Deterministic and side-effect free; the empty string sums to 0.
pub fn ascii_exponential_sum(input: &str) -> u64 {
    input.chars().map(|c| (c as u64) * (c as u64)).sum()
}

/// Compute the checksum the visualization is built around.
pub struct AsciiExponentialSum;

#[async_trait]
impl Tool for AsciiExponentialSum {
    fn name(&self) -> &str {
        "ascii_exponential_sum"
    }

    fn description(&self) -> &str {
        "Calculate the ASCII exponential sum of a string: each character's ordinal code squared, summed into one number."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "input": {
                    "type": "string",
                    "description": "The string to checksum"
                }
            },
            "required": ["input"]
        })
    }

    async fn execute(&self, args: Value, _ctx: &ToolContext) -> anyhow::Result<String> {
        let input = args["input"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Missing 'input' argument"))?;

        Ok(ascii_exponential_sum(input).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_sums_to_zero() {
        assert_eq!(ascii_exponential_sum(""), 0);
    }

    #[test]
    fn known_value_for_ab() {
        // 'A' = 65, 'B' = 66: 65^2 + 66^2 = 8581
        assert_eq!(ascii_exponential_sum("AB"), 8581);
    }

    #[test]
    fn checksum_is_deterministic() {
        let first = ascii_exponential_sum("Hello World");
        let second = ascii_exponential_sum("Hello World");
        assert_eq!(first, second);
    }

    #[test]
    fn checksum_is_case_sensitive() {
        assert_ne!(ascii_exponential_sum("ab"), ascii_exponential_sum("AB"));
    }

    #[test]
    fn non_ascii_characters_use_their_ordinals() {
        // U+00E9 = 233: 233^2 = 54289
        assert_eq!(ascii_exponential_sum("\u{e9}"), 54289);
    }
}
