//! Canvas tools: open the paint surface, draw on it, save the result.

use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use serde_json::{json, Value};

use super::{Tool, ToolContext};
use crate::canvas::{Canvas, CANVAS_HEIGHT, CANVAS_WIDTH};

/// Launch the paint application.
pub struct OpenCanvas;

#[async_trait]
impl Tool for OpenCanvas {
    fn name(&self) -> &str {
        "open_canvas"
    }

    fn description(&self) -> &str {
        "Launch the paint application and open a blank canvas. Must be called before any drawing tool."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _args: Value, ctx: &ToolContext) -> anyhow::Result<String> {
        let mut canvas = ctx.canvas.lock().await;

        if canvas.is_some() {
            return Ok(format!(
                "Canvas is already open ({}x{})",
                CANVAS_WIDTH, CANVAS_HEIGHT
            ));
        }

        let opened = Canvas::open(&ctx.config.paint_command).await?;
        tracing::info!(
            "Opened paint application '{}' (pid {:?})",
            ctx.config.paint_command,
            opened.process_id()
        );
        *canvas = Some(opened);

        Ok(format!("Opened a {}x{} canvas", CANVAS_WIDTH, CANVAS_HEIGHT))
    }
}

/// Draw a rectangle on the open canvas.
pub struct DrawRectangle;

#[async_trait]
impl Tool for DrawRectangle {
    fn name(&self) -> &str {
        "draw_rectangle"
    }

    fn description(&self) -> &str {
        "Draw a rectangle on the canvas from corner (x1, y1) to corner (x2, y2), in canvas coordinates."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "x1": { "type": "integer", "description": "Left edge" },
                "y1": { "type": "integer", "description": "Top edge" },
                "x2": { "type": "integer", "description": "Right edge" },
                "y2": { "type": "integer", "description": "Bottom edge" }
            },
            "required": ["x1", "y1", "x2", "y2"]
        })
    }

    async fn execute(&self, args: Value, ctx: &ToolContext) -> anyhow::Result<String> {
        let x1 = require_coord(&args, "x1")?;
        let y1 = require_coord(&args, "y1")?;
        let x2 = require_coord(&args, "x2")?;
        let y2 = require_coord(&args, "y2")?;

        let canvas = ctx.canvas.lock().await;
        let canvas = require_open(&canvas)?;
        canvas.draw_rectangle(x1, y1, x2, y2).await?;

        Ok(format!(
            "Drew rectangle from ({}, {}) to ({}, {})",
            x1, y1, x2, y2
        ))
    }
}

/// Add text to the open canvas.
pub struct AddText;

#[async_trait]
impl Tool for AddText {
    fn name(&self) -> &str {
        "add_text"
    }

    fn description(&self) -> &str {
        "Type text at position (x, y) on the canvas, in canvas coordinates."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "x": { "type": "integer", "description": "Text anchor x" },
                "y": { "type": "integer", "description": "Text anchor y" },
                "text": { "type": "string", "description": "The text to type" }
            },
            "required": ["x", "y", "text"]
        })
    }

    async fn execute(&self, args: Value, ctx: &ToolContext) -> anyhow::Result<String> {
        let x = require_coord(&args, "x")?;
        let y = require_coord(&args, "y")?;
        let text = args["text"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Missing 'text' argument"))?;

        let canvas = ctx.canvas.lock().await;
        let canvas = require_open(&canvas)?;
        canvas.add_text(x, y, text).await?;

        Ok(format!("Added text '{}' at ({}, {})", text, x, y))
    }
}

/// Save the canvas to an image file.
pub struct SaveImage;

#[async_trait]
impl Tool for SaveImage {
    fn name(&self) -> &str {
        "save_image"
    }

    fn description(&self) -> &str {
        "Save the canvas as an image file. Returns the absolute path of the saved file."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Target filename, e.g. ascii_result.png"
                }
            },
            "required": ["path"]
        })
    }

    async fn execute(&self, args: Value, ctx: &ToolContext) -> anyhow::Result<String> {
        let raw = args["path"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Missing 'path' argument"))?;

        // Relative paths land in the artifact directory.
        let path = ctx.config.artifact_dir.join(raw);
        ensure_writable(&path).await?;

        let canvas = ctx.canvas.lock().await;
        let canvas = require_open(&canvas)?;
        canvas.save_to(&path).await?;

        Ok(format!("Saved image to {}", path.display()))
    }
}

fn require_coord(args: &Value, name: &'static str) -> anyhow::Result<i32> {
    let value = args[name]
        .as_i64()
        .ok_or_else(|| anyhow::anyhow!("Missing '{}' argument", name))?;
    Ok(value as i32)
}

fn require_open(guard: &Option<Canvas>) -> anyhow::Result<&Canvas> {
    guard
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("No canvas is open; call open_canvas first"))
}

/// Probe that the target's directory accepts writes before the save dialog is
/// opened, so an unwritable path fails as a tool error instead of hanging the
/// dialog.
pub(crate) async fn ensure_writable(path: &Path) -> anyhow::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let probe = dir.join(".paint-agent-probe");
    tokio::fs::write(&probe, b"probe")
        .await
        .with_context(|| format!("save path '{}' is not writable", path.display()))?;
    let _ = tokio::fs::remove_file(&probe).await;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::tools::ToolContext;
    use std::path::PathBuf;

    fn test_context(artifact_dir: PathBuf) -> ToolContext {
        ToolContext::new(Config::new(
            "test-key".to_string(),
            "test-model".to_string(),
            artifact_dir,
        ))
    }

    #[tokio::test]
    async fn writable_directory_passes_probe() {
        let dir = tempfile::tempdir().expect("create temp dir");
        ensure_writable(&dir.path().join("out.png"))
            .await
            .expect("temp dir should be writable");
    }

    #[tokio::test]
    async fn missing_directory_fails_probe() {
        let err = ensure_writable(Path::new("/nonexistent-paint-agent/out.png"))
            .await
            .expect_err("missing directory should fail");
        assert!(err.to_string().contains("not writable"));
    }

    #[tokio::test]
    async fn drawing_without_canvas_fails() {
        let ctx = test_context(PathBuf::from("."));
        let err = DrawRectangle
            .execute(json!({"x1": 0, "y1": 0, "x2": 10, "y2": 10}), &ctx)
            .await
            .expect_err("no canvas is open");
        assert!(err.to_string().contains("open_canvas"));
    }

    #[tokio::test]
    async fn draw_rectangle_requires_all_corners() {
        let ctx = test_context(PathBuf::from("."));
        let err = DrawRectangle
            .execute(json!({"x1": 0, "y1": 0}), &ctx)
            .await
            .expect_err("missing corners");
        assert!(err.to_string().contains("Missing 'x2'"));
    }

    #[tokio::test]
    async fn save_image_requires_path() {
        let ctx = test_context(PathBuf::from("."));
        let err = SaveImage
            .execute(json!({}), &ctx)
            .await
            .expect_err("missing path");
        assert!(err.to_string().contains("Missing 'path'"));
    }
}
