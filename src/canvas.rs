//! The open paint surface, driven through synthesized mouse and keyboard input.
//!
//! The paint application itself is an external collaborator: we launch it as a
//! child process and operate it the way a user would, by clicking the toolbar
//! and dragging on the canvas area. All screen positions assume the window has
//! been maximized right after launch.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use enigo::{Button, Coordinate, Direction, Enigo, Key, Keyboard, Mouse, Settings};
use tokio::process::{Child, Command};

/// Drawable canvas area, in canvas coordinates.
pub const CANVAS_WIDTH: i32 = 1152;
pub const CANVAS_HEIGHT: i32 = 648;

/// Screen position of the canvas origin once the window is maximized.
const CANVAS_ORIGIN: (i32, i32) = (384, 216);

/// Toolbar buttons (screen coordinates, maximized window).
const RECT_TOOL: (i32, i32) = (445, 113);
const TEXT_TOOL: (i32, i32) = (290, 113);

/// How long to wait for the application window to appear.
const LAUNCH_DELAY: Duration = Duration::from_secs(2);

/// How long to wait for the UI to react between synthesized events.
const UI_DELAY: Duration = Duration::from_millis(500);

/// How long to wait for the save dialog to open.
const DIALOG_DELAY: Duration = Duration::from_secs(1);

/// An open paint application window.
pub struct Canvas {
    child: Child,
}

impl Canvas {
    /// Launch the paint application and maximize its window.
    ///
    /// Fails if the executable cannot be spawned.
    pub async fn open(command: &str) -> anyhow::Result<Self> {
        let child = Command::new(command)
            .spawn()
            .with_context(|| format!("failed to launch paint application '{}'", command))?;

        tokio::time::sleep(LAUNCH_DELAY).await;

        // Maximize so the toolbar and canvas land at known positions.
        with_input(|enigo| {
            enigo.key(Key::Meta, Direction::Press)?;
            enigo.key(Key::UpArrow, Direction::Click)?;
            enigo.key(Key::Meta, Direction::Release)
        })
        .await?;
        tokio::time::sleep(UI_DELAY).await;

        Ok(Self { child })
    }

    /// OS process id of the paint application, if still running.
    pub fn process_id(&self) -> Option<u32> {
        self.child.id()
    }

    /// Draw a rectangle between two canvas-coordinate corners.
    ///
    /// Fails without touching the desktop if the rectangle is empty or falls
    /// outside the canvas area.
    pub async fn draw_rectangle(&self, x1: i32, y1: i32, x2: i32, y2: i32) -> anyhow::Result<()> {
        validate_rectangle(x1, y1, x2, y2)?;

        let (sx1, sy1) = to_screen(x1, y1);
        let (sx2, sy2) = to_screen(x2, y2);

        with_input(move |enigo| {
            click(enigo, RECT_TOOL.0, RECT_TOOL.1)?;
            pause();
            enigo.move_mouse(sx1, sy1, Coordinate::Abs)?;
            enigo.button(Button::Left, Direction::Press)?;
            pause();
            enigo.move_mouse(sx2, sy2, Coordinate::Abs)?;
            pause();
            enigo.button(Button::Left, Direction::Release)
        })
        .await
    }

    /// Type `text` at the given canvas coordinates.
    pub async fn add_text(&self, x: i32, y: i32, text: &str) -> anyhow::Result<()> {
        let (sx, sy) = to_screen(x, y);
        let text = text.to_string();

        with_input(move |enigo| {
            click(enigo, TEXT_TOOL.0, TEXT_TOOL.1)?;
            pause();
            click(enigo, sx, sy)?;
            pause();
            enigo.text(&text)?;
            pause();
            // Click the canvas corner to commit the text box.
            click(
                enigo,
                CANVAS_ORIGIN.0 + CANVAS_WIDTH - 10,
                CANVAS_ORIGIN.1 + CANVAS_HEIGHT - 10,
            )
        })
        .await
    }

    /// Save the current drawing to `path` through the save dialog.
    pub async fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        let typed = path.to_string_lossy().into_owned();

        with_input(move |enigo| {
            enigo.key(Key::Control, Direction::Press)?;
            enigo.key(Key::Unicode('s'), Direction::Click)?;
            enigo.key(Key::Control, Direction::Release)?;
            std::thread::sleep(DIALOG_DELAY);
            enigo.text(&typed)?;
            pause();
            enigo.key(Key::Return, Direction::Click)
        })
        .await?;
        tokio::time::sleep(UI_DELAY).await;

        Ok(())
    }
}

/// Check that a rectangle is non-empty and inside the canvas area.
pub fn validate_rectangle(x1: i32, y1: i32, x2: i32, y2: i32) -> anyhow::Result<()> {
    if x1 >= x2 || y1 >= y2 {
        anyhow::bail!(
            "rectangle corners must satisfy x1 < x2 and y1 < y2, got ({}, {}) and ({}, {})",
            x1,
            y1,
            x2,
            y2
        );
    }
    if x1 < 0 || y1 < 0 || x2 > CANVAS_WIDTH || y2 > CANVAS_HEIGHT {
        anyhow::bail!(
            "rectangle ({}, {})-({}, {}) is outside the {}x{} canvas",
            x1,
            y1,
            x2,
            y2,
            CANVAS_WIDTH,
            CANVAS_HEIGHT
        );
    }
    Ok(())
}

/// Translate canvas coordinates to screen coordinates.
fn to_screen(x: i32, y: i32) -> (i32, i32) {
    (CANVAS_ORIGIN.0 + x, CANVAS_ORIGIN.1 + y)
}

fn click(enigo: &mut Enigo, x: i32, y: i32) -> Result<(), enigo::InputError> {
    enigo.move_mouse(x, y, Coordinate::Abs)?;
    enigo.button(Button::Left, Direction::Click)
}

fn pause() {
    std::thread::sleep(UI_DELAY);
}

/// Run an input-synthesis closure on the blocking pool.
///
/// The input connection is not `Send`, so it is created inside the closure and
/// never held across an await point.
async fn with_input<F>(f: F) -> anyhow::Result<()>
where
    F: FnOnce(&mut Enigo) -> Result<(), enigo::InputError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || -> anyhow::Result<()> {
        let mut enigo =
            Enigo::new(&Settings::default()).context("failed to open input connection")?;
        f(&mut enigo)?;
        Ok(())
    })
    .await
    .context("input task panicked")?
}
