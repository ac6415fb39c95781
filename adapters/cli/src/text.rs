use std::io::Write;

use anyhow::{Context, Result};
use long_snake_rendering::{Palette, RenderingBackend, Scene};

/// Rendering backend that writes scenes as plain text frames.
#[derive(Debug)]
pub(crate) struct TextBackend<W> {
    writer: W,
    palette: Palette,
    frames_presented: u64,
}

impl<W: Write> TextBackend<W> {
    /// Creates a backend drawing with the classic palette.
    pub(crate) fn new(writer: W) -> Self {
        Self {
            writer,
            palette: Palette::CLASSIC,
            frames_presented: 0,
        }
    }

    /// Number of scenes written so far.
    #[must_use]
    pub(crate) const fn frames_presented(&self) -> u64 {
        self.frames_presented
    }
}

impl<W: Write> RenderingBackend for TextBackend<W> {
    fn present(&mut self, scene: &Scene) -> Result<()> {
        writeln!(
            self.writer,
            "score {} | best {} | length {} | heading {:?}",
            scene.score,
            scene.best_score,
            scene.body.len(),
            scene.direction
        )
        .context("failed to write frame header")?;
        for row in scene.text_rows(&self.palette) {
            writeln!(self.writer, "{row}").context("failed to write frame row")?;
        }
        writeln!(self.writer).context("failed to terminate frame")?;
        self.writer.flush().context("failed to flush frame")?;
        self.frames_presented += 1;
        Ok(())
    }
}
