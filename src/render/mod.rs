//! Off-screen rendering of training state into fixed-size frames.

pub mod chart;

use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};
use serde::{Deserialize, Serialize};

pub use chart::Plotter;

/// Which chart the trainer draws each epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PlotMode {
    /// Loss over all epochs so far.
    Loss,
    /// Samples by type with the current fitted lines.
    Fit,
}

impl PlotMode {
    pub fn name(self) -> &'static str {
        match self {
            PlotMode::Loss => "loss",
            PlotMode::Fit => "fit",
        }
    }
}

/// One fully rendered snapshot, tagged with the epoch that produced it.
#[derive(Debug, Clone)]
pub struct Frame {
    pub epoch: usize,
    pub total_epochs: usize,
    pub mode: PlotMode,
    pub buffer: Buffer,
}

impl Frame {
    /// True for the frame of the final epoch.
    pub fn is_last(&self) -> bool {
        self.epoch + 1 >= self.total_epochs
    }
}

/// Widget that blits a frame's cells into the target area, clipped to
/// whichever of the two is smaller.
pub struct FrameView<'a> {
    frame: &'a Frame,
}

impl<'a> FrameView<'a> {
    pub fn new(frame: &'a Frame) -> Self {
        FrameView { frame }
    }
}

impl Widget for FrameView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let src = &self.frame.buffer;
        let width = area.width.min(src.area.width);
        let height = area.height.min(src.area.height);
        for y in 0..height {
            for x in 0..width {
                let Some(cell) = src.cell((src.area.x + x, src.area.y + y)) else {
                    continue;
                };
                if let Some(dst) = buf.cell_mut((area.x + x, area.y + y)) {
                    *dst = cell.clone();
                }
            }
        }
    }
}
