use crate::render::{Frame, PlotMode};
use crate::training::handoff::FrameReceiver;

/// Status of the training run as seen from the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingStatus {
    Waiting,
    Running,
    Finished,
}

/// What the display shows: the most recent frame plus a few counters.
pub struct DashboardState {
    pub frame: Option<Frame>,
    pub mode: PlotMode,
    pub total_epochs: usize,
    pub status: TrainingStatus,
    pub frames_shown: usize,
    pub frames_skipped: usize,
}

impl DashboardState {
    pub fn new(mode: PlotMode, total_epochs: usize) -> Self {
        DashboardState {
            frame: None,
            mode,
            total_epochs,
            status: TrainingStatus::Waiting,
            frames_shown: 0,
            frames_skipped: 0,
        }
    }

    /// Take a new frame from the handoff if one arrived since the last tick;
    /// otherwise keep showing the previous one. Returns whether it changed.
    pub fn poll(&mut self, frames: &FrameReceiver<Frame>) -> bool {
        self.frames_skipped = frames.overwritten();
        match frames.try_recv() {
            Some(frame) => {
                self.apply_frame(frame);
                true
            }
            None => false,
        }
    }

    pub fn apply_frame(&mut self, frame: Frame) {
        self.status = if frame.is_last() {
            TrainingStatus::Finished
        } else {
            TrainingStatus::Running
        };
        self.total_epochs = frame.total_epochs;
        self.frames_shown += 1;
        self.frame = Some(frame);
    }

    /// The trainer has exited cleanly; whatever frame is held is final.
    pub fn mark_finished(&mut self) {
        self.status = TrainingStatus::Finished;
    }

    /// Epoch of the frame on screen, if any.
    pub fn epoch(&self) -> Option<usize> {
        self.frame.as_ref().map(|f| f.epoch)
    }

    /// Progress ratio [0.0, 1.0].
    pub fn progress(&self) -> f64 {
        match self.epoch() {
            Some(_) if self.status == TrainingStatus::Finished => 1.0,
            Some(epoch) if self.total_epochs > 0 => (epoch + 1) as f64 / self.total_epochs as f64,
            _ => 0.0,
        }
    }
}
