//! Training infrastructure: the gradient-descent trainer, its loss history,
//! and the single-slot frame handoff to the display.

pub mod handoff;
pub mod history;
pub mod trainer;
