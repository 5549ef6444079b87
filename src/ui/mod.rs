//! Terminal display: the dashboard state fed from the frame handoff, and the
//! view that lays out the latest frame with a status header.

pub mod training_dashboard;
pub mod training_view;
