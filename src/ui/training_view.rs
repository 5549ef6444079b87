use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use super::training_dashboard::{DashboardState, TrainingStatus};
use crate::render::FrameView;

/// Render the header, the latest training frame, and the footer.
pub fn render(frame: &mut Frame, dashboard: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(8),    // Plot
            Constraint::Length(3), // Progress
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    render_header(frame, dashboard, chunks[0]);
    render_plot(frame, dashboard, chunks[1]);
    render_progress_gauge(frame, dashboard, chunks[2]);
    render_footer(frame, chunks[3]);
}

fn render_header(frame: &mut Frame, dashboard: &DashboardState, area: Rect) {
    let (status_str, status_color) = match dashboard.status {
        TrainingStatus::Waiting => ("WAITING", Color::DarkGray),
        TrainingStatus::Running => ("RUNNING", Color::Green),
        TrainingStatus::Finished => ("FINISHED", Color::Cyan),
    };
    let epoch = dashboard
        .epoch()
        .map_or_else(|| "-".to_string(), |e| e.to_string());

    let header_text = Line::from(vec![
        Span::styled(
            "Gradient descent",
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("  |  plot: {}", dashboard.mode.name())),
        Span::raw(format!("  |  Epoch: {}/{}", epoch, dashboard.total_epochs)),
        Span::raw(format!("  |  skipped frames: {}", dashboard.frames_skipped)),
        Span::raw("  |  ["),
        Span::styled(
            status_str,
            Style::default().fg(status_color).add_modifier(Modifier::BOLD),
        ),
        Span::raw("]"),
    ]);

    let header = Paragraph::new(header_text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(header, area);
}

fn render_plot(frame: &mut Frame, dashboard: &DashboardState, area: Rect) {
    match dashboard.frame {
        Some(ref latest) => frame.render_widget(FrameView::new(latest), area),
        None => {
            let placeholder = Paragraph::new("Waiting for first epoch...")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(placeholder, area);
        }
    }
}

fn render_progress_gauge(frame: &mut Frame, dashboard: &DashboardState, area: Rect) {
    let progress = dashboard.progress();
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Progress"))
        .gauge_style(Style::default().fg(Color::Blue))
        .ratio(progress.clamp(0.0, 1.0))
        .label(format!("{:.1}%", progress * 100.0));

    frame.render_widget(gauge, area);
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let footer = Paragraph::new("Q / Esc: Quit")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Controls"));

    frame.render_widget(footer, area);
}
