use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset as ChartDataset, GraphType, Widget},
};

use super::{Frame, PlotMode};
use crate::data::{Dataset, HouseType, NUM_TYPES};
use crate::error::RenderError;
use crate::model::Parameters;
use crate::training::history::LossHistory;

/// Scatter/line colour per house type, in one-hot order.
const TYPE_COLORS: [Color; NUM_TYPES] = [
    Color::White,
    Color::Red,
    Color::Green,
    Color::Blue,
    Color::Magenta,
];

/// Fraction of the square range added on each side of the fitted lines.
const LINE_MARGIN: f64 = 0.1;

/// Largest axis magnitude handed to the chart. Ratatui scales coordinates by
/// the canvas resolution in integer space, which overflows near `f64::MAX`.
const MAX_AXIS_MAGNITUDE: f64 = f64::MAX / 1e6;

/// Draws training state into off-screen frames of a fixed size.
///
/// The scatter points are grouped once at construction; only the fitted
/// lines and the loss curve change between epochs.
pub struct Plotter {
    mode: PlotMode,
    width: u16,
    height: u16,
    groups: Vec<(HouseType, Vec<(f64, f64)>)>,
    line_xs: [f64; 2],
}

impl Plotter {
    pub fn new(mode: PlotMode, width: u16, height: u16, dataset: &Dataset) -> Self {
        let groups = dataset
            .present_types()
            .into_iter()
            .map(|t| {
                let points = dataset
                    .houses
                    .iter()
                    .filter(|h| h.house_type == t)
                    .map(|h| (h.square, h.price))
                    .collect();
                (t, points)
            })
            .collect();

        let (lo, hi) = dataset.square_range();
        let extra = (hi - lo) * LINE_MARGIN;

        Plotter {
            mode,
            width,
            height,
            groups,
            line_xs: [lo - extra, hi + extra],
        }
    }

    pub fn mode(&self) -> PlotMode {
        self.mode
    }

    /// Render the frame for one epoch in the configured mode.
    pub fn render(
        &self,
        epoch: usize,
        total_epochs: usize,
        history: &LossHistory,
        weights: &Parameters,
    ) -> Result<Frame, RenderError> {
        let buffer = match self.mode {
            PlotMode::Loss => self.loss_curve(history)?,
            PlotMode::Fit => self.fit_curve(weights)?,
        };
        Ok(Frame {
            epoch,
            total_epochs,
            mode: self.mode,
            buffer,
        })
    }

    fn canvas(&self) -> Result<(Rect, Buffer), RenderError> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::EmptyCanvas {
                width: self.width,
                height: self.height,
            });
        }
        let area = Rect::new(0, 0, self.width, self.height);
        Ok((area, Buffer::empty(area)))
    }

    /// Line of every recorded `(epoch, loss)` pair.
    pub fn loss_curve(&self, history: &LossHistory) -> Result<Buffer, RenderError> {
        let (area, mut buffer) = self.canvas()?;
        let points = history.points();

        let x_max = points.last().map_or(1.0, |p| p.0.max(1.0));
        let (y_min, y_max) = padded_bounds(points.iter().map(|p| p.1), 0.0)
            .map(|(lo, hi)| (lo.min(0.0), hi))
            .unwrap_or((0.0, 1.0));
        check_bounds("x", 0.0, x_max)?;
        check_bounds("y", y_min, y_max)?;

        let datasets = vec![ChartDataset::default()
            .name("loss")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Red))
            .data(&points)];

        Chart::new(datasets)
            .block(Block::default().borders(Borders::ALL).title("Loss"))
            .x_axis(
                Axis::default()
                    .title("Epoch")
                    .labels(axis_labels(0.0, x_max, 0))
                    .bounds([0.0, x_max]),
            )
            .y_axis(
                Axis::default()
                    .title("MSE")
                    .labels(axis_labels(y_min, y_max, 1))
                    .bounds([y_min, y_max]),
            )
            .render(area, &mut buffer);

        Ok(buffer)
    }

    /// Scatter of the samples coloured by type, overlaid with each present
    /// type's fitted line evaluated at the padded square range.
    pub fn fit_curve(&self, weights: &Parameters) -> Result<Buffer, RenderError> {
        let (area, mut buffer) = self.canvas()?;

        let lines: Vec<(HouseType, Vec<(f64, f64)>)> = self
            .groups
            .iter()
            .map(|(t, _)| {
                let line = self
                    .line_xs
                    .iter()
                    .map(|&x| (x, weights.intercept(*t) + weights.slope(*t) * x))
                    .collect();
                (*t, line)
            })
            .collect();

        let [x_min, x_max] = self.line_xs;
        check_bounds("x", x_min, x_max)?;
        let ys = self
            .groups
            .iter()
            .flat_map(|(_, pts)| pts.iter().map(|p| p.1))
            .chain(lines.iter().flat_map(|(_, l)| l.iter().map(|p| p.1)));
        let (y_min, y_max) = padded_bounds(ys, 0.05).unwrap_or((0.0, 1.0));
        check_bounds("y", y_min, y_max)?;

        let mut datasets = Vec::with_capacity(2 * self.groups.len());
        for (t, points) in &self.groups {
            datasets.push(
                ChartDataset::default()
                    .name(t.name())
                    .marker(symbols::Marker::Dot)
                    .graph_type(GraphType::Scatter)
                    .style(Style::default().fg(TYPE_COLORS[t.index()]))
                    .data(points),
            );
        }
        for (t, line) in &lines {
            datasets.push(
                ChartDataset::default()
                    .marker(symbols::Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(TYPE_COLORS[t.index()]))
                    .data(line),
            );
        }

        Chart::new(datasets)
            .block(Block::default().borders(Borders::ALL).title("Fit"))
            .x_axis(
                Axis::default()
                    .title("Square")
                    .labels(axis_labels(x_min, x_max, 1))
                    .bounds([x_min, x_max]),
            )
            .y_axis(
                Axis::default()
                    .title("Price")
                    .labels(axis_labels(y_min, y_max, 1))
                    .bounds([y_min, y_max]),
            )
            .render(area, &mut buffer);

        Ok(buffer)
    }
}

/// Min/max of `values` widened by `pad` of the span. A flat range is widened
/// to a unit interval so the axis never collapses.
fn padded_bounds(values: impl Iterator<Item = f64>, pad: f64) -> Option<(f64, f64)> {
    let mut bounds: Option<(f64, f64)> = None;
    for v in values {
        // f64::min/max would skip NaN; surface it through the bounds instead.
        if v.is_nan() {
            return Some((f64::NAN, f64::NAN));
        }
        bounds = Some(match bounds {
            None => (v, v),
            Some((lo, hi)) => (lo.min(v), hi.max(v)),
        });
    }
    let (lo, hi) = bounds?;
    if !lo.is_finite() || !hi.is_finite() {
        return Some((lo, hi));
    }
    if hi - lo <= f64::EPSILON * hi.abs().max(1.0) {
        return Some((lo - 0.5, hi + 0.5));
    }
    let extra = (hi - lo) * pad;
    Some((lo - extra, hi + extra))
}

fn check_bounds(axis: &'static str, min: f64, max: f64) -> Result<(), RenderError> {
    if !(min.is_finite() && max.is_finite()) {
        return Err(RenderError::NonFiniteBounds { axis, min, max });
    }
    if !(max - min).is_finite() || min.abs().max(max.abs()) > MAX_AXIS_MAGNITUDE {
        return Err(RenderError::OversizedBounds { axis, min, max });
    }
    Ok(())
}

fn axis_labels(min: f64, max: f64, precision: usize) -> Vec<Span<'static>> {
    let mid = (min + max) / 2.0;
    [min, mid, max]
        .into_iter()
        .map(|v| Span::raw(format!("{v:.precision$}")))
        .collect()
}
