use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::data::Dataset;
use crate::error::TrainingError;
use crate::model::linear::SLOPE_START;
use crate::model::{gradients, mean_squared_loss, parameter_gradients, predict, Parameters};
use crate::render::{Frame, Plotter};
use crate::training::handoff::FrameSender;
use crate::training::history::LossHistory;

/// How the trainer applies gradients to the weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateRule {
    /// `w[i] -= lr · grad[i]`, with the intercept or slope learning rate.
    Descent,
    /// Gradients are computed and reported but never applied.
    Frozen,
}

/// Trainer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    pub epochs: usize,
    pub report_interval: usize,
    /// Learning rate for the slope group (indices 6..=11).
    pub lr_slope: f64,
    /// Learning rate for the intercept group (indices 0..=5).
    pub lr_intercept: f64,
    /// Initial weights are drawn from `[-init_range, init_range]`.
    pub init_range: f64,
    /// Seed for weight initialisation; drawn from the OS when absent.
    pub seed: Option<u64>,
    pub update_rule: UpdateRule,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        TrainerConfig {
            epochs: 2000,
            report_interval: 100,
            lr_slope: 0.5e-3,
            lr_intercept: 0.7,
            init_range: 1.0,
            seed: None,
            update_rule: UpdateRule::Descent,
        }
    }
}

/// Lifecycle of a training run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainerState {
    Initializing,
    Stepping { epoch: usize },
    Finished,
}

/// Quantities computed during one epoch, reported periodically. `weights`
/// are the ones `loss` and the gradients were computed from.
#[derive(Debug, Clone, Copy)]
pub struct StepReport {
    pub epoch: usize,
    pub loss: f64,
    pub d_slope: f64,
    pub d_intercept: f64,
    pub weights: Parameters,
}

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct TrainingSummary {
    pub initial_weights: Parameters,
    pub weights: Parameters,
    pub history: LossHistory,
}

impl TrainingSummary {
    pub fn final_loss(&self) -> Option<f64> {
        self.history.last().map(|r| r.loss)
    }
}

/// Batch gradient-descent trainer for the housing model.
pub struct Trainer {
    config: TrainerConfig,
    state: TrainerState,
}

impl Trainer {
    pub fn new(config: TrainerConfig) -> Self {
        Trainer {
            config,
            state: TrainerState::Initializing,
        }
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    pub fn state(&self) -> TrainerState {
        self.state
    }

    /// Run the full loop: initialise the weights from `rng`, then for every
    /// epoch predict, record the loss, render and hand off a frame, and apply
    /// the gradient step.
    ///
    /// Frames are sent without waiting for the display; the last one stays in
    /// the slot after the loop ends. A render failure aborts the run.
    pub fn train<R: Rng>(
        &mut self,
        dataset: &Dataset,
        plotter: &Plotter,
        rng: &mut R,
        frames: &FrameSender<Frame>,
    ) -> Result<TrainingSummary, TrainingError> {
        self.state = TrainerState::Initializing;
        let initial_weights = Parameters::random(rng, self.config.init_range);
        let mut weights = initial_weights;
        let mut history = LossHistory::with_capacity(self.config.epochs);
        let total = self.config.epochs;

        log::info!(
            "starting {} epochs ({} plot, {:?} update) on {} samples",
            total,
            plotter.mode().name(),
            self.config.update_rule,
            dataset.len()
        );

        for epoch in 0..total {
            self.state = TrainerState::Stepping { epoch };

            let predictions = predict(&dataset.squares, &weights, &dataset.types)?;
            let loss = mean_squared_loss(&dataset.prices, &predictions)?;
            history.push(epoch, loss);

            let frame = plotter
                .render(epoch, total, &history, &weights)
                .map_err(|source| TrainingError::Render { epoch, source })?;
            frames.send(frame);

            let step = self.descend(epoch, loss, dataset, &predictions, &mut weights)?;

            if self.config.report_interval > 0 && epoch % self.config.report_interval == 0 {
                report(&step);
            }
        }

        self.state = TrainerState::Finished;
        log::info!("training finished, weights: {}", weights);

        Ok(TrainingSummary {
            initial_weights,
            weights,
            history,
        })
    }

    /// Compute the gradients at `weights` and, under `UpdateRule::Descent`,
    /// step them. The report carries the weights from before the step.
    fn descend(
        &self,
        epoch: usize,
        loss: f64,
        dataset: &Dataset,
        predictions: &[f64],
        weights: &mut Parameters,
    ) -> Result<StepReport, TrainingError> {
        let before = *weights;
        let (d_slope, d_intercept) = gradients(&dataset.squares, &dataset.prices, predictions)?;
        if self.config.update_rule == UpdateRule::Descent {
            let grad = parameter_gradients(
                &dataset.squares,
                &dataset.types,
                &dataset.prices,
                predictions,
            )?;
            self.apply_update(weights, &grad);
        }
        Ok(StepReport {
            epoch,
            loss,
            d_slope,
            d_intercept,
            weights: before,
        })
    }

    /// One descent step, intercept and slope groups at their own rates.
    fn apply_update(&self, weights: &mut Parameters, grad: &[f64]) {
        for (i, g) in grad.iter().enumerate() {
            let lr = if i < SLOPE_START {
                self.config.lr_intercept
            } else {
                self.config.lr_slope
            };
            weights[i] -= lr * g;
        }
    }
}

fn report(step: &StepReport) {
    log::info!(
        "epoch #{} | loss: {:.4} | d_slope: {:.4} | d_intercept: {:.4} | w: {}",
        step.epoch,
        step.loss,
        step.d_slope,
        step.d_intercept,
        step.weights
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{House, HouseType, WallColor};
    use crate::render::PlotMode;
    use crate::training::handoff::slot;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Three Duplex houses on the line price = 1 + 2·square.
    fn line_dataset() -> Dataset {
        let houses = [1.0, 2.0, 3.0]
            .into_iter()
            .map(|square| House {
                square,
                house_type: HouseType::Duplex,
                price: 1.0 + 2.0 * square,
                wall_color: WallColor::White,
            })
            .collect();
        Dataset::from_houses(houses).unwrap()
    }

    fn config(epochs: usize) -> TrainerConfig {
        TrainerConfig {
            epochs,
            report_interval: 100,
            lr_slope: 0.05,
            lr_intercept: 0.05,
            init_range: 1.0,
            seed: Some(42),
            update_rule: UpdateRule::Descent,
        }
    }

    fn run(config: TrainerConfig, mode: PlotMode) -> (Trainer, TrainingSummary, Option<Frame>) {
        let dataset = line_dataset();
        let plotter = Plotter::new(mode, 40, 12, &dataset);
        let (tx, rx) = slot();
        let mut rng = StdRng::seed_from_u64(config.seed.unwrap_or(0));
        let mut trainer = Trainer::new(config);
        let summary = trainer.train(&dataset, &plotter, &mut rng, &tx).unwrap();
        (trainer, summary, rx.try_recv())
    }

    #[test]
    fn test_recovers_known_slope_and_intercept() {
        let (trainer, summary, _) = run(config(2000), PlotMode::Fit);
        assert_eq!(trainer.state(), TrainerState::Finished);

        let intercept = summary.weights.intercept(HouseType::Duplex);
        let slope = summary.weights.slope(HouseType::Duplex);
        assert!((intercept - 1.0).abs() < 0.01, "intercept {intercept}");
        assert!((slope - 2.0).abs() < 0.02, "slope {slope}");
        assert!(summary.final_loss().unwrap() < 1e-6);
    }

    #[test]
    fn test_history_has_one_record_per_epoch() {
        let (_, summary, _) = run(config(750), PlotMode::Loss);
        assert_eq!(summary.history.len(), 750);
        assert_eq!(summary.history.records()[0].epoch, 0);
        assert_eq!(summary.history.last().unwrap().epoch, 749);
    }

    #[test]
    fn test_loss_tail_is_non_increasing() {
        let (_, summary, _) = run(config(2000), PlotMode::Loss);
        let means = summary.history.window_means(100);
        for pair in means.windows(2) {
            assert!(pair[1] <= pair[0] + 1e-12, "{} -> {}", pair[0], pair[1]);
        }
        let first = summary.history.records()[0].loss;
        assert!(summary.final_loss().unwrap() < first);
    }

    #[test]
    fn test_last_frame_stays_in_slot() {
        let (_, _, frame) = run(config(25), PlotMode::Fit);
        let frame = frame.expect("final frame should be buffered");
        assert_eq!(frame.epoch, 24);
        assert_eq!(frame.total_epochs, 25);
        assert!(frame.is_last());
        assert_eq!(frame.mode, PlotMode::Fit);
    }

    #[test]
    fn test_frozen_rule_leaves_weights_untouched() {
        let mut cfg = config(200);
        cfg.update_rule = UpdateRule::Frozen;
        let (_, summary, _) = run(cfg, PlotMode::Fit);
        assert_eq!(summary.weights, summary.initial_weights);

        let losses: Vec<f64> = summary.history.records().iter().map(|r| r.loss).collect();
        assert!(losses.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_same_seed_same_run() {
        let (_, a, _) = run(config(50), PlotMode::Loss);
        let (_, b, _) = run(config(50), PlotMode::Loss);
        assert_eq!(a.initial_weights, b.initial_weights);
        assert_eq!(a.weights, b.weights);
    }

    #[test]
    fn test_divergence_is_a_render_error() {
        let dataset = line_dataset();
        let plotter = Plotter::new(PlotMode::Loss, 40, 12, &dataset);
        let (tx, _rx) = slot();
        let mut cfg = config(2000);
        cfg.lr_slope = 10.0;
        cfg.lr_intercept = 10.0;
        let mut trainer = Trainer::new(cfg);
        let err = trainer
            .train(&dataset, &plotter, &mut StdRng::seed_from_u64(1), &tx)
            .unwrap_err();
        assert!(matches!(err, TrainingError::Render { .. }));
        assert!(matches!(trainer.state(), TrainerState::Stepping { .. }));
    }

    #[test]
    fn test_default_rates_are_stable_on_bundled_data() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data/house_prices.csv");
        let dataset = crate::data::load_csv(&path).unwrap();
        let plotter = Plotter::new(PlotMode::Loss, 80, 24, &dataset);
        let (tx, _rx) = slot();
        let mut trainer = Trainer::new(TrainerConfig::default());
        let summary = trainer
            .train(&dataset, &plotter, &mut StdRng::seed_from_u64(3), &tx)
            .unwrap();

        assert_eq!(summary.history.len(), 2000);
        let first = summary.history.records()[0].loss;
        let last = summary.final_loss().unwrap();
        assert!(last.is_finite());
        assert!(last < first);
    }

    #[test]
    fn test_slow_divergence_is_a_render_error() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data/house_prices.csv");
        let dataset = crate::data::load_csv(&path).unwrap();
        let (tx, _rx) = slot();
        for mode in [PlotMode::Loss, PlotMode::Fit] {
            let plotter = Plotter::new(mode, 80, 24, &dataset);
            let mut trainer = Trainer::new(TrainerConfig {
                lr_intercept: 1.0,
                ..TrainerConfig::default()
            });
            let err = trainer
                .train(&dataset, &plotter, &mut StdRng::seed_from_u64(3), &tx)
                .unwrap_err();
            assert!(matches!(err, TrainingError::Render { .. }), "{err}");
        }
    }

    #[test]
    fn test_step_report_uses_weights_before_update() {
        let dataset = line_dataset();
        let trainer = Trainer::new(config(1));
        let start = Parameters::random(&mut StdRng::seed_from_u64(9), 1.0);
        let mut weights = start;
        let predictions = predict(&dataset.squares, &weights, &dataset.types).unwrap();
        let loss = mean_squared_loss(&dataset.prices, &predictions).unwrap();

        let step = trainer
            .descend(0, loss, &dataset, &predictions, &mut weights)
            .unwrap();

        assert_eq!(step.weights, start);
        assert_ne!(weights, start);
        let (d_slope, d_intercept) =
            gradients(&dataset.squares, &dataset.prices, &predictions).unwrap();
        assert_eq!((step.d_slope, step.d_intercept), (d_slope, d_intercept));
    }

    #[test]
    fn test_update_uses_group_learning_rates() {
        let mut cfg = config(1);
        cfg.lr_intercept = 0.5;
        cfg.lr_slope = 0.25;
        let trainer = Trainer::new(cfg);
        let mut w = Parameters::zeros();
        trainer.apply_update(&mut w, &[1.0; 12]);
        assert!(w.as_slice()[..SLOPE_START].iter().all(|&v| v == -0.5));
        assert!(w.as_slice()[SLOPE_START..].iter().all(|&v| v == -0.25));
    }
}
