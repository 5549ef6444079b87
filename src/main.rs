use std::fs::File;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use gradient_descent_live::config::{AppConfig, DisplayConfig};
use gradient_descent_live::data::{load_csv, Dataset};
use gradient_descent_live::error::TrainingError;
use gradient_descent_live::render::{Frame, PlotMode, Plotter};
use gradient_descent_live::training::handoff::{self, FrameReceiver};
use gradient_descent_live::training::trainer::{
    Trainer, TrainerConfig, TrainingSummary, UpdateRule,
};
use gradient_descent_live::ui::training_dashboard::DashboardState;
use gradient_descent_live::ui::training_view;

const WINDOW_TITLE: &str = "Gradient descent";

/// Fit house prices by gradient descent and watch the fit live.
#[derive(Parser)]
#[command(
    name = "gradient-descent",
    about = "Linear regression by gradient descent with a live plot"
)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// CSV file with square,type,price,wall_color records
    #[arg(long)]
    data: Option<PathBuf>,

    /// Override number of training epochs
    #[arg(long)]
    epochs: Option<usize>,

    /// What to plot each epoch
    #[arg(long, value_enum)]
    plot: Option<PlotMode>,

    /// Seed for weight initialisation
    #[arg(long)]
    seed: Option<u64>,

    /// Compute gradients but never apply them
    #[arg(long)]
    frozen: bool,

    /// Run without the terminal display (log to stderr)
    #[arg(long)]
    headless: bool,

    /// Log file used while the terminal display is active
    #[arg(long, default_value = "gradient_descent.log")]
    log_file: PathBuf,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.print_config {
        print!("{}", AppConfig::default_toml().context("serializing default config")?);
        return Ok(());
    }

    init_logging(cli.headless, &cli.log_file)?;

    // Load configuration
    let mut app_config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // Apply CLI overrides
    if let Some(path) = cli.data {
        app_config.data.path = path;
    }
    if let Some(epochs) = cli.epochs {
        app_config.training.epochs = epochs;
    }
    if let Some(plot) = cli.plot {
        app_config.display.plot = plot;
    }
    if cli.seed.is_some() {
        app_config.training.seed = cli.seed;
    }
    if cli.frozen {
        app_config.training.update_rule = UpdateRule::Frozen;
    }
    app_config.validate().context("validating configuration")?;

    let dataset = load_csv(&app_config.data.path)
        .with_context(|| format!("loading dataset from {}", app_config.data.path.display()))?;
    log::info!(
        "loaded {} houses from {}",
        dataset.len(),
        app_config.data.path.display()
    );

    let seed = app_config
        .training
        .seed
        .unwrap_or_else(|| rand::rng().random());
    log::info!("weight seed: {seed}");
    let rng = StdRng::seed_from_u64(seed);

    let display = app_config.display.clone();
    let plotter = Plotter::new(display.plot, display.width, display.height, &dataset);

    if cli.headless {
        let (frame_tx, _frame_rx) = handoff::slot();
        let mut rng = rng;
        let mut trainer = Trainer::new(app_config.training);
        let summary = trainer
            .train(&dataset, &plotter, &mut rng, &frame_tx)
            .context("training failed")?;
        print_summary(&summary);
        Ok(())
    } else {
        run_dashboard(dataset, plotter, app_config.training, rng, &display)
    }
}

/// Route `log` output to stderr when headless, or to `log_file` while the
/// terminal display owns the screen. `RUST_LOG` overrides the default level.
fn init_logging(headless: bool, log_file: &Path) -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if !headless {
        let file = File::create(log_file)
            .with_context(|| format!("creating log file {}", log_file.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.try_init().context("initializing logger")?;
    Ok(())
}

fn print_summary(summary: &TrainingSummary) {
    if let Some(loss) = summary.final_loss() {
        println!("final loss: {loss:.4}");
    }
    println!("{}", summary.weights);
}

fn run_dashboard(
    dataset: Dataset,
    plotter: Plotter,
    trainer_config: TrainerConfig,
    rng: StdRng,
    display: &DisplayConfig,
) -> Result<()> {
    let (frame_tx, frame_rx) = handoff::slot::<Frame>();
    let total_epochs = trainer_config.epochs;

    let training_handle = thread::spawn(move || {
        let mut rng = rng;
        let mut trainer = Trainer::new(trainer_config);
        trainer.train(&dataset, &plotter, &mut rng, &frame_tx)
    });

    run_dashboard_ui(frame_rx, training_handle, display, total_epochs)
}

fn run_dashboard_ui(
    frame_rx: FrameReceiver<Frame>,
    training_handle: JoinHandle<Result<TrainingSummary, TrainingError>>,
    display: &DisplayConfig,
    total_epochs: usize,
) -> Result<()> {
    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, SetTitle(WINDOW_TITLE))
        .context("entering alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("creating terminal")?;

    let mut dashboard = DashboardState::new(display.plot, total_epochs);
    let tick = Duration::from_millis(display.tick_ms);
    let mut training = Some(training_handle);

    let result = loop {
        dashboard.poll(&frame_rx);

        // A finished trainer is joined once; its error, if any, is fatal.
        if training.as_ref().is_some_and(|h| h.is_finished()) {
            if let Some(handle) = training.take() {
                match handle.join() {
                    Ok(Ok(summary)) => {
                        dashboard.poll(&frame_rx);
                        dashboard.mark_finished();
                        log::info!(
                            "final loss: {:.4}",
                            summary.final_loss().unwrap_or(f64::NAN)
                        );
                    }
                    Ok(Err(e)) => break Err(anyhow::Error::new(e).context("training failed")),
                    Err(_) => break Err(anyhow!("training thread panicked")),
                }
            }
        }

        if let Err(e) = terminal.draw(|f| training_view::render(f, &dashboard)) {
            break Err(anyhow::Error::new(e).context("drawing dashboard"));
        }

        if event::poll(tick).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                if key.kind == KeyEventKind::Press
                    && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
                {
                    break Ok(());
                }
            }
        }
    };

    // Terminal cleanup; errors are ignored so a failing draw is what gets reported
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    // The trainer is not joined on quit; process exit ends it.
    result
}
