use std::io::stdout;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, KeyEventKind, MouseButton, MouseEventKind,
};
use crossterm::execute;

use taskview::action::{Action, Direction};
use taskview::app::App;
use taskview::batch::{self, BatchOptions};
use taskview::config::{Config, load_config, load_config_from_path};
use taskview::event::{Event, EventHandler};
use taskview::logging;
use taskview::system::collector::Collector;
use taskview::ui;

const MIN_REFRESH_MS: u64 = 100;

#[derive(Parser)]
#[command(name = "taskview", about = "Terminal task manager")]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Refresh rate in milliseconds
    #[arg(long)]
    refresh_rate: Option<u64>,

    /// Sort order: tracked, name, cpu, memory, pid
    #[arg(long)]
    sort: Option<String>,

    /// Color theme: dark, light
    #[arg(long)]
    theme: Option<String>,

    /// Write JSON-lines logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log filter (e.g. info, debug, taskview=trace)
    #[arg(long)]
    log_level: Option<String>,

    /// Print this many ticks to stdout and exit instead of starting the UI
    #[arg(long, value_name = "N")]
    batch: Option<usize>,

    /// Emit batch rows as JSON lines
    #[arg(long, default_value_t = false, requires = "batch")]
    json: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = load_config_for_cli(&cli);

    if let Some(path) = &config.logging.file {
        logging::init_file_logging(path, &config.logging.level)?;
    }
    tracing::info!(
        refresh_rate_ms = config.general.refresh_rate_ms,
        sort = %config.general.default_sort,
        "starting taskview"
    );

    if let Some(ticks) = cli.batch {
        if ticks == 0 {
            return Err(eyre!("--batch must be greater than 0"));
        }
        let options = BatchOptions {
            ticks,
            interval: refresh_interval(&config),
            json: cli.json,
        };
        let mut collector = Collector::new();
        return batch::run(&mut collector, config, options, &mut stdout().lock()).await;
    }

    let mut terminal = ratatui::init();
    execute!(stdout(), EnableMouseCapture)?;

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = execute!(std::io::stdout(), DisableMouseCapture);
        ratatui::restore();
        original_hook(panic_info);
    }));

    let result = run(&mut terminal, config).await;

    execute!(stdout(), DisableMouseCapture)?;
    ratatui::restore();

    result
}

async fn run(terminal: &mut ratatui::DefaultTerminal, config: Config) -> Result<()> {
    let interval = refresh_interval(&config);
    let mut app = App::new(config);
    let mut events = EventHandler::new(Collector::new, interval);

    terminal.draw(|frame| ui::draw(frame, &mut app))?;

    while app.running {
        let Some(event) = events.next().await else {
            break;
        };
        let mut should_draw = true;
        match event {
            Event::Key(key) => {
                if key.kind == KeyEventKind::Press {
                    let action = app.map_key(key);
                    app.dispatch(action);
                } else {
                    should_draw = false;
                }
            }
            Event::Mouse(mouse) => {
                let action = match mouse.kind {
                    MouseEventKind::Down(MouseButton::Left) => {
                        Action::SelectAt(mouse.column, mouse.row)
                    }
                    MouseEventKind::ScrollUp => Action::Navigate(Direction::Up),
                    MouseEventKind::ScrollDown => Action::Navigate(Direction::Down),
                    _ => Action::None,
                };
                should_draw = action != Action::None;
                app.dispatch(action);
            }
            Event::Resize => {}
            Event::Snapshot(result) => app.apply_snapshot(*result),
        }

        if app.take_refresh_request() {
            events.request_refresh();
        }
        if should_draw {
            terminal.draw(|frame| ui::draw(frame, &mut app))?;
        }
    }

    tracing::info!("exiting");
    Ok(())
}

fn refresh_interval(config: &Config) -> Duration {
    Duration::from_millis(config.general.refresh_rate_ms.max(MIN_REFRESH_MS))
}

fn load_config_for_cli(cli: &Cli) -> Config {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(rate) = cli.refresh_rate {
        config.general.refresh_rate_ms = rate;
    }
    if let Some(ref sort) = cli.sort {
        config.general.default_sort = sort.clone();
    }
    if let Some(ref theme) = cli.theme {
        config.colors.theme = theme.clone();
    }
    if let Some(ref path) = cli.log_file {
        config.logging.file = Some(path.clone());
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }

    config
}
