use crossterm::{
    event::{self, Event as CEvent, KeyEvent, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use std::error::Error;
use std::io;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{error, info};
use tui::{backend::CrosstermBackend, Terminal};

use salary_dashboard::config::Config;
use salary_dashboard::dataset::Dataset;
use salary_dashboard::logging::init_logging;
use salary_dashboard::session::{SelectionControl, Session};
use salary_dashboard::ui::{self, App};

enum Event<I> {
    Input(I),
    Tick,
}

fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    init_logging(&config.log_file)?;

    let source = config.data_source();
    let dataset = match Dataset::load(&source, config.request_timeout()) {
        Ok(dataset) => dataset,
        Err(err) => {
            error!(source = %source, error = %err, "dataset load failed");
            eprintln!("Could not load salary data from {}: {}", source, err);
            return Err(err.into());
        }
    };

    let mut app = App::new(Session::new(dataset), config.export_dir.clone());

    enable_raw_mode()?;
    let result = run(&mut app, config.tick_rate());
    disable_raw_mode()?;
    result
}

fn run(app: &mut App, tick_rate: Duration) -> Result<(), Box<dyn Error>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut last_tick = Instant::now();
        loop {
            let timeout = tick_rate
                .checked_sub(last_tick.elapsed())
                .unwrap_or_else(|| Duration::from_secs(0));

            match event::poll(timeout) {
                Ok(true) => {
                    if let Ok(CEvent::Key(key)) = event::read() {
                        if tx.send(Event::Input(key)).is_err() {
                            break;
                        }
                    }
                }
                Ok(false) => {}
                Err(_) => break,
            }

            if last_tick.elapsed() >= tick_rate {
                if let Ok(_) = tx.send(Event::Tick) {
                    last_tick = Instant::now();
                } else {
                    break;
                }
            }
        }
    });

    let stdout = io::stdout();
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;
    info!(rows = app.session.dataset().len(), "dashboard started");

    loop {
        terminal.draw(|rect| ui::draw(rect, app))?;

        match rx.recv()? {
            Event::Input(KeyEvent { code, kind, .. }) => {
                if kind == KeyEventKind::Release {
                    continue;
                }
                if !app.on_key(code) {
                    break;
                }
            }
            Event::Tick => {}
        }
    }

    terminal.clear()?;
    terminal.show_cursor()?;
    info!("dashboard closed");
    Ok(())
}
