use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::*;

use wc22_dashboard::app::{App, connect_backend};
use wc22_dashboard::config::{AppConfig, load_dotenv};
use wc22_dashboard::fetch_worker::{MountTracker, spawn_fetch_worker};
use wc22_dashboard::state::Delta;
use wc22_dashboard::ui;

fn main() -> Result<()> {
    load_dotenv();
    let config = AppConfig::from_env();
    let (client, backend_label) = connect_backend(&config).context("connect backend")?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let latest = MountTracker::default();
    spawn_fetch_worker(client, tx, cmd_rx, latest.clone());

    let mut app = App::new(Some(cmd_tx), latest, &config);
    app.state.push_log(format!("[INFO] Using {backend_label}"));
    app.state.backend_label = backend_label;

    let res = terminal
        .size()
        .map_err(anyhow::Error::from)
        .and_then(|size| {
            app.on_resize(size.width, size.height);
            run_app(&mut terminal, &mut app, rx, config.tick_rate)
        });

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err:#}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
    tick_rate: Duration,
) -> Result<()> {
    let mut last_tick = Instant::now();

    loop {
        app.drain(&rx);

        terminal.draw(|f| ui::draw(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.on_key(key),
                Event::Mouse(mouse) => app.on_mouse(mouse),
                Event::Resize(width, height) => app.on_resize(width, height),
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }
        if app.should_quit {
            return Ok(());
        }
    }
}
