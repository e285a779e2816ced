use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender};

use anyhow::{Result, anyhow};
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::config::{AppConfig, BackendTarget};
use crate::demo_backend::DemoBackend;
use crate::fetch_worker::MountTracker;
use crate::http_client::http_client;
use crate::nav::{NavClick, Route, Viewport, nav_layout};
use crate::query::{PostgrestClient, QueryClient};
use crate::state::{AppState, Delta, FetchCommand, apply_delta};

pub struct App {
    pub state: AppState,
    pub should_quit: bool,
    pub area: Rect,
    cmd_tx: Option<Sender<FetchCommand>>,
    latest_mount: MountTracker,
}

impl App {
    pub fn new(
        cmd_tx: Option<Sender<FetchCommand>>,
        latest_mount: MountTracker,
        config: &AppConfig,
    ) -> Self {
        let mut app = Self {
            state: AppState::new(),
            should_quit: false,
            area: Rect::new(0, 0, 120, 40),
            cmd_tx,
            latest_mount,
        };
        app.state.show_fetch_errors = config.show_fetch_errors;

        let start = match Route::from_path(&config.start_route) {
            Some(route) => route,
            None => {
                app.state.push_log(format!(
                    "[WARN] Unknown start route {}, showing {}",
                    config.start_route,
                    Route::Dashboard.path()
                ));
                Route::Dashboard
            }
        };
        let cmd = app.state.mount(start);
        app.dispatch(cmd);
        app
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::from_width(self.area.width)
    }

    pub fn navigate(&mut self, route: Route) {
        let cmd = self.state.navigate(route);
        self.dispatch(cmd);
    }

    pub fn reload(&mut self) {
        let cmd = self.state.reload();
        self.dispatch(cmd);
    }

    fn dispatch(&mut self, cmd: Option<FetchCommand>) {
        let Some(cmd) = cmd else {
            return;
        };
        self.latest_mount.mark(cmd.mount);
        let Some(tx) = &self.cmd_tx else {
            return;
        };
        if tx.send(cmd).is_err() {
            // Worker is gone; this mount's fetch has failed.
            apply_delta(
                &mut self.state,
                Delta::PageLoaded {
                    route: cmd.route,
                    mount: cmd.mount,
                    result: Err(anyhow!("fetch worker is not running")),
                },
            );
        }
    }

    pub fn drain(&mut self, rx: &Receiver<Delta>) {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut self.state, delta);
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char(ch @ '1'..='5') => {
                if let Some(route) = Route::from_shortcut(ch) {
                    self.navigate(route);
                }
            }
            KeyCode::Tab => self.navigate(self.state.current_route().next()),
            KeyCode::BackTab => self.navigate(self.state.current_route().prev()),
            KeyCode::Char('m') => self.state.nav.toggle_menu(),
            KeyCode::Char('r') => self.reload(),
            KeyCode::Char('j') | KeyCode::Down => self.state.scroll_down(),
            KeyCode::Char('k') | KeyCode::Up => self.state.scroll_up(),
            KeyCode::Char('L') => self.state.log_overlay = !self.state.log_overlay,
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Esc => {
                self.state.help_overlay = false;
                self.state.log_overlay = false;
                self.state.nav.close_menu();
            }
            _ => {}
        }
    }

    pub fn on_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let layout = nav_layout(self.area, self.viewport(), self.state.nav.is_menu_open());
        match layout.hit(mouse.column, mouse.row) {
            NavClick::Link(route) => self.navigate(route),
            NavClick::MenuButton => self.state.nav.toggle_menu(),
            NavClick::Outside => {}
        }
    }

    pub fn on_resize(&mut self, width: u16, height: u16) {
        self.area = Rect::new(0, 0, width, height);
    }
}

/// Picks the backend from config. Returns the client and a short label for the
/// footer.
pub fn connect_backend(config: &AppConfig) -> Result<(Arc<dyn QueryClient>, String)> {
    match config.backend_target()? {
        BackendTarget::Supabase { url, anon_key } => {
            let client = http_client(config.http_timeout)?;
            let label = host_label(&url);
            Ok((Arc::new(PostgrestClient::new(&url, &anon_key, client)), label))
        }
        BackendTarget::Demo => Ok((Arc::new(DemoBackend::seeded()), "demo data".to_string())),
    }
}

fn host_label(url: &str) -> String {
    let without_scheme = url.split_once("://").map(|(_, rest)| rest).unwrap_or(url);
    without_scheme
        .split('/')
        .next()
        .unwrap_or(without_scheme)
        .to_string()
}
