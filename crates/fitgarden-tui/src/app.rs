//! Application core — event loop, screen management, action dispatch.
//!
//! Backend work never blocks the event loop: request actions are
//! intercepted here and spawned onto tokio tasks that report back through
//! the same action channel. Every request is a single user-initiated
//! call; there is no background polling.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use tokio::sync::mpsc;
use tracing::info;

use fitgarden_core::AgendaService;
use fitgarden_core::submit::submit_draft;

use crate::action::{Action, Notification, NotificationLevel};
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::theme;
use crate::tui::Tui;

/// How many ticks (4 Hz) a toast stays visible.
const NOTIFICATION_TICKS: u8 = 20;

/// Top-level application state and event loop.
pub struct App {
    service: Arc<AgendaService>,
    /// Current active screen.
    active_screen: ScreenId,
    /// All screen components, keyed by ScreenId.
    screens: HashMap<ScreenId, Box<dyn Component>>,
    /// Whether the app should keep running.
    running: bool,
    /// Help overlay visibility.
    help_visible: bool,
    /// Current toast and its remaining ticks.
    notification: Option<(Notification, u8)>,
    /// Action sender — components can dispatch actions through this.
    action_tx: mpsc::UnboundedSender<Action>,
    /// Action receiver — main loop drains this.
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    /// Create a new App with all screens mounted.
    pub fn new(service: AgendaService) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        let screens: HashMap<ScreenId, Box<dyn Component>> =
            create_screens().into_iter().collect();

        Self {
            service: Arc::new(service),
            active_screen: ScreenId::Agenda,
            screens,
            running: true,
            help_visible: false,
            notification: None,
            action_tx,
            action_rx,
        }
    }

    /// Initialize all screen components with the action sender.
    fn init_screens(&mut self) -> Result<()> {
        for screen in self.screens.values_mut() {
            screen.init(self.action_tx.clone())?;
        }
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
        Ok(())
    }

    /// Run the main event loop. This is the heart of the TUI.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.init_screens()?;

        // Initial data load for today.
        let today = chrono::Local::now().date_naive();
        self.action_tx.send(Action::RefreshAgenda(today))?;
        self.action_tx.send(Action::LoadReference)?;

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!("TUI event loop started");

        while self.running {
            // 1. Wait for the next event
            let Some(event) = events.next().await else {
                break;
            };

            // 2. Map event → action(s)
            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => {
                    self.action_tx.send(Action::Resize(w, h))?;
                }
                Event::Tick => {
                    self.action_tx.send(Action::Tick)?;
                }
                Event::Render => {
                    self.action_tx.send(Action::Render)?;
                }
            }

            // 3. Drain and process all queued actions
            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        events.stop();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Map a key event to an action. Global keys are handled here;
    /// screen-specific keys are delegated to the active screen component.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.help_visible {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Ok(Some(Action::ToggleHelp)),
                _ => Ok(None),
            };
        }

        // A modal (booking form, confirm dialog) gets every key first.
        let capturing = self
            .screens
            .get(&self.active_screen)
            .is_some_and(|s| s.capturing_input());
        if capturing {
            if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                return screen.handle_key_event(key);
            }
        }

        // Global keybindings
        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => return Ok(Some(Action::Quit)),
            (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),

            (KeyModifiers::NONE, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),

            // Screen navigation via number keys
            (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='2')) => {
                #[allow(clippy::as_conversions)]
                let n = c as u8 - b'0';
                if let Some(screen) = ScreenId::from_number(n) {
                    return Ok(Some(Action::SwitchScreen(screen)));
                }
            }

            (KeyModifiers::NONE, KeyCode::Tab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.next())));
            }
            (KeyModifiers::SHIFT, KeyCode::BackTab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.prev())));
            }

            _ => {}
        }

        // Delegate to the active screen
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            return screen.handle_key_event(key);
        }
        Ok(None)
    }

    /// Process one action: app-level state, backend task spawning, then
    /// forward to every screen.
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => {
                self.running = false;
            }

            Action::SwitchScreen(id) => {
                if let Some(old) = self.screens.get_mut(&self.active_screen) {
                    old.set_focused(false);
                }
                self.active_screen = *id;
                if let Some(new) = self.screens.get_mut(&self.active_screen) {
                    new.set_focused(true);
                }
            }

            Action::ToggleHelp => {
                self.help_visible = !self.help_visible;
            }

            Action::Tick => {
                if let Some((_, ticks)) = &mut self.notification {
                    *ticks = ticks.saturating_sub(1);
                    if *ticks == 0 {
                        self.notification = None;
                    }
                }
            }

            Action::Notify(notification) => {
                self.notification = Some((notification.clone(), NOTIFICATION_TICKS));
            }

            Action::DismissNotification => {
                self.notification = None;
            }

            Action::BackendFailed(message) => {
                self.notification =
                    Some((Notification::error(message.clone()), NOTIFICATION_TICKS));
            }

            // ── Backend requests → tokio tasks ────────────────────
            Action::RefreshAgenda(date) => {
                let service = Arc::clone(&self.service);
                let tx = self.action_tx.clone();
                let date = *date;
                tokio::spawn(async move {
                    let result = service.refresh(date).await;
                    let _ = match result {
                        Ok(snap) => tx.send(Action::BookingsLoaded(snap)),
                        Err(e) => tx.send(Action::BackendFailed(e.to_string())),
                    };
                });
            }

            Action::LoadReference => {
                let service = Arc::clone(&self.service);
                let tx = self.action_tx.clone();
                tokio::spawn(async move {
                    let customers = service.fetch_customers().await;
                    let catalog = service.fetch_catalog().await;
                    let _ = match (customers, catalog) {
                        (Ok(customers), Ok(catalog)) => tx.send(Action::ReferenceLoaded {
                            customers: Arc::new(customers),
                            catalog: Arc::new(catalog),
                        }),
                        (Err(e), _) | (_, Err(e)) => {
                            tx.send(Action::BackendFailed(e.to_string()))
                        }
                    };
                });
            }

            Action::DeleteBooking(id) => {
                let service = Arc::clone(&self.service);
                let tx = self.action_tx.clone();
                let id = *id;
                tokio::spawn(async move {
                    match service.delete(id).await {
                        Ok(()) => {
                            let _ = tx.send(Action::BookingsLoaded(service.current()));
                            let _ = tx.send(Action::Notify(Notification::success(
                                "Agendamento excluído",
                            )));
                        }
                        Err(e) => {
                            let _ = tx.send(Action::BackendFailed(e.to_string()));
                        }
                    }
                });
            }

            Action::SettleBooking(id, method) => {
                let service = Arc::clone(&self.service);
                let tx = self.action_tx.clone();
                let (id, method) = (*id, *method);
                tokio::spawn(async move {
                    match service.settle(id, method).await {
                        Ok(()) => {
                            let _ = tx.send(Action::BookingsLoaded(service.current()));
                            let _ = tx.send(Action::Notify(Notification::success(
                                "Pagamento finalizado",
                            )));
                        }
                        Err(e) => {
                            let _ = tx.send(Action::BackendFailed(e.to_string()));
                        }
                    }
                });
            }

            Action::SubmitDraft(draft) => {
                let service = Arc::clone(&self.service);
                let tx = self.action_tx.clone();
                let mut draft = (**draft).clone();
                tokio::spawn(async move {
                    let error = submit_draft(&mut draft, service.api().as_ref())
                        .await
                        .err()
                        .map(|e| e.to_string());
                    let _ = tx.send(Action::DraftSettled {
                        draft: Box::new(draft),
                        error,
                    });
                });
            }

            _ => {}
        }

        // Forward to all screens (they filter what they care about).
        let mut follow_ups = Vec::new();
        for screen in self.screens.values_mut() {
            if let Some(follow_up) = screen.update(action)? {
                follow_ups.push(follow_up);
            }
        }
        for follow_up in follow_ups {
            self.action_tx.send(follow_up)?;
        }

        Ok(())
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let layout = Layout::vertical([
            Constraint::Length(1), // tab bar
            Constraint::Min(1),    // active screen
            Constraint::Length(1), // status bar
        ])
        .split(frame.area());

        self.render_tabs(frame, layout[0]);

        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, layout[1]);
        }

        self.render_status(frame, layout[2]);

        if self.help_visible {
            self.render_help(frame);
        }
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::styled(" fitgarden ", theme::title_style())];
        for id in ScreenId::ALL {
            let style = if id == self.active_screen {
                theme::tab_active()
            } else {
                theme::tab_inactive()
            };
            spans.push(Span::styled(format!("  {} {}", id.number(), id.label()), style));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        if let Some((notification, _)) = &self.notification {
            let color = match notification.level {
                NotificationLevel::Info => theme::DIM_WHITE,
                NotificationLevel::Success => theme::SUCCESS_GREEN,
                NotificationLevel::Error => theme::ERROR_RED,
            };
            let line = Line::from(Span::styled(
                format!(" {}", notification.message),
                ratatui::style::Style::default().fg(color),
            ));
            frame.render_widget(Paragraph::new(line), area);
            return;
        }

        let hints = Line::from(vec![
            Span::styled(" q ", theme::key_hint_key()),
            Span::styled("sair  ", theme::key_hint()),
            Span::styled("1/2 ", theme::key_hint_key()),
            Span::styled("telas  ", theme::key_hint()),
            Span::styled("? ", theme::key_hint_key()),
            Span::styled("ajuda", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), area);
    }

    #[allow(clippy::unused_self)]
    fn render_help(&self, frame: &mut Frame) {
        let area = centered_rect(60, 18, frame.area());
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(" Atalhos ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());

        let lines = vec![
            Line::from(""),
            help_line("j/k", "navegar na lista"),
            help_line("[ / ]", "dia anterior / próximo"),
            help_line("t", "hoje"),
            help_line("r", "recarregar"),
            help_line("Enter", "detalhes do agendamento"),
            help_line("n", "novo agendamento"),
            help_line("e", "editar selecionado"),
            help_line("d", "excluir selecionado"),
            help_line("p", "finalizar pagamento"),
            help_line("1/2", "Agenda / Produção"),
            help_line("q", "sair"),
        ];

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

fn help_line(key: &str, text: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {key:<8}"), theme::key_hint_key()),
        Span::styled(text.to_owned(), theme::key_hint()),
    ])
}

/// A centered rect of fixed size within `area`.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}
