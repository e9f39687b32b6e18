//! Agenda screen — the day's bookings with detail dialog and booking form.
//!
//! The list shows every booking for the selected date with a colored strip
//! keyed by delivery zone. Date changes, deletes, and settles all go
//! through app-level actions; the booking form opens as a modal on top.

use std::sync::Arc;

use chrono::{Days, NaiveDate};
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, Cell, Clear, Paragraph, Row, Table, TableState,
};

use fitgarden_core::agenda::DayBookings;
use fitgarden_core::{
    Booking, BookingId, CatalogIndex, Customer, DeliveryKind, SettlementMethod, Zone,
};

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::screens::booking_form::{BookingForm, FormEvent};
use crate::theme;

/// Detail dialog sub-tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum DetailTab {
    #[default]
    Details,
    Items,
}

/// Pending delete confirmation.
struct ConfirmDelete {
    id: BookingId,
    name: String,
}

pub struct AgendaScreen {
    focused: bool,

    date: NaiveDate,
    snapshot: DayBookings,
    loading: bool,

    customers: Arc<Vec<Customer>>,
    catalog: Arc<CatalogIndex>,
    reference_ready: bool,

    table_state: TableState,
    detail_open: bool,
    detail_tab: DetailTab,
    confirm_delete: Option<ConfirmDelete>,
    form: Option<BookingForm>,
}

impl AgendaScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            date: chrono::Local::now().date_naive(),
            snapshot: DayBookings::default(),
            loading: true,
            customers: Arc::new(Vec::new()),
            catalog: Arc::new(CatalogIndex::default()),
            reference_ready: false,
            table_state: TableState::default(),
            detail_open: false,
            detail_tab: DetailTab::default(),
            confirm_delete: None,
            form: None,
        }
    }

    fn bookings(&self) -> &[Booking] {
        &self.snapshot.bookings
    }

    fn selected_index(&self) -> usize {
        self.table_state.selected().unwrap_or(0)
    }

    fn selected_booking(&self) -> Option<&Booking> {
        self.bookings().get(self.selected_index())
    }

    fn select(&mut self, idx: usize) {
        let len = self.bookings().len();
        let clamped = if len == 0 { 0 } else { idx.min(len - 1) };
        self.table_state.select(Some(clamped));
    }

    #[allow(clippy::cast_sign_loss, clippy::cast_possible_wrap, clippy::as_conversions)]
    fn move_selection(&mut self, delta: isize) {
        let len = self.bookings().len();
        if len == 0 {
            return;
        }
        let current = self.selected_index() as isize;
        let next = (current + delta).clamp(0, len as isize - 1);
        self.select(next as usize);
    }

    /// Switch to another day and refetch.
    fn change_date(&mut self, date: NaiveDate) -> Option<Action> {
        self.date = date;
        self.loading = true;
        self.detail_open = false;
        Some(Action::RefreshAgenda(date))
    }

    fn open_form(&mut self, form: BookingForm) -> Option<Action> {
        if self.reference_ready {
            self.form = Some(form);
            None
        } else {
            Some(Action::Notify(Notification::info(
                "Carregando clientes e cardápio…",
            )))
        }
    }

    // ── Key handlers per modal layer ────────────────────────────────

    fn handle_form_key(&mut self, key: KeyEvent) -> Option<Action> {
        let Some(form) = self.form.as_mut() else {
            return None;
        };
        match form.handle_key(key) {
            FormEvent::Noop => None,
            FormEvent::Dispatch(action) => Some(action),
            FormEvent::Close { refresh } => {
                self.form = None;
                if refresh {
                    self.loading = true;
                    Some(Action::RefreshAgenda(self.date))
                } else {
                    None
                }
            }
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                let confirm = self.confirm_delete.take()?;
                self.detail_open = false;
                self.loading = true;
                Some(Action::DeleteBooking(confirm.id))
            }
            KeyCode::Char('n') | KeyCode::Esc => {
                self.confirm_delete = None;
                None
            }
            _ => None,
        }
    }

    fn handle_detail_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc => {
                self.detail_open = false;
                None
            }
            KeyCode::Tab => {
                self.detail_tab = match self.detail_tab {
                    DetailTab::Details => DetailTab::Items,
                    DetailTab::Items => DetailTab::Details,
                };
                None
            }
            KeyCode::Char('e') => self.edit_selected(),
            KeyCode::Char('d') => self.request_delete(),
            _ => None,
        }
    }

    fn edit_selected(&mut self) -> Option<Action> {
        let booking = self.selected_booking()?.clone();
        self.detail_open = false;
        self.open_form(BookingForm::edit(
            &booking,
            Arc::clone(&self.customers),
            Arc::clone(&self.catalog),
        ))
    }

    fn request_delete(&mut self) -> Option<Action> {
        let booking = self.selected_booking()?;
        self.confirm_delete = Some(ConfirmDelete {
            id: booking.id,
            name: booking.display_name(),
        });
        None
    }

    /// Settle the selected booking's payment with its stored method.
    fn settle_selected(&mut self) -> Option<Action> {
        let booking = self.selected_booking()?;
        if booking.settled {
            return Some(Action::Notify(Notification::info("Pagamento já finalizado")));
        }
        let id = booking.id;
        let method =
            SettlementMethod::for_payment(booking.payment, fitgarden_core::FeeChannel::default());
        self.loading = true;
        Some(Action::SettleBooking(id, method))
    }

    // ── Rendering ───────────────────────────────────────────────────

    fn render_list(&self, frame: &mut Frame, area: Rect) {
        let count = self.bookings().len();
        let loading = if self.loading { " ⟳" } else { "" };
        let title = format!(
            " Agenda — {} ({count}){loading} ",
            self.date.format("%d/%m/%Y")
        );

        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([
            Constraint::Min(1),    // table
            Constraint::Length(1), // hints
        ])
        .split(inner);

        if count == 0 {
            let empty = Paragraph::new(Line::from(Span::styled(
                if self.loading {
                    "  carregando…"
                } else {
                    "  nenhum agendamento para este dia — n cria um novo"
                },
                theme::table_row(),
            )));
            frame.render_widget(empty, layout[0]);
        } else {
            self.render_table(frame, layout[0]);
        }

        let hints = Line::from(vec![
            Span::styled("  [/] ", theme::key_hint_key()),
            Span::styled("dia  ", theme::key_hint()),
            Span::styled("n ", theme::key_hint_key()),
            Span::styled("novo  ", theme::key_hint()),
            Span::styled("e ", theme::key_hint_key()),
            Span::styled("editar  ", theme::key_hint()),
            Span::styled("d ", theme::key_hint_key()),
            Span::styled("excluir  ", theme::key_hint()),
            Span::styled("p ", theme::key_hint_key()),
            Span::styled("pagamento  ", theme::key_hint()),
            Span::styled("Enter ", theme::key_hint_key()),
            Span::styled("detalhes", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), layout[1]);
    }

    fn render_table(&self, frame: &mut Frame, area: Rect) {
        let header = Row::new(vec![
            Cell::from(""),
            Cell::from("Horário").style(theme::table_header()),
            Cell::from("Cliente").style(theme::table_header()),
            Cell::from("Tipo").style(theme::table_header()),
            Cell::from("Zona").style(theme::table_header()),
            Cell::from("Itens").style(theme::table_header()),
            Cell::from("Total").style(theme::table_header()),
            Cell::from("Pago").style(theme::table_header()),
        ]);

        let selected = self.selected_index();
        let rows: Vec<Row> = self
            .bookings()
            .iter()
            .enumerate()
            .map(|(i, booking)| {
                let strip = Cell::from("▌").style(
                    Style::default().fg(theme::zone_color(booking.zone)),
                );
                let row_style = if i == selected {
                    theme::table_selected()
                } else {
                    theme::table_row()
                };
                let kind = match booking.kind {
                    DeliveryKind::Entrega => "Entrega",
                    DeliveryKind::Retirada => "Retirada",
                };
                let settled = if booking.settled { "✓" } else { "•" };
                Row::new(vec![
                    strip,
                    Cell::from(booking.window.to_string()),
                    Cell::from(booking.display_name()),
                    Cell::from(kind),
                    Cell::from(booking.zone.map(Zone::label).unwrap_or("-")),
                    Cell::from(booking.items.len().to_string()),
                    Cell::from(format!("R$ {:.2}", booking.total())),
                    Cell::from(settled),
                ])
                .style(row_style)
            })
            .collect();

        let widths = [
            Constraint::Length(1),
            Constraint::Length(12),
            Constraint::Fill(2),
            Constraint::Length(9),
            Constraint::Length(11),
            Constraint::Length(6),
            Constraint::Length(10),
            Constraint::Length(5),
        ];

        let table = Table::new(rows, widths).header(header);
        let mut state = self.table_state;
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn render_detail(&self, frame: &mut Frame, area: Rect) {
        let Some(booking) = self.selected_booking() else {
            return;
        };

        let popup = centered_rect(64, 18, area);
        frame.render_widget(Clear, popup);

        let title = format!(" Agendamento #{} — {} ", booking.id, booking.display_name());
        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let layout = Layout::vertical([
            Constraint::Length(1), // tabs
            Constraint::Min(1),    // body
            Constraint::Length(1), // hints
        ])
        .split(inner);

        // Sub-tab bar
        let tabs = Line::from(vec![
            Span::styled(
                " Detalhes ",
                if self.detail_tab == DetailTab::Details {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                },
            ),
            Span::styled(
                " Itens ",
                if self.detail_tab == DetailTab::Items {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                },
            ),
        ]);
        frame.render_widget(Paragraph::new(tabs), layout[0]);

        match self.detail_tab {
            DetailTab::Details => {
                let lines = vec![
                    detail_line("Tipo", booking.kind.label()),
                    detail_line("Data", &booking.date.format("%d/%m/%Y").to_string()),
                    detail_line("Horário", &booking.window.to_string()),
                    detail_line("Zona", booking.zone.map(Zone::label).unwrap_or("-")),
                    detail_line("Endereço", booking.address.as_deref().unwrap_or("-")),
                    detail_line("Telefone", booking.customer_phone.as_deref().unwrap_or("-")),
                    detail_line("Pagamento", booking.payment.label()),
                    detail_line("Pago", if booking.settled { "sim" } else { "não" }),
                    detail_line("Obs.", booking.notes.as_deref().unwrap_or("-")),
                ];
                frame.render_widget(Paragraph::new(lines), layout[1]);
            }
            DetailTab::Items => {
                let mut lines: Vec<Line> = booking
                    .items
                    .iter()
                    .map(|item| {
                        Line::from(format!(
                            "  {}x {} ({}) — R$ {:.2}",
                            item.quantity,
                            item.option_name,
                            item.size_label,
                            item.subtotal()
                        ))
                    })
                    .collect();
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    format!("  Total: R$ {:.2}", booking.total()),
                    Style::default().fg(theme::TANGERINE),
                )));
                frame.render_widget(Paragraph::new(lines), layout[1]);
            }
        }

        let hints = Line::from(vec![
            Span::styled("  Tab ", theme::key_hint_key()),
            Span::styled("aba  ", theme::key_hint()),
            Span::styled("e ", theme::key_hint_key()),
            Span::styled("editar  ", theme::key_hint()),
            Span::styled("d ", theme::key_hint_key()),
            Span::styled("excluir  ", theme::key_hint()),
            Span::styled("Esc ", theme::key_hint_key()),
            Span::styled("voltar", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), layout[2]);
    }

    fn render_confirm(&self, frame: &mut Frame, area: Rect) {
        let Some(confirm) = &self.confirm_delete else {
            return;
        };
        let popup = centered_rect(52, 5, area);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(" Confirmar exclusão ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme::ERROR_RED));
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let lines = vec![
            Line::from(format!(
                " Excluir o agendamento de {}? Esta ação não pode ser desfeita.",
                confirm.name
            )),
            Line::from(vec![
                Span::styled(" y ", theme::key_hint_key()),
                Span::styled("excluir  ", theme::key_hint()),
                Span::styled("n ", theme::key_hint_key()),
                Span::styled("cancelar", theme::key_hint()),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

impl Component for AgendaScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.form.is_some() {
            return Ok(self.handle_form_key(key));
        }
        if self.confirm_delete.is_some() {
            return Ok(self.handle_confirm_key(key));
        }
        if self.detail_open {
            return Ok(self.handle_detail_key(key));
        }

        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_selection(1);
                Ok(None)
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_selection(-1);
                Ok(None)
            }
            KeyCode::Char('g') => {
                self.select(0);
                Ok(None)
            }
            KeyCode::Char('G') => {
                let len = self.bookings().len();
                if len > 0 {
                    self.select(len - 1);
                }
                Ok(None)
            }
            KeyCode::Char('[') => {
                let date = self.date.checked_sub_days(Days::new(1));
                Ok(date.and_then(|d| self.change_date(d)))
            }
            KeyCode::Char(']') => {
                let date = self.date.checked_add_days(Days::new(1));
                Ok(date.and_then(|d| self.change_date(d)))
            }
            KeyCode::Char('t') => Ok(self.change_date(chrono::Local::now().date_naive())),
            KeyCode::Char('r') => {
                self.loading = true;
                Ok(Some(Action::RefreshAgenda(self.date)))
            }
            KeyCode::Enter => {
                if self.selected_booking().is_some() {
                    self.detail_open = true;
                    self.detail_tab = DetailTab::Details;
                }
                Ok(None)
            }
            KeyCode::Char('n') => {
                let form = BookingForm::create(
                    self.date,
                    Arc::clone(&self.customers),
                    Arc::clone(&self.catalog),
                );
                Ok(self.open_form(form))
            }
            KeyCode::Char('e') => Ok(self.edit_selected()),
            KeyCode::Char('d') => Ok(self.request_delete()),
            KeyCode::Char('p') => Ok(self.settle_selected()),
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::BookingsLoaded(snapshot) => {
                self.snapshot = snapshot.clone();
                self.date = snapshot.date;
                self.loading = false;
                if !self.snapshot.bookings.is_empty() {
                    // Clamp (and establish) the selection for the new list.
                    self.select(self.selected_index());
                }
            }
            Action::ReferenceLoaded {
                customers,
                catalog,
            } => {
                self.customers = Arc::clone(customers);
                self.catalog = Arc::clone(catalog);
                self.reference_ready = true;
                if let Some(form) = self.form.as_mut() {
                    form.set_reference(Arc::clone(customers), Arc::clone(catalog));
                }
            }
            Action::DraftSettled { draft, error } => {
                if let Some(form) = self.form.as_mut() {
                    if let Some(message) = form.absorb((**draft).clone(), error.clone()) {
                        return Ok(Some(Action::Notify(Notification::error(message))));
                    }
                }
            }
            Action::BackendFailed(_) => {
                self.loading = false;
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        self.render_list(frame, area);

        if self.detail_open {
            self.render_detail(frame, area);
        }
        if self.confirm_delete.is_some() {
            self.render_confirm(frame, area);
        }
        if let Some(form) = &self.form {
            form.render(frame, area);
        }
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn capturing_input(&self) -> bool {
        self.form.is_some() || self.confirm_delete.is_some() || self.detail_open
    }

    fn id(&self) -> &'static str {
        "Agenda"
    }
}

fn detail_line<'a>(label: &'a str, value: &str) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("  {label:<10}"), theme::field_label()),
        Span::styled(value.to_owned(), Style::default().fg(theme::MINT)),
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
