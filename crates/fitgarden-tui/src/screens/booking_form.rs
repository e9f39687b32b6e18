//! Booking form dialog — create/edit an agendamento field by field.
//!
//! The dialog owns a [`BookingDraft`] and mirrors its phase: while
//! `Submitting` every control is disabled, `Confirmed` swaps the form for
//! the read-only summary with the WhatsApp link, `Failed` re-enables
//! editing with the error shown inline. The actual backend call runs in
//! an app-level task; the form only dispatches `Action::SubmitDraft` and
//! absorbs the settled draft when it comes back.

use std::sync::Arc;

use chrono::{Days, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Clear, Paragraph, Row, Table, Wrap};
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use fitgarden_core::{
    Booking, BookingDraft, CatalogIndex, Customer, DeliveryKind, DraftMode, DraftPhase,
    EditPolicy, FeeChannel, PaymentMethod, TimeWindow, Zone, notify,
};

use crate::action::Action;
use crate::theme;

/// What a key press did to the dialog.
pub enum FormEvent {
    Noop,
    /// Dispatch an action through the app loop.
    Dispatch(Action),
    /// Close the dialog; `refresh` asks the agenda to refetch the day.
    Close { refresh: bool },
}

/// Focusable fields, in visual order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormField {
    Customer,
    Kind,
    Date,
    Window,
    Address,
    Zone,
    Notes,
    Payment,
    FeeChannel,
    Voucher,
    Picker,
    Items,
}

const PAYMENTS: [PaymentMethod; 5] = [
    PaymentMethod::Dinheiro,
    PaymentMethod::Cartao,
    PaymentMethod::Pix,
    PaymentMethod::Voucher,
    PaymentMethod::Plano,
];

const CHANNELS: [FeeChannel; 3] = [FeeChannel::Dinheiro, FeeChannel::Cartao, FeeChannel::Pix];

const ZONES: [Option<Zone>; 7] = [
    None,
    Some(Zone::Centro),
    Some(Zone::Norte),
    Some(Zone::Sul),
    Some(Zone::Leste),
    Some(Zone::Oeste),
    Some(Zone::Outra),
];

pub struct BookingForm {
    draft: BookingDraft,
    customers: Arc<Vec<Customer>>,
    catalog: Arc<CatalogIndex>,

    field: FormField,
    customer_idx: Option<usize>,

    window_input: Input,
    address_input: Input,
    notes_input: Input,
    voucher_input: Input,

    picker_option_idx: usize,
    picker_size_idx: usize,
    picker_qty: u32,
    item_sel: usize,
}

impl BookingForm {
    /// Fresh create dialog for the given day.
    pub fn create(
        date: NaiveDate,
        customers: Arc<Vec<Customer>>,
        catalog: Arc<CatalogIndex>,
    ) -> Self {
        let draft = BookingDraft::new(date);
        Self::from_draft(draft, customers, catalog)
    }

    /// Edit dialog pre-filled from an existing booking. Customer and
    /// payment stay locked, matching the shipped product policy.
    pub fn edit(
        booking: &Booking,
        customers: Arc<Vec<Customer>>,
        catalog: Arc<CatalogIndex>,
    ) -> Self {
        let draft = BookingDraft::edit(booking, EditPolicy::locked());
        let mut form = Self::from_draft(draft, customers, catalog);
        form.customer_idx = form
            .customers
            .iter()
            .position(|c| Some(c.id) == form.draft.customer.as_ref().map(|d| d.id));
        form
    }

    fn from_draft(
        draft: BookingDraft,
        customers: Arc<Vec<Customer>>,
        catalog: Arc<CatalogIndex>,
    ) -> Self {
        let window_input = Input::new(draft.window.as_wire());
        let address_input = Input::new(draft.address.clone());
        let notes_input = Input::new(draft.notes.clone());
        let voucher_input = Input::new(draft.voucher_code.clone());
        Self {
            draft,
            customers,
            catalog,
            field: FormField::Customer,
            customer_idx: None,
            window_input,
            address_input,
            notes_input,
            voucher_input,
            picker_option_idx: 0,
            picker_size_idx: 0,
            picker_qty: 1,
            item_sel: 0,
        }
    }

    /// Swap in refreshed reference data (late `ReferenceLoaded`).
    pub fn set_reference(&mut self, customers: Arc<Vec<Customer>>, catalog: Arc<CatalogIndex>) {
        self.customers = customers;
        self.catalog = catalog;
        self.picker_option_idx = 0;
        self.picker_size_idx = 0;
    }

    /// Absorb the draft returned by the submission task.
    ///
    /// Returns the error message for synchronous validation rejections
    /// (the draft came back still editable) so the host can toast it.
    pub fn absorb(&mut self, draft: BookingDraft, error: Option<String>) -> Option<String> {
        let validation_error = match (&error, draft.phase()) {
            (Some(message), DraftPhase::Empty | DraftPhase::Editing) => Some(message.clone()),
            _ => None,
        };
        self.draft = draft;
        validation_error
    }

    // ── Field visibility & navigation ───────────────────────────────

    fn visible_fields(&self) -> Vec<FormField> {
        let mut fields = vec![
            FormField::Customer,
            FormField::Kind,
            FormField::Date,
            FormField::Window,
            FormField::Address,
            FormField::Zone,
            FormField::Notes,
            FormField::Payment,
        ];
        if self.draft.payment == PaymentMethod::Voucher {
            fields.push(FormField::FeeChannel);
            fields.push(FormField::Voucher);
        }
        fields.push(FormField::Picker);
        if !self.draft.items().is_empty() {
            fields.push(FormField::Items);
        }
        fields
    }

    fn move_field(&mut self, forward: bool) {
        let fields = self.visible_fields();
        let idx = fields.iter().position(|&f| f == self.field).unwrap_or(0);
        let next = if forward {
            (idx + 1) % fields.len()
        } else {
            (idx + fields.len() - 1) % fields.len()
        };
        self.field = fields[next];
    }

    // ── Key handling ────────────────────────────────────────────────

    pub fn handle_key(&mut self, key: KeyEvent) -> FormEvent {
        match self.draft.phase() {
            DraftPhase::Submitting => FormEvent::Noop,
            DraftPhase::Confirmed(_) => match key.code {
                KeyCode::Esc | KeyCode::Enter => FormEvent::Close { refresh: true },
                _ => FormEvent::Noop,
            },
            _ => self.handle_editing_key(key),
        }
    }

    #[allow(clippy::too_many_lines)]
    fn handle_editing_key(&mut self, key: KeyEvent) -> FormEvent {
        // Dialog-level keys first.
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc) => return FormEvent::Close { refresh: false },
            (KeyModifiers::CONTROL, KeyCode::Char('s')) => return self.submit(),
            (_, KeyCode::Tab) => {
                self.move_field(true);
                return FormEvent::Noop;
            }
            (_, KeyCode::BackTab) => {
                self.move_field(false);
                return FormEvent::Noop;
            }
            _ => {}
        }

        match self.field {
            FormField::Customer => self.cycle_customer(key),
            FormField::Kind => {
                if is_cycle_key(key) {
                    let kind = match self.draft.kind {
                        DeliveryKind::Entrega => DeliveryKind::Retirada,
                        DeliveryKind::Retirada => DeliveryKind::Entrega,
                    };
                    self.draft.set_kind(kind);
                }
                FormEvent::Noop
            }
            FormField::Date => {
                match key.code {
                    KeyCode::Left => {
                        if let Some(date) = self.draft.date.checked_sub_days(Days::new(1)) {
                            self.draft.set_date(date);
                        }
                    }
                    KeyCode::Right => {
                        if let Some(date) = self.draft.date.checked_add_days(Days::new(1)) {
                            self.draft.set_date(date);
                        }
                    }
                    KeyCode::Char('t') => {
                        self.draft.set_date(chrono::Local::now().date_naive());
                    }
                    _ => {}
                }
                FormEvent::Noop
            }
            FormField::Window => {
                self.window_input
                    .handle_event(&crossterm::event::Event::Key(key));
                FormEvent::Noop
            }
            FormField::Address => {
                self.address_input
                    .handle_event(&crossterm::event::Event::Key(key));
                self.draft.set_address(self.address_input.value());
                FormEvent::Noop
            }
            FormField::Zone => {
                if is_cycle_key(key) {
                    let idx = ZONES
                        .iter()
                        .position(|&z| z == self.draft.zone)
                        .unwrap_or(0);
                    let next = cycle(idx, ZONES.len(), key.code == KeyCode::Left);
                    self.draft.set_zone(ZONES[next]);
                }
                FormEvent::Noop
            }
            FormField::Notes => {
                self.notes_input
                    .handle_event(&crossterm::event::Event::Key(key));
                self.draft.set_notes(self.notes_input.value());
                FormEvent::Noop
            }
            FormField::Payment => {
                if is_cycle_key(key) && self.draft.payment_changeable() {
                    let idx = PAYMENTS
                        .iter()
                        .position(|&p| p == self.draft.payment)
                        .unwrap_or(0);
                    let next = cycle(idx, PAYMENTS.len(), key.code == KeyCode::Left);
                    self.draft.set_payment(PAYMENTS[next]);
                }
                FormEvent::Noop
            }
            FormField::FeeChannel => {
                if is_cycle_key(key) {
                    let idx = CHANNELS
                        .iter()
                        .position(|&c| c == self.draft.fee_channel)
                        .unwrap_or(0);
                    let next = cycle(idx, CHANNELS.len(), key.code == KeyCode::Left);
                    self.draft.set_fee_channel(CHANNELS[next]);
                }
                FormEvent::Noop
            }
            FormField::Voucher => {
                self.voucher_input
                    .handle_event(&crossterm::event::Event::Key(key));
                self.draft.set_voucher_code(self.voucher_input.value());
                FormEvent::Noop
            }
            FormField::Picker => self.handle_picker_key(key),
            FormField::Items => self.handle_items_key(key),
        }
    }

    fn cycle_customer(&mut self, key: KeyEvent) -> FormEvent {
        if !is_cycle_key(key) || self.customers.is_empty() || !self.draft.customer_changeable() {
            return FormEvent::Noop;
        }
        let next = match self.customer_idx {
            None => 0,
            Some(idx) => cycle(idx, self.customers.len(), key.code == KeyCode::Left),
        };
        self.customer_idx = Some(next);
        if let Some(customer) = self.customers.get(next) {
            self.draft.set_customer(customer.clone());
            // The customer's default address may have been seeded.
            self.address_input = Input::new(self.draft.address.clone());
        }
        FormEvent::Noop
    }

    fn handle_picker_key(&mut self, key: KeyEvent) -> FormEvent {
        let option_count = self.catalog.len();
        if option_count == 0 {
            return FormEvent::Noop;
        }
        self.picker_option_idx = self.picker_option_idx.min(option_count - 1);
        let size_count = self
            .catalog
            .iter()
            .nth(self.picker_option_idx)
            .map_or(0, |option| option.sizes.len());

        match key.code {
            KeyCode::Left | KeyCode::Right => {
                self.picker_option_idx = cycle(
                    self.picker_option_idx,
                    option_count,
                    key.code == KeyCode::Left,
                );
                self.picker_size_idx = 0;
            }
            KeyCode::Up | KeyCode::Down => {
                if size_count > 0 {
                    self.picker_size_idx =
                        cycle(self.picker_size_idx, size_count, key.code == KeyCode::Up);
                }
            }
            KeyCode::Char('+') => self.picker_qty = self.picker_qty.saturating_add(1),
            KeyCode::Char('-') => self.picker_qty = self.picker_qty.saturating_sub(1).max(1),
            KeyCode::Enter => {
                let picked = self
                    .catalog
                    .iter()
                    .nth(self.picker_option_idx)
                    .and_then(|option| {
                        option
                            .sizes
                            .get(self.picker_size_idx)
                            .map(|size| (option.id, size.id))
                    });
                if let Some((option_id, size_id)) = picked {
                    self.draft
                        .add_item(&self.catalog, option_id, size_id, self.picker_qty);
                    self.picker_qty = 1;
                }
            }
            _ => {}
        }
        FormEvent::Noop
    }

    fn handle_items_key(&mut self, key: KeyEvent) -> FormEvent {
        let len = self.draft.items().len();
        if len == 0 {
            self.field = FormField::Picker;
            return FormEvent::Noop;
        }
        self.item_sel = self.item_sel.min(len - 1);
        let selected_id = self.draft.items()[self.item_sel].id;

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.item_sel = self.item_sel.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.item_sel = (self.item_sel + 1).min(len - 1);
            }
            KeyCode::Char('+') => self.draft.change_quantity(selected_id, 1),
            KeyCode::Char('-') => self.draft.change_quantity(selected_id, -1),
            KeyCode::Delete | KeyCode::Char('x') => {
                self.draft.remove_item(selected_id);
                if self.draft.items().is_empty() {
                    self.field = FormField::Picker;
                }
            }
            _ => {}
        }
        FormEvent::Noop
    }

    /// Sync text inputs into the draft, mark it busy, and hand a copy to
    /// the app-level submission task.
    fn submit(&mut self) -> FormEvent {
        self.draft
            .set_window(TimeWindow::parse(self.window_input.value()));
        self.draft.set_address(self.address_input.value());
        self.draft.set_notes(self.notes_input.value());
        self.draft.set_voucher_code(self.voucher_input.value());

        let copy = self.draft.clone();
        self.draft.begin_submit();
        FormEvent::Dispatch(Action::SubmitDraft(Box::new(copy)))
    }

    // ── Rendering ───────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let popup = centered_rect(72, 26, area);
        frame.render_widget(Clear, popup);

        let title = match self.draft.mode() {
            DraftMode::Create => " Novo agendamento ".to_owned(),
            DraftMode::Edit { id, .. } => format!(" Editar agendamento #{id} "),
        };
        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());

        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        if let DraftPhase::Confirmed(receipt) = self.draft.phase() {
            self.render_confirmation(frame, inner, receipt.booking_id.value());
            return;
        }

        let layout = Layout::vertical([
            Constraint::Min(10),   // fields
            Constraint::Length(6), // items table
            Constraint::Length(1), // total
            Constraint::Length(1), // status / hints
        ])
        .split(inner);

        self.render_fields(frame, layout[0]);
        self.render_items(frame, layout[1]);

        let total = Line::from(vec![
            Span::styled("  Total: ", theme::field_label()),
            Span::styled(
                format!("R$ {:.2}", self.draft.total()),
                Style::default().fg(theme::TANGERINE),
            ),
        ]);
        frame.render_widget(Paragraph::new(total), layout[2]);

        self.render_footer(frame, layout[3]);
    }

    #[allow(clippy::too_many_lines)]
    fn render_fields(&self, frame: &mut Frame, area: Rect) {
        let customer = self
            .draft
            .customer
            .as_ref()
            .map_or_else(|| "(selecione ◂ ▸)".into(), |c| c.name.clone());
        let zone = self
            .draft
            .zone
            .map_or("-", Zone::label);

        let mut lines = vec![
            self.field_line(
                FormField::Customer,
                "Cliente",
                &customer,
                self.draft.customer_changeable(),
            ),
            self.field_line(FormField::Kind, "Tipo", self.draft.kind.label(), true),
            self.field_line(
                FormField::Date,
                "Data",
                &self.draft.date.format("%d/%m/%Y").to_string(),
                true,
            ),
            self.input_line(FormField::Window, "Horário", &self.window_input),
            self.input_line(FormField::Address, "Endereço", &self.address_input),
            self.field_line(FormField::Zone, "Zona", zone, true),
            self.input_line(FormField::Notes, "Obs.", &self.notes_input),
            self.field_line(
                FormField::Payment,
                "Pagamento",
                self.draft.payment.label(),
                self.draft.payment_changeable(),
            ),
        ];

        if self.draft.payment == PaymentMethod::Voucher {
            lines.push(self.field_line(
                FormField::FeeChannel,
                "Taxa via",
                self.draft.fee_channel.label(),
                true,
            ));
            lines.push(self.input_line(FormField::Voucher, "Voucher", &self.voucher_input));
        }

        // Item picker line
        let options: Vec<_> = self.catalog.iter().collect();
        let picker = if options.is_empty() {
            "(cardápio vazio)".to_owned()
        } else {
            let idx = self.picker_option_idx.min(options.len() - 1);
            let option = options[idx];
            let size = option
                .sizes
                .get(self.picker_size_idx.min(option.sizes.len().saturating_sub(1)))
                .map_or_else(|| "-".into(), |s| format!("{} R$ {:.2}", s.label, s.price));
            format!(
                "◂ {} ▸  ({size})  x{}  [Enter adiciona]",
                option.name, self.picker_qty
            )
        };
        lines.push(self.field_line(FormField::Picker, "Adicionar", &picker, true));

        frame.render_widget(Paragraph::new(lines), area);
    }

    fn field_line<'a>(
        &self,
        field: FormField,
        label: &'a str,
        value: &str,
        enabled: bool,
    ) -> Line<'a> {
        let focused = self.field == field;
        let label_style = if focused {
            theme::field_focused()
        } else {
            theme::field_label()
        };
        let value_style = if enabled {
            Style::default().fg(if focused {
                theme::MINT
            } else {
                theme::DIM_WHITE
            })
        } else {
            theme::field_disabled()
        };
        let marker = if focused { "▸" } else { " " };
        Line::from(vec![
            Span::styled(format!(" {marker} {label:<10}"), label_style),
            Span::styled(value.to_owned(), value_style),
        ])
    }

    fn input_line<'a>(&self, field: FormField, label: &'a str, input: &Input) -> Line<'a> {
        let focused = self.field == field;
        let mut value = input.value().to_owned();
        if focused {
            value.push('▏');
        }
        self.field_line(field, label, &value, true)
    }

    fn render_items(&self, frame: &mut Frame, area: Rect) {
        let focused = self.field == FormField::Items;
        let header = Row::new(vec![
            Cell::from("Qtde").style(theme::table_header()),
            Cell::from("Opção").style(theme::table_header()),
            Cell::from("Tamanho").style(theme::table_header()),
            Cell::from("Subtotal").style(theme::table_header()),
        ]);

        let rows: Vec<Row> = self
            .draft
            .items()
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let style = if focused && i == self.item_sel {
                    theme::table_selected()
                } else {
                    theme::table_row()
                };
                Row::new(vec![
                    Cell::from(format!("{}x", item.quantity)),
                    Cell::from(item.option_name.clone()),
                    Cell::from(item.size_label.clone()),
                    Cell::from(format!("R$ {:.2}", item.subtotal())),
                ])
                .style(style)
            })
            .collect();

        let widths = [
            Constraint::Length(5),
            Constraint::Fill(2),
            Constraint::Fill(1),
            Constraint::Length(10),
        ];
        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(theme::border_default());
        frame.render_widget(Table::new(rows, widths).header(header).block(block), area);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let line = match self.draft.phase() {
            DraftPhase::Submitting => Line::from(Span::styled(
                "  enviando…",
                Style::default().fg(theme::TANGERINE),
            )),
            DraftPhase::Failed(message) => Line::from(Span::styled(
                format!("  ✗ {message}"),
                Style::default().fg(theme::ERROR_RED),
            )),
            _ => Line::from(vec![
                Span::styled("  Tab ", theme::key_hint_key()),
                Span::styled("campo  ", theme::key_hint()),
                Span::styled("◂▸ ", theme::key_hint_key()),
                Span::styled("valor  ", theme::key_hint()),
                Span::styled("Ctrl+S ", theme::key_hint_key()),
                Span::styled("confirmar  ", theme::key_hint()),
                Span::styled("Esc ", theme::key_hint_key()),
                Span::styled("cancelar", theme::key_hint()),
            ]),
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_confirmation(&self, frame: &mut Frame, area: Rect, booking_id: i64) {
        let mut lines = vec![
            Line::from(Span::styled(
                format!("  ✓ Agendamento #{booking_id} confirmado"),
                Style::default().fg(theme::SUCCESS_GREEN),
            )),
            Line::from(""),
        ];

        if let Some(customer) = self.draft.customer.as_ref() {
            match notify::compose_whatsapp(&self.draft, customer) {
                Ok(note) => {
                    for text in note.message.lines() {
                        lines.push(Line::from(format!("  {text}")));
                    }
                    lines.push(Line::from(""));
                    lines.push(Line::from(Span::styled(
                        "  Enviar pelo WhatsApp:",
                        theme::field_label(),
                    )));
                    lines.push(Line::from(Span::styled(
                        format!("  {}", note.url),
                        Style::default().fg(theme::SKY_BLUE),
                    )));
                }
                Err(e) => {
                    lines.push(Line::from(Span::styled(
                        format!("  WhatsApp indisponível: {e}"),
                        Style::default().fg(theme::TANGERINE),
                    )));
                }
            }
        }

        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("  Esc ", theme::key_hint_key()),
            Span::styled("fechar e atualizar a agenda", theme::key_hint()),
        ]));

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
    }
}

/// True for the left/right value-cycling keys.
fn is_cycle_key(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Left | KeyCode::Right)
}

/// Cycle an index within `len`, wrapping in either direction.
fn cycle(idx: usize, len: usize, backward: bool) -> usize {
    if backward {
        (idx + len - 1) % len
    } else {
        (idx + 1) % len
    }
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
