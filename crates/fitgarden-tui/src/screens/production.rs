//! Production screen — kitchen tally and delivery-route tally side by side.
//!
//! Both views are pure reductions over the day snapshot the agenda screen
//! already fetched; switching here never triggers a backend call.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table};

use fitgarden_core::agenda::{DayBookings, production_tally, route_tally};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

pub struct ProductionScreen {
    focused: bool,
    snapshot: DayBookings,
    loading: bool,
}

impl ProductionScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            snapshot: DayBookings::default(),
            loading: false,
        }
    }

    fn render_production(&self, frame: &mut Frame, area: Rect) {
        let tally = production_tally(&self.snapshot.bookings);

        let block = Block::default()
            .title(" Produção do dia ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if tally.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled("  nada a produzir", theme::table_row())),
                inner,
            );
            return;
        }

        let header = Row::new(vec![
            Cell::from("Qtde").style(theme::table_header()),
            Cell::from("Opção").style(theme::table_header()),
            Cell::from("Tamanho").style(theme::table_header()),
        ]);
        let rows: Vec<Row> = tally
            .iter()
            .map(|line| {
                Row::new(vec![
                    Cell::from(format!("{}x", line.quantity))
                        .style(Style::default().fg(theme::TANGERINE)),
                    Cell::from(line.option_name.clone()),
                    Cell::from(line.size_label.clone()),
                ])
                .style(theme::table_row())
            })
            .collect();

        let widths = [
            Constraint::Length(6),
            Constraint::Fill(2),
            Constraint::Fill(1),
        ];
        frame.render_widget(Table::new(rows, widths).header(header), inner);
    }

    fn render_route(&self, frame: &mut Frame, area: Rect) {
        let tally = route_tally(&self.snapshot.bookings);

        let block = Block::default()
            .title(" Rota de entregas ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if tally.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled("  nenhuma entrega", theme::table_row())),
                inner,
            );
            return;
        }

        let mut lines: Vec<Line> = Vec::new();
        for (zone, entries) in &tally {
            lines.push(Line::from(Span::styled(
                format!("▌ {}", zone.label()),
                Style::default().fg(theme::zone_color(Some(*zone))),
            )));
            for entry in entries {
                lines.push(Line::from(format!(
                    "   {}x {} ({})",
                    entry.quantity, entry.option_name, entry.size_label
                )));
            }
            lines.push(Line::from(""));
        }
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

impl Component for ProductionScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('r') => {
                self.loading = true;
                Ok(Some(Action::RefreshAgenda(self.snapshot.date)))
            }
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::BookingsLoaded(snapshot) => {
                self.snapshot = snapshot.clone();
                self.loading = false;
            }
            Action::BackendFailed(_) => {
                self.loading = false;
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let loading = if self.loading { " ⟳" } else { "" };
        let title = format!(
            " Produção — {}{loading} ",
            self.snapshot.date.format("%d/%m/%Y")
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

        let columns =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(inner);

        self.render_production(frame, columns[0]);
        self.render_route(frame, columns[1]);
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &'static str {
        "Production"
    }
}
