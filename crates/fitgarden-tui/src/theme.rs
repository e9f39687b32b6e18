//! Garden-at-night palette and semantic styling for the TUI.

use ratatui::style::{Color, Modifier, Style};

use fitgarden_core::Zone;

// ── Core Palette ──────────────────────────────────────────────────────

pub const LEAF_GREEN: Color = Color::Rgb(129, 199, 132); // #81c784
pub const MINT: Color = Color::Rgb(128, 255, 191); // #80ffbf
pub const TANGERINE: Color = Color::Rgb(255, 183, 77); // #ffb74d
pub const BERRY: Color = Color::Rgb(240, 98, 146); // #f06292
pub const SUCCESS_GREEN: Color = Color::Rgb(80, 250, 123); // #50fa7b
pub const ERROR_RED: Color = Color::Rgb(255, 99, 99); // #ff6363

// ── Extended Palette ──────────────────────────────────────────────────

pub const DIM_WHITE: Color = Color::Rgb(189, 193, 207); // #bdc1cf
pub const BORDER_GRAY: Color = Color::Rgb(98, 114, 164); // #6272a4
pub const BG_HIGHLIGHT: Color = Color::Rgb(40, 42, 54); // #282a36
pub const SKY_BLUE: Color = Color::Rgb(139, 233, 253); // #8be9fd
pub const LILAC: Color = Color::Rgb(189, 147, 249); // #bd93f9

// ── Zone color strip ──────────────────────────────────────────────────

/// Each delivery zone gets a fixed strip color in the agenda list.
pub fn zone_color(zone: Option<Zone>) -> Color {
    match zone {
        Some(Zone::Centro) => LEAF_GREEN,
        Some(Zone::Norte) => SKY_BLUE,
        Some(Zone::Sul) => TANGERINE,
        Some(Zone::Leste) => BERRY,
        Some(Zone::Oeste) => LILAC,
        Some(Zone::Outra) | None => BORDER_GRAY,
    }
}

// ── Semantic Styles ───────────────────────────────────────────────────

/// Title text for blocks/panels.
pub fn title_style() -> Style {
    Style::default().fg(MINT).add_modifier(Modifier::BOLD)
}

/// Border for a focused panel.
pub fn border_focused() -> Style {
    Style::default().fg(LEAF_GREEN)
}

/// Border for an unfocused panel.
pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Table header row.
pub fn table_header() -> Style {
    Style::default()
        .fg(MINT)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

/// Normal table row text.
pub fn table_row() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Selected / highlighted table row.
pub fn table_selected() -> Style {
    Style::default()
        .fg(LEAF_GREEN)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

/// Active tab in the tab bar.
pub fn tab_active() -> Style {
    Style::default().fg(LEAF_GREEN).add_modifier(Modifier::BOLD)
}

/// Inactive tab in the tab bar.
pub fn tab_inactive() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Label of the currently focused form field.
pub fn field_focused() -> Style {
    Style::default().fg(MINT).add_modifier(Modifier::BOLD)
}

/// Label of an unfocused form field.
pub fn field_label() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// A form field whose control is disabled (locked by policy or phase).
pub fn field_disabled() -> Style {
    Style::default().fg(BORDER_GRAY).add_modifier(Modifier::DIM)
}

/// Key hint text (e.g., "q quit  ? help").
pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Key hint key character.
pub fn key_hint_key() -> Style {
    Style::default().fg(MINT).add_modifier(Modifier::BOLD)
}
