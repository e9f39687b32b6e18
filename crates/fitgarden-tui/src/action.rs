//! All possible UI actions. Actions are the sole mechanism for state mutation.

use std::sync::Arc;

use chrono::NaiveDate;

use fitgarden_core::agenda::DayBookings;
use fitgarden_core::{BookingDraft, BookingId, CatalogIndex, Customer, SettlementMethod};

use crate::screen::ScreenId;

/// Notification severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// A toast notification shown in the status bar.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Info,
        }
    }
}

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ────────────────────────────────────────────────
    SwitchScreen(ScreenId),

    // ── Backend requests (intercepted by the app, run on tasks) ───
    /// Fetch the given day's bookings.
    RefreshAgenda(NaiveDate),
    /// Fetch customers + menu catalog for the booking form.
    LoadReference,
    /// Delete a booking, then refetch the day.
    DeleteBooking(BookingId),
    /// Resolve a pending payment, then refetch the day.
    SettleBooking(BookingId, SettlementMethod),
    /// Run the submission adapter over a draft copy.
    SubmitDraft(Box<BookingDraft>),

    // ── Backend results ───────────────────────────────────────────
    BookingsLoaded(DayBookings),
    ReferenceLoaded {
        customers: Arc<Vec<Customer>>,
        catalog: Arc<CatalogIndex>,
    },
    /// The adapter finished; the returned draft carries the final phase
    /// (`Confirmed` or `Failed`), or its untouched state plus an error
    /// for synchronous validation rejections.
    DraftSettled {
        draft: Box<BookingDraft>,
        error: Option<String>,
    },
    /// A backend action (refresh/delete/settle/reference) failed.
    BackendFailed(String),

    // ── Notifications / help ──────────────────────────────────────
    Notify(Notification),
    DismissNotification,
    ToggleHelp,
}
