//! Business logic between `fitgarden-api` and the UI consumers (CLI / TUI).
//!
//! This crate owns the domain model and the booking workflow for the
//! FitGarden back-office workspace:
//!
//! - **[`BookingDraft`]** — Form state for composing or editing a booking.
//!   All field setters, the line-item composer, and the explicit
//!   [`DraftPhase`] lifecycle (`Empty → Editing → Submitting → Confirmed`,
//!   with `Failed` preserving the draft for correction) live here. No
//!   backend calls.
//!
//! - **[`submit`]** — The submission adapter. Validates draft completeness,
//!   builds the create/update payload, and drives it through the injected
//!   [`BookingBackend`](submit::BookingBackend) port.
//!
//! - **[`notify`]** — Composes the WhatsApp confirmation message and the
//!   `wa.me` deep link, including phone-number normalization.
//!
//! - **[`AgendaService`]** — Fetches a day's bookings, publishes the
//!   snapshot through a `watch` channel, and derives the kitchen-production
//!   and delivery-route tallies purely in memory.
//!
//! - **Domain model** ([`model`]) — Canonical types (`Booking`, `Customer`,
//!   `MenuOption`, payment enums, delivery zones) converted from the raw
//!   wire records at a single typed boundary ([`convert`]).

pub mod agenda;
pub mod config;
pub mod convert;
pub mod draft;
pub mod error;
pub mod model;
pub mod notify;
pub mod payment;
pub mod schedule;
pub mod submit;

// ── Primary re-exports ──────────────────────────────────────────────
pub use agenda::{AgendaService, DayBookings};
pub use config::{BackendConfig, TlsVerification};
pub use draft::{BookingDraft, DraftMode, DraftPhase, EditPolicy, LineItem, SubmitReceipt};
pub use error::CoreError;
pub use payment::{FeeChannel, PaymentMethod, SettlementMethod};
pub use schedule::TimeWindow;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    Booking,
    BookingId,
    BookingItem,
    CatalogIndex,
    Customer,
    CustomerId,
    DeliveryKind,
    MenuOption,
    OptionId,
    OrderId,
    SizeId,
    SizeVariant,
    Zone,
};
