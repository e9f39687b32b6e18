// ── Booking draft form state ──
//
// Owns every mutable field of an in-progress booking and its lifecycle.
// The draft never talks to the backend: the submission adapter
// (`crate::submit`) validates and ships it, and reports back through
// `begin_submit` / `confirm` / `fail`.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::model::{Booking, BookingId, CatalogIndex, Customer, DeliveryKind, OptionId, OrderId, SizeId, Zone};
use crate::payment::{FeeChannel, PaymentMethod};
use crate::schedule::TimeWindow;

/// Whether the draft creates a new booking or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftMode {
    Create,
    Edit {
        id: BookingId,
        /// Payment method of the stored booking, used to detect attempts
        /// to move an edit onto voucher/plan payment.
        original_payment: PaymentMethod,
    },
}

/// Identifiers returned by a successful submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitReceipt {
    pub booking_id: BookingId,
    /// Present for create; edits keep the original order.
    pub order_id: Option<OrderId>,
}

/// Explicit draft lifecycle.
///
/// Only `Empty`, `Editing`, and `Failed` accept field edits; `Submitting`
/// and `Confirmed` are terminal for the form until reset. This makes the
/// invalid combinations of ad-hoc open/saving/confirmed flags
/// unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftPhase {
    /// Fresh create dialog, nothing touched yet.
    Empty,
    Editing,
    /// A submission is in flight; the confirm control stays disabled.
    Submitting,
    Confirmed(SubmitReceipt),
    /// Submission failed; all fields are preserved for correction.
    Failed(String),
}

/// Which locked-down fields an edit dialog may still change.
///
/// The backend does not accept customer changes on an existing booking,
/// and payment moves onto voucher/plan are rejected; whether the form
/// even offers those controls is policy, not hard-coded disabling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditPolicy {
    pub allow_customer_change: bool,
    pub allow_payment_change: bool,
}

impl EditPolicy {
    /// The shipped product behavior: customer and payment are locked.
    pub fn locked() -> Self {
        Self {
            allow_customer_change: false,
            allow_payment_change: false,
        }
    }

    /// Everything editable (the submission adapter still enforces the
    /// backend's voucher/plan rule).
    pub fn permissive() -> Self {
        Self {
            allow_customer_change: true,
            allow_payment_change: true,
        }
    }
}

impl Default for EditPolicy {
    fn default() -> Self {
        Self::locked()
    }
}

/// One composed line of the draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    /// Locally generated id, stable across quantity edits.
    pub id: u64,
    pub option_id: OptionId,
    pub size_id: SizeId,
    pub option_name: String,
    pub size_label: String,
    /// Copied from the catalog when the line was added; never re-fetched.
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl LineItem {
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// The in-progress booking behind the create/edit dialog.
#[derive(Debug, Clone)]
pub struct BookingDraft {
    mode: DraftMode,
    policy: EditPolicy,
    phase: DraftPhase,

    pub kind: DeliveryKind,
    pub date: NaiveDate,
    pub window: TimeWindow,
    pub customer: Option<Customer>,
    pub address: String,
    pub zone: Option<Zone>,
    pub notes: String,
    pub payment: PaymentMethod,
    pub fee_channel: FeeChannel,
    pub voucher_code: String,

    items: Vec<LineItem>,
    next_item_id: u64,
}

impl BookingDraft {
    /// Fresh create-mode draft for the given delivery date.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            mode: DraftMode::Create,
            policy: EditPolicy::permissive(),
            phase: DraftPhase::Empty,
            kind: DeliveryKind::Entrega,
            date,
            window: TimeWindow::default(),
            customer: None,
            address: String::new(),
            zone: None,
            notes: String::new(),
            payment: PaymentMethod::Dinheiro,
            fee_channel: FeeChannel::default(),
            voucher_code: String::new(),
            items: Vec::new(),
            next_item_id: 1,
        }
    }

    /// Edit-mode draft pre-filled from an existing booking.
    pub fn edit(booking: &Booking, policy: EditPolicy) -> Self {
        let customer = Customer {
            id: booking.customer_id,
            name: booking.display_name(),
            phone: booking.customer_phone.clone(),
            address: booking.address.clone(),
            zone: booking.zone,
        };

        let mut next_item_id = 1;
        let items = booking
            .items
            .iter()
            .map(|item| {
                let line = LineItem {
                    id: next_item_id,
                    option_id: item.option_id,
                    size_id: item.size_id,
                    option_name: item.option_name.clone(),
                    size_label: item.size_label.clone(),
                    unit_price: item.unit_price,
                    quantity: item.quantity,
                };
                next_item_id += 1;
                line
            })
            .collect();

        Self {
            mode: DraftMode::Edit {
                id: booking.id,
                original_payment: booking.payment,
            },
            policy,
            phase: DraftPhase::Editing,
            kind: booking.kind,
            date: booking.date,
            window: booking.window.clone(),
            customer: Some(customer),
            address: booking.address.clone().unwrap_or_default(),
            zone: booking.zone,
            notes: booking.notes.clone().unwrap_or_default(),
            payment: booking.payment,
            fee_channel: FeeChannel::default(),
            voucher_code: booking.voucher_code.clone().unwrap_or_default(),
            items,
            next_item_id,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn mode(&self) -> &DraftMode {
        &self.mode
    }

    pub fn phase(&self) -> &DraftPhase {
        &self.phase
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Whether field edits are currently accepted.
    pub fn editable(&self) -> bool {
        matches!(
            self.phase,
            DraftPhase::Empty | DraftPhase::Editing | DraftPhase::Failed(_)
        )
    }

    /// Whether a submission is in flight (confirm control disabled).
    pub fn is_busy(&self) -> bool {
        self.phase == DraftPhase::Submitting
    }

    /// Derived total: Σ unit price × quantity.
    pub fn total(&self) -> Decimal {
        self.items.iter().map(LineItem::subtotal).sum()
    }

    // ── Field setters ────────────────────────────────────────────────

    fn touch(&mut self) {
        self.phase = DraftPhase::Editing;
    }

    pub fn set_kind(&mut self, kind: DeliveryKind) {
        if self.editable() {
            self.kind = kind;
            self.touch();
        }
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        if self.editable() {
            self.date = date;
            self.touch();
        }
    }

    pub fn set_window(&mut self, window: TimeWindow) {
        if self.editable() {
            self.window = window;
            self.touch();
        }
    }

    /// Select the customer. Also seeds address and zone from the
    /// customer's defaults when the draft has none yet.
    pub fn set_customer(&mut self, customer: Customer) {
        if !self.editable() || !self.customer_changeable() {
            return;
        }
        if self.address.is_empty() {
            if let Some(ref addr) = customer.address {
                self.address.clone_from(addr);
            }
        }
        if self.zone.is_none() {
            self.zone = customer.zone;
        }
        self.customer = Some(customer);
        self.touch();
    }

    pub fn set_address(&mut self, address: impl Into<String>) {
        if self.editable() {
            self.address = address.into();
            self.touch();
        }
    }

    pub fn set_zone(&mut self, zone: Option<Zone>) {
        if self.editable() {
            self.zone = zone;
            self.touch();
        }
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        if self.editable() {
            self.notes = notes.into();
            self.touch();
        }
    }

    pub fn set_payment(&mut self, payment: PaymentMethod) {
        if self.editable() && self.payment_changeable() {
            self.payment = payment;
            self.touch();
        }
    }

    pub fn set_fee_channel(&mut self, channel: FeeChannel) {
        if self.editable() {
            self.fee_channel = channel;
            self.touch();
        }
    }

    pub fn set_voucher_code(&mut self, code: impl Into<String>) {
        if self.editable() {
            self.voucher_code = code.into();
            self.touch();
        }
    }

    /// Whether the customer picker is enabled under the edit policy.
    pub fn customer_changeable(&self) -> bool {
        match self.mode {
            DraftMode::Create => true,
            DraftMode::Edit { .. } => self.policy.allow_customer_change,
        }
    }

    /// Whether the payment selector is enabled under the edit policy.
    pub fn payment_changeable(&self) -> bool {
        match self.mode {
            DraftMode::Create => true,
            DraftMode::Edit { .. } => self.policy.allow_payment_change,
        }
    }

    // ── Line-item composer ───────────────────────────────────────────

    /// Add a line for an option + size + quantity combination.
    ///
    /// Silently rejects unknown option/size pairs; quantity is clamped to
    /// at least 1. The unit price is copied from the catalog.
    pub fn add_item(
        &mut self,
        catalog: &CatalogIndex,
        option_id: OptionId,
        size_id: SizeId,
        quantity: u32,
    ) {
        if !self.editable() {
            return;
        }
        let Some((option, size)) = catalog.size(option_id, size_id) else {
            return;
        };
        let line = LineItem {
            id: self.next_item_id,
            option_id,
            size_id,
            option_name: option.name.clone(),
            size_label: size.label.clone(),
            unit_price: size.price,
            quantity: quantity.max(1),
        };
        self.next_item_id += 1;
        self.items.push(line);
        self.touch();
    }

    /// Remove a line by its local id.
    pub fn remove_item(&mut self, id: u64) {
        if !self.editable() {
            return;
        }
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        if self.items.len() != before {
            self.touch();
        }
    }

    /// Adjust a line's quantity by a delta, never dropping below 1.
    pub fn change_quantity(&mut self, id: u64, delta: i32) {
        if !self.editable() {
            return;
        }
        if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            let adjusted = i64::from(item.quantity) + i64::from(delta);
            item.quantity = u32::try_from(adjusted.max(1)).unwrap_or(u32::MAX);
            self.touch();
        }
    }

    /// Return every field to its default and restart as a create draft
    /// for the same date.
    pub fn reset(&mut self) {
        *self = Self::new(self.date);
    }

    // ── Lifecycle ────────────────────────────────────────────────────
    //
    // Normally driven by the submission adapter. A UI that runs the
    // adapter on a detached task mirrors `begin_submit` on its own copy
    // so the confirm control disables immediately.

    pub fn begin_submit(&mut self) {
        self.phase = DraftPhase::Submitting;
    }

    pub fn confirm(&mut self, receipt: SubmitReceipt) {
        self.phase = DraftPhase::Confirmed(receipt);
    }

    pub fn fail(&mut self, message: String) {
        self.phase = DraftPhase::Failed(message);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{MenuOption, SizeVariant};
    use pretty_assertions::assert_eq;

    fn catalog() -> CatalogIndex {
        CatalogIndex::new(vec![MenuOption {
            id: OptionId::new(7),
            name: "Fit".into(),
            description: None,
            active: true,
            sizes: vec![
                SizeVariant {
                    id: SizeId::new(2),
                    label: "350g".into(),
                    price: "19.90".parse().unwrap(),
                },
                SizeVariant {
                    id: SizeId::new(3),
                    label: "500g".into(),
                    price: "24.50".parse().unwrap(),
                },
            ],
        }])
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 21).unwrap()
    }

    #[test]
    fn add_item_copies_price_from_catalog() {
        let mut draft = BookingDraft::new(date());
        draft.add_item(&catalog(), OptionId::new(7), SizeId::new(2), 2);

        let items = draft.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].option_name, "Fit");
        assert_eq!(items[0].unit_price, "19.90".parse().unwrap());
        assert_eq!(draft.total(), "39.80".parse().unwrap());
    }

    #[test]
    fn add_item_rejects_unknown_option_silently() {
        let mut draft = BookingDraft::new(date());
        draft.add_item(&catalog(), OptionId::new(99), SizeId::new(2), 1);
        draft.add_item(&catalog(), OptionId::new(7), SizeId::new(99), 1);
        assert!(draft.items().is_empty());
        assert_eq!(*draft.phase(), DraftPhase::Empty);
    }

    #[test]
    fn change_quantity_clamps_at_one() {
        let mut draft = BookingDraft::new(date());
        draft.add_item(&catalog(), OptionId::new(7), SizeId::new(2), 3);
        let id = draft.items()[0].id;

        draft.change_quantity(id, -1);
        assert_eq!(draft.items()[0].quantity, 2);

        // Cumulative negative deltas never push below 1.
        draft.change_quantity(id, -10);
        assert_eq!(draft.items()[0].quantity, 1);
        draft.change_quantity(id, -1);
        assert_eq!(draft.items()[0].quantity, 1);
    }

    #[test]
    fn remove_item_drops_only_the_named_line() {
        let mut draft = BookingDraft::new(date());
        draft.add_item(&catalog(), OptionId::new(7), SizeId::new(2), 1);
        draft.add_item(&catalog(), OptionId::new(7), SizeId::new(3), 1);
        let first = draft.items()[0].id;

        draft.remove_item(first);
        assert_eq!(draft.items().len(), 1);
        assert_eq!(draft.items()[0].size_label, "500g");
    }

    #[test]
    fn setters_are_ignored_while_submitting() {
        let mut draft = BookingDraft::new(date());
        draft.set_address("Rua A, 100");
        draft.begin_submit();

        draft.set_address("Rua B, 200");
        draft.add_item(&catalog(), OptionId::new(7), SizeId::new(2), 1);
        assert_eq!(draft.address, "Rua A, 100");
        assert!(draft.items().is_empty());
        assert!(draft.is_busy());
    }

    #[test]
    fn failed_draft_is_editable_again() {
        let mut draft = BookingDraft::new(date());
        draft.begin_submit();
        draft.fail("erro".into());

        draft.set_address("Rua A, 100");
        assert_eq!(draft.address, "Rua A, 100");
        assert_eq!(*draft.phase(), DraftPhase::Editing);
    }

    #[test]
    fn reset_returns_to_defaults() {
        let mut draft = BookingDraft::new(date());
        draft.set_notes("sem cebola");
        draft.add_item(&catalog(), OptionId::new(7), SizeId::new(2), 1);

        draft.reset();
        assert_eq!(*draft.phase(), DraftPhase::Empty);
        assert!(draft.items().is_empty());
        assert!(draft.notes.is_empty());
        assert_eq!(draft.date, date());
    }

    #[test]
    fn selecting_customer_seeds_address_and_zone() {
        let mut draft = BookingDraft::new(date());
        draft.set_customer(Customer {
            id: crate::model::CustomerId::new(41),
            name: "Maria".into(),
            phone: Some("43999998888".into()),
            address: Some("Rua A, 100".into()),
            zone: Some(Zone::Centro),
        });

        assert_eq!(draft.address, "Rua A, 100");
        assert_eq!(draft.zone, Some(Zone::Centro));
    }

    #[test]
    fn locked_edit_policy_freezes_customer_and_payment() {
        let booking = sample_booking();
        let mut draft = BookingDraft::edit(&booking, EditPolicy::locked());

        draft.set_payment(PaymentMethod::Pix);
        assert_eq!(draft.payment, PaymentMethod::Dinheiro);

        draft.set_customer(Customer {
            id: crate::model::CustomerId::new(99),
            name: "Outro".into(),
            phone: None,
            address: None,
            zone: None,
        });
        assert_eq!(draft.customer.as_ref().unwrap().name, "Maria");
    }

    #[test]
    fn edit_prefills_every_field() {
        let booking = sample_booking();
        let draft = BookingDraft::edit(&booking, EditPolicy::locked());

        assert_eq!(*draft.phase(), DraftPhase::Editing);
        assert_eq!(draft.kind, DeliveryKind::Entrega);
        assert_eq!(draft.address, "Rua A, 100");
        assert_eq!(draft.items().len(), 1);
        assert_eq!(draft.items()[0].quantity, 2);
        assert!(matches!(draft.mode(), DraftMode::Edit { .. }));
    }

    fn sample_booking() -> Booking {
        Booking {
            id: BookingId::new(55),
            order_id: Some(crate::model::OrderId::new(912)),
            customer_id: crate::model::CustomerId::new(41),
            customer_name: Some("Maria".into()),
            customer_phone: Some("43999998888".into()),
            kind: DeliveryKind::Entrega,
            date: date(),
            window: TimeWindow::default(),
            address: Some("Rua A, 100".into()),
            zone: Some(Zone::Centro),
            notes: None,
            payment: PaymentMethod::Dinheiro,
            voucher_code: None,
            settled: false,
            items: vec![crate::model::BookingItem {
                option_id: OptionId::new(7),
                size_id: SizeId::new(2),
                option_name: "Fit".into(),
                size_label: "350g".into(),
                unit_price: "19.90".parse().unwrap(),
                quantity: 2,
            }],
        }
    }
}
