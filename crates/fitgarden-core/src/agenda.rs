// ── Day agenda service ──
//
// Owns the "bookings of the day" snapshot. Fetches on demand (date change,
// post-delete, post-settle), publishes through a `watch` channel so the
// TUI re-renders, and derives the kitchen/route tallies purely from the
// already-fetched list. There is no background refresh: every fetch is a
// single user-initiated action.

use std::sync::Arc;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;
use tokio::sync::watch;
use tracing::debug;

use fitgarden_api::ApiClient;

use crate::error::CoreError;
use crate::model::{Booking, BookingId, CatalogIndex, Customer, DeliveryKind, MenuOption, Zone};
use crate::payment::SettlementMethod;

const PAGE_SIZE: u32 = 100;

/// The published snapshot: one day's bookings, fetch order normalized.
#[derive(Debug, Clone)]
pub struct DayBookings {
    pub date: NaiveDate,
    pub bookings: Arc<Vec<Booking>>,
}

impl Default for DayBookings {
    fn default() -> Self {
        Self {
            date: NaiveDate::default(),
            bookings: Arc::new(Vec::new()),
        }
    }
}

/// Facade over the backend for the agenda screens and commands.
pub struct AgendaService {
    api: Arc<ApiClient>,
    snapshot: watch::Sender<DayBookings>,
}

impl AgendaService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        let (snapshot, _) = watch::channel(DayBookings::default());
        Self { api, snapshot }
    }

    /// The underlying API client (also the submission adapter's backend).
    pub fn api(&self) -> &Arc<ApiClient> {
        &self.api
    }

    /// Subscribe to snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<DayBookings> {
        self.snapshot.subscribe()
    }

    /// The current snapshot (cheap clone, bookings behind an `Arc`).
    pub fn current(&self) -> DayBookings {
        self.snapshot.borrow().clone()
    }

    /// Fetch the given day's bookings and publish the new snapshot.
    #[allow(clippy::as_conversions)]
    pub async fn refresh(&self, date: NaiveDate) -> Result<DayBookings, CoreError> {
        let date_str = date.format("%Y-%m-%d").to_string();
        let mut bookings: Vec<Booking> = Vec::new();
        let mut page = 1;
        loop {
            let resp = self.api.list_bookings(&date_str, page, PAGE_SIZE).await?;
            let fetched = resp.data.len();
            bookings.extend(resp.data.into_iter().map(Booking::from));
            if fetched < PAGE_SIZE as usize {
                break;
            }
            page += 1;
        }
        sort_day(&mut bookings);
        debug!(date = %date_str, count = bookings.len(), "agenda refreshed");

        let snap = DayBookings {
            date,
            bookings: Arc::new(bookings),
        };
        self.snapshot.send_replace(snap.clone());
        Ok(snap)
    }

    /// Delete a booking, then refetch the current day.
    pub async fn delete(&self, id: BookingId) -> Result<(), CoreError> {
        self.api.delete_booking(id.value()).await?;
        let date = self.current().date;
        self.refresh(date).await?;
        Ok(())
    }

    /// Resolve a pending payment, then refetch the current day.
    pub async fn settle(&self, id: BookingId, method: SettlementMethod) -> Result<(), CoreError> {
        self.api
            .settle_payment(id.value(), &method.to_string())
            .await?;
        let date = self.current().date;
        self.refresh(date).await?;
        Ok(())
    }

    /// Fetch all customers (reference data for the booking form).
    #[allow(clippy::as_conversions)]
    pub async fn fetch_customers(&self) -> Result<Vec<Customer>, CoreError> {
        let mut customers: Vec<Customer> = Vec::new();
        let mut page = 1;
        loop {
            let resp = self.api.list_customers(page, PAGE_SIZE).await?;
            let fetched = resp.data.len();
            customers.extend(resp.data.into_iter().map(Customer::from));
            if fetched < PAGE_SIZE as usize {
                break;
            }
            page += 1;
        }
        Ok(customers)
    }

    /// Fetch the active menu catalog (reference data for the item composer).
    #[allow(clippy::as_conversions)]
    pub async fn fetch_catalog(&self) -> Result<CatalogIndex, CoreError> {
        let mut options: Vec<MenuOption> = Vec::new();
        let mut page = 1;
        loop {
            let resp = self.api.list_menu_options(page, PAGE_SIZE).await?;
            let fetched = resp.data.len();
            options.extend(
                resp.data
                    .into_iter()
                    .map(MenuOption::from)
                    .filter(|o| o.active),
            );
            if fetched < PAGE_SIZE as usize {
                break;
            }
            page += 1;
        }
        Ok(CatalogIndex::new(options))
    }
}

/// Day lists render earliest window first; ties keep backend id order.
fn sort_day(bookings: &mut [Booking]) {
    bookings.sort_by(|a, b| {
        a.window
            .start
            .cmp(&b.window.start)
            .then_with(|| a.id.cmp(&b.id))
    });
}

// ── In-memory tallies ────────────────────────────────────────────────

/// One aggregated production line: how many of an option+size the kitchen
/// must prepare.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductionLine {
    pub option_name: String,
    pub size_label: String,
    pub quantity: u32,
}

/// Tally every line item of the day, in first-seen order.
///
/// A pure reduction over the already-fetched list; no backend calls.
pub fn production_tally(bookings: &[Booking]) -> Vec<ProductionLine> {
    let mut acc: IndexMap<(String, String), u32> = IndexMap::new();
    for booking in bookings {
        for item in &booking.items {
            *acc.entry((item.option_name.clone(), item.size_label.clone()))
                .or_insert(0) += item.quantity;
        }
    }
    acc.into_iter()
        .map(|((option_name, size_label), quantity)| ProductionLine {
            option_name,
            size_label,
            quantity,
        })
        .collect()
}

/// Per-zone tally of delivery bookings only, for route planning.
///
/// Pickups don't ride a route; bookings without a zone land in
/// [`Zone::Outra`].
pub fn route_tally(bookings: &[Booking]) -> IndexMap<Zone, Vec<ProductionLine>> {
    let mut acc: IndexMap<Zone, IndexMap<(String, String), u32>> = IndexMap::new();
    for booking in bookings {
        if booking.kind != DeliveryKind::Entrega {
            continue;
        }
        let zone = booking.zone.unwrap_or(Zone::Outra);
        let per_zone = acc.entry(zone).or_default();
        for item in &booking.items {
            *per_zone
                .entry((item.option_name.clone(), item.size_label.clone()))
                .or_insert(0) += item.quantity;
        }
    }
    acc.into_iter()
        .map(|(zone, lines)| {
            let lines = lines
                .into_iter()
                .map(|((option_name, size_label), quantity)| ProductionLine {
                    option_name,
                    size_label,
                    quantity,
                })
                .collect();
            (zone, lines)
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{BookingItem, CustomerId, OptionId, SizeId};
    use crate::payment::PaymentMethod;
    use crate::schedule::TimeWindow;
    use pretty_assertions::assert_eq;

    fn booking(
        id: i64,
        kind: DeliveryKind,
        zone: Option<Zone>,
        window: &str,
        items: Vec<(&str, &str, u32)>,
    ) -> Booking {
        Booking {
            id: BookingId::new(id),
            order_id: None,
            customer_id: CustomerId::new(1),
            customer_name: None,
            customer_phone: None,
            kind,
            date: NaiveDate::from_ymd_opt(2025, 7, 21).unwrap(),
            window: TimeWindow::parse(window),
            address: None,
            zone,
            notes: None,
            payment: PaymentMethod::Dinheiro,
            voucher_code: None,
            settled: false,
            items: items
                .into_iter()
                .map(|(option, size, quantity)| BookingItem {
                    option_id: OptionId::new(1),
                    size_id: SizeId::new(1),
                    option_name: option.into(),
                    size_label: size.into(),
                    unit_price: "10.00".parse().unwrap(),
                    quantity,
                })
                .collect(),
        }
    }

    #[test]
    fn production_tally_sums_across_bookings() {
        let bookings = vec![
            booking(1, DeliveryKind::Entrega, Some(Zone::Centro), "11-13", vec![
                ("Fit", "350g", 2),
                ("Low Carb", "500g", 1),
            ]),
            booking(2, DeliveryKind::Retirada, None, "13-15", vec![("Fit", "350g", 3)]),
        ];

        let tally = production_tally(&bookings);

        assert_eq!(
            tally,
            vec![
                ProductionLine {
                    option_name: "Fit".into(),
                    size_label: "350g".into(),
                    quantity: 5,
                },
                ProductionLine {
                    option_name: "Low Carb".into(),
                    size_label: "500g".into(),
                    quantity: 1,
                },
            ]
        );
    }

    #[test]
    fn route_tally_skips_pickups_and_buckets_by_zone() {
        let bookings = vec![
            booking(1, DeliveryKind::Entrega, Some(Zone::Centro), "11-13", vec![
                ("Fit", "350g", 2),
            ]),
            booking(2, DeliveryKind::Entrega, None, "13-15", vec![("Fit", "350g", 1)]),
            booking(3, DeliveryKind::Retirada, Some(Zone::Sul), "13-15", vec![
                ("Fit", "350g", 9),
            ]),
        ];

        let tally = route_tally(&bookings);

        assert_eq!(tally.len(), 2);
        assert_eq!(tally[&Zone::Centro][0].quantity, 2);
        // Zoneless deliveries still ride a route.
        assert_eq!(tally[&Zone::Outra][0].quantity, 1);
        assert!(!tally.contains_key(&Zone::Sul));
    }

    #[test]
    fn day_sorts_by_window_start_then_id() {
        let mut bookings = vec![
            booking(9, DeliveryKind::Entrega, None, "18-20", vec![]),
            booking(5, DeliveryKind::Entrega, None, "11-13", vec![]),
            booking(3, DeliveryKind::Entrega, None, "11-13", vec![]),
        ];
        sort_day(&mut bookings);

        let ids: Vec<i64> = bookings.iter().map(|b| b.id.value()).collect();
        assert_eq!(ids, vec![3, 5, 9]);
    }
}
