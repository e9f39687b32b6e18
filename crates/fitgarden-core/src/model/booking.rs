// ── Booking domain types ──

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ids::{BookingId, CustomerId, OptionId, OrderId, SizeId};
use crate::payment::PaymentMethod;
use crate::schedule::TimeWindow;

/// How the order reaches the customer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryKind {
    /// Delivered to the customer's address.
    Entrega,
    /// Picked up at the kitchen.
    Retirada,
}

impl DeliveryKind {
    /// Human label, pt-BR.
    pub fn label(self) -> &'static str {
        match self {
            Self::Entrega => "Entrega",
            Self::Retirada => "Retirada",
        }
    }
}

/// Delivery zone, used for routing and list color-coding.
///
/// Unknown wire values map to [`Zone::Outra`] instead of failing conversion.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Zone {
    Centro,
    Norte,
    Sul,
    Leste,
    Oeste,
    Outra,
}

impl Zone {
    /// Human label, pt-BR.
    pub fn label(self) -> &'static str {
        match self {
            Self::Centro => "Centro",
            Self::Norte => "Zona Norte",
            Self::Sul => "Zona Sul",
            Self::Leste => "Zona Leste",
            Self::Oeste => "Zona Oeste",
            Self::Outra => "Outra",
        }
    }
}

/// One line of a booking: an option + size tier, quantity, and the unit
/// price as it was when the line was composed (never re-fetched).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingItem {
    pub option_id: OptionId,
    pub size_id: SizeId,
    pub option_name: String,
    pub size_label: String,
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl BookingItem {
    /// Line subtotal: unit price × quantity.
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// The canonical booking, as shown in the day agenda.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub order_id: Option<OrderId>,

    // Customer (id + denormalized display data)
    pub customer_id: CustomerId,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,

    // Scheduling
    pub kind: DeliveryKind,
    pub date: NaiveDate,
    pub window: TimeWindow,
    pub address: Option<String>,
    pub zone: Option<Zone>,
    pub notes: Option<String>,

    // Payment
    pub payment: PaymentMethod,
    pub voucher_code: Option<String>,
    pub settled: bool,

    pub items: Vec<BookingItem>,
}

impl Booking {
    /// Order total: sum of line subtotals.
    pub fn total(&self) -> Decimal {
        self.items.iter().map(BookingItem::subtotal).sum()
    }

    /// Display name for lists: customer name or the id as fallback.
    pub fn display_name(&self) -> String {
        self.customer_name
            .clone()
            .unwrap_or_else(|| format!("cliente #{}", self.customer_id))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn item(price: &str, quantity: u32) -> BookingItem {
        BookingItem {
            option_id: OptionId::new(1),
            size_id: SizeId::new(1),
            option_name: "Fit".into(),
            size_label: "350g".into(),
            unit_price: price.parse::<Decimal>().unwrap(),
            quantity,
        }
    }

    #[test]
    fn subtotal_multiplies_price_by_quantity() {
        assert_eq!(item("19.90", 2).subtotal(), "39.80".parse::<Decimal>().unwrap());
    }

    #[test]
    fn total_sums_all_lines() {
        let booking = Booking {
            id: BookingId::new(1),
            order_id: None,
            customer_id: CustomerId::new(1),
            customer_name: Some("Maria".into()),
            customer_phone: None,
            kind: DeliveryKind::Entrega,
            date: NaiveDate::from_ymd_opt(2025, 7, 21).unwrap(),
            window: TimeWindow::default(),
            address: Some("Rua A, 100".into()),
            zone: Some(Zone::Centro),
            notes: None,
            payment: PaymentMethod::Dinheiro,
            voucher_code: None,
            settled: false,
            items: vec![item("19.90", 2), item("24.50", 1)],
        };
        assert_eq!(booking.total(), "64.30".parse::<Decimal>().unwrap());
    }

    #[test]
    fn delivery_kind_wire_names() {
        assert_eq!(DeliveryKind::Entrega.to_string(), "ENTREGA");
        assert_eq!("RETIRADA".parse::<DeliveryKind>().unwrap(), DeliveryKind::Retirada);
    }

    #[test]
    fn zone_wire_names() {
        assert_eq!(Zone::Oeste.to_string(), "OESTE");
        assert_eq!("CENTRO".parse::<Zone>().unwrap(), Zone::Centro);
    }
}
