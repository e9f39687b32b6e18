// ── Wire-to-domain conversions ──
//
// Bridges raw `fitgarden_api` records into canonical domain types. This is
// the single typed boundary for backend data: every `From` impl normalizes
// field shapes, parses strings into strong types, and fills lenient
// defaults for missing or unknown optional data so one malformed record
// cannot poison a whole page.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

use fitgarden_api::models::{
    BookingItemRecord, BookingRecord, CustomerRecord, MenuOptionRecord, SizeRecord,
};

use crate::model::{
    Booking, BookingId, BookingItem, Customer, CustomerId, DeliveryKind, MenuOption, OptionId,
    OrderId, SizeId, SizeVariant, Zone,
};
use crate::payment::PaymentMethod;
use crate::schedule::TimeWindow;

// ── Helpers ────────────────────────────────────────────────────────

/// Parse a "YYYY-MM-DD" wire date, falling back to the epoch date so a
/// malformed record is visible rather than dropped.
fn parse_date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap_or_default()
}

/// Wire money arrives as a JSON number; prices are amounts with two
/// decimal places.
fn parse_money(raw: f64) -> Decimal {
    Decimal::from_f64(raw).unwrap_or_default().round_dp(2)
}

/// Empty strings from the backend count as absent.
fn non_empty(raw: Option<String>) -> Option<String> {
    raw.filter(|s| !s.trim().is_empty())
}

fn parse_zone(raw: Option<&String>) -> Option<Zone> {
    non_empty(raw.cloned()).map(|s| s.parse().unwrap_or(Zone::Outra))
}

// ── Booking ────────────────────────────────────────────────────────

impl From<BookingItemRecord> for BookingItem {
    fn from(r: BookingItemRecord) -> Self {
        BookingItem {
            option_id: OptionId::new(r.opcao_id),
            size_id: SizeId::new(r.tamanho_id),
            option_name: r.opcao_nome.unwrap_or_else(|| format!("opção #{}", r.opcao_id)),
            size_label: r.tamanho_rotulo.unwrap_or_default(),
            unit_price: parse_money(r.preco_unitario),
            quantity: r.quantidade.max(1),
        }
    }
}

impl From<BookingRecord> for Booking {
    fn from(r: BookingRecord) -> Self {
        let window = r
            .faixa_horario
            .as_deref()
            .map_or_else(TimeWindow::default, TimeWindow::parse);

        let kind = r.tipo.parse().unwrap_or(DeliveryKind::Entrega);

        Booking {
            id: BookingId::new(r.id),
            order_id: r.pedido_id.map(OrderId::new),
            customer_id: CustomerId::new(r.cliente_id),
            customer_name: non_empty(r.cliente_nome),
            customer_phone: non_empty(r.cliente_telefone),
            kind,
            date: parse_date(&r.data),
            window,
            address: non_empty(r.endereco),
            zone: parse_zone(r.regiao.as_ref()),
            notes: non_empty(r.observacoes),
            payment: PaymentMethod::from_wire(&r.forma_pagamento),
            voucher_code: non_empty(r.voucher_codigo),
            settled: r.pagamento_finalizado.unwrap_or(false),
            items: r.itens.into_iter().map(BookingItem::from).collect(),
        }
    }
}

// ── Reference data ─────────────────────────────────────────────────

impl From<CustomerRecord> for Customer {
    fn from(r: CustomerRecord) -> Self {
        Customer {
            id: CustomerId::new(r.id),
            name: r.nome,
            phone: non_empty(r.telefone),
            address: non_empty(r.endereco),
            zone: parse_zone(r.regiao.as_ref()),
        }
    }
}

impl From<SizeRecord> for SizeVariant {
    fn from(r: SizeRecord) -> Self {
        SizeVariant {
            id: SizeId::new(r.id),
            label: r.rotulo,
            price: parse_money(r.preco),
        }
    }
}

impl From<MenuOptionRecord> for MenuOption {
    fn from(r: MenuOptionRecord) -> Self {
        MenuOption {
            id: OptionId::new(r.id),
            name: r.nome,
            description: non_empty(r.descricao),
            active: r.ativo,
            sizes: r.tamanhos.into_iter().map(SizeVariant::from).collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record() -> BookingRecord {
        BookingRecord {
            id: 55,
            pedido_id: Some(912),
            cliente_id: 41,
            cliente_nome: Some("Maria".into()),
            cliente_telefone: Some("43999998888".into()),
            tipo: "ENTREGA".into(),
            data: "2025-07-21".into(),
            faixa_horario: Some("13-15".into()),
            endereco: Some("Rua A, 100".into()),
            regiao: Some("CENTRO".into()),
            observacoes: Some("  ".into()),
            forma_pagamento: "VOUCHER_TAXA_PIX".into(),
            voucher_codigo: Some("BEMVINDA10".into()),
            pagamento_finalizado: None,
            itens: vec![BookingItemRecord {
                opcao_id: 7,
                tamanho_id: 2,
                opcao_nome: Some("Fit".into()),
                tamanho_rotulo: Some("350g".into()),
                preco_unitario: 19.90,
                quantidade: 2,
            }],
        }
    }

    #[test]
    fn booking_conversion_parses_strong_types() {
        let booking = Booking::from(record());

        assert_eq!(booking.id, BookingId::new(55));
        assert_eq!(booking.date, NaiveDate::from_ymd_opt(2025, 7, 21).unwrap());
        assert_eq!(booking.window, TimeWindow::new("13:00", "15:00"));
        assert_eq!(booking.kind, DeliveryKind::Entrega);
        assert_eq!(booking.zone, Some(Zone::Centro));
        assert_eq!(booking.payment, PaymentMethod::Voucher);
        assert_eq!(booking.total(), "39.80".parse::<Decimal>().unwrap());
    }

    #[test]
    fn blank_notes_become_none() {
        assert_eq!(Booking::from(record()).notes, None);
    }

    #[test]
    fn unknown_zone_maps_to_outra() {
        let mut r = record();
        r.regiao = Some("ZONA_RURAL".into());
        assert_eq!(Booking::from(r).zone, Some(Zone::Outra));
    }

    #[test]
    fn missing_window_uses_default() {
        let mut r = record();
        r.faixa_horario = None;
        assert_eq!(Booking::from(r).window, TimeWindow::default());
    }

    #[test]
    fn money_is_rounded_to_cents() {
        assert_eq!(parse_money(19.899_999_999_9), "19.90".parse::<Decimal>().unwrap());
    }
}
