// ── WhatsApp confirmation composer ──
//
// Builds the pt-BR order summary and the wa.me click-to-chat link for a
// confirmed booking. Everything here is pure: callers decide whether the
// URL is printed, displayed, or handed to a browser.
//
// The message template and the phone-digit normalization are exact
// contracts — WhatsApp's URL scheme only accepts full international
// numbers, and the kitchen reads these messages all day.

use std::fmt::Write as _;

use url::Url;

use crate::draft::BookingDraft;
use crate::error::CoreError;
use crate::model::Customer;

/// A ready-to-open WhatsApp notification.
#[derive(Debug, Clone)]
pub struct WhatsAppNotification {
    /// Full international number, digits only (e.g. "5543999998888").
    pub phone: String,
    /// The plain-text message before URL encoding.
    pub message: String,
    /// `https://wa.me/<digits>?text=<urlencoded message>`
    pub url: Url,
}

/// Normalize a phone number to the digit string wa.me requires.
///
/// Strips every non-digit; a 10–11 digit local number (DDD + line) gets
/// the country code 55 prefixed; numbers already starting with 55 and at
/// least 12 digits long pass through unchanged.
pub fn normalize_phone_for_wa_me(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.starts_with("55") && digits.len() >= 12 {
        return digits;
    }
    if (10..=11).contains(&digits.len()) {
        return format!("55{digits}");
    }
    digits
}

/// Compose the fixed pt-BR summary for a confirmed draft.
pub fn compose_message(draft: &BookingDraft, customer: &Customer) -> String {
    let mut msg = String::new();
    let _ = writeln!(msg, "Olá, {}! Seu pedido FitGarden está confirmado. 🌱", customer.name);
    let _ = writeln!(msg);
    let _ = writeln!(
        msg,
        "{} — {}",
        draft.kind.label(),
        draft.date.format("%d/%m/%Y")
    );
    let _ = writeln!(msg, "Horário: {}", draft.window);
    if let Some(zone) = draft.zone {
        let _ = writeln!(msg, "Região: {}", zone.label());
    }
    if !draft.address.trim().is_empty() {
        let _ = writeln!(msg, "Endereço: {}", draft.address.trim());
    }
    let _ = writeln!(msg);
    let _ = writeln!(msg, "Itens:");
    for item in draft.items() {
        let _ = writeln!(
            msg,
            "- {}x {} ({}) — R$ {:.2}",
            item.quantity,
            item.option_name,
            item.size_label,
            item.subtotal()
        );
    }
    let _ = writeln!(msg);
    let _ = write!(msg, "Total: R$ {:.2}", draft.total());
    let notes = draft.notes.trim();
    if !notes.is_empty() {
        let _ = write!(msg, "\n\nObservações: {notes}");
    }
    msg
}

/// Build the full notification for a confirmed draft.
///
/// Fails when the customer has no phone number on file.
pub fn compose_whatsapp(
    draft: &BookingDraft,
    customer: &Customer,
) -> Result<WhatsAppNotification, CoreError> {
    let raw_phone = customer
        .phone
        .as_deref()
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| CoreError::ValidationFailed {
            message: format!("Cliente {} não tem telefone cadastrado", customer.name),
        })?;

    let phone = normalize_phone_for_wa_me(raw_phone);
    let message = compose_message(draft, customer);

    let mut url = Url::parse(&format!("https://wa.me/{phone}"))
        .map_err(|e| CoreError::Internal(format!("wa.me URL: {e}")))?;
    url.query_pairs_mut().append_pair("text", &message);

    Ok(WhatsAppNotification {
        phone,
        message,
        url,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{CatalogIndex, CustomerId, MenuOption, OptionId, SizeId, SizeVariant, Zone};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    #[test]
    fn local_11_digit_number_gets_country_code() {
        assert_eq!(normalize_phone_for_wa_me("43999998888"), "5543999998888");
    }

    #[test]
    fn local_10_digit_number_gets_country_code() {
        assert_eq!(normalize_phone_for_wa_me("4399998888"), "554399998888");
    }

    #[test]
    fn formatted_number_is_stripped_first() {
        assert_eq!(normalize_phone_for_wa_me("(43) 99999-8888"), "5543999998888");
    }

    #[test]
    fn international_number_passes_through() {
        assert_eq!(normalize_phone_for_wa_me("5543999998888"), "5543999998888");
    }

    #[test]
    fn short_number_is_left_as_digits() {
        assert_eq!(normalize_phone_for_wa_me("9988"), "9988");
    }

    fn maria() -> Customer {
        Customer {
            id: CustomerId::new(41),
            name: "Maria".into(),
            phone: Some("43999998888".into()),
            address: None,
            zone: None,
        }
    }

    fn confirmed_draft() -> BookingDraft {
        let catalog = CatalogIndex::new(vec![MenuOption {
            id: OptionId::new(7),
            name: "Fit".into(),
            description: None,
            active: true,
            sizes: vec![SizeVariant {
                id: SizeId::new(2),
                label: "350g".into(),
                price: "19.90".parse().unwrap(),
            }],
        }]);

        let mut draft = BookingDraft::new(NaiveDate::from_ymd_opt(2025, 7, 21).unwrap());
        draft.set_customer(maria());
        draft.set_address("Rua A, 100");
        draft.set_zone(Some(Zone::Centro));
        draft.add_item(&catalog, OptionId::new(7), SizeId::new(2), 2);
        draft
    }

    #[test]
    fn message_contains_itemized_lines_and_total() {
        let message = compose_message(&confirmed_draft(), &maria());

        assert!(message.contains("Olá, Maria!"), "message: {message}");
        assert!(message.contains("Entrega — 21/07/2025"));
        assert!(message.contains("Horário: 13:00-15:00"));
        assert!(message.contains("Região: Centro"));
        assert!(message.contains("Endereço: Rua A, 100"));
        assert!(message.contains("- 2x Fit (350g) — R$ 39.80"));
        assert!(message.contains("Total: R$ 39.80"));
        assert!(!message.contains("Observações"));
    }

    #[test]
    fn notes_are_appended_when_present() {
        let mut draft = confirmed_draft();
        draft.set_notes("portão azul");
        let message = compose_message(&draft, &maria());
        assert!(message.ends_with("Observações: portão azul"), "message: {message}");
    }

    #[test]
    fn url_targets_normalized_number_and_carries_the_message() {
        let draft = confirmed_draft();
        let note = compose_whatsapp(&draft, &maria()).unwrap();

        assert_eq!(note.phone, "5543999998888");
        assert_eq!(note.url.host_str(), Some("wa.me"));
        assert_eq!(note.url.path(), "/5543999998888");

        // The text parameter decodes back to the exact message.
        let (key, text) = note.url.query_pairs().next().unwrap();
        assert_eq!(key, "text");
        assert_eq!(text, note.message);
    }

    #[test]
    fn missing_phone_is_an_error() {
        let draft = confirmed_draft();
        let customer = Customer {
            phone: None,
            ..maria()
        };
        assert!(compose_whatsapp(&draft, &customer).is_err());
    }
}
