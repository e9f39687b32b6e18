// ── Payment methods and the voucher fee-channel mapping ──
//
// The UI exposes a generic payment selection; the backend wants the
// concrete enum where a voucher order also names how its delivery fee is
// paid. `SettlementMethod::for_payment` is that mapping — pure, total.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Payment selection as presented in the booking form.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Dinheiro,
    Cartao,
    Pix,
    /// Discount code; the delivery fee is paid separately (see [`FeeChannel`]).
    Voucher,
    /// Debits a pre-purchased meal-plan balance.
    Plano,
}

impl PaymentMethod {
    /// Human label, pt-BR.
    pub fn label(self) -> &'static str {
        match self {
            Self::Dinheiro => "Dinheiro",
            Self::Cartao => "Cartão",
            Self::Pix => "PIX",
            Self::Voucher => "Voucher",
            Self::Plano => "Plano",
        }
    }

    /// Parse a wire value, folding the voucher-fee variants back into
    /// [`PaymentMethod::Voucher`]. Unknown values default to cash.
    pub fn from_wire(raw: &str) -> Self {
        if raw.starts_with("VOUCHER") {
            return Self::Voucher;
        }
        raw.parse().unwrap_or(Self::Dinheiro)
    }
}

/// How a voucher order's delivery fee is paid.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
    EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeeChannel {
    Dinheiro,
    #[default]
    Cartao,
    Pix,
}

impl FeeChannel {
    /// Human label, pt-BR.
    pub fn label(self) -> &'static str {
        match self {
            Self::Dinheiro => "Dinheiro",
            Self::Cartao => "Cartão",
            Self::Pix => "PIX",
        }
    }
}

/// The concrete payment value the backend stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SettlementMethod {
    Dinheiro,
    Cartao,
    Pix,
    Plano,
    VoucherTaxaDinheiro,
    VoucherTaxaCartao,
    VoucherTaxaPix,
}

impl SettlementMethod {
    /// Derive the backend value from the form's selections.
    ///
    /// Identity for every non-voucher method; VOUCHER picks the fee
    /// variant for the chosen channel, defaulting to the card variant.
    pub fn for_payment(method: PaymentMethod, fee_channel: FeeChannel) -> Self {
        match method {
            PaymentMethod::Dinheiro => Self::Dinheiro,
            PaymentMethod::Cartao => Self::Cartao,
            PaymentMethod::Pix => Self::Pix,
            PaymentMethod::Plano => Self::Plano,
            PaymentMethod::Voucher => match fee_channel {
                FeeChannel::Dinheiro => Self::VoucherTaxaDinheiro,
                FeeChannel::Pix => Self::VoucherTaxaPix,
                FeeChannel::Cartao => Self::VoucherTaxaCartao,
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn voucher_maps_to_fee_variant_per_channel() {
        assert_eq!(
            SettlementMethod::for_payment(PaymentMethod::Voucher, FeeChannel::Pix),
            SettlementMethod::VoucherTaxaPix
        );
        assert_eq!(
            SettlementMethod::for_payment(PaymentMethod::Voucher, FeeChannel::Dinheiro),
            SettlementMethod::VoucherTaxaDinheiro
        );
        assert_eq!(
            SettlementMethod::for_payment(PaymentMethod::Voucher, FeeChannel::Cartao),
            SettlementMethod::VoucherTaxaCartao
        );
    }

    #[test]
    fn non_voucher_methods_map_to_themselves() {
        for (method, expected) in [
            (PaymentMethod::Dinheiro, SettlementMethod::Dinheiro),
            (PaymentMethod::Cartao, SettlementMethod::Cartao),
            (PaymentMethod::Pix, SettlementMethod::Pix),
            (PaymentMethod::Plano, SettlementMethod::Plano),
        ] {
            for channel in [FeeChannel::Dinheiro, FeeChannel::Cartao, FeeChannel::Pix] {
                assert_eq!(SettlementMethod::for_payment(method, channel), expected);
            }
        }
    }

    #[test]
    fn settlement_wire_names() {
        assert_eq!(
            SettlementMethod::VoucherTaxaPix.to_string(),
            "VOUCHER_TAXA_PIX"
        );
        assert_eq!(
            SettlementMethod::VoucherTaxaDinheiro.to_string(),
            "VOUCHER_TAXA_DINHEIRO"
        );
        assert_eq!(SettlementMethod::Dinheiro.to_string(), "DINHEIRO");
    }

    #[test]
    fn from_wire_folds_voucher_variants() {
        assert_eq!(
            PaymentMethod::from_wire("VOUCHER_TAXA_PIX"),
            PaymentMethod::Voucher
        );
        assert_eq!(PaymentMethod::from_wire("VOUCHER"), PaymentMethod::Voucher);
        assert_eq!(PaymentMethod::from_wire("PIX"), PaymentMethod::Pix);
        assert_eq!(
            PaymentMethod::from_wire("algo-estranho"),
            PaymentMethod::Dinheiro
        );
    }
}
