//! Shared helpers for command handlers.

use chrono::NaiveDate;

use fitgarden_core::{OptionId, SizeId};

use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// The delivery date to operate on: the flag value or today.
pub fn date_or_today(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| chrono::Local::now().date_naive())
}

/// Parse a `--item` spec: "optionId:sizeId:quantity" (quantity optional,
/// defaults to 1).
pub fn parse_item_spec(spec: &str) -> Result<(OptionId, SizeId, u32), CliError> {
    let invalid = || CliError::Validation {
        message: format!("item inválido '{spec}' — use opçãoId:tamanhoId:quantidade"),
    };

    let mut parts = spec.split(':');
    let option: i64 = parts
        .next()
        .and_then(|p| p.trim().parse().ok())
        .ok_or_else(invalid)?;
    let size: i64 = parts
        .next()
        .and_then(|p| p.trim().parse().ok())
        .ok_or_else(invalid)?;
    let quantity: u32 = match parts.next() {
        Some(raw) => raw.trim().parse().map_err(|_| invalid())?,
        None => 1,
    };
    if parts.next().is_some() {
        return Err(invalid());
    }

    Ok((OptionId::new(option), SizeId::new(size), quantity.max(1)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn item_spec_parses_full_form() {
        let (option, size, quantity) = parse_item_spec("7:2:3").unwrap();
        assert_eq!(option, OptionId::new(7));
        assert_eq!(size, SizeId::new(2));
        assert_eq!(quantity, 3);
    }

    #[test]
    fn item_spec_quantity_defaults_to_one() {
        let (_, _, quantity) = parse_item_spec("7:2").unwrap();
        assert_eq!(quantity, 1);
    }

    #[test]
    fn item_spec_rejects_garbage() {
        for spec in ["", "7", "a:b:c", "7:2:3:4", "7:2:0x"] {
            assert!(parse_item_spec(spec).is_err(), "spec: {spec:?}");
        }
    }

    #[test]
    fn item_spec_zero_quantity_clamps_to_one() {
        let (_, _, quantity) = parse_item_spec("7:2:0").unwrap();
        assert_eq!(quantity, 1);
    }
}
