// ── Entity identifiers ──
//
// The backend keys every record with a numeric id. Each entity family gets
// its own newtype so a booking id can never be handed to a customer lookup.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            pub fn new(raw: i64) -> Self {
                Self(raw)
            }

            pub fn value(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse::<i64>().map(Self)
            }
        }
    };
}

id_type!(
    /// A scheduled booking (agendamento).
    BookingId
);
id_type!(
    /// The order a booking belongs to.
    OrderId
);
id_type!(
    /// A customer.
    CustomerId
);
id_type!(
    /// A menu option.
    OptionId
);
id_type!(
    /// A size/price tier of a menu option.
    SizeId
);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn id_roundtrips_through_display_and_fromstr() {
        let id = BookingId::new(55);
        assert_eq!(id.to_string(), "55");
        let parsed: BookingId = "55".parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn distinct_id_types_do_not_compare() {
        // Compile-time property: BookingId and CustomerId are separate types.
        let booking = BookingId::new(1);
        let customer = CustomerId::new(1);
        assert_eq!(booking.value(), customer.value());
    }

    #[test]
    fn id_serializes_transparently() {
        let id = OptionId::new(7);
        assert_eq!(serde_json::to_string(&id).unwrap(), "7");
    }
}
