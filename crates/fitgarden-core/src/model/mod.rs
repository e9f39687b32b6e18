//! Canonical domain types for the back-office.

pub mod booking;
pub mod catalog;
pub mod customer;
pub mod ids;

pub use booking::{Booking, BookingItem, DeliveryKind, Zone};
pub use catalog::{CatalogIndex, MenuOption, SizeVariant};
pub use customer::Customer;
pub use ids::{BookingId, CustomerId, OptionId, OrderId, SizeId};
