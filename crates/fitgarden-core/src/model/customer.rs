// ── Customer domain type ──

use serde::{Deserialize, Serialize};

use super::booking::Zone;
use super::ids::CustomerId;

/// Read-only customer reference data.
///
/// The booking workflow only ever stores the id plus display fields;
/// customer CRUD belongs to the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub phone: Option<String>,
    /// Default delivery address, offered as a starting point for drafts.
    pub address: Option<String>,
    pub zone: Option<Zone>,
}
