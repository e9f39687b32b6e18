// Backend wire types
//
// Models for the FitGarden backend's JSON API. Wire field names are the
// backend's Brazilian-Portuguese camelCase identifiers; Rust field names
// stay snake_case via `rename_all`. Fields use `#[serde(default)]`
// liberally because older backend builds omit optional fields entirely.

use serde::{Deserialize, Serialize};

// ── Pagination envelope ──────────────────────────────────────────────

/// Standard list envelope:
/// ```json
/// { "data": [...], "page": 1, "pageSize": 100, "total": 42 }
/// ```
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
}

/// Error body shape returned with non-2xx statuses.
#[derive(Debug, Deserialize)]
pub struct ErroResponse {
    #[serde(default)]
    pub mensagem: Option<String>,
}

/// Success flag returned by `DELETE /agendamentos/:id`.
#[derive(Debug, Deserialize)]
pub struct SucessoResponse {
    #[serde(default)]
    pub sucesso: bool,
}

// ── Bookings (agendamentos) ──────────────────────────────────────────

/// Full booking record from `GET /agendamentos`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRecord {
    pub id: i64,
    #[serde(default)]
    pub pedido_id: Option<i64>,
    pub cliente_id: i64,
    #[serde(default)]
    pub cliente_nome: Option<String>,
    #[serde(default)]
    pub cliente_telefone: Option<String>,
    /// "ENTREGA" or "RETIRADA".
    pub tipo: String,
    /// Delivery date as "YYYY-MM-DD".
    pub data: String,
    /// Combined time window, e.g. "13:00-15:00".
    #[serde(default)]
    pub faixa_horario: Option<String>,
    #[serde(default)]
    pub endereco: Option<String>,
    #[serde(default)]
    pub regiao: Option<String>,
    #[serde(default)]
    pub observacoes: Option<String>,
    pub forma_pagamento: String,
    #[serde(default)]
    pub voucher_codigo: Option<String>,
    #[serde(default)]
    pub pagamento_finalizado: Option<bool>,
    #[serde(default)]
    pub itens: Vec<BookingItemRecord>,
}

/// Line item nested inside [`BookingRecord`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingItemRecord {
    pub opcao_id: i64,
    pub tamanho_id: i64,
    #[serde(default)]
    pub opcao_nome: Option<String>,
    #[serde(default)]
    pub tamanho_rotulo: Option<String>,
    #[serde(default)]
    pub preco_unitario: f64,
    pub quantidade: u32,
}

/// Body for `POST /agendamentos`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub cliente_id: i64,
    pub tipo: String,
    pub data: String,
    pub faixa_horario: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endereco: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regiao: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observacoes: Option<String>,
    pub forma_pagamento: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voucher_codigo: Option<String>,
    pub itens: Vec<ItemPayload>,
}

/// Body for `PUT /agendamentos/:id`.
///
/// Edits never carry `clienteId` or voucher fields — the backend rejects
/// customer/voucher changes on an existing booking.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingRequest {
    pub tipo: String,
    pub data: String,
    pub faixa_horario: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endereco: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regiao: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observacoes: Option<String>,
    pub forma_pagamento: String,
    pub itens: Vec<ItemPayload>,
}

/// One line item in a create/update payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPayload {
    pub opcao_id: i64,
    pub tamanho_id: i64,
    pub quantidade: u32,
}

/// Identifiers returned by `POST /agendamentos`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingCreated {
    pub pedido_id: i64,
    pub agendamento_id: i64,
}

/// Body for `POST /agendamentos/:id/finalizar-pagamento`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlePaymentRequest {
    pub forma_pagamento: String,
}

// ── Reference data ───────────────────────────────────────────────────

/// Customer record from `GET /clientes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRecord {
    pub id: i64,
    pub nome: String,
    #[serde(default)]
    pub telefone: Option<String>,
    #[serde(default)]
    pub endereco: Option<String>,
    #[serde(default)]
    pub regiao: Option<String>,
}

/// Menu option with its size/price tiers from `GET /cardapio/opcoes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuOptionRecord {
    pub id: i64,
    pub nome: String,
    #[serde(default)]
    pub descricao: Option<String>,
    #[serde(default = "default_true")]
    pub ativo: bool,
    #[serde(default)]
    pub tamanhos: Vec<SizeRecord>,
}

/// One size/price tier of a menu option.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeRecord {
    pub id: i64,
    pub rotulo: String,
    pub preco: f64,
}

fn default_true() -> bool {
    true
}
