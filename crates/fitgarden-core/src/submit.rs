// ── Submission adapter ──
//
// Validates draft completeness, builds the create/update payload, and
// drives it through the injected backend port. All business-rule checks
// happen synchronously before any network call; the draft phase tracks
// the in-flight state so the UI can disable the confirm control.

use std::future::Future;

use tracing::info;

use fitgarden_api::ApiClient;
use fitgarden_api::Error as ApiError;
use fitgarden_api::models::{
    BookingCreated, BookingRecord, CreateBookingRequest, ItemPayload, UpdateBookingRequest,
};

use crate::draft::{BookingDraft, DraftMode, SubmitReceipt};
use crate::error::CoreError;
use crate::model::{BookingId, DeliveryKind, OrderId};
use crate::payment::{PaymentMethod, SettlementMethod};

/// Port for the two mutating calls the booking dialog performs.
///
/// `ApiClient` is the production implementation; tests inject fakes.
pub trait BookingBackend: Sync {
    fn create_booking(
        &self,
        req: &CreateBookingRequest,
    ) -> impl Future<Output = Result<BookingCreated, ApiError>> + Send;

    fn update_booking(
        &self,
        id: i64,
        req: &UpdateBookingRequest,
    ) -> impl Future<Output = Result<BookingRecord, ApiError>> + Send;
}

impl BookingBackend for ApiClient {
    async fn create_booking(&self, req: &CreateBookingRequest) -> Result<BookingCreated, ApiError> {
        ApiClient::create_booking(self, req).await
    }

    async fn update_booking(
        &self,
        id: i64,
        req: &UpdateBookingRequest,
    ) -> Result<BookingRecord, ApiError> {
        ApiClient::update_booking(self, id, req).await
    }
}

/// A validated payload, ready to ship.
enum Request {
    Create(CreateBookingRequest),
    Update { id: i64, req: UpdateBookingRequest },
}

/// Validate and submit a draft.
///
/// On success the draft moves to `Confirmed` and the new identifiers are
/// returned. Validation failures and the edit-mode payment rule reject
/// synchronously, leaving the draft untouched; a backend failure moves it
/// to `Failed` with every field preserved for correction.
pub async fn submit_draft<B: BookingBackend>(
    draft: &mut BookingDraft,
    backend: &B,
) -> Result<SubmitReceipt, CoreError> {
    if draft.is_busy() {
        return Err(CoreError::ValidationFailed {
            message: "Envio já em andamento".into(),
        });
    }

    let request = build_request(draft)?;
    draft.begin_submit();

    let result = match &request {
        Request::Create(req) => backend.create_booking(req).await.map(|created| {
            info!(
                pedido_id = created.pedido_id,
                agendamento_id = created.agendamento_id,
                "booking created"
            );
            SubmitReceipt {
                booking_id: BookingId::new(created.agendamento_id),
                order_id: Some(OrderId::new(created.pedido_id)),
            }
        }),
        Request::Update { id, req } => backend.update_booking(*id, req).await.map(|record| {
            info!(agendamento_id = record.id, "booking updated");
            SubmitReceipt {
                booking_id: BookingId::new(record.id),
                order_id: record.pedido_id.map(OrderId::new),
            }
        }),
    };

    match result {
        Ok(receipt) => {
            draft.confirm(receipt);
            Ok(receipt)
        }
        Err(err) => {
            let core: CoreError = err.into();
            draft.fail(core.to_string());
            Err(core)
        }
    }
}

/// Run every completeness check and build the wire payload.
fn build_request(draft: &BookingDraft) -> Result<Request, CoreError> {
    // The backend cannot move an existing booking onto voucher/plan
    // payment; reject before anything leaves the process.
    if let DraftMode::Edit {
        original_payment, ..
    } = draft.mode()
    {
        let moving_to_restricted =
            matches!(draft.payment, PaymentMethod::Voucher | PaymentMethod::Plano)
                && draft.payment != *original_payment;
        if moving_to_restricted {
            return Err(CoreError::EditRejected {
                message:
                    "Não é possível alterar o pagamento para voucher ou plano ao editar um agendamento"
                        .into(),
            });
        }
    }

    let customer = draft.customer.as_ref().ok_or_else(|| CoreError::ValidationFailed {
        message: "Selecione um cliente".into(),
    })?;

    let address = draft.address.trim();
    if draft.kind == DeliveryKind::Entrega && address.is_empty() {
        return Err(CoreError::ValidationFailed {
            message: "Informe o endereço de entrega".into(),
        });
    }

    if draft.items().is_empty() {
        return Err(CoreError::ValidationFailed {
            message: "Adicione ao menos um item ao pedido".into(),
        });
    }

    let voucher_code = draft.voucher_code.trim();
    if matches!(draft.mode(), DraftMode::Create)
        && draft.payment == PaymentMethod::Voucher
        && voucher_code.is_empty()
    {
        return Err(CoreError::ValidationFailed {
            message: "Informe o código do voucher".into(),
        });
    }

    let settlement = SettlementMethod::for_payment(draft.payment, draft.fee_channel);
    let itens: Vec<ItemPayload> = draft
        .items()
        .iter()
        .map(|item| ItemPayload {
            opcao_id: item.option_id.value(),
            tamanho_id: item.size_id.value(),
            quantidade: item.quantity,
        })
        .collect();

    let endereco = (!address.is_empty()).then(|| address.to_owned());
    let regiao = draft.zone.map(|z| z.to_string());
    let observacoes = {
        let notes = draft.notes.trim();
        (!notes.is_empty()).then(|| notes.to_owned())
    };

    match draft.mode() {
        DraftMode::Create => Ok(Request::Create(CreateBookingRequest {
            cliente_id: customer.id.value(),
            tipo: draft.kind.to_string(),
            data: draft.date.format("%Y-%m-%d").to_string(),
            faixa_horario: draft.window.as_wire(),
            endereco,
            regiao,
            observacoes,
            forma_pagamento: settlement.to_string(),
            voucher_codigo: (!voucher_code.is_empty()).then(|| voucher_code.to_owned()),
            itens,
        })),
        DraftMode::Edit { id, .. } => Ok(Request::Update {
            id: id.value(),
            req: UpdateBookingRequest {
                tipo: draft.kind.to_string(),
                data: draft.date.format("%Y-%m-%d").to_string(),
                faixa_horario: draft.window.as_wire(),
                endereco,
                regiao,
                observacoes,
                forma_pagamento: settlement.to_string(),
                itens,
            },
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::draft::{DraftPhase, EditPolicy};
    use crate::model::{
        Booking, CatalogIndex, Customer, CustomerId, MenuOption, OptionId, SizeId, SizeVariant,
        Zone,
    };
    use crate::schedule::TimeWindow;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    /// Records create calls; optionally fails every request.
    struct FakeBackend {
        created: Mutex<Vec<CreateBookingRequest>>,
        updated: Mutex<Vec<(i64, UpdateBookingRequest)>>,
        fail_with: Option<String>,
    }

    impl FakeBackend {
        fn ok() -> Self {
            Self {
                created: Mutex::new(Vec::new()),
                updated: Mutex::new(Vec::new()),
                fail_with: None,
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                fail_with: Some(message.to_owned()),
                ..Self::ok()
            }
        }

        fn create_calls(&self) -> usize {
            self.created.lock().unwrap().len()
        }
    }

    impl BookingBackend for FakeBackend {
        async fn create_booking(
            &self,
            req: &CreateBookingRequest,
        ) -> Result<BookingCreated, ApiError> {
            if let Some(ref message) = self.fail_with {
                return Err(ApiError::Backend {
                    status: 500,
                    message: message.clone(),
                });
            }
            self.created.lock().unwrap().push(req.clone());
            Ok(BookingCreated {
                pedido_id: 912,
                agendamento_id: 55,
            })
        }

        async fn update_booking(
            &self,
            id: i64,
            req: &UpdateBookingRequest,
        ) -> Result<BookingRecord, ApiError> {
            if let Some(ref message) = self.fail_with {
                return Err(ApiError::Backend {
                    status: 500,
                    message: message.clone(),
                });
            }
            self.updated.lock().unwrap().push((id, req.clone()));
            Ok(BookingRecord {
                id,
                pedido_id: Some(912),
                cliente_id: 41,
                cliente_nome: Some("Maria".into()),
                cliente_telefone: None,
                tipo: req.tipo.clone(),
                data: req.data.clone(),
                faixa_horario: Some(req.faixa_horario.clone()),
                endereco: req.endereco.clone(),
                regiao: req.regiao.clone(),
                observacoes: req.observacoes.clone(),
                forma_pagamento: req.forma_pagamento.clone(),
                voucher_codigo: None,
                pagamento_finalizado: None,
                itens: Vec::new(),
            })
        }
    }

    fn catalog() -> CatalogIndex {
        CatalogIndex::new(vec![MenuOption {
            id: OptionId::new(7),
            name: "Fit".into(),
            description: None,
            active: true,
            sizes: vec![SizeVariant {
                id: SizeId::new(2),
                label: "350g".into(),
                price: "19.90".parse().unwrap(),
            }],
        }])
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

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 21).unwrap()
    }

    fn filled_draft() -> BookingDraft {
        let mut draft = BookingDraft::new(date());
        draft.set_customer(maria());
        draft.set_address("Rua A, 100");
        draft.set_zone(Some(Zone::Centro));
        draft.add_item(&catalog(), OptionId::new(7), SizeId::new(2), 2);
        draft
    }

    #[tokio::test]
    async fn zero_items_is_rejected_before_any_call() {
        let backend = FakeBackend::ok();
        let mut draft = BookingDraft::new(date());
        draft.set_customer(maria());
        draft.set_address("Rua A, 100");

        let result = submit_draft(&mut draft, &backend).await;

        assert!(matches!(result, Err(CoreError::ValidationFailed { .. })));
        assert_eq!(backend.create_calls(), 0);
        assert!(!draft.is_busy());
    }

    #[tokio::test]
    async fn missing_address_blocks_delivery_orders() {
        let backend = FakeBackend::ok();
        let mut draft = filled_draft();
        draft.set_address("");

        let result = submit_draft(&mut draft, &backend).await;
        assert!(matches!(result, Err(CoreError::ValidationFailed { .. })));

        // Pickup orders need no address.
        draft.set_kind(DeliveryKind::Retirada);
        submit_draft(&mut draft, &backend).await.unwrap();
    }

    #[tokio::test]
    async fn voucher_without_code_is_rejected() {
        let backend = FakeBackend::ok();
        let mut draft = filled_draft();
        draft.set_payment(PaymentMethod::Voucher);

        let result = submit_draft(&mut draft, &backend).await;
        assert!(matches!(result, Err(CoreError::ValidationFailed { .. })));
        assert_eq!(backend.create_calls(), 0);
    }

    #[tokio::test]
    async fn create_builds_exact_payload_and_confirms() {
        let backend = FakeBackend::ok();
        let mut draft = filled_draft();

        let receipt = submit_draft(&mut draft, &backend).await.unwrap();

        assert_eq!(receipt.booking_id, BookingId::new(55));
        assert_eq!(receipt.order_id, Some(OrderId::new(912)));
        assert_eq!(*draft.phase(), DraftPhase::Confirmed(receipt));
        assert_eq!(draft.total(), "39.80".parse().unwrap());

        let calls = backend.created.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let req = &calls[0];
        assert_eq!(req.cliente_id, 41);
        assert_eq!(req.tipo, "ENTREGA");
        assert_eq!(req.data, "2025-07-21");
        assert_eq!(req.faixa_horario, "13:00-15:00");
        assert_eq!(req.forma_pagamento, "DINHEIRO");
        assert_eq!(req.itens.len(), 1);
        assert_eq!(req.itens[0].quantidade, 2);
    }

    #[tokio::test]
    async fn voucher_create_maps_fee_channel() {
        let backend = FakeBackend::ok();
        let mut draft = filled_draft();
        draft.set_payment(PaymentMethod::Voucher);
        draft.set_fee_channel(crate::payment::FeeChannel::Pix);
        draft.set_voucher_code("BEMVINDA10");

        submit_draft(&mut draft, &backend).await.unwrap();

        let calls = backend.created.lock().unwrap();
        assert_eq!(calls[0].forma_pagamento, "VOUCHER_TAXA_PIX");
        assert_eq!(calls[0].voucher_codigo.as_deref(), Some("BEMVINDA10"));
    }

    #[tokio::test]
    async fn edit_rejects_moving_to_voucher_before_any_call() {
        let backend = FakeBackend::ok();
        let mut draft = BookingDraft::edit(&stored_booking(), EditPolicy::permissive());
        draft.set_payment(PaymentMethod::Voucher);

        let result = submit_draft(&mut draft, &backend).await;

        match result {
            Err(CoreError::EditRejected { message }) => {
                assert!(message.contains("voucher ou plano"), "message: {message}");
            }
            other => panic!("expected EditRejected, got {other:?}"),
        }
        assert_eq!(backend.create_calls(), 0);
        assert!(backend.updated.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn edit_omits_customer_and_voucher_fields() {
        let backend = FakeBackend::ok();
        let mut draft = BookingDraft::edit(&stored_booking(), EditPolicy::locked());
        draft.set_notes("portão azul");

        let receipt = submit_draft(&mut draft, &backend).await.unwrap();
        assert_eq!(receipt.booking_id, BookingId::new(55));

        let calls = backend.updated.lock().unwrap();
        let (id, req) = &calls[0];
        assert_eq!(*id, 55);
        assert_eq!(req.observacoes.as_deref(), Some("portão azul"));
        // UpdateBookingRequest has no clienteId/voucherCodigo fields at all;
        // the serialized body proves it.
        let body = serde_json::to_value(req).unwrap();
        assert!(body.get("clienteId").is_none());
        assert!(body.get("voucherCodigo").is_none());
    }

    #[tokio::test]
    async fn backend_failure_preserves_the_draft() {
        let backend = FakeBackend::failing("banco indisponível");
        let mut draft = filled_draft();

        let result = submit_draft(&mut draft, &backend).await;

        assert!(matches!(result, Err(CoreError::Api { .. })));
        match draft.phase() {
            DraftPhase::Failed(message) => {
                assert!(message.contains("banco indisponível"), "message: {message}");
            }
            other => panic!("expected Failed, got {other:?}"),
        }
        // Fields survive for correction and resubmission.
        assert_eq!(draft.items().len(), 1);
        assert_eq!(draft.address, "Rua A, 100");
    }

    #[tokio::test]
    async fn busy_draft_rejects_a_second_submit() {
        let backend = FakeBackend::ok();
        let mut draft = filled_draft();
        draft.begin_submit();

        let result = submit_draft(&mut draft, &backend).await;
        assert!(matches!(result, Err(CoreError::ValidationFailed { .. })));
        assert_eq!(backend.create_calls(), 0);
    }

    fn stored_booking() -> Booking {
        Booking {
            id: BookingId::new(55),
            order_id: Some(OrderId::new(912)),
            customer_id: CustomerId::new(41),
            customer_name: Some("Maria".into()),
            customer_phone: Some("43999998888".into()),
            kind: DeliveryKind::Entrega,
            date: date(),
            window: TimeWindow::default(),
            address: Some("Rua A, 100".into()),
            zone: Some(Zone::Centro),
            notes: None,
            payment: PaymentMethod::Dinheiro,
            voucher_code: None,
            settled: false,
            items: vec![crate::model::BookingItem {
                option_id: OptionId::new(7),
                size_id: SizeId::new(2),
                option_name: "Fit".into(),
                size_label: "350g".into(),
                unit_price: "19.90".parse().unwrap(),
                quantity: 2,
            }],
        }
    }
}
