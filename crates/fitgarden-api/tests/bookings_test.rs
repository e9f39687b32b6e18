// Integration tests for `ApiClient` using wiremock.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fitgarden_api::models::{CreateBookingRequest, ItemPayload};
use fitgarden_api::{Anonymous, ApiClient, Error, StaticToken};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let base = server.uri().parse().expect("mock server URI");
    let client = ApiClient::with_client(reqwest::Client::new(), base, Arc::new(Anonymous));
    (server, client)
}

fn sample_booking(id: i64) -> serde_json::Value {
    json!({
        "id": id,
        "pedidoId": 900 + id,
        "clienteId": 41,
        "clienteNome": "Maria",
        "clienteTelefone": "43999998888",
        "tipo": "ENTREGA",
        "data": "2025-07-21",
        "faixaHorario": "13:00-15:00",
        "endereco": "Rua A, 100",
        "regiao": "CENTRO",
        "formaPagamento": "DINHEIRO",
        "itens": [
            {
                "opcaoId": 7,
                "tamanhoId": 2,
                "opcaoNome": "Fit",
                "tamanhoRotulo": "350g",
                "precoUnitario": 19.90,
                "quantidade": 2
            }
        ]
    })
}

// ── Happy-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_list_bookings_pagination() {
    let (server, client) = setup().await;

    let body = json!({
        "data": [sample_booking(1), sample_booking(2)],
        "page": 1,
        "pageSize": 100,
        "total": 2
    });

    Mock::given(method("GET"))
        .and(path("/agendamentos"))
        .and(query_param("date", "2025-07-21"))
        .and(query_param("page", "1"))
        .and(query_param("pageSize", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let page = client.list_bookings("2025-07-21", 1, 100).await.unwrap();

    assert_eq!(page.total, 2);
    assert_eq!(page.data.len(), 2);
    assert_eq!(page.data[0].cliente_nome.as_deref(), Some("Maria"));
    assert_eq!(page.data[0].itens[0].quantidade, 2);
    assert_eq!(page.data[1].id, 2);
}

#[tokio::test]
async fn test_create_booking_sends_exact_payload() {
    let (server, client) = setup().await;

    let req = CreateBookingRequest {
        cliente_id: 41,
        tipo: "ENTREGA".into(),
        data: "2025-07-21".into(),
        faixa_horario: "13:00-15:00".into(),
        endereco: Some("Rua A, 100".into()),
        regiao: Some("CENTRO".into()),
        observacoes: None,
        forma_pagamento: "DINHEIRO".into(),
        voucher_codigo: None,
        itens: vec![ItemPayload {
            opcao_id: 7,
            tamanho_id: 2,
            quantidade: 2,
        }],
    };

    // Absent optionals must be omitted, not serialized as null.
    let expected = json!({
        "clienteId": 41,
        "tipo": "ENTREGA",
        "data": "2025-07-21",
        "faixaHorario": "13:00-15:00",
        "endereco": "Rua A, 100",
        "regiao": "CENTRO",
        "formaPagamento": "DINHEIRO",
        "itens": [{ "opcaoId": 7, "tamanhoId": 2, "quantidade": 2 }]
    });

    Mock::given(method("POST"))
        .and(path("/agendamentos"))
        .and(body_json(&expected))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "pedidoId": 912, "agendamentoId": 55 })),
        )
        .mount(&server)
        .await;

    let created = client.create_booking(&req).await.unwrap();

    assert_eq!(created.pedido_id, 912);
    assert_eq!(created.agendamento_id, 55);
}

#[tokio::test]
async fn test_delete_booking_checks_success_flag() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/agendamentos/55"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "sucesso": true })))
        .mount(&server)
        .await;

    client.delete_booking(55).await.unwrap();
}

#[tokio::test]
async fn test_delete_booking_refused() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/agendamentos/55"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "sucesso": false })))
        .mount(&server)
        .await;

    let result = client.delete_booking(55).await;
    assert!(matches!(result, Err(Error::Backend { .. })));
}

#[tokio::test]
async fn test_settle_payment_posts_method() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/agendamentos/55/finalizar-pagamento"))
        .and(body_json(json!({ "formaPagamento": "PIX" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "sucesso": true })))
        .mount(&server)
        .await;

    client.settle_payment(55, "PIX").await.unwrap();
}

#[tokio::test]
async fn test_bearer_token_attached() {
    let server = MockServer::start().await;
    let base = server.uri().parse().expect("mock server URI");
    let session = Arc::new(StaticToken::new("tok-123".to_string().into()));
    let client = ApiClient::with_client(reqwest::Client::new(), base, session);

    Mock::given(method("GET"))
        .and(path("/clientes"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [], "page": 1, "pageSize": 100, "total": 0
        })))
        .mount(&server)
        .await;

    let page = client.list_customers(1, 100).await.unwrap();
    assert!(page.data.is_empty());
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_error_401_session_expired() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.list_bookings("2025-07-21", 1, 100).await;

    assert!(
        matches!(result, Err(Error::SessionExpired)),
        "expected SessionExpired, got: {result:?}"
    );
}

#[tokio::test]
async fn test_error_404_with_message() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/agendamentos/999"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({ "mensagem": "Agendamento não encontrado" })),
        )
        .mount(&server)
        .await;

    let err = client.get_booking(999).await.unwrap_err();

    match &err {
        Error::Backend { status, message } => {
            assert_eq!(*status, 404);
            assert_eq!(message, "Agendamento não encontrado");
        }
        other => panic!("expected Backend error, got: {other:?}"),
    }
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_error_422_validation() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/agendamentos"))
        .respond_with(
            ResponseTemplate::new(422)
                .set_body_json(json!({ "mensagem": "Informe ao menos um item" })),
        )
        .mount(&server)
        .await;

    let req = CreateBookingRequest {
        cliente_id: 41,
        tipo: "ENTREGA".into(),
        data: "2025-07-21".into(),
        faixa_horario: "13:00-15:00".into(),
        endereco: Some("Rua A, 100".into()),
        regiao: None,
        observacoes: None,
        forma_pagamento: "DINHEIRO".into(),
        voucher_codigo: None,
        itens: vec![],
    };

    let result = client.create_booking(&req).await;

    match result {
        Err(Error::Backend { status, ref message }) => {
            assert_eq!(status, 422);
            assert_eq!(message, "Informe ao menos um item");
        }
        other => panic!("expected Backend 422 error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_error_malformed_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/agendamentos"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = client.list_bookings("2025-07-21", 1, 100).await;

    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "expected Deserialization, got: {result:?}"
    );
}
