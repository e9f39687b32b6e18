// ── Core error types ──
//
// User-facing errors from fitgarden-core. These are NOT wire-specific --
// consumers never see raw HTTP statuses or JSON parse failures directly.
// The `From<fitgarden_api::Error>` impl translates transport-layer errors
// into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Não foi possível conectar ao backend: {reason}")]
    ConnectionFailed { reason: String },

    #[error("Sessão expirada — configure um novo token de acesso")]
    SessionExpired,

    #[error("A requisição excedeu o tempo limite")]
    Timeout,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Agendamento não encontrado: {identifier}")]
    BookingNotFound { identifier: String },

    #[error("Cliente não encontrado: {identifier}")]
    CustomerNotFound { identifier: String },

    #[error("Opção de cardápio não encontrada: {identifier}")]
    MenuOptionNotFound { identifier: String },

    // ── Workflow errors ──────────────────────────────────────────────
    /// The draft is incomplete; the message names the missing piece.
    #[error("{message}")]
    ValidationFailed { message: String },

    /// A business rule blocks the edit before any backend call is made.
    #[error("{message}")]
    EditRejected { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("Erro do backend: {message}")]
    Api {
        message: String,
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuração inválida: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Erro interno: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<fitgarden_api::Error> for CoreError {
    fn from(err: fitgarden_api::Error) -> Self {
        match err {
            fitgarden_api::Error::SessionExpired | fitgarden_api::Error::MissingToken => {
                CoreError::SessionExpired
            }
            fitgarden_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            fitgarden_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("URL inválida: {e}"),
            },
            fitgarden_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                reason: format!("TLS: {msg}"),
            },
            fitgarden_api::Error::Backend { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            fitgarden_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("resposta malformada do backend: {message}"))
            }
        }
    }
}
