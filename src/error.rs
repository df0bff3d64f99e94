// src/error.rs
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Json},
};
use serde_json::json;
use std::fmt;
use thiserror::Error;

/// Métodos aceites pela coleção `/operations`.
pub const ALLOWED_METHODS: &str = "GET,POST,PUT,PATCH,DELETE";

// --- Erros do lado do servidor (API + armazenamento) ---

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Erro de I/O no armazenamento: {0}")]
    Io(#[from] std::io::Error),

    #[error("Documento JSON inválido: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Erro de configuração: {0}")]
    Config(String),

    #[error("Corpo do pedido inválido: {0}")]
    BadRequest(String),

    #[error("Operação '{0}' não encontrada")]
    NotFound(String),

    #[error("Já existe uma operação com o id '{0}'")]
    Conflict(String),

    #[error("Método não permitido")]
    MethodNotAllowed,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        match &self {
            AppError::NotFound(_) | AppError::MethodNotAllowed | AppError::BadRequest(_) => {
                tracing::warn!("Pedido recusado: {}", self);
            }
            _ => tracing::error!("Erro processado: {:?}", self),
        }

        match self {
            AppError::NotFound(_) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" }))).into_response()
            }
            AppError::MethodNotAllowed => {
                let mut response = (
                    StatusCode::METHOD_NOT_ALLOWED,
                    Json(json!({ "error": "Method not allowed" })),
                )
                    .into_response();
                response
                    .headers_mut()
                    .insert(header::ALLOW, HeaderValue::from_static(ALLOWED_METHODS));
                response
            }
            AppError::BadRequest(detail) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Bad request", "detail": detail })),
            )
                .into_response(),
            AppError::Conflict(id) => (
                StatusCode::CONFLICT,
                Json(json!({ "error": "Conflict", "detail": format!("id '{}' already exists", id) })),
            )
                .into_response(),
            other => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal error", "detail": other.to_string() })),
            )
                .into_response(),
        }
    }
}

// Tipo Result padrão para a aplicação
pub type AppResult<T = ()> = Result<T, AppError>;

// --- Erros do cliente da coleção remota ---

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Falha de rede ou resposta HTTP inesperada. Recuperável com nova tentativa.
    #[error("Falha de transporte: {0}")]
    Transport(String),

    /// O registo alvo já não existe no servidor.
    #[error("Operação '{0}' não encontrada no servidor")]
    NotFound(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

// --- Erros de validação do formulário (nunca chegam ao transporte) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Name,
    Description,
    Type,
    Terminal,
    Status,
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FormField::Name => "Nome",
            FormField::Description => "Descrição",
            FormField::Type => "Tipo",
            FormField::Terminal => "Terminal",
            FormField::Status => "Status",
        };
        f.write_str(label)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: FormField,
    pub message: String,
}

impl ValidationError {
    pub fn required(field: FormField) -> Self {
        let message = match field {
            FormField::Name => "Nome é obrigatório.".to_string(),
            other => format!("{} é obrigatório.", other),
        };
        ValidationError { field, message }
    }
}
