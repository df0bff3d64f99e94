// src/client.rs
use crate::{
    config::Config,
    error::{ClientError, ClientResult},
    models::operation::{NewOperation, Operation},
};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// CRUD contra a coleção remota de operações.
/// Uma chamada remota por operação: sem retentativas nem cache.
#[async_trait]
pub trait OperationsApi: Send + Sync {
    async fn get_all(&self) -> ClientResult<Vec<Operation>>;

    async fn get_by_id(&self, id: &str) -> ClientResult<Operation>;

    /// Devolve o registo canónico, com o `id` atribuído pelo servidor.
    async fn create(&self, fields: &NewOperation) -> ClientResult<Operation>;

    async fn update(&self, id: &str, operation: &Operation) -> ClientResult<Operation>;

    async fn delete(&self, id: &str) -> ClientResult<()>;
}

/// Cliente HTTP (reqwest) para a API REST `/operations`.
#[derive(Debug, Clone)]
pub struct HttpOperationsClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpOperationsClient {
    pub fn new(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(HttpOperationsClient {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> ClientResult<Self> {
        Self::new(&config.api_base_url, config.http_timeout)
    }

    fn collection_url(&self) -> String {
        format!("{}/operations", self.base_url)
    }

    fn item_url(&self, id: &str) -> String {
        format!("{}/operations/{}", self.base_url, urlencoding::encode(id))
    }

    /// Converte 404 em `NotFound` (quando há um id alvo) e qualquer outro
    /// estado não-2xx em `Transport`.
    async fn check(
        response: reqwest::Response,
        target_id: Option<&str>,
    ) -> ClientResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            if let Some(id) = target_id {
                tracing::warn!("Operação {} não existe no servidor", id);
                return Err(ClientError::NotFound(id.to_string()));
            }
        }

        let url = response.url().to_string();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Erro desconhecido".to_string());
        tracing::error!("HTTP {} em {}: {}", status, url, error_text);
        Err(ClientError::Transport(format!(
            "HTTP {} em {}: {}",
            status, url, error_text
        )))
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::Transport(format!("Resposta JSON inválida: {}", e)))
    }
}

#[async_trait]
impl OperationsApi for HttpOperationsClient {
    async fn get_all(&self) -> ClientResult<Vec<Operation>> {
        let url = self.collection_url();
        tracing::debug!("GET {}", url);
        let response = self.http_client.get(&url).send().await?;
        Self::read_json(Self::check(response, None).await?).await
    }

    async fn get_by_id(&self, id: &str) -> ClientResult<Operation> {
        let url = self.item_url(id);
        tracing::debug!("GET {}", url);
        let response = self.http_client.get(&url).send().await?;
        Self::read_json(Self::check(response, Some(id)).await?).await
    }

    async fn create(&self, fields: &NewOperation) -> ClientResult<Operation> {
        let url = self.collection_url();
        tracing::debug!("POST {}", url);
        let response = self.http_client.post(&url).json(fields).send().await?;
        Self::read_json(Self::check(response, None).await?).await
    }

    async fn update(&self, id: &str, operation: &Operation) -> ClientResult<Operation> {
        let url = self.item_url(id);
        tracing::debug!("PUT {}", url);
        let response = self.http_client.put(&url).json(operation).send().await?;
        Self::read_json(Self::check(response, Some(id)).await?).await
    }

    async fn delete(&self, id: &str) -> ClientResult<()> {
        let url = self.item_url(id);
        tracing::debug!("DELETE {}", url);
        let response = self.http_client.delete(&url).send().await?;
        Self::check(response, Some(id)).await?;
        Ok(())
    }
}
