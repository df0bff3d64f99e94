// src/db.rs
use crate::{config::Config, error::AppResult, models::operation::Operation};
use serde::{Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::sync::{Mutex, MutexGuard};

/// Documento persistido: `{ "operations": [...] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OperationsDocument {
    #[serde(default)]
    pub operations: Vec<Operation>,
}

/// Coleção guardada num único ficheiro JSON (o "blob").
/// Cada mutação lê o documento inteiro, altera-o e volta a gravá-lo.
#[derive(Debug, Clone)]
pub struct BlobStore {
    blob_path: PathBuf,
    seed_path: PathBuf,
    // Serializa os ciclos ler-alterar-gravar entre pedidos concorrentes
    write_lock: Arc<Mutex<()>>,
}

impl BlobStore {
    pub fn new(blob_path: impl Into<PathBuf>, seed_path: impl Into<PathBuf>) -> Self {
        BlobStore {
            blob_path: blob_path.into(),
            seed_path: seed_path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Bloqueia escritas concorrentes até o guard ser largado.
    pub async fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }

    /// Lê o blob; se ainda não existir, usa a semente; sem semente, coleção vazia.
    pub async fn load(&self) -> AppResult<OperationsDocument> {
        if let Some(doc) = read_document(&self.blob_path).await? {
            return Ok(doc);
        }
        tracing::debug!(
            "Blob {} inexistente, usando semente {}",
            self.blob_path.display(),
            self.seed_path.display()
        );
        match read_document(&self.seed_path).await? {
            Some(doc) => Ok(doc),
            None => {
                tracing::debug!("Semente inexistente, coleção começa vazia.");
                Ok(OperationsDocument::default())
            }
        }
    }

    /// Grava o documento inteiro (JSON indentado). Escreve num ficheiro temporário
    /// e renomeia, para nunca deixar o blob meio escrito.
    pub async fn save(&self, doc: &OperationsDocument) -> AppResult<()> {
        if let Some(parent) = self.blob_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let body = serde_json::to_vec_pretty(doc)?;
        let tmp_path = self.blob_path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, body).await?;
        tokio::fs::rename(&tmp_path, &self.blob_path).await?;
        tracing::debug!(
            "Blob gravado com {} operações em {}",
            doc.operations.len(),
            self.blob_path.display()
        );
        Ok(())
    }
}

async fn read_document(path: &Path) -> AppResult<Option<OperationsDocument>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Cria o armazenamento a partir da configuração e valida que o documento é legível.
pub async fn create_store(config: &Config) -> AppResult<BlobStore> {
    tracing::info!("Abrindo coleção em: {}", config.blob_path.display());
    let store = BlobStore::new(&config.blob_path, &config.seed_path);
    let doc = store.load().await?;
    tracing::info!("Coleção carregada com {} operações.", doc.operations.len());
    Ok(store)
}
