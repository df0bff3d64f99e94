// src/state.rs
use crate::db::BlobStore;

#[derive(Clone)]
pub struct AppState {
    pub store: BlobStore,
}

// Permite extrair o armazenamento diretamente nos handlers
impl axum::extract::FromRef<AppState> for BlobStore {
    fn from_ref(state: &AppState) -> BlobStore {
        state.store.clone()
    }
}
