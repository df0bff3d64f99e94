// src/services/operation_service.rs
use crate::{
    db::BlobStore,
    error::{AppError, AppResult},
    models::operation::{Operation, OperationPatch},
};
use uuid::Uuid;

/// Lista a coleção; com `query`, filtra por substring (sem diferenciar maiúsculas)
/// em nome, descrição, terminal, tipo e status.
pub async fn list_operations(store: &BlobStore, query: Option<&str>) -> AppResult<Vec<Operation>> {
    let doc = store.load().await?;
    let needle = query.map(str::to_lowercase).filter(|q| !q.is_empty());

    let operations = match needle {
        Some(q) => {
            tracing::debug!("Filtrando operações por '{}'", q);
            doc.operations
                .into_iter()
                .filter(|op| matches_search(op, &q))
                .collect()
        }
        None => doc.operations,
    };
    tracing::debug!("Devolvendo {} operações.", operations.len());
    Ok(operations)
}

pub fn matches_search(op: &Operation, lowercase_query: &str) -> bool {
    [
        op.name.as_str(),
        op.description.as_str(),
        op.terminal.as_str(),
        op.kind.as_str(),
        op.status.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(lowercase_query))
}

pub async fn find_operation(store: &BlobStore, id: &str) -> AppResult<Operation> {
    tracing::debug!("Buscando operação por ID: {}", id);
    store
        .load()
        .await?
        .operations
        .into_iter()
        .find(|op| op.id == id)
        .ok_or_else(|| AppError::NotFound(id.to_string()))
}

/// Cria a operação no início da coleção. Respeita um `id` enviado pelo cliente
/// se estiver livre; caso contrário gera um novo.
pub async fn create_operation(store: &BlobStore, patch: OperationPatch) -> AppResult<Operation> {
    let _guard = store.lock().await;
    let mut doc = store.load().await?;

    let id = match patch.id.clone().filter(|id| !id.trim().is_empty()) {
        Some(id) => {
            if doc.operations.iter().any(|op| op.id == id) {
                return Err(AppError::Conflict(id));
            }
            id
        }
        None => loop {
            let candidate = generate_id();
            if !doc.operations.iter().any(|op| op.id == candidate) {
                break candidate;
            }
        },
    };

    let created = patch.into_operation(id);
    doc.operations.insert(0, created.clone());
    store.save(&doc).await?;

    tracing::info!("Operação '{}' criada ({}).", created.name, created.id);
    Ok(created)
}

/// Atualização por fusão (PUT e PATCH). O `id` guardado prevalece sempre.
pub async fn update_operation(
    store: &BlobStore,
    id: &str,
    patch: OperationPatch,
) -> AppResult<Operation> {
    let _guard = store.lock().await;
    let mut doc = store.load().await?;

    let slot = doc
        .operations
        .iter_mut()
        .find(|op| op.id == id)
        .ok_or_else(|| AppError::NotFound(id.to_string()))?;
    let updated = patch.merge_into(slot);
    *slot = updated.clone();
    store.save(&doc).await?;

    tracing::info!("Operação {} atualizada.", id);
    Ok(updated)
}

pub async fn delete_operation(store: &BlobStore, id: &str) -> AppResult<()> {
    let _guard = store.lock().await;
    let mut doc = store.load().await?;

    let before = doc.operations.len();
    doc.operations.retain(|op| op.id != id);
    if doc.operations.len() == before {
        return Err(AppError::NotFound(id.to_string()));
    }
    store.save(&doc).await?;

    tracing::info!("Operação {} removida.", id);
    Ok(())
}

// Prefixo de 8 caracteres de um UUID v4
fn generate_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::operation::{OperationStatus, OperationType, Terminal};

    fn store_in(dir: &tempfile::TempDir) -> BlobStore {
        BlobStore::new(dir.path().join("db.json"), dir.path().join("seed.json"))
    }

    fn named(name: &str) -> OperationPatch {
        OperationPatch {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_assigns_id_defaults_and_prepends() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let first = create_operation(&store, named("Primeira")).await.unwrap();
        let second = create_operation(&store, named("Segunda")).await.unwrap();

        assert_eq!(first.id.len(), 8);
        assert_ne!(first.id, second.id);
        assert_eq!(second.terminal, Terminal::Norte);
        assert_eq!(second.kind, OperationType::Embarque);
        assert_eq!(second.status, OperationStatus::Criada);

        let names: Vec<_> = list_operations(&store, None)
            .await
            .unwrap()
            .into_iter()
            .map(|op| op.name)
            .collect();
        assert_eq!(names, vec!["Segunda", "Primeira"]);
    }

    #[tokio::test]
    async fn create_honours_free_client_id_and_rejects_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let patch = OperationPatch {
            id: Some("fixo".into()),
            ..named("Com id")
        };

        assert_eq!(create_operation(&store, patch.clone()).await.unwrap().id, "fixo");
        assert!(matches!(
            create_operation(&store, patch).await,
            Err(AppError::Conflict(id)) if id == "fixo"
        ));
    }

    #[tokio::test]
    async fn update_merges_and_preserves_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let created = create_operation(&store, named("Original")).await.unwrap();

        let patch = OperationPatch {
            id: Some("invasor".into()),
            status: Some(OperationStatus::Processando),
            ..Default::default()
        };
        let updated = update_operation(&store, &created.id, patch).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Original");
        assert_eq!(updated.status, OperationStatus::Processando);
        assert_eq!(find_operation(&store, &created.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        assert!(matches!(find_operation(&store, "x").await, Err(AppError::NotFound(_))));
        assert!(matches!(
            update_operation(&store, "x", OperationPatch::default()).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(delete_operation(&store, "x").await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn delete_removes_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let a = create_operation(&store, named("A")).await.unwrap();
        let b = create_operation(&store, named("B")).await.unwrap();

        delete_operation(&store, &a.id).await.unwrap();

        let remaining = list_operations(&store, None).await.unwrap();
        assert_eq!(remaining, vec![b]);
    }

    #[tokio::test]
    async fn search_matches_substrings_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        create_operation(
            &store,
            OperationPatch {
                description: Some("Contêineres refrigerados".into()),
                terminal: Some(Terminal::Oeste),
                ..named("Alfa")
            },
        )
        .await
        .unwrap();
        create_operation(&store, named("Beta")).await.unwrap();

        let by_description = list_operations(&store, Some("REFRIG")).await.unwrap();
        assert_eq!(by_description.len(), 1);
        assert_eq!(by_description[0].name, "Alfa");

        let by_terminal = list_operations(&store, Some("oeste")).await.unwrap();
        assert_eq!(by_terminal.len(), 1);

        // "criada" é o status padrão dos dois
        assert_eq!(list_operations(&store, Some("riad")).await.unwrap().len(), 2);
        assert_eq!(list_operations(&store, Some("")).await.unwrap().len(), 2);
    }
}
