// src/controller/mod.rs
//! Dono da cópia em memória da coleção. Carrega, cria, edita e remove através
//! de um `OperationsApi` e só altera a lista depois da confirmação do servidor.

pub mod form;

use crate::{
    client::OperationsApi,
    error::{ClientError, ValidationError},
    models::operation::{NewOperation, Operation, Terminal},
    view::filter::{self, FacetSelection, SortColumn, SortDirection, SortState},
};
use form::{OperationDraft, OperationForm, RequiredFields, Submission};
use std::{
    collections::{BTreeSet, HashSet},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};
use tokio::sync::Mutex;

pub const LOAD_ERROR_MESSAGE: &str = "Não foi possível carregar as operações.";

/// Sinal de vida da sessão que consome o controlador. Cada continuação
/// assíncrona verifica-o antes de tocar no estado.
#[derive(Debug, Clone)]
pub struct Liveness(Arc<AtomicBool>);

impl Liveness {
    pub fn new() -> Self {
        Liveness(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_alive(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn end(&self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

// --- Notificações (toasts) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub description: String,
}

// --- Resultados das ações ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(usize),
    Failed(ClientError),
    /// Um carregamento iniciado depois deste já está em curso ou terminou;
    /// só o mais recente é aplicado.
    Superseded,
    /// A sessão terminou antes da resposta; nada foi aplicado.
    Discarded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome<T> {
    Applied(T),
    Failed(ClientError),
    /// Já existe um pedido igual em curso.
    Busy,
    Discarded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Saved(Operation),
    Invalid(Vec<ValidationError>),
    Failed(ClientError),
    NoForm,
    Busy,
    Discarded,
}

// --- Estado ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub form: OperationForm,
    pub saving: bool,
    pub errors: Vec<ValidationError>,
}

#[derive(Debug, Default)]
struct ListState {
    collection: Vec<Operation>,
    loading: bool,
    load_generation: u64,
    loads_in_flight: usize,
    last_error: Option<String>,
    query: String,
    facets: FacetSelection,
    sort: SortState,
    form: Option<FormState>,
    deleting: BTreeSet<String>,
    notifications: Vec<Notification>,
}

impl ListState {
    fn notify(&mut self, kind: NotificationKind, title: &str, description: impl Into<String>) {
        self.notifications.push(Notification {
            kind,
            title: title.to_string(),
            description: description.into(),
        });
    }

    fn form_is_saving(&self) -> bool {
        self.form.as_ref().is_some_and(|f| f.saving)
    }
}

// --- Vista exposta à apresentação ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnView {
    pub column: SortColumn,
    pub header: &'static str,
    pub sort: Option<SortDirection>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetChip {
    pub terminal: Terminal,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView {
    pub rows: Vec<Operation>,
    pub columns: Vec<ColumnView>,
    pub facets: Vec<FacetChip>,
    /// Chip "Todos": ativo quando nenhum terminal está selecionado.
    pub all_terminals_active: bool,
    pub query: String,
    pub loading: bool,
    pub saving: bool,
    pub deleting: Vec<String>,
    pub error: Option<String>,
    pub form: Option<FormState>,
}

impl ListView {
    /// O botão "Nova operação" fica desativado durante carregamentos e gravações.
    pub fn can_create(&self) -> bool {
        !self.loading && !self.saving
    }
}

// --- Controlador ---

pub struct ListController<C> {
    client: Arc<C>,
    state: Arc<Mutex<ListState>>,
    liveness: Liveness,
    required: RequiredFields,
}

impl<C> Clone for ListController<C> {
    fn clone(&self) -> Self {
        ListController {
            client: Arc::clone(&self.client),
            state: Arc::clone(&self.state),
            liveness: self.liveness.clone(),
            required: self.required,
        }
    }
}

impl<C: OperationsApi> ListController<C> {
    pub fn new(client: C) -> Self {
        Self::with_required_fields(client, RequiredFields::default())
    }

    pub fn with_required_fields(client: C, required: RequiredFields) -> Self {
        ListController {
            client: Arc::new(client),
            state: Arc::new(Mutex::new(ListState::default())),
            liveness: Liveness::new(),
            required,
        }
    }

    /// Termina a sessão: respostas que cheguem depois disto são descartadas.
    /// As continuações verificam o sinal já com o estado trancado.
    pub fn teardown(&self) {
        tracing::debug!("Sessão da lista terminada; respostas pendentes serão ignoradas.");
        self.liveness.end();
    }

    // --- Carregamento ---

    pub async fn load(&self) -> LoadOutcome {
        let liveness = self.liveness.clone();
        let generation = {
            let mut state = self.state.lock().await;
            if !liveness.is_alive() {
                return LoadOutcome::Discarded;
            }
            state.load_generation += 1;
            state.loads_in_flight += 1;
            state.loading = true;
            state.load_generation
        };

        let result = self.client.get_all().await;

        let mut state = self.state.lock().await;
        if !liveness.is_alive() {
            tracing::debug!("Resposta de carregamento descartada após teardown.");
            return LoadOutcome::Discarded;
        }
        state.loads_in_flight = state.loads_in_flight.saturating_sub(1);
        state.loading = state.loads_in_flight > 0;
        if generation != state.load_generation {
            tracing::debug!(
                "Resposta de carregamento {} ultrapassada por um pedido mais recente.",
                generation
            );
            return LoadOutcome::Superseded;
        }
        match result {
            Ok(operations) => {
                let operations = dedup_by_id(operations);
                let count = operations.len();
                state.collection = operations;
                state.last_error = None;
                tracing::info!("{} operações carregadas.", count);
                LoadOutcome::Loaded(count)
            }
            Err(e) => {
                tracing::error!("Falha ao carregar operações: {}", e);
                state.last_error = Some(LOAD_ERROR_MESSAGE.to_string());
                state.notify(
                    NotificationKind::Error,
                    "Falha ao carregar",
                    "Tente novamente em instantes.",
                );
                LoadOutcome::Failed(e)
            }
        }
    }

    /// Mesmo contrato de `load`; pode ser chamado quantas vezes for preciso.
    pub async fn retry(&self) -> LoadOutcome {
        self.load().await
    }

    // --- Mutações confirmadas pelo servidor ---

    pub async fn create(&self, fields: NewOperation) -> MutationOutcome<Operation> {
        let liveness = self.liveness.clone();
        let result = self.client.create(&fields).await;
        let mut state = self.state.lock().await;
        if !liveness.is_alive() {
            return MutationOutcome::Discarded;
        }
        match result {
            Ok(created) => {
                state.collection.retain(|op| op.id != created.id);
                state.collection.insert(0, created.clone());
                state.notify(
                    NotificationKind::Success,
                    "Operação criada",
                    format!("{} criada com sucesso.", created.name),
                );
                tracing::info!("Operação {} criada.", created.id);
                MutationOutcome::Applied(created)
            }
            Err(e) => {
                tracing::error!("Erro ao criar operação: {}", e);
                state.notify(NotificationKind::Error, "Erro ao criar", "Tente novamente em instantes.");
                MutationOutcome::Failed(e)
            }
        }
    }

    pub async fn update(&self, record: Operation) -> MutationOutcome<Operation> {
        let liveness = self.liveness.clone();
        let result = self.client.update(&record.id, &record).await;
        let mut state = self.state.lock().await;
        if !liveness.is_alive() {
            return MutationOutcome::Discarded;
        }
        match result {
            Ok(saved) => {
                match state.collection.iter_mut().find(|op| op.id == saved.id) {
                    Some(slot) => *slot = saved.clone(),
                    None => tracing::warn!(
                        "Operação {} atualizada mas ausente da lista local.",
                        saved.id
                    ),
                }
                state.notify(
                    NotificationKind::Success,
                    "Operação atualizada",
                    format!("{} salva com sucesso.", saved.name),
                );
                tracing::info!("Operação {} atualizada.", saved.id);
                MutationOutcome::Applied(saved)
            }
            Err(e) => {
                tracing::error!("Erro ao atualizar operação {}: {}", record.id, e);
                state.notify(
                    NotificationKind::Error,
                    "Erro ao salvar",
                    "Não foi possível atualizar a operação.",
                );
                MutationOutcome::Failed(e)
            }
        }
    }

    pub async fn delete(&self, record: &Operation) -> MutationOutcome<()> {
        let liveness = self.liveness.clone();
        {
            let mut state = self.state.lock().await;
            if !liveness.is_alive() {
                return MutationOutcome::Discarded;
            }
            if !state.deleting.insert(record.id.clone()) {
                return MutationOutcome::Busy;
            }
        }

        let result = self.client.delete(&record.id).await;
        let mut state = self.state.lock().await;
        if !liveness.is_alive() {
            return MutationOutcome::Discarded;
        }
        state.deleting.remove(&record.id);
        match result {
            Ok(()) => {
                state.collection.retain(|op| op.id != record.id);
                state.notify(
                    NotificationKind::Success,
                    "Operação removida",
                    format!("{} deletada.", record.name),
                );
                tracing::info!("Operação {} removida.", record.id);
                MutationOutcome::Applied(())
            }
            Err(e) => {
                tracing::error!("Erro ao deletar operação {}: {}", record.id, e);
                state.notify(
                    NotificationKind::Error,
                    "Erro ao deletar",
                    "Não foi possível remover a operação.",
                );
                MutationOutcome::Failed(e)
            }
        }
    }

    /// Volta a buscar uma operação e adota a versão do servidor. Se já não
    /// existir, a linha local fica como está até ao próximo carregamento.
    pub async fn refresh(&self, id: &str) -> MutationOutcome<Operation> {
        let liveness = self.liveness.clone();
        let result = self.client.get_by_id(id).await;
        let mut state = self.state.lock().await;
        if !liveness.is_alive() {
            return MutationOutcome::Discarded;
        }
        match result {
            Ok(fresh) => {
                if let Some(slot) = state.collection.iter_mut().find(|op| op.id == fresh.id) {
                    *slot = fresh.clone();
                }
                MutationOutcome::Applied(fresh)
            }
            Err(e) => {
                tracing::warn!("Não foi possível atualizar {}: {}", id, e);
                let description = match &e {
                    ClientError::NotFound(_) => "A operação já não existe no servidor.",
                    ClientError::Transport(_) => "Tente novamente em instantes.",
                };
                state.notify(NotificationKind::Error, "Falha ao atualizar", description);
                MutationOutcome::Failed(e)
            }
        }
    }

    // --- Formulários ---

    /// Abre o formulário de criação. Recusado enquanto outro formulário grava.
    pub async fn open_create_form(&self) -> bool {
        let mut state = self.state.lock().await;
        if state.form_is_saving() {
            return false;
        }
        state.form = Some(FormState {
            form: OperationForm::create(),
            saving: false,
            errors: Vec::new(),
        });
        true
    }

    pub async fn open_edit_form(&self, id: &str) -> bool {
        let mut state = self.state.lock().await;
        if state.form_is_saving() {
            return false;
        }
        let Some(operation) = state.collection.iter().find(|op| op.id == id).cloned() else {
            tracing::warn!("Tentativa de editar operação inexistente: {}", id);
            return false;
        };
        state.form = Some(FormState {
            form: OperationForm::edit(operation),
            saving: false,
            errors: Vec::new(),
        });
        true
    }

    /// Fecha o formulário, exceto durante a gravação.
    pub async fn close_form(&self) -> bool {
        let mut state = self.state.lock().await;
        if state.form_is_saving() {
            return false;
        }
        state.form.take().is_some()
    }

    pub async fn edit_draft<F>(&self, edit: F) -> bool
    where
        F: FnOnce(&mut OperationDraft),
    {
        let mut state = self.state.lock().await;
        match state.form.as_mut() {
            Some(form_state) if !form_state.saving => {
                edit(form_state.form.draft_mut());
                true
            }
            _ => false,
        }
    }

    /// Valida e envia o formulário aberto. Em caso de sucesso fecha-o; em caso
    /// de falha mantém-no aberto com os valores submetidos.
    pub async fn submit_form(&self) -> SubmitOutcome {
        let submission = {
            let mut state = self.state.lock().await;
            let Some(form_state) = state.form.as_mut() else {
                return SubmitOutcome::NoForm;
            };
            if form_state.saving {
                return SubmitOutcome::Busy;
            }
            match form_state.form.validate(&self.required) {
                Ok(submission) => {
                    form_state.errors.clear();
                    form_state.saving = true;
                    submission
                }
                Err(errors) => {
                    tracing::warn!("Formulário inválido: {} erro(s)", errors.len());
                    form_state.errors = errors.clone();
                    return SubmitOutcome::Invalid(errors);
                }
            }
        };

        let outcome = match submission {
            Submission::Create(fields) => self.create(fields).await,
            Submission::Update(record) => self.update(record).await,
        };

        let mut state = self.state.lock().await;
        if !self.liveness.is_alive() {
            return SubmitOutcome::Discarded;
        }
        match outcome {
            MutationOutcome::Applied(saved) => {
                state.form = None;
                SubmitOutcome::Saved(saved)
            }
            MutationOutcome::Failed(e) => {
                if let Some(form_state) = state.form.as_mut() {
                    form_state.saving = false;
                }
                SubmitOutcome::Failed(e)
            }
            MutationOutcome::Busy => SubmitOutcome::Busy,
            MutationOutcome::Discarded => SubmitOutcome::Discarded,
        }
    }

    // --- Filtros e ordenação ---

    pub async fn set_query(&self, query: impl Into<String>) {
        self.state.lock().await.query = query.into();
    }

    pub async fn toggle_facet(&self, terminal: Terminal) {
        self.state.lock().await.facets.toggle(terminal);
    }

    pub async fn clear_facets(&self) {
        self.state.lock().await.facets.clear();
    }

    pub async fn toggle_sort(&self, column: SortColumn) {
        self.state.lock().await.sort.toggle(column);
    }

    // --- Leitura ---

    /// Cópia da coleção autoritativa, pela ordem guardada.
    pub async fn collection(&self) -> Vec<Operation> {
        self.state.lock().await.collection.clone()
    }

    pub async fn take_notifications(&self) -> Vec<Notification> {
        std::mem::take(&mut self.state.lock().await.notifications)
    }

    /// Fotografia de tudo o que a apresentação precisa, recalculada a cada chamada.
    pub async fn view(&self) -> ListView {
        let state = self.state.lock().await;
        let rows = filter::derive_rows(&state.collection, &state.query, &state.facets, &state.sort)
            .into_iter()
            .cloned()
            .collect();
        let columns = SortColumn::ALL
            .iter()
            .map(|&column| ColumnView {
                column,
                header: column.header(),
                sort: state.sort.direction_for(column),
            })
            .collect();
        let facets = filter::available_terminals(&state.collection)
            .into_iter()
            .map(|terminal| FacetChip {
                terminal,
                active: state.facets.contains(terminal),
            })
            .collect();

        ListView {
            rows,
            columns,
            facets,
            all_terminals_active: state.facets.is_empty(),
            query: state.query.clone(),
            loading: state.loading,
            saving: state.form_is_saving(),
            deleting: state.deleting.iter().cloned().collect(),
            error: state.last_error.clone(),
            form: state.form.clone(),
        }
    }
}

// Mantém a primeira ocorrência de cada id
fn dedup_by_id(operations: Vec<Operation>) -> Vec<Operation> {
    let mut seen = HashSet::new();
    let before = operations.len();
    let unique: Vec<Operation> = operations
        .into_iter()
        .filter(|op| seen.insert(op.id.clone()))
        .collect();
    if unique.len() != before {
        tracing::warn!("{} operações com id repetido ignoradas.", before - unique.len());
    }
    unique
}
