// src/controller/form.rs
use crate::{
    error::{FormField, ValidationError},
    models::operation::{NewOperation, Operation, OperationStatus, OperationType, Terminal},
};

/// Valores do formulário enquanto o utilizador edita. As seleções podem estar
/// transitoriamente vazias; só a validação exige valores do domínio fechado.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationDraft {
    pub name: String,
    pub description: String,
    pub kind: Option<OperationType>,
    pub terminal: Option<Terminal>,
    pub status: Option<OperationStatus>,
}

impl OperationDraft {
    /// Pré-preenchimento do formulário de criação.
    pub fn create_defaults() -> Self {
        OperationDraft {
            name: String::new(),
            description: String::new(),
            kind: Some(OperationType::Embarque),
            terminal: Some(Terminal::Sul),
            status: Some(OperationStatus::Criada),
        }
    }
}

impl From<&Operation> for OperationDraft {
    fn from(op: &Operation) -> Self {
        OperationDraft {
            name: op.name.clone(),
            description: op.description.clone(),
            kind: Some(op.kind),
            terminal: Some(op.terminal),
            status: Some(op.status),
        }
    }
}

/// Campos obrigatórios por modo. O status não aparece no formulário de criação,
/// por isso só é exigido na edição.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredFields {
    pub description: bool,
    pub kind: bool,
    pub terminal: bool,
    pub status_on_create: bool,
    pub status_on_edit: bool,
}

impl Default for RequiredFields {
    fn default() -> Self {
        RequiredFields {
            description: true,
            kind: true,
            terminal: true,
            status_on_create: false,
            status_on_edit: true,
        }
    }
}

/// Formulário de criação ou edição. A edição carrega sempre a operação original.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationForm {
    Create { draft: OperationDraft },
    Edit { operation: Operation, draft: OperationDraft },
}

/// Pedido pronto a enviar, produzido por uma validação bem-sucedida.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Create(NewOperation),
    Update(Operation),
}

impl OperationForm {
    pub fn create() -> Self {
        OperationForm::Create {
            draft: OperationDraft::create_defaults(),
        }
    }

    pub fn edit(operation: Operation) -> Self {
        let draft = OperationDraft::from(&operation);
        OperationForm::Edit { operation, draft }
    }

    pub fn draft(&self) -> &OperationDraft {
        match self {
            OperationForm::Create { draft } | OperationForm::Edit { draft, .. } => draft,
        }
    }

    pub fn draft_mut(&mut self) -> &mut OperationDraft {
        match self {
            OperationForm::Create { draft } | OperationForm::Edit { draft, .. } => draft,
        }
    }

    pub fn is_edit(&self) -> bool {
        matches!(self, OperationForm::Edit { .. })
    }

    pub fn title(&self) -> &'static str {
        match self {
            OperationForm::Create { .. } => "Nova operação",
            OperationForm::Edit { .. } => "Editar operação",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self {
            OperationForm::Create { .. } => "Criar",
            OperationForm::Edit { .. } => "Salvar",
        }
    }

    /// Valida o rascunho. Devolve todos os erros de uma vez para exibição junto
    /// de cada campo; nada é enviado enquanto houver erros.
    pub fn validate(&self, required: &RequiredFields) -> Result<Submission, Vec<ValidationError>> {
        let draft = self.draft();
        let name = draft.name.trim().to_string();
        let status_required = match self {
            OperationForm::Create { .. } => required.status_on_create,
            OperationForm::Edit { .. } => required.status_on_edit,
        };

        let mut errors = Vec::new();
        if name.is_empty() {
            errors.push(ValidationError::required(FormField::Name));
        }
        if required.description && draft.description.trim().is_empty() {
            errors.push(ValidationError::required(FormField::Description));
        }
        if required.kind && draft.kind.is_none() {
            errors.push(ValidationError::required(FormField::Type));
        }
        if required.terminal && draft.terminal.is_none() {
            errors.push(ValidationError::required(FormField::Terminal));
        }
        if status_required && draft.status.is_none() {
            errors.push(ValidationError::required(FormField::Status));
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(match self {
            OperationForm::Create { draft } => Submission::Create(NewOperation {
                name,
                description: draft.description.clone(),
                kind: draft.kind,
                terminal: draft.terminal,
                status: draft.status,
            }),
            OperationForm::Edit { operation, draft } => Submission::Update(Operation {
                id: operation.id.clone(),
                name,
                description: draft.description.clone(),
                kind: draft.kind.unwrap_or(operation.kind),
                terminal: draft.terminal.unwrap_or(operation.terminal),
                status: draft.status.unwrap_or(operation.status),
            }),
        })
    }
}
