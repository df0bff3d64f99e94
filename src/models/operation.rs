// src/models/operation.rs
use serde::{Deserialize, Serialize};
use std::fmt;

// --- Domínios fechados dos campos categóricos ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationType {
    Embarque,
    Desembarque,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Embarque => "Embarque",
            OperationType::Desembarque => "Desembarque",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terminal {
    #[serde(rename = "Terminal Sul")]
    Sul,
    #[serde(rename = "Terminal Norte")]
    Norte,
    #[serde(rename = "Terminal Oeste")]
    Oeste,
    #[serde(rename = "Terminal Leste")]
    Leste,
}

impl Terminal {
    /// Ordem em que os terminais aparecem no seletor do formulário.
    pub const ALL: [Terminal; 4] = [Terminal::Sul, Terminal::Norte, Terminal::Oeste, Terminal::Leste];

    pub fn as_str(&self) -> &'static str {
        match self {
            Terminal::Sul => "Terminal Sul",
            Terminal::Norte => "Terminal Norte",
            Terminal::Oeste => "Terminal Oeste",
            Terminal::Leste => "Terminal Leste",
        }
    }
}

// Ordenação lexicográfica pelo rótulo, usada na lista de facetas
impl Ord for Terminal {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl PartialOrd for Terminal {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationStatus {
    Criada,
    Processando,
    Finalizada,
}

impl OperationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationStatus::Criada => "Criada",
            OperationStatus::Processando => "Processando",
            OperationStatus::Finalizada => "Finalizada",
        }
    }

    /// Cor do badge de status na tabela.
    pub fn badge_color(&self) -> &'static str {
        match self {
            OperationStatus::Criada => "blue",
            OperationStatus::Processando => "amber",
            OperationStatus::Finalizada => "green",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Entidade ---

/// Registo de embarque/desembarque num terminal do porto.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: OperationType,
    pub terminal: Terminal,
    pub status: OperationStatus,
}

/// Campos enviados ao criar uma operação (o `id` é atribuído pelo servidor).
/// Campos categóricos ausentes ficam a cargo dos padrões do servidor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOperation {
    pub name: String,
    pub description: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<OperationType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal: Option<Terminal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OperationStatus>,
}

/// Corpo parcial aceite pela API em POST, PUT e PATCH.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<OperationType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal: Option<Terminal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OperationStatus>,
}

impl OperationPatch {
    /// Constrói um registo novo aplicando os padrões do servidor aos campos em falta.
    pub fn into_operation(self, id: String) -> Operation {
        Operation {
            id,
            name: self.name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            kind: self.kind.unwrap_or(OperationType::Embarque),
            terminal: self.terminal.unwrap_or(Terminal::Norte),
            status: self.status.unwrap_or(OperationStatus::Criada),
        }
    }

    /// Sobrepõe os campos presentes ao registo atual. O `id` do registo nunca muda.
    pub fn merge_into(self, current: &Operation) -> Operation {
        if let Some(requested) = self.id.as_deref() {
            if requested != current.id {
                tracing::debug!(
                    "Ignorando id '{}' enviado no corpo; mantendo '{}'",
                    requested,
                    current.id
                );
            }
        }
        Operation {
            id: current.id.clone(),
            name: self.name.unwrap_or_else(|| current.name.clone()),
            description: self.description.unwrap_or_else(|| current.description.clone()),
            kind: self.kind.unwrap_or(current.kind),
            terminal: self.terminal.unwrap_or(current.terminal),
            status: self.status.unwrap_or(current.status),
        }
    }
}

impl From<NewOperation> for OperationPatch {
    fn from(fields: NewOperation) -> Self {
        OperationPatch {
            id: None,
            name: Some(fields.name),
            description: Some(fields.description),
            kind: fields.kind,
            terminal: fields.terminal,
            status: fields.status,
        }
    }
}
