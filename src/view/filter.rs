// src/view/filter.rs
//! Derivação pura das linhas visíveis: busca livre + facetas de terminal + ordenação.
//! Nada aqui altera a coleção; tudo recebe referências e devolve uma vista nova.

use crate::models::operation::{Operation, Terminal};
use std::{cmp::Ordering, collections::BTreeSet};
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Decomposição canónica, remoção de diacríticos, minúsculas e `trim`.
pub fn normalize(value: &str) -> String {
    value
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
        .trim()
        .to_string()
}

/// Prefixo sobre tipo OU status. `normalized_query` já deve vir normalizada;
/// vazia aceita tudo.
pub fn matches_query(op: &Operation, normalized_query: &str) -> bool {
    if normalized_query.is_empty() {
        return true;
    }
    normalize(op.kind.as_str()).starts_with(normalized_query)
        || normalize(op.status.as_str()).starts_with(normalized_query)
}

pub fn matches_terminals(op: &Operation, facets: &FacetSelection) -> bool {
    facets.is_empty() || facets.contains(op.terminal)
}

// --- Facetas ---

/// Conjunto de terminais selecionados. Vazio equivale a "todos".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetSelection {
    selected: BTreeSet<Terminal>,
}

impl FacetSelection {
    /// Seleciona, ou desmarca se já estava selecionado.
    pub fn toggle(&mut self, terminal: Terminal) {
        if !self.selected.remove(&terminal) {
            self.selected.insert(terminal);
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn contains(&self, terminal: Terminal) -> bool {
        self.selected.contains(&terminal)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

impl FromIterator<Terminal> for FacetSelection {
    fn from_iter<I: IntoIterator<Item = Terminal>>(iter: I) -> Self {
        FacetSelection {
            selected: iter.into_iter().collect(),
        }
    }
}

/// Terminais distintos presentes na coleção, por ordem lexicográfica.
pub fn available_terminals(collection: &[Operation]) -> Vec<Terminal> {
    collection
        .iter()
        .map(|op| op.terminal)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

// --- Ordenação ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortColumn {
    Id,
    Description,
    Type,
    Terminal,
    Status,
}

impl SortColumn {
    /// Colunas da tabela, na ordem de exibição.
    pub const ALL: [SortColumn; 5] = [
        SortColumn::Id,
        SortColumn::Description,
        SortColumn::Type,
        SortColumn::Terminal,
        SortColumn::Status,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            SortColumn::Id => "ID",
            SortColumn::Description => "Descrição",
            SortColumn::Type => "Tipo",
            SortColumn::Terminal => "Terminal",
            SortColumn::Status => "Status",
        }
    }

    fn key<'a>(&self, op: &'a Operation) -> &'a str {
        match self {
            SortColumn::Id => op.id.as_str(),
            SortColumn::Description => op.description.as_str(),
            SortColumn::Type => op.kind.as_str(),
            SortColumn::Terminal => op.terminal.as_str(),
            SortColumn::Status => op.status.as_str(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Uma única coluna ordenada de cada vez; sem ordenação mantém a ordem da coleção.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortState {
    active: Option<(SortColumn, SortDirection)>,
}

impl SortState {
    /// Ciclo nenhum -> ascendente -> descendente -> nenhum. Clicar noutra coluna
    /// começa essa coluna em ascendente.
    pub fn toggle(&mut self, column: SortColumn) {
        self.active = match self.active {
            Some((current, SortDirection::Ascending)) if current == column => {
                Some((column, SortDirection::Descending))
            }
            Some((current, SortDirection::Descending)) if current == column => None,
            _ => Some((column, SortDirection::Ascending)),
        };
    }

    pub fn active(&self) -> Option<(SortColumn, SortDirection)> {
        self.active
    }

    /// Indicador para o cabeçalho de `column`.
    pub fn direction_for(&self, column: SortColumn) -> Option<SortDirection> {
        match self.active {
            Some((current, direction)) if current == column => Some(direction),
            _ => None,
        }
    }

    fn compare(&self, a: &Operation, b: &Operation) -> Ordering {
        match self.active {
            Some((column, SortDirection::Ascending)) => column.key(a).cmp(column.key(b)),
            Some((column, SortDirection::Descending)) => column.key(b).cmp(column.key(a)),
            None => Ordering::Equal,
        }
    }
}

// --- Derivação ---

/// Filtra (busca E facetas) e depois ordena. Empates e ausência de ordenação
/// preservam a ordem original da coleção.
pub fn derive_rows<'a>(
    collection: &'a [Operation],
    query: &str,
    facets: &FacetSelection,
    sort: &SortState,
) -> Vec<&'a Operation> {
    let normalized_query = normalize(query);
    let mut rows: Vec<&Operation> = collection
        .iter()
        .filter(|op| matches_query(op, &normalized_query) && matches_terminals(op, facets))
        .collect();

    if sort.active().is_some() {
        rows.sort_by(|a, b| sort.compare(a, b));
    }
    rows
}
