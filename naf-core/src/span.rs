//! # Spans e o Índice de Offsets
//!
//! O coração da conversão: um índice em memória que mapeia identificadores de
//! anotação para intervalos de caracteres `(begin, end)` no texto bruto.
//!
//! ## Por que um índice?
//!
//! No NAF, só os tokens (`wf`) carregam offsets próprios. As camadas
//! seguintes definem seus spans **indiretamente**, por referência a
//! identificadores de camadas anteriores:
//!
//! ```text
//! wf  w1 (0,5)   w2 (6,11)          ← offsets absolutos
//! term t1 → [w1, w2]                ← span = união dos spans de w1 e w2
//! entity  → [t1]                    ← span = união dos spans de t1
//! ```
//!
//! Cada camada registra seus spans à medida que é convertida, e as camadas
//! posteriores resolvem os seus consultando o índice. A resolução é
//! estritamente para a frente: um identificador precisa ter sido registrado
//! antes de ser referenciado, nunca o contrário.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::layer::Layer;

/// Um intervalo de caracteres `(begin, end)` no texto bruto, com
/// `begin <= end`. Os offsets contam caracteres Unicode, não bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// Posição inicial (inclusiva).
    pub begin: usize,
    /// Posição final (exclusiva).
    pub end: usize,
}

impl Span {
    pub fn new(begin: usize, end: usize) -> Self {
        Self { begin, end }
    }

    /// Span degenerado `(0, 0)`, usado quando uma lista de referências
    /// está vazia.
    pub fn empty() -> Self {
        Self { begin: 0, end: 0 }
    }

    /// União envolvente de dois spans: `(min(begin), max(end))`.
    ///
    /// É uma união de *fronteiras*, não de intervalos: lacunas entre spans
    /// não adjacentes ficam cobertas pelo resultado.
    pub fn union(&self, other: &Span) -> Span {
        Span {
            begin: self.begin.min(other.begin),
            end: self.end.max(other.end),
        }
    }

    /// Número de caracteres cobertos.
    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.begin, self.end)
    }
}

/// Índice de spans particionado por camada.
///
/// Cada camada referenciável ([`Layer`]) tem sua própria partição
/// identificador → span; a partição é escolhida pelo prefixo do id. O mesmo
/// identificador pode ser registrado de novo, sobrescrevendo o span anterior
/// (ids são únicos dentro da camada em documentos bem formados, então isso
/// só acontece com entrada degenerada).
#[derive(Debug, Clone, Default)]
pub struct SpanIndex {
    partitions: HashMap<Layer, HashMap<String, Span>>,
}

impl SpanIndex {
    /// Cria um índice vazio com uma partição por camada referenciável.
    pub fn new() -> Self {
        let mut partitions = HashMap::new();
        for layer in Layer::all() {
            partitions.insert(layer, HashMap::new());
        }
        Self { partitions }
    }

    /// Registra (ou sobrescreve) o span de `id` na partição deduzida do
    /// prefixo do próprio `id`.
    ///
    /// # Erros
    /// [`Error::UnknownLayer`] se o prefixo não indicar camada conhecida.
    pub fn register(&mut self, id: &str, span: Span) -> Result<()> {
        let layer = Layer::from_id(id)?;
        self.partitions
            .entry(layer)
            .or_default()
            .insert(id.to_string(), span);
        Ok(())
    }

    /// Consulta o span registrado para `id` na partição do seu prefixo.
    ///
    /// # Erros
    /// [`Error::UnknownLayer`] para prefixo desconhecido;
    /// [`Error::UnresolvedIdentifier`] se o id nunca foi registrado.
    pub fn get(&self, id: &str) -> Result<Span> {
        let layer = Layer::from_id(id)?;
        self.lookup(layer, id)
    }

    /// Resolve a união envolvente dos spans de uma lista de referências.
    ///
    /// - Lista vazia → span degenerado `(0, 0)`.
    /// - A partição é escolhida pelo prefixo do **primeiro** id; todos os
    ///   ids da lista são procurados nessa mesma partição.
    /// - O resultado é `(min(begin_i), max(end_i))` sobre todos os spans
    ///   referenciados, independente da ordem da lista.
    ///
    /// # Erros
    /// [`Error::UnknownLayer`] se o prefixo do primeiro id for
    /// desconhecido; [`Error::UnresolvedIdentifier`] para qualquer id da
    /// lista ausente da partição.
    pub fn resolve_range(&self, ids: &[String]) -> Result<Span> {
        let first = match ids.first() {
            None => return Ok(Span::empty()),
            Some(first) => first,
        };
        let layer = Layer::from_id(first)?;
        let mut range = self.lookup(layer, first)?;
        for id in &ids[1..] {
            let span = self.lookup(layer, id)?;
            range = range.union(&span);
        }
        Ok(range)
    }

    /// Quantidade de spans registrados na partição de uma camada.
    pub fn len_of(&self, layer: Layer) -> usize {
        self.partitions.get(&layer).map(HashMap::len).unwrap_or(0)
    }

    fn lookup(&self, layer: Layer, id: &str) -> Result<Span> {
        self.partitions
            .get(&layer)
            .and_then(|partition| partition.get(id))
            .copied()
            .ok_or_else(|| Error::unresolved(id))
    }
}
