//! # Camadas de Anotação NAF
//!
//! O NAF organiza as anotações em camadas empilhadas sobre o texto bruto:
//!
//! | Camada   | Prefixo do id | Exemplo | Define o span por...                  |
//! |----------|---------------|---------|---------------------------------------|
//! | WordForm | `w`           | `w12`   | offset + length próprios              |
//! | Term     | `t`           | `t12`   | união dos spans dos tokens alvo       |
//!
//! Entidades e tópicos também são camadas do NAF, mas nada a jusante as
//! referencia por identificador, então elas não têm partição própria no
//! índice de spans.
//!
//! A convenção "primeiro caractere do id indica a camada" aparece em vários
//! pontos do formato; este módulo concentra essa dedução em um único lugar
//! ([`Layer::from_id`]) em vez de espalhá-la pelos conversores.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Camadas que podem ser referenciadas por identificador em camadas
/// posteriores. Cada variante corresponde a uma partição do índice de spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    /// **Token** (`<wf>` na seção `text`). Primeira camada, spans absolutos.
    WordForm,
    /// **Termo** (`<term>` na seção `terms`). Span derivado dos tokens alvo.
    Term,
}

impl Layer {
    /// Prefixo que identifica a camada no primeiro caractere de um id.
    pub fn prefix(&self) -> char {
        match self {
            Layer::WordForm => 'w',
            Layer::Term => 't',
        }
    }

    /// Nome legível da camada (para logs e eventos).
    pub fn name(&self) -> &'static str {
        match self {
            Layer::WordForm => "wordform",
            Layer::Term => "term",
        }
    }

    /// Todas as camadas referenciáveis, na ordem em que são convertidas.
    pub fn all() -> [Layer; 2] {
        [Layer::WordForm, Layer::Term]
    }

    /// Deduz a camada a partir do primeiro caractere do identificador.
    ///
    /// Esta é a única função do crate que interpreta o prefixo; todos os
    /// pontos de registro e resolução passam por aqui.
    ///
    /// # Erros
    /// [`Error::UnknownLayer`] se o id for vazio ou o prefixo não
    /// corresponder a nenhuma camada conhecida.
    pub fn from_id(id: &str) -> Result<Layer> {
        match id.chars().next() {
            Some('w') => Ok(Layer::WordForm),
            Some('t') => Ok(Layer::Term),
            _ => Err(Error::unknown_layer(id)),
        }
    }
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_id_conhecidos() {
        assert_eq!(Layer::from_id("w1").unwrap(), Layer::WordForm);
        assert_eq!(Layer::from_id("w42").unwrap(), Layer::WordForm);
        assert_eq!(Layer::from_id("t1").unwrap(), Layer::Term);
    }

    #[test]
    fn test_from_id_prefixo_desconhecido() {
        let err = Layer::from_id("e1").unwrap_err();
        assert!(matches!(err, Error::UnknownLayer { ref id } if id == "e1"));
    }

    #[test]
    fn test_from_id_vazio() {
        assert!(matches!(
            Layer::from_id(""),
            Err(Error::UnknownLayer { .. })
        ));
    }

    #[test]
    fn test_prefixos_unicos() {
        let all = Layer::all();
        let mut prefixes: Vec<char> = all.iter().map(|l| l.prefix()).collect();
        prefixes.sort();
        prefixes.dedup();
        assert_eq!(prefixes.len(), all.len());
    }
}
