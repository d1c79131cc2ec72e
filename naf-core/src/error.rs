//! Tipos de erro da conversão NAF → CAS/XMI.
//!
//! Nenhum erro é recuperado localmente: qualquer falha em qualquer etapa
//! aborta a conversão inteira e chega ao chamador como `Err`. A árvore de
//! saída só é serializada depois que todas as camadas foram convertidas,
//! portanto nunca existe saída parcial.

use thiserror::Error;

/// Alias de `Result` para as operações do crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Erros possíveis durante a leitura e a conversão de um documento NAF.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// O prefixo do identificador não corresponde a nenhuma camada conhecida
    /// (ex: um id "x7" quando só existem as partições "w" e "t").
    #[error("não foi possível deduzir a camada do identificador '{id}'")]
    UnknownLayer { id: String },

    /// Um identificador foi referenciado antes de ser registrado — violação
    /// da ordem das camadas ou anotação ausente na entrada.
    #[error("identificador '{id}' referenciado mas nunca registrado")]
    UnresolvedIdentifier { id: String },

    /// A estrutura XML esperada está ausente ou um atributo obrigatório
    /// não pôde ser extraído.
    #[error("entrada malformada: {0}")]
    MalformedInput(String),

    /// Falha do parser XML subjacente.
    #[error("erro de XML: {0}")]
    Xml(#[from] roxmltree::Error),

    /// Erro de E/S ao ler a entrada ou gravar a saída.
    #[error("erro de E/S: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Cria um erro de camada desconhecida para o identificador dado.
    pub fn unknown_layer(id: impl Into<String>) -> Self {
        Error::UnknownLayer { id: id.into() }
    }

    /// Cria um erro de identificador não resolvido.
    pub fn unresolved(id: impl Into<String>) -> Self {
        Error::UnresolvedIdentifier { id: id.into() }
    }

    /// Cria um erro de entrada malformada.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Error::MalformedInput(msg.into())
    }
}
