//! # naf-core — Conversão de Anotações NAF para CAS/XMI
//!
//! Este crate converte documentos NAF (NLP Annotation Format) — um XML de
//! anotações linguísticas em camadas sobre um texto bruto — para CAS/XMI, a
//! serialização de anotações tipadas no estilo UIMA, ancoradas por offsets de
//! caracteres em um texto compartilhado ("Sofa").
//!
//! ## Arquitetura do Sistema
//!
//! A conversão é um pipeline linear sobre as camadas do documento:
//!
//! 1. **Leitura** ([`naf`]): o XML de entrada vira um [`NafDocument`] tipado
//!    (texto bruto, tokens, termos, entidades, tópicos).
//! 2. **Resolução de offsets** ([`span`]): um índice em memória mapeia
//!    identificadores para spans `(begin, end)`. Tokens registram spans
//!    absolutos; termos e entidades derivam os seus pela união dos spans dos
//!    identificadores que referenciam.
//! 3. **Conversão** ([`convert`]): cada camada é percorrida em ordem fixa
//!    (tokens → termos → entidades → tópicos) e emite elementos XMI com ids
//!    sintéticos sequenciais.
//! 4. **Escrita** ([`xmi`]): a árvore de saída é serializada com os
//!    namespaces fixos do esquema e o `cas:Sofa` carregando o texto bruto.
//!
//! A indireção de identificadores é o núcleo do problema: o span de um termo
//! só existe em função dos tokens que ele aponta, e o de uma entidade em
//! função dos termos — dois níveis de referência resolvidos pelo
//! [`SpanIndex`] com registro estritamente anterior ao uso.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use naf_core::{convert, NafDocument};
//!
//! // 1. Lê o documento NAF (aqui, uma amostra embutida)
//! let naf = NafDocument::parse(naf_core::samples::OBAMA_NAF).unwrap();
//!
//! // 2. Converte para a árvore CAS/XMI
//! let xmi = convert(&naf).unwrap();
//!
//! // 3. Serializa para gravar em disco
//! let texto = xmi.to_xml_string();
//! assert!(texto.contains("<ixatypes:tok"));
//! assert!(texto.contains("cas:Sofa"));
//! ```
//!
//! ## Módulos Principais
//!
//! - [`convert`]: orquestrador da conversão e eventos de progresso.
//! - [`span`]: o índice identificador → span e a união de intervalos.
//! - [`naf`]: modelo de entrada e leitor XML.
//! - [`xmi`]: namespaces, árvore de saída e serialização.

pub mod convert;
pub mod error;
pub mod layer;
pub mod naf;
pub mod samples;
pub mod span;
pub mod xmi;

pub use convert::{convert, convert_streaming, ConversionContext, ConversionEvent};
pub use error::{Error, Result};
pub use layer::Layer;
pub use naf::{Entity, NafDocument, Term, Topic, WordForm};
pub use span::{Span, SpanIndex};
pub use xmi::{Namespaces, XmiDocument, XmiElement};
