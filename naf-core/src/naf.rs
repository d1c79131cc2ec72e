//! # Leitor de Documentos NAF
//!
//! O NAF (NLP Annotation Format) é um XML em camadas: o texto bruto fica na
//! seção `raw`, e cada camada de anotação referencia as anteriores por
//! identificador:
//!
//! ```text
//! <NAF>
//!   <raw>Obama spoke.</raw>
//!   <text>     <wf id="w1" offset="0" length="5">Obama</wf> ... </text>
//!   <terms>    <term id="t1" lemma="obama" pos="R" morphofeat="NNP">
//!                <span><target id="w1" head="yes"/></span>
//!              </term> ... </terms>
//!   <entities> <entity type="PER">
//!                <references><span><target id="t1"/></span></references>
//!              </entity> ... </entities>
//!   <topics>   <topic confidence="0.7">politics</topic> ... </topics>
//! </NAF>
//! ```
//!
//! Este módulo extrai dessas seções apenas os campos que a conversão usa,
//! sem validar o restante do documento. Seções de anotação ausentes viram
//! camadas vazias; só a seção `raw` é obrigatória.

use std::path::Path;

use roxmltree::{Document, Node};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Um token da seção `text`, com offset e comprimento em caracteres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordForm {
    /// Identificador na camada de tokens (ex: "w1").
    pub id: String,
    /// Posição do primeiro caractere no texto bruto.
    pub offset: usize,
    /// Quantidade de caracteres cobertos.
    pub length: usize,
    /// Conteúdo textual do token, como aparece no documento.
    pub text: String,
}

/// Um termo da seção `terms`: lema, classe gramatical e a lista de tokens
/// que o compõem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    /// Identificador na camada de termos (ex: "t1").
    pub id: String,
    pub lemma: String,
    pub pos: String,
    pub morphofeat: String,
    /// Identificadores dos tokens alvo, na ordem do documento.
    pub targets: Vec<String>,
    /// Alvo marcado como núcleo (`head`) do termo, quando presente.
    /// Capturado do documento mas não consumido pela conversão.
    pub head: Option<String>,
}

/// Uma entidade nomeada da seção `entities`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Tipo da entidade (ex: "PER", "ORG", "LOC").
    pub entity_type: String,
    /// Identificadores referenciados (tipicamente termos).
    pub targets: Vec<String>,
    /// Alvo marcado como núcleo, quando presente. Não consumido.
    pub head: Option<String>,
}

/// Um tópico de documento da seção `topics`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    /// Valor original do atributo `confidence`, se presente.
    pub confidence: Option<String>,
    /// Rótulo do tópico (conteúdo textual do elemento).
    pub value: String,
}

/// Um documento NAF já decomposto nas camadas que a conversão consome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NafDocument {
    /// O texto bruto completo (a futura "sofaString" da saída).
    pub raw: String,
    pub word_forms: Vec<WordForm>,
    pub terms: Vec<Term>,
    pub entities: Vec<Entity>,
    pub topics: Vec<Topic>,
}

impl NafDocument {
    /// Lê e decompõe um documento NAF a partir do XML em memória.
    ///
    /// # Erros
    /// [`Error::Xml`] se o XML não parsear; [`Error::MalformedInput`] se a
    /// seção `raw` estiver ausente/vazia ou se um atributo obrigatório
    /// faltar em alguma anotação.
    pub fn parse(xml: &str) -> Result<Self> {
        let doc = Document::parse(xml)?;
        let root = doc.root_element();

        let raw = find_child(root, "raw")
            .and_then(|n| n.text())
            .map(str::to_string)
            .ok_or_else(|| Error::malformed("seção <raw> ausente ou vazia"))?;

        let mut word_forms = Vec::new();
        if let Some(text) = find_child(root, "text") {
            for wf in elements(text, "wf") {
                word_forms.push(parse_word_form(wf)?);
            }
        }

        let mut terms = Vec::new();
        if let Some(section) = find_child(root, "terms") {
            for term in elements(section, "term") {
                terms.push(parse_term(term)?);
            }
        }

        let mut entities = Vec::new();
        if let Some(section) = find_child(root, "entities") {
            for entity in elements(section, "entity") {
                entities.push(parse_entity(entity)?);
            }
        }

        let mut topics = Vec::new();
        if let Some(section) = find_child(root, "topics") {
            for topic in elements(section, "topic") {
                topics.push(Topic {
                    confidence: topic.attribute("confidence").map(str::to_string),
                    value: topic.text().unwrap_or_default().to_string(),
                });
            }
        }

        Ok(Self {
            raw,
            word_forms,
            terms,
            entities,
            topics,
        })
    }

    /// Lê um documento NAF de um arquivo no disco.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let xml = std::fs::read_to_string(path)?;
        Self::parse(&xml)
    }
}

fn parse_word_form(wf: Node) -> Result<WordForm> {
    Ok(WordForm {
        id: req_attr(wf, "id")?.to_string(),
        offset: req_usize(wf, "offset")?,
        length: req_usize(wf, "length")?,
        text: wf.text().unwrap_or_default().to_string(),
    })
}

fn parse_term(term: Node) -> Result<Term> {
    let (targets, head) = span_targets(Some(term))?;
    Ok(Term {
        id: req_attr(term, "id")?.to_string(),
        lemma: req_attr(term, "lemma")?.to_string(),
        pos: req_attr(term, "pos")?.to_string(),
        morphofeat: req_attr(term, "morphofeat")?.to_string(),
        targets,
        head,
    })
}

fn parse_entity(entity: Node) -> Result<Entity> {
    // As referências de uma entidade ficam um nível abaixo, dentro de
    // <references>; uma entidade sem <references> fica sem alvos.
    let references = find_child(entity, "references");
    let (targets, head) = span_targets(references)?;
    Ok(Entity {
        entity_type: req_attr(entity, "type")?.to_string(),
        targets,
        head,
    })
}

/// Extrai os alvos de um elemento `<span>` aninhado em `scope`.
///
/// Retorna a lista de ids na ordem do documento e o alvo marcado com o
/// atributo `head`, se houver. Sem `scope` ou sem `<span>`, a lista é vazia.
fn span_targets(scope: Option<Node>) -> Result<(Vec<String>, Option<String>)> {
    let mut targets = Vec::new();
    let mut head = None;
    let span = match scope.and_then(|n| find_child(n, "span")) {
        None => return Ok((targets, head)),
        Some(span) => span,
    };
    for target in elements(span, "target") {
        let id = req_attr(target, "id")?.to_string();
        if target.attribute("head").is_some() {
            head = Some(id.clone());
        }
        targets.push(id);
    }
    Ok((targets, head))
}

fn find_child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name(name))
}

fn elements<'a, 'input>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |n| n.is_element() && n.has_tag_name(name))
}

fn req_attr<'a>(node: Node<'a, '_>, name: &str) -> Result<&'a str> {
    node.attribute(name).ok_or_else(|| {
        Error::malformed(format!(
            "elemento <{}> sem o atributo obrigatório '{}'",
            node.tag_name().name(),
            name
        ))
    })
}

fn req_usize(node: Node, name: &str) -> Result<usize> {
    let value = req_attr(node, name)?;
    value.parse().map_err(|_| {
        Error::malformed(format!(
            "atributo '{}' de <{}> não é um inteiro: '{}'",
            name,
            node.tag_name().name(),
            value
        ))
    })
}
