//! # Escritor CAS/XMI
//!
//! A saída da conversão é um documento XMI no estilo UIMA: um elemento raiz
//! `xmi:XMI` contendo anotações tipadas ancoradas por offsets e, ao final,
//! um único `cas:Sofa` ("Subject of Analysis") carregando o texto bruto que
//! todas as anotações referenciam.
//!
//! As tags são qualificadas por quatro namespaces fixos; os aliases e URIs
//! precisam bater exatamente para a saída validar contra o esquema:
//!
//! | Alias      | URI                                       |
//! |------------|-------------------------------------------|
//! | `cas`      | `http:///uima/cas.ecore`                  |
//! | `xmi`      | `http://www.omg.org/XMI`                  |
//! | `tcas`     | `http:///uima/tcas.ecore`                 |
//! | `ixatypes` | `http:///ixa/ehu.eus/ixa-pipes/types.ecore` |
//!
//! A montagem e a impressão da árvore são deliberadamente triviais: os
//! elementos guardam atributos na ordem de inserção e a serialização é
//! determinística, para que duas conversões do mesmo documento produzam
//! saídas byte a byte idênticas.

use crate::error::{Error, Result};

/// Tabela de namespaces da saída: alias → URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespaces {
    entries: Vec<(&'static str, &'static str)>,
}

impl Namespaces {
    /// A tabela padrão com os quatro namespaces do esquema de saída.
    pub fn standard() -> Self {
        Self {
            entries: vec![
                ("cas", "http:///uima/cas.ecore"),
                ("xmi", "http://www.omg.org/XMI"),
                ("tcas", "http:///uima/tcas.ecore"),
                ("ixatypes", "http:///ixa/ehu.eus/ixa-pipes/types.ecore"),
            ],
        }
    }

    /// URI registrada para um alias.
    pub fn uri(&self, alias: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(a, _)| *a == alias)
            .map(|(_, uri)| *uri)
    }

    /// Nome qualificado `alias:local` (ex: `qname("cas", "Sofa")` →
    /// `"cas:Sofa"`).
    ///
    /// # Erros
    /// [`Error::MalformedInput`] se o alias não estiver na tabela.
    pub fn qname(&self, alias: &str, local: &str) -> Result<String> {
        if self.uri(alias).is_none() {
            return Err(Error::malformed(format!(
                "namespace desconhecido: '{alias}'"
            )));
        }
        Ok(format!("{alias}:{local}"))
    }

    /// Declarações `xmlns:alias="uri"` na ordem da tabela.
    pub fn declarations(&self) -> impl Iterator<Item = (String, &'static str)> + '_ {
        self.entries
            .iter()
            .map(|(alias, uri)| (format!("xmlns:{alias}"), *uri))
    }
}

impl Default for Namespaces {
    fn default() -> Self {
        Self::standard()
    }
}

/// Um elemento da saída: tag qualificada, atributos em ordem de inserção e
/// texto opcional.
#[derive(Debug, Clone, PartialEq)]
pub struct XmiElement {
    pub tag: String,
    attrs: Vec<(String, String)>,
    text: Option<String>,
}

impl XmiElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            text: None,
        }
    }

    /// Define um atributo; a ordem de chamada é a ordem de serialização.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attrs.push((name.into(), value.into()));
    }

    /// Define o conteúdo textual do elemento. As anotações desta conversão
    /// carregam tudo em atributos; o texto existe para consumidores que
    /// montem outros elementos com o mesmo escritor.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    fn write_into(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_attr(value));
            out.push('"');
        }
        match &self.text {
            None => out.push_str("/>"),
            Some(text) => {
                out.push('>');
                out.push_str(&escape_text(text));
                out.push_str("</");
                out.push_str(&self.tag);
                out.push('>');
            }
        }
    }
}

/// A árvore de saída completa: raiz `xmi:XMI` + filhos na ordem de emissão.
#[derive(Debug, Clone, PartialEq)]
pub struct XmiDocument {
    namespaces: Namespaces,
    elements: Vec<XmiElement>,
}

impl XmiDocument {
    pub fn new() -> Self {
        Self {
            namespaces: Namespaces::standard(),
            elements: Vec::new(),
        }
    }

    pub fn namespaces(&self) -> &Namespaces {
        &self.namespaces
    }

    /// Nome qualificado via a tabela de namespaces do documento.
    pub fn qname(&self, alias: &str, local: &str) -> Result<String> {
        self.namespaces.qname(alias, local)
    }

    /// Anexa um elemento ao final da raiz.
    pub fn push(&mut self, element: XmiElement) {
        self.elements.push(element);
    }

    pub fn elements(&self) -> &[XmiElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Serializa o documento inteiro como uma `String` XML.
    ///
    /// Declaração XML, raiz com os `xmlns:` da tabela, filhos na ordem de
    /// inserção. Nenhuma indentação: a saída é consumida por máquinas.
    pub fn to_xml_string(&self) -> String {
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>");
        out.push_str("<xmi:XMI");
        for (name, uri) in self.namespaces.declarations() {
            out.push(' ');
            out.push_str(&name);
            out.push_str("=\"");
            out.push_str(&escape_attr(uri));
            out.push('"');
        }
        out.push('>');
        for element in &self.elements {
            element.write_into(&mut out);
        }
        out.push_str("</xmi:XMI>");
        out
    }
}

impl Default for XmiDocument {
    fn default() -> Self {
        Self::new()
    }
}

/// Escapa um valor de atributo (`& < > "` e apóstrofo).
fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escapa conteúdo textual (`& <` bastam; `>` por simetria).
fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
