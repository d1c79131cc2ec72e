//! # Conversão NAF → CAS/XMI — Orquestrador com Eventos Observáveis
//!
//! O orquestrador percorre as camadas do documento NAF em ordem fixa e emite
//! as anotações XMI correspondentes, propagando offsets através do índice de
//! spans ([`SpanIndex`]):
//!
//! 1. **Tokens** (`wf` → `ixatypes:tok`): registram seus spans absolutos.
//! 2. **Termos** (`term` → `ixatypes:lexUnit`): resolvem a união dos spans
//!    dos tokens alvo e registram o resultado sob o próprio id.
//! 3. **Entidades** (`entity` → `ixatypes:entity`): resolvem a união sobre
//!    os termos referenciados; nada registra, nada as referencia depois.
//! 4. **Tópicos** (`topic` → `ixatypes:topic`): cobrem o documento inteiro,
//!    sem consultar o índice.
//! 5. **Sofa** (`cas:Sofa`): o texto bruto compartilhado, emitido por último.
//!
//! A ordem é estrutural: cada camada supõe que os identificadores das
//! anteriores já estão registrados. Qualquer falha aborta a conversão inteira
//! e nenhuma saída parcial é produzida.
//!
//! ## Modos de Uso
//! - **Sync**: [`convert`] para scripts e chamadas diretas.
//! - **Streaming**: [`convert_streaming`] emite [`ConversionEvent`]s por um
//!   canal `mpsc` enquanto trabalha, para frontends que mostram progresso.

use std::sync::mpsc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::naf::{Entity, NafDocument, Term, Topic, WordForm};
use crate::span::{Span, SpanIndex};
use crate::xmi::{XmiDocument, XmiElement};

/// Identificador fixo do Sofa na saída; toda anotação aponta para ele via o
/// atributo `sofa`.
const SOFA_ID: &str = "1";

/// Eventos emitidos durante a conversão.
///
/// Permitem que um frontend acompanhe o progresso camada a camada. A
/// serialização usa o formato `{"type": ..., "data": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ConversionEvent {
    /// O texto bruto foi extraído e o contexto da conversão foi criado.
    RawExtracted { chars: usize },
    /// Uma anotação foi emitida na árvore de saída.
    AnnotationEmitted {
        tag: String,
        xmi_id: String,
        begin: usize,
        end: usize,
    },
    /// Uma camada inteira foi convertida.
    LayerDone { layer: String, total: usize },
    /// Conversão concluída; a árvore está pronta para serializar.
    Done {
        total_elements: usize,
        processing_ms: u64,
    },
    /// Falha irrecuperável; a conversão foi abortada.
    Error { message: String },
}

/// Estado de uma conversão em andamento.
///
/// Criado do zero para cada documento e descartado ao final: o índice de
/// spans e o contador de ids nunca vazam de uma conversão para outra.
#[derive(Debug)]
pub struct ConversionContext {
    raw: String,
    raw_chars: usize,
    index: SpanIndex,
    counter: u64,
}

impl ConversionContext {
    /// Cria o contexto para um texto bruto. O contador de ids sintéticos
    /// começa em 1 e nunca reutiliza valores.
    pub fn new(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            raw_chars: raw.chars().count(),
            index: SpanIndex::new(),
            counter: 1,
        }
    }

    /// Emite o próximo id sintético como string decimal.
    pub fn next_id(&mut self) -> String {
        let id = self.counter.to_string();
        self.counter += 1;
        id
    }

    /// Identificador do Sofa compartilhado.
    pub fn sofa_id(&self) -> &'static str {
        SOFA_ID
    }

    /// O texto bruto do documento.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Comprimento do texto bruto em caracteres (não em bytes) — o `end`
    /// dos spans de tópico.
    pub fn raw_char_count(&self) -> usize {
        self.raw_chars
    }

    /// Acesso de leitura ao índice de spans.
    pub fn index(&self) -> &SpanIndex {
        &self.index
    }
}

/// Converte um documento NAF em uma árvore CAS/XMI, de forma síncrona.
///
/// # Exemplo
/// ```rust
/// use naf_core::{convert, NafDocument};
///
/// let naf = NafDocument::parse(naf_core::samples::OBAMA_NAF).unwrap();
/// let xmi = convert(&naf).unwrap();
/// assert!(xmi.to_xml_string().contains("cas:Sofa"));
/// ```
pub fn convert(naf: &NafDocument) -> Result<XmiDocument> {
    let (tx, _rx) = mpsc::channel();
    convert_streaming(naf, &tx)
}

/// Converte emitindo [`ConversionEvent`]s pelo canal `tx`.
///
/// O último evento é sempre `Done` (sucesso) ou `Error` (falha); no caso de
/// falha o erro também é retornado como `Err`, para que o chamador decida
/// como reportá-lo. Falhas de envio no canal são ignoradas: um receptor
/// desinteressado não afeta a conversão.
pub fn convert_streaming(
    naf: &NafDocument,
    tx: &mpsc::Sender<ConversionEvent>,
) -> Result<XmiDocument> {
    let start = Instant::now();
    match convert_inner(naf, tx) {
        Ok(out) => {
            let _ = tx.send(ConversionEvent::Done {
                total_elements: out.len(),
                processing_ms: start.elapsed().as_millis() as u64,
            });
            Ok(out)
        }
        Err(e) => {
            let _ = tx.send(ConversionEvent::Error {
                message: e.to_string(),
            });
            Err(e)
        }
    }
}

fn convert_inner(
    naf: &NafDocument,
    tx: &mpsc::Sender<ConversionEvent>,
) -> Result<XmiDocument> {
    let mut ctx = ConversionContext::new(&naf.raw);
    let mut out = XmiDocument::new();
    let _ = tx.send(ConversionEvent::RawExtracted {
        chars: ctx.raw_char_count(),
    });

    convert_word_forms(&naf.word_forms, &mut ctx, &mut out, tx)?;
    convert_terms(&naf.terms, &mut ctx, &mut out, tx)?;
    convert_entities(&naf.entities, &mut ctx, &mut out, tx)?;
    convert_topics(&naf.topics, &mut ctx, &mut out, tx)?;
    emit_sofa(&ctx, &mut out)?;

    Ok(out)
}

/// Camada de tokens: spans absolutos `(offset, offset + length)`.
///
/// Registra cada span na partição "w" do índice — pré-requisito para a
/// camada de termos — e emite um `ixatypes:tok` por token.
fn convert_word_forms(
    word_forms: &[WordForm],
    ctx: &mut ConversionContext,
    out: &mut XmiDocument,
    tx: &mpsc::Sender<ConversionEvent>,
) -> Result<()> {
    for wf in word_forms {
        let span = Span::new(wf.offset, wf.offset + wf.length);
        ctx.index.register(&wf.id, span)?;
        emit_annotation(ctx, out, tx, "ixatypes", "tok", span, |_| {})?;
    }
    let _ = tx.send(ConversionEvent::LayerDone {
        layer: "tok".to_string(),
        total: word_forms.len(),
    });
    Ok(())
}

/// Camada de termos: span = união dos spans dos tokens alvo.
///
/// O span resolvido é registrado sob o id do próprio termo, tornando o
/// termo referenciável pela camada de entidades. Uma lista de alvos vazia
/// resolve para o span degenerado `(0, 0)`. O marcador `head` dos alvos é
/// carregado no modelo de entrada mas não participa da conversão.
fn convert_terms(
    terms: &[Term],
    ctx: &mut ConversionContext,
    out: &mut XmiDocument,
    tx: &mpsc::Sender<ConversionEvent>,
) -> Result<()> {
    for term in terms {
        let span = ctx.index.resolve_range(&term.targets)?;
        ctx.index.register(&term.id, span)?;
        emit_annotation(ctx, out, tx, "ixatypes", "lexUnit", span, |el| {
            el.set("lemma", term.lemma.as_str());
            el.set("pos", term.pos.as_str());
            el.set("morphofeat", term.morphofeat.as_str());
        })?;
    }
    let _ = tx.send(ConversionEvent::LayerDone {
        layer: "lexUnit".to_string(),
        total: terms.len(),
    });
    Ok(())
}

/// Camada de entidades: span = união sobre os termos referenciados.
///
/// Entidades não são registradas no índice — nenhuma camada posterior as
/// referencia por identificador.
fn convert_entities(
    entities: &[Entity],
    ctx: &mut ConversionContext,
    out: &mut XmiDocument,
    tx: &mpsc::Sender<ConversionEvent>,
) -> Result<()> {
    for entity in entities {
        let span = ctx.index.resolve_range(&entity.targets)?;
        emit_annotation(ctx, out, tx, "ixatypes", "entity", span, |el| {
            el.set("type", entity.entity_type.as_str());
        })?;
    }
    let _ = tx.send(ConversionEvent::LayerDone {
        layer: "entity".to_string(),
        total: entities.len(),
    });
    Ok(())
}

/// Camada de tópicos: o span é sempre o documento inteiro,
/// `(0, nº de caracteres do texto bruto)`, sem consultar o índice.
///
/// Quando o atributo `confidence` existe na entrada, o valor emitido é o
/// literal `"1.0"` — o valor original não é copiado; sem o atributo, nada é
/// emitido.
fn convert_topics(
    topics: &[Topic],
    ctx: &mut ConversionContext,
    out: &mut XmiDocument,
    tx: &mpsc::Sender<ConversionEvent>,
) -> Result<()> {
    let span = Span::new(0, ctx.raw_char_count());
    for topic in topics {
        emit_annotation(ctx, out, tx, "ixatypes", "topic", span, |el| {
            if topic.confidence.is_some() {
                el.set("confidence", "1.0");
            }
            el.set("value", topic.value.as_str());
        })?;
    }
    let _ = tx.send(ConversionEvent::LayerDone {
        layer: "topic".to_string(),
        total: topics.len(),
    });
    Ok(())
}

/// Emite o `cas:Sofa` com o texto bruto, último elemento da árvore.
fn emit_sofa(ctx: &ConversionContext, out: &mut XmiDocument) -> Result<()> {
    let tag = out.qname("cas", "Sofa")?;
    let id_attr = out.qname("xmi", "id")?;
    let mut el = XmiElement::new(tag);
    el.set(id_attr, ctx.sofa_id());
    el.set("sofaNum", "1");
    el.set("sofaId", "_initialView");
    el.set("mimeType", "text");
    el.set("sofaString", ctx.raw());
    out.push(el);
    Ok(())
}

/// Monta uma anotação com os atributos comuns (id sintético, referência ao
/// Sofa, begin/end decimais) e delega os específicos da camada ao `extra`.
fn emit_annotation(
    ctx: &mut ConversionContext,
    out: &mut XmiDocument,
    tx: &mpsc::Sender<ConversionEvent>,
    ns: &str,
    local: &str,
    span: Span,
    extra: impl FnOnce(&mut XmiElement),
) -> Result<()> {
    let tag = out.qname(ns, local)?;
    let id_attr = out.qname("xmi", "id")?;
    let xmi_id = ctx.next_id();
    let mut el = XmiElement::new(tag.as_str());
    el.set(id_attr, xmi_id.as_str());
    el.set("sofa", ctx.sofa_id());
    el.set("begin", span.begin.to_string());
    el.set("end", span.end.to_string());
    extra(&mut el);
    out.push(el);
    let _ = tx.send(ConversionEvent::AnnotationEmitted {
        tag,
        xmi_id,
        begin: span.begin,
        end: span.end,
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::naf::NafDocument;
    use crate::samples::{OBAMA_NAF, RIO_NAF};

    fn attrs(el: &XmiElement, names: &[&str]) -> Vec<String> {
        names
            .iter()
            .map(|n| el.attr(n).unwrap_or("<ausente>").to_string())
            .collect()
    }

    #[test]
    fn test_conversao_obama_fim_a_fim() {
        let naf = NafDocument::parse(OBAMA_NAF).unwrap();
        let out = convert(&naf).unwrap();

        // 2 tokens + 1 termo + 1 entidade + 1 tópico + Sofa, nessa ordem.
        let tags: Vec<_> = out.elements().iter().map(|e| e.tag.as_str()).collect();
        assert_eq!(
            tags,
            vec![
                "ixatypes:tok",
                "ixatypes:tok",
                "ixatypes:lexUnit",
                "ixatypes:entity",
                "ixatypes:topic",
                "cas:Sofa",
            ]
        );

        let els = out.elements();
        // Tokens com spans exatos (offset, offset + length).
        assert_eq!(
            attrs(&els[0], &["xmi:id", "sofa", "begin", "end"]),
            vec!["1", "1", "0", "5"]
        );
        assert_eq!(
            attrs(&els[1], &["xmi:id", "sofa", "begin", "end"]),
            vec!["2", "1", "6", "11"]
        );
        // Termo t1 → [w1]: herda o span do token.
        assert_eq!(
            attrs(&els[2], &["xmi:id", "begin", "end", "lemma", "pos", "morphofeat"]),
            vec!["3", "0", "5", "obama", "R", "NNP"]
        );
        // Entidade → [t1]: dois níveis de indireção até os tokens.
        assert_eq!(
            attrs(&els[3], &["xmi:id", "begin", "end", "type"]),
            vec!["4", "0", "5", "PER"]
        );
        // Tópico cobre o documento inteiro; confidence presente vira "1.0".
        assert_eq!(
            attrs(&els[4], &["xmi:id", "begin", "end", "confidence", "value"]),
            vec!["5", "0", "12", "1.0", "politics"]
        );
        // Sofa com o texto bruto e os atributos fixos.
        assert_eq!(
            attrs(
                &els[5],
                &["xmi:id", "sofaNum", "sofaId", "mimeType", "sofaString"]
            ),
            vec!["1", "1", "_initialView", "text", "Obama spoke."]
        );
    }

    #[test]
    fn test_entidade_multi_alvo_une_os_spans() {
        let naf = NafDocument::parse(RIO_NAF).unwrap();
        let out = convert(&naf).unwrap();

        let entity = out
            .elements()
            .iter()
            .find(|e| e.tag == "ixatypes:entity")
            .unwrap();
        // "Rio de Janeiro": união de t1 (0,3), t2 (4,6) e t3 (7,14).
        assert_eq!(entity.attr("begin"), Some("0"));
        assert_eq!(entity.attr("end"), Some("14"));
        assert_eq!(entity.attr("type"), Some("LOC"));
    }

    #[test]
    fn test_topico_sem_confidence_nao_emite_o_atributo() {
        let naf = NafDocument::parse(RIO_NAF).unwrap();
        let out = convert(&naf).unwrap();

        let topics: Vec<_> = out
            .elements()
            .iter()
            .filter(|e| e.tag == "ixatypes:topic")
            .collect();
        assert_eq!(topics.len(), 2);
        assert_eq!(topics[0].attr("value"), Some("turismo"));
        assert_eq!(topics[0].attr("confidence"), None);
        // Presente na entrada como "0.55", emitido como "1.0".
        assert_eq!(topics[1].attr("confidence"), Some("1.0"));
        // Ambos cobrem o texto inteiro (32 caracteres).
        for topic in &topics {
            assert_eq!(topic.attr("begin"), Some("0"));
            assert_eq!(topic.attr("end"), Some("32"));
        }
    }

    #[test]
    fn test_ids_sinteticos_sequenciais_e_deterministicos() {
        let naf = NafDocument::parse(RIO_NAF).unwrap();
        let a = convert(&naf).unwrap().to_xml_string();
        let b = convert(&naf).unwrap().to_xml_string();
        assert_eq!(a, b);

        let out = convert(&naf).unwrap();
        let ids: Vec<_> = out
            .elements()
            .iter()
            .filter_map(|e| e.attr("xmi:id"))
            .collect();
        // 5 tokens, 5 termos, 1 entidade, 2 tópicos: ids 1..=13 na ordem de
        // emissão; o Sofa reutiliza o identificador fixo "1".
        assert_eq!(
            ids,
            vec!["1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11", "12", "13", "1"]
        );
    }

    #[test]
    fn test_termo_com_alvo_nao_registrado_falha() {
        let naf = NafDocument::parse(
            r#"<NAF><raw>abc</raw><terms>
                <term id="t1" lemma="a" pos="N" morphofeat="F">
                  <span><target id="w9"/></span>
                </term>
            </terms></NAF>"#,
        )
        .unwrap();
        let err = convert(&naf).unwrap_err();
        assert!(matches!(
            err,
            Error::UnresolvedIdentifier { ref id } if id == "w9"
        ));
    }

    #[test]
    fn test_alvo_com_prefixo_desconhecido_falha() {
        let naf = NafDocument::parse(
            r#"<NAF><raw>abc</raw><entities>
                <entity type="PER">
                  <references><span><target id="x1"/></span></references>
                </entity>
            </entities></NAF>"#,
        )
        .unwrap();
        assert!(matches!(
            convert(&naf),
            Err(Error::UnknownLayer { .. })
        ));
    }

    #[test]
    fn test_termo_sem_alvos_emite_span_degenerado() {
        let naf = NafDocument::parse(
            r#"<NAF><raw>abc</raw><terms>
                <term id="t1" lemma="a" pos="N" morphofeat="F"/>
            </terms></NAF>"#,
        )
        .unwrap();
        let out = convert(&naf).unwrap();
        let term = out
            .elements()
            .iter()
            .find(|e| e.tag == "ixatypes:lexUnit")
            .unwrap();
        assert_eq!(term.attr("begin"), Some("0"));
        assert_eq!(term.attr("end"), Some("0"));
    }

    #[test]
    fn test_documento_sem_anotacoes_emite_so_o_sofa() {
        let naf = NafDocument::parse("<NAF><raw>abc</raw></NAF>").unwrap();
        let out = convert(&naf).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out.elements()[0].tag, "cas:Sofa");
        assert_eq!(out.elements()[0].attr("sofaString"), Some("abc"));
    }

    #[test]
    fn test_offsets_contam_caracteres_nao_bytes() {
        // "São" tem 3 caracteres e 4 bytes; o span do tópico usa caracteres.
        let naf = NafDocument::parse(
            r#"<NAF><raw>São Paulo</raw><topics><topic confidence="0.9">cidades</topic></topics></NAF>"#,
        )
        .unwrap();
        let out = convert(&naf).unwrap();
        let topic = out
            .elements()
            .iter()
            .find(|e| e.tag == "ixatypes:topic")
            .unwrap();
        assert_eq!(topic.attr("end"), Some("9"));
    }

    #[test]
    fn test_eventos_streaming() {
        let naf = NafDocument::parse(OBAMA_NAF).unwrap();
        let (tx, rx) = mpsc::channel();
        convert_streaming(&naf, &tx).unwrap();
        drop(tx);
        let events: Vec<ConversionEvent> = rx.try_iter().collect();

        assert!(
            matches!(&events[0], ConversionEvent::RawExtracted { chars: 12 }),
            "primeiro evento deve ser RawExtracted"
        );
        assert!(
            matches!(events.last(), Some(ConversionEvent::Done { total_elements: 6, .. })),
            "último evento deve ser Done"
        );
        // Uma LayerDone por camada, na ordem de conversão.
        let layers: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                ConversionEvent::LayerDone { layer, .. } => Some(layer.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(layers, vec!["tok", "lexUnit", "entity", "topic"]);
    }

    #[test]
    fn test_falha_emite_evento_error_e_retorna_err() {
        let naf = NafDocument::parse(
            r#"<NAF><raw>abc</raw><terms>
                <term id="t1" lemma="a" pos="N" morphofeat="F">
                  <span><target id="w1"/></span>
                </term>
            </terms></NAF>"#,
        )
        .unwrap();
        let (tx, rx) = mpsc::channel();
        assert!(convert_streaming(&naf, &tx).is_err());
        drop(tx);
        let events: Vec<ConversionEvent> = rx.try_iter().collect();
        assert!(matches!(
            events.last(),
            Some(ConversionEvent::Error { .. })
        ));
    }

    #[test]
    fn test_evento_serializa_no_formato_type_data() {
        let event = ConversionEvent::LayerDone {
            layer: "tok".to_string(),
            total: 2,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "LayerDone");
        assert_eq!(json["data"]["layer"], "tok");
        assert_eq!(json["data"]["total"], 2);
    }
}
