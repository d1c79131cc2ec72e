//! # Documentos NAF de Demonstração
//!
//! Documentos completos embutidos no crate, usados pelos testes e pelo modo
//! de demonstração da linha de comando. Cada um exercita um aspecto da
//! conversão:
//!
//! - [`OBAMA_NAF`]: o caso mínimo clássico — dois tokens, um termo, uma
//!   entidade e um tópico com `confidence`.
//! - [`RIO_NAF`]: entidade multi-alvo ("Rio de Janeiro" cobre três termos),
//!   tópico com e sem `confidence`.

/// Documento mínimo em inglês: "Obama spoke."
pub const OBAMA_NAF: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<NAF xml:lang="en" version="v3">
  <raw>Obama spoke.</raw>
  <text>
    <wf id="w1" offset="0" length="5">Obama</wf>
    <wf id="w2" offset="6" length="5">spoke</wf>
  </text>
  <terms>
    <term id="t1" lemma="obama" pos="R" morphofeat="NNP">
      <span>
        <target id="w1" head="yes"/>
      </span>
    </term>
  </terms>
  <entities>
    <entity type="PER">
      <references>
        <span>
          <target id="t1"/>
        </span>
      </references>
    </entity>
  </entities>
  <topics>
    <topic confidence="0.7">politics</topic>
  </topics>
</NAF>
"#;

/// Documento em português com entidade cobrindo vários termos:
/// "Rio de Janeiro recebeu turistas."
pub const RIO_NAF: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<NAF xml:lang="pt" version="v3">
  <raw>Rio de Janeiro recebeu turistas.</raw>
  <text>
    <wf id="w1" offset="0" length="3">Rio</wf>
    <wf id="w2" offset="4" length="2">de</wf>
    <wf id="w3" offset="7" length="7">Janeiro</wf>
    <wf id="w4" offset="15" length="7">recebeu</wf>
    <wf id="w5" offset="23" length="8">turistas</wf>
  </text>
  <terms>
    <term id="t1" lemma="rio" pos="R" morphofeat="NP00000">
      <span><target id="w1" head="yes"/></span>
    </term>
    <term id="t2" lemma="de" pos="P" morphofeat="SPS00">
      <span><target id="w2"/></span>
    </term>
    <term id="t3" lemma="janeiro" pos="R" morphofeat="NP00000">
      <span><target id="w3"/></span>
    </term>
    <term id="t4" lemma="receber" pos="V" morphofeat="VMIS3S0">
      <span><target id="w4"/></span>
    </term>
    <term id="t5" lemma="turista" pos="N" morphofeat="NCMP000">
      <span><target id="w5"/></span>
    </term>
  </terms>
  <entities>
    <entity type="LOC">
      <references>
        <span>
          <target id="t1" head="yes"/>
          <target id="t2"/>
          <target id="t3"/>
        </span>
      </references>
    </entity>
  </entities>
  <topics>
    <topic>turismo</topic>
    <topic confidence="0.55">viagem</topic>
  </topics>
</NAF>
"#;

/// Pares (nome, documento) para o modo de demonstração da CLI.
pub fn demo_documents() -> Vec<(&'static str, &'static str)> {
    vec![("obama", OBAMA_NAF), ("rio", RIO_NAF)]
}
