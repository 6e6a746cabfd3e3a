//! # Acumulador do Documento
//!
//! Estado de um ciclo de conversão: o buffer de texto (uma unidade por nó),
//! o contador de anotações (aid) e o conjunto de anotações já emitidas.
//!
//! O gid (id global do nó) é sempre igual ao número de unidades no buffer:
//! cada token e cada espaço não vazio ocupam exatamente um passo de nó.
//!
//! O reset entre documentos é feito trocando o valor inteiro por um novo
//! ([`DocumentBuilder::finish`] consome `self`), nunca limpando campo a campo.

use serde::{Deserialize, Serialize};

use crate::annotation::{plain_feature, Annotation, Feature};

/// Estado mutável acumulado entre `process_sentence` e `final_output`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentBuilder {
    text: Vec<String>,
    annotations: Vec<Annotation>,
    aid: usize,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Próximo id de nó a ser ocupado.
    pub fn gid(&self) -> usize {
        self.text.len()
    }

    /// Próximo id de anotação.
    pub fn aid(&self) -> usize {
        self.aid
    }

    /// Acrescenta uma unidade de texto e devolve o gid que ela ocupa.
    pub fn push_unit(&mut self, unit: &str) -> usize {
        let gid = self.gid();
        self.text.push(unit.to_string());
        gid
    }

    /// Reserva o aid atual e avança o contador.
    pub fn next_aid(&mut self) -> usize {
        let aid = self.aid;
        self.aid += 1;
        aid
    }

    pub fn push_annotation(&mut self, annotation: Annotation) {
        self.annotations.push(annotation);
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn text_units(&self) -> &[String] {
        &self.text
    }

    /// Texto concatenado das unidades `[start, end)`.
    pub fn text_between(&self, start: usize, end: usize) -> String {
        let end = end.min(self.text.len());
        if start >= end {
            return String::new();
        }
        self.text[start..end].concat()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.annotations.is_empty()
    }

    /// Fecha o ciclo e entrega o documento tipado.
    pub fn finish(self, source_url: &str) -> GateDocument {
        GateDocument {
            features: vec![plain_feature("gate.SourceURL", source_url)],
            text: self.text,
            annotations: self.annotations,
        }
    }
}

/// Um item de `TextWithNodes`: marcador de nó ou unidade de texto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeItem<'a> {
    Node(usize),
    Text(&'a str),
}

/// Documento GATE completo, pronto para serialização.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateDocument {
    /// Features do documento (`GateDocumentFeatures`).
    pub features: Vec<Feature>,
    /// Unidades de texto; a unidade `i` fica entre os nós `i` e `i + 1`.
    pub text: Vec<String>,
    /// O `AnnotationSet` padrão, na ordem de emissão.
    pub annotations: Vec<Annotation>,
}

impl GateDocument {
    /// Intercala nós e texto: `Node(0) t0 Node(1) t1 … Node(N)`, `2N + 1` itens.
    pub fn nodes(&self) -> impl Iterator<Item = NodeItem<'_>> + '_ {
        std::iter::once(NodeItem::Node(0)).chain(
            self.text
                .iter()
                .enumerate()
                .flat_map(|(i, unit)| [NodeItem::Text(unit.as_str()), NodeItem::Node(i + 1)]),
        )
    }

    /// O texto plano do documento.
    pub fn plain_text(&self) -> String {
        self.text.concat()
    }
}
