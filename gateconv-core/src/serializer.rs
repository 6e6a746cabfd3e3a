//! # Serialização GATE XML
//!
//! Escreve um [`GateDocument`] no formato XML do GATE, no mesmo layout que o
//! próprio GATE grava:
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8"?>
//! <GateDocument version="3">
//! <GateDocumentFeatures> … </GateDocumentFeatures>
//! <TextWithNodes><Node id="0"/>Alice<Node id="1"/> <Node id="2"/>…</TextWithNodes>
//! <AnnotationSet>
//! <Annotation Id="0" Type="Token" StartNode="0" EndNode="1"> … </Annotation>
//! </AnnotationSet>
//! </GateDocument>
//! ```
//!
//! A saída é produzida sob demanda por [`GateXmlChunks`]: um pedaço para o
//! cabeçalho, um para o texto com nós, um por anotação e um para o fechamento.

use std::fmt::Write;

use crate::annotation::{Annotation, Feature};
use crate::document::{GateDocument, NodeItem};

/// Escapa texto de elemento (`&`, `<`, `>`).
pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escapa valor de atributo (texto + aspas duplas).
pub fn escape_attr(s: &str) -> String {
    escape_text(s).replace('"', "&quot;")
}

fn write_feature(out: &mut String, feature: &Feature) {
    let _ = writeln!(out, "<Feature>");
    let _ = writeln!(
        out,
        "  <Name className=\"java.lang.String\">{}</Name>",
        escape_text(&feature.name)
    );
    let _ = write!(out, "  <Value className=\"{}\"", feature.class.class_name());
    if let Some(item) = feature.class.item_class_name() {
        let _ = write!(out, " itemClassName=\"{}\"", item);
    }
    let _ = writeln!(out, ">{}</Value>", escape_text(&feature.value));
    let _ = writeln!(out, "</Feature>");
}

fn render_header(doc: &GateDocument) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str("<GateDocument version=\"3\">\n");
    out.push_str("<!-- The document's features-->\n\n");
    out.push_str("<GateDocumentFeatures>\n");
    for feature in &doc.features {
        write_feature(&mut out, feature);
    }
    out.push_str("</GateDocumentFeatures>\n");
    out
}

fn render_text_with_nodes(doc: &GateDocument) -> String {
    let mut out = String::new();
    out.push_str("<!-- The document content area with serialized nodes -->\n\n");
    out.push_str("<TextWithNodes>");
    for item in doc.nodes() {
        match item {
            NodeItem::Node(id) => {
                let _ = write!(out, "<Node id=\"{}\"/>", id);
            }
            NodeItem::Text(text) => out.push_str(&escape_text(text)),
        }
    }
    out.push_str("</TextWithNodes>\n");
    out.push_str("<!-- The default annotation set -->\n\n");
    out.push_str("<AnnotationSet>\n");
    out
}

/// Uma anotação completa, com suas features.
pub fn render_annotation(annotation: &Annotation) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "<Annotation Id=\"{}\" Type=\"{}\" StartNode=\"{}\" EndNode=\"{}\">",
        annotation.id,
        escape_attr(annotation.kind.name()),
        annotation.start,
        annotation.end
    );
    for feature in &annotation.features {
        write_feature(&mut out, feature);
    }
    out.push_str("</Annotation>\n");
    out
}

const FOOTER: &str = "</AnnotationSet>\n\n</GateDocument>\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Header,
    Text,
    Annotations(usize),
    Done,
}

/// Iterador finito sobre os pedaços de texto do XML.
///
/// Consome o documento: uma nova saída exige um novo ciclo de acumulação.
#[derive(Debug)]
pub struct GateXmlChunks {
    doc: GateDocument,
    stage: Stage,
}

impl GateXmlChunks {
    pub fn new(doc: GateDocument) -> Self {
        Self { doc, stage: Stage::Header }
    }
}

impl Iterator for GateXmlChunks {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        match self.stage {
            Stage::Header => {
                self.stage = Stage::Text;
                Some(render_header(&self.doc))
            }
            Stage::Text => {
                self.stage = Stage::Annotations(0);
                Some(render_text_with_nodes(&self.doc))
            }
            Stage::Annotations(i) => match self.doc.annotations.get(i) {
                Some(annotation) => {
                    self.stage = Stage::Annotations(i + 1);
                    Some(render_annotation(annotation))
                }
                None => {
                    self.stage = Stage::Done;
                    Some(FOOTER.to_string())
                }
            },
            Stage::Done => None,
        }
    }
}

/// Serializa o documento inteiro de uma vez.
pub fn to_xml(doc: GateDocument) -> String {
    GateXmlChunks::new(doc).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{build_annotation, build_feature, AnnotationType};
    use crate::document::DocumentBuilder;

    #[test]
    fn test_escaping() {
        assert_eq!(escape_text("a < b & c > d"), "a &lt; b &amp; c &gt; d");
        assert_eq!(escape_attr("\"x\""), "&quot;x&quot;");
    }

    #[test]
    fn test_feature_with_item_class() {
        let mut out = String::new();
        write_feature(&mut out, &build_feature("childIds", "0;2").unwrap());
        assert!(out.contains(
            "<Value className=\"java.util.ArrayList\" itemClassName=\"java.lang.String\">0;2</Value>"
        ));
    }

    #[test]
    fn test_empty_document() {
        let xml = to_xml(DocumentBuilder::new().finish("created from String"));
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<GateDocument version=\"3\">"));
        assert!(xml.contains("<TextWithNodes><Node id=\"0\"/></TextWithNodes>"));
        assert!(xml.contains("<Value className=\"java.lang.String\">created from String</Value>"));
        assert!(xml.ends_with("</AnnotationSet>\n\n</GateDocument>\n"));
    }

    #[test]
    fn test_annotation_rendering() {
        let ann = build_annotation("a&b", 5, 2, vec![], AnnotationType::Token, None);
        let xml = render_annotation(&ann);
        let expected = "<Annotation Id=\"5\" Type=\"Token\" StartNode=\"2\" EndNode=\"3\">\n\
<Feature>\n  <Name className=\"java.lang.String\">string</Name>\n  <Value className=\"java.lang.String\">a&amp;b</Value>\n</Feature>\n\
<Feature>\n  <Name className=\"java.lang.String\">length</Name>\n  <Value className=\"java.lang.Long\">3</Value>\n</Feature>\n\
<Feature>\n  <Name className=\"java.lang.String\">kind</Name>\n  <Value className=\"java.lang.String\">word</Value>\n</Feature>\n\
</Annotation>\n";
        assert_eq!(xml, expected);
    }

    #[test]
    fn test_chunk_count() {
        let mut doc = DocumentBuilder::new();
        doc.push_unit("x");
        let aid = doc.next_aid();
        doc.push_annotation(build_annotation("x", aid, 0, vec![], AnnotationType::Token, None));
        let chunks: Vec<String> = GateXmlChunks::new(doc.finish("s")).collect();
        // cabeçalho, texto, 1 anotação, fechamento
        assert_eq!(chunks.len(), 4);
        assert!(chunks[1].contains("<Node id=\"0\"/>x<Node id=\"1\"/>"));
    }
}
