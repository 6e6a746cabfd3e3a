//! # Conversor emtsv → GATE XML
//!
//! O [`GateConverter`] é o componente que o driver do emtsv alimenta sentença a
//! sentença. Ele acumula o documento em memória e só produz saída no fim do
//! fluxo, em [`GateConverter::final_output`], que também reinicia o estado.
//!
//! ## Uso
//!
//! ```rust
//! use gateconv_core::{FieldMap, GateConverter};
//!
//! let fields = GateConverter::prepare_fields(FieldMap::from_header(&["form", "wsafter", "NP-BIO"]));
//! let mut conv = GateConverter::new();
//!
//! let sentence = vec![
//!     vec!["Alice", "\" \"", "B-NP"],
//!     vec!["smiled", "\"\"", "O"],
//! ];
//! conv.process_sentence(&sentence, &fields).unwrap();
//!
//! let xml: String = conv.final_output().collect();
//! assert!(xml.contains("<Annotation Id=\"4\" Type=\"NP\" StartNode=\"0\" EndNode=\"1\">"));
//! ```
//!
//! Uma instância atende um único fluxo por vez. Para converter documentos em
//! paralelo use [`convert_batch`], que cria um conversor por documento.

use std::io::{BufRead, Write};

use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::ConverterOptions;
use crate::document::DocumentBuilder;
use crate::error::Result;
use crate::fields::{FieldMap, PASS_HEADER, SOURCE_FIELDS, TARGET_FIELDS};
use crate::sentence::process_sentence;
use crate::serializer::GateXmlChunks;
use crate::xtsv::XtsvReader;

/// Conversor de um fluxo emtsv em um documento GATE.
#[derive(Debug, Clone, Default)]
pub struct GateConverter {
    options: ConverterOptions,
    doc: DocumentBuilder,
    sentences: usize,
}

impl GateConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConverterOptions) -> Self {
        Self { options, ..Self::default() }
    }

    pub fn options(&self) -> &ConverterOptions {
        &self.options
    }

    /// Campos que o conversor lê: `form` e `wsafter`.
    pub fn source_fields() -> &'static [&'static str] {
        &SOURCE_FIELDS
    }

    /// Nenhuma coluna nova: a saída substitui o documento inteiro.
    pub fn target_fields() -> &'static [&'static str] {
        &TARGET_FIELDS
    }

    /// O cabeçalho emtsv não é repassado para a saída.
    pub fn pass_header() -> bool {
        PASS_HEADER
    }

    /// Gancho chamado uma vez por fluxo; aqui é a identidade.
    pub fn prepare_fields(fields: FieldMap) -> FieldMap {
        fields
    }

    /// Estado acumulado até agora.
    pub fn document(&self) -> &DocumentBuilder {
        &self.doc
    }

    /// Acumula uma sentença. Não devolve linhas: o resultado sai em [`final_output`](Self::final_output).
    pub fn process_sentence<R, S>(&mut self, sentence: &[R], fields: &FieldMap) -> Result<Vec<Vec<String>>>
    where
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        process_sentence(&mut self.doc, sentence, fields, &self.options)?;
        self.sentences += 1;
        Ok(Vec::new())
    }

    /// Entrega o documento acumulado como pedaços de XML e recomeça do zero.
    pub fn final_output(&mut self) -> GateXmlChunks {
        let doc = std::mem::take(&mut self.doc);
        debug!(
            sentences = self.sentences,
            nodes = doc.gid(),
            annotations = doc.annotations().len(),
            "documento finalizado"
        );
        self.sentences = 0;
        GateXmlChunks::new(doc.finish(&self.options.source_url))
    }
}

/// Lê um fluxo emtsv inteiro e escreve o GATE XML em `out`, pedaço por pedaço.
pub fn convert_reader<R: BufRead, W: Write>(input: R, mut out: W, options: &ConverterOptions) -> Result<()> {
    let reader = XtsvReader::new(input)?;
    let fields = GateConverter::prepare_fields(reader.fields().clone());
    let mut conv = GateConverter::with_options(options.clone());

    for sentence in reader {
        conv.process_sentence(&sentence?, &fields)?;
    }
    info!(sentences = conv.sentences, "fluxo convertido");

    for chunk in conv.final_output() {
        out.write_all(chunk.as_bytes())?;
    }
    out.flush()?;
    Ok(())
}

/// Converte um fluxo emtsv (em memória) em GATE XML.
pub fn convert_str(input: &str, options: &ConverterOptions) -> Result<String> {
    let mut out = Vec::new();
    convert_reader(input.as_bytes(), &mut out, options)?;
    // a saída é montada só a partir de &str
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Converte vários documentos independentes em paralelo (Rayon), preservando a ordem.
///
/// Cada documento ganha seu próprio [`GateConverter`]; nenhum estado é compartilhado.
pub fn convert_batch<S: AsRef<str> + Sync>(inputs: &[S], options: &ConverterOptions) -> Vec<Result<String>> {
    inputs
        .par_iter()
        .map(|input| convert_str(input.as_ref(), options))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::AnnotationType;
    use crate::error::ConvertError;

    const ALICE: &str = "form\twsafter\tNP-BIO\nAlice\t\" \"\tB\nsmiled\t\"\"\tO\n\n";

    #[test]
    fn test_host_interface() {
        assert_eq!(GateConverter::source_fields(), &["form", "wsafter"]);
        assert!(GateConverter::target_fields().is_empty());
        assert!(!GateConverter::pass_header());
        let fields = FieldMap::from_header(&["form", "wsafter"]);
        assert_eq!(GateConverter::prepare_fields(fields.clone()), fields);
    }

    #[test]
    fn test_process_returns_no_rows() {
        let fields = FieldMap::from_header(&["form", "wsafter"]);
        let mut conv = GateConverter::new();
        let rows = conv.process_sentence(&[vec!["a", "\"\""]], &fields).unwrap();
        assert!(rows.is_empty());
        assert_eq!(conv.document().gid(), 1);
    }

    #[test]
    fn test_end_to_end_alice() {
        let xml = convert_str(ALICE, &ConverterOptions::default()).unwrap();
        assert!(xml.contains(
            "<TextWithNodes><Node id=\"0\"/>Alice<Node id=\"1\"/> <Node id=\"2\"/>smiled<Node id=\"3\"/></TextWithNodes>"
        ));
        assert_eq!(xml.matches("Type=\"Token\"").count(), 2);
        assert_eq!(xml.matches("Type=\"SpaceToken\"").count(), 1);
        assert!(xml.contains("<Annotation Id=\"3\" Type=\"Sentence\" StartNode=\"0\" EndNode=\"3\">"));
        assert!(xml.contains("<Annotation Id=\"4\" Type=\"NP\" StartNode=\"0\" EndNode=\"1\">"));
        assert_eq!(xml.matches("Type=\"NE\"").count(), 0);
    }

    #[test]
    fn test_reset_after_final_output() {
        let fields = FieldMap::from_header(&["form", "wsafter", "NP-BIO"]);
        let sentence = vec![vec!["Alice", "\" \"", "B"], vec!["smiled", "\"\"", "O"]];

        let mut conv = GateConverter::new();
        conv.process_sentence(&sentence, &fields).unwrap();
        let first: String = conv.final_output().collect();

        assert_eq!(conv.document(), &DocumentBuilder::new());

        conv.process_sentence(&sentence, &fields).unwrap();
        let second: String = conv.final_output().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_source_url_option() {
        let opts = ConverterOptions { source_url: "emtsv & co".into(), ..Default::default() };
        let xml = convert_str(ALICE, &opts).unwrap();
        assert!(xml.contains(">emtsv &amp; co</Value>"));
    }

    #[test]
    fn test_error_aborts_document() {
        let input = "form\twsafter\tNER-BIO\nAlice\t\"\"\tI-PER\n";
        let err = convert_str(input, &ConverterOptions::default()).unwrap_err();
        assert!(matches!(err, ConvertError::DanglingContinuation { .. }));
    }

    #[test]
    fn test_batch_preserves_order() {
        let inputs = vec![
            ALICE.to_string(),
            "form\twsafter\nOi\t\"\"\n".to_string(),
            "form\n".to_string(),
        ];
        let results = convert_batch(&inputs, &ConverterOptions::default());
        assert_eq!(results.len(), 3);
        assert!(results[0].as_ref().unwrap().contains("Alice"));
        assert!(results[1].as_ref().unwrap().contains("<Node id=\"0\"/>Oi<Node id=\"1\"/>"));
        assert!(matches!(results[2], Err(ConvertError::Header(_))));
    }

    #[test]
    fn test_document_state_between_sentences() {
        let fields = FieldMap::from_header(&["form", "wsafter"]);
        let mut conv = GateConverter::new();
        conv.process_sentence(&[vec!["a", "\" \""], vec!["b", "\"\""]], &fields).unwrap();
        conv.process_sentence(&[vec!["c", "\"\""]], &fields).unwrap();

        let sentences: Vec<_> = conv
            .document()
            .annotations()
            .iter()
            .filter(|a| a.kind == AnnotationType::Sentence)
            .map(|a| (a.start, a.end))
            .collect();
        assert_eq!(sentences, vec![(0, 3), (3, 4)]);
    }
}
