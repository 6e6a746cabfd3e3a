//! # Leitor do Formato emtsv (xtsv)
//!
//! O emtsv troca dados em TSV:
//!
//! - a primeira linha é o cabeçalho com os nomes dos campos (`form`, `wsafter`, `lemma`…);
//! - cada linha seguinte é um token, com colunas separadas por tabulação;
//! - uma linha vazia fecha a sentença;
//! - linhas iniciadas por `# ` são comentários no estilo CoNLL-U e são ignoradas.
//!
//! O [`XtsvReader`] lê o cabeçalho na construção e depois entrega uma sentença
//! por vez, sem carregar o fluxo inteiro na memória.

use std::io::BufRead;

use tracing::{trace, warn};

use crate::error::{ConvertError, Result};
use crate::fields::{FieldMap, SOURCE_FIELDS};

/// Uma sentença: linhas de colunas.
pub type Sentence = Vec<Vec<String>>;

pub struct XtsvReader<R: BufRead> {
    lines: std::io::Lines<R>,
    header: Vec<String>,
    fields: FieldMap,
    line_no: usize,
    done: bool,
}

fn is_comment(line: &str) -> bool {
    line.starts_with("# ")
}

impl<R: BufRead> XtsvReader<R> {
    /// Lê o cabeçalho e valida os campos obrigatórios (`form`, `wsafter`).
    pub fn new(reader: R) -> Result<Self> {
        let mut lines = reader.lines();
        let mut line_no = 0;

        let header_line = loop {
            let Some(line) = lines.next() else {
                return Err(ConvertError::Header("fluxo vazio, sem cabeçalho".to_string()));
            };
            let line = line?;
            line_no += 1;
            if is_comment(&line) {
                warn!(line = line_no, "comentário antes do cabeçalho ignorado");
                continue;
            }
            break line;
        };

        let header: Vec<String> = header_line
            .trim_end_matches('\r')
            .split('\t')
            .map(|s| s.to_string())
            .collect();
        let fields = FieldMap::from_header(&header);

        for required in SOURCE_FIELDS {
            if !fields.contains(required) {
                return Err(ConvertError::Header(format!(
                    "campo obrigatório {:?} ausente em {:?}",
                    required, header
                )));
            }
        }

        Ok(Self { lines, header, fields, line_no, done: false })
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    fn read_sentence(&mut self) -> Result<Option<Sentence>> {
        let mut sentence = Vec::new();
        for line in self.lines.by_ref() {
            let line = line?;
            self.line_no += 1;
            let line = line.trim_end_matches('\r');

            if line.is_empty() {
                if sentence.is_empty() {
                    continue;
                }
                trace!(line = self.line_no, tokens = sentence.len(), "fim de sentença");
                return Ok(Some(sentence));
            }
            if is_comment(line) {
                continue;
            }
            sentence.push(line.split('\t').map(|s| s.to_string()).collect());
        }

        // fim do fluxo: a última sentença pode vir sem linha vazia
        Ok(if sentence.is_empty() { None } else { Some(sentence) })
    }
}

impl<R: BufRead> Iterator for XtsvReader<R> {
    type Item = Result<Sentence>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_sentence() {
            Ok(Some(sentence)) => Some(Ok(sentence)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_sentences() {
        let input = "form\twsafter\n# text = Oi.\nOi\t\"\"\n.\t\"\\n\"\n\nTchau\t\"\"\n";
        let mut reader = XtsvReader::new(input.as_bytes()).unwrap();
        assert_eq!(reader.header(), &["form".to_string(), "wsafter".to_string()]);
        assert_eq!(reader.fields().get("wsafter"), Some(1));

        let first = reader.next().unwrap().unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first[1], vec![".".to_string(), "\"\\n\"".to_string()]);

        let second = reader.next().unwrap().unwrap();
        assert_eq!(second, vec![vec!["Tchau".to_string(), "\"\"".to_string()]]);
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_blank_lines_and_crlf() {
        let input = "form\twsafter\r\n\r\n\r\na\t\"\"\r\n\r\n\r\n";
        let reader = XtsvReader::new(input.as_bytes()).unwrap();
        let sentences: Vec<Sentence> = reader.map(|s| s.unwrap()).collect();
        assert_eq!(sentences, vec![vec![vec!["a".to_string(), "\"\"".to_string()]]]);
    }

    #[test]
    fn test_header_errors() {
        assert!(matches!(XtsvReader::new("".as_bytes()), Err(ConvertError::Header(_))));
        assert!(matches!(
            XtsvReader::new("form\tlemma\n".as_bytes()),
            Err(ConvertError::Header(_))
        ));
    }

    #[test]
    fn test_header_only() {
        let mut reader = XtsvReader::new("# c\nform\twsafter\n".as_bytes()).unwrap();
        assert!(reader.next().is_none());
    }
}
