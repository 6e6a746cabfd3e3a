//! # Campos emtsv e Tabela de Tradução para Features GATE
//!
//! Cada token emtsv é uma linha de colunas de texto. Os nomes das colunas vêm
//! do cabeçalho do fluxo e são resolvidos uma única vez, num [`FieldMap`].
//!
//! ## Tabela de tradução
//!
//! | Campo emtsv | Feature GATE | Observação                          |
//! |-------------|--------------|-------------------------------------|
//! | anas        | anas         | JSON reformatado                    |
//! | lemma       | lemma        |                                     |
//! | xpostag     | hfstana      |                                     |
//! | feats       | feature      |                                     |
//! | upostag     | pos          |                                     |
//! | NP-BIO      | NP-BIO       | consumido pela camada de chunks     |
//! | NER-BIO     | NER-BIO1     | consumido pela camada de entidades  |
//! | deprel      | depType      |                                     |
//! | head        | depTarget    | remapeado para gid                  |
//! | cons        | cons         |                                     |

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{ConvertError, Result};

/// Superfície do token.
pub const FORM: &str = "form";
/// Espaço em branco após o token, entre aspas (ex: `" "`, `""`).
pub const WSAFTER: &str = "wsafter";
/// Índice local (1-based) do núcleo sintático, ou `"0"` para a raiz.
pub const HEAD: &str = "head";

/// Campos que o conversor exige do fluxo.
pub const SOURCE_FIELDS: [&str; 2] = [FORM, WSAFTER];
/// O conversor substitui o documento inteiro: não acrescenta colunas.
pub const TARGET_FIELDS: [&str; 0] = [];
/// O conversor não precisa do cabeçalho repassado na saída.
pub const PASS_HEADER: bool = false;

/// Campos que viram features do `Token`, na ordem em que são emitidos.
pub const FEATURE_FIELDS: [(&str, &str); 8] = [
    ("anas", "anas"),
    ("lemma", "lemma"),
    ("xpostag", "hfstana"),
    ("feats", "feature"),
    ("upostag", "pos"),
    ("deprel", "depType"),
    (HEAD, "depTarget"),
    ("cons", "cons"),
];

/// Nome da feature GATE correspondente a um campo emtsv.
///
/// Inclui as colunas BIO, que não são emitidas como features.
pub fn gate_feature_name(field: &str) -> Option<&'static str> {
    match field {
        "NP-BIO" => Some("NP-BIO"),
        "NER-BIO" => Some("NER-BIO1"),
        _ => FEATURE_FIELDS
            .iter()
            .find(|(src, _)| *src == field)
            .map(|(_, gate)| *gate),
    }
}

/// Mapa nome do campo → índice da coluna.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMap {
    indices: HashMap<String, usize>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Constrói o mapa a partir da linha de cabeçalho (ordem = índice).
    pub fn from_header<S: AsRef<str>>(names: &[S]) -> Self {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_ref().to_string(), i))
            .collect()
    }

    pub fn insert(&mut self, name: impl Into<String>, index: usize) {
        self.indices.insert(name.into(), index);
    }

    pub fn get(&self, name: &str) -> Option<usize> {
        self.indices.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.indices.contains_key(name)
    }

    /// Índice de um campo obrigatório.
    pub fn require(&self, name: &'static str) -> Result<usize> {
        self.get(name).ok_or(ConvertError::MissingField { field: name })
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

impl FromIterator<(String, usize)> for FieldMap {
    fn from_iter<T: IntoIterator<Item = (String, usize)>>(iter: T) -> Self {
        Self { indices: iter.into_iter().collect() }
    }
}

/// Lê a coluna `index` de um token, com erro descritivo se a linha for curta.
pub fn column<'a, S: AsRef<str>>(record: &'a [S], field: &str, index: usize) -> Result<&'a str> {
    record
        .get(index)
        .map(|s| s.as_ref())
        .ok_or_else(|| ConvertError::ShortRecord {
            field: field.to_string(),
            index,
            len: record.len(),
        })
}

/// Remove as aspas que envolvem o `wsafter` (`"\" \""` → `" "`).
///
/// Valores sem aspas nas duas pontas são devolvidos como estão.
pub fn unquote_wsafter(raw: &str) -> &str {
    raw.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_header() {
        let map = FieldMap::from_header(&["form", "wsafter", "lemma"]);
        assert_eq!(map.get("form"), Some(0));
        assert_eq!(map.get("lemma"), Some(2));
        assert_eq!(map.get("head"), None);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_require_missing() {
        let map = FieldMap::from_header(&["form"]);
        assert!(matches!(
            map.require(WSAFTER),
            Err(ConvertError::MissingField { field: "wsafter" })
        ));
    }

    #[test]
    fn test_translation_table() {
        assert_eq!(gate_feature_name("xpostag"), Some("hfstana"));
        assert_eq!(gate_feature_name("feats"), Some("feature"));
        assert_eq!(gate_feature_name("head"), Some("depTarget"));
        assert_eq!(gate_feature_name("NER-BIO"), Some("NER-BIO1"));
        assert_eq!(gate_feature_name("Lemma"), None);
        assert_eq!(gate_feature_name("form"), None);
    }

    #[test]
    fn test_unquote_wsafter() {
        assert_eq!(unquote_wsafter("\" \""), " ");
        assert_eq!(unquote_wsafter("\"\""), "");
        assert_eq!(unquote_wsafter("\"\\n\""), "\\n");
        assert_eq!(unquote_wsafter("\""), "\"");
    }

    #[test]
    fn test_short_record() {
        let row = vec!["Alice".to_string()];
        assert_eq!(column(&row, "form", 0).unwrap(), "Alice");
        assert!(matches!(
            column(&row, "wsafter", 1),
            Err(ConvertError::ShortRecord { index: 1, len: 1, .. })
        ));
    }
}
