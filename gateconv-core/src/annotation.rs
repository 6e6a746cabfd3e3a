//! # Anotações e Features GATE
//!
//! Modelo tipado do conteúdo de um `AnnotationSet`: cada [`Annotation`] cobre
//! um intervalo de nós `[start, end]` e carrega uma lista de [`Feature`]s.
//!
//! Os construtores aqui são puros: montam o registro, mas quem o registra no
//! documento é o [`DocumentBuilder`](crate::document::DocumentBuilder).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ConvertError, Result};

/// Tipos de anotação produzidos pelo conversor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnnotationType {
    Token,
    SpaceToken,
    Sentence,
    /// Chunk nominal (`NP`).
    NounPhrase,
    /// Entidade nomeada (`NE`).
    NamedEntity,
}

impl AnnotationType {
    /// Nome usado no atributo `Type` do GATE XML.
    pub fn name(&self) -> &'static str {
        match self {
            AnnotationType::Token => "Token",
            AnnotationType::SpaceToken => "SpaceToken",
            AnnotationType::Sentence => "Sentence",
            AnnotationType::NounPhrase => "NP",
            AnnotationType::NamedEntity => "NE",
        }
    }

    /// `NP` e `NE` guardam o texto em `text`; os demais em `string` + `length`.
    pub fn is_span(&self) -> bool {
        matches!(self, AnnotationType::NounPhrase | AnnotationType::NamedEntity)
    }
}

/// Classe Java do valor de uma feature (atributos `className`/`itemClassName`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueClass {
    Long,
    Integer,
    StringList,
    String,
}

impl ValueClass {
    /// Tabela fixa nome da feature → classe; o padrão é `String`.
    pub fn for_feature(name: &str) -> Self {
        match name {
            "length" => ValueClass::Long,
            "depTarget" => ValueClass::Integer,
            "anas" | "childIds" => ValueClass::StringList,
            _ => ValueClass::String,
        }
    }

    pub fn class_name(&self) -> &'static str {
        match self {
            ValueClass::Long => "java.lang.Long",
            ValueClass::Integer => "java.lang.Integer",
            ValueClass::StringList => "java.util.ArrayList",
            ValueClass::String => "java.lang.String",
        }
    }

    pub fn item_class_name(&self) -> Option<&'static str> {
        match self {
            ValueClass::StringList => Some("java.lang.String"),
            _ => None,
        }
    }
}

/// Um par nome/valor de uma anotação.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub name: String,
    pub value: String,
    pub class: ValueClass,
}

/// Uma anotação stand-off sobre o intervalo de nós `[start, end]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: usize,
    pub kind: AnnotationType,
    pub start: usize,
    pub end: usize,
    pub features: Vec<Feature>,
}

impl Annotation {
    pub fn feature(&self, name: &str) -> Option<&str> {
        self.features
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }
}

/// Chaves do JSON de análise morfológica e seus nomes na saída, em ordem.
const ANALYSIS_KEYS: [(&str, &str); 4] = [
    ("morphana", "ana"),
    ("tag", "feats"),
    ("lemma", "lemma"),
    ("readable", "readable_ana"),
];

/// Reformata o campo `anas` (lista JSON de análises) no formato de lista do GATE.
///
/// ```text
/// [{"morphana":"a","tag":"t","lemma":"l","readable":"r"}]
///   → {ana=a, feats=t, lemma=l, readable_ana=r}
/// ```
///
/// Várias análises são separadas por `;`, preservando a ordem de entrada.
pub fn reformat_anas(raw: &str) -> Result<String> {
    let analyses: Vec<Map<String, Value>> =
        serde_json::from_str(raw).map_err(|source| ConvertError::MalformedAnalysis {
            source,
            value: raw.to_string(),
        })?;

    let mut out = Vec::with_capacity(analyses.len());
    for analysis in &analyses {
        let mut parts = Vec::with_capacity(ANALYSIS_KEYS.len());
        for (key, gate_key) in ANALYSIS_KEYS {
            let value = analysis
                .get(key)
                .ok_or(ConvertError::MissingAnalysisKey { key })?;
            let value = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            parts.push(format!("{}={}", gate_key, value));
        }
        out.push(format!("{{{}}}", parts.join(", ")));
    }
    Ok(out.join(";"))
}

/// Cria uma feature, escolhendo a classe do valor pela tabela fixa.
///
/// `anas` passa por [`reformat_anas`] antes.
pub fn build_feature(name: &str, value: impl Into<String>) -> Result<Feature> {
    let mut value = value.into();
    if name == "anas" {
        value = reformat_anas(&value)?;
    }
    Ok(Feature {
        name: name.to_string(),
        class: ValueClass::for_feature(name),
        value,
    })
}

/// Feature cujo valor nunca precisa de reformatação.
pub(crate) fn plain_feature(name: &str, value: impl Into<String>) -> Feature {
    Feature {
        name: name.to_string(),
        class: ValueClass::for_feature(name),
        value: value.into(),
    }
}

/// Monta uma anotação com as features de texto padrão.
///
/// - `end` padrão: `start + 1`.
/// - Tipos de token/sentença recebem `string` e `length` (em caracteres);
///   `NP`/`NE` recebem apenas `text`.
/// - `Token` recebe ainda `kind=word`.
pub fn build_annotation(
    text: &str,
    id: usize,
    start: usize,
    mut features: Vec<Feature>,
    kind: AnnotationType,
    end: Option<usize>,
) -> Annotation {
    if kind.is_span() {
        features.push(plain_feature("text", text));
    } else {
        features.push(plain_feature("string", text));
        features.push(plain_feature("length", text.chars().count().to_string()));
    }
    if kind == AnnotationType::Token {
        features.push(plain_feature("kind", "word"));
    }

    Annotation {
        id,
        kind,
        start,
        end: end.unwrap_or(start + 1),
        features,
    }
}
