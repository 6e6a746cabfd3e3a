//! # Detector de Spans BIO
//!
//! Converte a sequência de tags BIO de uma camada (chunks `NP-BIO` ou entidades
//! `NER-BIO`) em uma lista de spans fechados, cada um ancorado em ids de nó
//! globais (gid) e ligado às anotações de token que o compõem (aid).
//!
//! ## Gramática
//!
//! A classe da tag é decidida pelo primeiro caractere (sensível a maiúsculas):
//!
//! | Tag       | Classe   | Efeito                                         |
//! |-----------|----------|------------------------------------------------|
//! | `O`       | Outside  | nada (não fecha nem continua o span)           |
//! | `B*`      | Begin    | abre um novo span                              |
//! | `I*`/`E*` | Inside/End | estende o span aberto                        |
//! | `1*`/`S*` | Single   | span de um único token, fechado na hora        |
//!
//! Qualquer outro valor é um erro de tagging. Um `I`/`E` sem span aberto é uma
//! violação de contrato: o detector não cria spans por conta própria.
//!
//! ## Fronteiras
//!
//! Todo span guarda o gid do primeiro token (`start`) e o nó logo após o último
//! token (`end`, exclusivo), o mesmo esquema das anotações `Token`
//! (`EndNode = StartNode + 1`).

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::annotation::AnnotationType;
use crate::error::{ConvertError, Result};

/// As duas camadas BIO independentes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layer {
    /// Sintagmas nominais (`NP-BIO` → anotações `NP`).
    Chunk,
    /// Entidades nomeadas (`NER-BIO` → anotações `NE`).
    Entity,
}

impl Layer {
    /// Nome do campo emtsv que alimenta a camada.
    pub fn source_field(&self) -> &'static str {
        match self {
            Layer::Chunk => "NP-BIO",
            Layer::Entity => "NER-BIO",
        }
    }

    /// Tipo da anotação GATE emitida para cada span da camada.
    pub fn annotation_type(&self) -> AnnotationType {
        match self {
            Layer::Chunk => AnnotationType::NounPhrase,
            Layer::Entity => AnnotationType::NamedEntity,
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.annotation_type().name())
    }
}

/// Classe de uma tag BIO (o sufixo, ex: `-PER`, é ignorado).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BioTag {
    Begin,
    Inside,
    End,
    Single,
    Outside,
}

impl BioTag {
    /// Classifica uma tag pelo primeiro caractere. `None` para tags fora da gramática.
    pub fn from_label(s: &str) -> Option<Self> {
        if s == "O" {
            return Some(BioTag::Outside);
        }
        match s.chars().next()? {
            'B' => Some(BioTag::Begin),
            'I' => Some(BioTag::Inside),
            'E' => Some(BioTag::End),
            '1' | 'S' => Some(BioTag::Single),
            _ => None,
        }
    }

    /// Verifica se a tag pode aparecer com (ou sem) um span aberto.
    ///
    /// Só `I` e `E` dependem de estado: exigem um span aberto.
    pub fn is_valid_transition(has_open_run: bool, next: BioTag) -> bool {
        match next {
            BioTag::Inside | BioTag::End => has_open_run,
            _ => true,
        }
    }
}

/// Um span detectado: intervalo de nós `[start, end)` e as anotações de token que o formam.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BioRun {
    /// gid do primeiro token.
    pub start: usize,
    /// Nó logo após o último token (exclusivo).
    pub end: usize,
    /// aids dos tokens, em ordem.
    pub aids: Vec<usize>,
}

impl BioRun {
    fn single(gid: usize, aid: usize) -> Self {
        Self { start: gid, end: gid + 1, aids: vec![aid] }
    }

    /// Quantidade de tokens no span.
    pub fn len(&self) -> usize {
        self.aids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aids.is_empty()
    }
}

/// Máquina de estados de uma camada, válida por uma sentença.
#[derive(Debug, Clone)]
pub struct BioLayer {
    layer: Layer,
    runs: Vec<BioRun>,
    /// Há um span aberto (o último de `runs`) que aceita `I`/`E`.
    open: bool,
}

impl BioLayer {
    pub fn new(layer: Layer) -> Self {
        Self { layer, runs: Vec::new(), open: false }
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    /// Consome a tag do token com gid/aid atuais.
    pub fn feed(&mut self, label: &str, gid: usize, aid: usize) -> Result<()> {
        let tag = BioTag::from_label(label).ok_or_else(|| ConvertError::InvalidTag {
            layer: self.layer,
            tag: label.to_string(),
        })?;

        if !BioTag::is_valid_transition(self.open, tag) {
            return Err(ConvertError::DanglingContinuation {
                layer: self.layer,
                tag: label.to_string(),
            });
        }

        trace!(layer = %self.layer, ?tag, gid, aid, "tag BIO");

        match tag {
            BioTag::Outside => {}
            BioTag::Begin => {
                self.runs.push(BioRun::single(gid, aid));
                self.open = true;
            }
            BioTag::Inside | BioTag::End => {
                if let Some(run) = self.runs.last_mut() {
                    run.end = gid + 1;
                    run.aids.push(aid);
                }
            }
            BioTag::Single => {
                self.runs.push(BioRun::single(gid, aid));
                self.open = false;
            }
        }
        Ok(())
    }

    pub fn runs(&self) -> &[BioRun] {
        &self.runs
    }

    pub fn into_runs(self) -> Vec<BioRun> {
        self.runs
    }
}

/// Helper: aplica a máquina de estados a uma sequência de tags isolada,
/// usando a posição de cada tag como gid e como aid.
pub fn bio_to_runs(layer: Layer, tags: &[&str]) -> Result<Vec<BioRun>> {
    let mut state = BioLayer::new(layer);
    for (i, tag) in tags.iter().enumerate() {
        state.feed(tag, i, i)?;
    }
    Ok(state.into_runs())
}
