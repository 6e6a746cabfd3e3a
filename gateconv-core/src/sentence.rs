//! # Processamento de Sentenças
//!
//! Transforma uma sentença emtsv (linhas de colunas + [`FieldMap`]) em anotações
//! GATE, em três etapas explícitas:
//!
//! 1. **Coleta**: percorre os tokens, calcula gid/aid de cada unidade, alimenta
//!    as camadas BIO e guarda as features cruas de cada token como pendentes.
//!    O mapa posição local → gid é montado aqui.
//! 2. **Resolução**: com o mapa completo, resolve as features pendentes
//!    (o `head` de um token pode apontar para um token posterior).
//! 3. **Commit**: só então o [`DocumentBuilder`] é alterado: unidades de texto,
//!    anotações de token, a `Sentence` e os spans `NP`/`NE`.
//!
//! Qualquer erro nas etapas 1 e 2 deixa o documento intacto.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::annotation::{build_annotation, build_feature, plain_feature, Annotation, AnnotationType, Feature};
use crate::bio::{BioLayer, BioRun, Layer};
use crate::config::ConverterOptions;
use crate::document::DocumentBuilder;
use crate::error::{ConvertError, Result};
use crate::fields::{column, unquote_wsafter, FieldMap, FEATURE_FIELDS, FORM, HEAD, WSAFTER};

/// Nome da feature que recebe o `head` remapeado.
const DEP_TARGET: &str = "depTarget";

/// Anotação de token ainda com features cruas.
#[derive(Debug, Clone)]
struct PendingAnnotation {
    text: String,
    aid: usize,
    gid: usize,
    kind: AnnotationType,
    /// (nome da feature GATE, valor cru), na ordem de [`FEATURE_FIELDS`].
    raw_features: Vec<(&'static str, String)>,
}

/// Posição local (1-based, como string) → gid. `"0"` (raiz) mapeia para vazio.
#[derive(Debug, Clone)]
pub struct TokenIdMap {
    ids: HashMap<String, String>,
}

impl TokenIdMap {
    pub fn new() -> Self {
        let mut ids = HashMap::new();
        ids.insert("0".to_string(), String::new());
        Self { ids }
    }

    pub fn insert(&mut self, position: usize, gid: usize) {
        self.ids.insert(position.to_string(), gid.to_string());
    }

    pub fn resolve(&self, head: &str) -> Option<&str> {
        self.ids.get(head).map(|s| s.as_str())
    }
}

impl Default for TokenIdMap {
    fn default() -> Self {
        Self::new()
    }
}

/// Resultado da etapa de coleta.
struct CollectedSentence {
    units: Vec<String>,
    pending: Vec<PendingAnnotation>,
    token_ids: TokenIdMap,
    chunks: Vec<BioRun>,
    entities: Vec<BioRun>,
}

/// Processa uma sentença e registra suas anotações no documento.
pub fn process_sentence<R, S>(
    doc: &mut DocumentBuilder,
    sentence: &[R],
    fields: &FieldMap,
    options: &ConverterOptions,
) -> Result<()>
where
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    if sentence.is_empty() {
        return Err(ConvertError::EmptySentence);
    }

    let collected = collect(doc.gid(), doc.aid(), sentence, fields)?;
    let annotations = resolve(&collected.pending, &collected.token_ids, options)?;
    commit(doc, collected, annotations);
    Ok(())
}

/// Etapa 1: percorre os tokens sem tocar no documento.
fn collect<R, S>(base_gid: usize, base_aid: usize, sentence: &[R], fields: &FieldMap) -> Result<CollectedSentence>
where
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    let form_idx = fields.require(FORM)?;
    let ws_idx = fields.require(WSAFTER)?;
    let feature_columns: Vec<(&'static str, &'static str, usize)> = FEATURE_FIELDS
        .iter()
        .filter_map(|(src, gate)| fields.get(src).map(|idx| (*src, *gate, idx)))
        .collect();

    let mut layers: Vec<(BioLayer, usize)> = [Layer::Chunk, Layer::Entity]
        .into_iter()
        .filter_map(|layer| fields.get(layer.source_field()).map(|idx| (BioLayer::new(layer), idx)))
        .collect();

    let mut gid = base_gid;
    let mut aid = base_aid;
    let mut units = Vec::new();
    let mut pending = Vec::new();
    let mut token_ids = TokenIdMap::new();

    for (i, record) in sentence.iter().enumerate() {
        let record = record.as_ref();

        let mut raw_features = Vec::with_capacity(feature_columns.len());
        for (src, gate, idx) in &feature_columns {
            raw_features.push((*gate, column(record, src, *idx)?.to_string()));
        }

        for (state, idx) in layers.iter_mut() {
            let tag = column(record, state.layer().source_field(), *idx)?;
            state.feed(tag, gid, aid)?;
        }

        token_ids.insert(i + 1, gid);

        let form = column(record, FORM, form_idx)?;
        pending.push(PendingAnnotation {
            text: form.to_string(),
            aid,
            gid,
            kind: AnnotationType::Token,
            raw_features,
        });
        units.push(form.to_string());
        gid += 1;
        aid += 1;

        let ws = unquote_wsafter(column(record, WSAFTER, ws_idx)?);
        if !ws.is_empty() {
            pending.push(PendingAnnotation {
                text: ws.to_string(),
                aid,
                gid,
                kind: AnnotationType::SpaceToken,
                raw_features: Vec::new(),
            });
            units.push(ws.to_string());
            gid += 1;
            aid += 1;
        }
    }

    let mut chunks = Vec::new();
    let mut entities = Vec::new();
    for (state, _) in layers {
        match state.layer() {
            Layer::Chunk => chunks = state.into_runs(),
            Layer::Entity => entities = state.into_runs(),
        }
    }

    Ok(CollectedSentence { units, pending, token_ids, chunks, entities })
}

/// Etapa 2: resolve as features pendentes, remapeando o `head`.
fn resolve(
    pending: &[PendingAnnotation],
    token_ids: &TokenIdMap,
    options: &ConverterOptions,
) -> Result<Vec<Annotation>> {
    let mut out = Vec::with_capacity(pending.len());
    let mut position = 0usize;

    for p in pending {
        if p.kind == AnnotationType::Token {
            position += 1;
        }

        let mut features: Vec<Feature> = Vec::with_capacity(p.raw_features.len() + 3);
        for (name, value) in &p.raw_features {
            let value = if *name == DEP_TARGET {
                remap_head(value, position, token_ids, options)?
            } else {
                value.clone()
            };
            features.push(build_feature(name, value)?);
        }

        out.push(build_annotation(&p.text, p.aid, p.gid, features, p.kind, None));
    }
    Ok(out)
}

fn remap_head(head: &str, position: usize, token_ids: &TokenIdMap, options: &ConverterOptions) -> Result<String> {
    match token_ids.resolve(head) {
        Some(gid) => Ok(gid.to_string()),
        None if !options.strict_heads => {
            warn!(field = HEAD, head, position, "head sem token correspondente, usando valor vazio");
            Ok(String::new())
        }
        None => Err(ConvertError::UnresolvedHead {
            head: head.to_string(),
            position,
        }),
    }
}

/// Etapa 3: registra tudo no documento. Não falha.
fn commit(doc: &mut DocumentBuilder, collected: CollectedSentence, annotations: Vec<Annotation>) {
    let sent_start = doc.gid();
    for unit in &collected.units {
        doc.push_unit(unit);
    }
    for annotation in annotations {
        let aid = doc.next_aid();
        debug_assert_eq!(aid, annotation.id);
        doc.push_annotation(annotation);
    }

    let sent_end = doc.gid();
    let sentence = build_annotation(
        &doc.text_between(sent_start, sent_end),
        doc.next_aid(),
        sent_start,
        Vec::new(),
        AnnotationType::Sentence,
        Some(sent_end),
    );
    doc.push_annotation(sentence);

    let n_chunks = collected.chunks.len();
    let n_entities = collected.entities.len();
    emit_runs(doc, Layer::Chunk, collected.chunks);
    emit_runs(doc, Layer::Entity, collected.entities);

    debug!(
        units = collected.units.len(),
        chunks = n_chunks,
        entities = n_entities,
        gid = doc.gid(),
        aid = doc.aid(),
        "sentença processada"
    );
}

/// Emite um `NP`/`NE` por span, na ordem de encontro.
fn emit_runs(doc: &mut DocumentBuilder, layer: Layer, runs: Vec<BioRun>) {
    for run in runs {
        let child_ids = run
            .aids
            .iter()
            .map(|aid| aid.to_string())
            .collect::<Vec<_>>()
            .join(";");
        let text = doc.text_between(run.start, run.end);
        let annotation = build_annotation(
            &text,
            doc.next_aid(),
            run.start,
            vec![plain_feature("childIds", child_ids)],
            layer.annotation_type(),
            Some(run.end),
        );
        doc.push_annotation(annotation);
    }
}
