//! # gateconv-core — Conversão de emtsv para GATE XML
//!
//! Este crate converte o fluxo de tokens anotados do emtsv (uma linha por token,
//! colunas como `form`, `lemma`, `head`, `NP-BIO`, `NER-BIO`) em um único
//! documento GATE XML, onde o texto vira uma sequência de nós e as anotações
//! (tokens, espaços, sentenças, chunks e entidades) são spans *stand-off*
//! ancorados nesses nós.
//!
//! ## Arquitetura
//!
//! 1.  **Entrada**: fluxo TSV ([`xtsv`]) ou sentenças entregues pelo driver.
//! 2.  **Sentenças** ([`sentence`]): cada token ocupa um nó (e mais um se houver
//!     espaço depois dele); as features são resolvidas só no fim da sentença,
//!     quando o `head` já pode ser remapeado para o id global do nó.
//! 3.  **Spans BIO** ([`bio`]): duas camadas independentes (`NP` e `NE`).
//! 4.  **Anotações** ([`annotation`]): registros tipados com features GATE.
//! 5.  **Saída** ([`serializer`]): o documento acumulado ([`document`]) é
//!     serializado sob demanda e o estado é reiniciado.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use gateconv_core::{convert_str, ConverterOptions};
//!
//! let input = "form\twsafter\tNER-BIO\nAna\t\" \"\tS-PER\nriu\t\"\"\tO\n";
//! let xml = convert_str(input, &ConverterOptions::default()).unwrap();
//!
//! assert!(xml.contains("Type=\"NE\" StartNode=\"0\" EndNode=\"1\""));
//! ```

pub mod annotation;
pub mod bio;
pub mod config;
pub mod document;
pub mod error;
pub mod fields;
pub mod pipeline;
pub mod sentence;
pub mod serializer;
pub mod xtsv;

pub use annotation::{Annotation, AnnotationType, Feature, ValueClass};
pub use bio::{BioLayer, BioRun, BioTag, Layer};
pub use config::ConverterOptions;
pub use document::{DocumentBuilder, GateDocument};
pub use error::{ConvertError, Result};
pub use fields::FieldMap;
pub use pipeline::{convert_batch, convert_reader, convert_str, GateConverter};
pub use xtsv::XtsvReader;
