//! # Configuração do Conversor
//!
//! Opções lidas de JSON (todas com valor padrão), por exemplo:
//!
//! ```json
//! { "source_url": "emtsv", "strict_heads": false }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Valor padrão da feature `gate.SourceURL`, o mesmo que o GATE grava para
/// documentos criados a partir de uma string.
pub const DEFAULT_SOURCE_URL: &str = "created from String";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case", deny_unknown_fields)]
pub struct ConverterOptions {
    /// Valor de `gate.SourceURL` em `GateDocumentFeatures`.
    pub source_url: String,
    /// Se `false`, um `head` sem token correspondente vira valor vazio (com aviso)
    /// em vez de abortar a sentença.
    pub strict_heads: bool,
}

impl Default for ConverterOptions {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            strict_heads: true,
        }
    }
}

impl ConverterOptions {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConvertError;

    #[test]
    fn test_defaults() {
        let opts = ConverterOptions::from_json_str("{}").unwrap();
        assert_eq!(opts, ConverterOptions::default());
        assert_eq!(opts.source_url, "created from String");
        assert!(opts.strict_heads);
    }

    #[test]
    fn test_partial_override() {
        let opts = ConverterOptions::from_json_str(r#"{"strict_heads": false}"#).unwrap();
        assert!(!opts.strict_heads);
        assert_eq!(opts.source_url, DEFAULT_SOURCE_URL);
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(matches!(
            ConverterOptions::from_json_str(r#"{"sourceUrl": "x"}"#),
            Err(ConvertError::Config(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            ConverterOptions::from_path("/nao/existe/gateconv.json"),
            Err(ConvertError::Io(_))
        ));
    }
}
