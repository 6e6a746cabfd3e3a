//! # Erros da Conversão
//!
//! Todos os erros são *fail-fast*: o conversor não tenta reparar a entrada.
//! O fluxo emtsv é considerado validado pelo tokenizador/tagger anterior, então
//! uma tag BIO inválida ou um `anas` malformado indica um bug a montante.

use crate::bio::Layer;

/// Erros possíveis ao converter um fluxo emtsv em GATE XML.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// Tag BIO fora da gramática (`O`, `B*`, `I*`, `E*`, `1*`, `S*`).
    #[error("tag BIO desconhecida na camada {layer}: {tag:?}")]
    InvalidTag { layer: Layer, tag: String },

    /// `I`/`E` sem nenhum span aberto na mesma camada.
    #[error("continuação sem início na camada {layer}: {tag:?}")]
    DanglingContinuation { layer: Layer, tag: String },

    /// O campo `anas` não é um JSON válido.
    #[error("campo anas malformado ({source}): {value}")]
    MalformedAnalysis {
        #[source]
        source: serde_json::Error,
        value: String,
    },

    /// Um objeto de análise não traz uma das chaves esperadas.
    #[error("análise sem a chave obrigatória {key:?}")]
    MissingAnalysisKey { key: &'static str },

    /// Campo obrigatório ausente do mapa de campos.
    #[error("campo obrigatório ausente: {field}")]
    MissingField { field: &'static str },

    /// A linha do token tem menos colunas que o mapa de campos exige.
    #[error("token sem a coluna {index} (campo {field}); a linha tem {len} colunas")]
    ShortRecord {
        field: String,
        index: usize,
        len: usize,
    },

    /// O `head` aponta para uma posição que não existe na sentença.
    #[error("head {head:?} do token {position} não corresponde a nenhum token da sentença")]
    UnresolvedHead { head: String, position: usize },

    /// Sentença sem tokens.
    #[error("sentença vazia")]
    EmptySentence,

    /// Problema no cabeçalho do fluxo emtsv.
    #[error("cabeçalho inválido: {0}")]
    Header(String),

    /// Falha ao ler a configuração JSON.
    #[error("configuração inválida: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Alias usado em todo o crate.
pub type Result<T> = std::result::Result<T, ConvertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_offending_value() {
        let err = ConvertError::InvalidTag { layer: Layer::Chunk, tag: "X-NP".into() };
        assert_eq!(err.to_string(), "tag BIO desconhecida na camada NP: \"X-NP\"");

        let err = ConvertError::UnresolvedHead { head: "7".into(), position: 2 };
        assert!(err.to_string().contains("\"7\""));
    }

    #[test]
    fn test_config_error_from_serde() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: ConvertError = parse.unwrap_err().into();
        assert!(matches!(err, ConvertError::Config(_)));
    }
}
