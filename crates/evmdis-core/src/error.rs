use std::path::PathBuf;

use thiserror::Error;

/// Erros da camada de entrada e saída do disassembler.
///
/// A decodificação em si nunca falha; apenas a leitura de fontes,
/// a conversão do texto hexadecimal e a renderização podem gerar erros.
#[derive(Error, Debug)]
pub enum Error {
    /// Falha ao ler a fonte de bytecode
    #[error("erro ao ler {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Texto hexadecimal malformado
    #[error("hexadecimal inválido: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// Falha ao serializar a saída estruturada
    #[error("erro de serialização: {0}")]
    Json(#[from] serde_json::Error),

    /// Valor de configuração não reconhecido
    #[error("configuração inválida: {0}")]
    InvalidConfig(String),
}

/// Tipo de resultado usado em toda a biblioteca
pub type Result<T> = std::result::Result<T, Error>;
