use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Variável de ambiente que define o formato de saída padrão
pub const OUTPUT_ENV: &str = "EVMDIS_OUTPUT";

/// Formato de saída da listagem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Uma linha por instrução
    #[default]
    Text,
    /// Lista JSON de instruções decodificadas
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(Error::InvalidConfig(format!(
                "formato de saída desconhecido: {other}"
            ))),
        }
    }
}

/// Configuração de renderização do disassembler
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisasmConfig {
    /// Formato da listagem
    pub output: OutputFormat,
    /// Anexa a descrição da instrução a cada linha de texto
    pub show_descriptions: bool,
}

impl DisasmConfig {
    /// Configuração padrão com o formato lido de `EVMDIS_OUTPUT`, se definido.
    pub fn from_env() -> Result<Self> {
        let output = match std::env::var(OUTPUT_ENV) {
            Ok(value) => value.parse()?,
            Err(_) => OutputFormat::default(),
        };
        Ok(Self {
            output,
            ..Self::default()
        })
    }
}
