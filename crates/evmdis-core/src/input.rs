/*!
 * Entrada de bytecode
 *
 * Leitura de fontes e conversão do texto hexadecimal em bytes
 */

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};

/// Converte o texto hexadecimal de uma fonte em bytecode.
///
/// Espaços nas extremidades são descartados e um prefixo `0x` é removido
/// antes da decodificação.
pub fn prepare_input(raw: &[u8]) -> Result<Vec<u8>> {
    let text = raw.trim_ascii();
    let digits = text.strip_prefix(b"0x").unwrap_or(text);
    Ok(hex::decode(digits)?)
}

/// Lê o conteúdo bruto de um arquivo.
pub fn read_source(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let raw = fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = raw.len(), "fonte lida");
    Ok(raw)
}

/// Lê um arquivo de texto hexadecimal e devolve o bytecode decodificado.
pub fn load_bytecode(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let raw = read_source(path)?;
    prepare_input(&raw)
}
