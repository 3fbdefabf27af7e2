/*!
 * Renderização da listagem
 *
 * Formato textual de referência (uma linha por instrução) e saída JSON
 */

use crate::catalog::lookup;
use crate::config::{DisasmConfig, OutputFormat};
use crate::disasm::DecodedInstruction;
use crate::error::Result;

/// Formata uma instrução no layout de referência.
///
/// `offset decimal | offset hex | opcode | mnemônico [| operando]`. O operando
/// só aparece para opcodes que declaram bytes imediatos.
pub fn format_line(ins: &DecodedInstruction) -> String {
    let mut line = format!(
        "{:>4} 0x{:08x} 0x{:02x} {:<12}",
        ins.offset, ins.offset, ins.opcode, ins.mnemonic
    );
    if ins.operand_byte_count > 0 {
        line.push_str(" 0x");
        line.push_str(&hex::encode(&ins.operand_bytes));
    }
    line
}

/// Linha de referência seguida da descrição da instrução.
pub fn format_line_described(ins: &DecodedInstruction) -> String {
    format!("{} ; {}", format_line(ins), lookup(ins.opcode).description)
}

/// Listagem textual, uma linha terminada em `\n` por instrução.
pub fn render_text(instructions: &[DecodedInstruction], show_descriptions: bool) -> String {
    let mut out = String::new();
    for ins in instructions {
        if show_descriptions {
            out.push_str(&format_line_described(ins));
        } else {
            out.push_str(&format_line(ins));
        }
        out.push('\n');
    }
    out
}

/// Listagem em JSON (descrições não são incluídas).
pub fn render_json(instructions: &[DecodedInstruction]) -> Result<String> {
    let mut out = serde_json::to_string_pretty(instructions)?;
    out.push('\n');
    Ok(out)
}

/// Renderiza a listagem no formato escolhido pela configuração.
pub fn render(instructions: &[DecodedInstruction], config: &DisasmConfig) -> Result<String> {
    match config.output {
        OutputFormat::Text => Ok(render_text(instructions, config.show_descriptions)),
        OutputFormat::Json => render_json(instructions),
    }
}
