use std::borrow::Cow;
use std::iter::FusedIterator;

use serde::ser::{Serialize, SerializeStruct, Serializer};
use tracing::{debug, warn};

use crate::catalog::{instruction_set, InstructionSet};

/// Instrução decodificada a partir do bytecode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedInstruction {
    /// Posição do opcode no bytecode
    pub offset: usize,
    pub opcode: u8,
    pub mnemonic: Cow<'static, str>,
    /// Bytes imediatos efetivamente presentes no bytecode
    pub operand_bytes: Vec<u8>,
    /// Quantidade de bytes imediatos declarada pelo opcode
    pub operand_byte_count: usize,
}

#[allow(clippy::len_without_is_empty)]
impl DecodedInstruction {
    /// Verdadeiro quando o bytecode terminou antes do fim do operando.
    pub fn is_truncated(&self) -> bool {
        self.operand_bytes.len() < self.operand_byte_count
    }

    /// Largura declarada da instrução (opcode + operando completo).
    pub fn len(&self) -> usize {
        1 + self.operand_byte_count
    }
}

// `operand_bytes` só aparece para opcodes que declaram bytes imediatos,
// como na listagem textual.
impl Serialize for DecodedInstruction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let has_operand = self.operand_byte_count > 0;
        let fields = if has_operand { 4 } else { 3 };
        let mut state = serializer.serialize_struct("DecodedInstruction", fields)?;
        state.serialize_field("offset", &self.offset)?;
        state.serialize_field("opcode", &self.opcode)?;
        state.serialize_field("mnemonic", &self.mnemonic)?;
        if has_operand {
            let encoded = format!("0x{}", hex::encode(&self.operand_bytes));
            state.serialize_field("operand_bytes", &encoded)?;
        } else {
            state.skip_field("operand_bytes")?;
        }
        state.end()
    }
}

/// Percorre o bytecode linearmente a partir do offset 0.
///
/// Cada passo avança `1 + operand_byte_count` bytes. Um operando que
/// ultrapassa o fim do buffer é devolvido parcialmente e encerra a iteração.
#[derive(Debug, Clone)]
pub struct Disassembler<'a> {
    set: &'a InstructionSet,
    code: &'a [u8],
    cursor: usize,
}

impl<'a> Disassembler<'a> {
    /// Cria um decodificador usando a tabela global.
    pub fn new(code: &'a [u8]) -> Self {
        Self::with_instruction_set(instruction_set(), code)
    }

    pub fn with_instruction_set(set: &'a InstructionSet, code: &'a [u8]) -> Self {
        Self { set, code, cursor: 0 }
    }

    /// Offset do próximo opcode a ser lido.
    ///
    /// Permite ao chamador saber até onde a decodificação avançou. Após uma
    /// instrução final truncada o valor ultrapassa o tamanho do bytecode.
    pub fn position(&self) -> usize {
        self.cursor
    }
}

impl<'a> Iterator for Disassembler<'a> {
    type Item = DecodedInstruction;

    fn next(&mut self) -> Option<Self::Item> {
        let offset = self.cursor;
        let opcode = *self.code.get(offset)?;
        let instruction = self.set.get(opcode);
        let size = instruction.operand_byte_count;
        let next = offset.saturating_add(instruction.size());

        let start = offset + 1;
        let end = next.min(self.code.len());
        let operand_bytes = self.code[start..end].to_vec();

        if operand_bytes.len() < size {
            warn!(
                offset,
                mnemonic = %instruction.mnemonic,
                declared = size,
                available = operand_bytes.len(),
                "instrução final truncada"
            );
        }

        self.cursor = next;

        Some(DecodedInstruction {
            offset,
            opcode,
            mnemonic: instruction.mnemonic.clone(),
            operand_bytes,
            operand_byte_count: size,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.code.len().saturating_sub(self.cursor);
        (usize::from(remaining > 0), Some(remaining))
    }
}

impl<'a> FusedIterator for Disassembler<'a> {}

/// Decodifica o bytecode com uma tabela fornecida pelo chamador.
pub fn disassemble_with(set: &InstructionSet, code: &[u8]) -> Vec<DecodedInstruction> {
    let instructions: Vec<DecodedInstruction> =
        Disassembler::with_instruction_set(set, code).collect();
    debug!(
        bytes = code.len(),
        instructions = instructions.len(),
        "bytecode decodificado"
    );
    instructions
}

/// Decodifica o bytecode usando a tabela global.
pub fn disassemble(code: &[u8]) -> Vec<DecodedInstruction> {
    disassemble_with(instruction_set(), code)
}
