/*!
 * Evmdis Core
 *
 * Tabela de instruções EVM e decodificador linear de bytecode
 */

pub mod catalog;
pub mod config;
pub mod disasm;
pub mod error;
pub mod input;
pub mod render;

// Re-exportações públicas
pub use catalog::{instruction_set, lookup, Instruction, InstructionSet};
pub use config::{DisasmConfig, OutputFormat};
pub use disasm::{disassemble, disassemble_with, DecodedInstruction, Disassembler};
pub use error::{Error, Result};
