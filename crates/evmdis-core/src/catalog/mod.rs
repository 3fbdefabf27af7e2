//! Tabela de instruções EVM indexada pelo valor do opcode.
//!
//! A tabela é total: todo byte `0x00..=0xff` possui um descritor, e os
//! bytes sem instrução definida recebem o descritor `INVALID`.

use std::borrow::Cow;
use std::fmt;
use std::ops::Index;

use once_cell::sync::Lazy;
use tracing::debug;

/// Quantidade de entradas da tabela (um descritor por valor de byte)
pub const TABLE_SIZE: usize = 0x100;

/// Primeiro opcode da família PUSH (`PUSH1`)
pub const PUSH_BASE: u8 = 0x60;
/// Primeiro opcode da família DUP (`DUP1`)
pub const DUP_BASE: u8 = 0x80;
/// Primeiro opcode da família SWAP (`SWAP1`)
pub const SWAP_BASE: u8 = 0x90;

/// Mnemônico usado para bytes sem instrução definida
pub const INVALID_MNEMONIC: &str = "INVALID";

// (opcode, mnemônico, entradas, saídas, descrição)
type StaticEntry = (u8, &'static str, usize, usize, &'static str);

const ARITHMETIC: &[StaticEntry] = &[
    (0x00, "STOP", 0, 0, "Halts execution"),
    (0x01, "ADD", 2, 1, "Addition operation"),
    (0x02, "MUL", 2, 1, "Multiplication operation"),
    (0x03, "SUB", 2, 1, "Subtraction operation"),
    (0x04, "DIV", 2, 1, "Integer division operation"),
    (0x05, "SDIV", 2, 1, "Signed integer division operation"),
    (0x06, "MOD", 2, 1, "Modulo remainder operation"),
    (0x07, "SMOD", 2, 1, "Signed modulo remainder operation"),
    (0x08, "ADDMOD", 3, 1, "Modulo addition operation"),
    (0x09, "MULMOD", 3, 1, "Modulo multiplication operation"),
    (0x0a, "EXP", 2, 1, "Exponential operation"),
    (0x0b, "SIGNEXTEND", 2, 1, "Extend length of two's complement signed integer"),
];

const COMPARISON_BITWISE: &[StaticEntry] = &[
    (0x10, "LT", 2, 1, "Less-than comparison"),
    (0x11, "GT", 2, 1, "Greater-than comparison"),
    (0x12, "SLT", 2, 1, "Signed less-than comparison"),
    (0x13, "SGT", 2, 1, "Signed greater-than comparison"),
    (0x14, "EQ", 2, 1, "Equality comparison"),
    (0x15, "ISZERO", 1, 1, "Simple not operator"),
    (0x16, "AND", 2, 1, "Bitwise AND operator"),
    (0x17, "OR", 2, 1, "Bitwise OR operator"),
    (0x18, "XOR", 2, 1, "Bitwise XOR operator"),
    (0x19, "NOT", 1, 1, "Bitwise NOT operator"),
    (0x1a, "BYTE", 2, 1, "Retrieve single byte from word"),
    (0x20, "SHA3", 2, 1, "Compute Keccak-256 hash"),
];

const ENVIRONMENT: &[StaticEntry] = &[
    (0x30, "ADDRESS", 0, 1, "Get address of currently executing account"),
    (0x31, "BALANCE", 1, 1, "Get balance of the given account"),
    (0x32, "ORIGIN", 0, 1, "Get execution origination address"),
    (0x33, "CALLER", 0, 1, "Get caller address"),
    (
        0x34,
        "CALLVALUE",
        0,
        1,
        "Get deposited value by the instruction/transaction responsible for this execution",
    ),
    (0x35, "CALLDATALOAD", 1, 1, "Get input data of current environment"),
    (0x36, "CALLDATASIZE", 0, 1, "Get size of input data in current environment"),
    (0x37, "CALLDATACOPY", 3, 0, "Copy input data in current environment to memory"),
    (0x38, "CODESIZE", 0, 1, "Get size of running code in current environment"),
    (0x39, "CODECOPY", 3, 0, "Copy code running in current environment to memory"),
    (0x3a, "GASPRICE", 0, 1, "Get price of gas in current environment"),
    (0x3b, "EXTCODESIZE", 1, 1, "Get size of an account's code"),
    (0x3c, "EXTCODECOPY", 4, 0, "Copy an account's code to memory"),
];

const BLOCK: &[StaticEntry] = &[
    (0x40, "BLOCKHASH", 1, 1, "Get the hash of one of the 256 most recent complete blocks"),
    (0x41, "COINBASE", 0, 1, "Get the block's beneficiary address"),
    (0x42, "TIMESTAMP", 0, 1, "Get the block's timestamp"),
    (0x43, "NUMBER", 0, 1, "Get the block's number"),
    (0x44, "DIFFICULTY", 0, 1, "Get the block's difficulty"),
    (0x45, "GASLIMIT", 0, 1, "Get the block's gas limit"),
];

const STACK_MEMORY_FLOW: &[StaticEntry] = &[
    (0x50, "POP", 1, 0, "Remove item from stack"),
    (0x51, "MLOAD", 1, 1, "Load word from memory"),
    (0x52, "MSTORE", 2, 0, "Save word to memory"),
    (0x53, "MSTORE8", 2, 0, "Save byte to memory"),
    (0x54, "SLOAD", 1, 1, "Load word from storage"),
    (0x55, "SSTORE", 2, 0, "Store word to storage"),
    (0x56, "JUMP", 1, 0, "Alter the program counter"),
    (0x57, "JUMPI", 2, 0, "Conditionally alter the program counter"),
    (
        0x58,
        "PC",
        0,
        1,
        "Get the value of the program counter prior to the increment corresponding to this instruction",
    ),
    (0x59, "MSIZE", 0, 1, "Get the size of active memory in bytes"),
    (
        0x5a,
        "GAS",
        0,
        1,
        "Get the amount of available gas, including the corresponding reduction for the cost of this instruction",
    ),
    (0x5b, "JUMPDEST", 0, 0, "Mark a valid destination for jumps"),
];

const LOGGING: &[StaticEntry] = &[
    (0xa0, "LOG0", 2, 0, "Append log record with no topics"),
    (0xa1, "LOG1", 3, 0, "Append log record with one topic"),
    (0xa2, "LOG2", 4, 0, "Append log record with two topics"),
    (0xa3, "LOG3", 5, 0, "Append log record with three topics"),
    (0xa4, "LOG4", 6, 0, "Append log record with four topics"),
];

const SYSTEM: &[StaticEntry] = &[
    (0xf0, "CREATE", 3, 1, "Create a new account with associated code"),
    (0xf1, "CALL", 7, 1, "Message-call into an account"),
    (
        0xf2,
        "CALLCODE",
        7,
        1,
        "Message-call into this account with an alternative account's code",
    ),
    (0xf3, "RETURN", 2, 0, "Halt execution returning output data"),
    (
        0xf4,
        "DELEGATECALL",
        6,
        1,
        "Message-call into this account with an alternative account's code, but persisting the current values for _sender_ and _value_",
    ),
    (0xff, "SUICIDE", 1, 0, "Halt execution and register account for later deletion"),
];

/// Descritor imutável de uma instrução.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// Valor do opcode; igual ao índice do descritor na tabela
    pub code: u8,
    pub mnemonic: Cow<'static, str>,
    /// Itens consumidos da pilha
    pub stack_inputs: usize,
    /// Itens produzidos na pilha
    pub stack_outputs: usize,
    /// Bytes imediatos que seguem o opcode no bytecode
    pub operand_byte_count: usize,
    pub description: Cow<'static, str>,
}

impl Instruction {
    fn from_static(&(code, mnemonic, stack_inputs, stack_outputs, description): &StaticEntry) -> Self {
        Self {
            code,
            mnemonic: Cow::Borrowed(mnemonic),
            stack_inputs,
            stack_outputs,
            operand_byte_count: 0,
            description: Cow::Borrowed(description),
        }
    }

    /// Descritor de fallback para bytes sem instrução definida.
    pub fn invalid(code: u8) -> Self {
        Self {
            code,
            mnemonic: Cow::Borrowed(INVALID_MNEMONIC),
            stack_inputs: 0,
            stack_outputs: 0,
            operand_byte_count: 0,
            description: Cow::Borrowed("Invalid instruction"),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.mnemonic != INVALID_MNEMONIC
    }

    /// Tamanho declarado da instrução no bytecode (opcode + operandos);
    /// é o passo do decodificador.
    pub fn size(&self) -> usize {
        1 + self.operand_byte_count
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.mnemonic)
    }
}

/// Sufixo ordinal em inglês usado nas descrições de DUP/SWAP.
pub fn ordinal(n: u8) -> String {
    match n {
        1 => "1st".to_string(),
        2 => "2nd".to_string(),
        3 => "3rd".to_string(),
        _ => format!("{}th", n),
    }
}

/// `PUSH{n}`: empilha um item de `n` bytes lido do próprio bytecode.
pub fn make_push(n: u8) -> Instruction {
    debug_assert!((1..=32).contains(&n));
    Instruction {
        code: PUSH_BASE + (n - 1),
        mnemonic: Cow::Owned(format!("PUSH{}", n)),
        stack_inputs: 0,
        stack_outputs: 1,
        operand_byte_count: n as usize,
        description: Cow::Owned(format!("Place {}-byte item on stack", n)),
    }
}

/// `DUP{n}`: duplica o n-ésimo item da pilha.
pub fn make_dup(n: u8) -> Instruction {
    debug_assert!((1..=16).contains(&n));
    Instruction {
        code: DUP_BASE + (n - 1),
        mnemonic: Cow::Owned(format!("DUP{}", n)),
        stack_inputs: n as usize,
        stack_outputs: n as usize + 1,
        operand_byte_count: 0,
        description: Cow::Owned(format!("Duplicate {} stack item", ordinal(n))),
    }
}

/// `SWAP{n}`: troca o topo da pilha com o item `n + 1`.
pub fn make_swap(n: u8) -> Instruction {
    debug_assert!((1..=16).contains(&n));
    Instruction {
        code: SWAP_BASE + (n - 1),
        mnemonic: Cow::Owned(format!("SWAP{}", n)),
        stack_inputs: n as usize + 1,
        stack_outputs: n as usize + 1,
        operand_byte_count: 0,
        description: Cow::Owned(format!("Exchange 1st and {} stack items", ordinal(n + 1))),
    }
}

/// Tabela completa de instruções, indexada pelo valor do byte.
///
/// Não há API de mutação: uma vez construída, a tabela só é consultada.
#[derive(Debug, Clone)]
pub struct InstructionSet {
    entries: Box<[Instruction; TABLE_SIZE]>,
}

#[allow(clippy::len_without_is_empty)]
impl InstructionSet {
    /// Consulta total: todo byte possui um descritor.
    pub fn get(&self, opcode: u8) -> &Instruction {
        &self.entries[opcode as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Instruction> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        TABLE_SIZE
    }

    /// Quantidade de opcodes com instrução definida.
    pub fn defined_count(&self) -> usize {
        self.iter().filter(|ins| ins.is_valid()).count()
    }
}

impl Index<u8> for InstructionSet {
    type Output = Instruction;

    fn index(&self, opcode: u8) -> &Instruction {
        self.get(opcode)
    }
}

/// Construtor incremental: cada opcode é atribuído no máximo uma vez.
struct Builder {
    slots: Vec<Option<Instruction>>,
}

impl Builder {
    fn new() -> Self {
        Self { slots: vec![None; TABLE_SIZE] }
    }

    fn define(&mut self, instruction: Instruction) {
        let slot = &mut self.slots[instruction.code as usize];
        debug_assert!(slot.is_none(), "opcode {:#04x} definido duas vezes", instruction.code);
        *slot = Some(instruction);
    }

    fn define_static(&mut self, entries: &[StaticEntry]) {
        for entry in entries {
            self.define(Instruction::from_static(entry));
        }
    }

    /// Preenche apenas as lacunas com `INVALID` e congela a tabela.
    fn finish(mut self) -> InstructionSet {
        let entries: [Instruction; TABLE_SIZE] = std::array::from_fn(|i| {
            self.slots[i]
                .take()
                .unwrap_or_else(|| Instruction::invalid(i as u8))
        });
        InstructionSet { entries: Box::new(entries) }
    }
}

/// Constrói a tabela completa de instruções.
///
/// Função pura: cada chamada produz uma tabela nova e idêntica. O uso normal
/// passa por [`instruction_set`], que a constrói uma única vez.
pub fn build_instruction_set() -> InstructionSet {
    let mut builder = Builder::new();

    builder.define_static(ARITHMETIC);
    builder.define_static(COMPARISON_BITWISE);
    builder.define_static(ENVIRONMENT);
    builder.define_static(BLOCK);
    builder.define_static(STACK_MEMORY_FLOW);

    for n in 1..=32 {
        builder.define(make_push(n));
    }
    for n in 1..=16 {
        builder.define(make_dup(n));
    }
    for n in 1..=16 {
        builder.define(make_swap(n));
    }

    builder.define_static(LOGGING);
    builder.define_static(SYSTEM);

    builder.finish()
}

static INSTRUCTION_SET: Lazy<InstructionSet> = Lazy::new(|| {
    let set = build_instruction_set();
    debug!(
        defined = set.defined_count(),
        invalid = set.len() - set.defined_count(),
        "tabela de instruções construída"
    );
    set
});

/// Tabela global, construída no primeiro acesso e somente leitura depois.
pub fn instruction_set() -> &'static InstructionSet {
    &INSTRUCTION_SET
}

/// Atalho para consultar um opcode na tabela global.
pub fn lookup(opcode: u8) -> &'static Instruction {
    INSTRUCTION_SET.get(opcode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_entry_matches_its_index() {
        let set = build_instruction_set();
        for (i, ins) in set.iter().enumerate() {
            assert_eq!(ins.code as usize, i);
            assert!(!ins.mnemonic.is_empty());
            assert!(!ins.description.is_empty());
        }
    }

    #[test]
    fn mnemonics_are_unique_except_invalid() {
        let set = build_instruction_set();
        let mut seen = HashSet::new();
        for ins in set.iter().filter(|ins| ins.is_valid()) {
            assert!(seen.insert(ins.mnemonic.clone()), "duplicado: {}", ins.mnemonic);
        }
        assert_eq!(seen.len(), set.defined_count());
    }

    #[test]
    fn ordinal_suffixes() {
        assert_eq!(ordinal(1), "1st");
        assert_eq!(ordinal(2), "2nd");
        assert_eq!(ordinal(3), "3rd");
        assert_eq!(ordinal(4), "4th");
        assert_eq!(ordinal(11), "11th");
        assert_eq!(ordinal(17), "17th");
    }

    #[test]
    fn family_descriptions() {
        assert_eq!(make_push(20).description, "Place 20-byte item on stack");
        assert_eq!(make_dup(2).description, "Duplicate 2nd stack item");
        assert_eq!(make_swap(1).description, "Exchange 1st and 2nd stack items");
        assert_eq!(make_swap(16).description, "Exchange 1st and 17th stack items");
    }

    #[test]
    fn defined_count_matches_reference_table() {
        // 12 + 11 + 1 + 13 + 6 + 12 + 32 + 16 + 16 + 5 + 6
        assert_eq!(build_instruction_set().defined_count(), 130);
    }

    #[test]
    fn size_includes_opcode_byte() {
        assert_eq!(lookup(0x01).size(), 1);
        assert_eq!(lookup(0x60).size(), 2);
        assert_eq!(lookup(0x7f).size(), 33);
        assert_eq!(lookup(0x0c).size(), 1);
    }

    #[test]
    fn display_pads_mnemonic() {
        assert_eq!(format!("{:<6}|", lookup(0x01)), "ADD   |");
        assert_eq!(lookup(0x7f).to_string(), "PUSH32");
    }
}
