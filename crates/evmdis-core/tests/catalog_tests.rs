use evmdis_core::catalog::{build_instruction_set, instruction_set, lookup};

#[test]
fn catalog_is_total() {
    let set = instruction_set();
    assert_eq!(set.len(), 256);
    for byte in 0..=u8::MAX {
        let ins = set.get(byte);
        assert_eq!(ins.code, byte);
        assert!(!ins.mnemonic.is_empty());
        assert!(!ins.description.is_empty());
    }
}

#[test]
fn push_family() {
    for n in 1..=32u8 {
        let ins = lookup(0x5f + n);
        assert_eq!(ins.mnemonic, format!("PUSH{}", n));
        assert_eq!(ins.stack_inputs, 0);
        assert_eq!(ins.stack_outputs, 1);
        assert_eq!(ins.operand_byte_count, n as usize);
    }
}

#[test]
fn dup_family() {
    for n in 1..=16u8 {
        let ins = lookup(0x7f + n);
        assert_eq!(ins.mnemonic, format!("DUP{}", n));
        assert_eq!(ins.stack_inputs, n as usize);
        assert_eq!(ins.stack_outputs, n as usize + 1);
        assert_eq!(ins.operand_byte_count, 0);
    }
}

#[test]
fn swap_family() {
    for n in 1..=16u8 {
        let ins = lookup(0x8f + n);
        assert_eq!(ins.mnemonic, format!("SWAP{}", n));
        assert_eq!(ins.stack_inputs, n as usize + 1);
        assert_eq!(ins.stack_outputs, n as usize + 1);
        assert_eq!(ins.operand_byte_count, 0);
    }
}

#[test]
fn only_push_family_has_operands() {
    for ins in instruction_set().iter() {
        let is_push = (0x60..=0x7f).contains(&ins.code);
        assert_eq!(ins.operand_byte_count > 0, is_push, "opcode {:#04x}", ins.code);
    }
}

#[test]
fn unassigned_bytes_fall_back_to_invalid() {
    for byte in [0x0c, 0x21, 0xa5, 0xf5, 0x1b, 0xfd, 0xfe] {
        let ins = lookup(byte);
        assert_eq!(ins.mnemonic, "INVALID");
        assert_eq!(ins.description, "Invalid instruction");
        assert_eq!(ins.stack_inputs, 0);
        assert_eq!(ins.stack_outputs, 0);
        assert_eq!(ins.operand_byte_count, 0);
        assert!(!ins.is_valid());
    }
}

#[test]
fn named_opcodes_keep_reference_metadata() {
    let add = lookup(0x01);
    assert_eq!((&*add.mnemonic, add.stack_inputs, add.stack_outputs), ("ADD", 2, 1));
    let call = lookup(0xf1);
    assert_eq!((&*call.mnemonic, call.stack_inputs, call.stack_outputs), ("CALL", 7, 1));
    let log4 = lookup(0xa4);
    assert_eq!((&*log4.mnemonic, log4.stack_inputs, log4.stack_outputs), ("LOG4", 6, 0));
    assert_eq!(lookup(0xff).mnemonic, "SUICIDE");
    assert_eq!(lookup(0x5b).mnemonic, "JUMPDEST");
}

#[test]
fn builder_is_deterministic() {
    let a = build_instruction_set();
    let b = build_instruction_set();
    assert!(a.iter().eq(b.iter()));
    assert!(a.iter().eq(instruction_set().iter()));
}

#[test]
fn global_table_is_shared_across_threads() {
    let handles: Vec<_> = (0..4)
        .map(|_| std::thread::spawn(|| instruction_set() as *const _ as usize))
        .collect();
    let addrs: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(addrs.windows(2).all(|w| w[0] == w[1]));
}
