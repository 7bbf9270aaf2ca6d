use std::thread;
use std::time::{Duration, Instant};

use phf::phf_map;

/// Software model of the MOS 6502 microprocessor.
///
/// Registers and flags follow the programming model described at
/// https://www.nesdev.org/obelisk-6502-guide/registers.html
#[derive(Debug)]
pub struct CPU {
    // The program counter is a 16 bit register that holds the memory address
    // of the next instruction to be executed. It wraps modulo 0x10000.
    pub program_counter: u16,

    // The stack pointer is an 8 bit register holding the low byte of the next
    // free stack location. The stack is fixed to page 1 (0x0100 - 0x01FF) and
    // grows downwards; over- and underflow wrap silently modulo 256.
    pub stack_pointer: u8,

    // The accumulator is an 8 bit register used for arithmetic and logical
    // operations.
    pub accumulator: u8,

    // The X and Y index registers, most commonly used as counters or as
    // offsets for the indexed addressing modes.
    pub x_register: u8,
    pub y_register: u8,

    // Processor status. Each bit records the result of a previous operation:
    // Bit 7: Negative (N)
    // Bit 6: Overflow (V)
    // Bit 5: Unused (U) (reads as 1 whenever the byte is packed)
    // Bit 4: Break Command (B)
    // Bit 3: Decimal Mode (D)
    // Bit 2: Interrupt Disable (I)
    // Bit 1: Zero (Z)
    // Bit 0: Carry (C)
    pub status_register: u8,

    // The whole 16 bit address space, backed by a flat 64KB array. There is
    // no mapping layer: every address is plain RAM, and a driver is expected
    // to load program bytes before calling `run`.
    memory: [u8; 0x10000],

    // Cycle counter, summed per executed instruction.
    pub cycles: u64,

    // Pacing frequency for `run`, in clock ticks per second. Defaults to the
    // PAL part; hosts targeting NTSC assign `CPU::NTSC_CLOCK_HZ`.
    pub clock_hz: u64,
}

// Each flag corresponds to a bit in the status register.
// Values are the bit positions.
#[derive(Debug, Clone, Copy)]
pub enum StatusFlag {
    Carry = 0,
    Zero = 1,
    InterruptDisable = 2,
    DecimalMode = 3,
    BreakCommand = 4,
    Unused = 5,
    Overflow = 6,
    Negative = 7,
}

#[derive(Debug, Clone, Copy)]
pub enum AddressingMode {
    Absolute,    // e.g. LDA $1234
    AbsoluteX,   // e.g. LDA $1234,X
    AbsoluteY,   // e.g. LDA $1234,Y
    Accumulator, // e.g. ASL A
    Immediate,   // e.g. LDA #$10
    Implicit,    // e.g. CLC, INX (no operand)
    Indirect,    // e.g. JMP ($1234)
    IndirectX,   // e.g. LDA ($10,X)
    IndirectY,   // e.g. LDA ($10),Y
    Relative,    // e.g. BEQ +5
    ZeroPage,    // e.g. LDA $10
    ZeroPageX,   // e.g. LDA $10,X
    ZeroPageY,   // e.g. LDX $10,Y
}

pub fn new_cpu() -> CPU {
    CPU {
        program_counter: 0x0000,
        stack_pointer: CPU::STACK_POINTER_COLD_START,
        accumulator: 0x00,
        x_register: 0x00,
        y_register: 0x00,
        status_register: 0x00,
        memory: [0; 0x10000],
        cycles: 0,
        clock_hz: CPU::PAL_CLOCK_HZ,
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Operand {
    name: &'static str,
    // Function pointer to the instruction handler. The handler receives the
    // resolved operand byte and effective address (where the mode produces
    // one) and returns any extra cycles it incurred.
    handler: fn(&mut CPU, Option<u8>, Option<u16>) -> u8,
    addressing_mode: AddressingMode,
    bytes: u8,
    cycles: u8,
    // Read-flavored abs,X / abs,Y / (zp),Y opcodes pay one extra cycle when
    // indexing crosses a page. Stores and read-modify-writes carry their
    // full cost in `cycles` instead.
    page_penalty: bool,
}

// List of all documented opcodes and their corresponding Operand
// definitions. The remaining 105 byte values are deliberately absent: the
// run loop treats them as a halt.
static OPERAND_MAP: phf::Map<u8, Operand> = phf_map! {
    // ADC Instructions
    0x69u8 => Operand { name: "ADC", handler: CPU::handle_adc, addressing_mode: AddressingMode::Immediate, bytes: 2, cycles: 2, page_penalty: false },
    0x65u8 => Operand { name: "ADC", handler: CPU::handle_adc, addressing_mode: AddressingMode::ZeroPage, bytes: 2, cycles: 3, page_penalty: false },
    0x75u8 => Operand { name: "ADC", handler: CPU::handle_adc, addressing_mode: AddressingMode::ZeroPageX, bytes: 2, cycles: 4, page_penalty: false },
    0x6Du8 => Operand { name: "ADC", handler: CPU::handle_adc, addressing_mode: AddressingMode::Absolute, bytes: 3, cycles: 4, page_penalty: false },
    0x7Du8 => Operand { name: "ADC", handler: CPU::handle_adc, addressing_mode: AddressingMode::AbsoluteX, bytes: 3, cycles: 4, page_penalty: true },
    0x79u8 => Operand { name: "ADC", handler: CPU::handle_adc, addressing_mode: AddressingMode::AbsoluteY, bytes: 3, cycles: 4, page_penalty: true },
    0x61u8 => Operand { name: "ADC", handler: CPU::handle_adc, addressing_mode: AddressingMode::IndirectX, bytes: 2, cycles: 6, page_penalty: false },
    0x71u8 => Operand { name: "ADC", handler: CPU::handle_adc, addressing_mode: AddressingMode::IndirectY, bytes: 2, cycles: 5, page_penalty: true },

    // AND Instructions
    0x29u8 => Operand { name: "AND", handler: CPU::handle_and, addressing_mode: AddressingMode::Immediate, bytes: 2, cycles: 2, page_penalty: false },
    0x25u8 => Operand { name: "AND", handler: CPU::handle_and, addressing_mode: AddressingMode::ZeroPage, bytes: 2, cycles: 3, page_penalty: false },
    0x35u8 => Operand { name: "AND", handler: CPU::handle_and, addressing_mode: AddressingMode::ZeroPageX, bytes: 2, cycles: 4, page_penalty: false },
    0x2Du8 => Operand { name: "AND", handler: CPU::handle_and, addressing_mode: AddressingMode::Absolute, bytes: 3, cycles: 4, page_penalty: false },
    0x3Du8 => Operand { name: "AND", handler: CPU::handle_and, addressing_mode: AddressingMode::AbsoluteX, bytes: 3, cycles: 4, page_penalty: true },
    0x39u8 => Operand { name: "AND", handler: CPU::handle_and, addressing_mode: AddressingMode::AbsoluteY, bytes: 3, cycles: 4, page_penalty: true },
    0x21u8 => Operand { name: "AND", handler: CPU::handle_and, addressing_mode: AddressingMode::IndirectX, bytes: 2, cycles: 6, page_penalty: false },
    0x31u8 => Operand { name: "AND", handler: CPU::handle_and, addressing_mode: AddressingMode::IndirectY, bytes: 2, cycles: 5, page_penalty: true },

    // ASL Instructions
    0x0Au8 => Operand { name: "ASL", handler: CPU::handle_asl, addressing_mode: AddressingMode::Accumulator, bytes: 1, cycles: 2, page_penalty: false },
    0x06u8 => Operand { name: "ASL", handler: CPU::handle_asl, addressing_mode: AddressingMode::ZeroPage, bytes: 2, cycles: 5, page_penalty: false },
    0x16u8 => Operand { name: "ASL", handler: CPU::handle_asl, addressing_mode: AddressingMode::ZeroPageX, bytes: 2, cycles: 6, page_penalty: false },
    0x0Eu8 => Operand { name: "ASL", handler: CPU::handle_asl, addressing_mode: AddressingMode::Absolute, bytes: 3, cycles: 6, page_penalty: false },
    0x1Eu8 => Operand { name: "ASL", handler: CPU::handle_asl, addressing_mode: AddressingMode::AbsoluteX, bytes: 3, cycles: 7, page_penalty: false },

    // Branch Instructions (2 base cycles; the branch helper reports the
    // taken / page-crossed extras)
    0x90u8 => Operand { name: "BCC", handler: CPU::handle_bcc, addressing_mode: AddressingMode::Relative, bytes: 2, cycles: 2, page_penalty: false },
    0xB0u8 => Operand { name: "BCS", handler: CPU::handle_bcs, addressing_mode: AddressingMode::Relative, bytes: 2, cycles: 2, page_penalty: false },
    0xF0u8 => Operand { name: "BEQ", handler: CPU::handle_beq, addressing_mode: AddressingMode::Relative, bytes: 2, cycles: 2, page_penalty: false },
    0x30u8 => Operand { name: "BMI", handler: CPU::handle_bmi, addressing_mode: AddressingMode::Relative, bytes: 2, cycles: 2, page_penalty: false },
    0xD0u8 => Operand { name: "BNE", handler: CPU::handle_bne, addressing_mode: AddressingMode::Relative, bytes: 2, cycles: 2, page_penalty: false },
    0x10u8 => Operand { name: "BPL", handler: CPU::handle_bpl, addressing_mode: AddressingMode::Relative, bytes: 2, cycles: 2, page_penalty: false },
    0x50u8 => Operand { name: "BVC", handler: CPU::handle_bvc, addressing_mode: AddressingMode::Relative, bytes: 2, cycles: 2, page_penalty: false },
    0x70u8 => Operand { name: "BVS", handler: CPU::handle_bvs, addressing_mode: AddressingMode::Relative, bytes: 2, cycles: 2, page_penalty: false },

    // BIT Instructions
    0x24u8 => Operand { name: "BIT", handler: CPU::handle_bit, addressing_mode: AddressingMode::ZeroPage, bytes: 2, cycles: 3, page_penalty: false },
    0x2Cu8 => Operand { name: "BIT", handler: CPU::handle_bit, addressing_mode: AddressingMode::Absolute, bytes: 3, cycles: 4, page_penalty: false },

    // BRK Instruction
    0x00u8 => Operand { name: "BRK", handler: CPU::handle_brk, addressing_mode: AddressingMode::Implicit, bytes: 1, cycles: 7, page_penalty: false },

    // Flag Clear Instructions
    0x18u8 => Operand { name: "CLC", handler: CPU::handle_clc, addressing_mode: AddressingMode::Implicit, bytes: 1, cycles: 2, page_penalty: false },
    0xD8u8 => Operand { name: "CLD", handler: CPU::handle_cld, addressing_mode: AddressingMode::Implicit, bytes: 1, cycles: 2, page_penalty: false },
    0x58u8 => Operand { name: "CLI", handler: CPU::handle_cli, addressing_mode: AddressingMode::Implicit, bytes: 1, cycles: 2, page_penalty: false },
    0xB8u8 => Operand { name: "CLV", handler: CPU::handle_clv, addressing_mode: AddressingMode::Implicit, bytes: 1, cycles: 2, page_penalty: false },

    // CMP Instructions
    0xC9u8 => Operand { name: "CMP", handler: CPU::handle_cmp, addressing_mode: AddressingMode::Immediate, bytes: 2, cycles: 2, page_penalty: false },
    0xC5u8 => Operand { name: "CMP", handler: CPU::handle_cmp, addressing_mode: AddressingMode::ZeroPage, bytes: 2, cycles: 3, page_penalty: false },
    0xD5u8 => Operand { name: "CMP", handler: CPU::handle_cmp, addressing_mode: AddressingMode::ZeroPageX, bytes: 2, cycles: 4, page_penalty: false },
    0xCDu8 => Operand { name: "CMP", handler: CPU::handle_cmp, addressing_mode: AddressingMode::Absolute, bytes: 3, cycles: 4, page_penalty: false },
    0xDDu8 => Operand { name: "CMP", handler: CPU::handle_cmp, addressing_mode: AddressingMode::AbsoluteX, bytes: 3, cycles: 4, page_penalty: true },
    0xD9u8 => Operand { name: "CMP", handler: CPU::handle_cmp, addressing_mode: AddressingMode::AbsoluteY, bytes: 3, cycles: 4, page_penalty: true },
    0xC1u8 => Operand { name: "CMP", handler: CPU::handle_cmp, addressing_mode: AddressingMode::IndirectX, bytes: 2, cycles: 6, page_penalty: false },
    0xD1u8 => Operand { name: "CMP", handler: CPU::handle_cmp, addressing_mode: AddressingMode::IndirectY, bytes: 2, cycles: 5, page_penalty: true },

    // CPX Instructions
    0xE0u8 => Operand { name: "CPX", handler: CPU::handle_cpx, addressing_mode: AddressingMode::Immediate, bytes: 2, cycles: 2, page_penalty: false },
    0xE4u8 => Operand { name: "CPX", handler: CPU::handle_cpx, addressing_mode: AddressingMode::ZeroPage, bytes: 2, cycles: 3, page_penalty: false },
    0xECu8 => Operand { name: "CPX", handler: CPU::handle_cpx, addressing_mode: AddressingMode::Absolute, bytes: 3, cycles: 4, page_penalty: false },

    // CPY Instructions
    0xC0u8 => Operand { name: "CPY", handler: CPU::handle_cpy, addressing_mode: AddressingMode::Immediate, bytes: 2, cycles: 2, page_penalty: false },
    0xC4u8 => Operand { name: "CPY", handler: CPU::handle_cpy, addressing_mode: AddressingMode::ZeroPage, bytes: 2, cycles: 3, page_penalty: false },
    0xCCu8 => Operand { name: "CPY", handler: CPU::handle_cpy, addressing_mode: AddressingMode::Absolute, bytes: 3, cycles: 4, page_penalty: false },

    // DEC Instructions
    0xC6u8 => Operand { name: "DEC", handler: CPU::handle_dec, addressing_mode: AddressingMode::ZeroPage, bytes: 2, cycles: 5, page_penalty: false },
    0xD6u8 => Operand { name: "DEC", handler: CPU::handle_dec, addressing_mode: AddressingMode::ZeroPageX, bytes: 2, cycles: 6, page_penalty: false },
    0xCEu8 => Operand { name: "DEC", handler: CPU::handle_dec, addressing_mode: AddressingMode::Absolute, bytes: 3, cycles: 6, page_penalty: false },
    0xDEu8 => Operand { name: "DEC", handler: CPU::handle_dec, addressing_mode: AddressingMode::AbsoluteX, bytes: 3, cycles: 7, page_penalty: false },

    // DEX / DEY Instructions
    0xCAu8 => Operand { name: "DEX", handler: CPU::handle_dex, addressing_mode: AddressingMode::Implicit, bytes: 1, cycles: 2, page_penalty: false },
    0x88u8 => Operand { name: "DEY", handler: CPU::handle_dey, addressing_mode: AddressingMode::Implicit, bytes: 1, cycles: 2, page_penalty: false },

    // EOR Instructions
    0x49u8 => Operand { name: "EOR", handler: CPU::handle_eor, addressing_mode: AddressingMode::Immediate, bytes: 2, cycles: 2, page_penalty: false },
    0x45u8 => Operand { name: "EOR", handler: CPU::handle_eor, addressing_mode: AddressingMode::ZeroPage, bytes: 2, cycles: 3, page_penalty: false },
    0x55u8 => Operand { name: "EOR", handler: CPU::handle_eor, addressing_mode: AddressingMode::ZeroPageX, bytes: 2, cycles: 4, page_penalty: false },
    0x4Du8 => Operand { name: "EOR", handler: CPU::handle_eor, addressing_mode: AddressingMode::Absolute, bytes: 3, cycles: 4, page_penalty: false },
    0x5Du8 => Operand { name: "EOR", handler: CPU::handle_eor, addressing_mode: AddressingMode::AbsoluteX, bytes: 3, cycles: 4, page_penalty: true },
    0x59u8 => Operand { name: "EOR", handler: CPU::handle_eor, addressing_mode: AddressingMode::AbsoluteY, bytes: 3, cycles: 4, page_penalty: true },
    0x41u8 => Operand { name: "EOR", handler: CPU::handle_eor, addressing_mode: AddressingMode::IndirectX, bytes: 2, cycles: 6, page_penalty: false },
    0x51u8 => Operand { name: "EOR", handler: CPU::handle_eor, addressing_mode: AddressingMode::IndirectY, bytes: 2, cycles: 5, page_penalty: true },

    // INC Instructions
    0xE6u8 => Operand { name: "INC", handler: CPU::handle_inc, addressing_mode: AddressingMode::ZeroPage, bytes: 2, cycles: 5, page_penalty: false },
    0xF6u8 => Operand { name: "INC", handler: CPU::handle_inc, addressing_mode: AddressingMode::ZeroPageX, bytes: 2, cycles: 6, page_penalty: false },
    0xEEu8 => Operand { name: "INC", handler: CPU::handle_inc, addressing_mode: AddressingMode::Absolute, bytes: 3, cycles: 6, page_penalty: false },
    0xFEu8 => Operand { name: "INC", handler: CPU::handle_inc, addressing_mode: AddressingMode::AbsoluteX, bytes: 3, cycles: 7, page_penalty: false },

    // INX / INY Instructions
    0xE8u8 => Operand { name: "INX", handler: CPU::handle_inx, addressing_mode: AddressingMode::Implicit, bytes: 1, cycles: 2, page_penalty: false },
    0xC8u8 => Operand { name: "INY", handler: CPU::handle_iny, addressing_mode: AddressingMode::Implicit, bytes: 1, cycles: 2, page_penalty: false },

    // JMP Instructions
    0x4Cu8 => Operand { name: "JMP", handler: CPU::handle_jmp, addressing_mode: AddressingMode::Absolute, bytes: 3, cycles: 3, page_penalty: false },
    0x6Cu8 => Operand { name: "JMP", handler: CPU::handle_jmp, addressing_mode: AddressingMode::Indirect, bytes: 3, cycles: 5, page_penalty: false },

    // JSR Instruction
    0x20u8 => Operand { name: "JSR", handler: CPU::handle_jsr, addressing_mode: AddressingMode::Absolute, bytes: 3, cycles: 6, page_penalty: false },

    // LDA Instructions
    0xA9u8 => Operand { name: "LDA", handler: CPU::handle_lda, addressing_mode: AddressingMode::Immediate, bytes: 2, cycles: 2, page_penalty: false },
    0xA5u8 => Operand { name: "LDA", handler: CPU::handle_lda, addressing_mode: AddressingMode::ZeroPage, bytes: 2, cycles: 3, page_penalty: false },
    0xB5u8 => Operand { name: "LDA", handler: CPU::handle_lda, addressing_mode: AddressingMode::ZeroPageX, bytes: 2, cycles: 4, page_penalty: false },
    0xADu8 => Operand { name: "LDA", handler: CPU::handle_lda, addressing_mode: AddressingMode::Absolute, bytes: 3, cycles: 4, page_penalty: false },
    0xBDu8 => Operand { name: "LDA", handler: CPU::handle_lda, addressing_mode: AddressingMode::AbsoluteX, bytes: 3, cycles: 4, page_penalty: true },
    0xB9u8 => Operand { name: "LDA", handler: CPU::handle_lda, addressing_mode: AddressingMode::AbsoluteY, bytes: 3, cycles: 4, page_penalty: true },
    0xA1u8 => Operand { name: "LDA", handler: CPU::handle_lda, addressing_mode: AddressingMode::IndirectX, bytes: 2, cycles: 6, page_penalty: false },
    0xB1u8 => Operand { name: "LDA", handler: CPU::handle_lda, addressing_mode: AddressingMode::IndirectY, bytes: 2, cycles: 5, page_penalty: true },

    // LDX Instructions
    0xA2u8 => Operand { name: "LDX", handler: CPU::handle_ldx, addressing_mode: AddressingMode::Immediate, bytes: 2, cycles: 2, page_penalty: false },
    0xA6u8 => Operand { name: "LDX", handler: CPU::handle_ldx, addressing_mode: AddressingMode::ZeroPage, bytes: 2, cycles: 3, page_penalty: false },
    0xB6u8 => Operand { name: "LDX", handler: CPU::handle_ldx, addressing_mode: AddressingMode::ZeroPageY, bytes: 2, cycles: 4, page_penalty: false },
    0xAEu8 => Operand { name: "LDX", handler: CPU::handle_ldx, addressing_mode: AddressingMode::Absolute, bytes: 3, cycles: 4, page_penalty: false },
    0xBEu8 => Operand { name: "LDX", handler: CPU::handle_ldx, addressing_mode: AddressingMode::AbsoluteY, bytes: 3, cycles: 4, page_penalty: true },

    // LDY Instructions
    0xA0u8 => Operand { name: "LDY", handler: CPU::handle_ldy, addressing_mode: AddressingMode::Immediate, bytes: 2, cycles: 2, page_penalty: false },
    0xA4u8 => Operand { name: "LDY", handler: CPU::handle_ldy, addressing_mode: AddressingMode::ZeroPage, bytes: 2, cycles: 3, page_penalty: false },
    0xB4u8 => Operand { name: "LDY", handler: CPU::handle_ldy, addressing_mode: AddressingMode::ZeroPageX, bytes: 2, cycles: 4, page_penalty: false },
    0xACu8 => Operand { name: "LDY", handler: CPU::handle_ldy, addressing_mode: AddressingMode::Absolute, bytes: 3, cycles: 4, page_penalty: false },
    0xBCu8 => Operand { name: "LDY", handler: CPU::handle_ldy, addressing_mode: AddressingMode::AbsoluteX, bytes: 3, cycles: 4, page_penalty: true },

    // LSR Instructions
    0x4Au8 => Operand { name: "LSR", handler: CPU::handle_lsr, addressing_mode: AddressingMode::Accumulator, bytes: 1, cycles: 2, page_penalty: false },
    0x46u8 => Operand { name: "LSR", handler: CPU::handle_lsr, addressing_mode: AddressingMode::ZeroPage, bytes: 2, cycles: 5, page_penalty: false },
    0x56u8 => Operand { name: "LSR", handler: CPU::handle_lsr, addressing_mode: AddressingMode::ZeroPageX, bytes: 2, cycles: 6, page_penalty: false },
    0x4Eu8 => Operand { name: "LSR", handler: CPU::handle_lsr, addressing_mode: AddressingMode::Absolute, bytes: 3, cycles: 6, page_penalty: false },
    0x5Eu8 => Operand { name: "LSR", handler: CPU::handle_lsr, addressing_mode: AddressingMode::AbsoluteX, bytes: 3, cycles: 7, page_penalty: false },

    // NOP Instruction
    0xEAu8 => Operand { name: "NOP", handler: CPU::handle_nop, addressing_mode: AddressingMode::Implicit, bytes: 1, cycles: 2, page_penalty: false },

    // ORA Instructions
    0x09u8 => Operand { name: "ORA", handler: CPU::handle_ora, addressing_mode: AddressingMode::Immediate, bytes: 2, cycles: 2, page_penalty: false },
    0x05u8 => Operand { name: "ORA", handler: CPU::handle_ora, addressing_mode: AddressingMode::ZeroPage, bytes: 2, cycles: 3, page_penalty: false },
    0x15u8 => Operand { name: "ORA", handler: CPU::handle_ora, addressing_mode: AddressingMode::ZeroPageX, bytes: 2, cycles: 4, page_penalty: false },
    0x0Du8 => Operand { name: "ORA", handler: CPU::handle_ora, addressing_mode: AddressingMode::Absolute, bytes: 3, cycles: 4, page_penalty: false },
    0x1Du8 => Operand { name: "ORA", handler: CPU::handle_ora, addressing_mode: AddressingMode::AbsoluteX, bytes: 3, cycles: 4, page_penalty: true },
    0x19u8 => Operand { name: "ORA", handler: CPU::handle_ora, addressing_mode: AddressingMode::AbsoluteY, bytes: 3, cycles: 4, page_penalty: true },
    0x01u8 => Operand { name: "ORA", handler: CPU::handle_ora, addressing_mode: AddressingMode::IndirectX, bytes: 2, cycles: 6, page_penalty: false },
    0x11u8 => Operand { name: "ORA", handler: CPU::handle_ora, addressing_mode: AddressingMode::IndirectY, bytes: 2, cycles: 5, page_penalty: true },

    // Stack Instructions
    0x48u8 => Operand { name: "PHA", handler: CPU::handle_pha, addressing_mode: AddressingMode::Implicit, bytes: 1, cycles: 3, page_penalty: false },
    0x08u8 => Operand { name: "PHP", handler: CPU::handle_php, addressing_mode: AddressingMode::Implicit, bytes: 1, cycles: 3, page_penalty: false },
    0x68u8 => Operand { name: "PLA", handler: CPU::handle_pla, addressing_mode: AddressingMode::Implicit, bytes: 1, cycles: 4, page_penalty: false },
    0x28u8 => Operand { name: "PLP", handler: CPU::handle_plp, addressing_mode: AddressingMode::Implicit, bytes: 1, cycles: 4, page_penalty: false },

    // ROL Instructions
    0x2Au8 => Operand { name: "ROL", handler: CPU::handle_rol, addressing_mode: AddressingMode::Accumulator, bytes: 1, cycles: 2, page_penalty: false },
    0x26u8 => Operand { name: "ROL", handler: CPU::handle_rol, addressing_mode: AddressingMode::ZeroPage, bytes: 2, cycles: 5, page_penalty: false },
    0x36u8 => Operand { name: "ROL", handler: CPU::handle_rol, addressing_mode: AddressingMode::ZeroPageX, bytes: 2, cycles: 6, page_penalty: false },
    0x2Eu8 => Operand { name: "ROL", handler: CPU::handle_rol, addressing_mode: AddressingMode::Absolute, bytes: 3, cycles: 6, page_penalty: false },
    0x3Eu8 => Operand { name: "ROL", handler: CPU::handle_rol, addressing_mode: AddressingMode::AbsoluteX, bytes: 3, cycles: 7, page_penalty: false },

    // ROR Instructions
    0x6Au8 => Operand { name: "ROR", handler: CPU::handle_ror, addressing_mode: AddressingMode::Accumulator, bytes: 1, cycles: 2, page_penalty: false },
    0x66u8 => Operand { name: "ROR", handler: CPU::handle_ror, addressing_mode: AddressingMode::ZeroPage, bytes: 2, cycles: 5, page_penalty: false },
    0x76u8 => Operand { name: "ROR", handler: CPU::handle_ror, addressing_mode: AddressingMode::ZeroPageX, bytes: 2, cycles: 6, page_penalty: false },
    0x6Eu8 => Operand { name: "ROR", handler: CPU::handle_ror, addressing_mode: AddressingMode::Absolute, bytes: 3, cycles: 6, page_penalty: false },
    0x7Eu8 => Operand { name: "ROR", handler: CPU::handle_ror, addressing_mode: AddressingMode::AbsoluteX, bytes: 3, cycles: 7, page_penalty: false },

    // RTI / RTS Instructions
    0x40u8 => Operand { name: "RTI", handler: CPU::handle_rti, addressing_mode: AddressingMode::Implicit, bytes: 1, cycles: 6, page_penalty: false },
    0x60u8 => Operand { name: "RTS", handler: CPU::handle_rts, addressing_mode: AddressingMode::Implicit, bytes: 1, cycles: 6, page_penalty: false },

    // SBC Instructions
    0xE9u8 => Operand { name: "SBC", handler: CPU::handle_sbc, addressing_mode: AddressingMode::Immediate, bytes: 2, cycles: 2, page_penalty: false },
    0xE5u8 => Operand { name: "SBC", handler: CPU::handle_sbc, addressing_mode: AddressingMode::ZeroPage, bytes: 2, cycles: 3, page_penalty: false },
    0xF5u8 => Operand { name: "SBC", handler: CPU::handle_sbc, addressing_mode: AddressingMode::ZeroPageX, bytes: 2, cycles: 4, page_penalty: false },
    0xEDu8 => Operand { name: "SBC", handler: CPU::handle_sbc, addressing_mode: AddressingMode::Absolute, bytes: 3, cycles: 4, page_penalty: false },
    0xFDu8 => Operand { name: "SBC", handler: CPU::handle_sbc, addressing_mode: AddressingMode::AbsoluteX, bytes: 3, cycles: 4, page_penalty: true },
    0xF9u8 => Operand { name: "SBC", handler: CPU::handle_sbc, addressing_mode: AddressingMode::AbsoluteY, bytes: 3, cycles: 4, page_penalty: true },
    0xE1u8 => Operand { name: "SBC", handler: CPU::handle_sbc, addressing_mode: AddressingMode::IndirectX, bytes: 2, cycles: 6, page_penalty: false },
    0xF1u8 => Operand { name: "SBC", handler: CPU::handle_sbc, addressing_mode: AddressingMode::IndirectY, bytes: 2, cycles: 5, page_penalty: true },

    // Flag Set Instructions
    0x38u8 => Operand { name: "SEC", handler: CPU::handle_sec, addressing_mode: AddressingMode::Implicit, bytes: 1, cycles: 2, page_penalty: false },
    0xF8u8 => Operand { name: "SED", handler: CPU::handle_sed, addressing_mode: AddressingMode::Implicit, bytes: 1, cycles: 2, page_penalty: false },
    0x78u8 => Operand { name: "SEI", handler: CPU::handle_sei, addressing_mode: AddressingMode::Implicit, bytes: 1, cycles: 2, page_penalty: false },

    // STA Instructions (stores carry their full cost, no page penalty)
    0x85u8 => Operand { name: "STA", handler: CPU::handle_sta, addressing_mode: AddressingMode::ZeroPage, bytes: 2, cycles: 3, page_penalty: false },
    0x95u8 => Operand { name: "STA", handler: CPU::handle_sta, addressing_mode: AddressingMode::ZeroPageX, bytes: 2, cycles: 4, page_penalty: false },
    0x8Du8 => Operand { name: "STA", handler: CPU::handle_sta, addressing_mode: AddressingMode::Absolute, bytes: 3, cycles: 4, page_penalty: false },
    0x9Du8 => Operand { name: "STA", handler: CPU::handle_sta, addressing_mode: AddressingMode::AbsoluteX, bytes: 3, cycles: 5, page_penalty: false },
    0x99u8 => Operand { name: "STA", handler: CPU::handle_sta, addressing_mode: AddressingMode::AbsoluteY, bytes: 3, cycles: 5, page_penalty: false },
    0x81u8 => Operand { name: "STA", handler: CPU::handle_sta, addressing_mode: AddressingMode::IndirectX, bytes: 2, cycles: 6, page_penalty: false },
    0x91u8 => Operand { name: "STA", handler: CPU::handle_sta, addressing_mode: AddressingMode::IndirectY, bytes: 2, cycles: 6, page_penalty: false },

    // STX Instructions
    0x86u8 => Operand { name: "STX", handler: CPU::handle_stx, addressing_mode: AddressingMode::ZeroPage, bytes: 2, cycles: 3, page_penalty: false },
    0x96u8 => Operand { name: "STX", handler: CPU::handle_stx, addressing_mode: AddressingMode::ZeroPageY, bytes: 2, cycles: 4, page_penalty: false },
    0x8Eu8 => Operand { name: "STX", handler: CPU::handle_stx, addressing_mode: AddressingMode::Absolute, bytes: 3, cycles: 4, page_penalty: false },

    // STY Instructions
    0x84u8 => Operand { name: "STY", handler: CPU::handle_sty, addressing_mode: AddressingMode::ZeroPage, bytes: 2, cycles: 3, page_penalty: false },
    0x94u8 => Operand { name: "STY", handler: CPU::handle_sty, addressing_mode: AddressingMode::ZeroPageX, bytes: 2, cycles: 4, page_penalty: false },
    0x8Cu8 => Operand { name: "STY", handler: CPU::handle_sty, addressing_mode: AddressingMode::Absolute, bytes: 3, cycles: 4, page_penalty: false },

    // Transfer Instructions
    0xAAu8 => Operand { name: "TAX", handler: CPU::handle_tax, addressing_mode: AddressingMode::Implicit, bytes: 1, cycles: 2, page_penalty: false },
    0xA8u8 => Operand { name: "TAY", handler: CPU::handle_tay, addressing_mode: AddressingMode::Implicit, bytes: 1, cycles: 2, page_penalty: false },
    0xBAu8 => Operand { name: "TSX", handler: CPU::handle_tsx, addressing_mode: AddressingMode::Implicit, bytes: 1, cycles: 2, page_penalty: false },
    0x8Au8 => Operand { name: "TXA", handler: CPU::handle_txa, addressing_mode: AddressingMode::Implicit, bytes: 1, cycles: 2, page_penalty: false },
    0x9Au8 => Operand { name: "TXS", handler: CPU::handle_txs, addressing_mode: AddressingMode::Implicit, bytes: 1, cycles: 2, page_penalty: false },
    0x98u8 => Operand { name: "TYA", handler: CPU::handle_tya, addressing_mode: AddressingMode::Implicit, bytes: 1, cycles: 2, page_penalty: false },
};

/// Returns the mnemonic for a documented opcode byte, or None for the 105
/// unassigned bytes that halt the run loop.
pub fn mnemonic(opcode: u8) -> Option<&'static str> {
    OPERAND_MAP.get(&opcode).map(|operand| operand.name)
}

impl CPU {
    const STACK_BASE_ADDRESS: u16 = 0x0100;
    const STACK_POINTER_COLD_START: u8 = 0xFF;
    const RESET_VECTOR_ADDRESS: u16 = 0xFFFC;
    pub(crate) const IRQ_VECTOR_ADDRESS: u16 = 0xFFFE;

    // Nominal clock rates of the two mass-produced variants.
    pub const PAL_CLOCK_HZ: u64 = 985_000;
    pub const NTSC_CLOCK_HZ: u64 = 1_789_773;

    pub fn read_u8(&self, addr: u16) -> u8 {
        self.memory[addr as usize]
    }

    pub fn write_u8(&mut self, addr: u16, value: u8) {
        self.memory[addr as usize] = value;
    }

    pub fn read_u16(&self, addr: u16) -> u16 {
        // Little-endian: low byte at addr, high byte at addr + 1. Address
        // arithmetic wraps at the top of the address space.
        u16::from_le_bytes([self.read_u8(addr), self.read_u8(addr.wrapping_add(1))])
    }

    pub fn write_u16(&mut self, addr: u16, value: u16) {
        let [low, high] = u16::to_le_bytes(value);
        self.write_u8(addr, low);
        self.write_u8(addr.wrapping_add(1), high);
    }

    pub fn set_status_flag(&mut self, flag: StatusFlag, value: bool) {
        if value {
            self.status_register |= 1 << (flag as u8);
        } else {
            self.status_register &= !(1 << (flag as u8));
        }
    }

    pub fn get_status_flag(&self, flag: StatusFlag) -> bool {
        (self.status_register & (1 << (flag as u8))) != 0
    }

    /// The status byte as it appears when packed for the outside world:
    /// the unused bit 5 always reads as 1.
    pub fn status(&self) -> u8 {
        self.status_register | 1 << (StatusFlag::Unused as u8)
    }

    pub fn set_status(&mut self, value: u8) {
        self.status_register = value;
    }

    /// The Zero and Negative flags track nearly every result; they are set
    /// together from the value that was just produced.
    pub(crate) fn set_zero_and_negative(&mut self, value: u8) {
        self.set_status_flag(StatusFlag::Zero, value == 0);
        self.set_status_flag(StatusFlag::Negative, (value & 0x80) != 0);
    }

    /// Pushes a byte onto the stack.
    pub(crate) fn push_u8(&mut self, value: u8) {
        let stack_addr = Self::STACK_BASE_ADDRESS + self.stack_pointer as u16;
        self.write_u8(stack_addr, value);
        self.stack_pointer = self.stack_pointer.wrapping_sub(1);
    }

    /// Pushes a 16-bit word onto the stack, high byte first, so the two
    /// bytes sit in little-endian order in memory.
    pub(crate) fn push_u16(&mut self, value: u16) {
        let [low, high] = value.to_le_bytes();
        self.push_u8(high);
        self.push_u8(low);
    }

    /// Pops a byte from the stack.
    pub(crate) fn pop_u8(&mut self) -> u8 {
        self.stack_pointer = self.stack_pointer.wrapping_add(1);
        let stack_addr = Self::STACK_BASE_ADDRESS + self.stack_pointer as u16;
        self.read_u8(stack_addr)
    }

    /// Pops a 16-bit word from the stack, low byte first.
    pub(crate) fn pop_u16(&mut self) -> u16 {
        let low = self.pop_u8();
        let high = self.pop_u8();
        u16::from_le_bytes([low, high])
    }

    /// Copies program bytes into memory starting at `address`. The caller
    /// still picks the entry point when it calls `run`.
    pub fn load(&mut self, address: u16, program: &[u8]) {
        let start = address as usize;
        let end = start + program.len();

        if end > self.memory.len() {
            panic!("program of {} bytes does not fit at {:#06X}", program.len(), address);
        }

        self.memory[start..end].copy_from_slice(program);
    }

    /// Returns registers and flags to their cold-start values and loads the
    /// program counter from the reset vector at 0xFFFC.
    pub fn reset(&mut self) {
        self.accumulator = 0;
        self.x_register = 0;
        self.y_register = 0;
        self.status_register = 0;
        self.stack_pointer = Self::STACK_POINTER_COLD_START;
        self.cycles = 0;
        self.program_counter = self.read_u16(Self::RESET_VECTOR_ADDRESS);
    }

    /// Branch helper: centralizes branch behavior for relative branches.
    /// `condition` indicates whether the branch should be taken and `offset`
    /// is the signed 8-bit relative displacement. The program counter has
    /// already moved past the branch instruction when this runs, so the
    /// displacement is applied to PC+2 exactly as the hardware does.
    /// Returns additional cycles: 0 if not taken, +1 if taken, +2 if the
    /// destination lies on a different page.
    pub(crate) fn branch(&mut self, condition: bool, offset: i8) -> u8 {
        let mut additional_cycles: u8 = 0;
        if condition {
            let old_pc = self.program_counter;
            self.program_counter = self.program_counter.wrapping_add(offset as u16);
            additional_cycles += 1; // branch taken
            if (old_pc & 0xFF00) != (self.program_counter & 0xFF00) {
                additional_cycles += 1; // page crossed
            }
        }
        additional_cycles
    }

    /// Writes a read-modify-write result back to where it came from: the
    /// resolved memory cell, or the accumulator in accumulator mode.
    pub(crate) fn write_operand(&mut self, opt_address: Option<u16>, value: u8) {
        match opt_address {
            Some(address) => self.write_u8(address, value),
            None => self.accumulator = value,
        }
    }

    // Helper to get the effective address for an addressing mode whose
    // operand bytes start at `addr`. Also reports whether indexing crossed a
    // page boundary, which costs read-flavored opcodes one extra cycle.
    pub(crate) fn get_operand_address(&self, mode: AddressingMode, addr: u16) -> (u16, bool) {
        match mode {
            AddressingMode::Absolute => (self.read_u16(addr), false),

            AddressingMode::AbsoluteX => {
                let base = self.read_u16(addr);
                let effective = base.wrapping_add(self.x_register as u16);
                (effective, (base & 0xFF00) != (effective & 0xFF00))
            }

            AddressingMode::AbsoluteY => {
                let base = self.read_u16(addr);
                let effective = base.wrapping_add(self.y_register as u16);
                (effective, (base & 0xFF00) != (effective & 0xFF00))
            }

            AddressingMode::Immediate => (addr, false),

            AddressingMode::Indirect => {
                let ptr = self.read_u16(addr);
                // 6502 hardware bug: the high byte of the target is fetched
                // from the same page as the low byte, so a pointer at $xxFF
                // wraps back to $xx00 instead of reaching the next page.
                let low = self.read_u8(ptr);
                let high = self.read_u8((ptr & 0xFF00) | (ptr.wrapping_add(1) & 0x00FF));
                (u16::from_le_bytes([low, high]), false)
            }

            AddressingMode::IndirectX => {
                let ptr = self.read_u8(addr).wrapping_add(self.x_register);
                // Both pointer bytes come from the zero page; the high byte
                // fetch wraps within it.
                let low = self.read_u8(ptr as u16);
                let high = self.read_u8(ptr.wrapping_add(1) as u16);
                (u16::from_le_bytes([low, high]), false)
            }

            AddressingMode::IndirectY => {
                let ptr = self.read_u8(addr);
                let low = self.read_u8(ptr as u16);
                let high = self.read_u8(ptr.wrapping_add(1) as u16);
                let base = u16::from_le_bytes([low, high]);
                let effective = base.wrapping_add(self.y_register as u16);
                (effective, (base & 0xFF00) != (effective & 0xFF00))
            }

            AddressingMode::ZeroPage => (self.read_u8(addr) as u16, false),

            AddressingMode::ZeroPageX => {
                // The index wraps within the zero page: $C0,X with X=$60
                // targets $20, not $120.
                ((self.read_u8(addr).wrapping_add(self.x_register)) as u16, false)
            }

            AddressingMode::ZeroPageY => {
                ((self.read_u8(addr).wrapping_add(self.y_register)) as u16, false)
            }

            AddressingMode::Accumulator | AddressingMode::Implicit | AddressingMode::Relative => {
                panic!("BUG: no effective address for {:?} mode", mode)
            }
        }
    }

    /// Executes the instruction at the program counter. Returns the number
    /// of cycles it consumed, or None when the opcode byte has no decode
    /// entry — the halt condition that ends `run`. A halted CPU is left
    /// untouched so registers and memory stay inspectable.
    pub fn step(&mut self) -> Option<u8> {
        let opcode = self.read_u8(self.program_counter);
        let operand_info = OPERAND_MAP.get(&opcode)?;

        let operand_start = self.program_counter.wrapping_add(1);
        let (operand_value, operand_address, page_crossed) = match operand_info.addressing_mode {
            AddressingMode::Implicit => (None, None, false),
            AddressingMode::Accumulator => (Some(self.accumulator), None, false),
            // Branches take the raw displacement byte; the branch helper
            // resolves the destination itself.
            AddressingMode::Relative => (Some(self.read_u8(operand_start)), None, false),
            mode => {
                let (address, page_crossed) = self.get_operand_address(mode, operand_start);
                (Some(self.read_u8(address)), Some(address), page_crossed)
            }
        };

        // The program counter always moves past the instruction before the
        // handler runs; jump, branch and return handlers overwrite it.
        self.program_counter = self.program_counter.wrapping_add(operand_info.bytes as u16);

        let handler_extra = (operand_info.handler)(self, operand_value, operand_address);

        let mut ticks = operand_info.cycles + handler_extra;
        if page_crossed && operand_info.page_penalty {
            ticks += 1;
        }
        self.cycles += ticks as u64;
        Some(ticks)
    }

    /// Fetch-execute loop, paced in real time to `clock_hz`. Each
    /// instruction advances an absolute deadline by its cycle count and the
    /// loop sleeps off the remainder, so a late wake-up on one instruction
    /// is absorbed by the next instead of accumulating drift. Returns once
    /// the program counter lands on an unassigned opcode.
    pub fn run(&mut self, entry_point: u16) {
        self.program_counter = entry_point;

        let tick_duration = Duration::from_nanos(1_000_000_000 / self.clock_hz);
        let mut deadline = Instant::now();

        while let Some(ticks) = self.step() {
            deadline += tick_duration * ticks as u32;
            let now = Instant::now();
            if deadline > now {
                thread::sleep(deadline - now);
            }
        }
    }
}
