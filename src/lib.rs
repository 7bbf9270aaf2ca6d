mod cpu6502;
mod instructions;

pub use crate::cpu6502::{AddressingMode, CPU, StatusFlag, mnemonic, new_cpu};
