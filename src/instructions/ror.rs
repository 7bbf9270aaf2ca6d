use crate::cpu6502::{CPU, StatusFlag};

impl CPU {
    pub(crate) fn handle_ror(&mut self, opt_value: Option<u8>, opt_address: Option<u16>) -> u8 {
        let value = opt_value.expect("BUG: memory value of ROR should be present");
        let carry_in = if self.get_status_flag(StatusFlag::Carry) { 0x80 } else { 0 };
        let result = (value >> 1) | carry_in;

        // The old carry rotates in at the top while bit 0 rotates out.
        self.set_status_flag(StatusFlag::Carry, value & 0x01 != 0);
        self.set_zero_and_negative(result);
        self.write_operand(opt_address, result);
        0
    }
}

#[cfg(test)]
mod tests {
    use crate::cpu6502::{StatusFlag, new_cpu};

    #[test]
    fn test_ror_rotates_carry_into_bit_seven() {
        let mut cpu = new_cpu();
        cpu.accumulator = 0x02;
        cpu.set_status_flag(StatusFlag::Carry, true);
        cpu.handle_ror(Some(0x02), None);
        assert_eq!(cpu.accumulator, 0x81);
        assert!(!cpu.get_status_flag(StatusFlag::Carry));
        assert!(cpu.get_status_flag(StatusFlag::Negative));
    }

    #[test]
    fn test_ror_rotates_bit_zero_into_carry() {
        let mut cpu = new_cpu();
        cpu.accumulator = 0x01;
        cpu.handle_ror(Some(0x01), None);
        assert_eq!(cpu.accumulator, 0x00);
        assert!(cpu.get_status_flag(StatusFlag::Carry));
        assert!(cpu.get_status_flag(StatusFlag::Zero));
    }

    #[test]
    fn test_ror_memory_operand() {
        let mut cpu = new_cpu();
        cpu.write_u8(0x0200, 0x10);
        cpu.handle_ror(Some(0x10), Some(0x0200));
        assert_eq!(cpu.read_u8(0x0200), 0x08);
        assert_eq!(cpu.accumulator, 0x00);
    }
}
