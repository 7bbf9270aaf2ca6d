use crate::cpu6502::{CPU, StatusFlag};

impl CPU {
    pub(crate) fn handle_beq(&mut self, opt_value: Option<u8>, _opt_address: Option<u16>) -> u8 {
        let offset = opt_value.expect("BUG: branch displacement of BEQ should be present");
        self.branch(self.get_status_flag(StatusFlag::Zero), offset as i8)
    }
}

#[cfg(test)]
mod tests {
    use crate::cpu6502::{StatusFlag, new_cpu};

    #[test]
    fn test_beq_taken_when_zero_set() {
        let mut cpu = new_cpu();
        cpu.program_counter = 0x2000;
        cpu.set_status_flag(StatusFlag::Zero, true);
        let cycles = cpu.handle_beq(Some(0x08), None);
        assert_eq!(cpu.program_counter, 0x2008);
        assert_eq!(cycles, 1);
    }

    #[test]
    fn test_beq_not_taken_when_zero_clear() {
        let mut cpu = new_cpu();
        cpu.program_counter = 0x2000;
        let cycles = cpu.handle_beq(Some(0x08), None);
        assert_eq!(cpu.program_counter, 0x2000);
        assert_eq!(cycles, 0);
    }
}
