use crate::cpu6502::{CPU, StatusFlag};

impl CPU {
    pub(crate) fn handle_bpl(&mut self, opt_value: Option<u8>, _opt_address: Option<u16>) -> u8 {
        let offset = opt_value.expect("BUG: branch displacement of BPL should be present");
        self.branch(!self.get_status_flag(StatusFlag::Negative), offset as i8)
    }
}

#[cfg(test)]
mod tests {
    use crate::cpu6502::{StatusFlag, new_cpu};

    #[test]
    fn test_bpl_taken_when_negative_clear() {
        let mut cpu = new_cpu();
        cpu.program_counter = 0x3000;
        let cycles = cpu.handle_bpl(Some(0x20), None);
        assert_eq!(cpu.program_counter, 0x3020);
        assert_eq!(cycles, 1);
    }

    #[test]
    fn test_bpl_not_taken_when_negative_set() {
        let mut cpu = new_cpu();
        cpu.program_counter = 0x3000;
        cpu.set_status_flag(StatusFlag::Negative, true);
        let cycles = cpu.handle_bpl(Some(0x20), None);
        assert_eq!(cpu.program_counter, 0x3000);
        assert_eq!(cycles, 0);
    }
}
