use crate::cpu6502::{CPU, StatusFlag};

impl CPU {
    pub(crate) fn handle_bne(&mut self, opt_value: Option<u8>, _opt_address: Option<u16>) -> u8 {
        let offset = opt_value.expect("BUG: branch displacement of BNE should be present");
        self.branch(!self.get_status_flag(StatusFlag::Zero), offset as i8)
    }
}

#[cfg(test)]
mod tests {
    use crate::cpu6502::{StatusFlag, new_cpu};

    #[test]
    fn test_bne_taken_when_zero_clear() {
        let mut cpu = new_cpu();
        cpu.program_counter = 0x2000;
        let cycles = cpu.handle_bne(Some(0xFC), None); // -4
        assert_eq!(cpu.program_counter, 0x1FFC);
        assert_eq!(cycles, 2, "landing on the previous page costs the crossing cycle");
    }

    #[test]
    fn test_bne_not_taken_when_zero_set() {
        let mut cpu = new_cpu();
        cpu.program_counter = 0x2000;
        cpu.set_status_flag(StatusFlag::Zero, true);
        let cycles = cpu.handle_bne(Some(0xFC), None);
        assert_eq!(cpu.program_counter, 0x2000);
        assert_eq!(cycles, 0);
    }
}
