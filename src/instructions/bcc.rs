use crate::cpu6502::{CPU, StatusFlag};

impl CPU {
    pub(crate) fn handle_bcc(&mut self, opt_value: Option<u8>, _opt_address: Option<u16>) -> u8 {
        let offset = opt_value.expect("BUG: branch displacement of BCC should be present");
        self.branch(!self.get_status_flag(StatusFlag::Carry), offset as i8)
    }
}

#[cfg(test)]
mod tests {
    use crate::cpu6502::{StatusFlag, new_cpu};

    #[test]
    fn test_bcc_taken_when_carry_clear() {
        let mut cpu = new_cpu();
        cpu.program_counter = 0x1002;
        let cycles = cpu.handle_bcc(Some(0x10), None);
        assert_eq!(cpu.program_counter, 0x1012);
        assert_eq!(cycles, 1);
    }

    #[test]
    fn test_bcc_not_taken_when_carry_set() {
        let mut cpu = new_cpu();
        cpu.program_counter = 0x1002;
        cpu.set_status_flag(StatusFlag::Carry, true);
        let cycles = cpu.handle_bcc(Some(0x10), None);
        assert_eq!(cpu.program_counter, 0x1002);
        assert_eq!(cycles, 0);
    }
}
