use crate::cpu6502::{CPU, StatusFlag};

impl CPU {
    pub(crate) fn handle_bvs(&mut self, opt_value: Option<u8>, _opt_address: Option<u16>) -> u8 {
        let offset = opt_value.expect("BUG: branch displacement of BVS should be present");
        self.branch(self.get_status_flag(StatusFlag::Overflow), offset as i8)
    }
}

#[cfg(test)]
mod tests {
    use crate::cpu6502::{StatusFlag, new_cpu};

    #[test]
    fn test_bvs_taken_when_overflow_set() {
        let mut cpu = new_cpu();
        cpu.program_counter = 0x4000;
        cpu.set_status_flag(StatusFlag::Overflow, true);
        let cycles = cpu.handle_bvs(Some(0x04), None);
        assert_eq!(cpu.program_counter, 0x4004);
        assert_eq!(cycles, 1);
    }

    #[test]
    fn test_bvs_not_taken_when_overflow_clear() {
        let mut cpu = new_cpu();
        cpu.program_counter = 0x4000;
        let cycles = cpu.handle_bvs(Some(0x04), None);
        assert_eq!(cpu.program_counter, 0x4000);
        assert_eq!(cycles, 0);
    }
}
