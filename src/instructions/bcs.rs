use crate::cpu6502::{CPU, StatusFlag};

impl CPU {
    pub(crate) fn handle_bcs(&mut self, opt_value: Option<u8>, _opt_address: Option<u16>) -> u8 {
        let offset = opt_value.expect("BUG: branch displacement of BCS should be present");
        self.branch(self.get_status_flag(StatusFlag::Carry), offset as i8)
    }
}

#[cfg(test)]
mod tests {
    use crate::cpu6502::{StatusFlag, new_cpu};

    #[test]
    fn test_bcs_taken_when_carry_set() {
        let mut cpu = new_cpu();
        cpu.program_counter = 0x1002;
        cpu.set_status_flag(StatusFlag::Carry, true);
        let cycles = cpu.handle_bcs(Some(0x10), None);
        assert_eq!(cpu.program_counter, 0x1012);
        assert_eq!(cycles, 1, "one extra cycle for a taken branch");
    }

    #[test]
    fn test_bcs_not_taken_when_carry_clear() {
        let mut cpu = new_cpu();
        cpu.program_counter = 0x1002;
        let cycles = cpu.handle_bcs(Some(0x10), None);
        assert_eq!(cpu.program_counter, 0x1002, "the dispatcher already advanced past the operand");
        assert_eq!(cycles, 0);
    }

    #[test]
    fn test_bcs_page_crossing_costs_two_extra_cycles() {
        let mut cpu = new_cpu();
        cpu.program_counter = 0x10F2;
        cpu.set_status_flag(StatusFlag::Carry, true);
        let cycles = cpu.handle_bcs(Some(0x20), None);
        assert_eq!(cpu.program_counter, 0x1112);
        assert_eq!(cycles, 2, "taken plus page crossed");
    }

    #[test]
    fn test_bcs_negative_displacement() {
        let mut cpu = new_cpu();
        cpu.program_counter = 0x1010;
        cpu.set_status_flag(StatusFlag::Carry, true);
        let cycles = cpu.handle_bcs(Some(0xF0), None); // -16
        assert_eq!(cpu.program_counter, 0x1000);
        assert_eq!(cycles, 1);
    }
}
