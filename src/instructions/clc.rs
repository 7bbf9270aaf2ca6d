use crate::cpu6502::{CPU, StatusFlag};

impl CPU {
    pub(crate) fn handle_clc(&mut self, _opt_value: Option<u8>, _opt_address: Option<u16>) -> u8 {
        self.set_status_flag(StatusFlag::Carry, false);
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu6502::new_cpu;

    #[test]
    fn test_clc_clears_carry() {
        let mut cpu = new_cpu();
        cpu.set_status_flag(StatusFlag::Carry, true);
        cpu.handle_clc(None, None);
        assert!(!cpu.get_status_flag(StatusFlag::Carry));
    }

    #[test]
    fn test_clc_leaves_other_flags_alone() {
        let mut cpu = new_cpu();
        cpu.set_status_flag(StatusFlag::Zero, true);
        cpu.set_status_flag(StatusFlag::Negative, true);
        cpu.handle_clc(None, None);
        assert!(cpu.get_status_flag(StatusFlag::Zero));
        assert!(cpu.get_status_flag(StatusFlag::Negative));
    }
}
