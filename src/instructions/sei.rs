use crate::cpu6502::{CPU, StatusFlag};

impl CPU {
    pub(crate) fn handle_sei(&mut self, _opt_value: Option<u8>, _opt_address: Option<u16>) -> u8 {
        self.set_status_flag(StatusFlag::InterruptDisable, true);
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu6502::new_cpu;

    #[test]
    fn test_sei_sets_interrupt_disable() {
        let mut cpu = new_cpu();
        cpu.handle_sei(None, None);
        assert!(cpu.get_status_flag(StatusFlag::InterruptDisable));
    }
}
