use crate::cpu6502::{CPU, StatusFlag};

impl CPU {
    pub(crate) fn handle_cld(&mut self, _opt_value: Option<u8>, _opt_address: Option<u16>) -> u8 {
        self.set_status_flag(StatusFlag::DecimalMode, false);
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu6502::new_cpu;

    #[test]
    fn test_cld_clears_decimal_mode() {
        let mut cpu = new_cpu();
        cpu.set_status_flag(StatusFlag::DecimalMode, true);
        cpu.handle_cld(None, None);
        assert!(!cpu.get_status_flag(StatusFlag::DecimalMode));
    }
}
