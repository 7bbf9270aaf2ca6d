use crate::cpu6502::{CPU, StatusFlag};

impl CPU {
    pub(crate) fn handle_sed(&mut self, _opt_value: Option<u8>, _opt_address: Option<u16>) -> u8 {
        self.set_status_flag(StatusFlag::DecimalMode, true);
        0
    }
}
