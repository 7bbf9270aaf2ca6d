use crate::cpu6502::{CPU, StatusFlag};

impl CPU {
    pub(crate) fn handle_bmi(&mut self, opt_value: Option<u8>, _opt_address: Option<u16>) -> u8 {
        let offset = opt_value.expect("BUG: branch displacement of BMI should be present");
        self.branch(self.get_status_flag(StatusFlag::Negative), offset as i8)
    }
}
