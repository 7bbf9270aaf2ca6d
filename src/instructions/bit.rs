use crate::cpu6502::{CPU, StatusFlag};

impl CPU {
    pub(crate) fn handle_bit(&mut self, opt_value: Option<u8>, _opt_address: Option<u16>) -> u8 {
        let value = opt_value.expect("BUG: memory value of BIT should be present");

        // N and V mirror the top two bits of the operand; Z reports whether
        // the accumulator selects any of its bits. A itself is untouched.
        self.set_status_flag(StatusFlag::Negative, value & 0x80 != 0);
        self.set_status_flag(StatusFlag::Overflow, value & 0x40 != 0);
        self.set_status_flag(StatusFlag::Zero, value & self.accumulator == 0);
        0
    }
}
