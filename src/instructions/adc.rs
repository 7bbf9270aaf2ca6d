use crate::cpu6502::{CPU, StatusFlag};

impl CPU {
    pub(crate) fn handle_adc(&mut self, opt_value: Option<u8>, _opt_address: Option<u16>) -> u8 {
        let value = opt_value.expect("BUG: memory value of ADC should be present");

        if self.get_status_flag(StatusFlag::DecimalMode) {
            self.add_decimal(value);
        } else {
            self.add_binary(value);
        }
        0
    }

    fn add_binary(&mut self, value: u8) {
        let carry_in: u16 = if self.get_status_flag(StatusFlag::Carry) { 1 } else { 0 };
        let sum = self.accumulator as u16 + value as u16 + carry_in;
        let result = sum as u8;

        // Carry holds the ninth bit of the sum.
        self.set_status_flag(StatusFlag::Carry, sum > 0xFF);

        // Overflow: both operands share a sign that the result does not.
        let overflow = (self.accumulator ^ result) & (value ^ result) & 0x80 != 0;
        self.set_status_flag(StatusFlag::Overflow, overflow);

        self.accumulator = result;
        self.set_zero_and_negative(result);
    }

    // Packed BCD addition, nibble by nibble, with each nibble corrected by
    // +6 when it leaves the 0-9 range.
    fn add_decimal(&mut self, value: u8) {
        let carry_in: u16 = if self.get_status_flag(StatusFlag::Carry) { 1 } else { 0 };
        let binary_sum = self.accumulator as u16 + value as u16 + carry_in;

        let mut low = (self.accumulator & 0x0F) as u16 + (value & 0x0F) as u16 + carry_in;
        if low > 9 {
            low += 6;
        }
        let mut high =
            (self.accumulator >> 4) as u16 + (value >> 4) as u16 + if low > 0x0F { 1 } else { 0 };

        // NMOS quirk: Z reflects the plain binary sum, while N and V are
        // taken from the high nibble before its decimal correction.
        self.set_status_flag(StatusFlag::Zero, binary_sum as u8 == 0);
        self.set_status_flag(StatusFlag::Negative, high & 0x08 != 0);
        let overflow = (self.accumulator ^ value) & 0x80 == 0
            && (self.accumulator ^ ((high as u8) << 4)) & 0x80 != 0;
        self.set_status_flag(StatusFlag::Overflow, overflow);

        if high > 9 {
            high += 6;
        }
        self.set_status_flag(StatusFlag::Carry, high > 0x0F);
        self.accumulator = ((high as u8) << 4) | (low as u8 & 0x0F);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu6502::new_cpu;

    #[test]
    fn test_adc_simple_addition() {
        let mut cpu = new_cpu();
        cpu.accumulator = 0x14;
        cpu.handle_adc(Some(0x27), None);
        assert_eq!(cpu.accumulator, 0x3B);
        assert!(!cpu.get_status_flag(StatusFlag::Carry));
        assert!(!cpu.get_status_flag(StatusFlag::Zero));
        assert!(!cpu.get_status_flag(StatusFlag::Negative));
        assert!(!cpu.get_status_flag(StatusFlag::Overflow));
    }

    #[test]
    fn test_adc_includes_carry_in() {
        let mut cpu = new_cpu();
        cpu.accumulator = 0x50;
        cpu.set_status_flag(StatusFlag::Carry, true);
        cpu.handle_adc(Some(0x10), None);
        assert_eq!(cpu.accumulator, 0x61);
        assert!(!cpu.get_status_flag(StatusFlag::Carry), "carry is consumed");
    }

    #[test]
    fn test_adc_wraps_and_sets_carry() {
        let mut cpu = new_cpu();
        cpu.accumulator = 0xFF;
        cpu.handle_adc(Some(0x02), None);
        assert_eq!(cpu.accumulator, 0x01, "sum wraps modulo 256");
        assert!(cpu.get_status_flag(StatusFlag::Carry));
        assert!(!cpu.get_status_flag(StatusFlag::Overflow));
    }

    #[test]
    fn test_adc_signed_overflow() {
        // 0x7F + 0x01: two positives produce a negative result.
        let mut cpu = new_cpu();
        cpu.accumulator = 0x7F;
        cpu.handle_adc(Some(0x01), None);
        assert_eq!(cpu.accumulator, 0x80);
        assert!(cpu.get_status_flag(StatusFlag::Overflow));
        assert!(cpu.get_status_flag(StatusFlag::Negative));
        assert!(!cpu.get_status_flag(StatusFlag::Carry));
    }

    #[test]
    fn test_adc_no_overflow_on_mixed_signs() {
        let mut cpu = new_cpu();
        cpu.accumulator = 0x7F;
        cpu.handle_adc(Some(0x80), None);
        assert_eq!(cpu.accumulator, 0xFF);
        assert!(!cpu.get_status_flag(StatusFlag::Overflow));
        assert!(cpu.get_status_flag(StatusFlag::Negative));
    }

    #[test]
    fn test_adc_zero_result_with_carry_out() {
        let mut cpu = new_cpu();
        cpu.accumulator = 0xFF;
        cpu.set_status_flag(StatusFlag::Carry, true);
        cpu.handle_adc(Some(0x00), None);
        assert_eq!(cpu.accumulator, 0x00);
        assert!(cpu.get_status_flag(StatusFlag::Carry));
        assert!(cpu.get_status_flag(StatusFlag::Zero));
    }

    #[test]
    fn test_adc_decimal_carry_and_overflow() {
        // 79 + 28 in BCD is 107: accumulator keeps 07 and the carry
        // represents the hundreds digit.
        let mut cpu = new_cpu();
        cpu.accumulator = 0x79;
        cpu.set_status_flag(StatusFlag::DecimalMode, true);
        cpu.handle_adc(Some(0x28), None);

        assert_eq!(cpu.accumulator, 0x07);
        assert!(cpu.get_status_flag(StatusFlag::Carry));
        assert!(!cpu.get_status_flag(StatusFlag::Zero));
        assert!(cpu.get_status_flag(StatusFlag::Overflow));
        assert!(cpu.get_status_flag(StatusFlag::Negative));
    }

    #[test]
    fn test_adc_decimal_zero() {
        let mut cpu = new_cpu();
        cpu.set_status_flag(StatusFlag::DecimalMode, true);
        cpu.handle_adc(Some(0x00), None);

        assert_eq!(cpu.accumulator, 0x00);
        assert!(cpu.get_status_flag(StatusFlag::Zero));
        assert!(!cpu.get_status_flag(StatusFlag::Carry));
        assert!(!cpu.get_status_flag(StatusFlag::Overflow));
        assert!(!cpu.get_status_flag(StatusFlag::Negative));
    }

    #[test]
    fn test_adc_decimal_low_nibble_carry() {
        // 18 + 04 = 22: the low nibble overflows decimally and carries
        // into the tens digit.
        let mut cpu = new_cpu();
        cpu.accumulator = 0x18;
        cpu.set_status_flag(StatusFlag::DecimalMode, true);
        cpu.handle_adc(Some(0x04), None);
        assert_eq!(cpu.accumulator, 0x22);
        assert!(!cpu.get_status_flag(StatusFlag::Carry));
    }
}
