//! System clock prescaling via CLKPR.
//!
//! Dividing the system clock lowers the frequency of the CPU and all
//! synchronous peripherals, so it is only appropriate while the demand for
//! processing power is low.

use crate::mcu::{Mcu, Reg};

/// System clock division factor.
///
/// The hardware requires a change-enable bit to accompany a prescaler
/// update; each variant therefore carries the complete CLKPR write pattern.
#[derive(Clone, Copy, PartialEq, Eq, Debug, ufmt::derive::uDebug)]
pub enum ClockDivider {
    Div1,
    Div2,
    Div4,
    Div8,
    Div16,
    Div32,
    Div64,
    Div128,
    Div256,
}

impl ClockDivider {
    /// Maps a numeric division factor to its divider, if it is one of the
    /// nine the hardware supports.
    pub fn from_divisor(divisor: u16) -> Option<Self> {
        match divisor {
            1 => Some(Self::Div1),
            2 => Some(Self::Div2),
            4 => Some(Self::Div4),
            8 => Some(Self::Div8),
            16 => Some(Self::Div16),
            32 => Some(Self::Div32),
            64 => Some(Self::Div64),
            128 => Some(Self::Div128),
            256 => Some(Self::Div256),
            _ => None,
        }
    }

    /// The value written to CLKPR.
    ///
    /// ÷1 restores the reset default; the other factors combine the
    /// change-enable bit with the divisor code in a single write, which is
    /// valid on this part.
    pub(crate) fn clkpr_value(self) -> u8 {
        match self {
            Self::Div1 => 0x00,
            Self::Div2 => 0x81,
            Self::Div4 => 0x82,
            Self::Div8 => 0x83,
            Self::Div16 => 0x84,
            Self::Div32 => 0x85,
            Self::Div64 => 0x86,
            Self::Div128 => 0x87,
            Self::Div256 => 0x88,
        }
    }
}

pub(crate) fn set_divider<M: Mcu>(mcu: &mut M, divider: ClockDivider) {
    mcu.write(Reg::Clkpr, divider.clkpr_value());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn divisor_lookup_covers_the_nine_factors() {
        for (divisor, divider) in [
            (1, ClockDivider::Div1),
            (2, ClockDivider::Div2),
            (4, ClockDivider::Div4),
            (8, ClockDivider::Div8),
            (16, ClockDivider::Div16),
            (32, ClockDivider::Div32),
            (64, ClockDivider::Div64),
            (128, ClockDivider::Div128),
            (256, ClockDivider::Div256),
        ] {
            assert_eq!(ClockDivider::from_divisor(divisor), Some(divider));
        }
    }

    #[test]
    fn unsupported_divisors_are_rejected() {
        for divisor in [0, 3, 5, 7, 12, 127, 129, 255, 257, 512, u16::MAX] {
            assert_eq!(ClockDivider::from_divisor(divisor), None);
        }
    }

    #[test]
    fn write_patterns_match_the_datasheet() {
        let expected = [
            (ClockDivider::Div1, 0x00),
            (ClockDivider::Div2, 0x81),
            (ClockDivider::Div4, 0x82),
            (ClockDivider::Div8, 0x83),
            (ClockDivider::Div16, 0x84),
            (ClockDivider::Div32, 0x85),
            (ClockDivider::Div64, 0x86),
            (ClockDivider::Div128, 0x87),
            (ClockDivider::Div256, 0x88),
        ];
        for (divider, value) in expected {
            assert_eq!(divider.clkpr_value(), value);
        }
    }
}
