//! Watchdog-timed wake-up.
//!
//! The watchdog runs from its own 128 kHz oscillator and keeps counting in
//! every sleep mode, which makes it the one purely software-driven way to
//! get back out of sleep. It is armed here in interrupt mode (WDE=0,
//! WDIE=1), so a timeout raises the WDT interrupt instead of resetting the
//! device. The firmware must link a `WDT` interrupt vector for this to
//! work; enabling the `rt` cargo feature installs a no-op handler.

use crate::mcu::{Critical, Mcu, Reg};
use crate::power::Power;

pub(crate) const WDTCSR_WDIE: u8 = 1 << 6;
pub(crate) const WDTCSR_WDCE: u8 = 1 << 4;
pub(crate) const WDTCSR_WDE: u8 = 1 << 3;

/// How long to sleep before the watchdog wakes the CPU.
///
/// `Forever` skips arming the watchdog entirely; the CPU then sleeps until
/// some other enabled interrupt source fires.
#[derive(Clone, Copy, PartialEq, Eq, Debug, ufmt::derive::uDebug)]
pub enum WakeTimeout {
    Ms16,
    Ms32,
    Ms64,
    Ms125,
    Ms250,
    Ms500,
    Ms1000,
    Ms2000,
    Ms4000,
    Ms8000,
    /// Do not arm the watchdog; sleep until another interrupt.
    Forever,
}

impl WakeTimeout {
    /// The 4-bit WDP3..WDP0 period code, or `None` for [`Forever`].
    ///
    /// [`Forever`]: WakeTimeout::Forever
    pub(crate) fn period_code(self) -> Option<u8> {
        match self {
            Self::Ms16 => Some(0),
            Self::Ms32 => Some(1),
            Self::Ms64 => Some(2),
            Self::Ms125 => Some(3),
            Self::Ms250 => Some(4),
            Self::Ms500 => Some(5),
            Self::Ms1000 => Some(6),
            Self::Ms2000 => Some(7),
            Self::Ms4000 => Some(8),
            Self::Ms8000 => Some(9),
            Self::Forever => None,
        }
    }
}

/// Spreads a 4-bit period code over the split WDP field: WDP3 lives at
/// bit 5, WDP2..WDP0 at bits 2..0.
pub(crate) fn period_bits(code: u8) -> u8 {
    ((code & 0x08) << 2) | (code & 0x07)
}

/// Arms the watchdog in interrupt mode for the given period code.
///
/// The change-enable sequence is timed by hardware (four cycles), so both
/// writes happen back to back with interrupts masked.
pub(crate) fn arm<M: Mcu>(mcu: &mut M, code: u8) {
    let mut section = Critical::enter(mcu);
    let mcu = section.mcu();
    mcu.watchdog_reset();
    mcu.write(Reg::Wdtcsr, WDTCSR_WDCE | WDTCSR_WDE);
    mcu.write(Reg::Wdtcsr, WDTCSR_WDIE | period_bits(code));
}

/// Stops the watchdog via the same timed sequence.
pub(crate) fn disarm<M: Mcu>(mcu: &mut M) {
    let mut section = Critical::enter(mcu);
    let mcu = section.mcu();
    mcu.watchdog_reset();
    mcu.write(Reg::Wdtcsr, WDTCSR_WDCE | WDTCSR_WDE);
    mcu.write(Reg::Wdtcsr, 0x00);
}

impl<M: Mcu> embedded_hal::watchdog::WatchdogEnable for Power<M> {
    type Time = WakeTimeout;

    fn start<T>(&mut self, period: T)
    where
        T: Into<WakeTimeout>,
    {
        match period.into().period_code() {
            Some(code) => arm(self.mcu_mut(), code),
            None => disarm(self.mcu_mut()),
        }
    }
}

impl<M: Mcu> embedded_hal::watchdog::WatchdogDisable for Power<M> {
    fn disable(&mut self) {
        disarm(self.mcu_mut());
    }
}

impl<M: Mcu> embedded_hal::watchdog::Watchdog for Power<M> {
    fn feed(&mut self) {
        self.mcu_mut().watchdog_reset();
    }
}

// Wake-up only needs the vector to exist.
#[cfg(all(target_arch = "avr", feature = "rt"))]
#[avr_device::interrupt(atmega32u4)]
fn WDT() {}
