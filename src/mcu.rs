//! Register-file abstraction over the handful of control registers this
//! driver touches, plus the CPU-level operations (interrupt masking, the
//! sleep instruction, watchdog reset) that the sleep-entry sequence needs.
//!
//! The controller is generic over [`Mcu`] so its register arithmetic can be
//! exercised against a simulated register file on the host; [`AvrMcu`] is
//! the thin adapter binding it to the real memory-mapped registers.

/// Control registers used by the power driver.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Reg {
    /// Clock prescale register.
    Clkpr,
    /// Sleep mode control register.
    Smcr,
    /// Watchdog timer control register.
    Wdtcsr,
    /// Power reduction register 0.
    Prr0,
    /// Power reduction register 1.
    Prr1,
    /// Analog comparator control and status register.
    Acsr,
    /// ADC control and status register A.
    Adcsra,
}

/// Access to the device's power-management registers and the CPU
/// operations the sleep sequence relies on.
pub trait Mcu {
    fn read(&mut self, reg: Reg) -> u8;
    fn write(&mut self, reg: Reg, value: u8);

    fn modify<F>(&mut self, reg: Reg, f: F)
    where
        F: FnOnce(u8) -> u8,
    {
        let value = self.read(reg);
        self.write(reg, f(value));
    }

    /// Mask all interrupts (`cli`).
    fn irq_disable(&mut self);

    /// Unmask interrupts (`sei`).
    fn irq_enable(&mut self);

    /// Execute the sleep instruction. Control returns once an enabled
    /// interrupt source fires.
    fn sleep(&mut self);

    /// Execute the watchdog reset instruction (`wdr`).
    fn watchdog_reset(&mut self);
}

/// Scoped critical section: interrupts are masked for the lifetime of the
/// guard and unmasked again on every exit path.
pub struct Critical<'a, M: Mcu> {
    mcu: &'a mut M,
}

impl<'a, M: Mcu> Critical<'a, M> {
    pub fn enter(mcu: &'a mut M) -> Self {
        mcu.irq_disable();
        Self { mcu }
    }

    pub fn mcu(&mut self) -> &mut M {
        &mut *self.mcu
    }
}

impl<M: Mcu> Drop for Critical<'_, M> {
    fn drop(&mut self) {
        self.mcu.irq_enable();
    }
}

/// The real ATmega32U4/16U4 register file.
#[cfg(target_arch = "avr")]
pub struct AvrMcu {
    _private: (),
}

#[cfg(target_arch = "avr")]
impl AvrMcu {
    pub fn new() -> Self {
        Self { _private: () }
    }
}

#[cfg(target_arch = "avr")]
impl Default for AvrMcu {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "avr")]
impl Mcu for AvrMcu {
    fn read(&mut self, reg: Reg) -> u8 {
        use avr_device::atmega32u4::{AC, ADC, CPU, WDT};
        unsafe {
            match reg {
                Reg::Clkpr => (*CPU::ptr()).clkpr.read().bits(),
                Reg::Smcr => (*CPU::ptr()).smcr.read().bits(),
                Reg::Wdtcsr => (*WDT::ptr()).wdtcsr.read().bits(),
                Reg::Prr0 => (*CPU::ptr()).prr0.read().bits(),
                Reg::Prr1 => (*CPU::ptr()).prr1.read().bits(),
                Reg::Acsr => (*AC::ptr()).acsr.read().bits(),
                Reg::Adcsra => (*ADC::ptr()).adcsra.read().bits(),
            }
        }
    }

    fn write(&mut self, reg: Reg, value: u8) {
        use avr_device::atmega32u4::{AC, ADC, CPU, WDT};
        unsafe {
            match reg {
                Reg::Clkpr => (*CPU::ptr()).clkpr.write(|w| w.bits(value)),
                Reg::Smcr => (*CPU::ptr()).smcr.write(|w| w.bits(value)),
                Reg::Wdtcsr => (*WDT::ptr()).wdtcsr.write(|w| w.bits(value)),
                Reg::Prr0 => (*CPU::ptr()).prr0.write(|w| w.bits(value)),
                Reg::Prr1 => (*CPU::ptr()).prr1.write(|w| w.bits(value)),
                Reg::Acsr => (*AC::ptr()).acsr.write(|w| w.bits(value)),
                Reg::Adcsra => (*ADC::ptr()).adcsra.write(|w| w.bits(value)),
            }
        }
    }

    fn irq_disable(&mut self) {
        avr_device::interrupt::disable();
    }

    fn irq_enable(&mut self) {
        // SAFETY: never called from within `avr_device::interrupt::free`.
        unsafe { avr_device::interrupt::enable() };
    }

    fn sleep(&mut self) {
        avr_device::asm::sleep();
    }

    fn watchdog_reset(&mut self) {
        avr_device::asm::wdr();
    }
}
