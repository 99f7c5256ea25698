//! The power controller: sleep-mode entry, peripheral clock gating and
//! clock prescaling for ATmega32U4/16U4.

use crate::clock::{self, ClockDivider};
use crate::mcu::{Critical, Mcu, Reg};
use crate::watchdog::{self, WakeTimeout};

const SMCR_SE: u8 = 1 << 0;
const SMCR_SM_MASK: u8 = 0x0E;

const ACSR_ACD: u8 = 1 << 7;
const ADCSRA_ADEN: u8 = 1 << 7;

const PRR0_PRADC: u8 = 1 << 0;
const PRR0_PRSPI: u8 = 1 << 2;
const PRR0_PRTIM1: u8 = 1 << 3;
const PRR0_PRTIM0: u8 = 1 << 5;
const PRR0_PRTWI: u8 = 1 << 7;

const PRR1_PRUSART1: u8 = 1 << 0;
const PRR1_PRTIM3: u8 = 1 << 3;
const PRR1_PRTIM4: u8 = 1 << 4;
const PRR1_PRUSB: u8 = 1 << 7;

/// All gated peripherals in PRR0.
const PRR0_ALL: u8 = PRR0_PRTWI | PRR0_PRTIM0 | PRR0_PRTIM1 | PRR0_PRSPI | PRR0_PRADC;
/// All gated peripherals in PRR1.
const PRR1_ALL: u8 = PRR1_PRUSB | PRR1_PRTIM4 | PRR1_PRTIM3 | PRR1_PRUSART1;

/// The six sleep modes of the ATmega32U4/16U4.
///
/// Discriminants are the SM2:SM1:SM0 codes written to SMCR. PowerSave and
/// ExtendedStandby exist for AT90USB compatibility; on this family they
/// behave like PowerDown and Standby respectively.
#[derive(Clone, Copy, PartialEq, Eq, Debug, ufmt::derive::uDebug)]
#[repr(u8)]
pub enum SleepMode {
    /// Halts the CPU and flash clocks only.
    Idle = 0,
    /// Additionally halts the I/O clock to cut noise during a conversion.
    AdcNoiseReduction = 1,
    /// Stops the external oscillator; only external interrupts, the TWI
    /// address match and the watchdog keep running.
    PowerDown = 2,
    /// Identical to PowerDown on this family.
    PowerSave = 3,
    /// PowerDown with the oscillator kept running. Only recommended with
    /// external crystals or resonators.
    Standby = 6,
    /// Identical to Standby on this family.
    ExtendedStandby = 7,
}

impl SleepMode {
    fn smcr_bits(self) -> u8 {
        (self as u8) << 1
    }
}

/// Peripherals whose clock can be gated to save power.
///
/// Timer2 and USART0 do not exist on this family. The analog comparator
/// is controlled through ACSR rather than a power-reduction bit.
#[derive(Clone, Copy, PartialEq, Eq, Debug, ufmt::derive::uDebug)]
pub enum Peripheral {
    Spi,
    Usb,
    Adc,
    AnalogComparator,
    Usart1,
    Twi,
    Timer0,
    Timer1,
    Timer3,
    Timer4,
}

impl Peripheral {
    /// Power-reduction register and bit, for peripherals gated that way.
    fn prr_bit(self) -> Option<(Reg, u8)> {
        match self {
            Self::Spi => Some((Reg::Prr0, PRR0_PRSPI)),
            Self::Usb => Some((Reg::Prr1, PRR1_PRUSB)),
            Self::Adc => Some((Reg::Prr0, PRR0_PRADC)),
            Self::AnalogComparator => None,
            Self::Usart1 => Some((Reg::Prr1, PRR1_PRUSART1)),
            Self::Twi => Some((Reg::Prr0, PRR0_PRTWI)),
            Self::Timer0 => Some((Reg::Prr0, PRR0_PRTIM0)),
            Self::Timer1 => Some((Reg::Prr0, PRR0_PRTIM1)),
            Self::Timer3 => Some((Reg::Prr1, PRR1_PRTIM3)),
            Self::Timer4 => Some((Reg::Prr1, PRR1_PRTIM4)),
        }
    }
}

/// Power-management controller.
///
/// Owns the register-file adapter and exposes stateless operations over
/// it; the only state anywhere is the hardware registers themselves.
pub struct Power<M: Mcu> {
    mcu: M,
}

impl<M: Mcu> Power<M> {
    pub fn new(mcu: M) -> Self {
        Self { mcu }
    }

    /// Releases the register-file adapter.
    pub fn free(self) -> M {
        self.mcu
    }

    pub(crate) fn mcu_mut(&mut self) -> &mut M {
        &mut self.mcu
    }

    /// Divides the system clock by the given factor.
    pub fn set_clock_divider(&mut self, divider: ClockDivider) {
        clock::set_divider(&mut self.mcu, divider);
    }

    /// Divides the system clock by a numeric factor.
    ///
    /// Factors outside {1, 2, 4, ..., 256} leave the prescaler untouched.
    pub fn set_clock_division(&mut self, divisor: u16) {
        if let Some(divider) = ClockDivider::from_divisor(divisor) {
            self.set_clock_divider(divider);
        }
    }

    /// Puts the CPU to sleep in the given mode.
    ///
    /// Unless `timeout` is [`WakeTimeout::Forever`], the watchdog is armed
    /// first so its interrupt ends the sleep; any other enabled interrupt
    /// source wakes the CPU as well. Returns with sleep-enable cleared and
    /// interrupts unmasked.
    pub fn enter(&mut self, mode: SleepMode, timeout: WakeTimeout) {
        if let Some(code) = timeout.period_code() {
            watchdog::arm(&mut self.mcu, code);
        }
        self.mcu
            .modify(Reg::Smcr, |v| (v & !SMCR_SM_MASK) | mode.smcr_bits() | SMCR_SE);
        {
            // Sleep-enable must be asserted with interrupts masked, or an
            // interrupt landing here could strand the sleep instruction.
            let mut section = Critical::enter(&mut self.mcu);
            section.mcu().modify(Reg::Smcr, |v| v | SMCR_SE);
        }
        self.mcu.sleep();
        self.mcu.modify(Reg::Smcr, |v| v & !SMCR_SE);
        self.mcu.irq_enable();
    }

    pub fn enter_idle(&mut self, timeout: WakeTimeout) {
        self.enter(SleepMode::Idle, timeout);
    }

    pub fn enter_adc_noise_reduction(&mut self, timeout: WakeTimeout) {
        self.enter(SleepMode::AdcNoiseReduction, timeout);
    }

    pub fn enter_power_down(&mut self, timeout: WakeTimeout) {
        self.enter(SleepMode::PowerDown, timeout);
    }

    pub fn enter_power_save(&mut self, timeout: WakeTimeout) {
        self.enter(SleepMode::PowerSave, timeout);
    }

    pub fn enter_standby(&mut self, timeout: WakeTimeout) {
        self.enter(SleepMode::Standby, timeout);
    }

    pub fn enter_extended_standby(&mut self, timeout: WakeTimeout) {
        self.enter(SleepMode::ExtendedStandby, timeout);
    }

    /// Gates the clock of one peripheral.
    ///
    /// SPI, USART1, TWI and USB need reinitialization after re-enabling;
    /// timers resume where they stopped. Gating the ADC terminates any
    /// conversion in progress, so its module-enable bit is cleared first.
    pub fn disable_peripheral(&mut self, peripheral: Peripheral) {
        match peripheral {
            Peripheral::Adc => {
                self.mcu.modify(Reg::Adcsra, |v| v & !ADCSRA_ADEN);
                self.mcu.modify(Reg::Prr0, |v| v | PRR0_PRADC);
            }
            Peripheral::AnalogComparator => {
                self.mcu.modify(Reg::Acsr, |v| v | ACSR_ACD);
            }
            _ => {
                if let Some((reg, bit)) = peripheral.prr_bit() {
                    self.mcu.modify(reg, |v| v | bit);
                }
            }
        }
    }

    /// Ungates the clock of one peripheral.
    ///
    /// For the ADC the clock is ungated before the module-enable bit is
    /// set again, reversing the shutdown order.
    pub fn enable_peripheral(&mut self, peripheral: Peripheral) {
        match peripheral {
            Peripheral::Adc => {
                self.mcu.modify(Reg::Prr0, |v| v & !PRR0_PRADC);
                self.mcu.modify(Reg::Adcsra, |v| v | ADCSRA_ADEN);
            }
            Peripheral::AnalogComparator => {
                self.mcu.modify(Reg::Acsr, |v| v & !ACSR_ACD);
            }
            _ => {
                if let Some((reg, bit)) = peripheral.prr_bit() {
                    self.mcu.modify(reg, |v| v & !bit);
                }
            }
        }
    }

    /// Gates the clocks of every peripheral in both power-reduction
    /// registers with one write each.
    pub fn disable_all_modules(&mut self) {
        self.mcu.write(Reg::Prr0, PRR0_ALL);
        self.mcu.write(Reg::Prr1, PRR1_ALL);
    }

    /// Ungates every peripheral clock.
    pub fn enable_all_modules(&mut self) {
        self.mcu.write(Reg::Prr0, 0x00);
        self.mcu.write(Reg::Prr1, 0x00);
    }

    /// Drops into PowerDown with the two analog blocks shut off, then
    /// restores them in reverse order after wake-up.
    pub fn lowest_consumption(&mut self, timeout: WakeTimeout) {
        self.disable_peripheral(Peripheral::AnalogComparator);
        self.disable_peripheral(Peripheral::Adc);
        self.enter(SleepMode::PowerDown, timeout);
        self.enable_peripheral(Peripheral::Adc);
        self.enable_peripheral(Peripheral::AnalogComparator);
    }
}
