//! Power management for the ATmega32U4 and ATmega16U4.
//!
//! These parts offer three independent levers for cutting power draw, all
//! driven through a handful of control registers:
//!
//! * **Sleep modes** (SMCR): six CPU states from Idle, which only stops the
//!   CPU and flash clocks, down to PowerDown, which stops the external
//!   oscillator and leaves just external interrupts, the TWI address match
//!   and the watchdog alive. PowerSave and ExtendedStandby exist for
//!   AT90USB compatibility and behave like PowerDown and Standby here.
//! * **Peripheral clock gating** (PRR0/PRR1, plus ACSR for the analog
//!   comparator and ADCSRA for the ADC's own enable bit): stops the clock
//!   to individual peripherals while the CPU keeps running.
//! * **Clock prescaling** (CLKPR): divides the system clock by up to 256,
//!   slowing the CPU and every synchronous peripheral.
//!
//! Waking from sleep needs an interrupt. The watchdog timer, running from
//! its own 128 kHz oscillator, can be armed in interrupt mode with a
//! timeout between 16 ms and 8 s to provide one; otherwise the CPU sleeps
//! until some other enabled source fires. Build with the `rt` feature on
//! an AVR target to have the required (empty) `WDT` vector installed.
//!
//! The controller is generic over the [`mcu::Mcu`] register-file
//! abstraction: firmware hands it [`mcu::AvrMcu`], tests a simulated
//! register file.
//!
//! ```no_run
//! # #[cfg(target_arch = "avr")] fn demo() {
//! use savepower::{AvrMcu, Peripheral, Power, WakeTimeout};
//!
//! let mut power = Power::new(AvrMcu::new());
//! power.disable_peripheral(Peripheral::Usb);
//! power.enter_power_down(WakeTimeout::Ms8000);
//! # }
//! ```
//!
//! Hardware notes that bite in practice: gating the ADC terminates any
//! conversion in progress; SPI, USART1, TWI and the USB interface need
//! reinitialization after their clock is restored; the brown-out detector
//! on this family cannot be disabled from software.

#![cfg_attr(not(test), no_std)]
#![cfg_attr(all(target_arch = "avr", feature = "rt"), feature(abi_avr_interrupt))]

pub mod clock;
pub mod mcu;
pub mod power;
pub mod watchdog;

#[cfg(test)]
mod testing;

pub use clock::ClockDivider;
#[cfg(target_arch = "avr")]
pub use mcu::AvrMcu;
pub use mcu::{Critical, Mcu, Reg};
pub use power::{Peripheral, Power, SleepMode};
pub use watchdog::WakeTimeout;
