//! Gate unused peripherals, slow the clock and spend most of the time in
//! PowerDown, letting the watchdog wake the CPU every 8 s.
//!
//! Build for the target: `cargo build --release --example power_down
//! --features rt --target avr-atmega32u4.json -Z build-std=core`

#![cfg_attr(target_arch = "avr", no_std)]
#![cfg_attr(target_arch = "avr", no_main)]

#[cfg(target_arch = "avr")]
use panic_halt as _;

#[cfg(target_arch = "avr")]
#[avr_device::entry]
fn main() -> ! {
    use savepower::{AvrMcu, ClockDivider, Peripheral, Power, WakeTimeout};

    let mut power = Power::new(AvrMcu::new());

    power.set_clock_divider(ClockDivider::Div8);
    power.disable_peripheral(Peripheral::Spi);
    power.disable_peripheral(Peripheral::Twi);
    power.disable_peripheral(Peripheral::Usart1);
    power.disable_peripheral(Peripheral::Timer3);
    power.disable_peripheral(Peripheral::Timer4);

    loop {
        power.enter_power_down(WakeTimeout::Ms8000);
        // Woken by the watchdog: periodic work goes here.
    }
}

#[cfg(not(target_arch = "avr"))]
fn main() {}
