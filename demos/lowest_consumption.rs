//! Minimum-draw duty cycle: everything gated, analog blocks off, PowerDown
//! between watchdog wake-ups.

#![cfg_attr(target_arch = "avr", no_std)]
#![cfg_attr(target_arch = "avr", no_main)]

#[cfg(target_arch = "avr")]
use panic_halt as _;

#[cfg(target_arch = "avr")]
#[avr_device::entry]
fn main() -> ! {
    use savepower::{AvrMcu, Power, WakeTimeout};

    let mut power = Power::new(AvrMcu::new());
    power.disable_all_modules();

    loop {
        // Sleeps in PowerDown with the ADC and comparator shut off; both
        // are restored on the way out for the wake-phase work.
        power.lowest_consumption(WakeTimeout::Ms4000);
    }
}

#[cfg(not(target_arch = "avr"))]
fn main() {}
