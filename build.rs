use std::env;

fn main() {
    // Pass the MCU to the linker for AVR builds; host builds (tests) are
    // left untouched.
    let target = env::var("TARGET").unwrap_or_default();
    if target.contains("avr") {
        println!("cargo:rustc-link-arg=-mmcu=atmega32u4");
    }
}
