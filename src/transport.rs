//! # Serial link to the WiFi:bit
//!
//! The adapter writes to any [embedded_io::Write] implementation which is additionally able to
//! (re)configure its pins and baud rate, s. [SerialLink].
use embedded_io::Write;

/// Serial transport connected to the module
pub trait SerialLink: Write {
    /// Routes the serial peripheral to the given pins and applies the baud rate
    fn redirect(&mut self, config: &LinkConfig) -> Result<(), Self::Error>;
}

/// Pins and baud rate of the serial link
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LinkConfig {
    /// Pin used for transmitting data to the module
    pub tx_pin: u8,

    /// Pin used for receiving data from the module
    pub rx_pin: u8,

    /// Baud rate in bits per second
    pub baud_rate: u32,
}

impl Default for LinkConfig {
    /// WiFi:bit wiring: TX on P16, RX on P8, 115200 baud
    fn default() -> Self {
        Self {
            tx_pin: 16,
            rx_pin: 8,
            baud_rate: 115_200,
        }
    }
}
