//! Mocks for doc examples
use crate::ingress::{LineIngress, ResponseSender};
use crate::transport::{LinkConfig, SerialLink};
use alloc::string::String;
use alloc::vec::Vec;
use core::convert::Infallible;
use embedded_io::{ErrorType, Write};
use fugit::{TimerDurationU32, TimerInstantU32};
use fugit_timer::Timer;

/// Serial link mock
///
/// Optionally simulates the Blynk cloud by replying the last written pin value to read requests.
#[derive(Default)]
pub struct ExampleSerial<'ch> {
    /// Ingress for simulated replies
    ingress: Option<LineIngress<'ch, 128, 8>>,

    /// Currently written line
    line: Vec<u8>,

    /// Last value written by an update request
    pin_value: String,
}

impl<'ch> ExampleSerial<'ch> {
    pub fn with_blynk_reply(sender: ResponseSender<'ch, 128, 8>) -> Self {
        Self {
            ingress: Some(LineIngress::new(sender)),
            line: Vec::new(),
            pin_value: String::new(),
        }
    }

    fn handle_line(&mut self) {
        let line = String::from_utf8_lossy(&self.line).into_owned();
        self.line.clear();

        if let Some((_, rest)) = line.split_once("?value=") {
            self.pin_value = String::from(rest.split(' ').next().unwrap_or_default());
        }

        if line.starts_with("GET /") && line.contains("/get/") {
            if let Some(ingress) = self.ingress.as_mut() {
                ingress.write(b"+IPD,119:HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n\r\n[\"");
                ingress.write(self.pin_value.as_bytes());
                ingress.write(b"\"]\r\nCLOSED\r\n");
            }
        }
    }
}

impl ErrorType for ExampleSerial<'_> {
    type Error = Infallible;
}

impl Write for ExampleSerial<'_> {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        for byte in buf {
            self.line.push(*byte);

            if self.line.ends_with(b"\r\n") {
                self.handle_line();
            }
        }

        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl SerialLink for ExampleSerial<'_> {
    fn redirect(&mut self, _config: &LinkConfig) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Timer mock, every duration elapses immediately
#[derive(Default)]
pub struct ExampleTimer {}

impl<const TIMER_HZ: u32> Timer<TIMER_HZ> for ExampleTimer {
    type Error = u32;

    fn now(&mut self) -> TimerInstantU32<TIMER_HZ> {
        TimerInstantU32::from_ticks(0)
    }

    fn start(&mut self, _duration: TimerDurationU32<TIMER_HZ>) -> Result<(), Self::Error> {
        Ok(())
    }

    fn cancel(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn wait(&mut self) -> nb::Result<(), Self::Error> {
        Ok(())
    }
}
