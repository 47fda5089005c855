//! Example that runs on Linux using a serial-USB-adapter connected to the WiFi:bit.
use std::io::{Read, Write as _};
use std::{env, io, thread, time::Duration};

use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use wifibit_at::{
    ingress::{LineIngress, ResponseChannel},
    transport::{LinkConfig, SerialLink},
    wifi::Adapter,
};

// Max. length of a received line in bytes
const LINE_LEN: usize = 256;
// Number of received lines buffered until read
const CAPACITY: usize = 16;

// Timer frequency in Hz
const TIMER_HZ: u32 = 1000;

static RESPONSES: ResponseChannel<LINE_LEN, CAPACITY> = ResponseChannel::new();

fn main() {
    env_logger::init();

    // Parse args
    let args: Vec<String> = env::args().collect();
    if args.len() != 6 {
        println!("Usage: {} <path-to-serial> <ssid> <psk> <blynk-token> <pin>", args[0]);
        println!("Example: {} /dev/ttyUSB0 mywifi hellopasswd123 14dabda3551b4dd5ab46464af582f7d2 V1", args[0]);
        println!("\nNote: To run the example with debug logging, run it like this:");
        println!("\n  RUST_LOG=debug cargo run --example linux -- /dev/ttyUSB0 mywifi hellopasswd123 <token> V1");
        std::process::exit(1);
    }
    let dev = &args[1];
    let ssid = &args[2];
    let psk = &args[3];
    let token = &args[4];
    let pin = &args[5];

    println!("Starting (dev={})...", dev);

    // Open serial port, baud rate gets applied by connect()
    let serial_tx = serialport::new(dev, LinkConfig::default().baud_rate)
        .data_bits(DataBits::Eight)
        .flow_control(FlowControl::None)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .timeout(Duration::from_millis(500))
        .open()
        .expect("Could not open serial port");
    let mut serial_rx = serial_tx.try_clone().expect("Could not clone serial port");

    // Launch reading thread, to pass incoming data from serial to the line ingress
    let mut ingress = LineIngress::new(RESPONSES.sender());
    thread::Builder::new()
        .name("serial_read".to_string())
        .spawn(move || loop {
            let mut buffer = [0; 32];
            match serial_rx.read(&mut buffer[..]) {
                Ok(0) => {}
                Ok(bytes_read) => ingress.write(&buffer[..bytes_read]),
                Err(e) => match e.kind() {
                    io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut | io::ErrorKind::Interrupted => {
                        // Ignore
                    }
                    _ => {
                        log::error!("Serial reading thread error while reading: {}", e);
                    }
                },
            }
        })
        .unwrap();

    let mut adapter: Adapter<_, _, TIMER_HZ> = Adapter::new(SerialPortLink(serial_tx), timer::SysTimer::new());

    println!("Resetting module...");
    adapter.connect().unwrap();

    println!("Join WiFi \"{}\"...", ssid);
    adapter.join(ssid, psk).unwrap();

    // Shorter pauses are sufficient for most networks
    adapter.set_pause_base(500);

    println!("Writing pin {}...", pin);
    adapter.write_pin_value("42", pin, token).unwrap();

    println!("Reading pin {}...", pin);
    match adapter.read_pin_value(&RESPONSES.receiver(), pin, token, 5_000).unwrap() {
        Some(value) => println!("Pin {} = {}", pin, value),
        None => println!("No value received for pin {}", pin),
    }

    adapter.leave().unwrap();
}

/// Serial port used as link to the module
struct SerialPortLink(Box<dyn SerialPort>);

#[derive(Debug)]
struct LinkError(io::ErrorKind);

impl embedded_io::Error for LinkError {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self.0 {
            io::ErrorKind::TimedOut => embedded_io::ErrorKind::TimedOut,
            io::ErrorKind::Interrupted => embedded_io::ErrorKind::Interrupted,
            _ => embedded_io::ErrorKind::Other,
        }
    }
}

impl embedded_io::ErrorType for SerialPortLink {
    type Error = LinkError;
}

impl embedded_io::Write for SerialPortLink {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.0.write(buf).map_err(|e| LinkError(e.kind()))
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.0.flush().map_err(|e| LinkError(e.kind()))
    }
}

impl SerialLink for SerialPortLink {
    /// Pins are fixed by the adapter wiring, so only the baud rate is applied
    fn redirect(&mut self, config: &LinkConfig) -> Result<(), Self::Error> {
        self.0
            .set_baud_rate(config.baud_rate)
            .map_err(|e| LinkError(io::Error::from(e).kind()))
    }
}

mod timer {
    use std::{convert::TryInto, time::Instant as StdInstant};

    use fugit::Instant;
    use fugit_timer::Timer;

    /// A timer with millisecond precision.
    pub struct SysTimer {
        start: StdInstant,
        duration_ms: u32,
        started: bool,
    }

    impl SysTimer {
        pub fn new() -> SysTimer {
            SysTimer {
                start: StdInstant::now(),
                duration_ms: 0,
                started: false,
            }
        }
    }

    impl Timer<1000> for SysTimer {
        type Error = &'static str;

        /// Return current time `Instant`
        fn now(&mut self) -> fugit::TimerInstantU32<1000> {
            let milliseconds = (StdInstant::now() - self.start).as_millis();
            let ticks: u32 = milliseconds.try_into().unwrap_or(u32::MAX);
            Instant::<u32, 1, 1000>::from_ticks(ticks)
        }

        /// Start timer with a `duration`
        fn start(&mut self, duration: fugit::TimerDurationU32<1000>) -> Result<(), Self::Error> {
            self.start = StdInstant::now();
            self.duration_ms = duration.ticks();
            self.started = true;

            Ok(())
        }

        fn cancel(&mut self) -> Result<(), Self::Error> {
            if !self.started {
                Err("cannot cancel stopped timer")
            } else {
                self.started = false;
                Ok(())
            }
        }

        /// Must return `nb::Error::WouldBlock` if timer `duration` is not yet over.
        fn wait(&mut self) -> nb::Result<(), Self::Error> {
            let now = StdInstant::now();
            if (now - self.start).as_millis() >= self.duration_ms.into() {
                Ok(())
            } else {
                Err(nb::Error::WouldBlock)
            }
        }
    }
}
