//! # WiFi:bit adapter
//!
//! Bring-up of the serial link and joining/leaving a WIFI network. Every command is followed by a
//! fixed pause, responses of the module are not evaluated. If a command fails on the module side,
//! this is not noticed.
//!
//! ## Example
//!
//! ````
//! # use wifibit_at::example::{ExampleSerial, ExampleTimer};
//! # use wifibit_at::wifi::Adapter;
//! #
//! let mut adapter: Adapter<_, _, 1_000> = Adapter::new(ExampleSerial::default(), ExampleTimer::default());
//!
//! // Resetting the module and switching to station mode
//! adapter.connect().unwrap();
//!
//! // Joining the access point
//! adapter.join("test_wifi", "secret").unwrap();
//!
//! // Any other command
//! adapter.execute_at_command("AT+CIPSTATUS", 500).unwrap();
//!
//! adapter.leave().unwrap();
//! ````
use crate::commands::{
    AccessPointConnectCommand, AccessPointDisconnectCommand, EchoCommand, FixedPause, RestartCommand,
    WifiModeCommand, MAX_PASSWORD_LEN, MAX_SSID_LEN,
};
use crate::transport::{LinkConfig, SerialLink};
use alloc::vec;
use atat::AtatCmd;
use fugit::{TimerDurationU32, TimerDurationU64};
use fugit_timer::Timer;

/// Default pause base in ms
pub const DEFAULT_PAUSE_BASE: u32 = 1_000;

/// Pause in ms after redirecting the serial link
const REDIRECT_SETTLE_MS: u32 = 10;

/// Central client for communicating with the WiFi:bit
pub struct Adapter<S: SerialLink, T: Timer<TIMER_HZ>, const TIMER_HZ: u32> {
    /// Serial link to the module
    pub(crate) serial: S,

    /// Timer used for pausing after commands
    pub(crate) timer: T,

    /// Runtime configuration
    pub(crate) session: Session,
}

/// Runtime configuration of an adapter
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Session {
    /// Base value in ms, HTTP pauses are derived from
    pub(crate) pause_base: u32,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            pause_base: DEFAULT_PAUSE_BASE,
        }
    }
}

impl Session {
    /// Returns the pause base scaled by the given factor
    pub(crate) fn scaled_pause(&self, factor: u32) -> u32 {
        self.pause_base.saturating_mul(factor)
    }
}

/// Errors of the adapter
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// The given HTTP method token is unknown
    InvalidMethod,

    /// Serial link could not be configured or written
    TransportUnavailable,

    /// Upstream timer error
    TimerError,

    /// Given SSID is longer then the max. size of 32 bytes
    InvalidSsidLength,

    /// Given password is longer then the max. size of 64 bytes
    InvalidPasswordLength,

    /// Given remote host is longer then the max. size of 64 bytes
    InvalidHostLength,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::InvalidMethod => defmt::write!(f, "Error::InvalidMethod"),
            Error::TransportUnavailable => defmt::write!(f, "Error::TransportUnavailable"),
            Error::TimerError => defmt::write!(f, "Error::TimerError"),
            Error::InvalidSsidLength => defmt::write!(f, "Error::InvalidSsidLength"),
            Error::InvalidPasswordLength => defmt::write!(f, "Error::InvalidPasswordLength"),
            Error::InvalidHostLength => defmt::write!(f, "Error::InvalidHostLength"),
        }
    }
}

impl<S: SerialLink, T: Timer<TIMER_HZ>, const TIMER_HZ: u32> Adapter<S, T, TIMER_HZ> {
    /// Max. duration in ms a single timer run covers without exceeding the 32 bit tick range
    const MAX_TIMER_RUN_MS: u32 = {
        let max = u32::MAX as u64 * 1_000 / TIMER_HZ as u64;
        if max > u32::MAX as u64 {
            u32::MAX
        } else {
            max as u32
        }
    };

    /// Creates a new adapter using the default pause base of 1000 ms
    pub fn new(serial: S, timer: T) -> Self {
        Self {
            serial,
            timer,
            session: Session::default(),
        }
    }

    /// Redirects the serial link to the WiFi:bit pins (TX=P16, RX=P8, 115200 baud), restarts the
    /// module and switches to station mode.
    ///
    /// Needs to be called once before any other command. Blocks for around seven seconds.
    pub fn connect(&mut self) -> Result<(), Error> {
        self.connect_with(&LinkConfig::default())
    }

    /// Same as [Adapter::connect] but with custom pins or baud rate
    pub fn connect_with(&mut self, config: &LinkConfig) -> Result<(), Error> {
        self.serial.redirect(config).map_err(|e| {
            log::error!("Redirecting serial link failed: {:?}", e);
            Error::TransportUnavailable
        })?;
        self.pause(REDIRECT_SETTLE_MS)?;

        self.send_command(&RestartCommand)?;
        self.send_command(&WifiModeCommand::station_mode())
    }

    /// Joins the given WIFI access point. SSID and key must not contain double quotes.
    ///
    /// The join result is not evaluated.
    pub fn join(&mut self, ssid: &str, key: &str) -> Result<(), Error> {
        if ssid.len() > MAX_SSID_LEN {
            return Err(Error::InvalidSsidLength);
        }

        if key.len() > MAX_PASSWORD_LEN {
            return Err(Error::InvalidPasswordLength);
        }

        self.send_command(&AccessPointConnectCommand::new(ssid, key))
    }

    /// Disconnects from the current access point
    pub fn leave(&mut self) -> Result<(), Error> {
        self.send_command(&AccessPointDisconnectCommand)
    }

    /// Sends the given command verbatim and pauses for `wait_ms` afterwards
    pub fn execute_at_command(&mut self, command: &str, wait_ms: u32) -> Result<(), Error> {
        self.send_line(command.as_bytes(), wait_ms)
    }

    /// Enables/Disables the command echo of the module
    pub fn set_echo(&mut self, enabled: bool) -> Result<(), Error> {
        self.send_command(&EchoCommand::new(enabled))
    }

    /// Sets the base value (in ms) of pauses between the HTTP request steps
    ///
    /// Opening the connection and sending the payload take 6x, announcing the payload and closing
    /// the connection 3x the base value. Zero disables the HTTP pauses.
    pub fn set_pause_base(&mut self, pause_base: u32) {
        self.session.pause_base = pause_base;
    }

    /// Returns the current pause base in ms
    pub fn pause_base(&self) -> u32 {
        self.session.pause_base
    }

    /// Writes the given data terminated by CRLF and pauses for `wait_ms` afterwards
    pub fn send_line(&mut self, data: &[u8], wait_ms: u32) -> Result<(), Error> {
        self.write_line(data)?;
        self.pause(wait_ms)
    }

    /// Sends a command followed by its fixed processing time
    pub(crate) fn send_command<Cmd: FixedPause>(&mut self, command: &Cmd) -> Result<(), Error> {
        self.write_command(command)?;
        self.pause(Cmd::PAUSE_MS)
    }

    /// Writes the given data terminated by CRLF
    pub(crate) fn write_line(&mut self, data: &[u8]) -> Result<(), Error> {
        log::debug!("Sending line ({} bytes)", data.len() + 2);

        self.write_all(data)?;
        self.write_all(b"\r\n")?;
        self.flush()
    }

    /// Writes the given command
    pub(crate) fn write_command<Cmd: AtatCmd>(&mut self, command: &Cmd) -> Result<(), Error> {
        let mut buffer = vec![0x0; Cmd::MAX_LEN];
        let length = command.write(&mut buffer);
        log::debug!("Sending command {:?}", core::str::from_utf8(&buffer[..length]));

        self.write_all(&buffer[..length])?;
        self.flush()
    }

    /// Blocks for the given time. Returns immediately on zero.
    pub(crate) fn pause(&mut self, duration_ms: u32) -> Result<(), Error> {
        self.pause_polling(duration_ms, || false).map(|_| ())
    }

    /// Blocks for the given time while calling `poll` repeatedly, a last time once the time elapsed.
    ///
    /// Returns `true` as soon as `poll` returns `true`. Durations exceeding the tick range of the
    /// timer are split into multiple timer runs.
    pub(crate) fn pause_polling(&mut self, duration_ms: u32, mut poll: impl FnMut() -> bool) -> Result<bool, Error> {
        let mut remaining_ms = duration_ms;

        while remaining_ms > 0 {
            let run_ms = remaining_ms.min(Self::MAX_TIMER_RUN_MS);
            remaining_ms -= run_ms;

            let ticks = TimerDurationU64::<TIMER_HZ>::millis(u64::from(run_ms)).ticks();
            let ticks = u32::try_from(ticks).unwrap_or(u32::MAX);
            self.timer
                .start(TimerDurationU32::from_ticks(ticks))
                .map_err(|_| Error::TimerError)?;

            loop {
                if poll() {
                    return Ok(true);
                }

                match self.timer.wait() {
                    Ok(_) => break,
                    Err(nb::Error::WouldBlock) => {}
                    Err(nb::Error::Other(_)) => return Err(Error::TimerError),
                }
            }
        }

        Ok(poll())
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), Error> {
        self.serial.write_all(data).map_err(|e| {
            log::error!("Writing to serial link failed: {:?}", e);
            Error::TransportUnavailable
        })
    }

    fn flush(&mut self) -> Result<(), Error> {
        self.serial.flush().map_err(|e| {
            log::error!("Flushing serial link failed: {:?}", e);
            Error::TransportUnavailable
        })
    }
}
