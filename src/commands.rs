//! AT commands understood by the WiFi:bit firmware
//!
//! Bring-up and network commands implement [FixedPause], the module gets a fixed processing time
//! after they were written. HTTP related commands are paused by a multiple of the configured pause
//! base instead.
use crate::responses::NoResponse;
use atat::{AtatCmd, Error as AtError, InternalError};
use embedded_io::Write;

/// Max. SSID length accepted by ESP-AT
pub(crate) const MAX_SSID_LEN: usize = 32;

/// Max. password length accepted by ESP-AT
pub(crate) const MAX_PASSWORD_LEN: usize = 64;

/// Max. remote host length accepted by ESP-AT
pub(crate) const MAX_HOST_LEN: usize = 64;

/// Command followed by a fixed processing time of the module
pub(crate) trait FixedPause: AtatCmd {
    /// Pause in ms after the command was written
    const PAUSE_MS: u32;
}

/// Writes the formatted command to the given buffer and returns the written length
macro_rules! write_command {
    ($buf:ident, $($arg:tt)*) => {{
        let buf_len = $buf.len();
        write!($buf, $($arg)*).ok();
        buf_len - $buf.len()
    }};
}

/// Restarts the module
#[derive(Clone, Debug)]
pub struct RestartCommand;

impl AtatCmd for RestartCommand {
    type Response = NoResponse;

    const MAX_LEN: usize = 8;

    fn write(&self, mut buf: &mut [u8]) -> usize {
        write_command!(buf, "AT+RST\r\n")
    }

    fn parse(&self, _resp: Result<&[u8], InternalError>) -> Result<Self::Response, AtError> {
        Ok(NoResponse)
    }
}

impl FixedPause for RestartCommand {
    const PAUSE_MS: u32 = 2_000;
}

/// Sets the WIFI mode
#[derive(Clone, Debug)]
pub struct WifiModeCommand {
    /// WIFI mode:
    ///     0: Null mode. Wi-Fi RF will be disabled.
    ///     1: Station mode.
    ///     2: SoftAP mode.
    ///     3: SoftAP+Station mode.
    mode: usize,
}

impl WifiModeCommand {
    pub fn station_mode() -> Self {
        Self { mode: 1 }
    }
}

impl AtatCmd for WifiModeCommand {
    type Response = NoResponse;

    const MAX_LEN: usize = 16;

    fn write(&self, mut buf: &mut [u8]) -> usize {
        write_command!(buf, "AT+CWMODE={}\r\n", self.mode)
    }

    fn parse(&self, _resp: Result<&[u8], InternalError>) -> Result<Self::Response, AtError> {
        Ok(NoResponse)
    }
}

impl FixedPause for WifiModeCommand {
    const PAUSE_MS: u32 = 5_000;
}

/// Command for joining a WIFI access point
///
/// SSID and password are written verbatim, quotes are not escaped.
#[derive(Clone, Debug)]
pub struct AccessPointConnectCommand<'a> {
    /// The SSID of the target access point
    ssid: &'a str,

    /// The password/key of the target access point
    password: &'a str,
}

impl<'a> AccessPointConnectCommand<'a> {
    pub fn new(ssid: &'a str, password: &'a str) -> Self {
        Self { ssid, password }
    }
}

impl AtatCmd for AccessPointConnectCommand<'_> {
    type Response = NoResponse;

    const MAX_LEN: usize = 128;

    fn write(&self, mut buf: &mut [u8]) -> usize {
        write_command!(buf, "AT+CWJAP=\"{}\",\"{}\"\r\n", self.ssid, self.password)
    }

    fn parse(&self, _resp: Result<&[u8], InternalError>) -> Result<Self::Response, AtError> {
        Ok(NoResponse)
    }
}

impl FixedPause for AccessPointConnectCommand<'_> {
    const PAUSE_MS: u32 = 6_000;
}

/// Disconnects from the current access point
#[derive(Clone, Debug)]
pub struct AccessPointDisconnectCommand;

impl AtatCmd for AccessPointDisconnectCommand {
    type Response = NoResponse;

    const MAX_LEN: usize = 10;

    fn write(&self, mut buf: &mut [u8]) -> usize {
        write_command!(buf, "AT+CWQAP\r\n")
    }

    fn parse(&self, _resp: Result<&[u8], InternalError>) -> Result<Self::Response, AtError> {
        Ok(NoResponse)
    }
}

impl FixedPause for AccessPointDisconnectCommand {
    const PAUSE_MS: u32 = 6_000;
}

/// Enables/Disables the command echo of the module
#[derive(Clone, Debug)]
pub struct EchoCommand {
    enabled: bool,
}

impl EchoCommand {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl AtatCmd for EchoCommand {
    type Response = NoResponse;

    const MAX_LEN: usize = 6;

    fn write(&self, mut buf: &mut [u8]) -> usize {
        write_command!(buf, "ATE{}\r\n", self.enabled as u8)
    }

    fn parse(&self, _resp: Result<&[u8], InternalError>) -> Result<Self::Response, AtError> {
        Ok(NoResponse)
    }
}

impl FixedPause for EchoCommand {
    const PAUSE_MS: u32 = 1_000;
}

/// Establishes a TCP connection (single connection mode)
#[derive(Clone, Debug)]
pub struct ConnectCommand<'a> {
    /// Connection type, e.g. TCP, UDP, SSL
    connection_type: &'static str,

    /// Remote domain name or IP address
    remote_host: &'a str,

    /// Remote port
    port: u16,
}

impl<'a> ConnectCommand<'a> {
    pub fn tcp(remote_host: &'a str, port: u16) -> Self {
        Self {
            connection_type: "TCP",
            remote_host,
            port,
        }
    }
}

impl AtatCmd for ConnectCommand<'_> {
    type Response = NoResponse;

    const MAX_LEN: usize = 128;

    fn write(&self, mut buf: &mut [u8]) -> usize {
        write_command!(
            buf,
            "AT+CIPSTART=\"{}\",\"{}\",{}\r\n",
            self.connection_type,
            self.remote_host,
            self.port
        )
    }

    fn parse(&self, _resp: Result<&[u8], InternalError>) -> Result<Self::Response, AtError> {
        Ok(NoResponse)
    }
}

/// Announces the length of the following payload
#[derive(Clone, Debug)]
pub struct TransmissionPrepareCommand {
    /// Payload length in bytes
    length: usize,
}

impl TransmissionPrepareCommand {
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl AtatCmd for TransmissionPrepareCommand {
    type Response = NoResponse;

    const MAX_LEN: usize = 40;

    fn write(&self, mut buf: &mut [u8]) -> usize {
        write_command!(buf, "AT+CIPSEND={}\r\n", self.length)
    }

    fn parse(&self, _resp: Result<&[u8], InternalError>) -> Result<Self::Response, AtError> {
        Ok(NoResponse)
    }
}

/// Closes the TCP connection (single connection mode)
#[derive(Clone, Debug)]
pub struct CloseSocketCommand;

impl AtatCmd for CloseSocketCommand {
    type Response = NoResponse;

    const MAX_LEN: usize = 13;

    fn write(&self, mut buf: &mut [u8]) -> usize {
        write_command!(buf, "AT+CIPCLOSE\r\n")
    }

    fn parse(&self, _resp: Result<&[u8], InternalError>) -> Result<Self::Response, AtError> {
        Ok(NoResponse)
    }
}
