//! # Blynk cloud pins
//!
//! Virtual and physical pins of a Blynk project are written and read by the HTTP API of
//! `blynk-cloud.com`. The auth token is part of the URL path, token and pin are not escaped.
//!
//! Writing is fire-and-forget. Reading evaluates the lines received within a given timeout, so a
//! [LineIngress](crate::ingress::LineIngress) needs to be fed with the received serial data.
//!
//! ## Example
//!
//! ````
//! # use wifibit_at::example::{ExampleSerial, ExampleTimer};
//! # use wifibit_at::ingress::ResponseChannel;
//! # use wifibit_at::wifi::Adapter;
//! #
//! let channel: ResponseChannel<128, 8> = ResponseChannel::new();
//! let serial = ExampleSerial::with_blynk_reply(channel.sender());
//! let mut adapter: Adapter<_, _, 1_000> = Adapter::new(serial, ExampleTimer::default());
//!
//! let token = "14dabda3551b4dd5ab46464af582f7d2";
//! adapter.write_pin_value("510", "V1", token).unwrap();
//!
//! let value = adapter.read_pin_value(&channel.receiver(), "V1", token, 2_000).unwrap();
//! assert_eq!(Some("510"), value.as_deref());
//! ````
use crate::http::{Method, Request};
use crate::ingress::ResponseReceiver;
use crate::transport::SerialLink;
use crate::wifi::{Adapter, Error};
use alloc::format;
use alloc::string::String;
use fugit_timer::Timer;

/// Host of the Blynk HTTP API
pub const BLYNK_HOST: &str = "blynk-cloud.com";

/// Port of the Blynk HTTP API
pub const BLYNK_PORT: u16 = 80;

impl<S: SerialLink, T: Timer<TIMER_HZ>, const TIMER_HZ: u32> Adapter<S, T, TIMER_HZ> {
    /// Writes the value of the given pin
    pub fn write_pin_value(&mut self, value: &str, pin: &str, token: &str) -> Result<(), Error> {
        let path = format!("/{}/update/{}?value={}", token, pin, value);
        self.get(BLYNK_HOST, BLYNK_PORT, &path)
    }

    /// Reads the value of the given pin
    ///
    /// Disables the command echo, discards all lines received so far and sends the request. The
    /// lines received while the request is sent are collected, afterwards collecting continues
    /// until a value was found or `timeout_ms` elapsed. Returns `None` if no value was received in
    /// time.
    ///
    /// Lines arriving after the timeout remain in the channel and are discarded by the next call.
    pub fn read_pin_value<const LINE_LEN: usize, const CAPACITY: usize>(
        &mut self,
        receiver: &ResponseReceiver<'_, LINE_LEN, CAPACITY>,
        pin: &str,
        token: &str,
        timeout_ms: u32,
    ) -> Result<Option<String>, Error> {
        self.set_echo(false)?;

        while receiver.try_receive().is_ok() {}

        let mut response = String::new();
        let mut collect = || {
            while let Ok(line) = receiver.try_receive() {
                response.push_str(line.as_str());
            }
            extract_pin_value(&response).is_some()
        };

        let path = format!("/{}/get/{}", token, pin);
        let request = Request::new(Method::Get, BLYNK_HOST, BLYNK_PORT, &path);
        self.request_polling(&request, || {
            collect();
        })?;

        if !collect() {
            self.pause_polling(timeout_ms, &mut collect)?;
        }

        let value = extract_pin_value(&response).map(String::from);
        if value.is_none() {
            log::warn!("No value received for pin {} within {} ms", pin, timeout_ms);
        }

        Ok(value)
    }
}

/// Extracts the pin value from the received response text
///
/// The value is enclosed by the first `[` and the next `]`. A leading numeric status code followed
/// by a comma is skipped and enclosing double quotes are removed, e.g. `["77"]` and
/// `[200,"77"]` both result in `77`.
pub fn extract_pin_value(response: &str) -> Option<&str> {
    let start = response.find('[')? + 1;
    let end = start + response[start..].find(']')?;
    let mut value = &response[start..end];

    if let Some((status, rest)) = value.split_once(',') {
        if !status.is_empty() && status.bytes().all(|byte| byte.is_ascii_digit()) {
            value = rest;
        }
    }

    let value = value.strip_prefix('"').unwrap_or(value);
    Some(value.strip_suffix('"').unwrap_or(value))
}
