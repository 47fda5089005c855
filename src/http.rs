//! # HTTP requests
//!
//! Requests are tunneled through a single TCP connection of the module:
//!
//! 1. `AT+CIPSTART="TCP","<host>",<port>`, pause 6x base
//! 2. `AT+CIPSEND=<length>`, pause 3x base
//! 3. HTTP/1.1 request text, pause 6x base
//! 4. `AT+CIPCLOSE`, pause 3x base
//!
//! The base pause is set by [Adapter::set_pause_base] and defaults to 1000 ms. The server response
//! is not evaluated.
//!
//! ## Example
//!
//! ````
//! # use wifibit_at::example::{ExampleSerial, ExampleTimer};
//! # use wifibit_at::http::{Method, Request};
//! # use wifibit_at::wifi::Adapter;
//! #
//! let mut adapter: Adapter<_, _, 1_000> = Adapter::new(ExampleSerial::default(), ExampleTimer::default());
//! adapter.set_pause_base(500);
//!
//! adapter.get("example.org", 80, "/search?q=rust").unwrap();
//!
//! let request = Request::new(Method::Put, "example.org", 8080, "/items/1")
//!     .headers(&["Content-Type: text/plain"])
//!     .body("new value");
//! adapter.request(&request).unwrap();
//! ````
use crate::commands::{CloseSocketCommand, ConnectCommand, TransmissionPrepareCommand, MAX_HOST_LEN};
use crate::transport::SerialLink;
use crate::wifi::{Adapter, Error};
use alloc::string::String;
use core::fmt::{Display, Formatter};
use core::str::FromStr;
use fugit_timer::Timer;

/// Pause factor for opening the connection
const OPEN_PAUSE_FACTOR: u32 = 6;

/// Pause factor for announcing the payload length
const ANNOUNCE_PAUSE_FACTOR: u32 = 3;

/// Pause factor for transmitting the payload
const PAYLOAD_PAUSE_FACTOR: u32 = 6;

/// Pause factor for closing the connection
const CLOSE_PAUSE_FACTOR: u32 = 3;

/// HTTP request method
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Head,
    Delete,
    Patch,
    Options,
    Connect,
    Trace,
}

impl Method {
    /// All supported methods
    pub const ALL: [Method; 9] = [
        Method::Get,
        Method::Post,
        Method::Put,
        Method::Head,
        Method::Delete,
        Method::Patch,
        Method::Options,
        Method::Connect,
        Method::Trace,
    ];

    /// Returns the token used in the request line
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Head => "HEAD",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
            Method::Options => "OPTIONS",
            Method::Connect => "CONNECT",
            Method::Trace => "TRACE",
        }
    }
}

impl FromStr for Method {
    type Err = Error;

    /// Parses the uppercase method token. Any other token results in [Error::InvalidMethod].
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|method| method.as_str() == token)
            .ok_or(Error::InvalidMethod)
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single HTTP/1.1 request
#[derive(Clone, Debug)]
pub struct Request<'a> {
    method: Method,
    host: &'a str,
    port: u16,
    path: &'a str,

    /// Header lines without CRLF, e.g. `Content-Type: text/plain`
    headers: &'a [&'a str],

    body: Option<&'a str>,
}

impl<'a> Request<'a> {
    pub fn new(method: Method, host: &'a str, port: u16, path: &'a str) -> Self {
        Self {
            method,
            host,
            port,
            path,
            headers: &[],
            body: None,
        }
    }

    /// Sets additional header lines. The `Host` header is always added.
    pub fn headers(mut self, headers: &'a [&'a str]) -> Self {
        self.headers = headers;
        self
    }

    /// Sets the request body
    pub fn body(mut self, body: &'a str) -> Self {
        self.body = Some(body);
        self
    }

    /// Encodes the request text as transmitted after `AT+CIPSEND`
    ///
    /// Request line, `Host` header, additional headers and the empty line are terminated by CRLF.
    /// A given body is followed by two CRLF.
    pub fn encode(&self) -> String {
        let mut text = String::new();

        text.push_str(self.method.as_str());
        text.push(' ');
        text.push_str(self.path);
        text.push_str(" HTTP/1.1\r\n");

        text.push_str("Host: ");
        text.push_str(self.host);
        text.push_str("\r\n");

        for header in self.headers {
            text.push_str(header);
            text.push_str("\r\n");
        }
        text.push_str("\r\n");

        if let Some(body) = self.body {
            text.push_str(body);
            text.push_str("\r\n\r\n");
        }

        text
    }
}

impl<S: SerialLink, T: Timer<TIMER_HZ>, const TIMER_HZ: u32> Adapter<S, T, TIMER_HZ> {
    /// Sends the given request and closes the connection afterwards
    pub fn request(&mut self, request: &Request<'_>) -> Result<(), Error> {
        self.request_polling(request, || {})
    }

    /// Same as [Adapter::request] but calls `poll` repeatedly while pausing between the steps
    pub(crate) fn request_polling(&mut self, request: &Request<'_>, mut poll: impl FnMut()) -> Result<(), Error> {
        if request.host.len() > MAX_HOST_LEN {
            return Err(Error::InvalidHostLength);
        }

        let payload = request.encode();
        log::debug!("HTTP {} {}:{}{}", request.method, request.host, request.port, request.path);

        self.write_command(&ConnectCommand::tcp(request.host, request.port))?;
        self.pause_step(OPEN_PAUSE_FACTOR, &mut poll)?;

        // Payload line is terminated by an additional CRLF
        self.write_command(&TransmissionPrepareCommand::new(payload.len() + 2))?;
        self.pause_step(ANNOUNCE_PAUSE_FACTOR, &mut poll)?;

        self.write_line(payload.as_bytes())?;
        self.pause_step(PAYLOAD_PAUSE_FACTOR, &mut poll)?;

        self.write_command(&CloseSocketCommand)?;
        self.pause_step(CLOSE_PAUSE_FACTOR, &mut poll)
    }

    /// Sends a GET request without additional headers
    pub fn get(&mut self, host: &str, port: u16, path: &str) -> Result<(), Error> {
        self.request(&Request::new(Method::Get, host, port, path))
    }

    /// Sends a POST request with the given headers and body
    pub fn post(&mut self, host: &str, port: u16, path: &str, headers: &[&str], body: &str) -> Result<(), Error> {
        self.request(&Request::new(Method::Post, host, port, path).headers(headers).body(body))
    }

    /// Pauses for the scaled pause base, each step waits the full time
    fn pause_step(&mut self, factor: u32, poll: &mut impl FnMut()) -> Result<(), Error> {
        let duration_ms = self.session.scaled_pause(factor);
        self.pause_polling(duration_ms, || {
            poll();
            false
        })
        .map(|_| ())
    }
}
