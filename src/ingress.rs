//! # Receiving lines from the module
//!
//! [LineIngress] gets fed with the raw bytes read from the serial link, e.g. from an interrupt
//! handler or a reading thread. Complete lines are published to a [ResponseChannel], which is
//! drained by [Adapter::read_pin_value](crate::wifi::Adapter::read_pin_value).
//!
//! ## Example
//!
//! ````
//! # use wifibit_at::ingress::{LineIngress, ResponseChannel};
//! #
//! let channel: ResponseChannel<64, 4> = ResponseChannel::new();
//! let mut ingress = LineIngress::new(channel.sender());
//!
//! ingress.write(b"WIFI CONNECTED\r\nWIFI GOT");
//! ingress.write(b" IP\r\n");
//!
//! assert_eq!("WIFI CONNECTED", channel.try_receive().unwrap().as_str());
//! assert_eq!("WIFI GOT IP", channel.try_receive().unwrap().as_str());
//! ````
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};
use heapless::{String, Vec};

/// Single received line without line terminator
pub type ResponseLine<const LINE_LEN: usize> = String<LINE_LEN>;

/// Channel transporting received lines from the serial RX context to the adapter
pub type ResponseChannel<const LINE_LEN: usize, const CAPACITY: usize> =
    Channel<CriticalSectionRawMutex, ResponseLine<LINE_LEN>, CAPACITY>;

/// Sending end of a [ResponseChannel]
pub type ResponseSender<'ch, const LINE_LEN: usize, const CAPACITY: usize> =
    Sender<'ch, CriticalSectionRawMutex, ResponseLine<LINE_LEN>, CAPACITY>;

/// Receiving end of a [ResponseChannel]
pub type ResponseReceiver<'ch, const LINE_LEN: usize, const CAPACITY: usize> =
    Receiver<'ch, CriticalSectionRawMutex, ResponseLine<LINE_LEN>, CAPACITY>;

/// Splits received bytes into lines
///
/// LINE_LEN: Max. line length in bytes. Longer lines get truncated.
///
/// CAPACITY: Number of lines the channel is able to buffer. Lines are dropped if the channel is
/// full.
pub struct LineIngress<'ch, const LINE_LEN: usize, const CAPACITY: usize> {
    sender: ResponseSender<'ch, LINE_LEN, CAPACITY>,

    /// Bytes of the current incomplete line
    buffer: Vec<u8, LINE_LEN>,

    /// True if the current line exceeded LINE_LEN
    truncated: bool,
}

impl<'ch, const LINE_LEN: usize, const CAPACITY: usize> LineIngress<'ch, LINE_LEN, CAPACITY> {
    pub fn new(sender: ResponseSender<'ch, LINE_LEN, CAPACITY>) -> Self {
        Self {
            sender,
            buffer: Vec::new(),
            truncated: false,
        }
    }

    /// Processes the given received bytes. Lines are terminated by LF, a preceding CR is removed.
    pub fn write(&mut self, data: &[u8]) {
        for byte in data {
            match byte {
                b'\n' => self.publish_line(),
                byte => {
                    if self.buffer.push(*byte).is_err() {
                        self.truncated = true;
                    }
                }
            }
        }
    }

    /// Drops the current incomplete line
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.truncated = false;
    }

    fn publish_line(&mut self) {
        if self.buffer.last() == Some(&b'\r') {
            self.buffer.pop();
        }

        if self.truncated {
            log::warn!("Received line exceeds {} bytes, truncated", LINE_LEN);
        }

        if !self.buffer.is_empty() {
            match String::from_utf8(self.buffer.clone()) {
                Ok(line) => {
                    if self.sender.try_send(line).is_err() {
                        log::warn!("Response channel full, dropping received line");
                    }
                }
                Err(_) => log::warn!("Dropping non UTF-8 line"),
            }
        }

        self.reset();
    }
}
