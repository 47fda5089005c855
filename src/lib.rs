//! # WiFi:bit AT driver
//!
//! Formats AT commands and HTTP requests for an ESP8266 based WiFi:bit module, writes them over a
//! serial link and pauses a fixed amount of time after each command, so the module is able to
//! process it. Module responses are not evaluated, the only exception is reading Blynk pin values.
//!
//! * [wifi]: Link bring-up, joining/leaving networks and raw AT commands
//! * [http]: HTTP/1.1 requests tunneled through `AT+CIPSTART`/`AT+CIPSEND`
//! * [cloud]: Reading and writing Blynk cloud pins
//! * [ingress]: Splitting received serial data into lines
#![cfg_attr(not(test), no_std)]
#![cfg_attr(feature = "strict", deny(warnings))]

extern crate alloc;

pub mod cloud;
pub(crate) mod commands;
pub mod http;
pub mod ingress;
pub(crate) mod responses;
pub mod transport;
pub mod wifi;

#[cfg(feature = "examples")]
pub mod example;

#[cfg(test)]
mod tests;
