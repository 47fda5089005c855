use crate::commands::{
    AccessPointConnectCommand, AccessPointDisconnectCommand, CloseSocketCommand, ConnectCommand, EchoCommand,
    FixedPause, RestartCommand, TransmissionPrepareCommand, WifiModeCommand,
};
use alloc::vec;
use atat::AtatCmd;

/// Encodes the command like the adapter does
fn encode<Cmd: AtatCmd>(command: &Cmd) -> String {
    let mut buffer = vec![0x0; Cmd::MAX_LEN];
    let length = command.write(&mut buffer);
    String::from_utf8(buffer[..length].to_vec()).unwrap()
}

#[test]
fn test_restart() {
    assert_eq!("AT+RST\r\n", encode(&RestartCommand));
    assert_eq!(2_000, RestartCommand::PAUSE_MS);
}

#[test]
fn test_station_mode() {
    assert_eq!("AT+CWMODE=1\r\n", encode(&WifiModeCommand::station_mode()));
    assert_eq!(5_000, WifiModeCommand::PAUSE_MS);
}

#[test]
fn test_access_point_connect() {
    let command = AccessPointConnectCommand::new("test_wifi", "secret");
    assert_eq!("AT+CWJAP=\"test_wifi\",\"secret\"\r\n", encode(&command));
    assert_eq!(6_000, AccessPointConnectCommand::PAUSE_MS);
}

#[test]
fn test_access_point_connect_max_length_not_truncated() {
    let ssid = "s".repeat(32);
    let key = "k".repeat(64);

    let encoded = encode(&AccessPointConnectCommand::new(&ssid, &key));
    assert_eq!(format!("AT+CWJAP=\"{}\",\"{}\"\r\n", ssid, key), encoded);
}

#[test]
fn test_access_point_connect_quotes_not_escaped() {
    let command = AccessPointConnectCommand::new("my\"wifi", "se,cret");
    assert_eq!("AT+CWJAP=\"my\"wifi\",\"se,cret\"\r\n", encode(&command));
}

#[test]
fn test_access_point_disconnect() {
    assert_eq!("AT+CWQAP\r\n", encode(&AccessPointDisconnectCommand));
    assert_eq!(6_000, AccessPointDisconnectCommand::PAUSE_MS);
}

#[test]
fn test_echo() {
    assert_eq!("ATE0\r\n", encode(&EchoCommand::new(false)));
    assert_eq!("ATE1\r\n", encode(&EchoCommand::new(true)));
    assert_eq!(1_000, EchoCommand::PAUSE_MS);
}

#[test]
fn test_connect_tcp() {
    assert_eq!(
        "AT+CIPSTART=\"TCP\",\"google.com\",80\r\n",
        encode(&ConnectCommand::tcp("google.com", 80))
    );
    assert_eq!(
        "AT+CIPSTART=\"TCP\",\"10.0.0.1\",65535\r\n",
        encode(&ConnectCommand::tcp("10.0.0.1", 65535))
    );
    assert_eq!(
        "AT+CIPSTART=\"TCP\",\"localhost\",8\r\n",
        encode(&ConnectCommand::tcp("localhost", 8))
    );
}

#[test]
fn test_connect_max_host_length_not_truncated() {
    let host = "h".repeat(64);
    let encoded = encode(&ConnectCommand::tcp(&host, 65535));
    assert_eq!(format!("AT+CIPSTART=\"TCP\",\"{}\",65535\r\n", host), encoded);
}

#[test]
fn test_transmission_prepare() {
    assert_eq!("AT+CIPSEND=42\r\n", encode(&TransmissionPrepareCommand::new(42)));
    assert_eq!(
        format!("AT+CIPSEND={}\r\n", usize::MAX),
        encode(&TransmissionPrepareCommand::new(usize::MAX))
    );
}

#[test]
fn test_close_socket() {
    assert_eq!("AT+CIPCLOSE\r\n", encode(&CloseSocketCommand));
}
