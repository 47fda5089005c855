use crate::tests::mock::{Event, EventLog, MockSerial, MockTimer, RecordingTimer};
use crate::transport::LinkConfig;
use crate::wifi::{Adapter, Error, DEFAULT_PAUSE_BASE};
use mockall::predicate::eq;

type AdapterType<'a> = Adapter<MockSerial<'a>, RecordingTimer, 1_000_000>;

fn adapter(log: &EventLog) -> AdapterType<'static> {
    Adapter::new(MockSerial::new(log), RecordingTimer::new(log))
}

#[test]
fn test_connect_sequence() {
    let log = EventLog::default();
    let mut adapter = adapter(&log);

    adapter.connect().unwrap();

    assert_eq!(
        vec![
            Event::Redirect(LinkConfig {
                tx_pin: 16,
                rx_pin: 8,
                baud_rate: 115_200
            }),
            Event::Timer(10),
            Event::Write("AT+RST\r\n".into()),
            Event::Timer(2_000),
            Event::Write("AT+CWMODE=1\r\n".into()),
            Event::Timer(5_000),
        ],
        log.events()
    );
}

#[test]
fn test_connect_not_affected_by_pause_base() {
    let log = EventLog::default();
    let mut adapter = adapter(&log);
    adapter.set_pause_base(0);

    adapter.connect().unwrap();
    assert_eq!(vec![10, 2_000, 5_000], log.pauses());
}

#[test]
fn test_connect_custom_link_config() {
    let log = EventLog::default();
    let mut adapter = adapter(&log);
    let config = LinkConfig {
        tx_pin: 1,
        rx_pin: 2,
        baud_rate: 9_600,
    };

    adapter.connect_with(&config).unwrap();
    assert_eq!(Event::Redirect(config), log.events()[0]);
}

#[test]
fn test_connect_redirect_error() {
    let log = EventLog::default();
    let mut serial = MockSerial::new(&log);
    serial.fail_redirect();

    let mut adapter: AdapterType = Adapter::new(serial, RecordingTimer::new(&log));
    assert_eq!(Error::TransportUnavailable, adapter.connect().unwrap_err());
    assert!(log.events().is_empty());
}

#[test]
fn test_connect_write_error() {
    let log = EventLog::default();
    let mut serial = MockSerial::new(&log);
    serial.fail_write(0);

    let mut adapter: AdapterType = Adapter::new(serial, RecordingTimer::new(&log));
    assert_eq!(Error::TransportUnavailable, adapter.connect().unwrap_err());

    // Nothing written, no pause after restart
    assert!(log.writes().is_empty());
    assert_eq!(vec![10], log.pauses());
}

#[test]
fn test_connect_timer_start_error() {
    let log = EventLog::default();
    let mut timer = MockTimer::new();
    timer
        .expect_start()
        .with(eq(MockTimer::duration_ms(10)))
        .times(1)
        .returning(|_| Err(1));

    let mut adapter: Adapter<_, _, 1_000_000> = Adapter::new(MockSerial::new(&log), timer);
    assert_eq!(Error::TimerError, adapter.connect().unwrap_err());
}

#[test]
fn test_connect_timer_wait_error() {
    let log = EventLog::default();
    let mut timer = MockTimer::new();
    timer.expect_start().times(1).returning(|_| Ok(()));
    timer.expect_wait().times(1).returning(|| Err(nb::Error::Other(1)));

    let mut adapter: Adapter<_, _, 1_000_000> = Adapter::new(MockSerial::new(&log), timer);
    assert_eq!(Error::TimerError, adapter.connect().unwrap_err());
}

#[test]
fn test_pause_waits_until_timer_elapsed() {
    let log = EventLog::default();
    let mut timer = MockTimer::new();
    let mut wait_calls = 0;
    timer
        .expect_start()
        .with(eq(MockTimer::duration_ms(250)))
        .times(1)
        .returning(|_| Ok(()));
    timer.expect_wait().times(3).returning(move || {
        wait_calls += 1;
        if wait_calls < 3 {
            return Err(nb::Error::WouldBlock);
        }
        Ok(())
    });

    let mut adapter: Adapter<_, _, 1_000_000> = Adapter::new(MockSerial::new(&log), timer);
    adapter.execute_at_command("AT+GMR", 250).unwrap();
}

#[test]
fn test_long_pause_split_into_timer_runs() {
    let log = EventLog::default();
    let mut adapter = adapter(&log);

    adapter.execute_at_command("AT", u32::MAX).unwrap();

    let pauses = log.pauses();
    assert_eq!(1_001, pauses.len());
    assert!(pauses[..1_000].iter().all(|pause| *pause == 4_294_967));
    assert_eq!(295, pauses[1_000]);
}

#[test]
fn test_long_pause_timer_ticks() {
    let log = EventLog::default();
    let mut timer = MockTimer::new();
    timer
        .expect_start()
        .with(eq(MockTimer::duration_ms(4_294_967)))
        .times(1)
        .returning(|_| Ok(()));
    timer
        .expect_start()
        .with(eq(MockTimer::duration_ms(33)))
        .times(1)
        .returning(|_| Ok(()));
    timer.expect_wait().times(2).returning(|| Ok(()));

    let mut adapter: Adapter<_, _, 1_000_000> = Adapter::new(MockSerial::new(&log), timer);
    adapter.execute_at_command("AT", 4_295_000).unwrap();
}

#[test]
fn test_join_correct_command() {
    let log = EventLog::default();
    let mut adapter = adapter(&log);

    adapter.join("test_wifi", "secret").unwrap();

    assert_eq!(
        vec![
            Event::Write("AT+CWJAP=\"test_wifi\",\"secret\"\r\n".into()),
            Event::Timer(6_000),
        ],
        log.events()
    );
}

#[test]
fn test_join_ssid_too_long() {
    let log = EventLog::default();
    let mut adapter = adapter(&log);

    let result = adapter.join(&"a".repeat(33), "secret").unwrap_err();
    assert_eq!(Error::InvalidSsidLength, result);
    assert!(log.events().is_empty());
}

#[test]
fn test_join_password_too_long() {
    let log = EventLog::default();
    let mut adapter = adapter(&log);

    let result = adapter.join("test_wifi", &"a".repeat(65)).unwrap_err();
    assert_eq!(Error::InvalidPasswordLength, result);
    assert!(log.events().is_empty());
}

#[test]
fn test_join_max_lengths_accepted() {
    let log = EventLog::default();
    let mut adapter = adapter(&log);

    adapter.join(&"a".repeat(32), &"b".repeat(64)).unwrap();
    assert_eq!(1, log.writes().len());
}

#[test]
fn test_leave() {
    let log = EventLog::default();
    let mut adapter = adapter(&log);

    adapter.leave().unwrap();

    assert_eq!(
        vec![Event::Write("AT+CWQAP\r\n".into()), Event::Timer(6_000)],
        log.events()
    );
}

#[test]
fn test_execute_at_command_verbatim() {
    let log = EventLog::default();
    let mut adapter = adapter(&log);

    adapter.execute_at_command("AT+CIPSTATUS", 1_500).unwrap();

    assert_eq!(
        vec![Event::Write("AT+CIPSTATUS\r\n".into()), Event::Timer(1_500)],
        log.events()
    );
}

#[test]
fn test_execute_at_command_zero_wait_skips_timer() {
    let log = EventLog::default();

    // Any timer call would panic
    let mut adapter: Adapter<_, _, 1_000_000> = Adapter::new(MockSerial::new(&log), MockTimer::new());
    adapter.execute_at_command("AT", 0).unwrap();

    assert_eq!(vec!["AT\r\n".to_string()], log.writes());
}

#[test]
fn test_execute_at_command_write_error() {
    let log = EventLog::default();
    let mut serial = MockSerial::new(&log);
    serial.fail_write(1);

    let mut adapter: AdapterType = Adapter::new(serial, RecordingTimer::new(&log));
    assert_eq!(
        Error::TransportUnavailable,
        adapter.execute_at_command("AT", 100).unwrap_err()
    );
    assert!(log.pauses().is_empty());
}

#[test]
fn test_set_echo() {
    let log = EventLog::default();
    let mut adapter = adapter(&log);

    adapter.set_echo(false).unwrap();
    adapter.set_echo(true).unwrap();

    assert_eq!(
        vec![
            Event::Write("ATE0\r\n".into()),
            Event::Timer(1_000),
            Event::Write("ATE1\r\n".into()),
            Event::Timer(1_000),
        ],
        log.events()
    );
}

#[test]
fn test_pause_base() {
    let log = EventLog::default();
    let mut adapter = adapter(&log);
    assert_eq!(DEFAULT_PAUSE_BASE, adapter.pause_base());

    adapter.set_pause_base(250);
    assert_eq!(250, adapter.pause_base());
}

#[test]
fn test_pause_base_per_adapter() {
    let log = EventLog::default();
    let mut first = adapter(&log);
    let second = adapter(&log);

    first.set_pause_base(0);
    assert_eq!(0, first.pause_base());
    assert_eq!(1_000, second.pause_base());
}
