//! Integration tests for the host runner: link -> command interface ->
//! simulated hardware -> JSON store.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;
use std::sync::atomic::AtomicBool;
use std::thread;
use std::time::{Duration, Instant};

use tubeclock_cli::BacklightPattern;
use tubeclock_runner::{ChannelLink, JsonFileStore, Runner, SerialLink, TcpLink};

/// Poll until `count` commands were handled or a second passes.
fn pump<S: tubeclock_cli::ConfigStore, L: SerialLink>(runner: &mut Runner<S, L>, count: usize) {
    let deadline = Instant::now() + Duration::from_secs(1);
    let mut handled = 0;
    while handled < count && Instant::now() < deadline {
        if runner.poll_once().expect("poll should succeed") {
            handled += 1;
        }
    }
    assert_eq!(handled, count, "runner handled too few commands");
}

fn response_lines(host: &mut ChannelLink) -> Vec<String> {
    String::from_utf8(host.drain())
        .unwrap()
        .split_terminator("\r\n")
        .map(str::to_string)
        .collect()
}

// ============================================================================
// Channel link
// ============================================================================

#[test]
fn test_commands_over_link_update_hardware() {
    let dir = tempfile::tempdir().unwrap();
    let (device, mut host) = ChannelLink::pair();
    let mut runner = Runner::new(JsonFileStore::new(dir.path().join("cfg.json")), device, 6);

    host.send(b"set bl_pattern breath\r\nset clk_selected").unwrap();
    host.send(b"_graphic 3\r\n").unwrap();
    pump(&mut runner, 2);

    assert_eq!(
        response_lines(&mut host),
        vec![
            "OK: bl_pattern set to Breath",
            "OK: clk_selected_graphic set to 3",
        ]
    );
    let hw = runner.hardware();
    assert_eq!(hw.backlight.pattern, Some(BacklightPattern::Breath));
    assert_eq!(hw.clock.graphics_idx, 3);
    assert_eq!(hw.display.current_graphic, 3);
}

#[test]
fn test_saved_configuration_applied_on_next_start() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cfg.json");

    {
        let (device, mut host) = ChannelLink::pair();
        let mut runner = Runner::new(JsonFileStore::new(&path), device, 6);
        host.send(b"set clk_time_zone_offset -3600\nset bl_intensity 3\nsave_config\n")
            .unwrap();
        pump(&mut runner, 3);
        assert_eq!(
            response_lines(&mut host).last().map(String::as_str),
            Some("OK: Configuration saved")
        );
    }
    assert!(path.exists());

    let (device, _host) = ChannelLink::pair();
    let mut runner = Runner::new(JsonFileStore::new(&path), device, 6);
    runner.start();

    let hw = runner.hardware();
    assert_eq!(hw.clock.time_zone_offset, -3600);
    assert_eq!(hw.backlight.intensity, 3);
    assert_eq!(runner.config_manager().config().backlights.intensity, 3);
}

#[test]
fn test_unsaved_changes_are_not_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cfg.json");
    let (device, host) = ChannelLink::pair();
    let mut runner = Runner::new(JsonFileStore::new(&path), device, 6);

    host.send(b"set wifi_ssid Garage\n").unwrap();
    pump(&mut runner, 1);

    assert!(!path.exists());
}

#[test]
fn test_run_stops_when_link_closes() {
    let dir = tempfile::tempdir().unwrap();
    let (device, host) = ChannelLink::pair();
    let mut runner = Runner::new(JsonFileStore::new(dir.path().join("cfg.json")), device, 6)
        .with_poll_interval(Duration::from_millis(1));

    host.send(b"set bl_pulse_bpm 90\nget bl_pulse_bpm\n").unwrap();
    drop(host);

    let shutdown = AtomicBool::new(false);
    runner.run(&shutdown).unwrap();
    assert_eq!(runner.hardware().backlight.pulse_bpm, 90);
}

// ============================================================================
// TCP link
// ============================================================================

#[test]
fn test_tcp_client_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let link = TcpLink::bind(0).expect("bind should succeed");
    let port = link.local_addr().port();
    let mut runner = Runner::new(JsonFileStore::new(dir.path().join("cfg.json")), link, 4);

    let mut client = TcpStream::connect(("127.0.0.1", port)).unwrap();
    client.set_read_timeout(Some(Duration::from_secs(2))).unwrap();

    let deadline = Instant::now() + Duration::from_secs(2);
    while !runner.link_mut().is_client_connected() && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(5));
    }
    assert!(runner.link_mut().is_client_connected());

    client.write_all(b"set clk_selected_graphic 5\n").unwrap();
    pump(&mut runner, 1);

    let mut reader = BufReader::new(client);
    let mut line = String::new();
    reader.read_line(&mut line).unwrap();
    assert_eq!(line, "ERROR: Invalid value for clk_selected_graphic (must be 1-4).\r\n");
}
