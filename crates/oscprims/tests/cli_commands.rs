#![cfg(all(unix, feature = "cli"))]

use std::net::UdpSocket;
use std::process::{Command, Output, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use oscprims::codec::{MessageView, OscMessage};

const FOO_HEX: &str = "2f666f6f000000002c697354000000000000002a68690000";

fn oscprims(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_oscprims"))
        .arg("--log-level")
        .arg("error")
        .args(args)
        .output()
        .expect("oscprims should run")
}

fn free_udp_port() -> u16 {
    UdpSocket::bind("127.0.0.1:0")
        .and_then(|socket| socket.local_addr())
        .map(|addr| addr.port())
        .expect("ephemeral port should be available")
}

#[test]
fn encode_prints_exact_wire_hex() {
    let output = oscprims(&["--format", "json", "encode", "/foo", "i:42", "s:hi", "T"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(&format!("\"hex\":\"{FOO_HEX}\"")), "{stdout}");
    assert!(stdout.contains("\"size\":24"));
    assert!(stdout.contains("\"type_tags\":\",isT\""));
}

#[test]
fn encode_raw_writes_wire_bytes() {
    let output = oscprims(&["--format", "raw", "encode", "/ping"]);
    assert!(output.status.success());
    assert_eq!(output.stdout, b"/ping\0\0\0,\0\0\0");
}

#[test]
fn decode_prints_arguments() {
    let output = oscprims(&["--format", "json", "decode", FOO_HEX]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"address\":\"/foo\""), "{stdout}");
    assert!(stdout.contains("\"value\":42"));
    assert!(stdout.contains("\"value\":\"hi\""));
    assert!(stdout.contains("\"value\":true"));
}

#[test]
fn decode_malformed_bytes_returns_60() {
    let output = oscprims(&["--format", "json", "decode", "2f78000078797a00"]);
    assert_eq!(output.status.code(), Some(60));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("decode failed"), "{stderr}");
}

#[test]
fn invalid_address_returns_64() {
    let output = oscprims(&["encode", "no-slash", "i:1"]);
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn unknown_argument_tag_returns_64() {
    let output = oscprims(&["encode", "/x", "q:1"]);
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn listen_prints_received_message() {
    let port = free_udp_port();
    let mut child = Command::new(env!("CARGO_BIN_EXE_oscprims"))
        .args(["--log-level", "error", "--format", "json", "listen"])
        .arg(port.to_string())
        .args(["--bind", "127.0.0.1", "--count", "1", "--timeout", "10s"])
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("listen should start");

    let mut message = OscMessage::new("/listen/test").unwrap();
    message.push_float32(0.5).unwrap().push_str("ok").unwrap();
    let wire = message.finalize();

    // The listener may not be bound yet; resend until it has printed and exited.
    let sender = UdpSocket::bind("127.0.0.1:0").unwrap();
    let start = Instant::now();
    loop {
        sender.send_to(&wire, ("127.0.0.1", port)).unwrap();
        if child.try_wait().unwrap().is_some() {
            break;
        }
        if start.elapsed() >= Duration::from_secs(5) {
            let _ = child.kill();
            panic!("listener did not exit");
        }
        thread::sleep(Duration::from_millis(50));
    }

    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"address\":\"/listen/test\""), "{stdout}");
    assert!(stdout.contains("\"value\":0.5"));
    assert!(stdout.contains("\"from\":\"127.0.0.1:"));
}

#[test]
fn listen_timeout_returns_124() {
    let port = free_udp_port().to_string();
    let output = oscprims(&[
        "listen", &port, "--bind", "127.0.0.1", "--count", "1", "--timeout", "300ms",
    ]);
    assert_eq!(output.status.code(), Some(124));
}

#[test]
fn send_with_wait_prints_reply() {
    let responder = UdpSocket::bind("127.0.0.1:0").unwrap();
    responder
        .set_read_timeout(Some(Duration::from_secs(5)))
        .unwrap();
    let destination = responder.local_addr().unwrap().to_string();

    let handle = thread::spawn(move || {
        let mut buf = [0u8; 1024];
        let (len, from) = responder.recv_from(&mut buf).unwrap();
        let request = MessageView::parse(&buf[..len]).unwrap();
        assert_eq!(request.address(), "/ping");
        assert_eq!(request.get_int(0).unwrap(), 7);

        let mut reply = OscMessage::new("/pong").unwrap();
        reply.push_int32(8).unwrap();
        responder.send_to(&reply.finalize(), from).unwrap();
    });

    let output = oscprims(&[
        "--format",
        "json",
        "send",
        &destination,
        "/ping",
        "i:7",
        "--bind",
        "127.0.0.1",
        "--wait",
        "--wait-timeout",
        "5s",
    ]);
    handle.join().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"address\":\"/pong\""), "{stdout}");
    assert!(stdout.contains("\"value\":8"));
}

#[test]
fn send_wait_without_reply_returns_124() {
    let silent = UdpSocket::bind("127.0.0.1:0").unwrap();
    let destination = silent.local_addr().unwrap().to_string();

    let output = oscprims(&[
        "send",
        &destination,
        "/ping",
        "--bind",
        "127.0.0.1",
        "--wait",
        "--wait-timeout",
        "200ms",
    ]);
    assert_eq!(output.status.code(), Some(124));
}

#[test]
fn listen_with_zero_buffer_returns_64() {
    let port = free_udp_port().to_string();
    let output = oscprims(&[
        "listen", &port, "--bind", "127.0.0.1", "--buffer-size", "0",
    ]);
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn extended_version_reports_build_provenance() {
    let output = oscprims(&["version", "--extended"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("name: oscprims"));
    assert!(!stdout.contains("target: unknown"), "{stdout}");
    assert!(!stdout.contains("profile: unknown"), "{stdout}");
}

#[test]
fn version_prints_package_version() {
    let output = oscprims(&["version"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), format!("oscprims {}", env!("CARGO_PKG_VERSION")));
}
