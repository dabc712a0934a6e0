use std::fs;
use std::net::TcpListener;
use std::thread;
use tempfile::tempdir;

use linkguard_cli::commands::{
    receive::{self, receive_from, Source},
    send::{self, Destination, SendOptions},
};
use linkguard_core::{ErrorModel, Method, WireMessage};

fn write_file<P: AsRef<std::path::Path>>(p: P, s: &str) {
    fs::write(p, s.as_bytes()).unwrap();
}

fn options(input: &str, output: &str, method: Method, polynomial: Option<&str>) -> SendOptions {
    SendOptions {
        input: input.to_string(),
        method,
        polynomial: polynomial.map(str::to_string),
        destination: Destination::File(output.to_string()),
        error_model: ErrorModel::Random { count: 1 },
        error_rate: 0.0,
        payload_bits: 32,
        binary: false,
        seed: Some(7),
        progress: false,
    }
}

#[test]
fn send_checksum_to_file_clean() {
    let td = tempdir().unwrap();
    let in_path = td.path().join("in.txt");
    let out_path = td.path().join("out.wire");

    // 80 bits across two lines -> 3 frames
    write_file(
        &in_path,
        "0100100001100101011011000110110001101111\n0100100001100101011011000110110001101111\n",
    );

    let opts = options(
        in_path.to_str().unwrap(),
        out_path.to_str().unwrap(),
        Method::Checksum,
        None,
    );
    let summary = send::execute(&opts).unwrap();
    assert_eq!(summary.frames, 3);
    assert_eq!(summary.corrupted, 0);

    let wire = fs::read_to_string(&out_path).unwrap();
    let lines: Vec<&str> = wire.lines().collect();
    assert_eq!(lines.len(), 3);
    for line in lines {
        let msg = WireMessage::parse(line).unwrap();
        assert_eq!(msg.method, Method::Checksum);
        assert!(msg.polynomial.is_empty());
        assert!(!msg.error);
        assert!(msg.verify().unwrap());
    }
}

#[test]
fn send_then_receive_file_with_errors() {
    let td = tempdir().unwrap();
    let in_path = td.path().join("in.txt");
    let out_path = td.path().join("out.wire");
    let json_path = td.path().join("stats.json");

    write_file(&in_path, &"10110011".repeat(40));

    let mut opts = options(
        in_path.to_str().unwrap(),
        out_path.to_str().unwrap(),
        Method::Crc,
        Some("CRC-16"),
    );
    opts.error_rate = 1.0;
    let summary = send::execute(&opts).unwrap();
    assert_eq!(summary.frames, 10);
    assert_eq!(summary.corrupted, 10);

    let stats = receive::execute(
        &Source::File(out_path.to_str().unwrap().to_string()),
        Some(json_path.to_str().unwrap()),
    )
    .unwrap();

    // every single-bit error is caught by CRC-16
    assert_eq!(stats.messages, 10);
    assert_eq!(stats.correct, 10);
    assert_eq!(stats.detected, 10);

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(json["correct"], 10);
    assert_eq!(json["missed"], 0);
}

#[test]
fn send_crc_requires_polynomial() {
    let td = tempdir().unwrap();
    let in_path = td.path().join("in.txt");
    write_file(&in_path, "1010");

    let opts = options(
        in_path.to_str().unwrap(),
        td.path().join("out").to_str().unwrap(),
        Method::Crc,
        None,
    );
    assert!(send::execute(&opts).is_err());
}

#[test]
fn send_rejects_non_bit_text() {
    let td = tempdir().unwrap();
    let in_path = td.path().join("in.txt");
    write_file(&in_path, "hello");

    let opts = options(
        in_path.to_str().unwrap(),
        td.path().join("out").to_str().unwrap(),
        Method::Checksum,
        None,
    );
    assert!(send::execute(&opts).is_err());
}

#[test]
fn send_binary_input() {
    let td = tempdir().unwrap();
    let in_path = td.path().join("in.bin");
    let out_path = td.path().join("out.wire");
    fs::write(&in_path, [0xDE, 0xAD, 0xBE, 0xEF, 0x01]).unwrap();

    let mut opts = options(
        in_path.to_str().unwrap(),
        out_path.to_str().unwrap(),
        Method::Crc,
        Some("1011"),
    );
    opts.binary = true;
    let summary = send::execute(&opts).unwrap();
    assert_eq!(summary.frames, 2);
    // (16 header + 32 payload + 3) + (16 + 8 + 3)
    assert_eq!(summary.bits, 51 + 27);

    let wire = fs::read_to_string(&out_path).unwrap();
    assert!(wire.starts_with("crc:1011:0:00000001000000101101111010101101"));
}

#[test]
fn receive_skips_malformed_lines() {
    let stream = b"checksum::0:00000000000000001111\nbogus\nhamming::0:1\ncrc:CRC-8:1:000000000\ncrc:CRC-8:0:0101";
    let stats = receive_from(&stream[..]).unwrap();
    assert_eq!(stats.format_errors, 1);
    assert_eq!(stats.unknown_methods, 1);
    // trailing line without newline is discarded
    assert_eq!(stats.messages, 3);
    // flagged corrupt but all-zero codeword passes: a miss
    assert_eq!(stats.missed, 1);
    assert_eq!(stats.correct, 1);
}

#[test]
fn receive_survives_overlong_line() {
    let mut stream = vec![b'0'; linkguard_core::constants::MAX_LINE_BYTES + 4096];
    stream.extend_from_slice(b"\nchecksum::0:00000000000000001111\n");
    let stats = receive_from(&stream[..]).unwrap();
    assert_eq!(stats.format_errors, 1);
    assert_eq!(stats.messages, 1);
    assert_eq!(stats.correct, 1);
}

#[test]
fn send_and_receive_over_tcp() {
    let td = tempdir().unwrap();
    let in_path = td.path().join("in.txt");
    write_file(&in_path, &"0110".repeat(32));

    // Bind first to learn a free port, then hand the listener's port over
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let receiver = thread::spawn(move || {
        let (conn, _) = listener.accept().unwrap();
        receive_from(conn).unwrap()
    });

    let mut opts = options(in_path.to_str().unwrap(), "-", Method::Checksum, None);
    opts.destination = Destination::Tcp {
        host: "127.0.0.1".to_string(),
        port,
    };
    let summary = send::execute(&opts).unwrap();
    assert_eq!(summary.frames, 4);

    let stats = receiver.join().unwrap();
    assert_eq!(stats.messages, 4);
    assert_eq!(stats.correct, 4);
}
