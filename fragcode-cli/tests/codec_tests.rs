use std::fs;
use std::path::Path;
use tempfile::tempdir;

use fragcode_cli::{decode, encode, inspect, row, Manifest};
use fragcode_core::record::record_len;

fn message(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 7 + i / 13) as u8).collect()
}

fn write_file<P: AsRef<Path>>(p: P, data: &[u8]) {
    fs::write(p, data).unwrap();
}

fn path_str(p: &Path) -> &str {
    p.to_str().unwrap()
}

#[test]
fn encode_decode_clean_round_trip() {
    let td = tempdir().unwrap();
    let in_path = td.path().join("msg.bin");
    let frag_path = td.path().join("msg.frag");
    let out_path = td.path().join("out.bin");

    let data = message(1000);
    write_file(&in_path, &data);

    let manifest = encode::execute(
        path_str(&in_path),
        path_str(&frag_path),
        /*frag_size*/ 32,
        /*redundancy*/ 10,
        /*manifest*/ None,
    )
    .unwrap();

    assert_eq!(manifest.params.m, 32);
    assert_eq!(manifest.message_len, 1000);
    assert!(td.path().join("msg.frag.json").exists());
    assert_eq!(
        fs::read(&frag_path).unwrap().len(),
        42 * record_len(32)
    );

    let stats = decode::execute(path_str(&frag_path), path_str(&out_path), None).unwrap();
    assert_eq!(stats.submitted, 32);
    assert_eq!(stats.redundant, 0);
    assert_eq!(fs::read(&out_path).unwrap(), data);
}

#[test]
fn decode_recovers_damaged_records() {
    let td = tempdir().unwrap();
    let in_path = td.path().join("msg.bin");
    let frag_path = td.path().join("msg.frag");
    let out_path = td.path().join("out.bin");

    let data = message(1000);
    write_file(&in_path, &data);
    encode::execute(path_str(&in_path), path_str(&frag_path), 32, 32, None).unwrap();

    // Corrupt the payload of three systematic records
    let mut stream = fs::read(&frag_path).unwrap();
    let size = record_len(32);
    for k in [0usize, 5, 7] {
        stream[k * size + 20] ^= 0xFF;
    }
    write_file(&frag_path, &stream);

    let stats = decode::execute(path_str(&frag_path), path_str(&out_path), None).unwrap();
    assert!(stats.submitted > 29);
    assert_eq!(fs::read(&out_path).unwrap(), data);
}

#[test]
fn decode_fails_when_too_few_records() {
    let td = tempdir().unwrap();
    let in_path = td.path().join("msg.bin");
    let frag_path = td.path().join("msg.frag");
    let out_path = td.path().join("out.bin");

    write_file(&in_path, &message(256));
    encode::execute(path_str(&in_path), path_str(&frag_path), 16, 0, None).unwrap();

    // Drop the last record
    let stream = fs::read(&frag_path).unwrap();
    write_file(&frag_path, &stream[..stream.len() - record_len(16)]);

    let err = decode::execute(path_str(&frag_path), path_str(&out_path), None).unwrap_err();
    assert!(err.to_string().contains("incomplete"));
    assert!(!out_path.exists());
}

#[test]
fn decode_rejects_digest_mismatch() {
    let td = tempdir().unwrap();
    let in_path = td.path().join("msg.bin");
    let frag_path = td.path().join("msg.frag");
    let manifest_path = td.path().join("sidecar.json");
    let out_path = td.path().join("out.bin");

    write_file(&in_path, &message(100));
    encode::execute(
        path_str(&in_path),
        path_str(&frag_path),
        10,
        2,
        Some(path_str(&manifest_path)),
    )
    .unwrap();

    let mut manifest = Manifest::load(&manifest_path).unwrap();
    manifest.blake3 = "00".repeat(32);
    manifest.save(&manifest_path).unwrap();

    let result = decode::execute(
        path_str(&frag_path),
        path_str(&out_path),
        Some(path_str(&manifest_path)),
    );
    assert!(result.is_err());
}

#[test]
fn decode_without_manifest_writes_padded_block() {
    let td = tempdir().unwrap();
    let in_path = td.path().join("msg.bin");
    let frag_path = td.path().join("msg.frag");
    let manifest_path = td.path().join("elsewhere.json");
    let out_path = td.path().join("out.bin");

    let data = message(45);
    write_file(&in_path, &data);
    encode::execute(
        path_str(&in_path),
        path_str(&frag_path),
        10,
        0,
        Some(path_str(&manifest_path)),
    )
    .unwrap();

    decode::execute(path_str(&frag_path), path_str(&out_path), None).unwrap();

    let recovered = fs::read(&out_path).unwrap();
    assert_eq!(recovered.len(), 50);
    assert_eq!(&recovered[..45], data.as_slice());
    assert_eq!(&recovered[45..], &[0u8; 5]);
}

#[test]
fn encode_rejects_zero_fragment_size() {
    let td = tempdir().unwrap();
    let in_path = td.path().join("msg.bin");
    write_file(&in_path, b"abc");

    let result = encode::execute(
        path_str(&in_path),
        path_str(&td.path().join("out.frag")),
        0,
        0,
        None,
    );
    assert!(result.is_err());
}

#[test]
fn inspect_and_row_run() {
    let td = tempdir().unwrap();
    let in_path = td.path().join("msg.bin");
    let frag_path = td.path().join("msg.frag");

    write_file(&in_path, &message(64));
    encode::execute(path_str(&in_path), path_str(&frag_path), 8, 4, None).unwrap();

    inspect::execute(path_str(&frag_path), true).unwrap();
    inspect::execute(path_str(&in_path), false).unwrap();

    row::execute(4, 4).unwrap();
    assert!(row::execute(0, 0).is_err());
}
