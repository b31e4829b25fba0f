//! Emission and conversion roundtrips over temporary files.
use super::*;
use crate::{convert_to_raw, write_rawfile};

use giga_hspice_core::errors::ErrorKind;
use std::fs;
use std::io::Write;

#[test]
fn transient_rawfile_header_lines() {
    let dir = tempfile::tempdir().expect("Couldn't get tempfile.");
    let path = dir.path().join("step.raw");
    write_rawfile(&transient_result(), &path).unwrap();

    let raw = ParsedRaw::parse(&fs::read(&path).unwrap());
    assert_eq!(raw.field("Title"), Some("step response"));
    assert_eq!(raw.field("Date"), Some("Mon Jul 14 10:00:00 2025"));
    assert_eq!(raw.field("Plotname"), Some("Transient Analysis"));
    assert_eq!(raw.field("Flags"), Some("real"));
    assert_eq!(raw.field("No. Variables"), Some("3"));
    assert_eq!(raw.field("No. Points"), Some("4"));
    assert_eq!(
        raw.variable_lines(),
        vec![
            "\t0\tTIME\ttime",
            "\t1\tv(out)\tvoltage",
            "\t2\ti(vdd)\tcurrent",
        ]
    );
    // The header must stay LF-only ASCII.
    assert!(!raw.header.contains('\r'));
    assert!(raw.header.ends_with("Binary:\n"));
}

#[test]
fn transient_rawfile_payload_is_row_major() {
    let dir = tempfile::tempdir().expect("Couldn't get tempfile.");
    let path = dir.path().join("step.raw");
    let result = transient_result();
    write_rawfile(&result, &path).unwrap();

    let bytes = fs::read(&path).unwrap();
    let raw = ParsedRaw::parse(&bytes);
    // Exactly header + P * N * 8 bytes on disk.
    assert_eq!(bytes.len(), raw.header.len() + 4 * 3 * 8);

    let doubles = raw.doubles();
    let time = result.get("TIME").unwrap().as_real().unwrap();
    let vout = result.get("v(out)").unwrap().as_real().unwrap();
    let ivdd = result.get("i(vdd)").unwrap().as_real().unwrap();
    for row in 0..4 {
        assert_eq!(doubles[row * 3], time[row]);
        assert_eq!(doubles[row * 3 + 1], vout[row]);
        assert_eq!(doubles[row * 3 + 2], ivdd[row]);
    }
}

#[test]
fn ac_rawfile_interleaves_complex_values() {
    let dir = tempfile::tempdir().expect("Couldn't get tempfile.");
    let path = dir.path().join("bode.raw");
    let result = ac_result();
    write_rawfile(&result, &path).unwrap();

    let bytes = fs::read(&path).unwrap();
    let raw = ParsedRaw::parse(&bytes);
    assert_eq!(raw.field("Plotname"), Some("AC Analysis"));
    assert_eq!(raw.field("Flags"), Some("complex"));
    // The scale stays a single real double per row.
    let row_len = 1 + 2 * (2 - 1);
    assert_eq!(raw.payload.len(), 3 * row_len * 8);

    let doubles = raw.doubles();
    let freq = result.get("HERTZ").unwrap().as_real().unwrap();
    let vout = result.get("v(out)").unwrap().as_complex().unwrap();
    for row in 0..3 {
        assert_eq!(doubles[row * row_len], freq[row]);
        assert_eq!(doubles[row * row_len + 1], vout[row].re);
        assert_eq!(doubles[row * row_len + 2], vout[row].im);
    }
}

#[test]
fn swept_rawfile_concatenates_segments() {
    let dir = tempfile::tempdir().expect("Couldn't get tempfile.");
    let path = dir.path().join("transfer.raw");
    let result = swept_result();
    write_rawfile(&result, &path).unwrap();

    let raw = ParsedRaw::parse(&fs::read(&path).unwrap());
    assert_eq!(raw.field("Plotname"), Some("DC transfer characteristic"));
    assert_eq!(raw.field("No. Points"), Some("6"));
    assert_eq!(raw.payload.len(), 6 * 2 * 8);

    // Segment order survives: the second segment's first row follows the
    // first segment's last.
    let doubles = raw.doubles();
    assert_eq!(doubles[2 * 2 + 1], 0.9);
    assert_eq!(doubles[3 * 2 + 1], 1.0);
}

#[test]
fn rawfile_overwrites_existing_output() {
    let dir = tempfile::tempdir().expect("Couldn't get tempfile.");
    let path = dir.path().join("twice.raw");
    let mut junk = fs::File::create(&path).unwrap();
    junk.write_all(b"previous content of considerable length, well beyond a header")
        .unwrap();
    drop(junk);

    write_rawfile(&transient_result(), &path).unwrap();
    let raw = ParsedRaw::parse(&fs::read(&path).unwrap());
    assert_eq!(raw.field("Title"), Some("step response"));
}

#[test]
fn unwritable_output_is_an_output_error() {
    let err =
        write_rawfile(&transient_result(), "/invalid_path_12345/output.raw").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Output);
}

#[test]
fn convert_transient_input() {
    let dir = tempfile::tempdir().expect("Couldn't get tempfile.");
    let input = dir.path().join("fixture.tr0");
    fs::write(&input, InputFixture::transient().build()).unwrap();
    let output = dir.path().join("fixture.raw");

    assert!(convert_to_raw(&input, &output));

    let decoded = giga_hspice_in::read_waveform(&input).unwrap();
    let raw = ParsedRaw::parse(&fs::read(&output).unwrap());
    assert_eq!(raw.field("Plotname"), Some("Transient Analysis"));
    assert_eq!(
        raw.field("No. Points").unwrap().parse::<usize>().unwrap(),
        decoded.len()
    );
    assert_eq!(
        raw.field("No. Variables").unwrap().parse::<usize>().unwrap(),
        decoded.num_vars()
    );
    assert_eq!(raw.payload.len(), decoded.len() * decoded.num_vars() * 8);
}

#[test]
fn convert_ac_input() {
    let dir = tempfile::tempdir().expect("Couldn't get tempfile.");
    let input = dir.path().join("fixture.ac0");
    fs::write(&input, InputFixture::ac().build()).unwrap();
    let output = dir.path().join("fixture.raw");

    assert!(convert_to_raw(&input, &output));
    let raw = ParsedRaw::parse(&fs::read(&output).unwrap());
    assert_eq!(raw.field("Plotname"), Some("AC Analysis"));
    assert_eq!(raw.field("Flags"), Some("complex"));
}

#[test]
fn convert_dc_sweep_input() {
    let dir = tempfile::tempdir().expect("Couldn't get tempfile.");
    let input = dir.path().join("fixture.sw0");
    fs::write(&input, InputFixture::dc().build()).unwrap();
    let output = dir.path().join("fixture.raw");

    assert!(convert_to_raw(&input, &output));
    let raw = ParsedRaw::parse(&fs::read(&output).unwrap());
    assert_eq!(raw.field("Plotname"), Some("DC transfer characteristic"));
    // Both sweep segments of four points each land in one matrix.
    assert_eq!(raw.field("No. Points"), Some("8"));
}

#[test]
fn convert_missing_input_fails() {
    let dir = tempfile::tempdir().expect("Couldn't get tempfile.");
    let output = dir.path().join("never.raw");
    assert!(!convert_to_raw("/nonexistent/path/file.tr0", &output));
}

#[test]
fn convert_to_invalid_output_fails() {
    let dir = tempfile::tempdir().expect("Couldn't get tempfile.");
    let input = dir.path().join("fixture.tr0");
    fs::write(&input, InputFixture::transient().build()).unwrap();
    assert!(!convert_to_raw(&input, "/invalid_path_12345/output.raw"));
}
