//! Fixtures shared by the unit tests

use std::path::Path;

pub const WAV_SAMPLE_RATE: u32 = 8000;

/// Write a silent mono 16-bit WAV of `seconds` length.
pub fn write_wav(path: &Path, seconds: u32) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: WAV_SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for _ in 0..(WAV_SAMPLE_RATE * seconds) {
        writer.write_sample(0i16).unwrap();
    }
    writer.finalize().unwrap();
}
