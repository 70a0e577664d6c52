//! WAV container writer
//!
//! Serializes raw PCM bytes plus format parameters into a canonical
//! RIFF/WAVE byte stream. The 44-byte header layout is a fixed external
//! contract; any deviation breaks WAV-reading software downstream.

/// Length of the canonical RIFF/WAVE header in bytes
pub const HEADER_LEN: usize = 44;

/// Build a complete WAV byte stream from interleaved PCM data
///
/// Layout (multi-byte numeric fields little-endian, four-character codes as
/// their ASCII byte sequence):
///
/// | Offset | Field          | Value                                  |
/// |--------|----------------|----------------------------------------|
/// | 0      | ChunkID        | "RIFF"                                 |
/// | 4      | ChunkSize      | 36 + data length                       |
/// | 8      | Format         | "WAVE"                                 |
/// | 12     | Subchunk1ID    | "fmt "                                 |
/// | 16     | Subchunk1Size  | 16                                     |
/// | 20     | AudioFormat    | 1 (PCM)                                |
/// | 22     | NumChannels    | channel count                          |
/// | 24     | SampleRate     | sample rate                            |
/// | 28     | ByteRate       | rate * bytes_per_sample * channels     |
/// | 32     | BlockAlign     | bytes_per_sample * channels            |
/// | 34     | BitsPerSample  | bytes_per_sample * 8                   |
/// | 36     | Subchunk2ID    | "data"                                 |
/// | 40     | Subchunk2Size  | data length                            |
/// | 44..   | data           | PCM payload                            |
pub fn write_wav(data: &[u8], channels: u16, sample_rate: u32, bytes_per_sample: u16) -> Vec<u8> {
    let data_len = data.len() as u32;
    let byte_rate = sample_rate * u32::from(bytes_per_sample) * u32::from(channels);
    let block_align = bytes_per_sample * channels;
    let bits_per_sample = bytes_per_sample * 8;

    let mut wav = Vec::with_capacity(HEADER_LEN + data.len());

    // RIFF chunk
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_len).to_le_bytes());
    wav.extend_from_slice(b"WAVE");

    // fmt sub-chunk
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&channels.to_le_bytes());
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&block_align.to_le_bytes());
    wav.extend_from_slice(&bits_per_sample.to_le_bytes());

    // data sub-chunk
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_len.to_le_bytes());
    wav.extend_from_slice(data);

    wav
}
