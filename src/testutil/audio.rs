// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::any::TypeId;
use std::io::{Cursor, Seek, Write};
use std::{error::Error, fs::File, path::PathBuf};

use hound::{SampleFormat, WavSpec, WavWriter};

/// Writes planar channel data to a WAV file. The sample type picks the format: f32 writes
/// 32-bit float, i16 writes 16-bit integer and i32 writes 32-bit integer samples.
pub fn write_wav<S: hound::Sample + Copy + 'static>(
    path: PathBuf,
    samples: Vec<Vec<S>>,
    sample_rate: u32,
) -> Result<(), Box<dyn Error>> {
    let file = File::create(path)?;
    write_interleaved(file, &samples, sample_rate)
}

/// Same as [write_wav], but returns the file contents.
pub fn wav_bytes<S: hound::Sample + Copy + 'static>(
    samples: Vec<Vec<S>>,
    sample_rate: u32,
) -> Result<Vec<u8>, Box<dyn Error>> {
    let mut cursor = Cursor::new(Vec::new());
    write_interleaved(&mut cursor, &samples, sample_rate)?;
    Ok(cursor.into_inner())
}

fn write_interleaved<W: Write + Seek, S: hound::Sample + Copy + 'static>(
    writer: W,
    samples: &[Vec<S>],
    sample_rate: u32,
) -> Result<(), Box<dyn Error>> {
    let (sample_format, bits_per_sample) = if TypeId::of::<S>() == TypeId::of::<f32>() {
        (SampleFormat::Float, 32)
    } else if TypeId::of::<S>() == TypeId::of::<i16>() {
        (SampleFormat::Int, 16)
    } else if TypeId::of::<S>() == TypeId::of::<i32>() {
        (SampleFormat::Int, 32)
    } else {
        return Err("Unsupported sample format".into());
    };

    let num_channels = samples.len();
    assert!(num_channels <= u16::MAX.into(), "Too many channels!");
    let mut writer = WavWriter::new(
        writer,
        WavSpec {
            channels: num_channels as u16,
            sample_rate,
            bits_per_sample,
            sample_format,
        },
    )?;

    let frames = samples.iter().map(Vec::len).min().unwrap_or(0);
    for frame in 0..frames {
        for channel_samples in samples {
            writer.write_sample(channel_samples[frame])?;
        }
    }
    writer.finalize()?;

    Ok(())
}
