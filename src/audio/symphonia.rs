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
use std::io::Cursor;

use symphonia::core::audio::{AudioBuffer, AudioBufferRef, Signal};
use symphonia::core::codecs::{Decoder, DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::conv::FromSample;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader, Packet};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::sample::Sample;
use symphonia::default::{get_codecs, get_probe};
use tracing::{debug, warn};

use super::{AudioDecoder, AudioError, DecodedAudio};

/// Decodes audio files held in memory with symphonia and keeps the first channel.
pub struct SymphoniaDecoder {
    extension_hint: Option<String>,
}

impl Default for SymphoniaDecoder {
    fn default() -> Self {
        SymphoniaDecoder::new(Some("wav"))
    }
}

impl SymphoniaDecoder {
    /// Creates a decoder. The extension only helps the probe guess the container format.
    pub fn new(extension_hint: Option<&str>) -> SymphoniaDecoder {
        SymphoniaDecoder {
            extension_hint: extension_hint.map(str::to_string),
        }
    }

    /// Reads the next packet. Returns `Ok(None)` at the end of the stream.
    ///
    /// ResetRequired errors are propagated so the caller can reset the decoder.
    fn read_next_packet(
        format_reader: &mut dyn FormatReader,
    ) -> Result<Option<Packet>, SymphoniaError> {
        match format_reader.next_packet() {
            Ok(packet) => Ok(Some(packet)),
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                Ok(None)
            }
            // Some formats report the end of the stream as a decode error.
            Err(SymphoniaError::DecodeError(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Copies the first channel of a decoded buffer out as f32 samples.
    fn first_channel(decoded: AudioBufferRef, output: &mut Vec<f32>) {
        match decoded {
            AudioBufferRef::F32(buf) => Self::extend_first_plane(&buf, output),
            AudioBufferRef::F64(buf) => Self::extend_first_plane(&buf, output),
            AudioBufferRef::S8(buf) => Self::extend_first_plane(&buf, output),
            AudioBufferRef::S16(buf) => Self::extend_first_plane(&buf, output),
            AudioBufferRef::S24(buf) => Self::extend_first_plane(&buf, output),
            AudioBufferRef::S32(buf) => Self::extend_first_plane(&buf, output),
            AudioBufferRef::U8(buf) => Self::extend_first_plane(&buf, output),
            AudioBufferRef::U16(buf) => Self::extend_first_plane(&buf, output),
            AudioBufferRef::U24(buf) => Self::extend_first_plane(&buf, output),
            AudioBufferRef::U32(buf) => Self::extend_first_plane(&buf, output),
        }
    }

    fn extend_first_plane<T>(buf: &AudioBuffer<T>, output: &mut Vec<f32>)
    where
        T: Sample,
        f32: FromSample<T>,
    {
        if buf.spec().channels.count() == 0 {
            return;
        }
        output.extend(buf.chan(0).iter().map(|sample| f32::from_sample(*sample)));
    }
}

impl AudioDecoder for SymphoniaDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedAudio, AudioError> {
        let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes.to_vec())), Default::default());

        let mut hint = Hint::new();
        if let Some(extension) = &self.extension_hint {
            hint.with_extension(extension);
        }

        let meta_opts: MetadataOptions = Default::default();
        let fmt_opts: FormatOptions = Default::default();
        let probed = get_probe().format(&hint, mss, &fmt_opts, &meta_opts)?;
        let mut format_reader = probed.format;

        let track = format_reader
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or(AudioError::NoAudioTrack)?;
        let track_id = track.id;
        let params = track.codec_params.clone();

        let sample_rate = params.sample_rate.ok_or(AudioError::UnknownSampleRate)?;
        let decoder_opts: DecoderOptions = Default::default();
        let mut decoder: Box<dyn Decoder> = get_codecs().make(&params, &decoder_opts)?;

        // The header's frame count is not trusted for sizing; the buffer grows with what
        // actually decodes.
        let mut channel_samples = Vec::new();

        loop {
            let packet = match Self::read_next_packet(format_reader.as_mut()) {
                Ok(Some(packet)) => packet,
                Ok(None) => break,
                Err(SymphoniaError::ResetRequired) => {
                    decoder.reset();
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            if packet.track_id() != track_id {
                continue;
            }

            match decoder.decode(&packet) {
                Ok(decoded) => Self::first_channel(decoded, &mut channel_samples),
                Err(SymphoniaError::DecodeError(e)) => {
                    // A corrupt packet only loses its own samples.
                    warn!(err = e, "Skipping undecodable packet");
                }
                Err(SymphoniaError::ResetRequired) => decoder.reset(),
                Err(e) => return Err(e.into()),
            }
        }

        let decoded = DecodedAudio::new(channel_samples, sample_rate);
        debug!(
            sample_rate,
            samples = decoded.channel_samples.len(),
            header_frames = ?params.n_frames,
            duration = decoded.duration,
            "Decoded audio"
        );
        Ok(decoded)
    }
}
