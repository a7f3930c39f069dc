//! WAV decoding and resampling to the model's 16 kHz mono format.

use std::io::Cursor;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::shared::constants::TARGET_SAMPLE_RATE;

use super::source_loader::AcquireError;

/// Decode WAV bytes into f32 samples at 16 kHz, single channel.
///
/// Multi-channel input keeps the first channel; there is no downmix.
pub fn decode(data: &[u8]) -> Result<Vec<f32>, AcquireError> {
    let cursor = Cursor::new(data.to_vec());
    let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

    let mut hint = Hint::new();
    hint.with_extension("wav");

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| AcquireError::Decode(format!("probe failed: {e}")))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != symphonia::core::codecs::CODEC_TYPE_NULL)
        .ok_or_else(|| AcquireError::Decode("no audio track found".into()))?;

    let codec_params = track.codec_params.clone();
    let track_id = track.id;
    let source_rate = codec_params.sample_rate.unwrap_or(TARGET_SAMPLE_RATE);
    let channels = codec_params.channels.map_or(1, |c| c.count());

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| AcquireError::Decode(format!("codec init failed: {e}")))?;

    let mut samples: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(symphonia::core::errors::Error::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(AcquireError::Decode(format!("packet read: {e}"))),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = decoder
            .decode(&packet)
            .map_err(|e| AcquireError::Decode(format!("decode: {e}")))?;

        let spec = *decoded.spec();
        let n_frames = decoded.capacity();
        let mut sample_buf = SampleBuffer::<f32>::new(n_frames as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);
        let interleaved = sample_buf.samples();

        if channels > 1 {
            // First channel only.
            samples.extend(interleaved.chunks(channels).filter_map(|frame| frame.first()));
        } else {
            samples.extend_from_slice(interleaved);
        }
    }

    if samples.is_empty() {
        return Err(AcquireError::Decode("no audio samples decoded".into()));
    }

    if source_rate != TARGET_SAMPLE_RATE {
        samples = resample(&samples, source_rate, TARGET_SAMPLE_RATE)?;
    }

    Ok(samples)
}

/// Resample mono audio from `from_rate` to `to_rate` using rubato.
fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>, AcquireError> {
    use rubato::{
        Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
    };

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let ratio = f64::from(to_rate) / f64::from(from_rate);
    let chunk_size = 1024;

    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, chunk_size, 1)
        .map_err(|e| AcquireError::Resample(format!("init: {e}")))?;

    // The sinc filter delays its output by this many frames; the delayed
    // samples are recovered by the flush chunk below.
    let delay = resampler.output_delay();
    let expected_len = (samples.len() as f64 * ratio).round() as usize;
    let mut output = Vec::with_capacity(expected_len + delay + chunk_size);

    let mut process = |input: &[Vec<f32>], output: &mut Vec<f32>| {
        let resampled = resampler
            .process(input, None)
            .map_err(|e| AcquireError::Resample(format!("process: {e}")))?;
        if let Some(channel) = resampled.first() {
            output.extend_from_slice(channel);
        }
        Ok::<(), AcquireError>(())
    };

    for chunk in samples.chunks(chunk_size) {
        let input = if chunk.len() < chunk_size {
            // Pad the final chunk with silence to the fixed input size.
            let mut padded = chunk.to_vec();
            padded.resize(chunk_size, 0.0);
            vec![padded]
        } else {
            vec![chunk.to_vec()]
        };
        process(&input, &mut output)?;
    }

    // One silent chunk flushes the tail still held in the filter.
    process(&[vec![0.0f32; chunk_size]], &mut output)?;

    // Drop the filter delay, then trim the chunk padding down to the
    // exact output length.
    let mut output: Vec<f32> = output.into_iter().skip(delay).take(expected_len).collect();
    output.resize(expected_len, 0.0);

    Ok(output)
}

/// Sample encodings the test WAV builder can emit.
#[cfg(test)]
#[derive(Clone, Copy)]
pub(crate) enum SampleLayout {
    Pcm8,
    Pcm16,
    Pcm24,
    Float32,
}

#[cfg(test)]
impl SampleLayout {
    fn bits_per_sample(self) -> u16 {
        match self {
            SampleLayout::Pcm8 => 8,
            SampleLayout::Pcm16 => 16,
            SampleLayout::Pcm24 => 24,
            SampleLayout::Float32 => 32,
        }
    }

    fn format_tag(self) -> u16 {
        match self {
            SampleLayout::Float32 => 3, // IEEE float
            _ => 1,                     // integer PCM
        }
    }

    fn encode(self, value: f64, buf: &mut Vec<u8>) {
        let value = value.clamp(-1.0, 1.0);
        match self {
            SampleLayout::Pcm8 => {
                // 8-bit WAV is unsigned, centered on 128.
                buf.push((value * 127.0 + 128.0).round() as u8);
            }
            SampleLayout::Pcm16 => {
                buf.extend_from_slice(&((value * f64::from(i16::MAX)) as i16).to_le_bytes());
            }
            SampleLayout::Pcm24 => {
                let scaled = (value * 8_388_607.0) as i32;
                buf.extend_from_slice(&scaled.to_le_bytes()[..3]);
            }
            SampleLayout::Float32 => {
                buf.extend_from_slice(&(value as f32).to_le_bytes());
            }
        }
    }
}

/// Build a minimal WAV byte stream in the given sample layout. `sample_for`
/// maps (frame, channel) to a normalized amplitude in [-1.0, 1.0].
#[cfg(test)]
pub(crate) fn synth_wav_in(
    sample_rate: u32,
    channels: u16,
    frames: u32,
    layout: SampleLayout,
    sample_for: impl Fn(u32, u16) -> f64,
) -> Vec<u8> {
    let bits_per_sample = layout.bits_per_sample();
    let byte_rate = sample_rate * u32::from(channels) * u32::from(bits_per_sample) / 8;
    let block_align = channels * bits_per_sample / 8;
    let data_size = frames * u32::from(channels) * u32::from(bits_per_sample) / 8;
    let file_size = 36 + data_size;

    let mut buf = Vec::with_capacity(file_size as usize + 8);
    buf.extend_from_slice(b"RIFF");
    buf.extend_from_slice(&file_size.to_le_bytes());
    buf.extend_from_slice(b"WAVE");
    buf.extend_from_slice(b"fmt ");
    buf.extend_from_slice(&16u32.to_le_bytes());
    buf.extend_from_slice(&layout.format_tag().to_le_bytes());
    buf.extend_from_slice(&channels.to_le_bytes());
    buf.extend_from_slice(&sample_rate.to_le_bytes());
    buf.extend_from_slice(&byte_rate.to_le_bytes());
    buf.extend_from_slice(&block_align.to_le_bytes());
    buf.extend_from_slice(&bits_per_sample.to_le_bytes());
    buf.extend_from_slice(b"data");
    buf.extend_from_slice(&data_size.to_le_bytes());
    for frame in 0..frames {
        for channel in 0..channels {
            layout.encode(sample_for(frame, channel), &mut buf);
        }
    }
    buf
}

/// Build a minimal 16-bit PCM WAV byte stream. `sample_for` maps
/// (frame, channel) to a 16-bit sample.
#[cfg(test)]
pub(crate) fn synth_wav(
    sample_rate: u32,
    channels: u16,
    frames: u32,
    sample_for: impl Fn(u32, u16) -> i16,
) -> Vec<u8> {
    synth_wav_in(sample_rate, channels, frames, SampleLayout::Pcm16, |f, c| {
        f64::from(sample_for(f, c)) / f64::from(i16::MAX)
    })
}
