use std::io::Cursor;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{Decoder, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::application::ports::MediaError;

pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// Decode any container symphonia understands into 16kHz mono f32 PCM.
/// Multi-channel sources are downmixed by averaging; other sample rates are
/// resampled.
pub fn decode_to_pcm(data: &[u8]) -> Result<Vec<f32>, MediaError> {
    let stream = MediaSourceStream::new(Box::new(Cursor::new(data.to_vec())), Default::default());

    let probed = symphonia::default::get_probe()
        .format(
            &Hint::new(),
            stream,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| MediaError::Unreadable(format!("container probe failed: {}", e)))?;
    let mut reader = probed.format;

    let track = reader
        .default_track()
        .ok_or_else(|| MediaError::NoAudioStream("no default audio track".to_string()))?;
    let track_id = track.id;
    let codec_params = track.codec_params.clone();
    let source_rate = codec_params
        .sample_rate
        .ok_or_else(|| MediaError::DecodeFailed("track has no sample rate".to_string()))?;
    let channels = codec_params.channels.map(|c| c.count()).unwrap_or(1);

    let decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| MediaError::DecodeFailed(format!("no decoder for codec: {}", e)))?;

    let mono = decode_track(reader.as_mut(), decoder, track_id, channels)?;
    if mono.is_empty() {
        return Err(MediaError::NoAudioStream(
            "stream decoded to zero samples".to_string(),
        ));
    }

    let pcm = if source_rate == TARGET_SAMPLE_RATE {
        mono
    } else {
        resample(&mono, source_rate, TARGET_SAMPLE_RATE)?
    };

    tracing::debug!(
        samples = pcm.len(),
        duration_secs = pcm.len() as f32 / TARGET_SAMPLE_RATE as f32,
        "Audio decoded to 16kHz mono PCM"
    );
    Ok(pcm)
}

/// Run the packet loop for one track, downmixing interleaved frames to mono.
/// Corrupt frames are skipped rather than failing the whole stream.
fn decode_track(
    reader: &mut dyn FormatReader,
    mut decoder: Box<dyn Decoder>,
    track_id: u32,
    channels: usize,
) -> Result<Vec<f32>, MediaError> {
    let mut mono: Vec<f32> = Vec::new();

    loop {
        let packet = match reader.next_packet() {
            Ok(p) => p,
            Err(SymphoniaError::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(MediaError::DecodeFailed(format!("packet read: {}", e))),
        };
        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(SymphoniaError::DecodeError(e)) => {
                tracing::warn!(error = %e, "Skipping corrupt audio frame");
                continue;
            }
            Err(e) => return Err(MediaError::DecodeFailed(format!("frame decode: {}", e))),
        };

        let frames = decoded.frames();
        if frames == 0 {
            continue;
        }
        let mut buffer = SampleBuffer::<f32>::new(frames as u64, *decoded.spec());
        buffer.copy_interleaved_ref(decoded);

        if channels > 1 {
            mono.extend(
                buffer
                    .samples()
                    .chunks(channels)
                    .map(|frame| frame.iter().sum::<f32>() / channels as f32),
            );
        } else {
            mono.extend_from_slice(buffer.samples());
        }
    }

    Ok(mono)
}

fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>, MediaError> {
    use rubato::{
        Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
    };

    const CHUNK_SIZE: usize = 1024;

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };
    let ratio = to_rate as f64 / from_rate as f64;
    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, CHUNK_SIZE, 1)
        .map_err(|e| MediaError::DecodeFailed(format!("resampler init: {}", e)))?;

    let expected_len = (samples.len() as f64 * ratio) as usize;
    let mut output = Vec::with_capacity(expected_len + CHUNK_SIZE);

    for chunk in samples.chunks(CHUNK_SIZE) {
        // The fixed-input resampler needs full chunks; zero-pad the tail.
        let mut input = chunk.to_vec();
        input.resize(CHUNK_SIZE, 0.0);

        let resampled = resampler
            .process(&[input], None)
            .map_err(|e| MediaError::DecodeFailed(format!("resample: {}", e)))?;
        if let Some(channel) = resampled.first() {
            output.extend_from_slice(channel);
        }
    }

    // Drop the padding the final chunk introduced.
    output.truncate(expected_len);
    Ok(output)
}
