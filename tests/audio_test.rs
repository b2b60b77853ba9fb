use std::path::Path;

use skriva::application::ports::{AudioNormalizer, MediaError};
use skriva::infrastructure::audio::{decode_to_pcm, SymphoniaNormalizer};

fn write_wav(path: &Path, sample_rate: u32, samples: &[i16]) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for &s in samples {
        writer.write_sample(s).unwrap();
    }
    writer.finalize().unwrap();
}

fn build_wav_bytes(sample_rate: u32, samples: &[i16]) -> Vec<u8> {
    let num_samples = samples.len() as u32;
    let byte_rate = sample_rate * 2;
    let data_size = num_samples * 2;
    let file_size = 36 + data_size;

    let mut wav = Vec::with_capacity(44 + data_size as usize);
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&file_size.to_le_bytes());
    wav.extend_from_slice(b"WAVE");
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&1u16.to_le_bytes()); // mono
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&2u16.to_le_bytes()); // block align
    wav.extend_from_slice(&16u16.to_le_bytes()); // bits per sample
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_size.to_le_bytes());
    for &s in samples {
        wav.extend_from_slice(&s.to_le_bytes());
    }
    wav
}

#[test]
fn given_wav_bytes_when_decoding_then_returns_pcm_samples() {
    let wav = build_wav_bytes(16_000, &vec![1000i16; 1600]);

    let pcm = decode_to_pcm(&wav).unwrap();

    assert!(!pcm.is_empty());
}

#[test]
fn given_wav_at_44100hz_when_decoding_then_resampled_to_fewer_samples() {
    let wav = build_wav_bytes(44_100, &vec![1000i16; 44_100]);

    let pcm = decode_to_pcm(&wav).unwrap();

    assert!(!pcm.is_empty());
    // 1s @ 44.1kHz resamples to roughly 16k samples
    assert!(pcm.len() < 20_000);
}

#[test]
fn given_garbage_bytes_when_decoding_then_unreadable_error() {
    let garbage = vec![0xFFu8; 128];

    let result = decode_to_pcm(&garbage);

    assert!(matches!(result, Err(MediaError::Unreadable(_))));
}

#[tokio::test]
async fn given_already_normalized_wav_when_normalizing_then_returned_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.wav");
    write_wav(&input, 16_000, &vec![500i16; 32_000]);

    let normalizer = SymphoniaNormalizer::new(dir.path().join("work")).unwrap();
    let audio = normalizer.normalize(&input).await.unwrap();

    assert!(!audio.was_converted);
    assert_eq!(audio.path, input);
    assert_eq!(audio.sample_rate, 16_000);
    assert!((audio.duration - 2.0).abs() < 0.01);
}

#[tokio::test]
async fn given_non_target_rate_wav_when_normalizing_then_converted_copy_written() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.wav");
    write_wav(&input, 8_000, &vec![500i16; 8_000]);

    let normalizer = SymphoniaNormalizer::new(dir.path().join("work")).unwrap();
    let audio = normalizer.normalize(&input).await.unwrap();

    assert!(audio.was_converted);
    assert_ne!(audio.path, input);
    assert!(audio.path.exists());
    assert!((audio.duration - 1.0).abs() < 0.1);
}

#[tokio::test]
async fn given_long_audio_when_split_then_chunk_files_cover_the_waveform() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.wav");
    // 10s at 16kHz
    write_wav(&input, 16_000, &vec![500i16; 160_000]);

    let normalizer = SymphoniaNormalizer::new(dir.path().join("work")).unwrap();
    let audio = normalizer.normalize(&input).await.unwrap();
    let chunks = normalizer.split_chunks(&audio, 4.0).await.unwrap();

    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[0].start_time, 0.0);
    assert_eq!(chunks[1].start_time, 4.0);
    assert_eq!(chunks[2].start_time, 8.0);
    assert!((chunks[2].duration - 2.0).abs() < 0.01);
    for chunk in &chunks {
        assert!(chunk.path.exists());
    }
}

#[tokio::test]
async fn given_quiet_recording_when_enhanced_then_peak_normalized() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.wav");
    write_wav(&input, 16_000, &vec![1000i16; 16_000]);

    let normalizer = SymphoniaNormalizer::new(dir.path().join("work")).unwrap();
    let enhanced = normalizer.enhance(&input).await.unwrap();

    let mut reader = hound::WavReader::open(&enhanced).unwrap();
    let peak = reader
        .samples::<i16>()
        .map(|s| s.unwrap().abs())
        .max()
        .unwrap();
    assert!(peak > 25_000, "peak was not raised: {peak}");
}
