use crate::application::ports::RawTranscription;
use crate::domain::{
    TranscriptionMetadata, TranscriptionResult, TranscriptionSegment, WordTiming,
};

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Normalize raw model output for one chunk into a domain result: rounded
/// timestamps, dense segment ids, recomputed counts.
pub fn normalize_raw(
    raw: RawTranscription,
    audio_duration: f64,
    processing_time: f64,
) -> TranscriptionResult {
    let text = raw.text.trim().to_string();
    let segments: Vec<TranscriptionSegment> = raw
        .segments
        .into_iter()
        .enumerate()
        .map(|(i, seg)| TranscriptionSegment {
            id: i,
            start: round2(seg.start),
            end: round2(seg.end),
            text: seg.text.trim().to_string(),
            confidence: seg.avg_logprob,
            words: seg.words.map(|words| {
                words
                    .into_iter()
                    .map(|w| WordTiming {
                        word: w.word,
                        start: round2(w.start),
                        end: round2(w.end),
                        confidence: w.probability,
                    })
                    .collect()
            }),
        })
        .collect();

    let metadata = TranscriptionMetadata {
        audio_duration: round2(audio_duration),
        processing_time: round2(processing_time),
        word_count: text.split_whitespace().count(),
        character_count: text.chars().count(),
        segment_count: segments.len(),
        chunk_count: 1,
    };

    TranscriptionResult {
        text,
        language: raw.language,
        segments,
        metadata,
    }
}

/// Shift segment timestamps by a chunk's start offset. Applied before
/// merging so multi-chunk output is indistinguishable from a single pass.
pub fn shift_segments(segments: &mut [TranscriptionSegment], offset: f64) {
    if offset == 0.0 {
        return;
    }
    for segment in segments.iter_mut() {
        segment.start = round2(segment.start + offset);
        segment.end = round2(segment.end + offset);
        if let Some(words) = segment.words.as_mut() {
            for word in words.iter_mut() {
                word.start = round2(word.start + offset);
                word.end = round2(word.end + offset);
            }
        }
    }
}

/// Stitch per-chunk results (already offset-adjusted) into one result.
/// Texts are space-joined skipping empty chunks, segments concatenated in
/// chunk order and re-assigned dense ids, metadata recomputed from the
/// merged structure.
pub fn merge_chunk_results(parts: Vec<TranscriptionResult>) -> TranscriptionResult {
    if parts.is_empty() {
        return TranscriptionResult::empty("unknown");
    }

    let chunk_count = parts.len();
    let language = parts[0].language.clone();

    let mut texts: Vec<String> = Vec::new();
    let mut segments: Vec<TranscriptionSegment> = Vec::new();
    let mut audio_duration = 0.0;
    let mut processing_time = 0.0;

    for part in parts {
        if !part.text.is_empty() {
            texts.push(part.text);
        }
        segments.extend(part.segments);
        audio_duration += part.metadata.audio_duration;
        processing_time += part.metadata.processing_time;
    }

    for (i, segment) in segments.iter_mut().enumerate() {
        segment.id = i;
    }

    let text = texts.join(" ");
    let metadata = TranscriptionMetadata {
        audio_duration: round2(audio_duration),
        processing_time: round2(processing_time),
        word_count: text.split_whitespace().count(),
        character_count: text.chars().count(),
        segment_count: segments.len(),
        chunk_count,
    };

    TranscriptionResult {
        text,
        language,
        segments,
        metadata,
    }
}
