use skriva::application::ports::{RawSegment, RawTranscription, RawWord};
use skriva::application::services::{merge_chunk_results, normalize_raw, shift_segments};

fn raw(text: &str, segments: Vec<RawSegment>) -> RawTranscription {
    RawTranscription {
        text: text.to_string(),
        language: "en".to_string(),
        segments,
    }
}

fn raw_segment(start: f64, end: f64, text: &str) -> RawSegment {
    RawSegment {
        start,
        end,
        text: text.to_string(),
        avg_logprob: -0.3,
        words: None,
    }
}

#[test]
fn given_raw_output_when_normalized_then_timestamps_rounded_and_ids_dense() {
    let raw = raw(
        "  hello world  ",
        vec![
            raw_segment(0.123456, 1.987654, " hello "),
            raw_segment(2.0, 3.5, " world "),
        ],
    );

    let result = normalize_raw(raw, 3.5, 0.8);

    assert_eq!(result.text, "hello world");
    assert_eq!(result.segments[0].id, 0);
    assert_eq!(result.segments[1].id, 1);
    assert_eq!(result.segments[0].start, 0.12);
    assert_eq!(result.segments[0].end, 1.99);
    assert_eq!(result.segments[0].text, "hello");
    assert_eq!(result.metadata.word_count, 2);
    assert_eq!(result.metadata.segment_count, 2);
    assert_eq!(result.metadata.chunk_count, 1);
}

#[test]
fn given_word_timings_when_shifted_then_words_move_with_segments() {
    let raw = raw(
        "one",
        vec![RawSegment {
            start: 1.0,
            end: 2.0,
            text: "one".to_string(),
            avg_logprob: -0.1,
            words: Some(vec![RawWord {
                word: "one".to_string(),
                start: 1.2,
                end: 1.8,
                probability: 0.95,
            }]),
        }],
    );
    let mut result = normalize_raw(raw, 2.0, 0.1);

    shift_segments(&mut result.segments, 300.0);

    assert_eq!(result.segments[0].start, 301.0);
    assert_eq!(result.segments[0].end, 302.0);
    let words = result.segments[0].words.as_ref().unwrap();
    assert_eq!(words[0].start, 301.2);
    assert_eq!(words[0].end, 301.8);
}

#[test]
fn given_chunk_results_when_merged_then_text_joined_and_ids_reassigned() {
    let first = normalize_raw(
        raw("first part", vec![raw_segment(0.0, 5.0, "first part")]),
        5.0,
        0.5,
    );
    let mut second = normalize_raw(
        raw("second part", vec![raw_segment(0.0, 5.0, "second part")]),
        5.0,
        0.5,
    );
    shift_segments(&mut second.segments, 5.0);

    let merged = merge_chunk_results(vec![first, second]);

    assert_eq!(merged.text, "first part second part");
    assert_eq!(merged.segments.len(), 2);
    assert_eq!(merged.segments[0].id, 0);
    assert_eq!(merged.segments[1].id, 1);
    assert_eq!(merged.segments[1].start, 5.0);
    assert_eq!(merged.metadata.chunk_count, 2);
    assert_eq!(merged.metadata.audio_duration, 10.0);
    assert_eq!(merged.metadata.word_count, 4);
}

#[test]
fn given_empty_chunk_in_middle_when_merged_then_no_double_spaces() {
    let first = normalize_raw(raw("first", vec![raw_segment(0.0, 5.0, "first")]), 5.0, 0.1);
    let empty = normalize_raw(raw("", Vec::new()), 5.0, 0.1);
    let last = normalize_raw(raw("last", vec![raw_segment(0.0, 5.0, "last")]), 5.0, 0.1);

    let merged = merge_chunk_results(vec![first, empty, last]);

    assert_eq!(merged.text, "first last");
    assert_eq!(merged.metadata.chunk_count, 3);
}

#[test]
fn given_no_chunks_when_merged_then_empty_result() {
    let merged = merge_chunk_results(Vec::new());

    assert!(merged.text.is_empty());
    assert!(merged.segments.is_empty());
    assert_eq!(merged.metadata.segment_count, 0);
}
