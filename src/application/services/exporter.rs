use serde::Serialize;

use crate::domain::{OutputFormat, TranscriptionResult, TranslationResult};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct ExportBundle<'a> {
    transcription: &'a TranscriptionResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    translation: Option<&'a TranslationResult>,
}

/// Synthesize one requested output format from the merged transcription
/// (and translation, when present).
pub fn export_format(
    format: OutputFormat,
    transcription: &TranscriptionResult,
    translation: Option<&TranslationResult>,
) -> Result<String, ExportError> {
    match format {
        OutputFormat::Text => Ok(transcription.text.clone()),
        OutputFormat::Json => {
            let bundle = ExportBundle {
                transcription,
                translation,
            };
            Ok(serde_json::to_string_pretty(&bundle)?)
        }
        OutputFormat::Srt => Ok(export_srt(transcription)),
        OutputFormat::Vtt => Ok(export_vtt(transcription)),
        OutputFormat::Csv => Ok(export_csv(transcription)),
    }
}

fn export_srt(result: &TranscriptionResult) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut index = 1;
    for segment in &result.segments {
        let text = segment.text.trim();
        if text.is_empty() {
            continue;
        }
        lines.push(index.to_string());
        lines.push(format!(
            "{} --> {}",
            seconds_to_srt_time(segment.start),
            seconds_to_srt_time(segment.end)
        ));
        lines.push(text.to_string());
        lines.push(String::new());
        index += 1;
    }
    lines.join("\n")
}

fn export_vtt(result: &TranscriptionResult) -> String {
    let mut lines: Vec<String> = vec!["WEBVTT".to_string(), String::new()];
    for segment in &result.segments {
        let text = segment.text.trim();
        if text.is_empty() {
            continue;
        }
        lines.push(format!(
            "{} --> {}",
            seconds_to_vtt_time(segment.start),
            seconds_to_vtt_time(segment.end)
        ));
        lines.push(text.to_string());
        lines.push(String::new());
    }
    lines.join("\n")
}

fn export_csv(result: &TranscriptionResult) -> String {
    let mut lines = vec!["Start,End,Duration,Text,Confidence".to_string()];
    for segment in &result.segments {
        let text = segment.text.trim();
        if text.is_empty() {
            continue;
        }
        let escaped = text.replace('"', "\"\"");
        lines.push(format!(
            "{},{},{:.2},\"{}\",{:.3}",
            segment.start,
            segment.end,
            segment.end - segment.start,
            escaped,
            segment.confidence
        ));
    }
    lines.join("\n")
}

/// `HH:MM:SS,mmm`
pub fn seconds_to_srt_time(seconds: f64) -> String {
    let (hours, minutes, secs, millis) = split_time(seconds);
    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis)
}

/// `HH:MM:SS.mmm`
pub fn seconds_to_vtt_time(seconds: f64) -> String {
    let (hours, minutes, secs, millis) = split_time(seconds);
    format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, secs, millis)
}

fn split_time(seconds: f64) -> (u64, u64, u64, u64) {
    let seconds = seconds.max(0.0);
    let total_millis = (seconds * 1000.0).round() as u64;
    let millis = total_millis % 1000;
    let total_secs = total_millis / 1000;
    (total_secs / 3600, (total_secs % 3600) / 60, total_secs % 60, millis)
}
