pub mod acquisition;
pub mod audio;
pub mod observability;
pub mod persistence;
pub mod transcription;
pub mod translation;
