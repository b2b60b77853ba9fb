use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub media: MediaSettings,
    pub transcription: TranscriptionSettings,
    pub translation: TranslationSettings,
    pub worker: WorkerSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaSettings {
    pub work_dir: String,
    pub max_file_size_mb: usize,
    /// Remote references longer than this are rejected at probe time.
    pub max_remote_duration_secs: f64,
    pub max_chunk_duration_secs: f64,
    pub ytdlp_binary: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptionSettings {
    pub api_key: String,
    pub base_url: Option<String>,
    pub model: String,
    /// Engine tried when the primary model proves unusable.
    pub fallback_model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranslationSettings {
    pub libretranslate_url: String,
    pub libretranslate_api_key: Option<String>,
    pub mymemory_url: Option<String>,
    pub cache_max_size: usize,
    pub min_request_interval_ms: u64,
    pub max_text_length: usize,
    pub chunk_overlap: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkerSettings {
    pub queue_capacity: usize,
    pub soft_time_limit_secs: u64,
}

impl Settings {
    /// Layered load: built-in defaults, then an optional `config/default`
    /// file, then `SKRIVA__`-prefixed environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("media.work_dir", "/tmp/skriva")?
            .set_default("media.max_file_size_mb", 500)?
            .set_default("media.max_remote_duration_secs", 7200.0)?
            .set_default("media.max_chunk_duration_secs", 300.0)?
            .set_default("media.ytdlp_binary", "yt-dlp")?
            .set_default("transcription.api_key", "")?
            .set_default("transcription.model", "whisper-1")?
            .set_default("transcription.fallback_model", "whisper-1")?
            .set_default("translation.libretranslate_url", "http://localhost:5050")?
            .set_default("translation.cache_max_size", 1000)?
            .set_default("translation.min_request_interval_ms", 500)?
            .set_default("translation.max_text_length", 5000)?
            .set_default("translation.chunk_overlap", 50)?
            .set_default("worker.queue_capacity", 64)?
            .set_default("worker.soft_time_limit_secs", 3300)?
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::Environment::with_prefix("SKRIVA").separator("__"))
            .build()?
            .try_deserialize()
    }
}
