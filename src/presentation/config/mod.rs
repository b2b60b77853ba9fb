mod settings;

pub use settings::{
    MediaSettings, ServerSettings, Settings, TranscriptionSettings, TranslationSettings,
    WorkerSettings,
};
