use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::mpsc;

use skriva::application::ports::{JobRepository, TranslationProvider};
use skriva::application::services::{
    MediaWorker, PipelineOrchestrator, TranslationChain, TranslationChainConfig,
};
use skriva::infrastructure::acquisition::YtDlpAcquirer;
use skriva::infrastructure::audio::SymphoniaNormalizer;
use skriva::infrastructure::observability::{init_tracing, TracingConfig};
use skriva::infrastructure::persistence::InMemoryJobRepository;
use skriva::infrastructure::transcription::{FallbackTranscriber, WhisperApiTranscriber};
use skriva::infrastructure::translation::{LibreTranslateProvider, MyMemoryProvider};
use skriva::presentation::{create_router, AppState, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::load()?;
    init_tracing(TracingConfig::default(), settings.server.port);

    let work_dir = PathBuf::from(&settings.media.work_dir);
    let staging_dir = work_dir.join("uploads");
    tokio::fs::create_dir_all(&staging_dir).await?;

    let normalizer = Arc::new(SymphoniaNormalizer::new(work_dir.join("audio"))?);

    let primary = Arc::new(WhisperApiTranscriber::new(
        settings.transcription.api_key.clone(),
        settings.transcription.base_url.clone(),
        Some(settings.transcription.model.clone()),
    ));
    let fallback = Arc::new(WhisperApiTranscriber::new(
        settings.transcription.api_key.clone(),
        settings.transcription.base_url.clone(),
        Some(settings.transcription.fallback_model.clone()),
    ));
    let transcriber = Arc::new(FallbackTranscriber::new(primary, fallback));

    let providers: Vec<Arc<dyn TranslationProvider>> = vec![
        Arc::new(LibreTranslateProvider::new(
            settings.translation.libretranslate_url.clone(),
            settings.translation.libretranslate_api_key.clone(),
        )),
        Arc::new(MyMemoryProvider::new(settings.translation.mymemory_url.clone())),
    ];
    let translator = Arc::new(TranslationChain::new(
        providers,
        TranslationChainConfig {
            cache_max_size: settings.translation.cache_max_size,
            min_request_interval: Duration::from_millis(
                settings.translation.min_request_interval_ms,
            ),
            max_text_length: settings.translation.max_text_length,
            chunk_overlap: settings.translation.chunk_overlap,
        },
    ));

    tracing::info!(
        providers = translator.provider_count(),
        "Translation chain configured"
    );

    let acquirer = Arc::new(YtDlpAcquirer::new(
        settings.media.ytdlp_binary.clone(),
        work_dir.join("downloads"),
    )?);

    let repository: Arc<dyn JobRepository> = Arc::new(InMemoryJobRepository::new());

    let orchestrator = Arc::new(PipelineOrchestrator::new(
        normalizer,
        transcriber,
        Arc::clone(&translator),
    ));

    let (job_sender, job_receiver) = mpsc::channel(settings.worker.queue_capacity);
    let worker = MediaWorker::new(
        job_receiver,
        orchestrator,
        acquirer,
        Arc::clone(&repository),
        Duration::from_secs(settings.worker.soft_time_limit_secs),
        settings.media.max_remote_duration_secs,
        settings.media.max_chunk_duration_secs,
    );
    tokio::spawn(worker.run());

    let state = AppState {
        job_repository: repository,
        job_sender,
        translator,
        staging_dir,
        max_file_size_bytes: settings.media.max_file_size_mb * 1024 * 1024,
    };

    let router = create_router(state);

    let addr = SocketAddr::new(settings.server.host.parse()?, settings.server.port);
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
