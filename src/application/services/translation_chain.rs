use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::application::ports::{DetectedLanguage, TranslationProvider};
use crate::domain::{normalize_language_code, TranslationResult};

#[derive(Debug, Clone)]
pub struct TranslationChainConfig {
    pub cache_max_size: usize,
    /// Minimum interval between calls to the same provider.
    pub min_request_interval: Duration,
    /// Texts longer than this are split and translated piecewise.
    pub max_text_length: usize,
    /// Configured but not applied when slicing; chunks are cut at sentence
    /// boundaries with no characters reused. Kept for compatibility with
    /// the original chunking configuration.
    pub chunk_overlap: usize,
}

impl Default for TranslationChainConfig {
    fn default() -> Self {
        Self {
            cache_max_size: 1000,
            min_request_interval: Duration::from_millis(500),
            max_text_length: 5000,
            chunk_overlap: 50,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TranslationChainError {
    #[error("empty text provided")]
    EmptyText,
    #[error("all {attempted} translation providers failed")]
    AllProvidersExhausted { attempted: usize },
    /// Long-text translation fails as a whole when any piece fails; the
    /// pieces translated so far are carried for diagnostics.
    #[error("failed to translate chunk {index} of {total}")]
    ChunkFailed {
        index: usize,
        total: usize,
        partial: String,
    },
    #[error("language detection failed with all providers")]
    DetectionFailed,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    source: String,
    target: String,
    text_hash: u64,
}

impl CacheKey {
    fn new(source: &str, target: &str, text: &str) -> Self {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        Self {
            source: source.to_string(),
            target: target.to_string(),
            text_hash: hasher.finish(),
        }
    }
}

/// Bounded FIFO cache: insertion at capacity evicts the single oldest
/// entry by insertion order, irrespective of access recency.
struct FifoCache {
    map: HashMap<CacheKey, TranslationResult>,
    order: VecDeque<CacheKey>,
    capacity: usize,
}

impl FifoCache {
    fn new(capacity: usize) -> Self {
        Self {
            map: HashMap::new(),
            order: VecDeque::new(),
            capacity,
        }
    }

    fn get(&self, key: &CacheKey) -> Option<TranslationResult> {
        self.map.get(key).cloned()
    }

    fn insert(&mut self, key: CacheKey, value: TranslationResult) {
        if self.capacity == 0 {
            return;
        }
        if !self.map.contains_key(&key) && self.map.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.map.remove(&oldest);
            }
        }
        if self.map.insert(key.clone(), value).is_none() {
            self.order.push_back(key);
        }
    }
}

/// Ordered chain of translation back-ends. Providers are tried strictly in
/// configured priority order; the first non-empty result wins. Successful
/// results are cached; a per-provider minimum inter-call interval throttles
/// the caller cooperatively.
pub struct TranslationChain {
    providers: Vec<Arc<dyn TranslationProvider>>,
    config: TranslationChainConfig,
    cache: Mutex<FifoCache>,
    last_request: Mutex<HashMap<String, Instant>>,
}

impl TranslationChain {
    pub fn new(
        providers: Vec<Arc<dyn TranslationProvider>>,
        config: TranslationChainConfig,
    ) -> Self {
        tracing::info!(
            providers = providers.len(),
            cache_max_size = config.cache_max_size,
            "Translation chain initialized"
        );
        let cache = Mutex::new(FifoCache::new(config.cache_max_size));
        Self {
            providers,
            config,
            cache,
            last_request: Mutex::new(HashMap::new()),
        }
    }

    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// Translate `text` into `target_lang`. Language codes are normalized
    /// before cache lookups, provider calls, and rate-limit bookkeeping.
    pub async fn translate(
        &self,
        text: &str,
        target_lang: &str,
        source_lang: &str,
    ) -> Result<TranslationResult, TranslationChainError> {
        if text.trim().is_empty() {
            return Err(TranslationChainError::EmptyText);
        }

        let source = normalize_language_code(source_lang);
        let target = normalize_language_code(target_lang);

        if text.len() > self.config.max_text_length {
            return self.translate_long(text, &source, &target).await;
        }

        self.translate_piece(text, &source, &target).await
    }

    /// Single-piece path: cache, then the provider chain.
    async fn translate_piece(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<TranslationResult, TranslationChainError> {
        let key = CacheKey::new(source, target, text);

        if let Some(mut cached) = self
            .cache
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&key)
        {
            cached.from_cache = true;
            tracing::debug!(source, target, "Translation served from cache");
            return Ok(cached);
        }

        for (index, provider) in self.providers.iter().enumerate() {
            self.apply_rate_limit(provider.name()).await;

            match provider.translate(text, source, target).await {
                Ok(translated) if !translated.trim().is_empty() => {
                    let result = TranslationResult {
                        original_text: text.to_string(),
                        translated_text: translated,
                        source_language: source.to_string(),
                        target_language: target.to_string(),
                        provider: provider.name().to_string(),
                        provider_index: index,
                        from_cache: false,
                        chunks: None,
                    };
                    self.cache
                        .lock()
                        .unwrap_or_else(|e| e.into_inner())
                        .insert(key, result.clone());
                    tracing::info!(provider = provider.name(), "Translation successful");
                    return Ok(result);
                }
                Ok(_) => {
                    tracing::warn!(
                        provider = provider.name(),
                        "Provider returned empty translation"
                    );
                }
                Err(e) => {
                    tracing::warn!(provider = provider.name(), error = %e, "Provider failed");
                }
            }
        }

        Err(TranslationChainError::AllProvidersExhausted {
            attempted: self.providers.len(),
        })
    }

    /// Long-text path: sentence-aligned pieces translated independently
    /// through the same fallback+cache+rate-limit logic, joined with single
    /// spaces. Any piece failing fails the whole call.
    async fn translate_long(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<TranslationResult, TranslationChainError> {
        let piece_size = self
            .config
            .max_text_length
            .saturating_sub(self.config.chunk_overlap)
            .max(1);
        let pieces = split_into_sentence_chunks(text, piece_size);
        let total = pieces.len();
        tracing::info!(pieces = total, "Translating long text in chunks");

        let mut translated: Vec<String> = Vec::with_capacity(total);
        let mut provider = String::new();
        let mut provider_index = 0;

        for (i, piece) in pieces.iter().enumerate() {
            match self.translate_piece(piece, source, target).await {
                Ok(result) => {
                    if provider.is_empty() {
                        provider = result.provider;
                        provider_index = result.provider_index;
                    }
                    translated.push(result.translated_text);
                }
                Err(e) => {
                    tracing::error!(chunk = i + 1, total, error = %e, "Chunk translation failed");
                    return Err(TranslationChainError::ChunkFailed {
                        index: i + 1,
                        total,
                        partial: translated.join(" "),
                    });
                }
            }
        }

        Ok(TranslationResult {
            original_text: text.to_string(),
            translated_text: translated.join(" "),
            source_language: source.to_string(),
            target_language: target.to_string(),
            provider,
            provider_index,
            from_cache: false,
            chunks: Some(total),
        })
    }

    /// First provider that succeeds wins.
    pub async fn detect_language(
        &self,
        text: &str,
    ) -> Result<DetectedLanguage, TranslationChainError> {
        for provider in &self.providers {
            match provider.detect_language(text).await {
                Ok(detected) => return Ok(detected),
                Err(e) => {
                    tracing::warn!(provider = provider.name(), error = %e, "Detection failed");
                }
            }
        }
        Err(TranslationChainError::DetectionFailed)
    }

    /// Union of supported languages across all providers.
    pub async fn supported_languages(&self) -> BTreeMap<String, String> {
        let mut all = BTreeMap::new();
        for provider in &self.providers {
            match provider.supported_languages().await {
                Ok(languages) => all.extend(languages),
                Err(e) => {
                    tracing::warn!(provider = provider.name(), error = %e, "Language list failed");
                }
            }
        }
        all
    }

    /// Cooperative throttle: delay the current call until the minimum
    /// interval since this provider's last call has elapsed. Does not queue
    /// future calls.
    async fn apply_rate_limit(&self, provider_name: &str) {
        let wait = {
            let last = self.last_request.lock().unwrap_or_else(|e| e.into_inner());
            last.get(provider_name).and_then(|instant| {
                self.config
                    .min_request_interval
                    .checked_sub(instant.elapsed())
            })
        };

        if let Some(wait) = wait {
            if !wait.is_zero() {
                tokio::time::sleep(wait).await;
            }
        }

        self.last_request
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(provider_name.to_string(), Instant::now());
    }
}

/// Split text into sentence-boundary-aligned pieces of at most `max_len`
/// bytes. Sentences longer than `max_len` are hard-split so no piece ever
/// exceeds the limit.
pub fn split_into_sentence_chunks(text: &str, max_len: usize) -> Vec<String> {
    if text.len() <= max_len {
        return vec![text.to_string()];
    }

    let mut sentences: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        current.push(c);
        if matches!(c, '.' | '!' | '?') && chars.peek().is_some_and(|n| *n == ' ') {
            chars.next();
            sentences.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        sentences.push(current);
    }

    let mut pieces: Vec<String> = Vec::new();
    let mut piece = String::new();
    for sentence in sentences {
        for part in hard_split(&sentence, max_len) {
            if !piece.is_empty() && piece.len() + 1 + part.len() > max_len {
                pieces.push(std::mem::take(&mut piece));
            }
            if piece.is_empty() {
                piece = part;
            } else {
                piece.push(' ');
                piece.push_str(&part);
            }
        }
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}

fn hard_split(sentence: &str, max_len: usize) -> Vec<String> {
    if sentence.len() <= max_len {
        return vec![sentence.to_string()];
    }
    let mut parts = Vec::new();
    let mut current = String::new();
    for c in sentence.chars() {
        if current.len() + c.len_utf8() > max_len {
            parts.push(std::mem::take(&mut current));
        }
        current.push(c);
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}
