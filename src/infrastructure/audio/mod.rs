mod decoder;
mod symphonia_normalizer;

pub use decoder::decode_to_pcm;
pub use symphonia_normalizer::SymphoniaNormalizer;
