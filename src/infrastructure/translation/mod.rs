mod libre_translate;
mod my_memory;

pub use libre_translate::LibreTranslateProvider;
pub use my_memory::MyMemoryProvider;
