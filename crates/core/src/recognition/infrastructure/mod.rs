pub mod model_resolver;
pub mod whisper_model_provider;
pub mod whisper_recognizer;
