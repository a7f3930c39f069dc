pub mod model_provider;
pub mod speech_recognizer;
