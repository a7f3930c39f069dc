pub mod source_loader;
pub mod wav_decoder;
