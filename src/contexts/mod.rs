mod file_extractor;
mod http_client;
mod model_invoker;
mod staged_generator;

pub use file_extractor::{extract_files, ExtractedFile, DEFAULT_FALLBACK_PATH};
pub use http_client::{HttpGenerationClient, SamplingParams};
pub use model_invoker::{
    CallExhausted, GenerationCall, GenerationRequest, ModelInvoker, ModelResponse, Sleeper,
    ThreadSleeper, TransportError,
};
pub use staged_generator::{GenerationStage, NoopObserver, StagedGenerator, StageObserver};
