pub mod engine;
pub mod image_client;
pub mod llm_client;
pub mod prompt_builder;
pub mod protocol;
pub mod response_parser;
pub mod story;
pub mod turbulence;
