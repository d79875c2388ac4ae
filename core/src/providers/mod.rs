pub mod factory;
pub mod openai;

pub use factory::{create_provider, env_has_api_key};
pub use openai::OpenAIProvider;
