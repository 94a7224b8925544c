pub mod classifier;
pub mod countdown;
pub mod dispatcher;
pub mod llm_client;
pub mod sanitizer;
pub mod speech;
