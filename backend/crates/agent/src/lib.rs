pub mod anthropic;
pub mod executor;
pub mod messages;
pub mod model;
pub mod runner;
pub mod toolbox;

pub use anthropic::AnthropicClient;
pub use executor::{AgentError, AgentExecutor};
pub use model::{ChatModel, ModelError};
pub use runner::{process_one, EntityResolver, ResolveSource};
pub use toolbox::ToolBox;
