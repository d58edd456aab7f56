pub mod flow;
pub mod prompts;

pub use flow::{ensure_config, prompt_for_model, reselect_model};
pub use prompts::choose_model_from;
