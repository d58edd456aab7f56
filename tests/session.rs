#[path = "support/session_harness.rs"]
mod session_harness;

#[path = "session/chat_flow.rs"]
mod chat_flow;
#[path = "session/config_flow.rs"]
mod config_flow;
#[path = "session/rotation.rs"]
mod rotation;
