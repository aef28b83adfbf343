//! Interactive chat against the answer service.
//!
//! Questions go through a `ConversationController`; replies arrive on the
//! dispatcher's settlement channel and are rendered from controller events.
//! Entry point: `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod renderer;
