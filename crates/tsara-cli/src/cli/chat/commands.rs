//! Slash command parsing for the chat loop.
//!
//! Commands start with `/`. The bare words `quit`, `q`, and `exit` also end
//! the session.

use console::style;

#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// Discard the conversation and start a new session.
    Clear,
    /// Re-render the whole conversation.
    History,
    /// Check that the answer service is up.
    Health,
    /// Ask the answer service to rebuild its index.
    Reload,
    /// End the chat session.
    Exit,
    Unknown(String),
}

/// Parse user input as a command.
///
/// Returns `None` for anything that should be sent as a question.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();

    if matches!(trimmed.to_lowercase().as_str(), "quit" | "q" | "exit") {
        return Some(ChatCommand::Exit);
    }
    if !trimmed.starts_with('/') {
        return None;
    }

    let cmd = trimmed
        .split_whitespace()
        .next()
        .unwrap_or(trimmed)
        .to_lowercase();

    match cmd.as_str() {
        "/help" | "/h" | "/?" => Some(ChatCommand::Help),
        "/clear" | "/new" => Some(ChatCommand::Clear),
        "/history" => Some(ChatCommand::History),
        "/health" => Some(ChatCommand::Health),
        "/reload" => Some(ChatCommand::Reload),
        "/exit" | "/quit" | "/q" => Some(ChatCommand::Exit),
        other => Some(ChatCommand::Unknown(other.to_string())),
    }
}

/// Help text listing all available commands.
pub fn help_text() -> String {
    let rows = [
        ("/help", "Show this help message"),
        ("/clear", "Clear the conversation and start over"),
        ("/history", "Show the whole conversation"),
        ("/health", "Check the answer service"),
        ("/reload", "Reload the service's documents"),
        ("/exit", "End the chat session"),
    ];

    let mut out = String::new();
    out.push_str(&format!("\n  {}\n\n", style("Available commands:").bold()));
    for (name, description) in rows {
        out.push_str(&format!("  {}  {description}\n", style(format!("{name:<9}")).cyan()));
    }
    out.push_str(&format!(
        "\n  {}\n",
        style("You can ask again before a reply arrives. Ctrl+D to exit.").dim()
    ));
    out
}
