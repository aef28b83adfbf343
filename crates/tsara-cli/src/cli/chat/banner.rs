//! Welcome banner display for chat sessions.

use console::style;

/// Example questions offered while the conversation is empty.
pub const SUGGESTIONS: [&str; 3] = [
    "What is artificial intelligence?",
    "Explain the concept of retrieval-augmented generation.",
    "Which offices can help me with a residence permit?",
];

/// Banner shown at startup and after `/clear`.
///
/// Shows the service endpoint and a short session id, plus example
/// questions when `empty` is set.
pub fn welcome_banner(endpoint: &str, session_id: &str, empty: bool) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str(&format!("  {}\n", style("Tsara").cyan().bold()));
    out.push_str(&format!(
        "  {}\n\n",
        style("Ask a question to start the conversation.").dim()
    ));
    out.push_str(&format!("  {}  {}\n", style("Service:").bold(), style(endpoint).dim()));
    out.push_str(&format!(
        "  {}  {}\n",
        style("Session:").bold(),
        style(&session_id[..8.min(session_id.len())]).dim()
    ));

    if empty {
        out.push_str(&format!("\n  {}\n", style("Try asking:").bold()));
        for suggestion in SUGGESTIONS {
            out.push_str(&format!("    {} {suggestion}\n", style("?").cyan()));
        }
    }

    out.push('\n');
    out.push_str(&format!(
        "  {}\n",
        style("Type /help for commands, Ctrl+D to exit").dim()
    ));
    out.push_str(&format!("  {}\n", style("---").dim()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_shows_endpoint_and_short_session() {
        console::set_colors_enabled(false);
        let banner = welcome_banner(
            "http://127.0.0.1:8000",
            "01929f3a-7b2c-7d00-8000-000000000000",
            false,
        );
        assert!(banner.contains("http://127.0.0.1:8000"));
        assert!(banner.contains("01929f3a"));
        assert!(!banner.contains("7b2c"));
        assert!(!banner.contains(SUGGESTIONS[0]));
    }

    #[test]
    fn empty_conversation_lists_suggestions() {
        console::set_colors_enabled(false);
        let banner = welcome_banner("http://localhost", "abc", true);
        for suggestion in SUGGESTIONS {
            assert!(banner.contains(suggestion));
        }
    }
}
