//! Terminal rendering of message views.
//!
//! `ReplyRenderer` turns the presentation-neutral [`MessageView`] into styled
//! text: `termimad` for reply content, `console` for labels and badges. Contact
//! affordances become OSC-8 hyperlinks when the terminal takes colors, so a
//! phone number or email can be opened directly.

use std::time::Duration;

use console::style;
use termimad::MadSkin;

use tsara_core::render::{ContactLine, EntityCard, MessageView};
use tsara_core::render::{ReplyCard, ReplySection, UserBubble};

const INDENT: &str = "  ";

pub struct ReplyRenderer {
    skin: MadSkin,
    width: usize,
    links: bool,
}

impl ReplyRenderer {
    /// Renderer sized to the current terminal.
    pub fn new() -> Self {
        let mut skin = MadSkin::default_dark();
        skin.inline_code.set_fg(termimad::crossterm::style::Color::Yellow);

        let (_, cols) = console::Term::stdout().size();
        Self {
            skin,
            width: (cols as usize).saturating_sub(INDENT.len() * 2).max(20),
            links: console::colors_enabled(),
        }
    }

    /// Unstyled renderer with a fixed width and no escape sequences.
    #[cfg(test)]
    pub(crate) fn plain(width: usize) -> Self {
        Self {
            skin: MadSkin::no_style(),
            width,
            links: false,
        }
    }

    pub fn render(&self, view: &MessageView) -> String {
        match view {
            MessageView::User(bubble) => self.render_user(bubble),
            MessageView::Reply(card) => self.render_reply(card),
        }
    }

    pub fn render_user(&self, bubble: &UserBubble) -> String {
        let mut out = format!("\n{INDENT}{}\n", style("You").green().bold());
        out.push_str(&indent(&bubble.content, INDENT));
        out.push_str(&format!("{INDENT}{}\n", style(&bubble.time).dim()));
        out
    }

    /// Topic label, content, sections, then the time.
    pub fn render_reply(&self, card: &ReplyCard) -> String {
        let mut out = format!("\n{INDENT}{}", style("Tsara").cyan().bold());
        if let Some(topic) = &card.topic {
            out.push_str(&format!("  {}", style(format!("[{topic}]")).magenta()));
        }
        out.push('\n');

        let content = self.skin.text(&card.content, Some(self.width)).to_string();
        out.push_str(&indent(content.trim_end(), INDENT));

        for section in &card.sections {
            out.push('\n');
            match section {
                ReplySection::Entities(entities) => {
                    let header = format!("Contacts ({})", entities.len());
                    out.push_str(&format!("{INDENT}{}\n", style(header).bold()));
                    for entity in entities {
                        out.push_str(&self.render_entity(entity));
                    }
                }
                ReplySection::Tools(tools) => {
                    let badges: Vec<String> = tools
                        .iter()
                        .map(|tool| style(format!("[{tool}]")).blue().to_string())
                        .collect();
                    out.push_str(&format!(
                        "{INDENT}{} {}\n",
                        style("Tools").bold(),
                        badges.join(" ")
                    ));
                }
                ReplySection::Sources(sources) => {
                    out.push_str(&format!("{INDENT}{}\n", style("Sources").bold()));
                    for source in sources {
                        out.push_str(&format!("{INDENT}  \u{2022} {}\n", style(source).dim()));
                    }
                }
            }
        }

        out.push_str(&format!("{INDENT}{}\n", style(&card.time).dim()));
        out
    }

    fn render_entity(&self, entity: &EntityCard) -> String {
        let mut out = format!("{INDENT}  {}. {}", entity.number, style(&entity.name).bold());
        if let Some(kind) = &entity.kind {
            out.push_str(&format!("  {}", style(format!("[{kind}]")).yellow()));
        }
        out.push('\n');

        for line in &entity.lines {
            out.push_str(&format!(
                "{INDENT}     {} {}\n",
                style(format!("{}:", line.field.label())).dim(),
                self.contact_text(line)
            ));
        }
        out
    }

    fn contact_text(&self, line: &ContactLine) -> String {
        match line.action.target() {
            Some(target) => hyperlink(&line.text, target, self.links),
            None => line.text.clone(),
        }
    }

    /// Dim footer printed after a reply: `| 1.4s · http://host`.
    pub fn timing_footer(&self, elapsed: Duration, endpoint: &str) -> String {
        format!(
            "{INDENT}{} {} {} {}\n",
            style("|").dim(),
            style(format!("{:.1}s", elapsed.as_secs_f64())).dim(),
            style("\u{00b7}").dim(),
            style(endpoint).dim(),
        )
    }
}

impl Default for ReplyRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Wrap `text` in an OSC-8 hyperlink to `target` when `enabled`.
pub fn hyperlink(text: &str, target: &str, enabled: bool) -> String {
    if enabled {
        format!("\x1b]8;;{target}\x1b\\{text}\x1b]8;;\x1b\\")
    } else {
        text.to_string()
    }
}

fn indent(text: &str, prefix: &str) -> String {
    let mut out = String::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            out.push('\n');
        } else {
            out.push_str(prefix);
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}
