//! Presentation-neutral views of conversation messages.
//!
//! A reply is not rendered by type. Each optional research field becomes
//! its own section when it is present and non-empty, so any combination of
//! topic, entities, tools, and sources can appear on one card. User messages
//! always use the fixed bubble layout.

use chrono::{DateTime, Local, TimeZone, Utc};

use tsara_types::message::{ContactEntity, ConversationMessage, MessageRole};

/// Time-of-day format used on every bubble and card.
pub const TIME_FORMAT: &str = "%H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageView {
    User(UserBubble),
    Reply(ReplyCard),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserBubble {
    pub content: String,
    pub time: String,
}

/// An assistant reply: topic label, content, optional sections, time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyCard {
    pub topic: Option<String>,
    pub content: String,
    /// Only non-empty sections, in display order.
    pub sections: Vec<ReplySection>,
    /// Always rendered last.
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplySection {
    Entities(Vec<EntityCard>),
    /// Inline badges, order preserved, duplicates kept.
    Tools(Vec<String>),
    /// One bullet per source, order preserved, duplicates kept.
    Sources(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityCard {
    /// 1-based position in the entity list.
    pub number: usize,
    pub name: String,
    /// Category badge.
    pub kind: Option<String>,
    /// Present contact fields only, in address/phone/email/website order.
    pub lines: Vec<ContactLine>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactLine {
    pub field: ContactField,
    pub text: String,
    pub action: Affordance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    Address,
    Phone,
    Email,
    Website,
}

impl ContactField {
    pub fn label(&self) -> &'static str {
        match self {
            ContactField::Address => "Address",
            ContactField::Phone => "Phone",
            ContactField::Email => "Email",
            ContactField::Website => "Website",
        }
    }
}

/// What activating a contact line does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Affordance {
    None,
    /// Direct dial, as a `tel:` URI.
    Dial(String),
    /// Direct mail, as a `mailto:` URI.
    Mail(String),
    /// External link.
    Link(String),
}

impl Affordance {
    pub fn target(&self) -> Option<&str> {
        match self {
            Affordance::None => None,
            Affordance::Dial(uri) | Affordance::Mail(uri) | Affordance::Link(uri) => Some(uri),
        }
    }
}

/// Build the view for a message using the local time zone.
pub fn build_view(message: &ConversationMessage) -> MessageView {
    build_view_in(message, &Local)
}

/// Build the view for a message, formatting its time in `tz`.
pub fn build_view_in<Tz: TimeZone>(message: &ConversationMessage, tz: &Tz) -> MessageView
where
    Tz::Offset: std::fmt::Display,
{
    let time = time_of_day(message.timestamp(), tz);

    match message.role() {
        MessageRole::User => MessageView::User(UserBubble {
            content: message.content().to_string(),
            time,
        }),
        MessageRole::Assistant => MessageView::Reply(reply_card(message, time)),
    }
}

pub fn time_of_day<Tz: TimeZone>(timestamp: DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    timestamp.with_timezone(tz).format(TIME_FORMAT).to_string()
}

fn reply_card(message: &ConversationMessage, time: String) -> ReplyCard {
    let mut sections = Vec::new();

    let entities = message.entities();
    if !entities.is_empty() {
        let cards = entities
            .iter()
            .enumerate()
            .map(|(index, entity)| entity_card(index + 1, entity))
            .collect();
        sections.push(ReplySection::Entities(cards));
    }

    let tools = message.tools_used();
    if !tools.is_empty() {
        sections.push(ReplySection::Tools(tools.to_vec()));
    }

    let sources = message.sources();
    if !sources.is_empty() {
        sections.push(ReplySection::Sources(sources.to_vec()));
    }

    ReplyCard {
        topic: non_blank(message.topic()),
        content: message.content().to_string(),
        sections,
        time,
    }
}

fn entity_card(number: usize, entity: &ContactEntity) -> EntityCard {
    let mut lines = Vec::new();

    if let Some(address) = non_blank(entity.address.as_deref()) {
        lines.push(ContactLine {
            field: ContactField::Address,
            text: address,
            action: Affordance::None,
        });
    }
    if let Some(phone) = non_blank(entity.phone.as_deref()) {
        let dial: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
        lines.push(ContactLine {
            field: ContactField::Phone,
            action: Affordance::Dial(format!("tel:{dial}")),
            text: phone,
        });
    }
    if let Some(email) = non_blank(entity.email.as_deref()) {
        lines.push(ContactLine {
            field: ContactField::Email,
            action: Affordance::Mail(format!("mailto:{email}")),
            text: email,
        });
    }
    if let Some(website) = non_blank(entity.website.as_deref()) {
        lines.push(ContactLine {
            field: ContactField::Website,
            action: Affordance::Link(website.clone()),
            text: website,
        });
    }

    EntityCard {
        number,
        name: entity.name.clone(),
        kind: non_blank(entity.kind.as_deref()),
        lines,
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
