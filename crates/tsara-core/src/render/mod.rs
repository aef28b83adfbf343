//! Reply rendering contract shared by every front end.

pub mod view;

pub use view::{
    build_view, build_view_in, Affordance, ContactField, ContactLine, EntityCard, MessageView,
    ReplyCard, ReplySection, UserBubble,
};
