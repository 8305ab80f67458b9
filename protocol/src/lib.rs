//! Data model for the timeline presentation pipeline: event snapshots, the
//! `msgtype`-tagged message content union, sender identities, and the
//! server well-known discovery document.

pub mod event;
pub mod message;
pub mod well_known;

pub use event::SendState;
pub use event::SenderIdentity;
pub use event::TimelineEvent;
pub use event::event_type;
pub use message::MessageContent;
pub use message::decode_message_content;
