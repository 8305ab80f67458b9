//! Timeline presentation pipeline.
//!
//! Turns an ordered stream of chat-protocol events into renderable,
//! visually grouped items: a forward-looking grouping classifier decides
//! which entries carry sender metadata, a content dispatcher maps decoded
//! payloads onto render variants, and a pin provider maintains an
//! asynchronously populated, identity-keyed cache of avatar composites.

pub mod colors;
pub mod factory;
pub mod grouping;
pub mod item;
pub mod linkify;
pub mod pin;

pub use factory::MessageItemFactory;
pub use item::RenderableItem;
pub use pin::PinProvider;
