//! Identity-keyed map-pin composites.
//!
//! A pin is the sender's avatar inset over a background template tinted with
//! the sender's bucket color. Resolution of the avatar is asynchronous and
//! fallible; finished composites land in a bounded cache under a promotion
//! policy, so a transient resolver failure never downgrades a composite that
//! already resolved successfully.

use std::num::NonZeroUsize;
use std::sync::Arc;

use async_trait::async_trait;
use image::Rgba;
use image::RgbaImage;
use thiserror::Error;
use weft_protocol::SenderIdentity;
use weft_utils_cache::ResolutionCache;
use weft_utils_image::Insets;
use weft_utils_image::compose_pin;

use crate::colors::ColorProvider;
use crate::colors::ColorToken;
use crate::colors::color_bucket;

#[derive(Debug, Error)]
pub enum ResolveError {
    /// The identity has no underlying avatar image.
    #[error("no avatar available")]
    Unavailable,
    #[error("failed to fetch avatar: {message}")]
    Fetch { message: String },
    #[error("failed to decode avatar image")]
    Decode {
        #[source]
        source: image::ImageError,
    },
}

/// Asynchronously yields an identity's avatar at a target size, or an error.
/// Fetching and decoding internals live with the embedding application.
#[async_trait]
pub trait AvatarResolver: Send + Sync {
    async fn resolve(
        &self,
        identity: &SenderIdentity,
        size_px: u32,
    ) -> Result<RgbaImage, ResolveError>;
}

/// Current display identity for a user id; unknown ids default gracefully.
pub trait IdentityLookup: Send + Sync {
    fn user_or_default(&self, user_id: &str) -> SenderIdentity;
}

#[derive(Debug, Clone, Copy)]
pub struct PinConfig {
    pub capacity: NonZeroUsize,
    /// Edge length the avatar is resolved at, in pixels.
    pub avatar_size_px: u32,
    /// Insets of the avatar within the pin template.
    pub insets: Insets,
}

impl Default for PinConfig {
    fn default() -> Self {
        Self {
            capacity: NonZeroUsize::new(weft_utils_cache::DEFAULT_CAPACITY)
                .unwrap_or(NonZeroUsize::MIN),
            avatar_size_px: 44,
            insets: Insets {
                left: 4,
                top: 4,
                right: 4,
                bottom: 8,
            },
        }
    }
}

struct Inner<R> {
    cache: ResolutionCache<SenderIdentity, RgbaImage>,
    resolver: Arc<R>,
    lookup: Arc<dyn IdentityLookup>,
    colors: Arc<dyn ColorProvider>,
    template: RgbaImage,
    default_pin: Arc<RgbaImage>,
    fallback_avatar: RgbaImage,
    config: PinConfig,
}

/// Produces pin composites for message senders.
///
/// Cheap to clone; clones share one cache. The provider is owned by the
/// session/view context that needs it and goes away with that context —
/// there is no global instance.
pub struct PinProvider<R> {
    inner: Arc<Inner<R>>,
}

impl<R> Clone for PinProvider<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: AvatarResolver + 'static> PinProvider<R> {
    pub fn new(
        resolver: Arc<R>,
        lookup: Arc<dyn IdentityLookup>,
        colors: Arc<dyn ColorProvider>,
        template: RgbaImage,
        default_pin: RgbaImage,
        fallback_avatar: RgbaImage,
        config: PinConfig,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                cache: ResolutionCache::new(config.capacity),
                resolver,
                lookup,
                colors,
                template,
                default_pin: Arc::new(default_pin),
                fallback_avatar,
                config,
            }),
        }
    }

    /// Creates a pin for `user_id`, delivering it through `callback`.
    ///
    /// With no user id the generic pin is delivered synchronously and the
    /// cache is left untouched. A warm successful entry is also delivered
    /// synchronously; an error entry is resolved again. Otherwise the
    /// resolver runs on a spawned task and the callback fires on completion
    /// — a caller that has lost interest by then can simply drop the result.
    pub fn create(
        &self,
        user_id: Option<&str>,
        callback: impl FnOnce(Arc<RgbaImage>) + Send + 'static,
    ) {
        let Some(user_id) = user_id else {
            callback(Arc::clone(&self.inner.default_pin));
            return;
        };
        let identity = self.inner.lookup.user_or_default(user_id);
        if let Some(entry) = self.inner.cache.get(&identity)
            && !entry.is_error
        {
            callback(entry.value);
            return;
        }
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let size = inner.config.avatar_size_px;
            let pin = match inner.resolver.resolve(&identity, size).await {
                Ok(avatar) => {
                    tracing::debug!(user_id = %identity.user_id, "avatar resolved");
                    inner.finish(identity, &avatar, false)
                }
                Err(err) => {
                    // Also reached when the identity simply has no avatar;
                    // the fallback glyph stands in and the entry is marked
                    // as an error so a later success can replace it.
                    tracing::warn!(user_id = %identity.user_id, %err, "avatar resolution failed");
                    inner.finish(identity, &inner.fallback_avatar, true)
                }
            };
            callback(pin);
        });
    }
}

impl<R> Inner<R> {
    /// Composes the pin and records it under the promotion policy, returning
    /// whichever entry the cache holds afterwards.
    fn finish(&self, identity: SenderIdentity, avatar: &RgbaImage, is_error: bool) -> Arc<RgbaImage> {
        let bucket = color_bucket(&identity.display_name);
        let tint = argb_to_rgba(self.colors.color(ColorToken::Username(bucket)).argb());
        match compose_pin(&self.template, avatar, tint, self.config.insets) {
            Ok(pin) => self.cache.promote(identity, pin, is_error).value,
            Err(err) => {
                tracing::warn!(%err, "pin compose failed; using the generic pin");
                Arc::clone(&self.default_pin)
            }
        }
    }
}

fn argb_to_rgba(argb: u32) -> Rgba<u8> {
    Rgba([
        ((argb >> 16) & 0xff) as u8,
        ((argb >> 8) & 0xff) as u8,
        (argb & 0xff) as u8,
        ((argb >> 24) & 0xff) as u8,
    ])
}
