//! Renderable timeline items and their shared metadata.

use std::ops::Range;

use crate::colors::Color;

/// Kind of link recognized by the annotation passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// Internal permalink-style reference.
    Permalink,
    /// Generic web URL.
    Web,
}

/// A metadata range attached to styled text. Spans never alter the
/// underlying text; they only mark where links live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSpan {
    pub range: Range<usize>,
    pub kind: LinkKind,
}

/// Body text with the styling the dispatcher applied and any link spans the
/// annotation passes attached.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledText {
    pub text: String,
    pub color: Option<Color>,
    pub italic: bool,
    pub links: Vec<LinkSpan>,
}

impl StyledText {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
            italic: false,
            links: Vec::new(),
        }
    }

    pub fn colored(text: impl Into<String>, color: Color) -> Self {
        Self {
            color: Some(color),
            ..Self::plain(text)
        }
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// The link text for span `index`, when the span is in bounds.
    pub fn link_at(&self, index: usize) -> Option<&str> {
        let span = self.links.get(index)?;
        self.text.get(span.range.clone())
    }

    /// Routes an activated link span to the notification sink.
    pub fn activate_link(&self, index: usize, callback: &dyn TimelineCallback) {
        if let Some(url) = self.link_at(index) {
            callback.on_url_clicked(url);
        }
    }
}

/// Sender metadata shared by every message variant.
#[derive(Debug, Clone, PartialEq)]
pub struct InformationData {
    /// Short display timestamp, already formatted for the locale.
    pub time: String,
    pub avatar_url: Option<String>,
    /// Sender name, styled with the sender's bucket color.
    pub member_name: StyledText,
    /// Whether this entry renders avatar, name and timestamp, or merges
    /// into the previous visual group.
    pub show_information: bool,
}

/// Media descriptor handed to the downstream media renderer. No decoding or
/// scaling happens here; intrinsic and bound dimensions travel together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaData {
    pub filename: String,
    pub url: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub max_width: u32,
    pub max_height: u32,
    pub rotation: Option<i32>,
    pub orientation: Option<i32>,
}

/// Sink for item activation events.
pub trait TimelineCallback {
    fn on_url_clicked(&self, url: &str);
    fn on_media_clicked(&self, media: &MediaData);
}

/// Closed set of renderable variants the dispatcher produces. Extending the
/// timeline with a new content kind means adding a variant here, not a
/// conditional branch somewhere else.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderableItem {
    Text {
        information: InformationData,
        message: StyledText,
    },
    Notice {
        information: InformationData,
        message: StyledText,
    },
    Emote {
        information: InformationData,
        message: StyledText,
    },
    Image {
        information: InformationData,
        media: MediaData,
    },
    /// Diagnostic placeholder for content the pipeline cannot render yet.
    Unhandled { text: String },
}

impl RenderableItem {
    pub fn information(&self) -> Option<&InformationData> {
        match self {
            RenderableItem::Text { information, .. }
            | RenderableItem::Notice { information, .. }
            | RenderableItem::Emote { information, .. }
            | RenderableItem::Image { information, .. } => Some(information),
            RenderableItem::Unhandled { .. } => None,
        }
    }

    pub fn message(&self) -> Option<&StyledText> {
        match self {
            RenderableItem::Text { message, .. }
            | RenderableItem::Notice { message, .. }
            | RenderableItem::Emote { message, .. } => Some(message),
            RenderableItem::Image { .. } | RenderableItem::Unhandled { .. } => None,
        }
    }

    /// Routes an activation of the item body to the notification sink.
    /// Only media items react; text bodies route through
    /// [`StyledText::activate_link`] instead.
    pub fn activate(&self, callback: &dyn TimelineCallback) {
        if let RenderableItem::Image { media, .. } = self {
            callback.on_media_clicked(media);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingCallback {
        urls: RefCell<Vec<String>>,
        media: RefCell<Vec<String>>,
    }

    impl TimelineCallback for RecordingCallback {
        fn on_url_clicked(&self, url: &str) {
            self.urls.borrow_mut().push(url.to_string());
        }

        fn on_media_clicked(&self, media: &MediaData) {
            self.media.borrow_mut().push(media.filename.clone());
        }
    }

    fn media() -> MediaData {
        MediaData {
            filename: "cat.png".to_string(),
            url: Some("mxc://example.org/cat".to_string()),
            width: Some(640),
            height: Some(480),
            max_width: 320,
            max_height: 240,
            rotation: None,
            orientation: None,
        }
    }

    fn information() -> InformationData {
        InformationData {
            time: "10:00".to_string(),
            avatar_url: None,
            member_name: StyledText::plain("Alice"),
            show_information: true,
        }
    }

    #[test]
    fn activating_an_image_reports_its_media() {
        let callback = RecordingCallback::default();
        let item = RenderableItem::Image {
            information: information(),
            media: media(),
        };
        item.activate(&callback);
        assert_eq!(*callback.media.borrow(), vec!["cat.png".to_string()]);
    }

    #[test]
    fn activating_a_link_span_reports_its_url() {
        let callback = RecordingCallback::default();
        let mut body = StyledText::plain("see https://example.org/x");
        body.links.push(LinkSpan {
            range: 4..25,
            kind: LinkKind::Web,
        });
        body.activate_link(0, &callback);
        assert_eq!(
            *callback.urls.borrow(),
            vec!["https://example.org/x".to_string()]
        );
    }

    #[test]
    fn out_of_bounds_span_activation_is_ignored() {
        let callback = RecordingCallback::default();
        let body = StyledText::plain("hello");
        body.activate_link(3, &callback);
        assert!(callback.urls.borrow().is_empty());
    }
}
