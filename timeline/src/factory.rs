//! Content dispatcher: maps a timeline event's decoded payload onto a
//! renderable item variant.

use std::sync::Arc;

use chrono::DateTime;
use chrono::Local;
use weft_protocol::MessageContent;
use weft_protocol::SendState;
use weft_protocol::TimelineEvent;
use weft_protocol::decode_message_content;
use weft_protocol::message::EmoteContent;
use weft_protocol::message::ImageContent;
use weft_protocol::message::NoticeContent;
use weft_protocol::message::TextContent;

use crate::colors::ColorProvider;
use crate::colors::ColorToken;
use crate::colors::color_bucket;
use crate::grouping::should_show_information;
use crate::item::InformationData;
use crate::item::MediaData;
use crate::item::RenderableItem;
use crate::item::StyledText;
use crate::linkify::linkify;

/// Bounding box the downstream media renderer may fill.
pub trait MediaSizeProvider: Send + Sync {
    fn max_size(&self) -> (u32, u32);
}

/// Locale-appropriate short display string for an event timestamp.
pub trait HourFormatter: Send + Sync {
    fn format_hour(&self, timestamp_ms: i64) -> String;
}

/// Chrono-backed formatter rendering the local wall-clock time as `HH:MM`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalHourFormatter;

impl HourFormatter for LocalHourFormatter {
    fn format_hour(&self, timestamp_ms: i64) -> String {
        DateTime::from_timestamp_millis(timestamp_ms)
            .unwrap_or_default()
            .with_timezone(&Local)
            .format("%H:%M")
            .to_string()
    }
}

/// Resolves an HTML-formatted body to displayable text. Rendering internals
/// live with the embedding application.
pub trait HtmlRenderer: Send + Sync {
    fn render(&self, formatted_body: &str) -> String;
}

/// Builds renderable items from timeline events.
pub struct MessageItemFactory {
    color_provider: Arc<dyn ColorProvider>,
    media_size_provider: Arc<dyn MediaSizeProvider>,
    hour_formatter: Arc<dyn HourFormatter>,
    html_renderer: Arc<dyn HtmlRenderer>,
}

impl MessageItemFactory {
    pub fn new(
        color_provider: Arc<dyn ColorProvider>,
        media_size_provider: Arc<dyn MediaSizeProvider>,
        hour_formatter: Arc<dyn HourFormatter>,
        html_renderer: Arc<dyn HtmlRenderer>,
    ) -> Self {
        Self {
            color_provider,
            media_size_provider,
            hour_formatter,
            html_renderer,
        }
    }

    /// Classifies `event` into a renderable item. Total: content the
    /// pipeline cannot decode or does not recognize renders as a diagnostic
    /// placeholder, never a failure.
    pub fn create(
        &self,
        prev_event: Option<&TimelineEvent>,
        event: &TimelineEvent,
        next_event: Option<&TimelineEvent>,
    ) -> RenderableItem {
        let information = self.build_information(prev_event, event, next_event);
        match decode_message_content(&event.content) {
            None => self.build_unhandled(&event.event_type),
            Some(MessageContent::Unknown { msgtype }) => self.build_unhandled(&msgtype),
            Some(MessageContent::Text(content)) => {
                self.build_text(event.send_state, content, information)
            }
            Some(MessageContent::Notice(content)) => self.build_notice(content, information),
            Some(MessageContent::Emote(content)) => self.build_emote(content, information),
            Some(MessageContent::Image(content)) => self.build_image(content, information),
        }
    }

    fn build_information(
        &self,
        prev_event: Option<&TimelineEvent>,
        event: &TimelineEvent,
        next_event: Option<&TimelineEvent>,
    ) -> InformationData {
        let member_name = event
            .sender
            .as_ref()
            .map(|sender| sender.display_name.clone())
            .unwrap_or_default();
        let name_color = self
            .color_provider
            .color(ColorToken::Username(color_bucket(&member_name)));
        InformationData {
            time: self.hour_formatter.format_hour(event.origin_server_ts),
            avatar_url: event
                .sender
                .as_ref()
                .and_then(|sender| sender.avatar_url.clone()),
            member_name: StyledText::colored(member_name, name_color),
            show_information: should_show_information(prev_event, event, next_event),
        }
    }

    fn build_unhandled(&self, type_tag: &str) -> RenderableItem {
        tracing::debug!(type_tag, "timeline content kind is not handled");
        RenderableItem::Unhandled {
            text: format!("{type_tag} message events are not yet handled"),
        }
    }

    fn build_text(
        &self,
        send_state: SendState,
        content: TextContent,
        information: InformationData,
    ) -> RenderableItem {
        let body = content
            .formatted_body
            .as_deref()
            .map(|formatted| self.html_renderer.render(formatted))
            .unwrap_or(content.body);
        let token = if send_state.is_sent() {
            ColorToken::MessageSent
        } else {
            ColorToken::MessageSending
        };
        let mut message = StyledText::colored(body, self.color_provider.color(token));
        linkify(&mut message);
        RenderableItem::Text {
            information,
            message,
        }
    }

    fn build_notice(&self, content: NoticeContent, information: InformationData) -> RenderableItem {
        let mut message = StyledText::colored(
            content.body,
            self.color_provider.color(ColorToken::NoticeText),
        )
        .italic();
        linkify(&mut message);
        RenderableItem::Notice {
            information,
            message,
        }
    }

    fn build_emote(&self, content: EmoteContent, information: InformationData) -> RenderableItem {
        // Third-person action framing; the sender name was already resolved
        // when the information data was built.
        let mut message = StyledText::plain(format!(
            "* {} {}",
            information.member_name.text, content.body
        ));
        linkify(&mut message);
        RenderableItem::Emote {
            information,
            message,
        }
    }

    fn build_image(&self, content: ImageContent, information: InformationData) -> RenderableItem {
        let (max_width, max_height) = self.media_size_provider.max_size();
        let info = content.info.unwrap_or_default();
        let media = MediaData {
            filename: content.body,
            url: content.url,
            width: info.width,
            height: info.height,
            max_width,
            max_height,
            rotation: info.rotation,
            orientation: info.orientation,
        };
        RenderableItem::Image { information, media }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::Color;
    use crate::item::LinkKind;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use weft_protocol::SenderIdentity;
    use weft_protocol::event_type;

    /// Palette that encodes the token into the color value so tests can
    /// assert which token was selected.
    struct TokenPalette;

    const SENT: Color = Color(0xFF00_0001);
    const SENDING: Color = Color(0xFF00_0002);
    const NOTICE: Color = Color(0xFF00_0003);

    impl ColorProvider for TokenPalette {
        fn color(&self, token: ColorToken) -> Color {
            match token {
                ColorToken::Username(bucket) => Color(0xFF00_0100 + bucket.index() as u32),
                ColorToken::MessageSent => SENT,
                ColorToken::MessageSending => SENDING,
                ColorToken::NoticeText => NOTICE,
            }
        }
    }

    struct FixedMaxSize;

    impl MediaSizeProvider for FixedMaxSize {
        fn max_size(&self) -> (u32, u32) {
            (320, 240)
        }
    }

    struct UppercasingHtml;

    impl HtmlRenderer for UppercasingHtml {
        fn render(&self, formatted_body: &str) -> String {
            formatted_body.to_uppercase()
        }
    }

    struct FixedHour;

    impl HourFormatter for FixedHour {
        fn format_hour(&self, _timestamp_ms: i64) -> String {
            "10:00".to_string()
        }
    }

    fn factory() -> MessageItemFactory {
        MessageItemFactory::new(
            Arc::new(TokenPalette),
            Arc::new(FixedMaxSize),
            Arc::new(FixedHour),
            Arc::new(UppercasingHtml),
        )
    }

    fn event(content: serde_json::Value) -> TimelineEvent {
        TimelineEvent {
            event_id: "$1".to_string(),
            event_type: event_type::MESSAGE.to_string(),
            origin_server_ts: 1_700_000_000_000,
            content,
            send_state: SendState::Sent,
            sender: Some(SenderIdentity {
                user_id: "@alice:example.org".to_string(),
                display_name: "Alice".to_string(),
                avatar_url: Some("mxc://example.org/alice".to_string()),
            }),
        }
    }

    #[test]
    fn notice_renders_italic_and_muted_without_prefix() {
        let item = factory().create(
            None,
            &event(json!({ "msgtype": "m.notice", "body": "hello" })),
            None,
        );
        let RenderableItem::Notice { message, .. } = item else {
            panic!("expected a notice item");
        };
        assert_eq!(message.text, "hello");
        assert!(message.italic);
        assert_eq!(message.color, Some(NOTICE));
    }

    #[test]
    fn emote_synthesizes_third_person_framing() {
        let item = factory().create(
            None,
            &event(json!({ "msgtype": "m.emote", "body": "waves" })),
            None,
        );
        let RenderableItem::Emote { message, .. } = item else {
            panic!("expected an emote item");
        };
        assert_eq!(message.text, "* Alice waves");
    }

    #[test]
    fn sent_text_and_pending_text_pick_different_tokens() {
        let factory = factory();
        let sent = event(json!({ "msgtype": "m.text", "body": "hi" }));
        let mut pending = sent.clone();
        pending.send_state = SendState::Pending;
        let sent_item = factory.create(None, &sent, None);
        let pending_item = factory.create(None, &pending, None);
        assert_eq!(sent_item.message().and_then(|m| m.color), Some(SENT));
        assert_eq!(pending_item.message().and_then(|m| m.color), Some(SENDING));
    }

    #[test]
    fn formatted_body_goes_through_the_html_renderer() {
        let item = factory().create(
            None,
            &event(json!({
                "msgtype": "m.text",
                "body": "plain",
                "formatted_body": "rich",
            })),
            None,
        );
        assert_eq!(item.message().map(|m| m.text.as_str()), Some("RICH"));
    }

    #[test]
    fn text_bodies_are_link_annotated() {
        let item = factory().create(
            None,
            &event(json!({
                "msgtype": "m.text",
                "body": "see https://example.org/doc",
            })),
            None,
        );
        let spans = item.message().map(|m| m.links.clone()).unwrap_or_default();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].kind, LinkKind::Web);
    }

    #[test]
    fn image_carries_intrinsic_and_bound_dimensions() {
        let item = factory().create(
            None,
            &event(json!({
                "msgtype": "m.image",
                "body": "cat.png",
                "url": "mxc://example.org/cat",
                "info": { "w": 640, "h": 480, "rotation": 90 },
            })),
            None,
        );
        let RenderableItem::Image { media, .. } = item else {
            panic!("expected an image item");
        };
        assert_eq!(media.width, Some(640));
        assert_eq!(media.height, Some(480));
        assert_eq!(media.max_width, 320);
        assert_eq!(media.max_height, 240);
        assert_eq!(media.rotation, Some(90));
        assert_eq!(media.filename, "cat.png");
    }

    #[test]
    fn unrecognized_kind_renders_a_diagnostic_placeholder() {
        let item = factory().create(
            None,
            &event(json!({ "msgtype": "m.location", "body": "here" })),
            None,
        );
        assert_eq!(
            item,
            RenderableItem::Unhandled {
                text: "m.location message events are not yet handled".to_string(),
            }
        );
    }

    #[test]
    fn undecodable_content_renders_a_diagnostic_placeholder() {
        let item = factory().create(None, &event(json!({ "foo": "bar" })), None);
        assert_eq!(
            item,
            RenderableItem::Unhandled {
                text: "m.room.message message events are not yet handled".to_string(),
            }
        );
    }

    #[test]
    fn sender_name_is_styled_with_its_bucket_color() {
        let item = factory().create(
            None,
            &event(json!({ "msgtype": "m.text", "body": "hi" })),
            None,
        );
        let information = item.information().cloned().unwrap_or_else(|| {
            panic!("expected information data");
        });
        // "Alice" folds to bucket 0.
        assert_eq!(information.member_name.color, Some(Color(0xFF00_0100)));
        assert_eq!(information.time, "10:00");
        assert_eq!(
            information.avatar_url.as_deref(),
            Some("mxc://example.org/alice")
        );
        assert!(information.show_information);
    }
}
