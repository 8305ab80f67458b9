//! Visual grouping of consecutive timeline entries.
//!
//! Grouping looks forward: metadata (avatar, name, timestamp) attaches to the
//! entry that starts a new visual group when the timeline is read in forward
//! chronological order, so the decision for `cur` depends on `next`.

use chrono::TimeDelta;
use weft_protocol::TimelineEvent;

const GROUP_GAP_MINUTES: i64 = 60;

/// Whether `cur` should render its sender metadata instead of merging into
/// the adjacent group.
///
/// Shows metadata when any of the following holds: `cur` and `next` fall on
/// different local calendar days, `next` comes from a different sender,
/// `next` is not a plain message event, or `next` arrived more than an hour
/// after `cur`. The tail of the timeline (no `next`) is always fully
/// labeled. `prev` is accepted for windowed callers but does not participate
/// in the current rules.
pub fn should_show_information(
    prev: Option<&TimelineEvent>,
    cur: &TimelineEvent,
    next: Option<&TimelineEvent>,
) -> bool {
    let _ = prev;
    let Some(next) = next else {
        return true;
    };
    crosses_day_boundary(cur, Some(next))
        || next.sender != cur.sender
        || !next.is_message()
        || exceeds_group_gap(cur, next)
}

/// Whether a day separator belongs between `cur` and `next`. An absent
/// `next` counts as a boundary.
pub fn crosses_day_boundary(cur: &TimelineEvent, next: Option<&TimelineEvent>) -> bool {
    let Some(next) = next else {
        return true;
    };
    cur.local_date_time().date_naive() != next.local_date_time().date_naive()
}

fn exceeds_group_gap(cur: &TimelineEvent, next: &TimelineEvent) -> bool {
    next.local_date_time() > cur.local_date_time() + TimeDelta::minutes(GROUP_GAP_MINUTES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;
    use chrono::NaiveDate;
    use chrono::TimeZone;
    use weft_protocol::SendState;
    use weft_protocol::SenderIdentity;
    use weft_protocol::event_type;

    fn local_ts(year: i32, month: u32, day: u32, hour: u32, min: u32) -> i64 {
        let naive = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(hour, min, 0))
            .unwrap_or_default();
        Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.timestamp_millis())
            .unwrap_or_default()
    }

    fn message(sender: &str, ts: i64) -> TimelineEvent {
        TimelineEvent {
            event_id: format!("${sender}-{ts}"),
            event_type: event_type::MESSAGE.to_string(),
            origin_server_ts: ts,
            content: serde_json::json!({ "msgtype": "m.text", "body": "hi" }),
            send_state: SendState::Sent,
            sender: Some(SenderIdentity::from_user_id(sender)),
        }
    }

    #[test]
    fn tail_entry_always_shows_metadata() {
        let cur = message("@alice:example.org", local_ts(2024, 3, 1, 10, 0));
        assert!(should_show_information(None, &cur, None));
    }

    #[test]
    fn close_same_sender_messages_merge() {
        let cur = message("@alice:example.org", local_ts(2024, 3, 1, 10, 0));
        let next = message("@alice:example.org", local_ts(2024, 3, 1, 10, 5));
        assert!(!should_show_information(None, &cur, Some(&next)));
    }

    #[test]
    fn gap_over_an_hour_breaks_the_group() {
        let cur = message("@alice:example.org", local_ts(2024, 3, 1, 10, 5));
        let prev = message("@alice:example.org", local_ts(2024, 3, 1, 10, 0));
        let next = message("@alice:example.org", local_ts(2024, 3, 1, 11, 10));
        assert!(should_show_information(Some(&prev), &cur, Some(&next)));
    }

    #[test]
    fn gap_of_exactly_an_hour_still_merges() {
        let cur = message("@alice:example.org", local_ts(2024, 3, 1, 10, 0));
        let next = message("@alice:example.org", local_ts(2024, 3, 1, 11, 0));
        assert!(!should_show_information(None, &cur, Some(&next)));
    }

    #[test]
    fn sender_change_breaks_the_group() {
        let cur = message("@alice:example.org", local_ts(2024, 3, 1, 10, 0));
        let next = message("@bob:example.org", local_ts(2024, 3, 1, 10, 1));
        assert!(should_show_information(None, &cur, Some(&next)));
    }

    #[test]
    fn display_name_change_breaks_the_group() {
        let cur = message("@alice:example.org", local_ts(2024, 3, 1, 10, 0));
        let mut next = message("@alice:example.org", local_ts(2024, 3, 1, 10, 1));
        if let Some(sender) = next.sender.as_mut() {
            sender.display_name = "Alice!".to_string();
        }
        assert!(should_show_information(None, &cur, Some(&next)));
    }

    #[test]
    fn non_message_next_breaks_the_group() {
        let cur = message("@alice:example.org", local_ts(2024, 3, 1, 10, 0));
        let mut next = message("@alice:example.org", local_ts(2024, 3, 1, 10, 1));
        next.event_type = "m.room.member".to_string();
        assert!(should_show_information(None, &cur, Some(&next)));
    }

    #[test]
    fn day_boundary_breaks_the_group() {
        let cur = message("@alice:example.org", local_ts(2024, 3, 1, 23, 50));
        let next = message("@alice:example.org", local_ts(2024, 3, 2, 0, 5));
        assert!(should_show_information(None, &cur, Some(&next)));
        assert!(crosses_day_boundary(&cur, Some(&next)));
    }

    #[test]
    fn missing_next_counts_as_a_day_boundary() {
        let cur = message("@alice:example.org", local_ts(2024, 3, 1, 10, 0));
        assert!(crosses_day_boundary(&cur, None));
    }
}
