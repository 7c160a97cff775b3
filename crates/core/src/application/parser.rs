//! Task Parser - Converts a decoded feed into a task snapshot
//!
//! Structured fields (id, title, date, link) come straight from the feed entry.
//! Tags, due date and priority only exist as labelled markup inside the entry's
//! rendered content, e.g. `<span class="rtm_tags_value">Work, Urgent</span>`,
//! so they are pulled out with [`extract_labeled`]. Every one of them may be
//! missing; a missing or unusable value leaves the attribute unset.

use crate::domain::error::{DomainError, Result};
use crate::domain::{FeedDocument, FeedEntry, Priority, Snapshot, Task};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

/// Content labels used by the feed
pub const TAGS_LABEL: &str = "tags";
pub const DUE_LABEL: &str = "due";
pub const PRIORITY_LABEL: &str = "priority";

/// Priority token meaning "no priority"
pub const NO_PRIORITY_TOKEN: &str = "none";

/// Separator between tags in the rendered content
pub const TAG_SEPARATOR: &str = ", ";

/// Parse every entry of a feed document into a snapshot (feed order preserved)
pub fn parse_snapshot(document: &FeedDocument) -> Snapshot {
    let snapshot: Snapshot = document
        .entries
        .iter()
        .map(|entry| (entry.id.clone(), parse_entry(entry)))
        .collect();

    debug!(
        entries = document.len(),
        tasks = snapshot.len(),
        "Parsed feed snapshot"
    );
    snapshot
}

/// Parse a single feed entry into a task
pub fn parse_entry(entry: &FeedEntry) -> Task {
    let mut task = Task::new(
        entry.id.clone(),
        entry.title.clone(),
        entry.published,
        entry.link.clone(),
    );

    let content = match entry.content.as_deref() {
        Some(content) if !content.trim().is_empty() => content,
        _ => return task,
    };

    task.tags = extract_labeled(content, TAGS_LABEL).map(parse_tags);

    task.due = extract_labeled(content, DUE_LABEL).and_then(|raw| {
        let due = parse_due(raw);
        if due.is_none() {
            debug!(task_id = %entry.id, value = raw, "Due date not recognised, omitting");
        }
        due
    });

    task.priority = extract_labeled(content, PRIORITY_LABEL).and_then(|raw| {
        parse_priority(raw)
            .map_err(|e| warn!(task_id = %entry.id, error = %e, "Omitting priority"))
            .ok()
    });

    task
}

// `<label>_value">VALUE` with VALUE running up to the next `<`
static LABELED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([A-Za-z0-9]+)_value">([^<]*)"#).expect("valid labeled value regex")
});

// Same markup still html-escaped: `<label>_value&quot;&gt;VALUE&lt;`
static ESCAPED_LABELED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)([A-Za-z0-9]+)_value&quot;&gt;(.*?)(?:&lt;|$)")
        .expect("valid escaped labeled value regex")
});

/// Find `<label>_value">VALUE` in rendered content and return VALUE
///
/// The html-escaped form is accepted as well, for feeds whose content
/// reaches us still escaped.
///
/// # Returns
/// None if the label does not occur
pub fn extract_labeled<'a>(content: &'a str, label: &str) -> Option<&'a str> {
    find_labeled(&LABELED_RE, content, label)
        .or_else(|| find_labeled(&ESCAPED_LABELED_RE, content, label))
}

fn find_labeled<'a>(re: &Regex, content: &'a str, label: &str) -> Option<&'a str> {
    re.captures_iter(content)
        .find(|caps| &caps[1] == label)
        .and_then(|caps| caps.get(2))
        .map(|value| value.as_str())
}

/// Parse a priority token: "none" is 0, anything else must be an integer
pub fn parse_priority(raw: &str) -> Result<Priority> {
    let raw = raw.trim();
    if raw == NO_PRIORITY_TOKEN {
        return Ok(0);
    }
    raw.parse::<Priority>()
        .map_err(|_| DomainError::InvalidPriority(raw.to_string()))
}

/// Split a rendered tag list on the literal ", " separator
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(TAG_SEPARATOR).map(str::to_string).collect()
}

// Day/month orderings the feed renders, with and without weekday
const DAY_LAYOUTS: &[&str] = &["%a %d %b", "%a %b %d", "%d %b", "%b %d"];

// Two-digit year first: `%Y` would read "19" as the year 19
const YEAR_LAYOUTS: &[&str] = &["%y", "%Y"];

// 12-hour and 24-hour clock renderings
const TIME_LAYOUTS: &[&str] = &["%I:%M%p", "%I:%M %p", "%H:%M"];

const ISO_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

// Date-only layouts; these resolve to midnight
static DATE_FORMATS: Lazy<Vec<String>> = Lazy::new(|| {
    let mut formats: Vec<String> = DAY_LAYOUTS
        .iter()
        .flat_map(|day| YEAR_LAYOUTS.iter().map(move |year| format!("{day} {year}")))
        .collect();
    formats.push("%Y-%m-%d".to_string());
    formats
});

// Date-time layouts tried in order (after " at " has been collapsed)
static DATE_TIME_FORMATS: Lazy<Vec<String>> = Lazy::new(|| {
    let mut formats: Vec<String> = DATE_FORMATS
        .iter()
        .filter(|date| !date.starts_with("%Y-"))
        .flat_map(|date| TIME_LAYOUTS.iter().map(move |time| format!("{date} {time}")))
        .collect();
    formats.extend(ISO_DATE_TIME_FORMATS.iter().map(|f| f.to_string()));
    formats
});

// A trailing hour with no minutes, e.g. "5PM" or "5 pm"
static BARE_HOUR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(^|\s)(\d{1,2})\s?([AaPp][Mm])$").expect("valid bare hour regex")
});

/// Parse a free-form due date as rendered by the feed
///
/// Accepts the feed's own renderings, day-first or month-first, with a 12 or
/// 24 hour clock (`Wed 11 Oct 23`, `Wed 11 Oct 23 at 2:00PM`,
/// `Mon Jun 10 19 at 17:00`, `Mon 10 Jun 19 at 5PM`), plus RFC 3339, RFC 2822
/// and ISO-style dates. Date-only values resolve to midnight. Unrecognised
/// values (e.g. "never") yield None.
pub fn parse_due(raw: &str) -> Option<NaiveDateTime> {
    let collapsed = raw.trim().replace(" at ", " ");
    let normalized = BARE_HOUR_RE.replace(&collapsed, "${1}${2}:00${3}");
    let normalized: &str = &normalized;
    if normalized.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(normalized) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(normalized) {
        return Some(dt.naive_local());
    }

    DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(normalized, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(normalized, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn rtm_content(tags: &str, due: &str, priority: &str) -> String {
        format!(
            "<div class=\"rtm_due\"><span class=\"rtm_due_title\">Due: </span>\
             <span class=\"rtm_due_value\">{due}</span></div>\
             <div class=\"rtm_priority\"><span class=\"rtm_priority_title\">Priority: </span>\
             <span class=\"rtm_priority_value\">{priority}</span></div>\
             <div class=\"rtm_tags\"><span class=\"rtm_tags_title\">Tags: </span>\
             <span class=\"rtm_tags_value\">{tags}</span></div>"
        )
    }

    fn entry(id: &str, content: Option<String>) -> FeedEntry {
        FeedEntry {
            id: id.to_string(),
            title: format!("Task {id}"),
            published: None,
            link: format!("https://www.rememberthemilk.com/app/#all/{id}"),
            content,
        }
    }

    #[test]
    fn test_extract_labeled_table() {
        let content = rtm_content("Work, Urgent", "Fri 15 Mar 24", "2");
        let cases = [
            (TAGS_LABEL, Some("Work, Urgent")),
            (DUE_LABEL, Some("Fri 15 Mar 24")),
            (PRIORITY_LABEL, Some("2")),
            ("location", None),
        ];
        for (label, expected) in cases {
            assert_eq!(extract_labeled(&content, label), expected, "label {label}");
        }
    }

    #[test]
    fn test_extract_labeled_escaped_markup() {
        let content = "&lt;span class=&quot;rtm_tags_value&quot;&gt;Home&lt;/span&gt;";
        assert_eq!(extract_labeled(content, TAGS_LABEL), Some("Home"));
        assert_eq!(extract_labeled(content, DUE_LABEL), None);
    }

    #[test]
    fn test_extract_labeled_escaped_value_to_end() {
        let content = "rtm_priority_value&quot;&gt;2";
        assert_eq!(extract_labeled(content, PRIORITY_LABEL), Some("2"));
    }

    #[test]
    fn test_extract_labeled_empty_value() {
        let content = "<span class=\"rtm_tags_value\"></span>";
        assert_eq!(extract_labeled(content, TAGS_LABEL), Some(""));
    }

    #[test]
    fn test_parse_priority_table() {
        let cases = [
            ("none", Ok(0)),
            ("3", Ok(3)),
            ("1", Ok(1)),
            (" 2 ", Ok(2)),
            ("high", Err(DomainError::InvalidPriority("high".to_string()))),
        ];
        for (raw, expected) in cases {
            assert_eq!(parse_priority(raw), expected, "raw {raw:?}");
        }
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!(parse_tags("Work, Urgent"), vec!["Work", "Urgent"]);
        assert_eq!(parse_tags("Work"), vec!["Work"]);
        // Only the exact ", " separator splits
        assert_eq!(parse_tags("a,b"), vec!["a,b"]);
    }

    #[test]
    fn test_parse_due_table() {
        let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        let cases = [
            ("Fri 15 Mar 24", Some(date(2024, 3, 15).and_hms_opt(0, 0, 0).unwrap())),
            (
                "Wed 11 Oct 23 at 2:00PM",
                Some(date(2023, 10, 11).and_hms_opt(14, 0, 0).unwrap()),
            ),
            (
                "2024-03-15T09:30:00Z",
                Some(date(2024, 3, 15).and_hms_opt(9, 30, 0).unwrap()),
            ),
            (
                "2024-03-15 17:45",
                Some(date(2024, 3, 15).and_hms_opt(17, 45, 0).unwrap()),
            ),
            ("2024-03-15", Some(date(2024, 3, 15).and_hms_opt(0, 0, 0).unwrap())),
            ("Mon Jun 10 19", Some(date(2019, 6, 10).and_hms_opt(0, 0, 0).unwrap())),
            ("Mon Jun 10 2019", Some(date(2019, 6, 10).and_hms_opt(0, 0, 0).unwrap())),
            (
                "Mon 10 Jun 19 at 17:00",
                Some(date(2019, 6, 10).and_hms_opt(17, 0, 0).unwrap()),
            ),
            (
                "Mon Jun 10 19 at 17:00",
                Some(date(2019, 6, 10).and_hms_opt(17, 0, 0).unwrap()),
            ),
            (
                "Mon 10 Jun 19 at 5PM",
                Some(date(2019, 6, 10).and_hms_opt(17, 0, 0).unwrap()),
            ),
            (
                "Mon Jun 10 19 at 9:15 AM",
                Some(date(2019, 6, 10).and_hms_opt(9, 15, 0).unwrap()),
            ),
            (
                "10 Jun 2019 17:00",
                Some(date(2019, 6, 10).and_hms_opt(17, 0, 0).unwrap()),
            ),
            ("Jun 10 19", Some(date(2019, 6, 10).and_hms_opt(0, 0, 0).unwrap())),
            ("never", None),
            ("", None),
        ];
        for (raw, expected) in cases {
            assert_eq!(parse_due(raw), expected, "raw {raw:?}");
        }
    }

    #[test]
    fn test_parse_entry_all_fields() {
        let task = parse_entry(&entry(
            "1",
            Some(rtm_content("Work, Urgent", "Wed 11 Oct 23 at 2:00PM", "none")),
        ));

        assert_eq!(task.id, "1");
        assert_eq!(task.title, "Task 1");
        assert_eq!(
            task.tags,
            Some(vec!["Work".to_string(), "Urgent".to_string()])
        );
        assert_eq!(task.due.map(|d| d.hour()), Some(14));
        assert_eq!(task.priority, Some(0));
    }

    #[test]
    fn test_parse_entry_without_content() {
        for content in [None, Some(String::new()), Some("   ".to_string())] {
            let task = parse_entry(&entry("2", content));
            assert_eq!(task.title, "Task 2");
            assert!(task.link.ends_with("/2"));
            assert!(task.tags.is_none());
            assert!(task.due.is_none());
            assert!(task.priority.is_none());
        }
    }

    #[test]
    fn test_parse_entry_tolerates_bad_values() {
        let task = parse_entry(&entry("3", Some(rtm_content("Home", "never", "urgent"))));
        assert_eq!(task.tags, Some(vec!["Home".to_string()]));
        assert!(task.due.is_none());
        assert!(task.priority.is_none());
    }

    #[test]
    fn test_parse_snapshot_keeps_feed_order() {
        let document = FeedDocument::new(vec![
            entry("b", None),
            entry("a", None),
            entry("c", None),
        ]);
        let snapshot = parse_snapshot(&document);
        let ids: Vec<&str> = snapshot.keys().map(String::as_str).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }
}
