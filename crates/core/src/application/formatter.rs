// Notification Formatter - Renders a task for one recipient as plain text and HTML

use crate::domain::{Recipient, Task};
use chrono::{NaiveDateTime, Timelike};

/// Rendered in place of the due date when a task has none
pub const NO_DUE_DATE: &str = "no due date";

/// Plain-text and HTML bodies of one notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub text: String,
    pub html: String,
}

/// Render both bodies for a task and recipient
pub fn format(task: &Task, recipient: &Recipient) -> Notification {
    Notification {
        text: render_text(task, recipient),
        html: render_html(task, recipient),
    }
}

/// Due date as "Fri Mar 15, 2024", with " @ 2:00 PM" unless the time is midnight
///
/// A zero hour means the task has no specific time of day.
pub fn format_due(due: Option<NaiveDateTime>) -> String {
    let Some(due) = due else {
        return NO_DUE_DATE.to_string();
    };

    let mut rendered = due.format("%a %b %-d, %Y").to_string();
    if due.hour() != 0 {
        rendered.push_str(" @ ");
        rendered.push_str(&due.format("%-I:%M %p").to_string());
    }
    rendered
}

fn format_priority(task: &Task) -> String {
    task.priority.unwrap_or(0).to_string()
}

fn format_tags(task: &Task) -> String {
    task.tags().join(", ")
}

/// Plain-text body (title upper-cased)
pub fn render_text(task: &Task, recipient: &Recipient) -> String {
    format!(
        "{name}, you have a new task on Remember the Milk:\n\
         \n\
         {title}\n\
         Due: {due}\n\
         Priority: {priority}\n\
         Tags: {tags}\n\
         \n\
         You can view more information at:\n\
         {link}\n\
         or by using your Remember the Milk app.\n",
        name = recipient.name,
        title = task.title.to_uppercase(),
        due = format_due(task.due),
        priority = format_priority(task),
        tags = format_tags(task),
        link = task.link,
    )
}

/// HTML body (title as written, linked to the task)
pub fn render_html(task: &Task, recipient: &Recipient) -> String {
    let link = html_escape(&task.link);
    format!(
        "<html>\n\
         <head></head>\n\
         <body>\n\
         <p><b>{name}, you have a new task on Remember the Milk:</b></p><br/>\n\
         <h2 style=\"margin-left: 20pt\"><a href=\"{link}\">{title}</a></h2>\n\
         <p style=\"margin-left: 20pt\"><b>Due:</b> {due}<br/>\n\
         <b>Priority:</b> {priority}<br/>\n\
         <b>Tags:</b> {tags}</p><br/>\n\
         <p>You can view more information at: <br/>\n\
         <a href=\"{link}\">{link}</a> <br/>\n\
         or by using your Remember the Milk app.</p>\n\
         </body>\n\
         </html>\n",
        name = html_escape(&recipient.name),
        title = html_escape(&task.title),
        due = format_due(task.due),
        priority = format_priority(task),
        tags = html_escape(&format_tags(task)),
        link = link,
    )
}

fn html_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn due(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn task() -> Task {
        let mut task = Task::new(
            "42",
            "Pick up van",
            None,
            "https://www.rememberthemilk.com/app/#all/98765432",
        );
        task.tags = Some(vec!["Work".to_string(), "Urgent".to_string()]);
        task.due = Some(due(14, 0));
        task.priority = Some(2);
        task
    }

    fn alice() -> Recipient {
        Recipient::new("Alice", "alice@example.com")
    }

    #[test]
    fn test_format_due_midnight_has_no_time() {
        assert_eq!(format_due(Some(due(0, 0))), "Tue Mar 5, 2024");
    }

    #[test]
    fn test_format_due_afternoon_strips_leading_zero() {
        assert_eq!(format_due(Some(due(14, 0))), "Tue Mar 5, 2024 @ 2:00 PM");
        assert_eq!(format_due(Some(due(9, 30))), "Tue Mar 5, 2024 @ 9:30 AM");
        assert_eq!(format_due(Some(due(23, 5))), "Tue Mar 5, 2024 @ 11:05 PM");
    }

    #[test]
    fn test_format_due_missing_uses_placeholder() {
        assert_eq!(format_due(None), NO_DUE_DATE);
    }

    #[test]
    fn test_render_text() {
        let text = render_text(&task(), &alice());
        assert!(text.starts_with("Alice, you have a new task on Remember the Milk:"));
        assert!(text.contains("\nPICK UP VAN\n"));
        assert!(text.contains("Due: Tue Mar 5, 2024 @ 2:00 PM\n"));
        assert!(text.contains("Priority: 2\n"));
        assert!(text.contains("Tags: Work, Urgent\n"));
        assert!(text.contains("https://www.rememberthemilk.com/app/#all/98765432\n"));
    }

    #[test]
    fn test_render_html_keeps_title_case_and_links() {
        let html = render_html(&task(), &alice());
        assert!(html.contains(
            "<a href=\"https://www.rememberthemilk.com/app/#all/98765432\">Pick up van</a>"
        ));
        assert!(!html.contains("PICK UP VAN"));
        assert!(html.contains("<b>Tags:</b> Work, Urgent</p>"));
    }

    #[test]
    fn test_render_html_escapes_markup() {
        let mut task = task();
        task.title = "Fix <b> & co".to_string();
        let html = render_html(&task, &alice());
        assert!(html.contains("Fix &lt;b&gt; &amp; co"));
    }

    #[test]
    fn test_format_without_optional_fields() {
        let task = Task::new("7", "Bare task", None, "https://x/7");
        let notification = format(&task, &alice());

        assert!(notification.text.contains("Due: no due date\n"));
        assert!(notification.text.contains("Priority: 0\n"));
        assert!(notification.text.contains("Tags: \n"));
        assert!(notification.html.contains("<b>Due:</b> no due date<br/>"));
    }
}
