use std::borrow::Borrow;

use chrono::Local;

use crate::model::entry::{LogEntry, SummaryTemplate};

const CONTEXT_HEADER: &str = "Here are the work logs for this period:";

const DEFAULT_SYSTEM_PROMPT: &str = "\
You are a professional weekly-report assistant. Based on the work logs the \
user provides, write a professional weekly work report.
Use this structure:
1. **Overview**: a short summary of the main work
2. **Completed**: finished tasks, as bullet points
3. **In progress**: tasks that are ongoing or unfinished
4. **Next week**: follow-up work suggested by the logs

Write the report in Markdown.";

/// The user message for a report: every log, oldest first, each under a
/// `--- Date: …, Title: … ---` line
pub fn build_prompt_context<E: Borrow<LogEntry>>(logs: &[E]) -> String {
    let mut sorted: Vec<&LogEntry> = logs.iter().map(Borrow::borrow).collect();
    sorted.sort_by_key(|log| (log.create_time, log.id));

    let mut context = format!("{}\n\n", CONTEXT_HEADER);
    for log in sorted {
        let date = log.create_time.with_timezone(&Local).format("%Y-%m-%d");
        context.push_str(&format!("--- Date: {}, Title: {} ---\n", date, log.title));
        context.push_str(&log.content);
        context.push_str("\n\n");
    }
    context
}

/// The system message: the built-in report structure, or the template's
/// content when it has any
pub fn system_prompt(template: Option<&SummaryTemplate>) -> String {
    match template {
        Some(t) if !t.content.trim().is_empty() => format!(
            "You are a professional weekly-report assistant. Based on the work logs \
             the user provides, write a weekly work report following this template:\n\n\
             {}\n\n\
             Keep the template's structure and formatting, and write the report in Markdown.",
            t.content
        ),
        _ => DEFAULT_SYSTEM_PROMPT.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::entry::Status;
    use chrono::{DateTime, TimeZone, Utc};

    fn log(id: u64, time: DateTime<Utc>, title: &str, content: &str) -> LogEntry {
        LogEntry {
            id,
            creator_id: 1,
            status: Status::Active,
            create_time: time,
            update_time: time,
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    fn local_date(time: DateTime<Utc>) -> String {
        time.with_timezone(&Local).format("%Y-%m-%d").to_string()
    }

    #[test]
    fn context_is_sorted_oldest_first() {
        let early = Utc.with_ymd_and_hms(2024, 5, 13, 12, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 5, 14, 12, 0, 0).unwrap();
        let logs = vec![
            log(2, late, "Tue", "- [ ] b"),
            log(1, early, "Mon", "- [x] a"),
        ];
        let context = build_prompt_context(&logs);
        let expected = format!(
            "{}\n\n--- Date: {}, Title: Mon ---\n- [x] a\n\n--- Date: {}, Title: Tue ---\n- [ ] b\n\n",
            CONTEXT_HEADER,
            local_date(early),
            local_date(late)
        );
        assert_eq!(context, expected);
    }

    #[test]
    fn template_content_replaces_default_structure() {
        let now = Utc::now();
        let mut template = SummaryTemplate {
            id: 1,
            creator_id: 1,
            status: Status::Active,
            create_time: now,
            update_time: now,
            name: "short".into(),
            is_default: true,
            content: "## Done\n## Risks".into(),
        };
        let prompt = system_prompt(Some(&template));
        assert!(prompt.contains("## Done\n## Risks"));
        assert!(!prompt.contains("**Overview**"));

        template.content = "   ".into();
        assert_eq!(system_prompt(Some(&template)), DEFAULT_SYSTEM_PROMPT);
        assert_eq!(system_prompt(None), DEFAULT_SYSTEM_PROMPT);
    }
}
