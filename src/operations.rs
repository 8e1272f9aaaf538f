/// Dashboard list operations: filtering, sorting, stats
use crate::email_data::CapturedEmail;

/// Sortable columns of the email list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Capture wall-clock time (the default)
    CapturedAt,
    Subject,
    Sender,
    /// The message's own date, as extracted
    Timestamp,
}

impl SortKey {
    pub fn parse(value: &str) -> SortKey {
        match value {
            "subject" => SortKey::Subject,
            "sender" => SortKey::Sender,
            "timestamp" => SortKey::Timestamp,
            _ => SortKey::CapturedAt,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::CapturedAt => "captured_at",
            SortKey::Subject => "subject",
            SortKey::Sender => "sender",
            SortKey::Timestamp => "timestamp",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn toggled(&self) -> SortOrder {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }
}

/// Case-insensitive substring match over subject, sender, and body
pub fn filter_emails(emails: &[CapturedEmail], query: &str) -> Vec<CapturedEmail> {
    if query.is_empty() {
        return emails.to_vec();
    }

    let needle = query.to_lowercase();
    emails
        .iter()
        .filter(|email| {
            email.subject.to_lowercase().contains(&needle)
                || email.sender.to_lowercase().contains(&needle)
                || email.body.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

/// Sort a copy of the list. `sort_by` keeps equal keys in their
/// incoming order.
pub fn sort_emails(emails: &[CapturedEmail], key: SortKey, order: SortOrder) -> Vec<CapturedEmail> {
    let mut sorted = emails.to_vec();

    sorted.sort_by(|a, b| {
        let ordering = match key {
            // ISO-8601 strings order chronologically as text
            SortKey::CapturedAt => a.captured_at.cmp(&b.captured_at),
            SortKey::Subject => a.subject.to_lowercase().cmp(&b.subject.to_lowercase()),
            SortKey::Sender => a.sender.to_lowercase().cmp(&b.sender.to_lowercase()),
            SortKey::Timestamp => a.timestamp.cmp(&b.timestamp),
        };
        match order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    });

    sorted
}

/// Header stats: (total, with non-empty annotations, latest capture time)
pub fn collection_stats(emails: &[CapturedEmail]) -> (usize, usize, Option<String>) {
    let annotated = emails
        .iter()
        .filter(|email| !email.annotations.is_empty())
        .count();
    let latest = emails
        .iter()
        .map(|email| email.captured_at.as_str())
        .max()
        .map(|s| s.to_string());

    (emails.len(), annotated, latest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email(id: i64, subject: &str, sender: &str, body: &str, captured_at: &str) -> CapturedEmail {
        CapturedEmail {
            id,
            message_id: format!("m{}", id),
            subject: subject.to_string(),
            sender: sender.to_string(),
            timestamp: captured_at.to_string(),
            body: body.to_string(),
            url: "https://mail.example.com/?th=x".to_string(),
            captured_at: captured_at.to_string(),
            annotations: String::new(),
        }
    }

    fn sample() -> Vec<CapturedEmail> {
        vec![
            email(
                1,
                "Invoice #42",
                "billing@acme.com",
                "Payment due",
                "2026-03-01T10:00:00.000Z",
            ),
            email(
                2,
                "Team lunch",
                "maria@example.org",
                "Pizza on Friday",
                "2026-03-03T09:00:00.000Z",
            ),
            email(
                3,
                "weekly digest",
                "news@example.org",
                "Top stories this week, including invoices",
                "2026-03-02T08:30:00.000Z",
            ),
        ]
    }

    #[test]
    fn test_filter_matches_any_field_case_insensitive() {
        let emails = sample();

        let by_subject = filter_emails(&emails, "INVOICE");
        assert_eq!(
            by_subject.iter().map(|e| e.id).collect::<Vec<_>>(),
            vec![1, 3]
        );

        let by_sender = filter_emails(&emails, "maria@");
        assert_eq!(by_sender.len(), 1);
        assert_eq!(by_sender[0].id, 2);

        let by_body = filter_emails(&emails, "pizza");
        assert_eq!(by_body.len(), 1);
        assert_eq!(by_body[0].id, 2);
    }

    #[test]
    fn test_filter_empty_query_returns_all() {
        let emails = sample();
        assert_eq!(filter_emails(&emails, "").len(), 3);
    }

    #[test]
    fn test_filter_no_match() {
        let emails = sample();
        assert!(filter_emails(&emails, "zzzzz").is_empty());
    }

    #[test]
    fn test_sort_captured_at_descending_newest_first() {
        let sorted = sort_emails(&sample(), SortKey::CapturedAt, SortOrder::Descending);

        assert_eq!(
            sorted.iter().map(|e| e.id).collect::<Vec<_>>(),
            vec![2, 3, 1]
        );
    }

    #[test]
    fn test_sort_order_toggle_reverses() {
        let emails = sample();
        let desc = sort_emails(&emails, SortKey::CapturedAt, SortOrder::Descending);
        let asc = sort_emails(&emails, SortKey::CapturedAt, SortOrder::Descending.toggled());

        let desc_ids: Vec<_> = desc.iter().map(|e| e.id).collect();
        let mut asc_ids: Vec<_> = asc.iter().map(|e| e.id).collect();
        asc_ids.reverse();

        assert_eq!(desc_ids, asc_ids);
    }

    #[test]
    fn test_sort_subject_is_case_insensitive() {
        let sorted = sort_emails(&sample(), SortKey::Subject, SortOrder::Ascending);

        assert_eq!(sorted[0].subject, "Invoice #42");
        assert_eq!(sorted[1].subject, "Team lunch");
        assert_eq!(sorted[2].subject, "weekly digest");
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let mut emails = sample();
        for e in &mut emails {
            e.captured_at = "2026-03-01T10:00:00.000Z".to_string();
        }

        let sorted = sort_emails(&emails, SortKey::CapturedAt, SortOrder::Descending);

        assert_eq!(
            sorted.iter().map(|e| e.id).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_sort_key_parse_round_trip() {
        for key in [
            SortKey::CapturedAt,
            SortKey::Subject,
            SortKey::Sender,
            SortKey::Timestamp,
        ] {
            assert_eq!(SortKey::parse(key.as_str()), key);
        }
        assert_eq!(SortKey::parse("garbage"), SortKey::CapturedAt);
    }

    #[test]
    fn test_collection_stats() {
        let mut emails = sample();
        emails[0].annotations = "paid".to_string();

        let (total, annotated, latest) = collection_stats(&emails);

        assert_eq!(total, 3);
        assert_eq!(annotated, 1);
        assert_eq!(latest.as_deref(), Some("2026-03-03T09:00:00.000Z"));
    }

    #[test]
    fn test_collection_stats_empty() {
        let (total, annotated, latest) = collection_stats(&[]);

        assert_eq!(total, 0);
        assert_eq!(annotated, 0);
        assert!(latest.is_none());
    }
}
