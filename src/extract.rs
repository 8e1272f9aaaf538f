/// Heuristic email field extraction for MailClip
///
/// The webmail DOM is not ours and changes without notice, so extraction is
/// best-effort: candidate nodes are harvested by a selector set, then
/// classified by a fixed-order rule list. If nothing at all is recognized the
/// capture is abandoned rather than posting garbage.
use crate::email_data::EmailDraft;
use crate::message_id;

/// Selector for the webmail main content region
pub const MAIN_CONTENT_SELECTOR: &str = "[role=\"main\"]";

/// Selector matching every node worth classifying
pub const CANDIDATE_SELECTOR: &str =
    "h2, .gD, .yW, .xW, .xY, .a3s, .ii, [data-email], [aria-label*=\"email\"], [title*=\"@\"]";

/// Page chrome the fallback body scan must stay out of
pub const CHROME_SELECTOR: &str =
    "nav, header, footer, [role=\"navigation\"], [role=\"banner\"], [role=\"complementary\"]";

const SUBJECT_MAX_CHARS: usize = 200;
const SENDER_MAX_CHARS: usize = 100;
const TIMESTAMP_MAX_CHARS: usize = 50;
const BODY_MIN_CHARS: usize = 100;
const FALLBACK_BODY_MIN_CHARS: usize = 200;
const FALLBACK_MAX_CHILDREN: u32 = 50;

/// A DOM node reduced to what classification looks at
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Lowercase tag name
    pub tag: String,
    /// Raw class attribute
    pub classes: String,
    /// Trimmed text content
    pub text: String,
}

impl Candidate {
    pub fn new(tag: &str, classes: &str, text: &str) -> Candidate {
        Candidate {
            tag: tag.to_lowercase(),
            classes: classes.to_string(),
            text: text.trim().to_string(),
        }
    }

    fn chars(&self) -> usize {
        self.text.chars().count()
    }
}

/// A descendant node considered by the fallback body scan
#[derive(Debug, Clone, PartialEq)]
pub struct BodyCandidate {
    pub text: String,
    pub child_count: u32,
    /// True when the node sits inside navigation/header/footer chrome
    pub in_chrome: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Subject,
    Sender,
    Timestamp,
    Body,
}

/// One classification heuristic: first matching candidate fills the field
pub struct FieldRule {
    pub field: Field,
    pub matches: fn(&Candidate) -> bool,
}

/// The heuristics, in evaluation order. Data, not control flow: reordering or
/// extending this table is the whole maintenance surface for markup changes.
pub const FIELD_RULES: &[FieldRule] = &[
    FieldRule {
        field: Field::Subject,
        matches: |c| {
            (c.tag == "h2" || c.classes.contains("hP"))
                && !c.text.is_empty()
                && c.chars() < SUBJECT_MAX_CHARS
        },
    },
    FieldRule {
        field: Field::Sender,
        matches: |c| {
            (c.classes.contains("gD") || c.classes.contains("yW") || c.text.contains('@'))
                && c.text.contains('@')
                && c.chars() < SENDER_MAX_CHARS
        },
    },
    FieldRule {
        field: Field::Timestamp,
        matches: |c| {
            (c.classes.contains("xW") || c.classes.contains("xY"))
                && !c.text.is_empty()
                && c.chars() < TIMESTAMP_MAX_CHARS
        },
    },
    FieldRule {
        field: Field::Body,
        matches: |c| {
            (c.classes.contains("a3s") || c.classes.contains("ii")) && c.chars() > BODY_MIN_CHARS
        },
    },
];

/// Fields recovered from one pass over the candidate set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedFields {
    pub subject: Option<String>,
    pub sender: Option<String>,
    pub timestamp: Option<String>,
    pub body: Option<String>,
}

impl ExtractedFields {
    /// Nothing recognizable at all: the markup has probably changed
    pub fn is_empty(&self) -> bool {
        self.subject.is_none() && self.sender.is_none() && self.body.is_none()
    }

    fn slot(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Subject => &mut self.subject,
            Field::Sender => &mut self.sender,
            Field::Timestamp => &mut self.timestamp,
            Field::Body => &mut self.body,
        }
    }
}

/// Single pass: each rule claims the first candidate it matches
pub fn classify(candidates: &[Candidate]) -> ExtractedFields {
    let mut fields = ExtractedFields::default();

    for candidate in candidates {
        if candidate.text.is_empty() {
            continue;
        }
        for rule in FIELD_RULES {
            let slot = fields.slot(rule.field);
            if slot.is_none() && (rule.matches)(candidate) {
                *slot = Some(candidate.text.clone());
            }
        }
    }

    fields
}

/// Longest qualifying text block outside the page chrome. Used only when the
/// primary pass found no body.
pub fn pick_fallback_body(candidates: &[BodyCandidate]) -> Option<String> {
    let mut best: Option<&BodyCandidate> = None;
    let mut best_len = FALLBACK_BODY_MIN_CHARS;

    for candidate in candidates {
        let len = candidate.text.trim().chars().count();
        if len > best_len && candidate.child_count < FALLBACK_MAX_CHILDREN && !candidate.in_chrome {
            best = Some(candidate);
            best_len = len;
        }
    }

    best.map(|c| c.text.trim().to_string())
}

/// Assemble the capture request, or None when extraction came up empty.
/// `now_iso` is the capture wall-clock time, injected so assembly stays pure.
pub fn build_draft(fields: ExtractedFields, url: &str, now_iso: &str) -> Option<EmailDraft> {
    if fields.is_empty() {
        return None;
    }

    let subject = fields.subject.unwrap_or_else(|| "No Subject".to_string());
    let sender = fields.sender.unwrap_or_else(|| "Unknown Sender".to_string());
    let timestamp = fields.timestamp.unwrap_or_else(|| now_iso.to_string());
    let body = fields.body.unwrap_or_else(|| "No body content".to_string());

    let message_id = message_id::derive_message_id(url, &subject, &sender, &timestamp);

    Some(EmailDraft {
        message_id,
        subject,
        sender,
        timestamp,
        body,
        url: url.to_string(),
        captured_at: now_iso.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message_view_candidates() -> Vec<Candidate> {
        vec![
            Candidate::new("h2", "hP", "Invoice #42"),
            Candidate::new("span", "gD", "billing@acme.com"),
            Candidate::new("span", "xW", "Mar 3, 2026, 9:14 AM"),
            Candidate::new(
                "div",
                "a3s aiL",
                &"Please remit payment for the attached invoice. ".repeat(4),
            ),
        ]
    }

    #[test]
    fn test_classify_full_message_view() {
        let fields = classify(&message_view_candidates());

        assert_eq!(fields.subject.as_deref(), Some("Invoice #42"));
        assert_eq!(fields.sender.as_deref(), Some("billing@acme.com"));
        assert_eq!(fields.timestamp.as_deref(), Some("Mar 3, 2026, 9:14 AM"));
        assert!(fields.body.is_some());
        assert!(!fields.is_empty());
    }

    #[test]
    fn test_classify_first_match_wins() {
        let candidates = vec![
            Candidate::new("h2", "hP", "First subject"),
            Candidate::new("h2", "hP", "Second subject"),
            Candidate::new("span", "gD", "first@acme.com"),
            Candidate::new("span", "gD", "second@acme.com"),
        ];

        let fields = classify(&candidates);

        assert_eq!(fields.subject.as_deref(), Some("First subject"));
        assert_eq!(fields.sender.as_deref(), Some("first@acme.com"));
    }

    #[test]
    fn test_classify_length_limits() {
        let long_subject = "x".repeat(200);
        let long_sender = format!("{}@acme.com", "y".repeat(100));
        let short_body = "too short to be a body";

        let candidates = vec![
            Candidate::new("h2", "", &long_subject),
            Candidate::new("span", "gD", &long_sender),
            Candidate::new("div", "a3s", short_body),
        ];

        let fields = classify(&candidates);

        assert!(fields.subject.is_none());
        assert!(fields.sender.is_none());
        assert!(fields.body.is_none());
        assert!(fields.is_empty());
    }

    #[test]
    fn test_classify_sender_requires_at_sign() {
        let candidates = vec![Candidate::new("span", "gD", "Billing Department")];

        let fields = classify(&candidates);

        assert!(fields.sender.is_none());
    }

    #[test]
    fn test_classify_sender_by_content_without_known_class() {
        let candidates = vec![Candidate::new("span", "", "reports@example.org")];

        let fields = classify(&candidates);

        assert_eq!(fields.sender.as_deref(), Some("reports@example.org"));
    }

    #[test]
    fn test_fallback_body_picks_longest_outside_chrome() {
        let candidates = vec![
            BodyCandidate {
                text: "n".repeat(300),
                child_count: 2,
                in_chrome: true,
            },
            BodyCandidate {
                text: "a".repeat(250),
                child_count: 3,
                in_chrome: false,
            },
            BodyCandidate {
                text: "b".repeat(400),
                child_count: 10,
                in_chrome: false,
            },
            BodyCandidate {
                text: "c".repeat(500),
                child_count: 80,
                in_chrome: false,
            },
        ];

        let body = pick_fallback_body(&candidates);

        assert_eq!(body, Some("b".repeat(400)));
    }

    #[test]
    fn test_fallback_body_requires_minimum_length() {
        let candidates = vec![BodyCandidate {
            text: "short".to_string(),
            child_count: 0,
            in_chrome: false,
        }];

        assert_eq!(pick_fallback_body(&candidates), None);
    }

    #[test]
    fn test_build_draft_fills_defaults() {
        let fields = ExtractedFields {
            subject: Some("Invoice #42".to_string()),
            sender: None,
            timestamp: None,
            body: None,
        };

        let draft = build_draft(
            fields,
            "https://mail.example.com/#inbox",
            "2026-03-03T17:20:05.000Z",
        )
        .unwrap();

        assert_eq!(draft.subject, "Invoice #42");
        assert_eq!(draft.sender, "Unknown Sender");
        assert_eq!(draft.timestamp, "2026-03-03T17:20:05.000Z");
        assert_eq!(draft.body, "No body content");
        assert_eq!(draft.captured_at, "2026-03-03T17:20:05.000Z");
        assert!(!draft.message_id.is_empty());
    }

    #[test]
    fn test_build_draft_none_when_nothing_found() {
        let draft = build_draft(
            ExtractedFields::default(),
            "https://mail.example.com/",
            "2026-03-03T17:20:05.000Z",
        );

        assert!(draft.is_none());
    }

    #[test]
    fn test_build_draft_uses_url_thread_id() {
        let fields = classify(&message_view_candidates());

        let draft = build_draft(
            fields,
            "https://mail.example.com/mail/u/0/?th=ABC",
            "2026-03-03T17:20:05.000Z",
        )
        .unwrap();

        assert_eq!(draft.message_id, "ABC");
    }

    #[test]
    fn test_build_draft_same_content_same_id() {
        let url = "https://mail.example.com/#inbox";
        let a = build_draft(classify(&message_view_candidates()), url, "t").unwrap();
        let b = build_draft(classify(&message_view_candidates()), url, "t").unwrap();

        assert_eq!(a.message_id, b.message_id);
    }
}
