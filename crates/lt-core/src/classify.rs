//! Classification of logind messages into session-boundary events.
//!
//! The rules form an ordered table evaluated top to bottom; the first rule
//! whose predicate matches decides the kind. Lines no rule recognizes are
//! [`EventKind::Unknown`].

use crate::event_kind::EventKind;

/// One entry of the classification table.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    /// Short identifier, used in trace output.
    pub name: &'static str,
    /// Predicate over the message tokens and the current user.
    pub matches: fn(&[&str], &str) -> bool,
    /// Kind assigned when the predicate matches.
    pub kind: EventKind,
}

/// The logind rules, in priority order.
pub const RULES: &[Rule] = &[
    Rule {
        name: "lid_opened",
        matches: lid_opened,
        kind: EventKind::In,
    },
    Rule {
        name: "lid_closed",
        matches: lid_closed,
        kind: EventKind::Out,
    },
    Rule {
        name: "suspending",
        matches: suspending,
        kind: EventKind::Out,
    },
    Rule {
        name: "sleep_finished",
        matches: sleep_finished,
        kind: EventKind::Out,
    },
    Rule {
        name: "user_session",
        matches: user_session,
        kind: EventKind::In,
    },
];

fn starts_with(tokens: &[&str], words: &[&str]) -> bool {
    tokens.len() >= words.len() && tokens.iter().zip(words).all(|(t, w)| t == w)
}

fn lid_opened(tokens: &[&str], _user: &str) -> bool {
    starts_with(tokens, &["Lid", "opened."])
}

fn lid_closed(tokens: &[&str], _user: &str) -> bool {
    starts_with(tokens, &["Lid", "closed."])
}

fn suspending(tokens: &[&str], _user: &str) -> bool {
    starts_with(tokens, &["Suspending..."])
}

fn sleep_finished(tokens: &[&str], _user: &str) -> bool {
    starts_with(tokens, &["Operation", "Sleep", "finished"])
}

// The user is matched anywhere in the joined message, e.g. "user alice."
fn user_session(tokens: &[&str], user: &str) -> bool {
    starts_with(tokens, &["New", "session"]) && tokens.join(" ").contains(user)
}

/// Returns the first rule of `rules` matching the message, if any.
pub fn first_match<'r>(rules: &'r [Rule], tokens: &[&str], current_user: &str) -> Option<&'r Rule> {
    rules.iter().find(|rule| (rule.matches)(tokens, current_user))
}

/// Classifies message tokens against an arbitrary rule table.
pub fn classify_with(rules: &[Rule], tokens: &[&str], current_user: &str) -> EventKind {
    first_match(rules, tokens, current_user).map_or(EventKind::Unknown, |rule| rule.kind)
}

/// Classifies message tokens with the logind [`RULES`].
///
/// `tokens` are the whitespace-separated words of the log message, without
/// the timestamp, host and unit columns. `current_user` is the login name a
/// "New session" line must mention to count as the start of a session.
pub fn classify(tokens: &[&str], current_user: &str) -> EventKind {
    classify_with(RULES, tokens, current_user)
}

/// Classifier bound to a single user identity.
#[derive(Debug, Clone)]
pub struct LineClassifier {
    current_user: String,
}

impl LineClassifier {
    pub fn new(current_user: impl Into<String>) -> Self {
        Self {
            current_user: current_user.into(),
        }
    }

    pub fn classify(&self, tokens: &[&str]) -> EventKind {
        first_match(RULES, tokens, &self.current_user).map_or(EventKind::Unknown, |rule| {
            tracing::trace!(rule = rule.name, "classified message");
            rule.kind
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lid_events() {
        assert_eq!(classify(&["Lid", "opened."], "alice"), EventKind::In);
        assert_eq!(classify(&["Lid", "closed."], "alice"), EventKind::Out);
    }

    #[test]
    fn power_events() {
        assert_eq!(classify(&["Suspending..."], "alice"), EventKind::Out);
        assert_eq!(
            classify(&["Operation", "Sleep", "finished"], "alice"),
            EventKind::Out
        );
        assert_eq!(
            classify(&["Operation", "'sleep'", "finished."], "alice"),
            EventKind::Unknown
        );
    }

    #[test]
    fn new_session_requires_current_user() {
        let tokens = ["New", "session", "12", "of", "user", "alice."];
        assert_eq!(classify(&tokens, "alice"), EventKind::In);
        assert_eq!(classify(&tokens, "bob"), EventKind::Unknown);
    }

    #[test]
    fn user_matches_as_substring() {
        let tokens = ["New", "session", "c3", "of", "user", "gdm-greeter."];
        assert_eq!(classify(&tokens, "gdm"), EventKind::In);
    }

    #[test]
    fn user_name_outside_new_session_is_unknown() {
        let tokens = ["Removed", "session", "12", "of", "user", "alice."];
        assert_eq!(classify(&tokens, "alice"), EventKind::Unknown);
    }

    #[test]
    fn unrecognized_and_short_messages_are_unknown() {
        assert_eq!(classify(&["random", "text"], "alice"), EventKind::Unknown);
        assert_eq!(classify(&[], "alice"), EventKind::Unknown);
        assert_eq!(classify(&["Lid"], "alice"), EventKind::Unknown);
        assert_eq!(classify(&["Operation", "Sleep"], "alice"), EventKind::Unknown);
        assert_eq!(classify(&["New"], "alice"), EventKind::Unknown);
    }

    #[test]
    fn trailing_tokens_are_ignored() {
        assert_eq!(
            classify(&["Lid", "opened.", "(extra)"], "alice"),
            EventKind::In
        );
    }

    #[test]
    fn first_matching_rule_wins() {
        fn any_lid(tokens: &[&str], _user: &str) -> bool {
            tokens.first() == Some(&"Lid")
        }
        let table = [
            RULES[0],
            Rule {
                name: "any_lid",
                matches: any_lid,
                kind: EventKind::Out,
            },
        ];
        assert_eq!(
            classify_with(&table, &["Lid", "opened."], "alice"),
            EventKind::In
        );
        assert_eq!(
            first_match(&table, &["Lid", "opened."], "alice").map(|r| r.name),
            Some("lid_opened")
        );
        assert_eq!(
            classify_with(&table, &["Lid", "switched."], "alice"),
            EventKind::Out
        );
    }

    #[test]
    fn rule_table_order() {
        let names: Vec<_> = RULES.iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            [
                "lid_opened",
                "lid_closed",
                "suspending",
                "sleep_finished",
                "user_session"
            ]
        );
    }

    #[test]
    fn line_classifier_matches_free_function() {
        let classifier = LineClassifier::new("alice");
        let tokens = ["New", "session", "3", "of", "user", "alice."];
        assert_eq!(classifier.classify(&tokens), classify(&tokens, "alice"));
    }
}
