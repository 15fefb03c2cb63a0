//! Branch name derivation
//!
//! Names have the shape `{prefix}-{ticket}-{summary}`, are lowercase, use only
//! `[a-z0-9-]` and never exceed [`MAX_BRANCH_LENGTH`] characters.

use crate::error::BranchError;

/// Upper bound for generated branch names
pub const MAX_BRANCH_LENGTH: usize = 50;

/// Shortest summary worth keeping when a name has to be shortened
const MIN_SUMMARY_LENGTH: usize = 5;

/// Normalize free text into a branch name component
///
/// Lowercases, turns spaces and underscores into hyphens, drops everything
/// outside `[a-z0-9-]`, collapses hyphen runs and trims hyphens at both ends.
/// Applying it twice gives the same result as applying it once.
pub fn format_component(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut prev_dash = false;

    for ch in input.to_lowercase().chars() {
        let ch = if ch == ' ' || ch == '_' { '-' } else { ch };
        if ch == '-' {
            if !prev_dash && !result.is_empty() {
                result.push('-');
            }
            prev_dash = true;
        } else if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            result.push(ch);
            prev_dash = false;
        }
    }

    while result.ends_with('-') {
        result.pop();
    }
    result
}

/// Build `{prefix}-{ticket}-{summary}` within [`MAX_BRANCH_LENGTH`]
///
/// `ticket` and `summary` are normalized with [`format_component`]; `prefix`
/// is used as given. When the name is too long the summary is shortened, unless
/// fewer than five characters would remain for it, in which case the whole
/// name is cut at the limit.
pub fn generate_branch_name(ticket: &str, summary: &str, prefix: &str) -> String {
    let ticket = format_component(ticket);
    let summary = format_component(summary);
    let name = format!("{prefix}-{ticket}-{summary}");

    if name.chars().count() <= MAX_BRANCH_LENGTH {
        return name;
    }

    let head = format!("{prefix}-{ticket}-");
    let truncated = match MAX_BRANCH_LENGTH.checked_sub(head.chars().count()) {
        Some(remaining) if remaining >= MIN_SUMMARY_LENGTH => {
            format!("{head}{}", truncate_chars(&summary, remaining))
        }
        _ => truncate_chars(&name, MAX_BRANCH_LENGTH).to_string(),
    };

    truncated.trim_end_matches('-').to_string()
}

/// Check a generated name before it is handed to git
///
/// # Errors
/// Returns `BranchError::InvalidName` when the name is empty, lacks the
/// `{prefix}-` start, contains characters outside `[a-z0-9-]`, has an empty
/// component or is longer than [`MAX_BRANCH_LENGTH`].
pub fn validate_branch_name(name: &str, prefix: &str) -> Result<(), BranchError> {
    let invalid = |reason: &str| {
        Err(BranchError::InvalidName {
            name: name.to_string(),
            reason: reason.to_string(),
        })
    };

    if name.is_empty() {
        return invalid("name is empty");
    }
    if !name.starts_with(&format!("{prefix}-")) {
        return invalid(&format!("name must start with '{prefix}-'"));
    }
    if let Some(bad) = name
        .chars()
        .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
    {
        return invalid(&format!("character '{bad}' is not allowed"));
    }
    if name.contains("--") || name.ends_with('-') {
        return invalid("ticket and summary must not be empty");
    }
    if name.len() > MAX_BRANCH_LENGTH {
        return invalid(&format!(
            "name is {} characters long (max {MAX_BRANCH_LENGTH})",
            name.len()
        ));
    }
    Ok(())
}

fn truncate_chars(s: &str, max: usize) -> &str {
    s.char_indices().nth(max).map_or(s, |(idx, _)| &s[..idx])
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "",
        "Fix: Login!",
        "  leading and trailing  ",
        "snake_case_words",
        "--already--hyphenated--",
        "MiXeD CaSe 123",
        "émoji 🚀 and ünïcode",
        "tabs\tand\nnewlines",
        "PROJ-4521",
        "!!!",
        "a_-_b",
        "___",
    ];

    fn matches_component_shape(s: &str) -> bool {
        s.is_empty()
            || (!s.starts_with('-')
                && !s.ends_with('-')
                && !s.contains("--")
                && s.chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'))
    }

    #[test]
    fn test_format_component_example() {
        assert_eq!(format_component("Fix: Login!"), "fix-login");
    }

    #[test]
    fn test_format_component_spaces_and_underscores() {
        assert_eq!(format_component("add user_profile page"), "add-user-profile-page");
        assert_eq!(format_component("a_-_b"), "a-b");
    }

    #[test]
    fn test_format_component_drops_other_whitespace() {
        // Only spaces and underscores become hyphens
        assert_eq!(format_component("tabs\tand"), "tabsand");
    }

    #[test]
    fn test_format_component_empty_results() {
        assert_eq!(format_component(""), "");
        assert_eq!(format_component("!!!"), "");
        assert_eq!(format_component("___"), "");
    }

    #[test]
    fn test_format_component_is_idempotent() {
        for sample in SAMPLES {
            let once = format_component(sample);
            assert_eq!(format_component(&once), once, "input: {sample:?}");
        }
    }

    #[test]
    fn test_format_component_output_shape() {
        for sample in SAMPLES {
            let formatted = format_component(sample);
            assert!(
                matches_component_shape(&formatted),
                "{sample:?} -> {formatted:?}"
            );
        }
    }

    #[test]
    fn test_generate_branch_name_example() {
        assert_eq!(
            generate_branch_name("issue-123", "fix user login", "alice"),
            "alice-issue-123-fix-user-login"
        );
    }

    #[test]
    fn test_generate_branch_name_normalizes_parts() {
        assert_eq!(
            generate_branch_name("PROJ_42", "Add OAuth: Google & GitHub", "bob"),
            "bob-proj-42-add-oauth-google-github"
        );
    }

    #[test]
    fn test_generate_branch_name_exactly_at_limit_is_untouched() {
        // 5 + 1 + 4 + 1 + 39 = 50
        let summary = "a".repeat(39);
        let name = generate_branch_name("t-12", &summary, "alice");
        assert_eq!(name.len(), MAX_BRANCH_LENGTH);
        assert!(name.ends_with(&summary));
    }

    #[test]
    fn test_generate_branch_name_truncates_summary_only() {
        let name = generate_branch_name(
            "issue-123",
            "refactor the entire authentication subsystem for multi tenant support",
            "alice",
        );
        assert!(name.len() <= MAX_BRANCH_LENGTH);
        assert!(name.starts_with("alice-issue-123-refactor"));
        assert!(!name.ends_with('-'));
    }

    #[test]
    fn test_generate_branch_name_strips_trailing_hyphen_after_cut() {
        // head is "alice-issue-123-" (16 chars), 34 left for the summary;
        // the cut lands right after "aaaa...a-" so the hyphen must go
        let summary = format!("{}-{}", "a".repeat(33), "b".repeat(20));
        let name = generate_branch_name("issue-123", &summary, "alice");
        assert_eq!(name, format!("alice-issue-123-{}", "a".repeat(33)));
    }

    #[test]
    fn test_generate_branch_name_keeps_ticket_when_summary_can_shrink() {
        // prefix + ticket + 2 hyphens = 44, leaving 6 >= 5 for the summary
        let prefix = "a".repeat(10);
        let ticket = "t".repeat(32);
        let name = generate_branch_name(&ticket, "long summary text here", &prefix);
        assert_eq!(name.len(), MAX_BRANCH_LENGTH);
        assert!(name.contains(&ticket));
        assert!(name.ends_with("-long-s"));
    }

    #[test]
    fn test_generate_branch_name_hard_truncates_when_little_room() {
        // 10 + 1 + 36 + 1 = 48, only 2 characters would be left for the summary
        let prefix = "a".repeat(10);
        let ticket = "t".repeat(36);
        let name = generate_branch_name(&ticket, "summary", &prefix);
        assert_eq!(name.len(), MAX_BRANCH_LENGTH);
        assert_eq!(name, format!("{prefix}-{}-su", "t".repeat(36)));
    }

    #[test]
    fn test_generate_branch_name_hard_truncates_when_prefix_and_ticket_overflow() {
        let prefix = "alice";
        let ticket = "x".repeat(60);
        let name = generate_branch_name(&ticket, "fix", prefix);
        assert_eq!(name.len(), MAX_BRANCH_LENGTH);
        assert!(name.starts_with("alice-xxxx"));
    }

    #[test]
    fn test_generate_branch_name_never_exceeds_limit() {
        for ticket in SAMPLES {
            for summary in SAMPLES {
                let long_summary = format!("{summary} {}", "word ".repeat(20));
                let name = generate_branch_name(ticket, &long_summary, "someone");
                assert!(name.len() <= MAX_BRANCH_LENGTH, "{name}");
            }
        }
    }

    #[test]
    fn test_validate_accepts_generated_name() {
        let name = generate_branch_name("issue-123", "fix user login", "alice");
        assert!(validate_branch_name(&name, "alice").is_ok());
    }

    #[test]
    fn test_validate_rejects_empty() {
        assert!(matches!(
            validate_branch_name("", "alice"),
            Err(BranchError::InvalidName { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_missing_prefix() {
        assert!(validate_branch_name("bob-issue-1-fix", "alice").is_err());
        // the prefix must be followed by a hyphen
        assert!(validate_branch_name("aliceissue-1-fix", "alice").is_err());
    }

    #[test]
    fn test_validate_rejects_bad_characters() {
        let err = validate_branch_name("alice-issue-1-Fix", "alice").unwrap_err();
        assert!(err.to_string().contains("'F'"));
        assert!(validate_branch_name("alice-issue/1-fix", "alice").is_err());
    }

    #[test]
    fn test_validate_rejects_empty_components() {
        assert!(validate_branch_name("alice--fix", "alice").is_err());
        assert!(validate_branch_name("alice-issue-1-", "alice").is_err());
    }

    #[test]
    fn test_validate_rejects_too_long() {
        let name = format!("alice-{}", "a".repeat(45));
        assert_eq!(name.len(), 51);
        let err = validate_branch_name(&name, "alice").unwrap_err();
        assert!(err.to_string().contains("max 50"));
    }
}
