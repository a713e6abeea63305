//! Parse oracle replies

use kizuna_domain::TagSet;

/// Parse a relationship reply into a tag set
///
/// The reply is a comma-separated list. Surrounding whitespace, quotes and a
/// trailing period are dropped from each entry; an empty reply or a literal
/// `None` means no relationship. Unknown tags are kept.
///
/// # Examples
///
/// ```
/// use kizuna_tracker::parse_tag_list;
///
/// let tags = parse_tag_list(" rivals, friendship.\n");
/// assert_eq!(tags.to_string(), "friendship, rivals");
/// assert!(parse_tag_list("None").is_empty());
/// ```
pub fn parse_tag_list(reply: &str) -> TagSet {
    reply
        .split(',')
        .map(clean)
        .filter(|tag| !tag.is_empty() && !tag.eq_ignore_ascii_case("none"))
        .collect()
}

/// Match an attribute reply against the allowed labels
///
/// Returns the allowed entry the reply names exactly (after cleanup), or
/// `None` for anything else, including the literal `None`.
pub fn parse_attribute_label<'a>(reply: &str, allowed: &'a [String]) -> Option<&'a str> {
    let label = clean(reply);
    allowed
        .iter()
        .map(String::as_str)
        .find(|candidate| *candidate == label)
}

fn clean(raw: &str) -> &str {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_suffix('.').unwrap_or(trimmed);
    trimmed.trim_matches(|c| c == '"' || c == '\'' || c == '`').trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clans() -> Vec<String> {
        ["Uchiha", "Uzumaki", "Hyuga"].iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_single_tag() {
        let tags = parse_tag_list("enemies");
        assert_eq!(tags.len(), 1);
        assert!(tags.contains("enemies"));
    }

    #[test]
    fn test_parse_list_with_noise() {
        let tags = parse_tag_list("  \"rivals\", friendship ,, teammates.");
        assert_eq!(tags.to_string(), "friendship, rivals, teammates");
    }

    #[test]
    fn test_empty_and_none_replies() {
        assert!(parse_tag_list("").is_empty());
        assert!(parse_tag_list("   ").is_empty());
        assert!(parse_tag_list("None").is_empty());
        assert!(parse_tag_list("none.").is_empty());
    }

    #[test]
    fn test_unknown_tags_pass_through() {
        let tags = parse_tag_list("sworn brothers, rivals");
        assert!(tags.contains("sworn brothers"));
    }

    #[test]
    fn test_attribute_exact_match() {
        let allowed = clans();
        assert_eq!(parse_attribute_label("Uzumaki", &allowed), Some("Uzumaki"));
        assert_eq!(parse_attribute_label(" 'Uchiha'.\n", &allowed), Some("Uchiha"));
    }

    #[test]
    fn test_attribute_outside_allowed_set() {
        let allowed = clans();
        assert_eq!(parse_attribute_label("Senju", &allowed), None);
        assert_eq!(parse_attribute_label("uzumaki", &allowed), None);
        assert_eq!(parse_attribute_label("The Uzumaki clan", &allowed), None);
        assert_eq!(parse_attribute_label("None", &allowed), None);
    }
}
