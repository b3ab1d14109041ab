use once_cell::sync::Lazy;
use regex::Regex;

static NON_SLUG: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\p{L}\p{Nd}]+").unwrap());

/// Derives the URL identifier for a user or rank name.
///
/// Lowercases, collapses every run of characters that are not letters or
/// digits into a single `-` and trims dashes from both ends. Non-ASCII
/// letters are kept, so `Émile` and `mile` stay distinct.
pub fn slugify(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    NON_SLUG
        .replace_all(&lower, "-")
        .trim_matches('-')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::slugify;

    #[test]
    fn lowercases_and_dashes() {
        assert_eq!(slugify("TestFollower"), "testfollower");
        assert_eq!(slugify("Forum team"), "forum-team");
        assert_eq!(slugify("  Bob__the   Builder! "), "bob-the-builder");
    }

    #[test]
    fn keeps_existing_slugs() {
        assert_eq!(slugify("this-user-is-fake"), "this-user-is-fake");
    }

    #[test]
    fn keeps_non_ascii_letters() {
        assert_eq!(slugify("Émile"), "émile");
        assert_ne!(slugify("Émile"), slugify("mile"));
        assert_eq!(slugify("Łukasz Żółw"), "łukasz-żółw");
    }

    #[test]
    fn nothing_sluggable_is_empty() {
        assert_eq!(slugify("!!!"), "");
    }
}
