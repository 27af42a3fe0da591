//! Text rendering utilities for human-friendly error messages.
//!
//! Service names in a container are free-form strings, usually dotted
//! (`"db.connection"`, `"mailer.transport"`). These helpers find close
//! matches for a mistyped name and render name lists for output.

/// Renders a list of names as a comma separated, quoted string.
///
/// # Examples
/// ```
/// use bowl_support::rendering::render_list;
///
/// assert_eq!(render_list(&["db", "mailer"]), "\"db\", \"mailer\"");
/// let none: [&str; 0] = [];
/// assert_eq!(render_list(&none), "");
/// ```
pub fn render_list(names: &[impl AsRef<str>]) -> String {
    names
        .iter()
        .map(|s| format!("{:?}", s.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Returns the last segment of a dotted name.
///
/// ```
/// use bowl_support::rendering::last_segment;
///
/// assert_eq!(last_segment("app.db.connection"), "connection");
/// assert_eq!(last_segment("logger"), "logger");
/// ```
pub fn last_segment(name: &str) -> &str {
    name.rsplit(['.', ':']).next().unwrap_or(name)
}

/// Generates "did you mean?" suggestions for a requested name.
///
/// Compares the requested name against the available ones and returns
/// up to `max_suggestions` close matches, best first.
pub fn suggest_similar(
    requested: &str,
    available: &[&str],
    max_suggestions: usize,
) -> Vec<String> {
    let requested_lower = requested.to_lowercase();
    let requested_last = last_segment(&requested_lower).to_string();

    let mut scored: Vec<(&str, usize)> = available
        .iter()
        .filter(|&&name| name != requested)
        .filter_map(|&name| {
            let name_lower = name.to_lowercase();
            let name_last = last_segment(&name_lower);

            if name_lower.contains(&requested_lower)
                || requested_lower.contains(&name_lower)
            {
                return Some((name, 100));
            }

            if name_last == requested_last {
                return Some((name, 90));
            }

            if is_close(&name_lower, &requested_lower) {
                return Some((name, 70));
            }

            let common = name_lower
                .chars()
                .zip(requested_lower.chars())
                .take_while(|(a, b)| a == b)
                .count();

            if common >= 3 {
                return Some((name, common * 10));
            }

            None
        })
        .collect();

    scored.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    scored
        .into_iter()
        .take(max_suggestions)
        .map(|(name, _)| name.to_string())
        .collect()
}

/// Quick check whether two strings are "close enough" to be typos of
/// each other: lengths within 3 and at least 60% positional matches.
fn is_close(a: &str, b: &str) -> bool {
    let len_diff = a.len().abs_diff(b.len());
    if len_diff > 3 {
        return false;
    }

    let common = a
        .chars()
        .zip(b.chars())
        .filter(|(ca, cb)| ca == cb)
        .count();

    let max_len = a.len().max(b.len());
    if max_len == 0 {
        return true;
    }

    common * 100 / max_len >= 60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_empty_list() {
        let names: Vec<String> = vec![];
        assert_eq!(render_list(&names), "");
    }

    #[test]
    fn render_quotes_each_name() {
        assert_eq!(render_list(&["a", "b.c"]), "\"a\", \"b.c\"");
    }

    #[test]
    fn last_segment_of_dotted_name() {
        assert_eq!(last_segment("a.b.c"), "c");
        assert_eq!(last_segment("plain"), "plain");
    }

    #[test]
    fn suggest_typo() {
        let available = vec!["mailer", "logger", "database"];

        let suggestions = suggest_similar("mialer", &available, 3);
        assert_eq!(suggestions.first().map(String::as_str), Some("mailer"));
    }

    #[test]
    fn suggest_same_last_segment() {
        let available = vec!["app.db.connection", "app.cache"];

        let suggestions = suggest_similar("db.connection", &available, 3);
        assert_eq!(suggestions, vec!["app.db.connection".to_string()]);
    }

    #[test]
    fn suggest_no_match() {
        let available = vec!["database"];
        let suggestions = suggest_similar("xyz", &available, 3);
        assert!(suggestions.is_empty());
    }

    #[test]
    fn suggest_respects_limit() {
        let available = vec!["user.a", "user.b", "user.c"];
        let suggestions = suggest_similar("user", &available, 2);
        assert_eq!(suggestions.len(), 2);
    }
}
