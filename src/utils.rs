/// Turns an identifier-style name into a human-readable title.
/// `join_staff` becomes `Join Staff`.
pub fn title_case(input: &str) -> String {
    input
        .split(|c: char| c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_cases_snake_case_identifiers() {
        assert_eq!(title_case("join_team"), "Join Team");
        assert_eq!(title_case("contact_owner"), "Contact Owner");
        assert_eq!(title_case("support"), "Support");
    }

    #[test]
    fn normalizes_existing_casing() {
        assert_eq!(title_case("JOIN_STAFF"), "Join Staff");
        assert_eq!(title_case("already Proper"), "Already Proper");
    }

    #[test]
    fn handles_empty_and_separator_only_input() {
        assert_eq!(title_case(""), "");
        assert_eq!(title_case("__ _"), "");
    }
}
