//! Case conversion for generated identifiers.

use convert_case::{Case, Casing};

/// Lower camel case that keeps inner acronyms intact.
///
/// A leading run of capitals is lowered as a unit, except for its last
/// letter when that letter starts the next word: `HTMLPreview` becomes
/// `htmlPreview` while `PreviewHTML` becomes `previewHTML`.
pub fn camelize_down(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let run = chars.iter().take_while(|c| c.is_uppercase()).count();
    if run == 0 {
        return s.to_string();
    }

    let lowered = if run == chars.len() || run == 1 {
        run
    } else if chars[run].is_lowercase() {
        run - 1
    } else {
        run
    };

    chars
        .iter()
        .enumerate()
        .flat_map(|(i, c)| {
            if i < lowered {
                c.to_lowercase().collect::<Vec<_>>()
            } else {
                vec![*c]
            }
        })
        .collect()
}

/// Upper camel case. Separated words are joined, otherwise only the first
/// letter changes.
pub fn camelize_up(s: &str) -> String {
    if s.contains(['_', '-', ' ']) {
        return s.to_case(Case::Pascal);
    }
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lower snake case, e.g. `GetGreetings` to `get_greetings`.
pub fn snake_down(s: &str) -> String {
    s.to_case(Case::Snake)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camelize_down() {
        for (input, expected) in [
            ("CamelsAreGreat", "camelsAreGreat"),
            ("ID", "id"),
            ("HTML", "html"),
            ("PreviewHTML", "previewHTML"),
            ("HTMLPreview", "htmlPreview"),
            ("alreadyDown", "alreadyDown"),
            ("", ""),
        ] {
            assert_eq!(camelize_down(input), expected, "input: {input}");
        }
    }

    #[test]
    fn test_camelize_up() {
        assert_eq!(camelize_up("greetRequest"), "GreetRequest");
        assert_eq!(camelize_up("get_greetings"), "GetGreetings");
        assert_eq!(camelize_up(""), "");
    }

    #[test]
    fn test_snake_down() {
        assert_eq!(snake_down("GetGreetings"), "get_greetings");
        assert_eq!(snake_down("Greeting"), "greeting");
        assert_eq!(snake_down("TotalCount"), "total_count");
    }
}
