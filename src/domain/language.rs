/// Alias table for language codes that appear in the wild under more than
/// one spelling. Applied after lowercasing and trimming so two textually
/// different but semantically equal codes resolve to the same cache entry
/// and provider call.
const LANGUAGE_CODE_ALIASES: &[(&str, &str)] = &[
    ("chinese", "zh-cn"),
    ("zh", "zh-cn"),
    ("chinese_simplified", "zh-cn"),
    ("chinese_traditional", "zh-tw"),
    ("norwegian", "no"),
    ("hebrew", "he"),
    ("iw", "he"),
];

/// Normalize a language code: lowercase, trim, resolve aliases. An empty or
/// missing code becomes `auto`.
pub fn normalize_language_code(code: &str) -> String {
    let code = code.trim().to_lowercase();
    if code.is_empty() {
        return "auto".to_string();
    }
    for (alias, canonical) in LANGUAGE_CODE_ALIASES {
        if code == *alias {
            return (*canonical).to_string();
        }
    }
    code
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_uppercase_code_with_whitespace_when_normalizing_then_lowercased_and_trimmed() {
        assert_eq!(normalize_language_code("  ES "), "es");
    }

    #[test]
    fn given_legacy_hebrew_code_when_normalizing_then_maps_to_current_code() {
        assert_eq!(normalize_language_code("iw"), "he");
    }

    #[test]
    fn given_bare_chinese_code_when_normalizing_then_maps_to_simplified() {
        assert_eq!(normalize_language_code("zh"), "zh-cn");
        assert_eq!(normalize_language_code("ZH"), "zh-cn");
    }

    #[test]
    fn given_empty_code_when_normalizing_then_returns_auto() {
        assert_eq!(normalize_language_code(""), "auto");
        assert_eq!(normalize_language_code("   "), "auto");
    }
}
