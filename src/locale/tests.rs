use super::*;

#[test]
fn parses_primary_subtags() {
    assert_eq!(Locale::parse("zh"), Locale::Zh);
    assert_eq!(Locale::parse("zh-CN"), Locale::Zh);
    assert_eq!(Locale::parse("zh_TW"), Locale::Zh);
    assert_eq!(Locale::parse("ja"), Locale::Ja);
    assert_eq!(Locale::parse("es-MX"), Locale::Es);
    assert_eq!(Locale::parse("en-US"), Locale::En);
}

#[test]
fn unknown_tags_fall_back_to_english() {
    assert_eq!(Locale::parse("fr"), Locale::En);
    assert_eq!(Locale::parse(""), Locale::En);
    assert_eq!(Locale::parse("??"), Locale::En);
}

#[test]
fn every_locale_has_complete_templates() {
    for locale in [Locale::En, Locale::Zh, Locale::Ja, Locale::Es] {
        let t = templates(locale);
        assert!(!t.language_name.is_empty());
        assert!(!t.language_instruction.is_empty());
        assert!(!t.preamble_normal.is_empty());
        assert!(!t.preamble_concise.is_empty());
        assert!(!t.fallback_lines.is_empty());
        assert!(!t.nothing_found_disclosure.is_empty());
    }
}

#[test]
fn preambles_name_the_target_language() {
    assert!(templates(Locale::En).preamble_normal.contains("English"));
    assert!(templates(Locale::Zh).preamble_normal.contains("中文"));
    assert!(templates(Locale::Ja).preamble_normal.contains("日本語"));
    assert!(templates(Locale::Es).preamble_normal.contains("español"));
}

#[test]
fn round_trips_through_as_str() {
    for locale in [Locale::En, Locale::Zh, Locale::Ja, Locale::Es] {
        assert_eq!(Locale::parse(locale.as_str()), locale);
    }
}
