//! Topic category catalogs shown on the start screen.

use gramgpt_common::LanguageTag;

const EN_IN: &[&str] = &[
    "🏦 Government Schemes",
    "🌿 Agriculture Help",
    "⚖️ Legal Rights",
    "💼 Job Opportunities",
    "🌦️ Weather Advisory",
    "🐛 Pest & Disease Help",
    "📄 Document Guide",
    "🌱 Fertilizer Calculator",
];

const HI_IN: &[&str] = &[
    "🏦 सरकारी योजनाएं",
    "🌿 कृषि सहायता",
    "⚖️ कानूनी अधिकार",
    "💼 रोजगार के अवसर",
    "🌦️ मौसम सलाह",
    "🐛 कीट एवं रोग सहायता",
    "📄 दस्तावेज़ सहायता",
    "🌱 उर्वरक कैलकुलेटर",
];

/// Category titles for `lang`; languages without their own catalog get
/// the English one.
pub fn categories(lang: LanguageTag) -> &'static [&'static str] {
    match lang.as_str() {
        "hi-IN" => HI_IN,
        _ => EN_IN,
    }
}

/// The topic name of a category title: everything after the leading emoji.
pub fn topic_of(title: &str) -> &str {
    let title = title.trim();
    match title.split_once(char::is_whitespace) {
        Some((_, rest)) => rest.trim_start(),
        None => title,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogs_have_eight_entries() {
        assert_eq!(categories(LanguageTag::ENGLISH).len(), 8);
        assert_eq!(categories(LanguageTag::HINDI).len(), 8);
    }

    #[test]
    fn unknown_catalog_falls_back_to_english() {
        let tamil = LanguageTag::parse("ta-IN").unwrap();
        assert_eq!(categories(tamil), categories(LanguageTag::ENGLISH));
    }

    #[test]
    fn topic_strips_emoji() {
        assert_eq!(topic_of("🐛 Pest & Disease Help"), "Pest & Disease Help");
        assert_eq!(topic_of("⚖️ कानूनी अधिकार"), "कानूनी अधिकार");
        assert_eq!(topic_of("Plain"), "Plain");
    }
}
