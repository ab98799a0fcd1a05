//! Static language and voice catalogs
//!
//! Maps spoken language names to translator language codes, and
//! (gender, language) pairs to synthesis voice names. Lookups are
//! case-insensitive; an unknown name returns `None` and the caller
//! produces the user-facing "not supported" message.

/// Spoken language name → translator language code
const LANGUAGE_CODES: &[(&str, &str)] = &[
    ("arabic", "ar"),
    ("chinese", "zh-Hans"),
    ("czech", "cs"),
    ("danish", "da"),
    ("dutch", "nl"),
    ("english", "en"),
    ("finnish", "fi"),
    ("french", "fr"),
    ("german", "de"),
    ("greek", "el"),
    ("hindi", "hi"),
    ("hungarian", "hu"),
    ("italian", "it"),
    ("japanese", "ja"),
    ("korean", "ko"),
    ("norwegian", "nb"),
    ("polish", "pl"),
    ("portuguese", "pt"),
    ("russian", "ru"),
    ("spanish", "es"),
    ("swedish", "sv"),
    ("turkish", "tr"),
];

/// (gender, language) → synthesis voice name
const VOICE_NAMES: &[(&str, &str, &str)] = &[
    ("female", "arabic", "Zariyah"),
    ("male", "arabic", "Hamed"),
    ("female", "chinese", "Xiaoxiao"),
    ("male", "chinese", "Yunye"),
    ("female", "czech", "Vlasta"),
    ("male", "czech", "Antonin"),
    ("female", "danish", "Christel"),
    ("male", "danish", "Jeppe"),
    ("female", "dutch", "Colette"),
    ("male", "dutch", "Maarten"),
    ("female", "english", "Ana"),
    ("male", "english", "Matthew"),
    ("female", "finnish", "Noora"),
    ("male", "finnish", "Harri"),
    ("female", "french", "Denise"),
    ("male", "french", "Henri"),
    ("female", "german", "Katja"),
    ("male", "german", "Conrad"),
    ("female", "greek", "Athina"),
    ("male", "greek", "Nestoras"),
    ("female", "hindi", "Swara"),
    ("male", "hindi", "Madhur"),
    ("female", "hungarian", "Noemi"),
    ("male", "hungarian", "Tamas"),
    ("female", "italian", "Elsa"),
    ("male", "italian", "Diego"),
    ("female", "japanese", "Nanami"),
    ("male", "japanese", "Keita"),
    ("female", "korean", "SunHi"),
    ("male", "korean", "InJoon"),
    ("female", "norwegian", "Pernille"),
    ("male", "norwegian", "Finn"),
    ("female", "polish", "Zofia"),
    ("male", "polish", "Marek"),
    ("female", "portuguese", "Francisca"),
    ("male", "portuguese", "Antonio"),
    ("female", "russian", "Svetlana"),
    ("male", "russian", "Dmitry"),
    ("female", "spanish", "Elvira"),
    ("male", "spanish", "Alvaro"),
    ("female", "swedish", "Sofie"),
    ("male", "swedish", "Mattias"),
    ("female", "turkish", "Emel"),
    ("male", "turkish", "Ahmet"),
];

/// Resolve a spoken language name to a translator language code
#[must_use]
pub fn language_code(name: &str) -> Option<&'static str> {
    let name = name.trim().to_lowercase();
    LANGUAGE_CODES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, code)| *code)
}

/// Whether a spoken language name is in the catalog
#[must_use]
pub fn supported(name: &str) -> bool {
    language_code(name).is_some()
}

/// Resolve a (gender, language) pair to a synthesis voice name
#[must_use]
pub fn voice_name(gender: &str, language: &str) -> Option<&'static str> {
    let gender = gender.trim().to_lowercase();
    let language = language.trim().to_lowercase();
    VOICE_NAMES
        .iter()
        .find(|(g, l, _)| *g == gender && *l == language)
        .map(|(_, _, v)| *v)
}

/// All catalog voice names, for `randomize_voice` and voice listing
#[must_use]
pub fn all_voice_names() -> Vec<&'static str> {
    VOICE_NAMES.iter().map(|(_, _, v)| *v).collect()
}

/// All supported language names
#[must_use]
pub fn supported_languages() -> Vec<&'static str> {
    LANGUAGE_CODES.iter().map(|(n, _)| *n).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_lookup_is_case_insensitive() {
        assert_eq!(language_code("French"), Some("fr"));
        assert_eq!(language_code("FRENCH"), Some("fr"));
        assert_eq!(language_code("french"), Some("fr"));
    }

    #[test]
    fn unknown_language_resolves_to_none() {
        assert_eq!(language_code("klingon"), None);
        assert!(!supported("klingon"));
    }

    #[test]
    fn every_language_has_both_voices() {
        for (name, _) in LANGUAGE_CODES {
            assert!(voice_name("female", name).is_some(), "no female voice for {name}");
            assert!(voice_name("male", name).is_some(), "no male voice for {name}");
        }
    }

    #[test]
    fn default_english_voices() {
        assert_eq!(voice_name("female", "english"), Some("Ana"));
        assert_eq!(voice_name("Male", "English"), Some("Matthew"));
    }
}
