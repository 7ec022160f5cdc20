//! Resume language check

use whatlang::Lang;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectedLanguage {
    English,
    /// ISO 639-1 code of the detected language, where one exists
    Other(String),
    Unknown,
}

impl DetectedLanguage {
    /// Warning to show the user; English needs none
    pub fn warning(&self) -> Option<String> {
        match self {
            DetectedLanguage::English => None,
            DetectedLanguage::Other(code) => Some(format!(
                "Resume appears to be in {}. The model is trained on English data, so results may be inaccurate.",
                code
            )),
            DetectedLanguage::Unknown => Some("Could not detect language. Assuming English.".to_string()),
        }
    }
}

pub fn detect_language(text: &str) -> DetectedLanguage {
    match whatlang::detect(text) {
        Some(info) if info.lang() == Lang::Eng => DetectedLanguage::English,
        Some(info) => DetectedLanguage::Other(two_letter_code(info.lang()).to_string()),
        None => DetectedLanguage::Unknown,
    }
}

/// ISO 639-1 code for `lang`; languages without one keep their 639-3 code
pub fn two_letter_code(lang: Lang) -> &'static str {
    match lang {
        Lang::Eng => "en",
        Lang::Spa => "es",
        Lang::Fra => "fr",
        Lang::Deu => "de",
        Lang::Ita => "it",
        Lang::Por => "pt",
        Lang::Rus => "ru",
        Lang::Ukr => "uk",
        Lang::Nld => "nl",
        Lang::Pol => "pl",
        Lang::Tur => "tr",
        Lang::Swe => "sv",
        Lang::Dan => "da",
        Lang::Nob => "no",
        Lang::Fin => "fi",
        Lang::Hun => "hu",
        Lang::Ces => "cs",
        Lang::Slk => "sk",
        Lang::Slv => "sl",
        Lang::Hrv => "hr",
        Lang::Srp => "sr",
        Lang::Ron => "ro",
        Lang::Bul => "bg",
        Lang::Ell => "el",
        Lang::Lit => "lt",
        Lang::Lav => "lv",
        Lang::Est => "et",
        Lang::Ara => "ar",
        Lang::Heb => "he",
        Lang::Pes => "fa",
        Lang::Hin => "hi",
        Lang::Ben => "bn",
        Lang::Tam => "ta",
        Lang::Urd => "ur",
        Lang::Jpn => "ja",
        Lang::Kor => "ko",
        Lang::Cmn => "zh",
        Lang::Vie => "vi",
        Lang::Tha => "th",
        Lang::Ind => "id",
        Lang::Tgl => "tl",
        Lang::Afr => "af",
        Lang::Lat => "la",
        Lang::Epo => "eo",
        other => other.code(),
    }
}
