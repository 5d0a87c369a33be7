// src/core/alphabet.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Sign asset names for Arabic letters. Characters missing from this
/// table are their own asset key.
pub const ARABIC_ASSET_KEYS: &[(char, &str)] = &[
    ('ا', "ALEF"),
    ('أ', "ALEF_HAMZA_ABOVE"),
    ('إ', "ALEF_HAMZA_BELOW"),
    ('آ', "ALEF_MADDA"),
    ('ب', "BA"),
    ('ت', "TA"),
    ('ث', "THA"),
    ('ج', "JEEM"),
    ('ح', "HA"),
    ('خ', "KHA"),
    ('د', "DAL"),
    ('ذ', "THAL"),
    ('ر', "RA"),
    ('ز', "ZAY"),
    ('س', "SEEN"),
    ('ش', "SHEEN"),
    ('ص', "SAD"),
    ('ض', "DAD"),
    ('ط', "TAH"),
    ('ظ', "ZAH"),
    ('ع', "AIN"),
    ('غ', "GHAIN"),
    ('ف', "FA"),
    ('ق', "QAF"),
    ('ك', "KAF"),
    ('ل', "LAM"),
    ('م', "MEEM"),
    ('ن', "NOON"),
    ('ه', "HA2"),
    ('و', "WAW"),
    ('ي', "YEH"),
    ('ى', "ALEF_MAKSURA"),
    ('ة', "TEH_MARBUTA"),
    ('ئ', "YEH_HAMZA_ABOVE"),
    ('ؤ', "WAW_HAMZA"),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alphabet {
    #[default]
    #[serde(alias = "en", alias = "english")]
    Latin,
    #[serde(alias = "ar")]
    Arabic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    Ltr,
    Rtl,
}

/// Static presentation data for an alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AlphabetSettings {
    pub label: &'static str,
    pub placeholder: &'static str,
    pub direction: TextDirection,
    pub font_family: &'static str,
}

const LATIN_SETTINGS: AlphabetSettings = AlphabetSettings {
    label: "ENGLISH",
    placeholder: "Type your text here... For example: 'He is playing football'",
    direction: TextDirection::Ltr,
    font_family: "'Segoe UI', Tahoma, Geneva, Verdana, sans-serif",
};

const ARABIC_SETTINGS: AlphabetSettings = AlphabetSettings {
    label: "ARABIC",
    placeholder: "اكتب النص هنا... على سبيل المثال: 'هو يلعب كرة القدم'",
    direction: TextDirection::Rtl,
    font_family: "'Arial', 'Segoe UI', 'Tahoma', sans-serif",
};

impl Alphabet {
    /// The letter as shown to the user.
    pub fn display_form(self, c: char) -> String {
        match self {
            Alphabet::Latin => c.to_uppercase().collect(),
            Alphabet::Arabic => c.to_string(),
        }
    }

    /// The canonical name of the sign image for `c`.
    pub fn asset_key(self, c: char) -> String {
        match self {
            Alphabet::Latin => c.to_uppercase().collect(),
            Alphabet::Arabic => arabic_asset_key(c)
                .map(str::to_string)
                .unwrap_or_else(|| c.to_string()),
        }
    }

    /// Directory holding this alphabet's sign images.
    pub fn dir_name(self) -> &'static str {
        match self {
            Alphabet::Latin => "en",
            Alphabet::Arabic => "ar",
        }
    }

    pub fn settings(self) -> &'static AlphabetSettings {
        match self {
            Alphabet::Latin => &LATIN_SETTINGS,
            Alphabet::Arabic => &ARABIC_SETTINGS,
        }
    }
}

fn arabic_asset_key(c: char) -> Option<&'static str> {
    ARABIC_ASSET_KEYS
        .iter()
        .find(|(letter, _)| *letter == c)
        .map(|(_, key)| *key)
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.settings().label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown alphabet {0:?} (expected \"en\" or \"ar\")")]
pub struct UnknownAlphabet(pub String);

impl FromStr for Alphabet {
    type Err = UnknownAlphabet;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "latin" | "english" => Ok(Alphabet::Latin),
            "ar" | "arabic" => Ok(Alphabet::Arabic),
            _ => Err(UnknownAlphabet(s.to_string())),
        }
    }
}
