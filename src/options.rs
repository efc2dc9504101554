use std::fmt;
use std::str::FromStr;

/// site language, sent as the `lang` cookie and the `langCode` api parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    SimplifiedChinese,
    TraditionalChinese,
    Indonesian,
    Malay,
    Thai,
    Vietnamese,
    Japanese,
    Portuguese,
    Spanish,
}

impl Language {
    pub const ALL: [Language; 10] = [
        Self::English,
        Self::SimplifiedChinese,
        Self::TraditionalChinese,
        Self::Indonesian,
        Self::Malay,
        Self::Thai,
        Self::Vietnamese,
        Self::Japanese,
        Self::Portuguese,
        Self::Spanish,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Self::English => "en_us",
            Self::SimplifiedChinese => "zh_cn",
            Self::TraditionalChinese => "zh_tw",
            Self::Indonesian => "id_id",
            Self::Malay => "ms_my",
            Self::Thai => "th_th",
            Self::Vietnamese => "vi_vn",
            Self::Japanese => "ja",
            Self::Portuguese => "pt_br",
            Self::Spanish => "es_mx",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::English => "English",
            Self::SimplifiedChinese => "Simplified Chinese",
            Self::TraditionalChinese => "Traditional Chinese",
            Self::Indonesian => "Bahasa Indonesia",
            Self::Malay => "Bahasa Malaysia",
            Self::Thai => "Thai",
            Self::Vietnamese => "Vietnamese",
            Self::Japanese => "Japanese",
            Self::Portuguese => "Português",
            Self::Spanish => "Español",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let raw = s.trim();
        Self::ALL
            .into_iter()
            .find(|lang| {
                lang.code().eq_ignore_ascii_case(raw) || lang.label().eq_ignore_ascii_case(raw)
            })
            .ok_or_else(|| {
                let codes: Vec<&str> = Self::ALL.iter().map(|lang| lang.code()).collect();
                format!("unknown language {raw}; expected one of: {}", codes.join(", "))
            })
    }
}

/// playback resolution. the site only understands its own bitrate ids,
/// which are sent as the `QiyiPlayerBID` cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    P1080,
    P720,
    P480,
    P360,
}

impl Resolution {
    pub const ALL: [Resolution; 4] = [Self::P1080, Self::P720, Self::P480, Self::P360];

    pub fn bitrate_id(self) -> u32 {
        match self {
            Self::P1080 => 600,
            Self::P720 => 400,
            Self::P480 => 300,
            Self::P360 => 200,
        }
    }

    pub fn height(self) -> u32 {
        match self {
            Self::P1080 => 1080,
            Self::P720 => 720,
            Self::P480 => 480,
            Self::P360 => 360,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}p", self.height())
    }
}

impl FromStr for Resolution {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let height = normalized
            .trim_end_matches('p')
            .parse::<u32>()
            .map_err(|_| format!("invalid resolution: {s}"))?;

        Self::ALL
            .into_iter()
            .find(|res| res.height() == height)
            .ok_or_else(|| {
                format!("unsupported resolution {s}; expected 1080p, 720p, 480p or 360p")
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolutions_map_to_bitrate_ids() {
        let ids: Vec<u32> = Resolution::ALL.iter().map(|r| r.bitrate_id()).collect();
        assert_eq!(ids, [600, 400, 300, 200]);
    }

    #[test]
    fn parses_resolution_with_or_without_suffix() {
        assert_eq!("720p".parse::<Resolution>(), Ok(Resolution::P720));
        assert_eq!("1080".parse::<Resolution>(), Ok(Resolution::P1080));
        assert!("900p".parse::<Resolution>().is_err());
    }

    #[test]
    fn parses_language_by_code_or_label() {
        assert_eq!("en_us".parse::<Language>(), Ok(Language::English));
        assert_eq!("Japanese".parse::<Language>(), Ok(Language::Japanese));
        assert!("klingon".parse::<Language>().is_err());
    }

    #[test]
    fn ten_languages_with_unique_codes() {
        let mut codes: Vec<&str> = Language::ALL.iter().map(|l| l.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), 10);
    }
}
