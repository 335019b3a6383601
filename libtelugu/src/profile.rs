// libtelugu/src/profile.rs
//
// Telugu language profile: ITRANS transliteration, the Telugu font catalogue,
// surface style presets and the optional online suggestion service.

use crate::cloud::CloudSuggestions;
use crate::config::TeluguConfig;
use crate::itrans;
use liblipi_core::{FontOption, LanguageProfile, StylePreset, SuggestionService, TransliterationError};
use std::sync::Arc;
use tracing::warn;

pub const PLACEHOLDER: &str = "టైప్ చేయడం ప్రారంభించండి...";

/// Family written to RTF when a font specification names nothing usable.
pub const FALLBACK_FONT: &str = "Noto Sans Telugu";

pub const SUGGESTION_LIMIT: usize = 6;

/// Telugu font families, web fonts first, then system fonts with a Noto
/// fallback.
pub const TELUGU_FONTS: &[FontOption] = &[
    FontOption { label: "నోటో సాన్స్ తెలుగు", value: "\"Noto Sans Telugu\", sans-serif" },
    FontOption { label: "నోటో సెరిఫ్ తెలుగు", value: "\"Noto Serif Telugu\", serif" },
    FontOption { label: "అనేక్ తెలుగు", value: "\"Anek Telugu\", sans-serif" },
    FontOption { label: "బలూ తమ్ముడు 2", value: "\"Baloo Tammudu 2\", cursive" },
    FontOption { label: "అకయా తెలివిగల", value: "\"Akaya Telivigala\", cursive" },
    FontOption { label: "చతుర", value: "\"Chathura\", sans-serif" },
    FontOption { label: "పొట్టి శ్రీరాములు", value: "\"Potti Sreeramulu\", cursive" },
    FontOption { label: "మండలి", value: "\"Mandali\", sans-serif" },
    FontOption { label: "గిడుగు", value: "\"Gidugu\", sans-serif" },
    FontOption { label: "మల్లన్న", value: "\"Mallanna\", sans-serif" },
    FontOption { label: "రామభద్ర", value: "\"Ramabhadra\", sans-serif" },
    FontOption { label: "సురన్న", value: "\"Suranna\", serif" },
    FontOption { label: "తెనాలి రామకృష్ణ", value: "\"Tenali Ramakrishna\", serif" },
    FontOption { label: "గురజాడ", value: "\"Gurajada\", serif" },
    FontOption { label: "వేమన 2000", value: "\"Vemana 2000\", serif" },
    FontOption { label: "లక్కీ రెడ్డి", value: "\"Lakki Reddy\", cursive" },
    // System fonts
    FontOption { label: "గౌతమీ", value: "Gautami, \"Noto Sans Telugu\", sans-serif" },
    FontOption { label: "వాణి", value: "Vani, \"Noto Sans Telugu\", sans-serif" },
    FontOption { label: "నిర్మలా UI", value: "\"Nirmala UI\", \"Noto Sans Telugu\", sans-serif" },
    FontOption { label: "విజయ", value: "Vijaya, \"Noto Sans Telugu\", serif" },
    FontOption { label: "రఘు తెలుగు", value: "\"Raghu Telugu\", \"Noto Sans Telugu\", sans-serif" },
    FontOption { label: "లోహిత తెలుగు", value: "\"Lohit Telugu\", \"Noto Sans Telugu\", sans-serif" },
    FontOption { label: "పోతన 2000", value: "\"Pothana2000\", \"Noto Sans Telugu\", serif" },
    FontOption { label: "ధూర్జటి", value: "\"Dhurjati\", \"Noto Sans Telugu\", sans-serif" },
    FontOption { label: "సీలా వీర్రాజు", value: "\"Seela Veerraju\", \"Noto Sans Telugu\", sans-serif" },
    FontOption { label: "అక్షర తెలుగు", value: "\"Akshar Telugu\", \"Noto Sans Telugu\", sans-serif" },
    FontOption { label: "తెలుగు సరళ", value: "\"Telugu Sarala\", \"Noto Sans Telugu\", sans-serif" },
    FontOption { label: "తెలుగు కృష్ణ", value: "\"Telugu Krishna\", \"Noto Sans Telugu\", sans-serif" },
];

pub const STYLE_PRESETS: &[StylePreset] = &[
    StylePreset { label: "సాధారణ", value: "normal" },
    StylePreset { label: "షాడో", value: "shadow" },
    StylePreset { label: "అవుట్‌లైన్", value: "outline" },
    StylePreset { label: "గ్లో", value: "glow" },
    StylePreset { label: "ఎంబోస్", value: "emboss" },
];

/// The Telugu [`LanguageProfile`].
#[derive(Clone, Default)]
pub struct TeluguProfile {
    service: Option<Arc<dyn SuggestionService>>,
}

impl TeluguProfile {
    /// Offline profile: transliteration only, no candidates.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_service(service: Arc<dyn SuggestionService>) -> Self {
        Self { service: Some(service) }
    }

    /// Build the profile described by `config`, attaching the online
    /// service when `cloud_enabled` is set. A client that cannot be built
    /// leaves the profile offline.
    pub fn from_config(config: &TeluguConfig) -> Self {
        if !config.cloud_enabled {
            return Self::new();
        }
        match CloudSuggestions::new(config.cloud_provider(), &config.input_tool, config.request_timeout()) {
            Ok(cloud) => Self::with_service(Arc::new(cloud)),
            Err(e) => {
                warn!(error = %e, "cloud suggestions unavailable, continuing offline");
                Self::new()
            }
        }
    }

    pub fn has_service(&self) -> bool {
        self.service.is_some()
    }
}

impl std::fmt::Debug for TeluguProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TeluguProfile")
            .field("has_service", &self.has_service())
            .finish()
    }
}

impl LanguageProfile for TeluguProfile {
    fn id(&self) -> &str {
        "te"
    }

    fn name(&self) -> &str {
        "తెలుగు"
    }

    fn is_input_char(&self, ch: char) -> bool {
        itrans::is_input_char(ch)
    }

    fn try_transliterate(&self, buffer: &str) -> Result<String, TransliterationError> {
        Ok(itrans::transliterate(buffer))
    }

    fn suggestion_service(&self) -> Option<Arc<dyn SuggestionService>> {
        self.service.clone()
    }

    fn suggestion_limit(&self) -> usize {
        SUGGESTION_LIMIT
    }

    fn placeholder(&self) -> &str {
        PLACEHOLDER
    }

    fn fonts(&self) -> &[FontOption] {
        TELUGU_FONTS
    }

    fn style_presets(&self) -> &[StylePreset] {
        STYLE_PRESETS
    }

    fn fallback_font_name(&self) -> &str {
        FALLBACK_FONT
    }
}
