//! Template identifiers and the fixed color palette.

use serde::{Deserialize, Deserializer, Serialize};

/// The four supported resume templates. Unknown identifiers deserialize to
/// the default rather than erroring, so an old draft with a retired template
/// key still loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateId {
    /// Sans-serif, accent rules, uppercase section headers.
    #[default]
    Modern,
    /// Serif, ruled sections, traditional ordering.
    Classic,
    /// Sans-serif, no rules, generous whitespace.
    Minimal,
    /// Serif, skills promoted above experience.
    Executive,
}

impl TemplateId {
    /// Parses a template key case-insensitively; anything unrecognized falls
    /// back to the default template.
    pub fn from_key(key: &str) -> TemplateId {
        match key.trim().to_ascii_lowercase().as_str() {
            "modern" => TemplateId::Modern,
            "classic" => TemplateId::Classic,
            "minimal" => TemplateId::Minimal,
            "executive" => TemplateId::Executive,
            _ => TemplateId::default(),
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            TemplateId::Modern => "modern",
            TemplateId::Classic => "classic",
            TemplateId::Minimal => "minimal",
            TemplateId::Executive => "executive",
        }
    }
}

// Manual impl so unknown keys parse as the default; a derived enum would
// reject them.
impl<'de> Deserialize<'de> for TemplateId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let key = String::deserialize(deserializer)?;
        Ok(TemplateId::from_key(&key))
    }
}

/// One named entry in the fixed palette.
pub struct PaletteColor {
    pub key: &'static str,
    pub rgb: (u8, u8, u8),
}

/// The fixed palette the primary/accent scheme selects from.
pub const PALETTE: &[PaletteColor] = &[
    PaletteColor {
        key: "slate",
        rgb: (51, 65, 85),
    },
    PaletteColor {
        key: "navy",
        rgb: (30, 58, 138),
    },
    PaletteColor {
        key: "teal",
        rgb: (13, 148, 136),
    },
    PaletteColor {
        key: "forest",
        rgb: (22, 101, 52),
    },
    PaletteColor {
        key: "burgundy",
        rgb: (136, 19, 55),
    },
    PaletteColor {
        key: "charcoal",
        rgb: (38, 38, 38),
    },
    PaletteColor {
        key: "plum",
        rgb: (107, 33, 168),
    },
    PaletteColor {
        key: "amber",
        rgb: (180, 83, 9),
    },
];

pub const DEFAULT_PRIMARY: &str = "slate";
pub const DEFAULT_ACCENT: &str = "teal";

/// Resolves a palette key to its RGB triple. Unknown keys resolve to the
/// default primary entry so a stale scheme never breaks rendering.
pub fn palette_rgb(key: &str) -> (u8, u8, u8) {
    let wanted = key.trim().to_ascii_lowercase();
    PALETTE
        .iter()
        .find(|c| c.key == wanted)
        .or_else(|| PALETTE.iter().find(|c| c.key == DEFAULT_PRIMARY))
        .map(|c| c.rgb)
        .unwrap_or((51, 65, 85))
}
