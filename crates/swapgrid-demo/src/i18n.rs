#![forbid(unsafe_code)]

//! Interface language and its strings.

use std::fmt;

/// Registry key of the saved language.
pub const LANG_KEY: &str = "lang";
pub const LANG_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Lang {
    #[default]
    En,
    /// Tagalog.
    Tl,
}

impl Lang {
    /// Lenient: only `"tl"` selects Tagalog.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("tl") {
            Self::Tl
        } else {
            Self::En
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Tl => "tl",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::En => Self::Tl,
            Self::Tl => Self::En,
        }
    }

    pub fn text(self) -> &'static Text {
        match self {
            Self::En => &EN,
            Self::Tl => &TL,
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Translated interface strings.
#[derive(Debug, PartialEq, Eq)]
pub struct Text {
    pub choose_company: &'static str,
    pub tip: &'static str,
    pub no_active: &'static str,
    pub blocked: &'static str,
    pub due: &'static str,
    pub overdue: &'static str,
    pub updated: &'static str,
    pub next: &'static str,
}

static EN: Text = Text {
    choose_company: "Choose a company to continue",
    tip: "drag :: to reorder",
    no_active: "No active request",
    blocked: "Blocked",
    due: "Due",
    overdue: "Overdue",
    updated: "Updated",
    next: "Next",
};

static TL: Text = Text {
    choose_company: "Pumili ng kumpanya upang magpatuloy",
    tip: "i-drag ang :: para ayusin",
    no_active: "Walang aktibong request",
    blocked: "Naantala",
    due: "Takdang oras",
    overdue: "Lampas sa takdang oras",
    updated: "Na-update",
    next: "Susunod",
};
