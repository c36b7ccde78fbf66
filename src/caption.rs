//! Caption domain: the collaborator contract, template table, and fallback.
//!
//! A caption is the humorous two-line text plus meme-template selection the
//! external text-generation collaborator returns for the current counters.
//! Everything here is deterministic; the network lives in [`generator`].

/// Caption collaborators (live client and errors).
pub mod generator;
/// API key, model, and endpoint resolution.
pub mod settings;

use serde::Deserialize;

use crate::attendance::THRESHOLD;

/// Emotional register the collaborator picked for the caption.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    /// Student is coasting.
    Chill,
    /// Student is in trouble.
    Panic,
}

/// Identifiers for the twelve fixed meme templates.
///
/// The first six carry a "safe" framing, the last six a "danger" framing,
/// though the collaborator is free to pick across the full set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TemplateId {
    /// Success Kid.
    Success,
    /// Roll Safe.
    #[default]
    Smart,
    /// Drake approval.
    Drake,
    /// Tuxedo Pooh.
    Pauper,
    /// Leo cheers.
    Cheers,
    /// Two buttons.
    Buttons,
    /// This is fine.
    Fine,
    /// Panik Kalm Panik.
    Panik,
    /// Clown makeup.
    Clown,
    /// Disaster Girl.
    Disaster,
    /// Jordan Peele sweating.
    Sweating,
    /// Grant Gustin grave.
    Grave,
}

impl TemplateId {
    /// All identifiers the collaborator may pick from.
    pub const ALL: [TemplateId; 12] = [
        TemplateId::Success,
        TemplateId::Smart,
        TemplateId::Drake,
        TemplateId::Pauper,
        TemplateId::Cheers,
        TemplateId::Buttons,
        TemplateId::Fine,
        TemplateId::Panik,
        TemplateId::Clown,
        TemplateId::Disaster,
        TemplateId::Sweating,
        TemplateId::Grave,
    ];

    /// Parse a collaborator-provided identifier; `None` for unknown ids.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|id| id.as_str() == value)
    }

    /// Wire name of this identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            TemplateId::Success => "success",
            TemplateId::Smart => "smart",
            TemplateId::Drake => "drake",
            TemplateId::Pauper => "pauper",
            TemplateId::Cheers => "cheers",
            TemplateId::Buttons => "buttons",
            TemplateId::Fine => "fine",
            TemplateId::Panik => "panik",
            TemplateId::Clown => "clown",
            TemplateId::Disaster => "disaster",
            TemplateId::Sweating => "sweating",
            TemplateId::Grave => "grave",
        }
    }

    /// Fixed image URL backing this template.
    pub fn image_url(self) -> &'static str {
        match self {
            TemplateId::Success => "https://i.imgflip.com/1bhk.jpg",
            TemplateId::Smart => "https://i.imgflip.com/1h7in3.jpg",
            TemplateId::Drake => "https://i.imgflip.com/30b1gx.jpg",
            TemplateId::Pauper => "https://i.imgflip.com/22bdq6.jpg",
            TemplateId::Cheers => "https://i.imgflip.com/8k0sa.jpg",
            TemplateId::Buttons => "https://i.imgflip.com/1g8my4.jpg",
            TemplateId::Fine => "https://i.imgflip.com/1ooaki.jpg",
            TemplateId::Panik => "https://i.imgflip.com/306q4x.jpg",
            TemplateId::Clown => "https://i.imgflip.com/38el31.jpg",
            TemplateId::Disaster => "https://i.imgflip.com/23ls.jpg",
            TemplateId::Sweating => "https://i.imgflip.com/32p1d8.jpg",
            TemplateId::Grave => "https://i.imgflip.com/3nx72a.jpg",
        }
    }
}

/// Two-line caption plus template selection for the current counters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Caption {
    /// Upper caption line.
    pub top_text: String,
    /// Lower caption line.
    pub bottom_text: String,
    /// Emotional register.
    pub mood: Mood,
    /// Selected meme template.
    pub template_id: TemplateId,
    /// Brief explanation of the template choice.
    pub advice: String,
}

impl Caption {
    /// Deterministic caption used whenever the collaborator cannot deliver.
    ///
    /// This is the terminal recovery path; it never fails.
    pub fn fallback(safe: bool) -> Self {
        if safe {
            Self {
                top_text: "ATTENDANCE > 75%".to_string(),
                bottom_text: "CALCULATED RISK".to_string(),
                mood: Mood::Chill,
                template_id: TemplateId::Smart,
                advice: "Fallback".to_string(),
            }
        } else {
            Self {
                top_text: "MY ATTENDANCE".to_string(),
                bottom_text: "IT'S GONE".to_string(),
                mood: Mood::Panic,
                template_id: TemplateId::Panik,
                advice: "Fallback".to_string(),
            }
        }
    }
}

/// Counter snapshot forwarded to the caption collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaptionRequest {
    /// Classes attended at request time.
    pub attended: u32,
    /// Classes held at request time.
    pub total: u32,
}

impl CaptionRequest {
    /// Percentage as presented to the collaborator.
    ///
    /// An empty semester counts as fully attended here, unlike the gauge;
    /// nobody gets roasted for a course that has not started.
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        f64::from(self.attended) / f64::from(self.total) * 100.0
    }

    /// Safe/danger framing for the prompt and the fallback caption.
    pub fn is_safe(&self) -> bool {
        self.percentage() > THRESHOLD
    }
}
