use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier wrapper for leaderboard entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub Uuid);

impl EntryId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The five tier codes an aspect can be rated with, ordered best to worst.
///
/// Any other string, in any casing, is not an error: it resolves to "absent"
/// and the scoring default takes over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RatingLabel {
    #[serde(rename = "HT1")]
    Ht1,
    #[serde(rename = "HT2")]
    Ht2,
    #[serde(rename = "HT3")]
    Ht3,
    #[serde(rename = "HT4")]
    Ht4,
    #[serde(rename = "LT5")]
    Lt5,
}

impl RatingLabel {
    pub const ALL: [RatingLabel; 5] = [
        RatingLabel::Ht1,
        RatingLabel::Ht2,
        RatingLabel::Ht3,
        RatingLabel::Ht4,
        RatingLabel::Lt5,
    ];

    /// Fixed numeric value of the tier.
    pub fn value(self) -> u8 {
        match self {
            RatingLabel::Ht1 => 5,
            RatingLabel::Ht2 => 4,
            RatingLabel::Ht3 => 3,
            RatingLabel::Ht4 => 2,
            RatingLabel::Lt5 => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RatingLabel::Ht1 => "HT1",
            RatingLabel::Ht2 => "HT2",
            RatingLabel::Ht3 => "HT3",
            RatingLabel::Ht4 => "HT4",
            RatingLabel::Lt5 => "LT5",
        }
    }

    /// Trims and uppercases the raw label before lookup. `None` means absent.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "HT1" => Some(RatingLabel::Ht1),
            "HT2" => Some(RatingLabel::Ht2),
            "HT3" => Some(RatingLabel::Ht3),
            "HT4" => Some(RatingLabel::Ht4),
            "LT5" => Some(RatingLabel::Lt5),
            _ => None,
        }
    }
}

impl fmt::Display for RatingLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-aspect rating labels as entered by the operator, keyed by aspect name.
///
/// Values are kept as raw strings so an unrecognized label survives a
/// round-trip through storage instead of being silently dropped.
pub type AspectRatings = BTreeMap<String, String>;

/// Cached result of the weighted-average computation.
///
/// Never authoritative on its own: the service recomputes it from the entry's
/// ratings and the active scoring config on every write and at startup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Computed {
    pub score: f64,
    pub percent: u8,
}

/// A ranked entry with its ratings and the derived score cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub name: String,
    pub image: String,
    #[serde(default)]
    pub aspects: AspectRatings,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub computed: Computed,
}

/// Payload for creating an entry. The score is always computed server-side.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntryDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub aspects: AspectRatings,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Partial update for an entry. `aspects` is merged into the existing map,
/// not replaced, so an admin can edit one rating at a time.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntryPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub aspects: Option<AspectRatings>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Scoring policy: ordered aspect list, per-aspect weights, and the value
/// substituted for absent or unrecognized ratings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringConfig {
    #[serde(default)]
    pub aspects: Vec<String>,
    #[serde(default)]
    pub aspect_weights: BTreeMap<String, f64>,
    #[serde(default = "default_aspect_value")]
    pub default_aspect_value: f64,
}

fn default_aspect_value() -> f64 {
    3.0
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            aspects: Vec::new(),
            aspect_weights: BTreeMap::new(),
            default_aspect_value: default_aspect_value(),
        }
    }
}

/// Credentials checked by the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl Default for AdminCredentials {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: "change-me".to_string(),
        }
    }
}

/// Operator-editable site configuration persisted as `config.json`.
///
/// Only the flattened [`ScoringConfig`] portion feeds the scoring core; the
/// remaining fields drive presentation and auth plumbing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    #[serde(default = "default_site_title")]
    pub site_title: String,
    #[serde(flatten)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub admin_credentials: AdminCredentials,
    #[serde(default = "default_secret_tap_count")]
    pub secret_tap_count: u32,
    #[serde(default = "default_secret_tap_window")]
    pub secret_tap_window_seconds: u32,
    #[serde(default = "default_assets_folder")]
    pub assets_folder: String,
    #[serde(default = "default_placeholder_image")]
    pub placeholder_image: String,
    #[serde(default)]
    pub discord_server_link: String,
    #[serde(default = "default_allow_config_edit")]
    pub allow_config_edit: bool,
    #[serde(default)]
    pub base_url: String,
}

fn default_site_title() -> String {
    "Rankboard".to_string()
}

fn default_secret_tap_count() -> u32 {
    7
}

fn default_secret_tap_window() -> u32 {
    3
}

fn default_assets_folder() -> String {
    "assets".to_string()
}

fn default_placeholder_image() -> String {
    "assets/placeholder.png".to_string()
}

fn default_allow_config_edit() -> bool {
    true
}

impl SiteConfig {
    /// Configuration written to disk on first start.
    pub fn starter() -> Self {
        let mut aspect_weights = BTreeMap::new();
        aspect_weights.insert("Movement".to_string(), 1.5);
        aspect_weights.insert("Attack".to_string(), 1.2);
        aspect_weights.insert("Defense".to_string(), 1.0);
        aspect_weights.insert("Utility".to_string(), 0.8);

        Self {
            site_title: default_site_title(),
            scoring: ScoringConfig {
                aspects: vec![
                    "Movement".to_string(),
                    "Attack".to_string(),
                    "Defense".to_string(),
                    "Utility".to_string(),
                ],
                aspect_weights,
                default_aspect_value: 3.0,
            },
            admin_credentials: AdminCredentials::default(),
            secret_tap_count: default_secret_tap_count(),
            secret_tap_window_seconds: default_secret_tap_window(),
            assets_folder: default_assets_folder(),
            placeholder_image: default_placeholder_image(),
            discord_server_link: String::new(),
            allow_config_edit: default_allow_config_edit(),
            base_url: String::new(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self::starter()
    }
}

/// Partial update for the site configuration. Any change to the scoring
/// fields triggers a full recompute of every stored entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigPatch {
    #[serde(default)]
    pub site_title: Option<String>,
    #[serde(default)]
    pub aspects: Option<Vec<String>>,
    #[serde(default)]
    pub aspect_weights: Option<BTreeMap<String, f64>>,
    #[serde(default)]
    pub default_aspect_value: Option<f64>,
    #[serde(default)]
    pub admin_credentials: Option<AdminCredentials>,
    #[serde(default)]
    pub secret_tap_count: Option<u32>,
    #[serde(default)]
    pub secret_tap_window_seconds: Option<u32>,
    #[serde(default)]
    pub assets_folder: Option<String>,
    #[serde(default)]
    pub placeholder_image: Option<String>,
    #[serde(default)]
    pub discord_server_link: Option<String>,
    #[serde(default)]
    pub allow_config_edit: Option<bool>,
    #[serde(default)]
    pub base_url: Option<String>,
}

impl ConfigPatch {
    pub fn apply(self, config: &mut SiteConfig) {
        if let Some(site_title) = self.site_title {
            config.site_title = site_title;
        }
        if let Some(aspects) = self.aspects {
            config.scoring.aspects = aspects;
        }
        if let Some(aspect_weights) = self.aspect_weights {
            config.scoring.aspect_weights = aspect_weights;
        }
        if let Some(default_aspect_value) = self.default_aspect_value {
            config.scoring.default_aspect_value = default_aspect_value;
        }
        if let Some(admin_credentials) = self.admin_credentials {
            config.admin_credentials = admin_credentials;
        }
        if let Some(secret_tap_count) = self.secret_tap_count {
            config.secret_tap_count = secret_tap_count;
        }
        if let Some(secret_tap_window_seconds) = self.secret_tap_window_seconds {
            config.secret_tap_window_seconds = secret_tap_window_seconds;
        }
        if let Some(assets_folder) = self.assets_folder {
            config.assets_folder = assets_folder;
        }
        if let Some(placeholder_image) = self.placeholder_image {
            config.placeholder_image = placeholder_image;
        }
        if let Some(discord_server_link) = self.discord_server_link {
            config.discord_server_link = discord_server_link;
        }
        if let Some(allow_config_edit) = self.allow_config_edit {
            config.allow_config_edit = allow_config_edit;
        }
        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }
    }
}

/// Sanitized configuration exposed over the public API. Admin credentials
/// never leave the process.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfigView {
    pub site_title: String,
    #[serde(flatten)]
    pub scoring: ScoringConfig,
    pub secret_tap_count: u32,
    pub secret_tap_window_seconds: u32,
    pub assets_folder: String,
    pub placeholder_image: String,
    pub discord_server_link: String,
    pub allow_config_edit: bool,
    pub base_url: String,
}

impl From<&SiteConfig> for SiteConfigView {
    fn from(config: &SiteConfig) -> Self {
        Self {
            site_title: config.site_title.clone(),
            scoring: config.scoring.clone(),
            secret_tap_count: config.secret_tap_count,
            secret_tap_window_seconds: config.secret_tap_window_seconds,
            assets_folder: config.assets_folder.clone(),
            placeholder_image: config.placeholder_image.clone(),
            discord_server_link: config.discord_server_link.clone(),
            allow_config_edit: config.allow_config_edit,
            base_url: config.base_url.clone(),
        }
    }
}
