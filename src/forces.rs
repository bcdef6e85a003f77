use serde::{Deserialize, Serialize};

use crate::geometry::Vec2;

/// One user-drawn answer arrow.
///
/// The force vector is `arrow_tip - arrow_base`; `anchor` is the point of
/// application. All three are optional because the UI builds forces
/// incrementally during a drag gesture; only complete forces are scored.
/// Wire keys match the persisted record format of the drawing layer
/// (`anchor`/`arrowBase`/`arrowTip`), with the legacy single-letter keys
/// accepted on input only.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawnForce {
    #[serde(default)]
    pub name: String,

    #[serde(default, alias = "A")]
    pub anchor: Option<Vec2>,

    #[serde(default, rename = "arrowBase", alias = "C")]
    pub arrow_base: Option<Vec2>,

    #[serde(default, rename = "arrowTip", alias = "B")]
    pub arrow_tip: Option<Vec2>,

    #[serde(default = "default_true")]
    pub editable: bool,

    #[serde(default = "default_true")]
    pub moveable: bool,
}

fn default_true() -> bool {
    true
}

impl DrawnForce {
    pub fn new(name: &str, anchor: Vec2, arrow_base: Vec2, arrow_tip: Vec2) -> Self {
        DrawnForce {
            name: name.to_string(),
            anchor: Some(anchor),
            arrow_base: Some(arrow_base),
            arrow_tip: Some(arrow_tip),
            editable: true,
            moveable: true,
        }
    }

    /// Force vector `arrow_tip - arrow_base`, None while incomplete.
    pub fn vector(&self) -> Option<Vec2> {
        match (self.arrow_base, self.arrow_tip) {
            (Some(base), Some(tip)) => Some(tip.sub(base)),
            _ => None,
        }
    }

    pub fn length(&self) -> f32 {
        self.vector().map_or(0.0, Vec2::norm)
    }

    /// A force is complete when anchor, base and tip are all set and the
    /// arrow is at least `min_len` long. Incomplete forces are excluded
    /// from scoring entirely.
    pub fn is_complete(&self, min_len: f32) -> bool {
        self.anchor.is_some()
            && self.arrow_base.is_some()
            && self.arrow_tip.is_some()
            && self.length() >= min_len
    }

    /// Case-insensitive name check against a canonical name and aliases.
    pub fn name_matches<'a, I>(&self, canonical: &str, aliases: I) -> bool
    where
        I: IntoIterator<Item = &'a String>,
    {
        let n = normalize_name(&self.name);
        if n.is_empty() {
            return false;
        }
        if n == normalize_name(canonical) {
            return true;
        }
        aliases.into_iter().any(|a| normalize_name(a) == n)
    }
}

/// Normalize a force name for comparison: trim, lowercase, and strip
/// spaces, underscores and carets (sub/superscript markup characters).
pub fn normalize_name(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '^'))
        .collect()
}
