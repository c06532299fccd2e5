//! Board geometry, stroke styles, palette and persisted user preferences.

use serde::{Deserialize, Serialize};

pub const PREBAKED_COLOR: &str = "#ededed";
pub const DEFAULT_COLOR: &str = "rgb(255, 145, 35)";
pub const COMMON_GOAL_BONUS: f64 = 10.0;

/// Colors offered by the picker; the first one is selected on a fresh start.
pub const PALETTE: [&str; 5] = [
    DEFAULT_COLOR,
    "rgb(231, 76, 60)",
    "rgb(52, 152, 219)",
    "rgb(46, 204, 113)",
    "rgb(155, 89, 182)",
];

/// Line colors for the four starting stations (red, blue, green, yellow).
pub const STARTING_COLORS: [&str; 4] = ["#e74c3c", "#3498db", "#2ecc71", "#f1c40f"];

const PREFERENCES_KEY: &str = "ns_preferences";

#[derive(Clone, Debug, PartialEq)]
pub struct BoardConfig {
    /// Logical size of one grid cell before viewport scaling.
    pub cell_size: f64,
    /// The board is always `grid_cells` x `grid_cells`.
    pub grid_cells: u32,
    pub river_color: String,
    pub river_width: f64,
    pub district_color: String,
    pub district_width: f64,
    pub prebaked_width: f64,
    pub prebaked_dash: Vec<f64>,
    pub user_width: f64,
    pub preview_width: f64,
    pub station_inset: f64,
    /// Intersection icon edge length as a fraction of a cell.
    pub intersection_scale: f64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            cell_size: 75.0,
            grid_cells: 10,
            river_color: "#7ec8e3".to_string(),
            river_width: 16.0,
            district_color: "#b0b0b0".to_string(),
            district_width: 3.0,
            prebaked_width: 2.0,
            prebaked_dash: vec![9.0],
            user_width: 7.0,
            preview_width: 7.0,
            station_inset: 5.0,
            intersection_scale: 3.0 / 5.0,
        }
    }
}

/// Where board documents and textures are served from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetPaths {
    pub origin: String,
}

impl AssetPaths {
    pub fn new(origin: impl Into<String>) -> Self {
        Self { origin: origin.into() }
    }

    /// Uses the page origin; falls back to relative URLs off-browser.
    pub fn from_window() -> Self {
        let origin = web_sys::window()
            .and_then(|w| w.location().origin().ok())
            .unwrap_or_default();
        Self { origin }
    }

    pub fn board_document(&self, board_id: &str) -> String {
        format!("{}/boards/{}/board-data.json", self.origin, board_id)
    }

    pub fn texture(&self, board_id: &str, texture: &str) -> String {
        format!("{}/boards/{}/img/{}.png", self.origin, board_id, texture)
    }

    pub fn common_goal_icon(&self) -> String {
        format!("{}/static/img/common-goal-icon.png", self.origin)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub board_id: String,
    #[serde(default = "default_color")]
    pub selected_color: String,
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            board_id: String::new(),
            selected_color: default_color(),
        }
    }
}

impl Preferences {
    pub fn from_json(raw: &str) -> Self {
        serde_json::from_str(raw).unwrap_or_default()
    }

    /// Board id with surrounding whitespace removed; this is what gets loaded.
    pub fn effective_board_id(&self) -> &str {
        self.board_id.trim()
    }

    /// Stores the text typed into the board id field. The flag is true only
    /// when the effective board id differs from before.
    pub fn with_board_id(&self, raw: &str) -> (Self, bool) {
        let changed = self.effective_board_id() != raw.trim();
        let next = Self {
            board_id: raw.to_string(),
            ..self.clone()
        };
        (next, changed)
    }

    pub fn load() -> Self {
        if let Some(win) = web_sys::window() {
            if let Ok(Some(store)) = win.local_storage() {
                if let Ok(Some(raw)) = store.get_item(PREFERENCES_KEY) {
                    return Self::from_json(&raw);
                }
            }
        }
        Self::default()
    }

    pub fn save(&self) {
        if let Some(win) = web_sys::window() {
            if let Ok(Some(store)) = win.local_storage() {
                if let Ok(s) = serde_json::to_string(self) {
                    let _ = store.set_item(PREFERENCES_KEY, &s);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_urls() {
        let paths = AssetPaths::new("http://localhost:8080");
        assert_eq!(
            paths.board_document("b1"),
            "http://localhost:8080/boards/b1/board-data.json"
        );
        assert_eq!(
            paths.texture("b1", "abc"),
            "http://localhost:8080/boards/b1/img/abc.png"
        );
    }

    #[test]
    fn corrupt_preferences_fall_back_to_defaults() {
        assert_eq!(Preferences::from_json("not json"), Preferences::default());
        let p = Preferences::from_json(r#"{"board_id": "x"}"#);
        assert_eq!(p.board_id, "x");
        assert_eq!(p.selected_color, DEFAULT_COLOR);
    }

    #[test]
    fn whitespace_edits_keep_the_board() {
        let p = Preferences {
            board_id: "abc".into(),
            ..Preferences::default()
        };
        let (padded, changed) = p.with_board_id("abc ");
        assert!(!changed);
        assert_eq!(padded.board_id, "abc ");
        assert_eq!(padded.effective_board_id(), "abc");

        let (trimmed, changed) = padded.with_board_id(" abc");
        assert!(!changed);
        assert_eq!(trimmed.board_id, " abc");

        let (other, changed) = trimmed.with_board_id("abcd");
        assert!(changed);
        assert_eq!(other.effective_board_id(), "abcd");
    }
}
