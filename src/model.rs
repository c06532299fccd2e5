//! Board layout and score-contributor metadata as loaded from the board
//! document. Everything here is immutable once `BoardModel::from_json`
//! returns.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::error::LoadError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub x: i32,
    pub y: i32,
    /// Shape name (`CIRCLE`, `JOKER`, ...). Informational only.
    #[serde(rename = "type", default)]
    pub shape: Option<String>,
    #[serde(rename = "isMonument", default)]
    pub is_monument: bool,
    /// 0..=3 for the four starting stations, -1 otherwise.
    #[serde(default = "no_starting_position")]
    pub starting_position: i32,
    #[serde(default)]
    pub texture: String,
}

fn no_starting_position() -> i32 {
    -1
}

impl Station {
    pub fn pos(&self) -> GridPos {
        GridPos::new(self.x, self.y)
    }

    pub fn starting_slot(&self) -> Option<usize> {
        usize::try_from(self.starting_position).ok().filter(|s| *s < 4)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Intersection {
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub texture: String,
}

impl Intersection {
    pub fn pos(&self) -> GridPos {
        GridPos::new(self.x, self.y)
    }
}

/// Axis-aligned rectangle in grid units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct District {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiverPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RiverLayout {
    #[serde(default)]
    pub path: Vec<RiverPoint>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionKind {
    /// Authored with the board, drawn dashed, never editable.
    Prebaked,
    /// Drawn by the player.
    User,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub from: GridPos,
    pub to: GridPos,
    pub color: String,
    pub kind: ConnectionKind,
}

impl Connection {
    pub fn touches(&self, pos: GridPos) -> bool {
        self.from == pos || self.to == pos
    }
}

#[derive(Clone, Copy, Debug, Deserialize)]
struct RawConnection {
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
}

/// Simple score contributor: an icon and a multiplier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Contributor {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default = "unit_multiplier")]
    pub multiplier: f64,
    #[serde(default)]
    pub texture: String,
}

fn unit_multiplier() -> f64 {
    1.0
}

impl Default for Contributor {
    fn default() -> Self {
        Self {
            kind: String::new(),
            multiplier: 1.0,
            texture: String::new(),
        }
    }
}

impl Contributor {
    /// A contributor without a type is a placeholder left by the board
    /// generator and counts as absent.
    pub fn is_present(&self) -> bool {
        !self.kind.is_empty()
    }
}

/// Up to three optional sub-contributors whose weighted inputs are summed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CompoundContributor {
    pub a: Option<Contributor>,
    pub b: Option<Contributor>,
    pub c: Option<Contributor>,
}

/// Monument icons that are ticked off individually; the score is looked up by
/// how many are ticked.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MonumentSet {
    pub textures: Vec<String>,
    /// `table[n]` is the bonus for `n` selected monuments.
    pub table: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ProgressContributor {
    Compound(CompoundContributor),
    MonumentSet(MonumentSet),
}

/// All contributor metadata the score pad is built from.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScoreSheet {
    pub turn_wise: [Contributor; 3],
    pub end_game: [Contributor; 3],
    pub progress: Option<ProgressContributor>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum RawProgress {
    #[serde(rename = "ProgressScoreCompoundContributor", rename_all = "camelCase")]
    Compound {
        #[serde(default)]
        score_contributor_a: Option<Contributor>,
        #[serde(default)]
        score_contributor_b: Option<Contributor>,
        #[serde(default)]
        score_contributor_c: Option<Contributor>,
    },
    #[serde(rename = "ProgressScoreMonuments")]
    Monuments {
        #[serde(default)]
        fields: Vec<serde_json::Value>,
        #[serde(default)]
        textures: Vec<String>,
    },
    #[serde(other)]
    Unknown,
}

impl RawProgress {
    fn into_contributor(self) -> Option<ProgressContributor> {
        let present = |c: Option<Contributor>| c.filter(Contributor::is_present);
        match self {
            RawProgress::Compound {
                score_contributor_a,
                score_contributor_b,
                score_contributor_c,
            } => Some(ProgressContributor::Compound(CompoundContributor {
                a: present(score_contributor_a),
                b: present(score_contributor_b),
                c: present(score_contributor_c),
            })),
            RawProgress::Monuments { fields, textures } => {
                let table = fields.iter().map(table_entry).collect();
                Some(ProgressContributor::MonumentSet(MonumentSet { textures, table }))
            }
            RawProgress::Unknown => None,
        }
    }
}

// Monument tables are authored as strings ("0", "1", "2", "4", ...).
fn table_entry(value: &serde_json::Value) -> f64 {
    match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn default_extent() -> u32 {
    10
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BoardDocument {
    #[serde(default = "default_extent")]
    width: u32,
    #[serde(default = "default_extent")]
    height: u32,
    #[serde(default)]
    stations: Vec<Station>,
    #[serde(default)]
    intersections: Vec<Intersection>,
    #[serde(default)]
    districts: Vec<District>,
    #[serde(default)]
    river_layout: RiverLayout,
    #[serde(default)]
    connections: Vec<RawConnection>,
    #[serde(default)]
    turn_wise_score_contributor_a: Contributor,
    #[serde(default)]
    turn_wise_score_contributor_b: Contributor,
    #[serde(default)]
    turn_wise_score_contributor_c: Contributor,
    #[serde(default)]
    end_game_score_contributor_a: Contributor,
    #[serde(default)]
    end_game_score_contributor_b: Contributor,
    #[serde(default)]
    end_game_score_contributor_c: Contributor,
    #[serde(default)]
    progress_score_contributor: Option<RawProgress>,
}

/// Loaded-once board layout.
#[derive(Clone, Debug, PartialEq)]
pub struct BoardModel {
    pub width: u32,
    pub height: u32,
    pub stations: Vec<Station>,
    pub intersections: Vec<Intersection>,
    pub districts: Vec<District>,
    pub river: RiverLayout,
    pub prebaked: Vec<Connection>,
    pub sheet: ScoreSheet,
    station_index: HashMap<GridPos, usize>,
}

impl BoardModel {
    pub fn from_json(raw: &str) -> Result<Self, LoadError> {
        let doc: BoardDocument = serde_json::from_str(raw)?;
        Ok(Self::from_document(doc))
    }

    fn from_document(doc: BoardDocument) -> Self {
        let prebaked = doc
            .connections
            .iter()
            .map(|c| Connection {
                from: GridPos::new(c.x1, c.y1),
                to: GridPos::new(c.x2, c.y2),
                color: crate::config::PREBAKED_COLOR.to_string(),
                kind: ConnectionKind::Prebaked,
            })
            .collect();
        let sheet = ScoreSheet {
            turn_wise: [
                doc.turn_wise_score_contributor_a,
                doc.turn_wise_score_contributor_b,
                doc.turn_wise_score_contributor_c,
            ],
            end_game: [
                doc.end_game_score_contributor_a,
                doc.end_game_score_contributor_b,
                doc.end_game_score_contributor_c,
            ],
            progress: doc
                .progress_score_contributor
                .and_then(RawProgress::into_contributor),
        };
        Self::new(
            doc.width,
            doc.height,
            doc.stations,
            doc.intersections,
            doc.districts,
            doc.river_layout,
            prebaked,
            sheet,
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn new(
        width: u32,
        height: u32,
        stations: Vec<Station>,
        intersections: Vec<Intersection>,
        districts: Vec<District>,
        river: RiverLayout,
        prebaked: Vec<Connection>,
        sheet: ScoreSheet,
    ) -> Self {
        // First station wins if the document places two on one cell.
        let mut station_index = HashMap::with_capacity(stations.len());
        for (i, s) in stations.iter().enumerate() {
            station_index.entry(s.pos()).or_insert(i);
        }
        Self {
            width,
            height,
            stations,
            intersections,
            districts,
            river,
            prebaked,
            sheet,
            station_index,
        }
    }

    pub fn station_at(&self, pos: GridPos) -> Option<&Station> {
        self.station_index.get(&pos).map(|&i| &self.stations[i])
    }

    /// Distinct texture names referenced by stations and intersections.
    pub fn textures(&self) -> BTreeSet<String> {
        self.stations
            .iter()
            .map(|s| s.texture.as_str())
            .chain(self.intersections.iter().map(|i| i.texture.as_str()))
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "width": 10, "height": 10,
        "stations": [
            {"x": 1, "y": 1, "type": "CIRCLE", "isMonument": false, "startingPosition": 0, "texture": "st-a"},
            {"x": 3, "y": 1, "type": "JOKER", "isMonument": true, "startingPosition": -1, "texture": "st-b"}
        ],
        "intersections": [{"x": 2, "y": 1, "bottom": "LEFT_TO_RIGHT", "texture": "ix"}],
        "districts": [{"x": 0, "y": 0, "width": 5, "height": 5}],
        "riverLayout": {"path": [{"x": 0.5, "y": 0.5}, {"x": 4.5, "y": 4.5}]},
        "connections": [{"x1": 1, "y1": 1, "x2": 3, "y2": 1}],
        "turnWiseScoreContributorA": {"type": "ScoreIntersections", "multiplier": 1, "texture": "tw-a"},
        "endGameScoreContributorB": {"type": "ScoreRiverCrossings", "multiplier": 3, "texture": "eg-b"},
        "progressScoreContributor": {
            "type": "ProgressScoreMonuments",
            "fields": ["0", "1", "2", "4"],
            "textures": ["m0", "m1", "m2", "m3"]
        },
        "stationCards": []
    }"#;

    #[test]
    fn parses_board_document() {
        let board = BoardModel::from_json(DOC).unwrap();
        assert_eq!(board.stations.len(), 2);
        assert_eq!(board.stations[0].starting_slot(), Some(0));
        assert_eq!(board.stations[1].starting_slot(), None);
        assert!(board.stations[1].is_monument);
        assert_eq!(board.prebaked.len(), 1);
        assert_eq!(board.prebaked[0].kind, ConnectionKind::Prebaked);
        assert_eq!(board.river.path.len(), 2);
        assert_eq!(board.sheet.end_game[1].multiplier, 3.0);
        // Missing slots default to an absent, unit-multiplier contributor.
        assert!(!board.sheet.end_game[0].is_present());
        assert_eq!(board.sheet.end_game[0].multiplier, 1.0);
        match &board.sheet.progress {
            Some(ProgressContributor::MonumentSet(m)) => {
                assert_eq!(m.table, vec![0.0, 1.0, 2.0, 4.0]);
            }
            other => panic!("unexpected progress contributor {other:?}"),
        }
    }

    #[test]
    fn station_lookup_and_textures() {
        let board = BoardModel::from_json(DOC).unwrap();
        assert!(board.station_at(GridPos::new(3, 1)).is_some());
        assert!(board.station_at(GridPos::new(2, 1)).is_none());
        let textures: Vec<_> = board.textures().into_iter().collect();
        assert_eq!(textures, vec!["ix", "st-a", "st-b"]);
    }

    #[test]
    fn compound_sub_contributor_without_type_is_absent() {
        let doc = r#"{
            "progressScoreContributor": {
                "type": "ProgressScoreCompoundContributor",
                "scoreContributorA": {"type": "ScoreDistrictsVisited", "multiplier": 4, "texture": "a"},
                "scoreContributorB": {"multiplier": 1},
                "scoreContributorC": {"type": "ScoreInterchangeStations", "multiplier": 2, "texture": "c"}
            }
        }"#;
        let board = BoardModel::from_json(doc).unwrap();
        match board.sheet.progress {
            Some(ProgressContributor::Compound(c)) => {
                assert_eq!(c.a.map(|a| a.multiplier), Some(4.0));
                assert!(c.b.is_none());
                assert_eq!(c.c.map(|c| c.multiplier), Some(2.0));
            }
            other => panic!("unexpected progress contributor {other:?}"),
        }
    }

    #[test]
    fn unknown_progress_type_is_ignored() {
        let board =
            BoardModel::from_json(r#"{"progressScoreContributor": {"type": "Mystery"}}"#).unwrap();
        assert!(board.sheet.progress.is_none());
        assert_eq!((board.width, board.height), (10, 10));
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        let err = BoardModel::from_json("{\"stations\": 3}").unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
    }
}
