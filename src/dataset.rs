use include_dir::{include_dir, Dir};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::error::Error;
use std::fmt;

static DATA_DIR: Dir = include_dir!("src/data");

/// Body region selecting which option set is active for a pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Region {
    UpperBody,
    Trunk,
    LowerBody,
}

impl Region {
    pub const ALL: [Region; 3] = [Region::UpperBody, Region::Trunk, Region::LowerBody];

    pub fn label(&self) -> &'static str {
        match self {
            Region::UpperBody => "upper body",
            Region::Trunk => "trunk",
            Region::LowerBody => "lower body",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QuizOption {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub correct: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Pose {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    pub options: Vec<QuizOption>,
}

/// Alternate option sets for a pose; a missing region falls back to the
/// pose's default options. Upper body is never overridden.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegionOverride {
    #[serde(default)]
    pub trunk: Option<Vec<QuizOption>>,
    #[serde(default, rename = "lower-body")]
    pub lower_body: Option<Vec<QuizOption>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GlossaryEntry {
    pub term: String,
    pub definition: String,
}

#[derive(Debug)]
pub enum DatasetError {
    MissingFile(&'static str),
    Parse(&'static str, serde_json::Error),
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetError::MissingFile(name) => write!(f, "embedded data file {} not found", name),
            DatasetError::Parse(name, e) => write!(f, "failed to parse {}: {}", name, e),
        }
    }
}

impl Error for DatasetError {}

/// The read-only in-memory dataset: poses, per-region overrides, glossary.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub poses: Vec<Pose>,
    overrides: HashMap<String, RegionOverride>,
    pub glossary: Vec<GlossaryEntry>,
}

impl Dataset {
    pub fn load() -> Result<Self, DatasetError> {
        Ok(Self {
            poses: read_data_file("poses.json")?,
            overrides: read_data_file("overrides.json")?,
            glossary: read_data_file("glossary.json")?,
        })
    }

    /// Build a dataset directly, bypassing the embedded files. Used by tests
    /// that need a tiny controlled pose list.
    pub fn from_parts(
        poses: Vec<Pose>,
        overrides: HashMap<String, RegionOverride>,
        glossary: Vec<GlossaryEntry>,
    ) -> Self {
        Self {
            poses,
            overrides,
            glossary,
        }
    }

    pub fn pose(&self, id: &str) -> Option<&Pose> {
        self.poses.iter().find(|p| p.id == id)
    }

    pub fn pose_ids(&self) -> Vec<String> {
        self.poses.iter().map(|p| p.id.clone()).collect()
    }

    /// Resolve the active option set for a pose and region: the override set
    /// if one exists for that region, else the pose's default set.
    pub fn options_for(&self, pose_id: &str, region: Region) -> Option<&[QuizOption]> {
        let pose = self.pose(pose_id)?;

        let overridden = match region {
            Region::UpperBody => None,
            Region::Trunk => self.overrides.get(pose_id).and_then(|o| o.trunk.as_deref()),
            Region::LowerBody => self
                .overrides
                .get(pose_id)
                .and_then(|o| o.lower_body.as_deref()),
        };

        Some(overridden.unwrap_or(&pose.options))
    }
}

fn read_data_file<T: serde::de::DeserializeOwned>(name: &'static str) -> Result<T, DatasetError> {
    let file = DATA_DIR
        .get_file(name)
        .ok_or(DatasetError::MissingFile(name))?;
    let contents = file
        .contents_utf8()
        .ok_or(DatasetError::MissingFile(name))?;

    serde_json::from_str(contents).map_err(|e| DatasetError::Parse(name, e))
}
