#[cfg(test)]
#[path = "project_test.rs"]
mod tests;

use std::path;

use serde_derive::Deserialize;
use serde_derive::Serialize;

/// Identity of an open project. At most one exists at a time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub id: String,
    pub name: String,
    pub path: path::PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ProjectTemplate {
    Empty,
    Channel,
    Transition,
    Chute,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LengthUnit {
    Meters,
    Millimeters,
    Feet,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AngleUnit {
    Degrees,
    Radians,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSettings {
    pub length: LengthUnit,
    pub angle: AngleUnit,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectSettings {
    pub units: UnitSettings,
    pub precision: u8,
    pub theme: String,
    pub auto_save: bool,
    pub auto_save_interval_secs: u64,
}

impl Default for ProjectSettings {
    fn default() -> ProjectSettings {
        return ProjectSettings {
            units: UnitSettings {
                length: LengthUnit::Meters,
                angle: AngleUnit::Degrees,
            },
            precision: 2,
            theme: "dark".to_string(),
            auto_save: true,
            auto_save_interval_secs: 300,
        };
    }
}

/// Partial update applied on top of the current settings.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ProjectSettingsPatch {
    pub units: Option<UnitSettings>,
    pub precision: Option<u8>,
    pub theme: Option<String>,
    pub auto_save: Option<bool>,
    pub auto_save_interval_secs: Option<u64>,
}

impl ProjectSettings {
    pub fn merge(&mut self, patch: ProjectSettingsPatch) {
        if let Some(units) = patch.units {
            self.units = units;
        }
        if let Some(precision) = patch.precision {
            self.precision = precision;
        }
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(auto_save) = patch.auto_save {
            self.auto_save = auto_save;
        }
        if let Some(interval) = patch.auto_save_interval_secs {
            self.auto_save_interval_secs = interval;
        }
    }
}
