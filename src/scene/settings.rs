//! Instellingen van de scene-opbouw: welke short names welke eigenschap
//! dragen, de hoekeenheid, het detail van de tesselatie en verborgen usages.

use serde::Deserialize;
use thiserror::Error;
use wildmatch::WildMatch;

use super::mesh::{MAX_SEGMENTS, MIN_SEGMENTS};
use super::orientation::AngleUnit;
use super::primitive::Dimension;

/// Fouten bij het inlezen van scene-instellingen.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("ongeldige instellingen-JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("meshSegments moet minstens {min} zijn, kreeg {0}", min = MIN_SEGMENTS)]
    TooFewSegments(usize),
    #[error("meshSegments mag hoogstens {max} zijn, kreeg {0}", max = MAX_SEGMENTS)]
    TooManySegments(usize),
    #[error("short name voor `{0}` is leeg")]
    EmptyShortName(&'static str),
}

/// Short names van de parameters die de scene-opbouw zoekt.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShortNames {
    pub kind: String,
    /// Positieparameter met drie waarden.
    pub position: String,
    /// Losse coördinaten, gebruikt als `position` ontbreekt.
    pub x: String,
    pub y: String,
    pub z: String,
    pub orientation: String,
    pub color: String,
    pub width: String,
    pub height: String,
    pub length: String,
    pub diameter: String,
    pub thickness: String,
}

impl Default for ShortNames {
    fn default() -> Self {
        Self {
            kind: "kind".to_owned(),
            position: "loc".to_owned(),
            x: "x".to_owned(),
            y: "y".to_owned(),
            z: "z".to_owned(),
            orientation: "orientation".to_owned(),
            color: "color".to_owned(),
            width: "wid".to_owned(),
            height: "h".to_owned(),
            length: "l".to_owned(),
            diameter: "dia".to_owned(),
            thickness: "thi".to_owned(),
        }
    }
}

impl ShortNames {
    #[must_use]
    pub fn dimension(&self, dimension: Dimension) -> &str {
        match dimension {
            Dimension::Width => &self.width,
            Dimension::Height => &self.height,
            Dimension::Length => &self.length,
            Dimension::Diameter => &self.diameter,
            Dimension::Thickness => &self.thickness,
        }
    }

    fn entries(&self) -> [(&'static str, &str); 12] {
        [
            ("kind", &self.kind),
            ("position", &self.position),
            ("x", &self.x),
            ("y", &self.y),
            ("z", &self.z),
            ("orientation", &self.orientation),
            ("color", &self.color),
            ("width", &self.width),
            ("height", &self.height),
            ("length", &self.length),
            ("diameter", &self.diameter),
            ("thickness", &self.thickness),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SceneSettings {
    pub short_names: ShortNames,
    /// Eenheid waarin oriëntaties worden gerapporteerd.
    pub angle_unit: AngleUnit,
    /// Onderverdelingen van ronde omtrekken.
    pub mesh_segments: usize,
    /// Wildcard-maskers (`*`, `?`) op short names van usages die buiten de scene blijven.
    pub hidden_masks: Vec<String>,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            short_names: ShortNames::default(),
            angle_unit: AngleUnit::Degrees,
            mesh_segments: 24,
            hidden_masks: Vec::new(),
        }
    }
}

impl SceneSettings {
    /// Leest instellingen uit JSON; ontbrekende velden houden hun standaardwaarde.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.mesh_segments < MIN_SEGMENTS {
            return Err(SettingsError::TooFewSegments(self.mesh_segments));
        }
        if self.mesh_segments > MAX_SEGMENTS {
            return Err(SettingsError::TooManySegments(self.mesh_segments));
        }
        if let Some((field, _)) = self
            .short_names
            .entries()
            .into_iter()
            .find(|(_, value)| value.trim().is_empty())
        {
            return Err(SettingsError::EmptyShortName(field));
        }
        Ok(())
    }

    /// Of een usage met `short_name` op een van de verbergmaskers past.
    #[must_use]
    pub fn is_hidden(&self, short_name: &str) -> bool {
        let short_name = short_name.to_lowercase();
        self.hidden_masks
            .iter()
            .any(|mask| WildMatch::new(&mask.to_lowercase()).matches(&short_name))
    }
}
