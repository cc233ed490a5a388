//! Parameter value sets en de Manual/Reference/Computed-schakelaar.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Iid;
use super::value_array::ValueArray;

/// Fouten bij het lezen of schrijven van een value set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueSetError {
    /// Berekende waarden zijn afgeleid en kunnen niet bewerkt worden.
    #[error("computed waarden zijn alleen-lezen")]
    ComputedIsReadOnly,
    #[error("index {index} valt buiten een reeks van lengte {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("verwachtte {expected} waarden maar kreeg {found}")]
    LengthMismatch { expected: usize, found: usize },
    #[error("onbekende switch `{0}`")]
    UnknownSwitch(String),
}

/// Bepaalt welke van de drie reeksen actief is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SwitchKind {
    #[default]
    Manual,
    Computed,
    Reference,
}

impl SwitchKind {
    #[must_use]
    pub fn is_editable(self) -> bool {
        !matches!(self, Self::Computed)
    }
}

impl fmt::Display for SwitchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Manual => "MANUAL",
            Self::Computed => "COMPUTED",
            Self::Reference => "REFERENCE",
        };
        f.write_str(name)
    }
}

impl FromStr for SwitchKind {
    type Err = ValueSetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MANUAL" => Ok(Self::Manual),
            "COMPUTED" => Ok(Self::Computed),
            "REFERENCE" => Ok(Self::Reference),
            _ => Err(ValueSetError::UnknownSwitch(s.to_owned())),
        }
    }
}

/// Vier parallelle waardereeksen voor één voorkomen van een parameter.
///
/// Value sets van een override dragen in `parameter_value_set` de iid van de
/// value set die ze overschrijven; optie en toestand zijn dan overgenomen van
/// die basis-set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterValueSet {
    pub iid: Iid,
    pub actual_option: Option<Iid>,
    pub actual_state: Option<Iid>,
    pub manual: ValueArray,
    pub computed: ValueArray,
    pub reference: ValueArray,
    pub published: ValueArray,
    pub value_switch: SwitchKind,
    pub parameter_value_set: Option<Iid>,
}

impl ParameterValueSet {
    /// Maakt een lege value set met `len` waarden per reeks.
    #[must_use]
    pub fn new(iid: Iid, len: usize) -> Self {
        Self {
            iid,
            actual_option: None,
            actual_state: None,
            manual: ValueArray::new(len),
            computed: ValueArray::new(len),
            reference: ValueArray::new(len),
            published: ValueArray::new(len),
            value_switch: SwitchKind::Manual,
            parameter_value_set: None,
        }
    }

    #[must_use]
    pub fn with_option(mut self, option: Iid) -> Self {
        self.actual_option = Some(option);
        self
    }

    #[must_use]
    pub fn with_state(mut self, state: Iid) -> Self {
        self.actual_state = Some(state);
        self
    }

    #[must_use]
    pub fn with_manual(mut self, manual: ValueArray) -> Self {
        self.manual = manual;
        self
    }

    /// Geeft de reeks die bij `switch` hoort.
    #[must_use]
    pub fn select_active(&self, switch: SwitchKind) -> &ValueArray {
        match switch {
            SwitchKind::Manual => &self.manual,
            SwitchKind::Computed => &self.computed,
            SwitchKind::Reference => &self.reference,
        }
    }

    /// De actuele waarde volgens de eigen schakelaar van de set.
    #[must_use]
    pub fn actual_value(&self) -> &ValueArray {
        self.select_active(self.value_switch)
    }

    pub fn set_switch(&mut self, switch: SwitchKind) {
        self.value_switch = switch;
    }

    fn active_mut(&mut self) -> Result<&mut ValueArray, ValueSetError> {
        match self.value_switch {
            SwitchKind::Manual => Ok(&mut self.manual),
            SwitchKind::Reference => Ok(&mut self.reference),
            SwitchKind::Computed => Err(ValueSetError::ComputedIsReadOnly),
        }
    }

    /// Schrijft één waarde in de actieve reeks.
    pub fn update(&mut self, index: usize, value: impl Into<String>) -> Result<(), ValueSetError> {
        self.active_mut()?.set(index, value)
    }

    /// Vervangt de volledige actieve reeks.
    pub fn update_active(&mut self, values: &ValueArray) -> Result<(), ValueSetError> {
        self.active_mut()?.replace(values)
    }

    /// Kopieert de actuele waarde naar `published`.
    pub fn publish(&mut self) {
        let actual = self.actual_value().clone();
        self.published = actual;
    }

    /// Aantal waarden per reeks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.manual.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.manual.is_empty()
    }
}
