//! Parameters, parameter-overrides en hun parametertypes.

use super::Iid;
use super::value_set::ParameterValueSet;

/// Type van een parameter; alleen de velden die de scene nodig heeft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterType {
    pub iid: Iid,
    pub name: String,
    pub short_name: String,
    /// Aantal waarden per value set (groter dan 1 voor samengestelde types).
    pub number_of_values: usize,
}

impl ParameterType {
    #[must_use]
    pub fn new(iid: Iid, name: impl Into<String>, short_name: impl Into<String>) -> Self {
        Self {
            iid,
            name: name.into(),
            short_name: short_name.into(),
            number_of_values: 1,
        }
    }

    #[must_use]
    pub fn with_number_of_values(mut self, count: usize) -> Self {
        self.number_of_values = count.max(1);
        self
    }
}

/// Parameter van een element definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub iid: Iid,
    pub parameter_type: Iid,
    pub is_option_dependent: bool,
    /// De actual finite state list waarlangs de parameter varieert.
    pub state_dependence: Option<Iid>,
    pub value_sets: Vec<ParameterValueSet>,
}

impl Parameter {
    #[must_use]
    pub fn new(iid: Iid, parameter_type: Iid) -> Self {
        Self {
            iid,
            parameter_type,
            is_option_dependent: false,
            state_dependence: None,
            value_sets: Vec::new(),
        }
    }

    #[must_use]
    pub fn option_dependent(mut self) -> Self {
        self.is_option_dependent = true;
        self
    }

    #[must_use]
    pub fn state_dependent(mut self, state_list: Iid) -> Self {
        self.state_dependence = Some(state_list);
        self
    }

    #[must_use]
    pub fn with_value_set(mut self, value_set: ParameterValueSet) -> Self {
        self.value_sets.push(value_set);
        self
    }
}

/// Herdefinitie van een parameter binnen een element usage.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterOverride {
    pub iid: Iid,
    /// De overschreven parameter van de element definition.
    pub parameter: Iid,
    pub value_sets: Vec<ParameterValueSet>,
}

impl ParameterOverride {
    #[must_use]
    pub fn new(iid: Iid, parameter: Iid) -> Self {
        Self {
            iid,
            parameter,
            value_sets: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_value_set(mut self, value_set: ParameterValueSet) -> Self {
        self.value_sets.push(value_set);
        self
    }
}

/// Een parameter of een override, samen met de parameter die de
/// afhankelijkheden (optie, toestand) bepaalt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParameterOrOverride<'a> {
    Parameter(&'a Parameter),
    Override {
        value: &'a ParameterOverride,
        parameter: &'a Parameter,
    },
}

impl<'a> ParameterOrOverride<'a> {
    #[must_use]
    pub fn iid(&self) -> Iid {
        match self {
            Self::Parameter(parameter) => parameter.iid,
            Self::Override { value, .. } => value.iid,
        }
    }

    /// De onderliggende parameter, ook voor een override.
    #[must_use]
    pub fn parameter(&self) -> &'a Parameter {
        match self {
            Self::Parameter(parameter) => parameter,
            Self::Override { parameter, .. } => parameter,
        }
    }

    #[must_use]
    pub fn value_sets(&self) -> &'a [ParameterValueSet] {
        match self {
            Self::Parameter(parameter) => &parameter.value_sets,
            Self::Override { value, .. } => &value.value_sets,
        }
    }

    #[must_use]
    pub fn is_override(&self) -> bool {
        matches!(self, Self::Override { .. })
    }
}
