//! Element definitions, usages, opties en finite states.

use serde::{Deserialize, Serialize};

use super::Iid;
use super::parameter::{Parameter, ParameterOverride};

/// Een ontwerpoptie van de iteratie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelOption {
    pub iid: Iid,
    pub name: String,
    pub short_name: String,
}

impl ModelOption {
    #[must_use]
    pub fn new(iid: Iid, name: impl Into<String>, short_name: impl Into<String>) -> Self {
        Self {
            iid,
            name: name.into(),
            short_name: short_name.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActualFiniteStateKind {
    #[default]
    Mandatory,
    Forbidden,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActualFiniteState {
    pub iid: Iid,
    pub name: String,
    pub kind: ActualFiniteStateKind,
}

impl ActualFiniteState {
    #[must_use]
    pub fn new(iid: Iid, name: impl Into<String>) -> Self {
        Self {
            iid,
            name: name.into(),
            kind: ActualFiniteStateKind::Mandatory,
        }
    }

    #[must_use]
    pub fn forbidden(mut self) -> Self {
        self.kind = ActualFiniteStateKind::Forbidden;
        self
    }
}

/// Geordende lijst van actual finite states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActualFiniteStateList {
    pub iid: Iid,
    pub name: String,
    pub actual_states: Vec<ActualFiniteState>,
}

impl ActualFiniteStateList {
    #[must_use]
    pub fn new(iid: Iid, name: impl Into<String>) -> Self {
        Self {
            iid,
            name: name.into(),
            actual_states: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_state(mut self, state: ActualFiniteState) -> Self {
        self.actual_states.push(state);
        self
    }

    #[must_use]
    pub fn contains(&self, state: Iid) -> bool {
        self.actual_states.iter().any(|entry| entry.iid == state)
    }

    /// Eerste verplichte toestand; gebruikt wanneer de aanroeper geen
    /// toestand uit deze lijst meegeeft.
    #[must_use]
    pub fn default_state(&self) -> Option<&ActualFiniteState> {
        self.actual_states
            .iter()
            .find(|state| state.kind == ActualFiniteStateKind::Mandatory)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementDefinition {
    pub iid: Iid,
    pub name: String,
    pub short_name: String,
    pub parameters: Vec<Parameter>,
    pub contained_elements: Vec<ElementUsage>,
}

impl ElementDefinition {
    #[must_use]
    pub fn new(iid: Iid, name: impl Into<String>, short_name: impl Into<String>) -> Self {
        Self {
            iid,
            name: name.into(),
            short_name: short_name.into(),
            parameters: Vec::new(),
            contained_elements: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    #[must_use]
    pub fn with_usage(mut self, usage: ElementUsage) -> Self {
        self.contained_elements.push(usage);
        self
    }

    #[must_use]
    pub fn parameter(&self, iid: Iid) -> Option<&Parameter> {
        self.parameters.iter().find(|parameter| parameter.iid == iid)
    }

    #[must_use]
    pub fn parameter_of_type(&self, parameter_type: Iid) -> Option<&Parameter> {
        self.parameters
            .iter()
            .find(|parameter| parameter.parameter_type == parameter_type)
    }
}

/// Gebruik van een element definition binnen een andere definition.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementUsage {
    pub iid: Iid,
    pub name: String,
    pub short_name: String,
    pub element_definition: Iid,
    pub parameter_overrides: Vec<ParameterOverride>,
    pub excluded_options: Vec<Iid>,
}

impl ElementUsage {
    #[must_use]
    pub fn new(
        iid: Iid,
        name: impl Into<String>,
        short_name: impl Into<String>,
        element_definition: Iid,
    ) -> Self {
        Self {
            iid,
            name: name.into(),
            short_name: short_name.into(),
            element_definition,
            parameter_overrides: Vec::new(),
            excluded_options: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_override(mut self, parameter_override: ParameterOverride) -> Self {
        self.parameter_overrides.push(parameter_override);
        self
    }

    #[must_use]
    pub fn excluding(mut self, option: Iid) -> Self {
        self.excluded_options.push(option);
        self
    }

    #[must_use]
    pub fn is_excluded_from(&self, option: Iid) -> bool {
        self.excluded_options.contains(&option)
    }

    #[must_use]
    pub fn override_of(&self, parameter: Iid) -> Option<&ParameterOverride> {
        self.parameter_overrides
            .iter()
            .find(|entry| entry.parameter == parameter)
    }
}
