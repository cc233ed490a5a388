//! Kern datastructuren voor het in-memory model van een COMET iteratie.

use std::collections::HashMap;
use std::fmt;

pub mod element;
pub mod parameter;
pub mod resolver;
pub mod value_array;
pub mod value_set;

use element::{ActualFiniteState, ActualFiniteStateList, ElementDefinition, ElementUsage, ModelOption};
use parameter::ParameterType;
use value_set::ParameterValueSet;

/// Unieke identifier van elk COMET-object.
pub type Iid = uuid::Uuid;

/// Iteratie-container met indices voor snelle lookups.
#[derive(Debug, Clone, Default)]
pub struct Iteration {
    options: Vec<ModelOption>,
    state_lists: Vec<ActualFiniteStateList>,
    parameter_types: Vec<ParameterType>,
    element_definitions: Vec<ElementDefinition>,
    option_index: HashMap<Iid, usize>,
    state_list_index: HashMap<Iid, usize>,
    state_index: HashMap<Iid, (usize, usize)>,
    parameter_type_index: HashMap<Iid, usize>,
    short_name_index: HashMap<String, Iid>,
    definition_index: HashMap<Iid, usize>,
    usage_index: HashMap<Iid, (usize, usize)>,
    top_element: Option<Iid>,
}

impl Iteration {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_option(&mut self, option: ModelOption) -> Result<Iid, ModelError> {
        let iid = option.iid;
        if self.option_index.contains_key(&iid) {
            return Err(ModelError::Duplicate(iid));
        }
        self.option_index.insert(iid, self.options.len());
        self.options.push(option);
        Ok(iid)
    }

    pub fn add_state_list(&mut self, list: ActualFiniteStateList) -> Result<Iid, ModelError> {
        let iid = list.iid;
        if self.state_list_index.contains_key(&iid) {
            return Err(ModelError::Duplicate(iid));
        }
        if let Some(state) = list
            .actual_states
            .iter()
            .find(|state| self.state_index.contains_key(&state.iid))
        {
            return Err(ModelError::Duplicate(state.iid));
        }

        let list_idx = self.state_lists.len();
        for (state_idx, state) in list.actual_states.iter().enumerate() {
            self.state_index.insert(state.iid, (list_idx, state_idx));
        }
        self.state_list_index.insert(iid, list_idx);
        self.state_lists.push(list);
        Ok(iid)
    }

    pub fn add_parameter_type(&mut self, parameter_type: ParameterType) -> Result<Iid, ModelError> {
        let iid = parameter_type.iid;
        if self.parameter_type_index.contains_key(&iid) {
            return Err(ModelError::Duplicate(iid));
        }
        self.short_name_index
            .entry(normalize_name(&parameter_type.short_name))
            .or_insert(iid);
        self.parameter_type_index
            .insert(iid, self.parameter_types.len());
        self.parameter_types.push(parameter_type);
        Ok(iid)
    }

    pub fn add_element_definition(
        &mut self,
        definition: ElementDefinition,
    ) -> Result<Iid, ModelError> {
        let iid = definition.iid;
        if self.definition_index.contains_key(&iid) {
            return Err(ModelError::Duplicate(iid));
        }
        if let Some(usage) = definition
            .contained_elements
            .iter()
            .find(|usage| self.usage_index.contains_key(&usage.iid))
        {
            return Err(ModelError::Duplicate(usage.iid));
        }

        let definition_idx = self.element_definitions.len();
        for (usage_idx, usage) in definition.contained_elements.iter().enumerate() {
            self.usage_index.insert(usage.iid, (definition_idx, usage_idx));
        }
        self.definition_index.insert(iid, definition_idx);
        self.element_definitions.push(definition);
        Ok(iid)
    }

    /// Zet het top element; de definition moet al bekend zijn.
    pub fn set_top_element(&mut self, iid: Iid) -> Result<(), ModelError> {
        if !self.definition_index.contains_key(&iid) {
            return Err(ModelError::Unknown(iid));
        }
        self.top_element = Some(iid);
        Ok(())
    }

    #[must_use]
    pub fn top_element(&self) -> Option<&ElementDefinition> {
        self.top_element
            .and_then(|iid| self.element_definition(iid))
    }

    #[must_use]
    pub fn options(&self) -> &[ModelOption] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, iid: Iid) -> Option<&ModelOption> {
        self.option_index
            .get(&iid)
            .and_then(|idx| self.options.get(*idx))
    }

    #[must_use]
    pub fn state_list(&self, iid: Iid) -> Option<&ActualFiniteStateList> {
        self.state_list_index
            .get(&iid)
            .and_then(|idx| self.state_lists.get(*idx))
    }

    #[must_use]
    pub fn actual_state(&self, iid: Iid) -> Option<&ActualFiniteState> {
        self.state_index.get(&iid).and_then(|(list, state)| {
            self.state_lists
                .get(*list)
                .and_then(|list| list.actual_states.get(*state))
        })
    }

    #[must_use]
    pub fn parameter_type(&self, iid: Iid) -> Option<&ParameterType> {
        self.parameter_type_index
            .get(&iid)
            .and_then(|idx| self.parameter_types.get(*idx))
    }

    /// Zoekt een parametertype op short name, zonder hoofdlettergevoeligheid.
    #[must_use]
    pub fn parameter_type_by_short_name(&self, short_name: &str) -> Option<&ParameterType> {
        self.short_name_index
            .get(&normalize_name(short_name))
            .and_then(|iid| self.parameter_type(*iid))
    }

    #[must_use]
    pub fn element_definitions(&self) -> &[ElementDefinition] {
        &self.element_definitions
    }

    #[must_use]
    pub fn element_definition(&self, iid: Iid) -> Option<&ElementDefinition> {
        self.definition_index
            .get(&iid)
            .and_then(|idx| self.element_definitions.get(*idx))
    }

    #[must_use]
    pub fn element_usage(&self, iid: Iid) -> Option<&ElementUsage> {
        self.usage_index.get(&iid).and_then(|(definition, usage)| {
            self.element_definitions
                .get(*definition)
                .and_then(|definition| definition.contained_elements.get(*usage))
        })
    }

    /// De element definition waar een usage naar verwijst.
    #[must_use]
    pub fn element_definition_by_usage(&self, usage: &ElementUsage) -> Option<&ElementDefinition> {
        self.element_definition(usage.element_definition)
    }

    /// Alle usages onder het top element, diepte-eerst. Een definition die
    /// via meerdere usages gebruikt wordt, levert haar usages bij elke
    /// plaatsing opnieuw. Een usage die naar een voorouder in het eigen pad
    /// verwijst wordt opgenomen maar niet verder doorlopen. Zonder top
    /// element worden de directe usages van alle definitions teruggegeven.
    #[must_use]
    pub fn usages(&self) -> Vec<&ElementUsage> {
        let Some(top) = self.top_element() else {
            return self
                .element_definitions
                .iter()
                .flat_map(|definition| definition.contained_elements.iter())
                .collect();
        };

        let mut result = Vec::new();
        let mut path = vec![top.iid];
        self.collect_usages(top, &mut path, &mut result);
        result
    }

    fn collect_usages<'a>(
        &'a self,
        definition: &'a ElementDefinition,
        path: &mut Vec<Iid>,
        result: &mut Vec<&'a ElementUsage>,
    ) {
        for usage in &definition.contained_elements {
            result.push(usage);
            if path.contains(&usage.element_definition) {
                log::debug!("cyclische usage {} wordt niet verder doorlopen", usage.short_name);
                continue;
            }
            if let Some(child) = self.element_definition_by_usage(usage) {
                path.push(child.iid);
                self.collect_usages(child, path, result);
                path.pop();
            }
        }
    }

    /// Zoekt een value set (van een parameter of override) op iid.
    pub fn value_set_mut(&mut self, iid: Iid) -> Option<&mut ParameterValueSet> {
        self.element_definitions
            .iter_mut()
            .find_map(|definition| {
                let ElementDefinition {
                    parameters,
                    contained_elements,
                    ..
                } = definition;
                parameters
                    .iter_mut()
                    .flat_map(|parameter| parameter.value_sets.iter_mut())
                    .chain(
                        contained_elements
                            .iter_mut()
                            .flat_map(|usage| usage.parameter_overrides.iter_mut())
                            .flat_map(|entry| entry.value_sets.iter_mut()),
                    )
                    .find(|value_set| value_set.iid == iid)
            })
    }
}

/// Fouten die kunnen optreden bij het opbouwen van het model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    Duplicate(Iid),
    Unknown(Iid),
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Duplicate(iid) => write!(f, "object {iid} bestaat al in de iteratie"),
            Self::Unknown(iid) => write!(f, "object {iid} niet gevonden in de iteratie"),
        }
    }
}

impl std::error::Error for ModelError {}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::model::parameter::Parameter;

    fn iid(n: u128) -> Iid {
        Uuid::from_u128(n)
    }

    #[test]
    fn inserting_things_creates_indices() {
        let mut iteration = Iteration::new();
        iteration
            .add_parameter_type(ParameterType::new(iid(1), "Colour", "color"))
            .unwrap();
        iteration
            .add_state_list(
                ActualFiniteStateList::new(iid(2), "Mode")
                    .with_state(ActualFiniteState::new(iid(3), "On")),
            )
            .unwrap();

        assert!(iteration.parameter_type_by_short_name(" COLOR ").is_some());
        assert_eq!(iteration.actual_state(iid(3)).unwrap().name, "On");
        assert!(iteration.state_list(iid(2)).unwrap().contains(iid(3)));
    }

    #[test]
    fn duplicate_iids_error() {
        let mut iteration = Iteration::new();
        iteration
            .add_option(ModelOption::new(iid(5), "Baseline", "base"))
            .unwrap();
        let err = iteration
            .add_option(ModelOption::new(iid(5), "Other", "other"))
            .unwrap_err();
        assert_eq!(err, ModelError::Duplicate(iid(5)));
    }

    #[test]
    fn top_element_requires_existing_definition() {
        let mut iteration = Iteration::new();
        assert_eq!(
            iteration.set_top_element(iid(1)),
            Err(ModelError::Unknown(iid(1)))
        );
        iteration
            .add_element_definition(ElementDefinition::new(iid(1), "Satellite", "sat"))
            .unwrap();
        assert!(iteration.set_top_element(iid(1)).is_ok());
        assert_eq!(iteration.top_element().unwrap().short_name, "sat");
    }

    #[test]
    fn usages_repeat_shared_definitions_and_stop_at_cycles() {
        let mut iteration = Iteration::new();
        let top = ElementDefinition::new(iid(1), "Satellite", "sat")
            .with_usage(ElementUsage::new(iid(10), "Bus", "bus", iid(2)))
            .with_usage(ElementUsage::new(iid(11), "Bus 2", "bus2", iid(2)));
        // `Bus` bevat een usage die terugverwijst naar de satelliet.
        let bus = ElementDefinition::new(iid(2), "Bus", "bus")
            .with_usage(ElementUsage::new(iid(12), "Battery", "bat", iid(3)))
            .with_usage(ElementUsage::new(iid(13), "Loop", "loop", iid(1)));
        let battery = ElementDefinition::new(iid(3), "Battery", "bat");

        iteration.add_element_definition(top).unwrap();
        iteration.add_element_definition(bus).unwrap();
        iteration.add_element_definition(battery).unwrap();
        iteration.set_top_element(iid(1)).unwrap();

        let names: Vec<&str> = iteration
            .usages()
            .iter()
            .map(|usage| usage.short_name.as_str())
            .collect();
        assert_eq!(names, ["bus", "bat", "loop", "bus2", "bat", "loop"]);
        assert_eq!(iteration.element_usage(iid(12)).unwrap().name, "Battery");
    }

    #[test]
    fn shared_sub_assemblies_appear_under_every_usage() {
        let mut iteration = Iteration::new();
        let top = ElementDefinition::new(iid(1), "Satellite", "sat")
            .with_usage(ElementUsage::new(iid(10), "Panel left", "panelL", iid(2)))
            .with_usage(ElementUsage::new(iid(11), "Panel right", "panelR", iid(2)));
        let panel = ElementDefinition::new(iid(2), "Panel", "panel")
            .with_usage(ElementUsage::new(iid(12), "Hinge", "hinge", iid(3)));
        let hinge = ElementDefinition::new(iid(3), "Hinge", "hinge");

        iteration.add_element_definition(top).unwrap();
        iteration.add_element_definition(panel).unwrap();
        iteration.add_element_definition(hinge).unwrap();
        iteration.set_top_element(iid(1)).unwrap();

        let names: Vec<&str> = iteration
            .usages()
            .iter()
            .map(|usage| usage.short_name.as_str())
            .collect();
        assert_eq!(names, ["panelL", "hinge", "panelR", "hinge"]);
    }

    #[test]
    fn without_top_element_all_direct_usages_are_listed() {
        let mut iteration = Iteration::new();
        iteration
            .add_element_definition(
                ElementDefinition::new(iid(1), "Satellite", "sat")
                    .with_usage(ElementUsage::new(iid(10), "Panel", "panel", iid(2))),
            )
            .unwrap();
        iteration
            .add_element_definition(
                ElementDefinition::new(iid(2), "Panel", "panel")
                    .with_usage(ElementUsage::new(iid(12), "Hinge", "hinge", iid(3))),
            )
            .unwrap();

        let names: Vec<&str> = iteration
            .usages()
            .iter()
            .map(|usage| usage.short_name.as_str())
            .collect();
        assert_eq!(names, ["panel", "hinge"]);
    }

    #[test]
    fn value_set_mut_finds_parameter_value_sets() {
        let mut iteration = Iteration::new();
        let definition = ElementDefinition::new(iid(1), "Box", "box").with_parameter(
            Parameter::new(iid(2), iid(3)).with_value_set(ParameterValueSet::new(iid(4), 1)),
        );
        iteration.add_element_definition(definition).unwrap();

        let value_set = iteration.value_set_mut(iid(4)).unwrap();
        value_set.update(0, "5").unwrap();
        assert!(iteration.value_set_mut(iid(99)).is_none());
    }
}
