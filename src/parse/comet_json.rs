//! Parser voor de platte JSON-lijst van things die de COMET REST API levert.

use std::collections::HashMap;

use serde::de::{self, IgnoredAny};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::model::element::{
    ActualFiniteState, ActualFiniteStateKind, ActualFiniteStateList, ElementDefinition,
    ElementUsage, ModelOption,
};
use crate::model::parameter::{Parameter, ParameterOverride, ParameterType};
use crate::model::value_array::ValueArray;
use crate::model::value_set::{ParameterValueSet, SwitchKind};
use crate::model::{Iid, Iteration, ModelError};

/// Result type voor het parsen van COMET JSON.
pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Debug, Error)]
pub enum ParseError {
    /// Het document is geen geldige lijst van things.
    #[error("JSON parsefout: {0}")]
    Json(#[from] serde_json::Error),
    /// Een thing verwijst naar een iid die niet (of al eerder) is gebruikt.
    #[error("ongeldige verwijzing: {0}")]
    Reference(String),
    #[error("ongeldig model: {0}")]
    Model(String),
    /// Een waardereeks past niet bij het aantal waarden van het parametertype.
    #[error("value set {value_set}: verwachtte {expected} waarden maar kreeg {found}")]
    ValueCount {
        value_set: Iid,
        expected: usize,
        found: usize,
    },
}

impl From<ModelError> for ParseError {
    fn from(err: ModelError) -> Self {
        Self::Model(err.to_string())
    }
}

/// Leest een COMET JSON-document en bouwt er een [`Iteration`] van.
pub fn parse_str(input: &str) -> ParseResult<Iteration> {
    log::debug!("Start parsing COMET JSON");
    let things: Vec<Thing> = serde_json::from_str(input)?;
    log::debug!("Found {} things", things.len());

    let mut document = Document::default();
    for thing in things {
        document.insert(thing);
    }
    document.build()
}

#[derive(Debug, Deserialize)]
#[serde(tag = "classKind")]
enum Thing {
    Iteration(IterationDto),
    #[serde(rename = "Option")]
    ModelOption(OptionDto),
    ActualFiniteStateList(StateListDto),
    ActualFiniteState(StateDto),
    #[serde(
        alias = "SimpleQuantityKind",
        alias = "DerivedQuantityKind",
        alias = "SpecializedQuantityKind",
        alias = "TextParameterType",
        alias = "BooleanParameterType",
        alias = "EnumerationParameterType",
        alias = "DateParameterType",
        alias = "DateTimeParameterType",
        alias = "TimeOfDayParameterType",
        alias = "CompoundParameterType",
        alias = "ArrayParameterType",
        alias = "SampledFunctionParameterType"
    )]
    ParameterType(ParameterTypeDto),
    ElementDefinition(DefinitionDto),
    ElementUsage(UsageDto),
    Parameter(ParameterDto),
    ParameterOverride(OverrideDto),
    ParameterValueSet(ValueSetDto),
    ParameterOverrideValueSet(ValueSetDto),
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IterationDto {
    #[serde(default)]
    top_element: Option<Iid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OptionDto {
    iid: Iid,
    #[serde(default)]
    name: String,
    #[serde(default)]
    short_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StateListDto {
    iid: Iid,
    #[serde(default)]
    name: String,
    #[serde(default)]
    actual_state: Vec<Iid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StateDto {
    iid: Iid,
    #[serde(default)]
    name: String,
    #[serde(default)]
    kind: ActualFiniteStateKind,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ParameterTypeDto {
    iid: Iid,
    #[serde(default)]
    name: String,
    #[serde(default)]
    short_name: String,
    /// Componenten van samengestelde types; alleen het aantal telt.
    #[serde(default)]
    component: Vec<IgnoredAny>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DefinitionDto {
    iid: Iid,
    #[serde(default)]
    name: String,
    #[serde(default)]
    short_name: String,
    #[serde(default)]
    parameter: Vec<Iid>,
    #[serde(default)]
    contained_element: Vec<Iid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageDto {
    iid: Iid,
    #[serde(default)]
    name: String,
    #[serde(default)]
    short_name: String,
    element_definition: Iid,
    #[serde(default)]
    parameter_override: Vec<Iid>,
    #[serde(default)]
    exclude_option: Vec<Iid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ParameterDto {
    iid: Iid,
    parameter_type: Iid,
    #[serde(default)]
    is_option_dependent: bool,
    #[serde(default)]
    state_dependence: Option<Iid>,
    #[serde(default)]
    value_set: Vec<Iid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OverrideDto {
    iid: Iid,
    parameter: Iid,
    #[serde(default)]
    value_set: Vec<Iid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValueSetDto {
    iid: Iid,
    #[serde(default)]
    actual_option: Option<Iid>,
    #[serde(default)]
    actual_state: Option<Iid>,
    #[serde(default)]
    parameter_value_set: Option<Iid>,
    #[serde(default, deserialize_with = "present_value_array")]
    manual: Option<ValueArray>,
    #[serde(default, deserialize_with = "present_value_array")]
    computed: Option<ValueArray>,
    #[serde(default, deserialize_with = "present_value_array")]
    reference: Option<ValueArray>,
    #[serde(default, deserialize_with = "present_value_array")]
    published: Option<ValueArray>,
    #[serde(default)]
    value_switch: SwitchKind,
}

impl ValueSetDto {
    /// Bouwt een value set met `len` waarden per reeks. Ontbrekende reeksen
    /// worden met `"-"` gevuld; een aanwezige reeks van een andere lengte is
    /// een fout.
    fn into_value_set(self, len: usize) -> ParseResult<ParameterValueSet> {
        let iid = self.iid;
        let mut value_set = ParameterValueSet::new(iid, len);
        for (target, array) in [
            (&mut value_set.manual, self.manual),
            (&mut value_set.computed, self.computed),
            (&mut value_set.reference, self.reference),
            (&mut value_set.published, self.published),
        ] {
            let Some(array) = array else { continue };
            if array.len() != len {
                return Err(ParseError::ValueCount {
                    value_set: iid,
                    expected: len,
                    found: array.len(),
                });
            }
            *target = array;
        }
        value_set.actual_option = self.actual_option;
        value_set.actual_state = self.actual_state;
        value_set.parameter_value_set = self.parameter_value_set;
        value_set.value_switch = self.value_switch;
        Ok(value_set)
    }
}

/// Basis-set zoals een override-set die ziet: optie, toestand en lengte.
#[derive(Debug, Clone, Copy)]
struct BaseSet {
    actual_option: Option<Iid>,
    actual_state: Option<Iid>,
    len: usize,
}

fn present_value_array<'de, D>(deserializer: D) -> Result<Option<ValueArray>, D::Error>
where
    D: Deserializer<'de>,
{
    value_array(deserializer).map(Some)
}

/// COMET levert waardereeksen als JSON-array of als string met daarin een
/// JSON-array (`"[\"1\",\"-\"]"`).
fn value_array<'de, D>(deserializer: D) -> Result<ValueArray, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Encoded {
        List(Vec<String>),
        Text(String),
    }

    match Encoded::deserialize(deserializer)? {
        Encoded::List(values) => Ok(ValueArray::from_values(values)),
        Encoded::Text(text) => serde_json::from_str::<Vec<String>>(&text)
            .map(ValueArray::from_values)
            .map_err(|err| de::Error::custom(format!("ongeldige waardereeks `{text}`: {err}"))),
    }
}

#[derive(Debug, Default)]
struct Document {
    top_element: Option<Iid>,
    options: Vec<OptionDto>,
    state_lists: Vec<StateListDto>,
    states: HashMap<Iid, StateDto>,
    parameter_types: Vec<ParameterTypeDto>,
    definitions: Vec<DefinitionDto>,
    usages: HashMap<Iid, UsageDto>,
    parameters: HashMap<Iid, ParameterDto>,
    overrides: HashMap<Iid, OverrideDto>,
    value_sets: HashMap<Iid, ValueSetDto>,
    override_value_sets: HashMap<Iid, ValueSetDto>,
}

impl Document {
    fn insert(&mut self, thing: Thing) {
        match thing {
            Thing::Iteration(iteration) => {
                if iteration.top_element.is_some() {
                    self.top_element = iteration.top_element;
                }
            }
            Thing::ModelOption(option) => self.options.push(option),
            Thing::ActualFiniteStateList(list) => self.state_lists.push(list),
            Thing::ActualFiniteState(state) => {
                self.states.insert(state.iid, state);
            }
            Thing::ParameterType(parameter_type) => self.parameter_types.push(parameter_type),
            Thing::ElementDefinition(definition) => self.definitions.push(definition),
            Thing::ElementUsage(usage) => {
                self.usages.insert(usage.iid, usage);
            }
            Thing::Parameter(parameter) => {
                self.parameters.insert(parameter.iid, parameter);
            }
            Thing::ParameterOverride(entry) => {
                self.overrides.insert(entry.iid, entry);
            }
            Thing::ParameterValueSet(value_set) => {
                self.value_sets.insert(value_set.iid, value_set);
            }
            Thing::ParameterOverrideValueSet(value_set) => {
                self.override_value_sets.insert(value_set.iid, value_set);
            }
            Thing::Unknown => {}
        }
    }

    fn build(mut self) -> ParseResult<Iteration> {
        let mut iteration = Iteration::new();

        for option in std::mem::take(&mut self.options) {
            iteration.add_option(ModelOption::new(option.iid, option.name, option.short_name))?;
        }

        for list in std::mem::take(&mut self.state_lists) {
            let mut state_list = ActualFiniteStateList::new(list.iid, list.name);
            for iid in list.actual_state {
                let state = take(&mut self.states, iid, "ActualFiniteState", list.iid)?;
                let mut actual_state = ActualFiniteState::new(state.iid, state.name);
                actual_state.kind = state.kind;
                state_list = state_list.with_state(actual_state);
            }
            iteration.add_state_list(state_list)?;
        }

        for parameter_type in std::mem::take(&mut self.parameter_types) {
            iteration.add_parameter_type(
                ParameterType::new(parameter_type.iid, parameter_type.name, parameter_type.short_name)
                    .with_number_of_values(parameter_type.component.len()),
            )?;
        }

        // Override-sets nemen optie, toestand en lengte over van hun basis-set.
        let mut lengths: HashMap<Iid, usize> = HashMap::new();
        for parameter in self.parameters.values() {
            if let Some(parameter_type) = iteration.parameter_type(parameter.parameter_type) {
                for value_set in &parameter.value_set {
                    lengths.insert(*value_set, parameter_type.number_of_values);
                }
            }
        }
        let axes: HashMap<Iid, BaseSet> = self
            .value_sets
            .values()
            .filter_map(|value_set| {
                let len = *lengths.get(&value_set.iid)?;
                Some((
                    value_set.iid,
                    BaseSet {
                        actual_option: value_set.actual_option,
                        actual_state: value_set.actual_state,
                        len,
                    },
                ))
            })
            .collect();

        let definitions = std::mem::take(&mut self.definitions);
        let known_definitions: Vec<Iid> = definitions.iter().map(|definition| definition.iid).collect();

        for dto in definitions {
            let mut definition = ElementDefinition::new(dto.iid, dto.name, dto.short_name);
            for iid in dto.parameter {
                definition = definition.with_parameter(self.build_parameter(iid, dto.iid, &iteration)?);
            }
            for iid in dto.contained_element {
                let usage = self.build_usage(iid, dto.iid, &axes, &known_definitions)?;
                definition = definition.with_usage(usage);
            }
            iteration.add_element_definition(definition)?;
        }

        if let Some(top) = self.top_element {
            iteration.set_top_element(top)?;
        }

        log::debug!(
            "Iteration gebouwd: {} opties, {} element definitions",
            iteration.options().len(),
            iteration.element_definitions().len()
        );
        Ok(iteration)
    }

    fn build_parameter(
        &mut self,
        iid: Iid,
        owner: Iid,
        iteration: &Iteration,
    ) -> ParseResult<Parameter> {
        let dto = take(&mut self.parameters, iid, "Parameter", owner)?;
        let len = iteration
            .parameter_type(dto.parameter_type)
            .map(|parameter_type| parameter_type.number_of_values)
            .ok_or_else(|| dangling("ParameterType", dto.parameter_type, dto.iid))?;
        if let Some(state_list) = dto.state_dependence {
            if iteration.state_list(state_list).is_none() {
                return Err(dangling("ActualFiniteStateList", state_list, dto.iid));
            }
        }

        let mut parameter = Parameter::new(dto.iid, dto.parameter_type);
        parameter.is_option_dependent = dto.is_option_dependent;
        parameter.state_dependence = dto.state_dependence;
        for value_set in dto.value_set {
            let value_set = take(&mut self.value_sets, value_set, "ParameterValueSet", dto.iid)?;
            parameter = parameter.with_value_set(value_set.into_value_set(len)?);
        }
        Ok(parameter)
    }

    fn build_usage(
        &mut self,
        iid: Iid,
        owner: Iid,
        axes: &HashMap<Iid, BaseSet>,
        known_definitions: &[Iid],
    ) -> ParseResult<ElementUsage> {
        let dto = take(&mut self.usages, iid, "ElementUsage", owner)?;
        if !known_definitions.contains(&dto.element_definition) {
            return Err(dangling("ElementDefinition", dto.element_definition, dto.iid));
        }

        let mut usage = ElementUsage::new(dto.iid, dto.name, dto.short_name, dto.element_definition);
        for option in dto.exclude_option {
            usage = usage.excluding(option);
        }

        for entry in dto.parameter_override {
            let entry = take(&mut self.overrides, entry, "ParameterOverride", dto.iid)?;
            let mut parameter_override = ParameterOverride::new(entry.iid, entry.parameter);
            for value_set in entry.value_set {
                let value_set = take(
                    &mut self.override_value_sets,
                    value_set,
                    "ParameterOverrideValueSet",
                    entry.iid,
                )?;
                let base = value_set.parameter_value_set.ok_or_else(|| {
                    ParseError::Reference(format!(
                        "ParameterOverrideValueSet {} mist parameterValueSet",
                        value_set.iid
                    ))
                })?;
                let base = axes
                    .get(&base)
                    .copied()
                    .ok_or_else(|| dangling("ParameterValueSet", base, value_set.iid))?;

                let mut value_set = value_set.into_value_set(base.len)?;
                value_set.actual_option = base.actual_option;
                value_set.actual_state = base.actual_state;
                parameter_override = parameter_override.with_value_set(value_set);
            }
            usage = usage.with_override(parameter_override);
        }
        Ok(usage)
    }
}

fn take<T>(things: &mut HashMap<Iid, T>, iid: Iid, kind: &str, owner: Iid) -> ParseResult<T> {
    things.remove(&iid).ok_or_else(|| dangling(kind, iid, owner))
}

fn dangling(kind: &str, iid: Iid, owner: Iid) -> ParseError {
    ParseError::Reference(format!("{kind} {iid} (vanuit {owner}) ontbreekt of is al gebruikt"))
}
