//! Selecteert de value set die hoort bij een optie en een set actual finite
//! states, met voorrang voor overrides op een element usage.

use thiserror::Error;

use super::element::ElementUsage;
use super::parameter::ParameterOrOverride;
use super::value_array::ValueArray;
use super::value_set::{ParameterValueSet, SwitchKind};
use super::{Iid, Iteration};

/// Fouten tijdens het resolven van een value set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("parameter {parameter} is optie-afhankelijk maar er is geen optie opgegeven")]
    MissingOption { parameter: Iid },
    #[error("parameter {parameter} verwijst naar onbekende state list {state_list}")]
    UnknownStateList { parameter: Iid, state_list: Iid },
    #[error("state list {state_list} van parameter {parameter} bevat geen bruikbare toestand")]
    MissingState { parameter: Iid, state_list: Iid },
    #[error("geen value set gevonden voor parameter {parameter}")]
    NoMatchingValueSet { parameter: Iid },
    #[error("meerdere value sets gevonden voor parameter {parameter}")]
    AmbiguousValueSet { parameter: Iid },
    #[error("override {parameter_override} heeft geen value set voor {value_set}")]
    MissingOverrideValueSet {
        parameter_override: Iid,
        value_set: Iid,
    },
}

/// Zoekt de unieke value set voor `option` en `states`.
///
/// Assen waarlangs de parameter niet varieert worden genegeerd. Geeft de
/// aanroeper geen toestand uit de state list van de parameter mee, dan wordt
/// de eerste verplichte toestand van die lijst gebruikt. Voor een override
/// wordt eerst de value set van de basisparameter bepaald en daarna de
/// override-set die daarnaar verwijst.
pub fn resolve<'a>(
    iteration: &Iteration,
    parameter: ParameterOrOverride<'a>,
    option: Option<Iid>,
    states: &[Iid],
) -> Result<&'a ParameterValueSet, ResolveError> {
    let base = parameter.parameter();

    let option_filter = if base.is_option_dependent {
        Some(option.ok_or(ResolveError::MissingOption {
            parameter: base.iid,
        })?)
    } else {
        None
    };

    let state_filter = match base.state_dependence {
        Some(state_list) => {
            let list = iteration
                .state_list(state_list)
                .ok_or(ResolveError::UnknownStateList {
                    parameter: base.iid,
                    state_list,
                })?;
            let state = states
                .iter()
                .copied()
                .find(|state| list.contains(*state))
                .or_else(|| list.default_state().map(|state| state.iid))
                .ok_or(ResolveError::MissingState {
                    parameter: base.iid,
                    state_list,
                })?;
            Some(state)
        }
        None => None,
    };

    let mut matches = base.value_sets.iter().filter(|value_set| {
        option_filter.is_none_or(|option| value_set.actual_option == Some(option))
            && state_filter.is_none_or(|state| value_set.actual_state == Some(state))
    });

    let base_set = matches.next().ok_or(ResolveError::NoMatchingValueSet {
        parameter: base.iid,
    })?;
    if matches.next().is_some() {
        return Err(ResolveError::AmbiguousValueSet {
            parameter: base.iid,
        });
    }

    if !parameter.is_override() {
        return Ok(base_set);
    }
    parameter
        .value_sets()
        .iter()
        .find(|value_set| value_set.parameter_value_set == Some(base_set.iid))
        .ok_or(ResolveError::MissingOverrideValueSet {
            parameter_override: parameter.iid(),
            value_set: base_set.iid,
        })
}

/// De parameter van `parameter_type` zoals die voor `usage` geldt: de
/// override wanneer de usage de parameter overschrijft, anders de parameter
/// van de element definition.
#[must_use]
pub fn parameter_for_usage<'a>(
    iteration: &'a Iteration,
    usage: &'a ElementUsage,
    parameter_type: Iid,
) -> Option<ParameterOrOverride<'a>> {
    let definition = iteration.element_definition_by_usage(usage)?;
    let parameter = definition.parameter_of_type(parameter_type)?;

    Some(match usage.override_of(parameter.iid) {
        Some(value) => ParameterOrOverride::Override { value, parameter },
        None => ParameterOrOverride::Parameter(parameter),
    })
}

/// Resolvet de value set van de parameter met short name `short_name` voor
/// een usage. `Ok(None)` betekent dat de usage zo'n parameter niet heeft.
pub fn resolve_for_usage<'a>(
    iteration: &'a Iteration,
    usage: &'a ElementUsage,
    short_name: &str,
    option: Option<Iid>,
    states: &[Iid],
) -> Result<Option<&'a ParameterValueSet>, ResolveError> {
    let Some(parameter_type) = iteration.parameter_type_by_short_name(short_name) else {
        return Ok(None);
    };
    let Some(parameter) = parameter_for_usage(iteration, usage, parameter_type.iid) else {
        return Ok(None);
    };
    resolve(iteration, parameter, option, states).map(Some)
}

/// Manual, Reference of Computed, afhankelijk van `switch`.
#[must_use]
pub fn select_active(value_set: &ParameterValueSet, switch: SwitchKind) -> &ValueArray {
    value_set.select_active(switch)
}
