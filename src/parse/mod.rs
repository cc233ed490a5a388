//! Invoerformaten die naar een [`crate::model::Iteration`] worden omgezet.

pub mod comet_json;
