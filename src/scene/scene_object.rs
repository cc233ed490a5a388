//! Opbouw van renderbare objecten uit de geresolvede parameters van element
//! usages.

use serde::Serialize;

use super::color::WHITE;
use super::mesh::Mesh;
use super::orientation::Orientation;
use super::primitive::Primitive;
use super::settings::SceneSettings;
use super::values::{parse_color, parse_number, parse_orientation, parse_position, parse_shape_kind};
use crate::model::element::ElementUsage;
use crate::model::resolver::resolve_for_usage;
use crate::model::{Iid, Iteration};

/// Een usage zoals die in de 3D-scene verschijnt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneObject {
    pub element_usage: Iid,
    pub name: String,
    pub short_name: String,
    /// `None` zolang de vormsoort of een van haar afmetingen onbekend is.
    pub primitive: Option<Primitive>,
    pub position: [f64; 3],
    pub orientation: Orientation,
    pub color: [f64; 3],
}

impl SceneObject {
    /// Leest de scene-eigenschappen van `usage` voor de gegeven optie en
    /// toestanden. Wat ontbreekt of niet te resolven is houdt zijn standaardwaarde.
    #[must_use]
    pub fn from_usage(
        iteration: &Iteration,
        usage: &ElementUsage,
        option: Option<Iid>,
        states: &[Iid],
        settings: &SceneSettings,
    ) -> Self {
        let names = &settings.short_names;
        let lookup = |short_name: &str| {
            match resolve_for_usage(iteration, usage, short_name, option, states) {
                Ok(value_set) => value_set.map(|value_set| value_set.actual_value()),
                Err(err) => {
                    log::warn!("{} `{short_name}`: {err}", usage.short_name);
                    None
                }
            }
        };
        let first = |short_name: &str| lookup(short_name).and_then(|values| values.value(0));

        let primitive = first(names.kind.as_str())
            .and_then(parse_shape_kind)
            .and_then(|kind| {
                Primitive::from_dimensions(kind, |dimension| {
                    first(names.dimension(dimension)).and_then(parse_number)
                })
            });

        let position = match lookup(names.position.as_str()) {
            Some(values) => parse_position(values.as_slice()),
            None => parse_position(
                &[names.x.as_str(), names.y.as_str(), names.z.as_str()]
                    .map(|name| first(name).unwrap_or_default()),
            ),
        }
        .unwrap_or_else(|err| {
            log::warn!("{}: positie genegeerd: {err}", usage.short_name);
            [0.0; 3]
        });

        let orientation = lookup(names.orientation.as_str())
            .map(|values| parse_orientation(values.as_slice(), settings.angle_unit))
            .transpose()
            .unwrap_or_else(|err| {
                log::warn!("{}: oriëntatie genegeerd: {err}", usage.short_name);
                None
            })
            .unwrap_or_else(|| Orientation::identity(settings.angle_unit));

        let color = first(names.color.as_str()).map_or(WHITE, parse_color);

        Self {
            element_usage: usage.iid,
            name: usage.name.clone(),
            short_name: usage.short_name.clone(),
            primitive,
            position,
            orientation,
            color,
        }
    }

    /// Getesselleerde primitief, eerst gedraaid en dan verplaatst.
    #[must_use]
    pub fn world_mesh(&self, segments: usize) -> Option<Mesh> {
        let primitive = self.primitive?;
        let [px, py, pz] = self.position;
        Some(primitive.tessellate(segments).map_vertices(|vertex| {
            let [x, y, z] = self.orientation.transform_vector(vertex);
            [x + px, y + py, z + pz]
        }))
    }
}

/// Eén scene object per usage onder het top element. Usages die van `option`
/// zijn uitgesloten of op een verbergmasker passen worden overgeslagen.
#[must_use]
pub fn collect_scene_objects(
    iteration: &Iteration,
    option: Option<Iid>,
    states: &[Iid],
    settings: &SceneSettings,
) -> Vec<SceneObject> {
    let usages: Vec<&ElementUsage> = iteration
        .usages()
        .into_iter()
        .filter(|usage| {
            if option.is_some_and(|option| usage.is_excluded_from(option)) {
                log::debug!("{} uitgesloten van optie", usage.short_name);
                return false;
            }
            if settings.is_hidden(&usage.short_name) {
                log::debug!("{} verborgen door masker", usage.short_name);
                return false;
            }
            true
        })
        .collect();

    build_objects(iteration, &usages, option, states, settings)
}

#[cfg(feature = "parallel")]
fn build_objects(
    iteration: &Iteration,
    usages: &[&ElementUsage],
    option: Option<Iid>,
    states: &[Iid],
    settings: &SceneSettings,
) -> Vec<SceneObject> {
    use rayon::prelude::*;

    usages
        .par_iter()
        .map(|usage| SceneObject::from_usage(iteration, usage, option, states, settings))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn build_objects(
    iteration: &Iteration,
    usages: &[&ElementUsage],
    option: Option<Iid>,
    states: &[Iid],
    settings: &SceneSettings,
) -> Vec<SceneObject> {
    usages
        .iter()
        .map(|usage| SceneObject::from_usage(iteration, usage, option, states, settings))
        .collect()
}
