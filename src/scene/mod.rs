//! Scene-laag: maakt van geresolvede parameterwaarden geplaatste, gedraaide
//! en gekleurde vormen.

pub mod color;
pub mod mesh;
pub mod orientation;
pub mod primitive;
pub mod scene_object;
pub mod settings;
pub mod values;

use thiserror::Error;

pub use orientation::{AngleUnit, Orientation};
pub use primitive::{Primitive, ShapeKind};
pub use scene_object::{SceneObject, collect_scene_objects};
pub use settings::SceneSettings;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("verwacht {expected} waarden, kreeg {found}")]
    InvalidLength { expected: usize, found: usize },
    #[error("matrix bevat een niet-eindige waarde")]
    NonFinite,
}
