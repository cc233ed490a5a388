//! Vormprimitieven en de afmetingen die elk nodig heeft voordat ze gebouwd kan worden.

use core::fmt;

use phf::phf_map;
use serde::Serialize;

/// Ondersteunde vormsoorten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ShapeKind {
    Cube,
    Sphere,
    Cylinder,
    Cone,
    Torus,
    Disc,
    Triangle,
    Rectangle,
    HexagonalPrism,
    TriangularPrism,
}

static SHAPE_KINDS: phf::Map<&'static str, ShapeKind> = phf_map! {
    "box" => ShapeKind::Cube,
    "cube" => ShapeKind::Cube,
    "sphere" => ShapeKind::Sphere,
    "cylinder" => ShapeKind::Cylinder,
    "cone" => ShapeKind::Cone,
    "torus" => ShapeKind::Torus,
    "disc" => ShapeKind::Disc,
    "triangle" => ShapeKind::Triangle,
    "rectangle" => ShapeKind::Rectangle,
    "hexagonalprism" => ShapeKind::HexagonalPrism,
    "triangularprism" => ShapeKind::TriangularPrism,
};

/// Suggesties op grotere afstand worden niet gelogd.
const MAX_SUGGESTION_DISTANCE: usize = 3;

impl ShapeKind {
    /// Zoekt een vorm op naam, ongeacht hoofdletters, spaties en
    /// underscores, zodat ook [`ShapeKind::name`] terug te lezen is.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        SHAPE_KINDS.get(normalize_shape_name(name).as_str()).copied()
    }

    /// De bekende vormnaam die het dichtst bij `name` ligt, als die dichtbij genoeg is.
    #[must_use]
    pub fn closest_name(name: &str) -> Option<&'static str> {
        let needle = normalize_shape_name(name);
        SHAPE_KINDS
            .keys()
            .map(|candidate| (levenshtein::levenshtein(&needle, candidate), *candidate))
            .filter(|(distance, _)| *distance <= MAX_SUGGESTION_DISTANCE)
            .min()
            .map(|(_, candidate)| candidate)
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Cube => "Cube",
            Self::Sphere => "Sphere",
            Self::Cylinder => "Cylinder",
            Self::Cone => "Cone",
            Self::Torus => "Torus",
            Self::Disc => "Disc",
            Self::Triangle => "Triangle",
            Self::Rectangle => "Rectangle",
            Self::HexagonalPrism => "Hexagonal Prism",
            Self::TriangularPrism => "Triangular Prism",
        }
    }

    /// Afmetingen die gezet moeten zijn voordat de vorm gebouwd kan worden.
    #[must_use]
    pub fn required_dimensions(self) -> &'static [Dimension] {
        match self {
            Self::Cube => &[Dimension::Width, Dimension::Height, Dimension::Length],
            Self::Sphere | Self::Disc => &[Dimension::Diameter],
            Self::Cylinder | Self::Cone | Self::HexagonalPrism | Self::TriangularPrism => {
                &[Dimension::Diameter, Dimension::Height]
            }
            Self::Torus => &[Dimension::Diameter, Dimension::Thickness],
            Self::Triangle => &[Dimension::Length, Dimension::Height],
            Self::Rectangle => &[Dimension::Width, Dimension::Height],
        }
    }
}

fn normalize_shape_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Benoemde maat van een primitief.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Width,
    Height,
    Length,
    Diameter,
    Thickness,
}

/// Een volledig bemaatte vorm. Kubussen en prisma's liggen gecentreerd op de
/// oorsprong met hun hoogte langs Y; platte vormen liggen in het XY-vlak,
/// behalve schijf en torus, die in het XZ-vlak liggen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Primitive {
    Cube { width: f64, height: f64, length: f64 },
    Sphere { diameter: f64 },
    Cylinder { diameter: f64, height: f64 },
    Cone { diameter: f64, height: f64 },
    Torus { diameter: f64, thickness: f64 },
    Disc { diameter: f64 },
    Triangle { length: f64, height: f64 },
    Rectangle { width: f64, height: f64 },
    HexagonalPrism { diameter: f64, height: f64 },
    TriangularPrism { diameter: f64, height: f64 },
}

impl Primitive {
    /// Bouwt `kind` uit de afmetingen die `lookup` levert. Geeft `None` zolang
    /// een vereiste afmeting ontbreekt of niet strikt positief is.
    pub fn from_dimensions<F>(kind: ShapeKind, lookup: F) -> Option<Self>
    where
        F: Fn(Dimension) -> Option<f64>,
    {
        let get = |dimension| lookup(dimension).filter(|value| value.is_finite() && *value > 0.0);

        let primitive = match kind {
            ShapeKind::Cube => Self::Cube {
                width: get(Dimension::Width)?,
                height: get(Dimension::Height)?,
                length: get(Dimension::Length)?,
            },
            ShapeKind::Sphere => Self::Sphere {
                diameter: get(Dimension::Diameter)?,
            },
            ShapeKind::Cylinder => Self::Cylinder {
                diameter: get(Dimension::Diameter)?,
                height: get(Dimension::Height)?,
            },
            ShapeKind::Cone => Self::Cone {
                diameter: get(Dimension::Diameter)?,
                height: get(Dimension::Height)?,
            },
            ShapeKind::Torus => Self::Torus {
                diameter: get(Dimension::Diameter)?,
                thickness: get(Dimension::Thickness)?,
            },
            ShapeKind::Disc => Self::Disc {
                diameter: get(Dimension::Diameter)?,
            },
            ShapeKind::Triangle => Self::Triangle {
                length: get(Dimension::Length)?,
                height: get(Dimension::Height)?,
            },
            ShapeKind::Rectangle => Self::Rectangle {
                width: get(Dimension::Width)?,
                height: get(Dimension::Height)?,
            },
            ShapeKind::HexagonalPrism => Self::HexagonalPrism {
                diameter: get(Dimension::Diameter)?,
                height: get(Dimension::Height)?,
            },
            ShapeKind::TriangularPrism => Self::TriangularPrism {
                diameter: get(Dimension::Diameter)?,
                height: get(Dimension::Height)?,
            },
        };
        Some(primitive)
    }

    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Cube { .. } => ShapeKind::Cube,
            Self::Sphere { .. } => ShapeKind::Sphere,
            Self::Cylinder { .. } => ShapeKind::Cylinder,
            Self::Cone { .. } => ShapeKind::Cone,
            Self::Torus { .. } => ShapeKind::Torus,
            Self::Disc { .. } => ShapeKind::Disc,
            Self::Triangle { .. } => ShapeKind::Triangle,
            Self::Rectangle { .. } => ShapeKind::Rectangle,
            Self::HexagonalPrism { .. } => ShapeKind::HexagonalPrism,
            Self::TriangularPrism { .. } => ShapeKind::TriangularPrism,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_dimensions(value: f64) -> impl Fn(Dimension) -> Option<f64> {
        move |_| Some(value)
    }

    #[test]
    fn box_and_cube_map_to_the_same_kind() {
        assert_eq!(ShapeKind::from_name("BOX"), Some(ShapeKind::Cube));
        assert_eq!(ShapeKind::from_name("cube"), Some(ShapeKind::Cube));
        assert_eq!(ShapeKind::from_name("pyramid"), None);
    }

    #[test]
    fn display_names_parse_back() {
        for kind in SHAPE_KINDS.values() {
            assert_eq!(ShapeKind::from_name(kind.name()), Some(*kind));
        }
        assert_eq!(
            ShapeKind::from_name("hexagonal_prism"),
            Some(ShapeKind::HexagonalPrism)
        );
        assert_eq!(
            ShapeKind::from_name(" Triangular Prism "),
            Some(ShapeKind::TriangularPrism)
        );
    }

    #[test]
    fn closest_name_suggests_near_misses_only() {
        assert_eq!(ShapeKind::closest_name("spere"), Some("sphere"));
        assert_eq!(ShapeKind::closest_name("Cilinder"), Some("cylinder"));
        assert_eq!(ShapeKind::closest_name("icosahedron"), None);
    }

    #[test]
    fn every_kind_builds_with_all_dimensions_set() {
        for kind in SHAPE_KINDS.values() {
            let primitive = Primitive::from_dimensions(*kind, all_dimensions(2.0)).unwrap();
            assert_eq!(primitive.kind(), *kind);
        }
    }

    #[test]
    fn missing_dimension_means_not_renderable() {
        let lookup = |dimension| match dimension {
            Dimension::Width | Dimension::Height => Some(1.0),
            _ => None,
        };
        assert_eq!(Primitive::from_dimensions(ShapeKind::Cube, lookup), None);
        assert_eq!(
            Primitive::from_dimensions(ShapeKind::Rectangle, lookup),
            Some(Primitive::Rectangle {
                width: 1.0,
                height: 1.0
            })
        );
    }

    #[test]
    fn non_positive_dimensions_are_rejected() {
        assert_eq!(
            Primitive::from_dimensions(ShapeKind::Sphere, all_dimensions(0.0)),
            None
        );
        assert_eq!(
            Primitive::from_dimensions(ShapeKind::Sphere, all_dimensions(-1.0)),
            None
        );
    }

    #[test]
    fn required_dimensions_match_constructed_fields() {
        assert_eq!(
            ShapeKind::Torus.required_dimensions(),
            &[Dimension::Diameter, Dimension::Thickness]
        );
        assert_eq!(ShapeKind::Sphere.required_dimensions(), &[Dimension::Diameter]);
    }
}
