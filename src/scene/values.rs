//! Parsers die de tekstueel gecodeerde parameterwaarden omzetten naar
//! scene-waarden.
//!
//! Onleesbare invoer faalt nooit: getallen worden `NaN` (of `None` via
//! [`parse_number`]), posities de nulvector, kleuren wit en onbekende vormen
//! `None`. Alleen een verkeerde reekslengte is een fout.

use super::ValueError;
use super::color::{WHITE, named_color};
use super::orientation::{AngleUnit, MATRIX_LEN, Orientation};
use super::primitive::ShapeKind;
use crate::model::value_array::NO_VALUE;

/// Leest een getal met `.` als decimaalteken. `"-"`, lege, niet-eindige of
/// onleesbare invoer geeft `None`.
#[must_use]
pub fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == NO_VALUE {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|number| number.is_finite())
}

/// Als [`parse_number`], maar met `NaN` als markering voor "niet gezet".
#[must_use]
pub fn parse_double(value: &str) -> f64 {
    parse_number(value).unwrap_or(f64::NAN)
}

/// Leest drie coördinaten. Is er één niet gezet, dan wordt de hele positie
/// de nulvector.
pub fn parse_position<S: AsRef<str>>(values: &[S]) -> Result<[f64; 3], ValueError> {
    let [x, y, z] = values else {
        return Err(ValueError::InvalidLength {
            expected: 3,
            found: values.len(),
        });
    };

    match (
        parse_number(x.as_ref()),
        parse_number(y.as_ref()),
        parse_number(z.as_ref()),
    ) {
        (Some(x), Some(y), Some(z)) => Ok([x, y, z]),
        _ => Ok([0.0; 3]),
    }
}

/// Leest `#RRGGBB`, `#RGB`, `R:G:B` of een kleurnaam als RGB (0-255).
/// Al het andere wordt wit.
#[must_use]
pub fn parse_color(value: &str) -> [f64; 3] {
    let trimmed = value.trim();
    parse_hex_color(trimmed)
        .or_else(|| parse_delimited_color(trimmed))
        .or_else(|| named_color(trimmed))
        .unwrap_or_else(|| {
            log::debug!("onbekende kleur `{trimmed}`, wit wordt gebruikt");
            WHITE
        })
}

fn parse_hex_color(text: &str) -> Option<[f64; 3]> {
    let digits = text.strip_prefix('#')?;
    if !digits.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return None;
    }

    let expanded = match digits.len() {
        3 => {
            let mut result = String::with_capacity(6);
            for ch in digits.chars() {
                result.push(ch);
                result.push(ch);
            }
            result
        }
        6 => digits.to_owned(),
        _ => return None,
    };

    u32::from_str_radix(&expanded, 16).ok().map(|value| {
        let r = f64::from((value >> 16) & 0xFF);
        let g = f64::from((value >> 8) & 0xFF);
        let b = f64::from(value & 0xFF);
        [r, g, b]
    })
}

fn parse_delimited_color(text: &str) -> Option<[f64; 3]> {
    let mut tokens = text.split(':');
    let mut rgb = [0.0; 3];
    for component in &mut rgb {
        let token = tokens.next()?;
        *component = f64::from(token.trim().parse::<u8>().ok()?);
    }
    if tokens.next().is_some() {
        return None;
    }
    Some(rgb)
}

/// Zoekt de vorm op naam; een onbekende naam betekent "nog niet renderbaar".
#[must_use]
pub fn parse_shape_kind(value: &str) -> Option<ShapeKind> {
    let kind = ShapeKind::from_name(value);
    if kind.is_none() && !value.trim().is_empty() && value.trim() != NO_VALUE {
        match ShapeKind::closest_name(value) {
            Some(suggestion) => {
                log::debug!("onbekende vorm `{value}`, bedoelde je `{suggestion}`?");
            }
            None => log::debug!("onbekende vorm `{value}`"),
        }
    }
    kind
}

/// Leest een rotatiematrix van negen waarden. Is er één niet gezet, dan wordt
/// het de identiteit.
pub fn parse_orientation<S: AsRef<str>>(
    values: &[S],
    unit: AngleUnit,
) -> Result<Orientation, ValueError> {
    if values.len() != MATRIX_LEN {
        return Err(ValueError::InvalidLength {
            expected: MATRIX_LEN,
            found: values.len(),
        });
    }

    let matrix: Option<Vec<f64>> = values
        .iter()
        .map(|value| parse_number(value.as_ref()))
        .collect();

    match matrix {
        Some(matrix) => Orientation::from_matrix(&matrix, unit),
        None => Ok(Orientation::identity(unit)),
    }
}
