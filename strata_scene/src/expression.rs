//! Numeric sequence parsing for construction parameters.
//!
//! Pose values in property collections are stored as strings such as
//! `"1 0 0"` or `"1, 0, 0"`. Each token is a float literal, optionally
//! negated, or one of the named constants `pi` and `e`.

use glam::{Quat, Vec3, Vec4};
use crate::error::Result;
use crate::{kernel_bail, kernel_err};

fn parse_token(token: &str) -> Result<f32> {
    let (negative, body) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token),
    };

    let value = match body {
        "pi" => std::f32::consts::PI,
        "e" => std::f32::consts::E,
        _ => body.parse::<f32>().map_err(|_| {
            kernel_err!("strata::expression", Parse, "Invalid numeric token '{}'", token)
        })?,
    };

    if !value.is_finite() {
        kernel_bail!("strata::expression", Parse, "Non-finite numeric token '{}'", token);
    }
    Ok(if negative { -value } else { value })
}

/// Parse exactly `N` numbers from a whitespace/comma separated string.
///
/// Extra tokens are ignored.
///
/// # Errors
///
/// Returns `Parse` if a token is not numeric or fewer than `N` tokens exist.
pub fn parse_sequence<const N: usize>(expr: &str) -> Result<[f32; N]> {
    let mut values = [0.0; N];
    let mut tokens = expr
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty());

    for (index, slot) in values.iter_mut().enumerate() {
        let token = tokens.next().ok_or_else(|| {
            kernel_err!("strata::expression", Parse,
                "Expected {} values in '{}', found {}", N, expr, index)
        })?;
        *slot = parse_token(token)?;
    }

    Ok(values)
}

/// Parse a 3-component vector (`x y z`)
pub fn parse_vec3(expr: &str) -> Result<Vec3> {
    parse_sequence::<3>(expr).map(Vec3::from_array)
}

/// Parse a quaternion written as `w x y z`, normalized
///
/// # Errors
///
/// Returns `Parse` for malformed input or a quaternion that cannot be
/// normalized (zero length, or too large to measure).
pub fn parse_quat(expr: &str) -> Result<Quat> {
    let [w, x, y, z] = parse_sequence::<4>(expr)?;
    match Vec4::new(x, y, z, w).try_normalize() {
        Some(unit) => Ok(Quat::from_vec4(unit)),
        None => Err(kernel_err!("strata::expression", Parse,
            "Orientation '{}' has no direction", expr)),
    }
}

/// Format a vector as `x y z`
pub fn format_vec3(v: Vec3) -> String {
    format!("{} {} {}", v.x, v.y, v.z)
}

/// Format a quaternion as `w x y z`
pub fn format_quat(q: Quat) -> String {
    format!("{} {} {} {}", q.w, q.x, q.y, q.z)
}

#[cfg(test)]
#[path = "expression_tests.rs"]
mod tests;
