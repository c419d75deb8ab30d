//! `.skin` text parser
//!
//! A skin file is a sequence of counted sections:
//!
//! ```text
//! positions 2 { 0 0 0  1 0 0 }
//! normals 2 { 0 1 0  0 1 0 }
//! skinweights 2 {
//!     1 0 1.0
//!     2 0 0.5 1 0.5
//! }
//! triangles 0 { }
//! bindings 1 {
//!     matrix { 1 0 0  0 1 0  0 0 1  0 0 0 }
//! }
//! ```

use crate::error::{Result, SkinError};
use crate::skin::{Skin, bind_matrix_from_rows};
use crate::weights::{Attachment, VertexWeights};
use glam::{Mat4, Vec3};
use rig_utils::Tokenizer;

#[derive(Default)]
struct Sections {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    weights: Vec<VertexWeights>,
    indices: Vec<u32>,
    bindings: Vec<Mat4>,
}

/// Parse a complete skin; sections may appear in any order
pub fn parse_skin(text: &str) -> Result<Skin> {
    let mut tokenizer = Tokenizer::new(text);
    let mut sections = Sections::default();

    while let Some(keyword) = tokenizer.next_token() {
        match keyword {
            "positions" => sections.positions = read_vectors(&mut tokenizer)?,
            "normals" => sections.normals = read_vectors(&mut tokenizer)?,
            "skinweights" => sections.weights = read_weights(&mut tokenizer)?,
            "triangles" => sections.indices = read_triangles(&mut tokenizer)?,
            "bindings" => sections.bindings = read_bindings(&mut tokenizer)?,
            other => {
                return Err(SkinError::UnexpectedSection {
                    section: other.to_string(),
                    line: tokenizer.line(),
                });
            }
        }
    }

    let Sections {
        positions,
        normals,
        weights,
        indices,
        bindings,
    } = sections;

    let vertices = positions.len();
    if weights.len() > vertices {
        return Err(SkinError::TooManyWeights {
            found: weights.len(),
            vertices,
        });
    }
    if weights.len() < vertices {
        log::warn!(
            "skinweights covers {} of {} vertices, the rest are unweighted",
            weights.len(),
            vertices
        );
    }
    if normals.len() != vertices {
        log::warn!("Skin has {} normals for {} vertices", normals.len(), vertices);
    }

    let skin = Skin::new(positions, normals, weights, indices, bindings);
    log::debug!(
        "Parsed skin with {} vertices and {} bindings",
        skin.vertex_count(),
        skin.bindings().len()
    );
    Ok(skin)
}

/// `N { x y z ... }`
fn read_vectors(tokenizer: &mut Tokenizer<'_>) -> Result<Vec<Vec3>> {
    let count = tokenizer.read_usize()?;
    tokenizer.expect("{")?;
    let vectors = (0..count)
        .map(|_| Ok(Vec3::from_array(tokenizer.read_f32s::<3>()?)))
        .collect::<Result<Vec<_>>>()?;
    tokenizer.expect("}")?;
    Ok(vectors)
}

/// `N { attachCount (joint weight)* ... }`
fn read_weights(tokenizer: &mut Tokenizer<'_>) -> Result<Vec<VertexWeights>> {
    let count = tokenizer.read_usize()?;
    tokenizer.expect("{")?;
    let mut weights = Vec::new();
    for _ in 0..count {
        let attachments = tokenizer.read_usize()?;
        let mut raw = Vec::new();
        for _ in 0..attachments {
            let joint = tokenizer.read_usize()?;
            let weight = tokenizer.read_f32()?;
            raw.push(Attachment { joint, weight });
        }
        weights.push(VertexWeights::from_attachments(raw));
    }
    tokenizer.expect("}")?;
    Ok(weights)
}

/// `N { i0 i1 i2 ... }`
fn read_triangles(tokenizer: &mut Tokenizer<'_>) -> Result<Vec<u32>> {
    let count = tokenizer.read_usize()?;
    tokenizer.expect("{")?;
    let index_count = count.checked_mul(3).ok_or_else(|| {
        SkinError::Validation(format!(
            "triangle count {} at line {} is too large",
            count,
            tokenizer.line()
        ))
    })?;
    let mut indices = Vec::new();
    for _ in 0..index_count {
        let index = tokenizer.read_usize()?;
        indices.push(u32::try_from(index).map_err(|_| {
            SkinError::Validation(format!(
                "vertex index {} at line {} does not fit in 32 bits",
                index,
                tokenizer.line()
            ))
        })?);
    }
    tokenizer.expect("}")?;
    Ok(indices)
}

/// `N { matrix { 12 floats } ... }`
fn read_bindings(tokenizer: &mut Tokenizer<'_>) -> Result<Vec<Mat4>> {
    let count = tokenizer.read_usize()?;
    tokenizer.expect("{")?;
    let mut bindings = Vec::new();
    for _ in 0..count {
        tokenizer.expect("matrix")?;
        tokenizer.expect("{")?;
        bindings.push(bind_matrix_from_rows(tokenizer.read_f32s::<12>()?));
        tokenizer.expect("}")?;
    }
    tokenizer.expect("}")?;
    Ok(bindings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rig_utils::TokenError;

    #[test]
    fn test_sections_in_any_order() {
        let skin = parse_skin(
            "bindings 1 { matrix { 1 0 0 0 1 0 0 0 1 0 2 0 } }
             triangles 1 { 0 1 2 }
             positions 3 { 0 0 0 1 0 0 0 1 0 }
             normals 3 { 0 0 1 0 0 1 0 0 1 }
             skinweights 3 { 1 0 1  1 0 1  1 0 1 }",
        )
        .unwrap();
        assert_eq!(skin.vertex_count(), 3);
        assert_eq!(skin.triangle_count(), 1);
        assert_eq!(skin.bindings()[0], Mat4::from_translation(Vec3::new(0.0, 2.0, 0.0)));
        assert_eq!(
            skin.inverse_bindings()[0],
            Mat4::from_translation(Vec3::new(0.0, -2.0, 0.0))
        );
    }

    #[test]
    fn test_weights_are_truncated_and_normalised() {
        let skin = parse_skin(
            "positions 1 { 0 0 0 }
             skinweights 1 { 5  0 1  1 1  2 1  3 1  4 6 }",
        )
        .unwrap();
        let attachments = skin.weights()[0].attachments();
        assert_eq!(attachments.len(), 4);
        assert_eq!(attachments[3].joint, 3);
        assert_eq!(attachments[3].weight, 0.25);
    }

    #[test]
    fn test_short_weights_are_padded() {
        let skin = parse_skin("positions 2 { 0 0 0 1 1 1 } skinweights 1 { 1 0 1 }").unwrap();
        assert_eq!(skin.weights().len(), 2);
        assert!(skin.weights()[1].is_empty());
    }

    #[test]
    fn test_too_many_weights() {
        let err = parse_skin("positions 1 { 0 0 0 } skinweights 2 { 1 0 1 1 0 1 }").unwrap_err();
        assert!(matches!(
            err,
            SkinError::TooManyWeights {
                found: 2,
                vertices: 1
            }
        ));
    }

    #[test]
    fn test_unknown_section() {
        let err = parse_skin("positions 0 { }\ncolors 1 { 1 1 1 }").unwrap_err();
        assert!(matches!(
            err,
            SkinError::UnexpectedSection { ref section, line: 2 } if section == "colors"
        ));
    }

    #[test]
    fn test_huge_counts_are_errors() {
        let err = parse_skin("triangles 18446744073709551615 { 0 1 2 }").unwrap_err();
        assert!(matches!(err, SkinError::Validation(ref msg) if msg.contains("too large")));

        for text in [
            "positions 1000000000000000000 { 0 0 0 }",
            "skinweights 1000000000000000000 { 1 0 1 }",
            "skinweights 1 { 1000000000000000000 0 1 }",
            "triangles 1000000000000000000 { 0 1 2 }",
            "bindings 1000000000000000000 { }",
        ] {
            assert!(
                matches!(parse_skin(text), Err(SkinError::Token(_))),
                "{text}"
            );
        }
    }

    #[test]
    fn test_malformed_matrix() {
        let err = parse_skin("bindings 1 { mat { } }").unwrap_err();
        assert!(matches!(
            err,
            SkinError::Token(TokenError::UnexpectedToken { .. })
        ));
    }
}
