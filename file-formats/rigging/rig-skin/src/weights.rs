//! Per-vertex joint attachments

/// Maximum attachments kept per vertex
pub const MAX_ATTACHMENTS: usize = 4;

/// One joint influence on a vertex
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attachment {
    /// Index into the skin's bindings (and the skeleton's traversal list)
    pub joint: usize,
    /// Blend weight
    pub weight: f32,
}

/// Up to [`MAX_ATTACHMENTS`] influences on one vertex
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VertexWeights {
    attachments: Vec<Attachment>,
}

impl VertexWeights {
    /// Keep the first four attachments and rescale their weights to sum to 1.
    ///
    /// Attachments past the fourth are dropped before normalising. When the
    /// kept weights sum to zero or less they are left unchanged.
    pub fn from_attachments(attachments: impl IntoIterator<Item = Attachment>) -> Self {
        let mut attachments: Vec<Attachment> =
            attachments.into_iter().take(MAX_ATTACHMENTS).collect();

        let total: f32 = attachments.iter().map(|a| a.weight).sum();
        if total > 0.0 {
            for attachment in &mut attachments {
                attachment.weight /= total;
            }
        }

        Self { attachments }
    }

    /// Kept attachments in file order
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Whether the vertex has no attachments
    pub fn is_empty(&self) -> bool {
        self.attachments.is_empty()
    }

    /// Sum of the kept weights
    pub fn total(&self) -> f32 {
        self.attachments.iter().map(|a| a.weight).sum()
    }
}
