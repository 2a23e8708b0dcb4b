//! Error type for mesh construction.

/// Reasons a mesh cannot be (re)built for a viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshError {
    /// Viewport has zero width or height (window not sized yet).
    EmptyViewport { width: u32, height: u32 },
    /// Lattice narrower or shorter than two nodes.
    GridTooSmall { width: usize, height: usize },
    /// Node count would overflow the 16-bit index format.
    TooManyNodes { width: usize, height: usize },
}

impl std::fmt::Display for MeshError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeshError::EmptyViewport { width, height } => {
                write!(f, "Viewport {}x{} has no area", width, height)
            }
            MeshError::GridTooSmall { width, height } => {
                write!(f, "Grid {}x{} needs at least 2 nodes per side", width, height)
            }
            MeshError::TooManyNodes { width, height } => write!(
                f,
                "Grid {}x{} has {} nodes, more than a u16 index buffer can address",
                width,
                height,
                width * height
            ),
        }
    }
}

impl std::error::Error for MeshError {}
