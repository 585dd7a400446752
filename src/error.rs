use thiserror::Error;

/// Errors that can occur while converting a shape tree.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ConvertError {
    /// A reuse node points at a missing target, or at a target that is
    /// already being expanded (a reference cycle).
    #[error("unresolved reference: {0}")]
    UnresolvedReference(String),

    #[error("unsupported path command: {0}")]
    UnsupportedPathCommand(String),

    #[error("values [{min}, {max}] do not fit in a 32-bit integer")]
    RangeExceeded { min: f64, max: f64 },

    /// The shape produced no subpaths. Callers treat this as
    /// "contributes no polygons", not as a failure.
    #[error("shape has no usable geometry")]
    EmptyGeometry,

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("invalid color: {0}")]
    InvalidColor(String),

    #[error("resource limit exceeded: {0}")]
    ResourceLimit(String),
}

impl ConvertError {
    /// Whether this error must abort the whole conversion.
    ///
    /// Geometry and paint problems are local to one shape; the pipeline
    /// skips that shape and keeps going.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ConvertError::UnresolvedReference(_)
                | ConvertError::RangeExceeded { .. }
                | ConvertError::ResourceLimit(_)
        )
    }
}
