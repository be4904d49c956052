use thiserror::Error;

/// Result type for rendering inputs.
pub type VizResult<T> = Result<T, VizError>;

/// Errors raised while preparing chart inputs.
///
/// Drawing itself never fails; these cover decoding the inputs a chart
/// is built from.
#[derive(Debug, Error)]
pub enum VizError {
    #[error("Invalid GeoJSON: {0}")]
    GeoJson(#[from] serde_json::Error),

    #[error("GeoJSON has no drawable regions")]
    EmptyGeometry,

    #[error("Sankey link refers to unknown node '{0}'")]
    UnknownNode(String),

    #[error("Sankey graph has a cycle through '{0}'")]
    Cycle(String),
}
