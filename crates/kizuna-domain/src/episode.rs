//! Episode module - one row of the input dataset

/// One episode: identifier, story arc and synopsis
///
/// The identifier is kept as text because some are suffixed (e.g. "12b").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Episode {
    /// Episode identifier
    pub id: String,

    /// Story arc label
    pub arc: String,

    /// Free-text summary, the only evidence used for relationships
    pub synopsis: String,
}

impl Episode {
    /// Create a new episode
    pub fn new(id: impl Into<String>, arc: impl Into<String>, synopsis: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            arc: arc.into(),
            synopsis: synopsis.into(),
        }
    }
}
