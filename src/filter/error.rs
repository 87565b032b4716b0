use thiserror::Error;

/// Errors that can occur when creating or editing filters
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("Filter pattern must not be empty")]
    EmptyPattern,

    #[error("Invalid color: '{0}'. Expected '#rrggbb' or '#rgb'")]
    InvalidColor(String),

    #[error("Unknown tab: '{0}'")]
    UnknownTab(String),
}
