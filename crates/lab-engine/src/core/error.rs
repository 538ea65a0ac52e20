use std::fmt;

/// Recoverable host errors. None of these are fatal; the host stays usable.
#[derive(Debug)]
pub enum LabError {
    /// Registry key not in the launcher list.
    UnknownModule(String),
    /// Control id not declared by the open module's schema.
    UnknownControl(String),
    /// The surface provider had no surface for the module.
    MissingSurface(String),
    /// Operation needs an open session.
    NoSession,
    /// Configuration could not be parsed.
    Config(serde_json::Error),
}

impl fmt::Display for LabError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabError::UnknownModule(id) => write!(f, "unknown module '{id}'"),
            LabError::UnknownControl(id) => write!(f, "unknown control '{id}'"),
            LabError::MissingSurface(id) => write!(f, "no render surface for module '{id}'"),
            LabError::NoSession => f.write_str("no experiment is open"),
            LabError::Config(err) => write!(f, "invalid lab config: {err}"),
        }
    }
}

impl std::error::Error for LabError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LabError::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for LabError {
    fn from(err: serde_json::Error) -> Self {
        LabError::Config(err)
    }
}
