/// Convenience result type used across gentrack.
pub type GentrackResult<T> = Result<T, GentrackError>;

/// Top-level error taxonomy used by flow construction, propagation and sample commands.
#[derive(thiserror::Error, Debug)]
pub enum GentrackError {
    /// Invalid user-provided data or an inconsistent spec.
    #[error("validation error: {0}")]
    Validation(String),

    /// A configuration object that cannot be turned into a node or an action.
    #[error("configuration error: {message} (config: {config})")]
    Config {
        /// What is wrong with the configuration.
        message: String,
        /// The offending configuration, verbatim.
        config: serde_json::Value,
    },

    /// Errors while building or pumping a transformation graph.
    #[error("flow error: {0}")]
    Flow(String),

    /// Structural misuse of a group hierarchy.
    #[error("group error: {0}")]
    Group(String),

    /// An attribute that cannot be resolved into an accessor.
    #[error("attribute error: {message} (attribute: {attribute})")]
    Attribute {
        /// Resolution failure description.
        message: String,
        /// The attribute identifier that failed to resolve.
        attribute: serde_json::Value,
    },

    /// An action whose `type` is not part of the command vocabulary.
    #[error("unknown action: {0}")]
    UnknownAction(serde_json::Value),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GentrackError {
    /// Build a [`GentrackError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`GentrackError::Config`] value carrying the offending configuration.
    pub fn config(msg: impl Into<String>, config: &serde_json::Value) -> Self {
        Self::Config {
            message: msg.into(),
            config: config.clone(),
        }
    }

    /// Build a [`GentrackError::Flow`] value.
    pub fn flow(msg: impl Into<String>) -> Self {
        Self::Flow(msg.into())
    }

    /// Build a [`GentrackError::Group`] value.
    pub fn group(msg: impl Into<String>) -> Self {
        Self::Group(msg.into())
    }

    /// Build a [`GentrackError::Attribute`] value.
    pub fn attribute(msg: impl Into<String>, attribute: serde_json::Value) -> Self {
        Self::Attribute {
            message: msg.into(),
            attribute,
        }
    }

    /// Build a [`GentrackError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
