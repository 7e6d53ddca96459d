//! Error types for babymaker

use thiserror::Error;

use crate::types::EventIdentifier;

/// babymaker error type
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// More than one version of a trigger family fired in the same event.
    ///
    /// Not recoverable: the input (or the family naming) is inconsistent and
    /// every record written after this point would be suspect.
    #[error(
        "trigger consistency violation: family '{family}' matched {} fired paths in event {event}: {}",
        paths.len(),
        paths.join(", ")
    )]
    TriggerConsistency {
        /// Trigger family name.
        family: String,
        /// Offending event.
        event: EventIdentifier,
        /// All fired paths that matched the family pattern.
        paths: Vec<String>,
    },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consistency_message_names_family_event_and_paths() {
        let err = Error::TriggerConsistency {
            family: "mu8".into(),
            event: EventIdentifier::new(163255, 1042, 7),
            paths: vec!["HLT_Mu8_v1".into(), "HLT_Mu8_v2".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("'mu8'"), "{msg}");
        assert!(msg.contains("163255:7:1042"), "{msg}");
        assert!(msg.contains("HLT_Mu8_v1, HLT_Mu8_v2"), "{msg}");
        assert!(msg.contains("matched 2 fired paths"), "{msg}");
    }
}
