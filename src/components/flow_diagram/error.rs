//! Errors raised while loading the diagram configuration.

use thiserror::Error;

use super::types::FlowCategory;

/// Result alias for configuration loading.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Reasons a diagram configuration is rejected at startup.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
	/// The configuration document is not valid JSON for the expected schema.
	#[error("Malformed diagram configuration: {0}")]
	Parse(String),

	/// Two nodes share an id.
	#[error("Duplicate node id '{0}'")]
	DuplicateNode(String),

	/// A node has a non-positive width or height.
	#[error("Node '{0}' has an empty bounding box")]
	DegenerateNode(String),

	/// Two connectors share an id.
	#[error("Duplicate connector id '{0}'")]
	DuplicateConnector(String),

	/// Two flow definitions share a key.
	#[error("Duplicate flow category '{0}'")]
	DuplicateFlow(FlowCategory),

	/// A connector endpoint names a node that does not exist.
	#[error("Connector '{connector}' references unknown node '{node}'")]
	UnknownNode {
		/// Offending connector.
		connector: String,
		/// The missing node id.
		node: String,
	},

	/// A route was requested for a node id that does not exist.
	#[error("Unknown node '{0}'")]
	MissingNode(String),

	/// A connector belongs to a flow category with no definition.
	#[error("Connector '{connector}' uses undeclared flow category '{flow}'")]
	UnknownFlow {
		/// Offending connector.
		connector: String,
		/// The undeclared category.
		flow: FlowCategory,
	},

	/// The playback order names a flow category with no definition.
	#[error("Playback sequence names undeclared flow category '{0}'")]
	UnknownPlaybackFlow(FlowCategory),

	/// The playback order is empty.
	#[error("Playback sequence is empty")]
	EmptyPlayback,

	/// The playback step duration is zero.
	#[error("Playback step duration must be greater than zero")]
	ZeroStepDuration,
}

impl From<serde_json::Error> for ConfigError {
	fn from(e: serde_json::Error) -> Self {
		ConfigError::Parse(e.to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_error_display() {
		let errors = vec![
			(
				ConfigError::DuplicateNode("host".into()),
				"Duplicate node id 'host'",
			),
			(
				ConfigError::UnknownNode {
					connector: "conn-a".into(),
					node: "ghost".into(),
				},
				"Connector 'conn-a' references unknown node 'ghost'",
			),
			(
				ConfigError::UnknownFlow {
					connector: "conn-a".into(),
					flow: FlowCategory::new("teal"),
				},
				"Connector 'conn-a' uses undeclared flow category 'teal'",
			),
			(
				ConfigError::ZeroStepDuration,
				"Playback step duration must be greater than zero",
			),
		];

		for (error, expected) in errors {
			assert_eq!(error.to_string(), expected);
		}
	}

	#[test]
	fn test_from_serde_error() {
		let err: ConfigError = serde_json::from_str::<u32>("nope").unwrap_err().into();
		assert!(matches!(err, ConfigError::Parse(_)));
	}
}
