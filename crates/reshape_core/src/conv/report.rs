use serde::Serialize;

use crate::conv::FieldPath;

/// One recovered failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
	/// Destination path where the failure happened, `$` for the root.
	pub path: String,
	/// Rendered error.
	pub message: String,
}

/// Per-field and per-key failures that were skipped during assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
	/// Recovered failures in encounter order.
	pub issues: Vec<Issue>,
}

impl Report {
	/// `true` when nothing was skipped.
	pub fn is_clean(&self) -> bool {
		self.issues.is_empty()
	}

	/// Issue recorded at `path`, if any.
	pub fn issue_at(&self, path: &str) -> Option<&Issue> {
		self.issues.iter().find(|issue| issue.path == path)
	}

	pub(crate) fn record(&mut self, path: &FieldPath, message: impl ToString) {
		self.issues.push(Issue {
			path: path.to_string(),
			message: message.to_string(),
		});
	}
}
