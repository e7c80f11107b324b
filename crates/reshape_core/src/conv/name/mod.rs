//! Field name matching and case conversion.
//!
//! Names are compared word by word. Words split on `_`, `-`, `.`, whitespace, and case
//! transitions, keeping acronym runs together, so `db_url`, `DBUrl`, and `dbUrl` share the words
//! `db url`.

use std::collections::HashMap;

/// Decides whether a source key or field name populates a destination field.
pub trait NameMatcher: Send + Sync {
	/// `true` when `source` should populate the destination field called `field`.
	fn matches(&self, source: &str, field: &str) -> bool;
}

impl<F> NameMatcher for F
where
	F: Fn(&str, &str) -> bool + Send + Sync,
{
	fn matches(&self, source: &str, field: &str) -> bool {
		self(source, field)
	}
}

/// Word-normalized, case-insensitive comparison.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultMatcher;

impl NameMatcher for DefaultMatcher {
	fn matches(&self, source: &str, field: &str) -> bool {
		let source = words(source);
		let field = words(field);
		source.len() == field.len() && source.iter().zip(&field).all(|(a, b)| a.eq_ignore_ascii_case(b))
	}
}

/// Case-sensitive equality.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactMatcher;

impl NameMatcher for ExactMatcher {
	fn matches(&self, source: &str, field: &str) -> bool {
		source == field
	}
}

/// Per-field aliases checked before [`DefaultMatcher`].
#[derive(Debug, Clone, Default)]
pub struct AliasMatcher {
	aliases: HashMap<String, Vec<String>>,
}

impl AliasMatcher {
	/// Empty alias table.
	pub fn new() -> Self {
		Self::default()
	}

	/// Accept `alias` as a source name for `field`.
	pub fn alias(mut self, field: impl Into<String>, alias: impl Into<String>) -> Self {
		self.aliases.entry(field.into()).or_default().push(alias.into());
		self
	}
}

impl NameMatcher for AliasMatcher {
	fn matches(&self, source: &str, field: &str) -> bool {
		let aliased = self
			.aliases
			.get(field)
			.is_some_and(|aliases| aliases.iter().any(|alias| alias == source));
		aliased || DefaultMatcher.matches(source, field)
	}
}

/// Split `name` into words.
pub fn words(name: &str) -> Vec<&str> {
	let chars: Vec<(usize, char)> = name.char_indices().collect();
	let mut out = Vec::new();
	let mut start: Option<usize> = None;

	for (pos, &(idx, ch)) in chars.iter().enumerate() {
		if matches!(ch, '_' | '-' | '.') || ch.is_whitespace() {
			if let Some(begin) = start.take() {
				out.push(&name[begin..idx]);
			}
			continue;
		}

		if ch.is_uppercase() {
			if let Some(begin) = start {
				let prev = chars[pos - 1].1;
				let next_lower = chars.get(pos + 1).is_some_and(|&(_, c)| c.is_lowercase());
				let boundary = prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_lower);
				if boundary {
					out.push(&name[begin..idx]);
					start = Some(idx);
				}
			}
		}
		start.get_or_insert(idx);
	}

	if let Some(begin) = start {
		out.push(&name[begin..]);
	}
	out
}

const INITIALISMS: &[&str] = &[
	"ACL", "API", "ASCII", "CPU", "CSS", "DB", "DNS", "EOF", "GUID", "HTML", "HTTP", "HTTPS", "ID", "IP", "JSON", "QPS", "RAM", "RPC", "SLA",
	"SMTP", "SQL", "SSH", "TCP", "TLS", "TTL", "UDP", "UI", "UID", "UUID", "URI", "URL", "UTF8", "VM", "XML", "XSRF", "XSS",
];

fn initialism(word: &str) -> Option<&'static str> {
	INITIALISMS.iter().copied().find(|known| known.eq_ignore_ascii_case(word))
}

fn capitalize(word: &str, out: &mut String) {
	if let Some(known) = initialism(word) {
		out.push_str(known);
		return;
	}
	let mut chars = word.chars();
	if let Some(first) = chars.next() {
		out.extend(first.to_uppercase());
		out.extend(chars.flat_map(char::to_lowercase));
	}
}

/// `helloWorldID` → `hello_world_id`.
pub fn to_snake(name: &str) -> String {
	words(name).iter().map(|word| word.to_lowercase()).collect::<Vec<_>>().join("_")
}

/// `hello_world_id` → `helloWorldID`.
pub fn to_camel(name: &str) -> String {
	let mut out = String::with_capacity(name.len());
	for (idx, word) in words(name).into_iter().enumerate() {
		if idx == 0 {
			out.push_str(&word.to_lowercase());
		} else {
			capitalize(word, &mut out);
		}
	}
	out
}

/// `hello_world_id` → `HelloWorldID`.
pub fn to_class_name(name: &str) -> String {
	let mut out = String::with_capacity(name.len());
	for word in words(name) {
		capitalize(word, &mut out);
	}
	out
}
