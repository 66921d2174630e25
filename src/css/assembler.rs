/*!
# Squish: CSS Assembler.
*/

use crate::css::{
	Body,
	RuleSet,
	Statement,
	Value,
};
use std::fmt;



#[derive(Debug, Clone, Copy)]
/// # Body Entry.
enum Entry<'a> {
	/// # Property Value.
	Declaration(&'a str),

	/// # Nested Body.
	Rule(&'a Body),
}

impl<'a> From<&'a Value> for Entry<'a> {
	fn from(src: &'a Value) -> Self {
		match src {
			Value::Declaration(v) => Self::Declaration(v),
			Value::Nested(b) => Self::Rule(b),
		}
	}
}



#[derive(Debug)]
/// # Serialized Piece.
enum Piece<'a> {
	/// # Property and Value.
	Declaration(&'a str, &'a str),

	/// # Selector(s) and Body.
	Rule(String, String),
}



#[derive(Debug, Clone)]
/// # Assembler.
///
/// This serializes a [`RuleSet`] as compactly as possible. Selectors whose
/// bodies come out identical are joined together, e.g. `a, b{color:red}`.
///
/// ## Examples
///
/// ```
/// use squish::css::{Assembler, Body, RuleSet, Value};
///
/// let mut set = RuleSet::default();
/// set.charset = Some("utf-8".to_owned());
/// set.rules.insert("body".to_owned(), Body::from([
///     ("color".to_owned(), Value::from("#000")),
/// ]));
///
/// assert_eq!(
///     Assembler::new(&set).build().to_string(),
///     r#"@charset"utf-8";body{color:#000}"#,
/// );
/// ```
pub struct Assembler<'a> {
	/// # Rules.
	set: &'a RuleSet,

	/// # Output.
	stylesheet: String,
}

impl fmt::Display for Assembler<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.stylesheet)
	}
}

impl<'a> Assembler<'a> {
	#[must_use]
	/// # New.
	pub const fn new(set: &'a RuleSet) -> Self {
		Self { set, stylesheet: String::new() }
	}

	#[must_use]
	/// # Build.
	pub fn build(mut self) -> Self {
		let mut out = String::new();

		if let Some(charset) = self.set.charset.as_deref() {
			out.push_str("@charset\"");
			out.push_str(charset);
			out.push_str("\";");
		}

		for st in &self.set.imports { push_import(&mut out, st); }
		for st in &self.set.statements { push_statement(&mut out, st); }

		out.push_str(&assemble(
			self.set.rules.iter().map(|(k, v)| (k.as_str(), Entry::Rule(v))).collect()
		));

		self.stylesheet = out;
		self
	}

	#[must_use]
	/// # Into String.
	pub fn into_string(self) -> String { self.stylesheet }
}



/// # Push Import.
///
/// Plain paths use the compact `@import"path";` form; anything fancier
/// (`url()`, media queries) is written as it was found.
fn push_import(out: &mut String, st: &Statement) {
	if st.rule.is_empty() || st.rule.contains(|c: char| c.is_whitespace() || matches!(c, '(' | '"' | '\'')) {
		push_statement(out, st);
	}
	else {
		out.push_str("@import\"");
		out.push_str(&st.rule);
		out.push_str("\";");
	}
}

/// # Push Statement.
fn push_statement(out: &mut String, st: &Statement) {
	out.push_str(&st.identifier);
	if ! st.raw.is_empty() {
		if ! st.raw.starts_with(['"', '\'', '(']) { out.push(' '); }
		out.push_str(&st.raw);
	}
	out.push(';');
}

/// # Assemble Entries.
///
/// Serialize a list of declarations and/or rules, joining the selectors of
/// any (non-at-rule) rules with matching bodies onto the first.
fn assemble<'a>(entries: Vec<(&'a str, Entry<'a>)>) -> String {
	let mut pieces: Vec<Piece<'a>> = Vec::new();
	for (key, entry) in entries {
		match entry {
			Entry::Declaration(value) => { pieces.push(Piece::Declaration(key, value)); },
			Entry::Rule(body) => {
				let body = assemble(body.iter().map(|(k, v)| (k.as_str(), Entry::from(v))).collect());
				if
					! key.starts_with('@') &&
					let Some(Piece::Rule(selector, _)) = pieces.iter_mut().find(|p| matches!(
						p,
						Piece::Rule(s, b) if ! s.starts_with('@') && *b == body
					))
				{
					selector.push_str(", ");
					selector.push_str(key);
				}
				else { pieces.push(Piece::Rule(key.to_owned(), body)); }
			},
		}
	}

	let mut out = String::new();
	let mut semi = false;
	for piece in pieces {
		if semi { out.push(';'); }
		match piece {
			Piece::Declaration(k, v) => {
				out.push_str(k);
				out.push(':');
				out.push_str(v);
				semi = true;
			},
			Piece::Rule(selector, body) => {
				out.push_str(&selector);
				out.push('{');
				out.push_str(&body);
				out.push('}');
				semi = false;
			},
		}
	}

	out
}
