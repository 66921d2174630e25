/*!
# Squish: CSS Syntax.

The three node kinds produced by the parser:

```css
/* Rule */
selector { property: value; }

/* Block */
@media screen { selector { property: value; } }

/* Statement */
@import "file.css";
```
*/

use crate::SquishError;
use indexmap::IndexMap;



/// # Escaped Colon Placeholder.
///
/// A private-use character standing in for `\:` while declarations are being
/// split on their (real) colons.
const ESCAPED_COLON: &str = "\u{E000}";

/// # Parsed Source Tree.
///
/// Nodes keyed by selector (or identifier), in first-seen order.
pub type Tree = IndexMap<String, Node>;



#[derive(Debug, Clone, Eq, PartialEq)]
/// # Node.
pub enum Node {
	/// # Flat Declarations.
	Rule(Rule),

	/// # Nested Rules.
	Block(Block),

	/// # Body-less At-Rule.
	Statement(Statement),
}



#[derive(Debug, Clone, Eq, PartialEq)]
/// # Rule.
///
/// A single selector with flat `property: value` declarations.
pub struct Rule {
	/// # Selector.
	pub selector: String,

	/// # Declarations.
	pub declarations: IndexMap<String, String>,
}

impl Rule {
	/// # New.
	///
	/// Build a rule from the raw selector and declaration text (the bit
	/// between the braces).
	///
	/// ## Errors
	///
	/// Returns an error if any declaration is missing its colon.
	pub fn new(selector: &str, body: &str) -> Result<Self, SquishError> {
		let selector = normalize_selector(selector);
		let mut declarations = IndexMap::new();

		let body = body.trim_matches(|c: char| c.is_ascii_whitespace() || matches!(c, '\0' | '{' | '}'));
		for segment in split_declarations(body) {
			let escaped = segment.replace("\\:", ESCAPED_COLON);
			let Some((property, value)) = escaped.split_once(':') else {
				return Err(SquishError::MissingColon(segment.to_owned()));
			};

			let property = restore_colons(property.trim());
			let value = restore_colons(&shorten_decimals(value.trim()));
			declarations.insert(property, value);
		}

		Ok(Self { selector, declarations })
	}
}



#[derive(Debug, Clone, Eq, PartialEq)]
/// # Block.
///
/// A selector (usually an at-rule like `@media`) holding nested rules rather
/// than declarations.
pub struct Block {
	/// # Selector.
	pub selector: String,

	/// # Children.
	pub children: Tree,
}

impl Block {
	#[must_use]
	/// # New.
	pub fn new(selector: &str, children: Tree) -> Self {
		Self {
			selector: selector.trim().to_owned(),
			children,
		}
	}
}



#[derive(Debug, Clone, Eq, PartialEq)]
/// # Statement.
///
/// A `;`-terminated at-rule with no body, like `@charset` or `@import`.
pub struct Statement {
	/// # Identifier (Lowercase, With `@`).
	pub identifier: String,

	/// # Rule (Trimmed of Quotes, Etc.).
	pub rule: String,

	/// # Raw Rule Text.
	pub raw: String,
}

impl Statement {
	/// # New.
	///
	/// ## Errors
	///
	/// The identifier must begin with an `@`.
	pub fn new(identifier: &str, rule: &str) -> Result<Self, SquishError> {
		let identifier = identifier.trim();
		if ! identifier.starts_with('@') {
			return Err(SquishError::InvalidIdentifier(identifier.to_owned()));
		}

		let raw = rule.trim().trim_end_matches(';').trim_end();
		Ok(Self {
			identifier: identifier.to_ascii_lowercase(),
			rule: rule.trim_matches(|c: char| c.is_ascii_whitespace() || matches!(c, '\0' | '"' | '\'' | ';')).to_owned(),
			raw: raw.to_owned(),
		})
	}

	#[must_use]
	/// # Tree Key.
	///
	/// There can only be one `@charset`, but other statements like `@import`
	/// may repeat, so those are keyed by their full text.
	pub fn key(&self) -> String {
		if self.identifier == "@charset" || self.raw.is_empty() { self.identifier.clone() }
		else { format!("{} {}", self.identifier, self.raw) }
	}

	/// # From Source.
	///
	/// Split a full statement like `@import "x.css";` into its identifier and
	/// rule. The split happens at the first space, or wherever the at-keyword
	/// ends if the two were squished together.
	///
	/// ## Errors
	///
	/// See [`Statement::new`].
	pub fn from_source(src: &str) -> Result<Self, SquishError> {
		let src = src.trim();
		let end = src.char_indices()
			.skip(1)
			.find(|(_, c)| ! (c.is_ascii_alphanumeric() || matches!(c, '-' | '_')))
			.map_or(src.len(), |(idx, _)| idx);

		// A plain space gets eaten; anything else belongs to the rule.
		let (identifier, rule) = src.split_at(end);
		Self::new(identifier, rule.strip_prefix(' ').unwrap_or(rule))
	}
}



/// # Normalize Selector.
///
/// Trim the selector and remove the whitespace around `+` combinators.
fn normalize_selector(src: &str) -> String {
	let src = src.trim();
	let mut out = String::with_capacity(src.len());
	let mut chars = src.chars().peekable();
	while let Some(c) = chars.next() {
		if c.is_ascii_whitespace() {
			// Swallow the run.
			while chars.next_if(char::is_ascii_whitespace).is_some() {}
			if chars.peek() != Some(&'+') && ! out.ends_with('+') { out.push(' '); }
		}
		else { out.push(c); }
	}
	out
}

/// # Split Declarations.
///
/// Split a declaration body on its semicolons, except those inside quotes or
/// parentheses (e.g. `url(data:image/png;base64,…)`). Empty segments are
/// skipped.
fn split_declarations(src: &str) -> Vec<&str> {
	let mut out = Vec::new();
	let mut quote: Option<char> = None;
	let mut depth = 0_usize;
	let mut escaped = false;
	let mut start = 0;

	for (idx, c) in src.char_indices() {
		if escaped {
			escaped = false;
			continue;
		}

		match (quote, c) {
			(_, '\\') => { escaped = true; },
			(Some(q), c) => if c == q { quote = None; },
			(None, '"' | '\'') => { quote = Some(c); },
			(None, '(') => { depth += 1; },
			(None, ')') => { depth = depth.saturating_sub(1); },
			(None, ';') if depth == 0 => {
				let segment = src[start..idx].trim();
				if ! segment.is_empty() { out.push(segment); }
				start = idx + 1;
			},
			_ => {},
		}
	}

	let segment = src[start..].trim();
	if ! segment.is_empty() { out.push(segment); }
	out
}

/// # Restore Escaped Colons.
fn restore_colons(src: &str) -> String {
	src.replace(ESCAPED_COLON, "\\:")
}

/// # Shorten Decimals.
///
/// Rewrite `0.5` as `.5`, but only where the zero starts a number.
fn shorten_decimals(src: &str) -> String {
	let bytes = src.as_bytes();
	let mut out = String::with_capacity(src.len());
	let mut last = 0;

	for (idx, pair) in bytes.windows(2).enumerate() {
		if
			pair == b"0." &&
			bytes.get(idx + 2).is_some_and(u8::is_ascii_digit) &&
			(idx == 0 || ! matches!(bytes[idx - 1], b'0'..=b'9' | b'.' | b'a'..=b'z' | b'A'..=b'Z' | b'_' | b'#'))
		{
			out.push_str(&src[last..idx]);
			last = idx + 1;
		}
	}

	out.push_str(&src[last..]);
	out
}



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn t_rule() {
		let rule = Rule::new(" a   +   b ", "color:red;margin:0.5em 10.5em;;").unwrap();
		assert_eq!(rule.selector, "a+b");
		assert_eq!(rule.declarations.len(), 2);
		assert_eq!(rule.declarations["color"], "red");
		assert_eq!(rule.declarations["margin"], ".5em 10.5em");
	}

	#[test]
	fn t_rule_colons() {
		// Only the first colon splits.
		let rule = Rule::new("a", "background:url(http://x.com/a.png)").unwrap();
		assert_eq!(rule.declarations["background"], "url(http://x.com/a.png)");

		// Escaped colons survive.
		let rule = Rule::new("a\\:hover", "grid-area:a\\:b").unwrap();
		assert_eq!(rule.selector, "a\\:hover");
		assert_eq!(rule.declarations["grid-area"], "a\\:b");

		// Semicolons inside parentheses don't split.
		let rule = Rule::new("i", "background:url(data:image/png;base64,AA==);color:red").unwrap();
		assert_eq!(rule.declarations["background"], "url(data:image/png;base64,AA==)");
		assert_eq!(rule.declarations["color"], "red");
	}

	#[test]
	fn t_rule_missing_colon() {
		let err = Rule::new("a", "color:red;oops").unwrap_err();
		assert_eq!(err, SquishError::MissingColon("oops".to_owned()));
	}

	#[test]
	fn t_statement() {
		let st = Statement::from_source("@charset \"UTF-8\";").unwrap();
		assert_eq!(st.identifier, "@charset");
		assert_eq!(st.rule, "UTF-8");

		let st = Statement::from_source("@IMPORT\"x.css\";").unwrap();
		assert_eq!(st.identifier, "@import");
		assert_eq!(st.rule, "x.css");

		let st = Statement::from_source("@import url(x.css) screen;").unwrap();
		assert_eq!(st.rule, "url(x.css) screen");
		assert_eq!(st.raw, "url(x.css) screen");

		assert!(matches!(
			Statement::from_source("color:red;"),
			Err(SquishError::InvalidIdentifier(_)),
		));
	}

	#[test]
	fn t_shorten_decimals() {
		for (raw, expected) in [
			("0.5em", ".5em"),
			("10.5em", "10.5em"),
			("rgba(0,0,0,0.25)", "rgba(0,0,0,.25)"),
			("-0.5px 0.1s", "-.5px .1s"),
			("#000.5", "#000.5"),
			("0.", "0."),
		] {
			assert_eq!(shorten_decimals(raw), expected, "{raw}");
		}
	}
}
