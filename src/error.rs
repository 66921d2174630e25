/*!
# Squish: Errors
*/

use std::{
	error::Error,
	fmt,
	path::PathBuf,
};



/// # Fragment Length.
///
/// Offending source text is embedded in error messages, but only this many
/// characters of it.
const FRAGMENT_LEN: usize = 64;



#[derive(Debug, Clone, Eq, PartialEq)]
/// # Generic Error.
pub enum SquishError {
	/// # Conflicting `@charset` Statements (Strict Mode).
	CharsetConflict(String, String),

	/// # At-Rule Identifier Doesn't Start With `@`.
	InvalidIdentifier(String),

	/// # Declaration Without a `:`.
	MissingColon(String),

	/// # No Sources Found.
	NoSources,

	/// # Compiler Phase Called Out of Order.
	Phase(&'static str),

	/// # Unreadable Source.
	Read(PathBuf),

	/// # Unable to Save.
	Save(PathBuf),

	/// # Nesting Too Deep.
	TooDeep(String),

	/// # Uneven `{`/`}` Distribution.
	UnbalancedBraces(String),

	/// # Unclosed Multi-Line Comment (Byte Offset).
	UnterminatedComment(usize),

	/// # Unclosed Regular Expression Literal (Byte Offset).
	UnterminatedRegex(usize),

	/// # Unclosed String Literal (Byte Offset).
	UnterminatedString(usize),
}

impl fmt::Display for SquishError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::CharsetConflict(a, b) => write!(
				f,
				"Conflicting @charset rules: {a:?} vs {b:?}.",
			),
			Self::InvalidIdentifier(s) => write!(
				f,
				"CSS identifier must start with \"@\": {:?}",
				fragment(s),
			),
			Self::MissingColon(s) => write!(
				f,
				"Error parsing stylesheet; declaration is missing a colon: {:?}",
				fragment(s),
			),
			Self::NoSources => f.write_str("No CSS or JS sources were found."),
			Self::Phase(s) => write!(f, "Compiler phase called out of order: {s}."),
			Self::Read(p) => write!(f, "Unable to read {}.", p.display()),
			Self::Save(p) => write!(f, "Unable to save {}.", p.display()),
			Self::TooDeep(s) => write!(
				f,
				"Stylesheet blocks are nested too deeply: {:?}",
				fragment(s),
			),
			Self::UnbalancedBraces(s) => write!(
				f,
				"Provided CSS has an uneven block distribution: {:?}",
				fragment(s),
			),
			Self::UnterminatedComment(pos) => write!(f, "Unclosed multiline comment at position: {pos}."),
			Self::UnterminatedRegex(pos) => write!(f, "Unclosed regex pattern at position: {pos}."),
			Self::UnterminatedString(pos) => write!(f, "Unclosed string at position: {pos}."),
		}
	}
}

impl Error for SquishError {}



/// # Error Fragment.
///
/// Return (up to) the first `FRAGMENT_LEN` characters of the source.
fn fragment(src: &str) -> &str {
	match src.char_indices().nth(FRAGMENT_LEN) {
		Some((idx, _)) => &src[..idx],
		None => src,
	}
}



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn t_fragment() {
		assert_eq!(fragment("a{b:c}"), "a{b:c}");

		let long = "x".repeat(100);
		assert_eq!(fragment(&long).len(), FRAGMENT_LEN);

		// Multi-byte characters shouldn't cause a panic.
		let long = "é".repeat(100);
		assert_eq!(fragment(&long).chars().count(), FRAGMENT_LEN);
	}

	#[test]
	fn t_display() {
		let err = SquishError::MissingColon("color red".to_owned());
		assert!(err.to_string().contains("color red"));

		let err = SquishError::UnterminatedString(12);
		assert_eq!(err.to_string(), "Unclosed string at position: 12.");
	}
}
