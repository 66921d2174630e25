/*!
# Squish: Trimming.

Blunt, line-oriented cleanup for template and source text that doesn't merit
a real minifier. Comments are only removed when they start a line (leading
indentation aside) and run through the end of one, so inline comments and
comment-looking text in the middle of code are left alone.
*/

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;



/// # Docblock Comments.
static RE_DOCBLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?ms)^[ \t]*/\*\*.*?\*/\r?\n").unwrap());

/// # Single-Line Comments.
static RE_SINGLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^[ \t]*//.+?\r?\n").unwrap());

/// # Block Comments.
static RE_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?ms)^[ \t]*/\*.*?\*/\r?\n").unwrap());

/// # HTML Comments.
static RE_HTML: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?ms)^[ \t]*<!--.*?-->\r?\n").unwrap());

/// # Latte Comments.
static RE_LATTE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?ms)^[ \t]*\{\*.*?\*\}\r?\n").unwrap());

/// # Twig Comments.
static RE_TWIG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?ms)^[ \t]*\{#.*?#\}\r?\n").unwrap());

/// # Blade Comments.
static RE_BLADE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?ms)^[ \t]*\{\{--.*?--\}\}\r?\n").unwrap());

/// # Space Runs.
static RE_SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());



#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
/// # Comment Style.
///
/// ## Examples
///
/// ```
/// use squish::trim::Comments;
///
/// let src = "{# Hidden. #}\n<p>Hello</p>\n";
/// assert_eq!(Comments::Twig.trim(src), "<p>Hello</p>\n");
/// ```
pub enum Comments {
	/// # `/** … */`
	Docblock,

	/// # `// …`
	Single,

	/// # `/* … */`
	Block,

	/// # `/* … */` (Stylesheets)
	Css,

	/// # `<!-- … -->`
	Html,

	/// # `{* … *}`
	Latte,

	/// # `{# … #}`
	Twig,

	/// # `{{-- … --}}`
	Blade,
}

impl Comments {
	/// # All Styles.
	pub const ALL: [Self; 8] = [
		Self::Docblock, Self::Single, Self::Block, Self::Css,
		Self::Html, Self::Latte, Self::Twig, Self::Blade,
	];

	/// # Pattern.
	fn pattern(self) -> &'static Regex {
		match self {
			Self::Docblock => &RE_DOCBLOCK,
			Self::Single => &RE_SINGLE,
			Self::Block | Self::Css => &RE_BLOCK,
			Self::Html => &RE_HTML,
			Self::Latte => &RE_LATTE,
			Self::Twig => &RE_TWIG,
			Self::Blade => &RE_BLADE,
		}
	}

	#[must_use]
	/// # Trim.
	///
	/// Remove every whole-line comment of this style from the source.
	pub fn trim(self, src: &str) -> String {
		self.pattern().replace_all(src, "").into_owned()
	}

	#[must_use]
	/// # Trim All.
	///
	/// Run every style over the source, one after another.
	pub fn trim_all(src: &str) -> String {
		let mut out = src.to_owned();
		for style in Self::ALL {
			let next = match style.pattern().replace_all(&out, "") {
				Cow::Borrowed(_) => None,
				Cow::Owned(s) => Some(s),
			};
			if let Some(next) = next { out = next; }
		}
		out
	}
}



#[must_use]
/// # Trim Whitespace.
///
/// Collapse all whitespace (newlines included) into single spaces and trim
/// the ends.
///
/// ## Examples
///
/// ```
/// assert_eq!(
///     squish::trim::whitespace("\n\n  Hello\t\tthere,\r\n\n world!  "),
///     "Hello there, world!",
/// );
/// ```
pub fn whitespace(src: &str) -> String {
	RE_SPACES.replace_all(src.trim(), " ").into_owned()
}



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn t_comments() {
		for (style, raw, expected) in [
			(Comments::Docblock, "/**\n * Doc.\n */\nfn x() {}\n", "fn x() {}\n"),
			(Comments::Single, "  // Note.\nlet a = 1; // Kept.\n", "let a = 1; // Kept.\n"),
			(Comments::Block, "\t/* One\n   Two */\na{}\n", "a{}\n"),
			(Comments::Css, "/* Theme. */\nbody{}\n", "body{}\n"),
			(Comments::Html, "<!--\nhi\n-->\n<p>x</p>\n", "<p>x</p>\n"),
			(Comments::Latte, "{* Latte. *}\n{$x}\n", "{$x}\n"),
			(Comments::Twig, "{# Twig. #}\n{{ x }}\n", "{{ x }}\n"),
			(Comments::Blade, "{{-- Blade. --}}\n{{ $x }}\n", "{{ $x }}\n"),
		] {
			assert_eq!(style.trim(raw), expected, "{style:?}");
		}
	}

	#[test]
	fn t_comments_inline() {
		// Comments that don't own their line are left alone.
		let src = "a{color:red} /* Inline. */\n<p><!-- Inline. --></p>\n";
		assert_eq!(Comments::trim_all(src), src);

		// As are comments missing their trailing newline.
		assert_eq!(Comments::Single.trim("// End"), "// End");
	}

	#[test]
	fn t_trim_all() {
		let src = "/** Doc. */\n// Line.\n<!-- HTML. -->\n{# Twig. #}\nkeep\n";
		assert_eq!(Comments::trim_all(src), "keep\n");
	}

	#[test]
	fn t_whitespace() {
		assert_eq!(whitespace(""), "");
		assert_eq!(whitespace(" \n\t "), "");
		assert_eq!(whitespace("a\n\n\nb"), "a b");
		assert_eq!(whitespace("  a  b\tc  "), "a b c");
	}
}
