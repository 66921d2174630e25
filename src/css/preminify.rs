/*!
# Squish: CSS Pre-Minification.

A fixed sequence of textual rewrites that strips comments and insignificant
whitespace, and shortens a handful of common values. The parser assumes its
input has been through here first.

Strings and comments are masked before anything else happens so that none of
the rewrites can reach inside them.
*/

use once_cell::sync::Lazy;
use regex::{
	Captures,
	Regex,
};



/// # String Placeholder Marker.
const MARK_STRING: char = '\u{E001}';

/// # Comment Placeholder Marker.
const MARK_COMMENT: char = '\u{E002}';

static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static RE_SEMI_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r" ?; ?\} ?").unwrap());
static RE_PUNCT: Lazy<Regex> = Lazy::new(||
	Regex::new(r" ?([*$~^|]?=|[{};,>~]|!important\b) ?").unwrap()
);
static RE_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"([\[(:]) ").unwrap());
static RE_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r" ([\])])").unwrap());
static RE_SPACE_COLON: Lazy<Regex> = Lazy::new(|| Regex::new(r" :").unwrap());
static RE_COMMENT_SPACE: Lazy<Regex> = Lazy::new(||
	Regex::new("\\s?(\u{E002}[0-9]+\u{E002})\\s?").unwrap()
);
static RE_ZERO_UNIT: Lazy<Regex> = Lazy::new(||
	Regex::new(r"(?i)0(?:cm|em|ex|in|mm|pc|pt|px|vh|vw|%)").unwrap()
);
static RE_ZERO_QUAD: Lazy<Regex> = Lazy::new(||
	Regex::new(r"(?i):(?:0 0 0 0|0 0)([;}]|!important)").unwrap()
);
static RE_BG_POSITION: Lazy<Regex> = Lazy::new(||
	Regex::new(r"(?i)(background-position):0([;}])").unwrap()
);
static RE_DECIMAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"0+\.(\d+)").unwrap());
static RE_HEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"#([0-9a-fA-F]{6})").unwrap());
static RE_NONE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(border|outline):none").unwrap());
static RE_EMPTY: Lazy<Regex> = Lazy::new(||
	Regex::new("(^|[{};\u{E002}])[^{};\u{E002}]+\\{\\}").unwrap()
);
static RE_PLACEHOLDER: Lazy<Regex> = Lazy::new(||
	Regex::new("([\u{E001}\u{E002}])([0-9]+)[\u{E001}\u{E002}]").unwrap()
);
static RE_IDENT: Lazy<Regex> = Lazy::new(||
	Regex::new(r"(?i)^[a-z_][a-z0-9\-_]*$").unwrap()
);



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Pre-Minification Options.
pub struct PreminifyOptions {
	/// # Keep `/*! … */` Comments?
	pub keep_license: bool,
}

impl Default for PreminifyOptions {
	fn default() -> Self { Self { keep_license: true } }
}



/// # Pre-Minify.
///
/// ## Examples
///
/// ```
/// use squish::css::{preminify, PreminifyOptions};
///
/// assert_eq!(
///     preminify("a {\n\tcolor : #ffffff;\n\tmargin: 0px 0px;\n}", PreminifyOptions::default()),
///     "a{color:#fff;margin:0}",
/// );
/// ```
pub fn preminify(src: &str, opts: PreminifyOptions) -> String {
	if src.trim().is_empty() { return String::new(); }

	let (masked, saved) = mask(src, opts.keep_license);

	// Whitespace.
	let mut out = RE_WS.replace_all(masked.trim(), " ").into_owned();
	out = RE_SEMI_CLOSE.replace_all(&out, "}").into_owned();
	out = RE_PUNCT.replace_all(&out, "$1").into_owned();
	out = RE_OPEN.replace_all(&out, "$1").into_owned();
	out = RE_CLOSE.replace_all(&out, "$1").into_owned();
	out = RE_COMMENT_SPACE.replace_all(&out, "$1").into_owned();

	// A space before a colon only matters in selectors, not declarations or
	// at-rule conditions.
	out = rewrite(&RE_SPACE_COLON, &out, |_, before, after| {
		let condition = in_at_prelude(before) && after.bytes()
			.find(|b| matches!(b, b'(' | b')'))
			.is_some_and(|b| b == b')');
		(in_declaration(after) || condition).then(|| ":".to_owned())
	});

	// Values.
	out = rewrite(&RE_ZERO_UNIT, &out, |_, before, after| {
		let ok =
			before.bytes().last().is_some_and(|b| b.is_ascii_whitespace() || b == b':') &&
			! after.bytes().next().is_some_and(|b| b.is_ascii_alphanumeric());
		ok.then(|| "0".to_owned())
	});
	out = RE_ZERO_QUAD.replace_all(&out, ":0$1").into_owned();
	out = RE_BG_POSITION.replace_all(&out, "$1:0 0$2").into_owned();
	out = rewrite(&RE_DECIMAL, &out, |caps, before, _| {
		before.bytes().last()
			.is_some_and(|b| b.is_ascii_whitespace() || matches!(b, b':' | b',' | b'-'))
			.then(|| format!(".{}", &caps[1]))
	});
	out = rewrite(&RE_HEX, &out, |caps, before, after| {
		let hex = caps[1].as_bytes();
		let ok =
			before.bytes().last().is_some_and(|b| b.is_ascii_whitespace() || matches!(b, b':' | b',' | b'-')) &&
			! after.bytes().next().is_some_and(|b| b.is_ascii_alphanumeric()) &&
			in_declaration(after) &&
			hex.chunks_exact(2).all(|pair| pair[0].eq_ignore_ascii_case(&pair[1]));
		ok.then(|| {
			let mut short = String::with_capacity(4);
			short.push('#');
			short.extend(hex.iter().step_by(2).map(|&b| char::from(b)));
			short
		})
	});
	out = rewrite(&RE_NONE, &out, |caps, before, after| {
		let ok =
			before.bytes().last().is_some_and(|b| matches!(b, b'{' | b';')) &&
			after.bytes().next().is_some_and(|b| matches!(b, b';' | b'}' | b'!'));
		ok.then(|| format!("{}:0", &caps[1]))
	});

	// Empty selectors, which can cascade.
	loop {
		let next = RE_EMPTY.replace_all(&out, "$1").into_owned();
		if next == out { break; }
		out = next;
	}

	unmask(&out, &saved)
}



/// # Mask Strings and Comments.
///
/// Strings are swapped out for numbered placeholders and comments are
/// removed, except for license comments when those are being kept (they get
/// placeholders too). Returns the masked source and the saved values.
fn mask(src: &str, keep_license: bool) -> (String, Vec<String>) {
	let mut out = String::with_capacity(src.len());
	let mut saved = Vec::new();
	let mut rest = src;

	while let Some(idx) = rest.find(['"', '\'', '/']) {
		out.push_str(&rest[..idx]);
		rest = &rest[idx..];

		let (len, marker) =
			if rest.starts_with("/*") {
				let len = rest[2..].find("*/").map_or(rest.len(), |end| end + 4);
				let marker = (keep_license && rest.starts_with("/*!")).then_some(MARK_COMMENT);
				(len, marker)
			}
			else if rest.starts_with('/') { (1, None) }
			else { (string_len(rest), Some(MARK_STRING)) };

		match marker {
			Some(marker) => {
				out.push(marker);
				out.push_str(&saved.len().to_string());
				out.push(marker);
				saved.push(rest[..len].to_owned());
			},
			// A lone slash is just a slash.
			None if len == 1 => { out.push('/'); },
			None => {},
		}

		rest = &rest[len..];
	}

	out.push_str(rest);
	(out, saved)
}

/// # String Length.
///
/// Return the byte length of the quoted string at the start of `src`,
/// quotes included. Unterminated strings run to the end.
fn string_len(src: &str) -> usize {
	let mut chars = src.char_indices();
	let Some((_, quote)) = chars.next() else { return 0; };
	while let Some((idx, c)) = chars.next() {
		if c == '\\' { chars.next(); }
		else if c == quote { return idx + 1; }
	}
	src.len()
}

/// # Unmask.
///
/// Put the saved strings and comments back. Strings holding a simple
/// identifier (outside `content:`) or a `url()` path lose their quotes.
fn unmask(src: &str, saved: &[String]) -> String {
	rewrite(&RE_PLACEHOLDER, src, |caps, before, after| {
		let value = caps[2].parse::<usize>().ok().and_then(|idx| saved.get(idx))?;
		if caps[1].starts_with(MARK_COMMENT) { return Some(value.clone()); }

		let Some(inner) = value.strip_prefix(['"', '\'']).and_then(|v| v.strip_suffix(['"', '\''])) else {
			return Some(value.clone());
		};
		let next = after.bytes().next();

		// url("path") -> url(path)
		if
			next == Some(b')') &&
			ends_with_ignore_case(before, "url(") &&
			! inner.is_empty() &&
			! inner.contains(|c: char| c.is_whitespace() || matches!(c, '"' | '\'' | '(' | ')'))
		{
			return Some(inner.to_owned());
		}

		// "ident" -> ident
		if
			next.is_some_and(|b| b.is_ascii_whitespace() || matches!(b, b'{' | b'}' | b']' | b';' | b',')) &&
			! ends_with_ignore_case(before, "content:") &&
			RE_IDENT.is_match(inner)
		{
			return Some(inner.to_owned());
		}

		Some(value.clone())
	})
}

/// # In a Declaration?
///
/// True if the next brace after a position closes a block (or there isn't
/// one), meaning the position falls within a declaration list rather than a
/// selector.
fn in_declaration(after: &str) -> bool {
	after.bytes()
		.find(|b| matches!(b, b'{' | b'}'))
		.is_none_or(|b| b == b'}')
}

/// # In an At-Rule Prelude?
///
/// True if the statement leading up to a position is an at-rule, e.g.
/// `@media (max-width`.
fn in_at_prelude(before: &str) -> bool {
	let start = before.rfind(['{', '}', ';']).map_or(0, |idx| idx + 1);
	before[start..]
		.trim_start_matches(|c: char| c == MARK_COMMENT || c == ' ' || c.is_ascii_digit())
		.starts_with('@')
}

/// # Ends With (Case-Insensitive).
fn ends_with_ignore_case(src: &str, end: &str) -> bool {
	src.len() >= end.len() &&
	src.as_bytes()[src.len() - end.len()..].eq_ignore_ascii_case(end.as_bytes())
}

/// # Rewrite Matches.
///
/// Like `Regex::replace_all`, except the callback also sees the text before
/// and after each match, and can leave a match alone by returning `None`.
fn rewrite<F>(re: &Regex, src: &str, mut cb: F) -> String
where F: FnMut(&Captures<'_>, &str, &str) -> Option<String> {
	let mut out = String::with_capacity(src.len());
	let mut last = 0;

	for caps in re.captures_iter(src) {
		let Some(m) = caps.get(0) else { continue; };
		if let Some(rep) = cb(&caps, &src[..m.start()], &src[m.end()..]) {
			out.push_str(&src[last..m.start()]);
			out.push_str(&rep);
			last = m.end();
		}
	}

	out.push_str(&src[last..]);
	out
}



#[cfg(test)]
mod tests {
	use super::*;

	/// # Shorthand.
	fn min(src: &str) -> String { preminify(src, PreminifyOptions::default()) }

	#[test]
	fn t_comments() {
		assert_eq!(min("/* Hello */a{color:red}"), "a{color:red}");
		assert_eq!(min("/*! License */\na{color:red}"), "/*! License */a{color:red}");
		assert_eq!(
			preminify("/*! License */a{color:red}", PreminifyOptions { keep_license: false }),
			"a{color:red}",
		);

		// Comment markers inside strings aren't comments.
		assert_eq!(
			min("a:after{content:\"/* hi */\"}"),
			"a:after{content:\"/* hi */\"}",
		);

		// Nor are lone slashes.
		assert_eq!(min("a{grid-area:1 / 2}"), "a{grid-area:1 / 2}");
	}

	#[test]
	fn t_whitespace() {
		assert_eq!(
			min("  a  ,  b  >  c {\n  color : red ;\n  margin : 0 auto ;\n}\n"),
			"a,b>c{color:red;margin:0 auto}",
		);

		// Pseudo-class spacing in selectors is significant.
		assert_eq!(min("a :hover { color: red }"), "a :hover{color:red}");

		// As is the space in front of parentheses.
		assert_eq!(
			min("@media screen and ( max-width : 100px ) { a { color : red } }"),
			"@media screen and (max-width:100px){a{color:red}}",
		);

		assert_eq!(
			min("@supports ( display : grid ) { a { color : red } }"),
			"@supports (display:grid){a{color:red}}",
		);

		// Parentheses in selectors are a different matter.
		assert_eq!(min(":is(.card :hover){color:red}"), ":is(.card :hover){color:red}");
		assert_eq!(
			min(".a:not(.b :focus) .c { color: red }"),
			".a:not(.b :focus) .c{color:red}",
		);
		assert_eq!(
			min("@media print { .a:has(.b :checked) { color: red } }"),
			"@media print{.a:has(.b :checked){color:red}}",
		);

		assert_eq!(min("a { color: red !important; }"), "a{color:red!important}");
		assert_eq!(min("[ type = text ] { b: c }"), "[type=text]{b:c}");
		assert_eq!(min(" \n\t "), "");
	}

	#[test]
	fn t_values() {
		for (raw, expected) in [
			("a{margin:0px}", "a{margin:0}"),
			("a{margin:10px 0em}", "a{margin:10px 0}"),
			("a{width:100%}", "a{width:100%}"),
			("a{margin:0 0 0 0}", "a{margin:0}"),
			("a{margin:0 0}", "a{margin:0}"),
			("a{margin:0 0 0}", "a{margin:0 0 0}"),
			("a{margin:0 0!important}", "a{margin:0!important}"),
			("a{background-position:0}", "a{background-position:0 0}"),
			("a{opacity:0.6}", "a{opacity:.6}"),
			("a{margin:-0.5em 10.5em}", "a{margin:-.5em 10.5em}"),
			("a{color:#FFFFFF}", "a{color:#FFF}"),
			("a{color:#aabbcc}", "a{color:#abc}"),
			("a{color:#aabbcd}", "a{color:#aabbcd}"),
			("a{color:#aabbccdd}", "a{color:#aabbccdd}"),
			("#aabbcc{color:red}", "#aabbcc{color:red}"),
			("a,#ffeedd{color:red}", "a,#ffeedd{color:red}"),
			("a #ffeedd{color:#ffeedd}", "a #ffeedd{color:#fed}"),
			("@media print{a,#aabbcc{color:#aabbcc}}", "@media print{a,#aabbcc{color:#abc}}"),
			("a{border:none;outline:none}", "a{border:0;outline:0}"),
			("a{border:none!important}", "a{border:0!important}"),
			("a{border-left:none}", "a{border-left:none}"),
		] {
			assert_eq!(min(raw), expected, "{raw}");
		}
	}

	#[test]
	fn t_strings() {
		assert_eq!(min("a{font-family:\"Arial\", sans-serif}"), "a{font-family:Arial,sans-serif}");
		assert_eq!(min("[type='text']{b:c}"), "[type=text]{b:c}");
		assert_eq!(min("a{background:url( \"img/x.png\" )}"), "a{background:url(img/x.png)}");
		assert_eq!(min("a{background:url(\"a b.png\")}"), "a{background:url(\"a b.png\")}");

		// Content values keep their quotes.
		assert_eq!(min("a:before{content:\"x\";}"), "a:before{content:\"x\"}");

		// Nothing inside a string is touched.
		assert_eq!(
			min("a{font-family:\"Open  Sans , 0.5px\"}"),
			"a{font-family:\"Open  Sans , 0.5px\"}",
		);
	}

	#[test]
	fn t_empty_selectors() {
		assert_eq!(min("a{}b{color:red}c { }"), "b{color:red}");
		assert_eq!(min("@media print{a{}}b{c:d}"), "b{c:d}");
		assert_eq!(min("a b{}"), "");
		assert_eq!(min("@import x.css;a{}"), "@import x.css;");
		assert_eq!(min("/*! Keep */a{}"), "/*! Keep */");
	}
}
