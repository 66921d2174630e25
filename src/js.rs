/*!
# Squish: JavaScript.

This is a conservative, single-pass JavaScript minifier in the spirit of
JSMin: comments are removed and whitespace is collapsed, but nothing is
renamed or rewritten.
*/

use crate::SquishError;



/// # Regex-Preceding Keywords.
///
/// A `/` following one of these starts a regular expression rather than a
/// division.
const KEYWORDS: [&str; 13] = [
	"case", "delete", "do", "else", "for", "in", "instanceof", "new", "return",
	"throw", "typeof", "void", "yield",
];

/// # Regex-Preceding Characters.
const REGEX_AFTER: &str = "(,=:[!&|?+-~*{};\n";

/// # Newline-Preserving Characters.
///
/// A line starting with one of these could otherwise be glued onto the
/// previous statement.
const NO_NEWLINE: &str = "(-+[#@";

/// # Newline-Preserving Characters (Before).
const KEEP_BEFORE_NEWLINE: &str = "}])+-\"'`";



#[derive(Debug, Clone, Copy)]
/// # JavaScript Minifier.
///
/// ## Examples
///
/// ```
/// use squish::js::JsMinifier;
///
/// let js = "/* Greet. */\nfunction hello(name) {\n\treturn 'Hello ' + name;\n}";
/// assert_eq!(
///     JsMinifier::new(js).minify().unwrap(),
///     "function hello(name){return'Hello '+name;}",
/// );
/// ```
pub struct JsMinifier<'a> {
	/// # Source.
	src: &'a str,

	/// # Keep `/*!` Comments?
	flagged_comments: bool,
}

impl<'a> JsMinifier<'a> {
	#[must_use]
	/// # New.
	pub const fn new(src: &'a str) -> Self {
		Self { src, flagged_comments: true }
	}

	#[must_use]
	/// # With Flagged Comments.
	///
	/// Keep (`true`) or remove (`false`) `/*! … */` license comments. This is
	/// enabled by default. Conditional `/*@ … */` comments are always kept.
	pub const fn with_flagged_comments(mut self, keep: bool) -> Self {
		self.flagged_comments = keep;
		self
	}

	/// # Minify.
	///
	/// ## Errors
	///
	/// Unterminated strings, regular expressions, and multi-line comments are
	/// all fatal.
	pub fn minify(&self) -> Result<String, SquishError> {
		Scanner::new(self.src, self.flagged_comments).run()
	}
}



#[derive(Debug)]
/// # Scanner State.
struct Scanner<'a> {
	/// # Source.
	src: &'a str,

	/// # Characters and Their Byte Offsets.
	input: Vec<(usize, char)>,

	/// # Next Index.
	idx: usize,

	/// # Pushed-Back Character.
	lookahead: Option<(usize, char)>,

	/// # Offset of the Last Character Read.
	pos: usize,

	/// # Current Character.
	a: Option<char>,

	/// # Next (Significant) Character.
	b: Option<char>,

	/// # Last Character Written.
	last: char,

	/// # Keep `/*!` Comments?
	flagged_comments: bool,

	/// # Output.
	out: String,
}

impl<'a> Scanner<'a> {
	/// # New.
	fn new(src: &'a str, flagged_comments: bool) -> Self {
		// A trailing newline makes end-of-file comments easier to deal with.
		let mut input: Vec<(usize, char)> = src.char_indices().collect();
		input.push((src.len(), '\n'));

		Self {
			src,
			input,
			idx: 0,
			lookahead: None,
			pos: 0,
			a: Some('\n'),
			b: Some('\n'),
			last: '\n',
			flagged_comments,
			out: String::with_capacity(src.len()),
		}
	}

	/// # Run.
	fn run(mut self) -> Result<String, SquishError> {
		while let Some(a) = self.a {
			match (a, self.b) {
				('\n', Some(b)) if NO_NEWLINE.contains(b) => {
					self.echo(a);
					self.save_string()?;
				},
				('\n', Some(' ')) => {},
				('\n' | ' ', b) => {
					if b.is_some_and(is_alphanumeric) { self.echo(a); }
					self.save_string()?;
				},
				(_, Some('\n')) => {
					if KEEP_BEFORE_NEWLINE.contains(a) || is_alphanumeric(a) {
						self.echo(a);
						self.save_string()?;
					}
				},
				// Spaces between "+" and "-" signs have to stay put.
				('+' | '-', Some(' ')) if matches!(self.next_significant(), Some('+' | '-')) => {
					self.echo(a);
					self.echo(' ');
					self.save_string()?;
				},
				(_, Some(' ')) if ! is_alphanumeric(a) => {},
				('/', Some('\'' | '"')) if REGEX_AFTER.contains(self.last) || self.ends_in_keyword(None) => {
					self.save_regex()?;
					continue;
				},
				_ => {
					self.echo(a);
					self.save_string()?;
				},
			}

			// Is the next thing a regular expression?
			self.b = self.get_real()?;
			if self.b == Some('/') {
				let last = match self.a {
					Some(' ') | None => self.last,
					Some(a) => a,
				};
				if REGEX_AFTER.contains(last) || self.ends_in_keyword(self.a) {
					self.save_regex()?;
				}
			}
		}

		Ok(self.out.trim().to_owned())
	}

	/// # Echo.
	fn echo(&mut self, c: char) {
		self.out.push(c);
		self.last = c;
	}

	/// # Get Character.
	///
	/// Carriage returns are converted to newlines, and all other control
	/// characters are converted to spaces.
	fn get_char(&mut self) -> Option<char> {
		let (pos, c) = match self.lookahead.take() {
			Some(next) => next,
			None => {
				let next = self.input.get(self.idx).copied()?;
				self.idx += 1;
				next
			},
		};

		self.pos = pos;
		Some(normalize(c))
	}

	/// # Peek.
	///
	/// Return the next character without consuming it.
	fn peek(&self) -> Option<char> {
		self.input.get(self.idx).map(|(_, c)| normalize(*c))
	}

	/// # Next Significant Character.
	///
	/// Return the next non-space character without consuming anything.
	fn next_significant(&self) -> Option<char> {
		self.lookahead.iter()
			.chain(self.input.iter().skip(self.idx))
			.map(|(_, c)| normalize(*c))
			.find(|&c| c != ' ')
	}

	/// # Get Real Character.
	///
	/// Return the next character, skipping over any comments (except those
	/// being kept, which are written straight to the output).
	fn get_real(&mut self) -> Result<Option<char>, SquishError> {
		loop {
			let c = self.get_char();
			if c != Some('/') { return Ok(c); }

			let start = self.pos;
			let next = self.get_char();
			match next {
				Some('/') => {
					// Kill the rest of the line, but not the line break.
					while self.peek().is_some_and(|c| c != '\n') { self.idx += 1; }
				},
				Some('*') => { self.skip_comment(start)?; },
				Some(next) => {
					self.lookahead.replace((self.pos, next));
					self.pos = start;
					return Ok(c);
				},
				None => return Ok(c),
			}
		}
	}

	/// # Skip (Or Keep) a Multi-Line Comment.
	///
	/// The opening `/*` has already been consumed.
	fn skip_comment(&mut self, start: usize) -> Result<(), SquishError> {
		let third = self.get_char();

		// An empty comment, /**/.
		if third == Some('*') && self.peek() == Some('/') {
			self.idx += 1;
			return Ok(());
		}

		let from = self.input.get(self.idx).map_or(self.src.len(), |(pos, _)| *pos);
		let end = self.src.get(from..)
			.and_then(|rest| rest.find("*/"))
			.map(|idx| from + idx + 2)
			.ok_or(SquishError::UnterminatedComment(start))?;
		self.idx = self.input.partition_point(|(pos, _)| *pos < end);

		if (self.flagged_comments && third == Some('!')) || third == Some('@') {
			if start > 0 {
				if let Some(a) = self.a.filter(|a| ! a.is_whitespace()) { self.echo(a); }
				self.a = Some(' ');

				// Comments on their own line stay on their own line.
				if self.src[..start].ends_with(['\n', '\r']) && ! self.out.ends_with('\n') {
					self.echo('\n');
				}
			}

			self.out.push_str(&self.src[start..end]);
			self.last = '/';
		}

		Ok(())
	}

	/// # Save String.
	///
	/// Move `b` into `a`. If that's a quote, write the whole string literal
	/// (save the closing quote) to the output.
	fn save_string(&mut self) -> Result<(), SquishError> {
		self.a = self.b;
		let Some(quote @ ('\'' | '"' | '`')) = self.a else { return Ok(()); };

		let start = self.pos;
		self.echo(quote);
		loop {
			match self.get_char() {
				Some(c) if c == quote => return Ok(()),
				Some('\n') if quote == '`' => { self.echo('\n'); },
				Some('\\') => match self.get_char() {
					// Escaped line breaks are just continuations.
					Some('\n') => {},
					Some(c) => {
						self.echo('\\');
						self.echo(c);
					},
					None => return Err(SquishError::UnterminatedString(start)),
				},
				Some('\n') | None => return Err(SquishError::UnterminatedString(start)),
				Some(c) => { self.echo(c); },
			}
		}
	}

	/// # Save Regular Expression.
	///
	/// Write `a` and the whole regex literal (save the closing slash) to the
	/// output.
	fn save_regex(&mut self) -> Result<(), SquishError> {
		if let Some(a) = self.a.filter(|&a| a != ' ') { self.echo(a); }
		if let Some(b) = self.b { self.echo(b); }

		let start = self.pos;
		let mut class = false;
		loop {
			self.a = self.get_char();
			match self.a {
				Some('/') if ! class => break,
				Some('[') => { class = true; },
				Some(']') => { class = false; },
				Some('\\') => {
					self.echo('\\');
					self.a = self.get_char();
				},
				_ => {},
			}

			match self.a {
				Some('\n') | None => return Err(SquishError::UnterminatedRegex(start)),
				Some(c) => { self.echo(c); },
			}
		}

		self.b = self.get_real()?;
		Ok(())
	}

	/// # Ends in Keyword?
	///
	/// Check whether the output (plus any pending character) ends with one of
	/// the keywords a regular expression can follow.
	fn ends_in_keyword(&self, pending: Option<char>) -> bool {
		let mut tail = self.out.chars()
			.rev()
			.take(16)
			.collect::<Vec<char>>();
		tail.reverse();
		if let Some(c) = pending { tail.push(c); }
		if tail.last() == Some(&' ') { tail.pop(); }

		KEYWORDS.iter().any(|kw| {
			let len = kw.chars().count();
			tail.len() >= len &&
			tail[tail.len() - len..].iter().copied().eq(kw.chars()) &&
			tail.len().checked_sub(len + 1).is_none_or(|idx| ! is_word(tail[idx]))
		})
	}
}



/// # Normalize Character.
const fn normalize(c: char) -> char {
	match c {
		'\r' | '\n' => '\n',
		c if (c as u32) < 0x20 => ' ',
		c => c,
	}
}

/// # Is Word Character?
const fn is_word(c: char) -> bool {
	c.is_ascii_alphanumeric() || matches!(c, '_' | '$')
}

/// # Is Alphanumeric?
///
/// This is broader than the name suggests; it covers anything that can't be
/// safely glued to a neighboring identifier.
fn is_alphanumeric(c: char) -> bool {
	c.is_alphanumeric() || matches!(c, '_' | '$' | '\\' | '/') || ! c.is_ascii()
}



#[cfg(test)]
mod tests {
	use super::*;

	/// # Shorthand.
	fn min(src: &str) -> String { JsMinifier::new(src).minify().unwrap() }

	#[test]
	fn t_whitespace() {
		assert_eq!(min("var  x =  1 ;\n\n\tvar y = 2;"), "var x=1;var y=2;");
		assert_eq!(min("if ( a ) {\n\tb();\n}\n"), "if(a){b();}");
		assert_eq!(min(""), "");
	}

	#[test]
	fn t_newlines() {
		// These lines can't be joined without changing their meaning.
		assert_eq!(min("a = b\n(c)"), "a=b\n(c)");
		assert_eq!(min("a = b\n[c]"), "a=b\n[c]");
		assert_eq!(min("a\n++b"), "a\n++b");
		assert_eq!(min("return\nx"), "return\nx");

		// But these can.
		assert_eq!(min("a = b;\n(c)"), "a=b;(c)");
		assert_eq!(min("x = {\n\ta: 1\n}"), "x={a:1}");
	}

	#[test]
	fn t_comments() {
		assert_eq!(min("a(); // Hello.\nb();"), "a();b();");
		assert_eq!(min("a(); /* Hello.\n */ b();"), "a();b();");
		assert_eq!(min("a();/**/b();"), "a();b();");
		assert_eq!(min("a(); // Trailing."), "a();");

		// Flagged comments.
		assert_eq!(min("/*! License */\nvar a;"), "/*! License */\nvar a;");
		assert_eq!(
			JsMinifier::new("/*! License */\nvar a;").with_flagged_comments(false).minify().unwrap(),
			"var a;",
		);
		assert_eq!(
			JsMinifier::new("/*@cc_on x @*/").with_flagged_comments(false).minify().unwrap(),
			"/*@cc_on x @*/",
		);
	}

	#[test]
	fn t_strings() {
		assert_eq!(min("a = \"b  // c\";"), "a=\"b  // c\";");
		assert_eq!(min("a = 'it\\'s /* x */';"), "a='it\\'s /* x */';");
		assert_eq!(min("a = `x\n  y`;"), "a=`x\n  y`;");

		// Escaped line breaks are dropped.
		assert_eq!(min("a = 'x\\\ny';"), "a='xy';");
	}

	#[test]
	fn t_regex() {
		assert_eq!(min("a = b.replace(/ +/g, '');"), "a=b.replace(/ +/g,'');");
		assert_eq!(min("return /x\\/y/.test(s);"), "return/x\\/y/.test(s);");
		assert_eq!(min("x = typeof /a/;"), "x=typeof/a/;");
		assert_eq!(min("a = /[/]/;"), "a=/[/]/;");

		assert_eq!(min("x = [/'/];"), "x=[/'/];");

		// Division isn't a regex.
		assert_eq!(min("a = b / c / d;"), "a=b / c / d;");

		// Not even when a string is doing the dividing.
		assert_eq!(min("x = y/'2';\nz();"), "x=y/'2';z();");
		assert_eq!(min("x = y/\"2\" + 1;\nz = 3 / 4;"), "x=y/\"2\"+1;z=3 / 4;");
	}

	#[test]
	fn t_signs() {
		assert_eq!(min("a = b - -c;"), "a=b- -c;");
		assert_eq!(min("a = b + +c;"), "a=b+ +c;");
		assert_eq!(min("a = b + c;"), "a=b+c;");
	}

	#[test]
	fn t_errors() {
		assert_eq!(
			JsMinifier::new("a = 'b;\nc();").minify(),
			Err(SquishError::UnterminatedString(4)),
		);
		assert_eq!(
			JsMinifier::new("a = /b;\nc();").minify(),
			Err(SquishError::UnterminatedRegex(4)),
		);
		assert_eq!(
			JsMinifier::new("a(); /* b").minify(),
			Err(SquishError::UnterminatedComment(5)),
		);
	}

	#[test]
	fn t_keywords() {
		let kw: Vec<&str> = KEYWORDS.to_vec();
		let mut sorted = kw.clone();
		sorted.sort_unstable();
		assert_eq!(kw, sorted, "Keywords should be sorted.");
	}
}
