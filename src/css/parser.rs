/*!
# Squish: CSS Parser.

This turns one flattened (pre-minified) stylesheet into an ordered tree of
[`Rule`], [`Block`], and [`Statement`] nodes.
*/

use crate::{
	css::syntax::{
		Block,
		Node,
		Rule,
		Statement,
		Tree,
	},
	SquishError,
};



/// # Iteration Failsafe.
///
/// Each parser instance gives up after this many passes, returning whatever
/// it has collected so far.
pub const FAILSAFE: usize = 512;

/// # Maximum Nesting Depth.
pub const MAX_DEPTH: usize = 64;



#[derive(Debug)]
/// # Parser.
///
/// Parsers are single-use: the CSS is consumed left-to-right as nodes are
/// matched. Nested blocks get a fresh parser of their own.
///
/// ## Examples
///
/// ```
/// use squish::css::{Node, Parser};
///
/// let tree = Parser::new("@charset utf-8;body{color:#000}").parse().unwrap();
/// assert!(matches!(tree["@charset"], Node::Statement(_)));
/// assert!(matches!(tree["body"], Node::Rule(_)));
/// ```
pub struct Parser<'a> {
	/// # Unparsed Remainder.
	css: &'a str,

	/// # Nesting Depth.
	depth: usize,

	/// # Iterations.
	iteration: usize,

	/// # Failsafe Reached?
	truncated: bool,
}

impl<'a> Parser<'a> {
	#[must_use]
	/// # New.
	pub const fn new(css: &'a str) -> Self { Self::new_nested(css, 0) }

	#[must_use]
	/// # New (Nested).
	const fn new_nested(css: &'a str, depth: usize) -> Self {
		Self {
			css,
			depth,
			iteration: 0,
			truncated: false,
		}
	}

	#[must_use]
	/// # Truncated?
	///
	/// Returns `true` if the iteration failsafe kicked in before the source
	/// was fully consumed.
	pub const fn truncated(&self) -> bool { self.truncated }

	/// # Parse.
	///
	/// ## Errors
	///
	/// Unbalanced braces, declarations without colons, invalid at-rule
	/// identifiers, and excessive nesting are all fatal.
	pub fn parse(&mut self) -> Result<Tree, SquishError> {
		if self.depth > MAX_DEPTH {
			return Err(SquishError::TooDeep(self.css.to_owned()));
		}
		validate(self.css)?;

		let mut tree = Tree::new();
		loop {
			self.css = self.css.trim_start();
			if self.css.is_empty() { break; }

			self.iteration += 1;
			if self.iteration > FAILSAFE {
				self.truncated = true;
				log::warn!(
					"CSS parsing stopped after {FAILSAFE} iterations; {} bytes were left unparsed.",
					self.css.len(),
				);
				break;
			}

			// A semicolon before any opening brace can only be a statement.
			if self.next_is_statement() {
				let statement = self.extract_statement();
				if statement != ";" {
					let statement = Statement::from_source(statement)?;
					tree.insert(statement.key(), Node::Statement(statement));
				}
				continue;
			}

			// If there are no groups left to extract, we're done.
			let Some((selector, body)) = self.extract_group() else { break; };
			if body.contains('{') {
				let children = Self::new_nested(body, self.depth + 1).parse()?;
				let block = Block::new(selector, children);
				tree.insert(block.selector.clone(), Node::Block(block));
			}
			else {
				let rule = Rule::new(selector, body)?;
				tree.insert(rule.selector.clone(), Node::Rule(rule));
			}
		}

		Ok(tree)
	}

	/// # Next Marker is `;`?
	///
	/// Find the first `@`, `{`, `}`, and `;`; return true if the semicolon
	/// comes first.
	fn next_is_statement(&self) -> bool {
		self.css.bytes()
			.find(|b| matches!(b, b'@' | b'{' | b'}' | b';'))
			.is_some_and(|b| b == b';') ||
		// The leading "@" doesn't count.
		(
			self.css.starts_with('@') &&
			self.css[1..].bytes()
				.find(|b| matches!(b, b'@' | b'{' | b'}' | b';'))
				.is_some_and(|b| b == b';')
		)
	}

	/// # Extract Statement.
	///
	/// Remove and return everything up to and including the next `;`.
	fn extract_statement(&mut self) -> &'a str {
		let end = self.css.find(';').map_or(self.css.len(), |idx| idx + 1);
		let (statement, rest) = self.css.split_at(end);
		self.css = rest;
		statement
	}

	/// # Extract Rule Group.
	///
	/// Remove and return the next `selector{…}` group, split into its
	/// selector and body, matching nested braces. If there is no such group
	/// the remainder is discarded.
	fn extract_group(&mut self) -> Option<(&'a str, &'a str)> {
		let css = self.css;
		let open = css.find('{').filter(|&idx| ! css[..idx].trim().is_empty());

		let close = open.and_then(|open| {
			let mut depth = 0_usize;
			for (idx, b) in css.bytes().enumerate().skip(open) {
				match b {
					b'{' => { depth += 1; },
					b'}' => {
						depth -= 1;
						if depth == 0 { return Some(idx); }
					},
					_ => {},
				}
			}
			None
		});

		match open.zip(close) {
			Some((open, close)) => {
				self.css = &css[close + 1..];
				Some((&css[..open], &css[open + 1..close]))
			},
			None => {
				self.css = "";
				None
			},
		}
	}
}



/// # Validate Braces.
///
/// The number of opening and closing braces must match.
fn validate(css: &str) -> Result<(), SquishError> {
	let open = css.bytes().filter(|b| b'{'.eq(b)).count();
	let close = css.bytes().filter(|b| b'}'.eq(b)).count();
	if open == close { Ok(()) }
	else { Err(SquishError::UnbalancedBraces(css.to_owned())) }
}
