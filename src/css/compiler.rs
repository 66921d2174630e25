/*!
# Squish: CSS Compiler.

The compiler merges any number of stylesheets into one ordered [`RuleSet`].
It works in phases:

1. [`Compiler::ingest`] pre-minifies and enqueues each source;
2. [`Compiler::parse_enqueued`] parses each source into its own tree;
3. [`Compiler::merge_rules`] folds the trees together, then deduplicates and
   reorders the result;
4. [`Compiler::generate_stylesheet`] hands the result to the assembler.
*/

use crate::{
	css::{
		Assembler,
		Node,
		Parser,
		PreminifyOptions,
		Statement,
		Tree,
		preminify,
	},
	SquishError,
};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;



/// # Theme Selector.
static RE_THEME: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[theme=.+?\]").unwrap());

/// # Simple (Tag) Selector.
static RE_SIMPLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z][^.:>~]*$").unwrap());

/// # Rule Body.
///
/// Properties (or nested selectors) in order.
pub type Body = IndexMap<String, Value>;



#[derive(Debug, Clone, Eq, PartialEq)]
/// # Body Value.
pub enum Value {
	/// # Property Value.
	Declaration(String),

	/// # Nested Rule Body.
	Nested(Body),
}

impl From<&str> for Value {
	fn from(src: &str) -> Self { Self::Declaration(src.to_owned()) }
}



#[derive(Debug, Clone, Default, Eq, PartialEq)]
/// # Merged Rule Set.
///
/// This is what the compiler produces and the assembler consumes.
pub struct RuleSet {
	/// # Character Set (Lowercase).
	pub charset: Option<String>,

	/// # Imports.
	pub imports: Vec<Statement>,

	/// # Other Body-less At-Rules.
	pub statements: Vec<Statement>,

	/// # Rules and Blocks.
	pub rules: IndexMap<String, Body>,
}

impl RuleSet {
	#[must_use]
	/// # Is Empty?
	pub fn is_empty(&self) -> bool {
		self.charset.is_none() &&
		self.imports.is_empty() &&
		self.statements.is_empty() &&
		self.rules.is_empty()
	}
}



#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd)]
/// # Compiler Stage.
enum Stage {
	/// # Accepting Sources.
	Ingest,

	/// # Sources Parsed.
	Parsed,

	/// # Rules Merged.
	Merged,

	/// # Stylesheet Generated.
	Generated,
}



#[derive(Debug, Clone)]
/// # Compiler.
///
/// ## Examples
///
/// ```
/// use squish::css::Compiler;
///
/// let mut compiler = Compiler::new();
/// compiler.ingest([
///     ("a.css", "div { color: red }"),
///     ("b.css", "div { margin: 0 }"),
/// ]).unwrap()
///     .parse_enqueued().unwrap()
///     .merge_rules().unwrap()
///     .generate_stylesheet().unwrap();
///
/// assert_eq!(compiler.css(), Some("div{color:red;margin:0}"));
/// ```
pub struct Compiler {
	/// # Strict Mode.
	strict: bool,

	/// # Stage.
	stage: Stage,

	/// # Pre-Minified Sources.
	enqueued: IndexMap<String, String>,

	/// # Parsed Sources.
	ast: IndexMap<String, Tree>,

	/// # Merged Rules.
	rules: RuleSet,

	/// # Output.
	css: Option<String>,
}

impl Default for Compiler {
	fn default() -> Self { Self::new() }
}

impl Compiler {
	#[must_use]
	/// # New.
	pub fn new() -> Self {
		Self {
			strict: false,
			stage: Stage::Ingest,
			enqueued: IndexMap::new(),
			ast: IndexMap::new(),
			rules: RuleSet::default(),
			css: None,
		}
	}

	#[must_use]
	/// # With Strict Mode.
	///
	/// When enabled, a second `@charset` with a different value is an error
	/// rather than being silently ignored.
	pub const fn with_strict(mut self, strict: bool) -> Self {
		self.strict = strict;
		self
	}

	/// # Ingest Sources.
	///
	/// Pre-minify and enqueue each `(key, css)` pair. Sources that are empty
	/// after minification are skipped, as are repeated keys.
	///
	/// ## Errors
	///
	/// Sources can only be added before parsing begins.
	pub fn ingest<I, K, V>(&mut self, sources: I) -> Result<&mut Self, SquishError>
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: AsRef<str>,
	{
		if self.stage != Stage::Ingest { return Err(SquishError::Phase("ingest")); }

		let opts = PreminifyOptions { keep_license: false };
		for (key, css) in sources {
			let key: String = key.into();
			if self.enqueued.contains_key(&key) {
				log::info!("The {key} stylesheet was already enqueued.");
				continue;
			}

			let css = preminify(css.as_ref(), opts);
			if css.is_empty() {
				log::info!("The {key} stylesheet is empty after minification.");
				continue;
			}

			self.enqueued.insert(key, css);
		}

		Ok(self)
	}

	/// # Parse Enqueued.
	///
	/// ## Errors
	///
	/// This will return an error if called more than once, or if any of the
	/// sources fail to parse.
	pub fn parse_enqueued(&mut self) -> Result<&mut Self, SquishError> {
		if self.stage != Stage::Ingest { return Err(SquishError::Phase("parse_enqueued")); }

		for (key, css) in &self.enqueued {
			let mut parser = Parser::new(css);
			let tree = parser.parse()?;
			if parser.truncated() {
				log::warn!("The {key} stylesheet was only partially parsed.");
			}
			self.ast.insert(key.clone(), tree);
		}

		self.stage = Stage::Parsed;
		Ok(self)
	}

	/// # Merge Rules.
	///
	/// Fold the parsed trees into a single rule set, later sources overriding
	/// earlier ones property by property.
	///
	/// ## Errors
	///
	/// This will return an error if called before parsing or more than once,
	/// or in strict mode if conflicting `@charset` rules are encountered.
	pub fn merge_rules(&mut self) -> Result<&mut Self, SquishError> {
		if self.stage != Stage::Parsed { return Err(SquishError::Phase("merge_rules")); }

		let mut rules: IndexMap<String, Body> = IndexMap::new();
		for tree in std::mem::take(&mut self.ast).into_values() {
			for (selector, node) in tree {
				match node {
					Node::Statement(st) => self.handle_statement(st)?,
					node => {
						let body = compile_node(node);
						if let Some(old) = rules.get_mut(&selector) { merge_body(old, body); }
						else { rules.insert(selector, body); }
					},
				}
			}
		}

		deduplicate(&mut rules);
		self.rules.rules = sort_rules(rules);
		if self.rules.is_empty() { log::warn!("The stylesheets were all empty."); }

		self.stage = Stage::Merged;
		Ok(self)
	}

	/// # Generate Stylesheet.
	///
	/// Calling this more than once is fine; the result is cached.
	///
	/// ## Errors
	///
	/// This will return an error if the rules have not been merged yet.
	pub fn generate_stylesheet(&mut self) -> Result<&mut Self, SquishError> {
		match self.stage {
			Stage::Generated => Ok(self),
			Stage::Merged => {
				self.css = Some(Assembler::new(&self.rules).build().into_string());
				self.stage = Stage::Generated;
				Ok(self)
			},
			_ => Err(SquishError::Phase("generate_stylesheet")),
		}
	}

	#[must_use]
	/// # Stylesheet.
	///
	/// Returns the generated CSS, if any.
	pub fn css(&self) -> Option<&str> { self.css.as_deref() }

	#[must_use]
	/// # Merged Rules.
	///
	/// This will be empty until [`Compiler::merge_rules`] has been called.
	pub const fn rules(&self) -> &RuleSet { &self.rules }

	/// # Handle Statement.
	fn handle_statement(&mut self, st: Statement) -> Result<(), SquishError> {
		match st.identifier.as_str() {
			"@charset" => {
				let charset = st.rule.to_ascii_lowercase();
				if let Some(old) = self.rules.charset.as_deref() {
					if self.strict && old != charset {
						return Err(SquishError::CharsetConflict(old.to_owned(), charset));
					}
				}
				else { self.rules.charset = Some(charset); }
			},
			"@import" => { self.rules.imports.push(st); },
			_ => { self.rules.statements.push(st); },
		}

		Ok(())
	}
}



/// # Compile Node.
///
/// Convert a rule or block into a (possibly nested) body.
fn compile_node(node: Node) -> Body {
	match node {
		Node::Rule(rule) => rule.declarations.into_iter()
			.map(|(k, v)| (k, Value::Declaration(v)))
			.collect(),
		Node::Block(block) => block.children.into_iter()
			.filter_map(|(k, child)|
				if let Node::Statement(st) = child {
					log::warn!("Dropped {} statement nested inside {}.", st.identifier, block.selector);
					None
				}
				else { Some((k, Value::Nested(compile_node(child)))) }
			)
			.collect(),
		Node::Statement(_) => Body::new(),
	}
}

/// # Merge Bodies.
///
/// Properties from `src` replace same-named properties in `dst` (keeping
/// their original position) or are appended. Nested bodies are merged the
/// same way.
fn merge_body(dst: &mut Body, src: Body) {
	for (key, value) in src {
		match value {
			Value::Nested(new) if matches!(dst.get(&key), Some(Value::Nested(_))) => {
				if let Some(Value::Nested(old)) = dst.get_mut(&key) { merge_body(old, new); }
			},
			value => { dst.insert(key, value); },
		}
	}
}

/// # Deduplicate Selector Lists.
///
/// Comma-separated selector lists naming the same selectors in a different
/// order are merged into whichever came first.
fn deduplicate(rules: &mut IndexMap<String, Body>) {
	let mut seen: IndexMap<Vec<String>, String> = IndexMap::new();
	let mut dupes: Vec<(String, String)> = Vec::new();

	for selector in rules.keys() {
		if ! selector.contains(',') { continue; }

		let mut parts: Vec<String> = selector.split(',')
			.map(|s| s.trim().to_owned())
			.collect();
		parts.sort_unstable();

		if let Some(first) = seen.get(&parts) { dupes.push((first.clone(), selector.clone())); }
		else { seen.insert(parts, selector.clone()); }
	}

	for (first, dupe) in dupes {
		if
			let Some(body) = rules.shift_remove(&dupe) &&
			let Some(old) = rules.get_mut(&first)
		{
			merge_body(old, body);
		}
	}
}

/// # Sort Rules.
///
/// Reorder the rules into fixed buckets, drop empty ones, and hoist custom
/// properties to the top of each body.
fn sort_rules(rules: IndexMap<String, Body>) -> IndexMap<String, Body> {
	let mut root = Vec::new();
	let mut themes = Vec::new();
	let mut html = Vec::new();
	let mut body = Vec::new();
	let mut html_simple = Vec::new();
	let mut body_simple = Vec::new();
	let mut simple = Vec::new();
	let mut rest = Vec::new();

	for (selector, mut declarations) in rules {
		if declarations.is_empty() { continue; }
		hoist_custom_properties(&mut declarations);

		let entry = (selector, declarations);
		match entry.0.as_str() {
			":root" => root.push(entry),
			"html" => html.push(entry),
			"body" => body.push(entry),
			s if RE_THEME.is_match(s) => themes.push(entry),
			s if RE_SIMPLE.is_match(s) =>
				if s.starts_with("html") { html_simple.push(entry); }
				else if s.starts_with("body") { body_simple.push(entry); }
				else { simple.push(entry); },
			_ => rest.push(entry),
		}
	}

	simple.sort_by(|a, b| a.0.cmp(&b.0));

	root.into_iter()
		.chain(themes)
		.chain(html)
		.chain(body)
		.chain(html_simple)
		.chain(body_simple)
		.chain(simple)
		.chain(rest)
		.collect()
}

/// # Hoist Custom Properties.
///
/// Move `--*` properties ahead of the others, recursively, preserving the
/// relative order of each group.
fn hoist_custom_properties(body: &mut Body) {
	for value in body.values_mut() {
		if let Value::Nested(nested) = value { hoist_custom_properties(nested); }
	}

	if body.keys().any(|k| k.starts_with("--")) {
		let (mut vars, rest): (Body, Body) = std::mem::take(body).into_iter()
			.partition(|(k, _)| k.starts_with("--"));
		vars.extend(rest);
		*body = vars;
	}
}
