/*!
# Squish: CSS.

Stylesheets are handled in a few distinct steps:

* [`preminify`] strips comments and whitespace from each raw source;
* [`Parser`] turns each source into a tree of rules, blocks, and statements;
* [`Compiler`] merges the trees into a single ordered [`RuleSet`];
* [`Assembler`] serializes that back into CSS.
*/

mod assembler;
mod compiler;
mod parser;
mod preminify;
mod syntax;

pub use assembler::Assembler;
pub use compiler::{
	Body,
	Compiler,
	RuleSet,
	Value,
};
pub use parser::{
	FAILSAFE,
	MAX_DEPTH,
	Parser,
};
pub use preminify::{
	PreminifyOptions,
	preminify,
};
pub use syntax::{
	Block,
	Node,
	Rule,
	Statement,
	Tree,
};



/// # Compile Stylesheets.
///
/// Merge any number of `(key, css)` sources into one minified stylesheet.
///
/// ## Examples
///
/// ```
/// let css = squish::css::compile([
///     ("a.css", ":root{--x:1} div { color: red }"),
///     ("b.css", "div { margin: 0px }"),
/// ], false).unwrap();
///
/// assert_eq!(css, ":root{--x:1}div{color:red;margin:0}");
/// ```
///
/// ## Errors
///
/// Any source that fails to parse will cause the whole thing to fail, as will
/// conflicting `@charset` rules in strict mode.
pub fn compile<I, K, V>(sources: I, strict: bool) -> Result<String, crate::SquishError>
where
	I: IntoIterator<Item = (K, V)>,
	K: Into<String>,
	V: AsRef<str>,
{
	let mut compiler = Compiler::new().with_strict(strict);
	compiler.ingest(sources)?
		.parse_enqueued()?
		.merge_rules()?
		.generate_stylesheet()?;
	Ok(compiler.css().unwrap_or_default().to_owned())
}
