/*!
# Squish: Minification.
*/

use squish::{
	css::{
		Compiler,
		PreminifyOptions,
	},
	js::JsMinifier,
	report::Savings,
	SquishError,
};
use std::{
	io::Write,
	path::Path,
};



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Source Kind.
pub(super) enum Kind {
	/// # Stylesheet.
	Css,

	/// # Script.
	Js,
}

impl Kind {
	/// # From Path.
	///
	/// Match the (case-insensitive) file extension.
	pub(super) fn from_path(path: &Path) -> Option<Self> {
		let ext = path.extension()?.to_str()?;
		if ext.eq_ignore_ascii_case("css") { Some(Self::Css) }
		else if ext.eq_ignore_ascii_case("js") { Some(Self::Js) }
		else { None }
	}
}



/// # Minify a File In Place.
///
/// Read the source, minify it, and write it back if (and only if) that
/// actually changed something and didn't make it bigger.
///
/// Stylesheets are only pre-minified here. Merging rules within a single
/// file can reorder them, which is only worth the risk when bundling.
///
/// ## Errors
///
/// This will return an error if the file is unreadable, unparseable, or
/// unsaveable.
pub(super) fn minify(path: &Path, kind: Kind, keep_license: bool) -> Result<Savings, SquishError> {
	let raw = std::fs::read_to_string(path).map_err(|_| SquishError::Read(path.to_path_buf()))?;

	let out = match kind {
		Kind::Css => squish::css::preminify(&raw, PreminifyOptions { keep_license }),
		Kind::Js => JsMinifier::new(&raw).with_flagged_comments(keep_license).minify()?,
	};

	if out.is_empty() || out.len() >= raw.len() {
		log::debug!("{}: nothing to gain.", path.display());
		return Ok(Savings::from_lens(raw.len(), raw.len()));
	}

	save(path, out.as_bytes())?;
	let savings = Savings::from_lens(raw.len(), out.len());
	log::debug!("{}: {savings}", path.display());
	Ok(savings)
}

/// # Bundle Stylesheets.
///
/// Merge every stylesheet into one and save it to `dst`. The sources
/// themselves are left alone.
///
/// ## Errors
///
/// Returns an error if any source is unreadable or unparseable, if there
/// aren't any sources, or if the result can't be saved.
pub(super) fn bundle<'a, I>(paths: I, dst: &Path, strict: bool)
-> Result<Savings, SquishError>
where I: IntoIterator<Item = &'a Path> {
	let mut sources = Vec::new();
	let mut before = 0;
	for path in paths {
		let raw = std::fs::read_to_string(path).map_err(|_| SquishError::Read(path.to_path_buf()))?;
		before += raw.len();
		sources.push((path.to_string_lossy().into_owned(), raw));
	}
	if sources.is_empty() { return Err(SquishError::NoSources); }

	let mut compiler = Compiler::new().with_strict(strict);
	compiler.ingest(sources)?
		.parse_enqueued()?
		.merge_rules()?
		.generate_stylesheet()?;
	let out = compiler.css().unwrap_or_default();

	save(dst, out.as_bytes())?;
	Ok(Savings::from_lens(before, out.len()))
}

/// # Save (Atomically).
///
/// Write the data to a temporary file in the same directory, then move it
/// into place.
fn save(path: &Path, data: &[u8]) -> Result<(), SquishError> {
	let err = || SquishError::Save(path.to_path_buf());
	let dir = path.parent()
		.filter(|p| ! p.as_os_str().is_empty())
		.unwrap_or_else(|| Path::new("."));

	let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|_| err())?;
	tmp.write_all(data).map_err(|_| err())?;
	tmp.persist(path).map_err(|_| err())?;
	Ok(())
}
