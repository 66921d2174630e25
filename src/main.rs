/*!
# Squish

`Squish` is a conservative, in-place minifier for CSS and JavaScript files.

## Use

Toss one or more file or directory paths after the command. Directories are
crawled recursively for `.css` and `.js` files.

```bash
# Crunch one file.
squish /path/to/app.js

# Crunch every stylesheet and script under a directory.
squish /path/to/assets

# Merge all the stylesheets into one, leaving the sources alone.
squish -b /path/to/bundle.css /path/to/css
```

Each file is only rewritten if minification actually changed it, and the
write happens atomically. Files that fail to parse are reported and left
as-was.

In bundle mode, every stylesheet is run through the full merge pipeline,
which means rules for the same selector are combined across files. Scripts
are still minified in place.
*/

#![warn(clippy::filetype_is_file)]
#![warn(clippy::integer_division)]
#![warn(clippy::needless_borrow)]
#![warn(clippy::nursery)]
#![warn(clippy::pedantic)]
#![warn(clippy::perf)]
#![warn(clippy::suboptimal_flops)]
#![warn(clippy::unneeded_field_pattern)]
#![warn(macro_use_extern_crate)]
#![warn(missing_copy_implementations)]
#![warn(missing_debug_implementations)]
#![warn(missing_docs)]
#![warn(non_ascii_idents)]
#![warn(trivial_casts)]
#![warn(trivial_numeric_casts)]
#![warn(unreachable_pub)]
#![warn(unused_crate_dependencies)]
#![warn(unused_extern_crates)]
#![warn(unused_import_braces)]

#![allow(clippy::module_name_repetitions)]



mod cli;
mod minify;

// These are only used by the library.
use indexmap as _;
use once_cell as _;
use regex as _;
#[cfg(test)] use criterion as _;

use clap::Parser;
use cli::Cli;
use dactyl::traits::NiceInflection;
use dowser::Dowser;
use fyi_msg::{
	BeforeAfter,
	Msg,
};
use minify::Kind;
use rayon::iter::{
	IntoParallelRefIterator,
	ParallelIterator,
};
use squish::{
	report::Savings,
	SquishError,
};
use std::{
	path::{
		Path,
		PathBuf,
	},
	process::ExitCode,
};



/// # Main.
fn main() -> ExitCode {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
		.format_timestamp(None)
		.format_target(false)
		.init();

	match _main() {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			log::error!("{e}");
			ExitCode::FAILURE
		},
	}
}

#[inline]
/// # Actual Main.
fn _main() -> Result<(), SquishError> {
	let cli = Cli::parse();
	let keep_license = ! cli.strip_license;

	let paths = cli.all_paths()?;
	let (mut css, js) = crawl(&paths);
	if css.is_empty() && js.is_empty() { return Err(SquishError::NoSources); }

	// A bundle shouldn't include itself.
	if let Some(dst) = cli.bundle.as_deref().and_then(|p| p.canonicalize().ok()) {
		css.retain(|p| p.canonicalize().ok().as_ref() != Some(&dst));
	}

	let mut total = Savings::default();

	// Stylesheets are either bundled or handled like everything else.
	let singles: Vec<(&Path, Kind)> =
		if let Some(dst) = cli.bundle.as_deref() {
			if css.is_empty() { log::warn!("There are no stylesheets to bundle."); }
			else {
				let savings = minify::bundle(css.iter().map(PathBuf::as_path), dst, cli.strict)?;
				log::info!(
					"Bundled {} into {}.",
					css.len().nice_inflect("stylesheet", "stylesheets"),
					dst.display(),
				);
				total += savings;
			}
			js.iter().map(|p| (p.as_path(), Kind::Js)).collect()
		}
		else {
			css.iter().map(|p| (p.as_path(), Kind::Css))
				.chain(js.iter().map(|p| (p.as_path(), Kind::Js)))
				.collect()
		};

	total += singles.par_iter()
		.map(|&(path, kind)| match minify::minify(path, kind, keep_license) {
			Ok(s) => s,
			Err(e) => {
				log::warn!("{}: {e}", path.display());
				Savings::default()
			},
		})
		.sum::<Savings>();

	summary(css.len() + js.len(), total).print();
	Ok(())
}

/// # Summary.
///
/// Build a "Crunched" message for the given number of files, with the bytes
/// saved tacked onto the end.
fn summary(files: usize, total: Savings) -> Msg {
	Msg::crunched(format!("{}.", files.nice_inflect("file", "files")))
		.with_bytes_saved(BeforeAfter::from(total))
}

/// # Crawl.
///
/// Recursively find all the CSS and JS files under the given paths, returning
/// them separately. The lists are sorted so that bundles come out the same
/// way every time.
fn crawl(paths: &[PathBuf]) -> (Vec<PathBuf>, Vec<PathBuf>) {
	let mut css = Vec::new();
	let mut js = Vec::new();

	for path in Dowser::default().with_paths(paths) {
		match Kind::from_path(&path) {
			Some(Kind::Css) => css.push(path),
			Some(Kind::Js) => js.push(path),
			None => {},
		}
	}

	for list in [&mut css, &mut js] {
		list.sort_unstable();
		list.dedup();
	}

	(css, js)
}



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn t_crawl() {
		let dir = tempfile::tempdir().unwrap();
		let sub = dir.path().join("sub");
		std::fs::create_dir(&sub).unwrap();
		for name in ["b.css", "a.CSS", "app.js", "readme.md"] {
			std::fs::write(dir.path().join(name), "").unwrap();
		}
		std::fs::write(sub.join("c.css"), "").unwrap();

		// Listing a file twice shouldn't matter.
		let (css, js) = crawl(&[dir.path().to_path_buf(), sub.join("c.css")]);

		// Crawled paths are canonical.
		let dir = dir.path().canonicalize().unwrap();
		let sub = dir.join("sub");
		assert_eq!(css, [
			dir.join("a.CSS"),
			dir.join("b.css"),
			sub.join("c.css"),
		]);
		assert_eq!(js, [dir.join("app.js")]);
	}

	#[test]
	fn t_summary() {
		let msg = summary(1_200, Savings::new(300, 200));
		assert!(msg.as_str().contains("Crunched:"));
		assert!(msg.as_str().contains("1,200 files."));
		assert!(msg.as_str().contains("Saved 100 bytes, 33.33%."));

		let msg = summary(1, Savings::new(300, 300));
		assert!(msg.as_str().contains("1 file."));
		assert!(msg.as_str().contains("No savings."));
	}
}
