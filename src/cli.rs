/*!
# Squish: CLI.
*/

use clap::Parser;
use squish::SquishError;
use std::path::PathBuf;



#[derive(Parser, Debug)]
#[command(name = "squish", version)]
#[command(about = "Merge and minify CSS stylesheets and JavaScript sources.", long_about = None)]
/// # Command Line Arguments.
pub(super) struct Cli {
	/// Any number of files and/or directories to crawl for .css and .js sources.
	#[arg(value_name = "PATH(S)")]
	pub(super) paths: Vec<PathBuf>,

	/// Read (absolute) file and/or directory paths from this text file, one entry
	/// per line.
	#[arg(short, long, value_name = "FILE")]
	pub(super) list: Option<PathBuf>,

	/// Merge every CSS source into this one stylesheet rather than minifying
	/// each in place.
	#[arg(short, long, value_name = "FILE")]
	pub(super) bundle: Option<PathBuf>,

	/// Treat conflicting @charset statements as an error when bundling.
	#[arg(long)]
	pub(super) strict: bool,

	/// Remove /*! ... */ license comments too.
	#[arg(long)]
	pub(super) strip_license: bool,
}

impl Cli {
	/// # All Paths.
	///
	/// Return the positional paths along with any read from the list file.
	/// Blank lines in the list are ignored.
	///
	/// ## Errors
	///
	/// Returns an error if the list file can't be read.
	pub(super) fn all_paths(&self) -> Result<Vec<PathBuf>, SquishError> {
		let mut out = self.paths.clone();
		if let Some(list) = self.list.as_deref() {
			let raw = std::fs::read_to_string(list)
				.map_err(|_| SquishError::Read(list.to_path_buf()))?;
			out.extend(
				raw.lines()
					.map(str::trim)
					.filter(|l| ! l.is_empty())
					.map(PathBuf::from)
			);
		}
		Ok(out)
	}
}



#[cfg(test)]
mod tests {
	use super::*;
	use std::ffi::OsStr;

	#[test]
	fn t_args() {
		let cli = Cli::try_parse_from(["squish", "-b", "out.css", "--strict", "a.css", "js/"]).unwrap();
		assert_eq!(cli.paths, [PathBuf::from("a.css"), PathBuf::from("js/")]);
		assert_eq!(cli.bundle, Some(PathBuf::from("out.css")));
		assert!(cli.strict);
		assert!(! cli.strip_license);
		assert!(cli.list.is_none());
	}

	#[test]
	fn t_list() {
		let dir = tempfile::tempdir().unwrap();
		let list = dir.path().join("list.txt");
		std::fs::write(&list, "one.css\n\n  two.js  \n").unwrap();

		let cli = Cli::try_parse_from([
			OsStr::new("squish"),
			OsStr::new("-l"),
			list.as_os_str(),
			OsStr::new("zero.css"),
		]).unwrap();

		assert_eq!(cli.all_paths().unwrap(), [
			PathBuf::from("zero.css"),
			PathBuf::from("one.css"),
			PathBuf::from("two.js"),
		]);
	}

	#[test]
	fn t_list_missing() {
		let dir = tempfile::tempdir().unwrap();
		let list = dir.path().join("nope.txt");
		let cli = Cli::try_parse_from([
			OsStr::new("squish"),
			OsStr::new("--list"),
			list.as_os_str(),
		]).unwrap();

		assert_eq!(cli.all_paths(), Err(SquishError::Read(list)));
	}
}
