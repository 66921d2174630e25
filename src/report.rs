/*!
# Squish: Savings Report.

Size accounting is handled by [`BeforeAfter`]; this just adds the running
totals needed to combine the results of many files into one summary.
*/

use dactyl::{
	NicePercent,
	traits::NiceInflection,
};
use fyi_msg::BeforeAfter;
use std::fmt;



#[derive(Debug, Clone, Copy, Default, Eq, Hash, PartialEq)]
/// # Size Totals.
///
/// The combined size of one or more files before and after minification.
/// Convert it into a [`BeforeAfter`] for the differences.
///
/// ## Examples
///
/// ```
/// use fyi_msg::BeforeAfter;
/// use squish::report::Savings;
///
/// let savings = Savings::new(200, 150);
/// assert_eq!(BeforeAfter::from(savings).less().map(|n| n.get()), Some(50));
/// assert_eq!(savings.to_string(), "Saved 50 bytes (25.00%).");
/// ```
pub struct Savings {
	/// # Before.
	before: u64,

	/// # After.
	after: u64,
}

impl std::ops::AddAssign for Savings {
	fn add_assign(&mut self, other: Self) {
		self.before += other.before;
		self.after += other.after;
	}
}

impl std::iter::Sum for Savings {
	fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
		iter.fold(Self::default(), |mut acc, s| {
			acc += s;
			acc
		})
	}
}

impl From<Savings> for BeforeAfter {
	fn from(src: Savings) -> Self { Self::from((src.before, src.after)) }
}

impl fmt::Display for Savings {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let ba = BeforeAfter::from(*self);
		match (ba.less(), ba.less_percent()) {
			(Some(less), Some(per)) => write!(
				f,
				"Saved {} ({}).",
				less.get().nice_inflect("byte", "bytes"),
				NicePercent::from(per).as_str(),
			),
			(Some(less), None) => write!(f, "Saved {}.", less.get().nice_inflect("byte", "bytes")),
			(None, _) => f.write_str("No savings."),
		}
	}
}

impl Savings {
	#[must_use]
	/// # New.
	pub const fn new(before: u64, after: u64) -> Self {
		Self { before, after }
	}

	#[must_use]
	/// # From Lengths.
	pub const fn from_lens(before: usize, after: usize) -> Self {
		Self::new(before as u64, after as u64)
	}
}
