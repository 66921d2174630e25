/*!
# Squish

`Squish` merges and minifies CSS stylesheets, and minifies JavaScript.

Stylesheets get the full treatment: each source is pre-minified, parsed into
a tree of rules, merged with its siblings into a single ordered rule set, and
written back out with identical bodies combined. See [`css`] for the gory
details, or just call [`css::compile`].

JavaScript is handled by a conservative, single-pass [`js::JsMinifier`] that
strips comments and whitespace without otherwise rewriting any code.

Like its cousins, `Squish` would rather save a few bytes less than break
something. Sources that fail to parse are reported as errors rather than
mangled.



## Examples

```
let css = squish::css::compile([
    ("base.css", "body { margin: 0px; }"),
    ("theme.css", ":root { --accent: #ff0000; } body { color: #333333; }"),
], false).unwrap();
assert_eq!(css, ":root{--accent:#f00}body{margin:0;color:#333}");

let js = squish::js::JsMinifier::new("var a = 1;  // One.\nvar b = 2;")
    .minify()
    .unwrap();
assert_eq!(js, "var a=1;var b=2;");
```
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
#![warn(unused_extern_crates)]
#![warn(unused_import_braces)]

#![allow(clippy::module_name_repetitions)]



pub mod css;
mod error;
pub mod js;
pub mod report;
pub mod trim;

pub use error::SquishError;
