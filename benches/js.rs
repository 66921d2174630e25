/*!
# Benchmark: `squish::js`
*/

use criterion::{
	Criterion,
	criterion_group,
	criterion_main,
};
use squish::js::JsMinifier;
use std::hint::black_box;



const APP: &str = include_str!("../skel/test-assets/app.js");



fn minify(c: &mut Criterion) {
	let mut group = c.benchmark_group("squish::js::JsMinifier");

	group.bench_function("app.js", move |b| {
		b.iter(|| JsMinifier::new(black_box(APP)).minify())
	});

	group.bench_function("app.js (no flagged comments)", move |b| {
		b.iter(|| JsMinifier::new(black_box(APP)).with_flagged_comments(false).minify())
	});

	group.finish();
}



criterion_group!(
	benches,
	minify,
);
criterion_main!(benches);
