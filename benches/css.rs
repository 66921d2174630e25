/*!
# Benchmark: `squish::css`
*/

use criterion::{
	Criterion,
	criterion_group,
	criterion_main,
};
use squish::css::{
	Parser,
	PreminifyOptions,
	preminify,
};
use std::hint::black_box;



const THEME: &str = include_str!("../skel/test-assets/theme.css");
const LAYOUT: &str = include_str!("../skel/test-assets/layout.css");



fn preminify_css(c: &mut Criterion) {
	let mut group = c.benchmark_group("squish::css::preminify");

	group.bench_function("layout.css", move |b| {
		b.iter(|| preminify(black_box(LAYOUT), PreminifyOptions::default()))
	});

	group.finish();
}

fn parse(c: &mut Criterion) {
	let mut group = c.benchmark_group("squish::css::Parser");

	let src = preminify(LAYOUT, PreminifyOptions { keep_license: false });
	group.bench_function("layout.css", move |b| {
		b.iter(|| Parser::new(black_box(&src)).parse())
	});

	group.finish();
}

fn compile(c: &mut Criterion) {
	let mut group = c.benchmark_group("squish::css::compile");

	group.bench_function("theme.css + layout.css", move |b| {
		b.iter(|| squish::css::compile(
			black_box([("theme.css", THEME), ("layout.css", LAYOUT)]),
			false,
		))
	});

	group.finish();
}



criterion_group!(
	benches,
	preminify_css,
	parse,
	compile,
);
criterion_main!(benches);
