//! Benchmark suite for `.ani` decoding, playback and blitting
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml
//!
//! For flamegraph profiling:
//! cargo bench --manifest-path benches/Cargo.toml -- --profile-time=5

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use pdani_benches::{generate_atlas, generate_test_animation, sizes};
use pdani_types::file::ani::File;
use pdani_types::gfx::{Bitmap, Flip, Framebuffer, Rect, SCREEN_HEIGHT, SCREEN_ROW_BYTES, draw_cel};
use pdani_types::player::Player;
use std::hint::black_box;

const SHAPES: [(&str, (usize, u16)); 3] =
	[("tiny", sizes::TINY), ("character", sizes::CHARACTER), ("boss", sizes::BOSS)];

/// Benchmark decoding of synthetic files
fn bench_decode(c: &mut Criterion) {
	let mut group = c.benchmark_group("ani_decode");

	for (name, (layers, cel_size)) in SHAPES {
		let data = generate_test_animation(layers, 64, cel_size);
		group.throughput(Throughput::Bytes(data.len() as u64));
		group.bench_with_input(BenchmarkId::new("from_bytes", name), &data, |b, data| {
			b.iter(|| black_box(File::from_bytes(black_box(data)).map(|file| file.frame_count())));
		});
	}

	group.finish();
}

/// Benchmark the blitter hot path: aligned, split-byte and mirrored
fn bench_blit(c: &mut Criterion) {
	let mut group = c.benchmark_group("ani_blit");
	let atlas: Bitmap<'static> = generate_atlas(1, 64);
	let region = Rect::new(0, 0, 64, 64);
	let mut plane = vec![0u8; SCREEN_ROW_BYTES * SCREEN_HEIGHT];

	group.throughput(Throughput::Elements(64 * 64));
	let cases = [
		("aligned", 64, Flip::empty()),
		("split", 67, Flip::empty()),
		("split_flip_h", 67, Flip::HORIZONTAL),
		("split_flip_hv", 67, Flip::HORIZONTAL | Flip::VERTICAL),
	];
	for (name, x, flip) in cases {
		group.bench_function(name, |b| {
			let mut screen = Framebuffer::screen(&mut plane).unwrap();
			b.iter(|| {
				draw_cel(&mut screen, &atlas, region, black_box(x), black_box(40), flip);
			});
		});
	}

	group.finish();
}

/// Benchmark whole-frame composition through a player
fn bench_draw_frame(c: &mut Criterion) {
	let mut group = c.benchmark_group("ani_draw");

	for (name, (layers, cel_size)) in SHAPES {
		let data = generate_test_animation(layers, 8, cel_size);
		let file = File::from_vec(data).unwrap().with_bitmap(generate_atlas(layers, cel_size)).unwrap();
		let mut player = Player::new(&file).unwrap();
		player.play(None).unwrap();
		let mut plane = vec![0u8; SCREEN_ROW_BYTES * SCREEN_HEIGHT];

		group.bench_function(name, |b| {
			let mut screen = Framebuffer::screen(&mut plane).unwrap();
			b.iter(|| {
				player.advance(16, |_, _, trigger| {
					black_box(trigger);
				})
				.unwrap();
				player.draw(&mut screen, 101, 37).unwrap();
			});
		});
	}

	group.finish();
}

/// Benchmark advancing and hit testing without drawing
fn bench_advance(c: &mut Criterion) {
	let mut group = c.benchmark_group("ani_advance");
	let data = generate_test_animation(4, 256, 32);
	let file = File::from_bytes(&data).unwrap();

	for dt in [8u32, 33, 500] {
		group.bench_with_input(BenchmarkId::new("advance_collide", dt), &dt, |b, &dt| {
			let mut player = Player::new(&file).unwrap();
			player.play(Some("all")).unwrap();
			b.iter(|| {
				let mut events = 0usize;
				player.advance(dt, |_, _, _| events += 1).unwrap();
				player.check_collision(10, 10, |_, hit| events += hit.w as usize).unwrap();
				black_box(events)
			});
		});
	}

	group.finish();
}

criterion_group!(benches, bench_decode, bench_blit, bench_draw_frame, bench_advance);
criterion_main!(benches);
