//! Mirrored composition against manually mirrored planes

use pdani_rs::prelude::*;
use pdani_types::file::ani::FixtureBuilder;

use crate::planes;

/// Atlas holding an 8x8 cel at `u = 0` and a 5x3 cel at `u = 8`.
fn atlas() -> Bitmap<'static> {
	Bitmap::from_fn(16, 8, |x, y| ((x * 5 + y * 3) % 4 == 1, (x * 3 + y) % 5 != 2))
}

/// Single-cel animation whose bounding box is exactly the cel.
fn single_cel(u: i16, w: u16, h: u16) -> AniFile<'static> {
	let data = FixtureBuilder::new(w, h)
		.layer(LayerType::Layer, -1, "cel")
		.image(u, 0, w, h)
		.cel(0, 0, 0)
		.frame(10, &[(0, None)])
		.build();
	AniFile::from_vec(data).unwrap().with_bitmap(atlas()).unwrap()
}

fn check_symmetry(file: &AniFile<'_>, x: i32, y: i32) {
	let (w, h) = (file.width(), file.height());
	let upright = planes(file, x, y, Flip::empty());
	let at = |plane: &Vec<Vec<(bool, bool)>>, i: i32, j: i32| plane[(y + j) as usize][(x + i) as usize];

	for flip in [Flip::HORIZONTAL, Flip::HORIZONTAL | Flip::VERTICAL, Flip::VERTICAL] {
		let mirrored = planes(file, x, y, flip);
		for j in 0..h {
			for i in 0..w {
				let si = if flip.horizontal() { w - 1 - i } else { i };
				let sj = if flip.vertical() { h - 1 - j } else { j };
				assert_eq!(
					at(&mirrored, i, j),
					at(&upright, si, sj),
					"{w}x{h} at ({x}, {y}) flip {flip:?} pixel ({i}, {j})"
				);
			}
		}

		// Nothing outside the bounding box is touched
		for (py, row) in mirrored.iter().enumerate() {
			for (px, &(_, opaque)) in row.iter().enumerate() {
				let (px, py) = (px as i32, py as i32);
				if px < x || px >= x + w || py < y || py >= y + h {
					assert!(!opaque, "stray pixel ({px}, {py}) flip {flip:?}");
				}
			}
		}
	}
}

#[test]
fn test_aligned_8x8_mirror_symmetry() {
	check_symmetry(&single_cel(0, 8, 8), 8, 2);
}

#[test]
fn test_split_8x8_mirror_symmetry() {
	check_symmetry(&single_cel(0, 8, 8), 11, 3);
}

#[test]
fn test_unaligned_5x3_mirror_symmetry() {
	let file = single_cel(8, 5, 3);
	for x in [0, 3, 8, 13, 27] {
		check_symmetry(&file, x, 4);
	}
}

#[test]
fn test_upright_matches_atlas() {
	let file = single_cel(8, 5, 3);
	let source = atlas();
	let plane = planes(&file, 13, 4, Flip::empty());
	for j in 0..3 {
		for i in 0..5 {
			let (texel, opaque) = plane[4 + j][13 + i];
			assert_eq!(opaque, source.opaque_at(8 + i, j), "pixel ({i}, {j})");
			if opaque {
				assert_eq!(texel, source.texel_at(8 + i, j), "pixel ({i}, {j})");
			}
		}
	}
}
