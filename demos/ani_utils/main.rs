//! ANI CLI Utility
//!
//! A command-line tool for inspecting, simulating and rendering `.ani`
//! animations.
//!
//! # Features
//!
//! - **dump**: List every chunk and record, as text or JSON
//! - **play**: Simulate playback and print triggers and colliders per tick
//! - **render**: Draw one frame onto a screen-sized framebuffer and save it as PNG
//!
//! # Player configuration
//!
//! `play` reads an optional TOML file and `PDANI_` environment variables:
//!
//! ```toml
//! loop_type = "one_shot"
//! frame_skippable = false
//! flip = "HORIZONTAL"
//! ```
//!
//! # Usage
//!
//! ```bash
//! # Dump a file
//! cargo run --example ani_utils -- dump miata.ani
//!
//! # Dump as JSON
//! cargo run --example ani_utils -- dump miata.ani --json
//!
//! # Play the "drift" tag for 20 ticks of 33 ms
//! cargo run --example ani_utils -- play miata.ani --tag drift --steps 20 --dt 33
//!
//! # Render frame 3 mirrored, using the PNG atlas (alpha is the mask)
//! cargo run --example ani_utils -- render miata.ani miata.png --frame 3 --flip-h -o out.png
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use image::{GrayImage, Luma};
use log::{debug, info};
use pdani_rs::prelude::*;
use serde::Serialize;

fn main() -> Result<()> {
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();
	match cli.command {
		Command::Dump(args) => run_dump(args),
		Command::Play(args) => run_play(args),
		Command::Render(args) => run_render(args),
	}
}

#[derive(Parser)]
#[command(name = "ani_utils")]
#[command(author = "pdani-rs project")]
#[command(version)]
#[command(about = "Inspect, simulate and render .ani animations", long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// List every chunk header and record of a file
	Dump(DumpArgs),
	/// Simulate playback and print triggers and colliders
	Play(PlayArgs),
	/// Render one frame to a PNG
	Render(RenderArgs),
}

#[derive(Args)]
struct DumpArgs {
	/// Path to the .ani file
	#[arg(value_name = "FILE")]
	file: PathBuf,

	/// Print JSON instead of text
	#[arg(long, default_value_t = false)]
	json: bool,
}

#[derive(Args)]
struct PlayArgs {
	/// Path to the .ani file
	#[arg(value_name = "FILE")]
	file: PathBuf,

	/// Tag to play (whole file when omitted)
	#[arg(short, long)]
	tag: Option<String>,

	/// Number of ticks to simulate
	#[arg(short, long, default_value_t = 30)]
	steps: usize,

	/// Milliseconds per tick
	#[arg(long, default_value_t = 33, env = "PDANI_DT")]
	dt: u32,

	/// Player configuration (TOML)
	#[arg(short, long, value_name = "TOML")]
	config: Option<PathBuf>,

	/// Stop on the last frame instead of looping
	#[arg(long, default_value_t = false)]
	one_shot: bool,

	/// Cross at most one frame per tick
	#[arg(long, default_value_t = false)]
	no_skip: bool,

	#[command(flatten)]
	flip: FlipArgs,
}

#[derive(Args)]
struct RenderArgs {
	/// Path to the .ani file
	#[arg(value_name = "ANI")]
	file: PathBuf,

	/// Companion atlas; alpha selects the mask, luminance the colour
	#[arg(value_name = "PNG")]
	atlas: PathBuf,

	/// Frame number (1-based)
	#[arg(short, long, default_value_t = 1)]
	frame: u16,

	/// Output PNG path
	#[arg(short, long, default_value = "frame.png")]
	output: PathBuf,

	/// World x of the animation origin
	#[arg(short = 'x', long, default_value_t = 0, allow_negative_numbers = true)]
	x: i32,

	/// World y of the animation origin
	#[arg(short = 'y', long, default_value_t = 0, allow_negative_numbers = true)]
	y: i32,

	#[command(flatten)]
	flip: FlipArgs,
}

#[derive(Args)]
struct FlipArgs {
	/// Mirror horizontally
	#[arg(long, default_value_t = false)]
	flip_h: bool,

	/// Mirror vertically
	#[arg(long, default_value_t = false)]
	flip_v: bool,
}

impl FlipArgs {
	fn flip(&self) -> Flip {
		Flip::from_axes(self.flip_h, self.flip_v)
	}
}

// Dump

#[derive(Serialize)]
struct FileReport<'f> {
	magic: String,
	version: u32,
	info: file::ani::Info,
	chunks: Vec<ChunkReport>,
	tags: Vec<TagReport<'f>>,
	layers: Vec<LayerReport<'f>>,
	frames: Vec<FrameReport<'f>>,
	images: &'f [file::ani::Image],
	cels: &'f [file::ani::Cel],
	colliders: &'f [file::ani::Collider],
}

#[derive(Serialize)]
struct ChunkReport {
	kind: String,
	offset: usize,
	size: u16,
	count: u16,
}

#[derive(Serialize)]
struct TagReport<'f> {
	name: &'f str,
	from: u16,
	to: u16,
}

#[derive(Serialize)]
struct LayerReport<'f> {
	name: &'f str,
	kind: LayerType,
	parent: i8,
	layer_count: u16,
}

#[derive(Serialize)]
struct FrameReport<'f> {
	number: u16,
	duration: u16,
	triggers: Vec<&'f str>,
	colliders: Vec<ColliderHit<'f>>,
}

fn build_report<'f>(file: &'f AniFile<'_>) -> Result<FileReport<'f>> {
	let header = file.header();

	let tags = (0..file.tag_count().unwrap_or_default())
		.map(|i| {
			let tag = file.tag(i)?;
			Ok(TagReport {
				name: file.tag_name(i)?,
				from: tag.from,
				to: tag.to,
			})
		})
		.collect::<Result<Vec<_>>>()?;

	let layers = (0..file.layer_count().unwrap_or_default())
		.map(|i| {
			let layer = file.layer(i)?;
			Ok(LayerReport {
				name: file.layer_name(i)?,
				kind: layer.kind,
				parent: layer.parent,
				layer_count: layer.layer_count,
			})
		})
		.collect::<Result<Vec<_>>>()?;

	let frame_count = u16::try_from(file.frame_count().unwrap_or_default())?;
	let frames = (1..=frame_count)
		.map(|number| {
			Ok(FrameReport {
				number,
				duration: file.frame(number)?.duration,
				triggers: file.triggers(number)?.collect(),
				colliders: file.collisions(number, 0, 0, Flip::empty())?.collect(),
			})
		})
		.collect::<Result<Vec<_>>>()?;

	Ok(FileReport {
		magic: hex::encode(header.id),
		version: header.version,
		info: *file.info(),
		chunks: file
			.chunks()
			.iter()
			.map(|chunk| ChunkReport {
				kind: chunk.kind.to_string(),
				offset: chunk.offset,
				size: chunk.size,
				count: chunk.count(),
			})
			.collect(),
		tags,
		layers,
		frames,
		images: file.images().unwrap_or_default(),
		cels: file.cels().unwrap_or_default(),
		colliders: file.colliders_table().unwrap_or_default(),
	})
}

fn run_dump(args: DumpArgs) -> Result<()> {
	let file = open(&args.file)?;

	if args.json {
		let report = build_report(&file)?;
		println!("{}", serde_json::to_string_pretty(&report)?);
	} else {
		println!("magic: {}", hex::encode(file.header().id));
		print!("{}", file.dump());
	}

	Ok(())
}

// Play

fn load_config(args: &PlayArgs) -> Result<PlayerConfig> {
	let mut builder = config::Config::builder();
	if let Some(path) = &args.config {
		builder = builder.add_source(config::File::from(path.as_path()));
	}
	let mut config: PlayerConfig = builder
		.add_source(config::Environment::with_prefix("PDANI").ignore_empty(true))
		.build()
		.context("Failed to load player configuration")?
		.try_deserialize()
		.context("Invalid player configuration")?;

	if args.one_shot {
		config.loop_type = LoopType::OneShot;
	}
	if args.no_skip {
		config.frame_skippable = false;
	}
	if args.flip.flip_h || args.flip.flip_v {
		config.flip = args.flip.flip();
	}

	Ok(config)
}

fn run_play(args: PlayArgs) -> Result<()> {
	let config = load_config(&args)?;
	debug!("player configuration: {config:?}");
	let mut player = Player::from_file(open(&args.file)?, config)?;

	player
		.play(args.tag.as_deref())
		.with_context(|| format!("Cannot play {}", args.tag.as_deref().unwrap_or("<all>")))?;
	println!(
		"Playing frames {}..={} ({:?}, skippable: {}, flip: {:?})",
		player.start_frame(),
		player.end_frame(),
		player.loop_type(),
		player.frame_skippable(),
		player.flip()
	);

	for step in 0..args.steps {
		if !player.is_playing() {
			info!("Stopped on frame {}", player.frame_number());
			break;
		}

		player.advance(args.dt, |_, frame, trigger| {
			println!("  [{step:>4}] trigger \"{trigger}\" on frame {frame}");
		})?;
		player.check_collision(0, 0, |_, hit| {
			println!(
				"  [{step:>4}] collider \"{}\" at ({}, {}) {}x{}",
				hit.name, hit.x, hit.y, hit.w, hit.h
			);
		})?;
		println!(
			"[{step:>4}] t={:>6} ms frame {:>3} (+{} ms)",
			player.total_elapsed(),
			player.frame_number(),
			player.frame_elapsed()
		);
	}

	Ok(())
}

// Render

fn load_atlas(path: &Path) -> Result<Bitmap<'static>> {
	let img = image::open(path)
		.with_context(|| format!("Failed to open atlas {}", path.display()))?
		.to_luma_alpha8();
	let (width, height) = img.dimensions();

	Ok(Bitmap::from_fn(width as usize, height as usize, |x, y| {
		let pixel = img.get_pixel(x as u32, y as u32);
		(pixel[0] >= 128, pixel[1] >= 128)
	}))
}

fn run_render(args: RenderArgs) -> Result<()> {
	let bitmap = load_atlas(&args.atlas)?;
	let file = open(&args.file)?.with_bitmap(bitmap)?;

	let frame_count = file.frame_count()?;
	if args.frame == 0 || usize::from(args.frame) > frame_count {
		bail!("Frame {} out of range 1..={}", args.frame, frame_count);
	}

	let mut plane = vec![0u8; SCREEN_ROW_BYTES * SCREEN_HEIGHT];
	let mut screen = Framebuffer::screen(&mut plane)?;
	screen.fill(0xFF);
	file.draw(&mut screen, args.x, args.y, args.frame, args.flip.flip())?;

	let img = GrayImage::from_fn(SCREEN_WIDTH as u32, SCREEN_HEIGHT as u32, |x, y| {
		Luma([if screen.get_pixel(x as usize, y as usize) {
			255
		} else {
			0
		}])
	});
	img.save(&args.output)
		.with_context(|| format!("Failed to write {}", args.output.display()))?;
	info!("Saved frame {} to {}", args.frame, args.output.display());

	Ok(())
}

fn open(path: &Path) -> Result<AniFile<'static>> {
	let file = AniFile::open(path).with_context(|| format!("Failed to decode {}", path.display()))?;
	info!(
		"Decoded {}: {} bytes, {} chunks",
		path.display(),
		file.as_bytes().len(),
		file.chunks().len()
	);
	Ok(file)
}
