//! Drives a random scene for a number of frames and reports pipeline stats.

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use collisions::PhysicsBody;
use common::shapes::Rectangle;
use common::vector::{self, Vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use scene::{EntityId, Scene, SceneConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Random scene driver for the collision pipeline")]
struct Args {
    /// Number of entities to spawn
    #[arg(long, default_value_t = 2000)]
    entities: usize,
    /// Frames to simulate
    #[arg(long, default_value_t = 600)]
    frames: usize,
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Side of the square arena entities spawn in
    #[arg(long, default_value_t = 20_000.0)]
    arena: f32,
    #[arg(long, default_value_t = scene::config::DEFAULT_CHUNK_SIZE)]
    chunk_size: f32,
    /// Frame time in milliseconds
    #[arg(long, default_value_t = 16.0)]
    dt: f32,
    /// Fraction of entities that never move
    #[arg(long, default_value_t = 0.05)]
    fixed_ratio: f64,
    /// Log a summary every this many frames
    #[arg(long, default_value_t = 60)]
    report_every: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = SceneConfig {
        chunk_size: args.chunk_size,
        ..SceneConfig::default()
    };
    let mut scene = Scene::with_config(config).context("building scene")?;
    let mut rng = StdRng::seed_from_u64(args.seed);
    let arena = Rectangle::new(0.0, 0.0, args.arena, args.arena);

    let ids = spawn(&mut scene, &mut rng, &arena, &args);
    info!(entities = ids.len(), seed = args.seed, "spawned scene");

    let start = Instant::now();
    let mut resolved_total = 0;
    for frame in 0..args.frames {
        steer(&mut scene, &mut rng, &ids);

        // Slow orbit so the working set changes over time.
        let t = frame as f32 / args.frames.max(1) as f32 * std::f32::consts::TAU;
        scene.camera_mut().position = Vec2::new(t.cos(), t.sin()) * (args.arena / 4.0);

        let stats = scene
            .step(args.dt)
            .with_context(|| format!("frame {frame}"))?;
        resolved_total += stats.resolved_pairs;

        if args.report_every > 0 && frame % args.report_every == 0 {
            info!(
                frame,
                working_set = stats.working_set,
                chunks = stats.chunk_cols * stats.chunk_rows,
                candidates = stats.broad_phase_candidates,
                exact_tests = stats.narrow_phase.exact_tests,
                circle_rejections = stats.narrow_phase.circle_rejections,
                resolved = stats.resolved_pairs,
                "frame"
            );
        }
    }

    let elapsed = start.elapsed();
    info!(
        frames = args.frames,
        resolved_total,
        elapsed_ms = elapsed.as_secs_f64() * 1000.0,
        per_frame_us = elapsed.as_secs_f64() * 1e6 / args.frames.max(1) as f64,
        "done"
    );
    Ok(())
}

fn spawn(scene: &mut Scene, rng: &mut StdRng, arena: &Rectangle, args: &Args) -> Vec<EntityId> {
    let mut ids = Vec::with_capacity(args.entities);
    for _ in 0..args.entities {
        let width: f32 = rng.gen_range(16.0..96.0);
        let height: f32 = rng.gen_range(16.0..96.0);
        let (x, y) = arena.get_random_point_inside(width.max(height), rng);

        let mut body = PhysicsBody::new(Vec2::new(x, y))
            .with_box_hull(width, height)
            .with_fixed(rng.gen_bool(args.fixed_ratio.clamp(0.0, 1.0)));
        body.rotate(rng.gen_range(0.0..std::f32::consts::TAU));

        ids.push(scene.add_entity(body, width, height, 0));
    }
    ids
}

fn steer(scene: &mut Scene, rng: &mut StdRng, ids: &[EntityId]) {
    for &id in ids {
        if !rng.gen_bool(0.1) {
            continue;
        }
        if let Some(entity) = scene.entity_mut(id) {
            let body = &mut entity.body;
            let thrust = Vec2::new(body.mass * body.max_acceleration, 0.0);
            body.add_force(vector::rotated(&thrust, rng.gen_range(0.0..std::f32::consts::TAU)));
        }
    }
}
