use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use digworld_common::{CHUNK_DIM, LocalOffset, VoxelCoord};
use digworld_kernel::mesh::VEC3_STRIDE;
use digworld_kernel::{Chunk, MemoryGpu, RebuildStats, TerrainConfig, TerrainStats, VoxelWorld};
use digworld_render::{DebugTextRenderer, RenderView, Renderer};
use digworld_tools::{WorldInspector, WorldSummary};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "digworld-cli", about = "CLI tool for digworld terrain and meshing")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions
    Info,
    /// Generate terrain, mesh every chunk and print statistics
    Generate {
        /// Terrain extent along X and Z, in voxels
        #[arg(short, long, default_value = "128")]
        extent: u32,
        /// Terrain parameters as JSON (overrides --extent)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
        /// Also print the per-chunk draw listing
        #[arg(long)]
        dump: bool,
    },
    /// Mesh a single chunk filled with a pattern and report face culling
    Mesh {
        #[arg(short, long, value_enum, default_value = "solid")]
        fill: Fill,
    },
    /// Dig out one terrain column and report the incremental rebuild
    Edit {
        #[arg(short, long, default_value = "128")]
        extent: u32,
        #[arg(short, default_value = "8")]
        x: i32,
        #[arg(short, default_value = "8")]
        z: i32,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Fill {
    /// One voxel at the chunk centre
    Single,
    /// One full layer at y = 0
    Slab,
    /// Every voxel set
    Solid,
    /// Alternating voxels, nothing culled
    Checker,
}

impl Fill {
    fn contains(self, local: LocalOffset) -> bool {
        let (x, y, z) = (local.x(), local.y(), local.z());
        match self {
            Fill::Single => (x, y, z) == (8, 8, 8),
            Fill::Slab => y == 0,
            Fill::Solid => true,
            Fill::Checker => (x + y + z) % 2 == 0,
        }
    }
}

#[derive(Serialize)]
struct GenerateReport {
    terrain: TerrainStats,
    rebuild: RebuildStats,
    world: WorldSummary,
    buffers_live: usize,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("digworld-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", digworld_common::crate_info());
            println!("kernel: {}", digworld_kernel::crate_info());
            println!("render: {}", digworld_render::crate_info());
            println!("tools: {}", digworld_tools::crate_info());
            println!(
                "chunk: {CHUNK_DIM}^3 voxels, default terrain {:?}",
                TerrainConfig::default()
            );
        }
        Commands::Generate {
            extent,
            config,
            json,
            dump,
        } => {
            let config = match config {
                Some(path) => TerrainConfig::load(&path)
                    .with_context(|| format!("loading terrain from {}", path.display()))?,
                None => TerrainConfig {
                    extent_x: extent,
                    extent_z: extent,
                    ..TerrainConfig::default()
                },
            };
            config.validate()?;
            tracing::debug!(?config, "terrain config");

            let mut gpu = MemoryGpu::new();
            let mut world = VoxelWorld::new();
            let terrain = digworld_kernel::generate(&mut world, &config);
            let rebuild = world.rebuild_dirty_chunks(&mut gpu);
            let report = GenerateReport {
                terrain,
                rebuild,
                world: WorldInspector::summary(&world),
                buffers_live: gpu.live_buffers(),
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "Terrain: {}x{} columns, {} voxels, max height {}",
                    config.extent_x,
                    config.extent_z,
                    report.terrain.voxels,
                    report.terrain.max_height
                );
                println!(
                    "Rebuild: {} of {} chunks meshed, {} indices uploaded",
                    report.rebuild.chunks_rebuilt,
                    report.rebuild.chunks_visited,
                    report.rebuild.indices_uploaded
                );
                println!("{}", report.world);
                println!("GPU: {} live buffers", report.buffers_live);
            }

            if dump {
                print!(
                    "{}",
                    DebugTextRenderer::new().render(&world, &RenderView::default())
                );
            }

            world.release_all(&mut gpu);
        }
        Commands::Mesh { fill } => {
            let mut chunk = Chunk::new();
            for index in 0..digworld_common::CHUNK_VOLUME {
                let local = LocalOffset::from_index(index)?;
                if fill.contains(local) {
                    chunk.set(local);
                }
            }

            let geometry = chunk.build_geometry();
            let voxels = chunk.voxel_count();
            let faces = geometry.face_count();
            let culled = voxels * 6 - faces;
            println!("Fill: {fill:?}");
            println!("Voxels: {voxels}");
            println!(
                "Faces: {faces} emitted, {culled} culled ({:.1}%)",
                if voxels == 0 {
                    0.0
                } else {
                    culled as f64 * 100.0 / (voxels * 6) as f64
                }
            );
            println!(
                "Geometry: {} vertices, {} indices, {} bytes",
                geometry.vertex_count(),
                geometry.indices.len(),
                geometry.vertex_count() * 2 * VEC3_STRIDE as usize + geometry.indices.len() * 4
            );
        }
        Commands::Edit { extent, x, z } => {
            let config = TerrainConfig {
                extent_x: extent,
                extent_z: extent,
                ..TerrainConfig::default()
            };
            config.validate()?;

            let mut gpu = MemoryGpu::new();
            let mut world = VoxelWorld::new();
            let terrain = digworld_kernel::generate(&mut world, &config);
            let initial = world.rebuild_dirty_chunks(&mut gpu);
            let before = WorldInspector::summary(&world);

            let mut dug = 0;
            for y in 0..terrain.max_height as i32 {
                let voxel = VoxelCoord::new(x, y, z);
                if world.is_occupied(voxel) {
                    world.remove_voxel(voxel);
                    dug += 1;
                }
            }

            let edit = world.rebuild_dirty_chunks(&mut gpu);
            tracing::debug!(dug, rebuilt = edit.chunks_rebuilt, "column edit applied");
            let after = WorldInspector::summary(&world);

            println!("Dug {dug} voxels from column ({x}, {z})");
            println!(
                "Initial build: {} chunks meshed",
                initial.chunks_rebuilt
            );
            println!(
                "Incremental rebuild: {} of {} chunks meshed",
                edit.chunks_rebuilt, edit.chunks_visited
            );
            println!(
                "Triangles: {} -> {}",
                before.triangles(),
                after.triangles()
            );

            world.release_all(&mut gpu);
        }
    }

    Ok(())
}
