//! Swarm Foundry - headless demo driver
//!
//! Builds a small factory, spawns a drone swarm, and drives the
//! standard pipeline for a fixed number of ticks, logging scheduler
//! activity and printing a summary at the end.

use clap::Parser;

use swarm_foundry::core::error::Result;
use swarm_foundry::core::types::{DroneRole, ResourceType, StructureKind, Vec2};
use swarm_foundry::ecs::components::{
    Degradable, DroneBehavior, HeatSource, Producer, Recipe, Recyclable,
};
use swarm_foundry::ecs::world::World;
use swarm_foundry::simulation::{recycle_entity, Pipeline};

#[derive(Parser, Debug)]
#[command(about = "Run the logistics scheduler headless")]
struct Args {
    /// Number of ticks to simulate
    #[arg(long, default_value_t = 300)]
    ticks: u32,

    /// Seconds per tick
    #[arg(long, default_value_t = 1.0)]
    dt: f32,

    /// RNG seed (flow-field invalidation sampling)
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Grid width in tiles
    #[arg(long, default_value_t = 32)]
    width: usize,

    /// Grid height in tiles
    #[arg(long, default_value_t = 32)]
    height: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("swarm_foundry=debug")
        .init();

    let args = Args::parse();
    tracing::info!(
        ticks = args.ticks,
        seed = args.seed,
        "Swarm Foundry starting"
    );

    let mut world = World::with_seed(args.width, args.height, args.seed);
    world.globals.swarm_cognition = 0.5;
    let extractor = spawn_factory(&mut world);

    let mut pipeline = Pipeline::standard();
    for _ in 0..args.ticks {
        pipeline.tick(&mut world, args.dt);
    }

    // Tear the spare extractor back down to demonstrate recycling.
    let refund = recycle_entity(&mut world, extractor)?;
    tracing::info!(sink = ?refund.sink, resources = ?refund.resources, "extractor recycled");

    println!("=== SWARM FOUNDRY ===");
    println!("sim time:        {:.0}s", world.globals.sim_time_seconds);
    println!("entities:        {}", world.entity_count());
    println!("hauls completed: {}", world.completed_tasks.len());
    println!("open requests:   {}", world.task_requests.len());
    println!("heat:            {:.1}/{:.1}", world.globals.heat_current, world.globals.heat_safe_cap);
    for (feature, unlocked) in &world.globals.unlocks {
        println!("unlock {:?}: {}", feature, unlocked);
    }
    Ok(())
}

/// Core, ore extractor, plate fabricator, cooler, and a six-drone swarm
fn spawn_factory(world: &mut World) -> swarm_foundry::core::types::EntityId {
    world.spawn_structure(StructureKind::Core, Vec2::new(16.0, 16.0), 500.0);

    let extractor = world.spawn_structure(StructureKind::Extractor, Vec2::new(4.0, 16.0), 200.0);
    world.producers.insert(
        extractor,
        Producer {
            recipe: Recipe {
                inputs: vec![],
                outputs: vec![(ResourceType::Ore, 2.0)],
                batch_time_seconds: 3.0,
            },
            progress: 0.0,
            base_rate: 1.0,
            tier: 1,
            active: true,
        },
    );
    world.recyclables.insert(
        extractor,
        Recyclable {
            refund_fraction: 0.5,
            refund_to_fabricator: false,
            build_cost: vec![(ResourceType::Plate, 10.0)],
        },
    );

    let fabricator = world.spawn_structure(StructureKind::Fabricator, Vec2::new(28.0, 16.0), 200.0);
    world.producers.insert(
        fabricator,
        Producer {
            recipe: Recipe {
                inputs: vec![(ResourceType::Ore, 2.0)],
                outputs: vec![(ResourceType::Plate, 1.0)],
                batch_time_seconds: 5.0,
            },
            progress: 0.0,
            base_rate: 1.0,
            tier: 1,
            active: true,
        },
    );
    world.heat_sources.insert(fabricator, HeatSource { heat_per_second: 0.4 });
    world.degradables.insert(
        fabricator,
        Degradable {
            wear: 0.0,
            wear_rate: 0.002,
            maintenance_time: 4.0,
            max_efficiency_penalty: 0.5,
        },
    );

    let cooler = world.spawn_structure(StructureKind::Cooler, Vec2::new(16.0, 8.0), 100.0);
    world.producers.insert(
        cooler,
        Producer {
            recipe: Recipe {
                inputs: vec![(ResourceType::Coolant, 1.0)],
                outputs: vec![],
                batch_time_seconds: 8.0,
            },
            progress: 0.0,
            base_rate: 1.0,
            tier: 1,
            active: true,
        },
    );

    for i in 0..4 {
        world.spawn_drone(
            DroneRole::Hauler,
            Vec2::new(14.0 + i as f32, 18.0),
            DroneBehavior::default(),
        );
    }
    world.spawn_drone(DroneRole::Builder, Vec2::new(16.0, 20.0), DroneBehavior::default());
    world.spawn_drone(DroneRole::Maintainer, Vec2::new(16.0, 21.0), DroneBehavior::default());

    extractor
}
