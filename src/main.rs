//! Headless demo: drives one player over flat ground and logs what it does.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use log::info;
use tortellini::input::{ActionBindings, BoundInput, RawActions};
use tortellini::player::{Locomotion, Player};
use tortellini::solver::FlatGround;
use tortellini::{init_logging, BodyShape, ContactInfo, LocomotionTuning, UP};

const PHYSICS_HZ: f32 = 60.0;

/// Walks a player to the right, optionally running, jumping and crouching.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging, including every state change
    #[arg(short, long)]
    verbose: bool,
    /// Number of physics ticks to simulate
    #[arg(long, default_value_t = 180)]
    ticks: u32,
    /// Hold run the whole time
    #[arg(long)]
    run: bool,
    /// Tick on which jump is pressed and then held
    #[arg(long)]
    jump_at: Option<u32>,
    /// Tick from which down is held instead of right
    #[arg(long)]
    crouch_at: Option<u32>,
    /// JSON tuning file overriding the defaults
    #[arg(long)]
    tuning: Option<std::path::PathBuf>,
}

/// Stands in for player one's gamepad, pressing actions on a schedule.
struct Script {
    bindings: ActionBindings,
    clock: Arc<AtomicU32>,
    run: bool,
    jump_at: Option<u32>,
    crouch_at: Option<u32>,
}

impl Script {
    fn new(args: &Args, clock: Arc<AtomicU32>) -> Self {
        Self {
            bindings: ActionBindings::for_player(1),
            clock,
            run: args.run,
            jump_at: args.jump_at,
            crouch_at: args.crouch_at,
        }
    }
}

impl RawActions for Script {
    fn strength(&self, action: &str) -> f32 {
        if self.is_pressed(action) {
            1.0
        } else {
            0.0
        }
    }

    fn is_pressed(&self, action: &str) -> bool {
        let tick = self.clock.load(Ordering::Relaxed);
        let reached = |at: Option<u32>| at.is_some_and(|from| tick >= from);
        let crouching = reached(self.crouch_at);
        let b = &self.bindings;
        if action == b.right {
            !crouching
        } else if action == b.down {
            crouching
        } else if action == b.jump {
            reached(self.jump_at)
        } else if action == b.run {
            self.run
        } else {
            false
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let tuning = match &args.tuning {
        Some(path) => LocomotionTuning::from_path(path)
            .with_context(|| format!("loading tuning from {}", path.display()))?,
        None => LocomotionTuning::default(),
    };

    let mut player = Player::new(tuning, BodyShape::Big, ContactInfo::grounded(UP))?;
    let clock = Arc::new(AtomicU32::new(0));
    let script = Script::new(&args, Arc::clone(&clock));
    player.set_input_source(Box::new(BoundInput::new(script, ActionBindings::for_player(1))));
    let mut ground = FlatGround::level(0.0);
    let dt = 1.0 / PHYSICS_HZ;
    let mut last_state = player.state();

    for tick in 0..args.ticks {
        clock.store(tick, Ordering::Relaxed);
        player.physics_tick(dt, &mut ground)?;
        player.frame_tick(dt);

        if player.state() != last_state {
            info!(
                "tick {tick}: {last_state} -> {} at x={:.2} vx={:.2}",
                player.state(),
                player.transform().translation.x,
                player.velocity().x,
            );
            last_state = player.state();
        }
    }

    let end = player.transform().translation;
    info!(
        "finished in {} after {:.2}s at ({:.2}, {:.2}), speed cap {:.2}",
        player.state(),
        player.lifecycle().lifetime(),
        end.x,
        end.y,
        player.speed_limit().limit(),
    );
    if player.state() == Locomotion::Fall {
        info!("still airborne when the simulation stopped");
    }
    Ok(())
}
