//! Damage Feed Example
//!
//! A small combat simulation showing hierarchical channels and typed payloads.
//!
//! # Channels
//!
//! ```text
//! Arena
//! ├── Arena.Damage          Damage, FireDamage
//! │   └── Arena.Damage.Fire FireDamage
//! └── Arena.Heal            Heal
//! ```
//!
//! # Listeners
//!
//! - The HUD follows `Arena.Damage` with partial match and sees `Damage`
//!   as well as `FireDamage`, which derives from it
//! - The burn tracker wants exact `Arena.Damage.Fire` broadcasts only
//! - The combat log sits on the root channel and sees every broadcast
//! - A one-round banner is bound to a lifeline and disappears after round 1
//!
//! # Usage
//!
//! ```bash
//! cargo run --package damage-feed -- --rounds 3
//! TIDINGS_LOGGING__LEVEL=debug cargo run --package damage-feed
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use anyhow::Result;
use clap::Parser;
use serde::Deserialize;
use serde_json::json;
use tidings::prelude::*;
use tidings::runtime::SessionBuilder;

// ============================================================================
// Payloads
// ============================================================================

#[derive(Debug, Clone, Deserialize, Message)]
pub struct Damage {
    pub target: String,
    pub amount: u32,
}

#[derive(Debug, Clone, Deserialize, Message)]
pub struct FireDamage {
    #[message(parent)]
    pub base: Damage,
    pub burn_ticks: u8,
}

#[derive(Debug, Clone, Deserialize, Message)]
pub struct Heal {
    pub target: String,
    pub amount: u32,
}

// ============================================================================
// Listeners
// ============================================================================

/// Running damage total, registered as a method listener.
#[derive(Default)]
struct Hud {
    total_damage: AtomicU32,
}

impl Hud {
    fn on_damage(&self, channel: &Channel, damage: &Damage) {
        let total = self.total_damage.fetch_add(damage.amount, Ordering::Relaxed) + damage.amount;
        info!(%channel, victim = %damage.target, amount = damage.amount, total, "HUD");
    }
}

fn register_listeners(bus: &Bus) -> Result<()> {
    bus.register(
        Channel::new("Arena.Damage.Fire")?,
        |_, fire: &FireDamage| {
            info!(victim = %fire.target, ticks = fire.burn_ticks, "Burning");
        },
        MatchMode::Exact,
    );

    bus.register_raw(
        Channel::root(),
        |channel: &Channel, ty: PayloadType, payload: &dyn Message| {
            debug!(%channel, %ty, "Combat log: {payload:?}");
        },
        None,
        MatchMode::Exact,
    );

    Ok(())
}

// ============================================================================
// Simulation
// ============================================================================

#[derive(Parser, Debug)]
#[command(version, about = "Combat damage feed on the Tidings message bus")]
struct Args {
    /// Configuration file (defaults to tidings.toml in the current directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of combat rounds to simulate
    #[arg(short, long, default_value_t = 3)]
    rounds: u32,
}

fn play_round(bus: &Bus, bridge: &ScriptBridge, round: u32) -> Result<()> {
    bus.broadcast(
        &Channel::new("Arena.Damage")?,
        &Damage {
            target: "goblin".into(),
            amount: 4 + round,
        },
    );

    bus.broadcast(
        &Channel::new("Arena.Damage.Fire")?,
        &FireDamage {
            base: Damage {
                target: "troll".into(),
                amount: 2 * round,
            },
            burn_ticks: 3,
        },
    );

    // Scripted events arrive untyped and go through the bridge.
    bridge.broadcast_json(
        "Arena.Heal",
        "Heal",
        json!({ "target": "hero", "amount": 10 }),
    )?;

    if let Err(err) = bridge.broadcast_json("Arena.Damage", "Damage", json!({ "amount": -1 })) {
        warn!(%err, "Script sent a malformed payload");
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut builder = SessionBuilder::new();
    if let Some(path) = &args.config {
        builder = builder.config_file(path);
    }
    let session = builder.build()?;
    let bus = session.bus();

    let hud = Arc::new(Hud::default());
    bus.register_method(Channel::new("Arena.Damage")?, &hud, Hud::on_damage, MatchMode::Partial);
    register_listeners(bus)?;

    let banner = Lifeline::new();
    let mut banner_guard = Some(banner.guard());
    bus.register_with_owner(
        Channel::new("Arena.Damage")?,
        Arc::new(banner),
        |channel: &Channel, _: PayloadType, _: &dyn Message| {
            info!(%channel, "First blood!");
        },
        Some(Damage::static_type()),
        MatchMode::Partial,
    );

    let bridge = ScriptBridge::new(
        bus.clone(),
        PayloadCatalog::new()
            .with::<Damage>()
            .with::<FireDamage>()
            .with::<Heal>(),
    );

    for round in 1..=args.rounds {
        info!(round, "Round start");
        play_round(bus, &bridge, round)?;
        if round == 1 {
            banner_guard.take();
        }
    }
    // Round 1 may have been the last broadcast the banner could see.
    let swept = bus.sweep_dead_listeners();

    info!(
        total_damage = hud.total_damage.load(Ordering::Relaxed),
        swept,
        stats = %bus.stats(),
        "Simulation finished"
    );

    session.shutdown();
    Ok(())
}
