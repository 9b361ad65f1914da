//! arena: two pursuers chasing a quarry around the four-ring arena.
//!
//! The quarry circles the middle ring.  Between the ticks of the flee
//! window (a power-up, in game terms) every pursuer turns around and flees
//! to a point at least the minimum flee distance away, then resumes the
//! chase.
//!
//! ```text
//! cargo run -p arena                    # defaults
//! cargo run -p arena -- settings.json   # override SimConfig / RoutingPolicy
//! RUST_LOG=debug cargo run -p arena     # graph rebuilds, skipped obstacles
//! ```

mod settings;

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use tracing::info;

use rn_core::{RingId, Tick, Vec2};
use rn_map::load_map_reader;
use rn_sim::{CsvTrace, FleeWindow, PursuerSnapshot, Quarry, SimBuilder, SimObserver, TickSummary};

use settings::Settings;

// ── Map CSV ───────────────────────────────────────────────────────────────────

// Rings 0.7 / 2.1 / 3.5 / 5.0 around (7.18, -5.16).  Each passage row is the
// midpoint between the two rings it joins.
const MAP_CSV: &str = "\
kind,x,y,radius\n\
center,7.18,-5.16,\n\
ring,,,0.7\n\
ring,,,2.1\n\
ring,,,3.5\n\
ring,,,5.0\n\
passage,7.88,-3.94756,\n\
passage,6.48,-6.37244,\n\
passage,9.98,-5.16,\n\
passage,4.17480,-2.15480,\n\
passage,10.18520,-8.16520,\n\
";

const OUTPUT_DIR: &str = "output/arena";

// ── Observer wrapper to count rows ───────────────────────────────────────────

struct CountingObserver {
    inner:         CsvTrace,
    snapshot_rows: usize,
    summary_rows:  usize,
    peak_waiting:  usize,
}

impl CountingObserver {
    fn new(inner: CsvTrace) -> Self {
        Self { inner, snapshot_rows: 0, summary_rows: 0, peak_waiting: 0 }
    }
}

impl SimObserver for CountingObserver {
    fn on_tick_end(&mut self, summary: &TickSummary) {
        self.summary_rows += 1;
        self.peak_waiting = self.peak_waiting.max(summary.waiting);
        self.inner.on_tick_end(summary);
    }

    fn on_snapshot(&mut self, tick: Tick, pursuers: &[PursuerSnapshot]) {
        self.snapshot_rows += pursuers.len();
        self.inner.on_snapshot(tick, pursuers);
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        self.inner.on_sim_end(final_tick);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // 1. Settings.
    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load(Path::new(&path))?,
        None => Settings::default(),
    };
    let (flee_start, flee_end) = settings.flee_window;
    info!(
        ticks = settings.sim.total_ticks,
        seed = settings.sim.seed,
        flee_start,
        flee_end,
        "settings loaded"
    );

    // 2. Map.
    let map = Arc::new(load_map_reader(Cursor::new(MAP_CSV))?);
    info!(
        rings = map.rings().len(),
        passages = map.passages().len(),
        walkable = map.total_length(),
        "map loaded"
    );
    let ring_point = |ring: usize, bearing: f64| -> Vec2 {
        map.rings()
            .get(ring)
            .map(|r| r.point_at(bearing))
            .unwrap_or_else(|| map.center())
    };

    // 3. Sim.
    let starts = vec![ring_point(3, 225.0), ring_point(2, 300.0)];
    let quarry = Quarry::Orbit {
        ring:             RingId(1),
        bearing:          90.0,
        degrees_per_tick: settings.quarry_degrees_per_tick,
    };
    let selector = FleeWindow::new(Tick(flee_start), Tick(flee_end));
    let mut sim = SimBuilder::new(settings.sim.clone(), Arc::clone(&map), selector)
        .policy(settings.policy.clone())
        .pursuers(starts)
        .quarry(quarry)
        .build()?;

    // 4. Output.
    std::fs::create_dir_all(OUTPUT_DIR)?;
    let mut obs = CountingObserver::new(CsvTrace::new(Path::new(OUTPUT_DIR))?);

    // 5. Run.
    let t0 = Instant::now();
    sim.run(&mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        eprintln!("output error: {e}");
    }

    // 6. Summary.
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  pursuer_snapshots.csv : {} rows", obs.snapshot_rows);
    println!("  tick_summaries.csv    : {} rows", obs.summary_rows);
    println!("  peak waiting pursuers : {}", obs.peak_waiting);
    println!();

    let quarry_at = sim.quarry_position();
    println!("{:<10} {:>8} {:>8} {:<6} {:<10} {:>10}", "Agent", "x", "y", "Mode", "State", "To quarry");
    println!("{}", "-".repeat(57));
    for snap in sim.snapshot() {
        println!(
            "{:<10} {:>8.3} {:>8.3} {:<6} {:<10} {:>10.3}",
            snap.agent.to_string(),
            snap.position.x,
            snap.position.y,
            snap.mode.to_string(),
            format!("{:?}", snap.state),
            snap.position.distance(quarry_at),
        );
    }
    for pursuer in &sim.pursuers {
        let recovered = pursuer.pathfinder.recovered_edges();
        if recovered > 0 {
            info!(agent = %pursuer.agent(), recovered, "edges recovered during the run");
        }
    }

    Ok(())
}
