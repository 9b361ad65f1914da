//! Fluent builder for constructing a [`Sim`].

use std::sync::Arc;

use rn_core::{AgentId, RoutingPolicy, SimConfig, Vec2};
use rn_map::CircularMap;
use rn_path::Pathfinder;

use crate::{ModeSelector, Pursuer, Quarry, Sim, SimError, SimResult};

/// Fluent builder for [`Sim<M>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: total ticks, seed, tick duration, speed
/// - `Arc<CircularMap>`: shared by every pursuer
/// - `M: ModeSelector`: chase/flee decisions
///
/// # Optional inputs (have defaults)
///
/// | Method            | Default                          |
/// |-------------------|----------------------------------|
/// | `.policy(p)`      | `RoutingPolicy::default()`       |
/// | `.pursuers(v)`    | No pursuers (build fails)        |
/// | `.quarry(q)`      | Fixed at the innermost ring, 0°  |
///
/// # Example
///
/// ```rust,ignore
/// let map = Arc::new(layouts::arena()?);
/// let mut sim = SimBuilder::new(config, map, AlwaysChase)
///     .pursuers(vec![start_a, start_b])
///     .quarry(Quarry::Fixed(target))
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<M: ModeSelector> {
    config:   SimConfig,
    map:      Arc<CircularMap>,
    selector: M,
    policy:   Option<RoutingPolicy>,
    starts:   Vec<Vec2>,
    quarry:   Option<Quarry>,
}

impl<M: ModeSelector> SimBuilder<M> {
    /// Create a builder with all required inputs.
    pub fn new(config: SimConfig, map: Arc<CircularMap>, selector: M) -> Self {
        Self {
            config,
            map,
            selector,
            policy: None,
            starts: Vec::new(),
            quarry: None,
        }
    }

    /// Routing tolerances shared by every pursuer.
    pub fn policy(mut self, policy: RoutingPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Starting positions; pursuer `i` gets `AgentId(i)`.  Each start is
    /// snapped onto the closest pathway.
    pub fn pursuers(mut self, starts: Vec<Vec2>) -> Self {
        self.starts = starts;
        self
    }

    pub fn quarry(mut self, quarry: Quarry) -> Self {
        self.quarry = Some(quarry);
        self
    }

    /// Validate inputs, build one pathfinder per pursuer, and return a
    /// ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim<M>> {
        // ── Validate ──────────────────────────────────────────────────────
        if !(self.config.tick_secs > 0.0) {
            return Err(SimError::Config(format!(
                "tick_secs must be positive, got {}",
                self.config.tick_secs
            )));
        }
        if !(self.config.agent_speed >= 0.0) || !self.config.agent_speed.is_finite() {
            return Err(SimError::Config(format!(
                "agent_speed must be finite and non-negative, got {}",
                self.config.agent_speed
            )));
        }
        if self.starts.is_empty() {
            return Err(SimError::Config("at least one pursuer is required".into()));
        }
        if let Some(off) = self.starts.iter().find(|&&p| self.map.is_cheating(p)) {
            return Err(SimError::Config(format!("pursuer start {off} is off the map")));
        }

        let quarry = match self.quarry {
            Some(q) => q,
            None => match self.map.rings().first() {
                Some(ring) => Quarry::Fixed(ring.point_at(0.0)),
                None => return Err(SimError::Config("map has no rings".into())),
            },
        };
        quarry.validate(&self.map)?;

        // ── Build pursuers ────────────────────────────────────────────────
        let policy = self.policy.unwrap_or_default();
        let mut pursuers = Vec::with_capacity(self.starts.len());
        for (i, &start) in self.starts.iter().enumerate() {
            let agent = AgentId::try_from(i)
                .map_err(|_| SimError::Config(format!("too many pursuers: {}", self.starts.len())))?;
            let pathfinder =
                Pathfinder::new(agent, Arc::clone(&self.map), policy.clone(), self.config.seed)?;
            let on_map = self.map.closest_point(start).unwrap_or(start);
            pursuers.push(Pursuer::new(pathfinder, on_map));
        }

        Ok(Sim {
            clock:    self.config.make_clock(),
            config:   self.config,
            map:      self.map,
            pursuers,
            quarry,
            selector: self.selector,
        })
    }
}
