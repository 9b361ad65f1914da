//! The upstream decision of whether a pursuer chases or flees.
//!
//! Mode selection belongs to the game layer (power-ups, timers, scripted
//! phases).  The simulation asks a [`ModeSelector`] once per pursuer per tick
//! and feeds the answer to the pathfinder.

use std::fmt;

use rn_core::{AgentId, Tick, Vec2};

/// What a pursuer does this tick.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum PursuitMode {
    /// Route to the quarry.
    #[default]
    Chase,
    /// Route away from the quarry, to a target at least the minimum flee
    /// distance away.
    Flee,
}

impl PursuitMode {
    #[inline]
    pub fn is_fleeing(self) -> bool {
        self == PursuitMode::Flee
    }
}

impl fmt::Display for PursuitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PursuitMode::Chase => f.write_str("chase"),
            PursuitMode::Flee => f.write_str("flee"),
        }
    }
}

/// Read-only view of the tick handed to a [`ModeSelector`].
#[derive(Copy, Clone, Debug)]
pub struct TickContext<'a> {
    pub tick:      Tick,
    /// Current quarry position.
    pub quarry:    Vec2,
    /// Pursuer positions indexed by `AgentId`.
    pub positions: &'a [Vec2],
}

/// Decides each pursuer's mode.
///
/// Must be `Send + Sync` so a `Sim` can be moved across threads; selectors
/// are only ever called from the sequential part of the tick.
///
/// Closures work directly:
///
/// ```rust,ignore
/// let selector = |agent: AgentId, _ctx: &TickContext<'_>| {
///     if agent == AgentId(0) { PursuitMode::Flee } else { PursuitMode::Chase }
/// };
/// ```
pub trait ModeSelector: Send + Sync + 'static {
    fn mode(&self, agent: AgentId, ctx: &TickContext<'_>) -> PursuitMode;
}

impl<F> ModeSelector for F
where
    F: Fn(AgentId, &TickContext<'_>) -> PursuitMode + Send + Sync + 'static,
{
    fn mode(&self, agent: AgentId, ctx: &TickContext<'_>) -> PursuitMode {
        self(agent, ctx)
    }
}

// ── Built-in selectors ────────────────────────────────────────────────────────

/// Every pursuer always chases.
#[derive(Copy, Clone, Debug, Default)]
pub struct AlwaysChase;

impl ModeSelector for AlwaysChase {
    fn mode(&self, _agent: AgentId, _ctx: &TickContext<'_>) -> PursuitMode {
        PursuitMode::Chase
    }
}

/// Every pursuer flees during `[start, end)` and chases otherwise, like the
/// window after the quarry picks up a power-up.
#[derive(Copy, Clone, Debug)]
pub struct FleeWindow {
    pub start: Tick,
    pub end:   Tick,
}

impl FleeWindow {
    pub fn new(start: Tick, end: Tick) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn contains(&self, tick: Tick) -> bool {
        self.start <= tick && tick < self.end
    }
}

impl ModeSelector for FleeWindow {
    fn mode(&self, _agent: AgentId, ctx: &TickContext<'_>) -> PursuitMode {
        if self.contains(ctx.tick) {
            PursuitMode::Flee
        } else {
            PursuitMode::Chase
        }
    }
}
