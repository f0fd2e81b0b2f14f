//! The enemy agent and its combat state machine.
//!
//! States: Patrol (initial), Chase, Attack, Stagger, Dead (terminal).
//! Transitions are a pure function of `(state, event)`; the agent's tick
//! generates events from perception, timers, and adapter predicates, and
//! drives the movement/combat adapter from the resulting state. Within one
//! tick the pain model resolves strictly before state evaluation, so a
//! lethal hit can never be followed by a stagger transition on the same
//! tick.

use crate::adapter::{AttackHandle, CombatMotor};
use crate::events::{AnimationBus, AnimationEvent};
use crate::health::{DamageOutcome, Health, PainState};
use crate::perception::{direction_angle, distance, LineOfSight, Perception};
use crate::profile::{BehaviorProfile, ProfileResult};
use crate::rng::CombatRng;
use crate::zone::{ZoneBinding, ZoneMap, ZoneRegistry};
use revenant_common::{AgentId, ZoneId};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How close to a waypoint counts as arrival.
const ARRIVAL_RADIUS: f32 = 0.5;

/// How long a stuck chaser holds position before retrying navigation.
const STUCK_HOLD: f32 = 1.0;

/// Agent combat states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentState {
    /// Walking waypoints, polling gated perception.
    Patrol,
    /// Pursuing the last-known target position.
    Chase,
    /// Attack windup/recovery in progress.
    Attack,
    /// Forced interrupt after a painful hit.
    Stagger,
    /// Terminal; awaiting removal after the grace period.
    Dead,
}

impl AgentState {
    /// Returns whether this state is terminal.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Dead)
    }
}

/// Events the state machine reacts to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AgentEvent {
    /// Gated perception spotted the target.
    Spotted,
    /// Non-lethal damage arrived (grants aggro, bypasses the zone gate).
    Damaged,
    /// A stagger roll succeeded.
    StaggerTriggered,
    /// The stagger countdown expired; payload decides re-entry.
    StaggerExpired {
        /// A target is remembered
        target_known: bool,
        /// Within attack range of the aim point
        in_range: bool,
        /// Attack cooldown has elapsed
        cooldown_ready: bool,
    },
    /// The target has been unseen past the forget threshold.
    SightLost,
    /// In attack range with the cooldown ready.
    AttackReady,
    /// The adapter reported the attack action finished.
    AttackResolved {
        /// Still within attack range
        still_in_range: bool,
        /// Attack cooldown has elapsed
        cooldown_ready: bool,
    },
    /// Health reached zero.
    Killed,
}

/// Pure transition function: `(state, event) -> state`.
///
/// Dead absorbs everything; death outranks stagger; stagger preempts any
/// live state. Events that do not apply to the current state leave it
/// unchanged.
#[must_use]
pub fn transition(state: AgentState, event: AgentEvent) -> AgentState {
    use AgentEvent as E;
    use AgentState as S;

    match (state, event) {
        (S::Dead, _) => S::Dead,
        (_, E::Killed) => S::Dead,
        (_, E::StaggerTriggered) => S::Stagger,
        (S::Patrol, E::Spotted | E::Damaged) => S::Chase,
        (S::Chase, E::AttackReady) => S::Attack,
        (S::Chase, E::SightLost) => S::Patrol,
        (
            S::Stagger,
            E::StaggerExpired {
                target_known,
                in_range,
                cooldown_ready,
            },
        ) => {
            if !target_known {
                S::Patrol
            } else if in_range && cooldown_ready {
                S::Attack
            } else {
                S::Chase
            }
        }
        (
            S::Attack,
            E::AttackResolved {
                still_in_range,
                cooldown_ready,
            },
        ) => {
            if still_in_range && cooldown_ready {
                S::Attack
            } else {
                S::Chase
            }
        }
        (state, _) => state,
    }
}

/// One enemy agent: profile, runtime state, and the tick pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    id: AgentId,
    profile: BehaviorProfile,
    position: (f32, f32),
    facing: f32,
    state: AgentState,
    health: Health,
    pain: PainState,
    perception: Perception,
    zone: ZoneBinding,
    attack_cooldown_remaining: f32,
    active_attack: Option<AttackHandle>,
    patrol_waypoints: Vec<(f32, f32)>,
    patrol_index: usize,
    stuck_hold_remaining: f32,
    despawn_remaining: f32,
    was_moving: bool,
    was_chasing: bool,
}

impl Agent {
    /// Creates an agent at a position, validating the profile first.
    ///
    /// An invalid profile aborts the spawn; no half-configured agent enters
    /// the simulation.
    pub fn spawn(id: AgentId, profile: BehaviorProfile, position: (f32, f32)) -> ProfileResult<Self> {
        profile.validate()?;
        let health = Health::new(profile.max_health);
        Ok(Self {
            id,
            profile,
            position,
            facing: 0.0,
            state: AgentState::Patrol,
            health,
            pain: PainState::new(),
            perception: Perception::new(),
            zone: ZoneBinding::pending(),
            attack_cooldown_remaining: 0.0,
            active_attack: None,
            patrol_waypoints: Vec::new(),
            patrol_index: 0,
            stuck_hold_remaining: 0.0,
            despawn_remaining: 0.0,
            was_moving: false,
            was_chasing: false,
        })
    }

    /// Sets patrol waypoints.
    #[must_use]
    pub fn with_patrol(mut self, waypoints: Vec<(f32, f32)>) -> Self {
        self.patrol_waypoints = waypoints;
        self
    }

    /// Binds the agent to a known zone, skipping lazy detection.
    #[must_use]
    pub const fn with_zone(mut self, zone: ZoneId) -> Self {
        self.zone = ZoneBinding::Resolved(zone);
        self
    }

    /// Sets the initial facing angle (radians).
    #[must_use]
    pub const fn with_facing(mut self, facing: f32) -> Self {
        self.facing = facing;
        self
    }

    /// Returns the agent ID.
    #[must_use]
    pub const fn id(&self) -> AgentId {
        self.id
    }

    /// Returns the active state.
    #[must_use]
    pub const fn state(&self) -> AgentState {
        self.state
    }

    /// Returns the behavior profile.
    #[must_use]
    pub const fn profile(&self) -> &BehaviorProfile {
        &self.profile
    }

    /// Returns the health pool.
    #[must_use]
    pub const fn health(&self) -> &Health {
        &self.health
    }

    /// Returns the current position.
    #[must_use]
    pub const fn position(&self) -> (f32, f32) {
        self.position
    }

    /// Updates the position (fed back from the navigation service).
    pub fn set_position(&mut self, position: (f32, f32)) {
        self.position = position;
    }

    /// Returns the facing angle (radians).
    #[must_use]
    pub const fn facing(&self) -> f32 {
        self.facing
    }

    /// Returns the perception state (target memory, unseen time).
    #[must_use]
    pub const fn perception(&self) -> &Perception {
        &self.perception
    }

    /// Returns the zone binding.
    #[must_use]
    pub const fn zone(&self) -> &ZoneBinding {
        &self.zone
    }

    /// Returns whether a stagger is active.
    #[must_use]
    pub fn is_staggered(&self) -> bool {
        self.pain.is_staggered()
    }

    /// Returns time left on the attack cooldown.
    #[must_use]
    pub const fn attack_cooldown_remaining(&self) -> f32 {
        self.attack_cooldown_remaining
    }

    /// Returns whether the attack cooldown has elapsed.
    #[must_use]
    pub fn can_attack(&self) -> bool {
        self.attack_cooldown_remaining <= 0.0
    }

    /// Returns the in-flight attack handle, if any.
    #[must_use]
    pub const fn active_attack(&self) -> Option<AttackHandle> {
        self.active_attack
    }

    /// Returns whether the death grace period has fully elapsed.
    #[must_use]
    pub fn despawn_due(&self) -> bool {
        self.state == AgentState::Dead && self.despawn_remaining <= 0.0
    }

    /// Applies damage and resolves stagger/death.
    ///
    /// No-op on a dead agent. Death outranks stagger: a lethal hit skips the
    /// stagger roll entirely. Any hit reveals the target (aggro ignores the
    /// containment gate): the last-known position becomes the source
    /// position when given, else the agent's own.
    pub fn apply_damage(
        &mut self,
        amount: f32,
        source: Option<(f32, f32)>,
        rng: &mut CombatRng,
        bus: &AnimationBus,
    ) -> DamageOutcome {
        if self.state == AgentState::Dead {
            return DamageOutcome::default();
        }

        self.health.take_damage(amount);
        if self.health.is_dead() {
            self.die(bus);
            return DamageOutcome {
                staggered: false,
                died: true,
            };
        }

        let estimate = source.unwrap_or(self.position);
        self.perception.note_sighting(estimate);
        self.set_state(transition(self.state, AgentEvent::Damaged));

        let mut staggered = false;
        if self.pain.can_stagger() && rng.roll(self.profile.stagger_chance) {
            self.pain.trigger(&self.profile);
            self.cancel_attack();
            self.set_state(transition(self.state, AgentEvent::StaggerTriggered));
            bus.publish(AnimationEvent::Staggered { agent: self.id });
            staggered = true;
        }

        DamageOutcome {
            staggered,
            died: false,
        }
    }

    /// Advances the agent by one simulation tick.
    ///
    /// Order within the tick: pain/cooldown timers, zone detection,
    /// perception cadence, then state evaluation and adapter commands.
    pub fn tick<Z: ZoneMap, L: LineOfSight, M: CombatMotor>(
        &mut self,
        dt: f32,
        target_position: (f32, f32),
        zones: &ZoneRegistry,
        zone_map: &Z,
        los: &L,
        motor: &mut M,
        bus: &AnimationBus,
    ) {
        if self.state == AgentState::Dead {
            self.despawn_remaining = (self.despawn_remaining - dt).max(0.0);
            return;
        }

        self.pain.tick(dt);
        self.attack_cooldown_remaining = (self.attack_cooldown_remaining - dt).max(0.0);

        self.zone.tick(
            dt,
            self.position,
            zone_map,
            self.profile.zone_retry_interval,
            self.profile.max_zone_retries,
        );
        self.perception.advance(dt);

        // Re-entry keys off the timer, not an expiry edge, so a
        // zero-duration stagger still recovers on its next tick.
        if self.state == AgentState::Stagger && !self.pain.is_staggered() {
            let target_known = self.perception.has_target_memory;
            let aim = self.aim_point(target_position);
            let in_range =
                target_known && motor.is_in_range(self.id, aim, self.profile.attack_range);
            let next = transition(
                self.state,
                AgentEvent::StaggerExpired {
                    target_known,
                    in_range,
                    cooldown_ready: self.can_attack(),
                },
            );
            self.set_state(next);
            if next == AgentState::Attack {
                self.enter_attack(aim, motor, bus);
            }
        }

        match self.state {
            AgentState::Patrol => self.tick_patrol(target_position, zones, los, motor),
            AgentState::Chase => self.tick_chase(dt, target_position, los, motor, bus),
            AgentState::Attack => self.tick_attack(target_position, motor, bus),
            // Stagger entry happens inside damage resolution, away from the
            // motor; the halt is re-issued here instead.
            AgentState::Stagger => motor.stop(self.id),
            AgentState::Dead => {}
        }

        self.update_animation_flags(bus);
    }

    fn tick_patrol<L: LineOfSight, M: CombatMotor>(
        &mut self,
        target_position: (f32, f32),
        zones: &ZoneRegistry,
        los: &L,
        motor: &mut M,
    ) {
        // Acquisition only fires while the containment gate is open.
        if self.zone.gate_open(zones)
            && self.perception.check_due(&self.profile)
            && self.perception.acquire(
                self.position,
                self.facing,
                target_position,
                &self.profile,
                los,
            )
        {
            debug!(agent = self.id.raw(), "target spotted");
            self.set_state(transition(self.state, AgentEvent::Spotted));
            return;
        }

        if self.patrol_waypoints.is_empty() {
            return;
        }
        let waypoint = self.patrol_waypoints[self.patrol_index % self.patrol_waypoints.len()];
        if distance(self.position, waypoint) <= ARRIVAL_RADIUS {
            self.patrol_index = (self.patrol_index + 1) % self.patrol_waypoints.len();
        } else {
            motor.move_to(self.id, waypoint, self.profile.patrol_speed);
            self.facing = direction_angle(self.position, waypoint);
        }
    }

    fn tick_chase<L: LineOfSight, M: CombatMotor>(
        &mut self,
        dt: f32,
        target_position: (f32, f32),
        los: &L,
        motor: &mut M,
        bus: &AnimationBus,
    ) {
        // Always-on re-check: refresh the estimate or age it out.
        self.perception.refresh(
            dt,
            self.position,
            self.facing,
            target_position,
            &self.profile,
            los,
        );

        if self.perception.lost_for_too_long(&self.profile) {
            debug!(agent = self.id.raw(), "lost target, returning to patrol");
            // Memory clears exactly at this transition, not before.
            self.perception.forget();
            motor.stop(self.id);
            self.set_state(transition(self.state, AgentEvent::SightLost));
            return;
        }

        let aim = self.aim_point(target_position);

        if self.can_attack() && motor.is_in_range(self.id, aim, self.profile.attack_range) {
            self.set_state(transition(self.state, AgentEvent::AttackReady));
            self.enter_attack(aim, motor, bus);
            return;
        }

        // Stuck fallback: hold briefly, then retry navigation.
        if self.stuck_hold_remaining > 0.0 {
            self.stuck_hold_remaining = (self.stuck_hold_remaining - dt).max(0.0);
            return;
        }
        if motor.is_stuck(self.id) {
            debug!(agent = self.id.raw(), "navigation stuck, holding position");
            self.stuck_hold_remaining = STUCK_HOLD;
            motor.stop(self.id);
            return;
        }

        motor.move_to(self.id, aim, self.profile.chase_speed);
        self.facing = direction_angle(self.position, aim);
    }

    fn tick_attack<M: CombatMotor>(
        &mut self,
        target_position: (f32, f32),
        motor: &mut M,
        bus: &AnimationBus,
    ) {
        let aim = self.aim_point(target_position);
        motor.face_towards(self.id, aim);
        self.facing = direction_angle(self.position, aim);

        let Some(handle) = self.active_attack else {
            return;
        };
        if motor.is_attack_complete(handle) {
            self.active_attack = None;
            let next = transition(
                self.state,
                AgentEvent::AttackResolved {
                    still_in_range: motor.is_in_range(self.id, aim, self.profile.attack_range),
                    cooldown_ready: self.can_attack(),
                },
            );
            self.set_state(next);
            if next == AgentState::Attack {
                self.enter_attack(aim, motor, bus);
            }
        }
    }

    fn enter_attack<M: CombatMotor>(
        &mut self,
        aim: (f32, f32),
        motor: &mut M,
        bus: &AnimationBus,
    ) {
        motor.stop(self.id);
        motor.face_towards(self.id, aim);
        self.facing = direction_angle(self.position, aim);
        self.active_attack = Some(motor.begin_attack(self.id));
        self.attack_cooldown_remaining = self.profile.attack_cooldown;
        bus.publish(AnimationEvent::AttackStarted { agent: self.id });
    }

    fn die(&mut self, bus: &AnimationBus) {
        self.cancel_attack();
        self.set_state(transition(self.state, AgentEvent::Killed));
        self.despawn_remaining = self.profile.despawn_delay;
        if self.was_moving {
            self.was_moving = false;
            bus.publish(AnimationEvent::Moving {
                agent: self.id,
                moving: false,
            });
        }
        if self.was_chasing {
            self.was_chasing = false;
            bus.publish(AnimationEvent::Chasing {
                agent: self.id,
                chasing: false,
            });
        }
        bus.publish(AnimationEvent::Died { agent: self.id });
    }

    /// Discards the in-flight attack handle; it is never awaited.
    fn cancel_attack(&mut self) {
        self.active_attack = None;
    }

    fn set_state(&mut self, next: AgentState) {
        if next != self.state {
            debug!(
                agent = self.id.raw(),
                from = ?self.state,
                to = ?next,
                "state transition"
            );
            self.state = next;
        }
    }

    /// Where the agent believes the target is.
    fn aim_point(&self, target_position: (f32, f32)) -> (f32, f32) {
        self.perception
            .last_known_position
            .unwrap_or(target_position)
    }

    fn update_animation_flags(&mut self, bus: &AnimationBus) {
        let moving = match self.state {
            AgentState::Patrol => !self.patrol_waypoints.is_empty(),
            AgentState::Chase => true,
            _ => false,
        };
        if moving != self.was_moving {
            self.was_moving = moving;
            bus.publish(AnimationEvent::Moving {
                agent: self.id,
                moving,
            });
        }

        let chasing = self.state == AgentState::Chase;
        if chasing != self.was_chasing {
            self.was_chasing = chasing;
            bus.publish(AnimationEvent::Chasing {
                agent: self.id,
                chasing,
            });
        }
    }
}
