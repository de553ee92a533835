use rand::Rng;

/// Every agent flies at this speed; steering only ever rotates the velocity.
pub const CRUISE_SPEED: f32 = 2.0;

/// Maximum change of heading per tick, in degrees.
pub const MAX_TURN_DEG: f32 = 15.0;

/// A 2D vector used for position and velocity
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    pub fn magnitude(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Unit vector in the same direction; the zero vector normalizes to zero.
    pub fn normalize(&self) -> Self {
        let mag = self.magnitude();
        if mag > 0.0 {
            Self {
                x: self.x / mag,
                y: self.y / mag,
            }
        } else {
            Self::zero()
        }
    }

    pub fn distance(&self, other: Vec2) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Rotate by `angle_deg` degrees (counter-clockwise in a y-up frame).
    pub fn rotated_deg(&self, angle_deg: f32) -> Self {
        let (sin, cos) = angle_deg.to_radians().sin_cos();
        Self {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }

    /// Signed angle from `self` to `other` in degrees, in (-180, 180].
    /// Either vector being zero yields 0.
    pub fn signed_angle_deg(&self, other: Vec2) -> f32 {
        let cross = self.x * other.y - self.y * other.x;
        let dot = self.x * other.x + self.y * other.y;
        cross.atan2(dot).to_degrees()
    }
}

impl core::ops::Add for Vec2 {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl core::ops::Sub for Vec2 {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl core::ops::Mul<f32> for Vec2 {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

impl core::ops::Div<f32> for Vec2 {
    type Output = Self;

    fn div(self, scalar: f32) -> Self {
        Self {
            x: self.x / scalar,
            y: self.y / scalar,
        }
    }
}

impl core::ops::Neg for Vec2 {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }
}

impl core::ops::AddAssign for Vec2 {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

/// A single flock member
#[derive(Debug, Clone, Copy)]
pub struct Agent {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Sum of the three neighbor-set sizes from the last tick that steered
    /// this agent. An agent inside several radii is counted once per radius;
    /// the value only feeds the renderer's intensity gradient.
    pub neighbor_count: usize,
}

impl Agent {
    pub fn new(position: Vec2, heading_deg: f32) -> Self {
        Self {
            position,
            velocity: Vec2::new(CRUISE_SPEED, 0.0).rotated_deg(heading_deg),
            neighbor_count: 0,
        }
    }
}

/// Handle to an agent in its pool. Agents are never removed, so the handle
/// stays valid for the life of the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AgentId(usize);

impl AgentId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Owns the flock. Insertion-ordered, no removal, single-threaded.
#[derive(Debug, Default)]
pub struct AgentPool {
    agents: Vec<Agent>,
}

impl AgentPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an agent at `position` flying at cruise speed, rotated
    /// `heading_deg` degrees from the +x axis.
    pub fn spawn(&mut self, position: Vec2, heading_deg: f32) -> AgentId {
        let id = AgentId(self.agents.len());
        self.agents.push(Agent::new(position, heading_deg));
        id
    }

    /// Spawn with a uniformly random heading, e.g. for pointer clicks.
    pub fn spawn_random_heading(&mut self, position: Vec2) -> AgentId {
        let heading = rand::thread_rng().gen_range(0.0..360.0);
        self.spawn(position, heading)
    }

    /// Scatter `count` agents uniformly over the viewport with random
    /// headings.
    pub fn spawn_uniform(&mut self, count: usize, width: f32, height: f32) {
        let mut rng = rand::thread_rng();
        for _ in 0..count {
            let position = Vec2::new(rng.gen_range(0.0..width), rng.gen_range(0.0..height));
            let heading = rng.gen_range(0.0..360.0);
            self.spawn(position, heading);
        }
    }

    /// Place `count` agents evenly around a circle, each heading tangent to
    /// the circle at its position.
    pub fn spawn_ring(&mut self, count: usize, radius: f32, center: Vec2) {
        for i in 0..count {
            let rotation = 360.0 / count as f32 * i as f32;
            let position = Vec2::new(radius, 0.0).rotated_deg(rotation) + center;
            self.spawn(position, rotation + 90.0);
        }
    }

    /// Render snapshot: all agents in insertion order.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn iter(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter()
    }

    pub fn get(&self, id: AgentId) -> &Agent {
        &self.agents[id.0]
    }

    pub fn get_mut(&mut self, id: AgentId) -> &mut Agent {
        &mut self.agents[id.0]
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

/// Live-tunable simulation parameters. The driver is expected to re-read its
/// controls and update this before every tick; nothing is cached between
/// ticks.
///
/// Each weight doubles as a neighbor radius and an implicit force scale:
/// separation acts within `separation_weight / 2`, cohesion within
/// `cohesion_weight`, alignment within `alignment_weight * 2`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    pub separation_weight: f32,
    pub cohesion_weight: f32,
    pub alignment_weight: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            separation_weight: 40.0,
            cohesion_weight: 50.0,
            alignment_weight: 60.0,
            width: 800.0,
            height: 500.0,
        }
    }
}

/// Which steering term produced an overlay line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SteeringBehavior {
    Separation,
    Cohesion,
    Alignment,
}

/// One debug-overlay segment, from an agent to the tip of a steering term.
/// Purely observational; the simulation never reads these back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteeringLine {
    pub from: Vec2,
    pub to: Vec2,
    pub behavior: SteeringBehavior,
}

/// Min/max of the fresh per-agent neighbor sums from the last tick, for the
/// renderer's intensity gradient. An empty pool leaves both at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickStats {
    pub min_neighbors: usize,
    pub max_neighbors: usize,
}

impl TickStats {
    /// Map a neighbor count onto 0..=255 over the last tick's range,
    /// clamped at both ends. A degenerate range maps everything to 0.
    pub fn intensity(&self, neighbor_count: usize) -> u8 {
        if self.max_neighbors <= self.min_neighbors {
            return 0;
        }
        let span = (self.max_neighbors - self.min_neighbors) as f32;
        let t = neighbor_count.saturating_sub(self.min_neighbors) as f32 / span;
        (t.min(1.0) * 255.0) as u8
    }
}

/// Runs the per-tick steering update and boundary wrap over an [`AgentPool`].
#[derive(Debug, Default)]
pub struct Simulator {
    pub config: SimConfig,
    stats: TickStats,
}

impl Simulator {
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            stats: TickStats::default(),
        }
    }

    pub fn stats(&self) -> TickStats {
        self.stats
    }

    /// Advance the flock by one tick.
    pub fn tick(&mut self, pool: &mut AgentPool) {
        self.step(pool, None);
    }

    /// Advance one tick, appending a steering line per non-empty term to
    /// `overlay`. The buffer is not cleared here; the caller owns its
    /// lifetime across frames.
    pub fn tick_with_overlay(&mut self, pool: &mut AgentPool, overlay: &mut Vec<SteeringLine>) {
        self.step(pool, Some(overlay));
    }

    fn step(&mut self, pool: &mut AgentPool, mut overlay: Option<&mut Vec<SteeringLine>>) {
        if pool.is_empty() {
            self.stats = TickStats::default();
            return;
        }

        let sep_radius = self.config.separation_weight / 2.0;
        let coh_radius = self.config.cohesion_weight;
        let ali_radius = self.config.alignment_weight * 2.0;

        let mut min_neighbors = usize::MAX;
        let mut max_neighbors = 0usize;

        for i in 0..pool.agents.len() {
            let me = pool.agents[i];

            let mut sep_sum = Vec2::zero();
            let mut sep_count = 0usize;
            // Cohesion averages over the agent itself plus its set, and
            // alignment sums the agent's own velocity in, so both start
            // seeded with `me`.
            let mut coh_sum = me.position;
            let mut coh_count = 0usize;
            let mut ali_sum = me.velocity;
            let mut ali_count = 0usize;

            // Live scan: agents before `i` have already moved this tick and
            // later agents see those updates. Snapshotting the pool at tick
            // start would change the observable dynamics.
            for (j, other) in pool.agents.iter().enumerate() {
                if j == i {
                    continue;
                }
                let dist = me.position.distance(other.position);
                if dist < sep_radius {
                    sep_count += 1;
                    sep_sum += other.position - me.position;
                }
                if dist < coh_radius {
                    coh_count += 1;
                    coh_sum += other.position;
                }
                if dist < ali_radius {
                    ali_count += 1;
                    ali_sum += other.velocity;
                }
            }

            let mut new_heading = Vec2::zero();
            let mut changed = false;

            // Separation: steer away from the crowd.
            if sep_count > 0 {
                let term = -sep_sum * 12.0;
                new_heading += term;
                changed = true;
                if let Some(lines) = overlay.as_mut() {
                    lines.push(SteeringLine {
                        from: me.position,
                        to: me.position + term / 10.0,
                        behavior: SteeringBehavior::Separation,
                    });
                }
            }

            // Cohesion: steer toward the group centroid (self included).
            if coh_count > 0 {
                let term = coh_sum / (coh_count + 1) as f32 - me.position;
                new_heading += term;
                changed = true;
                if let Some(lines) = overlay.as_mut() {
                    lines.push(SteeringLine {
                        from: me.position,
                        to: me.position + term,
                        behavior: SteeringBehavior::Cohesion,
                    });
                }
            }

            // Alignment: match the group heading (self included).
            if ali_count > 0 {
                let term = ali_sum.normalize() * 20.0;
                new_heading += term;
                changed = true;
                if let Some(lines) = overlay.as_mut() {
                    lines.push(SteeringLine {
                        from: me.position,
                        to: me.position + term,
                        behavior: SteeringBehavior::Alignment,
                    });
                }
            }

            // Stats always use the fresh sums; the agent's own count is only
            // refreshed when something steered it, so an isolated agent keeps
            // showing its last known crowding.
            let total = sep_count + coh_count + ali_count;
            min_neighbors = min_neighbors.min(total);
            max_neighbors = max_neighbors.max(total);

            let agent = &mut pool.agents[i];
            if changed {
                agent.neighbor_count = total;
                let angle = agent.velocity.signed_angle_deg(new_heading);
                agent.velocity = agent
                    .velocity
                    .rotated_deg(angle * (MAX_TURN_DEG / 180.0));
            }
            agent.position += agent.velocity;
        }

        self.stats = TickStats {
            min_neighbors,
            max_neighbors,
        };

        // Toroidal wrap, one pass after the sweep. Hard teleport per axis.
        for agent in pool.agents.iter_mut() {
            if agent.position.x > self.config.width {
                agent.position.x = 0.0;
            }
            if agent.position.x < 0.0 {
                agent.position.x = self.config.width;
            }
            if agent.position.y > self.config.height {
                agent.position.y = 0.0;
            }
            if agent.position.y < 0.0 {
                agent.position.y = self.config.height;
            }
        }
    }
}
