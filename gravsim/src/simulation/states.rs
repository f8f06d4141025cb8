//! Core state types for the N-body simulation.
//!
//! Defines the live simulation entity and its storage:
//! - `Body`       a point mass with visual attributes
//! - `Snapshot`   an ephemeral copy of a body used for forward prediction
//! - `BodyStore`  insertion-ordered arena addressed by generation-checked `BodyHandle`s
//!
//! All dynamics run in `f64` through `NVec3`.

use nalgebra::{Translation3, Vector3};

pub type NVec3 = Vector3<f64>;

/// Linear RGB colour, each channel in `0.0..=1.0`
pub type Rgb = [f32; 3];

/// Sphere tessellation used by the presentation layer (sectors, stacks)
pub const MESH_RESOLUTION: (usize, usize) = (10, 10);

/// Anything the force law can act on.
///
/// A point mass that does not `interacts()` is neither a source nor a sink
/// of force; zero-mass markers and frozen bodies fall in this category.
pub trait PointMass {
    fn pos(&self) -> NVec3;
    fn mass(&self) -> f64;
    fn interacts(&self) -> bool;
}

/// What the presentation layer is allowed to see of a body
pub trait Renderable {
    fn position(&self) -> NVec3;
    fn color(&self) -> Rgb;
    fn radius(&self) -> f64;
    fn glows(&self) -> bool;

    /// Model transform; bodies are never rotated or scaled by the simulation
    fn transform(&self) -> Translation3<f64> {
        Translation3::from(self.position())
    }
}

#[derive(Debug, Clone)]
pub struct Body {
    pub x: NVec3, // position
    pub v: NVec3, // velocity
    pub m: f64, // mass, 0 = immovable marker
    pub radius: f64, // visual radius, unused by dynamics
    pub color: Rgb,
    pub glows: bool, // emissive shading hint
    pub frozen: bool, // set once integration produced non-finite state
}

impl Body {
    pub fn new(x: NVec3, v: NVec3, m: f64, radius: f64) -> Self {
        Self {
            x,
            v,
            m,
            radius,
            color: [1.0, 1.0, 1.0],
            glows: false,
            frozen: false,
        }
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    pub fn glowing(mut self, glows: bool) -> Self {
        self.glows = glows;
        self
    }

    /// Mean density of the visual sphere. Zero for a zero-radius body.
    pub fn density(&self) -> f64 {
        let volume = 4.0 / 3.0 * std::f64::consts::PI * self.radius.powi(3);
        if volume > 0.0 { self.m / volume } else { 0.0 }
    }

    pub fn mesh_resolution(&self) -> (usize, usize) {
        MESH_RESOLUTION
    }

    /// True when the body takes part in the dynamics
    pub fn is_active(&self) -> bool {
        self.m > 0.0 && !self.frozen
    }
}

// Bodies carry no identity of their own; equality is by physical value.
impl PartialEq for Body {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.v == other.v && self.m == other.m && self.radius == other.radius
    }
}

impl PointMass for Body {
    fn pos(&self) -> NVec3 {
        self.x
    }

    fn mass(&self) -> f64 {
        self.m
    }

    fn interacts(&self) -> bool {
        self.is_active()
    }
}

impl Renderable for Body {
    fn position(&self) -> NVec3 {
        self.x
    }

    fn color(&self) -> Rgb {
        self.color
    }

    fn radius(&self) -> f64 {
        self.radius
    }

    fn glows(&self) -> bool {
        self.glows
    }
}

/// Value copy of a body at some point in predictive time
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub x: NVec3,
    pub v: NVec3,
    pub m: f64,
    pub color: Rgb,
    pub stalled: bool, // prediction went non-finite, stop advancing
}

impl Snapshot {
    pub fn of(body: &Body) -> Self {
        Self {
            x: body.x,
            v: body.v,
            m: body.m,
            color: body.color,
            // frozen bodies stay where they are in the prediction as well
            stalled: body.frozen,
        }
    }
}

impl PointMass for Snapshot {
    fn pos(&self) -> NVec3 {
        self.x
    }

    fn mass(&self) -> f64 {
        self.m
    }

    fn interacts(&self) -> bool {
        self.m > 0.0 && !self.stalled
    }
}

/// Stable reference to a body in a [`BodyStore`].
///
/// A handle keeps resolving to the same body across insertions and removals
/// of other bodies, and stops resolving once its body is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle {
    slot: u32,
    generation: u32,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    dense: Option<usize>,
}

/// Dense, insertion-ordered body list with generation-checked handles
#[derive(Debug, Clone, Default)]
pub struct BodyStore {
    bodies: Vec<Body>,
    handles: Vec<BodyHandle>, // handles[i] belongs to bodies[i]
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl BodyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn insert(&mut self, body: Body) -> BodyHandle {
        let dense = self.bodies.len();
        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot as usize].dense = Some(dense);
                slot
            }
            None => {
                self.slots.push(Slot { generation: 0, dense: Some(dense) });
                (self.slots.len() - 1) as u32
            }
        };
        let handle = BodyHandle {
            slot,
            generation: self.slots[slot as usize].generation,
        };
        self.bodies.push(body);
        self.handles.push(handle);
        handle
    }

    /// Remove a body, keeping the order of the remaining ones
    pub fn remove(&mut self, handle: BodyHandle) -> Option<Body> {
        let dense = self.index_of(handle)?;
        let body = self.bodies.remove(dense);
        self.handles.remove(dense);

        // everything after the removed body shifted down by one
        for h in &self.handles[dense..] {
            if let Some(d) = self.slots[h.slot as usize].dense.as_mut() {
                *d -= 1;
            }
        }

        let slot = &mut self.slots[handle.slot as usize];
        slot.generation = slot.generation.wrapping_add(1);
        slot.dense = None;
        self.free.push(handle.slot);
        Some(body)
    }

    /// Drop every body and invalidate every outstanding handle
    pub fn clear(&mut self) {
        for h in self.handles.drain(..) {
            let slot = &mut self.slots[h.slot as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.dense = None;
            self.free.push(h.slot);
        }
        self.bodies.clear();
    }

    /// Atomically swap the whole body list for a new one
    pub fn replace_all(&mut self, bodies: impl IntoIterator<Item = Body>) -> Vec<BodyHandle> {
        self.clear();
        bodies.into_iter().map(|b| self.insert(b)).collect()
    }

    pub fn index_of(&self, handle: BodyHandle) -> Option<usize> {
        let slot = self.slots.get(handle.slot as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.dense
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.index_of(handle).is_some()
    }

    pub fn handle_at(&self, index: usize) -> Option<BodyHandle> {
        self.handles.get(index).copied()
    }

    pub fn get(&self, handle: BodyHandle) -> Option<&Body> {
        self.index_of(handle).map(|i| &self.bodies[i])
    }

    pub fn get_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        let i = self.index_of(handle)?;
        Some(&mut self.bodies[i])
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn bodies_mut(&mut self) -> &mut [Body] {
        &mut self.bodies
    }

    pub fn handles(&self) -> &[BodyHandle] {
        &self.handles
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyHandle, &Body)> {
        self.handles.iter().copied().zip(self.bodies.iter())
    }
}
