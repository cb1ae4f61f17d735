use crate::camera::Camera;
use crate::chunk_grid::ChunkGrid;
use crate::config::SceneConfig;
use crate::entity::{Entity, EntityId, LayerId};
use crate::error::{SceneError, SceneResult};

use collisions::{resolve_pair, NarrowPhase, NarrowPhaseStats, PhysicsBody};
use common::shapes::Rectangle;
use fxhash::FxHashMap;
use quadtree::quadtree::QuadTree;
use smallvec::SmallVec;
use tracing::{debug, trace};

/// Working-set indices of the partners a member has already been resolved
/// against this frame.
type PairPartners = SmallVec<[u32; 4]>;

enum PendingChange {
    Add(Entity),
    Remove(EntityId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    pub entities: usize,
    pub working_set: usize,
    pub chunk_cols: usize,
    pub chunk_rows: usize,
    /// Values returned by quadtree queries, before any filtering.
    pub broad_phase_candidates: usize,
    pub narrow_phase: NarrowPhaseStats,
    pub resolved_pairs: usize,
}

/// Entity container and the per-frame collision pipeline.
///
/// Entities are kept ordered by layer, then insertion. Adds and removes are
/// queued and applied at the start of the next `step`, so a frame never
/// sees the population change under it.
pub struct Scene {
    config: SceneConfig,
    camera: Camera,
    entities: Vec<Entity>,
    index_of: FxHashMap<EntityId, usize>,
    pending: Vec<PendingChange>,
    next_id: u32,
    chunk_grid: ChunkGrid,
    quadtree: QuadTree,
    narrow_phase: NarrowPhase,
    // Indices into `entities`.
    working_set: Vec<u32>,
    pair_partners: Vec<PairPartners>,
    candidates: Vec<u32>,
}

impl Scene {
    pub fn new() -> Self {
        Self::build(SceneConfig::default())
    }

    pub fn with_config(config: SceneConfig) -> SceneResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: SceneConfig) -> Self {
        let quadtree = QuadTree::new_with_config(Rectangle::default(), config.quadtree.clone());
        Scene {
            config,
            camera: Camera::default(),
            entities: Vec::new(),
            index_of: FxHashMap::default(),
            pending: Vec::new(),
            next_id: 0,
            chunk_grid: ChunkGrid::new(),
            quadtree,
            narrow_phase: NarrowPhase::new(),
            working_set: Vec::new(),
            pair_partners: Vec::new(),
            candidates: Vec::new(),
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Queues a new entity. It becomes visible to accessors at the next step.
    pub fn add_entity(
        &mut self,
        body: PhysicsBody,
        width: f32,
        height: f32,
        layer: LayerId,
    ) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.pending
            .push(PendingChange::Add(Entity::new(id, layer, body, width, height)));
        id
    }

    /// Queues a removal, applied at the next step.
    pub fn remove_entity(&mut self, id: EntityId) -> SceneResult<()> {
        let queued = self
            .pending
            .iter()
            .any(|change| matches!(change, PendingChange::Add(entity) if entity.id() == id));
        if !queued && !self.index_of.contains_key(&id) {
            return Err(SceneError::UnknownEntity(id));
        }
        self.pending.push(PendingChange::Remove(id));
        Ok(())
    }

    pub fn pending_changes(&self) -> usize {
        self.pending.len()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.index_of.get(&id).map(|&index| &self.entities[index])
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        match self.index_of.get(&id) {
            Some(&index) => Some(&mut self.entities[index]),
            None => None,
        }
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Entities simulated during the last step.
    pub fn nearby_entities(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.working_set
            .iter()
            .map(move |&index| &self.entities[index as usize])
    }

    pub fn nearby_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.nearby_entities().map(Entity::id)
    }

    /// Pairs resolved during the last step, each reported once.
    pub fn collision_pairs(&self) -> Vec<(EntityId, EntityId)> {
        let mut pairs = Vec::new();
        for (i, partners) in self.pair_partners.iter().enumerate() {
            for &j in partners {
                if (i as u32) < j {
                    pairs.push((self.working_set_id(i as u32), self.working_set_id(j)));
                }
            }
        }
        pairs
    }

    pub fn can_see(&self, id: EntityId) -> SceneResult<bool> {
        let entity = self.entity(id).ok_or(SceneError::UnknownEntity(id))?;
        Ok(self
            .camera
            .can_see(entity.cache(), self.config.screen_half()))
    }

    pub fn chunk_grid(&self) -> &ChunkGrid {
        &self.chunk_grid
    }

    /// Advances the scene by `dt`.
    ///
    /// Every cache is refreshed before the grid is built, and each working
    /// set member is refreshed again after it moves, so the quadtree and
    /// the narrow phase see this frame's positions. A rejected bounding box
    /// aborts the frame.
    pub fn step(&mut self, dt: f32) -> SceneResult<FrameStats> {
        self.apply_pending();

        for entity in &mut self.entities {
            entity.refresh_cache();
        }

        self.chunk_grid
            .rebuild(&self.entities, self.config.chunk_size);

        let radius = self.camera.chunk_radius(
            self.config.screen_half(),
            self.config.chunk_size,
            self.config.chunk_radius,
        );
        self.working_set.clear();
        // Partner lists index the working set; stale ones must not outlive it.
        self.pair_partners.clear();
        self.chunk_grid
            .surrounding(&self.camera, radius, &mut self.working_set);
        self.working_set.sort_unstable();

        for &index in &self.working_set {
            let entity = &mut self.entities[index as usize];
            entity.body.integrate(dt);
            entity.refresh_cache();
        }

        self.rebuild_quadtree()?;

        // Narrow phase counters cover one frame.
        self.narrow_phase.take_stats();
        let (broad_phase_candidates, resolved_pairs) = self.resolve_collisions();

        let stats = FrameStats {
            entities: self.entities.len(),
            working_set: self.working_set.len(),
            chunk_cols: self.chunk_grid.cols(),
            chunk_rows: self.chunk_grid.rows(),
            broad_phase_candidates,
            narrow_phase: self.narrow_phase.stats(),
            resolved_pairs,
        };
        debug!(
            entities = stats.entities,
            working_set = stats.working_set,
            candidates = stats.broad_phase_candidates,
            exact_tests = stats.narrow_phase.exact_tests,
            resolved = stats.resolved_pairs,
            "scene step"
        );
        Ok(stats)
    }

    fn apply_pending(&mut self) {
        if self.pending.is_empty() {
            return;
        }

        for change in self.pending.drain(..) {
            match change {
                PendingChange::Add(entity) => self.entities.push(entity),
                PendingChange::Remove(id) => self.entities.retain(|entity| entity.id() != id),
            }
        }

        // Stable, so insertion order holds within a layer.
        self.entities.sort_by_key(Entity::layer);
        self.index_of.clear();
        self.index_of.extend(
            self.entities
                .iter()
                .enumerate()
                .map(|(index, entity)| (entity.id(), index)),
        );
    }

    fn rebuild_quadtree(&mut self) -> SceneResult<()> {
        let mut aabbs = self
            .working_set
            .iter()
            .map(|&index| self.entities[index as usize].cache().aabb());
        let bounds = match aabbs.next() {
            Some(first) => aabbs.fold(first, |mut bounds, aabb| {
                bounds.expand_to_include(&aabb);
                bounds
            }),
            None => Rectangle::default(),
        };

        self.quadtree.rebuild(bounds);
        for (member, &index) in self.working_set.iter().enumerate() {
            let aabb = self.entities[index as usize].cache().aabb();
            self.quadtree.insert(member as u32, aabb)?;
        }
        Ok(())
    }

    fn resolve_collisions(&mut self) -> (usize, usize) {
        self.pair_partners.clear();
        self.pair_partners
            .resize_with(self.working_set.len(), PairPartners::new);

        let mut candidate_count = 0;
        let mut resolved = 0;

        for i in 0..self.working_set.len() {
            let a_index = self.working_set[i] as usize;
            self.candidates.clear();
            self.quadtree
                .query(&mut self.candidates, &self.entities[a_index].cache().aabb());
            candidate_count += self.candidates.len();

            for k in 0..self.candidates.len() {
                let j = self.candidates[k];
                if j as usize == i || self.pair_partners[i].contains(&j) {
                    continue;
                }

                let b_index = self.working_set[j as usize] as usize;
                let result = self.narrow_phase.test(
                    self.entities[a_index].cache(),
                    self.entities[b_index].cache(),
                );
                if !result.colliding {
                    continue;
                }

                let (a, b) = pair_mut(&mut self.entities, a_index, b_index);
                resolve_pair(&mut a.body, &mut b.body, &result);
                trace!(a = %a.id(), b = %b.id(), direction = ?result.direction, "resolved collision");

                self.pair_partners[i].push(j);
                self.pair_partners[j as usize].push(i as u32);
                resolved += 1;
            }
        }

        (candidate_count, resolved)
    }

    fn working_set_id(&self, member: u32) -> EntityId {
        self.entities[self.working_set[member as usize] as usize].id()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

fn pair_mut<T>(items: &mut [T], a: usize, b: usize) -> (&mut T, &mut T) {
    debug_assert_ne!(a, b);
    if a < b {
        let (low, high) = items.split_at_mut(b);
        (&mut low[a], &mut high[0])
    } else {
        let (low, high) = items.split_at_mut(a);
        (&mut high[0], &mut low[b])
    }
}
