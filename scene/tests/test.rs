use collisions::PhysicsBody;
use common::vector::Vec2;
use quadtree::QuadtreeError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use scene::chunk_grid::MAX_CHUNKS_PER_AXIS;
use scene::{
    Camera, ChunkGrid, Entity, EntityId, Scene, SceneConfig, SceneError, SceneRegistry,
};
use std::collections::HashSet;

fn square(x: f32, y: f32, size: f32) -> PhysicsBody {
    PhysicsBody::new(Vec2::new(x, y)).with_box_hull(size, size)
}

#[test]
fn test_chunk_grid_degenerate_span() {
    let mut grid = ChunkGrid::new();
    let anchors = vec![Vec2::new(5.0, 5.0), Vec2::new(5.0, 5.0)];
    grid.rebuild(&anchors, 100.0);

    assert_eq!((grid.cols(), grid.rows()), (1, 1));
    assert_eq!(grid.bucket_of(5.0, 5.0), (0, 0));
    assert_eq!(grid.bucket(0, 0), &[0, 1]);

    let mut out = Vec::new();
    grid.surrounding(&Vec2::new(5.0, 5.0), 1, &mut out);
    assert_eq!(out, vec![0, 1]);
}

#[test]
fn test_chunk_grid_empty() {
    let mut grid = ChunkGrid::new();
    grid.rebuild::<Vec2>(&[], 100.0);

    assert!(grid.is_empty());
    assert_eq!(grid.bounds(), None);
    assert_eq!(grid.bucket(0, 0), &[] as &[u32]);

    let mut out = Vec::new();
    grid.surrounding(&Vec2::zeros(), 3, &mut out);
    assert!(out.is_empty());
}

#[test]
fn test_chunk_grid_surrounding_clips_to_grid() {
    let mut grid = ChunkGrid::new();
    let anchors: Vec<Vec2> = (0..5).map(|i| Vec2::new(i as f32 * 10.0, 0.0)).collect();
    grid.rebuild(&anchors, 10.0);

    // Span 40 in chunks of 10, one row since every anchor shares y.
    assert_eq!((grid.cols(), grid.rows()), (4, 1));
    let cols: Vec<isize> = anchors.iter().map(|a| grid.bucket_of(a.x, a.y).0).collect();
    assert_eq!(cols, vec![0, 0, 1, 2, 3]);

    let surrounding = |reference: Vec2, radius: usize| {
        let mut out = Vec::new();
        grid.surrounding(&reference, radius, &mut out);
        out.sort_unstable();
        out
    };
    assert_eq!(surrounding(Vec2::new(0.0, 0.0), 1), vec![0, 1, 2]);
    assert_eq!(surrounding(Vec2::new(40.0, 0.0), 1), vec![3, 4]);
    assert_eq!(surrounding(Vec2::new(20.0, 0.0), 0), vec![2]);
    assert_eq!(surrounding(Vec2::new(20.0, 0.0), 5), vec![0, 1, 2, 3, 4]);
    // Reference just outside the grid still reaches the edge column.
    assert_eq!(surrounding(Vec2::new(-10.0, 0.0), 1), vec![0, 1]);
    assert!(surrounding(Vec2::new(-100.0, 0.0), 1).is_empty());
}

#[test]
fn test_chunk_grid_bucket_index_is_monotonic() {
    let mut rng: StdRng = SeedableRng::seed_from_u64(3);
    let anchors: Vec<Vec2> = (0..500)
        .map(|_| Vec2::new(rng.gen_range(-5000.0..5000.0), rng.gen_range(-300.0..300.0)))
        .collect();
    let mut grid = ChunkGrid::new();
    grid.rebuild(&anchors, 1920.0);

    assert!(grid.bounds().is_some());
    assert!(grid.cols() > 1);
    assert_eq!(grid.rows(), 1);

    let mut sorted = anchors.clone();
    sorted.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap());
    let cols: Vec<isize> = sorted.iter().map(|a| grid.bucket_of(a.x, a.y).0).collect();
    assert!(cols.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(cols[0], 0);
    assert!(*cols.last().unwrap() <= grid.cols() as isize - 1);

    // Every anchor lands in exactly one bucket.
    let total: usize = (0..grid.cols())
        .flat_map(|col| (0..grid.rows()).map(move |row| (col, row)))
        .map(|(col, row)| grid.bucket(col, row).len())
        .sum();
    assert_eq!(total, anchors.len());
}

#[test]
fn test_camera_chunk_radius_follows_zoom() {
    let screen_half = SceneConfig::default().screen_half();
    let camera = Camera::default();
    assert_eq!(camera.chunk_radius(screen_half, 1920.0, 1), 1);
    assert_eq!(camera.with_zoom(0.25).chunk_radius(screen_half, 1920.0, 1), 2);
    assert_eq!(camera.with_zoom(0.0).chunk_radius(screen_half, 1920.0, 1), 1);
    assert_eq!(camera.chunk_radius(screen_half, 100.0, 0), 10);
}

#[test]
fn test_add_and_remove_are_deferred() {
    let mut scene = Scene::new();
    let a = scene.add_entity(square(0.0, 0.0, 2.0), 2.0, 2.0, 0);
    let b = scene.add_entity(square(50.0, 0.0, 2.0), 2.0, 2.0, 0);

    assert!(scene.is_empty());
    assert!(scene.entity(a).is_none());
    assert_eq!(scene.pending_changes(), 2);

    scene.step(1.0).unwrap();
    assert_eq!(scene.len(), 2);
    assert_eq!(scene.entity(b).unwrap().id(), b);

    scene.remove_entity(a).unwrap();
    assert!(scene.entity(a).is_some());
    scene.step(1.0).unwrap();
    assert!(scene.entity(a).is_none());
    assert_eq!(scene.len(), 1);

    let c = scene.add_entity(square(0.0, 0.0, 2.0), 2.0, 2.0, 0);
    assert!(c.raw() > b.raw());
}

#[test]
fn test_remove_unknown_entity() {
    let mut scene = Scene::new();
    let id = scene.add_entity(square(0.0, 0.0, 2.0), 2.0, 2.0, 0);
    // Queued adds can be removed before they land.
    scene.remove_entity(id).unwrap();
    scene.step(1.0).unwrap();
    assert!(scene.is_empty());

    assert!(matches!(
        scene.remove_entity(id),
        Err(SceneError::UnknownEntity(unknown)) if unknown == id
    ));
}

#[test]
fn test_entities_ordered_by_layer_then_insertion() {
    let mut scene = Scene::new();
    let top = scene.add_entity(square(0.0, 0.0, 1.0), 1.0, 1.0, 2);
    let bottom_first = scene.add_entity(square(10.0, 0.0, 1.0), 1.0, 1.0, 0);
    let middle = scene.add_entity(square(20.0, 0.0, 1.0), 1.0, 1.0, 1);
    let bottom_second = scene.add_entity(square(30.0, 0.0, 1.0), 1.0, 1.0, 0);
    scene.step(1.0).unwrap();

    let order: Vec<EntityId> = scene.entities().iter().map(Entity::id).collect();
    assert_eq!(order, vec![bottom_first, bottom_second, middle, top]);
    assert_eq!(scene.entity(middle).unwrap().layer(), 1);
}

#[test]
fn test_far_entities_are_not_simulated() {
    let mut scene = Scene::new();
    let mut near_body = square(0.0, 0.0, 2.0);
    near_body.velocity = Vec2::new(0.1, 0.0);
    let mut far_body = square(100_000.0, 0.0, 2.0);
    far_body.velocity = Vec2::new(0.1, 0.0);

    let near = scene.add_entity(near_body, 2.0, 2.0, 0);
    let far = scene.add_entity(far_body, 2.0, 2.0, 0);
    let stats = scene.step(1.0).unwrap();

    assert_eq!(stats.entities, 2);
    assert_eq!(stats.working_set, 1);
    assert_eq!(scene.nearby_ids().collect::<Vec<_>>(), vec![near]);
    assert!((scene.entity(near).unwrap().body.position.x - 0.1).abs() < 1e-6);
    assert_eq!(scene.entity(far).unwrap().body.position.x, 100_000.0);

    // Moving the camera over swaps the working set.
    scene.camera_mut().position = Vec2::new(100_000.0, 0.0);
    scene.step(1.0).unwrap();
    assert_eq!(scene.nearby_ids().collect::<Vec<_>>(), vec![far]);
}

#[test]
fn test_overlapping_squares_resolved_once_in_opposite_directions() {
    let mut scene = Scene::new();
    let a = scene.add_entity(square(0.0, 0.0, 2.0), 2.0, 2.0, 0);
    let b = scene.add_entity(square(1.5, 0.0, 2.0), 2.0, 2.0, 0);
    let stats = scene.step(1.0).unwrap();

    assert_eq!(stats.working_set, 2);
    assert_eq!(stats.broad_phase_candidates, 4);
    assert_eq!(stats.narrow_phase.tests, 1);
    assert_eq!(stats.resolved_pairs, 1);
    assert_eq!(scene.collision_pairs(), vec![(a, b)]);

    let body_a = &scene.entity(a).unwrap().body;
    let body_b = &scene.entity(b).unwrap().body;
    assert_eq!(body_a.velocity, Vec2::new(1.0, 0.0));
    assert_eq!(body_b.velocity, -body_a.velocity);
    assert_eq!(body_a.position, Vec2::new(2.0, 0.0));
    assert_eq!(body_b.position, Vec2::new(-0.5, 0.0));
}

#[test]
fn test_distant_squares_never_reach_exact_test() {
    let mut scene = Scene::new();
    scene.add_entity(square(0.0, 0.0, 2.0), 2.0, 2.0, 0);
    scene.add_entity(square(10.0, 0.0, 2.0), 2.0, 2.0, 0);
    let stats = scene.step(1.0).unwrap();

    assert_eq!(stats.narrow_phase.exact_tests, 0);
    assert_eq!(stats.resolved_pairs, 0);
    assert!(scene.collision_pairs().is_empty());
}

#[test]
fn test_fixed_pair_is_left_alone() {
    let mut scene = Scene::new();
    let a = scene.add_entity(square(0.0, 0.0, 2.0).with_fixed(true), 2.0, 2.0, 0);
    scene.add_entity(square(1.5, 0.0, 2.0).with_fixed(true), 2.0, 2.0, 0);
    let stats = scene.step(1.0).unwrap();

    assert_eq!(stats.narrow_phase.filtered, stats.narrow_phase.tests);
    assert_eq!(stats.narrow_phase.circle_rejections, 0);
    assert_eq!(stats.resolved_pairs, 0);
    assert_eq!(scene.entity(a).unwrap().body.position, Vec2::zeros());
}

#[test]
fn test_each_pair_resolved_at_most_once() {
    let mut scene = Scene::new();
    for i in 0..6 {
        scene.add_entity(square(i as f32 * 0.5, 0.0, 4.0), 4.0, 4.0, 0);
    }
    let stats = scene.step(1.0).unwrap();
    let pairs = scene.collision_pairs();

    assert!(!pairs.is_empty());
    assert_eq!(pairs.len(), stats.resolved_pairs);
    let unique: HashSet<(EntityId, EntityId)> = pairs
        .iter()
        .map(|&(a, b)| (a.min(b), a.max(b)))
        .collect();
    assert_eq!(unique.len(), pairs.len());
    assert!(pairs.iter().all(|(a, b)| a != b));
}

#[test]
fn test_invalid_bounding_box_aborts_step() {
    let mut scene = Scene::new();
    scene.add_entity(square(0.0, 0.0, 2.0), f32::NAN, 2.0, 0);
    let result = scene.step(1.0);
    assert!(matches!(
        result,
        Err(SceneError::Quadtree(QuadtreeError::InvalidRectangleDims { .. }))
    ));
}

#[test]
fn test_sprite_size_applies_on_next_step() {
    let mut scene = Scene::new();
    let id = scene.add_entity(square(0.0, 0.0, 2.0), 2.0, 2.0, 0);
    scene.step(1.0).unwrap();

    scene.entity_mut(id).unwrap().set_sprite_size(8.0, 6.0);
    assert_eq!(scene.entity(id).unwrap().cache().width, 2.0);
    scene.step(1.0).unwrap();
    let cache = scene.entity(id).unwrap().cache();
    assert_eq!((cache.width, cache.height), (8.0, 6.0));
    assert_eq!(cache.aabb().width, 8.0);
}

#[test]
fn test_can_see_uses_zoom() {
    let mut scene = Scene::new();
    let near = scene.add_entity(square(0.0, 0.0, 10.0), 10.0, 10.0, 0);
    let far = scene.add_entity(square(5000.0, 0.0, 10.0), 10.0, 10.0, 0);
    scene.step(1.0).unwrap();

    assert!(scene.can_see(near).unwrap());
    assert!(!scene.can_see(far).unwrap());

    scene.camera_mut().zoom = 0.1;
    assert!(scene.can_see(far).unwrap());

    scene.remove_entity(far).unwrap();
    scene.step(1.0).unwrap();
    assert!(matches!(scene.can_see(far), Err(SceneError::UnknownEntity(_))));
}

#[test]
fn test_config_validation() {
    assert!(SceneConfig::default().validate().is_ok());

    let config = SceneConfig {
        chunk_size: 0.0,
        ..SceneConfig::default()
    };
    assert!(matches!(
        Scene::with_config(config),
        Err(SceneError::InvalidConfig(_))
    ));

    let mut config = SceneConfig::default();
    config.quadtree.node_capacity = 0;
    assert!(config.validate().is_err());

    let config = SceneConfig {
        screen_height: f32::NAN,
        ..SceneConfig::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_registry() {
    let mut registry = SceneRegistry::new();
    assert!(registry.is_empty());

    assert!(registry.register("level-1", Scene::new()).is_none());
    assert!(registry.register("level-2", Scene::new()).is_none());
    assert_eq!(registry.len(), 2);

    registry
        .find_mut("level-1")
        .unwrap()
        .add_entity(square(0.0, 0.0, 1.0), 1.0, 1.0, 0);
    assert_eq!(registry.find("level-1").unwrap().pending_changes(), 1);

    let previous = registry.register("level-1", Scene::new()).unwrap();
    assert_eq!(previous.pending_changes(), 1);

    let mut names: Vec<&str> = registry.names().collect();
    names.sort_unstable();
    assert_eq!(names, vec!["level-1", "level-2"]);

    assert!(registry.unregister("level-2").is_some());
    assert!(registry.find("level-2").is_none());
    assert!(registry.unregister("level-2").is_none());
}

#[test]
fn test_aborted_step_reports_no_stale_pairs() {
    let mut scene = Scene::new();
    let a = scene.add_entity(square(0.0, 0.0, 2.0), 2.0, 2.0, 0);
    let b = scene.add_entity(square(1.5, 0.0, 2.0), 2.0, 2.0, 0);
    let far = scene.add_entity(square(100_000.0, 0.0, 2.0), 2.0, 2.0, 0);
    scene.step(1.0).unwrap();
    assert_eq!(scene.collision_pairs(), vec![(a, b)]);

    scene.entity_mut(far).unwrap().set_sprite_size(f32::NAN, 2.0);
    scene.camera_mut().position = Vec2::new(100_000.0, 0.0);
    assert!(scene.step(1.0).is_err());
    assert!(scene.collision_pairs().is_empty());
}

#[test]
fn test_chunk_grid_huge_radius_covers_grid() {
    let mut grid = ChunkGrid::new();
    let anchors: Vec<Vec2> = (0..5).map(|i| Vec2::new(i as f32 * 10.0, 0.0)).collect();
    grid.rebuild(&anchors, 10.0);

    let mut out = Vec::new();
    grid.surrounding(&Vec2::new(20.0, 0.0), usize::MAX, &mut out);
    out.sort_unstable();
    assert_eq!(out, vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_extreme_zoom_out_simulates_everything() {
    let mut scene = Scene::new();
    scene.add_entity(square(0.0, 0.0, 2.0), 2.0, 2.0, 0);
    scene.add_entity(square(100_000.0, 0.0, 2.0), 2.0, 2.0, 0);
    scene.camera_mut().zoom = 1e-20;

    let stats = scene.step(1.0).unwrap();
    assert_eq!(stats.working_set, 2);
}

#[test]
fn test_chunk_grid_caps_bucket_count() {
    let mut grid = ChunkGrid::new();
    let anchors = vec![Vec2::new(0.0, 0.0), Vec2::new(1e8, 1e8)];
    grid.rebuild(&anchors, 1.0);

    assert_eq!((grid.cols(), grid.rows()), (MAX_CHUNKS_PER_AXIS, MAX_CHUNKS_PER_AXIS));
    assert_eq!(grid.bucket(0, 0), &[0]);
    let (col, row) = grid.bucket_of(1e8, 1e8);
    assert!(col >= 1000 && row >= 1000);
    assert_eq!(grid.bucket(col as usize, row as usize), &[1]);

    let mut out = Vec::new();
    grid.surrounding(&Vec2::new(0.0, 0.0), 1, &mut out);
    assert_eq!(out, vec![0]);
}
