use crate::scene::Scene;
use fxhash::FxHashMap;

/// Scenes by name, owned by the application instead of living in global
/// state.
#[derive(Default)]
pub struct SceneRegistry {
    scenes: FxHashMap<String, Scene>,
}

impl SceneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the scene previously registered under `name`, if any.
    pub fn register(&mut self, name: impl Into<String>, scene: Scene) -> Option<Scene> {
        self.scenes.insert(name.into(), scene)
    }

    pub fn unregister(&mut self, name: &str) -> Option<Scene> {
        self.scenes.remove(name)
    }

    pub fn find(&self, name: &str) -> Option<&Scene> {
        self.scenes.get(name)
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Scene> {
        self.scenes.get_mut(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.scenes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}
