#[derive(Debug, Clone)]
pub struct Config {
    /// Node slots kept allocated across rebuilds.
    pub pool_size: usize,
    /// A leaf splits once it holds more than this many entries.
    pub node_capacity: usize,
    pub max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            pool_size: 64,
            node_capacity: 10,
            max_depth: 5,
        }
    }
}
