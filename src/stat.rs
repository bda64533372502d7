use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Default, Serialize)]
pub struct Stats {
    pub path_length: usize,
    pub time_us: usize,
    pub expanded_nodes: usize,
    pub generated_nodes: usize,
    pub reopened_nodes: usize,
}

impl Stats {
    pub fn print(&self) {
        info!(
            "Path length {:?} Time(microseconds) {:?} Expanded nodes: {:?} Generated nodes: {:?} Reopened nodes: {:?}",
            self.path_length, self.time_us, self.expanded_nodes, self.generated_nodes, self.reopened_nodes
        );
    }
}
