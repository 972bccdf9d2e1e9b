//! Graph assembly.
//!
//! Converters produce [`Block`]s and collect them in [`PrometheusBlocks`],
//! which emits them into a [`File`] in pipeline-stage order.

mod file;

pub use file::File;

use flowconv_common::{Diagnostics, Reference, Severity};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{ConvertError, Result};

/// One emittable component declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    name: Vec<String>,
    label: String,
    body: Value,
    summary: String,
    detail: String,
}

impl Block {
    /// Create a block from typed component arguments.
    pub fn new<T: Serialize>(name: &[&str], label: impl Into<String>, args: &T) -> Result<Self> {
        let label = label.into();
        let body = serde_json::to_value(args).map_err(|source| ConvertError::Encode {
            component: format!("{}.{}", name.join("."), label),
            source,
        })?;

        Ok(Self {
            name: name.iter().map(|s| s.to_string()).collect(),
            label,
            body,
            summary: String::new(),
            detail: String::new(),
        })
    }

    /// Attach the human-readable description used in diagnostics.
    pub fn with_summary(mut self, summary: impl Into<String>, detail: impl Into<String>) -> Self {
        self.summary = summary.into();
        self.detail = detail.into();
        self
    }

    pub fn name(&self) -> &[String] {
        &self.name
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// `<name path>.<label>`
    pub fn id(&self) -> String {
        format!("{}.{}", self.name.join("."), self.label)
    }

    /// Reference to one exported field of this block.
    pub fn reference(&self, field: &str) -> Reference {
        Reference::new(self.name.iter().cloned(), self.label.clone(), field)
    }
}

/// Generated blocks grouped by pipeline stage.
#[derive(Debug, Clone, Default)]
pub struct PrometheusBlocks {
    discovery: Vec<Block>,
    discovery_relabel: Vec<Block>,
    scrape: Vec<Block>,
    relabel: Vec<Block>,
    remote_write: Vec<Block>,
}

impl PrometheusBlocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_discovery_block(&mut self, block: Block) {
        debug!(component = %block.id(), "Appending discovery block");
        self.discovery.push(block);
    }

    pub fn append_discovery_relabel_block(&mut self, block: Block) {
        debug!(component = %block.id(), "Appending discovery relabel block");
        self.discovery_relabel.push(block);
    }

    pub fn append_scrape_block(&mut self, block: Block) {
        debug!(component = %block.id(), "Appending scrape block");
        self.scrape.push(block);
    }

    pub fn append_relabel_block(&mut self, block: Block) {
        debug!(component = %block.id(), "Appending relabel block");
        self.relabel.push(block);
    }

    pub fn append_remote_write_block(&mut self, block: Block) {
        debug!(component = %block.id(), "Appending remote_write block");
        self.remote_write.push(block);
    }

    /// Emit every block: discovery, discovery relabel, scrape, relabel, then
    /// remote write, each in insertion order.
    pub fn append_to_file(&self, file: &mut File) {
        for block in self.stages() {
            file.append(block.clone());
        }
    }

    /// One Info diagnostic per scrape block listing the blocks that belong
    /// to it, plus one per remote write block.
    ///
    /// A block belongs to a scrape block when its label starts with the
    /// scrape block's label. This is a naming heuristic, not a graph walk:
    /// a job named `app` also claims the blocks of a job named `app_2`.
    pub fn get_scrape_info(&self) -> Diagnostics {
        let mut diags = Diagnostics::new();

        for scrape in &self.scrape {
            let mut detail = scrape.detail.clone();
            let related = self
                .discovery
                .iter()
                .chain(&self.discovery_relabel)
                .chain(&self.relabel)
                .filter(|b| b.label.starts_with(&scrape.label));
            for block in related {
                if !detail.is_empty() {
                    detail.push('\n');
                }
                detail.push_str(&block.detail);
            }
            diags.add_with_detail(Severity::Info, scrape.summary.clone(), detail);
        }

        for rw in &self.remote_write {
            diags.add_with_detail(Severity::Info, rw.summary.clone(), rw.detail.clone());
        }

        diags
    }

    /// All blocks in emission order.
    pub fn stages(&self) -> impl Iterator<Item = &Block> {
        self.discovery
            .iter()
            .chain(&self.discovery_relabel)
            .chain(&self.scrape)
            .chain(&self.relabel)
            .chain(&self.remote_write)
    }

    pub fn len(&self) -> usize {
        self.discovery.len()
            + self.discovery_relabel.len()
            + self.scrape.len()
            + self.relabel.len()
            + self.remote_write.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn block(name: &[&str], label: &str) -> Block {
        Block::new(name, label, &json!({}))
            .unwrap()
            .with_summary(format!("summary {}", label), format!("A {}.{} component", name.join("."), label))
    }

    #[test]
    fn test_block_reference() {
        let b = block(&["discovery", "consul"], "job1");
        assert_eq!(b.id(), "discovery.consul.job1");
        assert_eq!(b.reference("targets").expr(), "discovery.consul.job1.targets");
    }

    #[test]
    fn test_emission_order_ignores_insertion_order() {
        let mut pb = PrometheusBlocks::new();
        pb.append_remote_write_block(block(&["prometheus", "remote_write"], "default"));
        pb.append_relabel_block(block(&["prometheus", "relabel"], "job1"));
        pb.append_scrape_block(block(&["prometheus", "scrape"], "job1"));
        pb.append_discovery_relabel_block(block(&["discovery", "relabel"], "job1"));
        pb.append_discovery_block(block(&["discovery", "consul"], "job1"));
        pb.append_discovery_block(block(&["discovery", "dns"], "job1"));

        let mut file = File::new();
        pb.append_to_file(&mut file);

        let ids: Vec<_> = file.blocks().iter().map(Block::id).collect();
        assert_eq!(
            ids,
            vec![
                "discovery.consul.job1",
                "discovery.dns.job1",
                "discovery.relabel.job1",
                "prometheus.scrape.job1",
                "prometheus.relabel.job1",
                "prometheus.remote_write.default",
            ]
        );
        assert_eq!(pb.len(), 6);
    }

    #[test]
    fn test_scrape_info_prefix_matching() {
        let mut pb = PrometheusBlocks::new();
        pb.append_discovery_block(block(&["discovery", "consul"], "app"));
        pb.append_discovery_block(block(&["discovery", "consul"], "app_2"));
        pb.append_discovery_block(block(&["discovery", "dns"], "other"));
        pb.append_scrape_block(block(&["prometheus", "scrape"], "app"));
        pb.append_remote_write_block(block(&["prometheus", "remote_write"], "default"));

        let diags = pb.get_scrape_info();
        let all: Vec<_> = diags.iter().collect();
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|d| d.severity == Severity::Info));

        let detail = &all[0].detail;
        assert!(detail.contains("discovery.consul.app component"));
        // Prefix heuristic over-matches the unrelated job.
        assert!(detail.contains("discovery.consul.app_2 component"));
        assert!(!detail.contains("discovery.dns.other"));

        assert_eq!(all[1].summary, "summary default");
    }
}
