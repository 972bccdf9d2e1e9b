//! Converters from legacy config sections to blocks.
//!
//! Each `append_*` function builds component arguments from one legacy
//! section, appends the resulting block to [`PrometheusBlocks`] and returns
//! the exports that later converters wire into their own arguments.

pub mod discovery;
pub mod http;
pub mod integrations;
pub mod remote_write;
pub mod scrape;
pub mod traces;

use flowconv_common::{Diagnostics, Severity};
use tracing::{debug, info, warn};

use crate::build::{Block, File, PrometheusBlocks};
use crate::defaults::PlatformDefaults;
use crate::legacy::LegacyConfig;
use crate::validate::validate;

pub use discovery::append_discovery;
pub use integrations::append_integrations;
pub use remote_write::append_remote_write;
pub use scrape::append_scrape_config;
pub use traces::convert_traces;

/// Label of the remote write fed by scrape jobs.
pub const DEFAULT_REMOTE_WRITE_LABEL: &str = "default";

/// Settings for one conversion.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Host-specific exporter defaults.
    pub defaults: PlatformDefaults,
    /// Keep the output even when Critical diagnostics were produced.
    pub bypass_errors: bool,
}

impl ConvertOptions {
    /// Whether the caller should discard the output.
    pub fn should_fail(&self, diags: &Diagnostics) -> bool {
        diags.has_critical() && !self.bypass_errors
    }
}

/// Attach the per-block description used in diagnostics.
pub(crate) fn describe(block: Block, summary: &str) -> Block {
    let detail = format!("A {} component", block.id());
    block.with_summary(summary, detail)
}

/// Convert a legacy config into a component graph.
///
/// Conversion is best effort: sections that validation reported are
/// skipped, everything else is emitted. Metrics blocks come first in
/// pipeline-stage order, followed by tracing pipeline blocks.
pub fn convert(cfg: &LegacyConfig, options: &ConvertOptions) -> (File, Diagnostics) {
    let mut diags = validate(cfg);
    let mut pb = PrometheusBlocks::new();

    let remote_write = match append_remote_write(
        &mut pb,
        DEFAULT_REMOTE_WRITE_LABEL,
        &cfg.remote_write,
        &cfg.global.external_labels,
    ) {
        Ok(exports) => exports,
        Err(e) => {
            warn!(error = %e, "Failed to convert remote_write");
            diags.add(Severity::Critical, format!("failed to convert remote_write: {}", e));
            None
        }
    };
    let forward_to: Vec<_> = remote_write.iter().map(|rw| rw.receiver.clone()).collect();

    for job in &cfg.scrape_configs {
        if let Err(e) = append_scrape_config(&mut pb, job, &cfg.global, &forward_to, Vec::new()) {
            warn!(job = %job.job_name, error = %e, "Failed to convert scrape job");
            diags.add(
                Severity::Critical,
                format!("failed to convert scrape job {:?}: {}", job.job_name, e),
            );
        }
    }

    if let Some(integrations) = &cfg.integrations {
        if let Err(e) = append_integrations(&mut pb, integrations, &cfg.global, &options.defaults) {
            warn!(error = %e, "Failed to convert integrations");
            diags.add(Severity::Critical, format!("failed to convert integrations: {}", e));
        }
    }

    let mut trace_blocks = Vec::new();
    if let Some(traces) = &cfg.traces {
        let receiver = remote_write.as_ref().map(|rw| &rw.receiver);
        match convert_traces(&mut pb, traces, receiver) {
            Ok(blocks) => trace_blocks = blocks,
            Err(e) => {
                warn!(error = %e, "Failed to convert traces");
                diags.add(Severity::Critical, format!("failed to convert traces: {}", e));
            }
        }
    }

    let mut file = File::new();
    pb.append_to_file(&mut file);
    for block in trace_blocks {
        debug!(component = %block.id(), "Appending traces block");
        file.append(block);
    }

    diags.add_all(pb.get_scrape_info());

    info!(
        blocks = file.len(),
        diagnostics = diags.len(),
        critical = diags.count(Severity::Critical),
        "Converted legacy config"
    );
    (file, diags)
}
