//! The `convert` and `serve` commands.

use std::fs;
use std::io::{self, Write};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use flowconv_common::{Diagnostics, Severity};
use flowconv_converter::{ConvertOptions, File, LegacyConfig, PlatformDefaults};
use flowconv_runtime::{Host, RuntimeError};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::{ConfigError, ToolConfig};

/// Command errors.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Load(#[from] flowconv_common::Error),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Conversion reported {0} critical diagnostic(s); use --bypass-errors to keep the output")]
    Critical(usize),

    #[error("Invalid listen address: {0}")]
    ListenAddr(String),
}

pub type Result<T> = std::result::Result<T, CommandError>;

/// The result of converting one legacy config.
#[derive(Debug)]
pub struct Conversion {
    pub file: File,
    pub diagnostics: Diagnostics,
}

/// Conversion options from the tool config.
///
/// `supervisord_url` comes from the environment, read once by the caller.
pub fn convert_options(config: &ToolConfig, supervisord_url: Option<String>) -> ConvertOptions {
    let mut defaults = match config.conversion.platform {
        Some(platform) => PlatformDefaults::for_platform(platform),
        None => PlatformDefaults::default(),
    };
    if let Some(url) = supervisord_url {
        defaults = defaults.with_supervisord_url(url);
    }
    ConvertOptions {
        defaults,
        bypass_errors: config.conversion.bypass_errors,
    }
}

/// Load a legacy config file and convert it.
pub fn convert_path(input: &Path, options: &ConvertOptions) -> Result<Conversion> {
    let cfg: LegacyConfig = flowconv_common::load_config(input)?;
    let (file, diagnostics) = flowconv_converter::convert(&cfg, options);

    info!(
        input = %input.display(),
        platform = %options.defaults.platform,
        blocks = file.len(),
        critical = diagnostics.count(Severity::Critical),
        "Converted legacy config"
    );
    Ok(Conversion { file, diagnostics })
}

/// Write the diagnostics report, then the rendered graph unless the
/// conversion must fail.
///
/// `None` paths mean stderr for the report and stdout for the output.
pub fn write_conversion(
    conversion: &Conversion,
    options: &ConvertOptions,
    output: Option<&Path>,
    report: Option<&Path>,
) -> Result<()> {
    if !conversion.diagnostics.is_empty() {
        let mut text = conversion.diagnostics.report();
        text.push('\n');
        match report {
            Some(path) => write_file(path, &text)?,
            None => eprint!("{}", text),
        }
    }

    if options.should_fail(&conversion.diagnostics) {
        return Err(CommandError::Critical(
            conversion.diagnostics.count(Severity::Critical),
        ));
    }

    let rendered = conversion.file.render();
    match output {
        Some(path) => write_file(path, &rendered)?,
        None => io::stdout()
            .write_all(rendered.as_bytes())
            .map_err(|source| CommandError::Write {
                path: PathBuf::from("<stdout>"),
                source,
            })?,
    }
    Ok(())
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|source| CommandError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = content.len(), "Wrote file");
    Ok(())
}

/// Build a host running every block of `file` that names a built-in
/// component. Other blocks are skipped.
pub fn build_host(file: &File, listen: &str) -> Result<Arc<Host>> {
    let host = Host::with_builtin(listen);

    let mut skipped = 0;
    for block in file.blocks() {
        let name = block.name().join(".");
        if !host.is_registered(&name) {
            skipped += 1;
            continue;
        }
        host.build(&name, block.label(), block.body().clone())?;
    }

    if host.component_ids().is_empty() {
        warn!("No runnable components in the converted config");
    }
    info!(
        components = host.component_ids().len(),
        skipped, "Built components"
    );
    Ok(Arc::new(host))
}

/// Serve `host` on `listen` until `cancel` fires.
pub async fn serve(host: Arc<Host>, listen: &str, cancel: CancellationToken) -> Result<()> {
    let addr: SocketAddr = listen
        .parse()
        .map_err(|_| CommandError::ListenAddr(listen.to_string()))?;
    host.serve(addr, cancel).await?;
    Ok(())
}
