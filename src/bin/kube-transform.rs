//! kube-transform - Kubernetes transform plugin
//!
//! Reads one plugin request from stdin and writes the response to stdout.
//! An empty request (`{}`) prints the plugin metadata. Logs go to stderr.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use kube_transform::config;
use kube_transform::plugin::{KubernetesPlugin, PluginError, PluginErrorType, PluginOutput};
use kube_transform::{Resource, TracingDiagnostics};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "kube-transform", version, about = "Kubernetes transform plugin")]
struct Cli {
    /// Annotations to add to each resource (annotation1=value1,annotation2=value2)
    #[arg(long)]
    add_annotations: Option<String>,

    /// Annotations to remove (annotation1,annotation2)
    #[arg(long)]
    remove_annotations: Option<String>,

    /// Image registry prefixes to swap (original=target,...)
    #[arg(long)]
    registry_replacement: Option<String>,

    /// Additional GroupKinds to whiteout (Deployment.apps,Service,...)
    #[arg(long)]
    extra_whiteouts: Option<String>,

    /// Whiteout every GroupKind not listed here
    #[arg(long)]
    include_only: Option<String>,

    /// Disable whiting out owned pods and pod template resources
    #[arg(long)]
    disable_whiteout_owned: Option<String>,

    /// Transform a YAML or JSON manifest file instead of reading a request from stdin
    #[arg(long, value_name = "FILE")]
    manifest: Option<PathBuf>,
}

impl Cli {
    /// Option defaults in the same form as request extras.
    fn defaults(&self) -> BTreeMap<String, String> {
        [
            (config::ADD_ANNOTATIONS, &self.add_annotations),
            (config::REMOVE_ANNOTATIONS, &self.remove_annotations),
            (config::REGISTRY_REPLACEMENT, &self.registry_replacement),
            (config::EXTRA_WHITEOUTS, &self.extra_whiteouts),
            (config::INCLUDE_ONLY, &self.include_only),
            (config::DISABLE_WHITEOUT_OWNED, &self.disable_whiteout_owned),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.as_ref().map(|v| (name.to_string(), v.clone())))
        .collect()
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let plugin = KubernetesPlugin::new(cli.defaults());

    let result = match &cli.manifest {
        Some(path) => run_manifest(&plugin, path),
        None => run_stdin(&plugin),
    };

    match result.and_then(|output| write_output(&output)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let rendered = serde_json::to_string(&err).unwrap_or_else(|_| err.to_string());
            eprintln!("{}", rendered);
            ExitCode::FAILURE
        }
    }
}

fn run_stdin(plugin: &KubernetesPlugin) -> Result<PluginOutput, PluginError> {
    let mut input = Vec::new();
    io::stdin()
        .read_to_end(&mut input)
        .map_err(|e| io_error("error reading plugin input from input", e))?;
    plugin.handle(&input, &TracingDiagnostics)
}

fn run_manifest(plugin: &KubernetesPlugin, path: &Path) -> Result<PluginOutput, PluginError> {
    let content = fs::read_to_string(path)
        .map_err(|e| io_error(&format!("failed to read manifest {:?}", path), e))?;
    let resource = Resource::from_yaml(&content).map_err(|e| {
        PluginError::new(
            PluginErrorType::PluginInvalidInputError,
            "error reading resource from manifest",
            e.to_string(),
        )
    })?;
    plugin
        .run(&resource, &BTreeMap::new(), &TracingDiagnostics)
        .map(PluginOutput::Response)
        .map_err(|e| PluginError::from_run_error(&e))
}

fn write_output(output: &PluginOutput) -> Result<(), PluginError> {
    let json = output.to_json().map_err(|e| {
        PluginError::new(
            PluginErrorType::PluginRunError,
            "invalid json plugin output, unable to marshal in",
            e.to_string(),
        )
    })?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", json).map_err(|e| io_error("error writing plugin response to stdOut", e))
}

fn io_error(message: &str, err: io::Error) -> PluginError {
    PluginError::new(PluginErrorType::PluginInvalidIOError, message, err.to_string())
}
