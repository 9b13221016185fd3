use std::io::Write;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use apkgraph_core::ProvidesMap;
use apkgraph_registry::{http_client, load_package_index, IndexSource};
use apkgraph_resolver::{resolve, serialize, ClosureResult};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod config;
mod diagram;
mod render;

use config::AppConfig;
use diagram::{render_image, run_display_script, write_image};
use render::TerminalRenderer;

#[derive(Parser, Debug)]
#[command(name = "apkgraph")]
#[command(about = "Draw the runtime dependency graph of an Alpine package", long_about = None)]
struct Cli {
    /// Package whose dependencies are drawn
    package: String,
    /// Script run as `bash <script> <image>` to show the rendered graph
    #[arg(required_unless_present_any = ["print", "json"])]
    script: Option<PathBuf>,
    #[arg(long)]
    config: Option<PathBuf>,
    /// Local APKINDEX (plain text or .tar.gz) used instead of the mirror
    #[arg(long)]
    index: Option<PathBuf>,
    #[arg(long)]
    mirror: Option<String>,
    #[arg(long)]
    release: Option<String>,
    #[arg(long)]
    repository: Option<String>,
    #[arg(long)]
    arch: Option<String>,
    /// Where the rendered image is written
    #[arg(long)]
    output: Option<PathBuf>,
    /// Print the mermaid description instead of rendering it
    #[arg(long, conflicts_with = "json")]
    print: bool,
    /// Print the resolved closure as JSON instead of rendering it
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn apply_overrides(&self, config: &mut AppConfig) {
        let location = &mut config.index;
        if let Some(mirror) = &self.mirror {
            location.mirror = mirror.clone();
        }
        if let Some(release) = &self.release {
            location.release = release.clone();
        }
        if let Some(repository) = &self.repository {
            location.repository = repository.clone();
        }
        if let Some(arch) = &self.arch {
            location.arch = arch.clone();
        }
        if let Some(output) = &self.output {
            config.render.image_path = output.clone();
        }
    }

    fn index_source(&self, config: &AppConfig) -> IndexSource {
        match &self.index {
            Some(path) => IndexSource::File(path.clone()),
            None => IndexSource::Mirror(config.index.clone()),
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let stdout = std::io::stdout();
    run_cli(Cli::parse(), &mut stdout.lock())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run_cli(cli: Cli, out: &mut impl Write) -> Result<()> {
    let renderer = TerminalRenderer::current();
    let mut config = AppConfig::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);

    let client = http_client()?;
    let source = cli.index_source(&config);
    let spinner = renderer.start_spinner("fetch index");
    let index = match load_package_index(&client, &source) {
        Ok(index) => {
            spinner.finish_success();
            index
        }
        Err(err) => {
            spinner.finish_abandon();
            return Err(err);
        }
    };
    debug!(source = %source.describe(), packages = index.len(), "loaded package index");

    let provides = ProvidesMap::build(&index).with_overrides(config.provides.clone());
    let closure = resolve(&index, &provides, &cli.package)?;
    report_unresolved(renderer, &closure);

    if cli.json {
        let rendered =
            serde_json::to_string_pretty(&closure).context("failed serializing closure")?;
        writeln!(out, "{rendered}").context("failed writing closure")?;
        return Ok(());
    }

    let diagram = serialize(&cli.package, &closure);
    if cli.print {
        writeln!(out, "{}", diagram.trim_end_matches('\n')).context("failed writing graph")?;
        return Ok(());
    }

    let script = cli
        .script
        .as_deref()
        .ok_or_else(|| anyhow!("a display script is required to show the graph"))?;
    let spinner = renderer.start_spinner("render graph");
    let image = match render_image(&client, &config.render.base_url, &diagram) {
        Ok(image) => {
            spinner.finish_success();
            image
        }
        Err(err) => {
            spinner.finish_abandon();
            return Err(err);
        }
    };
    let image_path = &config.render.image_path;
    write_image(image_path, &image)?;
    renderer.print_status(
        "ok",
        &format!(
            "rendered {} dependencies of {} to {}",
            closure.visited.len().saturating_sub(1),
            cli.package,
            image_path.display()
        ),
    );

    run_display_script(script, image_path)
}

fn report_unresolved(renderer: TerminalRenderer, closure: &ClosureResult) {
    if closure.unresolved.is_empty() {
        return;
    }

    renderer.print_section("Unresolved dependencies");
    for dropped in &closure.unresolved {
        debug!(package = %dropped.package, token = %dropped.token, "dependency not found in index");
        renderer.print_status(
            "warn",
            &format!("{} depends on unknown '{}'", dropped.package, dropped.token),
        );
    }
}
