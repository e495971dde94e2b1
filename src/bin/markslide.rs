use std::fs;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use anyhow::Result;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use markslide::render::concurrent::render_all_concurrent;
use markslide::render::MarkdownEngine;
use markslide::Fragment;
use markslide::RenderOptions;
use markslide::Section;
use markslide::Splitter;
use tracing_subscriber::EnvFilter;

/// Printed after every slide on stdout.
const SEPARATOR: &str = "==================";

#[derive(Parser)]
#[command(name = "markslide")]
#[command(about = "Split a markdown deck into slides and render each to HTML")]
#[command(version)]
struct Cli {
    /// Log debug output to stderr (otherwise RUST_LOG decides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render every slide to an HTML fragment
    Render {
        #[command(flatten)]
        source: SourceArgs,

        /// Do not add id attributes to headings
        #[arg(long)]
        no_heading_ids: bool,

        /// Emit HTML5 void elements (`<br>`) instead of XHTML (`<br />`)
        #[arg(long)]
        html5: bool,

        /// Keep going when a slide fails to render
        #[arg(long)]
        isolate: bool,

        /// Render slides in parallel
        #[arg(long, conflicts_with = "isolate")]
        concurrent: bool,

        /// Write slide-001.html, slide-002.html, ... into this directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the raw markdown of every slide
    Split {
        #[command(flatten)]
        source: SourceArgs,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// Input markdown file
    #[arg(short, long)]
    input: PathBuf,

    /// Literal text separating slides
    #[arg(short, long, default_value = markslide::DEFAULT_DELIMITER)]
    delimiter: String,

    /// Longest accepted line in bytes
    #[arg(long, default_value_t = markslide::split::DEFAULT_MAX_LINE_LEN)]
    max_line_len: usize,
}

impl SourceArgs {
    fn sections(&self) -> Result<Vec<Section>> {
        let splitter = Splitter::new(self.delimiter.as_bytes())?.with_max_line_len(self.max_line_len);

        tracing::debug!(
            "splitting {} on {:?}",
            self.input.display(),
            String::from_utf8_lossy(splitter.delimiter())
        );

        splitter
            .split_file(&self.input)
            .with_context(|| format!("Failed to split input file: {}", self.input.display()))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Render {
            source,
            no_heading_ids,
            html5,
            isolate,
            concurrent,
            output,
        } => {
            let options = RenderOptions {
                heading_ids: !no_heading_ids,
                xhtml: !html5,
                ..RenderOptions::default()
            };
            render_command(&source, &options, isolate, concurrent, output.as_deref()).await?;
        }
        Commands::Split { source } => {
            let sections = source.sections()?;
            print_slides(&sections)?;
        }
    }

    Ok(())
}

async fn render_command(
    source: &SourceArgs,
    options: &RenderOptions,
    isolate: bool,
    concurrent: bool,
    output: Option<&Path>,
) -> Result<()> {
    let sections = source.sections()?;
    tracing::info!("{} slides in {}", sections.len(), source.input.display());

    let engine = MarkdownEngine::new(options);

    let fragments: Vec<Fragment> = if isolate {
        markslide::render_each(&sections, &engine)
            .into_iter()
            .enumerate()
            .map(|(index, result)| match result {
                Ok(html) => html,
                Err(e) => {
                    tracing::warn!("slide {} failed to render: {}", index + 1, e);
                    format!("<!-- slide {} failed to render: {} -->\n", index + 1, e).into_bytes()
                }
            })
            .collect()
    } else if concurrent {
        render_all_concurrent(sections, Arc::new(engine))
            .await
            .context("Failed to render slides")?
    } else {
        markslide::render_all(&sections, &engine).context("Failed to render slides")?
    };

    match output {
        Some(dir) => write_slides(dir, &fragments),
        None => print_slides(&fragments),
    }
}

fn print_slides(slides: &[Vec<u8>]) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    for slide in slides {
        out.write_all(slide)?;
        writeln!(out)?;
        writeln!(out, "{SEPARATOR}")?;
    }

    out.flush()?;
    Ok(())
}

fn write_slides(dir: &Path, fragments: &[Fragment]) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

    for (index, html) in fragments.iter().enumerate() {
        let path = dir.join(format!("slide-{:03}.html", index + 1));
        fs::write(&path, html)
            .with_context(|| format!("Failed to write output file: {}", path.display()))?;
    }

    println!("Wrote {} slides to {}", fragments.len(), dir.display());
    Ok(())
}
