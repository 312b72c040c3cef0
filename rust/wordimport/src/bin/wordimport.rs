use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

use wordimport::{
    clean_html_text, FsAssetStore, ImportConfig, Importer, MarkupRepair, Namespace,
    StyleFramework, WordmlEngine,
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a .docx file and print the JSON response on stdout.
    Convert {
        /// Input .docx file.
        #[arg(long)]
        input: PathBuf,

        /// Directory that receives extracted images.
        #[arg(long)]
        store_dir: PathBuf,

        /// JSON settings file (optional; defaults apply to missing keys).
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long, default_value_t = 1)]
        context_id: u64,

        #[arg(long, default_value_t = 0)]
        item_id: u64,

        /// Overrides `base_url` from the settings file.
        #[arg(long)]
        base_url: Option<String>,

        /// Overrides `style_framework`: bootstrap, daylight or none.
        #[arg(long)]
        style_framework: Option<String>,

        /// Keep the merged document and pass outputs in the work directory.
        #[arg(long)]
        keep_artifacts: bool,

        #[arg(long)]
        work_dir: Option<PathBuf>,
    },
    /// Run an HTML fragment through the entity normalizer.
    Clean {
        #[arg(long)]
        html_file: PathBuf,

        /// Use tag stripping instead of full markup repair.
        #[arg(long)]
        no_repair: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    match Args::parse().command {
        Command::Convert {
            input,
            store_dir,
            config,
            context_id,
            item_id,
            base_url,
            style_framework,
            keep_artifacts,
            work_dir,
        } => {
            let mut settings = match &config {
                Some(path) => ImportConfig::load(path)
                    .with_context(|| format!("load settings {}", path.display()))?,
                None => ImportConfig::default(),
            };
            if let Some(url) = base_url {
                settings.base_url = url;
            }
            if let Some(name) = style_framework {
                settings.style_framework = StyleFramework::parse(&name)
                    .with_context(|| format!("unknown style framework {name}"))?;
            }
            if keep_artifacts {
                settings.retain_artifacts = true;
            }
            if work_dir.is_some() {
                settings.work_dir = work_dir;
            }

            let bytes = fs::read(&input).with_context(|| format!("read {}", input.display()))?;
            let store = FsAssetStore::new(store_dir);
            let importer = Importer::new(Some(&WordmlEngine), &store, &settings);
            let response = importer.respond(
                &bytes,
                Namespace {
                    context_id,
                    item_id,
                },
            );
            println!("{}", response.to_json());
            if response.is_error() {
                std::process::exit(1);
            }
        }
        Command::Clean {
            html_file,
            no_repair,
        } => {
            let html = fs::read_to_string(&html_file)
                .with_context(|| format!("read {}", html_file.display()))?;
            let repair = if no_repair {
                MarkupRepair::Unavailable
            } else {
                MarkupRepair::Full
            };
            println!("{}", clean_html_text(&html, repair));
        }
    }
    Ok(())
}
