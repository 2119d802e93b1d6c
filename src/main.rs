mod archive;
mod catalog;
mod parser;
mod settings;
mod store;
mod template;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "story_archiver", about = "Archive and re-template old stories from the Wayback Machine")]
struct Cli {
    /// Stories directory (overrides STORIES_STORIES_DIR)
    #[arg(short, long, global = true)]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch stories from the archive into the stories directory
    Download {
        /// Only these slugs (default: every story in the catalog)
        #[arg(short, long = "story")]
        stories: Vec<String>,
        /// Re-download files that already have content
        #[arg(short, long)]
        force: bool,
    },
    /// Strip every story file down to its text and re-template it
    Clean,
    /// Download + clean in one go
    Run {
        #[arg(short, long = "story")]
        stories: Vec<String>,
        #[arg(short, long)]
        force: bool,
    },
    /// Print the paragraphs extracted from one HTML file
    Extract {
        file: PathBuf,
    },
    /// Show the story catalog
    List,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = settings::load()?;
    let dir = cli.dir.unwrap_or_else(|| settings.stories_dir.clone());

    let result = match cli.command {
        Commands::Download { stories, force } => {
            let entries = catalog::select(&stories)?;
            let client = archive::client(&settings)?;
            let stats = archive::download_all(&client, &settings, &dir, &entries, force).await?;
            print_download(&stats);
            Ok(())
        }
        Commands::Clean => {
            let stats = store::clean_all(&dir)?;
            print_clean(&stats);
            Ok(())
        }
        Commands::Run { stories, force } => {
            let entries = catalog::select(&stories)?;
            let client = archive::client(&settings)?;

            let t_download = Instant::now();
            let stats = archive::download_all(&client, &settings, &dir, &entries, force).await?;
            print_download(&stats);
            println!("Downloaded in {:.1}s", t_download.elapsed().as_secs_f64());

            if stats.succeeded() == 0 {
                println!("Nothing to clean (every download failed).");
                return Ok(());
            }
            let stats = store::clean_all(&dir)?;
            print_clean(&stats);
            Ok(())
        }
        Commands::Extract { file } => {
            let html = store::read_lossy(&file)?;
            let extraction = parser::story::extract(&html);
            println!("Tier: {:?}", extraction.tier);
            println!("{}", "-".repeat(60));
            for (i, p) in extraction.into_paragraphs().iter().enumerate() {
                println!("{:>3}. {}", i + 1, p);
            }
            Ok(())
        }
        Commands::List => {
            println!("{:<42} | {:<44} | {:>5} | {:<6}", "Slug", "Title", "Pages", "Saved");
            println!("{}", "-".repeat(106));
            for entry in catalog::STORIES {
                let saved = store::has_content(&store::story_path(&dir, entry.slug));
                println!(
                    "{:<42} | {:<44} | {:>5} | {:<6}",
                    entry.slug,
                    catalog::title_for(entry.slug),
                    entry.pages.len(),
                    if saved { "yes" } else { "-" }
                );
            }
            println!(
                "\n{} stories x {} snapshots | dir: {:?}",
                catalog::STORIES.len(),
                catalog::TIMESTAMPS.len(),
                dir
            );
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }

    result
}

fn print_download(stats: &archive::DownloadStats) {
    println!(
        "Downloaded {} out of {} stories ({} already on disk, {} failed).",
        stats.succeeded(),
        stats.total,
        stats.skipped,
        stats.failed
    );
}

fn print_clean(stats: &store::CleanStats) {
    println!("Cleaned {} out of {} story files.", stats.ok, stats.total);
    if stats.placeholders > 0 {
        println!("{} files fell back to the placeholder text.", stats.placeholders);
    }
}
