use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{info, warn};

use crate::catalog::{self, StoryEntry, TIMESTAMPS};
use crate::parser::markup;
use crate::settings::Settings;
use crate::store;
use crate::template;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: StatusCode },
    #[error("all {tried} candidate URLs failed for {slug}")]
    Exhausted { slug: String, tried: usize },
}

/// A page body and the candidate URL that produced it.
#[derive(Debug)]
pub struct Fetched {
    pub url: String,
    pub html: String,
}

/// Download stats returned after completion.
#[derive(Debug, Default)]
pub struct DownloadStats {
    pub total: usize,
    pub ok: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl DownloadStats {
    pub fn succeeded(&self) -> usize {
        self.ok + self.skipped
    }
}

pub fn client(settings: &Settings) -> Result<Client> {
    Ok(Client::builder().user_agent(&settings.user_agent).build()?)
}

/// Every archive URL worth trying for a story: timestamps outer, page names inner.
pub fn candidate_urls(entry: &StoryEntry, settings: &Settings) -> Vec<String> {
    let archive = settings.archive_base.trim_end_matches('/');
    let site = settings.site_base.trim_end_matches('/');
    TIMESTAMPS
        .iter()
        .flat_map(|ts| {
            entry
                .pages
                .iter()
                .map(move |page| format!("{}/{}/{}/{}.html", archive, ts, site, page))
        })
        .collect()
}

async fn fetch_one(client: &Client, url: &str) -> Result<String, FetchError> {
    let transport = |source| FetchError::Transport {
        url: url.to_string(),
        source,
    };
    let response = client.get(url).send().await.map_err(transport)?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status,
        });
    }
    let bytes = response.bytes().await.map_err(transport)?;
    Ok(store::decode_text(&bytes))
}

/// Try candidates strictly in order until one returns a page.
pub async fn fetch_story(
    client: &Client,
    entry: &StoryEntry,
    settings: &Settings,
) -> Result<Fetched, FetchError> {
    let candidates = candidate_urls(entry, settings);
    let delay = Duration::from_millis(settings.request_delay_ms);

    for (attempt, url) in candidates.iter().enumerate() {
        if attempt > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        info!("Trying {}", url);
        match fetch_one(client, url).await {
            Ok(html) => {
                return Ok(Fetched {
                    url: url.clone(),
                    html,
                })
            }
            Err(e) => warn!("{}", e),
        }
    }

    Err(FetchError::Exhausted {
        slug: entry.slug.to_string(),
        tried: candidates.len(),
    })
}

/// Download stories into `dir` one at a time; a failed story never stops the run.
pub async fn download_all(
    client: &Client,
    settings: &Settings,
    dir: &Path,
    stories: &[&StoryEntry],
    force: bool,
) -> Result<DownloadStats> {
    store::ensure_dir(dir)?;

    let pb = ProgressBar::new(stories.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );

    let mut stats = DownloadStats {
        total: stories.len(),
        ..Default::default()
    };

    for entry in stories {
        pb.set_message(entry.slug);
        let path = store::story_path(dir, entry.slug);

        if !force && store::has_content(&path) {
            info!("{:?} already has content, skipping", path);
            stats.skipped += 1;
            pb.inc(1);
            continue;
        }

        match fetch_story(client, entry, settings).await {
            Ok(fetched) => {
                let title = markup::page_title(&fetched.html)
                    .unwrap_or_else(|| catalog::title_for(entry.slug));
                let content = markup::body_after_heading(&fetched.html);
                let page = template::render_raw(&title, &content);
                match store::write_atomic(&path, &page) {
                    Ok(()) => {
                        info!("Saved {:?} from {}", path, fetched.url);
                        stats.ok += 1;
                    }
                    Err(e) => {
                        warn!("{:#}", e);
                        stats.failed += 1;
                    }
                }
            }
            Err(e) => {
                warn!("Failed to download {}: {}", entry.slug, e);
                stats.failed += 1;
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    info!(
        "Downloaded {} stories ({} fetched, {} skipped, {} failed)",
        stats.total, stats.ok, stats.skipped, stats.failed
    );
    Ok(stats)
}
