//! Production source resolver: routes a URL to the video downloader or
//! the website scraper based on its platform.

use async_trait::async_trait;

use forkcast_core::sources::{detect_source_kind, SourceKind};

use crate::download::VideoDownloader;
use crate::scrape::WebsiteScraper;
use crate::stage::{SourcePayload, SourceResolver, StageError};

/// Classifies submitted URLs and delegates to the matching backend.
pub struct UrlResolver {
    downloader: VideoDownloader,
    scraper: WebsiteScraper,
}

impl UrlResolver {
    pub fn new(downloader: VideoDownloader, scraper: WebsiteScraper) -> Self {
        Self {
            downloader,
            scraper,
        }
    }
}

#[async_trait]
impl SourceResolver for UrlResolver {
    async fn resolve(&self, url: &str) -> Result<SourcePayload, StageError> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(StageError::UnsupportedUrl(url.to_string()));
        }

        match detect_source_kind(url) {
            SourceKind::TikTok | SourceKind::Instagram => {
                let (path, metadata) = self.downloader.download(url).await?;
                Ok(SourcePayload::MediaFile { path, metadata })
            }
            SourceKind::Website => {
                let recipe = self.scraper.scrape(url).await?;
                Ok(SourcePayload::ScrapedRecipe(recipe))
            }
        }
    }
}
