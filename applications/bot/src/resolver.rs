/// Catalog-backed media resolver
///
/// Answers searches from a TOML file of track descriptors:
///
/// ```toml
/// [[tracks]]
/// id = "dQw4w9WgXcQ"
/// title = "Never Gonna Give You Up"
/// url = "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
/// duration = "3:33"
/// author = "Rick Astley"
/// ```
use crate::error::{BotError, Result};
use crate::format::parse_clock;
use async_trait::async_trait;
use jukebox_core::{Author, MediaResolver, Thumbnail, Track, TrackMetadata};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    tracks: Vec<CatalogEntry>,
}

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    id: String,
    title: String,
    url: String,
    #[serde(default)]
    description: String,
    /// Clock format, absent for live streams
    duration: Option<String>,
    #[serde(default)]
    author: String,
    author_url: Option<String>,
    thumbnail: Option<String>,
    #[serde(default)]
    views: u64,
}

impl CatalogEntry {
    fn into_track(self) -> Result<Track> {
        let duration = self
            .duration
            .as_deref()
            .map(parse_clock)
            .transpose()
            .map_err(|e| BotError::Catalog(format!("track {}: {}", self.id, e)))?;

        let mut track = Track::new(self.id, self.title, self.url)
            .with_description(self.description)
            .with_author(Author {
                name: self.author,
                url: self.author_url,
                avatar: None,
            });

        if let Some(duration) = duration {
            track = track.with_duration(duration);
        }
        if let Some(url) = self.thumbnail {
            track = track.with_thumbnail(Thumbnail {
                url,
                width: 480,
                height: 360,
            });
        }
        track.views = self.views;

        Ok(track)
    }
}

pub struct CatalogResolver {
    tracks: Vec<Track>,
}

impl CatalogResolver {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    /// Parse a catalog document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let file: CatalogFile =
            toml::from_str(source).map_err(|e| BotError::Catalog(e.to_string()))?;

        let tracks = file
            .tracks
            .into_iter()
            .map(CatalogEntry::into_track)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::new(tracks))
    }

    /// Read and parse a catalog file
    pub async fn load(path: &Path) -> Result<Self> {
        let source = tokio::fs::read_to_string(path).await?;
        let resolver = Self::from_toml_str(&source)?;
        tracing::info!("Loaded {} catalog tracks from {:?}", resolver.len(), path);
        Ok(resolver)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// First track whose title or author contains every query word
    pub fn find(&self, query: &str) -> Option<&Track> {
        let words: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
        if words.is_empty() {
            return None;
        }

        self.tracks.iter().find(|track| {
            let haystack = format!("{} {}", track.title, track.author.name).to_lowercase();
            words.iter().all(|w| haystack.contains(w.as_str()))
        })
    }
}

#[async_trait]
impl MediaResolver for CatalogResolver {
    async fn search(
        &self,
        query: &str,
        metadata: TrackMetadata,
    ) -> jukebox_core::Result<Option<Track>> {
        let found = self.find(query).cloned().map(|t| t.with_metadata(metadata));
        tracing::debug!("Catalog search {:?}: {}", query, found.is_some());
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jukebox_core::{Requester, UserId};
    use std::time::Duration;

    const CATALOG: &str = r#"
[[tracks]]
id = "dQw4w9WgXcQ"
title = "Never Gonna Give You Up"
url = "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
duration = "3:33"
author = "Rick Astley"
thumbnail = "https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg"
views = 1500000000

[[tracks]]
id = "live"
title = "Lofi Radio"
url = "https://www.youtube.com/watch?v=live"
author = "Lofi Girl"
"#;

    #[test]
    fn parses_catalog() {
        let resolver = CatalogResolver::from_toml_str(CATALOG).unwrap();
        assert_eq!(resolver.len(), 2);

        let rick = resolver.find("never gonna").unwrap();
        assert_eq!(rick.duration, Some(Duration::from_secs(213)));
        assert_eq!(rick.author.name, "Rick Astley");
        assert_eq!(rick.views, 1_500_000_000);
        assert!(rick.thumbnail.is_some());

        let live = resolver.find("lofi").unwrap();
        assert_eq!(live.duration, None);
    }

    #[test]
    fn every_word_must_match_title_or_author() {
        let resolver = CatalogResolver::from_toml_str(CATALOG).unwrap();

        assert_eq!(resolver.find("RICK never").unwrap().id, "dQw4w9WgXcQ");
        assert!(resolver.find("rick radio").is_none());
        assert!(resolver.find("   ").is_none());
    }

    #[test]
    fn rejects_bad_duration() {
        let source = "[[tracks]]\nid = \"x\"\ntitle = \"X\"\nurl = \"u\"\nduration = \"ab\"\n";
        let err = CatalogResolver::from_toml_str(source).err().unwrap();
        assert!(matches!(err, BotError::Catalog(_)));
    }

    #[tokio::test]
    async fn search_attaches_metadata() {
        let resolver = CatalogResolver::from_toml_str(CATALOG).unwrap();
        let requester = Requester::new(UserId::new("7"), "bob");

        let track = resolver
            .search("astley", TrackMetadata::requested_by(requester))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(track.requester_name(), Some("bob"));
        assert!(resolver
            .search("nothing like this", TrackMetadata::default())
            .await
            .unwrap()
            .is_none());
    }
}
