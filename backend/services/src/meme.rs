//! meme-api.com client.

use std::time::Duration;

use anyhow::{bail, Context as _, Result};
use async_trait::async_trait;
use serde::Deserialize;

use lingobot_core::{Meme, MemeFetcher};

const API_BASE: &str = "https://meme-api.com/gimme";

#[derive(Debug, Deserialize)]
struct MemeApiResponse {
    #[serde(default)]
    memes: Vec<MemeEntry>,
}

#[derive(Debug, Deserialize)]
struct MemeEntry {
    title: String,
    url: String,
    subreddit: String,
    #[serde(default)]
    nsfw: bool,
}

pub struct MemeApiClient {
    client: reqwest::Client,
}

impl MemeApiClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("building HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl MemeFetcher for MemeApiClient {
    async fn fetch_random(&self, subreddit: Option<&str>) -> Result<Meme> {
        let url = match subreddit {
            Some(sub) => format!("{API_BASE}/{sub}/1"),
            None => format!("{API_BASE}/1"),
        };

        let response = self.client.get(&url).send().await.context("requesting meme")?;
        let status = response.status();
        if !status.is_success() {
            bail!("meme API returned status {status}");
        }

        let body: MemeApiResponse = response.json().await.context("decoding meme response")?;
        let Some(entry) = body.memes.into_iter().find(|m| !m.nsfw) else {
            bail!("no memes found");
        };
        Ok(Meme { title: entry.title, url: entry.url, subreddit: entry.subreddit })
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await.context("downloading meme image")?;
        let status = response.status();
        if !status.is_success() {
            bail!("meme image download returned status {status}");
        }
        Ok(response.bytes().await.context("reading meme image body")?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_meme_api_payload() {
        let raw = r#"{"count":1,"memes":[{"postLink":"https://redd.it/x","subreddit":"memes",
            "title":"A classic","url":"https://i.redd.it/x.jpg","nsfw":false,"spoiler":false,
            "author":"someone","ups":100,"preview":[]}]}"#;
        let body: MemeApiResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(body.memes.len(), 1);
        assert_eq!(body.memes[0].subreddit, "memes");
    }

    #[test]
    fn nsfw_entries_are_skipped() {
        let raw = r#"{"memes":[{"title":"t","url":"u","subreddit":"s","nsfw":true}]}"#;
        let body: MemeApiResponse = serde_json::from_str(raw).unwrap();
        assert!(body.memes.into_iter().find(|m| !m.nsfw).is_none());
    }
}
