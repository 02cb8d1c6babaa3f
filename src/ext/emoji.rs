//! `::name::` tokens resolved against the application's custom emoji.

use async_trait::async_trait;
use lazy_static::lazy_static;
use poise::serenity_prelude as serenity;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::errors::Error;

/// Minimum age of the directory before another fetch is attempted.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(5 * 60);

lazy_static! {
    static ref TOKEN: Regex = Regex::new(r"::([[:alnum:]_]+)::").unwrap();
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApplicationEmoji {
    pub id: String,
    pub name: String,
}

impl From<serenity::Emoji> for ApplicationEmoji {
    fn from(emoji: serenity::Emoji) -> Self {
        Self { id: emoji.id.to_string(), name: emoji.name }
    }
}

#[async_trait]
pub trait EmojiSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<ApplicationEmoji>, Error>;
}

/// The application's own emoji, read through serenity's rate-limited client.
pub struct DiscordEmojis {
    http: Arc<serenity::Http>,
}

impl DiscordEmojis {
    pub fn new(http: Arc<serenity::Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl EmojiSource for DiscordEmojis {
    async fn fetch(&self) -> Result<Vec<ApplicationEmoji>, Error> {
        let emojis = self.http.get_application_emojis().await?;
        Ok(emojis.into_iter().map(ApplicationEmoji::from).collect())
    }
}

#[derive(Default)]
struct Directory {
    ids: HashMap<String, String>,
    refreshed: Option<Instant>,
}

impl Directory {
    fn is_stale(&self, now: Instant) -> bool {
        self.refreshed
            .map_or(true, |at| now.saturating_duration_since(at) >= REFRESH_INTERVAL)
    }
}

pub struct EmojiResolver {
    source: Arc<dyn EmojiSource>,
    directory: Mutex<Directory>,
}

impl EmojiResolver {
    pub fn new(source: Arc<dyn EmojiSource>) -> Self {
        Self {
            source,
            directory: Mutex::new(Directory::default()),
        }
    }

    pub async fn resolve(&self, text: &str) -> String {
        self.resolve_at(text, Instant::now()).await
    }

    pub async fn resolve_at(&self, text: &str, now: Instant) -> String {
        let tokens = tokens(text);
        if tokens.is_empty() {
            return text.to_string();
        }

        let mut directory = self.directory.lock().await;

        if directory.is_stale(now) {
            match self.source.fetch().await {
                Ok(emojis) => {
                    log::debug!("Refreshed emoji directory ({} entries)", emojis.len());
                    directory
                        .ids
                        .extend(emojis.into_iter().map(|e| (e.name, e.id)));
                    directory.refreshed = Some(now);
                }
                Err(err) => log::warn!("Failed to refresh emoji directory: {}", err),
            }
        }

        let mut out = String::with_capacity(text.len());
        let mut pos = 0;

        for caps in tokens {
            let whole = match caps.get(0) {
                Some(whole) => whole,
                None => continue,
            };
            let name = &caps[1];

            out.push_str(&text[pos..whole.start()]);
            match directory.ids.get(name) {
                Some(id) => out.push_str(&format!("<:{}:{}>", name, id)),
                None => out.push_str(&format!(":{}:", name)),
            }
            pos = whole.end();
        }

        out.push_str(&text[pos..]);
        out
    }
}

/// Tokens that are not already part of a `<:name:id>` tag.
fn tokens(text: &str) -> Vec<Captures<'_>> {
    TOKEN
        .captures_iter(text)
        .filter(|caps| {
            let start = caps.get(0).map_or(0, |m| m.start());
            !text[..start].ends_with('<')
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    struct Fixed {
        emojis: Vec<ApplicationEmoji>,
        calls: AtomicUsize,
        fail: AtomicBool,
    }

    impl Fixed {
        fn new(pairs: &[(&str, &str)]) -> Arc<Self> {
            Arc::new(Self {
                emojis: pairs
                    .iter()
                    .map(|(name, id)| ApplicationEmoji { name: name.to_string(), id: id.to_string() })
                    .collect(),
                calls: AtomicUsize::new(0),
                fail: AtomicBool::new(false),
            })
        }

        fn set_failing(&self) {
            self.fail.store(true, Ordering::SeqCst);
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl EmojiSource for Fixed {
        async fn fetch(&self) -> Result<Vec<ApplicationEmoji>, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                Err(Error::Form("emoji service unavailable"))
            } else {
                Ok(self.emojis.clone())
            }
        }
    }

    #[tokio::test]
    async fn known_and_unknown_names() {
        let source = Fixed::new(&[("blobwave", "123456")]);
        let resolver = EmojiResolver::new(source.clone());

        assert_eq!(
            resolver.resolve("hi ::blobwave:: and ::missing::").await,
            "hi <:blobwave:123456> and :missing:"
        );
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn text_without_tokens_skips_fetch() {
        let source = Fixed::new(&[("blobwave", "123456")]);
        let resolver = EmojiResolver::new(source.clone());

        assert_eq!(resolver.resolve("plain :blobwave: text").await, "plain :blobwave: text");
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn resolved_tags_are_left_alone() {
        let source = Fixed::new(&[("blobwave", "123456")]);
        let resolver = EmojiResolver::new(source.clone());

        assert_eq!(resolver.resolve("<::blobwave::").await, "<::blobwave::");
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn refresh_is_throttled() {
        let source = Fixed::new(&[("a", "1")]);
        let resolver = EmojiResolver::new(source.clone());
        let start = Instant::now();

        resolver.resolve_at("::a::", start).await;
        resolver.resolve_at("::b::", start + Duration::from_secs(60)).await;
        resolver.resolve_at("::a::", start + Duration::from_secs(299)).await;
        assert_eq!(source.calls(), 1);

        resolver.resolve_at("::a::", start + REFRESH_INTERVAL).await;
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn failed_first_refresh_retries() {
        let source = Fixed::new(&[("a", "1")]);
        source.set_failing();
        let resolver = EmojiResolver::new(source.clone());
        let start = Instant::now();

        assert_eq!(resolver.resolve_at("::a::", start).await, ":a:");
        assert_eq!(resolver.resolve_at("::a::", start).await, ":a:");
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_stale_mapping() {
        let source = Fixed::new(&[("a", "1")]);
        let resolver = EmojiResolver::new(source.clone());
        let start = Instant::now();

        assert_eq!(resolver.resolve_at("::a::", start).await, "<:a:1>");
        source.set_failing();
        let later = start + REFRESH_INTERVAL * 2;
        assert_eq!(resolver.resolve_at("::a:: ::b::", later).await, "<:a:1> :b:");
        assert_eq!(source.calls(), 2);
    }

    #[test]
    fn serenity_emoji_conversion() {
        let body = r#"{"id": "41771983429993937", "name": "LUL", "roles": [], "animated": false}"#;
        let emoji: serenity::Emoji = serde_json::from_str(body).unwrap();
        assert_eq!(
            ApplicationEmoji::from(emoji),
            ApplicationEmoji { id: "41771983429993937".into(), name: "LUL".into() }
        );
    }
}
