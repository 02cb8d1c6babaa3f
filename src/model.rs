use chrono::Utc;
use parking_lot::Mutex;
use serenity::model::id::MessageId;

use crate::errors::Error;
use crate::ext::cache::RecencyCache;
use crate::ext::emoji::EmojiResolver;
use crate::ext::timestamp;
use crate::store::TimezoneStore;

pub type Context<'a> = poise::Context<'a, Data, Error>;
pub type Command = poise::Command<Data, Error>;

/// Number of sent templates remembered for the edit dialog.
pub const HISTORY_SIZE: usize = 100;

/// State shared by every command invocation.
pub struct Data {
    pub timezone: TimezoneStore,
    pub emoji: EmojiResolver,
    history: Mutex<RecencyCache<MessageId, String>>,
}

impl Data {
    pub fn new(timezone: TimezoneStore, emoji: EmojiResolver) -> Self {
        Self {
            timezone,
            emoji,
            history: Mutex::new(RecencyCache::new(HISTORY_SIZE)),
        }
    }

    /// Render a template: timestamps, then emoji, then `\n` escapes.
    pub async fn compose(&self, template: &str) -> Result<String, Error> {
        let text = timestamp::substitute(template, self.timezone.offset(), Utc::now())?;
        let text = self.emoji.resolve(&text).await;
        Ok(unescape_newlines(&text))
    }

    pub fn remember(&self, id: MessageId, template: String) {
        self.history.lock().set(id, template);
    }

    /// The template last sent as `id`, if it is still remembered.
    pub fn recall(&self, id: MessageId) -> Option<String> {
        self.history.lock().get(&id).cloned()
    }
}

pub fn unescape_newlines(text: &str) -> String {
    text.replace("\\n", "\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ext::emoji::{ApplicationEmoji, EmojiSource};
    use async_trait::async_trait;
    use std::sync::Arc;

    struct OneEmoji;

    #[async_trait]
    impl EmojiSource for OneEmoji {
        async fn fetch(&self) -> Result<Vec<ApplicationEmoji>, Error> {
            Ok(vec![ApplicationEmoji { id: "42".into(), name: "clock".into() }])
        }
    }

    fn data(dir: &tempfile::TempDir) -> Data {
        Data::new(
            TimezoneStore::open(dir.path().join("timezone.txt")),
            EmojiResolver::new(Arc::new(OneEmoji)),
        )
    }

    #[tokio::test]
    async fn compose_runs_every_stage() {
        let dir = tempfile::tempdir().unwrap();
        let data = data(&dir);

        assert_eq!(
            data.compose("::clock:: {2024/1/15 9:30}\\nsee you").await.unwrap(),
            "<:clock:42> <t:1705311000:f>\nsee you"
        );
        assert_eq!(data.compose("just text").await.unwrap(), "just text");
    }

    #[tokio::test]
    async fn compose_uses_configured_offset() {
        let dir = tempfile::tempdir().unwrap();
        let data = data(&dir);

        data.timezone.set_hours(5).unwrap();
        assert_eq!(data.compose("{2024/1/15 9:30}").await.unwrap(), "<t:1705293000:f>");
    }

    #[tokio::test]
    async fn compose_reports_bad_dates() {
        let dir = tempfile::tempdir().unwrap();
        let data = data(&dir);

        let err = data.compose("{2024/13/1}").await.unwrap_err();
        assert!(matches!(err, Error::InvalidTemplate(_)));
        assert!(err.is_user_facing());
    }

    #[test]
    fn history() {
        let dir = tempfile::tempdir().unwrap();
        let data = data(&dir);

        assert_eq!(data.recall(MessageId::new(1)), None);
        data.remember(MessageId::new(1), "{9:30}".into());
        assert_eq!(data.recall(MessageId::new(1)).as_deref(), Some("{9:30}"));

        for id in 2..=(HISTORY_SIZE as u64 + 1) {
            data.remember(MessageId::new(id), String::new());
        }
        assert_eq!(data.recall(MessageId::new(1)), None);
        assert_eq!(data.recall(MessageId::new(2)).as_deref(), Some(""));
    }
}
