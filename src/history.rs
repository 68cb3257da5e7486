//! Local saved-post history.
//!
//! One JSON file, newest first, capped at 50 entries. Single-user by
//! design: reads and writes are plain read-modify-write with no
//! locking, and a corrupt or missing file reads as empty.

use crate::error::Result;
use crate::types::{PostDraft, Tone};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

pub const MAX_HISTORY_ITEMS: usize = 50;

fn postcraft_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
    PathBuf::from(home).join(".postcraft")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedPost {
    pub id: String,
    pub topic: String,
    pub tone: Tone,
    pub hook: String,
    pub body: String,
    pub cta: String,
    pub full: String,
    pub hashtags: String,
    pub character_count: usize,
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
}

impl SavedPost {
    pub fn from_draft(draft: &PostDraft, topic: &str, tone: Tone) -> Self {
        let full = draft.full_text();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            topic: topic.to_string(),
            tone,
            hook: draft.hook.clone(),
            body: draft.body.clone(),
            cta: draft.cta.clone(),
            full: full.clone(),
            hashtags: draft.hashtags.clone(),
            character_count: full.chars().count(),
            is_favorite: false,
            created_at: Utc::now(),
        }
    }
}

pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    /// Store at the default location, `~/.postcraft/history.json`.
    pub fn open_default() -> Self {
        Self::at(postcraft_dir().join("history.json"))
    }

    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn load(&self) -> Vec<SavedPost> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!(path = %self.path.display(), error = %e, "corrupt history file, starting empty");
                Vec::new()
            }),
            Err(_) => Vec::new(),
        }
    }

    /// Prepend a post and drop anything beyond the cap.
    pub fn save_post(&self, post: SavedPost) -> Result<()> {
        let mut posts = self.load();
        posts.insert(0, post);
        posts.truncate(MAX_HISTORY_ITEMS);
        self.write(&posts)
    }

    /// Remove by id. Unknown ids are a no-op.
    pub fn remove(&self, id: &str) -> Result<()> {
        let posts: Vec<SavedPost> = self.load().into_iter().filter(|p| p.id != id).collect();
        self.write(&posts)
    }

    /// Flip the favorite flag. Returns the new state, `None` when the
    /// id is unknown.
    pub fn toggle_favorite(&self, id: &str) -> Result<Option<bool>> {
        let mut posts = self.load();
        let mut new_state = None;
        for post in &mut posts {
            if post.id == id {
                post.is_favorite = !post.is_favorite;
                new_state = Some(post.is_favorite);
            }
        }
        self.write(&posts)?;
        Ok(new_state)
    }

    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    fn write(&self, posts: &[SavedPost]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(posts)?)?;
        Ok(())
    }
}
