//! In-memory collaborators for workflow and router tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU32, AtomicUsize, Ordering};
use std::sync::Mutex;

use chrono::{Duration as ChronoDuration, Utc};

use emoji_shared::types::EmojiRecord;

use crate::models::{NewEmoji, NewProfile, Profile};

use super::ports::{
    EmojiRepository, GenerationJob, ImageFetcher, ImageGenerator, ImageStore, JobStatus,
    ProfileRepository, StoreError, UpstreamError,
};

enum Outcome {
    Succeed(Vec<String>),
    Fail,
}

/// Reports `Pending` for a fixed number of polls, then settles.
pub struct FakeGenerator {
    job_id: String,
    pending_polls: u32,
    outcome: Outcome,
    submitted: Mutex<Vec<String>>,
    polls: AtomicU32,
}

impl FakeGenerator {
    pub fn succeeding_after(job_id: &str, pending_polls: u32, outputs: Vec<&str>) -> Self {
        Self::new(
            job_id,
            pending_polls,
            Outcome::Succeed(outputs.into_iter().map(str::to_string).collect()),
        )
    }

    pub fn failing_after(job_id: &str, pending_polls: u32) -> Self {
        Self::new(job_id, pending_polls, Outcome::Fail)
    }

    fn new(job_id: &str, pending_polls: u32, outcome: Outcome) -> Self {
        Self {
            job_id: job_id.to_string(),
            pending_polls,
            outcome,
            submitted: Mutex::new(Vec::new()),
            polls: AtomicU32::new(0),
        }
    }

    pub fn submitted(&self) -> Vec<String> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn poll_count(&self) -> u32 {
        self.polls.load(Ordering::SeqCst)
    }

    fn snapshot(&self, polls: u32) -> GenerationJob {
        if polls < self.pending_polls {
            return GenerationJob {
                id: self.job_id.clone(),
                status: JobStatus::Pending,
                outputs: Vec::new(),
                error: None,
            };
        }
        match &self.outcome {
            Outcome::Succeed(outputs) => GenerationJob {
                id: self.job_id.clone(),
                status: JobStatus::Succeeded,
                outputs: outputs.clone(),
                error: None,
            },
            Outcome::Fail => GenerationJob {
                id: self.job_id.clone(),
                status: JobStatus::Failed,
                outputs: Vec::new(),
                error: Some("model error".to_string()),
            },
        }
    }
}

#[axum::async_trait]
impl ImageGenerator for FakeGenerator {
    async fn submit(&self, prompt: &str) -> Result<GenerationJob, UpstreamError> {
        self.submitted.lock().unwrap().push(prompt.to_string());
        Ok(self.snapshot(0))
    }

    async fn fetch_job(&self, _job_id: &str) -> Result<GenerationJob, UpstreamError> {
        let polls = self.polls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(self.snapshot(polls))
    }
}

#[derive(Default)]
pub struct FakeFetcher {
    fetched: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[axum::async_trait]
impl ImageFetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, UpstreamError> {
        self.fetched.lock().unwrap().push(url.to_string());
        Ok(b"\x89PNG fake".to_vec())
    }
}

#[derive(Debug, Clone)]
pub struct Upload {
    pub key: String,
    pub size: usize,
    pub content_type: String,
    pub cache_control: String,
}

pub struct FakeStore {
    public_url: String,
    uploads: Mutex<Vec<Upload>>,
}

impl FakeStore {
    pub fn returning(public_url: &str) -> Self {
        Self {
            public_url: public_url.to_string(),
            uploads: Mutex::new(Vec::new()),
        }
    }

    pub fn uploads(&self) -> Vec<Upload> {
        self.uploads.lock().unwrap().clone()
    }
}

#[axum::async_trait]
impl ImageStore for FakeStore {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
        cache_control: &str,
    ) -> Result<String, UpstreamError> {
        self.uploads.lock().unwrap().push(Upload {
            key: key.to_string(),
            size: bytes.len(),
            content_type: content_type.to_string(),
            cache_control: cache_control.to_string(),
        });
        Ok(self.public_url.clone())
    }
}

pub struct MemoryEmojis {
    rows: Mutex<Vec<EmojiRecord>>,
    next_id: AtomicI64,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl Default for MemoryEmojis {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl MemoryEmojis {
    pub fn starting_at(first_id: i64) -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(first_id),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Seeds rows; each is stamped one minute after the previous one.
    pub fn with_rows(rows: Vec<EmojiRecord>) -> Self {
        let repo = Self::default();
        let base = Utc::now() - ChronoDuration::hours(1);
        let mut next = 1;
        for (i, mut row) in rows.into_iter().enumerate() {
            if row.created_at.is_none() {
                row.created_at = Some(base + ChronoDuration::minutes(i as i64));
            }
            next = next.max(row.id + 1);
            repo.rows.lock().unwrap().push(row);
        }
        repo.next_id.store(next, Ordering::SeqCst);
        repo
    }

    pub fn rows(&self) -> Vec<EmojiRecord> {
        self.rows.lock().unwrap().clone()
    }

    pub fn fail_reads(&self) {
        self.fail_reads.store(true, Ordering::SeqCst);
    }

    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    fn check(&self, flag: &AtomicBool) -> Result<(), StoreError> {
        if flag.load(Ordering::SeqCst) {
            return Err(StoreError::Pool("database unavailable".to_string()));
        }
        Ok(())
    }
}

#[axum::async_trait]
impl EmojiRepository for MemoryEmojis {
    async fn insert(&self, emoji: NewEmoji) -> Result<EmojiRecord, StoreError> {
        self.check(&self.fail_writes)?;
        let record = EmojiRecord {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            image_url: emoji.image_url,
            prompt: emoji.prompt,
            creator_user_id: emoji.creator_user_id,
            likes_count: Some(emoji.likes_count),
            created_at: Some(Utc::now()),
        };
        self.rows.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn list_newest_first(&self) -> Result<Vec<EmojiRecord>, StoreError> {
        self.check(&self.fail_reads)?;
        let mut rows = self.rows();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn likes_count(&self, id: i64) -> Result<Option<i32>, StoreError> {
        self.check(&self.fail_reads)?;
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|row| row.id == id)
            .map(|row| row.likes_count)
            .ok_or(StoreError::NotFound)
    }

    async fn set_likes_count(&self, id: i64, likes_count: i32) -> Result<EmojiRecord, StoreError> {
        self.check(&self.fail_writes)?;
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or(StoreError::NotFound)?;
        row.likes_count = Some(likes_count);
        Ok(row.clone())
    }
}

#[derive(Default)]
pub struct MemoryProfiles {
    rows: Mutex<HashMap<String, Profile>>,
    inserts: AtomicUsize,
    fail: AtomicBool,
    stall: AtomicBool,
}

impl MemoryProfiles {
    pub fn get(&self, user_id: &str) -> Option<Profile> {
        self.rows.lock().unwrap().get(user_id).cloned()
    }

    pub fn insert_count(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    pub fn fail(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    /// Lookups never complete.
    pub fn stall(&self) {
        self.stall.store(true, Ordering::SeqCst);
    }
}

#[axum::async_trait]
impl ProfileRepository for MemoryProfiles {
    async fn find(&self, user_id: &str) -> Result<Option<Profile>, StoreError> {
        if self.stall.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(StoreError::Pool("database unavailable".to_string()));
        }
        Ok(self.get(user_id))
    }

    async fn insert_if_absent(&self, profile: NewProfile) -> Result<bool, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.contains_key(&profile.user_id) {
            return Ok(false);
        }
        self.inserts.fetch_add(1, Ordering::SeqCst);
        rows.insert(
            profile.user_id.clone(),
            Profile {
                user_id: profile.user_id,
                credits: profile.credits,
                tier: profile.tier,
            },
        );
        Ok(true)
    }
}
