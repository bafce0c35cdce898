//! Composer: owns the client-side state of one generation session.
//!
//! Generation:   Idle -> Loading -> (Ready | Failed); a new generate starts over.
//! Card boost:   Idle -> Loading -> Done, per result card.
//!
//! The state lock is never held across a gateway call. Every outstanding call
//! has its own cancellation token, and a call that is cancelled or dropped
//! before it settles puts its state back to `Idle`. A generation epoch
//! invalidates boosts that were in flight when the result set was replaced.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::client::hashtags::{merge_hashtags, DedupPolicy};
use crate::client::{ClientError, PostGateway, DEFAULT_TIMEOUT};
use crate::generation::tone::Tone;
use crate::models::{OptimizedPost, ScheduledPost};

/// The only message a failed generation ever shows.
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to generate posts. Please try again later.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationState {
    Idle,
    Loading,
    Ready(Vec<PostCard>),
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoostState {
    Idle,
    Loading,
    Done,
}

/// One generated post plus whatever the hashtag boost added to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostCard {
    pub post: OptimizedPost,
    pub boost: BoostState,
    pub boosted_tags: Vec<String>,
}

impl PostCard {
    fn new(post: OptimizedPost) -> Self {
        Self {
            post,
            boost: BoostState::Idle,
            boosted_tags: Vec::new(),
        }
    }

    /// Original tags followed by boosted ones, normalized and deduplicated.
    pub fn hashtags(&self, policy: DedupPolicy) -> Vec<String> {
        let original = self.post.tags.iter().map(String::as_str);
        let boosted = self.boosted_tags.iter().map(String::as_str);
        merge_hashtags(original.chain(boosted), policy)
    }

    /// The text a user copies or publishes.
    pub fn full_text(&self, policy: DedupPolicy) -> String {
        let hashtags = self.hashtags(policy);
        let block = if hashtags.is_empty() {
            String::new()
        } else {
            format!("\n\n{}", hashtags.join(" "))
        };
        format!("{}\n\n{}{block}", self.post.headline, self.post.content)
            .trim()
            .to_string()
    }
}

struct Inner {
    generation: GenerationState,
    epoch: u64,
    generation_cancel: Option<CancellationToken>,
    boost_cancel: HashMap<usize, CancellationToken>,
    scheduled: Vec<ScheduledPost>,
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Restores `Loading` state left behind by a call that never settled.
struct Pending<'a> {
    inner: &'a Mutex<Inner>,
    epoch: u64,
    card: Option<usize>,
}

impl Drop for Pending<'_> {
    fn drop(&mut self) {
        let mut inner = lock(self.inner);
        if inner.epoch != self.epoch {
            return;
        }
        match self.card {
            None => {
                inner.generation_cancel = None;
                if inner.generation == GenerationState::Loading {
                    debug!("Generation abandoned before it settled");
                    inner.generation = GenerationState::Idle;
                }
            }
            Some(index) => {
                inner.boost_cancel.remove(&index);
                if let Ok(card) = card_mut(&mut inner.generation, index) {
                    if card.boost == BoostState::Loading {
                        debug!("Hashtag boost for card {index} abandoned before it settled");
                        card.boost = BoostState::Idle;
                    }
                }
            }
        }
    }
}

pub struct Composer {
    gateway: Arc<dyn PostGateway>,
    timeout: Duration,
    policy: DedupPolicy,
    inner: Mutex<Inner>,
}

impl Composer {
    pub fn new(gateway: Arc<dyn PostGateway>) -> Self {
        Self {
            gateway,
            timeout: DEFAULT_TIMEOUT,
            policy: DedupPolicy::default(),
            inner: Mutex::new(Inner {
                generation: GenerationState::Idle,
                epoch: 0,
                generation_cancel: None,
                boost_cancel: HashMap::new(),
                scheduled: Vec::new(),
            }),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_dedup_policy(mut self, policy: DedupPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        lock(&self.inner)
    }

    pub fn state(&self) -> GenerationState {
        self.lock().generation.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().generation == GenerationState::Loading
    }

    /// Requests fresh variants. Rejected while another generation is loading.
    ///
    /// On failure the state holds `GENERIC_FAILURE_MESSAGE`; the detailed error is
    /// logged and returned for the caller's own logging. A cancelled generation
    /// returns `ClientError::Cancelled` and leaves the state `Idle`.
    pub async fn generate(
        &self,
        draft: &str,
        tone: Tone,
    ) -> Result<Vec<OptimizedPost>, ClientError> {
        if draft.trim().is_empty() {
            return Err(ClientError::EmptyDraft);
        }

        let (token, _pending) = {
            let mut inner = self.lock();
            if inner.generation == GenerationState::Loading {
                return Err(ClientError::Busy);
            }
            inner.generation = GenerationState::Loading;
            inner.epoch += 1;
            // Boosts for the old result set are stale now.
            for (_, boost) in inner.boost_cancel.drain() {
                boost.cancel();
            }
            let token = CancellationToken::new();
            inner.generation_cancel = Some(token.clone());
            let pending = Pending {
                inner: &self.inner,
                epoch: inner.epoch,
                card: None,
            };
            (token, pending)
        };

        let outcome = tokio::select! {
            _ = token.cancelled() => {
                info!("Post generation cancelled");
                return Err(ClientError::Cancelled);
            }
            result = tokio::time::timeout(self.timeout, self.gateway.optimize_posts(draft, tone)) => {
                result.unwrap_or(Err(ClientError::Timeout(self.timeout)))
            }
        };

        let mut inner = self.lock();
        match outcome {
            Ok(posts) => {
                info!("Received {} variants (tone={tone})", posts.len());
                inner.generation =
                    GenerationState::Ready(posts.iter().cloned().map(PostCard::new).collect());
                Ok(posts)
            }
            Err(e) => {
                warn!("Post generation failed: {e}");
                inner.generation = GenerationState::Failed(GENERIC_FAILURE_MESSAGE.to_string());
                Err(e)
            }
        }
    }

    /// Fetches extra hashtags for the card at `index`. Failures add nothing.
    ///
    /// Returns the tags that were added; a finished card returns its earlier tags
    /// without another call. A cancelled boost adds nothing and leaves the card
    /// ready to be boosted again.
    pub async fn boost_hashtags(&self, index: usize) -> Result<Vec<String>, ClientError> {
        let (epoch, content, token, _pending) = {
            let mut inner = self.lock();
            let epoch = inner.epoch;
            let card = card_mut(&mut inner.generation, index)?;
            match card.boost {
                BoostState::Loading => return Err(ClientError::Busy),
                BoostState::Done => return Ok(card.boosted_tags.clone()),
                BoostState::Idle => {}
            }
            card.boost = BoostState::Loading;
            let content = card.post.content.clone();
            let token = CancellationToken::new();
            inner.boost_cancel.insert(index, token.clone());
            let pending = Pending {
                inner: &self.inner,
                epoch,
                card: Some(index),
            };
            (epoch, content, token, pending)
        };

        let tags = tokio::select! {
            _ = token.cancelled() => {
                debug!("Hashtag boost for card {index} cancelled");
                return Ok(Vec::new());
            }
            result = tokio::time::timeout(self.timeout, self.gateway.suggest_hashtags(&content)) => {
                result.unwrap_or_else(|_| {
                    warn!("Hashtag boost for card {index} timed out after {:?}", self.timeout);
                    Vec::new()
                })
            }
        };

        let mut inner = self.lock();
        if inner.epoch != epoch {
            debug!("Discarding hashtag boost for card {index}: results were replaced");
            return Ok(Vec::new());
        }
        let card = card_mut(&mut inner.generation, index)?;
        card.boosted_tags = tags.clone();
        card.boost = BoostState::Done;
        Ok(tags)
    }

    /// Cancels the in-flight generation. Returns false when nothing was running.
    pub fn cancel_generation(&self) -> bool {
        match self.lock().generation_cancel.take() {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Cancels the in-flight boost of the card at `index`, if any.
    pub fn cancel_boost(&self, index: usize) -> bool {
        match self.lock().boost_cancel.remove(&index) {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Normalized hashtags of the card at `index`.
    pub fn hashtags(&self, index: usize) -> Result<Vec<String>, ClientError> {
        Ok(card(&self.lock().generation, index)?.hashtags(self.policy))
    }

    /// Copy/publish text of the card at `index`.
    pub fn full_text(&self, index: usize) -> Result<String, ClientError> {
        Ok(card(&self.lock().generation, index)?.full_text(self.policy))
    }

    /// Puts `post` on the local calendar. No network call is made.
    pub fn schedule(&self, post: &OptimizedPost, at: DateTime<Utc>) -> ScheduledPost {
        let scheduled = ScheduledPost::new(post.clone(), at);
        info!("Scheduled post {} for {}", scheduled.id, scheduled.scheduled_date);
        self.lock().scheduled.push(scheduled.clone());
        scheduled
    }

    /// Everything scheduled this session, earliest first.
    pub fn scheduled_posts(&self) -> Vec<ScheduledPost> {
        let mut posts = self.lock().scheduled.clone();
        posts.sort_by_key(|p| p.scheduled_date);
        posts
    }
}

fn card(state: &GenerationState, index: usize) -> Result<&PostCard, ClientError> {
    match state {
        GenerationState::Ready(cards) => cards.get(index).ok_or(ClientError::UnknownPost(index)),
        _ => Err(ClientError::UnknownPost(index)),
    }
}

fn card_mut(state: &mut GenerationState, index: usize) -> Result<&mut PostCard, ClientError> {
    match state {
        GenerationState::Ready(cards) => {
            cards.get_mut(index).ok_or(ClientError::UnknownPost(index))
        }
        _ => Err(ClientError::UnknownPost(index)),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::TimeZone;
    use tokio::sync::Notify;

    use super::*;

    fn post(headline: &str, tags: &[&str]) -> OptimizedPost {
        OptimizedPost {
            headline: headline.to_string(),
            content: format!("{headline} body"),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            tone_explanation: "because".to_string(),
        }
    }

    #[derive(Default)]
    struct FakeGateway {
        fail: bool,
        hang: bool,
        posts: Vec<OptimizedPost>,
        hashtags: Vec<String>,
        optimize_gate: Option<Arc<Notify>>,
        hashtag_gate: Option<Arc<Notify>>,
        optimize_calls: AtomicUsize,
        hashtag_calls: AtomicUsize,
    }

    impl FakeGateway {
        fn with_posts(posts: Vec<OptimizedPost>) -> Self {
            Self {
                posts,
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl PostGateway for FakeGateway {
        async fn optimize_posts(
            &self,
            _draft: &str,
            _tone: Tone,
        ) -> Result<Vec<OptimizedPost>, ClientError> {
            self.optimize_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.optimize_gate {
                gate.notified().await;
            }
            if self.hang {
                std::future::pending::<()>().await;
            }
            if self.fail {
                return Err(ClientError::Gateway {
                    status: 502,
                    message: "Model returned invalid JSON".to_string(),
                });
            }
            Ok(self.posts.clone())
        }

        async fn suggest_hashtags(&self, _content: &str) -> Vec<String> {
            self.hashtag_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.hashtag_gate {
                gate.notified().await;
            }
            if self.hang {
                std::future::pending::<()>().await;
            }
            self.hashtags.clone()
        }
    }

    async fn wait_for_state<P>(composer: &Composer, predicate: P)
    where
        P: Fn(&GenerationState) -> bool,
    {
        while !predicate(&composer.state()) {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_generate_moves_to_ready_and_replaces_results() {
        let gateway = Arc::new(FakeGateway::with_posts(vec![
            post("A", &["#a"]),
            post("B", &["#b"]),
            post("C", &["#c"]),
        ]));
        let composer = Composer::new(gateway.clone());
        assert_eq!(composer.state(), GenerationState::Idle);

        composer.generate("draft", Tone::Builder).await.unwrap();
        composer.generate("draft again", Tone::Student).await.unwrap();

        match composer.state() {
            GenerationState::Ready(cards) => {
                assert_eq!(cards.len(), 3, "second result set replaces, never merges");
                assert!(cards.iter().all(|c| c.boost == BoostState::Idle));
            }
            other => panic!("expected Ready, got {other:?}"),
        }
        assert_eq!(gateway.optimize_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_generate_failure_shows_generic_message() {
        let gateway = Arc::new(FakeGateway {
            fail: true,
            ..Default::default()
        });
        let composer = Composer::new(gateway);

        let err = composer.generate("draft", Tone::Founder).await.unwrap_err();
        assert!(matches!(err, ClientError::Gateway { status: 502, .. }));
        assert_eq!(
            composer.state(),
            GenerationState::Failed(GENERIC_FAILURE_MESSAGE.to_string())
        );
    }

    #[tokio::test]
    async fn test_empty_draft_never_calls_gateway() {
        let gateway = Arc::new(FakeGateway::default());
        let composer = Composer::new(gateway.clone());
        let err = composer.generate(" \n", Tone::Builder).await.unwrap_err();
        assert!(matches!(err, ClientError::EmptyDraft));
        assert_eq!(composer.state(), GenerationState::Idle);
        assert_eq!(gateway.optimize_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_second_generate_while_loading_is_busy() {
        let gate = Arc::new(Notify::new());
        let gateway = Arc::new(FakeGateway {
            posts: vec![post("A", &[])],
            optimize_gate: Some(gate.clone()),
            ..Default::default()
        });
        let composer = Arc::new(Composer::new(gateway.clone()));

        let first = tokio::spawn({
            let composer = composer.clone();
            async move { composer.generate("draft", Tone::Builder).await }
        });
        wait_for_state(&composer, |s| *s == GenerationState::Loading).await;

        let err = composer.generate("draft", Tone::Builder).await.unwrap_err();
        assert!(matches!(err, ClientError::Busy));

        gate.notify_one();
        first.await.unwrap().unwrap();
        assert!(!composer.is_loading());
        assert_eq!(gateway.optimize_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_generate_times_out() {
        let gateway = Arc::new(FakeGateway {
            hang: true,
            ..Default::default()
        });
        let composer = Composer::new(gateway).with_timeout(Duration::from_secs(30));

        let err = composer.generate("draft", Tone::Student).await.unwrap_err();
        assert!(matches!(err, ClientError::Timeout(_)));
        assert!(matches!(composer.state(), GenerationState::Failed(_)));
    }

    #[tokio::test]
    async fn test_boost_merges_normalized_hashtags() {
        let gateway = Arc::new(FakeGateway {
            posts: vec![post("A", &["#Rust", "build in public"])],
            hashtags: vec!["Rust".into(), "#Tokio!".into(), "".into()],
            ..Default::default()
        });
        let composer = Composer::new(gateway.clone());
        composer.generate("draft", Tone::Builder).await.unwrap();

        let added = composer.boost_hashtags(0).await.unwrap();
        assert_eq!(added.len(), 3, "raw tags are stored as returned");
        assert_eq!(
            composer.hashtags(0).unwrap(),
            vec!["#Rust", "#buildinpublic", "#Tokio"]
        );

        // A finished card does not call the gateway again.
        composer.boost_hashtags(0).await.unwrap();
        assert_eq!(gateway.hashtag_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_boost_timeout_adds_nothing() {
        let composer = Composer::new(Arc::new(FakeGateway {
            posts: vec![post("A", &["#a"])],
            ..Default::default()
        }));
        composer.generate("draft", Tone::Builder).await.unwrap();

        // Only hashtag calls should hang from here on.
        let composer = Composer {
            gateway: Arc::new(FakeGateway {
                hang: true,
                ..Default::default()
            }),
            ..composer
        };
        let added = composer.boost_hashtags(0).await.unwrap();
        assert!(added.is_empty());
        assert_eq!(composer.hashtags(0).unwrap(), vec!["#a"]);
    }

    #[tokio::test]
    async fn test_boost_while_loading_is_busy_and_stale_boost_is_discarded() {
        let gate = Arc::new(Notify::new());
        let gateway = Arc::new(FakeGateway {
            posts: vec![post("A", &["#a"]), post("B", &["#b"])],
            hashtags: vec!["#late".into()],
            hashtag_gate: Some(gate.clone()),
            ..Default::default()
        });
        let composer = Arc::new(Composer::new(gateway));
        composer.generate("draft", Tone::Builder).await.unwrap();

        let boost = tokio::spawn({
            let composer = composer.clone();
            async move { composer.boost_hashtags(1).await }
        });
        wait_for_state(&composer, |s| {
            matches!(s, GenerationState::Ready(cards) if cards[1].boost == BoostState::Loading)
        })
        .await;

        assert!(matches!(composer.boost_hashtags(1).await, Err(ClientError::Busy)));
        // Other cards boost independently; only card 1 is loading.
        assert!(matches!(
            composer.state(),
            GenerationState::Ready(ref cards) if cards[0].boost == BoostState::Idle
        ));

        composer.generate("new draft", Tone::Founder).await.unwrap();
        gate.notify_one();
        assert!(boost.await.unwrap().unwrap().is_empty());

        assert_eq!(composer.hashtags(1).unwrap(), vec!["#b"]);
        match composer.state() {
            GenerationState::Ready(cards) => assert_eq!(cards[1].boost, BoostState::Idle),
            other => panic!("expected Ready, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_card_operations_need_results() {
        let composer = Composer::new(Arc::new(FakeGateway::with_posts(vec![post("A", &[])])));
        assert!(matches!(composer.boost_hashtags(0).await, Err(ClientError::UnknownPost(0))));

        composer.generate("draft", Tone::Builder).await.unwrap();
        assert!(matches!(composer.full_text(3), Err(ClientError::UnknownPost(3))));
    }

    #[tokio::test]
    async fn test_full_text_layout() {
        let composer = Composer::new(Arc::new(FakeGateway::with_posts(vec![
            post("Shipped", &["#Rust", "rust"]),
            post("Quiet", &[]),
        ])))
        .with_dedup_policy(DedupPolicy::CaseInsensitive);
        composer.generate("draft", Tone::Builder).await.unwrap();

        assert_eq!(
            composer.full_text(0).unwrap(),
            "Shipped\n\nShipped body\n\n#Rust"
        );
        assert_eq!(composer.full_text(1).unwrap(), "Quiet\n\nQuiet body");
    }

    #[tokio::test]
    async fn test_schedule_copies_post_with_unique_ids() {
        let composer = Composer::new(Arc::new(FakeGateway::default()));
        let source = post("Launch day", &["#launch", "#startup", "#founder"]);
        let later = Utc.with_ymd_and_hms(2026, 11, 2, 9, 0, 0).unwrap();
        let sooner = Utc.with_ymd_and_hms(2026, 10, 21, 9, 0, 0).unwrap();

        let first = composer.schedule(&source, later);
        let second = composer.schedule(&source, sooner);
        assert_eq!(first.post, source);
        assert_eq!(first.scheduled_date, later);

        let mut ids = HashSet::new();
        for _ in 0..50 {
            ids.insert(composer.schedule(&source, later).id);
        }
        ids.insert(first.id);
        ids.insert(second.id);
        assert_eq!(ids.len(), 52);

        let listed = composer.scheduled_posts();
        assert_eq!(listed.len(), 52);
        assert_eq!(listed[0].id, second.id, "earliest first");
    }

    fn boost_state(composer: &Composer, index: usize) -> Option<BoostState> {
        match composer.state() {
            GenerationState::Ready(cards) => cards.get(index).map(|c| c.boost),
            _ => None,
        }
    }

    #[tokio::test]
    async fn test_aborted_generate_releases_loading() {
        let gate = Arc::new(Notify::new());
        let gateway = Arc::new(FakeGateway {
            posts: vec![post("A", &["#a"])],
            optimize_gate: Some(gate.clone()),
            ..Default::default()
        });
        let composer = Arc::new(Composer::new(gateway.clone()));

        let task = tokio::spawn({
            let composer = composer.clone();
            async move { composer.generate("draft", Tone::Builder).await }
        });
        wait_for_state(&composer, |s| *s == GenerationState::Loading).await;

        task.abort();
        assert!(task.await.unwrap_err().is_cancelled());
        assert_eq!(composer.state(), GenerationState::Idle);

        gate.notify_one();
        let posts = composer.generate("draft", Tone::Builder).await.unwrap();
        assert_eq!(posts.len(), 1);
        assert!(matches!(composer.state(), GenerationState::Ready(_)));
        assert_eq!(gateway.optimize_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_cancel_generation_returns_cancelled_and_idle() {
        let composer = Arc::new(Composer::new(Arc::new(FakeGateway {
            hang: true,
            ..Default::default()
        })));
        assert!(!composer.cancel_generation());

        let task = tokio::spawn({
            let composer = composer.clone();
            async move { composer.generate("draft", Tone::Student).await }
        });
        wait_for_state(&composer, |s| *s == GenerationState::Loading).await;

        assert!(composer.cancel_generation());
        assert!(matches!(task.await.unwrap(), Err(ClientError::Cancelled)));
        assert_eq!(composer.state(), GenerationState::Idle);
        assert!(!composer.cancel_generation());
    }

    #[tokio::test]
    async fn test_aborted_boost_can_be_boosted_again() {
        let gate = Arc::new(Notify::new());
        let gateway = Arc::new(FakeGateway {
            posts: vec![post("A", &["#a"])],
            hashtags: vec!["#more".into()],
            hashtag_gate: Some(gate.clone()),
            ..Default::default()
        });
        let composer = Arc::new(Composer::new(gateway.clone()));
        composer.generate("draft", Tone::Founder).await.unwrap();

        let task = tokio::spawn({
            let composer = composer.clone();
            async move { composer.boost_hashtags(0).await }
        });
        wait_for_state(&composer, |s| {
            matches!(s, GenerationState::Ready(cards) if cards[0].boost == BoostState::Loading)
        })
        .await;

        task.abort();
        assert!(task.await.unwrap_err().is_cancelled());
        assert_eq!(boost_state(&composer, 0), Some(BoostState::Idle));

        gate.notify_one();
        assert_eq!(composer.boost_hashtags(0).await.unwrap(), vec!["#more"]);
        assert_eq!(boost_state(&composer, 0), Some(BoostState::Done));
        assert_eq!(composer.hashtags(0).unwrap(), vec!["#a", "#more"]);
    }

    #[tokio::test]
    async fn test_cancel_boost_adds_nothing() {
        let gateway = Arc::new(FakeGateway {
            posts: vec![post("A", &["#a"]), post("B", &["#b"])],
            hashtags: vec!["#never".into()],
            hashtag_gate: Some(Arc::new(Notify::new())),
            ..Default::default()
        });
        let composer = Arc::new(Composer::new(gateway));
        composer.generate("draft", Tone::Builder).await.unwrap();

        let task = tokio::spawn({
            let composer = composer.clone();
            async move { composer.boost_hashtags(1).await }
        });
        wait_for_state(&composer, |s| {
            matches!(s, GenerationState::Ready(cards) if cards[1].boost == BoostState::Loading)
        })
        .await;

        assert!(!composer.cancel_boost(0));
        assert!(composer.cancel_boost(1));
        assert!(task.await.unwrap().unwrap().is_empty());
        assert_eq!(boost_state(&composer, 1), Some(BoostState::Idle));
        assert_eq!(composer.hashtags(1).unwrap(), vec!["#b"]);
    }
}
