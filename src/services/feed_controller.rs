// src/services/feed_controller.rs - state and workflow of the posts screen
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, info, warn};

use crate::dtos::post_dtos::NewPostUpload;
use crate::models::{DraftPost, FeedState, MissingField, Notice, Post};
use crate::repositories::PostsApi;
use crate::services::camera::Camera;

/// Follow-up loads allowed when the post count keeps changing between loads.
const MAX_COUNT_CHANGE_RELOADS: usize = 3;

/// Read-only snapshot handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenView {
    /// Newest first.
    pub posts: Vec<Post>,
    pub is_loading: bool,
    pub notice: Option<Notice>,
    /// `Some` while the composer is visible.
    pub composer: Option<DraftPost>,
    pub can_submit: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejection {
    ComposerClosed,
    Missing(MissingField),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing was sent.
    Rejected(SubmitRejection),
    Posted,
    Failed,
}

#[derive(Debug, Default)]
struct ScreenState {
    feed: FeedState,
    composer: Option<DraftPost>,
    // Id of the most recently started load; older responses are dropped.
    load_seq: u64,
    // Bumped on every open, so a capture only lands in the draft it started in.
    composer_seq: u64,
}

pub struct PostFeedController {
    api: Arc<dyn PostsApi>,
    camera: Arc<dyn Camera>,
    state: Mutex<ScreenState>,
}

impl PostFeedController {
    pub fn new(api: Arc<dyn PostsApi>, camera: Arc<dyn Camera>) -> Self {
        Self {
            api,
            camera,
            state: Mutex::new(ScreenState::default()),
        }
    }

    // The lock is never held across an await.
    fn state(&self) -> MutexGuard<'_, ScreenState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn view(&self) -> ScreenView {
        let state = self.state();
        ScreenView {
            posts: state.feed.display_order(),
            is_loading: state.feed.is_loading,
            notice: state.feed.notice,
            composer: state.composer.clone(),
            can_submit: state.composer.as_ref().is_some_and(DraftPost::is_complete),
        }
    }

    /// Posts in server order.
    pub fn posts(&self) -> Vec<Post> {
        self.state().feed.posts.clone()
    }

    /// Initial load when the screen becomes active.
    pub async fn activate(&self) {
        info!("Posts screen activated");
        self.load_feed().await;
    }

    /// Fetches the feed. A successful load that changes the number of posts
    /// triggers another load, like any other change of the post count.
    pub async fn load_feed(&self) {
        for _ in 0..=MAX_COUNT_CHANGE_RELOADS {
            if !self.load_once().await {
                return;
            }
            debug!("Post count changed, reloading feed");
        }
    }

    // Returns true when the load was applied and changed the post count.
    async fn load_once(&self) -> bool {
        let (ticket, count_before) = {
            let mut state = self.state();
            state.load_seq += 1;
            state.feed.is_loading = true;
            (state.load_seq, state.feed.posts.len())
        };

        let result = self.api.fetch_posts().await;

        let mut state = self.state();
        if state.load_seq != ticket {
            debug!("Dropping feed response {} superseded by {}", ticket, state.load_seq);
            return false;
        }
        state.feed.is_loading = false;

        match result {
            Ok(posts) => {
                let changed = posts.len() != count_before;
                info!("Loaded {} posts", posts.len());
                state.feed.posts = posts;
                changed
            }
            Err(e) => {
                warn!("Failed to fetch posts: {}", e);
                state.feed.notice = Some(Notice::FeedFetchFailed);
                false
            }
        }
    }

    /// Pull-to-refresh. `complete` runs once the load has finished,
    /// whatever its outcome.
    pub async fn refresh<F>(&self, complete: F)
    where
        F: FnOnce(),
    {
        self.load_feed().await;
        complete();
    }

    pub fn open_composer(&self) {
        let mut state = self.state();
        state.composer_seq += 1;
        state.composer = Some(DraftPost::default());
    }

    /// Discards the draft, hides the composer and reloads the feed.
    pub async fn close_composer(&self) {
        self.state().composer = None;
        self.load_feed().await;
        self.state().feed.is_loading = false;
    }

    pub fn set_nickname(&self, value: &str) {
        match self.state().composer.as_mut() {
            Some(draft) => draft.set_nickname(value),
            None => debug!("Ignoring nickname edit without an open composer"),
        }
    }

    pub fn set_message(&self, value: &str) {
        match self.state().composer.as_mut() {
            Some(draft) => draft.set_message(value),
            None => debug!("Ignoring message edit without an open composer"),
        }
    }

    pub async fn capture_photo(&self) {
        let session = self.state().composer_seq;
        let result = self.camera.take_photo().await;

        let mut state = self.state();
        let same_session = state.composer_seq == session;
        if let Err(e) = &result {
            warn!("Failed to capture photo: {}", e);
            state.feed.notice = Some(Notice::CaptureFailed);
        }

        let draft = match state.composer.as_mut() {
            Some(draft) if same_session => draft,
            _ => {
                debug!("Composer closed during capture, dropping result");
                return;
            }
        };
        draft.captured_image = result.ok();
    }

    pub fn clear_captured_photo(&self) {
        if let Some(draft) = self.state().composer.as_mut() {
            draft.captured_image = None;
        }
    }

    /// Sends the draft. Once a request has been attempted the composer is
    /// closed and the feed reloaded, whether or not the post was created.
    pub async fn submit_post(&self) -> SubmitOutcome {
        let upload = {
            let mut state = self.state();
            let draft = match state.composer.as_ref() {
                Some(draft) => draft,
                None => return SubmitOutcome::Rejected(SubmitRejection::ComposerClosed),
            };
            let upload = match draft.complete() {
                Ok(complete) => NewPostUpload::from_draft(complete),
                Err(missing) => {
                    debug!("Submit rejected, missing {:?}", missing);
                    return SubmitOutcome::Rejected(SubmitRejection::Missing(missing));
                }
            };
            state.feed.is_loading = true;
            upload
        };

        let outcome = match upload {
            Ok(upload) => match self.api.create_post(upload).await {
                Ok(()) => {
                    info!("Post created");
                    SubmitOutcome::Posted
                }
                Err(e) => {
                    warn!("Failed to create post: {}", e);
                    SubmitOutcome::Failed
                }
            },
            Err(e) => {
                warn!("Captured image could not be attached: {}", e);
                SubmitOutcome::Failed
            }
        };

        if outcome == SubmitOutcome::Failed {
            self.state().feed.notice = Some(Notice::PostCreationFailed);
        }
        self.close_composer().await;
        outcome
    }

    /// Clears the notice once the presentation layer has shown it.
    pub fn acknowledge_notice(&self) {
        self.state().feed.notice = None;
    }
}
