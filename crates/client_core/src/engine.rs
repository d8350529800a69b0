//! Preview state engine shared by every invitation layout.
//!
//! One [`PreviewEngine`] is started per rendered invitation. It owns the
//! transient UI state (cover slide, countdown, guestbook, modal toggles,
//! copy toast) and the timers that drive it. All timers stop on
//! [`PreviewEngine::dispose`] or when the engine is dropped.
//!
//! Guestbook writes are optimistic: the local list is updated immediately and
//! is authoritative from then on, whatever the server answers.

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Offset, Utc};
use shared::{domain::UserId, invitation::InvitationData, protocol::GuestbookEntry};
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{interval_at, sleep_until, Instant, MissedTickBehavior},
};
use tracing::{debug, info};

use crate::{
    calendar::CalendarGrid,
    clipboard::{Clipboard, MissingClipboard},
    clock::{Clock, SystemClock},
    countdown::Countdown,
    guestbook::{prepare_entry, GuestbookStore, MissingGuestbookStore, GUESTBOOK_DISPLAY_LIMIT},
};

pub const SLIDE_INTERVAL: Duration = Duration::from_millis(3000);
pub const COUNTDOWN_INTERVAL: Duration = Duration::from_millis(1000);
pub const TOAST_DURATION: Duration = Duration::from_millis(2000);
pub const LINK_COPIED_TOAST: &str = "링크가 복사되었습니다.";

pub fn korea_standard_time() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).unwrap_or_else(|| Utc.fix())
}

pub fn copied_toast(label: &str) -> String {
    format!("{label} 복사되었습니다.")
}

#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Owner whose guestbook is loaded and written.
    pub user_id: UserId,
    /// Target of [`PreviewEngine::copy_link`].
    pub share_url: String,
    /// Offset the wedding date/time and "today" are interpreted in.
    pub utc_offset: FixedOffset,
    pub date_override: Option<NaiveDate>,
    pub time_override: Option<NaiveTime>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            user_id: UserId::new("default"),
            share_url: String::new(),
            utc_offset: korea_standard_time(),
            date_override: None,
            time_override: None,
        }
    }
}

pub struct EngineDeps {
    pub guestbook: Arc<dyn GuestbookStore>,
    pub clipboard: Arc<dyn Clipboard>,
    pub clock: Arc<dyn Clock>,
}

impl Default for EngineDeps {
    fn default() -> Self {
        Self {
            guestbook: Arc::new(MissingGuestbookStore),
            clipboard: Arc::new(MissingClipboard),
            clock: Arc::new(SystemClock),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineState {
    pub current_slide: usize,
    pub countdown: Countdown,
    /// Newest first. Layouts show only the first [`GUESTBOOK_DISPLAY_LIMIT`].
    pub guestbook_entries: Vec<GuestbookEntry>,
    pub show_contact: bool,
    pub show_photo_viewer: bool,
    pub viewer_index: usize,
    pub show_guestbook_form: bool,
    pub guestbook_name: String,
    pub guestbook_message: String,
    pub expanded_accordion: Option<String>,
    pub copied_toast: Option<String>,
}

impl EngineState {
    pub fn recent_guestbook_entries(&self) -> &[GuestbookEntry] {
        let end = self.guestbook_entries.len().min(GUESTBOOK_DISPLAY_LIMIT);
        &self.guestbook_entries[..end]
    }
}

#[derive(Default)]
struct Inner {
    state: EngineState,
    // Set by the first local submission; a late initial load is then dropped.
    guestbook_touched: bool,
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

fn apply_overrides(mut data: InvitationData, options: &EngineOptions) -> InvitationData {
    if let Some(date) = options.date_override {
        data.wedding_date = Some(date);
    }
    if let Some(time) = options.time_override {
        data.wedding_time = Some(time);
    }
    data
}

pub struct PreviewEngine {
    inner: Arc<Mutex<Inner>>,
    data: InvitationData,
    options: EngineOptions,
    deps: EngineDeps,
    all_photos: Vec<String>,
    gallery_images: Vec<String>,
    slide_task: Option<JoinHandle<()>>,
    countdown_task: Option<JoinHandle<()>>,
    load_task: Option<JoinHandle<()>>,
    toast_task: Mutex<Option<JoinHandle<()>>>,
    pending_writes: Mutex<Vec<JoinHandle<()>>>,
    guestbook_loaded: watch::Receiver<bool>,
    disposed: bool,
}

impl PreviewEngine {
    /// Starts timers and the initial guestbook load. Must be called from
    /// within a tokio runtime.
    pub fn start(data: InvitationData, options: EngineOptions, deps: EngineDeps) -> Self {
        let data = apply_overrides(data, &options);
        let (loaded_tx, loaded_rx) = watch::channel(false);
        let mut engine = Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            all_photos: data.all_photos(),
            gallery_images: data.gallery(),
            data,
            options,
            deps,
            slide_task: None,
            countdown_task: None,
            load_task: None,
            toast_task: Mutex::new(None),
            pending_writes: Mutex::new(Vec::new()),
            guestbook_loaded: loaded_rx,
            disposed: false,
        };

        engine.load_task = Some(engine.spawn_guestbook_load(loaded_tx));
        engine.restart_slide_rotation();
        engine.restart_countdown();
        info!(
            user_id = %engine.options.user_id,
            photos = engine.all_photos.len(),
            cover_mode = engine.data.cover_display_style.as_str(),
            "preview engine started"
        );
        engine
    }

    pub fn data(&self) -> &InvitationData {
        &self.data
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Cover image followed by the main photos.
    pub fn all_photos(&self) -> &[String] {
        &self.all_photos
    }

    pub fn gallery_images(&self) -> &[String] {
        &self.gallery_images
    }

    pub fn snapshot(&self) -> EngineState {
        lock(&self.inner).state.clone()
    }

    pub fn current_slide(&self) -> usize {
        lock(&self.inner).state.current_slide
    }

    pub fn countdown(&self) -> Countdown {
        lock(&self.inner).state.countdown
    }

    pub fn copied_toast(&self) -> Option<String> {
        lock(&self.inner).state.copied_toast.clone()
    }

    pub fn guestbook_entries(&self) -> Vec<GuestbookEntry> {
        lock(&self.inner).state.guestbook_entries.clone()
    }

    pub fn recent_guestbook_entries(&self) -> Vec<GuestbookEntry> {
        lock(&self.inner).state.recent_guestbook_entries().to_vec()
    }

    pub fn wedding_datetime(&self) -> Option<DateTime<FixedOffset>> {
        self.data.wedding_at(self.options.utc_offset)
    }

    pub fn calendar(&self) -> Option<CalendarGrid> {
        CalendarGrid::for_wedding(self.data.wedding_date)
    }

    /// Today in the configured offset.
    pub fn today(&self) -> NaiveDate {
        self.deps
            .clock
            .now()
            .with_timezone(&self.options.utc_offset)
            .date_naive()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Resolves once the initial guestbook load has settled (or was cancelled).
    pub async fn guestbook_loaded(&self) {
        let mut loaded = self.guestbook_loaded.clone();
        let _ = loaded.wait_for(|done| *done).await;
    }

    /// Waits for outstanding guestbook writes. Local state never depends on
    /// this; it exists so a short-lived process can exit cleanly.
    pub async fn flush_pending_writes(&self) {
        let pending = std::mem::take(
            &mut *self
                .pending_writes
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        for handle in pending {
            let _ = handle.await;
        }
    }

    /// Swaps in edited invitation data. Photo lists are re-derived and the
    /// rotation restarts only when the photo count or display mode changed.
    pub fn update_invitation(&mut self, data: InvitationData) {
        if self.disposed {
            return;
        }
        let data = apply_overrides(data, &self.options);
        let all_photos = data.all_photos();
        let rotation_changed = all_photos.len() != self.all_photos.len()
            || data.cover_display_style != self.data.cover_display_style;
        let target_changed =
            data.wedding_at(self.options.utc_offset) != self.wedding_datetime();

        self.gallery_images = data.gallery();
        self.all_photos = all_photos;
        self.data = data;

        {
            let mut inner = lock(&self.inner);
            if inner.state.current_slide >= self.all_photos.len() {
                inner.state.current_slide = 0;
            }
            if inner.state.viewer_index >= self.gallery_images.len() {
                inner.state.viewer_index = 0;
            }
        }

        if rotation_changed {
            self.restart_slide_rotation();
        }
        if target_changed {
            self.restart_countdown();
        }
    }

    /// Cancels every timer and the pending initial load.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.abort_tasks();
        self.disposed = true;
        debug!(user_id = %self.options.user_id, "preview engine disposed");
    }

    fn abort_tasks(&mut self) {
        for task in [
            self.slide_task.take(),
            self.countdown_task.take(),
            self.load_task.take(),
            self.toast_task
                .get_mut()
                .unwrap_or_else(PoisonError::into_inner)
                .take(),
        ]
        .into_iter()
        .flatten()
        {
            task.abort();
        }
    }

    fn spawn_guestbook_load(&self, loaded: watch::Sender<bool>) -> JoinHandle<()> {
        let store = Arc::clone(&self.deps.guestbook);
        let inner = Arc::clone(&self.inner);
        let user_id = self.options.user_id.clone();
        tokio::spawn(async move {
            match store.load(&user_id).await {
                Ok(entries) => {
                    let mut inner = lock(&inner);
                    if inner.guestbook_touched {
                        debug!(%user_id, "dropping initial guestbook load after local submission");
                    } else {
                        debug!(%user_id, count = entries.len(), "guestbook loaded");
                        inner.state.guestbook_entries = entries;
                    }
                }
                Err(error) => {
                    debug!(%user_id, %error, "guestbook load failed; starting empty");
                }
            }
            let _ = loaded.send(true);
        })
    }

    fn restart_slide_rotation(&mut self) {
        if let Some(task) = self.slide_task.take() {
            task.abort();
        }
        let count = self.all_photos.len();
        if count <= 1 || !self.data.cover_display_style.rotates() {
            return;
        }

        let inner = Arc::clone(&self.inner);
        let mut ticker = interval_at(Instant::now() + SLIDE_INTERVAL, SLIDE_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.slide_task = Some(tokio::spawn(async move {
            loop {
                ticker.tick().await;
                let mut inner = lock(&inner);
                inner.state.current_slide = (inner.state.current_slide + 1) % count;
            }
        }));
    }

    fn restart_countdown(&mut self) {
        if let Some(task) = self.countdown_task.take() {
            task.abort();
        }
        let Some(target) = self.wedding_datetime() else {
            lock(&self.inner).state.countdown = Countdown::default();
            return;
        };

        let clock = Arc::clone(&self.deps.clock);
        lock(&self.inner).state.countdown = Countdown::between(&target, &clock.now());

        let inner = Arc::clone(&self.inner);
        let mut ticker = interval_at(Instant::now() + COUNTDOWN_INTERVAL, COUNTDOWN_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        self.countdown_task = Some(tokio::spawn(async move {
            loop {
                ticker.tick().await;
                let countdown = Countdown::between(&target, &clock.now());
                lock(&inner).state.countdown = countdown;
            }
        }));
    }

    pub fn set_current_slide(&self, index: usize) {
        let count = self.all_photos.len();
        if count == 0 {
            return;
        }
        lock(&self.inner).state.current_slide = index % count;
    }

    pub fn open_contact(&self) {
        lock(&self.inner).state.show_contact = true;
    }

    pub fn close_contact(&self) {
        lock(&self.inner).state.show_contact = false;
    }

    pub fn open_photo_viewer(&self, index: usize) {
        let mut inner = lock(&self.inner);
        inner.state.viewer_index = index.min(self.gallery_images.len().saturating_sub(1));
        inner.state.show_photo_viewer = true;
    }

    pub fn close_photo_viewer(&self) {
        lock(&self.inner).state.show_photo_viewer = false;
    }

    /// Moves the open viewer to `index`, clamped to the last gallery image.
    pub fn set_viewer_index(&self, index: usize) {
        lock(&self.inner).state.viewer_index =
            index.min(self.gallery_images.len().saturating_sub(1));
    }

    pub fn next_viewer_photo(&self) {
        let count = self.gallery_images.len();
        if count == 0 {
            return;
        }
        let mut inner = lock(&self.inner);
        inner.state.viewer_index = (inner.state.viewer_index + 1) % count;
    }

    pub fn previous_viewer_photo(&self) {
        let count = self.gallery_images.len();
        if count == 0 {
            return;
        }
        let mut inner = lock(&self.inner);
        inner.state.viewer_index = (inner.state.viewer_index + count - 1) % count;
    }

    pub fn open_guestbook_form(&self) {
        lock(&self.inner).state.show_guestbook_form = true;
    }

    pub fn close_guestbook_form(&self) {
        lock(&self.inner).state.show_guestbook_form = false;
    }

    pub fn set_guestbook_name(&self, name: impl Into<String>) {
        lock(&self.inner).state.guestbook_name = name.into();
    }

    pub fn set_guestbook_message(&self, message: impl Into<String>) {
        lock(&self.inner).state.guestbook_message = message.into();
    }

    /// Opens `key`, or collapses it when it is already the open one.
    pub fn toggle_accordion(&self, key: &str) {
        let mut inner = lock(&self.inner);
        let expanded = &mut inner.state.expanded_accordion;
        if expanded.as_deref() == Some(key) {
            *expanded = None;
        } else {
            *expanded = Some(key.to_string());
        }
    }

    /// Submits the open guestbook form.
    ///
    /// Blank name or message leaves everything untouched and returns `false`.
    /// Otherwise the entry is prepended locally, the form is cleared and
    /// closed, and the write is sent without waiting for it.
    pub fn submit_guestbook(&self) -> bool {
        let today = self.today();
        let entry = {
            let inner = lock(&self.inner);
            prepare_entry(
                &inner.state.guestbook_name,
                &inner.state.guestbook_message,
                today,
            )
        };
        let Some(entry) = entry else {
            debug!("ignoring guestbook submission with blank name or message");
            return false;
        };

        self.spawn_guestbook_write(entry.clone());

        let mut inner = lock(&self.inner);
        inner.guestbook_touched = true;
        inner.state.guestbook_entries.insert(0, entry);
        inner.state.guestbook_name.clear();
        inner.state.guestbook_message.clear();
        inner.state.show_guestbook_form = false;
        true
    }

    fn spawn_guestbook_write(&self, entry: GuestbookEntry) {
        let store = Arc::clone(&self.deps.guestbook);
        let user_id = self.options.user_id.clone();
        let handle = tokio::spawn(async move {
            if let Err(error) = store.append(&user_id, &entry).await {
                debug!(%user_id, %error, "guestbook write failed; keeping local entry");
            }
        });

        let mut pending = self
            .pending_writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        pending.retain(|handle| !handle.is_finished());
        pending.push(handle);
    }

    /// Copies `text` and confirms with a toast naming `label`. Returns whether
    /// the clipboard accepted the text; failures are otherwise silent.
    pub async fn copy_to_clipboard(&self, text: &str, label: &str) -> bool {
        self.copy_with_toast(text, copied_toast(label)).await
    }

    pub async fn copy_link(&self) -> bool {
        let link = self.options.share_url.clone();
        self.copy_with_toast(&link, LINK_COPIED_TOAST.to_string())
            .await
    }

    async fn copy_with_toast(&self, text: &str, toast: String) -> bool {
        match self.deps.clipboard.write_text(text).await {
            Ok(()) => {
                self.show_toast(toast);
                true
            }
            Err(error) => {
                debug!(%error, "clipboard write failed");
                false
            }
        }
    }

    fn show_toast(&self, toast: String) {
        if self.disposed {
            return;
        }
        lock(&self.inner).state.copied_toast = Some(toast);

        let inner = Arc::clone(&self.inner);
        let deadline = Instant::now() + TOAST_DURATION;
        let clear = tokio::spawn(async move {
            sleep_until(deadline).await;
            lock(&inner).state.copied_toast = None;
        });

        let mut slot = self
            .toast_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = slot.replace(clear) {
            previous.abort();
        }
    }
}

impl Drop for PreviewEngine {
    fn drop(&mut self) {
        self.abort_tasks();
    }
}
