//! MenuSpy: scroll position → active menu entry
//!
//! # Design
//! 1. Items are (entry, target, offset) tuples sorted by offset ascending
//! 2. The active item is the last one whose offset is above
//!    `scroll + container height + threshold`
//! 3. Side effects (class toggle, callback, hash scheduling) fire only when
//!    the resolved target actually changes
//! 4. Resize and hash updates are debounced independently; both are polled
//!    from the frame loop
//!
//! # Usage
//! ```rust,ignore
//! let mut spy = MenuSpy::new(host, Some(nav), SpyConfig::default());
//! // from the host's animation-frame callback:
//! if spy.frame() == FrameControl::Continue {
//!     request_next_frame();
//! }
//! ```

use log::{debug, trace};
use serde::Serialize;

use super::config::SpyConfig;
use super::debounce::Debouncer;
use super::error::SpyError;
use super::frame::{FrameControl, FrameLoop};
use super::host::SpyHost;

// =============================================================================
// Types
// =============================================================================

/// A menu entry paired with the node it points to
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedItem<E> {
    pub entry: E,
    pub target: E,
    /// Target's distance from the top of the document at build time
    pub offset: f64,
}

/// Outcome of an item-list rebuild
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RebuildStats {
    /// Entries with a resolvable target
    pub tracked: usize,
    /// Entries dropped because their target does not exist
    pub dropped: usize,
    pub elapsed_us: u64,
}

/// Invoked once per matching item when the active target changes
pub type ActivationCallback<E> = Box<dyn FnMut(&TrackedItem<E>)>;

// =============================================================================
// MenuSpy
// =============================================================================

pub struct MenuSpy<H: SpyHost> {
    host: H,
    container: Option<H::Element>,
    config: SpyConfig,
    items: Vec<TrackedItem<H::Element>>,
    scroll_position: f64,
    viewport_threshold: f64,
    active_target: Option<H::Element>,
    callback: Option<ActivationCallback<H::Element>>,
    hash_debounce: Debouncer,
    resize_debounce: Debouncer,
    frame_loop: FrameLoop,
}

impl<H: SpyHost> MenuSpy<H> {
    /// Build a spy and run the initial activation pass.
    ///
    /// Without a container the spy is inert: nothing is tracked and the
    /// frame loop never starts.
    pub fn new(host: H, container: Option<H::Element>, config: SpyConfig) -> Self {
        Self::create(host, container, config, None)
    }

    pub fn with_callback(
        host: H,
        container: Option<H::Element>,
        config: SpyConfig,
        callback: impl FnMut(&TrackedItem<H::Element>) + 'static,
    ) -> Self {
        Self::create(host, container, config, Some(Box::new(callback)))
    }

    /// Like `new`, but rejects options the host would choke on
    pub fn try_new(
        host: H,
        container: Option<H::Element>,
        config: SpyConfig,
        callback: Option<ActivationCallback<H::Element>>,
    ) -> Result<Self, SpyError> {
        config.validate()?;
        Ok(Self::create(host, container, config, callback))
    }

    fn create(
        host: H,
        container: Option<H::Element>,
        config: SpyConfig,
        callback: Option<ActivationCallback<H::Element>>,
    ) -> Self {
        let mut spy = Self {
            hash_debounce: Debouncer::new(config.hash_timeout),
            resize_debounce: Debouncer::new(config.resize_timeout),
            host,
            container,
            config,
            items: Vec::new(),
            scroll_position: 0.0,
            viewport_threshold: 0.0,
            active_target: None,
            callback,
            frame_loop: FrameLoop::new(),
        };

        if spy.container.is_none() {
            debug!("[MenuSpy] No container, staying inert");
            return spy;
        }

        spy.rebuild();
        spy.scroll_position = spy.host.scroll_top();
        spy.tick();
        spy.frame_loop.start();
        spy
    }

    // -------------------------------------------------------------------------
    // Item list
    // -------------------------------------------------------------------------

    /// Recompute the threshold line and the tracked item list
    fn rebuild(&mut self) -> RebuildStats {
        let Some(container) = self.container.clone() else {
            return RebuildStats::default();
        };
        let start = instant::Instant::now();

        let threshold = self.host.element_height(&container) + self.config.threshold;
        let entries = self
            .host
            .select_all(&container, &self.config.menu_item_selector);
        let total = entries.len();

        let mut items: Vec<TrackedItem<H::Element>> = entries
            .into_iter()
            .filter_map(|entry| {
                let target = self.resolve_target(&entry)?;
                let offset = self.host.offset_top(&target);
                Some(TrackedItem { entry, target, offset })
            })
            .collect();
        // Stable: entries sharing an offset keep document order
        items.sort_by(|a, b| a.offset.total_cmp(&b.offset));

        let stats = RebuildStats {
            tracked: items.len(),
            dropped: total - items.len(),
            elapsed_us: start.elapsed().as_micros() as u64,
        };
        self.viewport_threshold = threshold;
        self.replace_items(items);

        debug!(
            "[MenuSpy] Rebuilt: {} tracked, {} dropped, threshold line {}px",
            stats.tracked, stats.dropped, threshold
        );
        stats
    }

    /// Swap in a rebuilt list, moving the highlight onto it.
    ///
    /// Entries that left the list lose the class; entries that joined and
    /// point at the active target gain it. No callback or fragment update:
    /// the active target itself has not changed.
    fn replace_items(&mut self, items: Vec<TrackedItem<H::Element>>) {
        let class = self.config.active_class.as_str();
        for item in &self.items {
            if let Some(parent) = self.host.parent(&item.entry) {
                self.host.remove_class(&parent, class);
            }
        }
        if let Some(active) = self.active_target.as_ref() {
            for item in items.iter().filter(|item| item.target == *active) {
                if let Some(parent) = self.host.parent(&item.entry) {
                    self.host.add_class(&parent, class);
                }
            }
        }
        self.items = items;
    }

    /// `data-target` selector first, then the link fragment
    fn resolve_target(&self, entry: &H::Element) -> Option<H::Element> {
        if let Some(selector) = self.host.target_selector(entry) {
            if !selector.is_empty() {
                return self.host.select_one(&selector);
            }
        }
        let hash = self.host.link_hash(entry);
        let id = hash.strip_prefix('#').unwrap_or(&hash);
        if id.is_empty() {
            return None;
        }
        self.host.element_by_id(id)
    }

    // -------------------------------------------------------------------------
    // Resolution
    // -------------------------------------------------------------------------

    /// Index of the item that should be active at the stored scroll position
    pub fn resolve(&self) -> Option<usize> {
        let from_top = self.scroll_position + self.viewport_threshold;
        self.items.iter().rposition(|item| item.offset < from_top)
    }

    /// Re-evaluate activation at the stored scroll position
    pub fn tick(&mut self) {
        let candidate = self.resolve().map(|idx| self.items[idx].target.clone());
        trace!(
            "[MenuSpy] tick at {} (line {})",
            self.scroll_position,
            self.scroll_position + self.viewport_threshold
        );
        self.activate(candidate);
    }

    fn activate(&mut self, candidate: Option<H::Element>) {
        let now = self.host.now();
        let class = self.config.active_class.as_str();

        let Some(target) = candidate else {
            if self.active_target.take().is_some() {
                for item in &self.items {
                    if let Some(parent) = self.host.parent(&item.entry) {
                        self.host.remove_class(&parent, class);
                    }
                }
                debug!("[MenuSpy] Above all targets, cleared active entry");
            }
            // Keeps the fragment in sync even when nothing changed
            self.hash_debounce.schedule(now);
            return;
        };

        if self.active_target.as_ref() == Some(&target) {
            return;
        }
        self.active_target = Some(target.clone());

        let mut matched = 0usize;
        for item in &self.items {
            let parent = self.host.parent(&item.entry);
            if let Some(parent) = parent.as_ref() {
                self.host.remove_class(parent, class);
            }

            if item.target == target {
                // A detached entry still counts as activated
                if let Some(parent) = parent.as_ref() {
                    self.host.add_class(parent, class);
                }
                if let Some(callback) = self.callback.as_mut() {
                    callback(item);
                }
                self.hash_debounce.schedule(now);
                matched += 1;
            }
        }

        debug!(
            "[MenuSpy] Activated #{} ({} entries)",
            self.host.element_id(&target),
            matched
        );
    }

    // -------------------------------------------------------------------------
    // Fragment sync
    // -------------------------------------------------------------------------

    fn write_hash(&self) {
        let hash = match &self.active_target {
            Some(target) => format!("#{}", self.host.element_id(target)),
            None => "#".to_string(),
        };

        if self.host.can_replace_history() {
            self.host.replace_hash(&hash);
        } else {
            // Assigning location.hash jumps to the anchor; put the page back
            let scroll = self.host.scroll_top();
            self.host.assign_hash(&hash);
            self.host.scroll_to(scroll);
        }
        debug!("[MenuSpy] Fragment set to {}", hash);
    }

    // -------------------------------------------------------------------------
    // Signals
    // -------------------------------------------------------------------------

    /// One animation-frame step. Returns whether the host should re-arm.
    pub fn frame(&mut self) -> FrameControl {
        if !self.frame_loop.begin_frame() {
            return FrameControl::Stop;
        }
        let now = self.host.now();

        if self.resize_debounce.poll(now) {
            self.refresh();
        }

        let scroll = self.host.scroll_top();
        if scroll != self.scroll_position {
            self.scroll_position = scroll;
            self.tick();
        }

        if self.hash_debounce.poll(now) {
            self.write_hash();
        }

        self.frame_loop.control()
    }

    /// Resize signal. The rebuild runs on the first frame after the quiet period.
    pub fn notify_resize(&mut self) {
        if !self.frame_loop.is_running() {
            return;
        }
        let now = self.host.now();
        self.resize_debounce.schedule(now);
    }

    /// Rebuild immediately and re-resolve at the current scroll position
    pub fn refresh(&mut self) -> RebuildStats {
        if self.container.is_none() || self.frame_loop.is_cancelled() {
            return RebuildStats::default();
        }
        let stats = self.rebuild();
        self.scroll_position = self.host.scroll_top();
        self.tick();
        stats
    }

    /// Stop tracking: cancel pending work and drop the highlight
    pub fn destroy(&mut self) {
        if self.frame_loop.is_cancelled() {
            return;
        }
        self.frame_loop.cancel();
        self.hash_debounce.cancel();
        self.resize_debounce.cancel();

        let class = self.config.active_class.as_str();
        for item in &self.items {
            if let Some(parent) = self.host.parent(&item.entry) {
                self.host.remove_class(&parent, class);
            }
        }
        self.items.clear();
        self.active_target = None;
        debug!("[MenuSpy] Destroyed");
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn config(&self) -> &SpyConfig {
        &self.config
    }

    pub fn items(&self) -> &[TrackedItem<H::Element>] {
        &self.items
    }

    pub fn active_target(&self) -> Option<&H::Element> {
        self.active_target.as_ref()
    }

    /// Every tracked item pointing at the active target
    pub fn active_items(&self) -> impl Iterator<Item = &TrackedItem<H::Element>> {
        self.items
            .iter()
            .filter(move |item| self.active_target.as_ref() == Some(&item.target))
    }

    pub fn scroll_position(&self) -> f64 {
        self.scroll_position
    }

    pub fn viewport_threshold(&self) -> f64 {
        self.viewport_threshold
    }

    pub fn is_inert(&self) -> bool {
        self.container.is_none()
    }

    pub fn is_running(&self) -> bool {
        self.frame_loop.is_running()
    }

    pub fn hash_pending(&self) -> bool {
        self.hash_debounce.is_pending()
    }

    pub fn resize_pending(&self) -> bool {
        self.resize_debounce.is_pending()
    }
}
