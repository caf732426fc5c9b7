use alloc::collections::BTreeMap;
use alloc::string::String;
use serde::{Deserialize, Serialize};

use crate::*;

/// Playback states reported by the embedded player, using its numeric codes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerState {
    Unstarted,
    Ended,
    Playing,
    Paused,
    Buffering,
    Cued,
}

impl PlayerState {
    pub const fn from_code(code: i32) -> Option<Self> {
        use PlayerState::*;
        Some(match code {
            -1 => Unstarted,
            0 => Ended,
            1 => Playing,
            2 => Paused,
            3 => Buffering,
            5 => Cued,
            _ => return None,
        })
    }
}

/// Construction parameters for one player instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerOptions {
    pub video_id: String,
    pub autoplay: bool,
    pub mute: bool,
    pub controls: bool,
    /// Native whole-clip looping, only trusted for coarse windows.
    pub looping: bool,
    /// Native `[start, end]` window, only trusted for coarse windows.
    pub window: Option<(u32, u32)>,
    pub size: Option<(u32, u32)>,
}

impl PlayerOptions {
    /// Muted, chrome-less, endlessly looping clip used as ambient video.
    pub fn ambient(video_id: impl Into<String>) -> Self {
        Self {
            video_id: video_id.into(),
            autoplay: true,
            mute: true,
            controls: false,
            looping: true,
            window: None,
            size: None,
        }
    }

    /// Ambient loop restricted to the clip's declared window.
    pub fn ambient_window(video: &VideoDescriptor) -> Self {
        let mut options = Self::ambient(video.video_id.clone());
        options.window = video.time_window().ok();
        options
    }

    /// Muted autoplaying player with no native range or loop; confinement is done manually.
    pub fn unconfined(video_id: impl Into<String>) -> Self {
        Self {
            looping: false,
            ..Self::ambient(video_id)
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = Some((width, height));
        self
    }
}

/// Capability offered by an embedded video player once it signalled ready.
pub trait PlaybackAdapter {
    fn seek_to(&self, seconds: f64);
    fn current_time(&self) -> f64;
    fn play(&self);
    fn stop(&self);
    fn mute(&self);
}

/// Identifies an adapter instance inside a mounted cartridge.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AdapterKey {
    Background,
    Piece(usize),
    Segment(usize),
    Card(usize),
}

/// Monotonic board build number. Callbacks tagged with an older build are stale.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BoardGeneration(u32);

impl BoardGeneration {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Ready adapters of the mounted cartridge, with the universal stop signal.
#[derive(Debug)]
pub struct AdapterRegistry<P> {
    generation: BoardGeneration,
    adapters: BTreeMap<AdapterKey, P>,
}

impl<P> Default for AdapterRegistry<P> {
    fn default() -> Self {
        Self {
            generation: BoardGeneration::default(),
            adapters: BTreeMap::new(),
        }
    }
}

impl<P: PlaybackAdapter> AdapterRegistry<P> {
    pub fn generation(&self) -> BoardGeneration {
        self.generation
    }

    /// Forgets every adapter and starts a new build; late ready signals of the old one are ignored.
    pub fn rebuild(&mut self) -> BoardGeneration {
        self.stop_all();
        self.adapters.clear();
        self.generation = self.generation.next();
        self.generation
    }

    /// Records an adapter that signalled ready. Returns false for a stale build.
    pub fn on_ready(&mut self, generation: BoardGeneration, key: AdapterKey, adapter: P) -> bool {
        if generation != self.generation {
            log::debug!("dropping stale ready signal for {:?}", key);
            adapter.stop();
            return false;
        }
        self.adapters.insert(key, adapter);
        true
    }

    /// Stops and forgets one adapter whose element is going away.
    pub fn release(&mut self, key: AdapterKey) -> bool {
        match self.adapters.remove(&key) {
            Some(adapter) => {
                adapter.stop();
                true
            }
            None => false,
        }
    }

    pub fn get(&self, key: AdapterKey) -> Option<&P> {
        self.adapters.get(&key)
    }

    /// Runs `f` on the adapter if it is ready; otherwise does nothing.
    pub fn with_ready(&self, key: AdapterKey, f: impl FnOnce(&P)) {
        match self.adapters.get(&key) {
            Some(adapter) => f(adapter),
            None => log::debug!("adapter {:?} not ready, ignoring", key),
        }
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    /// Silences every ready adapter. Safe to call at any time, any number of times.
    pub fn stop_all(&self) {
        for adapter in self.adapters.values() {
            adapter.mute();
            adapter.stop();
        }
    }
}

/// Serializes adapter creation: the next one is requested only after the previous is ready.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreationQueue {
    total: usize,
    next: usize,
    pending: bool,
}

impl CreationQueue {
    pub const fn new(total: usize) -> Self {
        Self {
            total,
            next: 0,
            pending: false,
        }
    }

    /// Index of the adapter to create now, if nothing is in flight.
    pub fn request(&mut self) -> Option<usize> {
        if self.pending || self.next >= self.total {
            return None;
        }
        self.pending = true;
        Some(self.next)
    }

    /// Marks `index` ready and yields the following index to create, if any.
    pub fn on_ready(&mut self, index: usize) -> Option<usize> {
        if !self.pending || index != self.next {
            log::warn!("unexpected ready signal for adapter {}", index);
            return None;
        }
        self.pending = false;
        self.next += 1;
        self.request()
    }

    pub fn created(&self) -> usize {
        self.next
    }

    pub fn is_done(&self) -> bool {
        self.next >= self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    #[derive(Clone, Default)]
    struct FakePlayer {
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl PlaybackAdapter for FakePlayer {
        fn seek_to(&self, _seconds: f64) {
            self.log.borrow_mut().push("seek");
        }
        fn current_time(&self) -> f64 {
            0.0
        }
        fn play(&self) {
            self.log.borrow_mut().push("play");
        }
        fn stop(&self) {
            self.log.borrow_mut().push("stop");
        }
        fn mute(&self) {
            self.log.borrow_mut().push("mute");
        }
    }

    #[test]
    fn state_codes_map_to_states() {
        assert_eq!(PlayerState::from_code(1), Some(PlayerState::Playing));
        assert_eq!(PlayerState::from_code(-1), Some(PlayerState::Unstarted));
        assert_eq!(PlayerState::from_code(4), None);
    }

    #[test]
    fn ambient_window_ignores_invalid_ranges() {
        let video = VideoDescriptor::new("a", "A").with_window(30, 10);
        assert_eq!(PlayerOptions::ambient_window(&video).window, None);

        let video = VideoDescriptor::new("a", "A").with_window(10, 30);
        assert_eq!(PlayerOptions::ambient_window(&video).window, Some((10, 30)));
        assert!(!PlayerOptions::unconfined("a").looping);
    }

    #[test]
    fn stop_all_is_idempotent_and_safe_when_empty() {
        let mut registry: AdapterRegistry<FakePlayer> = AdapterRegistry::default();
        registry.stop_all();

        let player = FakePlayer::default();
        let log = player.log.clone();
        let generation = registry.generation();
        assert!(registry.on_ready(generation, AdapterKey::Background, player));

        registry.stop_all();
        registry.stop_all();
        assert_eq!(*log.borrow(), ["mute", "stop", "mute", "stop"]);
    }

    #[test]
    fn stale_ready_signal_is_dropped() {
        let mut registry: AdapterRegistry<FakePlayer> = AdapterRegistry::default();
        let old = registry.generation();
        registry.rebuild();

        let player = FakePlayer::default();
        assert!(!registry.on_ready(old, AdapterKey::Piece(0), player));
        assert!(registry.is_empty());

        let mut called = false;
        registry.with_ready(AdapterKey::Piece(0), |_| called = true);
        assert!(!called);
    }

    #[test]
    fn released_adapter_is_stopped_and_forgotten() {
        let mut registry: AdapterRegistry<FakePlayer> = AdapterRegistry::default();
        let player = FakePlayer::default();
        let log = player.log.clone();
        let generation = registry.generation();
        registry.on_ready(generation, AdapterKey::Card(2), player);

        assert!(registry.release(AdapterKey::Card(2)));
        assert!(!registry.release(AdapterKey::Card(2)));
        assert!(registry.get(AdapterKey::Card(2)).is_none());
        assert_eq!(*log.borrow(), ["stop"]);
    }

    #[test]
    fn creation_queue_waits_for_each_ready() {
        let mut queue = CreationQueue::new(3);

        assert_eq!(queue.request(), Some(0));
        assert_eq!(queue.request(), None);
        assert_eq!(queue.on_ready(1), None);
        assert_eq!(queue.on_ready(0), Some(1));
        assert_eq!(queue.on_ready(1), Some(2));
        assert_eq!(queue.on_ready(2), None);
        assert!(queue.is_done());
        assert_eq!(queue.created(), 3);
    }
}
