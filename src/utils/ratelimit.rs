use std::collections::{HashMap, VecDeque};
use std::time::{SystemTime, UNIX_EPOCH};
use lazy_static::lazy_static;
use tokio::sync::Mutex;

lazy_static! {
    static ref COMMAND_COOLDOWNS: Mutex<CooldownTracker> =
        Mutex::new(CooldownTracker::new(COOLDOWN_SECONDS));

    // Sliding window over the last second, across all users
    static ref GLOBAL_REQUESTS: Mutex<SlidingWindow> =
        Mutex::new(SlidingWindow::new(GLOBAL_RATE_LIMIT, RATE_WINDOW_MS));
}

const COOLDOWN_SECONDS: u64 = 5;
const GLOBAL_RATE_LIMIT: usize = 50;  // requests per second
const RATE_WINDOW_MS: u64 = 1000;

/// Per (user, command) cooldowns. Only the first rejected attempt of a
/// cooldown period asks for a warning, so retries don't spam the channel.
pub struct CooldownTracker {
    cooldown_secs: u64,
    last_used: HashMap<(u64, String), u64>,
    last_warned: HashMap<(u64, String), u64>,
}

impl CooldownTracker {
    pub fn new(cooldown_secs: u64) -> Self {
        Self {
            cooldown_secs,
            last_used: HashMap::new(),
            last_warned: HashMap::new(),
        }
    }

    /// Returns Err((remaining_seconds, should_warn)) while on cooldown
    pub fn check(&mut self, user_id: u64, command: &str, now_secs: u64) -> Result<(), (u64, bool)> {
        self.prune(now_secs);
        let key = (user_id, command.to_string());

        if let Some(&last_time) = self.last_used.get(&key) {
            let elapsed = now_secs.saturating_sub(last_time);
            if elapsed < self.cooldown_secs {
                let should_warn = self
                    .last_warned
                    .get(&key)
                    .map_or(true, |&warned| warned < last_time);
                if should_warn {
                    self.last_warned.insert(key, now_secs);
                }
                return Err((self.cooldown_secs - elapsed, should_warn));
            }
        }

        self.last_used.insert(key, now_secs);
        Ok(())
    }

    /// Forget cooldowns that have run out
    fn prune(&mut self, now_secs: u64) {
        let cooldown = self.cooldown_secs;
        self.last_used
            .retain(|_, &mut used| now_secs.saturating_sub(used) < cooldown);
        let last_used = &self.last_used;
        self.last_warned.retain(|key, _| last_used.contains_key(key));
    }
}

/// Admits at most `limit` events per `window_ms`
pub struct SlidingWindow {
    limit: usize,
    window_ms: u64,
    events: VecDeque<u64>,
}

impl SlidingWindow {
    pub fn new(limit: usize, window_ms: u64) -> Self {
        Self {
            limit,
            window_ms,
            events: VecDeque::new(),
        }
    }

    /// Returns Err(ms until a slot frees up) when the window is full
    pub fn try_acquire(&mut self, now_ms: u64) -> Result<(), u64> {
        while self.events.front().is_some_and(|&t| t + self.window_ms <= now_ms) {
            self.events.pop_front();
        }

        if self.events.len() >= self.limit {
            let oldest = self.events.front().copied().unwrap_or(now_ms);
            return Err((oldest + self.window_ms).saturating_sub(now_ms));
        }

        self.events.push_back(now_ms);
        Ok(())
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Check if a user can execute a command (cooldown not active)
pub async fn check_cooldown(user_id: u64, command: &str) -> Result<(), (u64, bool)> {
    let now = now_millis() / 1000;
    COMMAND_COOLDOWNS.lock().await.check(user_id, command, now)
}

/// Check global rate limit (50 requests per second across all users)
pub async fn check_global_rate_limit() -> Result<(), u64> {
    GLOBAL_REQUESTS.lock().await.try_acquire(now_millis())
}

/// Get the cooldown seconds constant
pub fn get_cooldown_seconds() -> u64 {
    COOLDOWN_SECONDS
}
