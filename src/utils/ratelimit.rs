use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};
use lazy_static::lazy_static;
use serenity::model::id::UserId;
use tokio::sync::Mutex;

const COOLDOWN_SECONDS: u64 = 5;

lazy_static! {
    static ref COMMAND_COOLDOWNS: Mutex<CooldownTracker> =
        Mutex::new(CooldownTracker::new(COOLDOWN_SECONDS));
}

/// Per-user, per-command cooldowns keyed by (user, command)
pub struct CooldownTracker {
    window_secs: u64,
    last_used: HashMap<(UserId, String), u64>,
}

impl CooldownTracker {
    pub fn new(window_secs: u64) -> Self {
        Self {
            window_secs,
            last_used: HashMap::new(),
        }
    }

    /// Record a use at `now` (unix seconds).
    /// Returns the remaining seconds if the command is still cooling down.
    pub fn check(&mut self, user_id: UserId, command: &str, now: u64) -> Result<(), u64> {
        let key = (user_id, command.to_string());

        if let Some(&last_time) = self.last_used.get(&key) {
            let elapsed = now.saturating_sub(last_time);
            if elapsed < self.window_secs {
                return Err(self.window_secs - elapsed);
            }
        }

        self.last_used.insert(key, now);
        Ok(())
    }
}

/// Check if a user can execute a command (cooldown not active)
/// Returns Err(remaining_seconds) while still on cooldown
pub async fn check_cooldown(user_id: UserId, command: &str) -> Result<(), u64> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    COMMAND_COOLDOWNS.lock().await.check(user_id, command, now)
}

/// Get the cooldown seconds constant
pub fn get_cooldown_seconds() -> u64 {
    COOLDOWN_SECONDS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cooldown_blocks_repeat_within_window() {
        let mut tracker = CooldownTracker::new(5);
        let user = UserId::new(42);

        assert_eq!(tracker.check(user, "$dashboard", 100), Ok(()));
        assert_eq!(tracker.check(user, "$dashboard", 102), Err(3));
        assert_eq!(tracker.check(user, "$dashboard", 105), Ok(()));
    }

    #[test]
    fn test_cooldown_is_per_command_and_user() {
        let mut tracker = CooldownTracker::new(5);
        let alice = UserId::new(1);
        let bob = UserId::new(2);

        assert_eq!(tracker.check(alice, "$dashboard", 10), Ok(()));
        assert_eq!(tracker.check(alice, "$compare", 10), Ok(()));
        assert_eq!(tracker.check(bob, "$dashboard", 10), Ok(()));
    }
}
