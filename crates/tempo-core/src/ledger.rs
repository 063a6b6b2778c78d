//! Coin ledger and completion rewards.
//!
//! The balance only goes up through rewards and only goes down through
//! shop purchases ([`crate::shop`]).

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ShopError;
use crate::timer::Completion;

pub const STARTING_COINS: u32 = 100;
/// Credited when a task is finished with work budget to spare.
pub const ON_TIME_REWARD: u32 = 35;
/// Credited when the budget ran out first.
pub const LATE_REWARD: u32 = 5;
pub const CELEBRATION_SECS: i64 = 10;

/// Celebration shown after an on-time completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Celebration {
    pub started_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

impl Celebration {
    fn starting(now: DateTime<Utc>) -> Self {
        Self {
            started_at: now,
            ends_at: now + Duration::seconds(CELEBRATION_SECS),
        }
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        now < self.ends_at
    }
}

/// What a completion earned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub amount: u32,
    pub balance: u32,
    pub celebration: Option<Celebration>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    coins: u32,
    #[serde(skip)]
    celebration: Option<Celebration>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(STARTING_COINS)
    }
}

impl Ledger {
    pub fn new(coins: u32) -> Self {
        Self {
            coins,
            celebration: None,
        }
    }

    pub fn balance(&self) -> u32 {
        self.coins
    }

    /// Credit the reward for a finished session.
    ///
    /// An on-time completion also starts a celebration, replacing any that
    /// is still showing.
    pub fn record_completion(&mut self, completion: &Completion, now: DateTime<Utc>) -> Reward {
        let (amount, celebration) = if completion.on_time {
            (ON_TIME_REWARD, Some(Celebration::starting(now)))
        } else {
            (LATE_REWARD, None)
        };
        self.coins = self.coins.saturating_add(amount);
        if celebration.is_some() {
            self.celebration = celebration;
        }
        tracing::debug!(amount, balance = self.coins, on_time = completion.on_time, "reward credited");
        Reward {
            amount,
            balance: self.coins,
            celebration,
        }
    }

    /// The celebration still on screen at `now`, if any.
    pub fn celebration(&self, now: DateTime<Utc>) -> Option<Celebration> {
        self.celebration.filter(|c| c.is_active(now))
    }

    /// Drop an expired celebration. Returns true when one was dismissed.
    pub fn expire_celebration(&mut self, now: DateTime<Utc>) -> bool {
        match self.celebration {
            Some(c) if !c.is_active(now) => {
                self.celebration = None;
                true
            }
            _ => false,
        }
    }

    /// User closed the celebration early. Returns true when one was set.
    pub fn dismiss_celebration(&mut self) -> bool {
        self.celebration.take().is_some()
    }

    pub(crate) fn debit(&mut self, cost: u32) -> Result<(), ShopError> {
        if cost > self.coins {
            return Err(ShopError::InsufficientCoins {
                cost,
                balance: self.coins,
            });
        }
        self.coins -= cost;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completion(on_time: bool) -> Completion {
        Completion {
            on_time,
            manual: true,
            work_secs_remaining: if on_time { 60 } else { 0 },
        }
    }

    #[test]
    fn on_time_pays_more_and_celebrates() {
        let now = Utc::now();
        let mut ledger = Ledger::default();
        let reward = ledger.record_completion(&completion(true), now);
        assert_eq!(reward.amount, 35);
        assert_eq!(reward.balance, 135);
        assert!(reward.celebration.is_some());
        assert!(ledger.celebration(now + Duration::seconds(9)).is_some());
        assert!(ledger.celebration(now + Duration::seconds(10)).is_none());
    }

    #[test]
    fn late_pays_consolation_without_celebration() {
        let mut ledger = Ledger::new(0);
        let reward = ledger.record_completion(&completion(false), Utc::now());
        assert_eq!(reward.amount, 5);
        assert_eq!(ledger.balance(), 5);
        assert!(reward.celebration.is_none());
    }

    #[test]
    fn celebration_expires_or_is_dismissed() {
        let now = Utc::now();
        let mut ledger = Ledger::default();
        ledger.record_completion(&completion(true), now);
        assert!(!ledger.expire_celebration(now + Duration::seconds(3)));
        assert!(ledger.expire_celebration(now + Duration::seconds(11)));
        assert!(ledger.celebration(now).is_none());

        ledger.record_completion(&completion(true), now);
        ledger.dismiss_celebration();
        assert!(ledger.celebration(now).is_none());
    }

    #[test]
    fn debit_refuses_overdraft() {
        let mut ledger = Ledger::new(40);
        assert_eq!(
            ledger.debit(50),
            Err(ShopError::InsufficientCoins { cost: 50, balance: 40 })
        );
        ledger.debit(40).unwrap();
        assert_eq!(ledger.balance(), 0);
    }
}
