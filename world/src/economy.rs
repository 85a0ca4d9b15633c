//! Player money and lives.

use path_defence_core::{DEFAULT_STARTING_LIVES, DEFAULT_STARTING_MONEY};

/// Money available for construction and the lives left before game over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Economy {
    money: u32,
    lives: u32,
}

impl Economy {
    /// Creates an economy with the provided balances.
    #[must_use]
    pub const fn new(money: u32, lives: u32) -> Self {
        Self { money, lives }
    }

    /// Current balance.
    #[must_use]
    pub const fn money(&self) -> u32 {
        self.money
    }

    /// Lives left.
    #[must_use]
    pub const fn lives(&self) -> u32 {
        self.lives
    }

    /// Reports whether the balance covers `cost`.
    #[must_use]
    pub const fn can_afford(&self, cost: u32) -> bool {
        self.money >= cost
    }

    /// Deducts `cost` when affordable. Returns `false` and leaves the balance
    /// untouched otherwise.
    pub fn spend(&mut self, cost: u32) -> bool {
        match self.money.checked_sub(cost) {
            Some(remaining) => {
                self.money = remaining;
                true
            }
            None => false,
        }
    }

    /// Credits `amount` and returns the new balance.
    pub fn earn(&mut self, amount: u32) -> u32 {
        self.money = self.money.saturating_add(amount);
        self.money
    }

    /// Removes one life and returns the lives left.
    pub fn lose_life(&mut self) -> u32 {
        self.lives = self.lives.saturating_sub(1);
        self.lives
    }

    /// Reports whether the player ran out of lives.
    #[must_use]
    pub const fn is_game_over(&self) -> bool {
        self.lives == 0
    }
}

impl Default for Economy {
    fn default() -> Self {
        Self::new(DEFAULT_STARTING_MONEY, DEFAULT_STARTING_LIVES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_balances_match_new_game() {
        let economy = Economy::default();
        assert_eq!(economy.money(), 150);
        assert_eq!(economy.lives(), 20);
        assert!(!economy.is_game_over());
    }

    #[test]
    fn spend_refuses_overdraft() {
        let mut economy = Economy::new(50, 1);
        assert!(economy.can_afford(50));
        assert!(!economy.can_afford(51));

        assert!(!economy.spend(80));
        assert_eq!(economy.money(), 50);

        assert!(economy.spend(30));
        assert_eq!(economy.money(), 20);
    }

    #[test]
    fn earn_returns_new_balance() {
        let mut economy = Economy::new(u32::MAX - 5, 1);
        assert_eq!(economy.earn(3), u32::MAX - 2);
        assert_eq!(economy.earn(10), u32::MAX);
    }

    #[test]
    fn losing_last_life_ends_the_game() {
        let mut economy = Economy::new(0, 2);
        assert_eq!(economy.lose_life(), 1);
        assert!(!economy.is_game_over());
        assert_eq!(economy.lose_life(), 0);
        assert!(economy.is_game_over());
        assert_eq!(economy.lose_life(), 0);
    }
}
