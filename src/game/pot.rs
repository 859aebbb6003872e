/// Single-scalar pot ledger. Every chip movement into the pot happens
/// atomically with the seat's stack decrement, so `sum(chips) + pot` is
/// conserved between payouts.
///
/// Settlement is a flat split: integer floor division across the winner
/// count, remainder not redistributed. There is no side-pot separation
/// for uneven all-ins.
#[derive(Debug, Clone, Default)]
pub struct Pot {
    amount: i64,
}

impl Pot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, amount: i64) {
        self.amount += amount;
    }

    pub fn total(&self) -> i64 {
        self.amount
    }

    /// Empties the pot, returning its contents.
    pub fn take(&mut self) -> i64 {
        std::mem::take(&mut self.amount)
    }

    /// Floor share per winner. Any remainder is lost.
    pub fn share(&self, winners: usize) -> i64 {
        if winners == 0 {
            return 0;
        }
        self.amount / winners as i64
    }

    pub fn reset(&mut self) {
        self.amount = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates() {
        let mut pot = Pot::new();
        pot.add(10);
        pot.add(20);
        assert_eq!(pot.total(), 30);
    }

    #[test]
    fn test_take_empties() {
        let mut pot = Pot::new();
        pot.add(150);
        assert_eq!(pot.take(), 150);
        assert_eq!(pot.total(), 0);
    }

    #[test]
    fn test_split_truncates() {
        // 101 chips, 2 winners: each gets 50, 1 chip is lost to floor
        // division. Intentional, there is no odd-chip rule.
        let mut pot = Pot::new();
        pot.add(101);
        assert_eq!(pot.share(2), 50);

        pot.reset();
        pot.add(100);
        assert_eq!(pot.share(3), 33);
        assert_eq!(pot.share(0), 0);
    }
}
