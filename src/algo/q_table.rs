use std::{
    collections::{HashMap, HashSet},
    fmt,
};

use rand::Rng;

use crate::{
    env::Hashable,
    error::{Error, Result},
    exp::Exp,
};

/// A table of action values for every pair of a declared state and a declared action
///
/// The table is dense: every pair has an entry from construction on, starting at `0.0`.
/// States and actions keep the order they were declared in. Action order decides
/// greedy ties (the earliest declared action wins) and state order is the row order of
/// the [`Display`](fmt::Display) summary.
#[derive(Debug, Clone)]
pub struct QTable<S, A> {
    values: HashMap<(S, A), f64>,
    states: Vec<S>,
    actions: Vec<A>,
}

/// Keeps the first occurrence of every item
fn dedup<T: Hashable>(items: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut seen = HashSet::new();
    items.into_iter().filter(|&x| seen.insert(x)).collect()
}

impl<S: Hashable, A: Hashable> QTable<S, A> {
    /// Initialize a table with a zero entry for every state action pair
    ///
    /// **Errors** if either set is empty
    pub fn new(
        states: impl IntoIterator<Item = S>,
        actions: impl IntoIterator<Item = A>,
    ) -> Result<Self> {
        let states = dedup(states);
        let actions = dedup(actions);
        if states.is_empty() {
            return Err(Error::InvalidConfig("the state set is empty".into()));
        }
        if actions.is_empty() {
            return Err(Error::InvalidConfig("the action set is empty".into()));
        }

        let values = states
            .iter()
            .flat_map(|&s| actions.iter().map(move |&a| ((s, a), 0.0)))
            .collect();

        Ok(Self {
            values,
            states,
            actions,
        })
    }

    /// Declared states, in declaration order
    pub fn states(&self) -> &[S] {
        &self.states
    }

    /// Declared actions, in declaration order
    pub fn actions(&self) -> &[A] {
        &self.actions
    }

    /// Number of state action pairs
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains_state(&self, state: &S) -> bool {
        self.values.contains_key(&(*state, self.actions[0]))
    }

    /// Fail with [`Error::UnknownState`] unless `state` was declared
    pub fn check_state(&self, state: &S) -> Result<()> {
        if self.contains_state(state) {
            Ok(())
        } else {
            Err(Error::UnknownState(format!("{state:?}")))
        }
    }

    /// Iterate over all `((state, action), value)` entries in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&(S, A), &f64)> {
        self.values.iter()
    }

    pub fn get(&self, state: &S, action: &A) -> Result<f64> {
        match self.values.get(&(*state, *action)) {
            Some(&value) => Ok(value),
            None => {
                self.check_state(state)?;
                Err(Error::UnknownAction(format!("{action:?}")))
            }
        }
    }

    /// The values of every declared action for `state`, in declaration order
    fn row<'a>(&'a self, state: &'a S) -> Result<impl Iterator<Item = (A, f64)> + 'a> {
        self.check_state(state)?;
        Ok(self
            .actions
            .iter()
            .map(move |&a| (a, self.values.get(&(*state, a)).copied().unwrap_or(0.0))))
    }

    /// The highest action value for `state` along with its action
    ///
    /// Only a strictly greater value replaces the current best, so ties resolve to the
    /// earliest declared action.
    fn best(&self, state: &S) -> Result<(A, f64)> {
        let mut row = self.row(state)?;
        let first = row
            .next()
            .ok_or_else(|| Error::InvalidConfig("the action set is empty".into()))?;
        Ok(row.fold(first, |best, (a, v)| if v > best.1 { (a, v) } else { best }))
    }

    /// The greedy action for `state`
    pub fn best_action(&self, state: &S) -> Result<A> {
        self.best(state).map(|(a, _)| a)
    }

    /// The maximum action value for `state`
    pub fn max_value(&self, state: &S) -> Result<f64> {
        self.best(state).map(|(_, v)| v)
    }

    /// Pick one of the declared actions uniformly at random
    pub fn random_action<R: Rng>(&self, rng: &mut R) -> A {
        self.actions[rng.gen_range(0..self.actions.len())]
    }

    /// Apply the temporal difference update for one transition
    ///
    /// Q(s,a) ← Q(s,a) + α (r + γ max<sub>a'</sub> Q(s',a') (1 - done) - Q(s,a))
    ///
    /// Both states are checked before anything is written, so a failed update leaves the
    /// table untouched.
    ///
    /// **Returns** the new value of `Q(s,a)`
    pub fn update(&mut self, exp: &Exp<S, A>, alpha: f64, gamma: f64) -> Result<f64> {
        let &Exp {
            state,
            action,
            reward,
            next_state,
            done,
        } = exp;

        let q_value = self.get(&state, &action)?;
        let max_next_q = self.max_value(&next_state)?;
        let future = if done { 0.0 } else { gamma * max_next_q };
        let new_q_value = q_value + alpha * (reward + future - q_value);

        self.values.insert((state, action), new_q_value);
        Ok(new_q_value)
    }

    /// The greedy action for every declared state, in declaration order
    pub fn greedy_policy(&self) -> Vec<(S, A)> {
        self.states
            .iter()
            .filter_map(|s| self.best_action(s).ok().map(|a| (*s, a)))
            .collect()
    }
}

impl<S: Hashable, A: Hashable> fmt::Display for QTable<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for state in &self.states {
            let Ok((best, _)) = self.best(state) else {
                continue;
            };
            write!(f, "{state:?} => {best:?} |")?;
            for (action, value) in self.row(state).map_err(|_| fmt::Error)? {
                write!(f, " {action:?}: {value:.3}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn table() -> QTable<u8, char> {
        QTable::new(0..3, ['a', 'b', 'c']).unwrap()
    }

    fn exp(state: u8, action: char, reward: f64, next_state: u8, done: bool) -> Exp<u8, char> {
        Exp {
            state,
            action,
            reward,
            next_state,
            done,
        }
    }

    #[test]
    fn every_pair_starts_at_zero() {
        let table = table();
        assert_eq!(table.len(), 9);
        for s in 0..3 {
            for a in ['a', 'b', 'c'] {
                assert_eq!(table.get(&s, &a), Ok(0.0));
            }
        }
    }

    #[test]
    fn duplicates_keep_first_occurrence() {
        let table = QTable::new([2, 1, 2], ['b', 'a', 'b']).unwrap();
        assert_eq!(table.states(), &[2, 1]);
        assert_eq!(table.actions(), &['b', 'a']);
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn empty_sets_are_rejected() {
        assert!(matches!(
            QTable::<u8, char>::new([], ['a']),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            QTable::<u8, char>::new([0], []),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn unknown_keys() {
        let table = table();
        assert_eq!(
            table.get(&9, &'a'),
            Err(Error::UnknownState("9".into()))
        );
        assert_eq!(
            table.get(&0, &'z'),
            Err(Error::UnknownAction("'z'".into()))
        );
        assert!(table.best_action(&9).is_err());
        assert!(!table.contains_state(&9));
    }

    #[test]
    fn ties_break_to_first_declared_action() {
        let mut table = table();
        for _ in 0..10 {
            assert_eq!(table.best_action(&0), Ok('a'));
        }

        table.update(&exp(0, 'b', 1.0, 1, true), 1.0, 0.9).unwrap();
        table.update(&exp(0, 'c', 1.0, 1, true), 1.0, 0.9).unwrap();
        for _ in 0..10 {
            assert_eq!(table.best_action(&0), Ok('b'));
        }
        assert_eq!(table.max_value(&0), Ok(1.0));
    }

    #[test]
    fn update_bootstraps_from_next_state() {
        let mut table = table();
        table.update(&exp(1, 'a', 2.0, 2, true), 1.0, 0.9).unwrap();
        assert_eq!(table.get(&1, &'a'), Ok(2.0));

        let value = table.update(&exp(0, 'c', -1.0, 1, false), 0.5, 0.9).unwrap();
        assert_eq!(value, 0.0 + 0.5 * (-1.0 + 0.9 * 2.0 - 0.0));
        assert_eq!(table.get(&0, &'c'), Ok(value));
    }

    #[test]
    fn terminal_transitions_ignore_next_state() {
        let mut table = table();
        table.update(&exp(1, 'b', 5.0, 2, true), 1.0, 1.0).unwrap();
        table.update(&exp(0, 'a', 3.0, 2, true), 1.0, 1.0).unwrap();

        let (alpha, reward) = (0.3, -2.0);
        let q_old = table.get(&0, &'a').unwrap();
        let value = table
            .update(&exp(0, 'a', reward, 1, true), alpha, 0.9)
            .unwrap();
        assert_eq!(value, q_old + alpha * (reward - q_old));
    }

    #[test]
    fn zero_learning_rate_changes_nothing() {
        let mut table = table();
        for s in 0..3 {
            for a in ['a', 'b', 'c'] {
                table.update(&exp(s, a, 10.0, (s + 1) % 3, s == 2), 0.0, 0.9).unwrap();
            }
        }
        assert!(table.iter().all(|(_, &v)| v == 0.0));
    }

    #[test]
    fn values_stay_bounded() {
        let mut table = table();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100_000 {
            let s = rng.gen_range(0..3);
            let next = rng.gen_range(0..3);
            let a = table.random_action(&mut rng);
            let reward = rng.gen_range(-1.0..1.0);
            table.update(&exp(s, a, reward, next, false), 1.0, 0.99).unwrap();
        }
        // |Q| <= r_max / (1 - gamma)
        assert!(table.iter().all(|(_, v)| v.is_finite() && v.abs() <= 100.0));
    }

    #[test]
    fn undeclared_next_state_leaves_table_untouched() {
        let mut table = table();
        let err = table.update(&exp(0, 'a', 1.0, 7, true), 1.0, 0.9);
        assert_eq!(err, Err(Error::UnknownState("7".into())));
        assert_eq!(table.get(&0, &'a'), Ok(0.0));
    }

    #[test]
    fn random_action_covers_action_set() {
        let table = table();
        let mut rng = StdRng::seed_from_u64(11);
        let seen: HashSet<char> = (0..200).map(|_| table.random_action(&mut rng)).collect();
        assert_eq!(seen, HashSet::from(['a', 'b', 'c']));
    }

    #[test]
    fn summary_lists_states_in_order() {
        let mut table = table();
        table.update(&exp(1, 'c', 1.0, 1, true), 0.5, 0.9).unwrap();
        let summary = table.to_string();
        let lines: Vec<_> = summary.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "0 => 'a' | 'a': 0.000 'b': 0.000 'c': 0.000");
        assert_eq!(lines[1], "1 => 'c' | 'a': 0.000 'b': 0.000 'c': 0.500");
        assert_eq!(table.greedy_policy(), vec![(0, 'a'), (1, 'c'), (2, 'a')]);
    }
}
