use rand::{rngs::StdRng, Rng, SeedableRng};
use strum::VariantArray;

use crate::{
    env::{Environment, Info, Step},
    error::Result,
};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Square {
    Frozen,
    Hole,
    Start,
    Goal,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, VariantArray)]
pub enum FLAction {
    Left = 0,
    Down = 1,
    Right = 2,
    Up = 3,
}

impl FLAction {
    /// The action at index `i` in the circular order left, down, right, up
    fn from_index(i: usize) -> Self {
        Self::VARIANTS[i % 4]
    }

    /// The two actions at right angles to this one
    fn perpendicular(self) -> [Self; 2] {
        let i = self as usize;
        [Self::from_index(i + 3), Self::from_index(i + 1)]
    }
}

const SIZE: usize = 4;
const MAX_STEPS: u32 = 100;

/// A very simple RL environment taken from Python [gymnasium](https://gymnasium.farama.org/)
///
/// The agent walks a 4x4 frozen lake from the top left corner to the goal in the bottom
/// right corner without falling into a hole. On a slippery lake the agent moves in the
/// intended direction with probability 1/3 and in each perpendicular direction with
/// probability 1/3. Moves into the edge leave the agent in place.
///
/// Reaching the goal pays `1.0`; every other step pays nothing. A trial terminates in a hole
/// or at the goal and is truncated after 100 steps.
///
/// Intended for use with a [QLearner](crate::algo::QLearner)
pub struct FrozenLake {
    map: [Square; SIZE * SIZE],
    slippery: bool,
    pos: usize,
    steps: u32,
    rng: StdRng,
}

impl FrozenLake {
    pub fn new(slippery: bool) -> Self {
        use Square::*;
        // TODO: Support custom maps
        let map = [
            Start, Frozen, Frozen, Frozen, //
            Frozen, Hole, Frozen, Hole, //
            Frozen, Frozen, Frozen, Hole, //
            Hole, Frozen, Frozen, Goal,
        ];
        Self {
            map,
            slippery,
            pos: 0,
            steps: 0,
            rng: StdRng::from_entropy(),
        }
    }

    /// Seed the random source that decides slips
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// All states of the environment
    pub fn states() -> impl Iterator<Item = usize> {
        0..SIZE * SIZE
    }

    pub fn actions() -> &'static [FLAction] {
        FLAction::VARIANTS
    }

    /// The kind of square at `pos`
    pub fn square(&self, pos: usize) -> Square {
        self.map[pos]
    }

    fn moved(pos: usize, action: FLAction) -> usize {
        let (row, col) = (pos / SIZE, pos % SIZE);
        match action {
            FLAction::Left if col > 0 => pos - 1,
            FLAction::Down if row < SIZE - 1 => pos + SIZE,
            FLAction::Right if col < SIZE - 1 => pos + 1,
            FLAction::Up if row > 0 => pos - SIZE,
            _ => pos,
        }
    }
}

impl Default for FrozenLake {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Environment for FrozenLake {
    type State = usize;
    type Action = FLAction;

    fn reset(&mut self) -> (Self::State, Info) {
        self.pos = 0;
        self.steps = 0;
        (self.pos, Info::from([("prob", 1.0)]))
    }

    fn step(&mut self, action: Self::Action) -> Result<Step<Self::State>> {
        self.steps += 1;

        let (taken, prob) = if self.slippery {
            let [a, b] = action.perpendicular();
            let taken = [a, action, b][self.rng.gen_range(0..3)];
            (taken, 1.0 / 3.0)
        } else {
            (action, 1.0)
        };
        self.pos = Self::moved(self.pos, taken);

        let (reward, terminated) = match self.square(self.pos) {
            Square::Hole => (0.0, true),
            Square::Goal => (1.0, true),
            Square::Frozen | Square::Start => (0.0, false),
        };

        let mut step = Step::new(self.pos, reward);
        step.info.insert("prob", prob);
        if terminated {
            step = step.terminated();
        } else if self.steps >= MAX_STEPS {
            step = step.truncated();
        }
        Ok(step)
    }
}
