use qlearn::{
    algo::{QLearner, QLearnerConfig},
    env::{Environment, Info, Step},
    error::{Error, Result},
    exploration::EpsilonGreedy,
};

type Pos = (i32, i32);

const ACTIONS: [char; 4] = ['↑', '→', '↓', '←'];
const START: Pos = (2, 0);
const GOAL: Pos = (2, 6);

/// A 5 row by 6 column maze whose only shortest route is the middle corridor
///
/// Every step costs `-1.0`. Moves into a wall leave the walker in place.
struct Corridor {
    pos: Pos,
}

impl Corridor {
    const OPEN: [Pos; 13] = [
        (0, 1),
        (0, 3),
        (0, 4),
        (0, 5),
        (1, 1),
        (1, 3),
        (2, 1),
        (2, 2),
        (2, 3),
        (2, 4),
        (2, 5),
        (3, 1),
        (4, 1),
    ];

    fn new() -> Self {
        Self { pos: START }
    }

    fn states() -> Vec<Pos> {
        let mut states: Vec<Pos> = (0..5).flat_map(|r| (1..6).map(move |c| (r, c))).collect();
        states.extend([START, GOAL]);
        states
    }
}

impl Environment for Corridor {
    type State = Pos;
    type Action = char;

    fn reset(&mut self) -> (Self::State, Info) {
        self.pos = START;
        (self.pos, Info::new())
    }

    fn step(&mut self, action: Self::Action) -> Result<Step<Self::State>> {
        let (mut r, mut c) = self.pos;
        match action {
            '↑' => r -= 1,
            '→' => c += 1,
            '↓' => r += 1,
            '←' => c -= 1,
            _ => return Err(Error::InvalidAction(action.to_string())),
        }

        if (r, c) == GOAL {
            self.pos = GOAL;
            return Ok(Step::new(GOAL, -1.0).terminated());
        }
        if Self::OPEN.contains(&(r, c)) {
            self.pos = (r, c);
        }
        Ok(Step::new(self.pos, -1.0))
    }
}

fn seeded(seed: u64) -> QLearnerConfig {
    QLearnerConfig {
        n_iter: 1000,
        seed: Some(seed),
        ..Default::default()
    }
}

#[test]
fn learns_shortest_path() {
    let mut learner =
        QLearner::new(Corridor::states(), ACTIONS, Corridor::new(), seeded(2024)).unwrap();
    let final_reward = learner.learn().unwrap();
    assert_eq!(final_reward as i32, -6);

    let policy = learner.q_table().greedy_policy();
    for c in 0..6 {
        assert!(policy.contains(&((2, c), '→')), "column {c} should head right");
    }
    assert!(learner.to_string().contains("(2, 0) => '→' |"));
}

#[test]
fn default_settings_learn_shortest_path_for_any_seed() {
    for seed in 0..20 {
        let mut learner =
            QLearner::new(Corridor::states(), ACTIONS, Corridor::new(), seeded(seed)).unwrap();
        assert_eq!(learner.learn(), Ok(-6.0), "seed {seed}");
    }
}

#[test]
fn never_beats_shortest_path() {
    let config: QLearnerConfig = QLearnerConfig {
        n_iter: 200,
        ..Default::default()
    };
    let config = config.with_exploration(EpsilonGreedy::constant(0.1));
    let mut learner = QLearner::new(Corridor::states(), ACTIONS, Corridor::new(), config).unwrap();
    for _ in 0..5 {
        let reward = learner.learn().unwrap();
        assert!(reward <= -6.0, "got {reward}");
    }
    assert_eq!(learner.episode(), 1000);
}

#[test]
fn every_declared_pair_exists() {
    let learner =
        QLearner::new(Corridor::states(), ACTIONS, Corridor::new(), seeded(0)).unwrap();
    let table = learner.q_table();
    assert_eq!(table.len(), 27 * 4);
    for state in Corridor::states() {
        for action in ACTIONS {
            assert_eq!(table.get(&state, &action), Ok(0.0));
        }
    }
}

#[test]
fn rejected_action_aborts_learning() {
    let config = seeded(1).with_exploration(EpsilonGreedy::constant(1.0));
    let actions = ['↑', '→', '↓', '←', '↗'];
    let mut learner = QLearner::new(Corridor::states(), actions, Corridor::new(), config).unwrap();
    assert_eq!(learner.learn(), Err(Error::InvalidAction("↗".into())));
}

#[test]
fn undeclared_state_aborts_learning() {
    let states: Vec<Pos> = Corridor::states()
        .into_iter()
        .filter(|&s| s != (2, 3))
        .collect();
    let mut learner = QLearner::new(states, ACTIONS, Corridor::new(), seeded(0)).unwrap();
    assert_eq!(learner.learn(), Err(Error::UnknownState("(2, 3)".into())));
}
