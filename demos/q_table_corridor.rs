use std::error::Error;

use qlearn::{
    algo::{QLearner, QLearnerConfig},
    env::{Environment, Info, Step},
    error::{self, Result},
};

type Pos = (i32, i32);

/// Walk from the left end of a corridor of `len` cells to the right end, one step at a time
struct Corridor {
    len: i32,
    pos: i32,
}

impl Environment for Corridor {
    type State = Pos;
    type Action = char;

    fn reset(&mut self) -> (Self::State, Info) {
        self.pos = 0;
        ((0, self.pos), Info::new())
    }

    fn step(&mut self, action: Self::Action) -> Result<Step<Self::State>> {
        match action {
            '→' => self.pos += 1,
            '←' => self.pos = (self.pos - 1).max(0),
            _ => return Err(error::Error::InvalidAction(action.to_string())),
        }
        let step = Step::new((0, self.pos), -1.0);
        Ok(if self.pos == self.len { step.terminated() } else { step })
    }
}

fn main() -> std::result::Result<(), Box<dyn Error>> {
    env_logger::init();

    let len = 6;
    let states = (0..=len).map(|c| (0, c));
    let config: QLearnerConfig = QLearnerConfig {
        n_iter: 500,
        ..Default::default()
    };
    let mut learner = QLearner::new(states, ['→', '←'], Corridor { len, pos: 0 }, config)?;

    let final_reward = learner.learn()?;
    println!("final trial reward: {final_reward} (best possible: {})", -len);
    print!("{learner}");
    Ok(())
}
