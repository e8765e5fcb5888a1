use std::error::Error;

use qlearn::{
    algo::{QLearner, QLearnerConfig},
    decay,
    exploration::EpsilonGreedy,
    gym::FrozenLake,
};

const NUM_EPISODES: u32 = 10000;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let config: QLearnerConfig = QLearnerConfig {
        learning_rate: 0.1,
        discount_factor: 0.99,
        n_iter: NUM_EPISODES,
        ..Default::default()
    };
    let config = config.with_exploration(EpsilonGreedy::new(decay::Exponential::new(
        1e-3, 1.0, 0.01,
    )?));

    let mut learner = QLearner::new(
        FrozenLake::states(),
        FrozenLake::actions().iter().copied(),
        FrozenLake::default(),
        config,
    )?;
    let final_reward = learner.learn()?;

    println!("final trial reward: {final_reward}");
    print!("{learner}");
    Ok(())
}
