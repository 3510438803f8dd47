//! Headless self-play driver: episode loop, periodic checkpointing, and a
//! deterministic evaluation mode for saved models.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use pong_dqn::{Action, AgentConfig, DqnAgent, EnvConfig, PongEnv, Side, Transition};

#[derive(Parser)]
#[command(name = "pong-dqn", about = "Self-play DQN training for two-paddle Pong")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Train both paddles by self-play.
    Train {
        #[arg(long, default_value_t = 1000)]
        episodes: usize,
        #[arg(long, default_value_t = 64)]
        batch_size: usize,
        /// Directory for periodic model snapshots.
        #[arg(long, default_value = "checkpoints")]
        checkpoint_dir: PathBuf,
        /// Save both models every this many episodes.
        #[arg(long, default_value_t = 100)]
        save_every: usize,
        /// Resume the left agent from a saved model.
        #[arg(long)]
        resume_left: Option<PathBuf>,
        /// Resume the right agent from a saved model.
        #[arg(long)]
        resume_right: Option<PathBuf>,
    },
    /// Play saved models against each other without exploration or learning.
    Eval {
        #[arg(long)]
        left_model: PathBuf,
        #[arg(long)]
        right_model: PathBuf,
        #[arg(long, default_value_t = 10)]
        episodes: usize,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .init();

    match Cli::parse().command {
        Command::Train {
            episodes,
            batch_size,
            checkpoint_dir,
            save_every,
            resume_left,
            resume_right,
        } => train(
            episodes,
            batch_size,
            checkpoint_dir,
            save_every,
            resume_left,
            resume_right,
        ),
        Command::Eval {
            left_model,
            right_model,
            episodes,
        } => eval(left_model, right_model, episodes),
    }
}

fn train(
    episodes: usize,
    batch_size: usize,
    checkpoint_dir: PathBuf,
    save_every: usize,
    resume_left: Option<PathBuf>,
    resume_right: Option<PathBuf>,
) -> Result<()> {
    let mut env = PongEnv::new(EnvConfig::default())?;
    let mut left = DqnAgent::new(AgentConfig::default())?;
    let mut right = DqnAgent::new(AgentConfig::default())?;

    if let Some(path) = resume_left {
        left.load(path)?;
    }
    if let Some(path) = resume_right {
        right.load(path)?;
    }

    std::fs::create_dir_all(&checkpoint_dir)?;

    for episode in 1..=episodes {
        let (reward_left, reward_right) =
            run_episode(&mut env, &mut left, &mut right, Some(batch_size))?;
        tracing::info!(
            episode,
            reward_left,
            reward_right,
            epsilon_left = left.epsilon(),
            epsilon_right = right.epsilon(),
            "episode finished"
        );

        if episode % save_every == 0 {
            left.save(checkpoint_dir.join(format!("pong_left_{episode}.safetensors")))?;
            right.save(checkpoint_dir.join(format!("pong_right_{episode}.safetensors")))?;
        }
    }
    Ok(())
}

fn eval(left_model: PathBuf, right_model: PathBuf, episodes: usize) -> Result<()> {
    let mut env = PongEnv::new(EnvConfig::default())?;
    let mut left = DqnAgent::new(AgentConfig::default())?;
    let mut right = DqnAgent::new(AgentConfig::default())?;
    left.load(left_model)?;
    right.load(right_model)?;
    left.set_epsilon(0.0);
    right.set_epsilon(0.0);

    for episode in 1..=episodes {
        let (reward_left, reward_right) = run_episode(&mut env, &mut left, &mut right, None)?;
        tracing::info!(
            episode,
            score_left = env.score(Side::Left),
            score_right = env.score(Side::Right),
            reward_left,
            reward_right,
            "evaluation episode finished"
        );
    }
    Ok(())
}

/// Plays one episode to its terminal score. With `train_batch` set, both
/// agents ingest every transition and take a training step per tick.
fn run_episode(
    env: &mut PongEnv,
    left: &mut DqnAgent,
    right: &mut DqnAgent,
    train_batch: Option<usize>,
) -> Result<(f32, f32)> {
    env.reset();
    let mut observation_left = env.observation(Side::Left);
    let mut observation_right = env.observation(Side::Right);
    let mut total_left = 0.0;
    let mut total_right = 0.0;

    loop {
        let action_left = left.select_action(&observation_left)?;
        let action_right = right.select_action(&observation_right)?;
        let step = env.advance(
            Action::from_index(action_left),
            Action::from_index(action_right),
        );

        if let Some(batch_size) = train_batch {
            left.ingest(Transition {
                observation: observation_left,
                action: action_left,
                reward: step.reward_left,
                next_observation: step.observation_left,
                terminal: step.done,
            });
            right.ingest(Transition {
                observation: observation_right,
                action: action_right,
                reward: step.reward_right,
                next_observation: step.observation_right,
                terminal: step.done,
            });
            left.train_step(batch_size)?;
            right.train_step(batch_size)?;
        }

        total_left += step.reward_left;
        total_right += step.reward_right;
        observation_left = step.observation_left;
        observation_right = step.observation_right;

        if step.done {
            return Ok((total_left, total_right));
        }
    }
}
