//! Two-paddle Pong simulation: kinematics, collision resolution, scoring,
//! and per-side observation construction.
//!
//! The environment is a deterministic discrete-tick system; the only
//! randomness is the serve direction chosen on each ball reset.

use rand::rng;
use rand::Rng;

use crate::Observation;
use crate::config::EnvConfig;
use crate::error::Result;

/// Axis-aligned rectangle. `x`/`y` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

/// The two paddle owners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Per-tick paddle command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Up,
    Down,
    Stay,
}

impl Action {
    /// Number of distinct actions.
    pub const COUNT: usize = 3;

    /// Decodes an agent's action index; indices past `Down` mean `Stay`.
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => Action::Up,
            1 => Action::Down,
            _ => Action::Stay,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Action::Up => 0,
            Action::Down => 1,
            Action::Stay => 2,
        }
    }
}

/// Everything one tick of the simulation hands back to the driver.
#[derive(Debug, Clone)]
pub struct StepResult {
    pub observation_left: Observation,
    pub observation_right: Observation,
    pub reward_left: f32,
    pub reward_right: f32,
    pub done: bool,
}

pub struct PongEnv {
    config: EnvConfig,
    left_paddle: Rect,
    right_paddle: Rect,
    ball: Rect,
    ball_velocity: [f32; 2],
    score_left: u32,
    score_right: u32,
}

impl PongEnv {
    pub fn new(config: EnvConfig) -> Result<Self> {
        config.validate()?;
        let paddle = Rect::new(0.0, 0.0, config.paddle_width, config.paddle_height);
        let ball = Rect::new(0.0, 0.0, config.ball_size, config.ball_size);
        let mut env = Self {
            left_paddle: Rect {
                x: config.paddle_inset,
                ..paddle
            },
            right_paddle: Rect {
                x: config.width - config.paddle_inset - config.paddle_width,
                ..paddle
            },
            ball,
            ball_velocity: [0.0, 0.0],
            score_left: 0,
            score_right: 0,
            config,
        };
        env.reset();
        Ok(env)
    }

    /// Starts a fresh episode: paddles and ball recentered, scores zeroed,
    /// and a new serve rolled.
    pub fn reset(&mut self) {
        self.score_left = 0;
        self.score_right = 0;
        self.serve();
    }

    /// Recenters paddles and ball and re-randomizes the ball velocity.
    ///
    /// The opening serve of an episode (0–0) travels purely horizontally;
    /// after any point the vertical component is randomized as well.
    fn serve(&mut self) {
        self.center_paddles();
        self.ball.x = (self.config.width - self.config.ball_size) / 2.0;
        self.ball.y = (self.config.height - self.config.ball_size) / 2.0;

        let mut rng = rng();
        let speed = self.config.ball_speed;
        let horizontal = if rng.random::<bool>() { speed } else { -speed };
        let vertical = if self.score_left == 0 && self.score_right == 0 {
            0.0
        } else if rng.random::<bool>() {
            speed
        } else {
            -speed
        };
        self.ball_velocity = [horizontal, vertical];
    }

    fn center_paddles(&mut self) {
        let center = (self.config.height - self.config.paddle_height) / 2.0;
        self.left_paddle.y = center;
        self.right_paddle.y = center;
    }

    /// Moves one paddle by a fixed step, clamped fully inside the court.
    pub fn move_paddle(&mut self, side: Side, action: Action) {
        let paddle = match side {
            Side::Left => &mut self.left_paddle,
            Side::Right => &mut self.right_paddle,
        };
        let max_y = self.config.height - self.config.paddle_height;
        match action {
            Action::Up => paddle.y = (paddle.y - self.config.paddle_speed).clamp(0.0, max_y),
            Action::Down => paddle.y = (paddle.y + self.config.paddle_speed).clamp(0.0, max_y),
            Action::Stay => {}
        }
    }

    /// Advances the simulation one tick given both paddle commands.
    pub fn advance(&mut self, left_action: Action, right_action: Action) -> StepResult {
        self.move_paddle(Side::Left, left_action);
        self.move_paddle(Side::Right, right_action);

        let prev_left = self.score_left;
        let prev_right = self.score_right;
        self.move_ball();

        let reward_left = if self.score_left > prev_left {
            1.0
        } else if self.score_right > prev_right {
            -1.0
        } else {
            0.0
        };
        let reward_right = -reward_left;

        let done = self.score_left >= self.config.winning_score
            || self.score_right >= self.config.winning_score;

        StepResult {
            observation_left: self.observation(Side::Left),
            observation_right: self.observation(Side::Right),
            reward_left,
            reward_right,
            done,
        }
    }

    fn move_ball(&mut self) {
        self.ball.x += self.ball_velocity[0];
        self.ball.y += self.ball_velocity[1];

        // Bounce off top/bottom walls.
        if self.ball.top() <= 0.0 || self.ball.bottom() >= self.config.height {
            self.ball_velocity[1] = -self.ball_velocity[1];
        }

        // A paddle reflects the ball only while it is moving toward that
        // paddle; a ball already moving away may still overlap for a tick
        // and must not bounce twice.
        if self.ball.intersects(&self.left_paddle) && self.ball_velocity[0] < 0.0 {
            self.ball_velocity[0] = -self.ball_velocity[0];
        }
        if self.ball.intersects(&self.right_paddle) && self.ball_velocity[0] > 0.0 {
            self.ball_velocity[0] = -self.ball_velocity[0];
        }

        // An exit past a side bound scores for the far side and restarts
        // the rally.
        if self.ball.left() <= 0.0 {
            self.score_right += 1;
            self.serve();
        }
        if self.ball.right() >= self.config.width {
            self.score_left += 1;
            self.serve();
        }
    }

    /// Normalized, side-relative observation. The horizontal position and
    /// velocity are mirrored for the right side so one network architecture
    /// can drive either paddle.
    pub fn observation(&self, side: Side) -> Observation {
        let cfg = &self.config;
        match side {
            Side::Left => [
                self.ball.x / cfg.width,
                self.ball.y / cfg.height,
                self.ball_velocity[0] / cfg.ball_speed,
                self.ball_velocity[1] / cfg.ball_speed,
                self.left_paddle.y / cfg.height,
            ],
            Side::Right => [
                (cfg.width - self.ball.x) / cfg.width,
                self.ball.y / cfg.height,
                -self.ball_velocity[0] / cfg.ball_speed,
                self.ball_velocity[1] / cfg.ball_speed,
                self.right_paddle.y / cfg.height,
            ],
        }
    }

    pub fn ball(&self) -> &Rect {
        &self.ball
    }

    pub fn paddle(&self, side: Side) -> &Rect {
        match side {
            Side::Left => &self.left_paddle,
            Side::Right => &self.right_paddle,
        }
    }

    pub fn score(&self, side: Side) -> u32 {
        match side {
            Side::Left => self.score_left,
            Side::Right => self.score_right,
        }
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env() -> PongEnv {
        PongEnv::new(EnvConfig::default()).unwrap()
    }

    #[test]
    fn paddles_stay_inside_the_court() {
        let mut env = env();
        for _ in 0..200 {
            env.move_paddle(Side::Left, Action::Up);
        }
        assert_eq!(env.left_paddle.y, 0.0);

        for _ in 0..200 {
            env.move_paddle(Side::Left, Action::Down);
        }
        let max_y = env.config.height - env.config.paddle_height;
        assert_eq!(env.left_paddle.y, max_y);
    }

    #[test]
    fn opening_serve_is_horizontal() {
        let mut env = env();
        env.reset();
        assert_eq!(env.ball_velocity[1], 0.0);
        assert_eq!(env.ball_velocity[0].abs(), env.config.ball_speed);
    }

    #[test]
    fn serve_after_a_point_randomizes_both_axes() {
        let mut env = env();
        env.score_left = 1;
        env.serve();
        assert_eq!(env.ball_velocity[0].abs(), env.config.ball_speed);
        assert_eq!(env.ball_velocity[1].abs(), env.config.ball_speed);
    }

    #[test]
    fn left_exit_scores_for_the_right_side() {
        let mut env = env();
        env.ball.x = 5.0;
        env.ball.y = 100.0;
        env.ball_velocity = [-env.config.ball_speed, 0.0];

        let step = env.advance(Action::Stay, Action::Stay);

        assert_eq!(env.score_right, 1);
        assert_eq!(env.score_left, 0);
        assert_eq!(step.reward_left, -1.0);
        assert_eq!(step.reward_right, 1.0);
        assert!(!step.done);
        // Rally restarted: ball recentered, paddles recentered, full-speed
        // serve on both axes.
        assert_eq!(env.ball.x, (env.config.width - env.config.ball_size) / 2.0);
        assert_eq!(env.ball_velocity[1].abs(), env.config.ball_speed);
        let center = (env.config.height - env.config.paddle_height) / 2.0;
        assert_eq!(env.left_paddle.y, center);
    }

    #[test]
    fn right_exit_scores_for_the_left_side() {
        let mut env = env();
        env.ball.x = env.config.width - env.config.ball_size - 5.0;
        env.ball.y = 100.0;
        env.ball_velocity = [env.config.ball_speed, 0.0];

        let step = env.advance(Action::Stay, Action::Stay);

        assert_eq!(env.score_left, 1);
        assert_eq!(step.reward_left, 1.0);
        assert_eq!(step.reward_right, -1.0);
    }

    #[test]
    fn paddle_reflects_ball_moving_toward_it() {
        let mut env = env();
        env.ball.y = env.left_paddle.y;
        env.ball.x = env.left_paddle.right() + 5.0;
        env.ball_velocity = [-env.config.ball_speed, 0.0];

        env.advance(Action::Stay, Action::Stay);
        assert!(env.ball_velocity[0] > 0.0, "ball should bounce off the paddle");
    }

    #[test]
    fn no_double_bounce_while_overlapping_and_moving_away() {
        let mut env = env();
        env.ball.y = env.left_paddle.y;
        env.ball.x = env.left_paddle.x;
        env.ball_velocity = [env.config.ball_speed, 0.0];

        env.advance(Action::Stay, Action::Stay);
        assert!(
            env.ball_velocity[0] > 0.0,
            "an overlapping ball moving away must not re-reflect"
        );
    }

    #[test]
    fn ball_bounces_off_the_top_wall() {
        let mut env = env();
        env.ball.x = 200.0;
        env.ball.y = 3.0;
        env.ball_velocity = [0.0, -env.config.ball_speed];

        env.advance(Action::Stay, Action::Stay);
        assert_eq!(env.ball_velocity[1], env.config.ball_speed);
    }

    #[test]
    fn terminal_exactly_at_the_winning_score() {
        let mut env = env();
        env.score_left = env.config.winning_score - 2;

        env.ball.x = env.config.width - env.config.ball_size - 5.0;
        env.ball.y = 100.0;
        env.ball_velocity = [env.config.ball_speed, 0.0];
        let step = env.advance(Action::Stay, Action::Stay);
        assert!(!step.done, "one point short of the threshold is not terminal");

        env.ball.x = env.config.width - env.config.ball_size - 5.0;
        env.ball.y = 100.0;
        env.ball_velocity = [env.config.ball_speed, 0.0];
        let step = env.advance(Action::Stay, Action::Stay);
        assert!(step.done);
        assert_eq!(env.score_left, env.config.winning_score);
    }

    #[test]
    fn observations_are_side_relative() {
        let mut env = env();
        env.ball.x = 100.0;
        env.ball.y = 200.0;
        env.ball_velocity = [env.config.ball_speed, -env.config.ball_speed];
        env.left_paddle.y = 250.0;
        env.right_paddle.y = 350.0;

        let left = env.observation(Side::Left);
        let right = env.observation(Side::Right);

        assert_eq!(left, [100.0 / 800.0, 200.0 / 600.0, 1.0, -1.0, 250.0 / 600.0]);
        assert_eq!(
            right,
            [700.0 / 800.0, 200.0 / 600.0, -1.0, -1.0, 350.0 / 600.0]
        );
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = EnvConfig {
            paddle_height: -1.0,
            ..EnvConfig::default()
        };
        assert!(PongEnv::new(config).is_err());
    }
}
