//! The game loop: two chains, input handling, spawning and the end-of-run
//! condition.
//!
//! One tick runs: input → clear → advance bullets → advance ships → check for
//! an empty ship chain → present → maybe spawn.  Bullets are drawn first so
//! the ship collides with their marks, not the other way round.

use std::thread;

use log::{debug, info, trace};
use rand::Rng;

use crate::chain::Chain;
use crate::compute::advance;
use crate::config::Config;
use crate::display::{draw_game_over, Surface};
use crate::entities::{Entity, LoopState, SHIP_COLS, SHIP_ROWS};
use crate::error::{ArcadeError, Result};
use crate::input::{InputSource, Signal};

/// Chance per running tick that a new bullet drops in.
pub const SPAWN_CHANCE: f64 = 0.2;

/// Rows between the ship's top and the bottom edge at start.
const SHIP_START_OFFSET: u16 = 5;

pub struct Game {
    pub ships: Chain,
    pub bullets: Chain,
    pub state: LoopState,
}

impl Default for Game {
    fn default() -> Self {
        Game::empty()
    }
}

impl Game {
    /// A running game with no entities in either chain.
    pub fn empty() -> Self {
        Game {
            ships: Chain::new(),
            bullets: Chain::new(),
            state: LoopState::Running,
        }
    }

    /// A running game for a `width × height` surface with the ship parked
    /// near the bottom centre.
    pub fn new(width: u16, height: u16) -> Result<Self> {
        if usize::from(width) < SHIP_COLS || usize::from(height) < SHIP_ROWS + 1 {
            return Err(ArcadeError::TerminalTooSmall { width, height });
        }
        let row = i32::from(height.saturating_sub(SHIP_START_OFFSET));
        let col = i32::from(width / 2).min(i32::from(width) - SHIP_COLS as i32);

        let mut game = Game::empty();
        game.ships.push(Entity::ship(row, col));
        Ok(game)
    }

    fn transition(&mut self, next: LoopState) {
        if self.state != next {
            info!("{:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }

    /// Apply one input signal.  Steering only reaches the ship while
    /// running; quit and pause work from any non-terminal state.
    pub fn handle_signal(&mut self, signal: Signal) {
        match (self.state, signal) {
            (LoopState::GameOver, _) => {}
            (_, Signal::Quit) => self.transition(LoopState::GameOver),
            (LoopState::Running, Signal::PauseToggle) => self.transition(LoopState::Paused),
            (LoopState::Paused, Signal::PauseToggle) => self.transition(LoopState::Running),
            (LoopState::Paused, _) => {}
            (LoopState::Running, steer) => self.steer(steer),
        }
    }

    /// Each press nudges the ship's velocity; presses accumulate.
    fn steer(&mut self, signal: Signal) {
        let Some(ship) = self.ships.first() else {
            return;
        };
        let mut ship = ship.borrow_mut();
        let entity = ship.entity_mut();
        match signal {
            Signal::MoveLeft => entity.col_vel -= 1,
            Signal::MoveRight => entity.col_vel += 1,
            Signal::MoveUp => entity.row_vel -= 1,
            Signal::MoveDown => entity.row_vel += 1,
            Signal::Quit | Signal::PauseToggle => {}
        }
    }

    /// With probability `SPAWN_CHANCE`, drop a bullet from a random column
    /// of the top edge.
    pub fn maybe_spawn(&mut self, width: u16, rng: &mut impl Rng) {
        if width == 0 || !rng.gen_bool(SPAWN_CHANCE) {
            return;
        }
        let col = i32::from(rng.gen_range(0..width));
        debug!("spawning bullet at column {}", col);
        self.bullets.push(Entity::bullet(0, col, 1, 0));
    }

    /// Run one tick with the signal polled for it and return the state the
    /// loop is in afterwards.
    pub fn tick<S: Surface + ?Sized>(
        &mut self,
        signal: Option<Signal>,
        surface: &mut S,
        rng: &mut impl Rng,
    ) -> Result<LoopState> {
        if self.state == LoopState::GameOver {
            return Ok(self.state);
        }
        if self.ships.is_empty() {
            self.transition(LoopState::GameOver);
            return Ok(self.state);
        }

        if let Some(signal) = signal {
            self.handle_signal(signal);
        }
        if self.state != LoopState::Running {
            return Ok(self.state);
        }

        trace!("tick: {} bullets", self.bullets.len());
        surface.clear();
        advance(&mut self.bullets, surface);
        advance(&mut self.ships, surface);
        if self.ships.is_empty() {
            self.transition(LoopState::GameOver);
        }
        surface.present()?;

        if self.state == LoopState::Running {
            let (width, _) = surface.size();
            self.maybe_spawn(width, rng);
        }
        Ok(self.state)
    }
}

/// Drive `game` until it ends, then show GAME OVER for the configured hold.
pub fn run<S, I, R>(
    game: &mut Game,
    surface: &mut S,
    input: &mut I,
    rng: &mut R,
    config: &Config,
) -> Result<()>
where
    S: Surface + ?Sized,
    I: InputSource + ?Sized,
    R: Rng,
{
    info!("game started");
    loop {
        let signal = input.poll_input(config.poll_timeout())?;
        if game.tick(signal, surface, rng)? == LoopState::GameOver {
            break;
        }
    }

    draw_game_over(surface)?;
    thread::sleep(config.game_over_hold());
    info!("game over");
    Ok(())
}
