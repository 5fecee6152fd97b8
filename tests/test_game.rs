use std::collections::VecDeque;
use std::time::Duration;

use arcade::config::Config;
use arcade::display::{GridSurface, Surface, GAME_OVER_TEXT};
use arcade::entities::*;
use arcade::game::*;
use arcade::input::{InputSource, Signal};
use arcade::{ArcadeError, Result};

use rand::rngs::mock::StepRng;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Always draws zero, so `gen_bool` always succeeds.
fn always_spawn() -> StepRng {
    StepRng::new(0, 0)
}

/// Always draws the maximum, so `gen_bool` never succeeds.
fn never_spawn() -> StepRng {
    StepRng::new(u64::MAX, 0)
}

fn ship_entity(game: &Game) -> Option<Entity> {
    game.ships.first().map(|n| n.borrow().entity().clone())
}

/// Plays back a fixed list of polls, then reports quit.
struct ScriptedInput {
    script: VecDeque<Option<Signal>>,
    polls: usize,
}

impl ScriptedInput {
    fn new(script: Vec<Option<Signal>>) -> Self {
        ScriptedInput {
            script: script.into(),
            polls: 0,
        }
    }
}

impl InputSource for ScriptedInput {
    fn poll_input(&mut self, _timeout: Duration) -> Result<Option<Signal>> {
        self.polls += 1;
        Ok(self.script.pop_front().unwrap_or(Some(Signal::Quit)))
    }
}

fn quick_config() -> Config {
    Config {
        game_over_hold_ms: 0,
        poll_ms: 0,
        ..Config::default()
    }
}

// ── Construction ──────────────────────────────────────────────────────────────

#[test]
fn new_game_places_ship_bottom_centre() {
    let game = Game::new(40, 20).unwrap();
    let ship = ship_entity(&game).unwrap();
    assert_eq!((ship.row, ship.col), (15, 20));
    assert_eq!(ship.lifetime, Lifetime::Infinite);
    assert!(game.bullets.is_empty());
    assert_eq!(game.state, LoopState::Running);
}

#[test]
fn new_game_rejects_tiny_terminal() {
    let err = Game::new(2, 20).err().unwrap();
    assert!(matches!(err, ArcadeError::TerminalTooSmall { width: 2, height: 20 }));
    assert!(Game::new(40, 4).is_err());
}

// ── Ticks ─────────────────────────────────────────────────────────────────────

#[test]
fn ship_hit_by_bullet_explodes_then_game_ends() {
    let mut game = Game::empty();
    game.ships.push(Entity::ship(10, 10));
    let bullet = game.bullets.push(Entity::bullet(10, 10, 0, 0));
    let mut s = GridSurface::new(40, 20);
    let mut rng = never_spawn();

    let state = game.tick(None, &mut s, &mut rng).unwrap();
    assert_eq!(state, LoopState::Running);
    let ship = ship_entity(&game).unwrap();
    assert_eq!(ship.bitmap, Bitmap::explosion(4, 3));
    assert_eq!(ship.lifetime, Lifetime::Ticks(5));

    game.bullets.unlink(bullet);
    for _ in 0..4 {
        assert_eq!(game.tick(None, &mut s, &mut rng).unwrap(), LoopState::Running);
        assert!(ship_entity(&game).is_some());
    }
    assert_eq!(game.tick(None, &mut s, &mut rng).unwrap(), LoopState::GameOver);
    assert!(game.ships.is_empty());
}

#[test]
fn bullet_is_not_the_one_that_explodes() {
    let mut game = Game::empty();
    game.ships.push(Entity::ship(10, 10));
    game.bullets.push(Entity::bullet(10, 11, 0, 0));
    let mut s = GridSurface::new(40, 20);

    game.tick(None, &mut s, &mut never_spawn()).unwrap();
    let bullet = game.bullets.first().unwrap();
    assert_eq!(bullet.borrow().entity().bitmap.glyph(0, 0), Some('*'));
    assert!(ship_entity(&game).unwrap().is_exploding());
}

#[test]
fn empty_ship_chain_ends_game_before_input() {
    let mut game = Game::empty();
    let mut s = GridSurface::new(40, 20);
    s.write_cell(0, 0, 'x');

    let state = game
        .tick(Some(Signal::PauseToggle), &mut s, &mut always_spawn())
        .unwrap();
    assert_eq!(state, LoopState::GameOver);
    // Nothing ran: no clear, no spawn.
    assert_eq!(s.row_text(0).chars().next(), Some('x'));
    assert!(game.bullets.is_empty());
}

#[test]
fn game_over_is_terminal() {
    let mut game = Game::new(40, 20).unwrap();
    game.handle_signal(Signal::Quit);
    assert_eq!(game.state, LoopState::GameOver);
    game.handle_signal(Signal::PauseToggle);
    let mut s = GridSurface::new(40, 20);
    assert_eq!(
        game.tick(None, &mut s, &mut always_spawn()).unwrap(),
        LoopState::GameOver
    );
    assert!(game.bullets.is_empty());
}

// ── Pause / quit ──────────────────────────────────────────────────────────────

#[test]
fn pause_freezes_chains_until_toggled_again() {
    let mut game = Game::empty();
    game.ships.push(Entity::ship(10, 10));
    game.bullets.push(Entity::bullet(0, 0, 1, 0));
    let mut s = GridSurface::new(40, 20);
    let mut rng = always_spawn();

    assert_eq!(
        game.tick(Some(Signal::PauseToggle), &mut s, &mut rng).unwrap(),
        LoopState::Paused
    );
    for _ in 0..3 {
        game.tick(None, &mut s, &mut rng).unwrap();
    }
    // Steering is ignored while paused.
    game.tick(Some(Signal::MoveLeft), &mut s, &mut rng).unwrap();
    assert_eq!(game.bullets.len(), 1);
    let bullet = game.bullets.first().unwrap();
    assert_eq!(bullet.borrow().entity().row, 0);
    assert_eq!(ship_entity(&game).unwrap().col_vel, 0);

    assert_eq!(
        game.tick(Some(Signal::PauseToggle), &mut s, &mut rng).unwrap(),
        LoopState::Running
    );
    assert_eq!(bullet.borrow().entity().row, 1);
    assert_eq!(game.bullets.len(), 2);
}

#[test]
fn quit_is_honoured_while_paused() {
    let mut game = Game::new(40, 20).unwrap();
    let mut s = GridSurface::new(40, 20);
    let mut rng = never_spawn();
    game.tick(Some(Signal::PauseToggle), &mut s, &mut rng).unwrap();
    assert_eq!(
        game.tick(Some(Signal::Quit), &mut s, &mut rng).unwrap(),
        LoopState::GameOver
    );
}

// ── Steering ──────────────────────────────────────────────────────────────────

#[test]
fn steering_accumulates_velocity() {
    let mut game = Game::new(40, 20).unwrap();
    game.handle_signal(Signal::MoveLeft);
    game.handle_signal(Signal::MoveLeft);
    game.handle_signal(Signal::MoveLeft);
    game.handle_signal(Signal::MoveDown);
    game.handle_signal(Signal::MoveUp);
    game.handle_signal(Signal::MoveUp);

    let ship = ship_entity(&game).unwrap();
    assert_eq!(ship.col_vel, -3);
    assert_eq!(ship.row_vel, -1);

    game.handle_signal(Signal::MoveRight);
    assert_eq!(ship_entity(&game).unwrap().col_vel, -2);
}

#[test]
fn steered_ship_moves_on_tick() {
    let mut game = Game::new(40, 20).unwrap();
    let mut s = GridSurface::new(40, 20);
    game.tick(Some(Signal::MoveRight), &mut s, &mut never_spawn())
        .unwrap();
    let ship = ship_entity(&game).unwrap();
    assert_eq!((ship.row, ship.col), (15, 21));
}

// ── Spawning ──────────────────────────────────────────────────────────────────

#[test]
fn spawned_bullet_starts_on_top_edge_moving_down() {
    let mut game = Game::empty();
    game.maybe_spawn(40, &mut always_spawn());

    let bullet = game.bullets.first().unwrap();
    let b = bullet.borrow();
    let e = b.entity();
    assert_eq!(e.row, 0);
    assert!((0..40).contains(&e.col));
    assert_eq!((e.row_vel, e.col_vel), (1, 0));
    assert_eq!(e.lifetime, Lifetime::Ticks(BULLET_LIFETIME));
}

#[test]
fn no_spawn_when_roll_fails() {
    let mut game = Game::empty();
    for _ in 0..100 {
        game.maybe_spawn(40, &mut never_spawn());
    }
    assert!(game.bullets.is_empty());
}

#[test]
fn spawn_rate_is_about_one_in_five() {
    let mut game = Game::empty();
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..1000 {
        game.maybe_spawn(40, &mut rng);
    }
    let spawned = game.bullets.len();
    assert!((120..=280).contains(&spawned), "spawned {spawned}");
}

#[test]
fn tick_spawns_after_drawing() {
    let mut game = Game::new(40, 20).unwrap();
    let mut s = GridSurface::new(40, 20);
    game.tick(None, &mut s, &mut always_spawn()).unwrap();

    // The new bullet exists but has not been drawn yet.
    assert_eq!(game.bullets.len(), 1);
    assert!(s.row_text(0).trim().is_empty());
}

// ── run ───────────────────────────────────────────────────────────────────────

#[test]
fn run_stops_on_quit_and_shows_game_over() {
    let mut game = Game::new(40, 20).unwrap();
    let mut s = GridSurface::new(40, 20);
    let mut input = ScriptedInput::new(vec![None, Some(Signal::MoveLeft), Some(Signal::Quit)]);

    run(&mut game, &mut s, &mut input, &mut never_spawn(), &quick_config()).unwrap();
    assert_eq!(game.state, LoopState::GameOver);
    assert_eq!(input.polls, 3);
    assert!(s.row_text(10).contains(GAME_OVER_TEXT));
}

#[test]
fn run_ends_when_ship_is_destroyed() {
    let mut game = Game::empty();
    game.ships.push(Entity::ship(10, 10));
    game.bullets.push(Entity::bullet(10, 11, 0, 0));
    let mut s = GridSurface::new(40, 20);
    let mut input = ScriptedInput::new(vec![None; 100]);

    run(&mut game, &mut s, &mut input, &mut never_spawn(), &quick_config()).unwrap();
    assert!(game.ships.is_empty());
    assert!(input.polls < 100);
}
