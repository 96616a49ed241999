//! One simulation tick
//!
//! Runs once per animation frame. Phase order matters: directives and held
//! keys land first, bots react to the post-physics world (their velocity is
//! integrated next tick), and the bomb rules see final positions.

use super::directive::Directive;
use super::effects::{apply_directive, update_barrage, update_falling_bombs};
use super::npc;
use super::physics::{Controls, advance, apply_controls};
use super::state::{EXPLOSION_COLOR, GameEvent, GameState, MatchPhase, NO_WINNER_LABEL};
use crate::consts::BOMB_TRANSFER_COOLDOWN_MS;

/// Human slots that can have held keys
pub const MAX_HUMANS: usize = 3;

/// Particle fade per tick
const PARTICLE_DECAY: f32 = 0.02;
/// Downward pull on particles per tick
const PARTICLE_GRAVITY: f32 = 0.2;

/// Everything the driver feeds into one tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Wall-clock time of this frame
    pub now_ms: f64,
    /// Held keys per human slot (P1, P2, P3)
    pub controls: [Controls; MAX_HUMANS],
    /// Directives submitted since the last tick, in arrival order
    pub directives: Vec<Directive>,
}

/// Advance the match by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    if state.is_over() {
        return;
    }
    let now = input.now_ms;

    for &directive in &input.directives {
        if !apply_directive(state, directive, now) {
            log::debug!("Dropped {directive:?}");
        }
    }

    for (character, &controls) in state
        .characters
        .iter_mut()
        .filter(|c| !c.is_bot())
        .zip(input.controls.iter())
    {
        apply_controls(character, controls);
    }

    let platforms = state.platforms();
    for character in state.characters.iter_mut().filter(|c| c.is_alive()) {
        advance(character, platforms);
    }

    for id in 0..state.characters.len() {
        let c = &state.characters[id];
        if c.is_bot() && c.is_alive() && !c.frozen {
            npc::decide(
                &mut state.characters,
                id,
                state.bomb_holder,
                state.forced_target,
                &mut state.rng,
            );
        }
    }

    update_barrage(state, now);
    update_falling_bombs(state);

    check_bomb_transfer(state, now);
    check_explosion(state, now);

    update_particles(state);
    state.camera.follow(&state.characters);
}

/// Pass the bomb to the first living character touching the holder
fn check_bomb_transfer(state: &mut GameState, now_ms: f64) {
    let Some(holder) = state.bomb_holder else {
        return;
    };
    let cooled_down = state
        .last_transfer_ms
        .is_none_or(|last| now_ms - last > BOMB_TRANSFER_COOLDOWN_MS);
    if !cooled_down {
        return;
    }
    let Some(holder_box) = state.living_character(holder).map(|c| c.bounds()) else {
        return;
    };

    let receiver = state
        .living()
        .find(|c| c.id != holder && c.bounds().overlaps(&holder_box))
        .map(|c| c.id);
    if let Some(to) = receiver {
        state.bomb_holder = Some(to);
        state.last_transfer_ms = Some(now_ms);
        log::debug!("Bomb passed {holder} -> {to}");
        state.events.push(GameEvent::BombPassed { from: holder, to });
    }
}

/// Update the countdown; on expiry kill the holder and settle the round
fn check_explosion(state: &mut GameState, now_ms: f64) {
    state.time_left = state.countdown(now_ms);
    if state.time_left > 0.0 {
        return;
    }
    let Some(victim) = state.bomb_holder else {
        return;
    };

    let center = state.characters[victim].center();
    state.characters[victim].dead = true;
    state.spawn_burst(center, EXPLOSION_COLOR);
    log::info!("{} exploded", state.characters[victim].label);
    state.events.push(GameEvent::Exploded { victim });

    if state.survivors() > 1 {
        state.initialize_round(true, now_ms);
    } else if state.config.is_test_mode {
        state.revive_all();
        state.initialize_round(true, now_ms);
    } else {
        let winner = state
            .living()
            .next()
            .map_or_else(|| NO_WINNER_LABEL.to_string(), |c| c.label.clone());
        log::info!("Match over after {} rounds, winner: {winner}", state.round);
        state.bomb_holder = None;
        state.barrage = None;
        state.phase = MatchPhase::GameOver {
            winner: winner.clone(),
        };
        state.events.push(GameEvent::MatchEnded { winner });
    }
}

fn update_particles(state: &mut GameState) {
    for particle in &mut state.particles {
        particle.life -= PARTICLE_DECAY;
        particle.pos += particle.vel;
        particle.vel.y += PARTICLE_GRAVITY;
    }
    state.particles.retain(|p| p.life > 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{HumanCount, MatchConfig};
    use crate::consts::{BOMB_DURATION_SECS, ROSTER_SIZE};
    use crate::sim::state::Particle;
    use glam::Vec2;
    use proptest::prelude::*;

    const FRAME_MS: f64 = 1000.0 / 60.0;

    fn input_at(now_ms: f64) -> TickInput {
        TickInput {
            now_ms,
            ..Default::default()
        }
    }

    /// Jump straight past the current round's deadline
    fn expire_round(state: &mut GameState, now_ms: &mut f64) {
        *now_ms += BOMB_DURATION_SECS as f64 * 1000.0 + 1.0;
        tick(state, &input_at(*now_ms));
    }

    #[test]
    fn test_bomb_expiry_kills_only_holder() {
        let mut state = GameState::new(2024, MatchConfig::new(HumanCount::Two), 0.0);
        assert_eq!(state.characters.iter().filter(|c| c.is_bot()).count(), 3);
        for c in &mut state.characters {
            c.frozen = true;
        }
        let holder = state.bomb_holder.unwrap();

        let mut now = 0.0;
        let mut victim = None;
        while victim.is_none() {
            now += FRAME_MS;
            tick(&mut state, &input_at(now));
            victim = state.drain_events().into_iter().find_map(|e| match e {
                GameEvent::Exploded { victim } => Some(victim),
                _ => None,
            });
            assert!(now < 14_000.0, "bomb never went off");
        }

        assert_eq!(victim, Some(holder));
        assert!(now >= 13_000.0);
        for c in &state.characters {
            assert_eq!(c.dead, c.id == holder, "character {}", c.id);
        }
        assert_eq!(state.round, 2);
        assert!(!state.is_over());
    }

    #[test]
    fn test_countdown_tracks_wall_clock() {
        let mut state = GameState::new(1, MatchConfig::default(), 500.0);
        tick(&mut state, &input_at(3_500.0));
        assert!((state.time_left - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_test_mode_loops_on_same_map() {
        let mut state = GameState::new(77, MatchConfig::default().test_mode(), 0.0);
        let map = state.map_index;
        let mut now = 0.0;
        for _ in 0..60 {
            expire_round(&mut state, &mut now);
            assert_eq!(state.phase, MatchPhase::Playing);
            assert_eq!(state.map_index, map);
            assert!(state.survivors() >= 2);
        }
        assert_eq!(state.round, 61);
        let ended = state
            .drain_events()
            .into_iter()
            .any(|e| matches!(e, GameEvent::MatchEnded { .. }));
        assert!(!ended);
    }

    #[test]
    fn test_match_ends_once_with_winner() {
        let mut state = GameState::new(9, MatchConfig::default(), 0.0);
        let mut now = 0.0;
        let mut events = Vec::new();
        for _ in 0..10 {
            expire_round(&mut state, &mut now);
            events.extend(state.drain_events());
        }

        let explosions = events
            .iter()
            .filter(|e| matches!(e, GameEvent::Exploded { .. }))
            .count();
        assert_eq!(explosions, ROSTER_SIZE - 1);

        let endings: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::MatchEnded { winner } => Some(winner.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(endings.len(), 1);

        let survivor = state.living().next().unwrap();
        assert_eq!(endings[0], survivor.label);
        assert_eq!(
            state.phase,
            MatchPhase::GameOver {
                winner: survivor.label.clone()
            }
        );
    }

    #[test]
    fn test_nobody_wins_with_no_survivors() {
        let mut state = GameState::new(5, MatchConfig::default(), 0.0);
        for id in 0..ROSTER_SIZE {
            state.characters[id].dead = id != 2;
        }
        state.bomb_holder = Some(2);
        tick(&mut state, &input_at(20_000.0));
        assert_eq!(
            state.phase,
            MatchPhase::GameOver {
                winner: NO_WINNER_LABEL.to_string()
            }
        );
    }

    #[test]
    fn test_game_over_is_terminal() {
        let mut state = GameState::new(5, MatchConfig::default(), 0.0);
        state.drain_events();
        state.phase = MatchPhase::GameOver {
            winner: "P1".to_string(),
        };
        let before = state.characters[0].pos;
        tick(&mut state, &input_at(100_000.0));
        assert_eq!(state.characters[0].pos, before);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_transfer_respects_cooldown() {
        let mut state = GameState::new(11, MatchConfig::default(), 0.0);
        let layout = [
            (500.0, 50.0),
            (520.0, 50.0),
            (530.0, 60.0),
            (100.0, 50.0),
            (300.0, 50.0),
        ];
        for (c, (x, y)) in state.characters.iter_mut().zip(layout) {
            c.frozen = true;
            c.pos = Vec2::new(x, y);
        }
        state.bomb_holder = Some(0);

        tick(&mut state, &input_at(1_000.0));
        assert_eq!(state.bomb_holder, Some(1));

        // 1 now touches 0 and 2, but the bomb is still hot
        tick(&mut state, &input_at(1_200.0));
        tick(&mut state, &input_at(1_500.0));
        assert_eq!(state.bomb_holder, Some(1));

        tick(&mut state, &input_at(1_501.0));
        assert_eq!(state.bomb_holder, Some(0));

        let passes: Vec<_> = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::BombPassed { .. }))
            .collect();
        assert_eq!(
            passes,
            vec![
                GameEvent::BombPassed { from: 0, to: 1 },
                GameEvent::BombPassed { from: 1, to: 0 },
            ]
        );
    }

    #[test]
    fn test_dead_characters_never_receive_bomb() {
        let mut state = GameState::new(12, MatchConfig::default(), 0.0);
        for c in &mut state.characters {
            c.frozen = true;
        }
        state.characters[1].pos = state.characters[0].pos;
        state.characters[1].dead = true;
        state.bomb_holder = Some(0);
        tick(&mut state, &input_at(1_000.0));
        assert_eq!(state.bomb_holder, Some(0));
    }

    #[test]
    fn test_human_controls_only_drive_humans() {
        let mut state = GameState::new(13, MatchConfig::new(HumanCount::Two), 0.0);
        for c in &mut state.characters {
            c.frozen = c.is_bot();
        }
        let mut input = input_at(10.0);
        input.controls = [
            Controls {
                right: true,
                ..Default::default()
            },
            Controls {
                left: true,
                ..Default::default()
            },
            // No third human this match
            Controls {
                right: true,
                ..Default::default()
            },
        ];
        let start: Vec<Vec2> = state.characters.iter().map(|c| c.pos).collect();
        tick(&mut state, &input);
        assert!(state.characters[0].pos.x > start[0].x);
        assert!(state.characters[1].pos.x < start[1].x);
        assert_eq!(state.characters[2].pos, start[2]);
    }

    #[test]
    fn test_directives_apply_before_physics() {
        let mut state = GameState::new(14, MatchConfig::default(), 0.0);
        let mut input = input_at(10.0);
        input.directives = vec![Directive::Freeze(1), Directive::Giant(3)];
        let start = state.characters[1].pos;
        tick(&mut state, &input);
        assert_eq!(state.characters[1].pos, start);
        assert_eq!(state.characters[3].scale, 2.0);
    }

    #[test]
    fn test_particles_decay_and_fall() {
        let mut state = GameState::new(15, MatchConfig::default(), 0.0);
        state.particles.push(Particle {
            pos: Vec2::ZERO,
            vel: Vec2::new(1.0, 0.0),
            life: 1.0,
            color: EXPLOSION_COLOR,
        });
        state.particles.push(Particle {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            life: 0.01,
            color: EXPLOSION_COLOR,
        });
        tick(&mut state, &input_at(10.0));
        assert_eq!(state.particles.len(), 1);
        let p = state.particles[0];
        assert!((p.life - 0.98).abs() < 1e-6);
        assert_eq!(p.pos, Vec2::new(1.0, 0.0));
        assert!((p.vel.y - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_same_seed_same_match() {
        let run = |seed| {
            let mut state = GameState::new(seed, MatchConfig::default(), 0.0);
            let mut now = 0.0;
            for _ in 0..600 {
                now += FRAME_MS;
                tick(&mut state, &input_at(now));
            }
            state
        };
        let a = run(99);
        let b = run(99);
        assert_eq!(a.bomb_holder, b.bomb_holder);
        for (ca, cb) in a.characters.iter().zip(&b.characters) {
            assert_eq!(ca.pos, cb.pos);
            assert_eq!(ca.vel, cb.vel);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn holder_is_always_living(
            seed in any::<u64>(),
            steps in prop::collection::vec(1.0f64..2_000.0, 1..200),
        ) {
            let mut state = GameState::new(seed, MatchConfig::default(), 0.0);
            let mut now = 0.0;
            for step in steps {
                now += step;
                tick(&mut state, &input_at(now));
                if state.is_over() {
                    break;
                }
                let holder = state.bomb_holder;
                prop_assert!(holder.is_some_and(|h| state.characters[h].is_alive()));
                prop_assert!(state.survivors() >= 2);
            }
        }
    }
}
