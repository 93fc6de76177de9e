//! Per-tick simulation step
//!
//! Update order is fixed: decor, tank, invader, shield, shells, power-ups,
//! pops. Shells and power-ups only mark themselves removed during the pass;
//! `compact` runs once at the end.

use super::collision::Collidable;
use super::energy::drain_shield;
use super::entity::TextColor;
use super::invader::PowerUpKind;
use super::powerup::PickupOutcome;
use super::shell::ShellOutcome;
use super::state::{GameEvent, GameState, GameStatus, PerfectSplash};
use super::tank::TankContext;
use crate::assets::AssetProvider;

/// Input snapshot for one tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    /// Power-up activation; also confirms splash screens
    pub activate: bool,
    /// Host wall clock, used only by the perfect splash timeout
    pub wall_clock_ms: u64,
}

/// Advance the game by `dt_ms`
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: u64, assets: &dyn AssetProvider) {
    state.clock_ms = state.clock_ms.saturating_add(dt_ms);
    let confirm = input.activate && !state.last_activate;
    state.last_activate = input.activate;

    resolve_sprites(state, assets);

    match state.status {
        GameStatus::NewGame if confirm => {
            let level = state.score.level();
            state.init_entities(level);
            state.score.level_score = 0;
            state.status = GameStatus::LevelInProgress;
            log::info!("Level {level} started");
            state.events.push(GameEvent::LevelStarted { level });
        }
        GameStatus::StartingLevel => advance_splash(state, input, confirm),
        _ => {}
    }

    if !matches!(state.status, GameStatus::StartingLevel | GameStatus::Dead) {
        update_tank(state, dt_ms, assets);
        update_invader(state, input, dt_ms);
        update_shield(state, dt_ms);
        update_shells(state, dt_ms);
        update_power_ups(state, dt_ms);
        // visuals may have changed above
        resolve_sprites(state, assets);
    }

    let feedback = &state.tuning.feedback;
    for pop in &mut state.pops {
        pop.update(dt_ms, feedback.pop_speed, feedback.pop_distance);
    }

    state.compact();
}

fn resolve_sprites(state: &mut GameState, assets: &dyn AssetProvider) {
    let mut errors = Vec::new();
    let mut resolve = |sprite: &mut super::entity::Sprite| {
        if let Err(err) = sprite.resolve(assets) {
            errors.push(err);
        }
    };
    resolve(&mut state.background.body.sprite);
    resolve(&mut state.land.body.sprite);
    resolve(&mut state.tank.body.sprite);
    resolve(&mut state.invader.body.sprite);
    resolve(&mut state.shield.body.sprite);
    resolve(&mut state.energy.body.sprite);
    resolve(&mut state.energy.fill);
    for shell in &mut state.shells {
        resolve(&mut shell.sprite);
    }
    for power_up in &mut state.power_ups {
        resolve(&mut power_up.body.sprite);
    }
    for err in errors {
        state.report_missing(err);
    }
}

/// Perfect splash (wall-clock bounded, skippable), then statistics until confirm
fn advance_splash(state: &mut GameState, input: &TickInput, confirm: bool) {
    if let Some(splash) = state.perfect_splash.as_mut() {
        let since = *splash.shown_since_ms.get_or_insert(input.wall_clock_ms);
        let elapsed = input.wall_clock_ms.saturating_sub(since);
        if confirm || elapsed >= state.tuning.feedback.perfect_ms {
            state.perfect_splash = None;
        }
        return;
    }
    if confirm {
        state.score.begin_next_level();
        state.status = GameStatus::LevelInProgress;
        let level = state.score.level();
        log::info!("Level {level} started");
        state.events.push(GameEvent::LevelStarted { level });
    }
}

fn update_tank(state: &mut GameState, dt_ms: u64, assets: &dyn AssetProvider) {
    let report = {
        let ctx = TankContext {
            target_x: state.invader.center().x,
            in_progress: state.status == GameStatus::LevelInProgress,
            now_ms: state.clock_ms,
            dt_ms,
            level: state.score.level(),
            stage_width: state.tuning.stage.width,
            shells: &state.shells,
            tuning: &state.tuning.tank,
        };
        state.tank.update(&ctx, &mut state.rng)
    };
    for shot in report.shots {
        state.spawn_shell(shot, assets);
    }
    if report.spawn_power_up {
        state.spawn_power_up(assets);
    }
}

fn update_invader(state: &mut GameState, input: &TickInput, dt_ms: u64) {
    let report = state
        .invader
        .update(input, state.status, dt_ms, &state.tuning, &mut state.energy);

    if let Some(at) = report.drop_at {
        let score = state.tuning.invader.drop_score;
        state.pop(format!("+{score}"), TextColor::White, at);
        state.mod_score(score);
        state.events.push(GameEvent::DropScored { at });
    }

    if report.landed && state.status == GameStatus::LevelInProgress {
        state.status = GameStatus::LevelComplete;
        state.was_perfect = !state.score.been_hit;
        let summary = state.score.complete_level(state.clock_ms);
        state.events.push(GameEvent::LevelComplete(summary));
    }

    if report.left_stage && state.status == GameStatus::LevelComplete {
        state.status = GameStatus::StartingLevel;
        state.perfect_splash = state.was_perfect.then(PerfectSplash::default);
        // the counter only advances on confirm
        let level = state.score.level();
        state.init_entities(level);
    }
}

fn update_shield(state: &mut GameState, dt_ms: u64) {
    state.shield.follow(state.invader.body.pos, &state.tuning.shield);
    if state.invader.power_up == Some(PowerUpKind::PulseShield) && state.invader.shield_on {
        drain_shield(&mut state.energy, &mut state.invader.shield_on, dt_ms, &state.tuning.shield);
    }
}

fn update_shells(state: &mut GameState, dt_ms: u64) {
    let target = state.invader.hitbox();
    let shielded = state.invader.shield_on && !state.energy.is_empty();
    let speed = state.tuning.projectiles.shell_speed;

    let mut hits = Vec::new();
    for shell in state.shells.iter_mut().filter(|s| !s.removed) {
        if let ShellOutcome::Hit { shielded, at } = shell.update(dt_ms, speed, &target, shielded) {
            hits.push((shielded, at));
        }
    }

    for (shielded, at) in hits {
        if shielded {
            state.pop("x", TextColor::Green, at);
        } else {
            let penalty = state.tuning.projectiles.hit_penalty;
            state.pop(format!("-{penalty}"), TextColor::Red, at);
            state.mod_score(-penalty);
            state.score.been_hit = true;
        }
        state.events.push(GameEvent::ShellHit { shielded });
    }
}

fn update_power_ups(state: &mut GameState, dt_ms: u64) {
    let target = state.invader.hitbox();
    let speed = state.tuning.projectiles.power_up_speed;
    let height = state.tuning.stage.height;

    let mut collected = Vec::new();
    for power_up in state.power_ups.iter_mut().filter(|p| !p.removed) {
        if let PickupOutcome::Collected(kind) = power_up.update(dt_ms, speed, &target, height) {
            collected.push(kind);
        }
    }

    for kind in collected {
        state.invader.apply_power_up(kind, &mut state.energy);
        state.events.push(GameEvent::PowerUpCollected(kind));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{Atlas, visuals};
    use crate::sim::tank::{FireMode, Shot};
    use glam::IVec2;

    const DT: u64 = 16;

    fn confirm() -> TickInput {
        TickInput {
            activate: true,
            ..Default::default()
        }
    }

    fn idle() -> TickInput {
        TickInput::default()
    }

    fn started(seed: u64) -> (GameState, Atlas) {
        let atlas = Atlas::with_defaults();
        let mut state = GameState::new(seed);
        tick(&mut state, &confirm(), DT, &atlas);
        tick(&mut state, &idle(), DT, &atlas);
        settle_opening_roll(&mut state);
        (state, atlas)
    }

    /// Undo whatever the tank's first special roll produced
    fn settle_opening_roll(state: &mut GameState) {
        state.tank.fire_mode = FireMode::Normal;
        state.tank.tracked.clear();
        state.shells.clear();
        state.power_ups.clear();
    }

    fn land(state: &mut GameState, atlas: &Atlas) {
        state.invader.body.pos = IVec2::new(150, 600 - 75 - 24 + 1);
        tick(state, &idle(), DT, atlas);
        assert_eq!(state.status, GameStatus::LevelComplete);
        for _ in 0..100 {
            if state.status == GameStatus::StartingLevel {
                break;
            }
            tick(state, &idle(), 100, atlas);
        }
        assert_eq!(state.status, GameStatus::StartingLevel);
    }

    #[test]
    fn test_confirm_starts_first_level() {
        let atlas = Atlas::with_defaults();
        let mut state = GameState::new(7);
        tick(&mut state, &idle(), DT, &atlas);
        assert_eq!(state.status, GameStatus::NewGame);

        tick(&mut state, &confirm(), DT, &atlas);
        assert_eq!(state.status, GameStatus::LevelInProgress);
        let events = state.drain_events();
        assert_eq!(events.first(), Some(&GameEvent::LevelStarted { level: 1 }));
        assert!(
            events[1..]
                .iter()
                .all(|e| matches!(e, GameEvent::PowerUpSpawned(_)))
        );
        assert_eq!(state.tank.body.pos.x, 192);
        assert_eq!(state.invader.body.pos, IVec2::new(192, 0));
    }

    #[test]
    fn test_first_tick_of_level_rolls_for_special() {
        let atlas = Atlas::with_defaults();
        let mut tuning = crate::tuning::Tuning::default();
        tuning.tank.power_up_roll = -1.0;
        let mut state = GameState::with_tuning(7, tuning);
        tick(&mut state, &confirm(), DT, &atlas);
        assert_eq!(state.power_ups.len(), 1);
        assert!(state.events.iter().any(|e| matches!(e, GameEvent::PowerUpSpawned(_))));

        // no second roll inside the delay
        for _ in 0..3 {
            tick(&mut state, &idle(), DT, &atlas);
        }
        assert_eq!(state.power_ups.len(), 1);
    }

    #[test]
    fn test_unshielded_hit_costs_points_once() {
        let (mut state, atlas) = started(7);
        state.invader.body.pos = IVec2::new(150, 200);
        state.spawn_shell(Shot { x: 160, y: 225, angle: 0.0 }, &atlas);

        tick(&mut state, &idle(), DT, &atlas);

        assert_eq!(state.score.score(), -100);
        assert_eq!(state.score.level_score, -100);
        assert!(state.score.been_hit);
        assert!(state.shells.is_empty());
        assert!(state.tank.tracked.is_empty());
        let pop = state.pops.last().unwrap();
        assert_eq!((pop.text.as_str(), pop.color), ("-100", TextColor::Red));
        assert!(state.events.contains(&GameEvent::ShellHit { shielded: false }));

        tick(&mut state, &idle(), DT, &atlas);
        assert_eq!(state.score.score(), -100);
    }

    #[test]
    fn test_shielded_hit_never_scores() {
        let (mut state, atlas) = started(7);
        state.invader.body.pos = IVec2::new(150, 200);
        state.invader.apply_power_up(PowerUpKind::PulseShield, &mut state.energy);
        state.spawn_shell(Shot { x: 160, y: 225, angle: 0.0 }, &atlas);

        tick(&mut state, &confirm(), DT, &atlas);

        assert!(state.invader.shield_on);
        assert!(state.energy.energy() < 100.0);
        assert_eq!(state.score.score(), 0);
        assert!(!state.score.been_hit);
        let pop = state.pops.last().unwrap();
        assert_eq!((pop.text.as_str(), pop.color), ("x", TextColor::Green));
        assert_eq!(state.shield.body.pos, IVec2::new(150 - 55, 205));
    }

    #[test]
    fn test_segment_snap_drops_shield_before_shell_lands() {
        let (mut state, atlas) = started(7);
        state.invader.body.pos = IVec2::new(150, 200);
        state.invader.apply_power_up(PowerUpKind::PulseShield, &mut state.energy);
        state.invader.shield_on = true;
        // one 16 ms drain step crosses the 80% mark
        state.energy.set_energy(80.05);
        state.spawn_shell(Shot { x: 160, y: 225, angle: 0.0 }, &atlas);

        tick(&mut state, &idle(), DT, &atlas);

        assert!(!state.invader.shield_on);
        assert_eq!(state.energy.energy(), 80.0);
        assert_eq!(state.score.score(), -100);
        assert!(state.score.been_hit);
        let pop = state.pops.last().unwrap();
        assert_eq!((pop.text.as_str(), pop.color), ("-100", TextColor::Red));
        assert!(state.events.contains(&GameEvent::ShellHit { shielded: false }));
    }

    #[test]
    fn test_edge_bounce_scores_drop() {
        let (mut state, atlas) = started(7);
        state.invader.body.pos = IVec2::new(1, 100);
        state.invader.velocity = -300;
        tick(&mut state, &idle(), DT, &atlas);

        assert_eq!(state.invader.body.pos.y, 115);
        assert_eq!(state.score.score(), 50);
        assert_eq!(state.pops.last().map(|p| p.text.as_str()), Some("+50"));
    }

    #[test]
    fn test_perfect_level_shows_timed_splash() {
        let (mut state, atlas) = started(7);
        land(&mut state, &atlas);
        assert!(state.was_perfect);
        // built before the level counter advances
        assert_eq!(state.score.level(), 1);
        assert_eq!(state.tank.special_delay(), 4950);

        let at = |ms| TickInput {
            wall_clock_ms: ms,
            ..Default::default()
        };
        tick(&mut state, &at(1000), DT, &atlas);
        tick(&mut state, &at(2500), DT, &atlas);
        assert!(state.perfect_splash.is_some());
        tick(&mut state, &at(3000), DT, &atlas);
        assert!(state.perfect_splash.is_none());
        assert_eq!(state.status, GameStatus::StartingLevel);

        tick(&mut state, &confirm(), DT, &atlas);
        assert_eq!(state.status, GameStatus::LevelInProgress);
        assert_eq!(state.score.level(), 2);
    }

    #[test]
    fn test_confirm_skips_perfect_splash() {
        let (mut state, atlas) = started(7);
        land(&mut state, &atlas);

        tick(&mut state, &confirm(), DT, &atlas);
        assert!(state.perfect_splash.is_none());
        assert_eq!(state.status, GameStatus::StartingLevel);

        // still held: not a new confirm
        tick(&mut state, &confirm(), DT, &atlas);
        assert_eq!(state.status, GameStatus::StartingLevel);

        tick(&mut state, &idle(), DT, &atlas);
        tick(&mut state, &confirm(), DT, &atlas);
        assert_eq!(state.status, GameStatus::LevelInProgress);
    }

    #[test]
    fn test_hit_level_goes_straight_to_stats() {
        let (mut state, atlas) = started(7);
        state.score.been_hit = true;
        land(&mut state, &atlas);
        assert!(!state.was_perfect);
        assert!(state.perfect_splash.is_none());

        tick(&mut state, &confirm(), DT, &atlas);
        assert_eq!(state.status, GameStatus::LevelInProgress);
        assert!(!state.score.been_hit);
        assert_eq!(state.score.level_score, 0);
    }

    #[test]
    fn test_entities_frozen_between_levels() {
        let (mut state, atlas) = started(7);
        land(&mut state, &atlas);
        state.invader.velocity = 300;
        let before = (state.invader.body.pos, state.tank.body.pos);
        tick(&mut state, &idle(), 500, &atlas);
        assert_eq!(before, (state.invader.body.pos, state.tank.body.pos));
    }

    #[test]
    fn test_power_up_pickup_applies() {
        let (mut state, atlas) = started(7);
        state.invader.body.pos = IVec2::new(150, 200);
        state.spawn_power_up(&atlas);
        let hitbox = state.invader.hitbox();
        let p = &mut state.power_ups[0];
        p.body.pos = IVec2::new(hitbox.x, hitbox.y - 2);

        tick(&mut state, &idle(), DT, &atlas);

        assert!(state.power_ups.is_empty());
        assert!(state.invader.power_up.is_some());
        assert!(state.energy.visible);
        assert!(state.events.iter().any(|e| matches!(e, GameEvent::PowerUpCollected(_))));
    }

    #[test]
    fn test_dead_is_terminal() {
        let (mut state, atlas) = started(7);
        state.notify_death();
        state.invader.velocity = 300;
        let x = state.invader.body.pos.x;
        for _ in 0..10 {
            tick(&mut state, &confirm(), DT, &atlas);
            tick(&mut state, &idle(), DT, &atlas);
        }
        assert_eq!(state.status, GameStatus::Dead);
        assert_eq!(state.invader.body.pos.x, x);
    }

    #[test]
    fn test_missing_visual_is_reported_and_tick_continues() {
        let mut atlas = Atlas::with_defaults();
        atlas.remove(visuals::ALIEN_LEFT);
        let (mut state, _) = started(7);
        state.drain_events();
        let held_left = TickInput {
            move_left: true,
            ..Default::default()
        };
        tick(&mut state, &held_left, DT, &atlas);
        tick(&mut state, &held_left, DT, &atlas);
        tick(&mut state, &held_left, DT, &atlas);

        let missing: Vec<_> = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::AssetMissing(_)))
            .collect();
        assert_eq!(missing, vec![GameEvent::AssetMissing(visuals::ALIEN_LEFT.to_string())]);
        // size kept from the last resolved visual
        assert_eq!(state.invader.body.width(), 32);
    }

    #[test]
    fn test_new_size_applies_in_the_same_tick() {
        let mut atlas = Atlas::with_defaults();
        atlas.insert(visuals::ALIEN_LEFT, crate::assets::Size::new(40, 24));
        let (mut state, _) = started(7);
        let held_left = TickInput {
            move_left: true,
            ..Default::default()
        };
        tick(&mut state, &held_left, DT, &atlas);
        assert_eq!(state.invader.body.sprite.visual, visuals::ALIEN_LEFT);
        assert_eq!(state.invader.body.width(), 40);
    }

    #[test]
    fn test_unbounded_delta_with_live_power_up() {
        let (mut state, atlas) = started(7);
        state.spawn_power_up(&atlas);
        state.spawn_shell(Shot { x: 40, y: 450, angle: 0.3 }, &atlas);
        tick(&mut state, &idle(), u64::MAX, &atlas);
        // the pickup fell past the bottom and the shell left the top
        assert!(state.power_ups.is_empty());
        assert!(state.shells.is_empty());

        tick(&mut state, &idle(), u64::MAX, &atlas);
        let rail = 384 - state.tank.body.width();
        assert!((0..=rail).contains(&state.tank.body.pos.x));
        assert_eq!(state.clock_ms, u64::MAX);
    }

    #[test]
    fn test_huge_delta_keeps_state_sane() {
        let (mut state, atlas) = started(7);
        for _ in 0..5 {
            tick(&mut state, &idle(), 10_000_000, &atlas);
        }
        let rail = 384 - state.tank.body.width();
        assert!((0..=rail).contains(&state.tank.body.pos.x));
        assert!(state.energy.energy() >= 0.0);
    }

    #[test]
    fn test_same_seed_same_game() {
        let script = |i: u32| TickInput {
            move_left: (i / 90) % 2 == 0,
            move_right: (i / 90) % 2 == 1,
            activate: i % 400 == 0,
            wall_clock_ms: u64::from(i) * DT,
        };
        let atlas = Atlas::with_defaults();
        let mut a = GameState::new(99);
        let mut b = GameState::new(99);
        for i in 0..3000 {
            tick(&mut a, &script(i), DT, &atlas);
            tick(&mut b, &script(i), DT, &atlas);
        }
        assert_eq!(a.score.score(), b.score.score());
        assert_eq!(a.status, b.status);
        assert_eq!(a.tank.body.pos, b.tank.body.pos);
        assert_eq!(a.invader.body.pos, b.invader.body.pos);
        assert_eq!(a.shells.len(), b.shells.len());
        assert_eq!(a.events, b.events);
    }
}
