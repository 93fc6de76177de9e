//! Frame assembly from game state

use glam::IVec2;

use super::command::{DrawCommand, Drawable};
use crate::assets::visuals;
use crate::sim::score::ScoreText;
use crate::sim::{
    Decor, EnergyBar, EntityKind, GameState, GameStatus, Invader, Pop, PowerUp, Shell, Shield, Tank,
    TextColor,
};

/// Left column and rows of the between-levels statistics
const STATS_X: i32 = 50;
const STATS_ROWS: [i32; 5] = [100, 150, 200, 270, 320];

impl Drawable for Decor {
    fn draw(&self, _now_ms: u64, out: &mut Vec<DrawCommand>) {
        out.push(DrawCommand::sprite(EntityKind::Decor, self.body.sprite.visual, self.body.pos));
    }
}

impl Drawable for Tank {
    fn draw(&self, _now_ms: u64, out: &mut Vec<DrawCommand>) {
        out.push(DrawCommand::sprite(EntityKind::Tank, self.body.sprite.visual, self.body.pos));
    }
}

impl Drawable for Invader {
    fn draw(&self, _now_ms: u64, out: &mut Vec<DrawCommand>) {
        out.push(DrawCommand::sprite(EntityKind::Invader, self.body.sprite.visual, self.body.pos));
    }
}

impl Drawable for Shell {
    fn draw(&self, _now_ms: u64, out: &mut Vec<DrawCommand>) {
        out.push(DrawCommand::Sprite {
            kind: EntityKind::Shell,
            visual: self.sprite.visual,
            pos: self.anchor().round().as_ivec2(),
            rotation: Some(self.angle),
        });
    }
}

impl Drawable for PowerUp {
    fn draw(&self, _now_ms: u64, out: &mut Vec<DrawCommand>) {
        out.push(DrawCommand::sprite(EntityKind::PowerUp, self.body.sprite.visual, self.body.pos));
    }
}

impl Drawable for Shield {
    fn draw(&self, _now_ms: u64, out: &mut Vec<DrawCommand>) {
        out.push(DrawCommand::sprite(EntityKind::Shield, self.body.sprite.visual, self.body.pos));
    }
}

impl Drawable for EnergyBar {
    /// Fill first, grid on top
    fn draw(&self, _now_ms: u64, out: &mut Vec<DrawCommand>) {
        if !self.visible {
            return;
        }
        out.push(DrawCommand::Bar {
            visual: self.fill.visual,
            pos: self.body.pos,
            fill: self.fill_fraction(),
        });
        out.push(DrawCommand::sprite(EntityKind::EnergyBar, self.body.sprite.visual, self.body.pos));
    }
}

impl Drawable for ScoreText {
    fn draw(&self, now_ms: u64, out: &mut Vec<DrawCommand>) {
        out.push(DrawCommand::text(self.value.to_string(), self.pos, self.color_at(now_ms)));
    }
}

impl Drawable for Pop {
    fn draw(&self, _now_ms: u64, out: &mut Vec<DrawCommand>) {
        out.push(DrawCommand::text(self.text.clone(), self.pos, self.color));
    }
}

/// Build the draw list for the current state
pub fn frame(state: &GameState) -> Vec<DrawCommand> {
    let now = state.clock_ms;
    let mut out = Vec::with_capacity(16 + state.shells.len() + state.pops.len());

    state.background.draw(now, &mut out);
    state.land.draw(now, &mut out);
    state.tank.draw(now, &mut out);
    for shell in &state.shells {
        shell.draw(now, &mut out);
    }
    for power_up in &state.power_ups {
        power_up.draw(now, &mut out);
    }
    state.invader.draw(now, &mut out);
    if state.invader.shield_on {
        state.shield.draw(now, &mut out);
    }
    state.energy.draw(now, &mut out);

    for pop in &state.pops {
        pop.draw(now, &mut out);
    }
    state.score.current.draw(now, &mut out);
    state.score.best.draw(now, &mut out);
    state.score.level.draw(now, &mut out);

    match state.status {
        GameStatus::NewGame => out.push(DrawCommand::Splash {
            visual: visuals::SPLASH_START,
        }),
        GameStatus::StartingLevel if state.perfect_splash.is_some() => out.push(DrawCommand::Splash {
            visual: visuals::SPLASH_PERFECT,
        }),
        GameStatus::StartingLevel => {
            out.push(DrawCommand::Splash {
                visual: visuals::SPLASH_NEXT_LEVEL,
            });
            let summary = state.score.last_summary;
            let lines = [
                summary.level_score.to_string(),
                format!("x{}", summary.multiplier),
                summary.bonus.to_string(),
                state.score.score().to_string(),
                state.score.best().to_string(),
            ];
            for (text, y) in lines.into_iter().zip(STATS_ROWS) {
                out.push(DrawCommand::text(text, IVec2::new(STATS_X, y), TextColor::White));
            }
        }
        _ => {}
    }

    out
}
