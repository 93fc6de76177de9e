//! Running score, best score and the level-completion bonus

use glam::IVec2;

use super::entity::TextColor;

/// One HUD number with a short colour flash after each change
#[derive(Debug, Clone)]
pub struct ScoreText {
    pub value: i64,
    pub pos: IVec2,
    color: TextColor,
    flash_until_ms: u64,
}

impl ScoreText {
    pub fn new(value: i64, x: i32, y: i32) -> Self {
        Self {
            value,
            pos: IVec2::new(x, y),
            color: TextColor::White,
            flash_until_ms: 0,
        }
    }

    pub fn flash(&mut self, color: TextColor, now_ms: u64, flash_ms: u64) {
        self.color = color;
        self.flash_until_ms = now_ms.saturating_add(flash_ms);
    }

    /// Colour to draw with at `now_ms`
    pub fn color_at(&self, now_ms: u64) -> TextColor {
        if now_ms > self.flash_until_ms {
            TextColor::White
        } else {
            self.color
        }
    }
}

/// Figures shown on the between-levels screen
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LevelSummary {
    pub level_score: i64,
    pub multiplier: f64,
    pub bonus: i64,
}

/// Round half up (2.5 -> 3, -50.5 -> -50)
fn round_half_up(x: f64) -> i64 {
    (x + 0.5).floor() as i64
}

#[derive(Debug, Clone)]
pub struct ScoreBoard {
    /// Points earned this level (may be negative)
    pub level_score: i64,
    pub current: ScoreText,
    pub best: ScoreText,
    pub level: ScoreText,
    /// Set on the first unshielded hit of the level
    pub been_hit: bool,
    pub last_summary: LevelSummary,
    flash_ms: u64,
}

impl ScoreBoard {
    pub fn new(flash_ms: u64) -> Self {
        Self {
            level_score: 0,
            current: ScoreText::new(0, 50, 30),
            best: ScoreText::new(0, 178, 30),
            level: ScoreText::new(1, 308, 30),
            been_hit: false,
            last_summary: LevelSummary::default(),
            flash_ms,
        }
    }

    /// Current level number (starts at 1)
    pub fn level(&self) -> u32 {
        self.level.value.clamp(0, i64::from(u32::MAX)) as u32
    }

    pub fn score(&self) -> i64 {
        self.current.value
    }

    pub fn best(&self) -> i64 {
        self.best.value
    }

    /// Gameplay score change with colour feedback
    pub fn mod_score(&mut self, delta: i64, now_ms: u64) {
        self.level_score += delta;
        self.add_to_current(delta, now_ms);
        if delta > 0 {
            self.current.flash(TextColor::Green, now_ms, self.flash_ms);
        } else if delta < 0 {
            self.current.flash(TextColor::Red, now_ms, self.flash_ms);
        }
    }

    fn add_to_current(&mut self, delta: i64, now_ms: u64) {
        self.current.value += delta;
        self.check_best(now_ms);
    }

    fn check_best(&mut self, now_ms: u64) {
        if self.current.value > self.best.value {
            self.best.value = self.current.value;
            self.best.flash(TextColor::Green, now_ms, self.flash_ms);
        }
    }

    /// Apply the end-of-level award; called once per landing
    pub fn complete_level(&mut self, now_ms: u64) -> LevelSummary {
        let level = self.level.value;
        let level_score = self.level_score;

        let carry = round_half_up(level_score as f64 * 0.5 * (level / 2) as f64);
        self.add_to_current(carry, now_ms);

        let multiplier = level as f64 / 100.0;
        let mut bonus = round_half_up(multiplier * level_score as f64);
        if !self.been_hit {
            bonus *= 2;
        }
        let bonus = bonus.max(0);
        self.add_to_current(bonus, now_ms);

        self.last_summary = LevelSummary {
            level_score,
            multiplier,
            bonus,
        };
        log::info!(
            "Level {} complete: level score {}, x{}, bonus {}, total {}",
            level,
            level_score,
            multiplier,
            bonus,
            self.current.value
        );
        self.last_summary
    }

    /// Reset per-level counters and advance the level number
    pub fn begin_next_level(&mut self) {
        self.level_score = 0;
        self.been_hit = false;
        self.level.value += 1;
    }
}
