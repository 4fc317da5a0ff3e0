//! Skill and style profile derived from a player's games.

use serde::{Deserialize, Serialize};

use crate::game_data::{GameHeaders, GameResult};

/// Rating assumed when a game carries no usable rating, and the average used
/// when there are no games at all.
pub const DEFAULT_RATING: u32 = 1200;

/// Offset added to the rounded average rating to get the engine strength.
const STRENGTH_BONUS: i64 = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub username: String,
    pub estimated_elo: i64,
    pub average_rating: i64,
    pub games_played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub estimated_contempt_score: f64,
}

/// Running totals collected while scanning games.
#[derive(Debug, Default)]
pub struct ProfileAccumulator {
    rating_sum: i64,
    games: u32,
    wins: u32,
    draws: u32,
    losses: u32,
}

impl ProfileAccumulator {
    /// Count one game played by the target player as `is_white`.
    pub fn record(&mut self, headers: &GameHeaders, is_white: bool) {
        let rating = if is_white {
            headers.white_elo
        } else {
            headers.black_elo
        };
        self.rating_sum += i64::from(rating.unwrap_or(DEFAULT_RATING));
        self.games += 1;

        match (headers.result, is_white) {
            (GameResult::WhiteWins, true) | (GameResult::BlackWins, false) => self.wins += 1,
            (GameResult::WhiteWins, false) | (GameResult::BlackWins, true) => self.losses += 1,
            (GameResult::Draw, _) => self.draws += 1,
            (GameResult::Unknown, _) => {}
        }
    }

    pub fn finish(self, username: &str) -> Profile {
        let average_rating = if self.games > 0 {
            self.rating_sum / i64::from(self.games)
        } else {
            i64::from(DEFAULT_RATING)
        };

        let contempt = if self.games > 0 {
            let diff = f64::from(self.wins) - f64::from(self.losses);
            round2(diff / f64::from(self.games) * 100.0)
        } else {
            0.0
        };

        Profile {
            username: username.to_string(),
            estimated_elo: strength_estimate(average_rating),
            average_rating,
            games_played: self.games,
            wins: self.wins,
            draws: self.draws,
            losses: self.losses,
            estimated_contempt_score: contempt,
        }
    }
}

/// Average rating rounded half-up to the nearest hundred, plus 200.
pub fn strength_estimate(average_rating: i64) -> i64 {
    (average_rating + 50).div_euclid(100) * 100 + STRENGTH_BONUS
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
