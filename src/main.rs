//! Headless autoplay runner (default binary).
//!
//! Plays complete sessions with the move evaluator choosing every drop
//! and reports results to stdout. The best score and every finished game
//! persist through the JSON stores from the adapter crate.
//!
//! Usage: `mergedrop [seed] [games] [max-drops]`

use anyhow::{Context, Result};

use mergedrop::adapter::{HighScoreFile, JsonScoreBoard};
use mergedrop::core::GameSession;
use mergedrop::engine::best_column;

const HIGH_SCORE_PATH: &str = "mergedrop-highscore.json";
const LEADERBOARD_PATH: &str = "mergedrop-leaderboard.json";

/// Drop budget per game so a well-played session cannot run unbounded.
const DEFAULT_MAX_DROPS: u32 = 10_000;

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);

    let seed: u32 = match args.next() {
        Some(raw) => raw.parse().context("seed must be an unsigned integer")?,
        None => 1,
    };
    let games: u32 = match args.next() {
        Some(raw) => raw.parse().context("games must be an unsigned integer")?,
        None => 1,
    };
    let max_drops: u32 = match args.next() {
        Some(raw) => raw.parse().context("max-drops must be an unsigned integer")?,
        None => DEFAULT_MAX_DROPS,
    };

    let mut session = GameSession::new(seed);
    session.set_ai_enabled(true);
    session.set_player_name("autoplay");
    session.set_high_score_store(Box::new(HighScoreFile::new(HIGH_SCORE_PATH)));
    session.set_score_board(Box::new(JsonScoreBoard::new(LEADERBOARD_PATH)));

    for game in 1..=games {
        let drops = play_one(&mut session, max_drops);
        println!(
            "game {:>4}: score {:>8}  drops {:>6}  over {}",
            game,
            session.score(),
            drops,
            session.is_over()
        );
        if game < games {
            session.restart();
        }
    }

    println!("best score: {}", session.high_score());
    Ok(())
}

/// Drive one session to its terminal state (or the drop budget).
/// Returns the number of accepted drops.
fn play_one<R: mergedrop::core::RandomSource>(session: &mut GameSession<R>, max_drops: u32) -> u32 {
    let mut drops = 0;

    while drops < max_drops && !session.is_over() {
        let preview = session.preview();
        let Some(column) = best_column(session.board(), preview.current, preview.next) else {
            break;
        };
        match session.drop_column(column) {
            Ok(_) => drops += 1,
            Err(_) => break,
        }
    }

    drops
}
