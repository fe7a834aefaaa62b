//! Terminal Table Binary
//!
//! Plays one game of triples with the console as the screen.
//! Human players type `<player> <position>` to toggle a token; `q` ends the game.
//!
//! Options: --config <json>, plus one flag per configuration field.
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tri_cards::Triples;
use tri_core::*;
use tri_gameroom::*;

#[derive(Parser, Debug)]
#[command(author, version, about = "Play a game of triples in the terminal", long_about = None)]
struct Args {
    #[arg(long, help = "JSON configuration file; flags below override it")]
    config: Option<PathBuf>,
    #[arg(long)]
    humans: Option<usize>,
    #[arg(long)]
    computers: Option<usize>,
    #[arg(long)]
    table_size: Option<usize>,
    #[arg(long)]
    feature_size: Option<usize>,
    #[arg(long)]
    feature_count: Option<usize>,
    #[arg(long)]
    deck_size: Option<usize>,
    #[arg(long)]
    round_ms: Option<Millis>,
    #[arg(long)]
    warning_ms: Option<Millis>,
    #[arg(long)]
    reward_ms: Option<Millis>,
    #[arg(long)]
    penalty_ms: Option<Millis>,
    #[arg(long)]
    deal_ms: Option<Millis>,
    #[arg(long)]
    tick_ms: Option<Millis>,
    #[arg(long)]
    pace_ms: Option<Millis>,
    #[arg(long, help = "Log every matching triple after each deal")]
    hints: bool,
}

impl Args {
    fn config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        config.humans = self.humans.unwrap_or(config.humans);
        config.computers = self.computers.unwrap_or(config.computers);
        config.table_size = self.table_size.unwrap_or(config.table_size);
        config.feature_size = self.feature_size.unwrap_or(config.feature_size);
        config.feature_count = self.feature_count.unwrap_or(config.feature_count);
        config.deck_size = self.deck_size.unwrap_or(config.deck_size);
        config.round_ms = self.round_ms.unwrap_or(config.round_ms);
        config.warning_ms = self.warning_ms.unwrap_or(config.warning_ms);
        config.reward_ms = self.reward_ms.unwrap_or(config.reward_ms);
        config.penalty_ms = self.penalty_ms.unwrap_or(config.penalty_ms);
        config.deal_ms = self.deal_ms.unwrap_or(config.deal_ms);
        config.tick_ms = self.tick_ms.unwrap_or(config.tick_ms);
        config.pace_ms = self.pace_ms.unwrap_or(config.pace_ms);
        config.hints |= self.hints;
        config.validate()?;
        Ok(config)
    }
}

/// Reads `<player> <position>` lines for human players until `q` or EOF.
fn keyboard(dealer: Arc<Dealer>) {
    let lines = std::io::stdin().lines();
    for line in lines.map_while(Result::ok) {
        if dealer.is_terminated() {
            break;
        }
        let words = line.split_whitespace().collect::<Vec<_>>();
        match words.as_slice() {
            [] => continue,
            ["q"] | ["Q"] => {
                log::warn!("[table] quit requested, ending game");
                dealer.terminate();
                break;
            }
            [seat, position] => match (seat.parse::<Seat>(), position.parse::<Position>()) {
                (Ok(seat), Ok(position)) => match dealer.player(seat) {
                    Some(player) if player.is_human() => {
                        log::debug!("[table] P{} {:?}", seat, player.toggle(position));
                    }
                    Some(_) => log::warn!("[table] P{} is a computer", seat),
                    None => log::warn!("[table] no player {}", seat),
                },
                _ => log::warn!("[table] expected <player> <position>"),
            },
            _ => log::warn!("[table] expected <player> <position> or q"),
        }
    }
}

fn main() -> anyhow::Result<()> {
    tri_core::log()?;
    let config = Args::parse().config()?;
    log::info!("[table] {:?}", config);
    let oracle = Arc::new(Triples::from(&config));
    let room = Room::new(config, Arc::new(Console), oracle)?;
    let game = room.start()?;
    let dealer = game.dealer().clone();
    std::thread::Builder::new()
        .name("keyboard".to_string())
        .spawn(move || keyboard(dealer))
        .context("spawn keyboard thread")?;
    let winners = game.wait()?;
    println!("winners: {:?}", winners);
    Ok(())
}
