use color_eyre::eyre::eyre;
use env_logger::Env;
use log::{debug, info};
use matchday_core::league::{Fixture, Matchday, SeasonStore, SeasonTable};
use matchday_core::r#match::{
    ClockMode, FrameView, MatchController, MatchResult, MatchSession, PlayerRef, Position,
    RenderSurface, TeamRef,
};
use matchday_core::MatchConfig;
use std::env;
use std::sync::{Arc, RwLock};
use tokio::sync::oneshot;

const DEFAULT_SPEED: u32 = 4;
const TOP_SCORERS: usize = 3;

/// Visual-mode surface that writes frames to the log instead of a screen.
#[derive(Default)]
struct LogSurface {
    sub_steps: u64,
    last_minute: u8,
}

impl RenderSurface for LogSurface {
    fn update(&mut self, _view: &FrameView) {
        self.sub_steps += 1;
    }

    fn draw(&mut self, view: &FrameView) {
        for event in &view.new_events {
            info!("{}' {:?} ({})", event.minute, event.kind(), event.side);
        }

        if view.minute != self.last_minute {
            self.last_minute = view.minute;
            debug!("frame: {}' {} after {} sub-steps", view.minute, view.score, self.sub_steps);
        }
    }
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let mode = env::var("MODE").unwrap_or_else(|_| String::from("SIMULATED"));

    let mut config = MatchConfig::default();
    if let Some(seed) = env_number::<u64>("MATCH_SEED") {
        config = config.with_seed(seed);
    }
    if let Some(delay) = env_number::<u64>("MATCH_BATCH_DELAY_MS") {
        config = config.with_batch_delay(delay);
    }
    let speed = env_number::<u32>("MATCH_SPEED").unwrap_or(DEFAULT_SPEED);

    let teams = demo_teams();

    match mode.as_str() {
        "MATCHDAY" => play_matchday(teams, config).await,
        "VISUAL" => play_single(teams, config, ClockMode::Visual, speed).await,
        "SIMULATED" => play_single(teams, config, ClockMode::Simulated, speed).await,
        other => Err(eyre!("unknown MODE {}, expected SIMULATED, VISUAL or MATCHDAY", other)),
    }
}

async fn play_single(
    teams: Vec<TeamRef>,
    config: MatchConfig,
    mode: ClockMode,
    speed: u32,
) -> color_eyre::Result<()> {
    let table = Arc::new(RwLock::new(SeasonTable::new(&teams)));
    let store: Arc<RwLock<dyn SeasonStore>> = table.clone();

    let mut teams = teams.into_iter();
    let (Some(home), Some(away)) = (teams.next(), teams.next()) else {
        return Err(eyre!("two teams are needed for a match"));
    };

    let kick_off = chrono::Local::now().naive_local();
    let session = MatchSession::new(Arc::new(home), Arc::new(away), config).with_kick_off(kick_off);

    let mut controller = MatchController::from_session(session).with_store(store);
    if mode == ClockMode::Visual {
        controller = controller.with_render_surface(Box::new(LogSurface::default()));
    }

    let (sender, receiver) = oneshot::channel::<MatchResult>();
    controller.on_complete(move |result| {
        let _ = sender.send(result.clone());
    });

    controller.start(mode, speed, |event, minute, score| {
        debug!("{}' {:?} by {} ({})", minute, event.kind(), event.player_id, score);
        Ok(())
    })?;

    receiver.await?;

    let completed = controller.stop();
    completed.recording?;

    let result = completed.result;
    if let Some(star) = result.player_of_the_match() {
        info!("player of the match: {} ({:.1})", star.player_id, star.rating);
    }

    print_standings(&*table.read().map_err(|e| eyre!("{}", e))?);
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}

async fn play_matchday(teams: Vec<TeamRef>, config: MatchConfig) -> color_eyre::Result<()> {
    let (results, table) = tokio::task::spawn_blocking(move || {
        let mut table = SeasonTable::new(&teams);

        let shared: Vec<Arc<TeamRef>> = teams.into_iter().map(Arc::new).collect();
        let fixtures: Vec<Fixture> = shared
            .chunks(2)
            .filter(|pair| pair.len() == 2)
            .map(|pair| Fixture::new(Arc::clone(&pair[0]), Arc::clone(&pair[1])))
            .collect();

        Matchday::play_and_record(&fixtures, &config, &mut table).map(|results| (results, table))
    })
    .await??;

    for result in &results {
        info!(
            "{} {} {}",
            result.home_team_id,
            result.score(),
            result.away_team_id
        );
    }

    print_standings(&table);
    println!("{}", serde_json::to_string_pretty(&results)?);

    Ok(())
}

fn print_standings(table: &SeasonTable) {
    for (position, record) in table.standings().iter().enumerate() {
        info!(
            "{:>2}. {:<12} P{} W{} D{} L{} {:>+3} {:>3} pts  {}",
            position + 1,
            record.name,
            record.played,
            record.won,
            record.drawn,
            record.lost,
            record.goal_difference(),
            record.points,
            record.form()
        );
    }

    for (player_id, stats) in table.top_scorers(TOP_SCORERS) {
        info!(
            "top scorer {}: {} goals in {} minutes ({:.2} per 90)",
            player_id,
            stats.goals,
            stats.minutes,
            stats.goals_per_90()
        );
    }
}

fn env_number<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|value| value.parse().ok())
}

fn demo_teams() -> Vec<TeamRef> {
    const NAMES: [&str; 4] = ["Northbridge", "Harbour City", "Eastvale", "Redmoor"];
    const SHAPE: [(Position, usize); 4] = [
        (Position::Goalkeeper, 2),
        (Position::Defender, 6),
        (Position::Midfielder, 6),
        (Position::Forward, 4),
    ];

    NAMES
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let team_id = index as u32 + 1;
            let base_rating = 62 + (index as u8 * 4) % 12;

            // Starters first: one keeper, four defenders, four midfielders, two forwards.
            let mut starters = Vec::new();
            let mut bench = Vec::new();
            let mut next_id = team_id * 100;

            for (position, count) in SHAPE {
                let starting = match position {
                    Position::Goalkeeper => 1,
                    Position::Defender | Position::Midfielder => 4,
                    Position::Forward => 2,
                };

                for slot in 0..count {
                    next_id += 1;
                    let rating = base_rating + (slot as u8 * 3) % 7;
                    let label = format!("{} #{}", name, next_id % 100);
                    let player = PlayerRef::new(next_id, &label, position, rating)
                        .with_aggression(6.0 + (next_id % 13) as f32);

                    if slot < starting {
                        starters.push(player);
                    } else {
                        bench.push(player);
                    }
                }
            }

            starters.extend(bench);
            TeamRef::new(team_id, name, starters)
        })
        .collect()
}
