use anyhow::{Context, Result, anyhow, bail};

use pl_predictor::api::{Reply, TeamId, TeamSelection};
use pl_predictor::config::{ClientConfig, PredictionFlow, flow_label};
use pl_predictor::dispatch;
use pl_predictor::render;
use pl_predictor::teams::{premier_league_teams, team_name};
use pl_predictor::transport::HttpTransport;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let ids = args
        .iter()
        .filter(|arg| !arg.starts_with("--"))
        .map(|arg| parse_team_id(arg))
        .collect::<Result<Vec<_>>>()?;
    let &[home, away] = ids.as_slice() else {
        bail!("usage: predict <home_id> <away_id> [--split] [--stats]");
    };

    let mut cfg = ClientConfig::from_env();
    if args.iter().any(|arg| arg == "--split") {
        cfg.flow = PredictionFlow::Split;
    }
    let with_stats = args.iter().any(|arg| arg == "--stats");

    let transport = HttpTransport::new(&cfg)?;
    let selection = TeamSelection::new(home, away);
    let teams = premier_league_teams();
    eprintln!(
        "[INFO] {} flow against {}: {} vs {}",
        flow_label(cfg.flow),
        cfg.base_url,
        team_name(&teams, home).unwrap_or("?"),
        team_name(&teams, away).unwrap_or("?")
    );

    if cfg.flow == PredictionFlow::Combined && selection.is_same_team() {
        bail!("Please select different teams for home and away");
    }

    let view = match cfg.flow {
        PredictionFlow::Combined => match dispatch::predict_combined(&transport, &selection)? {
            Reply::Data(prediction) => render::prediction_view(&prediction),
            Reply::Rejected(msg) => return Err(anyhow!(msg)),
        },
        PredictionFlow::Split => match dispatch::predict_split(&transport, &selection)? {
            Reply::Data(prediction) => render::split_prediction_view(&prediction),
            Reply::Rejected(msg) => return Err(anyhow!(msg)),
        },
    };
    for line in render::prediction_lines(&view) {
        println!("{line}");
    }

    if with_stats {
        for team in [home, away] {
            println!();
            match dispatch::fetch_team_stats(&transport, team) {
                Ok(Reply::Data(stats)) => {
                    for line in render::stats_lines(&render::stats_view(&stats)) {
                        println!("{line}");
                    }
                }
                Ok(Reply::Rejected(msg)) => eprintln!("[WARN] Team stats error: {msg}"),
                Err(err) => eprintln!("[WARN] Team stats fetch failed: {err:#}"),
            }
        }
    }

    Ok(())
}

fn parse_team_id(raw: &str) -> Result<TeamId> {
    raw.trim()
        .parse::<u32>()
        .map(TeamId)
        .with_context(|| format!("invalid team id: {raw}"))
}
