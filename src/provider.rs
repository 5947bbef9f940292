use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use crate::api::Reply;
use crate::config::PredictionFlow;
use crate::dispatch;
use crate::state::{Delta, ProviderCommand};
use crate::transport::Transport;

/// Runs the blocking HTTP work off the UI thread. Commands are handled one at
/// a time in arrival order; the thread exits once the command sender is dropped.
pub fn spawn_provider<T>(transport: T, tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>)
where
    T: Transport + Send + 'static,
{
    thread::spawn(move || {
        for cmd in cmd_rx {
            for delta in handle_command(&transport, cmd) {
                if tx.send(delta).is_err() {
                    return;
                }
            }
        }
    });
}

pub fn handle_command(transport: &dyn Transport, cmd: ProviderCommand) -> Vec<Delta> {
    match cmd {
        ProviderCommand::Predict { selection, flow } => {
            let label = format!("{} vs {}", selection.home, selection.away);
            let result = match flow {
                PredictionFlow::Combined => {
                    dispatch::predict_combined(transport, &selection).map(|reply| match reply {
                        Reply::Data(prediction) => Reply::Data(Delta::SetPrediction(prediction)),
                        Reply::Rejected(msg) => Reply::Rejected(msg),
                    })
                }
                PredictionFlow::Split => {
                    dispatch::predict_split(transport, &selection).map(|reply| match reply {
                        Reply::Data(prediction) => {
                            Reply::Data(Delta::SetSplitPrediction(prediction))
                        }
                        Reply::Rejected(msg) => Reply::Rejected(msg),
                    })
                }
            };
            match result {
                Ok(Reply::Data(delta)) => vec![
                    Delta::Log(format!("[INFO] Prediction ready: {label}")),
                    delta,
                ],
                Ok(Reply::Rejected(msg)) => vec![
                    Delta::Log(format!("[WARN] Prediction rejected: {msg}")),
                    Delta::PredictionRejected(msg),
                ],
                Err(err) => vec![
                    Delta::Log(format!("[ERROR] Prediction error: {err:#}")),
                    Delta::PredictionFailed,
                ],
            }
        }
        ProviderCommand::FetchTeamStats { side, team } => {
            match dispatch::fetch_team_stats(transport, team) {
                Ok(Reply::Data(stats)) => vec![Delta::SetTeamStats { side, team, stats }],
                Ok(Reply::Rejected(msg)) => {
                    vec![Delta::Log(format!("[WARN] Team stats error: {msg}"))]
                }
                Err(err) => vec![Delta::Log(format!("[WARN] Team stats fetch failed: {err:#}"))],
            }
        }
    }
}
