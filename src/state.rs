use std::collections::VecDeque;

use crate::api::{MatchPrediction, SplitPrediction, TeamId, TeamSelection, TeamStats};
use crate::config::PredictionFlow;
use crate::render::{self, ChartView, PredictionView, StatsView};
use crate::teams::{self, Team};

const LOG_CAPACITY: usize = 200;

pub const ALERT_SAME_TEAMS: &str = "Please select different teams for home and away";
pub const ALERT_MISSING_TEAMS: &str = "Please select both a home and an away team";
pub const ALERT_PREDICTION_FAILED: &str = "An error occurred while making the prediction";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }
}

pub fn side_label(side: Side) -> &'static str {
    match side {
        Side::Home => "Home",
        Side::Away => "Away",
    }
}

#[derive(Debug, Clone)]
pub enum ProviderCommand {
    Predict {
        selection: TeamSelection,
        flow: PredictionFlow,
    },
    FetchTeamStats {
        side: Side,
        team: TeamId,
    },
}

#[derive(Debug, Clone)]
pub enum Delta {
    SetPrediction(MatchPrediction),
    SetSplitPrediction(SplitPrediction),
    PredictionRejected(String),
    PredictionFailed,
    SetTeamStats {
        side: Side,
        team: TeamId,
        stats: TeamStats,
    },
    Log(String),
}

#[derive(Debug, Clone, Default)]
pub struct SideState {
    pub team: Option<TeamId>,
    pub stats: Option<StatsView>,
    pub chart: Option<ChartView>,
}

pub struct AppState {
    pub teams: Vec<Team>,
    pub home: SideState,
    pub away: SideState,
    pub focus: Side,
    pub flow: PredictionFlow,
    pub prediction: Option<PredictionView>,
    pub alert: Option<String>,
    pub pending_predictions: usize,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(PredictionFlow::Combined)
    }
}

impl AppState {
    pub fn new(flow: PredictionFlow) -> Self {
        Self {
            teams: teams::premier_league_teams(),
            home: SideState::default(),
            away: SideState::default(),
            focus: Side::Home,
            flow,
            prediction: None,
            alert: None,
            pending_predictions: 0,
            logs: VecDeque::with_capacity(LOG_CAPACITY),
            help_overlay: false,
        }
    }

    pub fn side(&self, side: Side) -> &SideState {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }

    pub fn side_mut(&mut self, side: Side) -> &mut SideState {
        match side {
            Side::Home => &mut self.home,
            Side::Away => &mut self.away,
        }
    }

    pub fn team_name(&self, id: TeamId) -> Option<&str> {
        teams::team_name(&self.teams, id)
    }

    pub fn push_log(&mut self, line: impl Into<String>) {
        if self.logs.len() >= LOG_CAPACITY {
            self.logs.pop_front();
        }
        self.logs.push_back(line.into());
    }

    pub fn toggle_focus(&mut self) {
        self.focus = self.focus.other();
    }

    pub fn toggle_flow(&mut self) {
        self.flow = self.flow.toggled();
    }

    /// Chart for the focused side, or the other side's when the focused one has none.
    pub fn visible_chart(&self) -> Option<&ChartView> {
        self.side(self.focus)
            .chart
            .as_ref()
            .or_else(|| self.side(self.focus.other()).chart.as_ref())
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    /// Moves the focused selector `step` places through the catalogue. Position
    /// zero is "no team", so stepping above the first team clears the selector.
    pub fn step_selection(&mut self, step: isize) -> Option<ProviderCommand> {
        let side = self.focus;
        let slots = self.teams.len() as isize + 1;
        let current = self
            .side(side)
            .team
            .and_then(|id| self.teams.iter().position(|t| t.id == id))
            .map(|idx| idx as isize + 1)
            .unwrap_or(0);
        let next = (current + step).rem_euclid(slots);
        let team = if next == 0 {
            None
        } else {
            self.teams.get((next - 1) as usize).map(|t| t.id)
        };
        self.select(side, team)
    }

    pub fn clear_selection(&mut self) -> Option<ProviderCommand> {
        self.select(self.focus, None)
    }

    /// Selector change handler: a present value asks for that team's stats, a
    /// cleared one hides the side's stats without any request.
    pub fn select(&mut self, side: Side, team: Option<TeamId>) -> Option<ProviderCommand> {
        let slot = self.side_mut(side);
        slot.team = team;
        match team {
            Some(team) => Some(ProviderCommand::FetchTeamStats { side, team }),
            None => {
                slot.stats = None;
                slot.chart = None;
                None
            }
        }
    }

    pub fn submit(&mut self) -> Option<ProviderCommand> {
        let (Some(home), Some(away)) = (self.home.team, self.away.team) else {
            self.alert = Some(ALERT_MISSING_TEAMS.to_string());
            return None;
        };
        let selection = TeamSelection::new(home, away);
        if self.flow == PredictionFlow::Combined && selection.is_same_team() {
            self.alert = Some(ALERT_SAME_TEAMS.to_string());
            return None;
        }
        Some(ProviderCommand::Predict {
            selection,
            flow: self.flow,
        })
    }
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::SetPrediction(prediction) => {
            state.pending_predictions = state.pending_predictions.saturating_sub(1);
            state.prediction = Some(render::prediction_view(&prediction));
        }
        Delta::SetSplitPrediction(prediction) => {
            state.pending_predictions = state.pending_predictions.saturating_sub(1);
            state.prediction = Some(render::split_prediction_view(&prediction));
        }
        Delta::PredictionRejected(message) => {
            state.pending_predictions = state.pending_predictions.saturating_sub(1);
            state.alert = Some(message);
        }
        Delta::PredictionFailed => {
            state.pending_predictions = state.pending_predictions.saturating_sub(1);
            state.alert = Some(ALERT_PREDICTION_FAILED.to_string());
        }
        Delta::SetTeamStats { side, team, stats } => {
            if state.side(side).team != Some(team) {
                state.push_log(format!(
                    "[INFO] Dropped stale {} stats for team {team}",
                    side_label(side).to_lowercase()
                ));
                return;
            }
            let slot = state.side_mut(side);
            slot.stats = Some(render::stats_view(&stats));
            slot.chart = Some(render::chart_view(&stats));
        }
        Delta::Log(line) => state.push_log(line),
    }
}
