//! Roster from an in-progress game via the local live client API.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::{error::RefreshError, models::ChampionRoster, source::HttpClient};

/// Client for the game's local `allgamedata` endpoint.
#[derive(Debug, Clone)]
pub struct LiveClient {
    http: HttpClient,
    url: String,
}

impl LiveClient {
    /// Build a client for `url`; the HTTP client must accept the local
    /// self-signed certificate (see [`HttpClient::insecure_local`]).
    pub fn new(http: HttpClient, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    /// Fetch the current snapshot and split its players by team.
    pub async fn fetch_roster(&self) -> Result<ChampionRoster> {
        let snapshot: LiveSnapshot = self
            .http
            .get_json(&self.url)
            .await
            .map_err(|err| RefreshError::RosterUnavailable(format!("{err:#}")))
            .context("live game snapshot unavailable")?;
        Ok(roster_from_snapshot(&snapshot))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LiveSnapshot {
    #[serde(default)]
    all_players: Vec<LivePlayer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LivePlayer {
    #[serde(default)]
    champion_name: Option<String>,
    #[serde(default)]
    team: Option<String>,
}

/// `ORDER` is the blue side; every other team label counts as red.
pub(crate) fn roster_from_snapshot(snapshot: &LiveSnapshot) -> ChampionRoster {
    let mut roster = ChampionRoster::default();
    for player in &snapshot.all_players {
        let Some(champion) = player.champion_name.clone() else {
            continue;
        };
        if player.team.as_deref() == Some("ORDER") {
            roster.blue.push(champion);
        } else {
            roster.red.push(champion);
        }
    }
    roster
}
