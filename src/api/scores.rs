use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tracing::instrument;

use crate::api_error;
use crate::error::Result;
use crate::node::{Node, UpdateResponse};

#[derive(Debug, Deserialize)]
pub struct UpdateParams {
    #[serde(rename = "playerId")]
    pub player_id: Option<String>,
    pub score: Option<String>,
}

impl UpdateParams {
    /// Reject anything the store should never see
    fn validate(self) -> Result<(String, i64)> {
        let player_id = self.player_id.unwrap_or_default();
        let score = self.score.unwrap_or_default();
        if player_id.is_empty() || score.is_empty() {
            return Err(api_error!("missing playerId or score"));
        }
        let score = score
            .trim()
            .parse::<i64>()
            .map_err(|_| api_error!("invalid playerId or score"))?;
        Ok((player_id, score))
    }
}

#[instrument(skip(node), level = "debug")]
pub async fn update(
    State(node): State<Node>,
    params: std::result::Result<Query<UpdateParams>, QueryRejection>,
) -> Result<Json<UpdateResponse>> {
    let Query(params) = params.map_err(|e| api_error!("invalid playerId or score: {}", e))?;
    let (player_id, score) = params.validate()?;
    Ok(Json(node.update_score(player_id, score)))
}

#[instrument(skip(node), level = "debug")]
pub async fn state(State(node): State<Node>) -> impl IntoResponse {
    (
        [(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")],
        Json(node.state()),
    )
}
