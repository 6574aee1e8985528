use axum::{body::Bytes, extract::State, Json};
use tracing::instrument;

use crate::api_error;
use crate::error::Result;
use crate::gossip::GossipStatsReport;
use crate::node::Node;
use crate::store::{MergeReport, Snapshot};

/// Decode a peer's full-state payload
pub fn decode_payload(body: &[u8]) -> Result<Snapshot> {
    let payload: Snapshot = serde_json::from_slice(body)
        .map_err(|e| api_error!("invalid request body: {}", e))?;
    if payload.keys().any(|id| id.is_empty()) {
        return Err(api_error!("invalid request body: empty player id"));
    }
    Ok(payload)
}

#[instrument(skip(node, body), level = "debug")]
pub async fn receive(State(node): State<Node>, body: Bytes) -> Result<Json<MergeReport>> {
    let payload = decode_payload(&body)?;
    Ok(Json(node.receive_gossip(payload)))
}

pub async fn stats(State(node): State<Node>) -> Json<GossipStatsReport> {
    Json(node.gossip_stats())
}
