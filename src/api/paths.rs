//! All Paths are recorded here for use throughout this codebase
pub mod base {
    pub const ROOT: &str = "/";
    pub const HEALTH: &str = "/health";
    pub const ABOUT: &str = "/about";
}

pub mod gossip {
    pub const RECEIVE: &str = "/gossip";
    pub const STATS: &str = "/gossip/stats";
}

pub mod scores {
    pub const UPDATE: &str = "/update";
    pub const STATE: &str = "/state";
}

pub fn update_path(player_id: &str, score: i64) -> String {
    format!("{}?playerId={}&score={}", scores::UPDATE, player_id, score)
}
