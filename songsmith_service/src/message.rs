// JSON bodies returned by the song service.
//
// Success and composition failure share one shape, `SongResponse`, so a
// client only ever has to read `songlines`. Malformed requests get an
// `ErrorResponse` with a 4xx status instead.

use serde::{Deserialize, Serialize};

/// Line shown in place of a song when composition fails.
pub const COMPOSE_FAILED_LINE: &str = "could not create a song with those parameters";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SongResponse {
    pub songlines: Vec<String>,
}

impl SongResponse {
    pub fn failed() -> Self {
        Self {
            songlines: vec![COMPOSE_FAILED_LINE.to_string()],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
