// Request routing and query parsing for the song service.
//
// Everything here is independent of the socket layer: `handle_request` takes
// the method and URL of a request and returns a `Reply` (status plus JSON
// body), which `server.rs` turns into a `tiny_http::Response`. That keeps the
// routing rules testable without a listening server.
//
// Routes:
// - `GET /` and `GET /song` with `scheme`, `minSyllables`, `maxSyllables`
//   query parameters. The syllable bounds default to the service's
//   `ComposeConfig`.
// - Anything else is 404, or 405 for a known path with a non-GET method.

use log::{debug, warn};
use serde::Serialize;
use songsmith_prng::SongRng;
use songsmith_song::{ComposeConfig, SongWriter};
use thiserror::Error;

use crate::message::{ErrorResponse, SongResponse};

/// A parsed song request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SongQuery {
    pub scheme: String,
    pub min_syllables: u32,
    pub max_syllables: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("missing required parameter 'scheme'")]
    MissingScheme,
    #[error("parameter '{param}' must be a non-negative integer, got '{value}'")]
    InvalidInteger { param: String, value: String },
    #[error("parameter '{param}' is not valid percent-encoded UTF-8")]
    InvalidEncoding { param: String },
}

/// Parse the query string (without the leading `?`). Unknown parameters are
/// ignored; a repeated parameter keeps its last value.
pub fn parse_query(query: &str, defaults: &ComposeConfig) -> Result<SongQuery, QueryError> {
    let mut scheme = None;
    let mut min_syllables = defaults.min_filler_syllables;
    let mut max_syllables = defaults.max_filler_syllables;

    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (name, raw) = pair.split_once('=').unwrap_or((pair, ""));
        let value = urlencoding::decode(raw).map_err(|_| QueryError::InvalidEncoding {
            param: name.to_string(),
        })?;
        match name {
            "scheme" => scheme = Some(value.into_owned()),
            "minSyllables" => min_syllables = parse_count(name, &value)?,
            "maxSyllables" => max_syllables = parse_count(name, &value)?,
            _ => debug!("ignoring query parameter '{name}'"),
        }
    }

    let scheme = scheme
        .filter(|s| !s.is_empty())
        .ok_or(QueryError::MissingScheme)?;
    Ok(SongQuery {
        scheme,
        min_syllables,
        max_syllables,
    })
}

fn parse_count(param: &str, value: &str) -> Result<u32, QueryError> {
    value.trim().parse().map_err(|_| QueryError::InvalidInteger {
        param: param.to_string(),
        value: value.to_string(),
    })
}

/// Status code and serialized JSON body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    fn json(status: u16, body: &impl Serialize) -> Self {
        match serde_json::to_string(body) {
            Ok(body) => Self { status, body },
            Err(e) => {
                warn!("failed to serialize response: {e}");
                Self::error(500, "internal error")
            }
        }
    }

    fn error(status: u16, message: impl Into<String>) -> Self {
        let body = ErrorResponse {
            error: message.into(),
        };
        // A struct holding one String always serializes.
        let body = serde_json::to_string(&body).unwrap_or_default();
        Self { status, body }
    }
}

/// Route one request and compose the song it asks for.
pub fn handle_request(
    is_get: bool,
    url: &str,
    writer: &SongWriter,
    defaults: &ComposeConfig,
    rng: &mut SongRng,
) -> Reply {
    let (path, query) = url.split_once('?').unwrap_or((url, ""));
    if path != "/" && path != "/song" {
        return Reply::error(404, format!("no such path '{path}'"));
    }
    if !is_get {
        return Reply::error(405, "only GET is supported");
    }

    let query = match parse_query(query, defaults) {
        Ok(query) => query,
        Err(e) => {
            debug!("rejecting '{url}': {e}");
            return Reply::error(400, e.to_string());
        }
    };

    match writer.compose_song(&query.scheme, query.min_syllables, query.max_syllables, rng) {
        Ok(songlines) => Reply::json(200, &SongResponse { songlines }),
        Err(e) => {
            debug!("could not compose '{}': {e}", query.scheme);
            Reply::json(200, &SongResponse::failed())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::COMPOSE_FAILED_LINE;

    fn writer() -> SongWriter {
        let mut words = Vec::new();
        for ending in ["an", "ish", "ob", "et"] {
            for stem in ["b", "pal", "mubor", "tadikel"] {
                words.push(format!("{stem}{ending}"));
            }
        }
        SongWriter::new(words)
    }

    fn songlines(reply: &Reply) -> Vec<String> {
        serde_json::from_str::<SongResponse>(&reply.body)
            .unwrap()
            .songlines
    }

    #[test]
    fn query_defaults() {
        let query = parse_query("scheme=8a,8a,5b", &ComposeConfig::default()).unwrap();
        assert_eq!(
            query,
            SongQuery {
                scheme: "8a,8a,5b".into(),
                min_syllables: 1,
                max_syllables: 4,
            }
        );
    }

    #[test]
    fn query_decodes_and_overrides() {
        let query = parse_query(
            "maxSyllables=2&scheme=4a%2C4a&minSyllables=2&extra=1",
            &ComposeConfig::default(),
        )
        .unwrap();
        assert_eq!(query.scheme, "4a,4a");
        assert_eq!((query.min_syllables, query.max_syllables), (2, 2));
    }

    #[test]
    fn query_errors() {
        let defaults = ComposeConfig::default();
        assert_eq!(parse_query("", &defaults), Err(QueryError::MissingScheme));
        assert_eq!(parse_query("scheme=", &defaults), Err(QueryError::MissingScheme));
        assert_eq!(
            parse_query("scheme=8a&minSyllables=two", &defaults),
            Err(QueryError::InvalidInteger {
                param: "minSyllables".into(),
                value: "two".into(),
            })
        );
        assert!(matches!(
            parse_query("scheme=8a&maxSyllables=-1", &defaults),
            Err(QueryError::InvalidInteger { .. })
        ));
        assert!(matches!(
            parse_query("scheme=%FF", &defaults),
            Err(QueryError::InvalidEncoding { .. })
        ));
    }

    #[test]
    fn serves_a_song() {
        let writer = writer();
        let mut rng = SongRng::new(42);
        let reply = handle_request(
            true,
            "/?scheme=5a,5a,3b&minSyllables=1&maxSyllables=2",
            &writer,
            &ComposeConfig::default(),
            &mut rng,
        );
        assert_eq!(reply.status, 200);
        assert_eq!(songlines(&reply).len(), 3);
    }

    #[test]
    fn song_alias_path() {
        let writer = writer();
        let mut rng = SongRng::new(1);
        let reply = handle_request(
            true,
            "/song?scheme=2a",
            &writer,
            &ComposeConfig::default(),
            &mut rng,
        );
        assert_eq!(reply.status, 200);
    }

    #[test]
    fn composition_failure_is_a_friendly_line() {
        let writer = writer();
        let mut rng = SongRng::new(1);
        // Five distinct rhymes, four rhyme groups.
        let reply = handle_request(
            true,
            "/?scheme=2a,2b,2c,2d,2e",
            &writer,
            &ComposeConfig::default(),
            &mut rng,
        );
        assert_eq!(reply.status, 200);
        assert_eq!(songlines(&reply), vec![COMPOSE_FAILED_LINE.to_string()]);

        let garbage = handle_request(
            true,
            "/?scheme=hello",
            &writer,
            &ComposeConfig::default(),
            &mut rng,
        );
        assert_eq!(songlines(&garbage), vec![COMPOSE_FAILED_LINE.to_string()]);
    }

    #[test]
    fn oversized_scheme_is_refused_without_composing() {
        let writer = writer();
        let mut rng = SongRng::new(1);
        let started = std::time::Instant::now();
        let reply = handle_request(
            true,
            "/?scheme=4000000000a&minSyllables=1&maxSyllables=1",
            &writer,
            &ComposeConfig::default(),
            &mut rng,
        );
        assert_eq!(reply.status, 200);
        assert_eq!(songlines(&reply), vec![COMPOSE_FAILED_LINE.to_string()]);
        assert!(!writer.is_built());
        assert!(started.elapsed() < std::time::Duration::from_secs(5));
    }

    #[test]
    fn bad_requests() {
        let writer = writer();
        let mut rng = SongRng::new(1);
        let defaults = ComposeConfig::default();
        let missing = handle_request(true, "/", &writer, &defaults, &mut rng);
        assert_eq!(missing.status, 400);
        let body: ErrorResponse = serde_json::from_str(&missing.body).unwrap();
        assert!(body.error.contains("scheme"));

        let bad_int = handle_request(
            true,
            "/?scheme=8a&minSyllables=x",
            &writer,
            &defaults,
            &mut rng,
        );
        assert_eq!(bad_int.status, 400);

        let not_found = handle_request(true, "/lyrics?scheme=8a", &writer, &defaults, &mut rng);
        assert_eq!(not_found.status, 404);

        let post = handle_request(false, "/?scheme=8a", &writer, &defaults, &mut rng);
        assert_eq!(post.status, 405);
    }
}
