//! Server configuration
//!
//! Every flag can also be set through a `MOODSHIFT_*` environment variable.
//! The listen port additionally honours a plain `PORT`.

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use axum::http::HeaderValue;
use clap::Parser;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

use crate::mood::resolver::DEFAULT_MUSIC_URL;
use crate::mood::{MoodTable, MusicLink, DEFAULT_FALLBACK};

pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone, Parser)]
#[command(name = "moodshift", version, about = "Mood shift recommendation server")]
pub struct Config {
    /// Address to bind
    #[arg(long, env = "MOODSHIFT_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to bind (falls back to PORT, then 5000)
    #[arg(long, env = "MOODSHIFT_PORT")]
    pub port: Option<u16>,

    /// Directory for the sled catalog database
    #[arg(long, env = "MOODSHIFT_DATA_DIR", default_value = "./moodshift-data")]
    pub data_dir: PathBuf,

    /// JSON mood table to use instead of the built-in one
    #[arg(long, env = "MOODSHIFT_MOOD_TABLE")]
    pub mood_table: Option<PathBuf>,

    /// Music link template, `{id}` is replaced by the playlist identifier
    #[arg(long, env = "MOODSHIFT_MUSIC_URL", default_value = DEFAULT_MUSIC_URL)]
    pub music_url: String,

    /// Mood used when the input matches nothing
    #[arg(long, env = "MOODSHIFT_FALLBACK_MOOD", default_value = DEFAULT_FALLBACK)]
    pub fallback_mood: String,

    /// Development mode: allow any CORS origin
    #[arg(long, env = "MOODSHIFT_DEV")]
    pub dev: bool,

    /// Comma-separated list of allowed CORS origins
    #[arg(long, env = "MOODSHIFT_CORS_ORIGINS")]
    pub cors_origins: Option<String>,

    /// Skip seeding the default catalog
    #[arg(long, env = "MOODSHIFT_NO_SEED")]
    pub no_seed: bool,
}

impl Config {
    pub fn port(&self) -> u16 {
        self.port
            .or_else(|| env::var("PORT").ok().and_then(|s| s.parse().ok()))
            .unwrap_or(DEFAULT_PORT)
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port())
    }

    pub fn load_mood_table(&self) -> anyhow::Result<MoodTable> {
        match &self.mood_table {
            Some(path) => {
                info!(path = %path.display(), "loading mood table from file");
                MoodTable::load(path, &self.fallback_mood)
            }
            None => Ok(MoodTable::builtin(&self.fallback_mood)?),
        }
    }

    pub fn music_link(&self) -> anyhow::Result<MusicLink> {
        Ok(MusicLink::new(&self.music_url)?)
    }

    /// Dev mode allows any origin; otherwise only listed origins, and no
    /// cross-origin access when none are configured.
    pub fn cors_layer(&self) -> CorsLayer {
        if self.dev {
            info!("CORS: dev mode, any origin");
            return CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
        }

        let origins: Vec<HeaderValue> = self
            .cors_origins
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .filter_map(|part| match HeaderValue::from_str(part) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = part, "skipping invalid CORS origin");
                    None
                }
            })
            .collect();

        if origins.is_empty() {
            info!("CORS: no origins configured, cross-origin requests denied");
            CorsLayer::new().allow_methods(Any)
        } else {
            info!(origins = origins.len(), "CORS: allow-list");
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let mut argv = vec!["moodshift"];
        argv.extend_from_slice(args);
        Config::try_parse_from(argv).unwrap()
    }

    #[test]
    fn flags_override_defaults() {
        let config = parse(&[
            "--host",
            "127.0.0.1",
            "--port",
            "8080",
            "--fallback-mood",
            "tired",
            "--dev",
        ]);
        assert_eq!(config.listen_addr(), "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.fallback_mood, "tired");
        assert!(config.dev);
    }

    #[test]
    fn builtin_table_uses_configured_fallback() {
        let config = parse(&["--fallback-mood", "Tired"]);
        let table = config.load_mood_table().unwrap();
        assert_eq!(table.fallback(), "tired");
    }

    #[test]
    fn unknown_fallback_fails_table_load() {
        let config = parse(&["--fallback-mood", "ecstatic"]);
        let err = config.load_mood_table().unwrap_err();
        assert!(err.to_string().contains("ecstatic"));
    }

    #[test]
    fn music_url_needs_placeholder() {
        assert!(parse(&["--music-url", "https://music.example/"])
            .music_link()
            .is_err());
        let link = parse(&["--music-url", "https://music.example/{id}"])
            .music_link()
            .unwrap();
        assert_eq!(link.render("a1"), "https://music.example/a1");
    }
}
