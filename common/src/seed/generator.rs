use crate::db::Database;
use crate::error::{Result, TuneQueryError};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rusqlite::params;
use std::ops::RangeInclusive;

const DROP_TABLES: &str = "\
DROP TABLE IF EXISTS tracks;
DROP TABLE IF EXISTS albums;
DROP TABLE IF EXISTS artists;";

const CREATE_TABLES: &str = "\
CREATE TABLE artists (
    artist_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT,
    genre TEXT,
    country TEXT
);
CREATE TABLE albums (
    album_id INTEGER PRIMARY KEY AUTOINCREMENT,
    artist_id INTEGER,
    title TEXT,
    release_year INTEGER,
    FOREIGN KEY (artist_id) REFERENCES artists(artist_id)
);
CREATE TABLE tracks (
    track_id INTEGER PRIMARY KEY AUTOINCREMENT,
    album_id INTEGER,
    title TEXT,
    duration_sec INTEGER,
    streams INTEGER,
    FOREIGN KEY (album_id) REFERENCES albums(album_id)
);";

const FIRST_NAMES: &[&str] = &[
    "James", "Maria", "Aisha", "Liam", "Priya", "Noah", "Chloe", "Mateo", "Yuki", "Olivia",
    "Ethan", "Zara", "Lucas", "Amara", "Henry", "Sofia", "Rohan", "Grace", "Diego", "Nina",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Garcia", "Patel", "Johnson", "Nguyen", "Brown", "Okafor", "Wilson", "Kim",
    "Martin", "Singh", "Clarke", "Lopez", "Walker", "Chen", "Taylor", "Murphy", "Rossi",
];

const WORDS: &[&str] = &[
    "echo", "river", "midnight", "velvet", "horizon", "ember", "signal", "paper", "gravity",
    "neon", "harbor", "silence", "orbit", "willow", "static", "summer", "glass", "thunder",
    "mirror", "wander", "cobalt", "lantern", "frost", "canyon", "ritual", "satellite",
];

/// shape of the synthetic catalog
#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub artists: usize,
    pub albums_per_artist: RangeInclusive<usize>,
    pub tracks_per_album: RangeInclusive<usize>,
    pub genres: Vec<String>,
    pub countries: Vec<String>,
    pub release_years: RangeInclusive<i64>,
    pub duration_sec: RangeInclusive<i64>,
    pub streams: RangeInclusive<i64>,
    /// fixed seed for reproducible data; `None` draws from the os
    pub rng_seed: Option<u64>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            artists: 10,
            albums_per_artist: 1..=3,
            tracks_per_album: 3..=7,
            genres: ["Pop", "Rock", "Hip-Hop", "Jazz", "Classical"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            countries: ["USA", "UK", "India", "Canada", "Australia"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            release_years: 2000..=2025,
            duration_sec: 120..=300,
            streams: 1_000..=1_000_000,
            rng_seed: None,
        }
    }
}

impl SeedConfig {
    fn validate(&self) -> Result<()> {
        if self.genres.is_empty() || self.countries.is_empty() {
            return Err(TuneQueryError::Seed(
                "genres and countries must not be empty".to_string(),
            ));
        }
        let ranges_ok = !self.albums_per_artist.is_empty()
            && !self.tracks_per_album.is_empty()
            && !self.release_years.is_empty()
            && !self.duration_sec.is_empty()
            && !self.streams.is_empty();
        if !ranges_ok {
            return Err(TuneQueryError::Seed("ranges must not be empty".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedSummary {
    pub artists: usize,
    pub albums: usize,
    pub tracks: usize,
}

/// drop and recreate the three catalog tables, then fill them with synthetic rows
#[tracing::instrument(skip(database, config), fields(db.path = %database.path().display(), artists = config.artists))]
pub fn seed_database(database: &Database, config: &SeedConfig) -> Result<SeedSummary> {
    config.validate()?;

    let mut rng = match config.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut conn = database.create()?;
    conn.execute_batch(DROP_TABLES)?;
    conn.execute_batch(CREATE_TABLES)?;
    tracing::info!("catalog tables recreated");

    let tx = conn.transaction()?;
    let mut summary = SeedSummary::default();

    let mut artist_ids = Vec::with_capacity(config.artists);
    for _ in 0..config.artists {
        tx.execute(
            "INSERT INTO artists (name, genre, country) VALUES (?1, ?2, ?3)",
            params![
                person_name(&mut rng),
                pick(&mut rng, &config.genres),
                pick(&mut rng, &config.countries)
            ],
        )?;
        artist_ids.push(tx.last_insert_rowid());
        summary.artists += 1;
    }

    let mut album_ids = Vec::new();
    for artist_id in &artist_ids {
        for _ in 0..rng.random_range(config.albums_per_artist.clone()) {
            tx.execute(
                "INSERT INTO albums (artist_id, title, release_year) VALUES (?1, ?2, ?3)",
                params![
                    artist_id,
                    format!("{} Album", title_word(&mut rng)),
                    rng.random_range(config.release_years.clone())
                ],
            )?;
            album_ids.push(tx.last_insert_rowid());
            summary.albums += 1;
        }
    }

    for album_id in &album_ids {
        for _ in 0..rng.random_range(config.tracks_per_album.clone()) {
            tx.execute(
                "INSERT INTO tracks (album_id, title, duration_sec, streams) VALUES (?1, ?2, ?3, ?4)",
                params![
                    album_id,
                    title_word(&mut rng),
                    rng.random_range(config.duration_sec.clone()),
                    rng.random_range(config.streams.clone())
                ],
            )?;
            summary.tracks += 1;
        }
    }

    tx.commit()?;
    tracing::info!(
        artists = summary.artists,
        albums = summary.albums,
        tracks = summary.tracks,
        "sample data written"
    );

    Ok(summary)
}

fn pick<'a>(rng: &mut StdRng, values: &'a [String]) -> &'a str {
    // callers validate non-empty lists
    values.choose(rng).map(String::as_str).unwrap_or_default()
}

fn person_name(rng: &mut StdRng) -> String {
    let first = FIRST_NAMES.choose(rng).copied().unwrap_or("Alex");
    let last = LAST_NAMES.choose(rng).copied().unwrap_or("Doe");
    format!("{} {}", first, last)
}

fn title_word(rng: &mut StdRng) -> String {
    let word = WORDS.choose(rng).copied().unwrap_or("untitled");
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
