//! Catalog store backed by sled.
//!
//! Trees:
//! - `recommendations` - content bundles tagged with the moods they suit
//! - `articles` - reading list grouped by category
//! - `mood_log` - per-user check-ins, keyed `<user>\0<id>` so a prefix scan
//!   returns one user's entries in insertion order
//!
//! Records are JSON-encoded. Ids come from `Db::generate_id` and are stored
//! big-endian so tree order is insertion order.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use sled::{Db, Tree};

use crate::error::StoreError;
use crate::mood::merge_unique;

const RECOMMENDATIONS_TREE: &str = "recommendations";
const ARTICLES_TREE: &str = "articles";
const MOOD_LOG_TREE: &str = "mood_log";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub moods: Vec<String>,
    pub music: Vec<String>,
    pub food: Vec<String>,
    pub activities: Vec<String>,
    pub breath_work: Vec<String>,
}

/// Every matching recommendation folded into one, duplicates removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedRecommendations {
    pub music: Vec<String>,
    pub food: Vec<String>,
    pub activities: Vec<String>,
    pub breath_work: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub category: String,
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckIn {
    pub user: String,
    pub mood: String,
    pub combo_moods: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub recommendations: usize,
    pub articles: usize,
}

pub struct Store {
    db: Db,
    recommendations: Tree,
    articles: Tree,
    mood_log: Tree,
}

impl Store {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        Self::from_db(sled::open(path)?)
    }

    pub fn from_db(db: Db) -> Result<Self, StoreError> {
        Ok(Self {
            recommendations: db.open_tree(RECOMMENDATIONS_TREE)?,
            articles: db.open_tree(ARTICLES_TREE)?,
            mood_log: db.open_tree(MOOD_LOG_TREE)?,
            db,
        })
    }

    /// Insert the default catalog into whichever trees are still empty.
    pub fn seed_defaults(&self) -> Result<SeedReport, StoreError> {
        let mut report = SeedReport::default();
        if self.recommendations.is_empty() {
            for rec in default_recommendations() {
                self.add_recommendation(&rec)?;
                report.recommendations += 1;
            }
        }
        if self.articles.is_empty() {
            for article in default_articles() {
                self.insert(&self.articles, &article)?;
                report.articles += 1;
            }
        }
        self.db.flush()?;
        Ok(report)
    }

    pub fn add_recommendation(&self, rec: &Recommendation) -> Result<(), StoreError> {
        self.insert(&self.recommendations, rec)
    }

    /// Recommendations tagged with any of `moods`, or `None` when nothing matches.
    pub fn recommendations_for(
        &self,
        moods: &[String],
    ) -> Result<Option<CombinedRecommendations>, StoreError> {
        let matched: Vec<Recommendation> = scan::<Recommendation>(&self.recommendations)?
            .into_iter()
            .filter(|rec| rec.moods.iter().any(|m| moods.contains(m)))
            .collect();

        if matched.is_empty() {
            return Ok(None);
        }

        Ok(Some(CombinedRecommendations {
            music: merge_unique(matched.iter().map(|r| &r.music)),
            food: merge_unique(matched.iter().map(|r| &r.food)),
            activities: merge_unique(matched.iter().map(|r| &r.activities)),
            breath_work: merge_unique(matched.iter().map(|r| &r.breath_work)),
        }))
    }

    /// All articles, or only those in `category` (compared lowercased).
    pub fn articles(&self, category: Option<&str>) -> Result<Vec<Article>, StoreError> {
        let all: Vec<Article> = scan(&self.articles)?;
        Ok(match category.map(str::to_lowercase) {
            Some(category) => all.into_iter().filter(|a| a.category == category).collect(),
            None => all,
        })
    }

    pub fn record_check_in(&self, entry: &CheckIn) -> Result<(), StoreError> {
        let id = self.db.generate_id()?;
        let mut key = user_prefix(&entry.user);
        key.extend_from_slice(&id.to_be_bytes());
        self.mood_log.insert(key, serde_json::to_vec(entry)?)?;
        Ok(())
    }

    /// Most recent check-ins for `user`, newest first.
    pub fn check_ins_for(&self, user: &str, limit: usize) -> Result<Vec<CheckIn>, StoreError> {
        let mut entries = Vec::new();
        for item in self.mood_log.scan_prefix(user_prefix(user)).rev().take(limit) {
            let (_, value) = item?;
            entries.push(serde_json::from_slice(&value)?);
        }
        Ok(entries)
    }

    pub fn flush(&self) -> Result<(), StoreError> {
        self.db.flush()?;
        Ok(())
    }

    fn insert<T: Serialize>(&self, tree: &Tree, record: &T) -> Result<(), StoreError> {
        let id = self.db.generate_id()?;
        tree.insert(id.to_be_bytes(), serde_json::to_vec(record)?)?;
        Ok(())
    }
}

fn scan<T: DeserializeOwned>(tree: &Tree) -> Result<Vec<T>, StoreError> {
    let mut records = Vec::new();
    for item in tree.iter() {
        let (_, value) = item?;
        records.push(serde_json::from_slice(&value)?);
    }
    Ok(records)
}

/// `len(user)` as big-endian u32, then the user bytes. No user's prefix is a
/// prefix of another user's keys, whatever bytes the name contains.
fn user_prefix(user: &str) -> Vec<u8> {
    let mut prefix = Vec::with_capacity(4 + user.len());
    prefix.extend_from_slice(&(user.len() as u32).to_be_bytes());
    prefix.extend_from_slice(user.as_bytes());
    prefix
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_recommendations() -> Vec<Recommendation> {
    vec![
        Recommendation {
            moods: strings(&["anxious", "stressed"]),
            music: strings(&["Calm Vibes Playlist - Spotify", "Relaxing Piano - Apple Music"]),
            food: strings(&["Drink water", "Eat light snacks like nuts or fruit"]),
            activities: strings(&[
                "Breath work exercises (see /api/breathwork)",
                "Get sunlight",
                "Take a short walk",
            ]),
            breath_work: strings(&["4-7-8 breathing technique", "Box breathing"]),
        },
        Recommendation {
            moods: strings(&["happy", "energetic"]),
            music: strings(&["Upbeat Pop Hits - Spotify", "Feel Good Mix - Apple Music"]),
            food: strings(&["Eat protein-rich foods", "Hydrate well"]),
            activities: strings(&[
                "Dance or move your body",
                "Socialize with friends",
                "Start a hobby",
            ]),
            breath_work: strings(&["Energizing breath sequences"]),
        },
        Recommendation {
            moods: strings(&["tired", "overwhelmed"]),
            music: strings(&["Deep Focus - Spotify", "Relaxing Piano - Apple Music"]),
            food: strings(&["Drink water", "Banana with peanut butter"]),
            activities: strings(&["Take a 20 minute nap", "Write a three item to-do list"]),
            breath_work: strings(&["Box breathing", "Alternate nostril breathing"]),
        },
    ]
}

fn default_articles() -> Vec<Article> {
    vec![
        Article {
            category: "science".into(),
            title: "How Energy Affects Reality".into(),
            url: "https://example.com/science-energy".into(),
        },
        Article {
            category: "spirituality".into(),
            title: "Harnessing Love and Good Vibes".into(),
            url: "https://example.com/spirituality-love".into(),
        },
        Article {
            category: "quantum".into(),
            title: "Quantum Physics and Consciousness".into(),
            url: "https://example.com/quantum-consciousness".into(),
        },
    ]
}
