//! Mood Table
//!
//! Read-only mapping from a mood key to the content lists a shift draws
//! from. Built once at startup, from the built-in set or from a JSON file of
//! the shape `{ "anxious": { "next": [...], "music": [...], ... } }`.
//!
//! Every list must be non-empty for every mood; a table that breaks this is
//! rejected at load with [`ShiftError::DataIntegrity`].

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::ShiftError;

/// Mood used when the input resolves to no known key.
pub const DEFAULT_FALLBACK: &str = "overwhelmed";

/// One of the per-mood content lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Next,
    Music,
    Food,
    Mantra,
    Breathwork,
    Activity,
}

impl Attribute {
    pub const ALL: [Attribute; 6] = [
        Attribute::Next,
        Attribute::Music,
        Attribute::Food,
        Attribute::Mantra,
        Attribute::Breathwork,
        Attribute::Activity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Attribute::Next => "next",
            Attribute::Music => "music",
            Attribute::Food => "food",
            Attribute::Mantra => "mantra",
            Attribute::Breathwork => "breathwork",
            Attribute::Activity => "activity",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodAttributes {
    /// Candidate follow-up moods. Plain strings, not checked against the table.
    pub next: Vec<String>,
    /// Playlist identifiers, interpolated into the music link template.
    pub music: Vec<String>,
    pub food: Vec<String>,
    pub mantra: Vec<String>,
    pub breathwork: Vec<String>,
    pub activity: Vec<String>,
}

impl MoodAttributes {
    pub fn values(&self, attribute: Attribute) -> &[String] {
        match attribute {
            Attribute::Next => &self.next,
            Attribute::Music => &self.music,
            Attribute::Food => &self.food,
            Attribute::Mantra => &self.mantra,
            Attribute::Breathwork => &self.breathwork,
            Attribute::Activity => &self.activity,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MoodTable {
    entries: BTreeMap<String, MoodAttributes>,
    fallback: String,
}

impl MoodTable {
    /// Build a table, normalizing keys and checking the non-empty invariant.
    pub fn new<I, K>(entries: I, fallback: &str) -> Result<Self, ShiftError>
    where
        I: IntoIterator<Item = (K, MoodAttributes)>,
        K: AsRef<str>,
    {
        let mut map = BTreeMap::new();
        for (key, attrs) in entries {
            let key = key.as_ref().trim().to_lowercase();
            for attribute in Attribute::ALL {
                if attrs.values(attribute).is_empty() {
                    return Err(ShiftError::DataIntegrity {
                        mood: key,
                        attribute: attribute.as_str(),
                    });
                }
            }
            map.insert(key, attrs);
        }

        let fallback = fallback.trim().to_lowercase();
        if !map.contains_key(&fallback) {
            return Err(ShiftError::UnknownFallback { mood: fallback });
        }

        Ok(Self {
            entries: map,
            fallback,
        })
    }

    /// The table compiled into the binary.
    pub fn builtin(fallback: &str) -> Result<Self, ShiftError> {
        Self::new(builtin_entries(), fallback)
    }

    pub fn from_json_str(raw: &str, fallback: &str) -> anyhow::Result<Self> {
        let entries: BTreeMap<String, MoodAttributes> =
            serde_json::from_str(raw).context("mood table is not a valid JSON object of moods")?;
        Ok(Self::new(entries, fallback)?)
    }

    pub fn load<P: AsRef<Path>>(path: P, fallback: &str) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read mood table {}", path.display()))?;
        Self::from_json_str(&raw, fallback)
            .with_context(|| format!("failed to load mood table {}", path.display()))
    }

    pub fn get(&self, key: &str) -> Option<&MoodAttributes> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

fn list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn builtin_entries() -> Vec<(&'static str, MoodAttributes)> {
    vec![
        (
            "anxious",
            MoodAttributes {
                next: list(&["calm", "centered"]),
                music: list(&["37i9dQZF1DWXe9gFZP0gtP", "37i9dQZF1DX3Ogo9pFvBkY"]),
                food: list(&["Chamomile tea", "A handful of almonds", "Dark chocolate square"]),
                mantra: list(&[
                    "I am safe in this moment.",
                    "This feeling will pass.",
                    "I breathe in calm, I breathe out worry.",
                ]),
                breathwork: list(&["4-7-8 breathing", "Box breathing"]),
                activity: list(&["Take a short walk", "Get some sunlight", "Write down three worries"]),
            },
        ),
        (
            "tired",
            MoodAttributes {
                next: list(&["rested", "calm", "energized"]),
                music: list(&["37i9dQZF1DX4sWSpwq3LiO", "37i9dQZF1DWZd79rJ6a7lp"]),
                food: list(&["Drink a glass of water", "Banana with peanut butter"]),
                mantra: list(&["Rest is productive.", "I give myself permission to slow down."]),
                breathwork: list(&["Energizing breath", "Alternate nostril breathing"]),
                activity: list(&["Take a 20 minute nap", "Stretch for five minutes"]),
            },
        ),
        (
            "sad",
            MoodAttributes {
                next: list(&["uplifted", "hopeful", "calm"]),
                music: list(&["37i9dQZF1DX3rxVfibe1L0", "37i9dQZF1DX7KNKjOK0o75"]),
                food: list(&["Warm soup", "Fresh berries"]),
                mantra: list(&["I am allowed to feel this.", "Brighter days are coming."]),
                breathwork: list(&["Sighing breath", "Slow belly breathing"]),
                activity: list(&["Call a friend", "Journal for ten minutes", "Take a short walk"]),
            },
        ),
        (
            "angry",
            MoodAttributes {
                next: list(&["calm", "grounded"]),
                music: list(&["37i9dQZF1DWZqd5JICZI0u", "37i9dQZF1DX9uKNf5jGX6m"]),
                food: list(&["Cold water", "Crunchy vegetables"]),
                mantra: list(&["I choose my response.", "I release what I cannot control."]),
                breathwork: list(&["Cooling breath", "Box breathing"]),
                activity: list(&["Go for a run", "Write it out, then tear it up"]),
            },
        ),
        (
            "overwhelmed",
            MoodAttributes {
                next: list(&["grounded", "calm", "centered"]),
                music: list(&["37i9dQZF1DWU0ScTcjJBdj", "37i9dQZF1DXe9gFZP0gtP1"]),
                food: list(&["Herbal tea", "A simple piece of fruit"]),
                mantra: list(&["One thing at a time.", "I can only do what I can do."]),
                breathwork: list(&["Box breathing", "5-4-3-2-1 grounding with slow breaths"]),
                activity: list(&["Write a three item to-do list", "Step outside for five minutes"]),
            },
        ),
        (
            "stressed",
            MoodAttributes {
                next: list(&["calm", "relaxed"]),
                music: list(&["37i9dQZF1DWXe9gFZP0gtP", "37i9dQZF1DX1s9knjP51Oa"]),
                food: list(&["Drink water", "Eat light snacks like nuts or fruit"]),
                mantra: list(&["I am doing enough.", "Pressure is not the same as urgency."]),
                breathwork: list(&["4-7-8 breathing", "Box breathing"]),
                activity: list(&["Get sunlight", "Take a short walk", "Tidy one small space"]),
            },
        ),
        (
            "lonely",
            MoodAttributes {
                next: list(&["connected", "uplifted"]),
                music: list(&["37i9dQZF1DX2pSTOxoPbx9", "37i9dQZF1DWVV27DiNWxkR"]),
                food: list(&["Cook a favourite meal", "Share a snack with someone"]),
                mantra: list(&["I am worthy of connection.", "Reaching out is strength."]),
                breathwork: list(&["Loving-kindness breathing"]),
                activity: list(&["Message an old friend", "Visit a cafe or library"]),
            },
        ),
        (
            "happy",
            MoodAttributes {
                next: list(&["energized", "grateful"]),
                music: list(&["37i9dQZF1DXdPec7aLTmlC", "37i9dQZF1DX3rxVfibe1L0"]),
                food: list(&["Eat protein-rich foods", "Hydrate well"]),
                mantra: list(&["I let joy in.", "I share my light."]),
                breathwork: list(&["Energizing breath"]),
                activity: list(&["Dance or move your body", "Socialize with friends", "Start a hobby"]),
            },
        ),
        (
            "bored",
            MoodAttributes {
                next: list(&["inspired", "curious"]),
                music: list(&["37i9dQZF1DX0XUsuxWHRQd", "37i9dQZF1DWWQRwui0ExPn"]),
                food: list(&["Try a new recipe", "Spicy snack"]),
                mantra: list(&["Curiosity opens doors.", "Every moment can surprise me."]),
                breathwork: list(&["Breath of fire"]),
                activity: list(&["Learn one new fact", "Sketch what is in front of you"]),
            },
        ),
    ]
}
