//! Mood Resolver
//!
//! `normalize` turns raw input into known mood keys, `blend` merges one
//! attribute across those keys, and `compute_shift` picks one value per
//! attribute and assembles the response.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::debug;

use super::cosmic::CosmicTag;
use super::select::{pick, RandomSource, SelectionWeights};
use super::table::{Attribute, MoodTable};
use crate::error::ShiftError;

pub const DEFAULT_MUSIC_URL: &str = "https://open.spotify.com/playlist/{id}";
const MUSIC_ID_PLACEHOLDER: &str = "{id}";

/// Link template for music identifiers. The identifier is pasted in as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MusicLink {
    template: String,
}

impl MusicLink {
    pub fn new(template: &str) -> Result<Self, ShiftError> {
        if !template.contains(MUSIC_ID_PLACEHOLDER) {
            return Err(ShiftError::MusicTemplate {
                template: template.to_string(),
            });
        }
        Ok(Self {
            template: template.to_string(),
        })
    }

    pub fn render(&self, id: &str) -> String {
        self.template.replace(MUSIC_ID_PLACEHOLDER, id)
    }
}

impl Default for MusicLink {
    fn default() -> Self {
        Self {
            template: DEFAULT_MUSIC_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftResponse {
    pub user: String,
    pub current_mood: String,
    pub next_mood: String,
    pub music: String,
    pub food: String,
    pub mantra: String,
    pub breathwork: String,
    pub activity: String,
    pub cosmic_tag: CosmicTag,
}

/// Known mood keys in input order. Falls back to the table's fallback mood
/// when nothing matches, including empty input.
pub fn normalize(table: &MoodTable, raw: &str) -> Vec<String> {
    let lowered = raw.trim().to_lowercase();
    let moods: Vec<String> = lowered
        .split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty() && table.contains(segment))
        .map(str::to_string)
        .collect();

    if moods.is_empty() {
        vec![table.fallback().to_string()]
    } else {
        moods
    }
}

/// First-occurrence-wins merge of several lists, keeping order.
pub fn merge_unique<'a, I, L>(lists: I) -> Vec<String>
where
    I: IntoIterator<Item = L>,
    L: IntoIterator<Item = &'a String>,
{
    let mut seen = HashSet::new();
    let mut merged = Vec::new();
    for list in lists {
        for value in list {
            if seen.insert(value.as_str()) {
                merged.push(value.clone());
            }
        }
    }
    merged
}

/// One attribute merged across `moods`. Keys missing from the table are
/// skipped; an empty result means the table is malformed.
pub fn blend(
    table: &MoodTable,
    moods: &[String],
    attribute: Attribute,
) -> Result<Vec<String>, ShiftError> {
    let blended = merge_unique(
        moods
            .iter()
            .filter_map(|mood| table.get(mood))
            .map(|attrs| attrs.values(attribute)),
    );
    if blended.is_empty() {
        return Err(ShiftError::DataIntegrity {
            mood: moods.join(","),
            attribute: attribute.as_str(),
        });
    }
    Ok(blended)
}

pub fn compute_shift<R>(
    table: &MoodTable,
    music_link: &MusicLink,
    raw_mood: &str,
    user: &str,
    now: NaiveDateTime,
    rng: &mut R,
) -> Result<ShiftResponse, ShiftError>
where
    R: RandomSource + ?Sized,
{
    let moods = normalize(table, raw_mood);
    let cosmic_tag = CosmicTag::at(&now);
    let night_weights = cosmic_tag.is_night().then(SelectionWeights::night);

    let mut choose = |attribute: Attribute,
                      weights: Option<&SelectionWeights>|
     -> Result<String, ShiftError> {
        let candidates = blend(table, &moods, attribute)?;
        pick(attribute, &candidates, weights, &mut *rng).map(str::to_string)
    };

    let next_mood = choose(Attribute::Next, night_weights)?;
    let music = choose(Attribute::Music, None)?;
    let food = choose(Attribute::Food, None)?;
    let mantra = choose(Attribute::Mantra, None)?;
    let breathwork = choose(Attribute::Breathwork, None)?;
    let activity = choose(Attribute::Activity, None)?;

    debug!(moods = ?moods, cosmic_tag = cosmic_tag.as_str(), next_mood = %next_mood, "shift computed");

    Ok(ShiftResponse {
        user: user.to_string(),
        current_mood: moods.join(","),
        next_mood,
        music: music_link.render(&music),
        food,
        mantra,
        breathwork,
        activity,
        cosmic_tag,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mood::cosmic::tests::at_hour;
    use crate::mood::select::tests::ScriptedDraws;
    use crate::mood::table::{MoodAttributes, DEFAULT_FALLBACK};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn table() -> MoodTable {
        MoodTable::builtin(DEFAULT_FALLBACK).unwrap()
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn normalize_lowercases_trims_and_splits() {
        assert_eq!(
            normalize(&table(), "  Anxious, TIRED "),
            ["anxious", "tired"]
        );
    }

    #[test]
    fn normalize_drops_unknown_and_empty_segments() {
        assert_eq!(normalize(&table(), "anxious,,xyz, tired,"), ["anxious", "tired"]);
    }

    #[test]
    fn normalize_keeps_repeats_in_order() {
        assert_eq!(
            normalize(&table(), "tired,anxious,tired"),
            ["tired", "anxious", "tired"]
        );
    }

    #[test]
    fn empty_and_unknown_input_share_the_fallback() {
        let table = table();
        let empty = normalize(&table, "");
        let unknown = normalize(&table, "unknownword");
        assert_eq!(empty, ["overwhelmed"]);
        assert_eq!(empty, unknown);
        assert_eq!(normalize(&table, " , ,"), ["overwhelmed"]);
    }

    #[test]
    fn blend_unions_next_moods_in_input_order() {
        let moods = strings(&["anxious", "tired"]);
        let next = blend(&table(), &moods, Attribute::Next).unwrap();
        assert_eq!(next, ["calm", "centered", "rested", "energized"]);
    }

    #[test]
    fn blend_keeps_shared_value_at_first_position() {
        let moods = strings(&["anxious", "stressed"]);
        let breathwork = blend(&table(), &moods, Attribute::Breathwork).unwrap();
        assert_eq!(breathwork, ["4-7-8 breathing", "Box breathing"]);

        let music = blend(&table(), &moods, Attribute::Music).unwrap();
        assert_eq!(
            music.iter().filter(|m| *m == "37i9dQZF1DWXe9gFZP0gtP").count(),
            1
        );
        assert_eq!(music[0], "37i9dQZF1DWXe9gFZP0gtP");
    }

    #[test]
    fn blend_is_deterministic() {
        let table = table();
        let moods = strings(&["sad", "lonely", "happy"]);
        for attribute in Attribute::ALL {
            let first = blend(&table, &moods, attribute).unwrap();
            let second = blend(&table, &moods, attribute).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn blend_of_nothing_is_a_data_integrity_error() {
        let err = blend(&table(), &[], Attribute::Food).unwrap_err();
        assert_eq!(
            err,
            ShiftError::DataIntegrity {
                mood: String::new(),
                attribute: "food",
            }
        );
    }

    #[test]
    fn music_link_requires_placeholder() {
        assert!(MusicLink::new("https://music.example/").is_err());
        let link = MusicLink::new("https://music.example/p/{id}?si=1").unwrap();
        assert_eq!(link.render("abc"), "https://music.example/p/abc?si=1");
    }

    #[test]
    fn anxious_shift() {
        let table = table();
        let anxious = table.get("anxious").unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        for hour in [3, 12, 20] {
            let shift = compute_shift(
                &table,
                &MusicLink::default(),
                "anxious",
                "sam",
                at_hour(hour),
                &mut rng,
            )
            .unwrap();
            assert_eq!(shift.user, "sam");
            assert_eq!(shift.current_mood, "anxious");
            assert!(["calm", "centered"].contains(&shift.next_mood.as_str()));
            assert!(anxious
                .music
                .iter()
                .any(|id| shift.music == format!("https://open.spotify.com/playlist/{id}")));
            assert!(anxious.mantra.contains(&shift.mantra));
            assert_eq!(shift.cosmic_tag, CosmicTag::from_hour(hour));
        }
    }

    #[test]
    fn combo_shift_draws_next_from_the_union() {
        let table = table();
        let union = strings(&["calm", "centered", "rested", "energized"]);
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..200 {
            let shift = compute_shift(
                &table,
                &MusicLink::default(),
                "anxious,tired",
                "guest",
                at_hour(10),
                &mut rng,
            )
            .unwrap();
            assert_eq!(shift.current_mood, "anxious,tired");
            assert!(union.contains(&shift.next_mood));
        }
    }

    #[test]
    fn empty_mood_resolves_to_fallback_bundle() {
        let table = table();
        let fallback = table.get("overwhelmed").unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let shift = compute_shift(
            &table,
            &MusicLink::default(),
            "",
            "guest",
            at_hour(14),
            &mut rng,
        )
        .unwrap();
        assert_eq!(shift.current_mood, "overwhelmed");
        assert!(fallback.next.contains(&shift.next_mood));
        assert!(fallback.food.contains(&shift.food));
        assert!(fallback.mantra.contains(&shift.mantra));
        assert!(fallback.breathwork.contains(&shift.breathwork));
        assert!(fallback.activity.contains(&shift.activity));
    }

    #[test]
    fn night_weights_only_bias_next_mood() {
        // anxious next = [calm, centered]; at night calm weighs 2, centered 1.
        // A draw of 0.6 lands on calm at night (1.8 < 2) but centered by day.
        let table = table();
        let link = MusicLink::default();
        let mut draws = ScriptedDraws::new(&[0.6]);
        let night = compute_shift(&table, &link, "anxious", "a", at_hour(22), &mut draws).unwrap();
        assert_eq!(night.next_mood, "calm");

        let mut draws = ScriptedDraws::new(&[0.6]);
        let day = compute_shift(&table, &link, "anxious", "a", at_hour(10), &mut draws).unwrap();
        assert_eq!(day.next_mood, "centered");

        // Other attributes see the same draw either way.
        assert_eq!(night.food, day.food);
        assert_eq!(night.mantra, day.mantra);
    }

    #[test]
    fn shift_serializes_camel_case() {
        let table = MoodTable::new(
            vec![(
                "calm",
                MoodAttributes {
                    next: strings(&["focused"]),
                    music: strings(&["xyz"]),
                    food: strings(&["tea"]),
                    mantra: strings(&["here"]),
                    breathwork: strings(&["box"]),
                    activity: strings(&["read"]),
                },
            )],
            "calm",
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let shift = compute_shift(
            &table,
            &MusicLink::default(),
            "Calm",
            "kit",
            at_hour(8),
            &mut rng,
        )
        .unwrap();
        let json = serde_json::to_value(&shift).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "user": "kit",
                "currentMood": "calm",
                "nextMood": "focused",
                "music": "https://open.spotify.com/playlist/xyz",
                "food": "tea",
                "mantra": "here",
                "breathwork": "box",
                "activity": "read",
                "cosmicTag": "day",
            })
        );
    }
}
