use anyhow::{Context, Result};
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

// Raw row shapes as the backend returns them. Embedded joins come back either
// as a single object or as an array depending on the relationship, and may be
// null when nothing is related.

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Embedded<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> Embedded<T> {
    pub fn first(&self) -> Option<&T> {
        match self {
            Embedded::Many(items) => items.first(),
            Embedded::One(item) => Some(item),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NamedRef {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoalsRef {
    #[serde(default)]
    pub goals: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CountryRow {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub fifa_ranking: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerRow {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub country: Option<Embedded<NamedRef>>,
    #[serde(default)]
    pub top_scorers: Option<Embedded<GoalsRef>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchRow {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub home_team: Option<Embedded<NamedRef>>,
    #[serde(default)]
    pub away_team: Option<Embedded<NamedRef>>,
    #[serde(default)]
    pub home_score: Option<u32>,
    #[serde(default)]
    pub away_score: Option<u32>,
    pub match_date: String,
    #[serde(default)]
    pub stadium: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopScorerRow {
    pub name: String,
    #[serde(default)]
    pub country: Option<Embedded<NamedRef>>,
    #[serde(default)]
    pub top_scorers: Option<Embedded<GoalsRef>>,
}

pub fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>) -> Result<Vec<T>> {
    rows.into_iter()
        .enumerate()
        .map(|(idx, row)| {
            serde_json::from_value(row).with_context(|| format!("row {idx} has an unexpected shape"))
        })
        .collect()
}

pub fn embedded_name(value: Option<&Embedded<NamedRef>>) -> String {
    value
        .and_then(Embedded::first)
        .map(|named| named.name.clone())
        .unwrap_or_default()
}

fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!("unsupported id value: {other}"))),
    }
}
