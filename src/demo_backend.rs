use std::cmp::Ordering;
use std::collections::HashMap;

use anyhow::{Result, anyhow};
use serde_json::{Value, json};

use crate::query::{QueryClient, SelectQuery, SortDirection, split_projection};

/// In-memory stand-in for the hosted backend, used when no backend URL is
/// configured. Rows are stored already joined, the way the hosted backend
/// returns them for this app's projections.
pub struct DemoBackend {
    tables: HashMap<String, Vec<Value>>,
}

impl DemoBackend {
    pub fn new(tables: HashMap<String, Vec<Value>>) -> Self {
        Self { tables }
    }

    pub fn seeded() -> Self {
        let mut tables = HashMap::new();
        tables.insert("countries".to_string(), seed_countries());
        tables.insert("players".to_string(), seed_players());
        tables.insert("matches".to_string(), seed_matches());
        Self::new(tables)
    }
}

impl QueryClient for DemoBackend {
    fn select(&self, query: &SelectQuery) -> Result<Vec<Value>> {
        let mut rows = self
            .tables
            .get(&query.table)
            .cloned()
            .ok_or_else(|| anyhow!("relation \"{}\" does not exist", query.table))?;

        for relation in inner_joins(&query.columns) {
            rows.retain(|row| has_embedded(row, relation));
        }
        if let Some(order) = &query.order {
            rows.sort_by(|a, b| {
                compare_values(
                    sort_key(a, &order.column),
                    sort_key(b, &order.column),
                    order.direction,
                )
            });
        }
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }
        Ok(rows)
    }
}

/// Relations embedded as `name!inner(...)` (optionally aliased `alias:name!inner(...)`).
/// Rows store embeds under the alias when there is one.
fn inner_joins(columns: &str) -> Vec<&str> {
    split_projection(columns)
        .into_iter()
        .filter(|part| part.contains("!inner"))
        .filter_map(|part| {
            let head = part.split('(').next()?;
            let relation = head.split('!').next()?;
            Some(relation.split(':').next().unwrap_or(relation))
        })
        .collect()
}

fn has_embedded(row: &Value, relation: &str) -> bool {
    match row.get(relation) {
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(_)) => true,
        _ => false,
    }
}

/// `column` or `relation(column)`.
fn sort_key<'a>(row: &'a Value, column: &str) -> Option<&'a Value> {
    match column.split_once('(') {
        Some((relation, rest)) => {
            let field = rest.trim_end_matches(')');
            let embedded = match row.get(relation)? {
                Value::Array(items) => items.first()?,
                other => other,
            };
            embedded.get(field)
        }
        None => row.get(column),
    }
}

/// Nulls sort last in both directions.
fn compare_values(a: Option<&Value>, b: Option<&Value>, direction: SortDirection) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    let ord = match (a, b) {
        (None, None) => return Ordering::Equal,
        (None, Some(_)) => return Ordering::Greater,
        (Some(_), None) => return Ordering::Less,
        (Some(a), Some(b)) => match (a, b) {
            (Value::Number(x), Value::Number(y)) => {
                let x = x.as_f64().unwrap_or(0.0);
                let y = y.as_f64().unwrap_or(0.0);
                x.partial_cmp(&y).unwrap_or(Ordering::Equal)
            }
            (Value::String(x), Value::String(y)) => {
                collation_key(x).cmp(&collation_key(y)).then_with(|| x.cmp(y))
            }
            (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
            _ => Ordering::Equal,
        },
    };
    match direction {
        SortDirection::Ascending => ord,
        SortDirection::Descending => ord.reverse(),
    }
}

/// Lowercases and strips Latin diacritics so "Ángel" sorts with the a's.
fn collation_key(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).map(fold_accent).collect()
}

fn fold_accent(ch: char) -> char {
    match ch {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => 'a',
        'ç' | 'ć' | 'ĉ' | 'č' => 'c',
        'ď' | 'đ' => 'd',
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' | 'ě' => 'e',
        'ğ' | 'ģ' => 'g',
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'į' | 'ı' => 'i',
        'ķ' => 'k',
        'ł' | 'ľ' | 'ļ' => 'l',
        'ñ' | 'ń' | 'ň' | 'ņ' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ő' => 'o',
        'ř' | 'ŕ' => 'r',
        'ś' | 'š' | 'ş' | 'ș' => 's',
        'ť' | 'ţ' | 'ț' => 't',
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' | 'ų' => 'u',
        'ý' | 'ÿ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        other => other,
    }
}

const ARGENTINA: &str = "Argentina";
const FRANCE: &str = "France";
const CROATIA: &str = "Croatia";

fn seed_countries() -> Vec<Value> {
    [
        (1, ARGENTINA, 1),
        (2, FRANCE, 4),
        (3, CROATIA, 12),
    ]
    .into_iter()
    .map(|(id, name, fifa_ranking)| json!({ "id": id, "name": name, "fifa_ranking": fifa_ranking }))
    .collect()
}

fn seed_players() -> Vec<Value> {
    let players: [(u32, &str, &str, &str, Option<u32>); 15] = [
        (1, "Lionel Messi", "Forward", ARGENTINA, Some(7)),
        (2, "Julián Álvarez", "Forward", ARGENTINA, Some(4)),
        (3, "Ángel Di María", "Midfielder", ARGENTINA, None),
        (4, "Emiliano Martínez", "Goalkeeper", ARGENTINA, None),
        (5, "Nicolás Otamendi", "Defender", ARGENTINA, None),
        (6, "Kylian Mbappé", "Forward", FRANCE, Some(8)),
        (7, "Olivier Giroud", "Forward", FRANCE, Some(4)),
        (8, "Antoine Griezmann", "Midfielder", FRANCE, None),
        (9, "Hugo Lloris", "Goalkeeper", FRANCE, None),
        (10, "Raphaël Varane", "Defender", FRANCE, None),
        (11, "Luka Modrić", "Midfielder", CROATIA, Some(1)),
        (12, "Ivan Perišić", "Forward", CROATIA, None),
        (13, "Andrej Kramarić", "Forward", CROATIA, Some(2)),
        (14, "Dominik Livaković", "Goalkeeper", CROATIA, None),
        (15, "Joško Gvardiol", "Defender", CROATIA, None),
    ];
    players
        .into_iter()
        .map(|(id, name, position, country, goals)| {
            let top_scorers: Vec<Value> = goals.map(|g| json!({ "goals": g })).into_iter().collect();
            json!({
                "id": id,
                "name": name,
                "position": position,
                "country": { "name": country },
                "top_scorers": top_scorers,
            })
        })
        .collect()
}

fn seed_matches() -> Vec<Value> {
    [
        (1, ARGENTINA, FRANCE, 3, 3, "2022-12-18", "Lusail Stadium"),
        (2, ARGENTINA, CROATIA, 3, 0, "2022-12-13", "Lusail Stadium"),
        (3, FRANCE, CROATIA, 2, 1, "2022-12-14", "Al Bayt Stadium"),
    ]
    .into_iter()
    .map(|(id, home, away, home_score, away_score, date, stadium)| {
        json!({
            "id": id,
            "home_team": { "name": home },
            "away_team": { "name": away },
            "home_score": home_score,
            "away_score": away_score,
            "match_date": date,
            "stadium": stadium,
        })
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inner_joins_reads_relation_names() {
        assert_eq!(
            inner_joins("name,country:countries(name),top_scorers!inner(goals)"),
            vec!["top_scorers"]
        );
        assert!(inner_joins("id,top_scorers(goals)").is_empty());
    }

    #[test]
    fn sort_key_reaches_into_embedded_arrays() {
        let row = json!({ "name": "A", "top_scorers": [{ "goals": 3 }] });
        assert_eq!(sort_key(&row, "top_scorers(goals)"), Some(&json!(3)));
        assert_eq!(sort_key(&row, "name"), Some(&json!("A")));
        assert_eq!(sort_key(&json!({ "top_scorers": [] }), "top_scorers(goals)"), None);
    }

    #[test]
    fn accented_names_sort_with_their_base_letter() {
        let angel = json!("Ángel Di María");
        let antoine = json!("Antoine Griezmann");
        let andrej = json!("Andrej Kramarić");
        assert_eq!(
            compare_values(Some(&angel), Some(&antoine), SortDirection::Ascending),
            Ordering::Less
        );
        assert_eq!(
            compare_values(Some(&andrej), Some(&angel), SortDirection::Ascending),
            Ordering::Less
        );
        assert_eq!(collation_key("Joško Gvardiol"), "josko gvardiol");
    }

    #[test]
    fn nulls_sort_last_in_both_directions() {
        let one = json!(1);
        assert_eq!(
            compare_values(None, Some(&one), SortDirection::Ascending),
            Ordering::Greater
        );
        assert_eq!(
            compare_values(None, Some(&one), SortDirection::Descending),
            Ordering::Greater
        );
    }
}
