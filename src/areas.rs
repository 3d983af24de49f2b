use std::collections::HashMap;

use crate::formats::Cover;
use crate::store::{RECENT_COVERS_LIMIT, RecordStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Area {
    pub name: String,
    pub count: usize,
}

impl Area {
    pub fn style(&self) -> AreaStyle {
        AreaStyle::for_name(&self.name)
    }

    /// `1 livro`, `3 livros`
    pub fn count_label(&self) -> String {
        let noun = if self.count == 1 { "livro" } else { "livros" };
        format!("{} {noun}", self.count)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaStyle {
    Classics,
    Leadership,
    Oratory,
    Default,
}

impl AreaStyle {
    pub fn for_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "classicos" => Self::Classics,
            "liderança" => Self::Leadership,
            "oratoria" => Self::Oratory,
            _ => Self::Default,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Self::Classics => "blue",
            Self::Leadership => "orange",
            Self::Oratory => "green",
            Self::Default => "purple",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Classics | Self::Default => "scale",
            Self::Leadership => "award",
            Self::Oratory => "message-square",
        }
    }
}

/// Groups area values by exact match, in first-seen order.
/// Missing and empty values are not grouped.
pub fn aggregate<'a, I>(areas: I) -> Vec<Area>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut out: Vec<Area> = Vec::new();
    for name in areas.into_iter().flatten() {
        if name.is_empty() {
            continue;
        }
        match index.get(name) {
            Some(&i) => out[i].count += 1,
            None => {
                index.insert(name, out.len());
                out.push(Area {
                    name: name.to_owned(),
                    count: 1,
                });
            }
        }
    }
    out
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AreaOverview {
    pub areas: Vec<Area>,
    pub recent_covers: Vec<Cover>,
}

/// Runs the covers and grouping queries concurrently. Either one failing
/// leaves its half of the overview empty.
pub async fn load_overview(store: &dyn RecordStore) -> AreaOverview {
    let (covers, names) = tokio::join!(
        store.list_recent_covers(RECENT_COVERS_LIMIT),
        store.list_area_names()
    );

    let recent_covers = covers.unwrap_or_else(|err| {
        tracing::error!(?err, "fetch recent covers failed");
        Vec::new()
    });
    let areas = match names {
        Ok(names) => aggregate(names.iter().map(|name| Some(name.as_str()))),
        Err(err) => {
            tracing::error!(?err, "fetch areas failed");
            Vec::new()
        }
    };

    tracing::debug!(areas = areas.len(), covers = recent_covers.len(), "loaded area overview");
    AreaOverview {
        areas,
        recent_covers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregate_counts_in_first_seen_order() {
        let areas = aggregate([Some("classicos"), Some("classicos"), Some("lideranca")]);
        assert_eq!(
            areas,
            vec![
                Area {
                    name: "classicos".to_owned(),
                    count: 2
                },
                Area {
                    name: "lideranca".to_owned(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn aggregate_is_case_sensitive_and_skips_missing() {
        let areas = aggregate([Some("Oratoria"), Some("oratoria"), None, Some("")]);
        assert_eq!(areas.len(), 2);
        assert_eq!(areas.iter().map(|a| a.count).sum::<usize>(), 2);
    }

    #[test]
    fn aggregate_total_matches_records_with_area() {
        let inputs = [
            vec![],
            vec![None, None],
            vec![Some("a"), Some("b"), Some("a"), None, Some("c"), Some("b")],
            vec![Some("x"); 17],
        ];
        for input in inputs {
            let expected = input.iter().filter(|a| a.is_some_and(|a| !a.is_empty())).count();
            let total: usize = aggregate(input.iter().copied()).iter().map(|a| a.count).sum();
            assert_eq!(total, expected);
        }
    }

    #[test]
    fn style_lookup_is_case_insensitive_with_default() {
        assert_eq!(AreaStyle::for_name("CLASSICOS"), AreaStyle::Classics);
        assert_eq!(AreaStyle::for_name("Liderança"), AreaStyle::Leadership);
        assert_eq!(AreaStyle::for_name("oratoria"), AreaStyle::Oratory);
        assert_eq!(AreaStyle::for_name("filosofia"), AreaStyle::Default);
        assert_eq!(AreaStyle::Default.color(), "purple");
    }

    #[test]
    fn count_label_pluralizes() {
        let one = Area {
            name: "a".to_owned(),
            count: 1,
        };
        let many = Area {
            name: "a".to_owned(),
            count: 4,
        };
        assert_eq!(one.count_label(), "1 livro");
        assert_eq!(many.count_label(), "4 livros");
    }
}
