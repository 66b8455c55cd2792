use crate::models::entities::Influencer;

/// Union server-matched rows with candidates whose tags contain `query`.
///
/// Server rows keep their order and come first; tag matches follow in candidate
/// order, skipping ids already present. An empty query passes rows through.
pub fn refilter(
    query: &str,
    server_matched: Vec<Influencer>,
    candidates: &[Influencer],
) -> Vec<Influencer> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return server_matched;
    }

    let mut merged = server_matched;
    for candidate in candidates {
        if tags_match(candidate, &needle) && !merged.iter().any(|m| m.id == candidate.id) {
            merged.push(candidate.clone());
        }
    }
    merged
}

/// `needle` must already be lowercased.
pub fn tags_match(influencer: &Influencer, needle: &str) -> bool {
    influencer
        .tags
        .iter()
        .any(|tag| tag.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn influencer(id: &str, name: &str, tags: &[&str]) -> Influencer {
        Influencer {
            id: id.into(),
            name: name.into(),
            email: None,
            bio: None,
            category: None,
            location: None,
            platforms: BTreeMap::new(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            created_at: chrono::NaiveDateTime::default(),
            creator_stats: None,
        }
    }

    fn ids(rows: &[Influencer]) -> Vec<&str> {
        rows.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn unions_server_rows_with_tag_matches() {
        let baseline = vec![
            influencer("1", "Yoga Yara", &["Wellness"]),
            influencer("2", "Chef Cal", &["plant-based", "VEGAN"]),
            influencer("3", "Gamer Gus", &["esports"]),
        ];
        let server = vec![influencer("4", "Vegan Val", &[])];

        let merged = refilter("vegan", server, &baseline);
        assert_eq!(ids(&merged), vec!["4", "2"]);
    }

    #[test]
    fn rows_matched_both_ways_appear_once() {
        let row = influencer("1", "Vegan Val", &["vegan"]);
        let merged = refilter("Vegan", vec![row.clone()], &[row]);
        assert_eq!(ids(&merged), vec!["1"]);
    }

    #[test]
    fn empty_query_passes_through() {
        let baseline = vec![influencer("9", "Anyone", &["x"])];
        let server = vec![influencer("1", "A", &[]), influencer("2", "B", &[])];
        assert_eq!(ids(&refilter("  ", server, &baseline)), vec!["1", "2"]);
    }
}
