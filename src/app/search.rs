use crate::api::models::Peptide;

/// Suggestions shown while the query is empty.
pub const PREVIEW_LIMIT: usize = 50;
/// Suggestions shown for a non-empty query.
pub const MATCH_LIMIT: usize = 80;

pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Compounds to suggest for `query`: a bounded preview of the catalog when
/// the query is blank, otherwise title/slug substring matches.
pub fn filter_catalog<'a>(catalog: &'a [Peptide], query: &str) -> Vec<&'a Peptide> {
    let q = normalize(query);
    if q.is_empty() {
        return catalog.iter().take(PREVIEW_LIMIT).collect();
    }

    catalog
        .iter()
        .filter(|p| normalize(&p.title).contains(&q) || normalize(&p.slug).contains(&q))
        .take(MATCH_LIMIT)
        .collect()
}
