//! Extension-search batching.
//!
//! The host's extension search box takes a space-separated id list of bounded
//! length, so long lists are shown in several searches.

/// Longest query shown in one search.
pub const MAX_SEARCH_CHARS: usize = 200;

/// Split `query` at the last space at or before char position
/// [`MAX_SEARCH_CHARS`]. Returns the first batch and the remainder, if any.
///
/// An id longer than the limit is never cut: the batch then ends at the first
/// space after it.
pub fn split_batch(query: &str) -> (&str, Option<&str>) {
    let Some((limit, _)) = query.char_indices().nth(MAX_SEARCH_CHARS) else {
        return (query, None);
    };

    let cut = if query[limit..].starts_with(' ') {
        Some(limit)
    } else {
        query[..limit].rfind(' ')
    }
    .or_else(|| query[limit..].find(' ').map(|i| limit + i));

    match cut {
        Some(i) => {
            let rest = &query[i + 1..];
            (&query[..i], (!rest.is_empty()).then_some(rest))
        }
        None => (query, None),
    }
}

/// All batches of `query`, in order.
pub fn search_batches(query: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut rest = Some(query);
    while let Some(q) = rest {
        let (head, tail) = split_batch(q);
        out.push(head.to_string());
        rest = tail;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("publisher.ext-{i:02}")).collect()
    }

    #[test]
    fn short_query_is_one_batch() {
        assert_eq!(split_batch("a.b c.d"), ("a.b c.d", None));
        assert_eq!(split_batch(""), ("", None));
    }

    #[test]
    fn exactly_limit_is_not_split() {
        let q = "x".repeat(MAX_SEARCH_CHARS);
        assert_eq!(split_batch(&q), (q.as_str(), None));
    }

    #[test]
    fn long_query_splits_into_rejoinable_batches() {
        let full = ids(30).join(" ");
        assert!(full.len() > MAX_SEARCH_CHARS);

        let batches = search_batches(&full);
        assert_eq!(batches.len(), 3);
        assert_eq!(batches.join(" "), full);
        for b in &batches {
            assert!(b.chars().count() <= MAX_SEARCH_CHARS);
            assert!(b.split(' ').all(|id| id.starts_with("publisher.ext-") && id.len() == 16));
        }
    }

    #[test]
    fn space_exactly_at_limit_is_used() {
        let head = "a".repeat(MAX_SEARCH_CHARS);
        let q = format!("{head} tail.ext");
        assert_eq!(split_batch(&q), (head.as_str(), Some("tail.ext")));
    }

    #[test]
    fn oversized_id_is_kept_whole() {
        let giant = "g".repeat(MAX_SEARCH_CHARS + 20);
        let q = format!("{giant} next.ext");
        assert_eq!(split_batch(&q), (giant.as_str(), Some("next.ext")));
        assert_eq!(split_batch(&giant), (giant.as_str(), None));
    }
}
