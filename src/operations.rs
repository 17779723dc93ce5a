/// View projections over a snapshot: live filter, sort, password masking

use crate::credential::Credential;

pub const PASSWORD_MASK: &str = "• • • • • • • •";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Records whose URL contains `query`, ignoring case. An empty query keeps
/// everything.
pub fn filter_by_url<'a>(records: &'a [Credential], query: &str) -> Vec<&'a Credential> {
    if query.is_empty() {
        return records.iter().collect();
    }

    let needle = query.to_lowercase();
    records
        .iter()
        .filter(|record| record.url.to_lowercase().contains(&needle))
        .collect()
}

/// Sort by URL ignoring case; records with equal URLs keep their relative order
pub fn sort_by_url(records: &mut [&Credential], direction: SortDirection) {
    records.sort_by(|a, b| {
        let ordering = a.url.to_lowercase().cmp(&b.url.to_lowercase());
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

pub fn display_password(record: &Credential, revealed: bool) -> &str {
    if revealed { &record.password } else { PASSWORD_MASK }
}

/// Split `text` into runs, flagging the ones that match `query` (ASCII case
/// ignored). Concatenating the runs gives back `text`.
pub fn highlight_segments<'a>(text: &'a str, query: &str) -> Vec<(&'a str, bool)> {
    if query.is_empty() || text.is_empty() {
        return vec![(text, false)];
    }

    let haystack = text.as_bytes();
    let needle = query.as_bytes();
    let mut segments = Vec::new();
    let mut plain_from = 0;
    let mut at = 0;

    while at + needle.len() <= haystack.len() {
        let end = at + needle.len();
        if text.is_char_boundary(at) && text.is_char_boundary(end) && haystack[at..end].eq_ignore_ascii_case(needle) {
            if plain_from < at {
                segments.push((&text[plain_from..at], false));
            }
            segments.push((&text[at..end], true));
            at = end;
            plain_from = end;
        } else {
            at += 1;
        }
    }

    if plain_from < text.len() {
        segments.push((&text[plain_from..], false));
    }
    segments
}

/// Search text and sort order of the credential table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableView {
    pub query: String,
    pub sort: Option<SortDirection>,
}

impl TableView {
    pub fn project<'a>(&self, records: &'a [Credential]) -> Vec<&'a Credential> {
        let mut rows = filter_by_url(records, &self.query);
        if let Some(direction) = self.sort {
            sort_by_url(&mut rows, direction);
        }
        rows
    }

    /// Cycle the URL column through ascending, descending, unsorted
    pub fn cycle_sort(&mut self) {
        self.sort = match self.sort {
            None => Some(SortDirection::Ascending),
            Some(SortDirection::Ascending) => Some(SortDirection::Descending),
            Some(SortDirection::Descending) => None,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::CredentialId;

    fn create_test_record(id: u64, url: &str, username: &str) -> Credential {
        Credential {
            id: CredentialId::Number(id),
            url: url.to_string(),
            username: username.to_string(),
            password: format!("pw{}", id),
        }
    }

    fn ids(rows: &[&Credential]) -> Vec<u64> {
        rows.iter()
            .map(|r| match r.id {
                CredentialId::Number(n) => n,
                CredentialId::Text(_) => unreachable!(),
            })
            .collect()
    }

    fn sample() -> Vec<Credential> {
        vec![
            create_test_record(1, "https://GitHub.com/login", "me"),
            create_test_record(2, "https://example.com", "me"),
            create_test_record(3, "https://accounts.google.com", "me"),
            create_test_record(4, "https://example.com", "alt"),
        ]
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let records = sample();

        assert_eq!(ids(&filter_by_url(&records, "github")), vec![1]);
        assert_eq!(ids(&filter_by_url(&records, "EXAMPLE")), vec![2, 4]);
        assert_eq!(ids(&filter_by_url(&records, ".com")), vec![1, 2, 3, 4]);
        assert!(filter_by_url(&records, "nomatch").is_empty());
    }

    #[test]
    fn test_empty_query_keeps_everything() {
        let records = sample();
        assert_eq!(ids(&filter_by_url(&records, "")), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_sort_by_url_both_directions() {
        let records = sample();
        let mut rows: Vec<&Credential> = records.iter().collect();

        sort_by_url(&mut rows, SortDirection::Ascending);
        assert_eq!(ids(&rows), vec![3, 2, 4, 1]);

        sort_by_url(&mut rows, SortDirection::Descending);
        assert_eq!(ids(&rows), vec![1, 2, 4, 3]);
    }

    #[test]
    fn test_table_view_filters_then_sorts() {
        let records = sample();
        let view = TableView {
            query: "com".to_string(),
            sort: Some(SortDirection::Descending),
        };

        assert_eq!(ids(&view.project(&records)), vec![1, 2, 4, 3]);
        assert_eq!(ids(&TableView::default().project(&records)), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_cycle_sort() {
        let mut view = TableView::default();

        view.cycle_sort();
        assert_eq!(view.sort, Some(SortDirection::Ascending));
        view.cycle_sort();
        assert_eq!(view.sort, Some(SortDirection::Descending));
        view.cycle_sort();
        assert_eq!(view.sort, None);
        assert_eq!(SortDirection::Ascending.toggled(), SortDirection::Descending);
    }

    #[test]
    fn test_highlight_marks_each_match() {
        assert_eq!(
            highlight_segments("https://GitHub.com/github", "github"),
            vec![("https://", false), ("GitHub", true), (".com/", false), ("github", true)]
        );
        assert_eq!(highlight_segments("example.com", "EXAMPLE"), vec![("example", true), (".com", false)]);
    }

    #[test]
    fn test_highlight_without_match_is_one_plain_run() {
        assert_eq!(highlight_segments("https://example.com", ""), vec![("https://example.com", false)]);
        assert_eq!(highlight_segments("https://example.com", "zzz"), vec![("https://example.com", false)]);
        assert_eq!(highlight_segments("https://bücher.de", "ü"), vec![("https://b", false), ("ü", true), ("cher.de", false)]);
    }

    #[test]
    fn test_display_password_masks_until_revealed() {
        let record = create_test_record(1, "https://example.com", "me");

        assert_eq!(display_password(&record, false), PASSWORD_MASK);
        assert_eq!(display_password(&record, true), "pw1");
    }
}
