//! Client-side search, sort and pagination over a fetched contact list.
//!
//! Everything here is a pure function of its inputs; callers recompute the
//! view explicitly after each change instead of relying on reactivity.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::contacts::repo_types::Contact;

pub const DEFAULT_PAGE_SIZE: usize = 3;
const MAX_VISIBLE_PAGES: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    #[default]
    Name,
    Email,
    Phone,
    CreatedAt,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactFilters {
    #[serde(default)]
    pub search_query: String,
    #[serde(default)]
    pub sort_by: SortBy,
    #[serde(default)]
    pub sort_order: SortOrder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchStats {
    pub total: usize,
    pub filtered: usize,
    pub has_search: bool,
    pub is_filtered: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactView {
    pub items: Vec<Contact>,
    pub stats: SearchStats,
    pub current_page: usize,
    pub total_pages: usize,
    pub page_size: usize,
    /// 1-based index of the first item shown, 0 when nothing is shown.
    pub start_item: usize,
    pub end_item: usize,
    pub page_numbers: Vec<usize>,
}

fn matches(contact: &Contact, needle: &str) -> bool {
    [&contact.name, &contact.email, &contact.phone, &contact.address]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

fn compare(a: &Contact, b: &Contact, sort_by: SortBy) -> Ordering {
    let text = |x: &str, y: &str| x.to_lowercase().cmp(&y.to_lowercase());
    match sort_by {
        SortBy::Name => text(&a.name, &b.name),
        SortBy::Email => text(&a.email, &b.email),
        SortBy::Phone => text(&a.phone, &b.phone),
        SortBy::CreatedAt => a.created_at.cmp(&b.created_at),
    }
}

/// Applies the search query, then sorts. Descending order flips the
/// comparison, so equal keys keep their relative order in both directions.
pub fn filter_and_sort(contacts: &[Contact], filters: &ContactFilters) -> Vec<Contact> {
    let needle = filters.search_query.trim().to_lowercase();
    let mut out: Vec<Contact> = if needle.is_empty() {
        contacts.to_vec()
    } else {
        contacts
            .iter()
            .filter(|c| matches(c, &needle))
            .cloned()
            .collect()
    };
    out.sort_by(|a, b| {
        let ord = compare(a, b, filters.sort_by);
        match filters.sort_order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });
    out
}

pub fn search_stats(total: usize, filtered: usize, filters: &ContactFilters) -> SearchStats {
    let has_search = !filters.search_query.trim().is_empty();
    SearchStats {
        total,
        filtered,
        has_search,
        is_filtered: has_search || filtered != total,
    }
}

pub fn total_pages(items: usize, page_size: usize) -> usize {
    items.div_ceil(page_size.max(1))
}

/// Pages outside `1..=total_pages` fall back to the first page.
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    if page == 0 || page > total_pages {
        1
    } else {
        page
    }
}

pub fn paginate<T>(items: &[T], page_size: usize, page: usize) -> &[T] {
    let size = page_size.max(1);
    let start = (page.saturating_sub(1)).saturating_mul(size).min(items.len());
    let end = start.saturating_add(size).min(items.len());
    &items[start..end]
}

/// Up to five page numbers around `current`, shifted to stay in range.
pub fn page_window(current: usize, total_pages: usize) -> Vec<usize> {
    if total_pages == 0 {
        return Vec::new();
    }
    let mut start = current.saturating_sub(MAX_VISIBLE_PAGES / 2).max(1);
    let end = (start + MAX_VISIBLE_PAGES - 1).min(total_pages);
    if end + 1 - start < MAX_VISIBLE_PAGES {
        start = (end + 1).saturating_sub(MAX_VISIBLE_PAGES).max(1);
    }
    (start..=end).collect()
}

pub fn compute_view(
    contacts: &[Contact],
    filters: &ContactFilters,
    page: usize,
    page_size: usize,
) -> ContactView {
    let page_size = page_size.max(1);
    let filtered = filter_and_sort(contacts, filters);
    let stats = search_stats(contacts.len(), filtered.len(), filters);
    let total_pages = total_pages(filtered.len(), page_size);
    let current_page = clamp_page(page, total_pages);
    let items = paginate(&filtered, page_size, current_page).to_vec();

    let start_item = if items.is_empty() {
        0
    } else {
        (current_page - 1) * page_size + 1
    };
    let end_item = (current_page * page_size).min(filtered.len());

    ContactView {
        page_numbers: page_window(current_page, total_pages),
        items,
        stats,
        current_page,
        total_pages,
        page_size,
        start_item,
        end_item,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{Duration, OffsetDateTime};
    use uuid::Uuid;

    fn contact(name: &str, minutes_ago: i64) -> Contact {
        let slug = name.to_lowercase();
        Contact {
            id: Uuid::new_v4(),
            name: name.into(),
            email: format!("{slug}@mail.com"),
            phone: format!("+{}", slug.len()),
            address: String::new(),
            user_id: Uuid::nil(),
            created_at: OffsetDateTime::UNIX_EPOCH + Duration::days(20_000) - Duration::minutes(minutes_ago),
        }
    }

    fn names(cs: &[Contact]) -> Vec<&str> {
        cs.iter().map(|c| c.name.as_str()).collect()
    }

    fn filters(q: &str, sort_by: SortBy, sort_order: SortOrder) -> ContactFilters {
        ContactFilters {
            search_query: q.into(),
            sort_by,
            sort_order,
        }
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let cs = vec![contact("Ana", 3), contact("Beto", 2), contact("Caro", 1)];
        let out = filter_and_sort(&cs, &filters("an", SortBy::Name, SortOrder::Asc));
        assert_eq!(names(&out), ["Ana"]);

        let out = filter_and_sort(&cs, &filters("  BETO@ ", SortBy::Name, SortOrder::Asc));
        assert_eq!(names(&out), ["Beto"]);
    }

    #[test]
    fn search_covers_address() {
        let mut cs = vec![contact("Ana", 3), contact("Beto", 2)];
        cs[1].address = "Calle Principal 123".into();
        let out = filter_and_sort(&cs, &filters("principal", SortBy::Name, SortOrder::Asc));
        assert_eq!(names(&out), ["Beto"]);
    }

    #[test]
    fn blank_query_keeps_everything() {
        let cs = vec![contact("Ana", 3), contact("Beto", 2)];
        assert_eq!(filter_and_sort(&cs, &filters("   ", SortBy::Name, SortOrder::Asc)).len(), 2);
    }

    #[test]
    fn sort_by_name_both_directions() {
        let cs = vec![contact("Beto", 1), contact("ana", 2), contact("Caro", 3)];
        let asc = filter_and_sort(&cs, &filters("", SortBy::Name, SortOrder::Asc));
        assert_eq!(names(&asc), ["ana", "Beto", "Caro"]);
        let desc = filter_and_sort(&cs, &filters("", SortBy::Name, SortOrder::Desc));
        assert_eq!(names(&desc), ["Caro", "Beto", "ana"]);
    }

    #[test]
    fn sort_by_created_at_uses_instants() {
        let cs = vec![contact("Mid", 5), contact("Old", 500), contact("New", 1)];
        let asc = filter_and_sort(&cs, &filters("", SortBy::CreatedAt, SortOrder::Asc));
        assert_eq!(names(&asc), ["Old", "Mid", "New"]);
    }

    #[test]
    fn descending_keeps_ties_in_place() {
        let mut a = contact("Same", 1);
        let mut b = contact("same", 2);
        a.email = "first@mail.com".into();
        b.email = "second@mail.com".into();
        let cs = vec![a, b];
        for order in [SortOrder::Asc, SortOrder::Desc] {
            let out = filter_and_sort(&cs, &filters("", SortBy::Name, order));
            assert_eq!(out[0].email, "first@mail.com");
        }
    }

    #[test]
    fn seven_items_three_per_page() {
        let cs: Vec<Contact> = (0..7).map(|i| contact(&format!("C{i}"), i)).collect();
        let f = ContactFilters::default();
        let sizes: Vec<usize> = (1..=3).map(|p| compute_view(&cs, &f, p, 3).items.len()).collect();
        assert_eq!(sizes, [3, 3, 1]);

        let view = compute_view(&cs, &f, 4, 3);
        assert_eq!(view.total_pages, 3);
        assert_eq!(view.current_page, 1);
        assert_eq!(view.items.len(), 3);
        assert_eq!((view.start_item, view.end_item), (1, 3));

        let last = compute_view(&cs, &f, 3, 3);
        assert_eq!((last.start_item, last.end_item), (7, 7));
    }

    #[test]
    fn empty_result_view() {
        let cs = vec![contact("Ana", 1)];
        let view = compute_view(&cs, &filters("zzz", SortBy::Name, SortOrder::Asc), 2, 3);
        assert!(view.items.is_empty());
        assert_eq!(view.total_pages, 0);
        assert_eq!(view.current_page, 1);
        assert_eq!((view.start_item, view.end_item), (0, 0));
        assert!(view.page_numbers.is_empty());
        assert_eq!(
            view.stats,
            SearchStats { total: 1, filtered: 0, has_search: true, is_filtered: true }
        );
    }

    #[test]
    fn page_window_stays_in_range() {
        assert_eq!(page_window(1, 3), [1, 2, 3]);
        assert_eq!(page_window(1, 10), [1, 2, 3, 4, 5]);
        assert_eq!(page_window(6, 10), [4, 5, 6, 7, 8]);
        assert_eq!(page_window(10, 10), [6, 7, 8, 9, 10]);
    }

    #[test]
    fn filters_deserialize_from_client_shape() {
        let f: ContactFilters =
            serde_json::from_str(r#"{"searchQuery":"an","sortBy":"createdAt","sortOrder":"desc"}"#)
                .unwrap();
        assert_eq!(f, filters("an", SortBy::CreatedAt, SortOrder::Desc));
    }
}
