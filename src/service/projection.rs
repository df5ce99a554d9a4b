//! Presentation order and filtering for the announcement and material lists.
//!
//! Both functions are pure: they never touch storage and may be called
//! from any number of handlers at once.

use serde::Serialize;

use crate::domain::{Announcement, Material, ModuleFilter, Role};

/// Pinned announcements first, newest first within each group. The sort is
/// stable, so equal timestamps keep their input order.
pub fn project_announcements(mut announcements: Vec<Announcement>) -> Vec<Announcement> {
    announcements.sort_by(|a, b| {
        b.pinned
            .cmp(&a.pinned)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
    announcements
}

/// Materials in `filter`'s module whose title or description contains
/// `query` (case-insensitive), newest first. An empty query matches all.
pub fn project_materials(materials: &[Material], filter: &ModuleFilter, query: &str) -> Vec<Material> {
    let query = query.to_lowercase();

    let mut view: Vec<Material> = materials
        .iter()
        .filter(|m| filter.matches(&m.module))
        .filter(|m| {
            query.is_empty()
                || m.title.to_lowercase().contains(&query)
                || m.desc.to_lowercase().contains(&query)
        })
        .cloned()
        .collect();

    view.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    view
}

/// A projected list as rendered for one caller.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListView<T> {
    pub items: Vec<T>,
    pub can_edit: bool,
    pub shown: usize,
    pub total: usize,
}

impl<T> ListView<T> {
    pub fn new(items: Vec<T>, total: usize, role: Role) -> Self {
        Self {
            shown: items.len(),
            items,
            can_edit: role.can_edit(),
            total,
        }
    }
}
