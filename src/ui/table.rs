use tabled::{settings::Style, Table, Tabled};

use crate::model::User;
use crate::storage::{DbStats, NoteSummary};

#[derive(Tabled)]
struct StatRow {
    #[tabled(rename = "Table")]
    label: &'static str,
    #[tabled(rename = "Rows")]
    count: usize,
}

#[derive(Tabled)]
struct NoteRow {
    #[tabled(rename = "Alias")]
    alias: String,
    #[tabled(rename = "Public id")]
    public_id: String,
    #[tabled(rename = "Owner")]
    owner: String,
    #[tabled(rename = "Revisions")]
    revisions: usize,
}

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Display name")]
    display_name: String,
    #[tabled(rename = "Notes")]
    notes: usize,
}

fn render<T: Tabled>(rows: Vec<T>) -> String {
    if rows.is_empty() {
        return String::new();
    }
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn stats_table(stats: &DbStats) -> String {
    render(
        stats
            .rows()
            .into_iter()
            .map(|(label, count)| StatRow { label, count })
            .collect(),
    )
}

pub fn notes_table(notes: &[NoteSummary]) -> String {
    render(
        notes
            .iter()
            .map(|n| NoteRow {
                alias: n.primary_alias.clone().unwrap_or_else(|| "-".to_string()),
                public_id: n.public_id.clone(),
                owner: n.owner.clone().unwrap_or_else(|| "-".to_string()),
                revisions: n.revisions,
            })
            .collect(),
    )
}

pub fn users_table(users: &[User]) -> String {
    render(
        users
            .iter()
            .map(|u| UserRow {
                username: u.username.clone(),
                display_name: u.display_name.clone(),
                notes: u.owned_notes.len(),
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_listing_renders_nothing() {
        assert!(notes_table(&[]).is_empty());
        assert!(users_table(&[]).is_empty());
    }

    #[test]
    fn test_notes_table_marks_missing_alias() {
        let rendered = notes_table(&[NoteSummary {
            public_id: "0123456789abcdef0123".to_string(),
            primary_alias: None,
            owner: Some("hardcoded".to_string()),
            revisions: 1,
        }]);
        assert!(rendered.contains("hardcoded"));
        assert!(rendered.contains("0123456789abcdef0123"));
    }
}
