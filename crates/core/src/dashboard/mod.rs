//! In-memory filtering of a fetched document list by tab, search and page.
//!
//! [`DashboardState`] is a plain value: every interaction returns a new state
//! and [`DashboardState::view`] recomputes the visible slice from scratch.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::approval::{ApprovalStage, ApprovalStatus};
use crate::domain::document::DocumentSummary;
use crate::format::dates::{display_date, iso_date_of};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Anything a dashboard can list.
pub trait DashboardItem {
    fn status(&self) -> ApprovalStatus;

    /// Text matched by a search on `field`. `SearchField::Any` should cover every field.
    fn search_text(&self, field: SearchField) -> String;
}

impl DashboardItem for DocumentSummary {
    fn status(&self) -> ApprovalStatus {
        self.status
    }

    fn search_text(&self, field: SearchField) -> String {
        match field {
            SearchField::DocumentNumber => self.document_number.clone(),
            SearchField::Counterparty => self.counterparty.clone(),
            SearchField::Date => self
                .document_date
                .map(|date| format!("{} {}", display_date(date), iso_date_of(date)))
                .unwrap_or_default(),
            SearchField::Status => self.status.as_str().to_string(),
            SearchField::Any => [
                SearchField::DocumentNumber,
                SearchField::Counterparty,
                SearchField::Date,
                SearchField::Status,
            ]
            .into_iter()
            .map(|field| self.search_text(field))
            .collect::<Vec<_>>()
            .join(" "),
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DashboardParseError {
    #[error("unknown dashboard tab `{0}`")]
    UnknownTab(String),
    #[error("unknown search field `{0}`")]
    UnknownSearchField(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "status", rename_all = "snake_case")]
pub enum Tab {
    All,
    /// Documents whose status is exactly this one.
    Status(ApprovalStatus),
    /// Documents at or beyond this stage and not branched off to rejection or revision.
    Reached(ApprovalStage),
}

impl Tab {
    pub fn matches(&self, status: ApprovalStatus) -> bool {
        match self {
            Self::All => true,
            Self::Status(expected) => status == *expected,
            Self::Reached(stage) => status.stage().is_some_and(|current| current >= *stage),
        }
    }
}

impl FromStr for Tab {
    type Err = DashboardParseError;

    /// `all`, any status spelling, or `reached:<status>`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }

        let unknown = || DashboardParseError::UnknownTab(value.to_string());
        if let Some((prefix, status)) = trimmed.split_once(':') {
            if !prefix.trim().eq_ignore_ascii_case("reached") {
                return Err(unknown());
            }
            let status: ApprovalStatus = status.parse().map_err(|_| unknown())?;
            return status.stage().map(Self::Reached).ok_or_else(unknown);
        }

        trimmed.parse().map(Self::Status).map_err(|_| unknown())
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Status(status) => f.write_str(status.as_str()),
            Self::Reached(stage) => write!(f, "reached:{}", stage.status()),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchField {
    DocumentNumber,
    Counterparty,
    Date,
    Status,
    #[default]
    Any,
}

impl FromStr for SearchField {
    type Err = DashboardParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized: String = value
            .trim()
            .chars()
            .filter(|ch| !matches!(ch, '_' | '-' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "documentnumber" | "number" | "docnum" => Ok(Self::DocumentNumber),
            "counterparty" | "customer" | "employee" | "vendor" | "name" => Ok(Self::Counterparty),
            "date" => Ok(Self::Date),
            "status" => Ok(Self::Status),
            "any" | "" => Ok(Self::Any),
            _ => Err(DashboardParseError::UnknownSearchField(value.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Search {
    pub term: String,
    pub field: SearchField,
}

impl Search {
    /// `None` for a blank term, which clears the search.
    pub fn new(term: impl Into<String>, field: SearchField) -> Option<Self> {
        let term = term.into();
        let term = term.trim();
        (!term.is_empty()).then(|| Self { term: term.to_string(), field })
    }

    pub fn matches<T: DashboardItem>(&self, item: &T) -> bool {
        item.search_text(self.field).to_lowercase().contains(&self.term.to_lowercase())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardState {
    pub tab: Tab,
    pub page: usize,
    pub page_size: usize,
    pub search: Option<Search>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow {
    pub start_item: usize,
    pub end_item: usize,
    pub total_items: usize,
    pub current_page: usize,
    pub total_pages: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub total: usize,
    pub by_status: BTreeMap<ApprovalStatus, usize>,
}

impl StatusCounts {
    pub fn tally<T: DashboardItem>(items: &[T]) -> Self {
        let mut counts = Self { total: items.len(), by_status: BTreeMap::new() };
        for item in items {
            *counts.by_status.entry(item.status()).or_insert(0) += 1;
        }
        counts
    }

    pub fn count(&self, status: ApprovalStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DashboardView<T> {
    pub items: Vec<T>,
    pub window: PageWindow,
    pub counts: StatusCounts,
}

impl DashboardState {
    pub fn new(page_size: usize) -> Self {
        Self { tab: Tab::All, page: 1, page_size: page_size.max(1), search: None }
    }

    pub fn switch_tab(&self, tab: Tab) -> Self {
        Self { tab, page: 1, ..self.clone() }
    }

    pub fn search(&self, search: Option<Search>) -> Self {
        Self { search, page: 1, ..self.clone() }
    }

    /// Moves to `page` when it lies within the filtered result; otherwise the state is unchanged.
    pub fn change_page<T: DashboardItem>(&self, items: &[T], page: usize) -> Self {
        let total_pages = self.total_pages(self.filtered_len(items));
        if page == 0 || page > total_pages.max(1) {
            return self.clone();
        }
        Self { page, ..self.clone() }
    }

    pub fn includes<T: DashboardItem>(&self, item: &T) -> bool {
        self.tab.matches(item.status())
            && self.search.as_ref().map_or(true, |search| search.matches(item))
    }

    pub fn view<T: DashboardItem + Clone>(&self, items: &[T]) -> DashboardView<T> {
        let filtered: Vec<&T> = items.iter().filter(|item| self.includes(*item)).collect();
        let total_items = filtered.len();
        let total_pages = self.total_pages(total_items);
        let current_page = self.page.clamp(1, total_pages.max(1));

        let start = (current_page - 1) * self.page_size;
        let end = (current_page * self.page_size).min(total_items);
        let page_items: Vec<T> =
            filtered.get(start..end).unwrap_or_default().iter().map(|item| (*item).clone()).collect();

        let window = PageWindow {
            start_item: if total_items == 0 { 0 } else { start + 1 },
            end_item: end,
            total_items,
            current_page,
            total_pages,
            has_previous: current_page > 1,
            has_next: current_page < total_pages,
        };

        DashboardView { items: page_items, window, counts: StatusCounts::tally(items) }
    }

    fn filtered_len<T: DashboardItem>(&self, items: &[T]) -> usize {
        items.iter().filter(|item| self.includes(*item)).count()
    }

    fn total_pages(&self, total_items: usize) -> usize {
        total_items.div_ceil(self.page_size)
    }
}
