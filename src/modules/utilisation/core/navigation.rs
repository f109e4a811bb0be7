use crate::modules::utilisation::core::window::{DisplayWindow, MAX_WEEK_COUNT};
use chrono::NaiveDate;
use serde::Serialize;
use url::form_urlencoded;

pub const HIDE_FULLY_SCHEDULED_PARAM: &str = "hide_fully_scheduled_projects";

/// Query strings for moving the window around, relative to the current page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationLinks {
    pub week_start_change: String,
    pub week_before: String,
    pub week_after: String,
    pub this_week: String,
    pub this_month: String,
    pub week_more: String,
    pub week_less: String,
    pub week_count_change: String,
    pub force_refresh: String,
    pub pdf_download: String,
    pub account_base: String,
}

impl NavigationLinks {
    pub fn build(
        window: &DisplayWindow,
        today: NaiveDate,
        hide_fully_scheduled: bool,
        account_base_url: &str,
    ) -> Self {
        let start = window.starting_day().format("%Y-%m-%d").to_string();
        let count = window.week_count().to_string();
        let shifted = |weeks: i64| {
            window
                .shifted_by_weeks(weeks)
                .map(|day| day.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| start.clone())
        };
        let query = |week_start: Option<&str>, week_count: Option<&str>| {
            query_string(week_start, week_count, hide_fully_scheduled, &[])
        };

        Self {
            // the new start date is appended by the page
            week_start_change: query_string(
                None,
                Some(&count),
                hide_fully_scheduled,
                &[("week_start", "")],
            ),
            week_before: query(Some(&shifted(-1)), Some(&count)),
            week_after: query(Some(&shifted(1)), Some(&count)),
            this_week: query(Some(&today.format("%Y-%m-%d").to_string()), Some(&count)),
            this_month: query(None, Some(&count)),
            week_more: query(
                Some(&start),
                Some(&(window.week_count() + 1).min(MAX_WEEK_COUNT).to_string()),
            ),
            week_less: query(
                Some(&start),
                Some(&window.week_count().saturating_sub(1).max(1).to_string()),
            ),
            week_count_change: query(Some(&start), Some("")),
            force_refresh: query(Some(&start), Some(&count)),
            pdf_download: pdf_download_url(window, account_base_url),
            account_base: account_base_url.to_string(),
        }
    }
}

fn query_string(
    week_start: Option<&str>,
    week_count: Option<&str>,
    hide_fully_scheduled: bool,
    trailing: &[(&str, &str)],
) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    if let Some(week_start) = week_start {
        serializer.append_pair("week_start", week_start);
    }
    if let Some(week_count) = week_count {
        serializer.append_pair("week_count", week_count);
    }
    if hide_fully_scheduled {
        serializer.append_pair(HIDE_FULLY_SCHEDULED_PARAM, "");
    }
    for (key, value) in trailing {
        serializer.append_pair(key, value);
    }
    format!("?{}", serializer.finish())
}

/// The planner's own printable view of the same period.
pub fn pdf_download_url(window: &DisplayWindow, account_base_url: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("range_start", &window.starting_day().format("%Y-%m-%d").to_string())
        .append_pair("days", &window.day_count().to_string())
        .append_pair("group_id", "")
        .append_pair("project_ids", "")
        .append_pair("no_project", "0")
        .finish();
    format!("{account_base_url}planner/pdf?{query}")
}
