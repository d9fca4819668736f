//! HTML parser for Einstein@Home task pages
//!
//! This module handles parsing a host's task list page to extract:
//! - Finished task rows from the results table
//! - Pager links to the host's other task pages

use crate::metric::MetricPoint;
use crate::normalize::{normalize_html_row, RawHtmlRow, UNKNOWN_TIME};
use crate::url::query_suffix;
use scraper::{ElementRef, Html, Selector};

/// Body rows of the results table
const ROW_SELECTOR: &str = r#"table[class*="sticky-enabled"] tbody tr"#;

/// Links inside pager items
const PAGER_LINK_SELECTOR: &str = r#"ul[class*="pager"] li[class*="pager-item"] a[href]"#;

/// Extracted information from a task page
#[derive(Debug, Clone, Default)]
pub struct ParsedTaskPage {
    /// Points for every finished task on the page, in table order
    pub points: Vec<MetricPoint>,

    /// Body rows found in the results table
    pub rows: usize,

    /// Rows with too few cells
    pub short_rows: usize,

    /// Rows of tasks still in progress
    pub in_progress: usize,

    /// Points whose time cell could not be parsed
    pub undated: usize,

    /// Query suffixes of pager links, in document order
    pub pager_queries: Vec<String>,
}

/// Parses a task page into metric points
///
/// # Row Rules
///
/// **Include** a `tbody` row of a table whose class contains `sticky-enabled`
/// when it has at least 9 cells.
///
/// **Exclude** rows whose status cell reads exactly `In progress`.
///
/// A page without a results table yields no points; this is not an error.
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `host_name` - Value for the `DeviceName` tag
/// * `discover_pager` - Whether to collect pager links as well
///
/// # Example
///
/// ```
/// use boinc_ingest::crawler::parse_task_page;
///
/// let html = r#"<table class="sticky-enabled"><tbody><tr>
///   <td><a href="/task/1">TaskA</a></td><td></td><td>2024-01-01 00:00:00</td><td></td>
///   <td>Completed and validated</td><td>130</td><td>120.5</td><td>45.2</td><td>Einstein App</td>
/// </tr></tbody></table>"#;
///
/// let page = parse_task_page(html, "workstation", false);
/// assert_eq!(page.points.len(), 1);
/// assert_eq!(page.points[0].tag("Name"), Some("TaskA"));
/// ```
pub fn parse_task_page(html: &str, host_name: &str, discover_pager: bool) -> ParsedTaskPage {
    let document = Html::parse_document(html);
    let mut page = ParsedTaskPage::default();

    for row in extract_rows(&document) {
        page.rows += 1;

        let Some(raw) = row else {
            page.short_rows += 1;
            continue;
        };

        if raw.is_in_progress() {
            page.in_progress += 1;
            continue;
        }

        let point = normalize_html_row(&raw, host_name);
        if point.time == UNKNOWN_TIME {
            page.undated += 1;
        }
        page.points.push(point);
    }

    if discover_pager {
        page.pager_queries = extract_pager_queries(&document);
    }

    page
}

/// Extracts every results table row, `None` for rows with too few cells
fn extract_rows(document: &Html) -> Vec<Option<RawHtmlRow>> {
    let (Ok(row_selector), Ok(cell_selector), Ok(link_selector)) = (
        Selector::parse(ROW_SELECTOR),
        Selector::parse("td"),
        Selector::parse("a"),
    ) else {
        return Vec::new();
    };

    document
        .select(&row_selector)
        .map(|row| {
            let cells: Vec<ElementRef> = row.select(&cell_selector).collect();
            let texts: Vec<String> = cells.iter().map(|cell| element_text(cell)).collect();
            let name = cells
                .first()
                .and_then(|cell| cell.select(&link_selector).next())
                .map(|link| element_text(&link));

            RawHtmlRow::from_cells(&texts, name)
        })
        .collect()
}

/// Extracts the query suffixes of all pager item links
///
/// Links without a query string are skipped.
pub fn extract_pager_queries(document: &Html) -> Vec<String> {
    let Ok(selector) = Selector::parse(PAGER_LINK_SELECTOR) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|link| link.value().attr("href"))
        .filter_map(query_suffix)
        .map(str::to_string)
        .collect()
}

fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>()
}
