//! URL construction for both providers
//!
//! Einstein@Home page URLs are built by plain string concatenation, the way
//! the site links them; the World Community Grid API URL is built with proper
//! query encoding.

use url::Url;

/// Path suffix of a host's task list, appended after the host id
pub const HOST_TASKS_SUFFIX: &str = "/tasks/0/0";

/// Builds the first task page URL of an Einstein@Home host
///
/// # Example
///
/// ```
/// use boinc_ingest::url::host_results_url;
///
/// assert_eq!(
///     host_results_url("https://einsteinathome.org/host/", "12345"),
///     "https://einsteinathome.org/host/12345/tasks/0/0"
/// );
/// ```
pub fn host_results_url(base_url: &str, host_id: &str) -> String {
    format!("{}{}{}", base_url, host_id, HOST_TASKS_SUFFIX)
}

/// Returns the query suffix (`?...`) of a pager link, if it has one
pub fn query_suffix(href: &str) -> Option<&str> {
    href.find('?').map(|i| &href[i..])
}

/// Builds the URL of an additional task page
///
/// The pager link's query suffix is appended to the host's first page URL.
/// It is not resolved relative to the page the link was found on.
pub fn pager_page_url(first_page_url: &str, query: &str) -> String {
    format!("{}{}", first_page_url, query)
}

/// Builds a results API URL for one offset/limit window
///
/// # Example
///
/// ```
/// use boinc_ingest::url::api_results_url;
///
/// let url = api_results_url("https://www.worldcommunitygrid.org", "alice", "ABC", 240, 250).unwrap();
/// assert_eq!(
///     url.as_str(),
///     "https://www.worldcommunitygrid.org/api/members/profile/alice/results?code=ABC&offset=240&limit=250"
/// );
/// ```
pub fn api_results_url(
    api_url: &str,
    username: &str,
    api_code: &str,
    offset: u32,
    limit: u32,
) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(api_url)?;

    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?;
        segments
            .pop_if_empty()
            .extend(["api", "members", "profile", username, "results"]);
    }

    url.query_pairs_mut()
        .append_pair("code", api_code)
        .append_pair("offset", &offset.to_string())
        .append_pair("limit", &limit.to_string());

    Ok(url)
}
