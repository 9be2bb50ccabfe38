// SPDX-FileCopyrightText: 2026 Dormwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Name extraction from sign-up list pages.

use std::collections::BTreeSet;
use std::time::Duration;

use async_trait::async_trait;
use dormwatch_core::DormwatchError;
use scraper::{Html, Selector};
use tracing::{debug, info};

/// Names still pending on the daily list (the active block is excluded).
pub const PENDING_SELECTOR: &str = "div.name-list:not(.name-active) .name";

/// Names on the approved-absence list.
pub const APPROVED_SELECTOR: &str = "div.name-active.name-list .name";

/// Container present on every list page that has sign-up data.
const LIST_CONTAINER: &str = ".name-list";

/// Extracts trimmed, non-empty names matching `selector`.
///
/// A page without any name list container carries no sign-up information
/// and yields an empty set.
pub fn extract_names(html: &str, selector: &str) -> Result<BTreeSet<String>, DormwatchError> {
    let name_selector = parse_selector(selector)?;
    let container = parse_selector(LIST_CONTAINER)?;

    let document = Html::parse_document(html);
    if document.select(&container).next().is_none() {
        return Ok(BTreeSet::new());
    }

    Ok(document
        .select(&name_selector)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|name| !name.is_empty())
        .collect())
}

fn parse_selector(selector: &str) -> Result<Selector, DormwatchError> {
    Selector::parse(selector).map_err(|e| DormwatchError::Parse {
        message: format!("invalid CSS selector {selector:?}: {e}"),
    })
}

/// Where sign-up lists come from.
#[async_trait]
pub trait RosterSource: Send + Sync {
    /// Names on the page at `url` matching `selector`.
    async fn fetch_names(
        &self,
        url: &str,
        selector: &str,
    ) -> Result<BTreeSet<String>, DormwatchError>;
}

/// Fetches list pages over HTTP and parses the returned HTML.
#[derive(Debug, Clone)]
pub struct HttpRosterSource {
    client: reqwest::Client,
}

impl HttpRosterSource {
    pub fn new(timeout: Duration) -> Result<Self, DormwatchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DormwatchError::http(format!("failed to build HTTP client: {e}"), e))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl RosterSource for HttpRosterSource {
    async fn fetch_names(
        &self,
        url: &str,
        selector: &str,
    ) -> Result<BTreeSet<String>, DormwatchError> {
        debug!(url, selector, "fetching sign-up list");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DormwatchError::http(format!("failed to fetch {url}: {e}"), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DormwatchError::Http {
                message: format!("{url} returned HTTP {status}"),
                source: None,
            });
        }

        let html = response
            .text()
            .await
            .map_err(|e| DormwatchError::http(format!("failed to read {url}: {e}"), e))?;

        let names = extract_names(&html, selector)?;
        info!(url, count = names.len(), "sign-up list parsed");
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    const DAILY_PAGE: &str = r#"<html><body>
        <div class="name-list name-active">
            <span class="name">已打卡甲</span>
            <span class="name">已打卡乙</span>
        </div>
        <div class="name-list">
            <span class="name"> 张三 </span>
            <span class="name">李四</span>
            <span class="name">   </span>
            <span class="name">张三</span>
        </div>
    </body></html>"#;

    const APPROVED_PAGE: &str = r#"<html><body>
        <div class="name-active name-list"><span class="name">王五</span></div>
        <div class="name-list"><span class="name">未批准</span></div>
    </body></html>"#;

    fn names(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn pending_selector_skips_active_block() {
        let found = extract_names(DAILY_PAGE, PENDING_SELECTOR).unwrap();
        assert_eq!(found, names(&["张三", "李四"]));
    }

    #[test]
    fn approved_selector_takes_only_active_block() {
        let found = extract_names(APPROVED_PAGE, APPROVED_SELECTOR).unwrap();
        assert_eq!(found, names(&["王五"]));
    }

    #[test]
    fn page_without_list_is_empty() {
        let found = extract_names("<html><body><p>暂无报名信息</p></body></html>", PENDING_SELECTOR)
            .unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn invalid_selector_is_a_parse_error() {
        let err = extract_names(DAILY_PAGE, "div[").unwrap_err();
        assert!(matches!(err, DormwatchError::Parse { .. }));
    }

    #[tokio::test]
    async fn http_source_fetches_and_parses() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/c/daily"))
            .respond_with(ResponseTemplate::new(200).set_body_string(DAILY_PAGE))
            .expect(1)
            .mount(&server)
            .await;

        let source = HttpRosterSource::new(Duration::from_secs(5)).unwrap();
        let found = source
            .fetch_names(&format!("{}/c/daily", server.uri()), PENDING_SELECTOR)
            .await
            .unwrap();
        assert_eq!(found, names(&["张三", "李四"]));
    }

    #[tokio::test]
    async fn http_source_reports_error_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let source = HttpRosterSource::new(Duration::from_secs(5)).unwrap();
        let err = source
            .fetch_names(&server.uri(), PENDING_SELECTOR)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("404"), "got: {err}");
    }
}
