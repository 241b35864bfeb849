//! PDF reports rendered by the expense API.
//!
//! The client only picks the period and streams the API's PDF back to the
//! browser as a download.

use std::{fmt::Display, str::FromStr};

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Redirect, Response},
};
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    AppState, Error,
    api::ApiClient,
    auth::{Session, SessionManager},
    dashboard::DashboardNotice,
    endpoints,
    html::{CLOSE_MODAL_SCRIPT, modal},
};

/// The time span covered by a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportPeriod {
    /// The last seven days.
    Weekly,
    /// Monday of this week up to today.
    CurrentWeek,
    /// The last thirty days.
    Monthly,
    /// The first of this month up to today.
    CurrentMonth,
    /// The last 365 days.
    Yearly,
}

impl ReportPeriod {
    /// Every period in the order they are offered to the user.
    pub const ALL: [ReportPeriod; 5] = [
        ReportPeriod::Weekly,
        ReportPeriod::CurrentWeek,
        ReportPeriod::Monthly,
        ReportPeriod::CurrentMonth,
        ReportPeriod::Yearly,
    ];

    /// The value the API expects for the `period` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportPeriod::Weekly => "weekly",
            ReportPeriod::CurrentWeek => "current_week",
            ReportPeriod::Monthly => "monthly",
            ReportPeriod::CurrentMonth => "current_month",
            ReportPeriod::Yearly => "yearly",
        }
    }

    /// The name shown in the period picker.
    pub fn label(&self) -> &'static str {
        match self {
            ReportPeriod::Weekly => "Last 7 Days",
            ReportPeriod::CurrentWeek => "Current Week",
            ReportPeriod::Monthly => "Last 30 Days",
            ReportPeriod::CurrentMonth => "Current Month",
            ReportPeriod::Yearly => "Last Year",
        }
    }

    /// The explanation shown below the label in the period picker.
    pub fn description(&self) -> &'static str {
        match self {
            ReportPeriod::Weekly => "Rolling weekly report",
            ReportPeriod::CurrentWeek => "Monday to today",
            ReportPeriod::Monthly => "Rolling monthly report",
            ReportPeriod::CurrentMonth => "1st to today",
            ReportPeriod::Yearly => "Last 365 days",
        }
    }

    /// The client route that downloads the report for this period.
    pub fn download_url(&self) -> String {
        format!("{}?period={}", endpoints::REPORT_PDF, self.as_str())
    }

    fn file_name(&self) -> String {
        format!("expense_report_{}.pdf", self.as_str())
    }
}

impl FromStr for ReportPeriod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportPeriod::ALL
            .into_iter()
            .find(|period| period.as_str() == s)
            .ok_or_else(|| Error::InvalidPeriod(s.to_owned()))
    }
}

impl Display for ReportPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The state needed to download a report.
#[derive(Debug, Clone)]
pub struct ReportState {
    /// The client that downloads the PDF.
    pub api: ApiClient,
    /// Logged out if the API rejects the token.
    pub sessions: SessionManager,
}

impl FromRef<AppState> for ReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
            sessions: state.sessions.clone(),
        }
    }
}

/// Render the modal for picking the report period.
pub async fn get_report_modal() -> Markup {
    let content = html! {
        ul class="space-y-2"
        {
            @for period in ReportPeriod::ALL {
                li
                {
                    a
                        href=(period.download_url())
                        onclick=(CLOSE_MODAL_SCRIPT)
                        class="block p-3 rounded-lg border border-gray-200
                            hover:bg-gray-100 dark:border-gray-600
                            dark:hover:bg-gray-700"
                    {
                        span class="block font-semibold" { (period.label()) }
                        span class="block text-sm text-gray-500 dark:text-gray-400"
                        {
                            (period.description())
                        }
                    }
                }
            }
        }
    };

    modal("Select Report Period", &content)
}

/// The query string of a report download.
#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    /// One of the values of [ReportPeriod::as_str].
    #[serde(default)]
    pub period: String,
}

/// Download the PDF report for the requested period.
///
/// The period is checked before the API is contacted, an unknown period
/// gets a 400 page. If the API cannot produce the report the browser is sent
/// back to the dashboard, which shows an error alert.
pub async fn download_report(
    State(state): State<ReportState>,
    Extension(session): Extension<Session>,
    Query(query): Query<ReportQuery>,
) -> Response {
    let period = match query.period.parse::<ReportPeriod>() {
        Ok(period) => period,
        Err(error) => {
            tracing::warn!("Rejected report request: {error}");
            return error.into_response();
        }
    };

    match state.api.download_report(&session.token, period).await {
        Ok(pdf) => {
            tracing::info!("Downloaded {period} report ({} bytes)", pdf.len());
            (
                [
                    (CONTENT_TYPE, "application/pdf".to_owned()),
                    (
                        CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", period.file_name()),
                    ),
                ],
                pdf,
            )
                .into_response()
        }
        Err(Error::Unauthorized) => {
            state.sessions.logout_if_current(&session);
            Error::Unauthorized.into_response()
        }
        Err(error) => {
            tracing::error!("Could not download the {period} report: {error}");
            Redirect::to(&DashboardNotice::ReportFailed.dashboard_url()).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        Extension,
        body::to_bytes,
        extract::{Query, State},
        http::{
            StatusCode,
            header::{CONTENT_DISPOSITION, CONTENT_TYPE},
        },
    };
    use scraper::{Html, Selector};
    use time::OffsetDateTime;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{any, header, method, path, query_param},
    };

    use crate::{
        Error,
        api::{ApiClient, test_api::unreachable_api},
        auth::{Session, SessionManager, token::test_tokens::make_token},
        endpoints,
        test_utils::assert_valid_html,
    };

    use super::{ReportPeriod, ReportQuery, ReportState, download_report, get_report_modal};

    fn logged_in(dir: &tempfile::TempDir) -> (SessionManager, Session) {
        let sessions = SessionManager::new(dir.path());
        let exp = OffsetDateTime::now_utc().unix_timestamp() + 3600;
        let session = sessions.activate(&make_token("alice", exp)).unwrap();

        (sessions, session)
    }

    fn query(period: &str) -> Query<ReportQuery> {
        Query(ReportQuery {
            period: period.to_owned(),
        })
    }

    #[test]
    fn parses_every_period() {
        for period in ReportPeriod::ALL {
            assert_eq!(period.as_str().parse::<ReportPeriod>(), Ok(period));
        }
    }

    #[test]
    fn rejects_unknown_period() {
        assert_eq!(
            "daily".parse::<ReportPeriod>(),
            Err(Error::InvalidPeriod("daily".to_owned()))
        );
    }

    #[tokio::test]
    async fn modal_lists_all_periods() {
        let markup = get_report_modal().await;

        let html = Html::parse_fragment(&markup.into_string());
        assert_valid_html(&html);
        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("Select Report Period"));

        let hrefs: Vec<_> = html
            .select(&Selector::parse("a[href]").unwrap())
            .filter_map(|link| link.value().attr("href"))
            .collect();
        assert_eq!(
            hrefs,
            vec![
                "/api/reports/pdf?period=weekly",
                "/api/reports/pdf?period=current_week",
                "/api/reports/pdf?period=monthly",
                "/api/reports/pdf?period=current_month",
                "/api/reports/pdf?period=yearly",
            ]
        );
        for period in ReportPeriod::ALL {
            assert!(text.contains(period.label()));
            assert!(text.contains(period.description()));
        }
    }

    #[tokio::test]
    async fn streams_pdf_as_attachment() {
        let dir = tempfile::tempdir().unwrap();
        let (sessions, session) = logged_in(&dir);
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/expenses/report/pdf"))
            .and(query_param("period", "current_week"))
            .and(header("authorization", format!("Bearer {}", session.token)))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.4".to_vec()))
            .expect(1)
            .mount(&server)
            .await;
        let state = ReportState {
            api: ApiClient::new(&server.uri()).unwrap(),
            sessions,
        };

        let response = download_report(State(state), Extension(session), query("current_week")).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "application/pdf"
        );
        assert_eq!(
            response.headers().get(CONTENT_DISPOSITION).unwrap(),
            "attachment; filename=\"expense_report_current_week.pdf\""
        );
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"%PDF-1.4");
    }

    #[tokio::test]
    async fn unknown_period_is_rejected_before_any_request() {
        let dir = tempfile::tempdir().unwrap();
        let (sessions, session) = logged_in(&dir);
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let state = ReportState {
            api: ApiClient::new(&server.uri()).unwrap(),
            sessions,
        };

        let response = download_report(State(state), Extension(session), query("daily")).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn expired_token_logs_out() {
        let dir = tempfile::tempdir().unwrap();
        let (sessions, session) = logged_in(&dir);
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/expenses/report/pdf"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        let state = ReportState {
            api: ApiClient::new(&server.uri()).unwrap(),
            sessions: sessions.clone(),
        };

        let response = download_report(State(state), Extension(session), query("yearly")).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get("location").unwrap(),
            endpoints::LOG_IN_VIEW
        );
        assert_eq!(sessions.current(), None);
    }

    #[tokio::test]
    async fn api_failure_returns_to_dashboard_with_notice() {
        let dir = tempfile::tempdir().unwrap();
        let (sessions, session) = logged_in(&dir);
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/expenses/report/pdf"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;
        let state = ReportState {
            api: ApiClient::new(&server.uri()).unwrap(),
            sessions: sessions.clone(),
        };

        let response =
            download_report(State(state), Extension(session.clone()), query("monthly")).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get("location").unwrap(),
            "/dashboard?notice=report_failed"
        );
        assert_eq!(sessions.current(), Some(session));
    }

    #[tokio::test]
    async fn unreachable_api_returns_to_dashboard_with_notice() {
        let dir = tempfile::tempdir().unwrap();
        let (sessions, session) = logged_in(&dir);
        let state = ReportState {
            api: unreachable_api(),
            sessions,
        };

        let response = download_report(State(state), Extension(session), query("weekly")).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get("location").unwrap(),
            "/dashboard?notice=report_failed"
        );
    }

    #[tokio::test]
    async fn rejected_token_of_replaced_session_keeps_new_session() {
        let dir = tempfile::tempdir().unwrap();
        let (sessions, alice) = logged_in(&dir);
        let exp = OffsetDateTime::now_utc().unix_timestamp() + 3600;
        let bob = sessions.activate(&make_token("bob", exp)).unwrap();
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/expenses/report/pdf"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        let state = ReportState {
            api: ApiClient::new(&server.uri()).unwrap(),
            sessions: sessions.clone(),
        };

        download_report(State(state), Extension(alice), query("yearly")).await;

        assert_eq!(sessions.current(), Some(bob));
    }
}
