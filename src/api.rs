//! Typed HTTP client for the remote expense API.
//!
//! Every operation the client performs against the API goes through
//! [ApiClient], which attaches the bearer token and maps HTTP failures onto
//! [Error] variants.

use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode, header::CONTENT_TYPE};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    category::{Category, CategoryName},
    report::ReportPeriod,
    transaction::{Transaction, TransactionId, ValidatedTransaction},
};

/// How long to wait for the API before giving up on a request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The response body of a successful token request.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[allow(dead_code)]
    #[serde(default)]
    token_type: String,
}

/// The credentials sent to the token endpoint.
#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// The details of a new user account.
#[derive(Debug, Clone, Serialize)]
pub struct NewUser<'a> {
    /// The name used to log in.
    pub username: &'a str,
    /// The contact address, checked by the API.
    pub email: &'a str,
    /// The password in plain text, sent over HTTPS.
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
struct NewCategory<'a> {
    name: &'a CategoryName,
}

/// The error body returned by the API.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: ErrorDetail,
}

/// The API reports errors either as a single message or, for request
/// validation failures, as a list of messages.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorDetail {
    Message(String),
    Items(Vec<ErrorItem>),
}

#[derive(Debug, Deserialize)]
struct ErrorItem {
    msg: String,
}

impl ErrorDetail {
    fn into_message(self) -> String {
        match self {
            ErrorDetail::Message(message) => message,
            ErrorDetail::Items(items) => items
                .into_iter()
                .map(|item| item.msg)
                .collect::<Vec<_>>()
                .join("; "),
        }
    }
}

/// Extract the `detail` message from an error response body, if there is one.
fn error_detail(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|body| body.detail.into_message())
        .filter(|detail| !detail.is_empty())
}

/// A client for the expense API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    /// Create a client for the API served at `base_url`, e.g. "http://localhost:8000".
    ///
    /// # Errors
    /// Returns [Error::Fetch] if the underlying HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Exchange a username and password for a bearer token.
    ///
    /// # Errors
    /// - [Error::InvalidCredentials] if the API rejects the credentials.
    /// - [Error::Fetch] if the API cannot be reached.
    pub async fn issue_token(&self, username: &str, password: &str) -> Result<String, Error> {
        let body = serde_urlencoded::to_string(TokenRequest { username, password })
            .map_err(|error| Error::Fetch(format!("could not encode credentials: {error}")))?;

        let response = self
            .http
            .post(self.url("/token"))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::info!(
                "token request for {username} was rejected with {}",
                response.status()
            );
            return Err(Error::InvalidCredentials);
        }

        let token: TokenResponse = response.json().await?;

        Ok(token.access_token)
    }

    /// Create a user account.
    ///
    /// # Errors
    /// - [Error::Validation] with the API's explanation if it rejects the account.
    /// - [Error::Fetch] if the API cannot be reached.
    pub async fn register(&self, new_user: &NewUser<'_>) -> Result<(), Error> {
        let response = self
            .http
            .post(self.url("/register"))
            .json(new_user)
            .send()
            .await?;

        if response.status().is_success() {
            return Ok(());
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        tracing::info!("registration was rejected with {status}: {body}");

        Err(Error::Validation(
            error_detail(&body).unwrap_or_else(|| "Registration failed".to_owned()),
        ))
    }

    /// Get all of the user's transactions, with their categories embedded.
    pub async fn list_transactions(&self, token: &str) -> Result<Vec<Transaction>, Error> {
        let response = send(self.http.get(self.url("/expenses")).bearer_auth(token)).await?;

        Ok(response.json().await?)
    }

    /// Get all of the user's categories.
    pub async fn list_categories(&self, token: &str) -> Result<Vec<Category>, Error> {
        let response = send(self.http.get(self.url("/categories")).bearer_auth(token)).await?;

        Ok(response.json().await?)
    }

    /// Create a transaction and return it as stored by the API.
    pub async fn create_transaction(
        &self,
        token: &str,
        transaction: &ValidatedTransaction,
    ) -> Result<Transaction, Error> {
        let request = self
            .http
            .post(self.url("/expenses"))
            .bearer_auth(token)
            .json(transaction);

        Ok(send(request).await?.json().await?)
    }

    /// Replace the fields of the transaction with `id`.
    pub async fn update_transaction(
        &self,
        token: &str,
        id: TransactionId,
        transaction: &ValidatedTransaction,
    ) -> Result<Transaction, Error> {
        let request = self
            .http
            .put(self.url(&format!("/expenses/{id}")))
            .bearer_auth(token)
            .json(transaction);

        Ok(send(request).await?.json().await?)
    }

    /// Delete the transaction with `id`.
    pub async fn delete_transaction(&self, token: &str, id: TransactionId) -> Result<(), Error> {
        send(
            self.http
                .delete(self.url(&format!("/expenses/{id}")))
                .bearer_auth(token),
        )
        .await?;

        Ok(())
    }

    /// Create a category and return it as stored by the API.
    pub async fn create_category(
        &self,
        token: &str,
        name: &CategoryName,
    ) -> Result<Category, Error> {
        let request = self
            .http
            .post(self.url("/categories"))
            .bearer_auth(token)
            .json(&NewCategory { name });

        Ok(send(request).await?.json().await?)
    }

    /// Download the PDF report for `period`.
    pub async fn download_report(
        &self,
        token: &str,
        period: ReportPeriod,
    ) -> Result<Vec<u8>, Error> {
        let request = self
            .http
            .get(self.url("/expenses/report/pdf"))
            .query(&[("period", period.as_str())])
            .bearer_auth(token);

        let bytes = send(request).await?.bytes().await?;

        Ok(bytes.to_vec())
    }
}

/// Send an authenticated request and map unsuccessful responses to errors.
async fn send(request: RequestBuilder) -> Result<Response, Error> {
    let response = request.send().await?;
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().to_string();
    let body = response.text().await.unwrap_or_default();
    tracing::warn!("{url} responded with {status}: {body}");

    let detail = error_detail(&body);

    Err(match status {
        StatusCode::UNAUTHORIZED => Error::Unauthorized,
        StatusCode::NOT_FOUND => Error::NotFound,
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            Error::Validation(detail.unwrap_or_else(|| "The request was rejected".to_owned()))
        }
        status => Error::Api {
            status: status.as_u16(),
            detail: detail.unwrap_or_default(),
        },
    })
}
