//! Thin asynchronous client for the hosted database's REST table endpoint.
//!
//! - Tables are addressed as `{base}/rest/v1/{table}` with PostgREST-style
//!   filters (`status=eq.checked-in`, `order=startDate.desc`).
//! - Pagination uses the `Range` header; the total row count comes back in
//!   `Content-Range`.

use reqwest::{header, Client, Method, RequestBuilder, Response, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use time::Date;
use tracing::{debug, info};

use crate::domain::{Booking, BookingSales, BookingStatus, BookingUpdate, Cabin, RecordId};
use crate::util::version::user_agent;

/// Rows per page of the bookings table.
pub const PAGE_SIZE: u32 = 10;

const LIST_SELECT: &str = "*,guests(fullName,email),cabins(name)";
const STAY_SELECT: &str = "*,guests(fullName,email,nationality,countryFlag),cabins(name)";

const URL_ENV: &str = "CABIN_BACKEND_URL";
const KEY_ENV: &str = "CABIN_BACKEND_KEY";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("missing environment variable {0}")]
    MissingConfig(&'static str),
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("api error: {0}")]
    Api(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("page {0} is out of range")]
    InvalidPage(u32),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    pub base_url: String,
    pub api_key: String,
}

impl StoreConfig {
    pub fn from_env() -> Result<Self, StoreError> {
        let base_url = std::env::var(URL_ENV).map_err(|_| StoreError::MissingConfig(URL_ENV))?;
        let api_key = std::env::var(KEY_ENV).map_err(|_| StoreError::MissingConfig(KEY_ENV))?;
        Ok(Self { base_url, api_key })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Table {
    Cabins,
    Guests,
    Bookings,
}

impl Table {
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Cabins => "cabins",
            Table::Guests => "guests",
            Table::Bookings => "bookings",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortField {
    StartDate,
    TotalPrice,
}

impl SortField {
    fn column(&self) -> &'static str {
        match self {
            SortField::StartDate => "startDate",
            SortField::TotalPrice => "totalPrice",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BookingSort {
    pub field: SortField,
    pub ascending: bool,
}

/// Filter, sort and page selection for the bookings table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BookingQuery {
    pub status: Option<BookingStatus>,
    pub sort: Option<BookingSort>,
    /// 1-based page of [`PAGE_SIZE`] rows; `None` returns every row.
    pub page: Option<u32>,
}

impl BookingQuery {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("select", LIST_SELECT.to_string())];
        if let Some(status) = self.status {
            pairs.push(("status", format!("eq.{}", status.as_str())));
        }
        if let Some(sort) = self.sort {
            let direction = if sort.ascending { "asc" } else { "desc" };
            pairs.push(("order", format!("{}.{direction}", sort.field.column())));
        }
        pairs
    }

    /// Inclusive row range for the requested page.
    fn range(&self) -> Result<Option<(u32, u32)>, StoreError> {
        let Some(page) = self.page else {
            return Ok(None);
        };
        let from = page
            .saturating_sub(1)
            .checked_mul(PAGE_SIZE)
            .ok_or(StoreError::InvalidPage(page))?;
        let to = from
            .checked_add(PAGE_SIZE - 1)
            .ok_or(StoreError::InvalidPage(page))?;
        Ok(Some((from, to)))
    }
}

/// Cabin body for writes; the id is assigned by the backend.
fn cabin_row(cabin: &Cabin) -> Cabin {
    Cabin {
        id: None,
        ..cabin.clone()
    }
}

/// Sales columns of bookings created on or after `since`.
fn sales_since_pairs(since: Date) -> Vec<(&'static str, String)> {
    vec![
        ("select", "created_at,totalPrice,extrasPrice".to_string()),
        ("created_at", format!("gte.{since}")),
    ]
}

/// Open stays starting between `since` and `today`, oldest first.
fn stays_between_pairs(since: Date, today: Date) -> Vec<(&'static str, String)> {
    vec![
        ("select", STAY_SELECT.to_string()),
        ("startDate", format!("gte.{since}")),
        ("startDate", format!("lte.{today}")),
        ("status", "in.(unconfirmed,checked-in)".to_string()),
        ("order", "startDate.asc".to_string()),
    ]
}

#[derive(Clone, Debug, PartialEq)]
pub struct BookingPage {
    pub bookings: Vec<Booking>,
    /// Total rows matching the filter, when the backend reports it.
    pub count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct IdRow {
    id: RecordId,
}

#[derive(Clone)]
pub struct StoreClient {
    http: Client,
    base_url: Url,
    api_key: String,
}

impl StoreClient {
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let mut base = config.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)?.join("rest/v1/")?;
        let http = Client::builder().user_agent(user_agent()).build()?;
        Ok(Self {
            http,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    pub fn from_env() -> Result<Self, StoreError> {
        Self::new(&StoreConfig::from_env()?)
    }

    pub async fn list_ids(&self, table: Table) -> Result<Vec<RecordId>, StoreError> {
        let mut url = self.url(table)?;
        url.query_pairs_mut()
            .append_pair("select", "id")
            .append_pair("order", "id.asc");

        let rows: Vec<IdRow> = self.fetch(self.request(Method::GET, url)).await?;
        Ok(rows.into_iter().map(|row| row.id).collect())
    }

    pub async fn list_cabins(&self) -> Result<Vec<Cabin>, StoreError> {
        let mut url = self.url(Table::Cabins)?;
        url.query_pairs_mut().append_pair("select", "*");
        self.fetch(self.request(Method::GET, url)).await
    }

    pub async fn create_cabin(&self, cabin: &Cabin) -> Result<Cabin, StoreError> {
        let url = self.url(Table::Cabins)?;
        let row = cabin_row(cabin);
        let builder = self
            .request(Method::POST, url)
            .header("Prefer", "return=representation")
            .json(&[row]);
        let rows: Vec<Cabin> = self.fetch(builder).await?;

        let created = rows
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound(format!("new cabin {}", cabin.name)))?;
        info!(cabin = ?created.id, name = %created.name, "created cabin");
        Ok(created)
    }

    pub async fn update_cabin(&self, id: RecordId, cabin: &Cabin) -> Result<Cabin, StoreError> {
        let url = self.row_url(Table::Cabins, id)?;
        let row = cabin_row(cabin);
        let builder = self
            .request(Method::PATCH, url)
            .header("Prefer", "return=representation")
            .json(&row);
        let rows: Vec<Cabin> = self.fetch(builder).await?;

        info!(cabin = id, "updated cabin");
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound(format!("cabin #{id}")))
    }

    pub async fn delete_cabin(&self, id: RecordId) -> Result<(), StoreError> {
        let url = self.row_url(Table::Cabins, id)?;
        check(self.request(Method::DELETE, url).send().await?).await?;

        info!(cabin = id, "deleted cabin");
        Ok(())
    }

    pub async fn insert<T: Serialize>(&self, table: Table, rows: &[T]) -> Result<(), StoreError> {
        if rows.is_empty() {
            debug!(table = table.as_str(), "nothing to insert");
            return Ok(());
        }

        let url = self.url(table)?;
        let builder = self
            .request(Method::POST, url)
            .header("Prefer", "return=minimal")
            .json(rows);
        check(builder.send().await?).await?;

        info!(table = table.as_str(), rows = rows.len(), "inserted rows");
        Ok(())
    }

    /// Deletes every row of `table`.
    pub async fn delete_all(&self, table: Table) -> Result<(), StoreError> {
        let mut url = self.url(table)?;
        url.query_pairs_mut().append_pair("id", "gt.0");
        check(self.request(Method::DELETE, url).send().await?).await?;

        info!(table = table.as_str(), "cleared table");
        Ok(())
    }

    pub async fn list_bookings(&self, query: &BookingQuery) -> Result<BookingPage, StoreError> {
        let range = query.range()?;
        let url = self.query_url(Table::Bookings, &query.query_pairs())?;

        let mut builder = self
            .request(Method::GET, url)
            .header("Prefer", "count=exact");
        if let Some((from, to)) = range {
            builder = builder.header(header::RANGE, format!("{from}-{to}"));
        }

        let response = check(builder.send().await?).await?;
        let count = response
            .headers()
            .get(header::CONTENT_RANGE)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_content_range);
        let bookings = response.json().await?;

        Ok(BookingPage { bookings, count })
    }

    /// Sales rows of bookings created on or after `since`.
    pub async fn list_bookings_after(&self, since: Date) -> Result<Vec<BookingSales>, StoreError> {
        let url = self.query_url(Table::Bookings, &sales_since_pairs(since))?;
        self.fetch(self.request(Method::GET, url)).await
    }

    /// Unconfirmed and checked-in stays starting between `since` and `today`.
    pub async fn list_stays_after(
        &self,
        since: Date,
        today: Date,
    ) -> Result<Vec<Booking>, StoreError> {
        let url = self.query_url(Table::Bookings, &stays_between_pairs(since, today))?;
        self.fetch(self.request(Method::GET, url)).await
    }

    pub async fn get_booking(&self, id: RecordId) -> Result<Booking, StoreError> {
        let mut url = self.row_url(Table::Bookings, id)?;
        url.query_pairs_mut()
            .append_pair("select", "*,cabins(*),guests(*)");

        let rows: Vec<Booking> = self.fetch(self.request(Method::GET, url)).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound(format!("booking #{id}")))
    }

    pub async fn update_booking(
        &self,
        id: RecordId,
        update: &BookingUpdate,
    ) -> Result<Booking, StoreError> {
        let url = self.row_url(Table::Bookings, id)?;

        let builder = self
            .request(Method::PATCH, url)
            .header("Prefer", "return=representation")
            .json(update);
        let rows: Vec<Booking> = self.fetch(builder).await?;

        info!(booking = id, status = ?update.status, "updated booking");
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound(format!("booking #{id}")))
    }

    pub async fn delete_booking(&self, id: RecordId) -> Result<(), StoreError> {
        let url = self.row_url(Table::Bookings, id)?;
        check(self.request(Method::DELETE, url).send().await?).await?;

        info!(booking = id, "deleted booking");
        Ok(())
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(%method, %url, "store request");
        self.http
            .request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn fetch<T>(&self, builder: RequestBuilder) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
    {
        let response = check(builder.send().await?).await?;
        Ok(response.json().await?)
    }

    fn url(&self, table: Table) -> Result<Url, url::ParseError> {
        self.base_url.join(table.as_str())
    }

    /// Table URL filtered to the row with `id`.
    fn row_url(&self, table: Table, id: RecordId) -> Result<Url, url::ParseError> {
        let mut url = self.url(table)?;
        url.query_pairs_mut().append_pair("id", &format!("eq.{id}"));
        Ok(url)
    }

    fn query_url(
        &self,
        table: Table,
        pairs: &[(&'static str, String)],
    ) -> Result<Url, url::ParseError> {
        let mut url = self.url(table)?;
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in pairs {
                query.append_pair(key, value);
            }
        }
        Ok(url)
    }
}

async fn check(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|value| value.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or(body);
    Err(StoreError::Api(format!("{status}: {message}")))
}

/// Total from a `Content-Range` value such as `0-9/42` or `*/0`.
fn parse_content_range(value: &str) -> Option<u64> {
    value.rsplit_once('/')?.1.parse().ok()
}
