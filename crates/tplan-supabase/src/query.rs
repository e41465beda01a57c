//! PostgREST table queries.
//!
//! ```ignore
//! let plans: Vec<PlanSummary> = client
//!     .table("travel_plans")
//!     .select("id, title")
//!     .eq("user_id", user_id)
//!     .order("created_at", Order::Desc)
//!     .fetch(access_token)
//!     .await?;
//! ```

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::client::SupabaseClient;
use crate::error::SupabaseResult;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

impl Order {
    fn as_str(&self) -> &'static str {
        match self {
            Order::Asc => "asc",
            Order::Desc => "desc",
        }
    }
}

/// Query builder for one table. Terminal methods consume it.
///
/// Every terminal call takes the caller's access token so row-level security
/// policies run as that user.
pub struct TableQuery<'a> {
    client: &'a SupabaseClient,
    table: String,
    params: Vec<(String, String)>,
}

impl<'a> TableQuery<'a> {
    pub(crate) fn new(client: &'a SupabaseClient, table: &str) -> Self {
        Self {
            client,
            table: table.to_string(),
            params: Vec::new(),
        }
    }

    /// Columns to return. Whitespace is stripped.
    pub fn select(mut self, columns: &str) -> Self {
        let columns: String = columns.chars().filter(|c| !c.is_whitespace()).collect();
        self.params.push(("select".to_string(), columns));
        self
    }

    /// `column = value` filter.
    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.params
            .push((column.to_string(), format!("eq.{}", value.to_string())));
        self
    }

    pub fn order(mut self, column: &str, order: Order) -> Self {
        self.params
            .push(("order".to_string(), format!("{}.{}", column, order.as_str())));
        self
    }

    pub fn limit(mut self, count: usize) -> Self {
        self.params.push(("limit".to_string(), count.to_string()));
        self
    }

    /// Query parameters accumulated so far.
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Fetch all matching rows.
    pub async fn fetch<T: DeserializeOwned>(self, access_token: &str) -> SupabaseResult<Vec<T>> {
        let builder = self.build(Method::GET, access_token);
        self.client.execute_json("select", &self.table, builder).await
    }

    /// Fetch the first matching row, `None` when nothing matches.
    pub async fn fetch_single<T: DeserializeOwned>(
        self,
        access_token: &str,
    ) -> SupabaseResult<Option<T>> {
        let rows: Vec<T> = self.limit(1).fetch(access_token).await?;
        Ok(rows.into_iter().next())
    }

    /// Insert rows and return them as stored.
    pub async fn insert<B, T>(self, body: &B, access_token: &str) -> SupabaseResult<Vec<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self
            .build(Method::POST, access_token)
            .header("Prefer", "return=representation")
            .json(body);
        self.client.execute_json("insert", &self.table, builder).await
    }

    /// Insert or merge rows on primary key conflict.
    pub async fn upsert<B, T>(self, body: &B, access_token: &str) -> SupabaseResult<Vec<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self
            .build(Method::POST, access_token)
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .json(body);
        self.client.execute_json("upsert", &self.table, builder).await
    }

    /// Update matching rows and return them. Rows hidden by RLS are not returned.
    pub async fn update<B, T>(self, body: &B, access_token: &str) -> SupabaseResult<Vec<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self
            .build(Method::PATCH, access_token)
            .header("Prefer", "return=representation")
            .json(body);
        self.client.execute_json("update", &self.table, builder).await
    }

    /// Delete matching rows.
    pub async fn delete(self, access_token: &str) -> SupabaseResult<()> {
        let builder = self
            .build(Method::DELETE, access_token)
            .header("Prefer", "return=minimal");
        self.client.execute("delete", &self.table, builder).await?;
        Ok(())
    }

    fn build(&self, method: Method, access_token: &str) -> reqwest::RequestBuilder {
        let url = self.client.table_endpoint(&self.table);
        self.client
            .request(method, &url, Some(access_token))
            .query(&self.params)
    }
}
