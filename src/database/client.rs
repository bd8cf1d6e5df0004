//! Supabase REST client

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::database::{CarStore, DatabaseError, SelectQuery, CARS_TABLE};
use crate::models::{CarRecord, CarSearch, NewCar, Owner};

/// REST path prefix under the project URL
const REST_PREFIX: [&str; 2] = ["rest", "v1"];

/// Client for the project's REST endpoint
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    http: Client,
    base_url: Url,
    api_key: String,
}

impl SupabaseClient {
    /// Create a client from configured credentials
    pub fn new(config: &Config) -> Result<Self, DatabaseError> {
        let url = config
            .database
            .url
            .as_deref()
            .ok_or_else(|| DatabaseError::NotConfigured("SUPABASE_URL is not set".to_string()))?;
        let api_key = config
            .database
            .api_key
            .as_deref()
            .ok_or_else(|| DatabaseError::NotConfigured("SUPABASE_ANON_KEY is not set".to_string()))?;

        Self::with_client(config.http_client()?, url, api_key)
    }

    pub fn with_client(http: Client, url: &str, api_key: &str) -> Result<Self, DatabaseError> {
        let base_url = Url::parse(url)
            .map_err(|e| DatabaseError::NotConfigured(format!("invalid SUPABASE_URL {}: {}", url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(DatabaseError::NotConfigured(format!("invalid SUPABASE_URL {}", url)));
        }

        Ok(Self {
            http,
            base_url,
            api_key: api_key.to_string(),
        })
    }

    /// `{project}/rest/v1/{table}`
    pub fn table_url(&self, table: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(REST_PREFIX.iter().copied())
                .push(table);
        }
        url
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    /// Run a select and deserialize the returned rows
    pub async fn select<T: DeserializeOwned>(&self, query: &SelectQuery) -> Result<Vec<T>, DatabaseError> {
        let url = self.table_url(&query.table);
        debug!("Select from {} with {:?}", query.table, query.query_pairs());

        let response = self
            .authorized(self.http.get(url))
            .query(&query.query_pairs())
            .send()
            .await?;
        let response = check_status(response).await?;

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Turn a non-2xx response into the service's error message
async fn check_status(response: Response) -> Result<Response, DatabaseError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let error = DatabaseError::from_response(status, &body);
    warn!("Database request failed ({}): {}", status, error);
    Err(error)
}

#[async_trait]
impl CarStore for SupabaseClient {
    async fn list_owners(&self) -> Result<Vec<Owner>, DatabaseError> {
        let owners: Vec<Owner> = self.select(&SelectQuery::owners()).await?;
        info!("Loaded {} owners", owners.len());
        Ok(owners)
    }

    async fn insert_car(&self, car: &NewCar) -> Result<(), DatabaseError> {
        info!("Inserting car {} ({} {} {})", car.vin, car.year, car.make, car.model);

        let response = self
            .authorized(self.http.post(self.table_url(CARS_TABLE)))
            .header("Prefer", "return=minimal")
            .json(car)
            .send()
            .await?;
        check_status(response).await?;

        Ok(())
    }

    async fn search_cars(&self, search: &CarSearch) -> Result<Vec<CarRecord>, DatabaseError> {
        let cars: Vec<CarRecord> = self.select(&SelectQuery::cars_matching(search)).await?;
        info!("Car search {:?} returned {} rows", search, cars.len());
        Ok(cars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecordId;
    use mockito::{Matcher, Server, ServerGuard};
    use serde_json::json;

    const KEY: &str = "anon-key";

    fn client_for(server: &ServerGuard) -> SupabaseClient {
        SupabaseClient::with_client(Client::new(), &server.url(), KEY).unwrap()
    }

    #[test]
    fn test_missing_credentials() {
        let err = SupabaseClient::new(&Config::default()).unwrap_err();
        assert!(matches!(err, DatabaseError::NotConfigured(_)));
    }

    #[test]
    fn test_table_url() {
        let client = SupabaseClient::with_client(Client::new(), "https://demo.supabase.co", KEY).unwrap();
        assert_eq!(client.table_url("cars").as_str(), "https://demo.supabase.co/rest/v1/cars");
    }

    #[tokio::test]
    async fn test_list_owners_sends_credentials() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/v1/owners")
            .match_query(Matcher::UrlEncoded("select".into(), "*".into()))
            .match_header("apikey", KEY)
            .match_header("authorization", "Bearer anon-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!([
                    {"id": "a1", "first_name": "Ada", "last_name": "Lovelace", "address": "1 Main St", "city": "Austin", "state": "TX"},
                    {"id": "b2", "first_name": "Alan", "last_name": "Turing", "address": null, "city": null, "state": null}
                ])
                .to_string(),
            )
            .expect(1)
            .create_async()
            .await;

        let owners = client_for(&server).list_owners().await.unwrap();
        mock.assert_async().await;

        assert_eq!(owners.len(), 2);
        assert_eq!(owners[0].id, RecordId::Text("a1".to_string()));
        assert_eq!(owners[1].display_name(), "Alan Turing");
        assert_eq!(owners[1].city, None);
    }

    #[tokio::test]
    async fn test_insert_car_body() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/rest/v1/cars")
            .match_header("prefer", "return=minimal")
            .match_body(Matcher::Json(json!({
                "year": 2021,
                "make": "Honda",
                "model": "Civic",
                "vin": "YT9NN1U17MA007500",
                "owner_id": 5
            })))
            .with_status(201)
            .expect(1)
            .create_async()
            .await;

        let car = NewCar::from_form("2021", "Honda", "Civic", "YT9NN1U17MA007500", Some(&RecordId::Number(5))).unwrap();
        client_for(&server).insert_car(&car).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_insert_failure_surfaces_service_message() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/rest/v1/cars")
            .with_status(409)
            .with_body(r#"{"code":"23505","details":null,"hint":null,"message":"duplicate key value violates unique constraint \"cars_vin_key\""}"#)
            .create_async()
            .await;

        let car = NewCar::from_form("2021", "Honda", "Civic", "YT9NN1U17MA007500", Some(&RecordId::Number(5))).unwrap();
        let err = client_for(&server).insert_car(&car).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "duplicate key value violates unique constraint \"cars_vin_key\""
        );
    }

    #[tokio::test]
    async fn test_search_sends_only_supplied_filters() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/v1/cars")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("select".into(), "*,owners:owner_id(*)".into()),
                Matcher::UrlEncoded("make".into(), "ilike.%Honda%".into()),
                Matcher::UrlEncoded("year".into(), "eq.2015".into()),
                Matcher::Regex("^select=[^&]*&make=[^&]*&year=[^&]*$".into()),
            ]))
            .with_status(200)
            .with_body(
                json!([{
                    "id": 1, "year": 2015, "make": "Honda", "model": "Fit", "vin": "JHMGE8H35FC000000",
                    "owner_id": 2,
                    "owners": {"id": 2, "first_name": "Ada", "last_name": "Lovelace", "address": "1 Main St", "city": "Austin", "state": "TX"}
                }])
                .to_string(),
            )
            .expect(1)
            .create_async()
            .await;

        let search = CarSearch::from_filters("Honda", "", "2015").unwrap();
        let cars = client_for(&server).search_cars(&search).await.unwrap();
        mock.assert_async().await;

        assert_eq!(cars.len(), 1);
        assert_eq!(cars[0].headline(), "2015 Honda Fit");
        assert_eq!(cars[0].owner_name(), "Ada Lovelace");
    }

    #[tokio::test]
    async fn test_search_without_filters_and_empty_result() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/v1/cars")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("select".into(), "*,owners:owner_id(*)".into()),
                Matcher::Regex("^select=[^&]*$".into()),
            ]))
            .with_status(200)
            .with_body("[]")
            .expect(1)
            .create_async()
            .await;

        let cars = client_for(&server).search_cars(&CarSearch::default()).await.unwrap();
        mock.assert_async().await;
        assert!(cars.is_empty());
    }

    #[tokio::test]
    async fn test_search_failure_surfaces_service_message() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/rest/v1/cars")
            .match_query(Matcher::Any)
            .with_status(400)
            .with_body(r#"{"message":"Could not find a relationship between 'cars' and 'owners'"}"#)
            .create_async()
            .await;

        let err = client_for(&server)
            .search_cars(&CarSearch::default())
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Could not find a relationship between 'cars' and 'owners'"
        );
    }
}
