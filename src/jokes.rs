use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::network::JOKE_URL;
use crate::error::*;
use crate::fetcher::HttpClient;
use crate::utils::dated_filename;

/// Fetches random dad jokes
#[derive(Debug, Clone)]
pub struct JokeClient {
    client: HttpClient,
    url: String,
}

impl JokeClient {
    pub fn new(client: HttpClient) -> Self {
        Self::with_url(client, JOKE_URL)
    }

    pub fn with_url<S: Into<String>>(client: HttpClient, url: S) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// Retrieves a new joke
    ///
    /// # Errors
    /// `NetworkError` if the request fails or the response carries no joke
    pub fn fetch(&self) -> Result<String> {
        let response = self
            .client
            .get_json(&self.url, &[("Accept", "application/json")])?;
        match response.get("joke").and_then(|joke| joke.as_str()) {
            Some(joke) if !joke.trim().is_empty() => Ok(joke.to_string()),
            _ => Err(Error::NetworkError {
                url: self.url.clone(),
                cause: "failed to fetch joke".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    pub joke: String,
    pub date: DateTime<Utc>,
}

/// Favorite jokes in the order they were added
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Favorites(Vec<Favorite>);

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, joke: &str) -> bool {
        self.0.iter().any(|fav| fav.joke == joke)
    }

    /// Adds the joke or removes it if already a favorite. Returns whether the
    /// joke is a favorite afterwards.
    pub fn toggle(&mut self, joke: &str, now: DateTime<Utc>) -> bool {
        if self.contains(joke) {
            self.0.retain(|fav| fav.joke != joke);
            false
        } else {
            self.0.push(Favorite {
                joke: joke.to_string(),
                date: now,
            });
            true
        }
    }

    pub fn remove(&mut self, index: usize) -> Option<Favorite> {
        if index < self.0.len() {
            Some(self.0.remove(index))
        } else {
            None
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Favorite> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Replaces the favorites with the content of a JSON export
    ///
    /// # Errors
    /// * `InvalidJson` - the text is not valid JSON
    /// * `ValidationError` - the JSON is not an array of favorites
    pub fn import_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if !value.is_array() {
            return Err(invalid("favorites must be a JSON array"));
        }
        serde_json::from_value(value).map_err(|e| invalid(format!("invalid favorites file: {}", e)))
    }

    pub fn export_json(&self) -> Result<String> {
        if self.is_empty() {
            return Err(invalid("no favorites to download"));
        }
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub fn joke_filename(date: NaiveDate) -> String {
    dated_filename("dad-joke", "txt", date)
}

pub fn favorites_filename(date: NaiveDate) -> String {
    dated_filename("dad-joke-favorites", "json", date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::FetchOptions;
    use chrono::TimeZone;
    use httpmock::prelude::*;
    use serde_json::json;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_fetch_joke() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/").header("Accept", "application/json");
            then.status(200).json_body(json!({
                "id": "R7UfaahVfFd",
                "joke": "My dog used to chase people on a bike a lot. It got so bad I had to take his bike away.",
                "status": 200
            }));
        });

        let client = JokeClient::with_url(HttpClient::default(), server.url("/"));
        assert!(client.fetch().unwrap().starts_with("My dog"));
        mock.assert_hits(1);
    }

    #[test]
    fn test_missing_joke_field() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/");
            then.status(200).json_body(json!({"status": 200}));
        });

        let client = JokeClient::with_url(
            HttpClient::new(FetchOptions {
                retries: 0,
                ..FetchOptions::default()
            }),
            server.url("/"),
        );
        assert!(matches!(client.fetch(), Err(Error::NetworkError { .. })));
    }

    #[test]
    fn test_toggle_favorites() {
        let mut favorites = Favorites::new();
        assert!(favorites.toggle("joke one", at(1)));
        assert!(favorites.toggle("joke two", at(2)));
        assert!(favorites.contains("joke one"));
        assert!(!favorites.toggle("joke one", at(3)));
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites.remove(0).map(|fav| fav.joke), Some("joke two".to_string()));
        assert_eq!(favorites.remove(0), None);
    }

    #[test]
    fn test_favorites_json() {
        assert!(Favorites::new().export_json().is_err());

        let mut favorites = Favorites::new();
        favorites.toggle("Why did the scarecrow win an award?", at(4));
        let exported = favorites.export_json().unwrap();
        assert!(exported.starts_with("[\n  {"));
        assert_eq!(Favorites::import_json(&exported).unwrap(), favorites);

        assert!(matches!(
            Favorites::import_json("{\"joke\": \"x\"}"),
            Err(Error::ValidationError(_))
        ));
        assert!(matches!(Favorites::import_json("[oops"), Err(Error::InvalidJson(_))));
    }

    #[test]
    fn test_filenames() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 4).unwrap();
        assert_eq!(joke_filename(date), "dad-joke-2024-05-04.txt");
        assert_eq!(favorites_filename(date), "dad-joke-favorites-2024-05-04.json");
    }
}
