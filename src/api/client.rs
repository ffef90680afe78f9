//! Blocking HTTP implementation of [`ProfileApi`].

use crate::api::fold::{fold, Record};
use crate::api::{results_from_records, JoinQuery, ProfileApi, ResultItem};
use crate::config::{normalize_base_url, AppConfig};
use crate::error::{ProfileError, Result};
use reqwest::blocking::Client;
use reqwest::Url;
use std::time::Duration;

#[derive(Clone)]
pub struct HttpApi {
    base: Url,
    http: Client,
}

impl std::fmt::Debug for HttpApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpApi")
            .field("base", &self.base.as_str())
            .finish_non_exhaustive()
    }
}

impl HttpApi {
    pub fn new(base: &str, timeout: Duration) -> Result<Self> {
        let base = normalize_base_url(base)?;
        let base = Url::parse(&base)
            .map_err(|e| ProfileError::InvalidConfig(format!("invalid API base: {}", e)))?;

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("geoprofile/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { base, http })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(&config.api_base, config.request_timeout)
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|e| ProfileError::InvalidConfig(format!("bad endpoint '{}': {}", path, e)))
    }

    pub fn search_url(&self, query: &str) -> Result<Url> {
        let mut url = self.endpoint("attrs/search/")?;
        url.query_pairs_mut().append_pair("q", query);
        Ok(url)
    }

    pub fn attrs_url(&self, kind: &str) -> Result<Url> {
        self.endpoint(&format!("attrs/{}/", kind))
    }

    pub fn join_url(&self, query: &JoinQuery) -> Result<Url> {
        let mut url = self.endpoint("join/")?;
        {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in query.params() {
                pairs.append_pair(name, &value);
            }
        }
        Ok(url)
    }

    fn get_records(&self, url: Url) -> Result<Vec<Record>> {
        let resp = self.http.get(url.clone()).send()?;
        if !resp.status().is_success() {
            return Err(ProfileError::Status {
                url: url.to_string(),
                status: resp.status().as_u16(),
            });
        }
        let payload = resp.json::<serde_json::Value>()?;
        fold(&payload)
    }
}

impl ProfileApi for HttpApi {
    fn search(&self, query: &str) -> Result<Vec<ResultItem>> {
        let records = self.get_records(self.search_url(query)?)?;
        Ok(results_from_records(&records))
    }

    fn attrs(&self, kind: &str) -> Result<Vec<Record>> {
        self.get_records(self.attrs_url(kind)?)
    }

    fn join(&self, query: &JoinQuery) -> Result<Vec<Record>> {
        self.get_records(self.join_url(query)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api() -> HttpApi {
        HttpApi::new("http://localhost:5000/api", Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn search_url_encodes_query() {
        let url = api().search_url("Ketu-South").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/attrs/search/?q=Ketu-South");
    }

    #[test]
    fn attrs_url_uses_kind() {
        let url = api().attrs_url("geo").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/attrs/geo/");
    }

    #[test]
    fn join_url_carries_all_params() {
        let query = JoinQuery {
            geo: "040AF00079".to_string(),
            show: vec!["year".to_string(), "condition".to_string()],
            required: vec!["proportion_of_children".to_string()],
            sumlevel: vec!["all".to_string(), "all".to_string()],
        };
        let url = api().join_url(&query).unwrap();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(url.path(), "/api/join/");
        assert_eq!(pairs[0], ("geo".to_string(), "040AF00079".to_string()));
        assert_eq!(pairs[1], ("show".to_string(), "year,condition".to_string()));
        assert_eq!(pairs[3], ("sumlevel".to_string(), "all,all".to_string()));
    }
}
