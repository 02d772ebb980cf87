use crate::error::ServiceError;
use log::{debug, error, warn};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;

/// HTTP handle on another service of the cinema.
#[derive(Debug, Clone)]
pub struct Upstream {
    name: &'static str,
    base_url: Url,
    http: reqwest::Client,
}

impl Upstream {
    pub fn new(name: &'static str, base_url: Url, http: reqwest::Client) -> Self {
        Upstream {
            name,
            base_url,
            http,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Capitalized name, as shown to people.
    pub fn title(&self) -> String {
        let mut name = self.name.to_owned();
        if let Some(first) = name.get_mut(..1) {
            first.make_ascii_uppercase();
        }
        name
    }

    fn unavailable(&self) -> ServiceError {
        ServiceError::Unavailable(format!("The {} service is unavailable.", self.title()))
    }

    fn url(&self, segments: &[&str]) -> Result<Url, ServiceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ServiceError::Internal(format!("{} is not a base URL", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GETs `<base>/<segments...>` and decodes the JSON body. A 404 from the
    /// upstream is `Ok(None)`.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        segments: &[&str],
    ) -> Result<Option<T>, ServiceError> {
        let url = self.url(segments)?;
        debug!("GET {}", url);
        let response = self.http.get(url.clone()).send().await.map_err(|err| {
            error!("Error connecting to {} service: {}", self.name, err);
            self.unavailable()
        })?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                debug!("{} service has no resource at {}", self.name, url);
                Ok(None)
            }
            status if status.is_success() => response.json::<T>().await.map(Some).map_err(|err| {
                warn!("Undecodable response from {}: {}", url, err);
                ServiceError::BadGateway(format!(
                    "The {} service sent an invalid response.",
                    self.name
                ))
            }),
            status => {
                warn!("{} answered {}", url, status);
                Err(ServiceError::BadGateway(format!(
                    "The {} service answered with status {}.",
                    self.name, status
                )))
            }
        }
    }

    /// Whether the service answers on its root endpoint at all.
    pub async fn ping(&self) -> bool {
        match self.http.get(self.base_url.clone()).send().await {
            Ok(_) => true,
            Err(err) => {
                debug!("{} service is down: {}", self.name, err);
                false
            }
        }
    }
}
