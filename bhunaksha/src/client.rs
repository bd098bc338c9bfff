//! Accès au service Bhunaksha
//!
//! `HierarchyClient` est la frontière du pipeline d'extraction : listes
//! hiérarchiques, métadonnées de village, liste et détail des parcelles.
//! `HttpHierarchyClient` l'implémente au-dessus de reqwest ; la session
//! (cookies, en-têtes) vit dans l'instance, jamais dans un état global.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ORIGIN, REFERER, USER_AGENT};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::identifier::AreaIdentifier;
use crate::types::{ChildList, HierarchyLevel, PlotRecord};
use crate::wire::{self, LISTS_ENDPOINT, PLOT_INFO_ENDPOINT, PLOT_LIST_ENDPOINT, VILLAGE_INFO_ENDPOINT};
use crate::BhunakshaError;

/// URL par défaut (Maharashtra)
pub const DEFAULT_BASE_URL: &str = "https://mahabhunakasha.mahabhumi.gov.in";

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:142.0) Gecko/20100101 Firefox/142.0";

/// Opérations du service consommées par l'extraction
#[async_trait]
pub trait HierarchyClient: Send + Sync {
    /// Enfants d'un chemin de codes parents (`[catégorie, district, ...]`)
    async fn list_children(
        &self,
        level: HierarchyLevel,
        parent_codes: &[String],
    ) -> Result<ChildList, BhunakshaError>;

    /// Métadonnées descriptives d'un village (emprise, attribution)
    async fn get_village_info(&self, identifier: &AreaIdentifier) -> Result<Value, BhunakshaError>;

    /// Numéros de parcelle d'un village, dans l'ordre du service
    async fn get_plot_list(&self, identifier: &AreaIdentifier) -> Result<Vec<String>, BhunakshaError>;

    /// Attributs et géométrie WKT d'une parcelle
    async fn get_plot_detail(
        &self,
        identifier: &AreaIdentifier,
        plot_number: &str,
    ) -> Result<PlotRecord, BhunakshaError>;
}

/// Configuration du client HTTP
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// URL racine du service (sans slash final)
    pub base_url: String,

    /// Code de l'État (ex: "27" pour le Maharashtra)
    pub state: String,

    /// Timeout des requêtes REST
    pub request_timeout: Duration,

    /// Timeout de la requête d'initialisation de session
    pub bootstrap_timeout: Duration,

    pub user_agent: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            state: state.into(),
            ..Default::default()
        }
    }

    fn index_url(&self) -> String {
        format!("{}/{}/index.html", self.base_url, self.state)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            state: "27".to_string(),
            request_timeout: Duration::from_secs(15),
            bootstrap_timeout: Duration::from_secs(10),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Client HTTP avec session (cookie jar + en-têtes de navigateur)
pub struct HttpHierarchyClient {
    client: Client,
    config: ClientConfig,
}

impl HttpHierarchyClient {
    /// Construit le client et initialise la session.
    ///
    /// L'échec de l'initialisation (page d'accueil) n'est qu'un warning :
    /// certaines instances répondent sans cookie de session.
    pub async fn connect(config: ClientConfig) -> Result<Self, BhunakshaError> {
        let client = Self::new(config)?;
        client.bootstrap().await;
        Ok(client)
    }

    /// Construit le client sans contacter le service
    pub fn new(config: ClientConfig) -> Result<Self, BhunakshaError> {
        if config.state.is_empty() {
            return Err(BhunakshaError::InvalidConfig("state code is empty".into()));
        }
        let headers = default_headers(&config)?;
        let client = Client::builder()
            .default_headers(headers)
            .cookie_store(true)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| BhunakshaError::http("client", e))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn bootstrap(&self) {
        let url = self.config.index_url();
        info!(url = %url, "Initializing session");
        match self
            .client
            .get(&url)
            .timeout(self.config.bootstrap_timeout)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => {
                debug!(status = %response.status(), "Session initialized")
            }
            Ok(response) => warn!(status = %response.status(), "Session bootstrap answered with an error"),
            Err(e) => warn!("Could not initialize session: {}", e),
        }
    }

    fn rest_url(&self, service: &str, endpoint: &str) -> String {
        format!("{}/rest/{}/{}", self.config.base_url, service, endpoint)
    }

    /// POST form-urlencoded, retourne le corps si 2xx
    async fn post_form(
        &self,
        endpoint: &'static str,
        url: String,
        form: &[(&str, &str)],
    ) -> Result<Vec<u8>, BhunakshaError> {
        let response = self
            .client
            .post(url)
            .form(form)
            .send()
            .await
            .map_err(|e| BhunakshaError::http(endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BhunakshaError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| BhunakshaError::http(endpoint, e))?;
        Ok(body.to_vec())
    }
}

fn default_headers(config: &ClientConfig) -> Result<HeaderMap, BhunakshaError> {
    let value = |v: &str| {
        HeaderValue::from_str(v).map_err(|e| BhunakshaError::InvalidConfig(format!("header {}: {}", v, e)))
    };

    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, value(&config.user_agent)?);
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/json, text/javascript, */*; q=0.01"),
    );
    headers.insert("X-Requested-With", HeaderValue::from_static("XMLHttpRequest"));
    headers.insert(ORIGIN, value(&config.base_url)?);
    headers.insert(REFERER, value(&config.index_url())?);
    Ok(headers)
}

#[async_trait]
impl HierarchyClient for HttpHierarchyClient {
    async fn list_children(
        &self,
        level: HierarchyLevel,
        parent_codes: &[String],
    ) -> Result<ChildList, BhunakshaError> {
        let codes = wire::codes_param(parent_codes);
        let level_str = level.as_u8().to_string();
        debug!(level = %level, codes = %codes, "Listing children");
        let body = self
            .post_form(
                LISTS_ENDPOINT,
                self.rest_url("VillageMapService", LISTS_ENDPOINT),
                &[
                    ("state", self.config.state.as_str()),
                    ("level", level_str.as_str()),
                    ("codes", codes.as_str()),
                    ("hasmap", "true"),
                ],
            )
            .await?;
        wire::decode_child_list(&body)
    }

    async fn get_village_info(&self, identifier: &AreaIdentifier) -> Result<Value, BhunakshaError> {
        let body = self
            .post_form(
                VILLAGE_INFO_ENDPOINT,
                self.rest_url("MapInfo", VILLAGE_INFO_ENDPOINT),
                &[
                    ("state", self.config.state.as_str()),
                    ("giscode", identifier.as_str()),
                    ("srs", "4326"),
                ],
            )
            .await?;
        wire::decode_village_info(&body)
    }

    async fn get_plot_list(&self, identifier: &AreaIdentifier) -> Result<Vec<String>, BhunakshaError> {
        let body = self
            .post_form(
                PLOT_LIST_ENDPOINT,
                self.rest_url("VillageMapService", PLOT_LIST_ENDPOINT),
                &[("state", self.config.state.as_str()), ("logedLevels", identifier.as_str())],
            )
            .await?;
        wire::decode_plot_list(&body)
    }

    async fn get_plot_detail(
        &self,
        identifier: &AreaIdentifier,
        plot_number: &str,
    ) -> Result<PlotRecord, BhunakshaError> {
        let body = self
            .post_form(
                PLOT_INFO_ENDPOINT,
                self.rest_url("MapInfo", PLOT_INFO_ENDPOINT),
                &[
                    ("state", self.config.state.as_str()),
                    ("giscode", identifier.as_str()),
                    ("plotno", plot_number),
                    ("srs", "4326"),
                ],
            )
            .await?;
        wire::decode_plot_detail(plot_number, &body)
    }
}
