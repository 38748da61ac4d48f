use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::Config;
use crate::endpoints::{Endpoint, Endpoints};
use crate::error::{ApiError, Unavailable};
use crate::health::{HealthProbe, HealthState};
use crate::models::{
    AnalysisRequest, AnalysisResult, ChatRequest, ChatResponse, TranslationRequest,
    TranslationResponse, VoiceTranslation,
};
use crate::transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};

/// Client for the analysis backend.
///
/// Every call goes through the same path: a pre-flight check against the
/// shared [`HealthState`] (the probe only runs when the flag is already down),
/// one request, then status classification. A 503 from any endpoint marks the
/// backend unhealthy for every client sharing the state.
pub struct ApiClient<T> {
    transport: T,
    endpoints: Endpoints,
    health: HealthState,
    probe: HealthProbe,
}

impl ApiClient<ReqwestTransport> {
    pub fn from_config(config: &Config) -> Self {
        let probe = if config.health_check_enabled {
            HealthProbe::enabled(config.api.timeout)
        } else {
            HealthProbe::Disabled
        };
        ApiClient::new(ReqwestTransport::new(), Endpoints::from_config(config)).with_probe(probe)
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T, endpoints: Endpoints) -> Self {
        Self {
            transport,
            endpoints,
            health: HealthState::new(),
            probe: HealthProbe::enabled(std::time::Duration::from_millis(
                crate::config::DEFAULT_TIMEOUT_MS,
            )),
        }
    }

    pub fn with_health_state(mut self, health: HealthState) -> Self {
        self.health = health;
        self
    }

    pub fn with_probe(mut self, probe: HealthProbe) -> Self {
        self.probe = probe;
        self
    }

    pub fn health(&self) -> &HealthState {
        &self.health
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Runs the probe unconditionally and records the outcome.
    pub async fn check_health(&self) -> bool {
        let healthy = self.probe.check(&self.transport, &self.endpoints).await;
        if healthy {
            self.health.mark_healthy();
        } else {
            self.health.mark_unhealthy("health check failed");
        }
        healthy
    }

    pub async fn analyze(&self, text: &str) -> Result<AnalysisResult, ApiError> {
        self.analyze_request(&AnalysisRequest::new(text)).await
    }

    pub async fn analyze_request(&self, request: &AnalysisRequest) -> Result<AnalysisResult, ApiError> {
        let value = self.post_json(Endpoint::Analyze, request).await?;
        log::debug!("Analysis response: {}", value);
        AnalysisResult::from_value(value).map_err(|e| ApiError::Decode {
            endpoint: Endpoint::Analyze,
            message: e.to_string(),
        })
    }

    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError> {
        if request.messages.is_empty() {
            return Err(ApiError::InvalidRequest("el chat necesita al menos un mensaje".to_string()));
        }
        let value = self.post_json(Endpoint::Chat, request).await?;
        decode(Endpoint::Chat, value)
    }

    pub async fn translate(&self, request: &TranslationRequest) -> Result<TranslationResponse, ApiError> {
        request.validate().map_err(ApiError::InvalidRequest)?;
        let value = self.post_json(Endpoint::Translate, request).await?;
        decode(Endpoint::Translate, value)
    }

    pub async fn translate_voice(&self, request: &TranslationRequest) -> Result<VoiceTranslation, ApiError> {
        request.validate().map_err(ApiError::InvalidRequest)?;
        let value = self.post_json(Endpoint::TranslateVoice, request).await?;
        decode(Endpoint::TranslateVoice, value)
    }

    /// Uploads an image as the `image` multipart field. The backend's answer is
    /// model output with no fixed schema, so it is returned as-is.
    pub async fn analyze_image(&self, bytes: Vec<u8>, file_name: &str, mime: &str) -> Result<Value, ApiError> {
        if bytes.is_empty() {
            return Err(ApiError::InvalidRequest("la imagen está vacía".to_string()));
        }
        let url = self.endpoints.url_for(Endpoint::AnalyzeImage);
        let request = HttpRequest::post_multipart(url, "image", file_name, mime, bytes);
        self.execute(Endpoint::AnalyzeImage, request).await
    }

    async fn post_json<B: Serialize>(&self, endpoint: Endpoint, body: &B) -> Result<Value, ApiError> {
        let body = serde_json::to_value(body).map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        let request = HttpRequest::post_json(self.endpoints.url_for(endpoint), body);
        self.execute(endpoint, request).await
    }

    async fn execute(&self, endpoint: Endpoint, request: HttpRequest) -> Result<Value, ApiError> {
        self.ensure_available().await?;

        log::info!("Sending {} request: {} {}", endpoint, request.method, request.url);
        let response = self.transport.send(request).await.map_err(|e| {
            log::error!("{} request failed: {}", endpoint, e);
            ApiError::from(e)
        })?;

        if !response.is_success() {
            return Err(self.classify_failure(endpoint, &response));
        }

        response.json::<Value>().map_err(|e| ApiError::Decode {
            endpoint,
            message: format!("{} - respuesta: {}", e, response.text_preview(500)),
        })
    }

    async fn ensure_available(&self) -> Result<(), ApiError> {
        if self.health.is_healthy() {
            return Ok(());
        }
        if self.probe.check(&self.transport, &self.endpoints).await {
            self.health.mark_healthy();
            Ok(())
        } else {
            Err(ApiError::ServiceUnavailable {
                origin: Unavailable::PreFlight,
            })
        }
    }

    fn classify_failure(&self, endpoint: Endpoint, response: &HttpResponse) -> ApiError {
        // Error bodies are informational only.
        let detail = response.json::<Value>().ok();
        log::error!(
            "{} error: status={} status_text={} detail={:?}",
            endpoint,
            response.status,
            response.status_text,
            detail
        );

        match response.status {
            404 => ApiError::EndpointNotFound { endpoint },
            503 => {
                self.health.mark_unhealthy(format!("{} returned 503", endpoint));
                ApiError::ServiceUnavailable {
                    origin: Unavailable::Http,
                }
            }
            status => ApiError::UnexpectedHttp {
                endpoint,
                status,
                status_text: response.status_text.clone(),
                detail,
            },
        }
    }
}

fn decode<R: DeserializeOwned>(endpoint: Endpoint, value: Value) -> Result<R, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Decode {
        endpoint,
        message: e.to_string(),
    })
}
