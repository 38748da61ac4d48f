use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AnalysisRequest {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl AnalysisRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: None,
            title: None,
        }
    }
}

// The explanation is free-form model output: a leaf of the wrong type is
// dropped or flattened instead of failing the whole analysis.

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(flatten_text(Value::deserialize(deserializer)?))
}

fn lenient_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse().ok(),
        _ => None,
    })
}

fn flatten_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.into_iter().filter_map(flatten_text).collect();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        Value::Null | Value::Object(_) => None,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FactualAccuracyDetail {
    #[serde(deserialize_with = "lenient_score")]
    pub score: Option<f64>,
    #[serde(deserialize_with = "lenient_text")]
    pub key_indicators: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub examples_from_text: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub weight_of_factors: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub comparison_with_similar_content: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BiasDetail {
    #[serde(deserialize_with = "lenient_text")]
    pub classification: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub language_patterns: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub examples_of_bias: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub context_and_implications: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub effect_on_message: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EmotionalToneDetail {
    #[serde(deserialize_with = "lenient_text")]
    pub classification: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub emotional_language_patterns: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub examples_of_emotional_language: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub impact_on_message: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub effect_on_credibility: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RecommendationDetail {
    #[serde(deserialize_with = "lenient_text")]
    pub text: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub key_factors: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub specific_concerns: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub relation_to_other_classifications: Option<String>,
}

/// Per-dimension breakdown returned alongside the headline scores. The
/// backend fills these from a model completion, so every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisExplanation {
    #[serde(deserialize_with = "lenient")]
    pub factual_accuracy: Option<FactualAccuracyDetail>,
    #[serde(deserialize_with = "lenient")]
    pub bias: Option<BiasDetail>,
    #[serde(deserialize_with = "lenient")]
    pub emotional_tone: Option<EmotionalToneDetail>,
    #[serde(deserialize_with = "lenient")]
    pub recommendation: Option<RecommendationDetail>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ArticleType {
    pub objective: f64,
    pub subjective: f64,
    pub speculative: f64,
    pub emotive: f64,
    pub clickbait: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Sentiments {
    pub joy: f64,
    pub trust: f64,
    pub fear: f64,
    pub surprise: f64,
    pub sadness: f64,
    pub disgust: f64,
    pub anger: f64,
    pub anticipation: f64,
}

#[derive(Debug, Clone, Deserialize)]
struct AnalysisPayload {
    factual_accuracy: f64,
    bias: String,
    emotional_tone: String,
    recommendation: String,
    #[serde(default, deserialize_with = "lenient")]
    analysis_explanation: Option<AnalysisExplanation>,
    #[serde(default, deserialize_with = "lenient")]
    article_type: Option<ArticleType>,
    #[serde(default, deserialize_with = "lenient")]
    sentiments: Option<Sentiments>,
    #[serde(default, deserialize_with = "lenient")]
    topic: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    frames_detected: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AnalysisResult {
    pub factual_accuracy: f64,
    pub bias: String,
    pub emotional_tone: String,
    pub recommendation: String,
    pub analysis_explanation: Option<AnalysisExplanation>,
    pub article_type: Option<ArticleType>,
    pub sentiments: Option<Sentiments>,
    pub topic: Option<String>,
    pub frames_detected: Option<Vec<String>>,
    /// Full response body as received.
    #[serde(skip)]
    pub raw: Value,
}

impl AnalysisResult {
    /// Projects the known fields out of a response body and keeps the body itself.
    pub fn from_value(raw: Value) -> Result<Self, serde_json::Error> {
        let payload: AnalysisPayload = serde_json::from_value(raw.clone())?;
        Ok(Self {
            factual_accuracy: payload.factual_accuracy,
            bias: payload.bias,
            emotional_tone: payload.emotional_tone,
            recommendation: payload.recommendation,
            analysis_explanation: payload.analysis_explanation,
            article_type: payload.article_type,
            sentiments: payload.sentiments,
            topic: payload.topic,
            frames_detected: payload.frames_detected,
            raw,
        })
    }

    pub fn raw_json(&self) -> String {
        self.raw.to_string()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_result: Option<Value>,
    pub use_web_search: bool,
}

impl ChatRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            article_text: None,
            analysis_result: None,
            use_web_search: false,
        }
    }

    /// Attaches the article and its analysis as context for follow-up questions.
    pub fn with_context(mut self, article_text: impl Into<String>, analysis: &AnalysisResult) -> Self {
        self.article_text = Some(article_text.into());
        self.analysis_result = Some(analysis.raw.clone());
        self
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ChatResponse {
    pub message: ChatMessage,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TranslationRequest {
    pub text: String,
    pub source_language: String,
    pub target_language: String,
    pub translation_mode: String,
}

impl TranslationRequest {
    pub fn new(
        text: impl Into<String>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
        translation_mode: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            source_language: source_language.into(),
            target_language: target_language.into(),
            translation_mode: translation_mode.into(),
        }
    }

    /// Same constraints the backend enforces, checked before sending.
    pub fn validate(&self) -> Result<(), String> {
        if self.text.trim().is_empty() {
            return Err("el texto a traducir está vacío".to_string());
        }
        for (name, code) in [
            ("source_language", &self.source_language),
            ("target_language", &self.target_language),
        ] {
            if code.chars().count() != 2 {
                return Err(format!("{} debe tener dos letras: '{}'", name, code));
            }
        }
        if self.translation_mode.trim().is_empty() {
            return Err("translation_mode es obligatorio".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranslationResponse {
    pub translated_text: String,
    pub source_language: String,
    pub target_language: String,
    pub translation_mode: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VoiceTranslation {
    pub translated_text: String,
    pub audio_url: String,
    pub id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn result_keeps_raw_and_typed_explanation() {
        let body = json!({
            "factual_accuracy": 72,
            "bias": "center-left",
            "emotional_tone": "emotional",
            "recommendation": "Contrast with other sources",
            "analysis_explanation": {
                "bias": { "classification": "center-left", "language_patterns": "loaded verbs" },
                "recommendation": { "text": "Contrast" }
            },
            "sentiments": { "joy": 0.1, "fear": 0.6 },
            "frames_detected": ["conflict", "economic"]
        });
        let result = AnalysisResult::from_value(body.clone()).unwrap();

        assert_eq!(result.factual_accuracy, 72.0);
        let explanation = result.analysis_explanation.as_ref().unwrap();
        assert_eq!(
            explanation.bias.as_ref().unwrap().language_patterns.as_deref(),
            Some("loaded verbs")
        );
        assert!(explanation.factual_accuracy.is_none());
        assert_eq!(result.sentiments.as_ref().unwrap().fear, 0.6);
        assert_eq!(result.sentiments.as_ref().unwrap().anger, 0.0);
        assert_eq!(result.frames_detected.as_deref().unwrap().len(), 2);
        assert_eq!(result.raw, body);
    }

    #[test]
    fn loosely_shaped_explanation_never_fails_the_result() {
        let body = json!({
            "factual_accuracy": 70,
            "bias": "neutral",
            "emotional_tone": "balanced",
            "recommendation": "ok",
            "analysis_explanation": {
                "factual_accuracy": { "score": "85", "key_indicators": ["sources", 3] },
                "bias": { "examples_of_bias": ["a", "b"], "classification": { "label": "x" } },
                "emotional_tone": "all calm",
                "recommendation": { "text": "Contrast" }
            },
            "sentiments": "n/a"
        });
        let result = AnalysisResult::from_value(body.clone()).unwrap();

        let explanation = result.analysis_explanation.as_ref().unwrap();
        let factual = explanation.factual_accuracy.as_ref().unwrap();
        assert_eq!(factual.score, Some(85.0));
        assert_eq!(factual.key_indicators.as_deref(), Some("sources; 3"));
        let bias = explanation.bias.as_ref().unwrap();
        assert_eq!(bias.examples_of_bias.as_deref(), Some("a; b"));
        assert_eq!(bias.classification, None);
        assert!(explanation.emotional_tone.is_none());
        assert_eq!(
            explanation.recommendation.as_ref().unwrap().text.as_deref(),
            Some("Contrast")
        );
        assert!(result.sentiments.is_none());
        assert_eq!(result.raw, body);
    }

    #[test]
    fn string_explanation_is_kept_only_in_raw() {
        let body = json!({
            "factual_accuracy": 0.4,
            "bias": "biased",
            "emotional_tone": "emotional",
            "recommendation": "careful",
            "analysis_explanation": "The article leans on anonymous sources."
        });
        let result = AnalysisResult::from_value(body).unwrap();
        assert!(result.analysis_explanation.is_none());
        assert_eq!(
            result.raw["analysis_explanation"],
            "The article leans on anonymous sources."
        );
    }

    #[test]
    fn missing_required_field_is_an_error() {
        let body = json!({ "bias": "neutral", "emotional_tone": "balanced", "recommendation": "ok" });
        assert!(AnalysisResult::from_value(body).is_err());
    }

    #[test]
    fn chat_request_serialises_context() {
        let analysis = AnalysisResult::from_value(json!({
            "factual_accuracy": 0.8, "bias": "neutral", "emotional_tone": "balanced", "recommendation": "ok"
        }))
        .unwrap();
        let request = ChatRequest::new(vec![ChatMessage::user("¿Es fiable?")])
            .with_context("texto del artículo", &analysis);
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["article_text"], "texto del artículo");
        assert_eq!(value["analysis_result"]["bias"], "neutral");
        assert_eq!(value["use_web_search"], false);
    }

    #[test]
    fn analysis_request_omits_empty_optionals() {
        let value = serde_json::to_value(AnalysisRequest::new("hola")).unwrap();
        assert_eq!(value, json!({ "text": "hola" }));
    }

    #[test]
    fn translation_validation() {
        assert!(TranslationRequest::new("hello", "en", "es", "literal").validate().is_ok());
        assert!(TranslationRequest::new("  ", "en", "es", "literal").validate().is_err());
        assert!(TranslationRequest::new("hello", "eng", "es", "literal").validate().is_err());
        assert!(TranslationRequest::new("hello", "en", "es", "").validate().is_err());
    }

    #[test]
    fn voice_translation_parses_uuid() {
        let parsed: VoiceTranslation = serde_json::from_value(json!({
            "translated_text": "hola",
            "audio_url": "/static/voice_6f1c5f8e-0b7a-4c1b-9a51-2f1d4c9a7e10.mp3",
            "id": "6f1c5f8e-0b7a-4c1b-9a51-2f1d4c9a7e10"
        }))
        .unwrap();
        assert_eq!(parsed.id.to_string(), "6f1c5f8e-0b7a-4c1b-9a51-2f1d4c9a7e10");
    }
}
