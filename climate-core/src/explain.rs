use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, time::Duration};
use tracing::{instrument, warn};

use crate::{
    config::Config,
    guide,
    model::{ClimateObservation, ClimateReport, Explanation},
    risk::{RiskTier, TargetGroup},
};

/// Inputs for one explanation.
#[derive(Debug, Clone)]
pub struct ExplainRequest {
    pub region: String,
    pub observation: ClimateObservation,
    /// Displayed score (adjusted when a target was requested).
    pub score: u8,
    pub risk_tier: RiskTier,
    pub target: TargetGroup,
}

impl ExplainRequest {
    pub fn from_report(report: &ClimateReport) -> Self {
        Self {
            region: report.region.clone(),
            observation: report.climate_data.clone(),
            score: report.result.displayed_score(),
            risk_tier: report.result.risk_tier,
            target: report.target.unwrap_or_default(),
        }
    }
}

#[async_trait]
pub trait Explainer: Send + Sync + Debug {
    async fn explain(&self, request: &ExplainRequest) -> Result<String>;
}

/// Rule-based explainer; never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateExplainer;

#[async_trait]
impl Explainer for TemplateExplainer {
    async fn explain(&self, request: &ExplainRequest) -> Result<String> {
        Ok(guide::template_explanation(
            &request.region,
            &request.observation,
            request.score,
            request.risk_tier,
            request.target,
        ))
    }
}

/// Explainer backed by an OpenAI-compatible chat-completions endpoint.
#[derive(Clone)]
pub struct ChatCompletionExplainer {
    api_key: String,
    base_url: String,
    model: String,
    http: Client,
}

impl Debug for ChatCompletionExplainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionExplainer")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

const SYSTEM_PROMPT: &str =
    "당신은 시민들에게 날씨와 건강 정보를 알기 쉽게 전달하는 기상 안내 전문가입니다.";
const MAX_TOKENS: u32 = 200;
const SAMPLING_TEMPERATURE: f32 = 0.7;

impl ChatCompletionExplainer {
    pub fn new(
        api_key: String,
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client for text generation")?;

        Ok(Self {
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            http,
        })
    }

    fn prompt(request: &ExplainRequest) -> String {
        let obs = &request.observation;
        let audience = request.target.description();

        format!(
            "다음은 경기도 {region}의 현재 기후 데이터입니다.\n\n\
             기온: {temperature}°C\n\
             체감온도: {apparent}°C\n\
             습도: {humidity}%\n\
             미세먼지(PM10): {pm10} μg/m³\n\
             초미세먼지(PM2.5): {pm25} μg/m³\n\
             자외선지수: {uv}\n\
             지표면온도: {surface}°C\n\n\
             체감기후점수: {score}점 (100점 만점, 높을수록 위험)\n\
             위험등급: {tier}\n\n\
             대상: {audience}\n\n\
             위 데이터를 바탕으로 {audience}이 이해하기 쉬운 날씨 안내 문장을 작성해주세요.\n\
             - 2~3문장으로 간결하게\n\
             - 구체적인 행동 가이드 포함\n\
             - 친근하고 이해하기 쉬운 표현 사용\n\
             - 이모지는 사용하지 마세요",
            region = request.region,
            temperature = or_na(obs.temperature),
            apparent = or_na(obs.apparent_temperature),
            humidity = or_na(obs.humidity),
            pm10 = or_na(obs.pm10),
            pm25 = or_na(obs.pm25),
            uv = or_na(obs.uv_index),
            surface = or_na(obs.surface_temperature),
            score = request.score,
            tier = request.risk_tier.label(),
        )
    }
}

fn or_na(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| v.to_string())
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[async_trait]
impl Explainer for ChatCompletionExplainer {
    #[instrument(skip(self, request), fields(region = %request.region, model = %self.model))]
    async fn explain(&self, request: &ExplainRequest) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let prompt = Self::prompt(request);

        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: SYSTEM_PROMPT },
                ChatMessage { role: "user", content: &prompt },
            ],
            max_tokens: MAX_TOKENS,
            temperature: SAMPLING_TEMPERATURE,
        };

        let res = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("Failed to send request to text-generation service")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("Failed to read text-generation response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Text-generation request failed with status {}: {}",
                status,
                truncate_body(&text),
            ));
        }

        let parsed: ChatResponse =
            serde_json::from_str(&text).context("Failed to parse text-generation JSON")?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| anyhow!("Text-generation response contained no message"))
    }
}

/// Uses `primary`, falling back to the template when it fails.
#[derive(Debug)]
pub struct FallbackExplainer<P> {
    primary: P,
    fallback: TemplateExplainer,
}

impl<P: Explainer> FallbackExplainer<P> {
    pub fn new(primary: P) -> Self {
        Self { primary, fallback: TemplateExplainer }
    }
}

#[async_trait]
impl<P: Explainer> Explainer for FallbackExplainer<P> {
    async fn explain(&self, request: &ExplainRequest) -> Result<String> {
        match self.primary.explain(request).await {
            Ok(text) => Ok(text),
            Err(err) => {
                warn!(error = %format!("{err:#}"), region = %request.region, "explanation service failed, using template");
                self.fallback.explain(request).await
            }
        }
    }
}

/// Chat-completion explainer with template fallback when an API key is
/// configured, otherwise the template explainer alone.
pub fn explainer_from_config(config: &Config) -> Result<Box<dyn Explainer>> {
    let tg = &config.text_generation;

    let boxed: Box<dyn Explainer> = match tg.usable_api_key() {
        Some(api_key) => Box::new(FallbackExplainer::new(ChatCompletionExplainer::new(
            api_key.to_owned(),
            tg.base_url.as_str(),
            tg.model.as_str(),
            Duration::from_secs(tg.timeout_secs),
        )?)),
        None => Box::new(TemplateExplainer),
    };

    Ok(boxed)
}

/// Explanation text plus the action guides for the request's tier and target.
pub async fn explain(explainer: &dyn Explainer, request: &ExplainRequest) -> Result<Explanation> {
    let explanation = explainer.explain(request).await?;
    let action_guides = guide::action_guides(request.risk_tier, request.target)
        .iter()
        .map(|s| s.to_string())
        .collect();

    Ok(Explanation { explanation, action_guides })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        let cut: String = body.chars().take(MAX).collect();
        format!("{cut}...")
    } else {
        body.to_string()
    }
}
