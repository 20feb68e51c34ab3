use crate::error::Result;
use crate::services::generation_service::model_endpoint;
use anyhow::Context as _;
use async_trait::async_trait;
use reqwest::Client;
use url::Url;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileEncoder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Client for a hosted feature-extraction model.
#[derive(Clone)]
pub struct InferenceEncoder {
    client: Client,
    api_key: String,
    endpoint: Url,
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum FeatureOutput {
    Pooled(Vec<f32>),
    Tokens(Vec<Vec<f32>>),
    Batched(Vec<Vec<Vec<f32>>>),
}

impl InferenceEncoder {
    pub fn new(client: Client, api_key: String, base_url: &Url, model: &str) -> Result<Self> {
        Ok(Self {
            client,
            api_key,
            endpoint: model_endpoint(base_url, model)?,
        })
    }
}

#[async_trait]
impl ProfileEncoder for InferenceEncoder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        #[derive(serde::Serialize)]
        struct EmbReq<'a> {
            inputs: &'a str,
        }

        let mut req = self
            .client
            .post(self.endpoint.clone())
            .header("Accept", "application/json")
            .json(&EmbReq { inputs: text });
        if !self.api_key.is_empty() {
            req = req.bearer_auth(&self.api_key);
        }
        let resp = req.send().await.context("embeddings request failed")?;

        let status = resp.status();
        let txt = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(anyhow::anyhow!("embeddings status {}: {}", status.as_u16(), txt).into());
        }
        let parsed: FeatureOutput =
            serde_json::from_str(&txt).context("embeddings parse failed")?;
        Ok(match parsed {
            FeatureOutput::Pooled(v) => v,
            FeatureOutput::Tokens(tokens) => mean_pool(&tokens),
            FeatureOutput::Batched(batch) => batch
                .first()
                .map(|tokens| mean_pool(tokens))
                .unwrap_or_default(),
        })
    }
}

/// Averages token vectors into a single sentence vector.
pub fn mean_pool(tokens: &[Vec<f32>]) -> Vec<f32> {
    let Some(dim) = tokens.iter().map(Vec::len).max() else {
        return Vec::new();
    };
    let mut sum = vec![0f32; dim];
    for token in tokens {
        for (acc, x) in sum.iter_mut().zip(token.iter()) {
            *acc += x;
        }
    }
    let n = tokens.len() as f32;
    sum.into_iter().map(|x| x / n).collect()
}
