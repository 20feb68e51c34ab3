use crate::error::Result;
use anyhow::Context as _;
use async_trait::async_trait;
use reqwest::Client;
use url::Url;

/// Produces candidate text for a prompt. The planner treats this as a black
/// box and absorbs every error it returns.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, max_length: usize) -> Result<String>;
}

/// Client for a hosted text2text-generation model.
#[derive(Clone)]
pub struct InferenceTextGenerator {
    client: Client,
    api_key: String,
    endpoint: Url,
}

impl InferenceTextGenerator {
    pub fn new(client: Client, api_key: String, base_url: &Url, model: &str) -> Result<Self> {
        Ok(Self {
            client,
            api_key,
            endpoint: model_endpoint(base_url, model)?,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl TextGenerator for InferenceTextGenerator {
    async fn generate(&self, prompt: &str, max_length: usize) -> Result<String> {
        #[derive(serde::Serialize)]
        struct GenParams {
            max_length: usize,
            num_return_sequences: u8,
        }
        #[derive(serde::Serialize)]
        struct GenOptions {
            wait_for_model: bool,
        }
        #[derive(serde::Serialize)]
        struct GenReq<'a> {
            inputs: &'a str,
            parameters: GenParams,
            options: GenOptions,
        }
        #[derive(serde::Deserialize)]
        struct GenOut {
            generated_text: String,
        }

        let body = GenReq {
            inputs: prompt,
            parameters: GenParams {
                max_length,
                num_return_sequences: 1,
            },
            options: GenOptions {
                wait_for_model: true,
            },
        };

        let mut req = self
            .client
            .post(self.endpoint.clone())
            .header("Accept", "application/json")
            .json(&body);
        if !self.api_key.is_empty() {
            req = req.bearer_auth(&self.api_key);
        }
        let resp = req.send().await.context("generation request failed")?;

        let status = resp.status();
        let txt = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(anyhow::anyhow!("generation status {}: {}", status.as_u16(), txt).into());
        }
        let parsed: Vec<GenOut> = serde_json::from_str(&txt).context("generation parse failed")?;
        parsed
            .into_iter()
            .next()
            .map(|o| o.generated_text)
            .ok_or_else(|| anyhow::anyhow!("generation returned no sequences").into())
    }
}

/// `{base}/{model}`; model ids such as `valhalla/t5-base-qg-hl` keep their slash.
pub(crate) fn model_endpoint(base_url: &Url, model: &str) -> Result<Url> {
    let mut raw = base_url.as_str().trim_end_matches('/').to_string();
    raw.push('/');
    raw.push_str(model.trim_start_matches('/'));
    Url::parse(&raw)
        .map_err(|e| crate::error::Error::Config(format!("Invalid model endpoint {}: {}", raw, e)))
}
