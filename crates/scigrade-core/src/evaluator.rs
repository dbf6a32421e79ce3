//! One evaluation cycle: build the prompt, call the endpoint, decode.
//!
//! Failure classes stay separate. A missing credential is reported before
//! any request is built, a failed call is a transport error, and only a
//! completed call whose content cannot be decoded becomes
//! [`EvaluationResult::Raw`].

use std::time::Instant;

use crate::client::ChatClient;
use crate::config::Config;
use crate::credential::{ApiKey, CredentialProvider};
use crate::debug_time;
use crate::error::Result;
use crate::evaluation::{self, EvaluationResult};
use crate::gate::SubmissionGate;
use crate::prompt::{EvaluationRequest, PromptBuilder};
use crate::rubric::Rubric;

#[derive(Debug)]
pub struct Evaluator {
    builder: PromptBuilder,
    client: ChatClient,
    credential: Option<ApiKey>,
    provider: CredentialProvider,
    gate: SubmissionGate,
}

impl Evaluator {
    /// Build an evaluator with an explicit credential (or none).
    pub fn new(config: &Config, rubric: Rubric, credential: Option<ApiKey>) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            builder: PromptBuilder::new(rubric),
            client: ChatClient::new(config)?,
            credential,
            provider: CredentialProvider::from_config(config),
            gate: SubmissionGate::new(),
        })
    }

    /// Build an evaluator, resolving the credential from the secrets file,
    /// environment and `.env` file named by `config`. A missing credential does not fail
    /// construction.
    pub fn from_config(config: &Config, rubric: Rubric) -> Result<Self> {
        let credential = match CredentialProvider::from_config(config).resolve() {
            Some((key, source)) => {
                tracing::debug!(%source, "credential_resolved");
                Some(key)
            }
            None => {
                tracing::debug!("credential_missing");
                None
            }
        };

        Self::new(config, rubric, credential)
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    pub fn is_busy(&self) -> bool {
        self.gate.is_busy()
    }

    /// Run one submission to completion.
    ///
    /// Returns `Busy` if another submission on this evaluator is still in
    /// flight.
    pub async fn evaluate(&self, request: &EvaluationRequest) -> Result<EvaluationResult> {
        let _guard = self.gate.try_begin()?;
        let start = Instant::now();

        let api_key = self
            .credential
            .as_ref()
            .ok_or_else(|| self.provider.missing_error())?;

        let prompt = self.builder.build(request);
        tracing::debug!(
            subject = %request.subject,
            topic = %request.topic,
            prompt_len = prompt.len(),
            "prompt_built"
        );

        let reply = self.client.complete(api_key, &prompt).await?;
        let result = evaluation::decode(&reply, self.builder.rubric());

        debug_time!(start, "evaluate", parsed = result.is_parsed());
        Ok(result)
    }
}
