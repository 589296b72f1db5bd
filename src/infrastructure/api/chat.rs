use async_trait::async_trait;
use reqwest::Method;

use super::client::ApiClient;
use super::dto::{ChatBody, ChatResponse};
use crate::domain::entities::AuthContext;
use crate::domain::errors::ClientError;
use crate::domain::ports::ChatPort;

const CHAT_PATH: &str = "/chat";

#[async_trait]
impl ChatPort for ApiClient {
    async fn send_prompt(&self, auth: &AuthContext, prompt: &str) -> Result<String, ClientError> {
        let request = self
            .request_json(Method::POST, CHAT_PATH, auth, &ChatBody { prompt })
            .timeout(self.chat_timeout());
        let response: ChatResponse = self.send_json(request, CHAT_PATH).await?;
        Ok(response.reply)
    }
}
