//! HTTP SMS gateway delivery
//!
//! Speaks the gateway's form-encoded protocol: common request parameters
//! plus per-send parameters, signed with an MD5 digest over the
//! secret-wrapped, key-sorted parameter string. All transport and signing
//! detail stays inside this adapter.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Local;
use md5::{Digest, Md5};
use serde::Deserialize;
use tracing::{error, info};

use sv_core::{DeliveryReceipt, NotifyError, SmsNotifier};
use sv_shared::{mask_phone, SmsConfig};

const GATEWAY_METHOD: &str = "alibaba.aliqin.fc.sms.num.send";
const GATEWAY_FORMAT: &str = "json";
const GATEWAY_VERSION: &str = "2.0";
const SIGN_METHOD: &str = "md5";

/// Response envelope: exactly one of the two fields is present
#[derive(Debug, Deserialize)]
struct GatewayEnvelope {
    #[serde(rename = "alibaba_aliqin_fc_sms_num_send_response")]
    response: Option<GatewayResponse>,
    error_response: Option<GatewayErrorResponse>,
}

#[derive(Debug, Deserialize)]
struct GatewayResponse {
    result: GatewayResult,
}

#[derive(Debug, Deserialize)]
struct GatewayResult {
    #[serde(default)]
    err_code: String,
    #[serde(default)]
    model: String,
    #[serde(default)]
    success: bool,
    #[serde(default)]
    msg: String,
}

#[derive(Debug, Deserialize)]
struct GatewayErrorResponse {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    msg: String,
    #[serde(default)]
    sub_code: String,
    #[serde(default)]
    sub_msg: String,
}

/// Gateway-backed delivery adapter
pub struct GatewaySmsNotifier {
    client: reqwest::Client,
    config: SmsConfig,
}

impl GatewaySmsNotifier {
    pub fn new(config: SmsConfig) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| NotifyError::Transport {
                message: format!("failed to build http client: {}", e),
            })?;
        Ok(Self { client, config })
    }

    /// Parameters common to every gateway request
    fn common_params(&self) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        params.insert("method".to_string(), GATEWAY_METHOD.to_string());
        params.insert("app_key".to_string(), self.config.app_key.clone());
        params.insert(
            "timestamp".to_string(),
            Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        );
        params.insert("format".to_string(), GATEWAY_FORMAT.to_string());
        params.insert("v".to_string(), GATEWAY_VERSION.to_string());
        params.insert("sign_method".to_string(), SIGN_METHOD.to_string());
        params.insert("sms_type".to_string(), "normal".to_string());
        params.insert(
            "sms_free_sign_name".to_string(),
            self.config.free_sign_name.clone(),
        );
        params
    }

    /// MD5(secret + k1v1k2v2... + secret) over keys in ascending order,
    /// uppercase hex
    fn sign(&self, params: &BTreeMap<String, String>) -> String {
        let mut payload = String::new();
        payload.push_str(&self.config.app_secret);
        for (key, value) in params {
            payload.push_str(key);
            payload.push_str(value);
        }
        payload.push_str(&self.config.app_secret);
        hex::encode_upper(Md5::digest(payload.as_bytes()))
    }
}

#[async_trait]
impl SmsNotifier for GatewaySmsNotifier {
    async fn deliver(
        &self,
        phone: &str,
        template_code: &str,
        code: &str,
        params: &HashMap<String, String>,
    ) -> Result<DeliveryReceipt, NotifyError> {
        let mut form = self.common_params();
        form.insert("rec_num".to_string(), phone.to_string());
        form.insert("sms_template_code".to_string(), template_code.to_string());

        let mut sms_param = params.clone();
        sms_param.insert("code".to_string(), code.to_string());
        let sms_param_json =
            serde_json::to_string(&sms_param).map_err(|e| NotifyError::Transport {
                message: format!("failed to encode sms params: {}", e),
            })?;
        form.insert("sms_param".to_string(), sms_param_json);

        let sign = self.sign(&form);
        form.insert("sign".to_string(), sign);

        let response = self
            .client
            .post(&self.config.endpoint)
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                error!(phone = %mask_phone(phone), error = %e, "sms gateway request failed");
                NotifyError::Transport {
                    message: e.to_string(),
                }
            })?;

        let envelope: GatewayEnvelope = response.json().await.map_err(|e| {
            error!(phone = %mask_phone(phone), error = %e, "sms gateway answered malformed data");
            NotifyError::Transport {
                message: format!("failed to decode gateway response: {}", e),
            }
        })?;

        if let Some(resp) = envelope.response {
            let result = resp.result;
            if result.success || result.err_code.is_empty() {
                info!(
                    phone = %mask_phone(phone),
                    template_code,
                    message_id = %result.model,
                    "sms gateway accepted message"
                );
                return Ok(DeliveryReceipt {
                    message_id: result.model,
                });
            }
            error!(
                phone = %mask_phone(phone),
                template_code,
                err_code = %result.err_code,
                msg = %result.msg,
                "sms gateway refused message"
            );
            return Err(NotifyError::Rejected {
                code: result.err_code,
                message: result.msg,
            });
        }

        if let Some(err) = envelope.error_response {
            error!(
                phone = %mask_phone(phone),
                template_code,
                code = err.code,
                sub_code = %err.sub_code,
                msg = %err.msg,
                "sms gateway rejected request"
            );
            let message = if err.sub_msg.is_empty() {
                err.msg
            } else {
                err.sub_msg
            };
            return Err(NotifyError::Rejected {
                code: err.sub_code,
                message,
            });
        }

        Err(NotifyError::Transport {
            message: "gateway returned an unrecognized envelope".to_string(),
        })
    }
}
