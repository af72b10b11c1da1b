//! Send an SMS using the Catapult backend.
use sms_catapult::{CatapultClient, CatapultConfig};
use sms_core::{SendRequest, SmsClient};

use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CatapultConfig::new(
        arg_or_env("--user-id", "CATAPULT_USER_ID")?,
        arg_or_env("--app-token", "CATAPULT_APP_TOKEN")?,
        arg_or_env("--app-secret", "CATAPULT_APP_SECRET")?,
    );
    let from = arg_or_env("--from", "SMS_FROM")?;
    let to = arg_or_env("--to", "SMS_TO")?;
    let text = arg_or_env("--text", "SMS_TEXT")?;

    let client = CatapultClient::new(config);
    let res = client
        .send(SendRequest {
            to: &to,
            from: &from,
            text: &text,
        })
        .await?;
    println!(
        "Sent via {} with id {}\nRaw: {}",
        res.provider,
        res.id,
        serde_json::to_string_pretty(&res.raw)?
    );
    Ok(())
}

fn arg_or_env(flag: &str, env_key: &str) -> Result<String, String> {
    let args: Vec<String> = env::args().collect();
    if let Some(idx) = args.iter().position(|a| a == flag) {
        if let Some(value) = args.get(idx + 1) {
            return Ok(value.clone());
        }
    }
    env::var(env_key).map_err(|_| format!("missing {} (arg {} or env {})", flag, flag, env_key))
}
