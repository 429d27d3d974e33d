use std::io::Write;

use crate::cli::{Cli, Commands, TrainCommands};
use crate::commands::api_client;
use crate::domain::models::{CorrectionPayload, FeedbackPayload};
use crate::services::api::Session;
use crate::services::output::print_one;
use crate::services::storage::{audit, ConfigFile};
use crate::services::stream::stream_chat;

/// The admin training surface. Returns false when the command belongs to the
/// runtime dispatcher instead.
pub fn handle_train_commands(
    cli: &Cli,
    config: &ConfigFile,
    session: &Session,
) -> anyhow::Result<bool> {
    let Commands::Train { command } = &cli.command else {
        return Ok(false);
    };

    let api = api_client(cli, config, session)?;
    match command {
        TrainCommands::Chat { message } => {
            if cli.json {
                let transcript = stream_chat(&api, message, |_| {})?;
                print_one(
                    true,
                    serde_json::json!({ "message": message, "transcript": transcript }),
                    |_| String::new(),
                )?;
            } else {
                // Tokens are printed as they arrive; the transcript itself is
                // not repeated afterwards.
                stream_chat(&api, message, |token| {
                    print!("{}", token);
                    let _ = std::io::stdout().flush();
                })?;
                println!();
            }
        }
        TrainCommands::Feedback {
            log_id,
            verdict,
            comment,
        } => {
            let payload = FeedbackPayload {
                log_id: log_id.clone(),
                verdict: verdict.as_str().to_string(),
                comment: comment.clone(),
            };
            api.post_json("/api/feedback", &payload)?;
            audit(
                "train_feedback",
                serde_json::json!({ "log_id": log_id, "verdict": verdict.as_str() }),
            );
            print_one(cli.json, "recorded", |_| {
                format!("feedback recorded for {}", log_id)
            })?;
        }
        TrainCommands::Correct { log_id, response } => {
            let payload = CorrectionPayload {
                log_id: log_id.clone(),
                corrected_response: response.clone(),
            };
            api.post_json("/api/train/correct", &payload)?;
            audit("train_correct", serde_json::json!({ "log_id": log_id }));
            print_one(cli.json, "recorded", |_| {
                format!("correction recorded for {}", log_id)
            })?;
        }
    }

    Ok(true)
}
