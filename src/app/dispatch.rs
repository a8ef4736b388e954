use crate::cli::commands::{Cli, Commands, ResumeCommands};
use anyhow::{Context, Result};
use next_chapter_coach::coach::{CoachEngine, UserContext};
use next_chapter_coach::config::Config;
use next_chapter_coach::usage::{Tier, UsagePeriod};
use serde::Serialize;
use serde_json::json;
use std::path::Path;
use std::str::FromStr;

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn tier(pro: bool) -> Tier {
    if pro { Tier::Pro } else { Tier::Free }
}

async fn read_text(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

pub async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    let engine = CoachEngine::from_config(&config).await?;

    match cli.command {
        Commands::Chat {
            message,
            user,
            name,
            days_since_layoff,
            plan_day,
            pro,
        } => {
            let mut context = UserContext::new(user).with_tier(tier(pro));
            context.display_name = name;
            context.days_since_layoff = days_since_layoff;
            context.plan_day = plan_day;

            let response = engine.send_message(&message, &context).await?;
            print_json(&response)
        }

        Commands::History { user } => {
            print_json(&engine.get_conversation_history(&user).await?)
        }

        Commands::Clear { user } => {
            engine.clear_conversation_history(&user).await?;
            print_json(&json!({ "userId": user, "cleared": true }))
        }

        Commands::Usage { user, period, pro } => {
            let period = UsagePeriod::from_str(&period)
                .map_err(|_| anyhow::anyhow!("Unknown period: {period}"))?;
            let status = engine.get_quota_status(&user, tier(pro)).await?;
            let messages = engine.get_message_count(&user, period).await?;
            let tokens = engine.get_token_usage(&user, period).await?;
            print_json(&json!({
                "userId": user,
                "period": period,
                "messages": messages,
                "tokens": tokens,
                "today": status,
            }))
        }

        Commands::Classify { text } => {
            let state = engine.detect_emotional_state(&text);
            let tone = engine.select_tone(&state);
            print_json(&json!({
                "crisis": engine.is_crisis(&text),
                "emotionalState": state,
                "tone": tone,
            }))
        }

        Commands::Cached => print_json(&engine.get_cached_responses()),

        Commands::Resume(ResumeCommands::Analyze { file, role }) => {
            let resume = read_text(&file).await?;
            print_json(&engine.analyze_resume(&resume, &role).await?)
        }

        Commands::Resume(ResumeCommands::Rewrite {
            file,
            section,
            role,
        }) => {
            let text = read_text(&file).await?;
            let rewritten = engine.rewrite_section(&text, &section, &role).await?;
            println!("{rewritten}");
            Ok(())
        }
    }
}
