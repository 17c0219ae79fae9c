//! Commands that talk to a running server: ping, complete

use anyhow::Result;

use habit_streak::config::Config;

use super::http::{http_get_json, http_post_json};

fn token(config: &Config) -> Option<&str> {
    Some(config.server.api_token.as_str()).filter(|t| !t.trim().is_empty())
}

/// Check that the configured server answers
pub fn ping_command(config: &Config) -> Result<()> {
    let url = format!("{}/api/health", config.server.base_url());
    let health = http_get_json(&url, token(config))?;

    println!(
        "{} is up (status: {}, version: {})",
        config.server.base_url(),
        health.get("status").and_then(|v| v.as_str()).unwrap_or("?"),
        health.get("version").and_then(|v| v.as_str()).unwrap_or("?"),
    );
    Ok(())
}

/// Mark a habit complete through the API
pub fn complete_command(
    config: &Config,
    habit_id: i64,
    date: Option<String>,
    notes: Option<String>,
) -> Result<()> {
    let url = format!("{}/api/habits/{}/complete", config.server.base_url(), habit_id);
    let payload = serde_json::json!({ "date": date, "notes": notes });
    let outcome = http_post_json(&url, token(config), &payload)?;

    let day = outcome.get("day").and_then(|v| v.as_str()).unwrap_or("?");
    let habit = outcome.get("habit").cloned().unwrap_or_default();
    let name = habit.get("name").and_then(|v| v.as_str()).unwrap_or("?");
    let streak = habit
        .get("currentStreak")
        .and_then(|v| v.as_u64())
        .unwrap_or(0);

    if outcome.get("newlyCompleted").and_then(|v| v.as_bool()) == Some(true) {
        println!("Completed '{}' for {} (streak: {} days)", name, day, streak);
    } else {
        println!("'{}' was already completed for {}", name, day);
    }

    let xp = outcome
        .get("xpAwarded")
        .and_then(|v| v.as_u64())
        .unwrap_or(0);
    if xp > 0 {
        let user = outcome.get("user").cloned().unwrap_or_default();
        println!(
            "  +{} XP (total {}, level {})",
            xp,
            user.get("experience").and_then(|v| v.as_u64()).unwrap_or(0),
            user.get("level").and_then(|v| v.as_u64()).unwrap_or(1),
        );
    }
    if outcome.get("leveledUp").and_then(|v| v.as_bool()) == Some(true) {
        println!("  Level up!");
    }

    Ok(())
}
