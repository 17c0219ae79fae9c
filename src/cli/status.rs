//! Status command implementation

use anyhow::Result;

use habit_streak::config::Config;
use habit_streak::HabitTracker;

/// Print users and their habits with recomputed streaks, straight from the database
pub fn status_command(config: &Config, user_filter: Option<String>) -> Result<()> {
    let tracker = HabitTracker::from_config(config)?;
    let filter = user_filter.map(|f| f.trim().to_lowercase());

    let users: Vec<_> = tracker
        .users()?
        .into_iter()
        .filter(|u| filter.as_deref().is_none_or(|f| u.email == f || u.username.to_lowercase() == f))
        .collect();

    if users.is_empty() {
        println!("No users found.");
        return Ok(());
    }

    println!("Today: {}\n", tracker.today());

    for user in users {
        println!(
            "  #{} {} <{}> - level {} {} ({} XP, {}/{} to next)",
            user.id,
            user.username,
            user.email,
            user.level,
            user.level_title,
            user.experience,
            user.progress.current,
            user.progress.next,
        );

        let habits = tracker.habits(user.id)?;
        if habits.is_empty() {
            println!("    (no habits)");
        }

        for view in habits {
            println!(
                "    #{} {}{} - streak {} {} (best {}, {} total){}",
                view.habit.id,
                view.habit.name,
                if view.habit.is_active { "" } else { " [inactive]" },
                view.current_streak,
                "*".repeat(view.streak_tier.flames() as usize),
                view.longest_streak,
                view.total_completions,
                if view.completed_today { " - done today" } else { "" },
            );
        }

        println!();
    }

    Ok(())
}
