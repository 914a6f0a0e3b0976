use tracing::info;

use crate::cli::middleware::require_user;
use crate::cli::registry::{AppState, Command, Commands};
use crate::domain::User;
use crate::errors::{GatorError, GatorResult};
use crate::services::{parse_interval, stop_channel, AggregationScheduler, TickReport};
use crate::sources::HttpFeedFetcher;
use crate::storage::traits::{PostRepository, UserRepository};

pub const DEFAULT_BROWSE_LIMIT: usize = 2;

/// Every command the CLI understands.
pub fn default_commands() -> GatorResult<Commands> {
    let mut commands = Commands::new();
    commands.register("login", handler_login)?;
    commands.register("register", handler_register)?;
    commands.register("reset", handler_reset)?;
    commands.register("users", handler_users)?;
    commands.register("agg", handler_agg)?;
    commands.register("addfeed", require_user(handler_add_feed))?;
    commands.register("feeds", handler_feeds)?;
    commands.register("follow", require_user(handler_follow))?;
    commands.register("following", require_user(handler_following))?;
    commands.register("unfollow", require_user(handler_unfollow))?;
    commands.register("browse", require_user(handler_browse))?;
    Ok(commands)
}

pub fn handler_login(state: &mut AppState, command: &Command) -> GatorResult<()> {
    let name = command.arg(0, "username")?;

    if state.users().get_by_name(name)?.is_none() {
        return Err(GatorError::NotFound(format!("user '{}'", name)));
    }

    state.config.set_current_user(name)?;
    state.session = state.config.session();
    println!("User {} has been set", name);
    Ok(())
}

pub fn handler_register(state: &mut AppState, command: &Command) -> GatorResult<()> {
    let name = command.arg(0, "username")?;

    let user = User::new(name.to_string());
    state.users().create(&user).map_err(|e| match e {
        GatorError::Conflict(_) => GatorError::Conflict(format!("user '{}'", name)),
        other => other,
    })?;

    state.config.set_current_user(name)?;
    state.session = state.config.session();

    info!(id = %user.id, name = %user.name, "user created");
    println!("User {} has been created successfully", name);
    Ok(())
}

pub fn handler_reset(state: &mut AppState, _command: &Command) -> GatorResult<()> {
    let removed = state.users().delete_all()?;
    println!("Database reset successfully ({} users removed).", removed);
    Ok(())
}

pub fn handler_users(state: &mut AppState, _command: &Command) -> GatorResult<()> {
    for name in state.users().list_names()? {
        if state.session.is_current(&name) {
            println!("* {} (current)", name);
        } else {
            println!("* {}", name);
        }
    }
    Ok(())
}

pub fn handler_agg(state: &mut AppState, command: &Command) -> GatorResult<()> {
    let raw = command.arg(0, "time between requests")?;
    let interval = parse_interval(raw)?;

    let scheduler = AggregationScheduler::new(state.feeds(), state.posts(), HttpFeedFetcher::new());
    // Held for the life of the process; `agg` runs until it is killed.
    let (_stop, signal) = stop_channel();

    println!("Collecting feeds every {}", raw);
    scheduler.run(interval, &signal, print_tick);
    Ok(())
}

fn print_tick(tick: &TickReport) {
    println!(
        "Fetched {}: {} new, {} already seen, {} failed",
        tick.feed.name,
        tick.report.created.len(),
        tick.report.skipped,
        tick.report.failed
    );
    for post in &tick.report.created {
        println!("  * {}", post.title);
    }
}

pub fn handler_add_feed(state: &mut AppState, command: &Command, user: &User) -> GatorResult<()> {
    let name = command.arg(0, "feed name")?;
    let url = command.arg(1, "feed url")?;

    let (feed, follow) = state.feed_service().add(user, name, url)?;

    info!(id = %feed.id, name = %feed.name, url = %feed.url, user = %user.name, "feed added");
    println!("Feed added successfully:");
    println!("  ID: {}", feed.id);
    println!("  Name: {}", feed.name);
    println!("  URL: {}", feed.url);
    println!("Followed by {}", follow.user_name);
    Ok(())
}

pub fn handler_feeds(state: &mut AppState, _command: &Command) -> GatorResult<()> {
    let feeds = state.feed_service().list()?;

    if feeds.is_empty() {
        println!("No feeds configured.");
        return Ok(());
    }

    for entry in feeds {
        println!("{}", entry.feed.name);
        println!("  URL: {}", entry.feed.url);
        println!("  Added by: {}", entry.owner_name.as_deref().unwrap_or("-"));
    }
    Ok(())
}

pub fn handler_follow(state: &mut AppState, command: &Command, user: &User) -> GatorResult<()> {
    let url = command.arg(0, "feed url")?;
    let follow = state.feed_service().follow(user, url)?;

    println!("Successfully followed feed:");
    println!("  User: {}", follow.user_name);
    println!("  Feed: {}", follow.feed_name);
    Ok(())
}

pub fn handler_following(state: &mut AppState, _command: &Command, user: &User) -> GatorResult<()> {
    let follows = state.feed_service().following(user)?;

    if follows.is_empty() {
        println!("Not following any feeds.");
        return Ok(());
    }

    for follow in follows {
        println!("* {}", follow.feed_name);
    }
    Ok(())
}

pub fn handler_unfollow(state: &mut AppState, command: &Command, user: &User) -> GatorResult<()> {
    let url = command.arg(0, "feed url")?;
    state.feed_service().unfollow(user, url)?;

    println!("Unfollowed {}", url);
    Ok(())
}

pub fn handler_browse(state: &mut AppState, command: &Command, user: &User) -> GatorResult<()> {
    let limit = browse_limit(command);
    let posts = state.posts().list_for_user(user.id, limit)?;

    if posts.is_empty() {
        println!("No posts yet. Run `gator agg <interval>` to fetch some.");
        return Ok(());
    }

    for post in posts {
        let published = post
            .published_at
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "unknown date".to_string());
        println!("{} ({})", post.title, published);
        println!("  {}", post.url);
        if let Some(description) = &post.description {
            println!("  {}", description);
        }
    }
    Ok(())
}

/// Optional first argument; anything that is not a positive number means
/// the default.
fn browse_limit(command: &Command) -> usize {
    command
        .args
        .first()
        .and_then(|a| a.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
        .unwrap_or(DEFAULT_BROWSE_LIMIT)
}
