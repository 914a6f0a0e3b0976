use clap::Parser;

const COMMANDS_HELP: &str = "Commands:
  register <name>         Create a user and log in as them
  login <name>            Switch the current user
  users                   List users
  reset                   Delete all users
  addfeed <name> <url>    Add a feed and follow it
  feeds                   List all feeds
  follow <url>            Follow an existing feed
  following               List the feeds you follow
  unfollow <url>          Stop following a feed
  browse [limit]          Show the newest posts from followed feeds (default 2)
  agg <interval>          Fetch feeds every interval, e.g. 30s, 1m, 1h";

#[derive(Parser, Debug)]
#[command(name = "gator")]
#[command(about = "Personal RSS feed aggregator")]
#[command(version)]
#[command(after_help = COMMANDS_HELP)]
pub struct Cli {
    /// Show debug logs from the aggregator
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to run
    pub command: String,

    /// Arguments for the command
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}
