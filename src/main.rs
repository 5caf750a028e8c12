//! Balze - command-line client for the Balze social network
#![allow(clippy::uninlined_format_args)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use balze::api::supabase::SupabaseClient;
use balze::composer::{PostComposer, QuoteComposer, ToastKind};
use balze::gate::{AdminGate, GateOutcome};
use balze::media::PreviewRegistry;
use balze::mentions::extract_mentions;
use balze::permissions::{Identity, PermissionWatcher};
use balze::validation::{ContentRules, Target};
use balze::{BackendError, Config, QuotedPost};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (RUST_LOG=debug for verbose output)
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match parse_args(std::env::args().collect())? {
        Command::Post { content, media } => post_cli(&content, media).await,
        Command::Quote { post_id, content } => quote_cli(post_id, &content).await,
        Command::Mentions { content } => {
            mentions_cli(&content);
            Ok(())
        }
        Command::Role { require_moderator } => role_cli(require_moderator).await,
        Command::Help => {
            print_help();
            Ok(())
        }
        Command::Version => {
            print_version();
            Ok(())
        }
    }
}

/// CLI commands
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Post {
        content: String,
        media: Option<PathBuf>,
    },
    Quote {
        post_id: Uuid,
        content: String,
    },
    Mentions {
        content: String,
    },
    Role {
        require_moderator: bool,
    },
    Help,
    Version,
}

fn parse_args(args: Vec<String>) -> Result<Command> {
    if args.len() == 1 {
        return Ok(Command::Help);
    }

    match args[1].as_str() {
        "-h" | "--help" | "help" => Ok(Command::Help),
        "-v" | "--version" | "version" => Ok(Command::Version),

        "post" => {
            let mut content = None;
            let mut media = None;
            let mut i = 2;
            while i < args.len() {
                if args[i] == "--media" || args[i] == "-m" {
                    let path = args
                        .get(i + 1)
                        .ok_or_else(|| anyhow::anyhow!("Missing path after {}", args[i]))?;
                    media = Some(PathBuf::from(path));
                    i += 2;
                } else {
                    content.get_or_insert_with(|| args[i].clone());
                    i += 1;
                }
            }

            Ok(Command::Post {
                content: content.unwrap_or_default(),
                media,
            })
        }

        "quote" => {
            let post_id = args
                .get(2)
                .ok_or_else(|| anyhow::anyhow!("Missing post id to quote"))?
                .parse()
                .context("Post id must be a UUID")?;
            let content = args.get(3).cloned().unwrap_or_default();
            Ok(Command::Quote { post_id, content })
        }

        "mentions" => {
            let content = args
                .get(2)
                .ok_or_else(|| anyhow::anyhow!("Missing text to scan"))?
                .clone();
            Ok(Command::Mentions { content })
        }

        "role" => Ok(Command::Role {
            require_moderator: args.iter().any(|a| a == "--moderator"),
        }),

        other => Err(anyhow::anyhow!(
            "Unknown command: {other}\nRun 'balze --help' for usage"
        )),
    }
}

fn print_help() {
    let config_path = Config::default_path()
        .map_or_else(|_| "Unknown".to_string(), |p| p.display().to_string());

    println!(
        r#"Balze - social network client

USAGE:
    balze [COMMAND]

COMMANDS:
    post <content> [OPTIONS]           Create a post
      Options:
        -m, --media <path>             Attach a media file
      Examples:
        balze post "Hello @alice!"
        balze post "" --media cat.png

    quote <post-id> <content>          Quote an existing post

    mentions <content>                 Show the users a text would tag

    role [--moderator]                 Show your role and admin access

OPTIONS:
    -h, --help                         Show this help message
    -v, --version                      Show version information

ENVIRONMENT:
    {}, {}
                                       Override the stored session
    RUST_LOG                           Log filter (default: warn)

CONFIG:
    {}
"#,
        balze::config::USER_ID_ENV,
        balze::config::ACCESS_TOKEN_ENV,
        config_path
    );
}

fn print_version() {
    println!("balze {}", balze::VERSION);
}

async fn post_cli(content: &str, media: Option<PathBuf>) -> Result<()> {
    let config = Config::load()?;
    let session = config.session()?;
    let backend = SupabaseClient::from_config(&config)?;

    let mut composer = PostComposer::new(session.user_id, PreviewRegistry::new())
        .with_rules(config.composer.rules)
        .on_post_created(|post| println!("✓ Posted {}", post.id));
    composer.open();
    composer.set_content(content);

    if let Some(path) = media {
        composer.attach_file(&path).await?;
    }

    let result = composer.submit(&backend).await;
    report(&PostComposer::toast(&result))
}

async fn quote_cli(post_id: Uuid, content: &str) -> Result<()> {
    let config = Config::load()?;
    let session = config.session()?;
    let backend = SupabaseClient::from_config(&config)?;
    let quoted = load_quoted(&config.composer.rules, content, post_id, |id| {
        backend.fetch_quoted_post(id)
    })
    .await?;

    let mut composer = QuoteComposer::new(session.user_id, quoted)
        .with_rules(config.composer.rules)
        .notify_mentions(config.composer.notify_quote_mentions)
        .on_quote_posted(|post| println!("✓ Quoted as {}", post.id));

    println!("Quoting:");
    for line in composer.preview(config.theme.colors()).lines(60) {
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        println!("  │ {}", text);
    }
    println!();

    composer.set_content(content);
    let result = composer.submit(&backend).await;
    report(&QuoteComposer::toast(&result))
}

/// Fetch the post to quote, once the quote text is known to be valid
///
/// Blank or out-of-range quotes never reach the network.
async fn load_quoted<F, Fut>(
    rules: &ContentRules,
    content: &str,
    post_id: Uuid,
    fetch: F,
) -> Result<QuotedPost>
where
    F: FnOnce(Uuid) -> Fut,
    Fut: Future<Output = Result<QuotedPost, BackendError>>,
{
    rules.validate(content, Target::Quote)?;

    fetch(post_id)
        .await
        .with_context(|| format!("Failed to load post {post_id}"))
}

fn mentions_cli(content: &str) {
    let mentions = extract_mentions(content);

    if mentions.is_empty() {
        println!("No mentions.");
        return;
    }

    for username in mentions {
        println!("@{}", username);
    }
}

async fn role_cli(require_moderator: bool) -> Result<()> {
    let config = Config::load()?;
    let session = config.session()?;
    let backend = SupabaseClient::from_config(&config)?;

    let mut watcher = PermissionWatcher::new();
    let permissions = watcher
        .refresh(Identity::SignedIn(session.user_id), &backend)
        .await;

    println!("User:       {}", session.user_id);
    println!("Admin:      {}", permissions.is_admin);
    println!("Moderator:  {}", permissions.is_moderator);

    let gate = AdminGate::new(require_moderator).redirect_to(config.gate.redirect_to.clone());
    match gate.render(&permissions, || "granted") {
        GateOutcome::Render(status) => println!("Admin area: {}", status),
        GateOutcome::Redirect(target) => println!("Admin area: denied (redirect to {})", target),
        GateOutcome::Loading(message) => println!("Admin area: {}", message),
    }

    Ok(())
}

/// Print a toast and turn errors into a failing exit status
fn report(toast: &balze::composer::Toast) -> Result<()> {
    match toast.kind {
        ToastKind::Success => {
            println!("{}", toast.message);
            Ok(())
        }
        ToastKind::Error => Err(anyhow::anyhow!("{}", toast.message)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("balze")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_parse_post_with_media() {
        assert_eq!(
            parse_args(args(&["post", "hi @bo", "--media", "a.png"])).unwrap(),
            Command::Post {
                content: "hi @bo".to_string(),
                media: Some(PathBuf::from("a.png")),
            }
        );
    }

    #[test]
    fn test_parse_quote_requires_uuid() {
        assert!(parse_args(args(&["quote", "not-a-uuid", "text"])).is_err());

        let id = Uuid::new_v4();
        assert_eq!(
            parse_args(args(&["quote", &id.to_string(), "so true"])).unwrap(),
            Command::Quote {
                post_id: id,
                content: "so true".to_string(),
            }
        );
    }

    fn quoted(id: Uuid) -> QuotedPost {
        QuotedPost {
            id,
            content: "original".to_string(),
            image_url: None,
            created_at: chrono::Utc::now(),
            author: balze::Profile {
                username: "dana".to_string(),
                display_name: None,
                avatar_url: None,
            },
        }
    }

    #[test]
    fn test_blank_quote_is_rejected_before_fetch() {
        let fetched = std::cell::Cell::new(false);
        let result = tokio_test::block_on(load_quoted(
            &ContentRules::default(),
            "   ",
            Uuid::new_v4(),
            |id| {
                fetched.set(true);
                async move { Ok(quoted(id)) }
            },
        ));

        assert_eq!(result.unwrap_err().to_string(), "Please add your thoughts");
        assert!(!fetched.get());
    }

    #[test]
    fn test_valid_quote_fetches_post() {
        let id = Uuid::new_v4();
        let result = tokio_test::block_on(load_quoted(
            &ContentRules::default(),
            "so true",
            id,
            |id| async move { Ok(quoted(id)) },
        ));

        assert_eq!(result.unwrap().id, id);
    }

    #[test]
    fn test_fetch_failure_names_the_post() {
        let id = Uuid::new_v4();
        let result = tokio_test::block_on(load_quoted(
            &ContentRules::default(),
            "so true",
            id,
            |_| async {
                Err(BackendError::Http {
                    status: 404,
                    message: "not found".to_string(),
                })
            },
        ));

        assert_eq!(
            result.unwrap_err().to_string(),
            format!("Failed to load post {id}")
        );
    }

    #[test]
    fn test_parse_unknown() {
        assert!(parse_args(args(&["dance"])).is_err());
        assert_eq!(parse_args(args(&[])).unwrap(), Command::Help);
    }
}
