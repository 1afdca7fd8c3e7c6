mod commands;
mod logging;

use std::{error::Error, path::PathBuf};

use async_std::{
    io::{self, WriteExt},
    task,
};
use chrono::Utc;
use clap::Parser;
use commands::{Command, HELP};
use core_types::{AuthorizationOutcome, Item, ItemId, ReviewState};
use service::{
    app_services::create_app_services,
    review::{GatewayRequestStatus, ReviewPipeline},
};

#[derive(Parser, Debug)]
#[command(
    name = "photo-cleaner",
    about = "Go through a photo library one photo at a time and clean out the ones you do not want"
)]
struct Cli {
    /// Photo library root directory, remembered for later runs
    #[arg(short, long)]
    library: Option<PathBuf>,

    /// Number of photos resolved ahead of the one on display
    #[arg(long)]
    buffer_capacity: Option<usize>,

    /// Refill the lookahead buffer when it holds fewer photos than this
    #[arg(long)]
    refill_threshold: Option<usize>,

    /// Number of upcoming photos to prepare thumbnails for
    #[arg(long)]
    prefetch_count: Option<usize>,

    /// Move to trash and delete without asking for confirmation
    #[arg(long)]
    no_authorization: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let _guard = logging::init_logging();
    let args = Cli::parse();
    task::block_on(run(args))
}

async fn run(args: Cli) -> Result<(), Box<dyn Error>> {
    let services = create_app_services().await?;
    let settings_service = services.settings();

    let mut stored = settings_service.load_settings().await?;
    if let Some(library) = &args.library {
        stored.library_root_dir = Some(library.canonicalize()?);
        settings_service.save_settings(&stored).await?;
    }
    let Some(library) = stored.library_root_dir.clone() else {
        return Err("No photo library configured, pass one with --library <dir>".into());
    };

    let mut settings = stored;
    if let Some(capacity) = args.buffer_capacity {
        settings.buffer_capacity = capacity;
    }
    if let Some(threshold) = args.refill_threshold {
        settings.refill_threshold = threshold;
    }
    if let Some(prefetch) = args.prefetch_count {
        settings.prefetch_count = prefetch;
    }
    if args.no_authorization {
        settings.require_authorization = false;
    }

    let mut pipeline = services.create_review_pipeline(&library, settings)?;
    pipeline.init().await?;
    println!("Reviewing {}", library.display());
    println!("{}", HELP);
    print_status(&pipeline);

    loop {
        let Some(line) = prompt("> ").await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }
        if let Err(e) = execute(&mut pipeline, command).await {
            println!("Error: {}", e);
        }
        print_status(&pipeline);
    }

    pipeline.dispose();
    Ok(())
}

/// Reads one line from stdin. Returns `None` at end of input.
async fn prompt(text: &str) -> io::Result<Option<String>> {
    let mut stdout = io::stdout();
    stdout.write_all(text.as_bytes()).await?;
    stdout.flush().await?;

    let mut line = String::new();
    if io::stdin().read_line(&mut line).await? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

async fn execute(pipeline: &mut ReviewPipeline, command: Command) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Keep => pipeline.decide(false).await?,
        Command::Discard => pipeline.decide(true).await?,
        Command::Undo => {
            if !pipeline.undo().await? {
                println!("Nothing to undo");
            }
        }
        Command::Shuffle => pipeline.load_and_shuffle().await?,
        Command::ListPending => {
            pipeline.refresh_pending_list().await?;
            print_items("Pending deletion", pipeline.pending_items());
        }
        Command::Restore(id) => {
            if !pipeline.restore_item(id).await? {
                println!("Photo {} was not pending deletion", id);
            }
        }
        Command::ConfirmTrash => {
            let status = pipeline.confirm_delete(false).await?;
            handle_status(pipeline, status).await?;
        }
        Command::ConfirmDelete => {
            let status = pipeline.confirm_delete(true).await?;
            handle_status(pipeline, status).await?;
        }
        Command::ListSystemTrash => {
            pipeline.load_system_trash().await?;
            print_items("In trash", pipeline.system_trash_items());
        }
        Command::RestoreFromTrash(ids) => {
            let items = select_from_system_trash(pipeline, &ids).await?;
            let status = pipeline.restore_selected(&items).await?;
            handle_status(pipeline, status).await?;
        }
        Command::DeleteFromTrash(ids) => {
            let items = select_from_system_trash(pipeline, &ids).await?;
            let status = pipeline.delete_selected(&items).await?;
            handle_status(pipeline, status).await?;
        }
        Command::Help => println!("{}", HELP),
        Command::Quit => {}
    }
    Ok(())
}

async fn select_from_system_trash(
    pipeline: &mut ReviewPipeline,
    ids: &[ItemId],
) -> Result<Vec<Item>, Box<dyn Error>> {
    pipeline.load_system_trash().await?;
    let items: Vec<Item> = pipeline
        .system_trash_items()
        .iter()
        .filter(|item| ids.contains(&item.id))
        .cloned()
        .collect();
    for id in ids {
        if !items.iter().any(|item| item.id == *id) {
            println!("Photo {} is not in trash", id);
        }
    }
    Ok(items)
}

async fn handle_status(
    pipeline: &mut ReviewPipeline,
    status: GatewayRequestStatus,
) -> Result<(), Box<dyn Error>> {
    match status {
        GatewayRequestStatus::NothingToDo => println!("Nothing to do"),
        GatewayRequestStatus::Completed => println!("Done"),
        GatewayRequestStatus::Failed(report) => {
            println!("Some photos could not be processed:");
            for failure in report.failures() {
                println!(
                    "  {}: {}",
                    failure.locator,
                    failure.error.as_deref().unwrap_or("unknown error")
                );
            }
        }
        GatewayRequestStatus::AwaitingAuthorization(token) => {
            let description = pipeline
                .authorization_state()
                .outstanding()
                .map(|request| request.intent.to_string())
                .unwrap_or_default();
            let answer = prompt(&format!(
                "Authorize {} request {}? [y/N] ",
                description, token
            ))
            .await?
            .unwrap_or_default();
            let outcome = match answer.trim().to_lowercase().as_str() {
                "y" | "yes" => AuthorizationOutcome::Confirmed,
                _ => AuthorizationOutcome::Cancelled,
            };
            match pipeline.resolve_authorization(outcome).await? {
                AuthorizationOutcome::Confirmed => println!("Confirmed"),
                AuthorizationOutcome::Cancelled => println!("Cancelled"),
            }
        }
    }
    Ok(())
}

fn print_items(title: &str, items: &[Item]) {
    println!("{} ({}):", title, items.len());
    let now = Utc::now();
    for item in items {
        match item.days_until_purge(now) {
            Some(days) => println!("  {}  {}  ({} days left)", item.id, item.locator, days),
            None => println!("  {}  {}", item.id, item.locator),
        }
    }
}

fn print_status(pipeline: &ReviewPipeline) {
    match pipeline.review_state() {
        ReviewState::Loading => println!("Loading..."),
        ReviewState::Empty => println!("No more photos to review"),
        ReviewState::Ready(None) => println!("No photo available right now, try again"),
        ReviewState::Ready(Some(item)) => println!("[{}] {}", item.id, item.locator),
    }
    println!(
        "{} / {} reviewed, {} pending deletion",
        pipeline.processed_count(),
        pipeline.total_count(),
        pipeline.pending_count()
    );
}
