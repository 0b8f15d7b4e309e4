//! `timeblock` CLI — manage a day-planner block file from the command line.
//!
//! Blocks live in a JSON file (an array of block objects). Every invocation
//! loads the file into the in-memory repository, runs one store operation,
//! and writes the file back after mutations.
//!
//! ## Usage
//!
//! ```sh
//! # Schedule an event block
//! timeblock -f day.json add --date 2024-06-05 --start 09:00 --end 10:00 --title "Standup"
//!
//! # Schedule a task block, resolving metadata from a task directory file
//! timeblock -f day.json add --kind task --task tsk-7 --tasks tasks.json \
//!   --date 2024-06-05 --start 10:00 --end 11:30
//!
//! # Move a block (a conflict exits with status 2 and lists the blockers)
//! timeblock -f day.json update blk-1 --start 09:30 --end 10:30
//!
//! # Review
//! timeblock -f day.json list --from 2024-06-03 --to 2024-06-09
//! timeblock -f day.json overdue --before 2024-06-10 --limit 10
//! timeblock -f day.json summary --date 2024-06-05
//! timeblock -f day.json layout --date 2024-06-05
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::process;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use chrono::{NaiveDate, NaiveTime};
use timeblock_engine::{
    Block, BlockKind, BlockPatch, BlockStatus, BlockStore, CategoryInfo, CreateBlock,
    InMemoryBlockRepository, InMemoryCategoryDirectory, InMemoryTaskDirectory, ScheduleError,
    TaskInfo,
};

/// Exit code for a scheduling conflict, distinct from general errors.
const CONFLICT_EXIT: i32 = 2;

#[derive(Parser)]
#[command(name = "timeblock", version, about = "Day-planner scheduling CLI")]
struct Cli {
    /// Block file (JSON array of blocks)
    #[arg(short, long, global = true, default_value = "blocks.json")]
    file: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Schedule a new block
    Add {
        /// Block kind: "event" or "task"
        #[arg(long, default_value = "event")]
        kind: String,
        #[arg(long)]
        date: String,
        /// Start time (HH:MM)
        #[arg(long)]
        start: String,
        /// End time (HH:MM, exclusive)
        #[arg(long)]
        end: String,
        /// Display title (required for event blocks)
        #[arg(long)]
        title: Option<String>,
        /// External task id (required for task blocks)
        #[arg(long)]
        task: Option<String>,
        /// Category id to snapshot
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        comment: Option<String>,
        /// Task directory file (JSON map of id → {title, parent_chain})
        #[arg(long)]
        tasks: Option<String>,
        /// Category directory file (JSON map of id → {name, color})
        #[arg(long)]
        categories: Option<String>,
    },
    /// Update fields of an existing block
    Update {
        id: String,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        /// One of: scheduled, in_progress, partially_completed, completed, cancelled
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        comment: Option<String>,
        /// Re-assign the category and re-snapshot its display data
        #[arg(long)]
        category: Option<String>,
        /// Category directory file (JSON map of id → {name, color})
        #[arg(long)]
        categories: Option<String>,
    },
    /// Hard-delete a block
    Delete { id: String },
    /// List blocks in an inclusive date range
    List {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
    },
    /// List blocks scheduled for a task
    ForTask { task_id: String },
    /// Past blocks that were never completed or cancelled
    Overdue {
        #[arg(long)]
        before: String,
        #[arg(long)]
        since: Option<String>,
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Planned vs. effective minutes for one day
    Summary {
        #[arg(long)]
        date: String,
    },
    /// Side-by-side column geometry for one day's blocks
    Layout {
        #[arg(long)]
        date: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let file = cli.file.clone();

    match cli.command {
        Commands::Add {
            kind,
            date,
            start,
            end,
            title,
            task,
            category,
            comment,
            tasks,
            categories,
        } => {
            let (repository, store) = open_store(&file, tasks.as_deref(), categories.as_deref())?;
            let input = CreateBlock {
                kind: parse_kind(&kind)?,
                date: parse_date(&date)?,
                start_time: parse_time(&start)?,
                end_time: parse_time(&end)?,
                title,
                task_id: task,
                category_id: category,
                comment,
            };
            let block = run_write(store.create(input))?;
            save_blocks(&file, &repository)?;
            print_json(&block)?;
        }
        Commands::Update {
            id,
            date,
            start,
            end,
            status,
            title,
            comment,
            category,
            categories,
        } => {
            let (repository, store) = open_store(&file, None, categories.as_deref())?;
            let patch = BlockPatch {
                date: date.as_deref().map(parse_date).transpose()?,
                start_time: start.as_deref().map(parse_time).transpose()?,
                end_time: end.as_deref().map(parse_time).transpose()?,
                status: status.as_deref().map(parse_status).transpose()?,
                title,
                comment,
                category_id: category,
            };
            let block = run_write(store.update(&id, patch))?;
            save_blocks(&file, &repository)?;
            print_json(&block)?;
        }
        Commands::Delete { id } => {
            let (repository, store) = open_store(&file, None, None)?;
            store
                .delete(&id)
                .with_context(|| format!("Failed to delete block {id}"))?;
            save_blocks(&file, &repository)?;
        }
        Commands::List { from, to } => {
            let (_, store) = open_store(&file, None, None)?;
            let blocks = store.query_range(parse_date(&from)?, parse_date(&to)?)?;
            print_json(&blocks)?;
        }
        Commands::ForTask { task_id } => {
            let (_, store) = open_store(&file, None, None)?;
            let blocks = store.query_by_task(&task_id)?;
            print_json(&blocks)?;
        }
        Commands::Overdue {
            before,
            since,
            limit,
        } => {
            let (_, store) = open_store(&file, None, None)?;
            let since = since.as_deref().map(parse_date).transpose()?;
            let blocks = store.query_past_incomplete(parse_date(&before)?, since, limit)?;
            print_json(&blocks)?;
        }
        Commands::Summary { date } => {
            let (_, store) = open_store(&file, None, None)?;
            let summary = store.daily_summary(parse_date(&date)?)?;
            print_json(&summary)?;
        }
        Commands::Layout { date } => {
            let date = parse_date(&date)?;
            let blocks: Vec<Block> = load_blocks(&file)?
                .into_iter()
                .filter(|block| block.date == date)
                .collect();
            print_json(&timeblock_engine::layout(&blocks))?;
        }
    }

    Ok(())
}

/// Load the day-file into an in-memory repository and build a store over it,
/// with directories loaded from the optional JSON files.
fn open_store(
    file: &str,
    tasks_file: Option<&str>,
    categories_file: Option<&str>,
) -> Result<(Arc<InMemoryBlockRepository>, BlockStore)> {
    let repository = Arc::new(InMemoryBlockRepository::with_blocks(load_blocks(file)?));

    let tasks = match tasks_file {
        Some(path) => {
            let map: HashMap<String, TaskInfo> = read_json(path)
                .with_context(|| format!("Failed to read task directory: {path}"))?;
            InMemoryTaskDirectory::from_map(map)
        }
        None => InMemoryTaskDirectory::new(),
    };
    let categories = match categories_file {
        Some(path) => {
            let map: HashMap<String, CategoryInfo> = read_json(path)
                .with_context(|| format!("Failed to read category directory: {path}"))?;
            InMemoryCategoryDirectory::from_map(map)
        }
        None => InMemoryCategoryDirectory::new(),
    };

    let store = BlockStore::new(repository.clone(), Arc::new(tasks), Arc::new(categories))?;
    Ok((repository, store))
}

/// A missing day-file is an empty schedule.
fn load_blocks(file: &str) -> Result<Vec<Block>> {
    if !Path::new(file).exists() {
        return Ok(Vec::new());
    }
    read_json(file).with_context(|| format!("Failed to read block file: {file}"))
}

fn save_blocks(file: &str, repository: &InMemoryBlockRepository) -> Result<()> {
    use timeblock_engine::BlockRepository;

    let mut blocks = repository
        .list_all()
        .map_err(ScheduleError::from)
        .context("Failed to snapshot blocks for saving")?;
    blocks.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then(a.start_time.cmp(&b.start_time))
            .then(a.id.cmp(&b.id))
    });
    let json = serde_json::to_string_pretty(&blocks)?;
    std::fs::write(file, json).with_context(|| format!("Failed to write block file: {file}"))
}

/// Unwrap a store write, turning a conflict into the dedicated exit code
/// with the conflicting blocks listed on stderr.
fn run_write(result: timeblock_engine::Result<Block>) -> Result<Block> {
    match result {
        Ok(block) => Ok(block),
        Err(ScheduleError::Conflict(conflicts)) => {
            eprintln!(
                "requested time overlaps {} existing block(s):",
                conflicts.len()
            );
            for block in &conflicts {
                eprintln!(
                    "  {}  {} {}-{}  {}",
                    block.id, block.date, block.start_time, block.end_time, block.title
                );
            }
            process::exit(CONFLICT_EXIT);
        }
        Err(error) => Err(error.into()),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> Result<T> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn parse_kind(raw: &str) -> Result<BlockKind> {
    match raw {
        "event" => Ok(BlockKind::Event),
        "task" => Ok(BlockKind::Task),
        other => bail!("Unknown block kind: '{other}'. Expected 'event' or 'task'"),
    }
}

fn parse_status(raw: &str) -> Result<BlockStatus> {
    match raw {
        "scheduled" => Ok(BlockStatus::Scheduled),
        "in_progress" => Ok(BlockStatus::InProgress),
        "partially_completed" => Ok(BlockStatus::PartiallyCompleted),
        "completed" => Ok(BlockStatus::Completed),
        "cancelled" => Ok(BlockStatus::Cancelled),
        other => bail!(
            "Unknown status: '{other}'. Expected scheduled, in_progress, \
             partially_completed, completed, or cancelled"
        ),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{raw}': expected YYYY-MM-DD"))
}

fn parse_time(raw: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .with_context(|| format!("Invalid time '{raw}': expected HH:MM"))
}
