mod init;
pub use init::cmd_init;

use std::fs;
use std::path::Path;

use chrono::{Local, NaiveDate};
use tracing::{debug, warn};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::state::{self, ViewState};
use crate::io::vault_io::{self, VaultError};
use crate::model::config::Settings;
use crate::model::layout::LayoutItem;
use crate::model::note::DailyNote;
use crate::model::task::TaskRecord;
use crate::model::time::TimeOfDay;
use crate::model::vault::Vault;
use crate::ops::overlap::detect_range_overlaps;
use crate::ops::range::{self, DateRange, QuickRange};
use crate::ops::timeline::{layout_day, layout_timeline};
use crate::ops::zoom::ZoomState;
use crate::parse::{parse_codeblock, parse_flexible_date};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;

    let start = match cli.vault_dir {
        Some(ref dir) => fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?,
        None => std::env::current_dir()?,
    };

    match cli.command {
        // Init runs before vault discovery
        Commands::Init(args) => cmd_init(args, &start),

        Commands::Tasks(args) => cmd_tasks(&load_vault_from(&start)?, args, json),
        Commands::Day(args) => cmd_day(&load_vault_from(&start)?, args, json),
        Commands::Timeline(args) => cmd_timeline(&load_vault_from(&start)?, args, json),
        Commands::Overlaps(args) => cmd_overlaps(&load_vault_from(&start)?, args, json),
        Commands::Months => cmd_months(&load_vault_from(&start)?, json),
        Commands::Config(args) => cmd_config(&load_vault_from(&start)?, args, json),
        Commands::Preview(args) => cmd_preview(&load_vault_from(&start)?, args, json),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn load_vault_from(start: &Path) -> Result<Vault, VaultError> {
    let root = vault_io::discover_vault(start)?;
    vault_io::load_vault(&root)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    parse_flexible_date(s)
        .ok_or_else(|| format!("invalid date '{}' (expected YYYY-MM-DD or DD.MM.YYYY)", s))
}

fn parse_month_arg(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
        .map_err(|_| format!("invalid month '{}' (expected YYYY-MM)", s))
}

/// Zoom from the flag, else the last used level, else the configured default
fn resolve_zoom(flag: Option<f64>, saved: Option<f64>, settings: &Settings) -> ZoomState {
    let mut zoom = ZoomState::new(&settings.zoom);
    if let Some(level) = flag.or(saved) {
        zoom.set(level, &settings.zoom);
    }
    zoom
}

/// The note for one day, or an error naming the day
fn load_day(vault: &Vault, date: NaiveDate) -> Result<DailyNote, Box<dyn std::error::Error>> {
    vault_io::load_daily_notes(vault, &DateRange::new(date, date))?
        .into_iter()
        .next()
        .ok_or_else(|| format!("no timed tasks on {}", date).into())
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_tasks(vault: &Vault, args: TasksArgs, json: bool) -> CmdResult {
    let range = match args.date {
        Some(ref d) => {
            let date = parse_date_arg(d)?;
            DateRange::new(date, date)
        }
        None => range::default_range(&vault.settings, today())?,
    };
    let notes = vault_io::load_daily_notes(vault, &range)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&notes)?);
        return Ok(());
    }
    if notes.is_empty() {
        println!("(no timed tasks in {})", range);
        return Ok(());
    }
    for (i, note) in notes.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print_lines(&format_note_tasks(note));
    }
    Ok(())
}

fn cmd_day(vault: &Vault, args: DayArgs, json: bool) -> CmdResult {
    let date = parse_date_arg(&args.date)?;
    let saved = state::read_view_state(&vault.root).and_then(|s| s.zoom);
    let zoom = resolve_zoom(args.zoom, saved, &vault.settings);
    let note = load_day(vault, date)?;
    let day = layout_day(&note, 0, zoom.segment_width(&vault.settings.zoom), &vault.settings);

    if json {
        println!("{}", serde_json::to_string_pretty(&day)?);
    } else {
        print_lines(&format_day_layout(&day));
    }
    Ok(())
}

/// Pick the range to show and record it for `--prev`/`--next`.
///
/// Returns the range, the zoom to draw at and the state to persist.
fn resolve_timeline_view(
    vault: &Vault,
    args: &TimelineArgs,
    today: NaiveDate,
) -> Result<(DateRange, ZoomState, ViewState), Box<dyn std::error::Error>> {
    let settings = &vault.settings;
    let saved = state::read_view_state(&vault.root).unwrap_or_default();
    let mut preset: Option<QuickRange> = None;
    let mut navigated = false;

    let range = if let Some(ref month) = args.month {
        DateRange::month_of(parse_month_arg(month)?)
    } else if let (Some(from), Some(to)) = (&args.from, &args.to) {
        range::validate_custom(parse_date_arg(from)?, parse_date_arg(to)?)?
    } else if let Some(ref show) = args.show {
        let q: QuickRange = show.parse()?;
        preset = Some(q);
        q.range(today)
    } else if let Some(ref block) = args.block {
        let source =
            fs::read_to_string(block).map_err(|e| format!("cannot read {}: {}", block, e))?;
        let config = parse_codeblock(&source)?;
        preset = config.show;
        config.date_range(today)
    } else if args.prev || args.next {
        navigated = true;
        let last = match saved.last_range {
            Some(r) => r,
            None => range::default_range(settings, today)?,
        };
        if args.prev { last.previous()? } else { last.next()? }
    } else {
        range::default_range(settings, today)?
    };

    let zoom = if navigated && args.zoom.is_none() {
        let mut z = resolve_zoom(None, saved.zoom, settings);
        z.reset(&settings.zoom);
        z
    } else {
        resolve_zoom(args.zoom, saved.zoom, settings)
    };

    let next_state = ViewState {
        zoom: Some(zoom.level),
        last_preset: preset,
        last_range: Some(range),
    };
    Ok((range, zoom, next_state))
}

fn cmd_timeline(vault: &Vault, args: TimelineArgs, json: bool) -> CmdResult {
    let (range, zoom, next_state) = resolve_timeline_view(vault, &args, today())?;
    debug!(%range, zoom = zoom.level, "timeline view");

    let notes = vault_io::load_daily_notes(vault, &range)?;
    let timeline = layout_timeline(&notes, &zoom, &vault.settings);

    if let Err(e) = state::write_view_state(&vault.root, &next_state) {
        warn!(error = %e, "could not save view state");
    }

    if json {
        let out = TimelineJson {
            range,
            zoom_label: zoom.percent_label(),
            layout: timeline,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print_lines(&format_timeline(
            &range,
            &zoom.percent_label(),
            &timeline,
            &vault.settings,
            args.width,
        ));
    }
    Ok(())
}

fn cmd_overlaps(vault: &Vault, args: OverlapsArgs, json: bool) -> CmdResult {
    let date = parse_date_arg(&args.date)?;
    let note = load_day(vault, date)?;
    let levels = detect_range_overlaps(&note.tasks);

    if json {
        let out = OverlapsJson {
            date,
            ranges: levels,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", format_day_header(date));
        for line in format_range_levels(&levels) {
            println!("  {}", line);
        }
    }
    Ok(())
}

fn cmd_months(vault: &Vault, json: bool) -> CmdResult {
    let months = vault_io::available_months(vault)?;
    if json {
        let out: Vec<MonthJson> = months.iter().map(|&(y, m)| month_to_json(y, m)).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if months.is_empty() {
        println!("(no dated notes)");
    } else {
        for (y, m) in months {
            println!("{}-{:02}  {}", y, m, month_label(y, m));
        }
    }
    Ok(())
}

/// Tasks under the dot at `time`: a single task, a cluster whose average
/// time matches, and range tasks starting then.
fn tasks_at<'a>(
    note: &'a DailyNote,
    time: TimeOfDay,
    segment_width: f64,
    settings: &Settings,
) -> Vec<&'a TaskRecord> {
    let day = layout_day(note, 0, segment_width, settings);
    let label = time.to_string();
    let mut found: Vec<&TaskRecord> = Vec::new();
    for dot in &day.dots {
        match &dot.item {
            LayoutItem::Single { task, .. } if task.time == time => found.push(*task),
            LayoutItem::Cluster(c) if c.average_time == label => found.extend(c.tasks.iter()),
            _ => {}
        }
    }
    found.extend(day.ranges.iter().map(|r| r.task).filter(|t| t.time == time));
    found
}

fn cmd_preview(vault: &Vault, args: PreviewArgs, json: bool) -> CmdResult {
    let date = parse_date_arg(&args.date)?;
    let time: TimeOfDay = args.time.parse()?;
    let saved = state::read_view_state(&vault.root).and_then(|s| s.zoom);
    let zoom = resolve_zoom(args.zoom, saved, &vault.settings);
    let note = load_day(vault, date)?;

    let tasks = tasks_at(&note, time, zoom.segment_width(&vault.settings.zoom), &vault.settings);
    if tasks.is_empty() {
        return Err(format!("no task at {} on {}", time, date).into());
    }

    let preview = PreviewJson {
        date,
        time: time.to_string(),
        tasks: tasks
            .iter()
            .map(|t| preview_task_to_json(t, &vault.settings))
            .collect(),
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&preview)?);
    } else {
        print_lines(&format_preview(&preview));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn cmd_config(vault: &Vault, args: ConfigCmd, json: bool) -> CmdResult {
    match args.action {
        None => {
            if json {
                println!("{}", serde_json::to_string_pretty(&vault.settings)?);
            } else {
                let path = vault.root.join(vault_io::CONFIG_FILE);
                print!("{}", fs::read_to_string(path)?);
            }
        }
        Some(ConfigAction::Get { key }) => {
            let (_, doc) = config_io::read_config(&vault.root)?;
            let value =
                config_io::get_value(&doc, &key).ok_or_else(|| format!("{} is not set", key))?;
            println!("{}", value);
        }
        Some(ConfigAction::Set { key, value }) => {
            let (_, mut doc) = config_io::read_config(&vault.root)?;
            config_io::set_value(&mut doc, &key, &value)?;
            toml::from_str::<Settings>(&doc.to_string())
                .map_err(|e| format!("invalid value for {}: {}", key, e))?;
            config_io::write_config(&vault.root, &doc)?;
            println!("{} = {}", key, value);
        }
    }
    Ok(())
}
