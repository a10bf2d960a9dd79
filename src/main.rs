use std::process::ExitCode;

use chrono::{Datelike, NaiveDate};
use clap::{Args, Parser};

use crmdesk::api::{ApiClient, Resource};
use crmdesk::config::CrmConfig;
use crmdesk::core::calendar::{WEEKDAY_SHORT, build_month_grid};
use crmdesk::core::conversation::{self, Conversation};
use crmdesk::core::dates::{self, format_date_key, parse_date_key};
use crmdesk::core::labels;
use crmdesk::core::overlay::TasksOverlay;
use crmdesk::core::views::ViewMode;
use crmdesk::core::workspace::JsonWorkspaceStore;

#[derive(Parser, Debug)]
#[command(name = "crmdesk")]
#[command(about = "Print the CRM tasks calendar for a view mode")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    mode: ModeFlags,

    /// Show the tasks of one day (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date_key)]
    date: Option<NaiveDate>,

    /// Log debug messages to the journal
    #[arg(long)]
    debug: bool,
}

/// At most one view mode; none means day view.
#[derive(Args, Debug, Default)]
#[group(multiple = false)]
struct ModeFlags {
    #[arg(long)]
    day: bool,
    #[arg(long)]
    week: bool,
    #[arg(long)]
    month: bool,
    #[arg(long)]
    year: bool,
    #[arg(long)]
    overdue: bool,
}

impl ModeFlags {
    fn view_mode(&self) -> ViewMode {
        if self.day {
            ViewMode::Day
        } else if self.week {
            ViewMode::Week
        } else if self.month {
            ViewMode::Month
        } else if self.year {
            ViewMode::Year
        } else if self.overdue {
            ViewMode::Overdue
        } else {
            ViewMode::Day
        }
    }
}

/// Log to the systemd user journal (`journalctl --user -t crmdesk -f`).
/// crmdesk targets at info/debug (per config), everything else at warn.
fn install_logging() {
    struct FilteredJournal {
        inner: systemd_journal_logger::JournalLog,
    }

    impl log::Log for FilteredJournal {
        fn enabled(&self, metadata: &log::Metadata) -> bool {
            metadata.level() <= crmdesk::max_level_for(metadata.target())
        }
        fn log(&self, record: &log::Record) {
            if self.enabled(record.metadata()) {
                self.inner.log(record);
            }
        }
        fn flush(&self) {
            self.inner.flush();
        }
    }

    let journal = match systemd_journal_logger::JournalLog::new() {
        Ok(journal) => journal.with_syslog_identifier("crmdesk".to_string()),
        Err(e) => {
            eprintln!("journal logging unavailable: {}", e);
            return;
        }
    };

    if log::set_boxed_logger(Box::new(FilteredJournal { inner: journal })).is_ok() {
        // Global max must be Debug so crate debug logs can pass through when toggled
        log::set_max_level(log::LevelFilter::Debug);
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Cli::parse();

    let config = CrmConfig::load(&CrmConfig::default_path());
    crmdesk::set_debug_logging(config.debug_logging || args.debug);
    install_logging();

    if let Err(e) = config.ensure_dirs() {
        log::warn!("{}", e);
    }

    let client = match ApiClient::new(&config.api_base_url) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut conversations_load: Resource<Vec<Conversation>> = Resource::new();
    let flag = conversations_load.begin();
    let result = client.fetch_conversations(None).await.map(|page| {
        let local = conversation::load_conversations(&config.conversations_cache_path());
        let store = JsonWorkspaceStore::open(config.workspace_overrides_path());
        conversation::merge_conversations(&page.items, &local, &store)
    });
    conversations_load.finish(&flag, result);

    let Some(conversations) = conversations_load.state().ready() else {
        let reason = conversations_load.state().error().unwrap_or("no response");
        eprintln!("Não foi possível carregar as conversas: {}", reason);
        return ExitCode::FAILURE;
    };
    conversation::save_conversations(&config.conversations_cache_path(), conversations);

    let ids: Vec<&str> = conversations.iter().map(|c| c.id.as_str()).collect();
    let tasks = client.fetch_all_tasks(&ids).await;

    let mut overlay = TasksOverlay::new(config.upcoming_limit);
    overlay.open(tasks);
    overlay.set_view_mode(args.mode.view_mode());
    if let Some(date) = args.date {
        overlay.select_date(date);
    }

    print_overlay(&overlay, conversations, dates::today());
    ExitCode::SUCCESS
}

fn print_overlay(overlay: &TasksOverlay, conversations: &[Conversation], today: NaiveDate) {
    let mode = overlay.view_mode();
    let entries = overlay.entries(conversations, today);

    println!("Tarefas: {}", labels::view_mode_label(mode));
    println!("{}", labels::header_title(mode, today));
    println!("{}\n", labels::header_subtitle(mode, entries.len()));

    if matches!(mode, ViewMode::Month | ViewMode::Year) {
        let reference = overlay.selected_date().unwrap_or(today);
        print_month(overlay, reference.year(), reference.month0(), today);
        println!();
    }

    match overlay.selected_date() {
        Some(date) => println!("Tarefas de {}", labels::selected_date_label(date)),
        None => println!("Próximas tarefas"),
    }

    if entries.is_empty() {
        println!("  Nenhuma tarefa para este período");
        return;
    }
    for entry in &entries {
        let marker = if entry.overdue { "!" } else { " " };
        println!("{} {}", marker, entry.title);
        println!("    {}", entry.subtitle);
    }
}

fn print_month(overlay: &TasksOverlay, year: i32, month_index: u32, today: NaiveDate) {
    let today_key = format_date_key(today.year(), today.month0(), today.day());
    println!("  {} {}", labels::MONTH_NAMES[month_index as usize], year);
    println!("  {}", WEEKDAY_SHORT.map(|d| format!("{:>3}", d)).concat());
    for week in build_month_grid(year, month_index) {
        let row: String = week
            .iter()
            .map(|cell| match cell {
                None => "    ".to_string(),
                Some(day) => {
                    let dot = if overlay.has_tasks_on(year, month_index, *day) {
                        '•'
                    } else if format_date_key(year, month_index, *day) == today_key {
                        '*'
                    } else {
                        ' '
                    };
                    format!("{:>3}{}", day, dot)
                }
            })
            .collect();
        println!("  {}", row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_day_view() {
        let cli = Cli::try_parse_from(["crmdesk"]).unwrap();
        assert_eq!(cli.mode.view_mode(), ViewMode::Day);
        assert_eq!(cli.date, None);
        assert!(!cli.debug);
    }

    #[test]
    fn mode_and_date_flags() {
        let cli = Cli::try_parse_from(["crmdesk", "--month", "--date", "2025-07-10", "--debug"]).unwrap();
        assert_eq!(cli.mode.view_mode(), ViewMode::Month);
        assert_eq!(cli.date, NaiveDate::from_ymd_opt(2025, 7, 10));
        assert!(cli.debug);
    }

    #[test]
    fn rejects_two_modes_and_bad_dates() {
        assert!(Cli::try_parse_from(["crmdesk", "--week", "--year"]).is_err());
        assert!(Cli::try_parse_from(["crmdesk", "--date", "2025-02-30"]).is_err());
        assert!(Cli::try_parse_from(["crmdesk", "--decade"]).is_err());
    }
}
