//! Display strings for the tasks overlay (pt-BR, as shown to agents).

use chrono::{Datelike, NaiveDate};

use super::task::Task;
use super::views::ViewMode;

pub const MONTH_NAMES: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "jan.", "fev.", "mar.", "abr.", "mai.", "jun.", "jul.", "ago.", "set.", "out.", "nov.", "dez.",
];

pub fn view_mode_label(mode: ViewMode) -> &'static str {
    match mode {
        ViewMode::Day => "Dia",
        ViewMode::Week => "Semana",
        ViewMode::Month => "Mês",
        ViewMode::Year => "Ano",
        ViewMode::Overdue => "Atrasadas",
    }
}

pub fn month_label(date: NaiveDate) -> String {
    format!("{} de {}", MONTH_NAMES[date.month0() as usize], date.year())
}

/// Month name for a year-view mini calendar, without the trailing dot.
pub fn month_short_label(month_index: u32) -> &'static str {
    MONTH_ABBREVIATIONS
        .get(month_index as usize)
        .map(|m| m.trim_end_matches('.'))
        .unwrap_or("")
}

pub fn header_title(mode: ViewMode, today: NaiveDate) -> String {
    match mode {
        ViewMode::Day => "Hoje".to_string(),
        ViewMode::Week => "Semana".to_string(),
        ViewMode::Month => month_label(today),
        ViewMode::Year => today.year().to_string(),
        ViewMode::Overdue => "Atrasadas".to_string(),
    }
}

pub fn header_subtitle(mode: ViewMode, count: usize) -> String {
    let (one, many) = match mode {
        ViewMode::Day => ("uma tarefa pendente", "tarefas pendentes"),
        ViewMode::Week => ("uma tarefa nesta semana", "tarefas nesta semana"),
        ViewMode::Month => ("uma tarefa neste mês", "tarefas neste mês"),
        ViewMode::Year => ("uma tarefa neste ano", "tarefas neste ano"),
        ViewMode::Overdue => ("uma tarefa atrasada", "tarefas atrasadas"),
    };
    if count == 1 {
        format!("Você tem {}", one)
    } else {
        format!("Você tem {} {}", count, many)
    }
}

/// `"05 de outubro"`.
pub fn selected_date_label(date: NaiveDate) -> String {
    format!("{:02} de {}", date.day(), MONTH_NAMES[date.month0() as usize])
}

/// `"5 de jul. às 14:00"`; either half may be missing.
pub fn format_task_when(task: &Task) -> String {
    let date_label = task
        .due_date()
        .map(|d| format!("{} de {}", d.day(), MONTH_ABBREVIATIONS[d.month0() as usize]))
        .unwrap_or_default();

    let time = task.time.as_deref().map(str::trim).unwrap_or("");
    match (date_label.is_empty(), time.is_empty()) {
        (_, true) => date_label,
        (true, false) => time.to_string(),
        (false, false) => format!("{} às {}", date_label, time),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn titles_per_mode() {
        let today = ymd(2026, 10, 19);
        assert_eq!(header_title(ViewMode::Day, today), "Hoje");
        assert_eq!(header_title(ViewMode::Month, today), "outubro de 2026");
        assert_eq!(header_title(ViewMode::Year, today), "2026");
    }

    #[test]
    fn subtitle_pluralizes() {
        assert_eq!(header_subtitle(ViewMode::Day, 1), "Você tem uma tarefa pendente");
        assert_eq!(header_subtitle(ViewMode::Week, 3), "Você tem 3 tarefas nesta semana");
        assert_eq!(header_subtitle(ViewMode::Year, 0), "Você tem 0 tarefas neste ano");
    }

    #[test]
    fn when_label_variants() {
        let dated = Task::new("1", "x").with_date("2025-07-05");
        assert_eq!(format_task_when(&dated), "5 de jul.");

        let timed = dated.clone().with_time(" 14:00 ");
        assert_eq!(format_task_when(&timed), "5 de jul. às 14:00");

        let time_only = Task::new("2", "x").with_time("09:30");
        assert_eq!(format_task_when(&time_only), "09:30");

        assert_eq!(format_task_when(&Task::new("3", "x")), "");
    }

    #[test]
    fn selected_label_pads_day() {
        assert_eq!(selected_date_label(ymd(2025, 3, 7)), "07 de março");
    }

    #[test]
    fn short_month_drops_dot() {
        assert_eq!(month_short_label(0), "jan");
        assert_eq!(month_short_label(12), "");
    }
}
