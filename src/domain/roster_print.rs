//! Printable annual roster: 12 month grids, colour-coded by roster type.

use chrono::NaiveDate;

use super::roster::AnnualRoster;
use crate::database::models::RosterType;

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

const STYLE: &str = r#"
* { margin: 0; padding: 0; box-sizing: border-box; }
body { font-family: Arial, sans-serif; padding: 20px; background: white; }
.header { text-align: center; margin-bottom: 20px; }
.header h1 { font-size: 28px; color: #1e293b; margin-bottom: 5px; }
.header p { font-size: 14px; color: #64748b; margin-bottom: 15px; }
.legend { display: flex; gap: 30px; justify-content: center; margin-bottom: 20px; font-size: 13px; }
.legend-item { display: flex; align-items: center; gap: 8px; }
.legend-color { width: 20px; height: 20px; border-radius: 3px; }
.months-grid { display: grid; grid-template-columns: repeat(4, 1fr); gap: 15px; }
.month { border: 1px solid #cbd5e1; border-radius: 8px; padding: 10px; background: #f8fafc; }
.month-title { font-weight: bold; font-size: 14px; text-align: center; color: #1e293b; margin-bottom: 8px; border-bottom: 2px solid #64748b; padding-bottom: 5px; }
.weekdays, .days { display: grid; grid-template-columns: repeat(7, 1fr); gap: 2px; }
.weekday { font-size: 11px; font-weight: bold; text-align: center; color: #64748b; padding: 4px 0; }
.day { aspect-ratio: 1; display: flex; align-items: center; justify-content: center; font-size: 10px; font-weight: bold; border-radius: 3px; color: #1e293b; border: 1px solid #cbd5e1; }
.day.empty { background: white; border: none; }
.day.today { font-weight: 900; font-size: 11px; border: 2px solid #1e293b; }
@page { size: A3 landscape; margin: 10mm; }
"#;

pub fn roster_color(roster_type: RosterType) -> &'static str {
    match roster_type {
        RosterType::Day => "#FCD34D",
        RosterType::Night => "#3B82F6",
        RosterType::Rest => "#F472B6",
    }
}

fn legend_label(roster_type: RosterType) -> &'static str {
    match roster_type {
        RosterType::Day => "Day Shift",
        RosterType::Night => "Night Shift",
        RosterType::Rest => "Rest Day",
    }
}

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Download name for the roster, e.g. `J._Edwards_2026.html`.
pub fn roster_filename(full_name: Option<&str>, year: i32) -> String {
    let stem: String = full_name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or("Roster")
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
        .collect();
    format!("{stem}_{year}.html")
}

pub fn render_html(roster: &AnnualRoster, full_name: Option<&str>, generated_on: NaiveDate) -> String {
    let title = escape_html(full_name.filter(|n| !n.trim().is_empty()).unwrap_or("Team"));
    let mut html = String::new();

    html.push_str(&format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n<title>{title} - {year} Roster</title>\n<style>{STYLE}</style>\n</head>\n<body>\n",
        year = roster.year,
    ));
    html.push_str(&format!(
        "<div class=\"header\"><h1>{title} - {year} Roster</h1><p>Team: {team} | Generated: {generated_on}</p></div>\n",
        year = roster.year,
        team = escape_html(&roster.team),
    ));

    html.push_str("<div class=\"legend\">");
    for roster_type in [RosterType::Day, RosterType::Night, RosterType::Rest] {
        html.push_str(&format!(
            "<div class=\"legend-item\"><div class=\"legend-color\" style=\"background-color: {};\"></div><span>{}</span></div>",
            roster_color(roster_type),
            legend_label(roster_type),
        ));
    }
    html.push_str("</div>\n<div class=\"months-grid\">\n");

    for month in &roster.months {
        html.push_str(&format!(
            "<div class=\"month\"><div class=\"month-title\">{}</div><div class=\"weekdays\">",
            month.name
        ));
        for weekday in WEEKDAYS {
            html.push_str(&format!("<div class=\"weekday\">{weekday}</div>"));
        }
        html.push_str("</div><div class=\"days\">");

        for _ in 0..month.leading_blanks {
            html.push_str("<div class=\"day empty\"></div>");
        }
        for cell in &month.days {
            html.push_str(&format!(
                "<div class=\"day{}\" data-type=\"{}\" style=\"background-color: {};\">{}</div>",
                if cell.is_today { " today" } else { "" },
                cell.roster_type,
                roster_color(cell.roster_type),
                cell.day,
            ));
        }
        html.push_str("</div></div>\n");
    }

    html.push_str("</div>\n</body>\n</html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::roster::{RosterCalendar, RosterPattern};
    use pretty_assertions::assert_eq;

    fn roster() -> AnnualRoster {
        let base = NaiveDate::from_ymd_opt(2026, 2, 2).unwrap();
        let calendar = RosterCalendar::new(base, RosterPattern::all_rest());
        AnnualRoster::build(2026, "Team1", &calendar, base).unwrap()
    }

    #[test]
    fn renders_every_day_with_its_colour() {
        let html = render_html(&roster(), Some("J. Edwards"), NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());

        assert!(html.contains("J. Edwards - 2026 Roster"));
        assert!(html.contains("Team: Team1 | Generated: 2026-01-01"));
        assert_eq!(html.matches("data-type=\"rest\"").count(), 365);
        assert_eq!(html.matches(" today\"").count(), 1);
        assert!(html.contains("#F472B6"));
    }

    #[test]
    fn names_are_escaped() {
        let html = render_html(&roster(), Some("<b>O'Neil</b>"), NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        assert!(html.contains("&lt;b&gt;O&#39;Neil&lt;/b&gt;"));
        assert!(!html.contains("<b>O'Neil"));
    }

    #[test]
    fn filename_falls_back_and_sanitises() {
        assert_eq!(roster_filename(None, 2026), "Roster_2026.html");
        assert_eq!(roster_filename(Some("J. Edwards"), 2026), "J._Edwards_2026.html");
    }
}
