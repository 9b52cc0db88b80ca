//! Terminal rendering of a [`WeatherReport`].
//!
//! Everything here builds strings; printing is left to the caller.

use weather_core::{
    CurrentConditions, DailyForecastEntry, Location, UnitSystem, WeatherReport, codes,
    format::{
        format_clock_time, format_day, format_humidity, format_precipitation, format_temperature,
        format_wind,
    },
};

const LABEL_WIDTH: usize = 14;

pub fn render_report(report: &WeatherReport) -> String {
    let mut out = render_current(&report.location, &report.current, report.units);
    out.push('\n');
    out.push_str(&render_forecast(&report.daily, report.units));
    out
}

pub fn render_current(
    location: &Location,
    current: &CurrentConditions,
    units: UnitSystem,
) -> String {
    let (description, icon) = codes::describe_reported(current.weather_code);

    let rows = [
        ("Temperature:", format_temperature(current.temperature, units)),
        ("Feels like:", format_temperature(current.apparent_temperature, units)),
        ("Humidity:", format_humidity(current.relative_humidity)),
        (
            "Wind:",
            format_wind(current.wind_speed, current.wind_direction_degrees, units),
        ),
        ("Conditions:", format!("{icon}  {description}")),
    ];

    let mut body: Vec<Line> = vec![Line::Blank, Line::Centered(icon.to_string()), Line::Blank];
    body.extend(rows.into_iter().map(|(label, value)| {
        Line::Left(format!("{}  {value}", pad_left(label, LABEL_WIDTH)))
    }));
    body.push(Line::Blank);

    panel(&format!("Current Weather: {}", location.display_name()), &body)
}

pub fn render_forecast(daily: &[DailyForecastEntry], units: UnitSystem) -> String {
    let header = ["Date", "Conditions", "High", "Low", "Precip", "Sunrise", "Sunset"];
    let align = [
        Align::Left,
        Align::Left,
        Align::Right,
        Align::Right,
        Align::Right,
        Align::Center,
        Align::Center,
    ];
    let min_width = [10, 22, 8, 8, 8, 9, 9];

    let rows: Vec<[String; 7]> = daily
        .iter()
        .map(|day| {
            let (description, icon) = codes::describe_reported(day.weather_code);
            [
                format_day(day.date),
                format!("{icon}  {description}"),
                format_temperature(day.temperature_max, units),
                format_temperature(day.temperature_min, units),
                format_precipitation(day.precipitation_sum, units),
                format_clock_time(&day.sunrise),
                format_clock_time(&day.sunset),
            ]
        })
        .collect();

    let widths: Vec<usize> = (0..header.len())
        .map(|col| {
            rows.iter()
                .map(|row| display_width(&row[col]))
                .chain([display_width(header[col]), min_width[col]])
                .max()
                .unwrap_or(0)
        })
        .collect();

    let row_line = |cells: &[String]| {
        let parts: Vec<String> = cells
            .iter()
            .enumerate()
            .map(|(col, cell)| align[col].apply(cell, widths[col]))
            .collect();
        format!("│ {} │", parts.join(" │ "))
    };
    let rule = |left: &str, mid: &str, right: &str| {
        let parts: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
        format!("{left}{}{right}", parts.join(mid))
    };

    let header_cells: Vec<String> = header.iter().map(|h| h.to_string()).collect();
    let mut table = vec![
        Line::Left(rule("╭", "┬", "╮")),
        Line::Left(row_line(header_cells.as_slice())),
        Line::Left(rule("├", "┼", "┤")),
    ];
    table.extend(rows.iter().map(|row| Line::Left(row_line(row.as_slice()))));
    table.push(Line::Left(rule("╰", "┴", "╯")));

    let mut body = vec![Line::Blank];
    body.extend(table);
    body.push(Line::Blank);

    panel(&format!("{}-Day Forecast", daily.len()), &body)
}

enum Line {
    Blank,
    Left(String),
    Centered(String),
}

#[derive(Clone, Copy)]
enum Align {
    Left,
    Right,
    Center,
}

impl Align {
    fn apply(self, text: &str, width: usize) -> String {
        let gap = width.saturating_sub(display_width(text));
        match self {
            Align::Left => format!("{text}{}", " ".repeat(gap)),
            Align::Right => format!("{}{text}", " ".repeat(gap)),
            Align::Center => {
                let left = gap / 2;
                format!("{}{text}{}", " ".repeat(left), " ".repeat(gap - left))
            }
        }
    }
}

/// Rounded box with the title set into the top border.
fn panel(title: &str, body: &[Line]) -> String {
    const PAD: usize = 2;

    let content_width = body
        .iter()
        .map(|line| match line {
            Line::Blank => 0,
            Line::Left(text) | Line::Centered(text) => display_width(text),
        })
        .max()
        .unwrap_or(0)
        .max(display_width(title) + 2);
    let inner = content_width + PAD * 2;

    let title_fill = inner.saturating_sub(display_width(title) + 3);
    let mut out = format!("╭─ {title} {}╮\n", "─".repeat(title_fill));

    for line in body {
        let text = match line {
            Line::Blank => Align::Left.apply("", content_width),
            Line::Left(text) => Align::Left.apply(text, content_width),
            Line::Centered(text) => Align::Center.apply(text, content_width),
        };
        out.push_str(&format!("│{pad}{text}{pad}│\n", pad = " ".repeat(PAD)));
    }

    out.push_str(&format!("╰{}╯\n", "─".repeat(inner)));
    out
}

fn pad_left(text: &str, width: usize) -> String {
    Align::Right.apply(text, width)
}

/// Approximate terminal column width: emoji count double, variation
/// selectors and joiners count zero.
fn display_width(text: &str) -> usize {
    let chars: Vec<char> = text.chars().collect();
    chars
        .iter()
        .enumerate()
        .map(|(idx, &c)| {
            let next = chars.get(idx + 1).copied();
            match c {
                '\u{FE00}'..='\u{FE0F}' | '\u{200D}' => 0,
                _ if next == Some('\u{FE0F}') => 2,
                '\u{2600}'..='\u{27BF}' | '\u{1F300}'..='\u{1FAFF}' => 2,
                _ => 1,
            }
        })
        .sum()
}
