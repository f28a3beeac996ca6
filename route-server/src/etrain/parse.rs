//! HTML parsing for etrain.info station and schedule pages.
//!
//! Parsing is strict: if the markup we rely on is missing, the page is
//! rejected with [`FetchError::Parse`] rather than guessed at.

use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;

use crate::domain::{
    ScheduledStop, Station, StationCode, StopSequence, TrainNumber, TrainSummary,
};

use super::error::FetchError;

/// JSON payload carried in the `data-train` attribute of a listing row.
#[derive(Debug, Deserialize)]
struct DataTrain {
    num: NumField,
    #[serde(default)]
    name: Option<String>,
    /// Start station code
    s: String,
    #[serde(default)]
    sn: Option<String>,
    /// End station code
    d: String,
    #[serde(default)]
    dn: Option<String>,
}

/// Train numbers appear both quoted and bare.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumField {
    Text(String),
    Number(u64),
}

impl NumField {
    fn into_string(self) -> String {
        match self {
            NumField::Text(s) => s,
            NumField::Number(n) => n.to_string(),
        }
    }
}

fn selector(css: &str) -> Result<Selector, FetchError> {
    Selector::parse(css).map_err(|e| FetchError::Parse(format!("bad selector {css:?}: {e}")))
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Split link text of the form `"NDLS - New Delhi"` into code and name.
/// The name part is optional.
fn split_code_and_name(text: &str) -> (&str, Option<String>) {
    match text.split_once('-') {
        Some((code, name)) => {
            let name = name.trim();
            (code.trim(), (!name.is_empty()).then(|| name.to_string()))
        }
        None => (text.trim(), None),
    }
}

fn parse_code(raw: &str, context: &str) -> Result<StationCode, FetchError> {
    StationCode::parse_normalized(raw)
        .map_err(|e| FetchError::Parse(format!("{context}: {e} ({raw:?})")))
}

/// Non-empty trimmed string, or `None`.
fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Parse the "all trains" page of a station into train summaries, in page
/// order.
///
/// A page without any table is not a station listing and is rejected. A
/// listing table with no train rows is a valid empty result.
pub fn parse_station_listing(html: &str) -> Result<Vec<TrainSummary>, FetchError> {
    let document = Html::parse_document(html);

    if document.select(&selector("table")?).next().is_none() {
        return Err(FetchError::Parse(
            "station page has no train table".to_string(),
        ));
    }

    let rows = selector("tr[data-train]")?;
    document
        .select(&rows)
        .enumerate()
        .map(|(i, row)| parse_listing_row(i, row))
        .collect()
}

fn parse_listing_row(i: usize, row: ElementRef<'_>) -> Result<TrainSummary, FetchError> {
    let payload = row.value().attr("data-train").unwrap_or_default();

    let data: DataTrain = serde_json::from_str(payload).map_err(|e| {
        FetchError::Parse(format!("row {i}: invalid data-train payload: {e}"))
    })?;

    let number = data.num.into_string();
    let number = TrainNumber::parse(&number)
        .map_err(|e| FetchError::Parse(format!("row {i}: {e} ({number:?})")))?;

    let start = parse_code(&data.s, &format!("train {number} start station"))?;
    let end = parse_code(&data.d, &format!("train {number} end station"))?;

    Ok(TrainSummary {
        number,
        name: non_empty(data.name).unwrap_or_default(),
        start_station: Station::unresolved(start, non_empty(data.sn)),
        end_station: Station::unresolved(end, non_empty(data.dn)),
    })
}

/// Parse a train schedule page into its stops, in route order.
///
/// Reads the schedule table when present, otherwise the source-station
/// dropdown. Either way at least one stop is required.
pub fn parse_stop_sequence(html: &str) -> Result<StopSequence, FetchError> {
    let document = Html::parse_document(html);

    let stops = if let Some(table) = document.select(&selector("table.schtbl")?).next() {
        parse_schedule_table(table)?
    } else if let Some(dropdown) = document.select(&selector("select[name=src]")?).next() {
        parse_source_options(dropdown)?
    } else {
        return Err(FetchError::Parse(
            "schedule page has no schedule table".to_string(),
        ));
    };

    if stops.is_empty() {
        return Err(FetchError::Parse("schedule lists no stops".to_string()));
    }

    Ok(stops)
}

fn parse_schedule_table(table: ElementRef<'_>) -> Result<StopSequence, FetchError> {
    let rows = selector("tr")?;
    let cell = selector("td.stnc")?;
    let link = selector("a[href*='/station/']")?;

    let mut stops = Vec::new();
    for row in table.select(&rows) {
        let Some(anchor) = row
            .select(&cell)
            .next()
            .and_then(|c| c.select(&link).next())
        else {
            continue;
        };

        let text = text_of(anchor);
        let (code, name) = split_code_and_name(&text);
        if code.is_empty() {
            continue;
        }
        stops.push(ScheduledStop::new(parse_code(code, "schedule row")?, name));
    }

    Ok(stops)
}

fn parse_source_options(dropdown: ElementRef<'_>) -> Result<StopSequence, FetchError> {
    let options = selector("option[value]")?;

    dropdown
        .select(&options)
        .filter_map(|opt| {
            let value = opt.value().attr("value")?.trim();
            (!value.is_empty()).then(|| (value.to_string(), text_of(opt)))
        })
        .map(|(value, text)| {
            let (_, name) = split_code_and_name(&text);
            Ok(ScheduledStop::new(parse_code(&value, "source option")?, name))
        })
        .collect()
}
