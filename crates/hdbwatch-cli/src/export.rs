//! Spreadsheet export of analyzed Lemon8 reviews.

use std::collections::BTreeMap;
use std::path::Path;

use hdbwatch_core::Review;
use hdbwatch_db::DocumentStore;
use hdbwatch_scraper::truncate_chars;
use rust_xlsxwriter::{Color, Format, FormatAlign, Workbook, XlsxError};

const SHEET_NAME: &str = "Reviews";
const TITLE_CHARS: usize = 80;
const CONTENT_CHARS: usize = 200;
const TOP_ESTATES: usize = 10;
const HEADER_ROW_HEIGHT: f64 = 30.0;

/// Header text and column width, in sheet order.
const COLUMNS: [(&str, f64); 12] = [
    ("Estate", 15.0),
    ("Sentiment", 12.0),
    ("Title", 25.0),
    ("Content", 30.0),
    ("Quality Score", 10.0),
    ("Key Points", 35.0),
    ("Pros", 35.0),
    ("Cons", 35.0),
    ("Amenities", 40.0),
    ("Hashtags", 25.0),
    ("Author", 15.0),
    ("Analyzed", 15.0),
];

/// One spreadsheet row, already formatted for display.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ExportRow {
    pub estate: String,
    pub sentiment: String,
    pub title: String,
    pub content: String,
    pub quality_score: f64,
    pub key_points: String,
    pub pros: String,
    pub cons: String,
    pub amenities: String,
    pub hashtags: String,
    pub author: String,
    pub analyzed: String,
}

fn bullets(items: &[String], marker: &str) -> String {
    items
        .iter()
        .map(|item| format!("{marker} {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn amenities_cell(amenities: &BTreeMap<String, Vec<String>>) -> String {
    amenities
        .iter()
        .map(|(category, found)| format!("{category}: {}", found.join(", ")))
        .collect::<Vec<_>>()
        .join("; ")
}

fn author_cell(review: &Review) -> String {
    let handle = review
        .source
        .account_handle
        .as_deref()
        .filter(|h| !h.is_empty())
        .unwrap_or(review.user_id.as_str());
    if handle.is_empty() || handle.starts_with('@') {
        handle.to_string()
    } else {
        format!("@{handle}")
    }
}

impl ExportRow {
    pub(crate) fn from_review(review: &Review) -> Self {
        let label = review.analysis_sentiment.unwrap_or(review.sentiment.label);
        Self {
            estate: review.estate.clone().unwrap_or_default(),
            sentiment: label.as_str().to_uppercase(),
            title: truncate_chars(&review.title, TITLE_CHARS),
            content: truncate_chars(&review.body, CONTENT_CHARS),
            quality_score: review.quality_score,
            key_points: bullets(&review.key_points, "\u{2022}"),
            pros: bullets(&review.pros, "\u{2713}"),
            cons: bullets(&review.cons, "\u{2717}"),
            amenities: amenities_cell(&review.amenities_mentioned),
            hashtags: review.hashtags.join(", "),
            author: author_cell(review),
            analyzed: review
                .analyzed_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
        }
    }
}

/// Rows sorted by estate, then sentiment descending, then quality descending.
pub(crate) fn build_rows(reviews: &[Review]) -> Vec<ExportRow> {
    let mut rows: Vec<ExportRow> = reviews.iter().map(ExportRow::from_review).collect();
    rows.sort_by(|a, b| {
        a.estate
            .cmp(&b.estate)
            .then_with(|| b.sentiment.cmp(&a.sentiment))
            .then_with(|| b.quality_score.total_cmp(&a.quality_score))
    });
    rows
}

fn sentiment_fill(sentiment: &str) -> Option<Color> {
    match sentiment {
        "POSITIVE" => Some(Color::RGB(0x00C6_E0B4)),
        "NEUTRAL" => Some(Color::RGB(0x00FF_E699)),
        "NEGATIVE" => Some(Color::RGB(0x00F4_B084)),
        _ => None,
    }
}

/// Write `rows` to a single-sheet workbook at `path`.
///
/// # Errors
///
/// Returns [`XlsxError`] if a cell cannot be written or the file cannot be saved.
pub(crate) fn write_workbook(rows: &[ExportRow], path: &Path) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    let header = Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(0x0044_72C4))
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_text_wrap();
    let wrap = Format::new()
        .set_text_wrap()
        .set_align(FormatAlign::Top);

    for (col, (name, width)) in (0u16..).zip(COLUMNS) {
        sheet.write_string_with_format(0, col, name, &header)?;
        sheet.set_column_width(col, width)?;
    }
    sheet.set_row_height(0, HEADER_ROW_HEIGHT)?;

    for (row, r) in (1u32..).zip(rows) {
        sheet.write_string(row, 0, &r.estate)?;
        match sentiment_fill(&r.sentiment) {
            Some(color) => {
                let fill = Format::new()
                    .set_background_color(color)
                    .set_align(FormatAlign::Center);
                sheet.write_string_with_format(row, 1, &r.sentiment, &fill)?;
            }
            None => {
                sheet.write_string(row, 1, &r.sentiment)?;
            }
        }
        sheet.write_string_with_format(row, 2, &r.title, &wrap)?;
        sheet.write_string_with_format(row, 3, &r.content, &wrap)?;
        sheet.write_number(row, 4, r.quality_score)?;
        sheet.write_string_with_format(row, 5, &r.key_points, &wrap)?;
        sheet.write_string_with_format(row, 6, &r.pros, &wrap)?;
        sheet.write_string_with_format(row, 7, &r.cons, &wrap)?;
        sheet.write_string_with_format(row, 8, &r.amenities, &wrap)?;
        sheet.write_string(row, 9, &r.hashtags)?;
        sheet.write_string(row, 10, &r.author)?;
        sheet.write_string(row, 11, &r.analyzed)?;
    }

    workbook.save(path)
}

fn print_export_summary(rows: &[ExportRow], path: &Path) {
    println!("exported {} reviews", rows.len());

    let mut by_sentiment: BTreeMap<&str, usize> = BTreeMap::new();
    let mut by_estate: BTreeMap<&str, usize> = BTreeMap::new();
    for row in rows {
        *by_sentiment.entry(row.sentiment.as_str()).or_default() += 1;
        *by_estate.entry(row.estate.as_str()).or_default() += 1;
    }

    println!("by sentiment:");
    for (label, count) in &by_sentiment {
        println!("  {label}: {count}");
    }

    let mut estates: Vec<(&str, usize)> = by_estate.into_iter().collect();
    estates.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    println!("top estates:");
    for (estate, count) in estates.iter().take(TOP_ESTATES) {
        println!("  {estate}: {count}");
    }

    println!("written to {}", path.display());
}

/// Export every Lemon8 review to `path`.
///
/// # Errors
///
/// Returns an error if the store cannot be read or the workbook cannot be written.
pub(crate) async fn run_export<S: DocumentStore>(store: &S, path: &Path) -> anyhow::Result<()> {
    let reviews = hdbwatch_db::list_reviews_by_source(store, hdbwatch_db::LEMON8_PLATFORM).await?;
    if reviews.is_empty() {
        println!("no Lemon8 reviews to export; run `hdbwatch lemon8 analyze` first");
        return Ok(());
    }

    let rows = build_rows(&reviews);
    write_workbook(&rows, path)
        .map_err(|e| anyhow::anyhow!("failed to write {}: {e}", path.display()))?;

    tracing::info!(rows = rows.len(), path = %path.display(), "lemon8 export written");
    print_export_summary(&rows, path);
    Ok(())
}
