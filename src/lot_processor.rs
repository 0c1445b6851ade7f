use crate::errors::ScraperError;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Free spaces per lot, keyed by the lot name as shown on the page.
pub type LotStatus = BTreeMap<String, u32>;

const OPEN_SPACES_MARKER: &str = "Open Spaces";

static RE_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("invalid regex: digits"));
static RE_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d$").expect("invalid regex: digit"));

fn is_decimal_digit(c: char) -> bool {
    let mut buf = [0u8; 4];
    RE_DIGIT.is_match(c.encode_utf8(&mut buf))
}

/// Value of any Unicode decimal digit.
///
/// Decimal digits are encoded in contiguous runs of ten, zero first, so the
/// value is the offset from the start of the surrounding run, modulo ten.
fn decimal_value(c: char) -> u32 {
    if let Some(d) = c.to_digit(10) {
        return d;
    }
    let mut start = c as u32;
    while let Some(prev) = char::from_u32(start - 1).filter(|p| is_decimal_digit(*p)) {
        start = prev as u32;
    }
    (c as u32 - start) % 10
}

fn parse_decimal(digits: &str) -> u32 {
    digits
        .chars()
        .try_fold(0u32, |acc, c| acc.checked_mul(10)?.checked_add(decimal_value(c)))
        .unwrap_or(u32::MAX)
}

fn selector(css: &str) -> Result<Selector, ScraperError> {
    Selector::parse(css).map_err(|err| ScraperError::SelectorError(err.to_string()))
}

fn cell_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Convert a status cell like `"Open Spaces  315"` into `315`.
///
/// Anything without the "Open Spaces" marker (full, closed, ...) counts as zero,
/// as does a marker with no digits after it. Digits from any script count; a run
/// too long for `u32` saturates.
pub fn parse_spaces(status: &str) -> u32 {
    if !status.contains(OPEN_SPACES_MARKER) {
        return 0;
    }
    match RE_DIGITS.find(status) {
        Some(digits) => parse_decimal(digits.as_str()),
        None => 0,
    }
}

/// Extract per-lot free spaces from the `#parking-list` table.
///
/// Every row must hold exactly two cells (name, status). A missing list or a
/// row of any other shape fails the whole page. Repeated lot names keep the
/// last value seen.
pub fn parse_lot_status(html: &str) -> Result<LotStatus, ScraperError> {
    let document = Html::parse_document(html);

    let list_selector = selector("#parking-list")?;
    let row_selector = selector("tr")?;
    let cell_selector = selector("td")?;

    let parking_list = document
        .select(&list_selector)
        .next()
        .ok_or_else(|| ScraperError::Format("no #parking-list element".to_string()))?;

    let mut lot_status = LotStatus::new();
    for (index, row) in parking_list.select(&row_selector).enumerate() {
        let cells: Vec<String> = row.select(&cell_selector).map(cell_text).collect();
        let [lot, spaces] = <[String; 2]>::try_from(cells).map_err(|cells| {
            ScraperError::Format(format!("row {} has {} cells, expected 2", index, cells.len()))
        })?;
        lot_status.insert(lot, parse_spaces(&spaces));
    }

    Ok(lot_status)
}
