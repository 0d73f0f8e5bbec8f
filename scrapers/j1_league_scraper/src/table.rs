use scraper::{ElementRef, Html, Selector};

use crate::error::ScrapeError;

/// Cell texts of one `<tr>`, trimmed.
pub type RawRow = Vec<String>;

fn selector(css: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|_| ScrapeError::InvalidSelector(css.to_string()))
}

/// Finds the first `<table>` carrying `css_class`.
pub fn locate_table<'a>(document: &'a Html, css_class: &str) -> Result<Option<ElementRef<'a>>, ScrapeError> {
    let class = css_class.trim();
    if class.is_empty() || class.contains(char::is_whitespace) {
        return Err(ScrapeError::InvalidSelector(css_class.to_string()));
    }
    let table_selector = selector(&format!("table.{}", class))?;
    Ok(document.select(&table_selector).next())
}

/// Every row of `table`, header rows included, as trimmed `<td>` texts.
pub fn table_rows(table: ElementRef<'_>) -> Result<Vec<RawRow>, ScrapeError> {
    let row_selector = selector("tr")?;
    let cell_selector = selector("td")?;

    Ok(table
        .select(&row_selector)
        .map(|row| {
            row.select(&cell_selector)
                .map(|cell| cell.text().collect::<String>().trim().to_string())
                .collect()
        })
        .collect())
}

/// Parses `markup` and returns the rows of the matching table, or `None` if there is none.
pub fn locate_rows(markup: &str, css_class: &str) -> Result<Option<Vec<RawRow>>, ScrapeError> {
    let document = Html::parse_document(markup);
    match locate_table(&document, css_class)? {
        Some(table) => table_rows(table).map(Some),
        None => Ok(None),
    }
}
