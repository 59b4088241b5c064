//! Banks table extractor
//!
//! Finds every `<table>` in a document and keeps the one at a fixed position.

use crate::client::SourceClient;
use crate::config::DataSource;
use crate::error::{ExtractionError, Result};
use crate::etl::Extractor;
use crate::model::RawTable;
use scraper::{ElementRef, Html};

/// Extractor for the banks table embedded in an HTML document
///
/// The table is chosen by position among all tables in the document (the
/// page layout is assumed stable), so a page with fewer tables than
/// `table_index + 1` is an error.
pub struct BanksPageExtractor {
    client: SourceClient,
    source: DataSource,
    table_index: usize,
}

impl BanksPageExtractor {
    /// Create a new banks page extractor
    ///
    /// # Arguments
    /// * `client` - Client used to fetch the document
    /// * `source` - Location of the document
    /// * `table_index` - Zero-based position of the banks table
    pub fn new(client: SourceClient, source: DataSource, table_index: usize) -> Self {
        Self {
            client,
            source,
            table_index,
        }
    }
}

impl Extractor for BanksPageExtractor {
    type Output = RawTable;

    async fn extract(&self) -> Result<Self::Output> {
        log::debug!("Fetching banks document from {}", self.source);
        let html = self.client.fetch_text(&self.source).await?;

        let table = select_table(&html, self.table_index)?;
        log::info!(
            "Extracted banks table #{} with {} column(s) and {} row(s)",
            self.table_index,
            table.width(),
            table.len()
        );
        Ok(table)
    }
}

/// Pick the table at `index` among all tables in `html`
pub fn select_table(html: &str, index: usize) -> std::result::Result<RawTable, ExtractionError> {
    let tables = parse_tables(html);
    let found = tables.len();
    log::debug!("Document contains {} table(s)", found);

    tables
        .into_iter()
        .nth(index)
        .ok_or(ExtractionError::TableNotFound { index, found })
}

/// Parse every `<table>` in document order, nested tables included.
///
/// Tables without any text are skipped and do not count towards an index.
/// Markup that holds no tables at all yields an empty list, which
/// [`select_table`] reports as [`ExtractionError::TableNotFound`].
pub fn parse_tables(html: &str) -> Vec<RawTable> {
    let document = Html::parse_document(html);

    document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "table")
        .filter(|table| table.text().any(|t| !t.trim().is_empty()))
        .map(parse_table)
        .collect()
}

/// Largest `colspan` and `rowspan` honored, as in the HTML standard
const MAX_COLSPAN: usize = 1000;
const MAX_ROWSPAN: usize = 65534;

/// The header is the first all-`<th>` row; data rows have at least one `<td>`.
///
/// Cells spanning several columns or rows are repeated into every position
/// they cover, so each row lines up with the header.
fn parse_table(table: ElementRef<'_>) -> RawTable {
    let mut headers = Vec::new();
    let mut rows = Vec::new();
    let mut header_spans = RowSpans::default();
    let mut body_spans = RowSpans::default();

    for row in table
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "tr")
    {
        // Rows of a nested table belong to that table, not this one
        let owner = row
            .ancestors()
            .find(|node| {
                node.value()
                    .as_element()
                    .is_some_and(|el| el.name() == "table")
            })
            .map(|node| node.id());
        if owner != Some(table.id()) {
            continue;
        }

        let cells: Vec<ElementRef<'_>> = row
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|cell| matches!(cell.value().name(), "th" | "td"))
            .collect();

        if cells.iter().any(|cell| cell.value().name() == "td") {
            rows.push(body_spans.expand(&cells));
        } else if !cells.is_empty() {
            let texts = header_spans.expand(&cells);
            if headers.is_empty() {
                headers = texts;
            }
        } else {
            // A row made only of cells spanned from above
            let texts = body_spans.expand(&cells);
            if !texts.is_empty() {
                rows.push(texts);
            }
        }
    }

    RawTable::new(headers, rows)
}

/// Cells still owed to upcoming rows by a `rowspan`, per column
#[derive(Default)]
struct RowSpans {
    pending: Vec<Option<(String, usize)>>,
}

impl RowSpans {
    /// Lay out one row's cells, filling columns still covered from above
    fn expand(&mut self, cells: &[ElementRef<'_>]) -> Vec<String> {
        let mut out = Vec::new();
        for cell in cells {
            self.fill(&mut out);

            let text = cell_text(cell);
            let colspan = span(cell, "colspan", MAX_COLSPAN);
            let rowspan = span(cell, "rowspan", MAX_ROWSPAN);
            for _ in 0..colspan {
                if rowspan > 1 {
                    self.hold(out.len(), &text, rowspan - 1);
                }
                out.push(text.clone());
            }
        }
        // Spans continuing past this row's last cell
        self.fill(&mut out);
        out
    }

    fn fill(&mut self, out: &mut Vec<String>) {
        while let Some(text) = self.take(out.len()) {
            out.push(text);
        }
    }

    fn hold(&mut self, column: usize, text: &str, rows: usize) {
        if self.pending.len() <= column {
            self.pending.resize(column + 1, None);
        }
        self.pending[column] = Some((text.to_string(), rows));
    }

    /// Take the spanned text for `column`, if any remains
    fn take(&mut self, column: usize) -> Option<String> {
        let slot = self.pending.get_mut(column)?;
        let (text, remaining) = slot.as_mut()?;
        let text = text.clone();
        *remaining -= 1;
        if *remaining == 0 {
            *slot = None;
        }
        Some(text)
    }
}

fn span(cell: &ElementRef<'_>, attr: &str, max: usize) -> usize {
    cell.value()
        .attr(attr)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
        .map_or(1, |n| n.min(max))
}

fn cell_text(cell: &ElementRef<'_>) -> String {
    cell.text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
