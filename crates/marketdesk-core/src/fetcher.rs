use crate::config::Settings;
use crate::error::{ParseError, Result};
use crate::record::TabularRecord;
use crate::shape::{shape, ColumnMap, Trim, CANONICAL_COLUMNS};
use crate::table::{parse_tables, RawTable};
use indexmap::IndexMap;
use marketdesk_util::{build_client, Util};
use reqwest::Client;
use tracing::{debug, trace};

/// One labelled table for [`TableFetcher::fetch_lists`].
#[derive(Clone, Debug)]
pub struct ListEntry<'a> {
    pub label: &'a str,
    pub url: String,
    pub table_index: usize,
    pub columns: Option<&'a ColumnMap>,
    pub trim: Trim,
}

/// Fetch a page, pick one of its tables, and shape it into records.
///
/// Holds nothing but the HTTP client and the row cap; every call is a fresh
/// request/parse/normalize cycle.
#[derive(Clone, Debug)]
pub struct TableFetcher {
    client: Client,
    row_cap: usize,
}

impl TableFetcher {
    pub fn new(client: Client, row_cap: usize) -> Self {
        Self { client, row_cap }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let client = build_client(&settings.user_agent)?;
        Ok(Self::new(client, settings.max_rows))
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// GET `url` and return table `table_index` trimmed like a listing,
    /// renamed to the canonical columns when `rename` is set.
    pub async fn fetch_table(
        &self,
        url: &str,
        table_index: usize,
        rename: bool,
    ) -> Result<Vec<TabularRecord>> {
        let columns = if rename { Some(CANONICAL_COLUMNS) } else { None };
        self.fetch_table_with(url, table_index, columns, Trim::LISTING)
            .await
    }

    /// As [`fetch_table`](Self::fetch_table), with an explicit column map
    /// and trim.
    pub async fn fetch_table_with(
        &self,
        url: &str,
        table_index: usize,
        columns: Option<&ColumnMap>,
        trim: Trim,
    ) -> Result<Vec<TabularRecord>> {
        let tables = self.fetch_raw(url).await?;
        let table = pick_table(&tables, url, table_index)?;
        Ok(self.shape(table, columns, trim))
    }

    /// Several tables from one GET of `url`, keyed by label.
    pub async fn fetch_tables(
        &self,
        url: &str,
        picks: &[(&str, usize)],
        columns: Option<&ColumnMap>,
        trim: Trim,
    ) -> Result<IndexMap<String, Vec<TabularRecord>>> {
        let tables = self.fetch_raw(url).await?;
        let mut out = IndexMap::with_capacity(picks.len());
        for (label, index) in picks {
            let table = pick_table(&tables, url, *index)?;
            out.insert(label.to_string(), self.shape(table, columns, trim));
        }
        Ok(out)
    }

    /// Fetch each entry in turn and merge the results under their labels.
    ///
    /// The first failure aborts the whole call; no partial map is returned.
    pub async fn fetch_lists(
        &self,
        entries: &[ListEntry<'_>],
    ) -> Result<IndexMap<String, Vec<TabularRecord>>> {
        let mut out = IndexMap::with_capacity(entries.len());
        for entry in entries {
            let records = self
                .fetch_table_with(&entry.url, entry.table_index, entry.columns, entry.trim)
                .await?;
            out.insert(entry.label.to_string(), records);
        }
        Ok(out)
    }

    async fn fetch_raw(&self, url: &str) -> Result<Vec<RawTable>> {
        debug!("fetching tables from {url}");
        let html = self.client.get_text(url).await?;
        let tables = parse_tables(&html);
        trace!("{url} holds {} table(s)", tables.len());
        Ok(tables)
    }

    fn shape(&self, table: RawTable, columns: Option<&ColumnMap>, trim: Trim) -> Vec<TabularRecord> {
        trace!("columns: {:?}", table.headers);
        let records = shape(table, columns, trim, self.row_cap);
        debug!("shaped {} record(s)", records.len());
        records
    }
}

fn pick_table(tables: &[RawTable], url: &str, index: usize) -> Result<RawTable> {
    let found = tables.len();
    tables
        .get(index)
        .cloned()
        .ok_or_else(|| {
            ParseError::TableNotFound {
                url: url.to_string(),
                index,
                found,
            }
            .into()
        })
}
