use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read};

use super::error::Error;

const UTF8_BOM: &[u8] = &[0xef, 0xbb, 0xbf];

/// One record of a GTFS table.
///
/// Values are positional. A record shorter than the header has no value for
/// the trailing columns; a longer one keeps its extra values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    values: Vec<String>,
}

impl Row {
    pub fn new(values: Vec<String>) -> Row {
        Row { values }
    }

    /// Raw value at `index`, `None` when the record is too short.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }

    /// Value at `index`, with a missing value read as the empty string.
    pub fn value(&self, index: usize) -> &str {
        self.get(index).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// An in-memory GTFS table: a header mapping column names to positions and
/// the records in file order. Read-only once loaded.
#[derive(Debug, Clone, Default)]
pub struct GtfsTable {
    name: String,
    header: HashMap<String, usize>,
    rows: Vec<Row>,
}

impl GtfsTable {
    /// Builds a table from an already tokenized header and records.
    ///
    /// When a column name appears twice the last position wins.
    pub fn new(name: &str, header: Vec<String>, rows: Vec<Row>) -> GtfsTable {
        let header = header
            .into_iter()
            .enumerate()
            .map(|(index, column)| (column, index))
            .collect();
        GtfsTable {
            name: name.to_owned(),
            header,
            rows,
        }
    }

    /// Reads a comma-delimited table whose first line is the header.
    ///
    /// There is no quoting: every `,` separates two values. A leading UTF-8
    /// BOM is skipped and header names are trimmed. Every line after the
    /// header becomes a row, so an empty line is a row with one empty value.
    pub fn from_reader<R: Read>(name: &str, reader: R) -> Result<GtfsTable, Error> {
        let read_err = |e: std::io::Error| Error::NamedFileIO {
            file_name: name.to_owned(),
            source: Box::new(e),
        };

        let mut reader = BufReader::new(reader);
        let has_bom = reader.fill_buf().map_err(read_err)?.starts_with(UTF8_BOM);
        if has_bom {
            reader.consume(UTF8_BOM.len());
        }

        let mut lines = reader.split(b'\n');
        let header = match lines.next() {
            Some(line) => split_line(&line.map_err(read_err)?),
            None => return Err(Error::EmptyTable(name.to_owned())),
        };
        let header = header
            .into_iter()
            .map(|column| column.trim().to_owned())
            .collect();

        let mut rows = Vec::new();
        for line in lines {
            rows.push(Row::new(split_line(&line.map_err(read_err)?)));
        }

        Ok(GtfsTable::new(name, header, rows))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of distinct column names in the header.
    pub fn header_len(&self) -> usize {
        self.header.len()
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.header.get(name).copied()
    }

    /// Like [`GtfsTable::column`], for columns a join cannot do without.
    pub fn require_column(&self, name: &str) -> Result<usize, Error> {
        self.column(name).ok_or_else(|| Error::MissingColumn {
            table: self.name.clone(),
            column: name.to_owned(),
        })
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First row whose value in `column` equals `value`, scanning in file order.
    pub fn find(&self, column: usize, value: &str) -> Option<&Row> {
        self.rows.iter().find(|row| row.value(column) == value)
    }
}

fn split_line(line: &[u8]) -> Vec<String> {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line)
        .split(',')
        .map(str::to_owned)
        .collect()
}

/// How a [`Relation`] resolves keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinStrategy {
    /// Hash the key column once, then look keys up directly.
    #[default]
    Indexed,
    /// Scan every row for every lookup.
    Scan,
}

/// One table seen through one of its columns, used as the inner side of a join.
///
/// Both strategies return rows in table order, so they are interchangeable.
pub enum Relation<'a> {
    Scan {
        table: &'a GtfsTable,
        column: usize,
    },
    Indexed {
        table: &'a GtfsTable,
        index: HashMap<&'a str, Vec<usize>>,
    },
}

impl<'a> Relation<'a> {
    pub fn new(table: &'a GtfsTable, column: usize, strategy: JoinStrategy) -> Relation<'a> {
        match strategy {
            JoinStrategy::Scan => Relation::Scan { table, column },
            JoinStrategy::Indexed => {
                let mut index: HashMap<&'a str, Vec<usize>> = HashMap::new();
                for (position, row) in table.rows.iter().enumerate() {
                    index.entry(row.value(column)).or_default().push(position);
                }
                Relation::Indexed { table, index }
            }
        }
    }

    /// Relation over the column called `name`, which must exist.
    pub fn on(
        table: &'a GtfsTable,
        name: &str,
        strategy: JoinStrategy,
    ) -> Result<Relation<'a>, Error> {
        let column = table.require_column(name)?;
        Ok(Relation::new(table, column, strategy))
    }

    /// First row with the given key. Later duplicates are never returned.
    pub fn first(&self, key: &str) -> Option<&'a Row> {
        match self {
            Relation::Scan { table, column } => {
                let table: &'a GtfsTable = *table;
                table.find(*column, key)
            }
            Relation::Indexed { table, index } => {
                let table: &'a GtfsTable = *table;
                index
                    .get(key)
                    .and_then(|positions| positions.first())
                    .map(|&position| &table.rows[position])
            }
        }
    }

    /// Every row with the given key, in table order.
    pub fn matching(&self, key: &str) -> Vec<&'a Row> {
        match self {
            Relation::Scan { table, column } => {
                let table: &'a GtfsTable = *table;
                table
                    .rows
                    .iter()
                    .filter(|row| row.value(*column) == key)
                    .collect()
            }
            Relation::Indexed { table, index } => {
                let table: &'a GtfsTable = *table;
                index
                    .get(key)
                    .map(|positions| {
                        positions
                            .iter()
                            .map(|&position| &table.rows[position])
                            .collect()
                    })
                    .unwrap_or_default()
            }
        }
    }
}
