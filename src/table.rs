//! In-memory tables of exam records.
//!
//! A [`Table`] is column oriented: every column has one cell per record, and a cell is either
//! present or missing (`None`). Tables are never mutated by the cleaning steps; every step
//! returns a new table.

use std::borrow::Cow;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use encoding_rs::Encoding;

use crate::error::{Error, Result};

/// Cell values treated as missing when reading the raw text, compared after trimming
/// surrounding whitespace. An empty cell is always missing.
pub const DEFAULT_MISSING_VALUES: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// How to read the raw delimited file
#[derive(Clone, Debug)]
pub struct LoadOptions {
    delimiter: u8,
    // `None` is ISO-8859-1, which `encoding_rs` folds into windows-1252
    encoding: Option<&'static Encoding>,
    missing_values: Vec<String>,
}

impl Default for LoadOptions {
    /// Semicolon separated, Latin-1 encoded, the usual missing-value tokens
    fn default() -> LoadOptions {
        LoadOptions {
            delimiter: b';',
            encoding: None,
            missing_values: DEFAULT_MISSING_VALUES
                .iter()
                .map(|&s| s.to_owned())
                .collect(),
        }
    }
}

impl LoadOptions {
    /// Changes the field delimiter
    pub fn delimiter(mut self, delimiter: u8) -> LoadOptions {
        self.delimiter = delimiter;
        self
    }

    /// Changes the text encoding of the file
    pub fn encoding(mut self, encoding: &'static Encoding) -> LoadOptions {
        self.encoding = Some(encoding);
        self
    }

    /// Reads the file as ISO-8859-1, where every byte is the code point of the same value
    pub fn latin1(mut self) -> LoadOptions {
        self.encoding = None;
        self
    }

    fn decode<'a>(&self, bytes: &'a [u8], path: &Path) -> Cow<'a, str> {
        match self.encoding {
            None => Cow::Owned(bytes.iter().map(|&b| char::from(b)).collect()),
            Some(encoding) => {
                let (text, encoding, had_errors) = encoding.decode(bytes);
                if had_errors {
                    warn!(
                        "{:?} is not valid {}, malformed sequences were replaced",
                        path,
                        encoding.name()
                    );
                }
                text
            }
        }
    }

    /// Replaces the tokens treated as missing values. Empty cells are always missing.
    pub fn missing_values<I, S>(mut self, values: I) -> LoadOptions
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.missing_values = values.into_iter().map(Into::into).collect();
        self
    }

    fn is_missing(&self, cell: &str) -> bool {
        let cell = cell.trim();

        cell.is_empty() || self.missing_values.iter().any(|token| token == cell)
    }
}

/// One column of a table
#[derive(Clone, Debug, PartialEq)]
pub enum Column {
    /// Raw text or category labels
    Text(Vec<Option<String>>),
    /// Parsed numbers; never holds `NaN`, a missing number is `None`
    Numeric(Vec<Option<f64>>),
}

impl Column {
    /// Number of cells in the column
    pub fn len(&self) -> usize {
        match self {
            Column::Text(cells) => cells.len(),
            Column::Numeric(cells) => cells.len(),
        }
    }

    /// Checks if the column has no cells
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks if the `i`-th cell is missing
    pub fn is_missing(&self, i: usize) -> bool {
        match self {
            Column::Text(cells) => cells[i].is_none(),
            Column::Numeric(cells) => cells[i].is_none(),
        }
    }

    /// Returns the cell as a category key: text as is, integral numbers without a fractional
    /// part (`3.0` becomes `"3"`)
    pub fn key(&self, i: usize) -> Option<Cow<'_, str>> {
        match self {
            Column::Text(cells) => cells[i].as_deref().map(Cow::Borrowed),
            Column::Numeric(cells) => cells[i].map(|x| Cow::Owned(format_code(x))),
        }
    }

    fn select(&self, mask: &[bool]) -> Column {
        fn keep<T: Clone>(cells: &[T], mask: &[bool]) -> Vec<T> {
            cells
                .iter()
                .zip(mask)
                .filter(|&(_, &keep)| keep)
                .map(|(cell, _)| cell.clone())
                .collect()
        }

        match self {
            Column::Text(cells) => Column::Text(keep(cells, mask)),
            Column::Numeric(cells) => Column::Numeric(keep(cells, mask)),
        }
    }
}

/// Renders a numeric code the way it appears in the raw file
pub fn format_code(x: f64) -> String {
    if x.fract() == 0.0 && x.abs() < 1e15 {
        format!("{}", x as i64)
    } else {
        format!("{}", x)
    }
}

/// Parses a cell as a number, best-effort: anything that is not a finite number is missing
pub fn parse_number(cell: &str) -> Option<f64> {
    cell.trim()
        .parse::<f64>()
        .ok()
        .filter(|x| x.is_finite())
}

/// A column oriented table of records
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    names: Vec<String>,
    columns: Vec<Column>,
    len: usize,
}

impl Table {
    /// Reads a delimited file, every cell as text
    ///
    /// Failing to read the file is reported with its path; so is a record with more fields than
    /// the header. Records with fewer fields are padded with missing cells.
    pub fn load<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Table> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|inner| Error::AccessError {
            path: path.to_owned(),
            inner,
        })?;

        info!("Read {} bytes from {:?}", bytes.len(), path);

        Table::from_bytes(&bytes, options, path)
    }

    /// Reads delimited text from any reader, every cell as text
    pub fn from_reader<R: Read>(mut reader: R, options: &LoadOptions) -> Result<Table> {
        let path = PathBuf::from("<reader>");
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|inner| Error::AccessError {
                path: path.clone(),
                inner,
            })?;

        Table::from_bytes(&bytes, options, &path)
    }

    fn from_bytes(bytes: &[u8], options: &LoadOptions, path: &Path) -> Result<Table> {
        let text = options.decode(bytes, path);

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let csv_error = |inner| Error::CsvError {
            path: path.to_owned(),
            inner,
        };

        let names: Vec<String> = reader
            .headers()
            .map_err(csv_error)?
            .iter()
            .map(|name| name.trim().to_owned())
            .collect();

        let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); names.len()];
        let mut len = 0;
        for record in reader.records() {
            let record = record.map_err(csv_error)?;
            if record.len() > names.len() {
                return Err(Error::MalformedRecord {
                    path: path.to_owned(),
                    line: record.position().map_or(0, |p| p.line()),
                    expected: names.len(),
                    found: record.len(),
                });
            }

            for (i, column) in cells.iter_mut().enumerate() {
                let cell = record
                    .get(i)
                    .filter(|cell| !options.is_missing(cell))
                    .map(str::to_owned);
                column.push(cell);
            }
            len += 1;
        }

        info!("Parsed {} records with {} columns", len, names.len());

        Ok(Table {
            names,
            columns: cells.into_iter().map(Column::Text).collect(),
            len,
        })
    }

    /// Builds a table out of named columns
    ///
    /// # Panics
    ///
    /// Panics if the columns have different lengths
    pub fn from_columns<S: Into<String>>(columns: Vec<(S, Column)>) -> Table {
        let len = columns.first().map_or(0, |(_, column)| column.len());
        assert!(columns.iter().all(|(_, column)| column.len() == len));

        let (names, columns) = columns
            .into_iter()
            .map(|(name, column)| (name.into(), column))
            .unzip();

        Table {
            names,
            columns,
            len,
        }
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.len
    }

    /// Checks if the table has no records
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Column names, in file order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Looks a column up by name
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.position(name).map(|i| &self.columns[i])
    }

    /// Looks a numeric column up by name
    pub fn numeric(&self, name: &str) -> Result<&[Option<f64>]> {
        match self.column(name)? {
            Column::Numeric(cells) => Ok(cells),
            Column::Text(_) => Err(Error::ColumnType {
                column: name.to_owned(),
                expected: "numeric",
            }),
        }
    }

    /// Looks a text column up by name
    pub fn text(&self, name: &str) -> Result<&[Option<String>]> {
        match self.column(name)? {
            Column::Text(cells) => Ok(cells),
            Column::Numeric(_) => Err(Error::ColumnType {
                column: name.to_owned(),
                expected: "text",
            }),
        }
    }

    /// Checks that every one of `names` is a column of the table
    pub fn require(&self, names: &[&str]) -> Result<()> {
        names.iter().try_for_each(|name| self.position(name).map(|_| ()))
    }

    /// Returns a copy of the table with the given columns parsed as numbers
    ///
    /// Cells that do not parse as a finite number become missing; this never fails for
    /// individual cells. Columns that are already numeric are left alone.
    pub fn coerce_numeric(&self, names: &[&str]) -> Result<Table> {
        self.require(names)?;

        let columns = self
            .names
            .iter()
            .zip(&self.columns)
            .map(|(name, column)| match column {
                Column::Text(cells) if names.contains(&name.as_str()) => {
                    let parsed: Vec<Option<f64>> = cells
                        .iter()
                        .map(|cell| cell.as_deref().and_then(parse_number))
                        .collect();
                    let unparsed = parsed
                        .iter()
                        .zip(cells)
                        .filter(|(number, cell)| number.is_none() && cell.is_some())
                        .count();
                    if unparsed > 0 {
                        info!("{} cells of {:?} are not numbers", unparsed, name);
                    }

                    Column::Numeric(parsed)
                }
                _ => column.clone(),
            })
            .collect();

        Ok(Table {
            names: self.names.clone(),
            columns,
            len: self.len,
        })
    }

    /// Returns the records that have no missing cell in any column, order preserved
    ///
    /// A table without missing cells is returned as is.
    pub fn drop_missing(self) -> Table {
        let mask: Vec<bool> = (0..self.len)
            .map(|row| self.columns.iter().all(|column| !column.is_missing(row)))
            .collect();

        if mask.iter().all(|&keep| keep) {
            self
        } else {
            self.select_rows(&mask)
        }
    }

    /// Returns the records whose `mask` entry is `true`, order preserved
    ///
    /// # Panics
    ///
    /// Panics if `mask` does not have one entry per record
    pub fn select_rows(&self, mask: &[bool]) -> Table {
        assert_eq!(mask.len(), self.len);

        Table {
            names: self.names.clone(),
            columns: self.columns.iter().map(|column| column.select(mask)).collect(),
            len: mask.iter().filter(|&&keep| keep).count(),
        }
    }

    /// Adds `column` under `name`, replacing any column of the same name
    ///
    /// # Panics
    ///
    /// Panics if the column length differs from the number of records
    pub fn with_column<S: Into<String>>(mut self, name: S, column: Column) -> Table {
        assert_eq!(column.len(), self.len);

        let name = name.into();
        match self.names.iter().position(|n| *n == name) {
            Some(i) => self.columns[i] = column,
            None => {
                self.names.push(name);
                self.columns.push(column);
            }
        }

        self
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| Error::MissingColumn {
                column: name.to_owned(),
                available: self.names.clone(),
            })
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} records x {} columns ({})",
            self.len,
            self.names.len(),
            self.names.join(", ")
        )
    }
}
