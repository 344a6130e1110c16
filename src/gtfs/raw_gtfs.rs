use crate::gtfs::error::Error;
use crate::gtfs::table::{GtfsTable, Row};

use rusqlite::types::ValueRef;
use rusqlite::{params, Connection};
use std::{fs::File, io::Read, path::Path};
use zip::ZipArchive;

const STOPS: &str = "stops.txt";
const STOP_TIMES: &str = "stop_times.txt";
const ROUTES: &str = "routes.txt";
const TRIPS: &str = "trips.txt";
const SHAPES: &str = "shapes.txt";

/// The five GTFS tables the GeoJSON passes join over.
/// https://gtfs.org/documentation/schedule/reference/#dataset-files
#[derive(Debug, Clone, Default)]
pub struct RawGtfs {
    pub stops: GtfsTable,
    pub stop_times: GtfsTable,
    pub routes: GtfsTable,
    pub trips: GtfsTable,
    pub shapes: GtfsTable,
}

impl RawGtfs {
    /// Loads a feed from a directory, a zip archive, or a sqlite3 database.
    pub fn from_path<P>(path: P) -> Result<RawGtfs, Error>
    where
        P: AsRef<Path>,
    {
        let p = path.as_ref();
        if p.is_dir() {
            RawGtfs::read_from_dir(p)
        } else if p.is_file() && is_zip(p) {
            RawGtfs::read_from_zip(p)
        } else if p.is_file() {
            RawGtfs::read_from_sqlite3(p)
        } else {
            Err(Error::NotFileNorDirectory(format!("{}", p.display())))
        }
    }

    pub fn print_stats(&self) {
        println!("GTFS data:");
        println!("  Stops: {} rows", self.stops.len());
        println!("  Stop times: {} rows", self.stop_times.len());
        println!("  Routes: {} rows", self.routes.len());
        println!("  Trips: {} rows", self.trips.len());
        println!("  Shapes: {} rows", self.shapes.len());
    }

    fn read_from_dir(path: &Path) -> Result<RawGtfs, Error> {
        Ok(RawGtfs {
            stops: RawGtfs::read_table_from_path(path, STOPS)?,
            stop_times: RawGtfs::read_table_from_path(path, STOP_TIMES)?,
            routes: RawGtfs::read_table_from_path(path, ROUTES)?,
            trips: RawGtfs::read_table_from_path(path, TRIPS)?,
            shapes: RawGtfs::read_table_from_path(path, SHAPES)?,
        })
    }

    fn read_table_from_path(path: &Path, file_name: &str) -> Result<GtfsTable, Error> {
        let p = path.join(file_name);
        if p.exists() {
            File::open(p)
                .map_err(|e| Error::NamedFileIO {
                    file_name: file_name.to_owned(),
                    source: Box::new(e),
                })
                .and_then(|r| GtfsTable::from_reader(file_name, r))
        } else {
            Err(Error::MissingFile(file_name.to_owned()))
        }
    }

    fn read_from_zip(path: &Path) -> Result<RawGtfs, Error> {
        let mut archive = ZipArchive::new(File::open(path)?)?;
        Ok(RawGtfs {
            stops: RawGtfs::read_table_from_zip(&mut archive, STOPS)?,
            stop_times: RawGtfs::read_table_from_zip(&mut archive, STOP_TIMES)?,
            routes: RawGtfs::read_table_from_zip(&mut archive, ROUTES)?,
            trips: RawGtfs::read_table_from_zip(&mut archive, TRIPS)?,
            shapes: RawGtfs::read_table_from_zip(&mut archive, SHAPES)?,
        })
    }

    /// Reads `file_name` from the archive root, or from the first folder that
    /// holds it since many published feeds are zipped with a top directory.
    fn read_table_from_zip<R>(
        archive: &mut ZipArchive<R>,
        file_name: &str,
    ) -> Result<GtfsTable, Error>
    where
        R: Read + std::io::Seek,
    {
        let suffix = format!("/{}", file_name);
        let member = archive
            .file_names()
            .filter(|name| *name == file_name || name.ends_with(&suffix))
            .min_by_key(|name| name.len())
            .map(str::to_owned)
            .ok_or_else(|| Error::MissingFile(file_name.to_owned()))?;
        let reader = archive.by_name(&member)?;
        GtfsTable::from_reader(file_name, reader)
    }

    fn read_from_sqlite3(path: &Path) -> Result<RawGtfs, Error> {
        let conn = Connection::open(path)?;
        Ok(RawGtfs {
            stops: RawGtfs::read_table_sqlite3(&conn, "gtfs_stops")?,
            stop_times: RawGtfs::read_table_sqlite3(&conn, "gtfs_stop_times")?,
            routes: RawGtfs::read_table_sqlite3(&conn, "gtfs_routes")?,
            trips: RawGtfs::read_table_sqlite3(&conn, "gtfs_trips")?,
            shapes: RawGtfs::read_table_sqlite3(&conn, "gtfs_shapes")?,
        })
    }

    fn read_table_sqlite3(conn: &Connection, table_name: &str) -> Result<GtfsTable, Error> {
        RawGtfs::check_table_exists(conn, table_name)?;
        let headers = RawGtfs::get_column_names(conn, table_name)?;
        let width = headers.len();
        let mut stmt = conn.prepare(&format!("SELECT * FROM {}", table_name))?;
        let row_iter = stmt.query_map([], |row| {
            let mut values = Vec::with_capacity(width);
            for i in 0..width {
                values.push(value_to_string(row.get_ref(i)?));
            }
            Ok(Row::new(values))
        })?;
        let mut rows = Vec::new();
        for row in row_iter {
            rows.push(row?);
        }
        Ok(GtfsTable::new(table_name, headers, rows))
    }

    fn get_column_names(conn: &Connection, table_name: &str) -> Result<Vec<String>, Error> {
        let mut stmt = conn.prepare(&format!("PRAGMA table_info('{}')", table_name))?;
        let rows = stmt.query_map([], |row| row.get(1))?;

        let mut column_names: Vec<String> = Vec::new();
        for row in rows {
            column_names.push(row?);
        }

        Ok(column_names)
    }

    fn check_table_exists(conn: &Connection, table_name: &str) -> Result<(), Error> {
        let mut stmt =
            conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?")?;
        let mut rows = stmt.query(params![table_name])?;
        if rows.next()?.is_none() {
            Err(Error::MissingFile(table_name.to_owned()))
        } else {
            Ok(())
        }
    }
}

fn is_zip(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("zip"))
        .unwrap_or(false)
}

// NULL reads as an empty value, the same as a blank CSV field.
fn value_to_string(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(t) | ValueRef::Blob(t) => String::from_utf8_lossy(t).into_owned(),
    }
}
