use std::io::{Cursor, Write};

use serde::Serialize;
use zip::write::FileOptions;
use zip::ZipWriter;

use super::StaticBundle;

fn to_io_error(err: impl std::error::Error + Send + Sync + 'static) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, err)
}

fn csv_bytes<T: Serialize>(rows: &[T]) -> std::io::Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row).map_err(to_io_error)?;
    }
    writer.into_inner().map_err(|err| err.into_error())
}

/// Packs the bundle's tables into a `gtfs.zip`-shaped archive.
pub fn to_zip_bytes(bundle: &StaticBundle) -> std::io::Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut zip = ZipWriter::new(&mut cursor);
        let options: FileOptions<()> =
            FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        let tables: &[(&str, Vec<u8>)] = &[
            ("agency.txt", csv_bytes(&bundle.agency)?),
            ("routes.txt", csv_bytes(&bundle.routes)?),
            ("stops.txt", csv_bytes(&bundle.stops)?),
            ("trips.txt", csv_bytes(&bundle.trips)?),
            ("stop_times.txt", csv_bytes(&bundle.stop_times)?),
            ("calendar.txt", csv_bytes(&bundle.calendar)?),
            ("shapes.txt", csv_bytes(&bundle.shapes)?),
            ("translations.txt", csv_bytes(&bundle.translations)?),
            ("feed_info.txt", csv_bytes(&[bundle.feed_info.clone()])?),
        ];

        for (name, bytes) in tables {
            zip.start_file(*name, options.clone())?;
            zip.write_all(bytes)?;
        }
        zip.finish()?;
    }
    Ok(cursor.into_inner())
}
