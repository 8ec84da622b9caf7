#![allow(dead_code)]

pub mod geonames_server;

use std::io::{Cursor, Write};

/// Zip archive holding a single `allCountries.txt` entry with `rows`.
pub fn archive_with_rows(rows: &str) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut writer = zip::ZipWriter::new(&mut buf);
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated);
        writer.start_file("allCountries.txt", options).unwrap();
        writer.write_all(rows.as_bytes()).unwrap();
        writer.finish().unwrap();
    }
    buf.into_inner()
}

pub const SAMPLE_ROWS: &str = "AD\tAD100\tCanillo\t\t\t\t\t\t\t42.5833\t1.6667\t6\n\
AD\tAD200\tEncamp\t\t\t\t\t\t\t42.5333\t1.6333\t6\n\
AR\t3636\tPOZO CERCADO\tSalta\tA\t\t\t\t\t-23.4933\t-61.9267\t4\n\
US\t99553\tAkutan\tAlaska\tAK\tAleutians East\t013\t\t\t54.143\t-165.7854\t1\n";
