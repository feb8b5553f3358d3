//! Minimal ZIP container writer.
//!
//! Stored entries only (no compression) — the workbook parts are small
//! and every consumer unpacks them anyway. Layout per the PKWARE APPNOTE:
//! local file header + data per entry, then the central directory, then
//! the end-of-central-directory record. CRC-32 uses the standard IEEE
//! polynomial with a precomputed 256-entry table.

use chrono::{Datelike, NaiveDateTime, Timelike};

const LOCAL_FILE_HEADER_SIG: u32 = 0x0403_4B50;
const CENTRAL_DIR_SIG: u32 = 0x0201_4B50;
const END_OF_CENTRAL_DIR_SIG: u32 = 0x0605_4B50;

/// Version 2.0 — what a stored (deflate-free) entry requires.
const VERSION_NEEDED: u16 = 20;

const CRC_TABLE: [u32; 256] = crc_table();

const fn crc_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut n = 0;
    while n < 256 {
        let mut c = n as u32;
        let mut k = 0;
        while k < 8 {
            c = if c & 1 != 0 { 0xEDB8_8320 ^ (c >> 1) } else { c >> 1 };
            k += 1;
        }
        table[n] = c;
        n += 1;
    }
    table
}

/// CRC-32 (IEEE) of `data`.
pub fn crc32(data: &[u8]) -> u32 {
    let mut c = 0xFFFF_FFFF_u32;
    for &byte in data {
        c = CRC_TABLE[((c ^ byte as u32) & 0xFF) as usize] ^ (c >> 8);
    }
    c ^ 0xFFFF_FFFF
}

/// Encode a timestamp as MS-DOS (date, time) words.
///
/// DOS years start at 1980; anything earlier is floored there. Seconds
/// have 2-second resolution.
pub fn dos_datetime(t: NaiveDateTime) -> (u16, u16) {
    let year = t.year().max(1980) as u16;
    let date = ((year - 1980) << 9) | ((t.month() as u16) << 5) | t.day() as u16;
    let time =
        ((t.hour() as u16) << 11) | ((t.minute() as u16) << 5) | (t.second() as u16 / 2);
    (date, time)
}

struct Entry {
    name: String,
    crc: u32,
    size: u32,
    offset: u32,
}

/// Incremental ZIP writer. `add` entries, then `finish` for the bytes.
pub struct ZipBuilder {
    buf: Vec<u8>,
    entries: Vec<Entry>,
    dos_date: u16,
    dos_time: u16,
}

impl ZipBuilder {
    /// All entries share one modification timestamp.
    pub fn new(modified: NaiveDateTime) -> Self {
        let (dos_date, dos_time) = dos_datetime(modified);
        ZipBuilder {
            buf: Vec::new(),
            entries: Vec::new(),
            dos_date,
            dos_time,
        }
    }

    /// Append one stored entry.
    pub fn add(&mut self, name: &str, data: &[u8]) {
        let offset = self.buf.len() as u32;
        let crc = crc32(data);
        let size = data.len() as u32;

        put_u32(&mut self.buf, LOCAL_FILE_HEADER_SIG);
        put_u16(&mut self.buf, VERSION_NEEDED);
        put_u16(&mut self.buf, 0); // flags
        put_u16(&mut self.buf, 0); // method: stored
        put_u16(&mut self.buf, self.dos_time);
        put_u16(&mut self.buf, self.dos_date);
        put_u32(&mut self.buf, crc);
        put_u32(&mut self.buf, size); // compressed == uncompressed
        put_u32(&mut self.buf, size);
        put_u16(&mut self.buf, name.len() as u16);
        put_u16(&mut self.buf, 0); // extra field
        self.buf.extend_from_slice(name.as_bytes());
        self.buf.extend_from_slice(data);

        self.entries.push(Entry {
            name: name.to_string(),
            crc,
            size,
            offset,
        });
    }

    /// Write the central directory and EOCD record, returning the archive.
    pub fn finish(mut self) -> Vec<u8> {
        let central_offset = self.buf.len() as u32;

        for entry in &self.entries {
            put_u32(&mut self.buf, CENTRAL_DIR_SIG);
            put_u16(&mut self.buf, VERSION_NEEDED); // version made by
            put_u16(&mut self.buf, VERSION_NEEDED);
            put_u16(&mut self.buf, 0); // flags
            put_u16(&mut self.buf, 0); // method: stored
            put_u16(&mut self.buf, self.dos_time);
            put_u16(&mut self.buf, self.dos_date);
            put_u32(&mut self.buf, entry.crc);
            put_u32(&mut self.buf, entry.size);
            put_u32(&mut self.buf, entry.size);
            put_u16(&mut self.buf, entry.name.len() as u16);
            put_u16(&mut self.buf, 0); // extra field
            put_u16(&mut self.buf, 0); // comment
            put_u16(&mut self.buf, 0); // disk number
            put_u16(&mut self.buf, 0); // internal attributes
            put_u32(&mut self.buf, 0); // external attributes
            put_u32(&mut self.buf, entry.offset);
            self.buf.extend_from_slice(entry.name.as_bytes());
        }

        let central_size = self.buf.len() as u32 - central_offset;
        let count = self.entries.len() as u16;

        put_u32(&mut self.buf, END_OF_CENTRAL_DIR_SIG);
        put_u16(&mut self.buf, 0); // this disk
        put_u16(&mut self.buf, 0); // directory disk
        put_u16(&mut self.buf, count); // entries on this disk
        put_u16(&mut self.buf, count); // entries total
        put_u32(&mut self.buf, central_size);
        put_u32(&mut self.buf, central_offset);
        put_u16(&mut self.buf, 0); // comment length

        self.buf
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

fn put_u16(buf: &mut Vec<u8>, v: u16) {
    buf.extend_from_slice(&v.to_le_bytes());
}

fn put_u32(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_le_bytes());
}
