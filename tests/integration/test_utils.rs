//! Test utilities for integration tests.
//!
//! This module provides builders for synthetic CR2 and NEF files with
//! real embedded JPEGs, and helpers for writing them to disk.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage};

/// EXIF timestamp embedded by the builders by default.
pub const SAMPLE_DATE: &str = "2010:08:10 12:11:07";

/// `SAMPLE_DATE` as parsed: seconds dropped.
pub fn sample_created() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2010, 8, 10)
        .unwrap()
        .and_hms_opt(12, 11, 0)
        .unwrap()
}

// =============================================================================
// JPEG Generation
// =============================================================================

/// Create an RGB test JPEG with a gradient pattern.
pub fn create_test_jpeg(width: u32, height: u32, quality: u8) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 255 / width) as u8, (y * 255 / height) as u8, 128])
    });

    let mut buf = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    encoder.encode_image(&img).unwrap();
    buf
}

/// Check that data starts with a JPEG SOI marker and ends with EOI.
pub fn is_valid_jpeg(data: &[u8]) -> bool {
    data.len() >= 4
        && data[0] == 0xFF
        && data[1] == 0xD8
        && data[data.len() - 2] == 0xFF
        && data[data.len() - 1] == 0xD9
}

// =============================================================================
// Byte Writer
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrderType {
    LittleEndian,
    BigEndian,
}

/// Appends integers in a fixed byte order and patches them in place.
struct Writer {
    order: ByteOrderType,
    data: Vec<u8>,
}

impl Writer {
    fn new(order: ByteOrderType) -> Self {
        Self {
            order,
            data: Vec::new(),
        }
    }

    fn pos(&self) -> u32 {
        self.data.len() as u32
    }

    fn u16(&mut self, value: u16) {
        match self.order {
            ByteOrderType::LittleEndian => self.data.extend_from_slice(&value.to_le_bytes()),
            ByteOrderType::BigEndian => self.data.extend_from_slice(&value.to_be_bytes()),
        }
    }

    fn u32(&mut self, value: u32) {
        match self.order {
            ByteOrderType::LittleEndian => self.data.extend_from_slice(&value.to_le_bytes()),
            ByteOrderType::BigEndian => self.data.extend_from_slice(&value.to_be_bytes()),
        }
    }

    fn bytes(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    fn patch_u32(&mut self, at: u32, value: u32) {
        let at = at as usize;
        let bytes = match self.order {
            ByteOrderType::LittleEndian => value.to_le_bytes(),
            ByteOrderType::BigEndian => value.to_be_bytes(),
        };
        self.data[at..at + 4].copy_from_slice(&bytes);
    }

    fn header(&mut self, root_ifd_offset: u32) {
        match self.order {
            ByteOrderType::LittleEndian => self.bytes(b"II"),
            ByteOrderType::BigEndian => self.bytes(b"MM"),
        }
        self.u16(42);
        self.u32(root_ifd_offset);
    }

    /// Write an IFD whose entries are `(tag, type, count, value)`; returns the
    /// position of each entry's value field for later patching.
    fn ifd(&mut self, entries: &[(u16, u16, u32, u32)]) -> Vec<u32> {
        self.u16(entries.len() as u16);
        self.ifd_entries_tail(entries)
    }

    /// Write the remaining entries of an IFD whose count and leading entries
    /// are already written, then a zero next-IFD pointer.
    fn ifd_entries_tail(&mut self, entries: &[(u16, u16, u32, u32)]) -> Vec<u32> {
        let mut value_fields = Vec::with_capacity(entries.len());
        for &(tag, field_type, count, value) in entries {
            self.u16(tag);
            self.u16(field_type);
            self.u32(count);
            value_fields.push(self.pos());
            self.u32(value);
        }
        self.u32(0);
        value_fields
    }

    /// Write a SHORT entry's value left-justified.
    fn short_entry(&mut self, tag: u16, value: u16) {
        self.u16(tag);
        self.u16(3);
        self.u32(1);
        self.u16(value);
        self.u16(0);
    }

    fn rational(&mut self, numerator: u32, denominator: u32) -> u32 {
        let at = self.pos();
        self.u32(numerator);
        self.u32(denominator);
        at
    }

    /// EXIF IFD with a single DateTimeDigitized entry followed by its string.
    fn exif_with_date(&mut self, date: &str) -> u32 {
        let at = self.pos();
        let mut ascii = date.as_bytes().to_vec();
        ascii.push(0);
        let fields = self.ifd(&[(0x9004, 2, ascii.len() as u32, 0)]);
        let string_at = self.pos();
        self.bytes(&ascii);
        self.patch_u32(fields[0], string_at);
        at
    }
}

// =============================================================================
// Raw File Builders
// =============================================================================

/// Options shared by the CR2 and NEF builders.
#[derive(Debug, Clone)]
pub struct RawFixture {
    pub order: ByteOrderType,
    pub jpeg: Vec<u8>,
    pub orientation: u16,
    pub date: Option<String>,
    /// Write the JPEG offset/length tags
    pub jpeg_tags: bool,
    /// Point the EXIF IFD tag past the end of the file
    pub broken_exif: bool,
}

impl RawFixture {
    pub fn new(order: ByteOrderType) -> Self {
        Self {
            order,
            jpeg: create_test_jpeg(64, 48, 90),
            orientation: 1,
            date: Some(SAMPLE_DATE.to_string()),
            jpeg_tags: true,
            broken_exif: false,
        }
    }

    pub fn with_orientation(mut self, orientation: u16) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_date(mut self, date: Option<&str>) -> Self {
        self.date = date.map(str::to_string);
        self
    }

    pub fn without_jpeg_tags(mut self) -> Self {
        self.jpeg_tags = false;
        self
    }

    pub fn with_broken_exif(mut self) -> Self {
        self.broken_exif = true;
        self
    }
}

/// Build a CR2: 16-byte header, root IFD at 16 with the strip tags, two
/// resolution rationals and an EXIF IFD.
pub fn create_cr2(fixture: &RawFixture) -> Vec<u8> {
    let mut w = Writer::new(fixture.order);

    w.header(16);
    w.bytes(b"CR");
    w.bytes(&[2, 0]);
    w.u32(0);
    assert_eq!(w.pos(), 16);

    // Root IFD: orientation is written separately to keep it left-justified
    let mut entries = Vec::new();
    if fixture.jpeg_tags {
        entries.push((0x0111, 4, 1, 0));
        entries.push((0x0117, 4, 1, fixture.jpeg.len() as u32));
    }
    entries.push((0x011A, 5, 1, 0));
    entries.push((0x011B, 5, 1, 0));
    entries.push((0x8769, 4, 1, 0));

    let count = entries.len() as u16 + 1;
    w.u16(count);
    let mut fields = Vec::new();
    for &(tag, field_type, n, value) in &entries {
        w.u16(tag);
        w.u16(field_type);
        w.u32(n);
        fields.push(w.pos());
        w.u32(value);
    }
    w.short_entry(0x0112, fixture.orientation);
    w.u32(0);

    let x_res = w.rational(300, 1);
    let y_res = w.rational(300, 1);

    let exif = match (&fixture.date, fixture.broken_exif) {
        (_, true) => 0x0FFF_FFF0,
        (Some(date), false) => w.exif_with_date(date),
        (None, false) => {
            let at = w.pos();
            w.ifd(&[]);
            at
        }
    };

    let jpeg_at = w.pos();
    w.bytes(&fixture.jpeg);

    let mut field = fields.into_iter();
    if fixture.jpeg_tags {
        w.patch_u32(field.next().unwrap(), jpeg_at);
        field.next();
    }
    w.patch_u32(field.next().unwrap(), x_res);
    w.patch_u32(field.next().unwrap(), y_res);
    w.patch_u32(field.next().unwrap(), exif);

    w.data
}

/// Build a NEF: root IFD at 8 with orientation, a SubIFDs pointer and an
/// EXIF pointer; SubIFD 0 carries the resolution and JPEG tags.
pub fn create_nef(fixture: &RawFixture) -> Vec<u8> {
    let mut w = Writer::new(fixture.order);

    w.header(8);

    w.u16(3);
    w.short_entry(0x0112, fixture.orientation);
    let root = w.ifd_entries_tail(&[(0x014A, 4, 1, 0), (0x8769, 4, 1, 0)]);

    // LONG holding the SubIFD offset
    let pointer_at = w.pos();
    w.u32(0);

    let sub_at = w.pos();
    w.patch_u32(pointer_at, sub_at);

    let mut entries = vec![(0x011A, 5, 1, 0), (0x011B, 5, 1, 0)];
    if fixture.jpeg_tags {
        entries.push((0x0201, 4, 1, 0));
        entries.push((0x0202, 4, 1, fixture.jpeg.len() as u32));
    }
    let sub_fields = w.ifd(&entries);

    let x_res = w.rational(300, 1);
    let y_res = w.rational(300, 1);

    let exif = match (&fixture.date, fixture.broken_exif) {
        (_, true) => 0x0FFF_FFF0,
        (Some(date), false) => w.exif_with_date(date),
        (None, false) => {
            let at = w.pos();
            w.ifd(&[]);
            at
        }
    };

    let jpeg_at = w.pos();
    w.bytes(&fixture.jpeg);

    w.patch_u32(root[0], pointer_at);
    w.patch_u32(root[1], exif);
    w.patch_u32(sub_fields[0], x_res);
    w.patch_u32(sub_fields[1], y_res);
    if fixture.jpeg_tags {
        w.patch_u32(sub_fields[2], jpeg_at);
    }

    w.data
}

// =============================================================================
// Files on Disk
// =============================================================================

/// Write `data` to `dir/name` and return the path.
pub fn write_sample(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, data).unwrap();
    path
}
