//! records/types.rs
//! Intel-HEX record types.
//!
//! Design notes:
//! - A `Record` holds its fields; the byte count and checksum are derived, so
//!   a constructed record is always self-consistent.
//! - Addresses are the low 16 bits; the upper half comes from a preceding
//!   extended linear address record.
//! - Text form is `:CCAAAATT<data>SS`, uppercase hex.

use std::fmt;
use num_enum::TryFromPrimitive;

use crate::frame::FrameError;
use crate::utils::{enum_name_or_hex, record_checksum};

/// Record type identifiers of the Intel-HEX family.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
pub enum RecordType {
    Data                   = 0x00,
    EndOfFile              = 0x01,
    ExtendedSegmentAddress = 0x02,
    StartSegmentAddress    = 0x03,
    ExtendedLinearAddress  = 0x04,
    StartLinearAddress     = 0x05,
}

impl RecordType {
    pub fn verify(raw: u8) -> Result<Self, RecordError> {
        RecordType::try_from_primitive(raw).map_err(|_| RecordError::UnknownRecordType { raw })
    }
}

/// One checksummed, address-tagged line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    record_type: RecordType,
    address: u16,
    data: Vec<u8>,
}

impl Record {
    /// Largest payload a record can declare (byte count is one byte).
    pub const MAX_DATA_LEN: usize = u8::MAX as usize;

    pub fn new(record_type: RecordType, address: u16, data: Vec<u8>) -> Result<Self, RecordError> {
        if data.len() > Self::MAX_DATA_LEN {
            return Err(RecordError::DataTooLong { len: data.len() });
        }
        Ok(Self { record_type, address, data })
    }

    pub(crate) fn data_chunk(address: u16, chunk: &[u8]) -> Self {
        debug_assert!(chunk.len() <= Self::MAX_DATA_LEN);
        Self { record_type: RecordType::Data, address, data: chunk.to_vec() }
    }

    /// Select the upper 16 bits of all following data addresses.
    pub fn extended_linear_address(upper: u16) -> Self {
        Self {
            record_type: RecordType::ExtendedLinearAddress,
            address: 0,
            data: upper.to_be_bytes().to_vec(),
        }
    }

    pub fn end_of_file() -> Self {
        Self { record_type: RecordType::EndOfFile, address: 0, data: Vec::new() }
    }

    #[inline]
    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    #[inline]
    pub fn address(&self) -> u16 {
        self.address
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn byte_count(&self) -> u8 {
        self.data.len() as u8
    }

    /// Every field except the checksum, in wire order.
    fn body(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(4 + self.data.len());
        out.push(self.byte_count());
        out.extend_from_slice(&self.address.to_be_bytes());
        out.push(self.record_type as u8);
        out.extend_from_slice(&self.data);
        out
    }

    pub fn checksum(&self) -> u8 {
        record_checksum(&self.body())
    }

    /// All fields including the checksum. Their byte sum is 0 mod 256.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = self.body();
        out.push(record_checksum(&out));
        out
    }

    /// Render as a hex line without line terminator.
    pub fn to_line(&self) -> String {
        let body = self.body();
        format!(":{}{:02X}", hex::encode_upper(&body), record_checksum(&body))
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line())
    }
}

/// Ordered sequence of records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordStream {
    records: Vec<Record>,
}

impl RecordStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<Record>) -> Self {
        Self { records }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn lines(&self) -> Vec<String> {
        self.records.iter().map(Record::to_line).collect()
    }

    /// Lines joined by `\n`, no trailing newline. Empty stream → empty string.
    pub fn to_text(&self) -> String {
        self.lines().join("\n")
    }
}

impl<'a> IntoIterator for &'a RecordStream {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// Line does not begin with `:`.
    MissingStartCode,

    /// Characters after `:` are not an even number of hex digits.
    InvalidHex(String),

    /// Fewer bytes than count + address + type + checksum.
    Truncated { have: usize },

    /// Byte count field disagrees with the data actually present.
    LengthMismatch { declared: usize, actual: usize },

    UnknownRecordType { raw: u8 },

    /// Checksum byte does not match the computed one.
    BadChecksum { expected: u8, actual: u8 },

    /// Payload longer than a one-byte count can declare.
    DataTooLong { len: usize },

    /// Address record with a payload other than two bytes.
    MalformedAddress { len: usize },

    /// Error annotated with the 1-based line it came from.
    AtLine { line: usize, error: Box<RecordError> },

    /// Script region holds no valid frame.
    Frame(FrameError),
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use RecordError::*;
        match self {
            MissingStartCode =>
                write!(f, "record does not start with ':'"),
            InvalidHex(msg) =>
                write!(f, "invalid hex digits: {}", msg),
            Truncated { have } =>
                write!(f, "record too short: {} bytes", have),
            LengthMismatch { declared, actual } =>
                write!(f, "byte count {} but {} data bytes present", declared, actual),
            UnknownRecordType { raw } =>
                write!(f, "unknown record type: {}", enum_name_or_hex::<RecordType>(*raw)),
            BadChecksum { expected, actual } =>
                write!(f, "bad checksum: expected {:02X}, got {:02X}", expected, actual),
            DataTooLong { len } =>
                write!(f, "record data too long: {} > {}", len, Record::MAX_DATA_LEN),
            MalformedAddress { len } =>
                write!(f, "address record carries {} bytes, expected 2", len),
            AtLine { line, error } =>
                write!(f, "line {}: {}", line, error),
            Frame(e) =>
                write!(f, "embedded script: {}", e),
        }
    }
}

impl std::error::Error for RecordError {}

impl From<FrameError> for RecordError {
    fn from(e: FrameError) -> Self {
        RecordError::Frame(e)
    }
}
