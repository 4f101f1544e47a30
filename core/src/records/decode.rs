use byteorder::{BigEndian, ByteOrder};

use crate::constants::{MAX_FRAME_SIZE, SCRIPT_ADDR};
use crate::frame::decode_frame;
use crate::records::types::{Record, RecordError, RecordStream, RecordType};

impl Record {
    /// Parse one hex line, validating lengths, record type and checksum.
    pub fn parse(line: &str) -> Result<Record, RecordError> {
        let digits = line.trim().strip_prefix(':').ok_or(RecordError::MissingStartCode)?;
        let wire = hex::decode(digits).map_err(|e| RecordError::InvalidHex(e.to_string()))?;

        // count (1) + address (2) + type (1) + checksum (1)
        if wire.len() < 5 {
            return Err(RecordError::Truncated { have: wire.len() });
        }

        let declared = wire[0] as usize;
        let actual = wire.len() - 5;
        if declared != actual {
            return Err(RecordError::LengthMismatch { declared, actual });
        }

        let address = BigEndian::read_u16(&wire[1..3]);
        let record_type = RecordType::verify(wire[3])?;
        let data = wire[4..4 + declared].to_vec();

        let record = Record::new(record_type, address, data)?;
        let actual = wire[wire.len() - 1];
        let expected = record.checksum();
        if actual != expected {
            return Err(RecordError::BadChecksum { expected, actual });
        }

        Ok(record)
    }
}

/// Parse every non-blank line of a hex image.
pub fn decode_records(text: &str) -> Result<RecordStream, RecordError> {
    let mut records = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record = Record::parse(line)
            .map_err(|e| RecordError::AtLine { line: idx + 1, error: Box::new(e) })?;
        records.push(record);
    }
    Ok(RecordStream::from_records(records))
}

/// Recover the script embedded in a hex image.
///
/// Collects data records whose absolute address falls inside the script
/// region and decodes the frame they form. An image without script records
/// yields an empty script.
pub fn extract_script(text: &str) -> Result<Vec<u8>, RecordError> {
    let region_start = SCRIPT_ADDR;
    let region_end = SCRIPT_ADDR + MAX_FRAME_SIZE as u32;

    let mut upper: u32 = 0;
    let mut region = Vec::new();

    for record in decode_records(text)?.iter() {
        match record.record_type() {
            RecordType::ExtendedLinearAddress => upper = address_base(record)? << 16,
            RecordType::ExtendedSegmentAddress => upper = address_base(record)? << 4,
            RecordType::Data => {
                let absolute = upper + record.address() as u32;
                if (region_start..region_end).contains(&absolute) {
                    region.extend_from_slice(record.data());
                }
            }
            RecordType::EndOfFile => break,
            RecordType::StartSegmentAddress | RecordType::StartLinearAddress => {}
        }
    }

    if region.is_empty() {
        return Ok(Vec::new());
    }
    Ok(decode_frame(&region)?.to_vec())
}

fn address_base(record: &Record) -> Result<u32, RecordError> {
    match record.data() {
        [hi, lo] => Ok(u16::from_be_bytes([*hi, *lo]) as u32),
        other => Err(RecordError::MalformedAddress { len: other.len() }),
    }
}
