// Record encoding, checksums, parsing and script extraction.

#[cfg(test)]
mod tests {
    use mpflash_core::constants::{MAX_FRAME_SIZE, SCRIPT_ADDR};
    use mpflash_core::frame::{encode_frame, FrameBuilder, FrameError};
    use mpflash_core::records::{
        decode_records, encode_records, extract_script, hexlify, Record, RecordError, RecordType,
    };
    use proptest::prelude::*;

    const ADDRESS_RECORD: &str = ":020000040003F7";

    fn sum_mod_256(bytes: &[u8]) -> u8 {
        bytes.iter().fold(0u8, |acc, &b| acc.wrapping_add(b))
    }

// # ✅ 1. Known output

    #[test]
    fn print_hi_hexlifies_to_two_records() {
        let hex = hexlify(b"print('hi')", &FrameBuilder::new(), false).unwrap();
        let lines: Vec<&str> = hex.lines().collect();

        assert_eq!(lines, vec![ADDRESS_RECORD, ":10E000004D500B007072696E7428276869272900CB"]);
        assert!(!hex.ends_with('\n'));
    }

    #[test]
    fn empty_script_hexlifies_to_empty_string() {
        assert_eq!(hexlify(b"", &FrameBuilder::new(), false).unwrap(), "");
    }

    #[test]
    fn extended_address_record_matches_script_region() {
        let record = Record::extended_linear_address((SCRIPT_ADDR >> 16) as u16);
        assert_eq!(record.to_line(), ADDRESS_RECORD);
        assert_eq!(Record::end_of_file().to_line(), ":00000001FF");
    }

// # ✅ 2. Addressing

    #[test]
    fn addresses_step_by_sixteen_from_region_start() {
        let frame = encode_frame(&[b'a'; 40]).unwrap(); // 44 → 48 bytes
        let stream = encode_records(&frame);

        assert_eq!(stream.len(), 4);
        assert_eq!(stream.records()[0].record_type(), RecordType::ExtendedLinearAddress);
        let addrs: Vec<u16> = stream.iter().skip(1).map(Record::address).collect();
        assert_eq!(addrs, vec![0xE000, 0xE010, 0xE020]);
        assert!(stream.iter().skip(1).all(|r| r.byte_count() == 16));
    }

    #[test]
    fn largest_frame_stays_inside_one_page() {
        let frame = encode_frame(&vec![b'x'; 8171]).unwrap();
        let stream = encode_records(&frame);
        let last = stream.records().last().unwrap();
        assert_eq!(stream.len(), 1 + 8176 / 16);
        assert_eq!(last.address(), 0xFFE0);
    }

    #[test]
    fn lines_are_uppercase_hex() {
        let hex = hexlify(b"\xab\xcd\xef", &FrameBuilder::new(), false).unwrap();
        for line in hex.lines() {
            assert!(line.starts_with(':'));
            assert!(line[1..].chars().all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
        }
    }

// # ❌ 3. Parsing

    #[test]
    fn parse_roundtrips_rendered_record() {
        let record = Record::new(RecordType::Data, 0x1234, vec![1, 2, 3]).unwrap();
        assert_eq!(Record::parse(&record.to_line()).unwrap(), record);
    }

    #[test]
    fn parse_rejects_bad_checksum() {
        assert_eq!(
            Record::parse(":020000040003F8").unwrap_err(),
            RecordError::BadChecksum { expected: 0xF7, actual: 0xF8 }
        );
    }

    #[test]
    fn parse_rejects_malformed_lines() {
        assert_eq!(Record::parse("020000040003F7").unwrap_err(), RecordError::MissingStartCode);
        assert!(matches!(Record::parse(":0G"), Err(RecordError::InvalidHex(_))));
        assert_eq!(Record::parse(":0000").unwrap_err(), RecordError::Truncated { have: 2 });
        assert_eq!(
            Record::parse(":030000040003F6").unwrap_err(),
            RecordError::LengthMismatch { declared: 3, actual: 2 }
        );
        assert_eq!(Record::parse(":00000009F7").unwrap_err(), RecordError::UnknownRecordType { raw: 9 });
    }

    #[test]
    fn record_rejects_oversized_data() {
        assert_eq!(
            Record::new(RecordType::Data, 0, vec![0; 256]).unwrap_err(),
            RecordError::DataTooLong { len: 256 }
        );
    }

    #[test]
    fn decode_records_reports_line_number() {
        let text = format!("{}\n\n:00000001FE\n", ADDRESS_RECORD);
        match decode_records(&text) {
            Err(RecordError::AtLine { line, .. }) => assert_eq!(line, 3),
            other => panic!("unexpected result: {:?}", other),
        }
    }

// # ✅ 4. Extraction

    #[test]
    fn extract_recovers_normalised_script() {
        let hex = hexlify(b"import microbit\r\nmicrobit.display.scroll('hi')\r\n", &FrameBuilder::new(), false)
            .unwrap();
        assert_eq!(
            extract_script(&hex).unwrap(),
            b"import microbit\nmicrobit.display.scroll('hi')\n"
        );
    }

    #[test]
    fn extract_without_script_region_is_empty() {
        let text = ":020000040000FA\n:0400000001020304F2\n:00000001FF\n";
        assert_eq!(extract_script(text).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn extract_rejects_region_without_signature() {
        let data = Record::new(RecordType::Data, 0xE000, b"XY\x00\x00".to_vec()).unwrap();
        let text = format!("{}\n{}\n", ADDRESS_RECORD, data);
        assert_eq!(
            extract_script(&text).unwrap_err(),
            RecordError::Frame(FrameError::InvalidSignature(*b"XY"))
        );
    }

// # ✅ 5. Properties

    proptest! {
        #[test]
        fn prop_every_record_sums_to_zero(script in proptest::collection::vec(any::<u8>(), 1..2048)) {
            let frame = encode_frame(&script).unwrap();
            for record in encode_records(&frame).iter() {
                prop_assert_eq!(sum_mod_256(&record.to_bytes()), 0);
                let parsed = Record::parse(&record.to_line()).unwrap();
                prop_assert_eq!(&parsed, record);
            }
        }

        #[test]
        fn prop_hexlify_roundtrips(script in proptest::collection::vec(any::<u8>(), 1..(MAX_FRAME_SIZE - 17))) {
            // Bytes free of '\r' survive normalisation unchanged.
            let script: Vec<u8> = script.into_iter().map(|b| if b == b'\r' { b'\n' } else { b }).collect();
            let hex = hexlify(&script, &FrameBuilder::new(), false).unwrap();
            prop_assert_eq!(extract_script(&hex).unwrap(), script);
        }
    }
}
