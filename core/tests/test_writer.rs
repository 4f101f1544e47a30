// Image persistence: validation, per-destination outcomes, local copy.

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use mpflash_core::writer::{save_hex, ImageWriter, WriteError};
    use tempfile::tempdir;

    const IMAGE: &str = ":020000040003F7\n:00000001FF\n";

    #[test]
    fn save_hex_writes_ascii_bytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("micropython.hex");

        assert_eq!(save_hex(IMAGE, &path).unwrap(), IMAGE.len());
        assert_eq!(fs::read_to_string(&path).unwrap(), IMAGE);
    }

    #[test]
    fn empty_image_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("micropython.hex");

        assert!(matches!(save_hex("", &path), Err(WriteError::EmptyImage)));
        assert!(matches!(
            ImageWriter::new().persist("", &[path.clone()]),
            Err(WriteError::EmptyImage)
        ));
        assert!(!path.exists());
    }

    #[test]
    fn non_ascii_image_is_rejected() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            save_hex(":00\u{e9}", &dir.path().join("a.hex")),
            Err(WriteError::NotAscii)
        ));
    }

// # ❌ Scenario: invalid destination leaves the file untouched

    #[test]
    fn wrong_extension_is_rejected_and_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("firmware.bin");
        fs::write(&path, b"original").unwrap();

        match save_hex(IMAGE, &path) {
            Err(WriteError::InvalidDestination { path: p }) => assert_eq!(p, path),
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(fs::read(&path).unwrap(), b"original");
    }

    #[test]
    fn upper_case_extension_is_not_hex() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            save_hex(IMAGE, &dir.path().join("FIRMWARE.HEX")),
            Err(WriteError::InvalidDestination { .. })
        ));
    }

// # ✅ Independent destinations

    fn mixed_destinations(root: &std::path::Path) -> Vec<PathBuf> {
        vec![
            root.join("a.hex"),
            root.join("b.txt"),
            root.join("missing-dir").join("c.hex"),
            root.join("d.hex"),
        ]
    }

    fn assert_mixed_outcomes(root: &std::path::Path, parallel: bool) {
        let destinations = mixed_destinations(root);
        let report = ImageWriter::new().parallel(parallel).persist(IMAGE, &destinations).unwrap();

        assert_eq!(report.destinations.len(), 4);
        let paths: Vec<&PathBuf> = report.destinations.iter().map(|d| &d.path).collect();
        assert_eq!(paths, destinations.iter().collect::<Vec<_>>());

        assert!(report.destinations[0].is_ok());
        assert!(matches!(report.destinations[1].result, Err(WriteError::InvalidDestination { .. })));
        assert!(matches!(report.destinations[2].result, Err(WriteError::Io { .. })));
        assert!(report.destinations[3].is_ok());
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed().count(), 2);

        assert_eq!(fs::read_to_string(root.join("a.hex")).unwrap(), IMAGE);
        assert_eq!(fs::read_to_string(root.join("d.hex")).unwrap(), IMAGE);
        assert!(!root.join("b.txt").exists());
    }

    #[test]
    fn failures_do_not_stop_siblings_sequential() {
        let dir = tempdir().unwrap();
        assert_mixed_outcomes(dir.path(), false);
    }

    #[test]
    fn failures_do_not_stop_siblings_parallel() {
        let dir = tempdir().unwrap();
        assert_mixed_outcomes(dir.path(), true);
    }

// # ✅ Local copy

    #[test]
    fn local_copy_is_written_without_destinations() {
        let dir = tempdir().unwrap();
        let local = dir.path().join("microbit").join("blink.hex");

        let report = ImageWriter::new().with_local_copy(&local).persist(IMAGE, &[]).unwrap();

        assert_eq!(report.local_copy, Some((local.clone(), IMAGE.len())));
        assert!(report.destinations.is_empty());
        assert_eq!(fs::read_to_string(&local).unwrap(), IMAGE);
    }

    #[test]
    fn local_copy_failure_is_fatal() {
        let dir = tempdir().unwrap();
        let device = dir.path().join("device.hex");

        let err = ImageWriter::new()
            .with_local_copy(dir.path().join("copy.txt"))
            .persist(IMAGE, &[device.clone()])
            .unwrap_err();

        assert!(matches!(err, WriteError::InvalidDestination { .. }));
        assert!(!device.exists());
    }

    #[test]
    fn report_serialises_outcomes() {
        let dir = tempdir().unwrap();
        let destinations = vec![dir.path().join("ok.hex"), dir.path().join("bad.bin")];
        let report = ImageWriter::new().persist(IMAGE, &destinations).unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["destinations"][0]["bytes_written"], IMAGE.len());
        assert!(json["destinations"][0]["error"].is_null());
        assert!(json["destinations"][1]["bytes_written"].is_null());
        assert!(json["destinations"][1]["error"].as_str().unwrap().contains(".hex"));
    }
}
