// Unpacking downloaded archives into a scratch directory.

use crate::libs::utilities::assets::detect_file_type;
use crate::{log_debug, log_error};
use colored::Colorize;
use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tar::Archive;
use xz2::read::XzDecoder;
use zip::ZipArchive;

/// Extracts `src` into a fresh `extracted` directory under `dest` and returns it.
///
/// `known_file_type` skips detection when the caller already knows the format.
/// Any previous `extracted` directory is removed first so stale members from
/// an earlier run can never be picked up.
pub fn extract_archive(src: &Path, dest: &Path, known_file_type: Option<&str>) -> io::Result<PathBuf> {
    log_debug!(
        "[Archive] Extracting {:?} into {:?}",
        src.to_string_lossy().blue(),
        dest.to_string_lossy().cyan()
    );

    let file_type = match known_file_type {
        Some(ft) => ft.to_string(),
        None => detect_file_type(src),
    };

    let extracted_path = dest.join("extracted");
    if extracted_path.exists() {
        fs::remove_dir_all(&extracted_path)?;
    }
    fs::create_dir_all(&extracted_path)?;

    match file_type.as_str() {
        "zip" => {
            let mut archive = ZipArchive::new(File::open(src)?)?;
            archive.extract(&extracted_path)?;
        }
        "tar.gz" => {
            Archive::new(GzDecoder::new(File::open(src)?)).unpack(&extracted_path)?;
        }
        "tar.xz" => {
            Archive::new(XzDecoder::new(File::open(src)?)).unpack(&extracted_path)?;
        }
        "tar" => {
            Archive::new(File::open(src)?).unpack(&extracted_path)?;
        }
        other => {
            log_error!("[Archive] Unsupported archive type '{}' for {:?}", other.red(), src);
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Unsupported archive type: {other}"),
            ));
        }
    }

    log_debug!(
        "[Archive] {} contents available at {:?}",
        file_type,
        extracted_path.to_string_lossy().green()
    );
    Ok(extracted_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn tar_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut builder = tar::Builder::new(Vec::new());
        for (path, data) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o755);
            header.set_cksum();
            builder.append_data(&mut header, path, *data).unwrap();
        }
        builder.into_inner().unwrap()
    }

    #[test]
    fn extracts_tar_xz_with_nested_layout() {
        let tmp = TempDir::new().unwrap();
        let archive = tmp.path().join("ffmpeg.tar.xz");
        let tar = tar_bytes(&[
            ("ffmpeg-7.1-amd64-static/ffmpeg", b"ffmpeg-bin"),
            ("ffmpeg-7.1-amd64-static/ffprobe", b"ffprobe-bin"),
        ]);
        let mut encoder = xz2::write::XzEncoder::new(File::create(&archive).unwrap(), 6);
        encoder.write_all(&tar).unwrap();
        encoder.finish().unwrap();

        let out = extract_archive(&archive, tmp.path(), None).unwrap();
        assert_eq!(
            fs::read(out.join("ffmpeg-7.1-amd64-static/ffprobe")).unwrap(),
            b"ffprobe-bin"
        );
    }

    #[test]
    fn extracts_zip_archives() {
        let tmp = TempDir::new().unwrap();
        let archive = tmp.path().join("ffmpeg.zip");
        {
            let mut writer = zip::ZipWriter::new(File::create(&archive).unwrap());
            writer
                .start_file("bundle/bin/ffmpeg.exe", zip::write::FileOptions::default())
                .unwrap();
            writer.write_all(b"MZ").unwrap();
            writer.finish().unwrap();
        }

        let out = extract_archive(&archive, tmp.path(), Some("zip")).unwrap();
        assert_eq!(fs::read(out.join("bundle/bin/ffmpeg.exe")).unwrap(), b"MZ");
    }

    #[test]
    fn stale_extraction_is_replaced() {
        let tmp = TempDir::new().unwrap();
        let stale = tmp.path().join("extracted/old-member");
        fs::create_dir_all(stale.parent().unwrap()).unwrap();
        fs::write(&stale, b"old").unwrap();

        let archive = tmp.path().join("bundle.tar");
        fs::write(&archive, tar_bytes(&[("new-member", b"new")])).unwrap();

        let out = extract_archive(&archive, tmp.path(), None).unwrap();
        assert!(!stale.exists());
        assert!(out.join("new-member").exists());
    }

    #[test]
    fn plain_binaries_are_rejected() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("yt-dlp");
        fs::write(&src, b"\x7fELF").unwrap();
        let err = extract_archive(&src, tmp.path(), None).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
