use eyre::{ensure, Result, WrapErr};
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

pub enum DecompressedStream {
    PlainText(File),
    Gzip(MultiGzDecoder<File>),
}

impl DecompressedStream {
    pub fn box_bufread(self) -> Box<dyn BufRead + Send + Sync + 'static> {
        match self {
            DecompressedStream::PlainText(file) => Box::new(BufReader::new(file)),
            DecompressedStream::Gzip(decoder) => Box::new(BufReader::new(decoder)),
        }
    }
}

/// Open a file for reading. Gzip compression is detected from the file signature.
pub fn read_file(path: impl AsRef<Path>) -> Result<DecompressedStream> {
    let path = path.as_ref();
    ensure!(path.exists(), "File {} does not exist", path.display());

    let kind = infer::get_from_path(path)
        .wrap_err_with(|| format!("Failed to inspect {}", path.display()))?;
    let file = File::open(path)?;

    // Always assume plain text if there is no clear match
    let stream = match kind.map(|x| (x.extension(), x.mime_type())) {
        Some(("gz", "application/gzip")) => DecompressedStream::Gzip(MultiGzDecoder::new(file)),
        _ => DecompressedStream::PlainText(file),
    };
    Ok(stream)
}

pub enum CompressedStream {
    PlainText(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
}

impl CompressedStream {
    /// Flush the buffers and write the gzip footer if needed. Dropping the stream without calling
    /// `finish` may leave a truncated file behind.
    pub fn finish(self) -> Result<()> {
        match self {
            CompressedStream::PlainText(mut writer) => writer.flush()?,
            CompressedStream::Gzip(encoder) => encoder.finish()?.flush()?,
        }
        Ok(())
    }
}

impl Write for CompressedStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            CompressedStream::PlainText(w) => w.write(buf),
            CompressedStream::Gzip(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            CompressedStream::PlainText(w) => w.flush(),
            CompressedStream::Gzip(w) => w.flush(),
        }
    }
}

/// Create (or truncate) a file for writing. Paths ending with `.gz` are gzip-compressed.
pub fn create_file(path: impl AsRef<Path>) -> Result<CompressedStream> {
    let path = path.as_ref();
    let file = File::create(path)
        .wrap_err_with(|| format!("Failed to create {}", path.display()))?;
    let writer = BufWriter::new(file);

    let gzipped = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));
    let stream = if gzipped {
        CompressedStream::Gzip(GzEncoder::new(writer, Compression::default()))
    } else {
        CompressedStream::PlainText(writer)
    };
    Ok(stream)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_roundtrip_plain_and_gzip() -> Result<()> {
        let dir = tempfile::tempdir()?;
        for name in ["coverage.txt", "coverage.txt.gz"] {
            let path = dir.path().join(name);
            let mut stream = create_file(&path)?;
            stream.write_all(b"68101: 1\n68102: 2\n")?;
            stream.finish()?;

            let mut content = String::new();
            read_file(&path)?.box_bufread().read_to_string(&mut content)?;
            assert_eq!(content, "68101: 1\n68102: 2\n");
        }

        // Compressed output really is compressed
        let mut raw = Vec::new();
        File::open(dir.path().join("coverage.txt.gz"))?.read_to_end(&mut raw)?;
        assert_eq!(&raw[..2], &[0x1f, 0x8b]);
        Ok(())
    }

    #[test]
    fn test_missing_file() {
        assert!(read_file("/definitely/not/here.txt").is_err());
    }
}
