use crate::result::{PreprocessError, PreprocessResult};
use byteorder::{LittleEndian, ReadBytesExt};
use itertools::Itertools;
use ndarray::Array3;
use npyz::WriterBuilder;
use std::{
    fs,
    io::{Cursor, Seek, Write},
    path::{Path, PathBuf},
};
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

/// Number of channels the renderer writes per pixel.
pub const CHANNELS: usize = 14;
/// Name of the dataset entry inside the container archive.
pub const DATASET_NAME: &str = "data";

/// Maps a raw record path to its container path.
pub fn container_path(raw_path: &Path) -> PathBuf {
    raw_path.with_extension("npz")
}

/// Repackages one raw record into a compressed container and deletes the
/// raw file. A failure anywhere before the container is fully written leaves
/// the raw file untouched.
pub fn convert(raw_path: &Path) -> PreprocessResult<PathBuf> {
    let record = read_raw_record(raw_path)?;

    let dst_path = container_path(raw_path);
    write_container(&dst_path, &record)?;

    fs::remove_file(raw_path)?;

    Ok(dst_path)
}

/// Parses a raw record: two little-endian `i32` dimensions, followed by
/// exactly `height * width * 14` little-endian floats.
pub fn read_raw_record(path: &Path) -> PreprocessResult<Array3<f32>> {
    let bytes = fs::read(path)?;

    if bytes.len() < 8 {
        return Err(PreprocessError::TruncatedRecord {
            path: path.to_path_buf(),
            len: bytes.len(),
        });
    }

    let mut reader = Cursor::new(&bytes[..]);
    let height = reader.read_i32::<LittleEndian>()?;
    let width = reader.read_i32::<LittleEndian>()?;

    let payload = &bytes[8..];
    let Some(element_count) = usize::try_from(height)
        .ok()
        .zip(usize::try_from(width).ok())
        .and_then(|(height, width)| height.checked_mul(width))
        .and_then(|pixels| pixels.checked_mul(CHANNELS))
        .filter(|count| count.checked_mul(4) == Some(payload.len()))
    else {
        return Err(PreprocessError::MalformedRecord {
            path: path.to_path_buf(),
            height,
            width,
            payload_bytes: payload.len(),
        });
    };

    let mut values = vec![0.0; element_count];
    reader.read_f32_into::<LittleEndian>(&mut values)?;

    // The length was validated against the dimensions above.
    Ok(Array3::from_shape_vec((height as usize, width as usize, CHANNELS), values).unwrap())
}

/// Stores the record as a single deflated `.npy` entry in a fresh archive.
/// The archive is staged next to the final path and renamed into place once
/// complete, so a failed write never leaves a partial container behind that
/// the completion check would count as a finished view.
pub fn write_container(path: &Path, record: &Array3<f32>) -> PreprocessResult<()> {
    let staging_path = path.with_extension("npz.tmp");

    let file = fs::File::create(&staging_path)?;
    if let Err(error) = write_archive(file, record) {
        let _ = fs::remove_file(&staging_path);
        return Err(error);
    }

    fs::rename(&staging_path, path)?;

    Ok(())
}

fn write_archive<W: Write + Seek>(writer: W, record: &Array3<f32>) -> PreprocessResult<()> {
    let shape = record.shape().iter().map(|&dim| dim as u64).collect_vec();

    let mut npy_bytes = Vec::new();
    let mut npy_writer = npyz::WriteOptions::new()
        .default_dtype()
        .shape(&shape)
        .writer(&mut npy_bytes)
        .begin_nd()?;
    npy_writer.extend(record.iter().copied())?;
    npy_writer.finish()?;

    let mut archive = ZipWriter::new(writer);
    archive.start_file(
        format!("{DATASET_NAME}.npy"),
        SimpleFileOptions::default().compression_method(CompressionMethod::Deflated),
    )?;
    archive.write_all(&npy_bytes)?;
    archive.finish()?;

    Ok(())
}
