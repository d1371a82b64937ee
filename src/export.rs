use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use crate::sample::Sample;

/// Writes one comma-separated row per sample: the path, the array shape and
/// the flattened channel values. Invalid samples only get their path.
///
/// This is a lossy inspection format; there is no matching import. Use
/// [`crate::cache::SampleCache`] to persist samples.
pub fn write_rows<W: Write>(out: &mut W, samples: &[Sample]) -> io::Result<()> {
    for sample in samples {
        write!(out, "{}", escape(sample.path()))?;
        if let Some(data) = &sample.data {
            for dim in data.shape() {
                write!(out, ",{dim}")?;
            }
            for value in data.iter() {
                write!(out, ",{value}")?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

pub fn export_samples(path: &Path, samples: &[Sample]) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_rows(&mut out, samples)?;
    out.flush()?;
    log::info!("{} samples are exported to {:?}.", samples.len(), path);
    Ok(())
}

fn escape(field: &str) -> String {
    if field.contains(|c: char| matches!(c, ',' | '"' | '\n' | '\r')) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
