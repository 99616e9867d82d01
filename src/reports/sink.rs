use super::resource_kind::ResourceKind;
use crate::Result;
use camino::{Utf8Path, Utf8PathBuf};
use ohno::IntoAppError;
use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};

/// Write one batch of rows to a CSV file.
///
/// The first batch truncates the file and writes the header; later batches append without one.
pub fn write_batch<I, S>(path: &Utf8Path, header: &str, rows: I, is_first: bool) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let file = if is_first {
        File::create(path)
    } else {
        OpenOptions::new().append(true).create(true).open(path)
    }
    .into_app_err_with(|| format!("opening '{path}'"))?;

    let mut writer = BufWriter::new(file);
    if is_first {
        writeln!(writer, "{header}").into_app_err_with(|| format!("writing '{path}'"))?;
    }

    for row in rows {
        writeln!(writer, "{}", row.as_ref()).into_app_err_with(|| format!("writing '{path}'"))?;
    }

    writer.flush().into_app_err_with(|| format!("writing '{path}'"))
}

/// Routes rows to one file per resource kind and remembers which files this run has started.
///
/// A file receives its header on the first successful write of the run and is appended to after
/// that, however many projects contribute to it.
#[derive(Debug)]
pub struct CsvSink {
    output_dir: Utf8PathBuf,
    started: HashSet<Utf8PathBuf>,
}

impl CsvSink {
    #[must_use]
    pub fn new(output_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            started: HashSet::new(),
        }
    }

    #[must_use]
    pub fn path_for(&self, kind: ResourceKind, prefix: &str) -> Utf8PathBuf {
        self.output_dir.join(kind.file_name(prefix))
    }

    /// Write rows for `kind`, returning the file they went to.
    pub fn write<I, S>(&mut self, kind: ResourceKind, prefix: &str, rows: I) -> Result<Utf8PathBuf>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let path = self.path_for(kind, prefix);
        let is_first = !self.started.contains(&path);

        write_batch(&path, kind.header(), rows, is_first)?;

        if is_first {
            let _ = self.started.insert(path.clone());
        }

        Ok(path)
    }
}
