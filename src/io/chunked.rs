use std::path::Path;
use std::thread::JoinHandle;

use crossbeam::channel::Receiver;
use log::debug;
use polars::prelude::*;

use super::ensure_exists;
use crate::error::{
    PrepError,
    PrepResult,
};

/// Reads a delimited file in chunks of `chunk_size` rows.
///
/// Parsing happens on a dedicated thread that sends finished chunks through
/// a bounded channel, so at most `queue_len` unconsumed chunks exist at any
/// time. Chunks arrive in file order.
pub struct ChunkedCsvReader {
    header:      Vec<String>,
    receiver:    Receiver<PrepResult<DataFrame>>,
    join_handle: Option<JoinHandle<()>>,
}

impl ChunkedCsvReader {
    pub fn try_new(
        path: &Path,
        separator: u8,
        chunk_size: usize,
        queue_len: usize,
    ) -> PrepResult<Self> {
        ensure_exists(path)?;
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(separator)
            .has_headers(true)
            .from_path(path)?;
        let header: Vec<String> = reader
            .headers()?
            .iter()
            .map(str::to_string)
            .collect();

        let (sender, receiver) = crossbeam::channel::bounded(queue_len.max(1));
        let chunk_size = chunk_size.max(1);
        let thread_header = header.clone();

        let join_handle = std::thread::spawn(move || {
            let mut buffer: Vec<csv::StringRecord> = Vec::with_capacity(chunk_size);
            let mut n_sent = 0usize;
            for record in reader.into_records() {
                match record {
                    Ok(record) => buffer.push(record),
                    Err(e) => {
                        let _ = sender.send(Err(e.into()));
                        return;
                    },
                }
                if buffer.len() == chunk_size {
                    let chunk = records_to_frame(&thread_header, &buffer);
                    buffer.clear();
                    if sender.send(chunk).is_err() {
                        // Receiver dropped, nobody wants the rest.
                        return;
                    }
                    n_sent += 1;
                }
            }
            if !buffer.is_empty() {
                let _ = sender.send(records_to_frame(&thread_header, &buffer));
                n_sent += 1;
            }
            debug!("Chunk reader finished after {} chunks", n_sent);
        });

        Ok(Self {
            header,
            receiver,
            join_handle: Some(join_handle),
        })
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }
}

impl Iterator for ChunkedCsvReader {
    type Item = PrepResult<DataFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.receiver.recv() {
            Ok(chunk) => Some(chunk),
            // Channel closed: the reader thread is done, check how it ended.
            Err(_) => {
                let handle = self.join_handle.take()?;
                match handle.join() {
                    Ok(()) => None,
                    Err(_) => {
                        Some(Err(PrepError::ReaderDisconnected(
                            "chunk reader thread panicked".into(),
                        )))
                    },
                }
            },
        }
    }
}

/// Builds a string `DataFrame` from parsed records. Empty cells become
/// nulls, matching the whole-table reader.
pub fn records_to_frame(
    header: &[String],
    records: &[csv::StringRecord],
) -> PrepResult<DataFrame> {
    let columns = header
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let values: StringChunked = records
                .iter()
                .map(|record| record.get(idx).filter(|cell| !cell.is_empty()))
                .collect();
            values.with_name(name.as_str().into()).into_column()
        })
        .collect::<Vec<Column>>();
    Ok(DataFrame::new(columns)?)
}
