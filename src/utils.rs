//! Helpers shared across the crate: the process-wide rayon pool and the
//! builder-style macros used by the configuration structs.

use itertools::Itertools;
use once_cell::sync::Lazy;
use rayon::{
    ThreadPool,
    ThreadPoolBuilder,
};

pub static THREAD_POOL: Lazy<ThreadPool> = Lazy::new(|| {
    let num_threads: Option<usize> = std::env::var("GEOPREP_NUM_THREADS")
        .ok()
        .and_then(|str| str.parse::<usize>().ok());
    ThreadPoolBuilder::new()
        .num_threads(num_threads.unwrap_or(0))
        .build()
        .expect("Failed to create thread pool")
});

/// Size of [`THREAD_POOL`].
pub fn n_threads() -> usize {
    THREAD_POOL.current_num_threads()
}

/// Shortens a set of keys to at most `limit` entries for log and error
/// messages, appending the number of omitted entries.
pub fn preview<'a, I>(
    items: I,
    limit: usize,
) -> String
where
    I: IntoIterator<Item = &'a String>, {
    let mut iter = items.into_iter();
    let shown = iter.by_ref().take(limit).join(", ");
    let rest = iter.count();
    if rest == 0 {
        format!("[{}]", shown)
    }
    else {
        format!("[{}, ... {} more]", shown, rest)
    }
}

#[macro_export]
macro_rules! with_field_fn {
    ($field_name: ident, $field_type: ty) => {
        paste::paste! {
            pub fn [<with_$field_name>](mut self, value: $field_type) -> Self {
            self.$field_name = value;
            self
            }
        }
    };
}
