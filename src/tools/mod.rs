//! Row-level stages applied after the merge, in pipeline order:
//! [`filter`], [`aggregate`], [`normalize`] and [`split`]. [`labels`] is the
//! standalone tool that derives the metadata `Label` column from sample
//! titles.

pub mod aggregate;
pub mod filter;
pub mod labels;
pub mod normalize;
pub mod split;
