//! # Series
//!
//! A [`Series`] is a single-column view of a [`DataFrame`]: the frame's plan
//! with a projection to one column.

use crate::core::{Column, DataType, DataValue};
use crate::dataframe::DataFrame;
use crate::error::{Error, Result};
use crate::index::Index;

/// One named column of a lazy [`DataFrame`]
#[derive(Debug, Clone)]
pub struct Series {
    frame: DataFrame,
    name: String,
}

impl Series {
    /// `frame` must hold exactly the column `name`
    pub(crate) fn new(frame: DataFrame, name: String) -> Self {
        Series { frame, name }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dtype(&self) -> Result<DataType> {
        self.frame
            .schema()?
            .fields()
            .first()
            .map(|f| f.data_type)
            .ok_or_else(|| Error::ColumnNotFound(self.name.clone()))
    }

    /// First `n` values
    pub fn head(&self, n: usize) -> Series {
        Series::new(self.frame.head(n), self.name.clone())
    }

    /// Same values under another name
    pub fn rename(&self, name: &str) -> Result<Series> {
        Ok(Series::new(self.frame.set_columns(&[name])?, name.to_string()))
    }

    /// Number of values
    pub fn len(&self) -> Result<usize> {
        self.frame.count()
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Collected values. Integer series with missing values come back as
    /// doubles.
    pub fn to_values(&self) -> Result<Vec<DataValue>> {
        Ok(self.to_column()?.into_values())
    }

    /// Collected values as a named column
    pub fn to_column(&self) -> Result<Column> {
        self.frame
            .to_local()?
            .column(&self.name)
            .cloned()
            .ok_or_else(|| Error::ColumnNotFound(self.name.clone()))
    }

    /// Row labels
    pub fn index(&self) -> Result<Index> {
        self.frame.index()
    }

    /// Single-column frame
    pub fn to_frame(&self) -> DataFrame {
        self.frame.clone()
    }
}
